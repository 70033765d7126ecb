//! XY-chart grammar (`xychart-beta`).
//!
//! Recognized statements are `title`, `x-axis [...]`, `y-axis`, and the
//! `bar` / `line` series. A chart must have at least one series.

use log::trace;

use astrolabe_core::{
    ast::{Series, SeriesKind, XyChart, YAxis},
    kind::DiagramKind,
};

use super::{Parser, describe, diagnostic_at};
use crate::{
    error::ErrorCode,
    tokens::{Token, TokenKind},
};

/// Characters that force an x-axis category to be quoted.
fn needs_quoting(label: &str) -> bool {
    label.chars().any(|c| {
        c.is_whitespace() || matches!(c, '"' | '\'' | '[' | ']' | '{' | '}' | '|' | '\\' | '/')
    })
}

fn parse_number(token: &Token<'_>) -> Option<f64> {
    if token.is(TokenKind::Number) {
        token.text.parse().ok()
    } else {
        None
    }
}

impl<'src> Parser<'src> {
    /// Parse an XY chart after its header keyword.
    pub(super) fn xy_chart(&mut self, header: &Token<'src>) -> XyChart {
        trace!(line = header.line; "Parsing xy chart");

        let mut chart = XyChart::default();
        let orientation = self.peek();
        if self.on_line(header.line) && orientation.text == "horizontal" {
            self.bump();
            chart.horizontal = true;
        }
        self.skip_line(header.line);

        while !self.at_eof() {
            let token = self.peek();

            if token.is(TokenKind::Semicolon) {
                self.bump();
                continue;
            }

            if token.is(TokenKind::Identifier) && self.at_statement_start() {
                match token.text {
                    "title" => {
                        self.chart_title(&mut chart);
                        continue;
                    }
                    "x-axis" => {
                        self.x_axis(&mut chart);
                        continue;
                    }
                    "y-axis" => {
                        self.y_axis(&mut chart);
                        continue;
                    }
                    "bar" | "line" => {
                        self.series(&mut chart);
                        continue;
                    }
                    "area" | "scatter" => {
                        self.emit(
                            diagnostic_at(
                                &token,
                                ErrorCode::UnsupportedChartType,
                                format!("`{}` series are not supported", token.text),
                            )
                            .with_suggestion("use a `bar` or `line` series"),
                        );
                        self.skip_line(token.line);
                        continue;
                    }
                    "series" => {
                        self.emit(
                            diagnostic_at(
                                &token,
                                ErrorCode::UnsupportedSeriesSyntax,
                                "the generic `series` statement is not supported",
                            )
                            .with_suggestion("declare each series as `bar [...]` or `line [...]`"),
                        );
                        self.skip_line(token.line);
                        continue;
                    }
                    _ => {}
                }
            }

            if let Some(statement) = self.peek_meta_statement() {
                self.meta_statement(DiagramKind::XyChart, statement);
                continue;
            }

            self.emit(
                diagnostic_at(
                    &token,
                    ErrorCode::ParseError,
                    format!("unexpected {} in xy chart", describe(&token)),
                )
                .with_suggestion("expected `title`, `x-axis`, `y-axis`, `bar` or `line`"),
            );
            self.skip_line(token.line);
        }

        if chart.series.is_empty() {
            self.emit(
                diagnostic_at(header, ErrorCode::MissingData, "chart has no data series")
                    .with_suggestion("add a series such as `bar [1, 2, 3]`"),
            );
        }

        chart
    }

    /// `title "text"` or `title free text`
    fn chart_title(&mut self, chart: &mut XyChart) {
        let keyword = self.bump();
        let words = self.rest_of_line(keyword.line);
        chart.title = self.label_text(&words);
        if chart.title.is_none() {
            self.emit(
                diagnostic_at(&keyword, ErrorCode::ParseError, "expected a chart title")
                    .with_suggestion("write `title \"Sales\"`"),
            );
        }
    }

    /// `x-axis ["title"] [a, b, "c d"]`
    fn x_axis(&mut self, chart: &mut XyChart) {
        let keyword = self.bump();
        if self.on_line(keyword.line) && self.at(TokenKind::String) {
            self.bump();
        }

        if !(self.on_line(keyword.line) && self.at(TokenKind::LeftBracket)) {
            let found = self.peek();
            let at = if self.on_line(keyword.line) { found } else { keyword };
            self.emit(
                diagnostic_at(
                    &at,
                    ErrorCode::InvalidXAxisSyntax,
                    format!("`x-axis` expects a bracketed category list, found {}", describe(&found)),
                )
                .with_suggestion("write `x-axis [jan, feb, mar]`"),
            );
            self.skip_line(keyword.line);
            return;
        }

        let open = self.bump();
        let mut categories = Vec::new();
        let mut item: Vec<Token<'src>> = Vec::new();

        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::RightBracket => {
                    self.bump();
                    self.push_category(&mut categories, &item);
                    break;
                }
                TokenKind::Comma => {
                    self.bump();
                    self.push_category(&mut categories, &item);
                    item.clear();
                }
                TokenKind::Eof => {
                    self.emit(
                        diagnostic_at(
                            &open,
                            ErrorCode::InvalidXAxisSyntax,
                            "`x-axis` category list is never closed",
                        )
                        .with_suggestion("close the list with `]`"),
                    );
                    self.push_category(&mut categories, &item);
                    break;
                }
                _ => {
                    item.push(self.bump());
                }
            }
        }

        chart.x_axis = categories;
        self.skip_line(keyword.line);
    }

    /// Validate one comma-separated category and add it to the axis.
    fn push_category(&mut self, categories: &mut Vec<String>, item: &[Token<'src>]) {
        let (Some(first), Some(last)) = (item.first(), item.last()) else {
            return;
        };

        if item.len() == 1 && first.is(TokenKind::String) {
            categories.push(first.value().to_string());
            return;
        }

        let raw = self.text_between(first, last);
        if needs_quoting(raw) {
            self.emit(
                diagnostic_at(
                    first,
                    ErrorCode::InvalidIdentifier,
                    format!("category `{raw}` must be quoted"),
                )
                .with_suggestion(format!("\"{}\"", raw.replace('"', "'"))),
            );
        }
        categories.push(raw.to_string());
    }

    /// `y-axis ["label"|label] [min --> max]`
    fn y_axis(&mut self, chart: &mut XyChart) {
        let keyword = self.bump();
        let line = keyword.line;
        let mut axis = YAxis::default();

        let label = self.peek();
        let is_label = label.is(TokenKind::String)
            || (label.is(TokenKind::Identifier) && !matches!(label.text, "min" | "max"));
        if self.on_line(line) && is_label {
            self.bump();
            axis.label = Some(label.value().to_string());
        }

        if self.on_line(line) {
            if let Some((min, max)) = self.y_range(line) {
                axis.min = Some(min);
                axis.max = Some(max);
            }
        }

        chart.y_axis = Some(axis);
        self.skip_line(line);
    }

    /// `min --> max` on `line`; reports and returns `None` when malformed.
    fn y_range(&mut self, line: usize) -> Option<(f64, f64)> {
        let min = self.y_bound(line)?;

        let arrow = self.peek();
        if !(self.on_line(line) && arrow.is(TokenKind::Arrow)) {
            self.emit(
                diagnostic_at(
                    &arrow,
                    ErrorCode::InvalidYAxisSyntax,
                    format!("expected `-->` between the y-axis bounds, found {}", describe(&arrow)),
                )
                .with_suggestion("write the range as `0 --> 100`"),
            );
            return None;
        }
        self.bump();

        let max = self.y_bound(line)?;
        Some((min, max))
    }

    fn y_bound(&mut self, line: usize) -> Option<f64> {
        let token = self.peek();
        if self.on_line(line) {
            if let Some(value) = parse_number(&token) {
                self.bump();
                return Some(value);
            }
        }

        let message = if matches!(token.text, "min" | "max") {
            format!("`{}` is not a number; y-axis bounds must be numeric", token.text)
        } else {
            format!("expected a numeric y-axis bound, found {}", describe(&token))
        };
        self.emit(
            diagnostic_at(&token, ErrorCode::InvalidYAxisSyntax, message)
                .with_suggestion("write the range as `y-axis \"Revenue\" 0 --> 100`"),
        );
        None
    }

    /// `bar ["title"] [1, 2, 3]` or `line [...]`
    fn series(&mut self, chart: &mut XyChart) {
        let keyword = self.bump();
        let kind = if keyword.text == "bar" {
            SeriesKind::Bar
        } else {
            SeriesKind::Line
        };

        if self.on_line(keyword.line) && self.at(TokenKind::String) {
            self.bump();
        }

        if !(self.on_line(keyword.line) && self.at(TokenKind::LeftBracket)) {
            let found = self.peek();
            self.emit(
                diagnostic_at(
                    &keyword,
                    ErrorCode::ParseError,
                    format!("expected `[` with values after `{}`, found {}", keyword.text, describe(&found)),
                )
                .with_suggestion(format!("write `{} [1, 2, 3]`", keyword.text)),
            );
            self.skip_line(keyword.line);
            return;
        }
        self.bump();

        let mut values = Vec::new();
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::RightBracket => {
                    self.bump();
                    break;
                }
                TokenKind::Comma => {
                    self.bump();
                }
                TokenKind::Number => {
                    self.bump();
                    if let Some(value) = parse_number(&token) {
                        values.push(value);
                    }
                }
                _ => {
                    self.emit(
                        diagnostic_at(
                            &token,
                            ErrorCode::ParseError,
                            format!("expected a numeric value, found {}", describe(&token)),
                        )
                        .with_suggestion("series values are numbers separated by commas"),
                    );
                    self.recover(&[TokenKind::RightBracket]);
                    self.eat(TokenKind::RightBracket);
                    break;
                }
            }
        }

        chart.series.push(Series { kind, values });
        self.skip_line(keyword.line);
    }
}
