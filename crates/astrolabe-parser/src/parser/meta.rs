//! Meta statements: styling, interaction, notes, titles and directions.
//!
//! Every grammar routes a statement-initial meta keyword here. The statement
//! is checked against the legality table for the enclosing diagram type; an
//! illegal statement is reported once and its line skipped.

use astrolabe_core::{ast::Direction, kind::DiagramKind};

use super::{Parser, describe, diagnostic_at};
use crate::{
    error::ErrorCode,
    tokens::{Token, TokenKind},
    validate::{self, MetaStatement},
};

impl<'src> Parser<'src> {
    /// The meta statement starting at the cursor, if any.
    pub(super) fn peek_meta_statement(&self) -> Option<MetaStatement> {
        let token = self.peek();
        if !token.is(TokenKind::Identifier) || !self.at_statement_start() {
            return None;
        }
        MetaStatement::from_keyword(token.text)
    }

    /// Parse a meta statement in a diagram of type `kind`, consuming its line.
    pub(super) fn meta_statement(&mut self, kind: DiagramKind, statement: MetaStatement) {
        let keyword = self.bump();

        if !validate::is_legal(kind, statement) {
            self.illegal_meta_statement(kind, statement, &keyword);
            self.skip_line(keyword.line);
            return;
        }

        match statement {
            MetaStatement::ClassDef => self.class_def(&keyword),
            MetaStatement::LinkStyle => self.link_style(&keyword),
            MetaStatement::Direction => self.direction_statement(&keyword),
            MetaStatement::Class
            | MetaStatement::Style
            | MetaStatement::Click
            | MetaStatement::Note
            | MetaStatement::Title => {}
        }
        self.skip_line(keyword.line);
    }

    fn illegal_meta_statement(
        &mut self,
        kind: DiagramKind,
        statement: MetaStatement,
        keyword: &Token<'src>,
    ) {
        let diagnostic = match statement {
            MetaStatement::Title => diagnostic_at(
                keyword,
                ErrorCode::UnsupportedTitleDirective,
                format!("`title` is not supported in {kind} diagrams"),
            )
            .with_suggestion("remove the title or put it in the diagram's front matter"),
            MetaStatement::Note if !self.note_has_placement(keyword.line) => diagnostic_at(
                keyword,
                ErrorCode::InvalidNoteSyntax,
                "a note must be placed `left of`, `right of` or `over` a participant",
            )
            .with_suggestion("write the note as `note right of A: text`"),
            _ => diagnostic_at(
                keyword,
                ErrorCode::UnsupportedStylingDirective,
                format!("`{}` is not supported in {kind} diagrams", statement.keyword()),
            )
            .with_suggestion(format!("remove the `{}` statement", statement.keyword())),
        };
        self.emit(diagnostic);
    }

    /// Does the note on `line` start with a placement?
    fn note_has_placement(&self, line: usize) -> bool {
        let first = self.peek();
        let second = self.peek_nth(1);
        if !self.on_line(line) {
            return false;
        }
        match first.text {
            "over" => true,
            "left" | "right" => second.line == line && second.text == "of",
            _ => false,
        }
    }

    /// `classDef name key:value,key:value`
    fn class_def(&mut self, keyword: &Token<'src>) {
        if !self.on_line(keyword.line) {
            self.emit(
                diagnostic_at(keyword, ErrorCode::ParseError, "expected a class name after `classDef`")
                    .with_suggestion("write `classDef name fill:#f9f`"),
            );
            return;
        }

        let rest = self.rest_of_line(keyword.line);
        if let Some(equals) = rest.iter().find(|token| token.is(TokenKind::Equals)) {
            self.emit(
                diagnostic_at(
                    equals,
                    ErrorCode::UnsupportedClassdefEqualsSyntax,
                    "`classDef` properties use `key:value`, not `key=value`",
                )
                .with_suggestion("replace `=` with `:`, e.g. `fill:#f9f`"),
            );
        }
    }

    /// `linkStyle 0,2 stroke:#f00` or `linkStyle default ...`
    ///
    /// Each index must refer to a link defined earlier in the diagram.
    fn link_style(&mut self, keyword: &Token<'src>) {
        let first = self.peek();
        if self.on_line(keyword.line) && first.text == "default" {
            return;
        }
        if !self.on_line(keyword.line) || !first.is(TokenKind::Number) {
            self.emit(
                diagnostic_at(
                    keyword,
                    ErrorCode::InvalidLinkstyleIndex,
                    format!("expected a link index after `linkStyle`, found {}", describe(&first)),
                )
                .with_suggestion("write `linkStyle 0 stroke:#f00` or `linkStyle default ...`"),
            );
            return;
        }

        while self.on_line(keyword.line) {
            let token = self.peek();
            match token.kind {
                TokenKind::Number => {
                    self.bump();
                    self.check_link_index(&token);
                }
                TokenKind::Comma => {
                    self.bump();
                }
                _ => break,
            }
        }
    }

    fn check_link_index(&mut self, token: &Token<'src>) {
        let Ok(index) = token.text.parse::<usize>() else {
            self.emit(
                diagnostic_at(
                    token,
                    ErrorCode::InvalidLinkstyleIndex,
                    format!("`{}` is not a valid link index", token.text),
                )
                .with_suggestion("link indices are whole numbers starting at 0"),
            );
            return;
        };

        if index < self.link_count {
            return;
        }

        let suggestion = match self.link_count {
            0 => "define links before styling them".to_string(),
            count => format!("use an index between 0 and {}", count - 1),
        };
        self.emit(
            diagnostic_at(
                token,
                ErrorCode::InvalidLinkstyleIndex,
                format!(
                    "linkStyle index {index} is out of range: {} link(s) defined so far",
                    self.link_count
                ),
            )
            .with_suggestion(suggestion),
        );
    }

    /// `direction LR` inside a flowchart or subgraph
    fn direction_statement(&mut self, keyword: &Token<'src>) {
        let token = self.peek();
        let valid = self.on_line(keyword.line) && Direction::from_keyword(token.text).is_some();
        if valid {
            self.bump();
            return;
        }

        let (at, message) = if self.on_line(keyword.line) {
            (token, format!("invalid direction `{}`", token.text))
        } else {
            (*keyword, "expected a direction after `direction`".to_string())
        };
        self.emit(
            diagnostic_at(&at, ErrorCode::InvalidDirection, message)
                .with_suggestion("use one of TD, TB, BT, RL or LR"),
        );
    }
}
