//! Flowchart grammar.
//!
//! A flowchart is a header with an optional direction followed by a flat list
//! of nodes, links and subgraphs. Links do not name their source: the element
//! before a link is its origin, and the link's destination is parsed as the
//! next node.

use log::trace;

use astrolabe_core::{
    ast::{Arrow, Direction, FlowElement, Flowchart, LinkStroke, Node, NodeShape, Subgraph},
    kind::DiagramKind,
};

use super::{Parser, describe, diagnostic_at};
use crate::{
    error::ErrorCode,
    tokens::{Token, TokenKind},
    validate,
};

/// Subgraphs nested deeper than this are reported and skipped.
pub(crate) const MAX_SUBGRAPH_DEPTH: usize = 64;

/// Tokens that end label recovery inside a flowchart.
const LINKS: &[TokenKind] = &[
    TokenKind::Arrow,
    TokenKind::OpenLink,
    TokenKind::DottedArrow,
    TokenKind::ThickArrow,
];

fn is_end_keyword(token: &Token<'_>) -> bool {
    token.is(TokenKind::Identifier) && token.text.eq_ignore_ascii_case("end")
}

fn is_subgraph_keyword(token: &Token<'_>) -> bool {
    token.is(TokenKind::Identifier) && token.text == "subgraph"
}

/// Can `token` name a node? `end` and `subgraph` are reserved.
fn is_node_id(token: &Token<'_>) -> bool {
    token.is_name() && !is_end_keyword(token) && !is_subgraph_keyword(token)
}

/// Shape and closing delimiter introduced by an opening delimiter.
fn shape_for(open: TokenKind) -> Option<(NodeShape, TokenKind)> {
    let shape = match open {
        TokenKind::LeftBracket => (NodeShape::Rectangle, TokenKind::RightBracket),
        TokenKind::LeftParen => (NodeShape::Round, TokenKind::RightParen),
        TokenKind::DoubleLeftParen => (NodeShape::Circle, TokenKind::DoubleRightParen),
        TokenKind::LeftBrace => (NodeShape::Diamond, TokenKind::RightBrace),
        TokenKind::DoubleLeftBracket => (NodeShape::Subroutine, TokenKind::DoubleRightBracket),
        TokenKind::DoubleLeftBrace => (NodeShape::Hexagon, TokenKind::DoubleRightBrace),
        _ => return None,
    };
    Some(shape)
}

fn stroke_for(link: TokenKind) -> LinkStroke {
    match link {
        TokenKind::DottedArrow => LinkStroke::Dotted,
        TokenKind::ThickArrow => LinkStroke::Thick,
        TokenKind::OpenLink => LinkStroke::Open,
        _ => LinkStroke::Plain,
    }
}

impl<'src> Parser<'src> {
    /// Parse a flowchart after its header keyword.
    ///
    /// Stops at end of input or at another diagram header that begins a line.
    pub(super) fn flowchart(&mut self, header: &Token<'src>) -> Flowchart {
        trace!(line = header.line; "Parsing flowchart");

        let direction = self.flow_direction(header);
        let elements = self.flow_elements(None, 0);

        for diagnostic in validate::missing_arrows(&elements, &self.tokens) {
            self.emit(diagnostic);
        }

        Flowchart {
            direction,
            elements,
        }
    }

    /// Optional direction on the header line.
    fn flow_direction(&mut self, header: &Token<'src>) -> Option<Direction> {
        let token = self.peek();
        if !self.on_line(header.line) || !token.is(TokenKind::Identifier) {
            return None;
        }

        self.bump();
        let direction = Direction::from_keyword(token.text);
        if direction.is_none() {
            self.emit(
                diagnostic_at(
                    &token,
                    ErrorCode::InvalidDirection,
                    format!("invalid flowchart direction `{}`", token.text),
                )
                .with_suggestion("use one of TD, TB, BT, RL or LR"),
            );
        }
        direction
    }

    /// Parse elements until EOF, a new diagram header, or, inside a
    /// subgraph, the matching `end`. `depth` counts the enclosing subgraphs.
    fn flow_elements(&mut self, subgraph: Option<&Token<'src>>, depth: usize) -> Vec<FlowElement> {
        let mut elements = Vec::new();

        loop {
            let token = self.peek();

            if token.is(TokenKind::Eof)
                || (token.kind.header_kind().is_some() && self.starts_line())
            {
                if let Some(open) = subgraph {
                    self.emit(
                        diagnostic_at(
                            open,
                            ErrorCode::MissingSubgraphEnd,
                            "subgraph is never closed",
                        )
                        .with_suggestion("add `end` after the subgraph's content"),
                    );
                }
                return elements;
            }

            if is_end_keyword(&token) {
                self.bump();
                if subgraph.is_some() {
                    return elements;
                }
                self.emit(
                    diagnostic_at(&token, ErrorCode::UnmatchedEnd, "`end` without an open subgraph")
                        .with_suggestion("remove the `end` or open a block with `subgraph`"),
                );
                continue;
            }

            if let Some(statement) = self.peek_meta_statement() {
                self.meta_statement(DiagramKind::Flowchart, statement);
                continue;
            }

            match token.kind {
                TokenKind::Semicolon => {
                    self.bump();
                }
                kind if kind.is_flow_link() => {
                    let has_source = matches!(
                        elements.last(),
                        Some(FlowElement::Node(_) | FlowElement::Subgraph(_))
                    ) && !self.at_statement_start();
                    if !has_source {
                        self.emit(
                            diagnostic_at(&token, ErrorCode::ParseError, "link has no source node")
                                .with_suggestion("start the link from a node, e.g. `A --> B`"),
                        );
                    }
                    elements.push(FlowElement::Arrow(self.flow_link()));
                }
                _ if is_subgraph_keyword(&token) && depth >= MAX_SUBGRAPH_DEPTH => {
                    self.skip_nested_subgraph();
                }
                _ if is_subgraph_keyword(&token) => {
                    elements.push(FlowElement::Subgraph(self.subgraph(depth + 1)));
                }
                _ if is_node_id(&token) => {
                    elements.push(FlowElement::Node(self.flow_node()));
                }
                _ => {
                    self.bump();
                    self.emit(
                        diagnostic_at(
                            &token,
                            ErrorCode::ParseError,
                            format!("unexpected {} in flowchart", describe(&token)),
                        )
                        .with_suggestion("node ids start with a letter, digit or underscore"),
                    );
                }
            }
        }
    }

    /// `id`, optionally followed by a shape with a label.
    fn flow_node(&mut self) -> Node {
        let id = self.bump_name();
        let mut shape = NodeShape::Rectangle;
        let mut label = None;

        let next = self.peek();
        let opened = if next.line == id.end_line() {
            shape_for(next.kind)
        } else {
            None
        };
        if let Some((node_shape, closer)) = opened {
            shape = node_shape;
            label = self.delimited_label(&id, closer, LINKS);
        }

        Node {
            id: id.value().to_string(),
            label,
            shape,
            position: id.position(),
        }
    }

    /// A link with an optional `|label|`. The destination is left for the
    /// next loop iteration to parse as a node.
    fn flow_link(&mut self) -> Arrow {
        let link = self.bump();
        self.link_count += 1;

        let label = if self.on_line(link.line) && self.at(TokenKind::Pipe) {
            self.pipe_label()
        } else {
            None
        };

        let next = self.peek_name();
        let to = if self.on_line(link.line) && is_node_id(&next) {
            Some(next.value().to_string())
        } else {
            self.emit(
                diagnostic_at(&link, ErrorCode::IncompleteArrow, "arrow has no destination node")
                    .with_suggestion("add a target node after the arrow, e.g. `A --> B`"),
            );
            None
        };

        Arrow {
            to,
            label,
            stroke: stroke_for(link.kind),
            position: link.position(),
        }
    }

    /// `|text|` on the link's line.
    fn pipe_label(&mut self) -> Option<String> {
        let open = self.bump();
        let mut words = Vec::new();

        while self.on_line(open.line) && !self.at(TokenKind::Pipe) {
            words.push(self.bump());
        }

        if self.on_line(open.line) {
            self.bump();
        } else {
            let found = self.peek();
            self.emit(
                diagnostic_at(
                    &found,
                    ErrorCode::ParseError,
                    format!("expected '|' to close the link label, found {}", describe(&found)),
                )
                .with_suggestion("close the label with `|`"),
            );
        }

        self.label_text(&words)
    }

    /// `subgraph id`, `subgraph id [label]` or `subgraph free text title`,
    /// then elements up to `end`.
    fn subgraph(&mut self, depth: usize) -> Subgraph {
        let keyword = self.bump();
        let mut id = String::new();
        let mut label = None;

        if self.on_line(keyword.line) {
            let first = self.bump_name();
            id = first.value().to_string();

            if self.on_line(keyword.line) && self.at(TokenKind::LeftBracket) {
                label = self.delimited_label(&first, TokenKind::RightBracket, &[]);
            } else {
                let mut words = vec![first];
                words.extend(self.rest_of_line(keyword.line));
                if words.len() > 1 || first.is(TokenKind::String) {
                    label = self.label_text(&words);
                }
            }
        } else {
            self.emit(
                diagnostic_at(&keyword, ErrorCode::ParseError, "expected a subgraph id")
                    .with_suggestion("name the subgraph, e.g. `subgraph one`"),
            );
        }

        let elements = self.flow_elements(Some(&keyword), depth);

        Subgraph {
            id,
            label,
            elements,
            position: keyword.position(),
        }
    }

    /// Report a subgraph that would exceed [`MAX_SUBGRAPH_DEPTH`] and skip
    /// it up to its matching `end`, without building elements.
    fn skip_nested_subgraph(&mut self) {
        let keyword = self.bump();
        self.emit(
            diagnostic_at(
                &keyword,
                ErrorCode::ParseError,
                format!("subgraphs are nested more than {MAX_SUBGRAPH_DEPTH} levels deep"),
            )
            .with_suggestion("flatten the subgraph structure"),
        );

        let mut open = 1usize;
        while !self.at_eof() {
            let token = self.peek();
            let starts_statement = self.at_statement_start();
            if token.kind.header_kind().is_some() && self.starts_line() {
                return;
            }
            self.bump();

            if !starts_statement {
                continue;
            }
            if is_subgraph_keyword(&token) {
                open += 1;
            } else if is_end_keyword(&token) {
                open -= 1;
                if open == 0 {
                    return;
                }
            }
        }
    }
}
