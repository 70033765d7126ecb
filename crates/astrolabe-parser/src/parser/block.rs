//! Block-diagram grammar (`block-beta`).

use log::trace;

use astrolabe_core::{
    ast::{Block, BlockDiagram},
    kind::DiagramKind,
};

use super::{Parser, describe, diagnostic_at};
use crate::{
    error::ErrorCode,
    tokens::{Token, TokenKind},
};

impl<'src> Parser<'src> {
    /// Parse a block diagram after its header keyword.
    ///
    /// Accepts `columns N` and `id` or `id[label]` blocks; links between
    /// blocks are not supported.
    pub(super) fn block_diagram(&mut self, header: &Token<'src>) -> BlockDiagram {
        trace!(line = header.line; "Parsing block diagram");
        self.skip_line(header.line);

        let mut diagram = BlockDiagram::default();

        while !self.at_eof() {
            let token = self.peek();

            if token.is(TokenKind::Semicolon) {
                self.bump();
                continue;
            }

            if let Some(statement) = self.peek_meta_statement() {
                self.meta_statement(DiagramKind::Block, statement);
                continue;
            }

            if token.is(TokenKind::Identifier) && token.text == "columns" && self.at_statement_start() {
                self.columns(&mut diagram);
                continue;
            }

            if token.is_name() {
                let id = self.bump_name();
                let next = self.peek();
                let label = if next.is(TokenKind::LeftBracket) && next.line == id.end_line() {
                    self.delimited_label(&id, TokenKind::RightBracket, &[])
                } else {
                    None
                };
                diagram.blocks.push(Block {
                    id: id.value().to_string(),
                    label,
                });
                continue;
            }

            self.bump();
            let suggestion = if token.kind.is_arrow() {
                "links between blocks are not supported"
            } else {
                "expected `columns N` or a block like `id[\"label\"]`"
            };
            self.emit(
                diagnostic_at(
                    &token,
                    ErrorCode::ParseError,
                    format!("unexpected {} in block diagram", describe(&token)),
                )
                .with_suggestion(suggestion),
            );
        }

        diagram
    }

    /// `columns N`
    fn columns(&mut self, diagram: &mut BlockDiagram) {
        let keyword = self.bump();
        let count = self.peek();

        let parsed = if self.on_line(keyword.line) && count.is(TokenKind::Number) {
            count.text.parse::<u32>().ok()
        } else {
            None
        };

        match parsed {
            Some(columns) => {
                self.bump();
                diagram.columns = Some(columns);
            }
            None => {
                self.emit(
                    diagnostic_at(
                        &keyword,
                        ErrorCode::ParseError,
                        format!("expected a column count after `columns`, found {}", describe(&count)),
                    )
                    .with_suggestion("write `columns 3`"),
                );
            }
        }
        self.skip_line(keyword.line);
    }
}
