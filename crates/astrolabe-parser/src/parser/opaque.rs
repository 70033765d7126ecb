//! Diagram types whose content is not modeled.
//!
//! Class, state, ER, pie, journey, gantt, gitgraph, mindmap and timeline
//! diagrams are consumed to the end of the input. Only the meta-statement
//! legality rules apply to them.

use log::trace;

use astrolabe_core::kind::DiagramKind;

use super::Parser;
use crate::tokens::Token;

impl<'src> Parser<'src> {
    /// Consume a diagram of type `kind` after its header keyword.
    ///
    /// The rest of the header line holds header arguments (`pie title Pets`)
    /// and is never checked.
    pub(super) fn opaque(&mut self, kind: DiagramKind, header: &Token<'src>) {
        trace!(kind = kind.as_str(), line = header.line; "Consuming diagram body");
        self.skip_line(header.line);

        while !self.at_eof() {
            match self.peek_meta_statement() {
                Some(statement) => self.meta_statement(kind, statement),
                None => {
                    self.bump();
                }
            }
        }
    }
}
