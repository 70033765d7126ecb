//! Structural rules applied on top of the grammars.
//!
//! Two concerns live here: which meta statements (styling, notes, titles,
//! ...) each diagram type accepts, and the flowchart connectivity rule that
//! every pair of nodes sharing a line must be joined by a link.

use astrolabe_core::{
    ast::{FlowElement, Node},
    kind::DiagramKind,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
    tokens::{Token, TokenKind},
};

/// Statements that configure a diagram rather than describe its content.
///
/// They are recognized only as the first token of a statement, with exact
/// case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MetaStatement {
    ClassDef,
    Class,
    LinkStyle,
    Style,
    Click,
    Note,
    Direction,
    Title,
}

impl MetaStatement {
    pub(crate) fn from_keyword(keyword: &str) -> Option<Self> {
        let statement = match keyword {
            "classDef" => MetaStatement::ClassDef,
            "class" => MetaStatement::Class,
            "linkStyle" => MetaStatement::LinkStyle,
            "style" => MetaStatement::Style,
            "click" => MetaStatement::Click,
            "note" => MetaStatement::Note,
            "direction" => MetaStatement::Direction,
            "title" => MetaStatement::Title,
            _ => return None,
        };
        Some(statement)
    }

    pub(crate) fn keyword(&self) -> &'static str {
        match self {
            MetaStatement::ClassDef => "classDef",
            MetaStatement::Class => "class",
            MetaStatement::LinkStyle => "linkStyle",
            MetaStatement::Style => "style",
            MetaStatement::Click => "click",
            MetaStatement::Note => "note",
            MetaStatement::Direction => "direction",
            MetaStatement::Title => "title",
        }
    }
}

/// Diagram types that accept meta statements, and which ones.
///
/// A diagram type missing from this table accepts none.
static META_STATEMENT_LEGALITY: &[(DiagramKind, &[MetaStatement])] = &[
    (
        DiagramKind::Flowchart,
        &[
            MetaStatement::ClassDef,
            MetaStatement::Class,
            MetaStatement::LinkStyle,
            MetaStatement::Style,
            MetaStatement::Click,
            MetaStatement::Note,
            MetaStatement::Direction,
            MetaStatement::Title,
        ],
    ),
    (
        DiagramKind::Class,
        &[MetaStatement::ClassDef, MetaStatement::Class],
    ),
    (
        DiagramKind::State,
        &[MetaStatement::ClassDef, MetaStatement::Class],
    ),
];

/// Returns true if `statement` may appear in a diagram of type `kind`.
pub(crate) fn is_legal(kind: DiagramKind, statement: MetaStatement) -> bool {
    META_STATEMENT_LEGALITY
        .iter()
        .find(|(table_kind, _)| *table_kind == kind)
        .is_some_and(|(_, allowed)| allowed.contains(&statement))
}

/// Report nodes that share a line with the preceding node and are not linked
/// to it.
///
/// Nodes are considered separated when a `;` token lies between them. The
/// check descends into subgraphs, each of which is its own sequence.
pub(crate) fn missing_arrows(elements: &[FlowElement], tokens: &[Token<'_>]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    collect_missing_arrows(elements, tokens, &mut diagnostics);
    diagnostics
}

fn collect_missing_arrows(
    elements: &[FlowElement],
    tokens: &[Token<'_>],
    diagnostics: &mut Vec<Diagnostic>,
) {
    for pair in elements.windows(2) {
        let [FlowElement::Node(first), FlowElement::Node(second)] = pair else {
            continue;
        };
        if first.position.line != second.position.line || separated(first, second, tokens) {
            continue;
        }

        let span = Span::new(second.position.offset..second.position.offset + second.id.len());
        diagnostics.push(
            Diagnostic::new(
                ErrorCode::MissingArrow,
                format!("nodes `{}` and `{}` are not connected", first.id, second.id),
            )
            .with_location(second.position.line, second.position.column, span)
            .with_suggestion(format!(
                "connect them with an arrow, e.g. `{} --> {}`",
                first.id, second.id
            )),
        );
    }

    for element in elements {
        if let FlowElement::Subgraph(subgraph) = element {
            collect_missing_arrows(&subgraph.elements, tokens, diagnostics);
        }
    }
}

/// Is there a `;` between the two nodes?
fn separated(first: &Node, second: &Node, tokens: &[Token<'_>]) -> bool {
    let start = tokens.partition_point(|token| token.offset <= first.position.offset);
    tokens[start..]
        .iter()
        .take_while(|token| token.offset < second.position.offset)
        .any(|token| token.is(TokenKind::Semicolon))
}
