//! Sequence-diagram grammar.
//!
//! Statements are line based: participant declarations, messages, and block
//! keywords (`loop`, `alt`, `end`, ...) whose structure is not modeled.
//! Participants need not be declared; the first mention in a message is
//! enough.

use indexmap::IndexSet;
use log::trace;

use astrolabe_core::{
    ast::{ArrowType, Message, Participant, Sequence},
    kind::DiagramKind,
};

use super::{Parser, describe, diagnostic_at};
use crate::{
    error::ErrorCode,
    tokens::{Token, TokenKind},
};

/// Keywords that open, close or decorate blocks. Matched case-insensitively;
/// their lines are accepted without further checks.
const BLOCK_KEYWORDS: &[&str] = &[
    "loop",
    "alt",
    "else",
    "opt",
    "par",
    "and",
    "critical",
    "break",
    "rect",
    "end",
    "box",
    "activate",
    "deactivate",
    "autonumber",
    "create",
    "destroy",
    "links",
    "link",
    "properties",
    "details",
];

fn is_block_keyword(token: &Token<'_>) -> bool {
    if !token.is(TokenKind::Identifier) {
        return false;
    }
    // Only the capitalized spelling of `Note` is a sequence note here; the
    // lowercase keyword is a flowchart-only meta statement.
    token.text == "Note"
        || BLOCK_KEYWORDS
            .iter()
            .any(|keyword| token.text.eq_ignore_ascii_case(keyword))
}

fn is_participant_name(token: &Token<'_>) -> bool {
    token.is_name() || token.is(TokenKind::String)
}

fn arrow_type(arrow: TokenKind) -> ArrowType {
    match arrow {
        TokenKind::ThickArrow => ArrowType::Thick,
        TokenKind::Arrow | TokenKind::DashedAsyncArrow | TokenKind::DottedArrow => {
            ArrowType::Dotted
        }
        _ => ArrowType::Solid,
    }
}

impl<'src> Parser<'src> {
    /// Parse a sequence diagram after its header keyword.
    pub(super) fn sequence(&mut self, header: &Token<'src>) -> Sequence {
        trace!(line = header.line; "Parsing sequence diagram");
        self.skip_line(header.line);

        let mut sequence = Sequence::default();
        let mut mentioned: IndexSet<String> = IndexSet::new();

        while !self.at_eof() {
            let token = self.peek();

            if let Some(statement) = self.peek_meta_statement() {
                self.meta_statement(DiagramKind::Sequence, statement);
                continue;
            }

            let declares = token.is(TokenKind::Participant)
                || (token.is(TokenKind::Identifier) && token.text == "actor");

            if token.is(TokenKind::Semicolon) {
                self.bump();
            } else if declares {
                if let Some(participant) = self.participant() {
                    mentioned.insert(participant.name.clone());
                    sequence.participants.push(participant);
                }
            } else if is_participant_name(&token) && self.at_message() {
                if let Some(message) = self.message() {
                    mentioned.insert(message.from.clone());
                    mentioned.insert(message.to.clone());
                    sequence.messages.push(message);
                }
            } else if token.kind.is_message_arrow() {
                self.emit(
                    diagnostic_at(&token, ErrorCode::IncompleteMessage, "message has no sender")
                        .with_suggestion("write messages as `A->>B: text`"),
                );
                self.skip_line(token.line);
            } else if is_block_keyword(&token) {
                self.skip_line(token.line);
            } else {
                self.emit(
                    diagnostic_at(
                        &token,
                        ErrorCode::ParseError,
                        format!("unexpected {} in sequence diagram", describe(&token)),
                    )
                    .with_suggestion("expected a participant declaration or a message like `A->>B: text`"),
                );
                self.skip_line(token.line);
            }
        }

        // First use declares a participant; keep declarations first, then
        // the implicit ones in order of appearance.
        let declared: IndexSet<&str> = sequence
            .participants
            .iter()
            .map(|participant| participant.name.as_str())
            .collect();
        let implicit: Vec<Participant> = mentioned
            .iter()
            .filter(|name| !declared.contains(name.as_str()))
            .map(|name| Participant {
                name: name.clone(),
                alias: None,
            })
            .collect();

        trace!(declared = declared.len(), implicit = implicit.len(); "Sequence participants");
        sequence.participants.extend(implicit);
        sequence
    }

    /// Is the cursor on a sender name directly followed by a message arrow
    /// on the same line?
    fn at_message(&self) -> bool {
        let sender = self.peek_name();
        let arrow = self.peek_nth(self.name_len().max(1));
        arrow.kind.is_message_arrow() && arrow.line == sender.end_line()
    }

    /// `participant name [as alias]` or `actor name [as alias]`
    fn participant(&mut self) -> Option<Participant> {
        let keyword = self.bump();
        let name = self.peek();

        if !self.on_line(keyword.line) || !is_participant_name(&name) {
            self.emit(
                diagnostic_at(
                    &keyword,
                    ErrorCode::MissingParticipantName,
                    format!("`{}` needs a name", keyword.text),
                )
                .with_suggestion(format!("write `{} Alice`", keyword.text)),
            );
            self.skip_line(keyword.line);
            return None;
        }
        let name = self.bump_name();

        let mut alias = None;
        let next = self.peek();
        if self.on_line(keyword.line) && next.is(TokenKind::Identifier) && next.text == "as" {
            self.bump();
            let words = self.rest_of_line(keyword.line);
            alias = self.label_text(&words);
            if alias.is_none() {
                self.emit(
                    diagnostic_at(&next, ErrorCode::ParseError, "expected an alias after `as`")
                        .with_suggestion(format!("write `{} {} as Display Name`", keyword.text, name.value())),
                );
            }
        }
        self.skip_line(keyword.line);

        Some(Participant {
            name: name.value().to_string(),
            alias,
        })
    }

    /// `from arrow [+|-] to [: text]`
    fn message(&mut self) -> Option<Message> {
        let from = self.bump_name();
        let arrow = self.bump();
        let line = arrow.line;

        let marker = self.peek();
        if self.on_line(line)
            && marker.is(TokenKind::Identifier)
            && matches!(marker.text, "+" | "-")
        {
            self.bump();
        }

        let to = self.peek();
        if !self.on_line(line) || !is_participant_name(&to) {
            self.emit(
                diagnostic_at(&arrow, ErrorCode::IncompleteMessage, "message has no receiver")
                    .with_suggestion(format!("name the receiver, e.g. `{}{}B: text`", from.value(), arrow.text)),
            );
            self.skip_line(line);
            return None;
        }
        let to = self.bump_name();

        if self.on_line(line) {
            self.eat(TokenKind::Colon);
        }
        let words = self.rest_of_line(line);

        Some(Message {
            from: from.value().to_string(),
            to: to.value().to_string(),
            message: self.label_text(&words).unwrap_or_default(),
            arrow_type: arrow_type(arrow.kind),
        })
    }
}
