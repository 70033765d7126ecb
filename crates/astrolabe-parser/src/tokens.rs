//! Token definitions produced by the [`lexer`](super::lexer).

use std::fmt;

use astrolabe_core::{ast::Position, kind::DiagramKind};

use crate::span::Span;

/// The lexical class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Diagram headers, matched case-insensitively
    Flowchart,
    SequenceDiagram,
    ClassDiagram,
    StateDiagram,
    ErDiagram,
    Pie,
    Journey,
    Gantt,
    GitGraph,
    Mindmap,
    Timeline,
    XyChart,
    BlockBeta,

    /// `participant`
    Participant,

    // Delimiters
    LeftBracket,
    RightBracket,
    DoubleLeftBracket,
    DoubleRightBracket,
    LeftParen,
    RightParen,
    DoubleLeftParen,
    DoubleRightParen,
    LeftBrace,
    RightBrace,
    DoubleLeftBrace,
    DoubleRightBrace,
    Pipe,
    Colon,
    Comma,
    Semicolon,
    Equals,

    // Links and messages
    /// `-->`
    Arrow,
    /// `-->>`
    DashedAsyncArrow,
    /// `---`
    OpenLink,
    /// `-.->` or `-..->`
    DottedArrow,
    /// `==>`
    ThickArrow,
    /// `->`
    SequenceArrow,
    /// `->>`
    AsyncArrow,

    Identifier,
    /// A quoted string; the token text keeps its quotes.
    String,
    Number,
    /// `%%` to end of line
    Comment,
    /// `%%{ ... }%%`
    Directive,
    Eof,
}

impl TokenKind {
    /// Classify a word as a keyword. Header keywords ignore case.
    pub fn keyword(word: &str) -> Option<Self> {
        let kind = match word.to_ascii_lowercase().as_str() {
            "flowchart" | "graph" => TokenKind::Flowchart,
            "sequencediagram" => TokenKind::SequenceDiagram,
            "classdiagram" | "classdiagram-v2" => TokenKind::ClassDiagram,
            "statediagram" | "statediagram-v2" => TokenKind::StateDiagram,
            "erdiagram" => TokenKind::ErDiagram,
            "pie" => TokenKind::Pie,
            "journey" => TokenKind::Journey,
            "gantt" => TokenKind::Gantt,
            "gitgraph" => TokenKind::GitGraph,
            "mindmap" => TokenKind::Mindmap,
            "timeline" => TokenKind::Timeline,
            "xychart-beta" => TokenKind::XyChart,
            "block-beta" => TokenKind::BlockBeta,
            "participant" => TokenKind::Participant,
            _ => return None,
        };
        Some(kind)
    }

    /// The diagram type introduced by a header keyword.
    pub fn header_kind(&self) -> Option<DiagramKind> {
        let kind = match self {
            TokenKind::Flowchart => DiagramKind::Flowchart,
            TokenKind::SequenceDiagram => DiagramKind::Sequence,
            TokenKind::ClassDiagram => DiagramKind::Class,
            TokenKind::StateDiagram => DiagramKind::State,
            TokenKind::ErDiagram => DiagramKind::Er,
            TokenKind::Pie => DiagramKind::Pie,
            TokenKind::Journey => DiagramKind::Journey,
            TokenKind::Gantt => DiagramKind::Gantt,
            TokenKind::GitGraph => DiagramKind::GitGraph,
            TokenKind::Mindmap => DiagramKind::Mindmap,
            TokenKind::Timeline => DiagramKind::Timeline,
            TokenKind::XyChart => DiagramKind::XyChart,
            TokenKind::BlockBeta => DiagramKind::Block,
            _ => return None,
        };
        Some(kind)
    }

    /// Links accepted between flowchart nodes.
    pub fn is_flow_link(&self) -> bool {
        matches!(
            self,
            TokenKind::Arrow | TokenKind::OpenLink | TokenKind::DottedArrow | TokenKind::ThickArrow
        )
    }

    /// Arrows accepted between sequence participants.
    pub fn is_message_arrow(&self) -> bool {
        matches!(
            self,
            TokenKind::SequenceArrow
                | TokenKind::AsyncArrow
                | TokenKind::Arrow
                | TokenKind::DashedAsyncArrow
                | TokenKind::DottedArrow
                | TokenKind::ThickArrow
        )
    }

    /// Any arrow or link token.
    pub fn is_arrow(&self) -> bool {
        self.is_flow_link() || self.is_message_arrow()
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::DoubleLeftBracket => "'[['",
            TokenKind::DoubleRightBracket => "']]'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::DoubleLeftParen => "'(('",
            TokenKind::DoubleRightParen => "'))'",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::DoubleLeftBrace => "'{{'",
            TokenKind::DoubleRightBrace => "'}}'",
            TokenKind::Pipe => "'|'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Equals => "'='",
            TokenKind::Identifier => "identifier",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Comment => "comment",
            TokenKind::Directive => "directive",
            TokenKind::Eof => "end of input",
            TokenKind::Participant => "'participant'",
            kind if kind.is_arrow() => "arrow",
            _ => "diagram header",
        };
        f.write_str(name)
    }
}

/// A token with its source text and position.
///
/// `line` and `column` are 1-based (columns count codepoints); `offset` is the
/// byte offset of the first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str, line: usize, column: usize, offset: usize) -> Self {
        Self {
            kind,
            text,
            line,
            column,
            offset,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Byte span covered by the token text.
    pub fn span(&self) -> Span {
        Span::new(self.offset..self.offset + self.text.len())
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column, self.offset)
    }

    /// Line of the token's last character; differs from `line` for strings
    /// spanning lines.
    pub fn end_line(&self) -> usize {
        self.line + self.text.matches('\n').count()
    }

    /// The token's value: the inner text for strings, the raw text otherwise.
    pub fn value(&self) -> &'src str {
        if self.kind != TokenKind::String {
            return self.text;
        }
        let mut chars = self.text.chars();
        let Some(quote) = chars.next() else {
            return self.text;
        };
        let inner = &self.text[quote.len_utf8()..];
        inner.strip_suffix(quote).unwrap_or(inner)
    }

    /// Returns true for a string whose closing quote is missing.
    pub fn is_unterminated_string(&self) -> bool {
        if self.kind != TokenKind::String {
            return false;
        }
        let mut chars = self.text.chars();
        match (chars.next(), chars.next_back()) {
            (Some(open), Some(close)) => open != close,
            _ => true,
        }
    }

    /// Returns true for a directive missing its closing `}%%`.
    pub fn is_unterminated_directive(&self) -> bool {
        self.kind == TokenKind::Directive && !(self.text.len() >= 6 && self.text.ends_with("}%%"))
    }

    /// Tokens usable as a node id, participant name or block id.
    ///
    /// Keywords qualify; lone punctuation such as `&` or `+` does not.
    pub fn is_name(&self) -> bool {
        match self.kind {
            TokenKind::Number | TokenKind::Participant => true,
            TokenKind::Identifier => self
                .text
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_' || !c.is_ascii()),
            kind => kind.header_kind().is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, text: &str) -> Token<'_> {
        Token::new(kind, text, 1, 1, 0)
    }

    #[test]
    fn test_keyword_classification() {
        assert_eq!(TokenKind::keyword("graph"), Some(TokenKind::Flowchart));
        assert_eq!(TokenKind::keyword("SequenceDiagram"), Some(TokenKind::SequenceDiagram));
        assert_eq!(TokenKind::keyword("stateDiagram-v2"), Some(TokenKind::StateDiagram));
        assert_eq!(TokenKind::keyword("XYCHART-BETA"), Some(TokenKind::XyChart));
        assert_eq!(TokenKind::keyword("node"), None);
    }

    #[test]
    fn test_header_kind() {
        assert_eq!(TokenKind::BlockBeta.header_kind(), Some(DiagramKind::Block));
        assert_eq!(TokenKind::Participant.header_kind(), None);
        assert_eq!(TokenKind::Arrow.header_kind(), None);
    }

    #[test]
    fn test_string_value_strips_quotes() {
        assert_eq!(token(TokenKind::String, "\"hello world\"").value(), "hello world");
        assert_eq!(token(TokenKind::String, "'single'").value(), "single");
        assert_eq!(token(TokenKind::String, "\"open").value(), "open");
        assert_eq!(token(TokenKind::Identifier, "A").value(), "A");
    }

    #[test]
    fn test_unterminated_string() {
        assert!(!token(TokenKind::String, "\"done\"").is_unterminated_string());
        assert!(!token(TokenKind::String, "\"\"").is_unterminated_string());
        assert!(token(TokenKind::String, "\"open").is_unterminated_string());
        assert!(token(TokenKind::String, "\"").is_unterminated_string());
        assert!(token(TokenKind::String, "'mixed\"").is_unterminated_string());
    }

    #[test]
    fn test_unterminated_directive() {
        assert!(!token(TokenKind::Directive, "%%{init: {}}%%").is_unterminated_directive());
        assert!(token(TokenKind::Directive, "%%{init: {}").is_unterminated_directive());
    }

    #[test]
    fn test_is_name() {
        assert!(token(TokenKind::Identifier, "node_1").is_name());
        assert!(token(TokenKind::Identifier, "🙂").is_name());
        assert!(token(TokenKind::Number, "42").is_name());
        assert!(token(TokenKind::Pie, "pie").is_name());
        assert!(!token(TokenKind::Identifier, "&").is_name());
        assert!(!token(TokenKind::String, "\"A\"").is_name());
    }

    #[test]
    fn test_end_line_counts_embedded_newlines() {
        let t = Token::new(TokenKind::String, "\"a\nb\nc\"", 4, 1, 0);
        assert_eq!(t.end_line(), 6);
    }
}
