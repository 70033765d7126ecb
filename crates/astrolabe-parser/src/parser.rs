//! Parser for diagram source tokens.
//!
//! The parser walks the significant tokens produced by the
//! [`lexer`](super::lexer) with an index cursor. Every grammar reports
//! problems to the shared [`DiagnosticCollector`] and resynchronizes with
//! [`Parser::recover`] or by skipping to the end of the offending line, so a
//! single pass finds every independent error.
//!
//! The entry point is [`Parser::parse`]. It dispatches on the header keyword
//! of the first significant token and, when a flowchart hands control back at
//! a second header, keeps parsing the rest of the input as further diagrams.

mod block;
mod flowchart;
mod meta;
mod opaque;
mod sequence;
mod xychart;

#[cfg(test)]
pub(crate) use flowchart::MAX_SUBGRAPH_DEPTH;

use log::{debug, trace};

use astrolabe_core::{
    ast::{Diagram, DiagramBody},
    kind::DiagramKind,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    lexer,
    tokens::{Token, TokenKind},
};

/// Create a diagnostic located at `token`.
pub(crate) fn diagnostic_at(
    token: &Token<'_>,
    code: ErrorCode,
    message: impl Into<String>,
) -> Diagnostic {
    Diagnostic::new(code, message).with_location(token.line, token.column, token.span())
}

/// Describe a token for use in a message: its text, or "end of input".
fn describe(token: &Token<'_>) -> String {
    if token.is(TokenKind::Eof) {
        "end of input".to_string()
    } else {
        format!("`{}`", token.text)
    }
}

/// Cursor over the significant tokens of one source.
pub(crate) struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token<'src>>,
    eof: Token<'src>,
    pos: usize,
    /// Links seen so far in the current diagram; bounds `linkStyle` indices.
    link_count: usize,
    diagnostics: DiagnosticCollector,
}

impl<'src> Parser<'src> {
    /// Tokenize `source` and prepare the significant token stream.
    ///
    /// Comments and directives are dropped here. Comments sharing a line with
    /// an earlier token, unterminated strings and unterminated directives are
    /// reported as they are filtered.
    pub(crate) fn new(source: &'src str) -> Self {
        let all_tokens = lexer::tokenize(source);
        debug!(token_count = all_tokens.len(); "Tokenized source");

        let mut diagnostics = DiagnosticCollector::new();
        let mut tokens = Vec::with_capacity(all_tokens.len());
        let mut previous: Option<Token<'src>> = None;

        for token in &all_tokens {
            match token.kind {
                TokenKind::Comment => {
                    if previous.is_some_and(|prev| prev.end_line() == token.line) {
                        diagnostics.emit(
                            diagnostic_at(
                                token,
                                ErrorCode::InlineCommentNotSupported,
                                "comments must be on their own line",
                            )
                            .with_suggestion("move the `%%` comment to a separate line"),
                        );
                    }
                }
                TokenKind::Directive => {
                    if token.is_unterminated_directive() {
                        diagnostics.emit(
                            diagnostic_at(token, ErrorCode::ParseError, "unterminated directive")
                                .with_suggestion("close the directive with `}%%`"),
                        );
                    }
                }
                _ => {
                    if token.is_unterminated_string() {
                        diagnostics.emit(
                            diagnostic_at(token, ErrorCode::ParseError, "unterminated string")
                                .with_suggestion("add the closing quote"),
                        );
                    }
                    tokens.push(*token);
                }
            }
            previous = Some(*token);
        }

        let eof = tokens
            .last()
            .copied()
            .filter(|token| token.is(TokenKind::Eof))
            .unwrap_or_else(|| Token::new(TokenKind::Eof, "", 1, 1, source.len()));

        Self {
            source,
            tokens,
            eof,
            pos: 0,
            link_count: 0,
            diagnostics,
        }
    }

    /// Parse the whole input.
    ///
    /// Returns the first diagram and every diagnostic, sorted by position.
    pub(crate) fn parse(mut self) -> (Diagram, Vec<Diagnostic>) {
        let diagram = self.diagram();

        while !self.at_eof() {
            let before = self.pos;
            debug!(line = self.peek().line; "Parsing additional diagram in the same input");
            self.diagram();
            if self.pos == before {
                self.bump();
            }
        }

        (diagram, self.diagnostics.finish())
    }

    /// Dispatch on the header keyword and run the matching grammar.
    fn diagram(&mut self) -> Diagram {
        self.link_count = 0;
        let header = self.peek();

        let Some(kind) = header.kind.header_kind() else {
            let message = if header.is(TokenKind::Eof) {
                "missing diagram type header".to_string()
            } else {
                format!("unsupported diagram type {}", describe(&header))
            };
            self.emit(
                diagnostic_at(&header, ErrorCode::UnsupportedDiagramType, message)
                    .with_suggestion("start with a diagram header such as `flowchart TD` or `sequenceDiagram`"),
            );
            self.recover(&[]);
            return Diagram::new(DiagramKind::Unknown, header.position(), DiagramBody::Opaque {});
        };

        self.bump();
        debug!(kind = kind.as_str(), line = header.line; "Parsing diagram");

        let body = match kind {
            DiagramKind::Flowchart => DiagramBody::Flowchart(self.flowchart(&header)),
            DiagramKind::Sequence => DiagramBody::Sequence(self.sequence(&header)),
            DiagramKind::XyChart => DiagramBody::XyChart(self.xy_chart(&header)),
            DiagramKind::Block => DiagramBody::Block(self.block_diagram(&header)),
            DiagramKind::Class
            | DiagramKind::State
            | DiagramKind::Er
            | DiagramKind::Pie
            | DiagramKind::Journey
            | DiagramKind::Gantt
            | DiagramKind::GitGraph
            | DiagramKind::Mindmap
            | DiagramKind::Timeline
            | DiagramKind::Unknown => {
                self.opaque(kind, &header);
                DiagramBody::Opaque {}
            }
        };

        Diagram::new(kind, header.position(), body)
    }

    // -------------------------------------------------------------------------
    // Cursor
    // -------------------------------------------------------------------------

    fn peek(&self) -> Token<'src> {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Token<'src> {
        self.tokens.get(self.pos + n).copied().unwrap_or(self.eof)
    }

    /// Consume the current token. The cursor never moves past EOF.
    fn bump(&mut self) -> Token<'src> {
        let token = self.peek();
        if !token.is(TokenKind::Eof) {
            self.pos += 1;
        }
        token
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().is(kind)
    }

    fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token<'src>> {
        self.at(kind).then(|| self.bump())
    }

    fn previous(&self) -> Option<Token<'src>> {
        self.pos
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .copied()
    }

    /// Is the current token the first on its line?
    fn starts_line(&self) -> bool {
        self.previous()
            .is_none_or(|prev| prev.end_line() < self.peek().line)
    }

    /// Is the current token the first of a statement (line start or after `;`)?
    fn at_statement_start(&self) -> bool {
        self.starts_line()
            || self
                .previous()
                .is_some_and(|prev| prev.is(TokenKind::Semicolon))
    }

    /// Is the current token a non-EOF token starting on `line`?
    fn on_line(&self, line: usize) -> bool {
        let token = self.peek();
        !token.is(TokenKind::Eof) && token.line == line
    }

    /// Consume every remaining token that starts on `line`.
    fn skip_line(&mut self, line: usize) {
        while self.on_line(line) {
            self.bump();
        }
    }

    /// Consume and return every remaining token that starts on `line`.
    fn rest_of_line(&mut self, line: usize) -> Vec<Token<'src>> {
        let mut tokens = Vec::new();
        while self.on_line(line) {
            tokens.push(self.bump());
        }
        tokens
    }

    /// Skip tokens until one of `stop` (or EOF) is next. The stop token is not
    /// consumed.
    fn recover(&mut self, stop: &[TokenKind]) {
        let start = self.pos;
        while !self.at_eof() && !stop.contains(&self.peek().kind) {
            self.bump();
        }
        trace!(skipped = self.pos - start; "Recovered");
    }

    // -------------------------------------------------------------------------
    // Text
    // -------------------------------------------------------------------------

    /// Source text from the start of `first` to the end of `last`.
    fn text_between(&self, first: &Token<'src>, last: &Token<'_>) -> &'src str {
        let end = (last.offset + last.text.len()).max(first.offset);
        self.source.get(first.offset..end).unwrap_or(first.text)
    }

    /// The values of a run of tokens joined by single spaces. Strings
    /// contribute their unquoted value.
    fn label_text(&self, tokens: &[Token<'src>]) -> Option<String> {
        if tokens.is_empty() {
            return None;
        }
        let words: Vec<&str> = tokens.iter().map(Token::value).collect();
        Some(words.join(" "))
    }

    /// Number of tokens at the cursor that spell one name.
    ///
    /// The lexer splits non-ASCII text into one token per codepoint, so
    /// `Café` arrives as `Caf` and `é`. Name tokens that touch with no
    /// whitespace between them belong together.
    fn name_len(&self) -> usize {
        let first = self.peek();
        if !first.is_name() {
            return 0;
        }

        let mut len = 1;
        let mut end = first.offset + first.text.len();
        loop {
            let next = self.peek_nth(len);
            if !next.is_name() || next.offset != end {
                return len;
            }
            end = next.offset + next.text.len();
            len += 1;
        }
    }

    /// The token at the cursor, widened over any touching name tokens.
    fn peek_name(&self) -> Token<'src> {
        let first = self.peek();
        let len = self.name_len();
        if len <= 1 {
            return first;
        }
        let last = self.peek_nth(len - 1);
        Token {
            text: self.text_between(&first, &last),
            ..first
        }
    }

    /// Consume the token at the cursor together with any touching name
    /// tokens and return them as one token.
    fn bump_name(&mut self) -> Token<'src> {
        let name = self.peek_name();
        for _ in 0..self.name_len().max(1) {
            self.bump();
        }
        name
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        trace!(code = diagnostic.code().as_str(), line = diagnostic.line(); "Diagnostic");
        self.diagnostics.emit(diagnostic);
    }

    /// Parse `open label closer` where the cursor is on `open`.
    ///
    /// The label ends at `closer`, at the end of the line, or at a link. When
    /// the closer is missing a PARSE_ERROR is reported at the token found
    /// instead and the cursor skips to the closer or to any kind in `stop`.
    fn delimited_label(
        &mut self,
        owner: &Token<'src>,
        closer: TokenKind,
        stop: &[TokenKind],
    ) -> Option<String> {
        let open = self.bump();
        let mut words = Vec::new();

        loop {
            let token = self.peek();
            if token.is(closer) {
                self.bump();
                return Some(self.label_text(&words).unwrap_or_default());
            }
            let ends_label = token.is(TokenKind::Eof)
                || token.line != open.end_line()
                || token.kind.is_arrow()
                || matches!(token.kind, TokenKind::Pipe | TokenKind::Semicolon);
            if ends_label {
                break;
            }
            words.push(self.bump());
        }

        let found = self.peek();
        self.emit(
            diagnostic_at(
                &found,
                ErrorCode::ParseError,
                format!(
                    "expected {closer} to close `{}`, found {}",
                    owner.text,
                    describe(&found)
                ),
            )
            .with_suggestion(format!("add {closer}")),
        );

        let mut stop_set = stop.to_vec();
        stop_set.push(closer);
        self.recover(&stop_set);
        self.eat(closer);

        self.label_text(&words)
    }
}
