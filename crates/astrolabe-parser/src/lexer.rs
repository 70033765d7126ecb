//! Lexical analyzer for diagram source text.
//!
//! The lexer converts source text into a stream of [`Token`]s. It is total:
//! every input, however malformed, produces a token list ending in exactly one
//! [`TokenKind::Eof`]. Characters that match no rule become single-character
//! identifiers, and unterminated strings or directives run to the end of the
//! input; the parser decides what is an error.
//!
//! Whitespace and newlines are not tokens. Each token records its 1-based
//! line and column, which the lexer tracks as it skips over them.

use winnow::{
    Parser as _,
    ascii::digit1,
    combinator::{alt, not, opt, peek, preceded, terminated},
    error::ModalResult,
    stream::{LocatingSlice, Location, Stream},
    token::{any, literal, one_of, take_till, take_while},
};

use crate::tokens::{Token, TokenKind};

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O>;

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a directive `%%{ ... }%%`.
///
/// Braces nest, so embedded configuration objects do not end the directive
/// early. Without a closing `}%%` the directive runs to the end of input.
fn directive(input: &mut Input<'_>) -> IResult<TokenKind> {
    preceded(literal("%%{"), directive_body)
        .value(TokenKind::Directive)
        .parse_next(input)
}

/// Scan a directive body up to and including the `}%%` that closes it.
fn directive_body(input: &mut Input<'_>) -> IResult<()> {
    let mut depth = 1usize;
    while let Some(c) = input.next_token() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let checkpoint = input.checkpoint();
                    if input.next_token() == Some('%') && input.next_token() == Some('%') {
                        break;
                    }
                    input.reset(&checkpoint);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Parse a line comment starting with `%%`
fn comment(input: &mut Input<'_>) -> IResult<TokenKind> {
    preceded("%%", take_till(0.., '\n'))
        .value(TokenKind::Comment)
        .parse_next(input)
}

/// Parse a single- or double-quoted string, which may span lines.
///
/// A missing closing quote consumes the rest of the input.
fn string_literal(input: &mut Input<'_>) -> IResult<TokenKind> {
    one_of(['"', '\''])
        .flat_map(|quote| (take_till(0.., quote), opt(quote)))
        .value(TokenKind::String)
        .parse_next(input)
}

/// Parse links and message arrows (order matters - longest first)
///
/// `==>>` is deliberately not an arrow: `==>` must not be followed by `>`,
/// which leaves the input to the `=` delimiter.
fn arrow(input: &mut Input<'_>) -> IResult<TokenKind> {
    alt((
        alt((literal("-..->"), literal("-.->"))).value(TokenKind::DottedArrow),
        literal("-->>").value(TokenKind::DashedAsyncArrow),
        literal("-->").value(TokenKind::Arrow),
        literal("---").value(TokenKind::OpenLink),
        literal("->>").value(TokenKind::AsyncArrow),
        literal("->").value(TokenKind::SequenceArrow),
        terminated(literal("==>"), not('>')).value(TokenKind::ThickArrow),
    ))
    .parse_next(input)
}

/// Parse a number, ensuring it is not the prefix of an identifier like `1st`.
fn number(input: &mut Input<'_>) -> IResult<TokenKind> {
    terminated(
        (opt('-'), digit1, opt(('.', digit1))),
        peek(not(one_of(|c: char| c.is_alphanumeric() || c == '_'))),
    )
    .value(TokenKind::Number)
    .parse_next(input)
}

/// Parse delimiters (doubled forms before single ones)
fn delimiter(input: &mut Input<'_>) -> IResult<TokenKind> {
    alt((
        alt((
            literal("((").value(TokenKind::DoubleLeftParen),
            literal("))").value(TokenKind::DoubleRightParen),
            literal("[[").value(TokenKind::DoubleLeftBracket),
            literal("]]").value(TokenKind::DoubleRightBracket),
            literal("{{").value(TokenKind::DoubleLeftBrace),
            literal("}}").value(TokenKind::DoubleRightBrace),
        )),
        alt((
            '('.value(TokenKind::LeftParen),
            ')'.value(TokenKind::RightParen),
            '['.value(TokenKind::LeftBracket),
            ']'.value(TokenKind::RightBracket),
            '{'.value(TokenKind::LeftBrace),
            '}'.value(TokenKind::RightBrace),
        )),
        alt((
            '|'.value(TokenKind::Pipe),
            ':'.value(TokenKind::Colon),
            ','.value(TokenKind::Comma),
            ';'.value(TokenKind::Semicolon),
            '='.value(TokenKind::Equals),
        )),
    ))
    .parse_next(input)
}

/// Parse an identifier.
///
/// Identifiers may contain hyphens (`x-axis`, `stateDiagram-v2`), but a hyphen
/// that starts an arrow (`->`, `--`, `-.`) ends the identifier so that
/// `A-->B` splits into `A`, `-->` and `B`.
fn identifier(input: &mut Input<'_>) -> IResult<TokenKind> {
    preceded(one_of(is_word_char), identifier_tail)
        .value(TokenKind::Identifier)
        .parse_next(input)
}

fn identifier_tail(input: &mut Input<'_>) -> IResult<()> {
    loop {
        let checkpoint = input.checkpoint();
        let current = input.next_token();
        let following = input.next_token();
        input.reset(&checkpoint);

        match (current, following) {
            (Some('-'), Some('>' | '-' | '.')) => break,
            (Some(c), _) if is_word_char(c) || c == '-' => {
                input.next_token();
            }
            _ => break,
        }
    }
    Ok(())
}

/// Any other codepoint becomes a one-character identifier.
fn unknown_char(input: &mut Input<'_>) -> IResult<TokenKind> {
    any.value(TokenKind::Identifier).parse_next(input)
}

/// Parse whitespace, newlines included.
fn whitespace(input: &mut Input<'_>) -> IResult<()> {
    take_while(1.., char::is_whitespace).void().parse_next(input)
}

/// Parse a single token kind
fn token_kind(input: &mut Input<'_>) -> IResult<TokenKind> {
    alt((
        directive,      // Must come before comment
        comment,        // Must come before any single char
        string_literal, // Must come before any single char
        arrow,          // Must come before number and delimiter
        number,         // Must come before identifier
        delimiter,      // Single and doubled delimiters
        identifier,     // Must come before unknown_char
        unknown_char,   // Fallback, always succeeds on non-empty input
    ))
    .parse_next(input)
}

/// Lexer that accumulates tokens and tracks line/column positions.
struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    line: usize,
    line_start: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer.
    fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            line: 1,
            line_start: 0,
        }
    }

    /// Tokenize the input, skipping whitespace between tokens.
    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            let start = input.current_token_start();
            let checkpoint = input.checkpoint();
            if whitespace(&mut input).is_ok() {
                self.advance(start, input.current_token_start());
                continue;
            }
            input.reset(&checkpoint);

            let kind = match token_kind(&mut input) {
                Ok(kind) => kind,
                Err(_) => {
                    input.reset(&checkpoint);
                    input.next_token();
                    TokenKind::Identifier
                }
            };
            let end = input.current_token_start();
            self.push(kind, start, end);
        }

        let end = self.source.len();
        self.push(TokenKind::Eof, end, end);
    }

    /// Record a token spanning `start..end` and move past it.
    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        let text = &self.source[start..end];
        let kind = match kind {
            TokenKind::Identifier => TokenKind::keyword(text).unwrap_or(kind),
            kind => kind,
        };
        let column = self.source[self.line_start..start].chars().count() + 1;
        self.tokens
            .push(Token::new(kind, text, self.line, column, start));
        self.advance(start, end);
    }

    /// Update line tracking for the consumed text `start..end`.
    fn advance(&mut self, start: usize, end: usize) {
        for (index, c) in self.source[start..end].char_indices() {
            if c == '\n' {
                self.line += 1;
                self.line_start = start + index + 1;
            }
        }
    }

    fn finish(self) -> Vec<Token<'a>> {
        self.tokens
    }
}

/// Tokenize a source string.
///
/// Never fails: the returned list always ends with a single
/// [`TokenKind::Eof`] token positioned at the end of the input.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut lexer = Lexer::new(source);
    lexer.tokenize(LocatingSlice::new(source));
    lexer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).iter().map(|token| token.kind).collect()
    }

    fn test_single_token(input: &str, expected: TokenKind) {
        let tokens = tokenize(input);
        assert_eq!(tokens.len(), 2, "expected one token for {input:?}: {tokens:?}");
        assert_eq!(tokens[0].kind, expected, "wrong kind for {input:?}");
        assert_eq!(tokens[0].text, input);
    }

    #[test]
    fn test_headers_ignore_case() {
        test_single_token("flowchart", TokenKind::Flowchart);
        test_single_token("GRAPH", TokenKind::Flowchart);
        test_single_token("sequenceDiagram", TokenKind::SequenceDiagram);
        test_single_token("classDiagram-v2", TokenKind::ClassDiagram);
        test_single_token("stateDiagram-v2", TokenKind::StateDiagram);
        test_single_token("erDiagram", TokenKind::ErDiagram);
        test_single_token("gitGraph", TokenKind::GitGraph);
        test_single_token("xychart-beta", TokenKind::XyChart);
        test_single_token("block-beta", TokenKind::BlockBeta);
        test_single_token("participant", TokenKind::Participant);
    }

    #[test]
    fn test_arrows() {
        test_single_token("-->", TokenKind::Arrow);
        test_single_token("-->>", TokenKind::DashedAsyncArrow);
        test_single_token("---", TokenKind::OpenLink);
        test_single_token("-.->", TokenKind::DottedArrow);
        test_single_token("-..->", TokenKind::DottedArrow);
        test_single_token("==>", TokenKind::ThickArrow);
        test_single_token("->", TokenKind::SequenceArrow);
        test_single_token("->>", TokenKind::AsyncArrow);
    }

    #[test]
    fn test_quadruple_thick_arrow_is_not_an_arrow() {
        let tokens = kinds("==>>");
        assert_eq!(tokens[0], TokenKind::Equals);
        assert!(!tokens.contains(&TokenKind::ThickArrow));
    }

    #[test]
    fn test_delimiters() {
        test_single_token("[[", TokenKind::DoubleLeftBracket);
        test_single_token("]]", TokenKind::DoubleRightBracket);
        test_single_token("((", TokenKind::DoubleLeftParen);
        test_single_token("}}", TokenKind::DoubleRightBrace);
        test_single_token("|", TokenKind::Pipe);
        test_single_token(";", TokenKind::Semicolon);
        test_single_token("=", TokenKind::Equals);
    }

    #[test]
    fn test_numbers() {
        test_single_token("42", TokenKind::Number);
        test_single_token("-7", TokenKind::Number);
        test_single_token("3.25", TokenKind::Number);
        test_single_token("1st", TokenKind::Identifier);
    }

    #[test]
    fn test_identifier_stops_before_arrow() {
        let tokens = tokenize("A-->B");
        let texts: Vec<_> = tokens.iter().map(|token| token.text).collect();
        assert_eq!(texts, vec!["A", "-->", "B", ""]);

        let tokens = tokenize("Alice->>Bob");
        let texts: Vec<_> = tokens.iter().map(|token| token.text).collect();
        assert_eq!(texts, vec!["Alice", "->>", "Bob", ""]);
    }

    #[test]
    fn test_identifier_keeps_inner_hyphens() {
        test_single_token("x-axis", TokenKind::Identifier);
        test_single_token("my-node_2", TokenKind::Identifier);
    }

    #[test]
    fn test_unknown_characters_are_single_identifiers() {
        let tokens = tokenize("&🙂");
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].text, "&");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "🙂");
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    }

    #[test]
    fn test_strings() {
        test_single_token("\"hello world\"", TokenKind::String);
        test_single_token("'single'", TokenKind::String);

        let tokens = tokenize("\"spans\nlines\" A");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[1].text, "A");
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        let tokens = tokenize("A[\"open\nB");
        assert_eq!(tokens[2].kind, TokenKind::String);
        assert_eq!(tokens[2].text, "\"open\nB");
        assert!(tokens[2].is_unterminated_string());
        assert_eq!(tokens[3].kind, TokenKind::Eof);
    }

    #[test]
    fn test_comments() {
        let tokens = tokenize("%% a comment\nA");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text, "%% a comment");
        assert_eq!(tokens[1].text, "A");
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_directive_with_nested_braces() {
        let source = "%%{init: {\"theme\": {\"x\": 1}}}%%\nflowchart";
        let tokens = tokenize(source);
        assert_eq!(tokens[0].kind, TokenKind::Directive);
        assert_eq!(tokens[0].text, "%%{init: {\"theme\": {\"x\": 1}}}%%");
        assert!(!tokens[0].is_unterminated_directive());
        assert_eq!(tokens[1].kind, TokenKind::Flowchart);
    }

    #[test]
    fn test_unterminated_directive_runs_to_end() {
        let tokens = tokenize("%%{init: {}\nflowchart TD");
        assert_eq!(tokens.len(), 2);
        assert!(tokens[0].is_unterminated_directive());
    }

    #[test]
    fn test_line_and_column_tracking() {
        let tokens = tokenize("flowchart TD\n  A --> B");
        let positions: Vec<_> = tokens
            .iter()
            .map(|token| (token.text, token.line, token.column, token.offset))
            .collect();
        assert_eq!(
            positions,
            vec![
                ("flowchart", 1, 1, 0),
                ("TD", 1, 11, 10),
                ("A", 2, 3, 15),
                ("-->", 2, 5, 17),
                ("B", 2, 9, 21),
                ("", 2, 10, 22),
            ]
        );
    }

    #[test]
    fn test_columns_count_codepoints() {
        let tokens = tokenize("é A");
        assert_eq!(tokens[1].text, "A");
        assert_eq!(tokens[1].column, 3);
        assert_eq!(tokens[1].offset, 3);
    }

    #[test]
    fn test_empty_input_has_single_eof() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// Tokenizing never fails and always ends with exactly one EOF token.
    fn check_single_trailing_eof(source: &str) -> Result<(), TestCaseError> {
        let tokens = tokenize(source);
        let eof_count = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        prop_assert_eq!(eof_count, 1);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        Ok(())
    }

    /// Token texts appear in the source at their recorded offsets, in order.
    fn check_offsets_match_source(source: &str) -> Result<(), TestCaseError> {
        let mut previous_end = 0;
        for token in tokenize(source) {
            prop_assert!(token.offset >= previous_end);
            prop_assert_eq!(&source[token.offset..token.offset + token.text.len()], token.text);
            previous_end = token.offset + token.text.len();
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn single_trailing_eof(source in "\\PC*") {
            check_single_trailing_eof(&source)?;
        }

        #[test]
        fn offsets_match_source(source in "[ -~\\n\\t]{0,80}") {
            check_offsets_match_source(&source)?;
        }
    }
}
