//! Tokenizer for expression source text
//!
//! Produces zero-copy tokens over the input:
//! - Greedy operator matching (`>=` before `>`, `??`, `<>`)
//! - Numeric literals with adjacent unit suffixes (`12pt`, `50%`)
//! - Quoted strings with `'` or `"` and backslash escapes
//! - CSS custom-property names (`--primary-color`) and `#rrggbb` colors
//! - Keyword lookup for word operators and constants

use super::error::{ParseError, ParseResult};
use super::span::Spanned;
use crate::model::UnitKind;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use unicode_xid::UnicodeXID;

/// Sub-kind of a literal token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    /// Integer or decimal number, including `0x`/`0b` forms
    Number,
    /// Number with a unit suffix
    Unit,
    /// Quoted string; the token text keeps its quotes
    String,
    /// `#rgb` or `#rrggbb`
    Color,
    /// `true` / `false`
    Boolean,
    /// `null`
    Null,
}

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Operator symbol or word operator
    Operator,
    /// Function or variable name
    Identifier,
    /// Literal value
    Literal(LiteralKind),
    /// `(`, `)` or `,`
    Punctuation,
}

/// A lexical unit, borrowing its text from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'input> {
    pub kind: TokenKind,
    pub text: &'input str,
}

impl<'input> Token<'input> {
    pub fn new(kind: TokenKind, text: &'input str) -> Self {
        Self { kind, text }
    }

    pub fn is_operator(&self) -> bool {
        self.kind == TokenKind::Operator
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, TokenKind::Literal(_))
    }

    pub fn is_open_paren(&self) -> bool {
        self.kind == TokenKind::Punctuation && self.text == "("
    }

    pub fn is_close_paren(&self) -> bool {
        self.kind == TokenKind::Punctuation && self.text == ")"
    }

    pub fn is_comma(&self) -> bool {
        self.kind == TokenKind::Punctuation && self.text == ","
    }

    /// Whether an operand can end with this token
    ///
    /// An operator following such a token is in binary position.
    pub fn ends_operand(&self) -> bool {
        match self.kind {
            TokenKind::Literal(_) | TokenKind::Identifier => true,
            TokenKind::Punctuation => self.text == ")",
            TokenKind::Operator => false,
        }
    }
}

/// Token with its byte span in the source
pub type SpannedToken<'input> = Spanned<Token<'input>>;

/// Symbol operators, longest first so matching is greedy
const SYMBOL_OPERATORS: [&str; 22] = [
    "??", "<<", ">>", "<=", ">=", "<>", "!=", "==", "&&", "||", "+", "-", "*", "/", "%", "^",
    "&", "|", "<", ">", "=", "!",
];

/// Word operators and constants
static KEYWORD_TABLE: Lazy<FxHashMap<&'static str, TokenKind>> = Lazy::new(|| {
    let mut map = FxHashMap::default();
    map.insert("and", TokenKind::Operator);
    map.insert("or", TokenKind::Operator);
    map.insert("not", TokenKind::Operator);
    map.insert("true", TokenKind::Literal(LiteralKind::Boolean));
    map.insert("TRUE", TokenKind::Literal(LiteralKind::Boolean));
    map.insert("false", TokenKind::Literal(LiteralKind::Boolean));
    map.insert("FALSE", TokenKind::Literal(LiteralKind::Boolean));
    map.insert("null", TokenKind::Literal(LiteralKind::Null));
    map.insert("NULL", TokenKind::Literal(LiteralKind::Null));
    map
});

/// Tokenizer state over a single source string
pub struct Tokenizer<'input> {
    input: &'input str,
    bytes: &'input [u8],
    pos: usize,
    end: usize,
    /// Match keywords regardless of case
    ignore_case: bool,
    /// Whether the last emitted token opens an argument slot (`(` or `,`)
    at_argument_start: bool,
}

impl<'input> Tokenizer<'input> {
    pub fn new(input: &'input str) -> Self {
        Self::with_ignore_case(input, false)
    }

    /// Create a tokenizer that matches keywords case-insensitively
    pub fn with_ignore_case(input: &'input str, ignore_case: bool) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            end: input.len(),
            ignore_case,
            at_argument_start: false,
        }
    }

    #[inline]
    fn slice(&self, start: usize, end: usize) -> &'input str {
        &self.input[start..end]
    }

    #[inline]
    fn peek_char(&self, at: usize) -> Option<char> {
        self.input.get(at..).and_then(|rest| rest.chars().next())
    }

    fn is_id_start(ch: char) -> bool {
        ch == '_' || ch == '$' || UnicodeXID::is_xid_start(ch)
    }

    fn is_id_continue(ch: char) -> bool {
        ch == '_' || UnicodeXID::is_xid_continue(ch)
    }

    fn keyword_lookup(&self, word: &str) -> Option<TokenKind> {
        if self.ignore_case {
            KEYWORD_TABLE.get(word.to_lowercase().as_str()).copied()
        } else {
            KEYWORD_TABLE.get(word).copied()
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char(self.pos) {
            if !ch.is_whitespace() {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn scan_identifier(&mut self, start: usize) -> &'input str {
        while let Some(ch) = self.peek_char(self.pos) {
            if !Self::is_id_continue(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        self.slice(start, self.pos)
    }

    /// `--name` custom-property identifier; hyphens are allowed after the prefix
    fn scan_custom_property(&mut self, start: usize) -> &'input str {
        self.pos += 2;
        while let Some(ch) = self.peek_char(self.pos) {
            if !(Self::is_id_continue(ch) || ch == '-') {
                break;
            }
            self.pos += ch.len_utf8();
        }
        self.slice(start, self.pos)
    }

    fn starts_custom_property(&self) -> bool {
        self.at_argument_start
            && self.bytes.get(self.pos + 1) == Some(&b'-')
            && self
                .peek_char(self.pos + 2)
                .is_some_and(|ch| ch.is_alphabetic() || ch == '_')
    }

    fn scan_string(&mut self, quote: u8) -> ParseResult<&'input str> {
        let start = self.pos;
        self.pos += 1;
        while self.pos < self.end {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 2,
                b if b == quote => {
                    self.pos += 1;
                    return Ok(self.slice(start, self.pos));
                }
                _ => self.pos += 1,
            }
        }
        Err(ParseError::UnclosedString { position: start })
    }

    fn scan_color(&mut self) -> ParseResult<&'input str> {
        let start = self.pos;
        self.pos += 1;
        while self.pos < self.end && self.bytes[self.pos].is_ascii_hexdigit() {
            self.pos += 1;
        }
        let text = self.slice(start, self.pos);
        let trailing_ident = self.peek_char(self.pos).is_some_and(Self::is_id_continue);
        if matches!(text.len(), 4 | 7) && !trailing_ident {
            Ok(text)
        } else {
            Err(ParseError::InvalidLiteral {
                literal_type: Cow::Borrowed("color"),
                value: text.to_string(),
                position: start,
            })
        }
    }

    /// Whether the next non-whitespace character after `at` could begin an operand
    fn operand_follows(&self, at: usize) -> bool {
        self.input[at..]
            .chars()
            .find(|ch| !ch.is_whitespace())
            .is_some_and(|ch| {
                Self::is_id_start(ch)
                    || ch.is_ascii_digit()
                    || matches!(ch, '(' | '\'' | '"' | '#' | '.')
            })
    }

    fn scan_number(&mut self) -> ParseResult<(LiteralKind, &'input str)> {
        let start = self.pos;

        // Radix literals
        if self.bytes[self.pos] == b'0' {
            let radix = match self.bytes.get(self.pos + 1) {
                Some(b'x' | b'X') => Some(16),
                Some(b'b' | b'B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                let digits_start = self.pos + 2;
                let mut cursor = digits_start;
                while cursor < self.end && (self.bytes[cursor] as char).is_digit(radix) {
                    cursor += 1;
                }
                if cursor > digits_start {
                    self.pos = cursor;
                    if self.peek_char(self.pos).is_some_and(Self::is_id_continue) {
                        return Err(self.invalid_number(start));
                    }
                    return Ok((LiteralKind::Number, self.slice(start, self.pos)));
                }
            }
        }

        while self.pos < self.end && self.bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        let has_fraction = self.pos + 1 < self.end
            && self.bytes[self.pos] == b'.'
            && self.bytes[self.pos + 1].is_ascii_digit();
        if has_fraction {
            self.pos += 1;
            while self.pos < self.end && self.bytes[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
        }

        if self.pos < self.end && self.bytes[self.pos] == b'%' {
            if !self.operand_follows(self.pos + 1) {
                self.pos += 1;
                return Ok((LiteralKind::Unit, self.slice(start, self.pos)));
            }
            return Ok((LiteralKind::Number, self.slice(start, self.pos)));
        }

        if let Some(kind) = UnitKind::match_prefix(&self.input[self.pos..]) {
            let suffix_end = self.pos + kind.suffix().len();
            let detached = !self.peek_char(suffix_end).is_some_and(Self::is_id_continue);
            if kind != UnitKind::Percent && detached {
                self.pos = suffix_end;
                return Ok((LiteralKind::Unit, self.slice(start, self.pos)));
            }
        }

        if self.peek_char(self.pos).is_some_and(Self::is_id_continue) {
            return Err(self.invalid_number(start));
        }
        Ok((LiteralKind::Number, self.slice(start, self.pos)))
    }

    fn invalid_number(&mut self, start: usize) -> ParseError {
        while let Some(ch) = self.peek_char(self.pos) {
            if !(Self::is_id_continue(ch) || ch == '.') {
                break;
            }
            self.pos += ch.len_utf8();
        }
        ParseError::InvalidLiteral {
            literal_type: Cow::Borrowed("number"),
            value: self.slice(start, self.pos).to_string(),
            position: start,
        }
    }

    fn match_symbol_operator(&self) -> Option<&'static str> {
        let rest = &self.input[self.pos..];
        SYMBOL_OPERATORS.iter().copied().find(|op| rest.starts_with(op))
    }

    /// Produce the next token, or `None` at end of input
    pub fn next_token(&mut self) -> ParseResult<Option<SpannedToken<'input>>> {
        self.skip_whitespace();

        if self.pos >= self.end {
            return Ok(None);
        }

        let start = self.pos;
        let token = match self.bytes[self.pos] {
            b'(' | b')' | b',' => {
                self.pos += 1;
                Token::new(TokenKind::Punctuation, self.slice(start, self.pos))
            }
            quote @ (b'\'' | b'"') => {
                let text = self.scan_string(quote)?;
                Token::new(TokenKind::Literal(LiteralKind::String), text)
            }
            b'#' => Token::new(TokenKind::Literal(LiteralKind::Color), self.scan_color()?),
            b'0'..=b'9' => {
                let (kind, text) = self.scan_number()?;
                Token::new(TokenKind::Literal(kind), text)
            }
            b'.' if self.bytes.get(self.pos + 1).is_some_and(u8::is_ascii_digit) => {
                let (kind, text) = self.scan_number()?;
                Token::new(TokenKind::Literal(kind), text)
            }
            b'-' if self.starts_custom_property() => {
                Token::new(TokenKind::Identifier, self.scan_custom_property(start))
            }
            _ => {
                if let Some(op) = self.match_symbol_operator() {
                    self.pos += op.len();
                    Token::new(TokenKind::Operator, self.slice(start, self.pos))
                } else {
                    match self.peek_char(self.pos) {
                        Some(ch) if Self::is_id_start(ch) => {
                            self.pos += ch.len_utf8();
                            let word = self.scan_identifier(start);
                            let kind = self.keyword_lookup(word).unwrap_or(TokenKind::Identifier);
                            Token::new(kind, word)
                        }
                        Some(character) => {
                            return Err(ParseError::UnexpectedCharacter {
                                character,
                                position: start,
                            });
                        }
                        None => return Ok(None),
                    }
                }
            }
        };

        self.at_argument_start =
            token.kind == TokenKind::Punctuation && matches!(token.text, "(" | ",");
        Ok(Some(Spanned::new(token, start, self.pos)))
    }

    /// Tokenize the whole input
    pub fn tokenize_all(&mut self) -> ParseResult<Vec<SpannedToken<'input>>> {
        let mut tokens = Vec::with_capacity(self.end / 2 + 1);
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// Tokenize `input` with case-sensitive keywords
pub fn tokenize(input: &str) -> ParseResult<Vec<SpannedToken<'_>>> {
    Tokenizer::new(input).tokenize_all()
}

/// Strip the quotes from a string token and resolve its escapes
pub fn unescape_string(text: &str) -> String {
    let inner = if text.len() >= 2 {
        &text[1..text.len() - 1]
    } else {
        text
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
