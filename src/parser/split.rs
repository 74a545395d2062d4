//! Operator-precedence split parser
//!
//! A span of tokens is reduced by finding its loosest-binding top-level
//! operator, splitting there, and parsing both sides recursively. Spans that
//! contain no top-level operator are terminals: a literal, a variable, a
//! parenthesised group or a function call.
//!
//! Every span is parsed together with the token that precedes it, which is
//! what decides whether a leading `+`/`-` is a sign or a binary operator.

use rust_decimal::Decimal;
use std::borrow::Cow;
use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;

use super::error::{ParseError, ParseResult};
use super::tokenizer::{LiteralKind, SpannedToken, Token, TokenKind, unescape_string};
use crate::ast::{Arguments, Expression};
use crate::context::Context;
use crate::model::{Color, Unit, Value};
use crate::registry::operator::{ExpressionOperator, Precedence};

/// Chosen split point of a span
struct Split<'c> {
    index: usize,
    descriptor: &'c Arc<dyn ExpressionOperator>,
    unary: bool,
    precedence: Precedence,
}

/// Parser over an owned token vector
pub(crate) struct SplitParser<'t, 'input> {
    tokens: &'t [SpannedToken<'input>],
    context: &'t Context,
}

impl<'t, 'input> SplitParser<'t, 'input> {
    pub(crate) fn new(tokens: &'t [SpannedToken<'input>], context: &'t Context) -> Self {
        Self { tokens, context }
    }

    /// Parse the whole token vector into one expression
    pub(crate) fn parse(&self) -> ParseResult<Expression> {
        if self.tokens.is_empty() {
            return Err(ParseError::EmptyExpression);
        }
        self.check_balance()?;
        self.parse_span(0..self.tokens.len(), None)
    }

    fn check_balance(&self) -> ParseResult<()> {
        let mut open: Vec<usize> = Vec::new();
        for token in self.tokens {
            if token.value.is_open_paren() {
                open.push(token.start);
            } else if token.value.is_close_paren() && open.pop().is_none() {
                return Err(ParseError::UnmatchedParenthesis {
                    delimiter: ')',
                    position: token.start,
                });
            }
        }
        match open.last() {
            Some(&position) => Err(ParseError::UnmatchedParenthesis {
                delimiter: '(',
                position,
            }),
            None => Ok(()),
        }
    }

    fn token(&self, index: usize) -> &'t SpannedToken<'input> {
        &self.tokens[index]
    }

    /// Token before `index`, falling back to the span's own predecessor
    fn previous_of(
        &self,
        index: usize,
        span: &Range<usize>,
        previous: Option<&'t Token<'input>>,
    ) -> Option<&'t Token<'input>> {
        if index > span.start {
            Some(&self.token(index - 1).value)
        } else {
            previous
        }
    }

    fn parse_span(
        &self,
        span: Range<usize>,
        previous: Option<&'t Token<'input>>,
    ) -> ParseResult<Expression> {
        match self.find_split(&span, previous)? {
            Some(split) => self.parse_split(span, previous, split),
            None => self.parse_terminal(span),
        }
    }

    /// Loosest-binding operator outside of parentheses.
    ///
    /// Among equally loose binary operators the rightmost wins, giving left
    /// to right grouping; among prefix operators the leftmost wins.
    fn find_split(
        &self,
        span: &Range<usize>,
        previous: Option<&'t Token<'input>>,
    ) -> ParseResult<Option<Split<'t>>> {
        let operators = self.context.operators();
        let mut depth = 0usize;
        let mut best: Option<Split<'t>> = None;

        for index in span.clone() {
            let token = self.token(index);
            if token.value.is_open_paren() {
                depth += 1;
                continue;
            }
            if token.value.is_close_paren() {
                depth = depth.saturating_sub(1);
                continue;
            }
            if depth > 0 || !token.value.is_operator() {
                continue;
            }

            let descriptor =
                operators
                    .get(token.value.text)
                    .ok_or_else(|| ParseError::UnknownOperator {
                        operator: token.value.text.to_string(),
                        position: token.start,
                    })?;
            let unary = descriptor.is_unary(self.previous_of(index, span, previous));
            let precedence = if unary {
                Precedence::Unary
            } else {
                descriptor.precedence()
            };

            let replace = match &best {
                None => true,
                Some(current) => {
                    precedence < current.precedence
                        || (precedence == current.precedence && !unary)
                }
            };
            if replace {
                best = Some(Split {
                    index,
                    descriptor,
                    unary,
                    precedence,
                });
            }
        }

        Ok(best)
    }

    fn parse_split(
        &self,
        span: Range<usize>,
        previous: Option<&'t Token<'input>>,
        split: Split<'t>,
    ) -> ParseResult<Expression> {
        let token = self.token(split.index);
        let left_span = span.start..split.index;
        let right_span = split.index + 1..span.end;

        if split.unary && !left_span.is_empty() {
            return Err(ParseError::UnexpectedToken {
                token: token.value.text.to_string(),
                position: token.start,
            });
        }

        let left = if left_span.is_empty() {
            None
        } else {
            Some(self.parse_span(left_span, previous)?)
        };
        let right = if right_span.is_empty() {
            None
        } else {
            Some(self.parse_span(right_span, Some(&token.value))?)
        };

        let operator_previous = self.previous_of(split.index, &span, previous);
        split.descriptor.build(token, operator_previous, [left, right])
    }

    /// Index of the `)` closing the group opened at `open`
    fn matching_close(&self, open: usize, end: usize) -> ParseResult<usize> {
        let mut depth = 0usize;
        for index in open..end {
            let token = &self.token(index).value;
            if token.is_open_paren() {
                depth += 1;
            } else if token.is_close_paren() {
                depth -= 1;
                if depth == 0 {
                    return Ok(index);
                }
            }
        }
        Err(ParseError::UnmatchedParenthesis {
            delimiter: '(',
            position: self.token(open).start,
        })
    }

    fn parse_terminal(&self, span: Range<usize>) -> ParseResult<Expression> {
        let first = self.token(span.start);
        let is_call = first.value.is_identifier()
            && span.len() > 1
            && self.token(span.start + 1).value.is_open_paren();

        let (expression, operand_end) = if first.value.is_open_paren() {
            let close = self.matching_close(span.start, span.end)?;
            let inner = span.start + 1..close;
            if inner.is_empty() {
                return Err(ParseError::MissingOperand {
                    operator: "(".to_string(),
                    position: first.start,
                });
            }
            (self.parse_span(inner, Some(&first.value))?, close + 1)
        } else if is_call {
            let close = self.matching_close(span.start + 1, span.end)?;
            (self.parse_call(span.start, close)?, close + 1)
        } else {
            (self.parse_atom(first)?, span.start + 1)
        };

        if operand_end < span.end {
            let extra = self.token(operand_end);
            return Err(ParseError::UnexpectedToken {
                token: extra.value.text.to_string(),
                position: extra.start,
            });
        }
        Ok(expression)
    }

    /// `name ( args )` with the name at `name_index` and `)` at `close`
    fn parse_call(&self, name_index: usize, close: usize) -> ParseResult<Expression> {
        let name = self.token(name_index);
        let open = name_index + 1;
        let descriptor = self.context.functions().get(name.value.text).ok_or_else(|| {
            ParseError::UnknownFunction {
                name: name.value.text.to_string(),
                position: name.start,
            }
        })?;

        let mut args = Arguments::new();
        if close > open + 1 {
            let mut depth = 0usize;
            let mut segment_start = open + 1;
            for index in open + 1..=close {
                let token = &self.token(index).value;
                if index < close && token.is_open_paren() {
                    depth += 1;
                } else if index < close && token.is_close_paren() {
                    depth -= 1;
                } else if index == close || (depth == 0 && token.is_comma()) {
                    let delimiter = self.token(segment_start - 1);
                    if segment_start == index {
                        let comma = if index == close { delimiter } else { self.token(index) };
                        return Err(ParseError::MissingOperand {
                            operator: ",".to_string(),
                            position: comma.start,
                        });
                    }
                    args.push(self.parse_span(segment_start..index, Some(&delimiter.value))?);
                    segment_start = index + 1;
                }
            }
        }

        let arity = descriptor.arity();
        if !arity.accepts(args.len()) {
            return Err(ParseError::InvalidArity {
                name: name.value.text.to_string(),
                min: arity.min,
                max: arity.max,
                actual: args.len(),
                position: name.start,
            });
        }

        Ok(Expression::call(
            name.value.text,
            Arc::clone(descriptor),
            args,
        ))
    }

    fn parse_atom(&self, token: &SpannedToken<'input>) -> ParseResult<Expression> {
        match token.value.kind {
            TokenKind::Literal(kind) => Ok(Expression::Literal(parse_literal(kind, token)?)),
            TokenKind::Identifier => Ok(Expression::variable(token.value.text)),
            TokenKind::Operator | TokenKind::Punctuation => Err(ParseError::UnexpectedToken {
                token: token.value.text.to_string(),
                position: token.start,
            }),
        }
    }
}

fn invalid(literal_type: &'static str, token: &SpannedToken<'_>) -> ParseError {
    ParseError::InvalidLiteral {
        literal_type: Cow::Borrowed(literal_type),
        value: token.value.text.to_string(),
        position: token.start,
    }
}

fn parse_number(token: &SpannedToken<'_>) -> ParseResult<Value> {
    let text = token.value.text;
    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return i64::from_str_radix(&text[2..], radix)
            .map(Value::Integer)
            .map_err(|_| invalid("number", token));
    }
    if let Ok(integer) = text.parse::<i64>() {
        return Ok(Value::Integer(integer));
    }
    let normalized: Cow<'_, str> = if text.starts_with('.') {
        Cow::Owned(format!("0{text}"))
    } else {
        Cow::Borrowed(text)
    };
    if let Ok(decimal) = Decimal::from_str(&normalized) {
        return Ok(Value::Decimal(decimal));
    }
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(Value::Double)
        .ok_or_else(|| invalid("number", token))
}

/// Value of a literal token
fn parse_literal(kind: LiteralKind, token: &SpannedToken<'_>) -> ParseResult<Value> {
    let text = token.value.text;
    match kind {
        LiteralKind::Number => parse_number(token),
        LiteralKind::Unit => Unit::from_str(text)
            .map(Value::Unit)
            .map_err(|_| invalid("unit", token)),
        LiteralKind::String => Ok(Value::String(unescape_string(text))),
        LiteralKind::Color => Color::from_str(text)
            .map(Value::Color)
            .map_err(|_| invalid("color", token)),
        LiteralKind::Boolean => Ok(Value::Boolean(text.eq_ignore_ascii_case("true"))),
        LiteralKind::Null => Ok(Value::Null),
    }
}
