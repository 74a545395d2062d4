//! Expression parser
//!
//! Source text is tokenized first and then reduced by the split parser, which
//! consults the operator and function registries of a [`Context`].

pub mod error;
pub mod span;
mod split;
pub mod tokenizer;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use span::{Spanned, helpers};
pub use tokenizer::{LiteralKind, SpannedToken, Token, TokenKind, Tokenizer, tokenize};

use crate::ast::Expression;
use crate::context::Context;
use split::SplitParser;

/// Parse expression text against the registries of `context`
pub fn parse(text: &str, context: &Context) -> ParseResult<Expression> {
    let ignore_case = context.options().ignore_case_for_parsing;
    let tokens = Tokenizer::with_ignore_case(text, ignore_case).tokenize_all()?;
    log::debug!("Tokenized {} tokens from '{}'", tokens.len(), text);
    SplitParser::new(&tokens, context).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContextOptions;
    use crate::context::ContextBuilder;

    #[test]
    fn test_parse_uses_context_registries() {
        let expr = parse("Calc(1 + 2)", Context::shared()).unwrap();
        assert_eq!(expr.to_string(), "Calc((1 + 2))");

        let err = parse("CALC(1)", Context::shared()).unwrap_err();
        assert!(matches!(err, ParseError::UnknownFunction { .. }));
    }

    #[test]
    fn test_parse_ignore_case() {
        let context = ContextBuilder::with_options(ContextOptions {
            ignore_case_for_parsing: true,
            ..ContextOptions::default()
        })
        .build();
        assert!(parse("CALC(1) AND TRUE", &context).is_ok());
    }

    #[test]
    fn test_lex_errors_surface() {
        let err = parse("1 # 2", Context::shared()).unwrap_err();
        assert!(err.is_lex_error());
        assert_eq!(err.position(), 2);
    }
}
