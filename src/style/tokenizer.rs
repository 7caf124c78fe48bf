//! logos-based style-table tokenizer.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `#ff00aa` as HexColor beats `#` as Hash)
//! 2. For equal length matches, earlier-defined variants win
//!
//! `:hover` lexes as [`Token::PseudoClass`]; a declaration written without a
//! space after its colon (`WordWrap:true`) therefore also produces a pseudo-class
//! token, which the parser accepts in value position.

use logos::Logos;

use crate::style::parser::ParseError;

/// Style-table token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    /// Hex color: `#fff`, `#ff00aa`, `#ff00aa80`.
    #[regex(r"#[0-9a-fA-F]{3,8}")]
    HexColor,

    /// Pseudo-class: `:hover`, `:down`.
    #[regex(r":[a-zA-Z][a-zA-Z0-9_-]*")]
    PseudoClass,

    /// Number: integer or decimal, possibly negative.
    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    /// Identifier: widget kinds, property names, `true`/`false`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,
}

/// Tokenize a style table into `(Token, text)` pairs.
///
/// Input that matches no token is an [`ParseError::UnexpectedToken`] whose
/// position is the index the token would have had.
pub fn tokenize(input: &str) -> Result<Vec<(Token, String)>, ParseError> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(input).spanned() {
        let text = &input[span.clone()];
        match result {
            Ok(token) => tokens.push((token, text.to_string())),
            Err(()) => {
                return Err(ParseError::UnexpectedToken {
                    position: tokens.len(),
                    message: format!("unrecognized input '{text}' at byte {}", span.start),
                })
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn punctuation() {
        assert_eq!(
            tokens("{ } : ; ,"),
            vec![Token::BraceOpen, Token::BraceClose, Token::Colon, Token::Semicolon, Token::Comma]
        );
    }

    #[test]
    fn rule_header_with_state() {
        let result = tokenize("Button:hover {").unwrap();
        assert_eq!(result[0], (Token::Ident, "Button".into()));
        assert_eq!(result[1], (Token::PseudoClass, ":hover".into()));
        assert_eq!(result[2].0, Token::BraceOpen);
    }

    #[test]
    fn declaration_values() {
        let result = tokenize("Padding: 30 -2.5; FillColor: #ff00aa80;").unwrap();
        assert_eq!(result[0], (Token::Ident, "Padding".into()));
        assert_eq!(result[1].0, Token::Colon);
        assert_eq!(result[2], (Token::Number, "30".into()));
        assert_eq!(result[3], (Token::Number, "-2.5".into()));
        assert_eq!(result[4].0, Token::Semicolon);
        assert_eq!(result[7], (Token::HexColor, "#ff00aa80".into()));
    }

    #[test]
    fn tight_colon_is_pseudo_class() {
        assert_eq!(tokens("WordWrap:true"), vec![Token::Ident, Token::PseudoClass]);
    }

    #[test]
    fn stray_character_is_error() {
        match tokenize("Padding: 30 $ 30;") {
            Err(ParseError::UnexpectedToken { position, message }) => {
                assert_eq!(position, 3);
                assert!(message.contains("'$'"), "{message}");
                assert!(message.contains("byte 12"), "{message}");
            }
            other => panic!("expected a lex error, got {other:?}"),
        }
    }

    #[test]
    fn empty_input() {
        assert!(tokens("").is_empty());
        assert!(tokens("   \n\t ").is_empty());
    }
}
