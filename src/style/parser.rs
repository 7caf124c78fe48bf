//! Recursive descent parser for style tables.
//!
//! A style table is a list of rules, each a comma-separated list of
//! `Kind[:state]` selectors followed by a `{ Name: value; ... }` block. Values
//! are typed from their tokens: hex colors, integers, decimals, `true`/`false`,
//! or a pair of numbers for a vector.

use crate::geometry::Vec2;
use crate::style::color::Color;
use crate::style::property::{EntityState, StyleProperty};
use crate::style::tokenizer::{tokenize, Token};

/// Errors from style-table parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected token at position {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
    #[error("invalid value for {property}: {message}")]
    InvalidValue { property: String, message: String },
}

/// One `Kind[:state]` selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSelector {
    pub kind: String,
    pub state: EntityState,
}

/// One `Name: value;` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: StyleProperty,
}

/// A rule: selectors plus the declarations they receive.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selectors: Vec<StyleSelector>,
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone)]
struct PToken {
    token: Token,
    text: String,
    pos: usize,
}

/// Strip block comments (`/* ... */`), replacing each with a single space.
fn strip_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("/*") {
        result.push_str(&rest[..start]);
        result.push(' ');
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            // Unterminated comment: consume the rest of the input.
            None => rest = "",
        }
    }
    result.push_str(rest);
    result
}

fn tokenize_positioned(input: &str) -> Result<Vec<PToken>, ParseError> {
    Ok(tokenize(input)?
        .into_iter()
        .enumerate()
        .map(|(pos, (token, text))| PToken { token, text, pos })
        .collect())
}

/// Parse a style table into its rules.
pub fn parse_style_table(input: &str) -> Result<Vec<StyleRule>, ParseError> {
    let cleaned = strip_comments(input);
    let mut parser = Parser {
        tokens: tokenize_positioned(&cleaned)?,
        cursor: 0,
    };

    let mut rules = Vec::new();
    while !parser.is_eof() {
        rules.push(parser.parse_rule()?);
    }
    Ok(rules)
}

struct Parser {
    tokens: Vec<PToken>,
    cursor: usize,
}

impl Parser {
    fn is_eof(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    fn peek(&self) -> Option<&PToken> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self) -> Option<PToken> {
        let tok = self.tokens.get(self.cursor).cloned();
        if tok.is_some() {
            self.cursor += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &Token) -> Result<PToken, ParseError> {
        match self.advance() {
            Some(tok) if &tok.token == expected => Ok(tok),
            Some(tok) => Err(ParseError::UnexpectedToken {
                position: tok.pos,
                message: format!("expected {expected:?}, got {:?} '{}'", tok.token, tok.text),
            }),
            None => Err(ParseError::UnexpectedEof(format!("expected {expected:?}"))),
        }
    }

    fn parse_rule(&mut self) -> Result<StyleRule, ParseError> {
        let mut selectors = vec![self.parse_selector()?];
        while self.peek().is_some_and(|t| t.token == Token::Comma) {
            self.advance();
            selectors.push(self.parse_selector()?);
        }

        self.expect(&Token::BraceOpen)?;
        let mut declarations = Vec::new();
        while self.peek().is_some_and(|t| t.token != Token::BraceClose) {
            declarations.push(self.parse_declaration()?);
        }
        self.expect(&Token::BraceClose)?;

        Ok(StyleRule { selectors, declarations })
    }

    fn parse_selector(&mut self) -> Result<StyleSelector, ParseError> {
        let kind = self.expect(&Token::Ident)?.text;
        let state = match self.peek() {
            Some(t) if t.token == Token::PseudoClass => {
                let tok = self.advance().ok_or_else(|| {
                    ParseError::UnexpectedEof("expected pseudo-class".into())
                })?;
                EntityState::from_pseudo_class(&tok.text[1..]).ok_or_else(|| {
                    ParseError::UnexpectedToken {
                        position: tok.pos,
                        message: format!("unknown state '{}'", tok.text),
                    }
                })?
            }
            _ => EntityState::Default,
        };
        Ok(StyleSelector { kind, state })
    }

    fn parse_declaration(&mut self) -> Result<Declaration, ParseError> {
        let property = self.expect(&Token::Ident)?.text;

        // `Name: value` or the tight `Name:value`, which lexes as a pseudo-class.
        let mut values: Vec<PToken> = Vec::new();
        match self.advance() {
            Some(tok) if tok.token == Token::Colon => {}
            Some(tok) if tok.token == Token::PseudoClass => values.push(PToken {
                token: Token::Ident,
                text: tok.text[1..].to_string(),
                pos: tok.pos,
            }),
            Some(tok) => {
                return Err(ParseError::UnexpectedToken {
                    position: tok.pos,
                    message: format!("expected ':' after '{property}', got '{}'", tok.text),
                })
            }
            None => return Err(ParseError::UnexpectedEof(format!("expected ':' after '{property}'"))),
        }

        while let Some(tok) = self.peek() {
            match tok.token {
                Token::Semicolon | Token::BraceClose => break,
                Token::Number | Token::HexColor | Token::Ident => {
                    let tok = tok.clone();
                    self.advance();
                    values.push(tok);
                }
                _ => {
                    return Err(ParseError::UnexpectedToken {
                        position: tok.pos,
                        message: format!("unexpected '{}' in value of {property}", tok.text),
                    })
                }
            }
        }
        if self.peek().is_some_and(|t| t.token == Token::Semicolon) {
            self.advance();
        }

        let value = typed_value(&property, &values)?;
        Ok(Declaration { property, value })
    }
}

/// Convert the raw value tokens of a declaration into a typed property.
fn typed_value(property: &str, values: &[PToken]) -> Result<StyleProperty, ParseError> {
    let invalid = |message: String| ParseError::InvalidValue {
        property: property.to_owned(),
        message,
    };
    let number = |tok: &PToken| -> Result<f32, ParseError> {
        tok.text
            .parse::<f32>()
            .map_err(|_| invalid(format!("invalid number '{}'", tok.text)))
    };

    match values {
        [tok] if tok.token == Token::HexColor => Color::from_hex(&tok.text)
            .map(StyleProperty::Color)
            .ok_or_else(|| invalid(format!("invalid color '{}'", tok.text))),
        [tok] if tok.token == Token::Ident => match tok.text.as_str() {
            "true" => Ok(StyleProperty::Bool(true)),
            "false" => Ok(StyleProperty::Bool(false)),
            other => Err(invalid(format!("unknown keyword '{other}'"))),
        },
        [tok] if tok.token == Token::Number => {
            if tok.text.contains('.') {
                Ok(StyleProperty::Float(number(tok)?))
            } else {
                tok.text
                    .parse::<i32>()
                    .map(StyleProperty::Int)
                    .map_err(|_| invalid(format!("invalid integer '{}'", tok.text)))
            }
        }
        [x, y] if x.token == Token::Number && y.token == Token::Number => {
            Ok(StyleProperty::Vector(Vec2::new(number(x)?, number(y)?)))
        }
        [] => Err(invalid("missing value".into())),
        other => Err(invalid(format!("cannot type {} value tokens", other.len()))),
    }
}
