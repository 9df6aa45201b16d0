//! Parser for recorded step strings.
//!
//! A step is a constructor call with literal arguments only:
//!
//! ```text
//! step   := IDENT '(' [ arg (',' arg)* [','] ] ')'
//! arg    := IDENT '=' value | value
//! value  := STRING | INT | FLOAT | True | False | None | '[' [ value (',' value)* [','] ] ']'
//! ```
//!
//! `FLOAT` also covers `nan`, `inf` and `-inf`.
//!
//! Nothing is evaluated. The parser only produces a name and [`Params`]; the
//! registry decides whether the name means anything.

use logos::Logos;

use crate::error::TransformError;
use crate::params::{Params, Value};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
enum Tok {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token("=")]
    Equals,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
    #[regex(r"-?[0-9]+")]
    Int,
    #[regex(r"-?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"-?[0-9]+[eE][+-]?[0-9]+")]
    #[token("-inf")]
    Float,
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,
}

/// Name and arguments of one parsed step.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStep {
    pub name: String,
    pub params: Params,
}

pub fn parse_step(step: &str) -> Result<ParsedStep, TransformError> {
    let mut tokens = Vec::new();
    let mut lexer = Tok::lexer(step);
    while let Some(tok) = lexer.next() {
        match tok {
            Ok(tok) => tokens.push((tok, lexer.slice())),
            Err(()) => {
                return Err(TransformError::invalid_step(
                    step,
                    format!("unexpected character at byte {}", lexer.span().start),
                ))
            }
        }
    }

    let mut parser = Parser {
        step,
        tokens,
        pos: 0,
    };
    parser.step()
}

struct Parser<'a> {
    step: &'a str,
    tokens: Vec<(Tok, &'a str)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Tok> {
        self.tokens.get(self.pos).map(|(tok, _)| *tok)
    }

    fn peek_at(&self, offset: usize) -> Option<Tok> {
        self.tokens.get(self.pos + offset).map(|(tok, _)| *tok)
    }

    fn next(&mut self) -> Option<(Tok, &'a str)> {
        let item = self.tokens.get(self.pos).copied();
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    fn error(&self, reason: impl std::fmt::Display) -> TransformError {
        TransformError::invalid_step(self.step, reason)
    }

    fn expect(&mut self, want: Tok) -> Result<&'a str, TransformError> {
        match self.next() {
            Some((tok, text)) if tok == want => Ok(text),
            Some((_, text)) => Err(self.error(format!("expected {want:?}, found `{text}`"))),
            None => Err(self.error(format!("expected {want:?}, found end of input"))),
        }
    }

    fn step(&mut self) -> Result<ParsedStep, TransformError> {
        let name = self.expect(Tok::Ident)?.to_string();
        self.expect(Tok::LParen)?;

        let mut params = Params::new();
        let mut seen_keyword = false;
        loop {
            if self.peek() == Some(Tok::RParen) {
                self.next();
                break;
            }

            if self.peek() == Some(Tok::Ident) && self.peek_at(1) == Some(Tok::Equals) {
                let key = self.expect(Tok::Ident)?.to_string();
                self.expect(Tok::Equals)?;
                if params.kwarg_value(&key).is_some() {
                    return Err(self.error(format!("keyword argument repeated: {key}")));
                }
                let value = self.value()?;
                params.insert_kwarg(key, value);
                seen_keyword = true;
            } else {
                if seen_keyword {
                    return Err(self.error("positional argument follows keyword argument"));
                }
                let value = self.value()?;
                params.push_arg(value);
            }

            match self.next() {
                Some((Tok::Comma, _)) => continue,
                Some((Tok::RParen, _)) => break,
                Some((_, text)) => {
                    return Err(self.error(format!("expected `,` or `)`, found `{text}`")))
                }
                None => return Err(self.error("unexpected end of input")),
            }
        }

        if let Some((_, text)) = self.next() {
            return Err(self.error(format!("trailing input `{text}`")));
        }

        Ok(ParsedStep { name, params })
    }

    fn value(&mut self) -> Result<Value, TransformError> {
        match self.next() {
            Some((Tok::Str, text)) => Ok(Value::Str(unescape(&text[1..text.len() - 1]))),
            Some((Tok::Int, text)) => text
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|err| self.error(format!("bad integer `{text}`: {err}"))),
            Some((Tok::Float, text)) => text
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|err| self.error(format!("bad float `{text}`: {err}"))),
            Some((Tok::Ident, "True")) => Ok(Value::Bool(true)),
            Some((Tok::Ident, "False")) => Ok(Value::Bool(false)),
            Some((Tok::Ident, "None")) => Ok(Value::None),
            Some((Tok::Ident, "nan")) => Ok(Value::Float(f64::NAN)),
            Some((Tok::Ident, "inf")) => Ok(Value::Float(f64::INFINITY)),
            Some((Tok::LBracket, _)) => self.list(),
            Some((_, text)) => Err(self.error(format!("expected a literal, found `{text}`"))),
            None => Err(self.error("expected a literal, found end of input")),
        }
    }

    fn list(&mut self) -> Result<Value, TransformError> {
        let mut items = Vec::new();
        loop {
            if self.peek() == Some(Tok::RBracket) {
                self.next();
                return Ok(Value::List(items));
            }
            items.push(self.value()?);
            match self.next() {
                Some((Tok::Comma, _)) => continue,
                Some((Tok::RBracket, _)) => return Ok(Value::List(items)),
                Some((_, text)) => {
                    return Err(self.error(format!("expected `,` or `]`, found `{text}`")))
                }
                None => return Err(self.error("unterminated list")),
            }
        }
    }
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(c @ ('\\' | '\'' | '"')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
