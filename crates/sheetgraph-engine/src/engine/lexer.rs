//! Formula tokenizer.
//!
//! Scans formula text (without the leading `=`) into [`Token`]s, each
//! tagged with the byte offset it starts at so parse errors can point at
//! the offending input.

use regex::Regex;
use std::sync::OnceLock;

use super::parser::ParseError;
use super::position::Position;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Cell(Position),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Eof,
}

/// A token and the byte offset of its first character.
#[derive(Clone, Debug, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// Literal marking a reference that no longer points inside the sheet.
pub(crate) const REF_ERROR_TOKEN: &str = "#REF!";

fn number_re() -> &'static Regex {
    static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    NUMBER_RE.get_or_init(|| {
        Regex::new(r"^(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
            .expect("number literal regex must compile")
    })
}

fn identifier_re() -> &'static Regex {
    static IDENT_RE: OnceLock<Regex> = OnceLock::new();
    IDENT_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9]*").expect("identifier regex must compile")
    })
}

/// Split formula text into tokens, ending with [`Token::Eof`].
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, ParseError> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    while offset < input.len() {
        let rest = &input[offset..];
        let Some(ch) = rest.chars().next() else {
            break;
        };

        if ch.is_whitespace() {
            offset += ch.len_utf8();
            continue;
        }

        let (token, len) = match ch {
            '+' => (Token::Plus, 1),
            '-' => (Token::Minus, 1),
            '*' => (Token::Star, 1),
            '/' => (Token::Slash, 1),
            '(' => (Token::LParen, 1),
            ')' => (Token::RParen, 1),
            '0'..='9' | '.' => read_number(rest, offset)?,
            '#' => {
                let len = REF_ERROR_TOKEN.len();
                let matches = rest
                    .get(..len)
                    .is_some_and(|head| head.eq_ignore_ascii_case(REF_ERROR_TOKEN));
                if matches {
                    (Token::Cell(Position::NONE), len)
                } else {
                    return Err(ParseError::new(offset, "unknown error literal"));
                }
            }
            c if c.is_ascii_alphabetic() => read_cell(rest, offset)?,
            c => {
                return Err(ParseError::new(
                    offset,
                    format!("unexpected character '{}'", c),
                ));
            }
        };

        tokens.push(Spanned { token, offset });
        offset += len;
    }

    tokens.push(Spanned {
        token: Token::Eof,
        offset: input.len(),
    });
    Ok(tokens)
}

fn read_number(rest: &str, offset: usize) -> Result<(Token, usize), ParseError> {
    let Some(m) = number_re().find(rest) else {
        return Err(ParseError::new(offset, "malformed number"));
    };
    let value: f64 = m
        .as_str()
        .parse()
        .map_err(|_| ParseError::new(offset, "malformed number"))?;
    if !value.is_finite() {
        return Err(ParseError::new(offset, "number out of range"));
    }
    Ok((Token::Number(value), m.end()))
}

fn read_cell(rest: &str, offset: usize) -> Result<(Token, usize), ParseError> {
    let Some(m) = identifier_re().find(rest) else {
        return Err(ParseError::new(offset, "malformed identifier"));
    };
    match Position::from_a1(m.as_str()) {
        Some(pos) => Ok((Token::Cell(pos), m.end())),
        None => Err(ParseError::new(
            offset,
            format!("'{}' is not a cell reference", m.as_str()),
        )),
    }
}
