//! Recursive-descent parser for arithmetic formulas.
//!
//! Grammar:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := number | cell | '(' expr ')'
//! ```

use thiserror::Error;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::lexer::{Spanned, Token, tokenize};

/// A formula that could not be parsed.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{message} at offset {offset}")]
pub struct ParseError {
    /// Byte offset into the formula text (without the leading `=`).
    pub offset: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        ParseError {
            offset,
            message: message.into(),
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Deepest expression tree a formula may produce. Parenthesis nesting
/// counts against the same limit.
pub const MAX_DEPTH: usize = 512;

const TOO_DEEP: &str = "formula nested too deeply";

/// Parse formula text into an expression tree.
pub fn parse_expression(input: &str) -> ParseResult<Expr> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        nesting: 0,
    };
    let (expr, _) = parser.parse_expr()?;
    match parser.peek() {
        Token::Eof => Ok(expr),
        Token::RParen => Err(parser.error("unmatched ')'")),
        _ => Err(parser.error("expected an operator")),
    }
}

/// A parsed subtree and its height.
type Node = (Expr, usize);

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    /// Open parentheses and unary operators on the current parse path.
    nesting: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // tokenize() always ends with Eof, and we never advance past it.
        &self.tokens[self.pos].token
    }

    fn offset(&self) -> usize {
        self.tokens[self.pos].offset
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].token.clone();
        if token != Token::Eof {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError::new(self.offset(), message)
    }

    fn enter(&mut self, offset: usize) -> ParseResult<()> {
        self.nesting += 1;
        if self.nesting > MAX_DEPTH {
            return Err(ParseError::new(offset, TOO_DEEP));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    /// Height of a new node over children of height `child_height`.
    fn grow(offset: usize, child_height: usize) -> ParseResult<usize> {
        let height = child_height + 1;
        if height > MAX_DEPTH {
            return Err(ParseError::new(offset, TOO_DEEP));
        }
        Ok(height)
    }

    fn parse_expr(&mut self) -> ParseResult<Node> {
        let (mut lhs, mut height) = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => return Ok((lhs, height)),
            };
            let offset = self.offset();
            self.advance();
            let (rhs, rhs_height) = self.parse_term()?;
            height = Self::grow(offset, height.max(rhs_height))?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn parse_term(&mut self) -> ParseResult<Node> {
        let (mut lhs, mut height) = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                _ => return Ok((lhs, height)),
            };
            let offset = self.offset();
            self.advance();
            let (rhs, rhs_height) = self.parse_unary()?;
            height = Self::grow(offset, height.max(rhs_height))?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn parse_unary(&mut self) -> ParseResult<Node> {
        let op = match self.peek() {
            Token::Plus => UnaryOp::Plus,
            Token::Minus => UnaryOp::Minus,
            _ => return self.parse_primary(),
        };
        let offset = self.offset();
        self.advance();
        self.enter(offset)?;
        let (operand, operand_height) = self.parse_unary()?;
        self.leave();
        let height = Self::grow(offset, operand_height)?;
        Ok((
            Expr::Unary {
                op,
                operand: Box::new(operand),
            },
            height,
        ))
    }

    fn parse_primary(&mut self) -> ParseResult<Node> {
        let offset = self.offset();
        match self.advance() {
            Token::Number(n) => Ok((Expr::Number(n), 1)),
            Token::Cell(pos) => Ok((Expr::Cell(pos), 1)),
            Token::LParen => {
                self.enter(offset)?;
                let inner = self.parse_expr()?;
                self.leave();
                if self.peek() != &Token::RParen {
                    return Err(self.error("expected ')'"));
                }
                self.advance();
                Ok(inner)
            }
            Token::Eof => Err(ParseError::new(offset, "unexpected end of formula")),
            _ => Err(ParseError::new(offset, "expected a number, cell or '('")),
        }
    }
}
