// src/lexer.rs

use std::fmt;

use phf::phf_map;

use crate::ast::BinaryOp;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Let,
    Def,
    Fn,
}

static KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "let" => Keyword::Let,
    "def" => Keyword::Def,
    "fn" => Keyword::Fn,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    Identifier,
    Keyword(Keyword),
    Operator(BinaryOp),
    LParen,
    RParen,
    Comma,
    Equals,
    Arrow,
    EndOfInput,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    /// Character offset of the first character of the lexeme.
    pub pos: usize,
}

impl Token {
    fn new(kind: TokenKind, lexeme: impl Into<String>, pos: usize) -> Self {
        Token { kind, lexeme: lexeme.into(), pos }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number => write!(f, "number"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Keyword(_) => write!(f, "keyword"),
            TokenKind::Operator(op) => write!(f, "'{}'", op),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Equals => write!(f, "'='"),
            TokenKind::Arrow => write!(f, "'=>'"),
            TokenKind::EndOfInput => write!(f, "end of input"),
        }
    }
}

struct Lexer {
    input: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Lexer { input: input.chars().collect(), pos: 0 }
    }

    fn current_char(&self) -> Option<char> { self.input.get(self.pos).copied() }
    fn peek_char(&self) -> Option<char> { self.input.get(self.pos + 1).copied() }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut s = String::new();
        while let Some(c) = self.current_char() {
            if !pred(c) {
                break;
            }
            s.push(c);
            self.pos += 1;
        }
        s
    }

    fn single(&mut self, kind: TokenKind, c: char) -> Token {
        let token = Token::new(kind, c.to_string(), self.pos);
        self.pos += 1;
        token
    }

    fn run(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some(c) = self.current_char() {
            let start = self.pos;

            if c.is_whitespace() {
                self.pos += 1;
                continue;
            }

            // Numbers are taken verbatim; "1.2.3" is rejected later by the parser.
            if c.is_ascii_digit() {
                let lexeme = self.take_while(|c| c.is_ascii_digit() || c == '.');
                tokens.push(Token::new(TokenKind::Number, lexeme, start));
                continue;
            }

            if is_ident_start(c) {
                let lexeme = self.take_while(is_ident_continue);
                let kind = match KEYWORDS.get(lexeme.as_str()) {
                    Some(kw) => TokenKind::Keyword(*kw),
                    None => TokenKind::Identifier,
                };
                tokens.push(Token::new(kind, lexeme, start));
                continue;
            }

            if let Some(op) = BinaryOp::from_char(c) {
                tokens.push(self.single(TokenKind::Operator(op), c));
                continue;
            }

            let token = match c {
                '=' if self.peek_char() == Some('>') => {
                    self.pos += 2;
                    Token::new(TokenKind::Arrow, "=>", start)
                }
                '=' => self.single(TokenKind::Equals, c),
                ',' => self.single(TokenKind::Comma, c),
                '(' => self.single(TokenKind::LParen, c),
                ')' => self.single(TokenKind::RParen, c),
                _ => return Err(Error::Lex { pos: start, ch: c }),
            };
            tokens.push(token);
        }

        tokens.push(Token::new(TokenKind::EndOfInput, "", self.pos));
        Ok(tokens)
    }
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splits `input` into tokens, always ending with a single `EndOfInput`.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).run()
}
