// src/parser.rs

use crate::ast::{BinaryOp, Expr};
use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::{Error, Result};
use crate::lexer::{Keyword, Token, TokenKind};
use crate::stack::ensure_sufficient_stack;

// --- The Parser ---
//
// expression     := additive
// additive       := multiplicative (("+"|"-") multiplicative)*
// multiplicative := power (("*"|"/") power)*
// power          := primary ("^" primary)*
// primary        := NUMBER
//                 | "fn" "(" params? ")" "=>" expression
//                 | IDENTIFIER ( "(" args? ")" )?
//                 | "(" expression ")"
//                 | "(" lambda ")" ( "(" args? ")" )?
pub struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'t> Parser<'t> {
    /// `tokens` must end with `EndOfInput`, as produced by `tokenize`.
    pub fn new(tokens: &'t [Token], max_depth: usize) -> Self {
        Parser { tokens, pos: 0, depth: 0, max_depth }
    }

    fn peek(&self) -> &Token {
        // The sentinel is never consumed, so clamping keeps us on it.
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    fn peek_kind(&self) -> TokenKind {
        if self.tokens.is_empty() {
            return TokenKind::EndOfInput;
        }
        self.peek().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::EndOfInput {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token> {
        if self.peek_kind() == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn unexpected(&self, what: &str) -> Error {
        if self.tokens.is_empty() || self.peek_kind() == TokenKind::EndOfInput {
            Error::parse(format!("Expected {}, but reached end of input", what))
        } else {
            let token = self.peek();
            Error::parse(format!(
                "Expected {}, found '{}' at position {}",
                what, token.lexeme, token.pos
            ))
        }
    }

    pub fn parse(&mut self) -> Result<Expr> {
        let expr = self.parse_expression()?;
        if self.peek_kind() != TokenKind::EndOfInput {
            let token = self.peek();
            return Err(Error::parse(format!(
                "unexpected trailing tokens starting at '{}' (position {})",
                token.lexeme, token.pos
            )));
        }
        Ok(expr)
    }

    fn parse_expression(&mut self) -> Result<Expr> {
        if self.depth >= self.max_depth {
            return Err(Error::StackDepthExceeded { limit: self.max_depth });
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.parse_additive());
        self.depth -= 1;
        result
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        self.parse_left_assoc(&[BinaryOp::Add, BinaryOp::Sub], Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        self.parse_left_assoc(&[BinaryOp::Mul, BinaryOp::Div], Self::parse_power)
    }

    // Left-associative like the others: 2 ^ 3 ^ 2 is (2 ^ 3) ^ 2.
    fn parse_power(&mut self) -> Result<Expr> {
        self.parse_left_assoc(&[BinaryOp::Pow], Self::parse_primary)
    }

    fn parse_left_assoc(
        &mut self,
        ops: &[BinaryOp],
        mut operand: impl FnMut(&mut Self) -> Result<Expr>,
    ) -> Result<Expr> {
        // Each fold nests the tree one level deeper, so it counts against
        // the same budget as parenthesized nesting.
        let saved = self.depth;
        let result = self.fold_left(ops, &mut operand);
        self.depth = saved;
        result
    }

    fn fold_left(
        &mut self,
        ops: &[BinaryOp],
        operand: &mut impl FnMut(&mut Self) -> Result<Expr>,
    ) -> Result<Expr> {
        let mut left = operand(self)?;
        while let TokenKind::Operator(op) = self.peek_kind() {
            if !ops.contains(&op) {
                break;
            }
            if self.depth >= self.max_depth {
                return Err(Error::StackDepthExceeded { limit: self.max_depth });
            }
            self.depth += 1;
            self.advance();
            let right = operand(self)?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.peek_kind() {
            TokenKind::Number => {
                let token = self.advance();
                token
                    .lexeme
                    .parse::<f64>()
                    .map(Expr::Number)
                    .map_err(|_| Error::parse(format!("Invalid number: '{}'", token.lexeme)))
            }
            TokenKind::Keyword(Keyword::Fn) => self.parse_lambda(),
            TokenKind::Identifier => {
                let name = self.advance().lexeme;
                if self.eat(TokenKind::LParen) {
                    let args = self.parse_args("')' to close the argument list")?;
                    Ok(Expr::Call(name, args))
                } else {
                    Ok(Expr::Var(name))
                }
            }
            TokenKind::LParen => {
                self.advance();
                if self.peek_kind() == TokenKind::Keyword(Keyword::Fn) {
                    return self.parse_parenthesized_lambda();
                }
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            _ => Err(self.unexpected("a number, identifier, 'fn' or '('")),
        }
    }

    /// After `(` with `fn` next: either `(fn(..) => ..)` or `(fn(..) => ..)(args)`.
    fn parse_parenthesized_lambda(&mut self) -> Result<Expr> {
        let lambda = self.parse_lambda()?;
        self.expect(TokenKind::RParen, "')' after lambda expression")?;
        if self.eat(TokenKind::LParen) {
            let args = self.parse_args("')' to close the lambda call")?;
            Ok(Expr::AnonymousCall(Box::new(lambda), args))
        } else {
            Ok(lambda)
        }
    }

    fn parse_lambda(&mut self) -> Result<Expr> {
        self.expect(TokenKind::Keyword(Keyword::Fn), "'fn'")?;
        self.expect(TokenKind::LParen, "'(' after 'fn'")?;

        let mut params = Vec::new();
        if self.peek_kind() != TokenKind::RParen {
            params.push(self.expect(TokenKind::Identifier, "parameter name")?.lexeme);
            while self.eat(TokenKind::Comma) {
                params.push(
                    self.expect(TokenKind::Identifier, "parameter name after ','")?
                        .lexeme,
                );
            }
        }
        self.expect(TokenKind::RParen, "')' after parameters")?;
        self.expect(TokenKind::Arrow, "'=>' after parameter list")?;

        let body = self.parse_expression()?;
        Ok(Expr::lambda(params, body))
    }

    /// Comma-separated arguments; the opening `(` is already consumed.
    fn parse_args(&mut self, closing: &str) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.peek_kind() != TokenKind::RParen {
            args.push(self.parse_expression()?);
            while self.eat(TokenKind::Comma) {
                args.push(self.parse_expression()?);
            }
        }
        self.expect(TokenKind::RParen, closing)?;
        Ok(args)
    }
}

// Convenience function for parsing
pub fn parse(tokens: &[Token]) -> Result<Expr> {
    Parser::new(tokens, DEFAULT_MAX_DEPTH).parse()
}

/// Lexes and parses `input` in one go.
pub fn parse_str(input: &str, max_depth: usize) -> Result<Expr> {
    let tokens = crate::lexer::tokenize(input)?;
    Parser::new(&tokens, max_depth).parse()
}
