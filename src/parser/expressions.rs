//! Expression parsing implementation
//!
//! Precedence is encoded in the call hierarchy: each level parses the next
//! tighter one and folds its operator left-associatively.
//!
//! # Precedence (lowest first)
//!
//! ```text
//! assignment → logical_or ('=' assignment)?
//! logical_or → logical_and ('||' logical_and)*
//! logical_and → comparison ('&&' comparison)*
//! comparison → term (('<'|'<='|'>'|'>='|'=='|'!=') term)*
//! term       → product (('+'|'-') product)*
//! product    → primary (('*'|'/') primary)*
//! primary    → literal | identifier ('(' args ')')? | '(' assignment ')'
//! ```
//!
//! Every node is typed as soon as it is built. Only primitive type identity
//! is checked: there are no conversions.

use crate::parser::ast::*;
use crate::parser::errors::ParseError;
use crate::parser::lexer::{Token, TokenKind, TokenSource};
use crate::parser::parse::Parser;
use crate::symbols::Entry;

impl<S: TokenSource> Parser<S> {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    /// Parse assignment (right-associative)
    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.parse_logical_or()?;

        if self.check(TokenKind::Eq) {
            let loc = self.advance()?.location;
            if !matches!(lhs.kind, ExprKind::Variable(_)) {
                return Err(ParseError::InvalidAssignTarget { location: lhs.location });
            }
            let rhs = self.parse_assignment()?;
            return self.binary(BinOp::Assign, lhs, rhs, loc);
        }

        Ok(lhs)
    }

    /// Parse logical OR (||)
    fn parse_logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_logical_and()?;

        while self.check(TokenKind::OrOr) {
            let loc = self.advance()?.location;
            let right = self.parse_logical_and()?;
            left = self.binary(BinOp::Or, left, right, loc)?;
        }

        Ok(left)
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;

        while self.check(TokenKind::AndAnd) {
            let loc = self.advance()?.location;
            let right = self.parse_comparison()?;
            left = self.binary(BinOp::And, left, right, loc)?;
        }

        Ok(left)
    }

    /// Parse comparison (< <= > >= == !=)
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;

        loop {
            let kind = self.peek().kind;
            let op = match kind {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Le => BinOp::Le,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::Ge => BinOp::Ge,
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::NotEq => BinOp::Ne,
                _ => break,
            };

            let loc = self.advance()?.location;
            let right = self.parse_term()?;
            left = self.binary(op, left, right, loc)?;
        }

        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_product()?;

        loop {
            let kind = self.peek().kind;
            let op = match kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };

            let loc = self.advance()?.location;
            let right = self.parse_product()?;
            left = self.binary(op, left, right, loc)?;
        }

        Ok(left)
    }

    /// Parse multiplicative (* /)
    fn parse_product(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_primary()?;

        loop {
            let kind = self.peek().kind;
            let op = match kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };

            let loc = self.advance()?.location;
            let right = self.parse_primary()?;
            left = self.binary(op, left, right, loc)?;
        }

        Ok(left)
    }

    /// Type-check and build a binary node.
    ///
    /// Operands must share a type. `||` and `&&` additionally require
    /// `bool`; comparisons and logical operators produce `bool`, everything
    /// else produces the operand type.
    fn binary(
        &self,
        op: BinOp,
        lhs: Expr,
        rhs: Expr,
        loc: SourceLocation,
    ) -> Result<Expr, ParseError> {
        let ty = match op {
            BinOp::Or | BinOp::And => {
                self.expect_bool(&lhs)?;
                self.expect_bool(&rhs)?;
                lhs.ty
            }
            _ => {
                self.expect_type(lhs.ty, rhs.ty, rhs.location)?;
                if op.is_comparison() {
                    self.lookup_type("bool", loc)?
                } else {
                    lhs.ty
                }
            }
        };

        Ok(Expr::new(
            ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            ty,
            loc,
        ))
    }

    /// Parse primary (literals, names, calls, parenthesized expressions)
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let kind = self.peek().kind;
        match kind {
            TokenKind::IntLiteral => {
                let token = self.advance()?;
                let value = token.lexeme.parse::<i64>().map_err(|_| invalid_literal(&token))?;
                self.literal(Literal::Int(value), "int", token.location)
            }
            TokenKind::FloatLiteral => {
                let token = self.advance()?;
                let value = token.lexeme.parse::<f64>().map_err(|_| invalid_literal(&token))?;
                self.literal(Literal::Float(value), "float", token.location)
            }
            TokenKind::BoolLiteral => {
                let token = self.advance()?;
                self.literal(Literal::Bool(token.lexeme == "true"), "bool", token.location)
            }
            TokenKind::StringLiteral => {
                let token = self.advance()?;
                self.literal(Literal::Str(token.lexeme), "string", token.location)
            }
            TokenKind::Ident => {
                let name = self.advance()?;
                if self.check(TokenKind::LParen) {
                    self.call(name)
                } else {
                    self.variable_access(name)
                }
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.consume(TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected(&TokenKind::EXPR_START)),
        }
    }

    /// Bind a literal to the type named `type_name` as seen from the current
    /// scope.
    fn literal(
        &self,
        value: Literal,
        type_name: &str,
        loc: SourceLocation,
    ) -> Result<Expr, ParseError> {
        let ty = self.lookup_type(type_name, loc)?;
        Ok(Expr::new(ExprKind::Literal(value), ty, loc))
    }

    fn variable_access(&self, name: Token) -> Result<Expr, ParseError> {
        let id = self.lookup(&name.lexeme, name.location)?;
        match self.symbols.entry(id) {
            Entry::Variable(var) => Ok(Expr::new(ExprKind::Variable(id), var.ty, name.location)),
            other => Err(ParseError::NotAVariable {
                name: name.lexeme,
                role: other.role(),
                location: name.location,
            }),
        }
    }

    /// Parse `name(args)`; the callee must already be a fully defined
    /// function.
    fn call(&mut self, name: Token) -> Result<Expr, ParseError> {
        let callee = self.lookup(&name.lexeme, name.location)?;
        let Some(func) = self.symbols.function(callee) else {
            return Err(ParseError::NotCallable {
                name: name.lexeme,
                role: self.symbols.entry(callee).role(),
                location: name.location,
            });
        };
        let params = func.params.clone();
        let return_type = func.return_type;

        let args = self.argument_list()?;
        if args.len() != params.len() {
            return Err(ParseError::ArityMismatch {
                function: name.lexeme,
                expected: params.len(),
                found: args.len(),
                location: name.location,
            });
        }

        for (arg, param) in args.iter().zip(&params) {
            let param_ty = self.symbols.variable(*param).map_or(arg.ty, |var| var.ty);
            self.expect_type(param_ty, arg.ty, arg.location)?;
        }

        Ok(Expr::new(ExprKind::Call { callee, args }, return_type, name.location))
    }

    /// Parse `(expr, expr; ...)`: arguments are separated by `,` or `;`
    fn argument_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.consume(TokenKind::LParen)?;

        let mut args = Vec::new();
        if self.match_token(TokenKind::RParen)? {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);

            let separator =
                self.consume_any(&[TokenKind::Comma, TokenKind::Semicolon, TokenKind::RParen])?;
            if separator.kind == TokenKind::RParen {
                return Ok(args);
            }
        }
    }
}

fn invalid_literal(token: &Token) -> ParseError {
    ParseError::InvalidLiteral {
        lexeme: token.lexeme.clone(),
        location: token.location,
    }
}
