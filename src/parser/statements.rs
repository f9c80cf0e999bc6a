//! Statement parsing implementation
//!
//! This module handles parsing of all statement types:
//!
//! - Variable declarations: `var x = 42;`
//! - Control flow: `if`, `while`, `for`
//! - `return expr;`
//! - Compound statements: `{ ... }`
//! - Expression statements: calls, assignments
//!
//! # Grammar
//!
//! ```text
//! statement ::= block | if_stmt | while_stmt | for_stmt
//!             | var_decl | return_stmt | expr_stmt
//! block     ::= "{" statement* "}"
//! for_stmt  ::= "for" "(" (var_decl | expr_stmt) assignment ";" assignment ")" statement
//! ```
//!
//! `for` has no node of its own; it is rewritten into a block holding the
//! initializer and a `while` loop.

use crate::parser::ast::*;
use crate::parser::errors::ParseError;
use crate::parser::lexer::{TokenKind, TokenSource};
use crate::parser::parse::Parser;

impl<S: TokenSource> Parser<S> {
    /// Parse `{ statements }` in a fresh child scope
    pub(crate) fn block(&mut self) -> Result<Block, ParseError> {
        let loc = self.consume(TokenKind::LBrace)?.location;
        let scope = self.enter_scope();

        let mut stmts = Vec::new();
        while !self.check(TokenKind::RBrace) {
            stmts.push(self.statement()?);
        }
        self.consume(TokenKind::RBrace)?;
        self.exit_scope(scope);

        Ok(Block {
            scope,
            stmts,
            location: loc,
        })
    }

    /// Parse a statement
    pub(crate) fn statement(&mut self) -> Result<Stmt, ParseError> {
        let kind = self.peek().kind;
        match kind {
            TokenKind::LBrace => Ok(Stmt::Block(self.block()?)),
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Var => Ok(Stmt::VarDecl(self.var_declaration()?)),
            TokenKind::Return => self.return_statement(),
            _ if self.check_any(&TokenKind::EXPR_START) => self.expression_statement(),
            _ => {
                let mut expected = vec![
                    TokenKind::LBrace,
                    TokenKind::If,
                    TokenKind::While,
                    TokenKind::For,
                    TokenKind::Var,
                    TokenKind::Return,
                ];
                expected.extend(TokenKind::EXPR_START);
                Err(self.unexpected(&expected))
            }
        }
    }

    fn if_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.consume(TokenKind::If)?.location;
        self.consume(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect_bool(&condition)?;
        self.consume(TokenKind::RParen)?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.match_token(TokenKind::Else)? {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            location: loc,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.consume(TokenKind::While)?.location;
        self.consume(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect_bool(&condition)?;
        self.consume(TokenKind::RParen)?;

        let body = Box::new(self.statement()?);

        Ok(Stmt::While {
            condition,
            body,
            location: loc,
        })
    }

    /// Parse `for (init test; post) body` as
    ///
    /// ```text
    /// { init; while (test) { body; post; } }
    /// ```
    ///
    /// The outer block scopes the loop variable; the loop body block gets a
    /// scope of its own.
    fn for_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.consume(TokenKind::For)?.location;
        self.consume(TokenKind::LParen)?;

        let outer = self.enter_scope();

        let init = if self.check(TokenKind::Var) {
            Stmt::VarDecl(self.var_declaration()?)
        } else {
            self.expression_statement()?
        };

        let test = self.parse_expression()?;
        self.expect_bool(&test)?;
        self.consume(TokenKind::Semicolon)?;

        let post_loc = self.current_location();
        let post = self.parse_expression()?;
        self.consume(TokenKind::RParen)?;

        let inner = self.enter_scope();
        let body = self.statement()?;
        self.exit_scope(inner);

        let loop_body = Block {
            scope: inner,
            stmts: vec![
                body,
                Stmt::Expr {
                    expr: post,
                    location: post_loc,
                },
            ],
            location: loc,
        };
        let while_stmt = Stmt::While {
            condition: test,
            body: Box::new(Stmt::Block(loop_body)),
            location: loc,
        };

        self.exit_scope(outer);

        Ok(Stmt::Block(Block {
            scope: outer,
            stmts: vec![init, while_stmt],
            location: loc,
        }))
    }

    /// Parse `return expr;`. The expression is mandatory.
    fn return_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.consume(TokenKind::Return)?.location;
        let expr = self.parse_expression()?;
        self.consume(TokenKind::Semicolon)?;

        Ok(Stmt::Return {
            expr,
            location: loc,
        })
    }

    fn expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        let expr = self.parse_expression()?;
        self.consume(TokenKind::Semicolon)?;

        Ok(Stmt::Expr {
            expr,
            location: loc,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::errors::ParseError;
    use crate::parser::lexer::TokenKind;
    use crate::parser::parse::Parser;

    fn parse(source: &str) -> Result<Program, ParseError> {
        Parser::new(source)?.program()
    }

    fn body(program: &Program, name: &str) -> Vec<Stmt> {
        program.function(name).unwrap().body.stmts.clone()
    }

    #[test]
    fn test_if_else_branches() {
        let program = parse("f(a: int) { if (a < 1) return 1; else { return a; } }").unwrap();
        let stmts = body(&program, "f");

        match &stmts[0] {
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                assert!(matches!(condition.kind, ExprKind::Binary { op: BinOp::Lt, .. }));
                assert!(matches!(**then_branch, Stmt::Return { .. }));
                assert!(matches!(else_branch.as_deref(), Some(Stmt::Block(_))));
            }
            other => panic!("Expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_shadowing_in_nested_block() {
        let program = parse("var a = 1; f() { { var a = 2.5; } return a; }").unwrap();
        let symbols = &program.symbols;
        let outer = symbols.lookup_local(symbols.root(), "a").unwrap();
        let stmts = body(&program, "f");

        let inner = match &stmts[0] {
            Stmt::Block(block) => symbols.lookup_local(block.scope, "a").unwrap(),
            other => panic!("Expected block, got {:?}", other),
        };
        assert_ne!(inner, outer);
        assert_eq!(symbols.type_name(symbols.variable(outer).unwrap().ty), "int");
        assert_eq!(symbols.type_name(symbols.variable(inner).unwrap().ty), "float");

        // `return a` after the block sees the outer `a`
        match &stmts[1] {
            Stmt::Return { expr, .. } => assert_eq!(expr.kind, ExprKind::Variable(outer)),
            other => panic!("Expected return, got {:?}", other),
        }
    }

    #[test]
    fn test_redefinition_in_same_block() {
        let err = parse("f() { var a = 1; var a = 2; return a; }").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateName { ref name, .. } if name == "a"));
    }

    #[test]
    fn test_block_local_is_not_visible_outside() {
        let err = parse("f() { { var a = 1; } return a; }").unwrap_err();
        assert!(matches!(err, ParseError::UndefinedName { ref name, .. } if name == "a"));
    }

    #[test]
    fn test_condition_must_be_bool() {
        let err = parse("f() { while (1) { return 1; } return 2; }").unwrap_err();
        match err {
            ParseError::TypeMismatch { expected, found, .. } => {
                assert_eq!(expected, "bool");
                assert_eq!(found, "int");
            }
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_for_desugars_into_block_and_while() {
        let source = "s(n: int) { return n; }
                      f() { for (var i = 0; i < 3; i = i + 1) { s(i); } return 0; }";
        let program = parse(source).unwrap();
        let symbols = &program.symbols;
        let stmts = body(&program, "f");

        let Stmt::Block(outer) = &stmts[0] else {
            panic!("Expected desugared block, got {:?}", stmts[0]);
        };
        assert_eq!(outer.stmts.len(), 2);

        let Stmt::VarDecl(init) = &outer.stmts[0] else {
            panic!("Expected loop variable declaration");
        };
        assert_eq!(symbols.variable(init.var).unwrap().name, "i");
        assert_eq!(symbols.lookup_local(outer.scope, "i"), Some(init.var));

        let Stmt::While { condition, body, .. } = &outer.stmts[1] else {
            panic!("Expected while loop");
        };
        match &condition.kind {
            ExprKind::Binary { op, lhs, rhs } => {
                assert_eq!(*op, BinOp::Lt);
                assert_eq!(lhs.kind, ExprKind::Variable(init.var));
                assert_eq!(rhs.kind, ExprKind::Literal(Literal::Int(3)));
            }
            other => panic!("Expected comparison, got {:?}", other),
        }

        let Stmt::Block(loop_body) = body.as_ref() else {
            panic!("Expected loop body block");
        };
        assert_eq!(loop_body.stmts.len(), 2);

        // original body first
        let Stmt::Block(user_body) = &loop_body.stmts[0] else {
            panic!("Expected user body block");
        };
        assert!(matches!(
            &user_body.stmts[0],
            Stmt::Expr { expr: Expr { kind: ExprKind::Call { .. }, .. }, .. }
        ));

        // then the post expression
        match &loop_body.stmts[1] {
            Stmt::Expr { expr, .. } => {
                assert!(matches!(expr.kind, ExprKind::Binary { op: BinOp::Assign, .. }))
            }
            other => panic!("Expected post expression, got {:?}", other),
        }
    }

    #[test]
    fn test_for_variable_does_not_leak() {
        let source = "f() {
            for (var i = 0; i < 3; i = i + 1) { }
            for (var i = 0; i < 3; i = i + 1) { }
            return i;
        }";
        let err = parse(source).unwrap_err();
        assert!(matches!(err, ParseError::UndefinedName { ref name, .. } if name == "i"));
    }

    #[test]
    fn test_bare_return_is_rejected() {
        let err = parse("f() { return; }").unwrap_err();
        match err {
            ParseError::UnexpectedToken { found, expected, .. } => {
                assert_eq!(found, TokenKind::Semicolon);
                assert!(expected.contains(TokenKind::IntLiteral));
            }
            other => panic!("Expected UnexpectedToken, got {:?}", other),
        }
    }

    #[test]
    fn test_unexpected_statement_lists_alternatives() {
        let err = parse("f() { else }").unwrap_err();
        match err {
            ParseError::UnexpectedToken { found, expected, .. } => {
                assert_eq!(found, TokenKind::Else);
                for kind in [TokenKind::If, TokenKind::Var, TokenKind::Ident, TokenKind::LBrace] {
                    assert!(expected.contains(kind));
                }
            }
            other => panic!("Expected UnexpectedToken, got {:?}", other),
        }
    }
}
