//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure:
//! the one-token lookahead, the current-scope pointer, and the helpers the
//! grammar rules share.
//!
//! # Parser Architecture
//!
//! The Parser is a single-pass recursive descent translator:
//! - This module: Parser struct, helper methods, and `program()`
//! - `declarations`: variable and function declarations
//! - `statements`: blocks, control flow, `for` desugaring
//! - `expressions`: the precedence hierarchy and name/type binding
//!
//! Scopes are built while parsing. Every name is resolved at the point it is
//! read, so the current scope must always match the source position.
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::ast::*;
use crate::parser::errors::{Expected, ParseError};
use crate::parser::lexer::{Lexer, Token, TokenKind, TokenSource};
use crate::symbols::{Entry, EntryId, ScopeId, SymbolTable, TypeInfo, BUILTIN_TYPES};

/// Recursive descent translator
pub struct Parser<S = Lexer> {
    source: S,
    lookahead: Token,
    pub(crate) symbols: SymbolTable,
    pub(crate) current: Option<ScopeId>,
}

impl Parser<Lexer> {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        Self::from_source(Lexer::new(source))
    }
}

impl<S: TokenSource> Parser<S> {
    /// Build a parser over any token source. The first token is pulled
    /// immediately to fill the lookahead.
    pub fn from_source(mut source: S) -> Result<Self, ParseError> {
        let lookahead = source.next_token()?;
        Ok(Self {
            source,
            lookahead,
            symbols: SymbolTable::new(),
            current: None,
        })
    }

    /// Translate the whole input.
    ///
    /// Seeds the root scope with the built-in types, then parses
    /// declarations until end of input. On return the parser is outside of
    /// every scope.
    pub fn program(&mut self) -> Result<Program, ParseError> {
        let root = self.symbols.root();
        self.current = Some(root);

        for (name, size) in BUILTIN_TYPES {
            let info = TypeInfo {
                name: name.to_string(),
                size,
            };
            let loc = self.current_location();
            self.define(name, info, loc)?;
        }

        let mut declarations = Vec::new();
        while !self.check(TokenKind::Eof) {
            let decl = self.declaration(declarations.len())?;
            declarations.push(decl);
        }

        self.current = self.symbols.parent(root);
        log::debug!(
            "translated {} declarations in {} scopes",
            declarations.len(),
            self.symbols.scope_count()
        );

        Ok(Program {
            declarations,
            symbols: std::mem::take(&mut self.symbols),
        })
    }

    /// The scope names are currently defined in, `None` before and after
    /// `program()`.
    pub fn current_scope(&self) -> Option<ScopeId> {
        self.current
    }

    // ===== Scope helpers =====

    pub(crate) fn scope(&self) -> ScopeId {
        self.current.unwrap_or_else(|| self.symbols.root())
    }

    /// Open a child of the current scope and make it current.
    pub(crate) fn enter_scope(&mut self) -> ScopeId {
        let child = self.symbols.add_child(self.scope());
        log::debug!("enter scope {:?} (parent {:?})", child, self.current);
        self.current = Some(child);
        child
    }

    /// Make the parent of `scope` current again.
    pub(crate) fn exit_scope(&mut self, scope: ScopeId) {
        debug_assert_eq!(self.current, Some(scope));
        self.current = self.symbols.parent(scope);
        log::debug!("exit scope {:?}", scope);
    }

    pub(crate) fn define(
        &mut self,
        name: &str,
        entry: impl Into<Entry>,
        location: SourceLocation,
    ) -> Result<EntryId, ParseError> {
        let scope = self.scope();
        self.symbols
            .define(scope, name, entry)
            .map_err(|err| ParseError::from_symbol(err, location))
    }

    pub(crate) fn lookup(
        &self,
        name: &str,
        location: SourceLocation,
    ) -> Result<EntryId, ParseError> {
        self.symbols
            .lookup(self.scope(), name)
            .map_err(|err| ParseError::from_symbol(err, location))
    }

    /// Resolve `name` and require it to be a type entry.
    pub(crate) fn lookup_type(
        &self,
        name: &str,
        location: SourceLocation,
    ) -> Result<EntryId, ParseError> {
        let id = self.lookup(name, location)?;
        match self.symbols.entry(id) {
            Entry::Type(_) => Ok(id),
            other => Err(ParseError::NotAType {
                name: name.to_string(),
                role: other.role(),
                location,
            }),
        }
    }

    /// Fail with `TypeMismatch` unless `found` is the same type entry as
    /// `expected`.
    pub(crate) fn expect_type(
        &self,
        expected: EntryId,
        found: EntryId,
        location: SourceLocation,
    ) -> Result<(), ParseError> {
        if expected == found {
            return Ok(());
        }
        Err(ParseError::TypeMismatch {
            expected: self.symbols.type_name(expected).to_string(),
            found: self.symbols.type_name(found).to_string(),
            location,
        })
    }

    /// Require `expr` to have the `bool` type visible from the current scope.
    pub(crate) fn expect_bool(&self, expr: &Expr) -> Result<(), ParseError> {
        let bool_ty = self.lookup_type("bool", expr.location)?;
        self.expect_type(bool_ty, expr.ty, expr.location)
    }

    // ===== Token helpers =====

    pub(crate) fn peek(&self) -> &Token {
        &self.lookahead
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.lookahead.location
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.lookahead.kind == kind
    }

    pub(crate) fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.lookahead.kind)
    }

    /// Replace the lookahead with the next token and return the old one.
    pub(crate) fn advance(&mut self) -> Result<Token, ParseError> {
        let next = self.source.next_token()?;
        Ok(std::mem::replace(&mut self.lookahead, next))
    }

    /// Consume the lookahead if it is `kind`.
    pub(crate) fn match_token(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn consume(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        self.consume_any(&[kind])
    }

    pub(crate) fn consume_any(&mut self, kinds: &[TokenKind]) -> Result<Token, ParseError> {
        if self.check_any(kinds) {
            self.advance()
        } else {
            Err(self.unexpected(kinds))
        }
    }

    pub(crate) fn unexpected(&self, expected: &[TokenKind]) -> ParseError {
        ParseError::UnexpectedToken {
            found: self.lookahead.kind,
            lexeme: self.lookahead.lexeme.clone(),
            expected: Expected(expected.to_vec()),
            location: self.lookahead.location,
        }
    }
}
