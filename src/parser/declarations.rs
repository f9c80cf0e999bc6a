//! Declaration parsing implementation
//!
//! This module handles the two declaration forms:
//!
//! - Variable declarations: `var name = expr;` (top level or in a block)
//! - Function definitions: `name(param: type, ...) { ... }` (top level only)
//!
//! # Grammar
//!
//! ```text
//! declaration  ::= var_decl | function_def
//! var_decl     ::= "var" identifier "=" assignment ";"
//! function_def ::= identifier "(" params ")" block
//! params       ::= (identifier ":" identifier ("," identifier ":" identifier)*)?
//! ```
//!
//! A function only becomes visible once its body is parsed and its return
//! type is known, so calls always see a complete signature.

use crate::analysis::return_type::{resolve_return_type, ReturnTypeError};
use crate::parser::ast::*;
use crate::parser::errors::ParseError;
use crate::parser::lexer::{TokenKind, TokenSource};
use crate::parser::parse::Parser;
use crate::symbols::{DeclId, EntryId, Function, ScopeKind, Variable};

impl<S: TokenSource> Parser<S> {
    /// Parse a top-level declaration; `index` is the slot it will occupy in
    /// the program's declaration list.
    pub(crate) fn declaration(&mut self, index: usize) -> Result<Decl, ParseError> {
        if self.check(TokenKind::Var) {
            Ok(Decl::Var(self.var_declaration()?))
        } else if self.check(TokenKind::Ident) {
            Ok(Decl::Func(self.function_definition(DeclId::from_index(index))?))
        } else {
            Err(self.unexpected(&[TokenKind::Var, TokenKind::Ident]))
        }
    }

    /// Parse `var name = init;`
    ///
    /// The initializer is translated before `name` is defined, so it cannot
    /// refer to the variable being declared.
    pub(crate) fn var_declaration(&mut self) -> Result<VarDecl, ParseError> {
        let loc = self.consume(TokenKind::Var)?.location;
        let name = self.consume(TokenKind::Ident)?;
        self.consume(TokenKind::Eq)?;
        let init = self.parse_expression()?;
        self.consume(TokenKind::Semicolon)?;

        let kind = if self.symbols.parent(self.scope()).is_none() {
            ScopeKind::Global
        } else {
            ScopeKind::Local
        };
        let var = self.define(
            &name.lexeme,
            Variable::new(name.lexeme.as_str(), init.ty, kind),
            name.location,
        )?;

        Ok(VarDecl {
            var,
            init,
            location: loc,
        })
    }

    /// Parse `name(params) { body }` and register it in the enclosing scope.
    pub(crate) fn function_definition(&mut self, decl: DeclId) -> Result<FuncDef, ParseError> {
        let name = self.consume(TokenKind::Ident)?;
        let loc = name.location;

        let params_scope = self.enter_scope();
        let params = self.parameter_list()?;
        let body = self.block()?;
        self.exit_scope(params_scope);

        let return_type = resolve_return_type(&body).map_err(|err| match err {
            ReturnTypeError::Inconsistent { location } => ParseError::InconsistentReturnType {
                function: name.lexeme.clone(),
                location,
            },
            ReturnTypeError::NoReturn => ParseError::MissingReturn {
                function: name.lexeme.clone(),
                location: loc,
            },
        })?;

        let entry = self.define(
            &name.lexeme,
            Function {
                name: name.lexeme.clone(),
                decl,
                params,
                return_type,
            },
            loc,
        )?;
        log::debug!(
            "function '{}' returns {}",
            name.lexeme,
            self.symbols.type_name(return_type)
        );

        Ok(FuncDef {
            name: name.lexeme,
            entry,
            params: params_scope,
            body,
            return_type,
            location: loc,
        })
    }

    /// Parse `(name: type, ...)` into the current (parameter) scope.
    ///
    /// Each parameter's offset is the total size of the ones before it.
    fn parameter_list(&mut self) -> Result<Vec<EntryId>, ParseError> {
        self.consume(TokenKind::LParen)?;

        let mut params = Vec::new();
        let mut offset = 0;
        if self.match_token(TokenKind::RParen)? {
            return Ok(params);
        }

        loop {
            let name = self.consume(TokenKind::Ident)?;
            self.consume(TokenKind::Colon)?;
            let type_name = self.consume(TokenKind::Ident)?;

            let ty = self.lookup_type(&type_name.lexeme, type_name.location)?;
            let size = self.symbols.type_info(ty).map_or(0, |info| info.size);

            let var =
                Variable::new(name.lexeme.as_str(), ty, ScopeKind::Parameter).with_offset(offset);
            params.push(self.define(&name.lexeme, var, name.location)?);
            offset += size;

            if self.consume_any(&[TokenKind::Comma, TokenKind::RParen])?.kind == TokenKind::RParen {
                return Ok(params);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::errors::ParseError;
    use crate::parser::parse::Parser;
    use crate::symbols::ScopeKind;

    fn parse(source: &str) -> Result<Program, ParseError> {
        Parser::new(source)?.program()
    }

    #[test]
    fn test_parameter_offsets() {
        let program = parse("f(a: int, b: bool, c: float) { return c; }").unwrap();
        let func = program.function("f").unwrap();

        let params: Vec<_> = program
            .symbols
            .entries_of(func.params)
            .map(|id| program.symbols.variable(id).unwrap().clone())
            .collect();

        assert_eq!(params.len(), 3);
        assert_eq!(params[0].name, "a");
        assert_eq!(params[0].offset, Some(0));
        assert_eq!(params[1].offset, Some(4));
        assert_eq!(params[2].offset, Some(5));
        assert!(params.iter().all(|p| p.kind == ScopeKind::Parameter));
        assert_eq!(program.symbols.type_name(func.return_type), "float");
    }

    #[test]
    fn test_function_entry_points_back_at_decl() {
        let program = parse("var g = 1; f() { return g; }").unwrap();
        let root = program.symbols.root();
        let entry = program.symbols.lookup_local(root, "f").unwrap();
        let func = program.symbols.function(entry).unwrap();

        assert!(matches!(program.decl(func.decl), Some(Decl::Func(def)) if def.name == "f"));
        assert_eq!(program.symbols.type_name(func.return_type), "int");
    }

    #[test]
    fn test_scope_tree_shape() {
        let program = parse("f(a: int) { var b = a; return b; }").unwrap();
        let func = program.function("f").unwrap();
        let symbols = &program.symbols;

        assert_eq!(symbols.parent(func.params), Some(symbols.root()));
        assert_eq!(symbols.parent(func.body.scope), Some(func.params));

        let b = symbols.lookup_local(func.body.scope, "b").unwrap();
        assert_eq!(symbols.variable(b).unwrap().kind, ScopeKind::Local);
        assert!(symbols.lookup_local(func.params, "b").is_none());
    }

    #[test]
    fn test_unknown_parameter_type() {
        let err = parse("f(a: number) { return a; }").unwrap_err();
        assert!(matches!(err, ParseError::UndefinedName { ref name, .. } if name == "number"));
    }

    #[test]
    fn test_parameter_type_must_be_a_type() {
        let err = parse("var x = 1; f(a: x) { return a; }").unwrap_err();
        assert!(matches!(
            err,
            ParseError::NotAType { ref name, role: "variable", .. } if name == "x"
        ));
    }

    #[test]
    fn test_duplicate_parameter() {
        let err = parse("f(a: int, a: int) { return a; }").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateName { ref name, .. } if name == "a"));
    }

    #[test]
    fn test_function_name_clashes_with_global() {
        let err = parse("var f = 1; f() { return 2; }").unwrap_err();
        assert!(matches!(err, ParseError::DuplicateName { ref name, .. } if name == "f"));
    }

    #[test]
    fn test_self_reference_in_initializer() {
        let err = parse("var x = x;").unwrap_err();
        assert!(matches!(err, ParseError::UndefinedName { ref name, .. } if name == "x"));
    }

    #[test]
    fn test_recursion_is_rejected() {
        let err = parse("f(n: int) { return f(n); }").unwrap_err();
        assert!(matches!(err, ParseError::UndefinedName { ref name, .. } if name == "f"));
    }
}
