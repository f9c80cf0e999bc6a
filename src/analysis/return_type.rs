//! Return type inference for function bodies.
//!
//! Functions do not declare a return type. Once a body has been translated,
//! every `return` reachable through blocks, both `if` branches and `while`
//! bodies is collected, and all of them must agree on a single type.

use crate::parser::ast::{Block, SourceLocation, Stmt};
use crate::symbols::EntryId;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReturnTypeError {
    /// `location` is the first `return` whose type differs from the first one
    #[error("return at {location} disagrees with the earlier return type")]
    Inconsistent { location: SourceLocation },

    #[error("no reachable return statement")]
    NoReturn,
}

/// Type and position of every reachable `return`, in source order.
pub fn collect_return_types(body: &Block) -> Vec<(EntryId, SourceLocation)> {
    let mut types = Vec::new();
    visit_block(body, &mut types);
    types
}

/// The single type shared by all returns in `body`.
pub fn resolve_return_type(body: &Block) -> Result<EntryId, ReturnTypeError> {
    let types = collect_return_types(body);
    let (&(first, _), rest) = types.split_first().ok_or(ReturnTypeError::NoReturn)?;

    match rest.iter().find(|(ty, _)| *ty != first) {
        Some(&(_, location)) => Err(ReturnTypeError::Inconsistent { location }),
        None => Ok(first),
    }
}

fn visit_block(block: &Block, types: &mut Vec<(EntryId, SourceLocation)>) {
    for stmt in &block.stmts {
        visit_stmt(stmt, types);
    }
}

fn visit_stmt(stmt: &Stmt, types: &mut Vec<(EntryId, SourceLocation)>) {
    match stmt {
        Stmt::Block(block) => visit_block(block, types),
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => {
            visit_stmt(then_branch, types);
            if let Some(else_branch) = else_branch {
                visit_stmt(else_branch, types);
            }
        }
        Stmt::While { body, .. } => visit_stmt(body, types),
        Stmt::Return { expr, .. } => types.push((expr.ty, *stmt.location())),
        Stmt::Expr { .. } | Stmt::VarDecl(_) => {}
    }
}
