// AST (Abstract Syntax Tree) definitions
//
// Nodes never copy symbol data; they hold handles into the program's
// `SymbolTable`, which owns every scope and entry.

use crate::symbols::{DeclId, EntryId, ScopeId, SymbolTable};
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Assign,
    // Logical
    Or,
    And,
    // Comparison
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Assign => "=",
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge | BinOp::Eq | BinOp::Ne
        )
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `callee` is the function's entry
    Call { callee: EntryId, args: Vec<Expr> },
    /// Read of a variable or parameter entry
    Variable(EntryId),
    Literal(Literal),
}

/// An expression together with its resolved type entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: EntryId,
    pub location: SourceLocation,
}

impl Expr {
    pub fn new(kind: ExprKind, ty: EntryId, location: SourceLocation) -> Self {
        Self { kind, ty, location }
    }
}

/// `var name = init;`, where `var` is the variable's entry.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub var: EntryId,
    pub init: Expr,
    pub location: SourceLocation,
}

/// A brace-delimited statement list with its own scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub scope: ScopeId,
    pub stmts: Vec<Stmt>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDef {
    pub name: String,
    /// The `Function` entry registered in the enclosing scope
    pub entry: EntryId,
    /// Scope holding the parameters; the body scope is its child
    pub params: ScopeId,
    pub body: Block,
    pub return_type: EntryId,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Block),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        location: SourceLocation,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    Return {
        expr: Expr,
        location: SourceLocation,
    },
    Expr {
        expr: Expr,
        location: SourceLocation,
    },
    VarDecl(VarDecl),
}

impl Stmt {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Stmt::Block(block) => &block.location,
            Stmt::If { location, .. } => location,
            Stmt::While { location, .. } => location,
            Stmt::Return { location, .. } => location,
            Stmt::Expr { location, .. } => location,
            Stmt::VarDecl(decl) => &decl.location,
        }
    }
}

/// Top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Var(VarDecl),
    Func(FuncDef),
}

/// Translated program: the declarations plus the symbol arena they refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub declarations: Vec<Decl>,
    pub symbols: SymbolTable,
}

impl Program {
    pub fn decl(&self, id: DeclId) -> Option<&Decl> {
        self.declarations.get(id.index())
    }

    /// Function definition registered under `name` in the root scope.
    pub fn function(&self, name: &str) -> Option<&FuncDef> {
        let entry = self.symbols.lookup_local(self.symbols.root(), name)?;
        let func = self.symbols.function(entry)?;
        match self.decl(func.decl)? {
            Decl::Func(def) => Some(def),
            Decl::Var(_) => None,
        }
    }
}
