//! Pretty-printing for translated programs.
//!
//! Every declaration is shown with its resolved types. Variables also show
//! their scope kind and blocks the scope they opened, e.g.
//!
//! ```text
//! var g: int [global] = 1
//! fn f(a: int @0) -> int
//!   block #2
//!     var b: int [local] = (a + g)
//!     return b : int
//! ```
//!
//! The output is deterministic, so tests can compare it as a whole.

use std::fmt::{self, Write};

use crate::parser::ast::*;
use crate::symbols::{EntryId, SymbolTable};

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TreeWriter::new(f, &self.symbols).write_program(self)
    }
}

/// Render `program` into a string.
pub fn format_program(program: &Program) -> String {
    program.to_string()
}

/// Indenting writer used by the `Display` impl of [`Program`].
struct TreeWriter<'a, W> {
    out: W,
    symbols: &'a SymbolTable,
}

impl<'a, W: Write> TreeWriter<'a, W> {
    fn new(out: W, symbols: &'a SymbolTable) -> Self {
        Self { out, symbols }
    }

    fn write_program(&mut self, program: &Program) -> fmt::Result {
        for decl in &program.declarations {
            match decl {
                Decl::Var(var) => self.write_var(var, 0)?,
                Decl::Func(func) => self.write_function(func)?,
            }
        }
        Ok(())
    }

    fn write_function(&mut self, func: &FuncDef) -> fmt::Result {
        let symbols = self.symbols;
        let params = symbols
            .entries_of(func.params)
            .filter_map(|id| symbols.variable(id))
            .map(|param| {
                let ty = symbols.type_name(param.ty);
                match param.offset {
                    Some(offset) => format!("{}: {} @{}", param.name, ty, offset),
                    None => format!("{}: {}", param.name, ty),
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        self.line(
            0,
            format_args!(
                "fn {}({}) -> {}",
                func.name,
                params,
                symbols.type_name(func.return_type)
            ),
        )?;
        self.write_block(&func.body, 1)
    }

    fn write_block(&mut self, block: &Block, indent: usize) -> fmt::Result {
        self.line(indent, format_args!("block #{}", block.scope.to_raw()))?;
        for stmt in &block.stmts {
            self.write_stmt(stmt, indent + 1)?;
        }
        Ok(())
    }

    fn write_var(&mut self, decl: &VarDecl, indent: usize) -> fmt::Result {
        let symbols = self.symbols;
        let init = self.expr(&decl.init);
        let Some(var) = symbols.variable(decl.var) else {
            return self.line(indent, format_args!("var ? = {}", init));
        };
        self.line(
            indent,
            format_args!(
                "var {}: {} [{}] = {}",
                var.name,
                symbols.type_name(var.ty),
                var.kind,
                init
            ),
        )
    }

    fn write_stmt(&mut self, stmt: &Stmt, indent: usize) -> fmt::Result {
        let symbols = self.symbols;
        match stmt {
            Stmt::Block(block) => self.write_block(block, indent),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let cond = self.expr(condition);
                self.line(indent, format_args!("if {}", cond))?;
                self.write_stmt(then_branch, indent + 1)?;
                if let Some(else_branch) = else_branch {
                    self.line(indent, format_args!("else"))?;
                    self.write_stmt(else_branch, indent + 1)?;
                }
                Ok(())
            }
            Stmt::While {
                condition, body, ..
            } => {
                let cond = self.expr(condition);
                self.line(indent, format_args!("while {}", cond))?;
                self.write_stmt(body, indent + 1)
            }
            Stmt::Return { expr, .. } => {
                let value = self.expr(expr);
                let ty = symbols.type_name(expr.ty);
                self.line(indent, format_args!("return {} : {}", value, ty))
            }
            Stmt::Expr { expr, .. } => {
                let value = self.expr(expr);
                let ty = symbols.type_name(expr.ty);
                self.line(indent, format_args!("{} : {}", value, ty))
            }
            Stmt::VarDecl(decl) => self.write_var(decl, indent),
        }
    }

    fn expr(&self, expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::Binary { op, lhs, rhs } => {
                format!("({} {} {})", self.expr(lhs), op.symbol(), self.expr(rhs))
            }
            ExprKind::Call { callee, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.expr(arg))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}({})", self.name(*callee), args)
            }
            ExprKind::Variable(var) => self.name(*var).to_string(),
            ExprKind::Literal(lit) => match lit {
                Literal::Int(n) => n.to_string(),
                Literal::Float(x) => format!("{:?}", x),
                Literal::Bool(b) => b.to_string(),
                Literal::Str(s) => format!("{:?}", s),
            },
        }
    }

    fn name(&self, id: EntryId) -> &'a str {
        let symbols = self.symbols;
        symbols.entry(id).name()
    }

    fn line(&mut self, indent: usize, args: fmt::Arguments<'_>) -> fmt::Result {
        for _ in 0..indent {
            self.out.write_str("  ")?;
        }
        self.out.write_fmt(args)?;
        self.out.write_char('\n')
    }
}
