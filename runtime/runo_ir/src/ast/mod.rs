//! AST node definitions.
//!
//! # Module Structure
//!
//! - `expr`: expression nodes and the selector syntax
//! - `stmt`: top-level statement nodes

mod expr;
mod stmt;

pub use expr::{
    Apply, Expr, IfThenElse, Lambda, MatchCase, PatternMatch, Selector, SelectorTest, TupleElement,
};
pub use stmt::{Bind, BindValue, Flow, Program, Stmt, TermDef};
