//! Runo IR - AST node types for the Runo evaluation core.
//!
//! The parser (external to this workspace) produces these nodes; the
//! evaluator in `runo_eval` consumes them. A program is an ordered list of
//! statements:
//!
//! - `Bind` installs a named value (or a named flow) in the current scope
//! - `Flow` declares a `source { op; op; } destination` reactive pipeline
//! - `TermDef` introduces an algebraic data tag (constructor)
//!
//! Expression nodes are one of `Reference | Number | Text | Tuple | Lambda |
//! Apply | Match | If | Select`.
//!
//! The tree is `Box`-based rather than arena-allocated: Runo programs are a
//! handful of statements describing a wiring diagram, not module trees, and
//! node identity never needs to survive the single evaluation pass.

pub mod ast;

pub use ast::{
    Apply, Bind, BindValue, Expr, Flow, IfThenElse, Lambda, MatchCase, PatternMatch, Program,
    Selector, SelectorTest, Stmt, TermDef, TupleElement,
};

/// Identifiers are plain strings; Runo programs are far too small for
/// interning to pay for itself.
pub type Ident = String;
