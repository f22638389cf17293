//! Evaluation of expressions and statements.
//!
//! - `call`: the shared calling convention (currying, saturation,
//!   over-application) for all three callable variants
//! - `expr`: the pure expression evaluator
//! - `pattern`: pattern-match evaluation
//! - `statement`: top-level statements, flow wiring, pipelines

pub mod call;
pub mod expr;
pub mod pattern;
pub mod statement;
