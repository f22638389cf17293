//! Runtime selectors: conjunctions of atomic binding predicates.
//!
//! A selector resolves a *class* of bindings rather than one name, e.g.
//! "all pins whose `class` metadata is `digital`". The AST form
//! ([`runo_ir::Selector`]) may contain attribute value expressions; building
//! the runtime form evaluates them in the selecting scope, after which
//! matching is a pure predicate.

use crate::environment::{Binding, Env};
use crate::errors::EvalError;
use crate::exec::expr;
use crate::value::Value;

/// The metadata key `.class` selectors test.
const CLASS_KEY: &str = "class";

/// An ordered conjunction of atomic tests; a binding is selected only if
/// every test holds.
#[derive(Clone, Debug, PartialEq)]
pub struct Selector {
    tests: Vec<SelectorTest>,
}

/// One atomic selector test.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectorTest {
    /// The binding's identifier equals the given name.
    Id(String),
    /// The binding's metadata entry under `key` equals `value`.
    Meta { key: String, value: Value },
}

impl Selector {
    pub fn new(tests: Vec<SelectorTest>) -> Self {
        Selector { tests }
    }

    /// Build the runtime selector from its AST form, evaluating attribute
    /// value expressions in `env`.
    pub fn from_ast(env: &Env, ast: &runo_ir::Selector) -> Result<Selector, EvalError> {
        let mut tests = Vec::with_capacity(ast.tests.len());
        for test in &ast.tests {
            tests.push(match test {
                runo_ir::SelectorTest::Id(name) => SelectorTest::Id(name.clone()),
                runo_ir::SelectorTest::Class(name) => SelectorTest::Meta {
                    key: CLASS_KEY.to_string(),
                    value: Value::text(name),
                },
                runo_ir::SelectorTest::Attribute { key, value } => SelectorTest::Meta {
                    key: key.clone(),
                    value: expr::eval(env, value)?,
                },
            });
        }
        Ok(Selector { tests })
    }

    /// Whether every test holds for `(id, binding)`.
    pub fn matches(&self, id: &str, binding: &Binding) -> bool {
        self.tests.iter().all(|test| test.matches(id, binding))
    }
}

impl SelectorTest {
    fn matches(&self, id: &str, binding: &Binding) -> bool {
        match self {
            SelectorTest::Id(name) => name == id,
            SelectorTest::Meta { key, value } => {
                binding.meta.get(key).is_some_and(|v| v == value)
            }
        }
    }
}
