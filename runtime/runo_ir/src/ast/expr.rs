//! Expression nodes.

use crate::Ident;

/// An expression node.
///
/// Number literals carry the verbatim digit string from the source; the
/// evaluator parses them into arbitrary-precision decimals so that the IR
/// stays free of numeric dependencies.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// An identifier to resolve in the current environment.
    Reference(Ident),
    /// A decimal number literal, verbatim.
    Number(String),
    /// A text literal, verbatim (quotes already stripped by the parser).
    Text(String),
    /// A tuple literal: ordered, optionally named elements.
    Tuple(Vec<TupleElement>),
    /// A lambda literal.
    Lambda(Lambda),
    /// A function application.
    Apply(Apply),
    /// A pattern match over a constructor-tagged value.
    Match(PatternMatch),
    /// A conditional; both branches are mandatory.
    If(IfThenElse),
    /// A selector resolving bindings by identifier and/or metadata.
    Select(Selector),
}

/// One element of a tuple literal. The name is optional; unnamed elements are
/// addressable only by their positional index.
#[derive(Clone, Debug, PartialEq)]
pub struct TupleElement {
    pub name: Option<Ident>,
    pub expr: Expr,
}

/// A lambda literal. The parser guarantees `params` is non-empty.
#[derive(Clone, Debug, PartialEq)]
pub struct Lambda {
    pub params: Vec<Ident>,
    pub body: Box<Expr>,
}

/// A function application. The parser guarantees `args` is non-empty.
#[derive(Clone, Debug, PartialEq)]
pub struct Apply {
    pub head: Box<Expr>,
    pub args: Vec<Expr>,
}

/// One case of a pattern match: a constructor tag, positional parameter
/// names, and a body evaluated in a scope extending the match's scope.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchCase {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Expr,
}

/// A pattern match. Cases are tried in declaration order, first match wins.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternMatch {
    pub target: Box<Expr>,
    pub cases: Vec<MatchCase>,
}

/// A conditional expression.
#[derive(Clone, Debug, PartialEq)]
pub struct IfThenElse {
    pub condition: Box<Expr>,
    pub then: Box<Expr>,
    pub otherwise: Box<Expr>,
}

/// A selector: an ordered conjunction of atomic tests. Every test must hold
/// for a binding to be selected.
#[derive(Clone, Debug, PartialEq)]
pub struct Selector {
    pub tests: Vec<SelectorTest>,
}

/// One atomic selector test.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectorTest {
    /// `#name`: the binding's identifier equals `name`.
    Id(Ident),
    /// `.name`: the binding's `class` metadata entry equals `name`.
    Class(Ident),
    /// `[key=expr]`: the binding's `key` metadata entry equals the value of
    /// `expr` (evaluated in the selecting scope).
    Attribute { key: Ident, value: Expr },
}

impl Expr {
    /// Build a reference node.
    pub fn reference(name: impl Into<Ident>) -> Self {
        Expr::Reference(name.into())
    }

    /// Build a number literal node.
    pub fn number(digits: impl Into<String>) -> Self {
        Expr::Number(digits.into())
    }

    /// Build a text literal node.
    pub fn text(text: impl Into<String>) -> Self {
        Expr::Text(text.into())
    }

    /// Build a lambda node.
    pub fn lambda(params: Vec<Ident>, body: Expr) -> Self {
        Expr::Lambda(Lambda {
            params,
            body: Box::new(body),
        })
    }

    /// Build an application node.
    pub fn apply(head: Expr, args: Vec<Expr>) -> Self {
        Expr::Apply(Apply {
            head: Box::new(head),
            args,
        })
    }

    /// Build a conditional node.
    pub fn if_then_else(condition: Expr, then: Expr, otherwise: Expr) -> Self {
        Expr::If(IfThenElse {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }
}

impl Apply {
    /// Build an application of a named head to the given arguments.
    pub fn of(head: impl Into<Ident>, args: Vec<Expr>) -> Self {
        Apply {
            head: Box::new(Expr::Reference(head.into())),
            args,
        }
    }
}
