//! Top-level statement nodes.

use crate::Ident;

use super::expr::{Apply, Expr};

/// A complete program: statements executed left to right over one root
/// environment.
pub type Program = Vec<Stmt>;

/// A top-level statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Bind(Bind),
    Flow(Flow),
    TermDef(TermDef),
}

/// `id : <expr>` or `id : <flow>` installs a new binding. Bindings are
/// create-once; rebinding an identifier in the same scope is an error.
#[derive(Clone, Debug, PartialEq)]
pub struct Bind {
    pub identifier: Ident,
    pub value: BindValue,
}

/// The right-hand side of a bind: an ordinary expression, or a flow whose
/// composed pipeline becomes the bound value (and, depending on the flow's
/// endpoints, a driver or function binding).
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Expr(Expr),
    Flow(Flow),
}

/// `[source] { op1; op2; ... } [destination]` is a reactive pipeline. Each
/// operation is an application whose argument list gets the prior pipeline
/// value implicitly prepended.
#[derive(Clone, Debug, PartialEq)]
pub struct Flow {
    pub source: Option<Expr>,
    pub operations: Vec<Apply>,
    pub destination: Option<Ident>,
}

/// `Term Name p1 p2 ...` introduces an algebraic data tag with arity equal
/// to the parameter count.
#[derive(Clone, Debug, PartialEq)]
pub struct TermDef {
    pub name: Ident,
    pub parameters: Vec<Ident>,
}

impl Stmt {
    /// Build a bind statement with an expression right-hand side.
    pub fn bind(identifier: impl Into<Ident>, expr: Expr) -> Self {
        Stmt::Bind(Bind {
            identifier: identifier.into(),
            value: BindValue::Expr(expr),
        })
    }

    /// Build a bind statement with a flow right-hand side.
    pub fn bind_flow(identifier: impl Into<Ident>, flow: Flow) -> Self {
        Stmt::Bind(Bind {
            identifier: identifier.into(),
            value: BindValue::Flow(flow),
        })
    }

    /// Build a term definition statement.
    pub fn term(name: impl Into<Ident>, parameters: Vec<Ident>) -> Self {
        Stmt::TermDef(TermDef {
            name: name.into(),
            parameters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bind_helper_wraps_an_expression() {
        assert_eq!(
            Stmt::bind("x", Expr::number("1")),
            Stmt::Bind(Bind {
                identifier: "x".to_string(),
                value: BindValue::Expr(Expr::number("1")),
            })
        );
    }

    #[test]
    fn bind_flow_helper_keeps_the_flow_endpoints() {
        let flow = Flow {
            source: Some(Expr::reference("clock")),
            operations: vec![Apply::of("toText", vec![])],
            destination: Some("display".to_string()),
        };
        let Stmt::Bind(bind) = Stmt::bind_flow("y", flow.clone()) else {
            panic!("expected Stmt::Bind")
        };
        assert_eq!(bind.identifier, "y");
        assert_eq!(bind.value, BindValue::Flow(flow));
    }

    #[test]
    fn term_helper_records_arity_through_parameters() {
        assert_eq!(
            Stmt::term("Pair", vec!["a".into(), "b".into()]),
            Stmt::TermDef(TermDef {
                name: "Pair".to_string(),
                parameters: vec!["a".to_string(), "b".to_string()],
            })
        );
    }
}
