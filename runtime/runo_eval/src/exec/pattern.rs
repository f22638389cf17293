//! Pattern matching over constructor-tagged values.
//!
//! A match tries its cases in declaration order and the first case whose tag
//! and arity both fit wins. Tuples match through the reserved `Tuple` tag,
//! binding positional elements only.

use runo_ir::{MatchCase, PatternMatch};

use crate::environment::Env;
use crate::errors::{non_exhaustive_match, not_matchable, EvalResult};
use crate::exec::expr;
use crate::value::Value;

/// Reserved case tag that matches any tuple value.
pub const TUPLE_TAG: &str = "Tuple";

/// Evaluate a pattern match expression.
pub fn eval_match(env: &Env, node: &PatternMatch) -> EvalResult {
    let target = expr::eval(env, &node.target)?;
    match &target {
        Value::Custom(custom) => {
            for case in &node.cases {
                if case.name == custom.tag && case.params.len() == custom.args.len() {
                    return eval_case(env, case, &custom.args);
                }
            }
            Err(non_exhaustive_match(&custom.tag))
        }
        Value::Tuple(tuple) => {
            for case in &node.cases {
                if case.name == TUPLE_TAG && case.params.len() == tuple.len() {
                    return eval_case(env, case, &tuple.positional());
                }
            }
            Err(non_exhaustive_match(TUPLE_TAG))
        }
        other => Err(not_matchable(other.type_name())),
    }
}

/// Run a case body with its parameters bound in a fresh child scope.
fn eval_case(env: &Env, case: &MatchCase, args: &[Value]) -> EvalResult {
    let scope = Env::child(env);
    for (param, arg) in case.params.iter().zip(args) {
        scope.bind(param, arg.clone())?;
    }
    expr::eval(&scope, &case.body)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests unwrap for brevity")]
mod tests {
    use super::*;
    use crate::errors;
    use pretty_assertions::assert_eq;
    use runo_ir::Expr;

    fn match_of(target: Expr, cases: Vec<MatchCase>) -> PatternMatch {
        PatternMatch {
            target: Box::new(target),
            cases,
        }
    }

    fn case(name: &str, params: &[&str], body: Expr) -> MatchCase {
        MatchCase {
            name: name.into(),
            params: params.iter().map(|p| (*p).into()).collect(),
            body,
        }
    }

    #[test]
    fn matching_case_binds_positional_arguments() {
        let env = Env::root();
        env.bind("p", Value::custom("Point", vec![Value::int(1), Value::int(2)]))
            .unwrap();
        let node = match_of(
            Expr::reference("p"),
            vec![case("Point", &["x", "y"], Expr::reference("y"))],
        );
        assert_eq!(eval_match(&env, &node).unwrap(), Value::int(2));
    }

    #[test]
    fn first_fitting_case_wins() {
        let env = Env::root();
        env.bind("v", Value::custom("Just", vec![Value::int(7)]))
            .unwrap();
        let node = match_of(
            Expr::reference("v"),
            vec![
                case("Nothing", &[], Expr::number("0")),
                case("Just", &["a"], Expr::reference("a")),
                case("Just", &["a"], Expr::number("99")),
            ],
        );
        assert_eq!(eval_match(&env, &node).unwrap(), Value::int(7));
    }

    #[test]
    fn arity_must_fit_as_well_as_the_tag() {
        let env = Env::root();
        env.bind("v", Value::custom("Pair", vec![Value::int(1), Value::int(2)]))
            .unwrap();
        let node = match_of(
            Expr::reference("v"),
            vec![case("Pair", &["a"], Expr::reference("a"))],
        );
        assert_eq!(eval_match(&env, &node), Err(errors::non_exhaustive_match("Pair")));
    }

    #[test]
    fn tuples_match_through_the_reserved_tag() {
        let env = Env::root();
        let tuple = Expr::Tuple(vec![
            runo_ir::TupleElement {
                name: Some("x".into()),
                expr: Expr::number("10"),
            },
            runo_ir::TupleElement {
                name: None,
                expr: Expr::number("20"),
            },
        ]);
        let node = match_of(tuple, vec![case(TUPLE_TAG, &["a", "b"], Expr::reference("b"))]);
        assert_eq!(eval_match(&env, &node).unwrap(), Value::int(20));
    }

    #[test]
    fn scalar_targets_are_not_matchable() {
        let env = Env::root();
        let node = match_of(
            Expr::number("1"),
            vec![case("Anything", &[], Expr::number("0"))],
        );
        assert_eq!(eval_match(&env, &node), Err(errors::not_matchable("number")));
    }
}
