//! The pure expression evaluator: `(Env, Expr) -> EvalResult`.

use std::rc::Rc;
use std::str::FromStr;

use bigdecimal::BigDecimal;

use runo_ir::{Apply, Expr, IfThenElse};

use crate::environment::Env;
use crate::errors::{selection_empty, type_mismatch, EvalError, EvalResult};
use crate::exec::{call::call, pattern};
use crate::selector::Selector;
use crate::value::{Args, FunctionValue, TupleValue, Value};

/// Evaluate an expression in the given environment.
pub fn eval(env: &Env, expr: &Expr) -> EvalResult {
    match expr {
        Expr::Reference(name) => env.resolve(name),
        Expr::Number(digits) => parse_number(digits),
        Expr::Text(text) => Ok(Value::text(text)),
        Expr::Tuple(elements) => {
            // Left to right, fail-fast on the first error.
            let mut evaluated = Vec::with_capacity(elements.len());
            for element in elements {
                let value = eval(env, &element.expr)?;
                evaluated.push((element.name.clone(), value));
            }
            Ok(Value::Tuple(Rc::new(TupleValue::from_elements(evaluated))))
        }
        Expr::Lambda(lambda) => Ok(Value::Function(Rc::new(FunctionValue {
            // Captured by reference: the closure shares the scope.
            env: env.clone(),
            params: lambda.params.clone(),
            body: (*lambda.body).clone(),
            curried: Args::new(),
        }))),
        Expr::Apply(apply) => eval_apply(env, apply),
        Expr::Match(node) => pattern::eval_match(env, node),
        Expr::If(node) => eval_if(env, node),
        Expr::Select(ast) => {
            let selector = Selector::from_ast(env, ast)?;
            let values = env.select(&selector)?;
            // The innermost candidate wins when a selector is used as a
            // single-value expression.
            values.into_iter().next().ok_or_else(selection_empty)
        }
    }
}

/// Evaluate a function application.
///
/// The head evaluates first and short-circuits. Argument expressions are all
/// evaluated even when some fail, so independent failures aggregate into one
/// composite error. A non-callable head swallows its arguments and evaluates
/// to itself; this permissive fallback is part of the language, not an error.
pub fn eval_apply(env: &Env, apply: &Apply) -> EvalResult {
    let head = eval(env, &apply.head)?;

    let mut args = Vec::with_capacity(apply.args.len());
    let mut failure: Option<EvalError> = None;
    for arg in &apply.args {
        match eval(env, arg) {
            Ok(value) => args.push(value),
            Err(err) => {
                failure = Some(match failure {
                    Some(prev) => prev.join(err),
                    None => err,
                });
            }
        }
    }
    if let Some(err) = failure {
        return Err(err);
    }

    if head.is_callable() {
        call(&head, &args)
    } else {
        Ok(head)
    }
}

fn eval_if(env: &Env, node: &IfThenElse) -> EvalResult {
    match eval(env, &node.condition)? {
        Value::Bool(true) => eval(env, &node.then),
        Value::Bool(false) => eval(env, &node.otherwise),
        other => Err(type_mismatch(
            "boolean",
            other.type_name(),
            "if condition",
        )),
    }
}

fn parse_number(digits: &str) -> EvalResult {
    BigDecimal::from_str(digits)
        .map(Value::Number)
        .map_err(|_| type_mismatch("decimal digits", format!("`{digits}`"), "number literal"))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests unwrap for brevity")]
mod tests {
    use super::*;
    use crate::errors;
    use pretty_assertions::assert_eq;

    fn env_with(name: &str, value: Value) -> Env {
        let env = Env::root();
        env.bind(name, value).unwrap();
        env
    }

    #[test]
    fn number_literal_parses_to_arbitrary_precision() {
        let env = Env::root();
        let value = eval(&env, &Expr::number("31415926535897932384626433832795028841"));
        assert!(matches!(value, Ok(Value::Number(_))));
    }

    #[test]
    fn malformed_number_literal_is_a_type_mismatch() {
        let env = Env::root();
        assert!(matches!(
            eval(&env, &Expr::number("1x")),
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn reference_resolves_through_the_environment() {
        let env = env_with("x", Value::int(3));
        assert_eq!(eval(&env, &Expr::reference("x")).unwrap(), Value::int(3));
    }

    #[test]
    fn lambda_captures_its_environment_by_reference() {
        let env = Env::root();
        let f = eval(&env, &Expr::lambda(vec!["a".into()], Expr::reference("late"))).unwrap();
        // Bound after capture; the shared scope must still see it.
        env.bind("late", Value::int(9)).unwrap();
        assert_eq!(call(&f, &[Value::int(0)]).unwrap(), Value::int(9));
    }

    #[test]
    fn application_on_non_callable_head_returns_the_head() {
        let env = env_with("x", Value::int(5));
        let apply = Expr::apply(Expr::reference("x"), vec![Expr::number("1")]);
        assert_eq!(eval(&env, &apply).unwrap(), Value::int(5));
    }

    #[test]
    fn sibling_argument_errors_aggregate() {
        let env = env_with(
            "id",
            eval(&Env::root(), &Expr::lambda(vec!["a".into()], Expr::reference("a"))).unwrap(),
        );
        let apply = Expr::apply(
            Expr::reference("id"),
            vec![Expr::reference("nope1"), Expr::reference("nope2")],
        );
        assert_eq!(
            eval(&env, &apply),
            Err(errors::unresolved_binding("nope1").join(errors::unresolved_binding("nope2")))
        );
    }

    #[test]
    fn condition_must_be_boolean() {
        let env = Env::root();
        let node = Expr::if_then_else(Expr::number("1"), Expr::number("2"), Expr::number("3"));
        assert_eq!(
            eval(&env, &node),
            Err(errors::type_mismatch("boolean", "number", "if condition"))
        );
    }

    #[test]
    fn conditional_evaluates_exactly_one_branch() {
        let env = env_with("t", Value::Bool(true));
        // The untaken branch references an unbound name; it must never
        // evaluate.
        let node = Expr::if_then_else(
            Expr::reference("t"),
            Expr::number("1"),
            Expr::reference("unbound"),
        );
        assert_eq!(eval(&env, &node).unwrap(), Value::int(1));
    }

    #[test]
    fn over_application_surfaces_a_caller_error() {
        // (\a -> a) 1 2: the leftover argument lands on a number.
        let env = Env::root();
        let apply = Expr::apply(
            Expr::lambda(vec!["a".into()], Expr::reference("a")),
            vec![Expr::number("1"), Expr::number("2")],
        );
        assert_eq!(eval(&env, &apply), Err(errors::not_callable("number", 1)));
    }
}
