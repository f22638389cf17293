//! Statement and flow evaluation.
//!
//! Statements run left to right over one root environment; the first error
//! aborts the run. Flow statements are where the static program turns into a
//! live reactive graph: the pipeline is composed synchronously, listeners are
//! attached, and from then on the host drives the graph by pushing
//! occurrences into its entry-point sinks.

use std::rc::Rc;

use tracing::debug;

use runo_ir::{Apply, Bind, BindValue, Expr, Flow, Stmt, TermDef};

use crate::environment::{Driver, Env};
use crate::errors::{invalid_flow, EvalError, EvalResult};
use crate::exec::expr;
use crate::value::{Args, ConstructorValue, NativeFunction, Value};

/// Reserved identifier holding the prior pipeline value while one operation
/// evaluates. The leading digit keeps it unreachable from program source.
pub const PIPE_SLOT: &str = "0pipe";

/// Execute one top-level statement.
pub fn eval_stmt(env: &Env, stmt: &Stmt) -> Result<(), EvalError> {
    match stmt {
        Stmt::Bind(bind) => eval_bind(env, bind),
        Stmt::Flow(flow) => eval_anonymous_flow(env, flow),
        Stmt::TermDef(term) => eval_term(env, term),
    }
}

fn eval_bind(env: &Env, bind: &Bind) -> Result<(), EvalError> {
    match &bind.value {
        BindValue::Expr(node) => {
            let value = expr::eval(env, node)?;
            env.bind(&bind.identifier, value)
        }
        BindValue::Flow(flow) => eval_named_flow(env, &bind.identifier, flow),
    }
}

/// `Term Name p1 p2 ...` introduces an algebraic data tag.
///
/// A nullary term has nothing left to saturate, so it binds the tagged value
/// itself rather than a zero-arity callable. Terms with parameters bind a
/// `Constructor` of matching arity.
fn eval_term(env: &Env, term: &TermDef) -> Result<(), EvalError> {
    let value = if term.parameters.is_empty() {
        Value::custom(&term.name, Vec::new())
    } else {
        Value::Constructor(Rc::new(ConstructorValue {
            tag: term.name.clone(),
            params: term.parameters.clone(),
            curried: Args::new(),
        }))
    };
    env.bind(&term.name, value)
}

/// A flow on the right-hand side of a bind. The endpoints decide what the
/// name ends up denoting:
///
/// - source and destination: the composed pipeline value, wired to the
///   destination driver;
/// - destination only: a new driver that runs the pipeline on each incoming
///   value before forwarding;
/// - source only: the composed pipeline value, wired to nothing;
/// - neither: a single-argument function running the pipeline on its call
///   argument.
fn eval_named_flow(env: &Env, identifier: &str, flow: &Flow) -> Result<(), EvalError> {
    match (&flow.source, &flow.destination) {
        (Some(source), destination) => {
            let seed = expr::eval(env, source)?;
            let composed = run_pipeline(env, seed, &flow.operations)?;
            if let Some(destination) = destination {
                let sink = env.resolve_driver(destination)?;
                wire_to_driver(&composed, sink);
            }
            env.bind(identifier, composed)
        }
        (None, Some(destination)) => {
            // Output adapter: destination resolves once, at declaration.
            // Incoming values are plain by construction, so the pipeline
            // result forwards directly unless it turns out reactive.
            let sink = env.resolve_driver(destination)?;
            let scope = env.clone();
            let operations = flow.operations.clone();
            let driver: Driver = Rc::new(move |incoming: Value| {
                match run_pipeline(&scope, incoming, &operations) {
                    Ok(value @ (Value::Event(_) | Value::Observable(_))) => {
                        wire_to_driver(&value, Rc::clone(&sink));
                    }
                    Ok(value) => sink(value),
                    Err(err) => debug!(error = %err, "dropping errored occurrence at driver"),
                }
            });
            env.register_driver(identifier, driver)
        }
        (None, None) => env.bind(identifier, pipeline_function(env, identifier, flow)),
    }
}

/// A flow statement with no binding. Without a name there is nothing to bind
/// or register, so both endpoints are mandatory: evaluate the source, thread
/// it through the pipeline, wire the result to the destination driver.
fn eval_anonymous_flow(env: &Env, flow: &Flow) -> Result<(), EvalError> {
    let (Some(source), Some(destination)) = (&flow.source, &flow.destination) else {
        return Err(invalid_flow(
            "an unnamed flow must declare both a source and a destination",
        ));
    };
    let seed = expr::eval(env, source)?;
    let composed = run_pipeline(env, seed, &flow.operations)?;
    let sink = env.resolve_driver(destination)?;
    wire_to_driver(&composed, sink);
    Ok(())
}

/// Thread a value through the operation pipeline. Each operation is an
/// application re-evaluated with the prior pipeline value prepended as its
/// first argument, supplied through a one-binding temporary scope. Each step
/// short-circuits on error.
fn run_pipeline(env: &Env, seed: Value, operations: &[Apply]) -> EvalResult {
    let mut current = seed;
    for operation in operations {
        let scope = Env::child(env);
        scope.bind(PIPE_SLOT, current)?;
        let mut args = Vec::with_capacity(operation.args.len().saturating_add(1));
        args.push(Expr::reference(PIPE_SLOT));
        args.extend(operation.args.iter().cloned());
        let rewritten = Apply {
            head: operation.head.clone(),
            args,
        };
        current = expr::eval_apply(&scope, &rewritten)?;
    }
    Ok(current)
}

/// An endpoint-less flow as a first-class value: a single-argument function
/// whose body runs the pipeline on its call argument.
fn pipeline_function(env: &Env, name: &str, flow: &Flow) -> Value {
    let scope = env.clone();
    let operations = flow.operations.clone();
    Value::Native(Rc::new(NativeFunction {
        name: name.to_owned(),
        arity: 1,
        func: Rc::new(move |args: &[Value]| {
            let seed = args
                .first()
                .cloned()
                .ok_or_else(|| invalid_flow("a pipeline takes exactly one argument"))?;
            run_pipeline(&scope, seed, &operations)
        }),
        curried: Args::new(),
    }))
}

/// Forward a composed pipeline result to a driver sink. Only reactive
/// results drive the destination, through a permanent listener; a plain
/// result is just a value to bind, never a driver invocation. Errored
/// occurrences never reach the sink.
fn wire_to_driver(composed: &Value, sink: Driver) {
    match composed {
        Value::Event(stream) => {
            stream.listen(move |occurrence| match occurrence {
                Ok(value) => sink(value.clone()),
                Err(err) => debug!(error = %err, "dropping errored occurrence at driver"),
            });
        }
        Value::Observable(cell) => {
            cell.listen(move |occurrence| match occurrence {
                Ok(value) => sink(value.clone()),
                Err(err) => debug!(error = %err, "dropping errored occurrence at driver"),
            });
        }
        _ => {}
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests unwrap for brevity")]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::errors;
    use crate::exec::call::call;
    use pretty_assertions::assert_eq;

    fn native_add_one() -> Value {
        Value::Native(Rc::new(NativeFunction {
            name: "addOne".into(),
            arity: 1,
            func: Rc::new(|args| match &args[0] {
                Value::Number(n) => Ok(Value::Number(n + bigdecimal::BigDecimal::from(1))),
                other => Err(errors::type_mismatch("number", other.type_name(), "addOne")),
            }),
            curried: Args::new(),
        }))
    }

    fn recording_driver() -> (Rc<RefCell<Vec<Value>>>, Driver) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, Rc::new(move |value| sink.borrow_mut().push(value)))
    }

    #[test]
    fn bind_installs_the_evaluated_expression() {
        let env = Env::root();
        eval_stmt(&env, &Stmt::bind("x", Expr::number("3"))).unwrap();
        assert_eq!(env.resolve("x").unwrap(), Value::int(3));
    }

    #[test]
    fn rebinding_in_the_same_scope_fails() {
        let env = Env::root();
        eval_stmt(&env, &Stmt::bind("x", Expr::number("3"))).unwrap();
        assert_eq!(
            eval_stmt(&env, &Stmt::bind("x", Expr::number("4"))),
            Err(errors::duplicate_binding("x"))
        );
    }

    #[test]
    fn nullary_term_binds_the_tagged_value_itself() {
        let env = Env::root();
        eval_stmt(&env, &Stmt::term("HIGH", vec![])).unwrap();
        let value = env.resolve("HIGH").unwrap();
        assert_eq!(value, Value::custom("HIGH", vec![]));
        assert!(!value.is_callable());
    }

    #[test]
    fn parameterized_term_binds_a_constructor() {
        let env = Env::root();
        eval_stmt(&env, &Stmt::term("Point", vec!["x".into(), "y".into()])).unwrap();
        let ctor = env.resolve("Point").unwrap();
        let point = call(&ctor, &[Value::int(1), Value::int(2)]).unwrap();
        assert_eq!(point, Value::custom("Point", vec![Value::int(1), Value::int(2)]));
    }

    #[test]
    fn pipeline_threads_the_prior_value_through_each_operation() {
        let env = Env::root();
        env.bind("addOne", native_add_one()).unwrap();
        let result = run_pipeline(
            &env,
            Value::int(1),
            &[Apply::of("addOne", vec![]), Apply::of("addOne", vec![])],
        );
        assert_eq!(result.unwrap(), Value::int(3));
    }

    #[test]
    fn pipeline_short_circuits_on_the_first_error() {
        let env = Env::root();
        env.bind("addOne", native_add_one()).unwrap();
        let result = run_pipeline(
            &env,
            Value::text("not a number"),
            &[Apply::of("addOne", vec![]), Apply::of("addOne", vec![])],
        );
        assert_eq!(
            result,
            Err(errors::type_mismatch("number", "text", "addOne"))
        );
    }

    #[test]
    fn plain_sourced_flow_binds_the_result_but_never_drives_the_destination() {
        let env = Env::root();
        env.bind("addOne", native_add_one()).unwrap();
        let (seen, driver) = recording_driver();
        env.register_driver("out", driver).unwrap();
        let stmt = Stmt::bind_flow(
            "y",
            Flow {
                source: Some(Expr::number("41")),
                operations: vec![Apply::of("addOne", vec![])],
                destination: Some("out".into()),
            },
        );
        eval_stmt(&env, &stmt).unwrap();
        assert_eq!(env.resolve("y").unwrap(), Value::int(42));
        // Only a reactive pipeline result attaches to the destination; a
        // plain value is just bound.
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn destination_only_flow_registers_an_output_adapter() {
        let env = Env::root();
        env.bind("addOne", native_add_one()).unwrap();
        let (seen, driver) = recording_driver();
        env.register_driver("out", driver).unwrap();
        let stmt = Stmt::bind_flow(
            "shifted",
            Flow {
                source: None,
                operations: vec![Apply::of("addOne", vec![])],
                destination: Some("out".into()),
            },
        );
        eval_stmt(&env, &stmt).unwrap();
        let adapter = env.resolve_driver("shifted").unwrap();
        adapter(Value::int(9));
        adapter(Value::text("dropped"));
        assert_eq!(*seen.borrow(), vec![Value::int(10)]);
    }

    #[test]
    fn endpoint_less_flow_is_a_single_argument_function() {
        let env = Env::root();
        env.bind("addOne", native_add_one()).unwrap();
        let stmt = Stmt::bind_flow(
            "bump",
            Flow {
                source: None,
                operations: vec![Apply::of("addOne", vec![])],
                destination: None,
            },
        );
        eval_stmt(&env, &stmt).unwrap();
        let bump = env.resolve("bump").unwrap();
        assert_eq!(call(&bump, &[Value::int(7)]).unwrap(), Value::int(8));
    }

    #[test]
    fn anonymous_flow_requires_both_endpoints() {
        let env = Env::root();
        let stmt = Stmt::Flow(Flow {
            source: Some(Expr::number("1")),
            operations: vec![],
            destination: None,
        });
        assert!(matches!(
            eval_stmt(&env, &stmt),
            Err(EvalError::InvalidFlow { .. })
        ));
    }
}
