//! The calling convention shared by every callable variant.
//!
//! `composed = curried ++ args`, then:
//!
//! - `len(composed) < arity` accumulates: a new value of the same variant
//!   with the composed arguments curried, nothing evaluated;
//! - `len(composed) == arity` saturates: evaluate the body in a fresh child
//!   of the closure's environment / invoke the host callback / build the
//!   `CustomValue`;
//! - `len(composed) > arity` saturates on the first `arity` arguments, then
//!   re-apply the rest to the result, which must itself be callable.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::environment::Env;
use crate::errors::{not_callable, EvalResult};
use crate::exec::expr;
use crate::value::{Args, ConstructorValue, CustomValue, FunctionValue, NativeFunction, Value};

/// Apply `args` to a callable value.
///
/// Calling a non-callable is a `NotCallable` error; the expression evaluator
/// never routes one here (application on a non-callable head is a designed-in
/// identity fallback), but over-application re-entry can.
pub fn call(callable: &Value, args: &[Value]) -> EvalResult {
    match callable {
        Value::Function(func) => {
            let composed = compose(&func.curried, args);
            match composed.len().cmp(&func.params.len()) {
                Ordering::Less => Ok(Value::Function(Rc::new(FunctionValue {
                    env: func.env.clone(),
                    params: func.params.clone(),
                    body: func.body.clone(),
                    curried: composed,
                }))),
                Ordering::Equal => enter(func, &composed),
                Ordering::Greater => {
                    let (now, rest) = composed.split_at(func.params.len());
                    reapply(enter(func, now)?, rest)
                }
            }
        }
        Value::Native(native) => {
            let composed = compose(&native.curried, args);
            match composed.len().cmp(&native.arity) {
                Ordering::Less => Ok(Value::Native(Rc::new(NativeFunction {
                    name: native.name.clone(),
                    arity: native.arity,
                    func: Rc::clone(&native.func),
                    curried: composed,
                }))),
                Ordering::Equal => (native.func)(&composed),
                Ordering::Greater => {
                    let (now, rest) = composed.split_at(native.arity);
                    reapply((native.func)(now)?, rest)
                }
            }
        }
        Value::Constructor(ctor) => {
            let composed = compose(&ctor.curried, args);
            match composed.len().cmp(&ctor.params.len()) {
                Ordering::Less => Ok(Value::Constructor(Rc::new(ConstructorValue {
                    tag: ctor.tag.clone(),
                    params: ctor.params.clone(),
                    curried: composed,
                }))),
                Ordering::Equal => Ok(construct(ctor, composed.to_vec())),
                Ordering::Greater => {
                    let (now, rest) = composed.split_at(ctor.params.len());
                    reapply(construct(ctor, now.to_vec()), rest)
                }
            }
        }
        other => Err(not_callable(other.type_name(), args.len())),
    }
}

fn compose(curried: &Args, args: &[Value]) -> Args {
    let mut composed = curried.clone();
    composed.extend(args.iter().cloned());
    composed
}

/// Saturated function entry: bind parameters 1:1 in a fresh child of the
/// defining environment and evaluate the body there.
fn enter(func: &FunctionValue, args: &[Value]) -> EvalResult {
    let scope = Env::child(&func.env);
    for (param, arg) in func.params.iter().zip(args) {
        scope.bind(param.clone(), arg.clone())?;
    }
    expr::eval(&scope, &func.body)
}

fn construct(ctor: &ConstructorValue, args: Vec<Value>) -> Value {
    Value::Custom(Rc::new(CustomValue {
        tag: ctor.tag.clone(),
        args,
    }))
}

/// Feed leftover arguments to an over-application result.
fn reapply(result: Value, rest: &[Value]) -> EvalResult {
    if rest.is_empty() {
        return Ok(result);
    }
    if result.is_callable() {
        call(&result, rest)
    } else {
        Err(not_callable(result.type_name(), rest.len()))
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests unwrap for brevity")]
mod tests {
    use super::*;
    use crate::errors;
    use pretty_assertions::assert_eq;

    fn add3() -> Value {
        Value::Native(Rc::new(NativeFunction {
            name: "add3".to_string(),
            arity: 3,
            func: Rc::new(|args| {
                let mut total = Value::int(0);
                for arg in args {
                    if let (Value::Number(a), Value::Number(b)) = (&total, arg) {
                        total = Value::Number(a + b);
                    }
                }
                Ok(total)
            }),
            curried: Args::new(),
        }))
    }

    #[test]
    fn under_application_accumulates_without_evaluating() {
        let partial = call(&add3(), &[Value::int(1)]).unwrap();
        assert!(partial.is_callable());
        assert_eq!(partial.type_name(), "function");
    }

    #[test]
    fn currying_is_split_point_independent() {
        let f = add3();
        let args = [Value::int(1), Value::int(2), Value::int(3)];
        let all_at_once = call(&f, &args).unwrap();
        for split in 0..=args.len() {
            let (first, second) = args.split_at(split);
            let partial = call(&f, first).unwrap();
            let result = if second.is_empty() {
                partial
            } else {
                call(&partial, second).unwrap()
            };
            assert_eq!(result, all_at_once);
        }
    }

    #[test]
    fn partial_application_is_a_distinct_value() {
        let f = add3();
        let partial = call(&f, &[Value::int(1)]).unwrap();
        // Closure equality is identity; currying produced a new object.
        assert_ne!(partial, f);
    }

    #[test]
    fn constructor_saturation_builds_a_custom_value() {
        let ctor = Value::Constructor(Rc::new(ConstructorValue {
            tag: "Point".to_string(),
            params: vec!["x".to_string(), "y".to_string()],
            curried: Args::new(),
        }));
        let point = call(&ctor, &[Value::int(1), Value::int(2)]).unwrap();
        assert_eq!(
            point,
            Value::custom("Point", vec![Value::int(1), Value::int(2)])
        );
    }

    #[test]
    fn over_application_onto_non_callable_is_an_error() {
        let ctor = Value::Constructor(Rc::new(ConstructorValue {
            tag: "Wrap".to_string(),
            params: vec!["x".to_string()],
            curried: Args::new(),
        }));
        assert_eq!(
            call(&ctor, &[Value::int(1), Value::int(2)]),
            Err(errors::not_callable("Wrap", 1))
        );
    }
}
