//! The standard primitive set.
//!
//! Every reactive primitive takes its target first, because flow pipelines
//! prepend the prior pipeline value to each operation's arguments: in
//! `pinIn { filter isHigh; map HIGH; } pinOut` the `filter` call the
//! evaluator sees is `filter <pipeline value> isHigh`.
//!
//! Occurrences carry `Result`, so a combinator callback that fails turns its
//! occurrence into an error occurrence instead of aborting propagation; the
//! driver wiring drops those at the sink.

use bigdecimal::{BigDecimal, Zero};

use crate::errors::{division_by_zero, type_mismatch, EvalError};
use crate::exec::call::call;
use crate::host::HostBindings;
use crate::value::{Occurrence, Value};

/// Install the standard primitives into a host binding set.
pub fn register(host: &mut HostBindings) {
    host.value("True", Value::Bool(true))
        .value("False", Value::Bool(false));

    numeric(host);
    general(host);
    reactive(host);
}

fn numeric(host: &mut HostBindings) {
    host.native("add", 2, |args| {
        let (a, b) = numbers(args, "add")?;
        Ok(Value::Number(a + b))
    })
    .native("minus", 2, |args| {
        let (a, b) = numbers(args, "minus")?;
        Ok(Value::Number(a - b))
    })
    .native("mult", 2, |args| {
        let (a, b) = numbers(args, "mult")?;
        Ok(Value::Number(a * b))
    })
    .native("div", 2, |args| {
        let (a, b) = numbers(args, "div")?;
        if b.is_zero() {
            return Err(division_by_zero());
        }
        Ok(Value::Number(a / b))
    })
    .native("mod", 2, |args| {
        let (a, b) = numbers(args, "mod")?;
        if b.is_zero() {
            return Err(division_by_zero());
        }
        Ok(Value::Number(a % b))
    });
}

fn general(host: &mut HostBindings) {
    host.native("eq", 2, |args| Ok(Value::Bool(args[0] == args[1])))
        .native("toText", 1, |args| Ok(Value::text(args[0].to_string())))
        .native("concat", 2, |args| match (&args[0], &args[1]) {
            (Value::Text(a), Value::Text(b)) => Ok(Value::text(format!("{a}{b}"))),
            (Value::Text(_), other) | (other, _) => {
                Err(type_mismatch("text", other.type_name(), "concat"))
            }
        });
}

fn reactive(host: &mut HostBindings) {
    // map target f: f of every occurrence. A non-callable f maps every
    // occurrence to f itself, so nullary terms work as constants.
    host.native("map", 2, |args| {
        let f = args[1].clone();
        let apply = move |occurrence: &Occurrence| -> Occurrence {
            let value = occurrence.clone()?;
            if f.is_callable() {
                call(&f, &[value])
            } else {
                Ok(f.clone())
            }
        };
        match &args[0] {
            Value::Event(stream) => Ok(Value::Event(stream.map(apply))),
            Value::Observable(cell) => Ok(Value::Observable(cell.map(apply))),
            plain => Err(type_mismatch("stream or cell", plain.type_name(), "map")),
        }
    })
    // mapTo target v: every occurrence becomes v.
    .native("mapTo", 2, |args| {
        let constant = args[1].clone();
        match &args[0] {
            Value::Event(stream) => {
                let c = constant.clone();
                Ok(Value::Event(stream.map(move |_| Ok(c.clone()))))
            }
            Value::Observable(cell) => {
                let c = constant.clone();
                Ok(Value::Observable(cell.map(move |_| Ok(c.clone()))))
            }
            plain => Err(type_mismatch("stream or cell", plain.type_name(), "mapTo")),
        }
    })
    // filter target pred: keep occurrences pred accepts. Occurrences for
    // which pred errors or returns a non-boolean are dropped; error
    // occurrences pass through untouched for the sink to drop and log.
    .native("filter", 2, |args| {
        let Value::Event(stream) = &args[0] else {
            return Err(type_mismatch("stream", args[0].type_name(), "filter"));
        };
        let pred = args[1].clone();
        Ok(Value::Event(stream.filter(move |occurrence| {
            match occurrence {
                Ok(value) => matches!(
                    call(&pred, std::slice::from_ref(value)),
                    Ok(Value::Bool(true))
                ),
                Err(_) => true,
            }
        })))
    })
    // merge target other resolve: one stream of both inputs' occurrences;
    // simultaneous occurrences collapse through resolve.
    .native("merge", 3, |args| {
        let (Value::Event(left), Value::Event(right)) = (&args[0], &args[1]) else {
            return Err(type_mismatch(
                "stream",
                args[0].type_name(),
                "merge",
            ));
        };
        let resolve = args[2].clone();
        Ok(Value::Event(left.merge(right, move |l, r| {
            combine(&resolve, l, r)
        })))
    })
    // hold target init: a cell holding init until the stream fires.
    .native("hold", 2, |args| {
        let Value::Event(stream) = &args[0] else {
            return Err(type_mismatch("stream", args[0].type_name(), "hold"));
        };
        Ok(Value::Observable(stream.hold(Ok(args[1].clone()))))
    })
    // snapshot target f cell: f of (occurrence, pre-wave cell value).
    .native("snapshot", 3, |args| {
        let Value::Event(stream) = &args[0] else {
            return Err(type_mismatch("stream", args[0].type_name(), "snapshot"));
        };
        let Value::Observable(cell) = &args[2] else {
            return Err(type_mismatch("cell", args[2].type_name(), "snapshot"));
        };
        let f = args[1].clone();
        Ok(Value::Event(stream.snapshot(cell, move |occurrence, held| {
            combine(&f, occurrence, held)
        })))
    })
    // snapshot1 target cell: the pre-wave cell value at each firing.
    .native("snapshot1", 2, |args| {
        let Value::Event(stream) = &args[0] else {
            return Err(type_mismatch("stream", args[0].type_name(), "snapshot1"));
        };
        let Value::Observable(cell) = &args[1] else {
            return Err(type_mismatch("cell", args[1].type_name(), "snapshot1"));
        };
        Ok(Value::Event(
            stream.snapshot(cell, |occurrence, held| match occurrence {
                Ok(_) => held.clone(),
                Err(err) => Err(err.clone()),
            }),
        ))
    })
    // fold target init f: a cell accumulating f(accumulator, occurrence).
    .native("fold", 3, |args| {
        let Value::Event(stream) = &args[0] else {
            return Err(type_mismatch("stream", args[0].type_name(), "fold"));
        };
        let f = args[2].clone();
        Ok(Value::Observable(stream.fold(
            Ok(args[1].clone()),
            move |accumulator, occurrence| combine(&f, accumulator, occurrence),
        )))
    });
}

/// Apply a binary combinator to two occurrences, propagating (and joining)
/// error occurrences instead of invoking it.
fn combine(f: &Value, a: &Occurrence, b: &Occurrence) -> Occurrence {
    match (a, b) {
        (Ok(a), Ok(b)) => call(f, &[a.clone(), b.clone()]),
        (Err(a), Err(b)) => Err(a.clone().join(b.clone())),
        (Err(err), Ok(_)) | (Ok(_), Err(err)) => Err(err.clone()),
    }
}

fn numbers<'a>(
    args: &'a [Value],
    context: &str,
) -> Result<(&'a BigDecimal, &'a BigDecimal), EvalError> {
    match (&args[0], &args[1]) {
        (Value::Number(a), Value::Number(b)) => Ok((a, b)),
        (Value::Number(_), other) | (other, _) => {
            Err(type_mismatch("number", other.type_name(), context))
        }
    }
}
