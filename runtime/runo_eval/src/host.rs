//! The host embedding surface.
//!
//! A host hands the evaluator its primitives (plain values and native
//! callbacks) and its drivers (named effectful sinks) through
//! [`HostBindings`], which then becomes the root environment of a program
//! run. Reactive entry points are ordinary values: the host creates a
//! [`runo_frp::Network`], binds sinks' streams as `Event` values, and keeps
//! the sinks to push occurrences into after load.

use std::rc::Rc;

use crate::environment::{Driver, Env, Meta};
use crate::errors::{invalid_primitive, EvalError, EvalResult};
use crate::value::{Args, NativeFunction, Value};

type NativeFn = Rc<dyn Fn(&[Value]) -> EvalResult>;

/// Everything the host contributes to the root environment.
#[derive(Default)]
pub struct HostBindings {
    values: Vec<(String, Value, Meta)>,
    natives: Vec<(String, usize, NativeFn)>,
    drivers: Vec<(String, Driver)>,
}

impl HostBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a plain value.
    pub fn value(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.values.push((name.into(), value, Meta::default()));
        self
    }

    /// Bind a plain value carrying selector metadata.
    pub fn value_with_meta(
        &mut self,
        name: impl Into<String>,
        value: Value,
        meta: Meta,
    ) -> &mut Self {
        self.values.push((name.into(), value, meta));
        self
    }

    /// Bind a native callback of fixed arity. Arity zero is rejected when
    /// the root environment is built; a nullary primitive should be bound as
    /// a plain value instead.
    pub fn native(
        &mut self,
        name: impl Into<String>,
        arity: usize,
        func: impl Fn(&[Value]) -> EvalResult + 'static,
    ) -> &mut Self {
        self.natives.push((name.into(), arity, Rc::new(func)));
        self
    }

    /// Register an effectful output sink.
    pub fn driver(&mut self, name: impl Into<String>, sink: impl Fn(Value) + 'static) -> &mut Self {
        self.drivers.push((name.into(), Rc::new(sink)));
        self
    }

    /// Build the root environment for a program run.
    pub fn into_root_env(self) -> Result<Env, EvalError> {
        let root = Env::root();
        for (name, value, meta) in self.values {
            root.bind_with_meta(name, value, meta)?;
        }
        for (name, arity, func) in self.natives {
            if arity == 0 {
                return Err(invalid_primitive(name));
            }
            let native = Value::Native(Rc::new(NativeFunction {
                name: name.clone(),
                arity,
                func,
                curried: Args::new(),
            }));
            root.bind(name, native)?;
        }
        for (name, sink) in self.drivers {
            root.register_driver(name, sink)?;
        }
        Ok(root)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests unwrap for brevity")]
mod tests {
    use super::*;
    use crate::errors;
    use crate::exec::call::call;
    use pretty_assertions::assert_eq;

    #[test]
    fn host_values_natives_and_drivers_land_in_the_root() {
        let mut host = HostBindings::new();
        host.value("zero", Value::int(0))
            .native("identity", 1, |args| {
                args.first()
                    .cloned()
                    .ok_or_else(|| errors::invalid_primitive("identity"))
            })
            .driver("out", |_| {});
        let root = host.into_root_env().unwrap();
        assert_eq!(root.resolve("zero").unwrap(), Value::int(0));
        let id = root.resolve("identity").unwrap();
        assert_eq!(call(&id, &[Value::int(5)]).unwrap(), Value::int(5));
        assert!(root.resolve_driver("out").is_ok());
    }

    #[test]
    fn nullary_natives_are_rejected() {
        let mut host = HostBindings::new();
        host.native("broken", 0, |_| Ok(Value::Bool(true)));
        assert_eq!(
            host.into_root_env().map(|_| ()),
            Err(errors::invalid_primitive("broken"))
        );
    }

    #[test]
    fn duplicate_host_names_are_rejected() {
        let mut host = HostBindings::new();
        host.value("x", Value::int(1)).value("x", Value::int(2));
        assert_eq!(
            host.into_root_env().map(|_| ()),
            Err(errors::duplicate_binding("x"))
        );
    }
}
