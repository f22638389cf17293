//! Runtime values for the Runo evaluator.
//!
//! `Value` is a closed tagged union. The three callable variants
//! (`Function`, `Native`, `Constructor`) share one calling convention with
//! explicit curried-argument accumulators (see `exec::call`), so
//! user-defined and host-supplied callables curry identically.
//!
//! Reactive variants carry [`Occurrence`]s rather than bare values: an error
//! raised inside a live combinator chain travels the graph as an ordinary
//! occurrence and is dropped at the driver sink, degrading to "nothing is
//! driven this tick" instead of crashing a long-running control loop.
//!
//! # Equality
//!
//! Structural for `Number` / `Text` / `Bool` / `Tuple` / `Custom`; identity
//! for everything else. Two closures are equal only if they are the same
//! object; partially applying a callable therefore yields a value unequal
//! to its origin.

use std::fmt;
use std::rc::Rc;

use bigdecimal::BigDecimal;
use rustc_hash::FxHashMap;
use runo_frp::{Cell, Stream};
use smallvec::SmallVec;

use runo_ir::{Expr, Ident};

use crate::environment::Env;
use crate::errors::{EvalError, EvalResult};

/// One occurrence travelling a reactive graph.
pub type Occurrence = Result<Value, EvalError>;

/// Argument accumulator for the calling convention. Runo callables rarely
/// exceed a handful of parameters, so arguments stay inline.
pub type Args = SmallVec<[Value; 4]>;

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    /// Arbitrary-precision decimal.
    Number(BigDecimal),
    /// Immutable text.
    Text(Rc<str>),
    Bool(bool),
    /// Ordered + named record; every element is addressable by positional
    /// index, named elements additionally by name.
    Tuple(Rc<TupleValue>),
    /// A closure over its defining environment.
    Function(Rc<FunctionValue>),
    /// A host-supplied callback of fixed arity.
    Native(Rc<NativeFunction>),
    /// An algebraic data tag awaiting saturation.
    Constructor(Rc<ConstructorValue>),
    /// A saturated, pattern-matchable tagged value.
    Custom(Rc<CustomValue>),
    /// A discrete stream of occurrences.
    Event(Stream<Occurrence>),
    /// A continuous cell with a current occurrence.
    Observable(Cell<Occurrence>),
}

/// The record behind `Value::Tuple`: one map holding every element under its
/// index key (`"0"`, `"1"`, ...) and named elements under their name too.
/// Equality is equality of the whole map, so naming an element changes the
/// key set and therefore the identity of the tuple shape.
#[derive(Clone, Debug, PartialEq)]
pub struct TupleValue {
    entries: FxHashMap<String, Value>,
    len: usize,
}

impl TupleValue {
    /// Build from ordered, optionally named elements.
    pub fn from_elements(elements: Vec<(Option<Ident>, Value)>) -> Self {
        let len = elements.len();
        let mut entries = FxHashMap::default();
        for (index, (name, value)) in elements.into_iter().enumerate() {
            if let Some(name) = name {
                entries.insert(name, value.clone());
            }
            entries.insert(index.to_string(), value);
        }
        TupleValue { entries, len }
    }

    /// Look up an element by name or stringified index.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Number of elements (not keys).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Elements in positional order, when all index keys are present.
    pub fn positional(&self) -> Vec<Value> {
        (0..self.len)
            .filter_map(|i| self.entries.get(&i.to_string()).cloned())
            .collect()
    }
}

/// A user-defined closure: defining environment (shared, not copied),
/// parameter names, body, and the arguments curried so far.
#[derive(Clone)]
pub struct FunctionValue {
    pub env: Env,
    pub params: Vec<Ident>,
    pub body: Expr,
    pub curried: Args,
}

/// A host callback wrapped as a first-class callable.
#[derive(Clone)]
pub struct NativeFunction {
    /// Diagnostic name; appears in type-mismatch contexts.
    pub name: String,
    pub arity: usize,
    pub func: Rc<dyn Fn(&[Value]) -> EvalResult>,
    pub curried: Args,
}

/// An algebraic data tag with declared arity ≥ 1. Nullary terms never build
/// a `ConstructorValue`; they bind their `CustomValue` directly.
#[derive(Clone)]
pub struct ConstructorValue {
    pub tag: String,
    pub params: Vec<Ident>,
    pub curried: Args,
}

/// A saturated constructor application.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomValue {
    pub tag: String,
    pub args: Vec<Value>,
}

impl Value {
    /// Integer convenience constructor.
    pub fn int(n: i64) -> Self {
        Value::Number(BigDecimal::from(n))
    }

    /// Text convenience constructor.
    pub fn text(s: impl AsRef<str>) -> Self {
        Value::Text(Rc::from(s.as_ref()))
    }

    /// Build a saturated custom value.
    pub fn custom(tag: impl Into<String>, args: Vec<Value>) -> Self {
        Value::Custom(Rc::new(CustomValue {
            tag: tag.into(),
            args,
        }))
    }

    /// Whether the calling convention accepts this value.
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Function(_) | Value::Native(_) | Value::Constructor(_)
        )
    }

    /// Human-readable type name, for diagnostics only.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Bool(_) => "boolean",
            Value::Tuple(_) => "value",
            Value::Function(_) | Value::Native(_) | Value::Constructor(_) => "function",
            Value::Custom(custom) => &custom.tag,
            Value::Event(_) => "stream",
            Value::Observable(_) => "cell",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
            (Value::Constructor(a), Value::Constructor(b)) => Rc::ptr_eq(a, b),
            (Value::Event(a), Value::Event(b)) => a.ptr_eq(b),
            (Value::Observable(a), Value::Observable(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Text(t) => write!(f, "Text({t:?})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Tuple(t) => write!(f, "Tuple({t:?})"),
            Value::Function(func) => write!(
                f,
                "<function /{} ({} curried)>",
                func.params.len(),
                func.curried.len()
            ),
            Value::Native(native) => write!(f, "<native {}/{}>", native.name, native.arity),
            Value::Constructor(ctor) => write!(f, "<constructor {}/{}>", ctor.tag, ctor.params.len()),
            Value::Custom(custom) => write!(f, "{}{:?}", custom.tag, custom.args),
            Value::Event(_) => write!(f, "<stream>"),
            Value::Observable(_) => write!(f, "<cell>"),
        }
    }
}

/// Driver-facing pretty printing, e.g. for a console sink.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(t) => write!(f, "{t}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Tuple(tuple) => {
                // Index keys carry the elements; print them in order.
                write!(f, "(")?;
                for (i, value) in tuple.positional().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, ")")
            }
            Value::Custom(custom) => {
                write!(f, "{} (", custom.tag)?;
                for (i, arg) in custom.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Value::Function(_) | Value::Native(_) | Value::Constructor(_) => {
                write!(f, "<function>")
            }
            Value::Event(_) => write!(f, "<stream>"),
            Value::Observable(_) => write!(f, "<cell>"),
        }
    }
}
