//! The Runo evaluation core.
//!
//! Runo is a reactive, curried, dynamically tagged language for hardware
//! control flows. This crate evaluates parsed programs ([`runo_ir`] ASTs)
//! over a root [`Env`] supplied by the host through [`HostBindings`], turning
//! flow declarations into live pipelines on a [`runo_frp`] dataflow network.
//!
//! A typical embedding:
//!
//! 1. build a [`runo_frp::Network`] and create one sink per hardware input;
//! 2. collect primitives and drivers in [`HostBindings`] (with
//!    [`builtins::register`] for the standard set), binding each sink's
//!    stream as an `Event` value;
//! 3. run the program through [`Interpreter::run`];
//! 4. push occurrences into the sinks from the hardware polling loop.
//!
//! Errors are values throughout. At load time the first failing statement
//! halts the run; after load, an error travels the reactive graph as an
//! ordinary occurrence and is dropped, with a debug log, before it reaches a
//! driver sink.

pub mod builtins;
pub mod environment;
pub mod errors;
pub mod exec;
pub mod host;
pub mod interpreter;
pub mod selector;
pub mod value;

pub use environment::{Driver, Env, Meta};
pub use errors::{EvalError, EvalResult};
pub use host::HostBindings;
pub use interpreter::Interpreter;
pub use value::{Occurrence, Value};

// The dataflow network types hosts need to feed a running program.
pub use runo_frp::{Cell, Network, Sink, Stream};

#[cfg(test)]
mod tests;
