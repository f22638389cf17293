//! Runo FRP - a minimal push-based reactive core.
//!
//! Discrete-event [`Stream`]s and continuous-value [`Cell`]s, wired into a
//! static dataflow graph at program load and driven afterwards by external
//! occurrences pushed through [`Sink`]s.
//!
//! # Transactional propagation
//!
//! One external occurrence triggers exactly one *wave*: every derived node
//! reachable from the entry point fires at most once, in rank order (a node's
//! rank exceeds all of its parents'), so joins like [`Stream::merge`] and
//! diamond fan-outs always observe a single consistent snapshot of the wave.
//! Cells commit their new values only after the wave settles, which is why
//! [`Stream::snapshot`] reads the value a cell held *before* the wave.
//! Listeners run after commit, and any occurrence sent from inside a listener
//! is queued and processed as its own wave. Two external occurrences never
//! interleave.
//!
//! # Ownership
//!
//! Parents hold their derived nodes alive and derived nodes capture their
//! parents, so a wired pipeline survives even when every intermediate handle
//! is dropped. Listener registration is permanent; there is no unsubscribe.
//! The resulting reference cycles live for the process lifetime: the graph
//! is built once at load and never torn down.

mod cell;
mod engine;
mod stream;

pub use cell::Cell;
pub use stream::{Network, Sink, Stream};
