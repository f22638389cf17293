//! Discrete-event streams and their combinators.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cell::Cell;
use crate::engine::{self, CellNode, Engine, EngineRef, NodeRef, StreamNode};

/// A handle to a dataflow network. All sinks pushed into the same network
/// propagate through one shared transaction engine, so occurrences never
/// interleave.
pub struct Network<T> {
    engine: EngineRef<T>,
}

impl<T: Clone + 'static> Network<T> {
    /// Create an empty network.
    pub fn new() -> Self {
        Network {
            engine: Rc::new(RefCell::new(Engine::new())),
        }
    }

    /// Create an entry-point sink.
    pub fn sink(&self) -> Sink<T> {
        Sink {
            stream: Stream {
                node: Rc::new(RefCell::new(StreamNode::sink())),
                engine: Rc::clone(&self.engine),
            },
        }
    }
}

impl<T: Clone + 'static> Default for Network<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// An entry point the host pushes external occurrences into.
pub struct Sink<T> {
    stream: Stream<T>,
}

impl<T: Clone + 'static> Sink<T> {
    /// Push one occurrence. Runs a full propagation wave synchronously, or
    /// queues the occurrence if a wave is already in flight.
    pub fn send(&self, value: T) {
        engine::send(&self.stream.engine, &self.stream.node, value);
    }

    /// The stream of occurrences pushed into this sink.
    pub fn stream(&self) -> Stream<T> {
        self.stream.clone()
    }
}

/// A discrete stream of value occurrences. It has no current value between
/// occurrences; use [`Stream::hold`] to get one.
pub struct Stream<T> {
    pub(crate) node: NodeRef<T>,
    pub(crate) engine: EngineRef<T>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Stream {
            node: Rc::clone(&self.node),
            engine: Rc::clone(&self.engine),
        }
    }
}

impl<T: Clone + 'static> Stream<T> {
    /// Build a derived node downstream of `parents` and hand it back as a
    /// stream on the same engine.
    fn derive(parents: &[&Stream<T>], compute: Box<dyn Fn() -> Option<T>>) -> Stream<T> {
        let rank = parents
            .iter()
            .map(|p| p.node.borrow().rank)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        let node = Rc::new(RefCell::new(StreamNode::derived(rank, compute)));
        for parent in parents {
            parent.node.borrow_mut().targets.push(Rc::clone(&node));
        }
        Stream {
            node,
            engine: Rc::clone(&parents[0].engine),
        }
    }

    /// A stream firing `f` of every occurrence of this stream.
    pub fn map(&self, f: impl Fn(&T) -> T + 'static) -> Stream<T> {
        let parent = Rc::clone(&self.node);
        Stream::derive(
            &[self],
            Box::new(move || parent.borrow().firing.as_ref().map(&f)),
        )
    }

    /// A stream passing through only the occurrences `pred` accepts.
    pub fn filter(&self, pred: impl Fn(&T) -> bool + 'static) -> Stream<T> {
        let parent = Rc::clone(&self.node);
        Stream::derive(
            &[self],
            Box::new(move || {
                parent
                    .borrow()
                    .firing
                    .as_ref()
                    .filter(|v| pred(v))
                    .cloned()
            }),
        )
    }

    /// A stream firing whenever either input fires. When both fire in the
    /// same wave, `resolve` combines them into a single occurrence.
    pub fn merge(&self, other: &Stream<T>, resolve: impl Fn(&T, &T) -> T + 'static) -> Stream<T> {
        debug_assert!(
            Rc::ptr_eq(&self.engine, &other.engine),
            "cannot merge streams from different networks"
        );
        let left = Rc::clone(&self.node);
        let right = Rc::clone(&other.node);
        Stream::derive(
            &[self, other],
            Box::new(move || {
                let l = left.borrow();
                let r = right.borrow();
                match (l.firing.as_ref(), r.firing.as_ref()) {
                    (Some(a), Some(b)) => Some(resolve(a, b)),
                    (Some(a), None) => Some(a.clone()),
                    (None, Some(b)) => Some(b.clone()),
                    (None, None) => None,
                }
            }),
        )
    }

    /// A cell holding `init` until this stream fires, then each occurrence
    /// in turn. The cell's value commits after the wave settles.
    pub fn hold(&self, init: T) -> Cell<T> {
        let cell = Rc::new(RefCell::new(CellNode {
            value: init,
            pending: None,
            listeners: Vec::new(),
        }));
        self.node.borrow_mut().holds.push(Rc::clone(&cell));
        Cell::new(cell, self.clone())
    }

    /// A stream firing `combine(occurrence, cell value)` for every
    /// occurrence, reading the value the cell held before the wave began.
    pub fn snapshot(&self, cell: &Cell<T>, combine: impl Fn(&T, &T) -> T + 'static) -> Stream<T> {
        let parent = Rc::clone(&self.node);
        let sampled = cell.node_ref();
        Stream::derive(
            &[self],
            Box::new(move || {
                parent
                    .borrow()
                    .firing
                    .as_ref()
                    .map(|v| combine(v, &sampled.borrow().value))
            }),
        )
    }

    /// A cell accumulating `combine(accumulator, occurrence)` over this
    /// stream, starting from `init`.
    pub fn fold(&self, init: T, combine: impl Fn(&T, &T) -> T + 'static) -> Cell<T> {
        let acc = Rc::new(RefCell::new(CellNode {
            value: init,
            pending: None,
            listeners: Vec::new(),
        }));
        let parent = Rc::clone(&self.node);
        let sampled = Rc::clone(&acc);
        let updates = Stream::derive(
            &[self],
            Box::new(move || {
                parent
                    .borrow()
                    .firing
                    .as_ref()
                    .map(|v| combine(&sampled.borrow().value, v))
            }),
        );
        updates.node.borrow_mut().holds.push(Rc::clone(&acc));
        Cell::new(acc, updates)
    }

    /// Observe every occurrence. Listeners run once the wave has fully
    /// settled and are registered for the process lifetime.
    pub fn listen(&self, f: impl Fn(&T) + 'static) {
        self.node.borrow_mut().listeners.push(Rc::new(f));
    }

    /// Identity comparison: two handles are equal only if they are views of
    /// the same node.
    pub fn ptr_eq(&self, other: &Stream<T>) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}
