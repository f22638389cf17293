//! The transaction engine: rank-ordered wave scheduling.
//!
//! All nodes created from one [`Network`](crate::Network) share a single
//! engine. The engine never holds strong references to nodes outside of an
//! in-flight wave, so graph ownership stays with the nodes themselves.

use std::cell::RefCell;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};
use std::rc::Rc;

use tracing::trace;

pub(crate) type EngineRef<T> = Rc<RefCell<Engine<T>>>;
pub(crate) type NodeRef<T> = Rc<RefCell<StreamNode<T>>>;
pub(crate) type CellRef<T> = Rc<RefCell<CellNode<T>>>;
pub(crate) type Listener<T> = Rc<dyn Fn(&T)>;

/// A stream node in the dataflow graph.
///
/// Sinks have no `compute`; derived nodes recompute their occurrence from
/// their parents' firings (and, for snapshots, from pre-wave cell values).
pub(crate) struct StreamNode<T> {
    /// Strictly greater than every parent's rank; fixes firing order.
    pub(crate) rank: usize,
    /// Recompute this node's occurrence from its parents. `None` for sinks.
    pub(crate) compute: Option<Box<dyn Fn() -> Option<T>>>,
    /// The occurrence fired in the current wave, cleared when it settles.
    pub(crate) firing: Option<T>,
    /// Already scheduled in the current wave.
    pub(crate) queued: bool,
    /// Downstream nodes to schedule when this node fires. Strong: parents
    /// keep the wired graph alive.
    pub(crate) targets: Vec<NodeRef<T>>,
    /// Cells that hold this node's occurrences.
    pub(crate) holds: Vec<CellRef<T>>,
    /// Occurrence observers, run after the wave commits.
    pub(crate) listeners: Vec<Listener<T>>,
}

impl<T> StreamNode<T> {
    pub(crate) fn sink() -> Self {
        StreamNode {
            rank: 0,
            compute: None,
            firing: None,
            queued: false,
            targets: Vec::new(),
            holds: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub(crate) fn derived(rank: usize, compute: Box<dyn Fn() -> Option<T>>) -> Self {
        StreamNode {
            rank,
            compute: Some(compute),
            firing: None,
            queued: false,
            targets: Vec::new(),
            holds: Vec::new(),
            listeners: Vec::new(),
        }
    }
}

/// The state behind a cell: its committed value, the value pending commit in
/// the current wave, and its observers.
pub(crate) struct CellNode<T> {
    pub(crate) value: T,
    pub(crate) pending: Option<T>,
    pub(crate) listeners: Vec<Listener<T>>,
}

/// Shared per-network scheduling state.
pub(crate) struct Engine<T> {
    /// A wave is in flight; external sends must queue.
    busy: bool,
    /// Nodes scheduled in the current wave, popped in rank order.
    queue: BinaryHeap<Reverse<Scheduled<T>>>,
    /// Tie-breaker preserving scheduling order within a rank.
    seq: u64,
    /// External occurrences that arrived mid-wave.
    deferred: VecDeque<(NodeRef<T>, T)>,
}

impl<T> Engine<T> {
    pub(crate) fn new() -> Self {
        Engine {
            busy: false,
            queue: BinaryHeap::new(),
            seq: 0,
            deferred: VecDeque::new(),
        }
    }

    fn schedule(&mut self, rank: usize, node: NodeRef<T>) {
        self.seq = self.seq.wrapping_add(1);
        self.queue.push(Reverse(Scheduled {
            rank,
            seq: self.seq,
            node,
        }));
    }
}

struct Scheduled<T> {
    rank: usize,
    seq: u64,
    node: NodeRef<T>,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank && self.seq == other.seq
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank.cmp(&other.rank).then(self.seq.cmp(&other.seq))
    }
}

/// Push an external occurrence into `node`, running a full wave now or
/// queueing it if one is already in flight.
pub(crate) fn send<T: Clone>(engine: &EngineRef<T>, node: &NodeRef<T>, value: T) {
    {
        let mut eng = engine.borrow_mut();
        if eng.busy {
            trace!("occurrence deferred until the current wave settles");
            eng.deferred.push_back((Rc::clone(node), value));
            return;
        }
        eng.busy = true;
    }

    run_wave(engine, Rc::clone(node), value);

    // Occurrences pushed by listeners (or concurrently queued externals)
    // each get their own wave, in arrival order.
    loop {
        let next = engine.borrow_mut().deferred.pop_front();
        match next {
            Some((next_node, next_value)) => run_wave(engine, next_node, next_value),
            None => break,
        }
    }

    engine.borrow_mut().busy = false;
}

/// Run one complete propagation wave starting at `root`.
fn run_wave<T: Clone>(engine: &EngineRef<T>, root: NodeRef<T>, value: T) {
    let mut wave = Wave {
        fired: Vec::new(),
        commits: Vec::new(),
        notices: Vec::new(),
    };

    fire(engine, &root, value, &mut wave);

    loop {
        let next = engine.borrow_mut().queue.pop();
        let Some(Reverse(sched)) = next else { break };
        sched.node.borrow_mut().queued = false;

        // Compute reads parent firings and pre-wave cell values; both live
        // in other RefCells, so holding this node's borrow is fine.
        let occurrence = {
            let node = sched.node.borrow();
            node.compute.as_ref().and_then(|compute| compute())
        };
        if let Some(v) = occurrence {
            fire(engine, &sched.node, v, &mut wave);
        }
    }

    // Commit cells only now, so every snapshot taken during the wave saw the
    // pre-wave values.
    for cell in &wave.commits {
        let mut c = cell.borrow_mut();
        if let Some(v) = c.pending.take() {
            for listener in &c.listeners {
                wave.notices.push((Rc::clone(listener), v.clone()));
            }
            c.value = v;
        }
    }

    // Clear firings before listeners run; a listener pushing a new
    // occurrence must start from a clean graph.
    for node in &wave.fired {
        node.borrow_mut().firing = None;
    }

    trace!(fired = wave.fired.len(), "propagation wave settled");

    for (listener, v) in wave.notices {
        listener(&v);
    }
}

struct Wave<T> {
    fired: Vec<NodeRef<T>>,
    commits: Vec<CellRef<T>>,
    notices: Vec<(Listener<T>, T)>,
}

/// Record a node's occurrence and schedule its downstream nodes.
fn fire<T: Clone>(engine: &EngineRef<T>, node: &NodeRef<T>, value: T, wave: &mut Wave<T>) {
    let (targets, holds) = {
        let mut n = node.borrow_mut();
        for listener in &n.listeners {
            wave.notices.push((Rc::clone(listener), value.clone()));
        }
        n.firing = Some(value.clone());
        (n.targets.clone(), n.holds.clone())
    };
    wave.fired.push(Rc::clone(node));

    for cell in holds {
        cell.borrow_mut().pending = Some(value.clone());
        wave.commits.push(cell);
    }

    let mut eng = engine.borrow_mut();
    for target in targets {
        let rank = {
            let mut t = target.borrow_mut();
            if t.queued {
                continue;
            }
            t.queued = true;
            t.rank
        };
        eng.schedule(rank, target);
    }
}
