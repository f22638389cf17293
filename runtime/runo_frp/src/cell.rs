//! Continuous-value cells.

use std::rc::Rc;

use crate::engine::CellRef;
use crate::stream::Stream;

/// A value that always has a current value, updated by occurrences of an
/// underlying stream. Updates commit only after the driving wave settles, so
/// within a wave every snapshot of a cell sees its pre-wave value.
pub struct Cell<T> {
    node: CellRef<T>,
    updates: Stream<T>,
}

impl<T> Clone for Cell<T> {
    fn clone(&self) -> Self {
        Cell {
            node: Rc::clone(&self.node),
            updates: self.updates.clone(),
        }
    }
}

impl<T: Clone + 'static> Cell<T> {
    pub(crate) fn new(node: CellRef<T>, updates: Stream<T>) -> Self {
        Cell { node, updates }
    }

    pub(crate) fn node_ref(&self) -> CellRef<T> {
        Rc::clone(&self.node)
    }

    /// The current value.
    pub fn sample(&self) -> T {
        self.node.borrow().value.clone()
    }

    /// The stream driving this cell's updates.
    pub fn updates(&self) -> Stream<T> {
        self.updates.clone()
    }

    /// A cell tracking `f` of this cell's value.
    pub fn map(&self, f: impl Fn(&T) -> T + 'static) -> Cell<T> {
        let f = Rc::new(f);
        let mapped = {
            let f = Rc::clone(&f);
            self.updates.map(move |v| f(v))
        };
        mapped.hold(f(&self.node.borrow().value))
    }

    /// Observe this cell: `f` runs immediately with the current value, then
    /// once per committed update. Registration is permanent.
    pub fn listen(&self, f: impl Fn(&T) + 'static) {
        f(&self.node.borrow().value);
        self.node.borrow_mut().listeners.push(Rc::new(f));
    }

    /// Identity comparison: two handles are equal only if they are views of
    /// the same cell.
    pub fn ptr_eq(&self, other: &Cell<T>) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}
