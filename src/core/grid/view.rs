//=========================================================================
// Grid View Contract
//=========================================================================
//
// Outbound interface from the controller to the host grid view.
//
// The controller never owns the view. It keeps a `Weak` back-reference
// and checks it on every use, so a torn-down view turns every update
// request into a no-op instead of a crash.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::trace;

//=== CellUpdate ==========================================================

/// One incremental change to the displayed cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellUpdate {
    /// Remove the visual cell at this index.
    Remove(usize),

    /// Insert a visual cell at this index.
    Insert(usize),
}

//=== GridView ============================================================

/// Host grid view driven by [`GridController`](super::GridController).
pub trait GridView {
    /// Applies `updates` as one animated batch.
    fn apply_batch(&mut self, updates: &[CellUpdate]);

    /// Redraws every cell from the data source.
    fn reload_all(&mut self);
}

//=== ViewHandle ==========================================================

/// Non-owning handle to the host view.
#[derive(Clone)]
pub(crate) struct ViewHandle {
    view: Weak<RefCell<dyn GridView>>,
}

impl ViewHandle {
    pub(crate) fn new(view: &Rc<RefCell<dyn GridView>>) -> Self {
        Self {
            view: Rc::downgrade(view),
        }
    }

    /// Handle that never resolves (no view attached yet).
    pub(crate) fn detached() -> Self {
        let placeholder: Rc<RefCell<dyn GridView>> = Rc::new(RefCell::new(NullView));
        Self::new(&placeholder)
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.view.strong_count() > 0
    }

    /// Runs `f` against the view if it still exists; `None` if it is gone.
    pub(crate) fn with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn GridView) -> R,
    {
        match self.view.upgrade() {
            Some(view) => Some(f(&mut *view.borrow_mut())),
            None => {
                trace!(target: "grid", "View gone, update skipped");
                None
            }
        }
    }
}

//--- NullView ------------------------------------------------------------

/// Placeholder dropped right after a detached handle is made.
struct NullView;

impl GridView for NullView {
    fn apply_batch(&mut self, _updates: &[CellUpdate]) {}
    fn reload_all(&mut self) {}
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        batches: usize,
        reloads: usize,
    }

    impl GridView for Counter {
        fn apply_batch(&mut self, _updates: &[CellUpdate]) {
            self.batches += 1;
        }

        fn reload_all(&mut self) {
            self.reloads += 1;
        }
    }

    #[test]
    fn handle_reaches_live_view() {
        let counter = Rc::new(RefCell::new(Counter::default()));
        let view: Rc<RefCell<dyn GridView>> = counter.clone();
        let handle = ViewHandle::new(&view);

        assert!(handle.is_alive());
        assert!(handle.with(|v| v.reload_all()).is_some());
        assert_eq!(counter.borrow().reloads, 1);
    }

    #[test]
    fn handle_does_not_keep_view_alive() {
        let view: Rc<RefCell<dyn GridView>> = Rc::new(RefCell::new(Counter::default()));
        let handle = ViewHandle::new(&view);

        drop(view);

        assert!(!handle.is_alive());
        assert!(handle.with(|v| v.apply_batch(&[CellUpdate::Remove(0)])).is_none());
    }

    #[test]
    fn detached_handle_is_dead() {
        let handle = ViewHandle::detached();
        assert!(!handle.is_alive());
        assert!(handle.with(|v| v.reload_all()).is_none());
    }
}
