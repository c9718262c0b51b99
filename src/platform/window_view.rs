//=========================================================================
// Window Grid View
//=========================================================================
//
// The desktop host's side of the `GridView` contract.
//
// Records which update requests arrived since the last frame so the
// platform can redraw and refresh the window title once per batch.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::grid::view::{CellUpdate, GridView};

//=== WindowGridView ======================================================

#[derive(Debug, Default)]
pub(crate) struct WindowGridView {
    dirty: bool,
    moves: usize,
    reloads: usize,
}

impl WindowGridView {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns whether anything changed since the last call, and resets.
    pub(crate) fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Moves applied since the last full reload.
    pub(crate) fn moves(&self) -> usize {
        self.moves
    }

    pub(crate) fn reloads(&self) -> usize {
        self.reloads
    }
}

impl GridView for WindowGridView {
    fn apply_batch(&mut self, updates: &[CellUpdate]) {
        debug!(target: "platform", "Cell batch: {:?}", updates);
        self.moves += 1;
        self.dirty = true;
    }

    fn reload_all(&mut self) {
        debug!(target: "platform", "Full reload");
        self.moves = 0;
        self.reloads += 1;
        self.dirty = true;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_count_moves() {
        let mut view = WindowGridView::new();
        view.apply_batch(&[CellUpdate::Remove(0), CellUpdate::Insert(4)]);
        view.apply_batch(&[CellUpdate::Remove(4), CellUpdate::Insert(1)]);

        assert_eq!(view.moves(), 2);
        assert!(view.take_dirty());
        assert!(!view.take_dirty());
    }

    #[test]
    fn reload_resets_moves() {
        let mut view = WindowGridView::new();
        view.apply_batch(&[CellUpdate::Remove(0), CellUpdate::Insert(4)]);
        view.reload_all();

        assert_eq!(view.moves(), 0);
        assert_eq!(view.reloads(), 1);
        assert!(view.take_dirty());
    }
}
