//=========================================================================
// Pointer Tracker
//=========================================================================
//
// Turns winit pointer and file-hover events into drag gesture state.
//
// Architecture:
//   CursorMoved → logical position ─┐
//   MouseInput  → press / release  ─┼→ PointerTracker → DropSession
//   HoveredFile → hovered paths    ─┤
//   DroppedFile → dropped paths    ─┘
//
// Positions are stored in logical units so they line up with the grid
// layout. Only the primary (left) button drives drags.
//
// The OS reports a multi-file drag as one HoveredFile/DroppedFile event
// per file. Paths are collected until the event batch ends and then
// handed over together, so they form a single drop session.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use log::trace;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton};

//=== Internal Dependencies ===============================================

use crate::core::grid::drag::DropSession;

//=== ButtonAction ========================================================

/// Primary-button transition relevant to drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ButtonAction {
    Press,
    Release,
}

impl ButtonAction {
    /// Maps a winit button event; non-primary buttons are ignored.
    pub(crate) fn from_winit(button: MouseButton, state: ElementState) -> Option<Self> {
        if button != MouseButton::Left {
            return None;
        }

        Some(match state {
            ElementState::Pressed => ButtonAction::Press,
            ElementState::Released => ButtonAction::Release,
        })
    }
}

//=== PointerTracker ======================================================

/// Cursor position plus the drag session in flight, if any.
#[derive(Debug, Default)]
pub(crate) struct PointerTracker {
    position: Option<(f64, f64)>,
    session: Option<DropSession>,
    hovered_files: Vec<PathBuf>,
    dropped_files: Vec<PathBuf>,
}

impl PointerTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    //--- Position ---------------------------------------------------------

    /// Records a cursor move given in physical pixels.
    pub(crate) fn moved(&mut self, position: PhysicalPosition<f64>, scale_factor: f64) {
        let logical = position.to_logical::<f64>(scale_factor);
        self.position = Some((logical.x, logical.y));
    }

    pub(crate) fn left(&mut self) {
        self.position = None;
    }

    /// Last known cursor position in logical units.
    pub(crate) fn position(&self) -> Option<(f64, f64)> {
        self.position
    }

    //--- Local Drags ------------------------------------------------------

    pub(crate) fn begin(&mut self, session: DropSession) {
        self.session = Some(session);
    }

    pub(crate) fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub(crate) fn session(&self) -> Option<&DropSession> {
        self.session.as_ref()
    }

    /// Ends the drag and hands its session to the caller.
    pub(crate) fn take_session(&mut self) -> Option<DropSession> {
        self.session.take()
    }

    pub(crate) fn cancel(&mut self) {
        if self.session.take().is_some() {
            trace!(target: "platform::pointer", "Drag cancelled");
        }
    }

    //--- External Hover ---------------------------------------------------

    pub(crate) fn hover_file(&mut self, path: PathBuf) {
        if !self.hovered_files.contains(&path) {
            self.hovered_files.push(path);
        }
    }

    pub(crate) fn cancel_hover(&mut self) {
        self.hovered_files.clear();
    }

    pub(crate) fn hovered_files(&self) -> &[PathBuf] {
        &self.hovered_files
    }

    pub(crate) fn drop_file(&mut self, path: PathBuf) {
        if !self.dropped_files.contains(&path) {
            self.dropped_files.push(path);
        }
    }

    pub(crate) fn has_dropped_files(&self) -> bool {
        !self.dropped_files.is_empty()
    }

    /// Ends the external drag: every path hovered or dropped in it.
    pub(crate) fn take_dropped_files(&mut self) -> Vec<PathBuf> {
        let mut files = std::mem::take(&mut self.hovered_files);
        for path in self.dropped_files.drain(..) {
            if !files.contains(&path) {
                files.push(path);
            }
        }
        trace!(target: "platform::pointer", "External drag ended with {} files", files.len());
        files
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_primary_button_drives_drags() {
        assert_eq!(
            ButtonAction::from_winit(MouseButton::Left, ElementState::Pressed),
            Some(ButtonAction::Press)
        );
        assert_eq!(
            ButtonAction::from_winit(MouseButton::Left, ElementState::Released),
            Some(ButtonAction::Release)
        );
        assert_eq!(
            ButtonAction::from_winit(MouseButton::Right, ElementState::Pressed),
            None
        );
    }

    #[test]
    fn positions_are_logical() {
        let mut tracker = PointerTracker::new();
        tracker.moved(PhysicalPosition::new(300.0, 150.0), 2.0);
        assert_eq!(tracker.position(), Some((150.0, 75.0)));

        tracker.left();
        assert_eq!(tracker.position(), None);
    }

    #[test]
    fn take_session_ends_the_drag() {
        let mut tracker = PointerTracker::new();
        tracker.begin(DropSession::local(Vec::new()));
        assert!(tracker.is_dragging());

        assert!(tracker.take_session().is_some());
        assert!(!tracker.is_dragging());
        assert!(tracker.take_session().is_none());
    }

    #[test]
    fn cancel_clears_session() {
        let mut tracker = PointerTracker::new();
        tracker.begin(DropSession::local(Vec::new()));
        tracker.cancel();
        assert!(tracker.session().is_none());
    }

    #[test]
    fn hover_tracks_every_file() {
        let mut tracker = PointerTracker::new();
        tracker.hover_file(PathBuf::from("/tmp/a.png"));
        tracker.hover_file(PathBuf::from("/tmp/b.png"));
        tracker.hover_file(PathBuf::from("/tmp/a.png"));
        assert_eq!(tracker.hovered_files().len(), 2);

        tracker.cancel_hover();
        assert!(tracker.hovered_files().is_empty());
    }

    #[test]
    fn dropped_files_include_the_whole_hover() {
        let mut tracker = PointerTracker::new();
        tracker.hover_file(PathBuf::from("/tmp/a.png"));
        tracker.hover_file(PathBuf::from("/tmp/b.png"));
        tracker.drop_file(PathBuf::from("/tmp/a.png"));
        assert!(tracker.has_dropped_files());

        let files = tracker.take_dropped_files();
        assert_eq!(files, vec![PathBuf::from("/tmp/a.png"), PathBuf::from("/tmp/b.png")]);
        assert!(!tracker.has_dropped_files());
        assert!(tracker.hovered_files().is_empty());
    }

    #[test]
    fn drop_without_hover_still_counts() {
        let mut tracker = PointerTracker::new();
        tracker.drop_file(PathBuf::from("/tmp/c.png"));
        assert_eq!(tracker.take_dropped_files(), vec![PathBuf::from("/tmp/c.png")]);
    }
}
