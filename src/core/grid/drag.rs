//=========================================================================
// Drag Source
//=========================================================================
//
// Drag payload types and the begin/hover half of the reorder gesture.
//
// Gesture flow:
// ```text
//   begin(S) → DragItem { tile at S, local object, source S }
//      ↓
//   hover(D) → DropProposal { Move | Copy | Forbidden, D }
//      ↓
//   drop(D)  → DropTarget::resolve (see drop.rs)
// ```
//
// The gesture keeps no state between calls; the host's drag session
// carries the items from begin to drop.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::decode::ExternalPayload;
use crate::core::tiles::{Tile, TileSet};

//=== DragOrigin ==========================================================

/// Where a drag session started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOrigin {
    /// Started on a cell of this grid.
    Local,

    /// Came from outside the app (file manager, another window).
    External,
}

//=== DragPayload =========================================================

#[derive(Debug, Clone)]
pub enum DragPayload {
    /// A tile picked up from this grid.
    Tile(Tile),

    /// An image from outside the grid, still encoded.
    External(ExternalPayload),
}

//=== DragItem ============================================================

/// One item carried by a drag session.
#[derive(Debug, Clone)]
pub struct DragItem {
    pub payload: DragPayload,

    /// In-process context object, used to rebuild a drag preview.
    pub local_object: Option<Tile>,

    /// Cell the item was lifted from, if it came from this grid.
    pub source_index: Option<usize>,

    /// Tile set the item was lifted from; 0 is the set built at startup.
    pub generation: u64,
}

impl DragItem {
    /// Item lifted from cell `index` of tile set `generation`.
    pub fn from_tile(index: usize, tile: &Tile, generation: u64) -> Self {
        Self {
            payload: DragPayload::Tile(tile.clone()),
            local_object: Some(tile.clone()),
            source_index: Some(index),
            generation,
        }
    }

    /// Item dropped in from outside the app.
    pub fn external(payload: ExternalPayload) -> Self {
        Self {
            payload: DragPayload::External(payload),
            local_object: None,
            source_index: None,
            generation: 0,
        }
    }
}

//=== DropSession =========================================================

/// Items in flight plus where they came from.
#[derive(Debug, Clone)]
pub struct DropSession {
    items: Vec<DragItem>,
    origin: DragOrigin,
}

impl DropSession {
    pub fn new(items: Vec<DragItem>, origin: DragOrigin) -> Self {
        Self { items, origin }
    }

    /// Session for items lifted from this grid.
    pub fn local(items: Vec<DragItem>) -> Self {
        Self::new(items, DragOrigin::Local)
    }

    /// Session carrying a single external payload.
    pub fn external(payload: ExternalPayload) -> Self {
        Self::external_many(vec![payload])
    }

    /// Session carrying every payload of one external drag.
    pub fn external_many(payloads: Vec<ExternalPayload>) -> Self {
        let items = payloads.into_iter().map(DragItem::external).collect();
        Self::new(items, DragOrigin::External)
    }

    pub fn items(&self) -> &[DragItem] {
        &self.items
    }

    pub fn origin(&self) -> DragOrigin {
        self.origin
    }
}

//=== DropProposal ========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOperation {
    Move,
    Copy,
    Forbidden,
}

/// Outcome offered to the host while a drag hovers over the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropProposal {
    pub operation: DropOperation,

    /// Cell the drop would land on.
    pub destination: Option<usize>,
}

//=== DragSource ==========================================================

/// Drag-source role: packages tiles for a new drag.
#[derive(Debug, Default, Clone, Copy)]
pub struct DragSource;

impl DragSource {
    /// Items for a drag starting on cell `index` (empty if out of range).
    ///
    /// Items are tagged with `generation` so a drop can tell whether the
    /// tile set was replaced while the drag was in flight.
    pub fn items_for_beginning(
        &self,
        tiles: &TileSet,
        index: usize,
        generation: u64,
    ) -> Vec<DragItem> {
        match tiles.image_at(index) {
            Ok(tile) => {
                trace!(target: "grid", "Drag began at {} (set #{})", index, generation);
                vec![DragItem::from_tile(index, tile, generation)]
            }
            Err(e) => {
                trace!(target: "grid", "Drag refused: {}", e);
                Vec::new()
            }
        }
    }

    /// Move for drags from this grid, copy for drags from outside.
    pub fn proposal(&self, session: &DropSession, destination: Option<usize>) -> DropProposal {
        let operation = if session.items().is_empty() {
            DropOperation::Forbidden
        } else {
            match session.origin() {
                DragOrigin::Local => DropOperation::Move,
                DragOrigin::External => DropOperation::Copy,
            }
        };

        DropProposal {
            operation,
            destination,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
