//=========================================================================
// Grid Controller
//
// Coordinates a host grid view and the live tile set.
//
// Architecture:
// ```text
//              ┌──────────────── GridController ─────────────────┐
//   host  ───► │ TileDataSource   count / content                │
//   view       │ FlowLayout       cell size / spacing / insets   │
//   queries    │ DragSource       begin / hover                  │
//              │ DropTarget       drop → Move | Replace | Ignore │
//              └───────┬───────────────────────┬─────────────────┘
//                      │ Weak                  │ crossbeam
//                      ▼                       ▼
//                  GridView               DecodeWorker
//           apply_batch / reload_all   payload → TileSet
// ```
//
// Responsibilities:
// - Compose one small handler per host role
// - Apply moves as a single incremental batch (remove S, insert D)
// - Queue external payloads and swap in finished tile sets on the UI thread
//
// Notes:
// Everything here runs on the UI thread. The only cross-thread traffic is
// the decode worker's request/result channels.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod data_source;
pub mod drag;
pub mod drop;
pub mod layout;
pub mod view;

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use image::DynamicImage;
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::decode::{DecodeResult, DecodeWorker, SliceSpec};
use crate::core::error::TileError;
use crate::core::tiles::{SlicePolicy, Tile, TileSet};

use data_source::TileDataSource;
use drag::{DragItem, DragSource, DropProposal, DropSession};
use drop::{DropAction, DropTarget, IgnoredDrop};
use layout::{EdgeInsets, FlowLayout, LayoutConfig, ViewSize};
use view::{CellUpdate, GridView, ViewHandle};

//=== GridConfig ==========================================================

/// Construction parameters for a [`GridController`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Rows = columns of the puzzle.
    pub dimension: usize,
    pub layout: LayoutConfig,
    pub slice_policy: SlicePolicy,

    /// Pending external payloads before new drops are refused.
    pub decode_capacity: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            dimension: 5,
            layout: LayoutConfig::default(),
            slice_policy: SlicePolicy::Clip,
            decode_capacity: 4,
        }
    }
}

//=== DropOutcome =========================================================

/// Result of [`GridController::perform_drop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Tiles swapped and the view updated incrementally.
    Moved { from: usize, to: usize },

    /// External payload queued; applied by a later `process_decoded()`.
    ReplacementQueued { generation: u64 },

    /// Nothing changed.
    Ignored(IgnoredDrop),
}

//=== GridController ======================================================

/// Single coordinator for the grid's data, layout, drag and drop roles.
pub struct GridController {
    data: TileDataSource,
    layout: FlowLayout,
    drag: DragSource,
    drop: DropTarget,
    view: ViewHandle,
    decoder: DecodeWorker,
    dimension: usize,
    applied_generation: u64,
}

impl GridController {
    //--- Construction -----------------------------------------------------

    /// Slices `source` and starts the decode worker. No view is attached.
    ///
    /// # Errors
    ///
    /// Propagates slicing errors (zero dimension, strict-policy mismatch).
    ///
    /// # Panics
    ///
    /// Panics if `config.decode_capacity == 0`.
    pub fn new(source: &DynamicImage, config: GridConfig) -> Result<Self, TileError> {
        let tiles = TileSet::with_policy(source, config.dimension, config.slice_policy)?;

        info!(
            target: "grid",
            "Grid controller created ({}x{}, {} tiles)",
            config.dimension,
            config.dimension,
            tiles.count()
        );

        let spec = SliceSpec {
            dimension: config.dimension,
            policy: config.slice_policy,
        };

        Ok(Self {
            data: TileDataSource::new(tiles),
            layout: FlowLayout::new(config.dimension, config.layout),
            drag: DragSource,
            drop: DropTarget,
            view: ViewHandle::detached(),
            decoder: DecodeWorker::spawn(config.decode_capacity, spec),
            dimension: config.dimension,
            applied_generation: 0,
        })
    }

    /// Attaches the host view without taking ownership of it.
    pub fn attach_view(&mut self, view: &Rc<RefCell<dyn GridView>>) {
        self.view = ViewHandle::new(view);
        self.view.with(|v| v.reload_all());
    }

    pub fn has_view(&self) -> bool {
        self.view.is_alive()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn tiles(&self) -> &TileSet {
        self.data.tiles()
    }

    //--- Role Access ------------------------------------------------------

    pub fn data_source(&self) -> &TileDataSource {
        &self.data
    }

    pub fn layout(&self) -> &FlowLayout {
        &self.layout
    }

    //--- Data Source Queries ---------------------------------------------

    pub fn cell_count(&self) -> usize {
        self.data.cell_count()
    }

    pub fn cell_content(&self, index: usize) -> Result<&Tile, TileError> {
        self.data.cell_content(index)
    }

    //--- Layout Queries ---------------------------------------------------

    /// Square side for every cell, given the view's display size.
    pub fn cell_size(&self, view: ViewSize) -> f64 {
        self.layout.cell_side(view)
    }

    pub fn line_spacing(&self) -> f64 {
        self.layout.line_spacing()
    }

    pub fn interitem_spacing(&self) -> f64 {
        self.layout.interitem_spacing()
    }

    pub fn section_insets(&self) -> EdgeInsets {
        self.layout.section_insets()
    }

    /// Cell under a point in view coordinates.
    pub fn index_at(&self, x: f64, y: f64, view: ViewSize) -> Option<usize> {
        self.layout.index_at(x, y, view, self.cell_count())
    }

    //--- Drag & Drop ------------------------------------------------------

    /// Drag items for a drag beginning on cell `index`, tagged with the
    /// live tile set so drops after a replacement are refused.
    pub fn items_for_drag(&self, index: usize) -> Vec<DragItem> {
        self.drag
            .items_for_beginning(self.data.tiles(), index, self.applied_generation)
    }

    /// Tag of the live tile set; changes on every applied replacement.
    pub fn generation(&self) -> u64 {
        self.applied_generation
    }

    /// Proposal while a drag hovers over `destination`.
    pub fn drop_proposal(&self, session: &DropSession, destination: Option<usize>) -> DropProposal {
        self.drag.proposal(session, destination)
    }

    /// Completes a drop on `destination`.
    ///
    /// Moves need a live view: the swap and its visual update happen
    /// together or not at all. Replacements are queued regardless and
    /// applied by [`GridController::process_decoded`].
    pub fn perform_drop(&mut self, session: &DropSession, destination: Option<usize>) -> DropOutcome {
        let count = self.cell_count();
        match self.drop.resolve(session, destination, count, self.applied_generation) {
            DropAction::Move { from, to } => self.apply_move(from, to),
            DropAction::Replace(payload) => match self.decoder.submit(payload) {
                Some(generation) => DropOutcome::ReplacementQueued { generation },
                None => Self::ignored(IgnoredDrop::DecodeUnavailable),
            },
            DropAction::Ignore(reason) => Self::ignored(reason),
        }
    }

    //--- Decode Hand-off --------------------------------------------------

    /// Applies finished external decodes. Call once per frame on the UI
    /// thread. Returns the generation applied, if any.
    pub fn process_decoded(&mut self) -> Option<u64> {
        let finished = self.decoder.drain();
        self.apply_decoded(finished)
    }

    /// Blocks up to `timeout` for one decode, then applies it.
    ///
    /// For hosts without a frame loop.
    pub fn wait_for_decode(&mut self, timeout: Duration) -> Option<u64> {
        let finished = self.decoder.wait(timeout)?;
        self.apply_decoded(vec![finished])
    }

    //--- Internal Helpers -------------------------------------------------

    fn apply_move(&mut self, from: usize, to: usize) -> DropOutcome {
        let tiles = self.data.tiles_mut();

        let swapped = self.view.with(|view| {
            tiles.swap(from, to)?;
            view.apply_batch(&[CellUpdate::Remove(from), CellUpdate::Insert(to)]);
            Ok::<(), TileError>(())
        });

        match swapped {
            Some(Ok(())) => {
                debug!(target: "grid::drop", "Moved tile {} -> {}", from, to);
                DropOutcome::Moved { from, to }
            }
            Some(Err(TileError::IndexOutOfBounds { index, len })) if index == from => {
                Self::ignored(IgnoredDrop::SourceOutOfRange { index, count: len })
            }
            Some(Err(TileError::IndexOutOfBounds { index, len })) => {
                Self::ignored(IgnoredDrop::DestinationOutOfRange { index, count: len })
            }
            Some(Err(e)) => {
                warn!(target: "grid::drop", "Move {} -> {} failed: {}", from, to, e);
                Self::ignored(IgnoredDrop::UnsupportedPayload)
            }
            None => {
                debug!(target: "grid::drop", "Move {} -> {} skipped, view unavailable", from, to);
                DropOutcome::Ignored(IgnoredDrop::ViewUnavailable)
            }
        }
    }

    fn apply_decoded(&mut self, finished: Vec<DecodeResult>) -> Option<u64> {
        let mut newest: Option<(u64, TileSet)> = None;

        for result in finished {
            match result.outcome {
                Ok(tiles) if tiles.is_empty() => {
                    warn!(
                        target: "grid::drop",
                        "Dropped image #{} too small to slice, keeping puzzle",
                        result.generation
                    );
                }
                Ok(tiles) => {
                    if let Some((superseded, _)) = &newest {
                        debug!(target: "grid::drop", "Decode #{} superseded", superseded);
                    }
                    newest = Some((result.generation, tiles));
                }
                Err(e) => {
                    warn!(
                        target: "grid::drop",
                        "Dropped image #{} unusable: {}",
                        result.generation,
                        e
                    );
                }
            }
        }

        let (generation, tiles) = newest?;
        if generation <= self.applied_generation {
            debug!(target: "grid::drop", "Decode #{} is stale", generation);
            return None;
        }

        self.data.replace(tiles);
        self.applied_generation = generation;
        self.view.with(|v| v.reload_all());

        Some(generation)
    }

    fn ignored(reason: IgnoredDrop) -> DropOutcome {
        debug!(target: "grid::drop", "Drop ignored: {:?}", reason);
        DropOutcome::Ignored(reason)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
