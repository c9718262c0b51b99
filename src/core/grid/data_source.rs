//=========================================================================
// Tile Data Source
//=========================================================================
//
// Data-source role: cell count and cell content for the host view.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::error::TileError;
use crate::core::tiles::{Tile, TileSet};

//=== TileDataSource ======================================================

/// Exclusive owner of the live tile set.
#[derive(Debug)]
pub struct TileDataSource {
    tiles: TileSet,
}

impl TileDataSource {
    pub(crate) fn new(tiles: TileSet) -> Self {
        Self { tiles }
    }

    /// Number of cells to display.
    pub fn cell_count(&self) -> usize {
        self.tiles.count()
    }

    /// Image for the cell at `index` (row-major).
    pub fn cell_content(&self, index: usize) -> Result<&Tile, TileError> {
        self.tiles.image_at(index)
    }

    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut TileSet {
        &mut self.tiles
    }

    /// Discards the current set in favour of `tiles`.
    pub(crate) fn replace(&mut self, tiles: TileSet) -> TileSet {
        info!(
            target: "grid",
            "Tile set replaced ({} -> {} tiles)",
            self.tiles.count(),
            tiles.count()
        );
        std::mem::replace(&mut self.tiles, tiles)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
