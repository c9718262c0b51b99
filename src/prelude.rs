//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use tile_puzzle::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Entry point
pub use crate::app::{default_image, Puzzle, PuzzleBuilder};
pub use crate::platform::PlatformError;

// Tiles
pub use crate::core::tiles::{PixelRect, SlicePolicy, Tile, TileSet};
pub use crate::core::TileError;

// Grid roles
pub use crate::core::grid::drag::{DragItem, DropOperation, DropProposal, DropSession};
pub use crate::core::grid::drop::IgnoredDrop;
pub use crate::core::grid::layout::{EdgeInsets, LayoutConfig, ViewSize};
pub use crate::core::grid::view::{CellUpdate, GridView};
pub use crate::core::grid::{DropOutcome, GridConfig, GridController};

// External payloads
pub use crate::core::decode::ExternalPayload;
