//=========================================================================
// Core Systems
//
// Platform-independent puzzle logic.
//
// Responsibilities:
// - Slice source images into tile sets (`tiles`)
// - Coordinate a host grid view through small role handlers (`grid`)
// - Decode and slice external payloads off the UI thread (`decode`)
//
// Notes:
// Nothing in `core` depends on winit. Any host that can answer layout
// queries and forward drag/drop gestures can drive a `GridController`.
//
//=========================================================================

//=== Public Modules ======================================================

pub mod decode;
pub mod error;
pub mod grid;
pub mod tiles;

//=== Public API ==========================================================

pub use decode::{DecodeWorker, ExternalPayload};
pub use error::TileError;
pub use grid::{DropOutcome, GridConfig, GridController};
pub use tiles::{PixelRect, SlicePolicy, Tile, TileSet};
