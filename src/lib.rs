//=========================================================================
// Tile Puzzle — Library Root
//
// This crate slices an image into an n×n grid of tiles and lets the user
// reorder them by drag and drop, or replace the whole puzzle by dropping
// an external image onto the grid.
//
// Responsibilities:
// - Expose the puzzle entry point (`PuzzleBuilder` / `Puzzle`)
// - Expose the platform-independent tile and grid logic (`core`)
// - Keep the winit integration (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use tile_puzzle::PuzzleBuilder;
//
// fn main() {
//     PuzzleBuilder::new().build().unwrap().run().unwrap();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the tile set, grid controller and decode worker. It is
// public so other hosts can drive a `GridController` through their own
// `GridView`.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the winit window and event loop integration.
//
// `app` defines the puzzle builder and runtime entry point.
//
mod app;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use app::{default_image, Puzzle, PuzzleBuilder};
pub use platform::PlatformError;
