//=========================================================================
// Slicer
//=========================================================================
//
// Partitions a source pixel buffer into an n×n grid of equal cells.
//
// Architecture:
//   RgbaImage → tile size (floor W/n, floor H/n) → row-major crops → Vec<Tile>
//
// Slicing always runs on pixel buffer dimensions. Remainder pixels that do
// not fill a whole cell are handled by the `SlicePolicy`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use image::{imageops, RgbaImage};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{PixelRect, Tile};
use crate::core::error::TileError;

//=== SlicePolicy =========================================================

/// How to treat sources whose dimensions are not multiples of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlicePolicy {
    /// Clip the right/bottom remainder. A source smaller than the grid in
    /// either direction yields no tiles.
    #[default]
    Clip,

    /// Reject sources that do not divide evenly.
    Strict,
}

//=== slice() =============================================================

/// Cuts `source` into `dimension * dimension` tiles in row-major order.
///
/// Under [`SlicePolicy::Clip`] the result is empty when the source is
/// smaller than the grid in either direction, and `n*n` tiles otherwise.
pub(crate) fn slice(
    source: &RgbaImage,
    dimension: usize,
    policy: SlicePolicy,
) -> Result<Vec<Tile>, TileError> {
    if dimension == 0 {
        return Err(TileError::InvalidDimension(dimension));
    }

    let (width, height) = source.dimensions();
    let n = u32::try_from(dimension).unwrap_or(u32::MAX);

    if policy == SlicePolicy::Strict && (width % n != 0 || height % n != 0) {
        return Err(TileError::UnevenDimensions {
            width,
            height,
            dimension,
        });
    }

    let tile_width = width / n;
    let tile_height = height / n;

    if tile_width == 0 || tile_height == 0 {
        warn!(
            target: "tiles",
            "Source {}x{} too small for a {}x{} grid, no tiles extracted",
            width, height, dimension, dimension
        );
        return Ok(Vec::new());
    }

    // n * tile_size <= source size, so every cell lies inside the source.
    let mut tiles = Vec::with_capacity(dimension * dimension);
    for row in 0..n {
        for col in 0..n {
            tiles.push(crop(
                source,
                PixelRect {
                    x: col * tile_width,
                    y: row * tile_height,
                    width: tile_width,
                    height: tile_height,
                },
            ));
        }
    }

    debug!(
        target: "tiles",
        "Sliced {}x{} source into {} tiles of {}x{}",
        width, height, tiles.len(), tile_width, tile_height
    );

    Ok(tiles)
}

//--- Internal Helpers ----------------------------------------------------

fn crop(source: &RgbaImage, rect: PixelRect) -> Tile {
    let pixels = imageops::crop_imm(source, rect.x, rect.y, rect.width, rect.height).to_image();

    Tile {
        pixels: Arc::new(pixels),
        source_rect: rect,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]))
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let result = slice(&solid(10, 10), 0, SlicePolicy::Clip);
        assert!(matches!(result, Err(TileError::InvalidDimension(0))));
    }

    #[test]
    fn clip_discards_remainder_pixels() {
        let tiles = slice(&solid(503, 501), 5, SlicePolicy::Clip).unwrap();

        assert_eq!(tiles.len(), 25);
        assert!(tiles.iter().all(|t| t.width() == 100 && t.height() == 100));
        assert_eq!(
            tiles[24].source_rect(),
            PixelRect { x: 400, y: 400, width: 100, height: 100 }
        );
    }

    #[test]
    fn strict_rejects_uneven_sources() {
        let result = slice(&solid(503, 500), 5, SlicePolicy::Strict);
        assert!(matches!(
            result,
            Err(TileError::UnevenDimensions { width: 503, height: 500, dimension: 5 })
        ));
    }

    #[test]
    fn strict_accepts_even_sources() {
        let tiles = slice(&solid(50, 50), 5, SlicePolicy::Strict).unwrap();
        assert_eq!(tiles.len(), 25);
    }

    #[test]
    fn source_smaller_than_grid_yields_no_tiles() {
        let tiles = slice(&solid(3, 40), 5, SlicePolicy::Clip).unwrap();
        assert!(tiles.is_empty());
    }

    #[test]
    fn non_square_source_keeps_cell_aspect() {
        let tiles = slice(&solid(200, 100), 4, SlicePolicy::Clip).unwrap();
        assert_eq!(tiles.len(), 16);
        assert_eq!((tiles[5].width(), tiles[5].height()), (50, 25));
        assert_eq!(
            tiles[5].source_rect(),
            PixelRect { x: 50, y: 25, width: 50, height: 25 }
        );
    }

    #[test]
    fn awkward_sizes_yield_full_grids_inside_the_source() {
        for (width, height, n) in [(101, 99, 7), (13, 64, 6), (9, 9, 9)] {
            let tiles = slice(&solid(width, height), n, SlicePolicy::Clip).unwrap();
            assert_eq!(tiles.len(), n * n);

            let last = tiles[n * n - 1].source_rect();
            assert!(last.x + last.width <= width);
            assert!(last.y + last.height <= height);
        }
    }
}
