//=========================================================================
// Tile Set
//
// Ordered collection of tiles cut from a single source image.
//
// Responsibilities:
// - Slice a source image once, at construction
// - Answer count and indexed lookups for the grid data source
// - Swap two positions in place (the only partial mutation)
//
// Notes:
// A tile set is never extended or shrunk after construction. Replacing
// the puzzle image builds a fresh set and drops the old one whole.
//
//=========================================================================

//=== Submodules ==========================================================

mod slicer;

//=== External Dependencies ===============================================

use std::sync::Arc;

use image::{DynamicImage, RgbaImage};
use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::error::TileError;

pub use slicer::SlicePolicy;

//=== PixelRect ===========================================================

/// Rectangle in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

//=== Tile ================================================================

/// One rectangular piece of the source image.
///
/// Pixels are shared by reference count, so moving a tile between
/// positions or handing it to a drag payload never copies the buffer.
#[derive(Debug, Clone)]
pub struct Tile {
    pixels: Arc<RgbaImage>,
    source_rect: PixelRect,
}

impl Tile {
    /// Pixel buffer of this tile.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Where this tile was cut from in its source image.
    pub fn source_rect(&self) -> PixelRect {
        self.source_rect
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Returns true if both tiles share the same pixel allocation.
    pub fn shares_pixels(&self, other: &Tile) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.source_rect == other.source_rect
            && (self.shares_pixels(other) || self.pixels.as_raw() == other.pixels.as_raw())
    }
}

impl Eq for Tile {}

//=== TileSet =============================================================

/// Tiles of one puzzle image, in display order.
#[derive(Debug, Clone)]
pub struct TileSet {
    tiles: Vec<Tile>,
    dimension: usize,
}

impl TileSet {
    //--- Construction -----------------------------------------------------

    /// Slices `source` into a `dimension`×`dimension` grid, clipping any
    /// remainder pixels.
    ///
    /// # Errors
    ///
    /// [`TileError::InvalidDimension`] if `dimension == 0`.
    pub fn new(source: &DynamicImage, dimension: usize) -> Result<Self, TileError> {
        Self::with_policy(source, dimension, SlicePolicy::default())
    }

    /// Slices `source` using an explicit [`SlicePolicy`].
    pub fn with_policy(
        source: &DynamicImage,
        dimension: usize,
        policy: SlicePolicy,
    ) -> Result<Self, TileError> {
        let rgba = source.to_rgba8();
        let tiles = slicer::slice(&rgba, dimension, policy)?;
        Ok(Self { tiles, dimension })
    }

    /// Decodes an encoded image (PNG, JPEG) and slices it.
    ///
    /// # Errors
    ///
    /// [`TileError::Decode`] if the bytes are not a supported image.
    pub fn from_bytes(
        bytes: &[u8],
        dimension: usize,
        policy: SlicePolicy,
    ) -> Result<Self, TileError> {
        let source = image::load_from_memory(bytes)?;
        Self::with_policy(&source, dimension, policy)
    }

    //--- Queries ----------------------------------------------------------

    /// Grid dimension this set was sliced for.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of tiles currently held.
    pub fn count(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Returns the tile at `index`.
    ///
    /// # Errors
    ///
    /// [`TileError::IndexOutOfBounds`] if `index >= count()`.
    pub fn image_at(&self, index: usize) -> Result<&Tile, TileError> {
        self.tiles.get(index).ok_or(TileError::IndexOutOfBounds {
            index,
            len: self.tiles.len(),
        })
    }

    /// Iterates tiles in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    //--- Mutation ---------------------------------------------------------

    /// Exchanges the tiles at `i` and `j`.
    ///
    /// `i == j` is a no-op. The set is left untouched on error.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<(), TileError> {
        self.check_index(i)?;
        self.check_index(j)?;
        self.tiles.swap(i, j);
        trace!(target: "tiles", "Swapped tiles {} <-> {}", i, j);
        Ok(())
    }

    //--- Internal Helpers -------------------------------------------------

    fn check_index(&self, index: usize) -> Result<(), TileError> {
        if index < self.tiles.len() {
            Ok(())
        } else {
            Err(TileError::IndexOutOfBounds {
                index,
                len: self.tiles.len(),
            })
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    //--- Test Helpers -----------------------------------------------------

    /// Square image whose pixels encode their grid cell as (col, row).
    fn cell_coded(size: u32, dimension: u32) -> DynamicImage {
        let cell = size / dimension;
        DynamicImage::ImageRgba8(RgbaImage::from_fn(size, size, |x, y| {
            Rgba([(x / cell) as u8, (y / cell) as u8, 0, 255])
        }))
    }

    fn snapshot(set: &TileSet) -> Vec<PixelRect> {
        set.iter().map(Tile::source_rect).collect()
    }

    //=====================================================================
    // Construction
    //=====================================================================

    #[test]
    fn five_by_five_of_500_pixels() {
        let set = TileSet::new(&cell_coded(500, 5), 5).unwrap();

        assert_eq!(set.count(), 25);
        assert_eq!(set.dimension(), 5);
        assert!(set.iter().all(|t| t.width() == 100 && t.height() == 100));

        let tile = set.image_at(12).unwrap();
        assert_eq!(
            tile.source_rect(),
            PixelRect { x: 200, y: 200, width: 100, height: 100 }
        );
    }

    #[test]
    fn tiles_are_row_major() {
        let n = 4;
        let set = TileSet::new(&cell_coded(80, n), n as usize).unwrap();

        for (k, tile) in set.iter().enumerate() {
            let row = (k / n as usize) as u8;
            let col = (k % n as usize) as u8;
            assert_eq!(tile.pixels().get_pixel(0, 0), &Rgba([col, row, 0, 255]));
            assert_eq!(tile.pixels().get_pixel(19, 19), &Rgba([col, row, 0, 255]));
        }
    }

    #[test]
    fn count_never_exceeds_grid() {
        for n in 1..=7usize {
            for (w, h) in [(1, 1), (7, 3), (49, 50), (64, 64), (101, 99)] {
                let source = DynamicImage::new_rgba8(w, h);
                let set = TileSet::new(&source, n).unwrap();
                assert!(set.count() <= n * n);
                if w as usize % n == 0 && h as usize % n == 0 {
                    assert_eq!(set.count(), n * n, "{}x{} / {}", w, h, n);
                }
            }
        }
    }

    #[test]
    fn single_cell_grid_is_whole_image() {
        let set = TileSet::new(&cell_coded(30, 1), 1).unwrap();
        assert_eq!(set.count(), 1);
        assert_eq!(
            set.image_at(0).unwrap().source_rect(),
            PixelRect { x: 0, y: 0, width: 30, height: 30 }
        );
    }

    #[test]
    fn from_bytes_decodes_png() {
        let mut bytes = Vec::new();
        cell_coded(50, 5)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let set = TileSet::from_bytes(&bytes, 5, SlicePolicy::Strict).unwrap();
        assert_eq!(set.count(), 25);
        assert_eq!(set.image_at(7).unwrap().pixels().get_pixel(0, 0), &Rgba([2, 1, 0, 255]));
    }

    #[test]
    fn from_bytes_rejects_garbage() {
        let result = TileSet::from_bytes(b"not an image", 5, SlicePolicy::Clip);
        assert!(matches!(result, Err(TileError::Decode(_))));
    }

    //=====================================================================
    // Access
    //=====================================================================

    #[test]
    fn image_at_out_of_range_is_an_error() {
        let set = TileSet::new(&cell_coded(500, 5), 5).unwrap();
        assert!(matches!(
            set.image_at(25),
            Err(TileError::IndexOutOfBounds { index: 25, len: 25 })
        ));
    }

    //=====================================================================
    // Swap
    //=====================================================================

    #[test]
    fn swap_exchanges_only_the_two_positions() {
        let mut set = TileSet::new(&cell_coded(500, 5), 5).unwrap();
        let before = snapshot(&set);

        set.swap(3, 17).unwrap();
        let after = snapshot(&set);

        assert_eq!(after[3], before[17]);
        assert_eq!(after[17], before[3]);
        for k in (0..25).filter(|k| *k != 3 && *k != 17) {
            assert_eq!(after[k], before[k]);
        }
    }

    #[test]
    fn swap_twice_restores_order() {
        let mut set = TileSet::new(&cell_coded(500, 5), 5).unwrap();
        let before = snapshot(&set);

        for (i, j) in [(0, 24), (6, 6), (11, 2)] {
            set.swap(i, j).unwrap();
            set.swap(i, j).unwrap();
            assert_eq!(snapshot(&set), before);
        }
    }

    #[test]
    fn swap_same_index_is_noop() {
        let mut set = TileSet::new(&cell_coded(500, 5), 5).unwrap();
        let before = snapshot(&set);
        set.swap(9, 9).unwrap();
        assert_eq!(snapshot(&set), before);
    }

    #[test]
    fn swap_out_of_range_leaves_set_untouched() {
        let mut set = TileSet::new(&cell_coded(500, 5), 5).unwrap();
        let before = snapshot(&set);

        assert!(set.swap(0, 25).is_err());
        assert!(set.swap(40, 1).is_err());
        assert_eq!(snapshot(&set), before);
    }

    #[test]
    fn tile_clones_share_pixels() {
        let set = TileSet::new(&cell_coded(500, 5), 5).unwrap();
        let tile = set.image_at(4).unwrap();
        let clone = tile.clone();
        assert!(tile.shares_pixels(&clone));
        assert_eq!(tile, &clone);
    }
}
