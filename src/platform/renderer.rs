//=========================================================================
// Grid Renderer
//=========================================================================
//
// Paints the controller's cells into a 0RGB `u32` framebuffer.
//
// Architecture:
//   for each cell i:
//     FlowLayout::frame_at(i) (logical) × scale factor → physical square
//     cell_content(i) → nearest-neighbour scaled into that square
//
// The painter knows nothing about windows; the platform hands it the
// softbuffer surface's pixel slice once per redraw.
//
//=========================================================================

//=== External Dependencies ===============================================

use image::Rgba;
use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::grid::layout::{CellFrame, ViewSize};
use crate::core::grid::GridController;
use crate::core::tiles::Tile;

//=== Constants ===========================================================

/// Window background between and around cells (0RGB).
pub(crate) const BACKGROUND: u32 = 0x0020_2020;

//=== FrameTarget =========================================================

/// Row-major pixel slice with its physical size.
pub(crate) struct FrameTarget<'a> {
    pub pixels: &'a mut [u32],
    pub width: u32,
    pub height: u32,
}

impl FrameTarget<'_> {
    fn put(&mut self, x: i64, y: i64, color: u32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }

        let offset = y as usize * self.width as usize + x as usize;
        if let Some(pixel) = self.pixels.get_mut(offset) {
            *pixel = color;
        }
    }
}

//=== paint() =============================================================

/// Clears `target` and draws every cell. Returns the number of cells drawn.
pub(crate) fn paint(
    controller: &GridController,
    view: ViewSize,
    scale_factor: f64,
    target: &mut FrameTarget<'_>,
) -> usize {
    target.pixels.fill(BACKGROUND);

    let mut painted = 0;
    for index in 0..controller.cell_count() {
        let Ok(tile) = controller.cell_content(index) else {
            continue;
        };

        let frame = controller.layout().frame_at(index, view);
        if blit(tile, frame, scale_factor, target) {
            painted += 1;
        }
    }

    trace!(target: "platform", "Painted {} cells", painted);
    painted
}

//--- Internal Helpers ----------------------------------------------------

fn blit(tile: &Tile, frame: CellFrame, scale_factor: f64, target: &mut FrameTarget<'_>) -> bool {
    let x0 = (frame.x * scale_factor).round() as i64;
    let y0 = (frame.y * scale_factor).round() as i64;
    let side = (frame.side * scale_factor).round() as i64;

    let source = tile.pixels();
    let (tile_width, tile_height) = source.dimensions();
    if side <= 0 || tile_width == 0 || tile_height == 0 {
        return false;
    }

    for dy in 0..side {
        let ty = (dy * tile_height as i64 / side) as u32;
        for dx in 0..side {
            let tx = (dx * tile_width as i64 / side) as u32;
            target.put(x0 + dx, y0 + dy, pack(source.get_pixel(tx, ty)));
        }
    }

    true
}

/// Blends over the background and packs as 0RGB.
fn pack(pixel: &Rgba<u8>) -> u32 {
    let [r, g, b, a] = pixel.0;
    let over = |channel: u8, shift: u32| {
        let back = (BACKGROUND >> shift) & 0xff;
        let alpha = a as u32;
        (channel as u32 * alpha + back * (255 - alpha)) / 255
    };

    (over(r, 16) << 16) | (over(g, 8) << 8) | over(b, 0)
}

//=========================================================================
// Unit Tests
//=========================================================================
