//=========================================================================
// Flow Layout
//=========================================================================
//
// Answers the host view's layout queries for a square tile grid.
//
// Architecture:
//   ViewSize → cell side (floor(min(w, h) / n)) → columns that fit → frames
//
// Cells flow left to right and wrap, like a platform flow layout. Spacing
// and insets are fixed configuration, never computed. All values are in
// logical units; the host converts from physical pixels.
//
//=========================================================================

//=== ViewSize ============================================================

/// Available display size of the host grid view, in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewSize {
    pub width: f64,
    pub height: f64,
}

impl ViewSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

//=== EdgeInsets ==========================================================

/// Section insets around the grid content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgeInsets {
    pub const ZERO: Self = Self {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    /// Same inset on every edge.
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            left: value,
            bottom: value,
            right: value,
        }
    }
}

//=== CellFrame ===========================================================

/// Position and side length of one square cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellFrame {
    pub x: f64,
    pub y: f64,
    pub side: f64,
}

impl CellFrame {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.side && y >= self.y && y < self.y + self.side
    }
}

//=== LayoutConfig ========================================================

/// Fixed spacing configuration for the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub line_spacing: f64,
    pub interitem_spacing: f64,
    pub insets: EdgeInsets,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_spacing: 1.0,
            interitem_spacing: 1.0,
            insets: EdgeInsets::ZERO,
        }
    }
}

//=== FlowLayout ==========================================================

/// Layout delegate for a grid of `dimension` × `dimension` square cells.
#[derive(Debug, Clone)]
pub struct FlowLayout {
    dimension: usize,
    config: LayoutConfig,
}

impl FlowLayout {
    //--- Construction -----------------------------------------------------

    pub fn new(dimension: usize, config: LayoutConfig) -> Self {
        Self {
            dimension: dimension.max(1),
            config,
        }
    }

    //--- Delegate Queries -------------------------------------------------

    /// Uniform cell side: floor(min(width, height) / dimension).
    pub fn cell_side(&self, view: ViewSize) -> f64 {
        let minimum = view.width.min(view.height).max(0.0);
        (minimum / self.dimension as f64).floor()
    }

    pub fn line_spacing(&self) -> f64 {
        self.config.line_spacing
    }

    pub fn interitem_spacing(&self) -> f64 {
        self.config.interitem_spacing
    }

    pub fn section_insets(&self) -> EdgeInsets {
        self.config.insets
    }

    //--- Flow Metrics -----------------------------------------------------

    /// Number of cells that fit on one row (at least 1).
    pub fn columns(&self, view: ViewSize) -> usize {
        let side = self.cell_side(view);
        if side <= 0.0 {
            return 1;
        }

        let insets = self.config.insets;
        let available = view.width - insets.left - insets.right;
        let stride = side + self.config.interitem_spacing;
        let fit = ((available + self.config.interitem_spacing) / stride).floor();

        if fit >= 1.0 {
            fit as usize
        } else {
            1
        }
    }

    /// Frame of the cell at `index` in linear (row-major) order.
    pub fn frame_at(&self, index: usize, view: ViewSize) -> CellFrame {
        let side = self.cell_side(view);
        let columns = self.columns(view);
        let row = index / columns;
        let col = index % columns;
        let insets = self.config.insets;

        CellFrame {
            x: insets.left + col as f64 * (side + self.config.interitem_spacing),
            y: insets.top + row as f64 * (side + self.config.line_spacing),
            side,
        }
    }

    /// Cell index under the point `(x, y)`, if it hits one of `count` cells.
    ///
    /// Points on spacing gaps or insets resolve to `None`.
    pub fn index_at(&self, x: f64, y: f64, view: ViewSize, count: usize) -> Option<usize> {
        let side = self.cell_side(view);
        if side <= 0.0 || count == 0 {
            return None;
        }

        let insets = self.config.insets;
        let local_x = x - insets.left;
        let local_y = y - insets.top;
        if local_x < 0.0 || local_y < 0.0 {
            return None;
        }

        let col = (local_x / (side + self.config.interitem_spacing)).floor() as usize;
        let row = (local_y / (side + self.config.line_spacing)).floor() as usize;
        let columns = self.columns(view);
        if col >= columns {
            return None;
        }

        let index = row.checked_mul(columns)?.checked_add(col)?;
        if index >= count {
            return None;
        }

        self.frame_at(index, view).contains(x, y).then_some(index)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tight() -> FlowLayout {
        FlowLayout::new(
            5,
            LayoutConfig {
                line_spacing: 0.0,
                interitem_spacing: 0.0,
                insets: EdgeInsets::ZERO,
            },
        )
    }

    #[test]
    fn cell_side_uses_shorter_edge() {
        let layout = tight();
        assert_eq!(layout.cell_side(ViewSize::new(500.0, 800.0)), 100.0);
        assert_eq!(layout.cell_side(ViewSize::new(900.0, 503.0)), 100.0);
    }

    #[test]
    fn cell_side_is_floored() {
        let layout = tight();
        assert_eq!(layout.cell_side(ViewSize::new(499.0, 499.0)), 99.0);
    }

    #[test]
    fn spacing_is_configuration() {
        let layout = FlowLayout::new(5, LayoutConfig::default());
        assert_eq!(layout.line_spacing(), 1.0);
        assert_eq!(layout.interitem_spacing(), 1.0);
        assert_eq!(layout.section_insets(), EdgeInsets::ZERO);
    }

    #[test]
    fn tight_square_view_fits_full_rows() {
        let layout = tight();
        assert_eq!(layout.columns(ViewSize::new(500.0, 500.0)), 5);
    }

    #[test]
    fn spacing_can_wrap_the_last_column() {
        let layout = FlowLayout::new(5, LayoutConfig::default());
        // 5 cells of 100 plus 4 gaps of 1 do not fit in 500.
        assert_eq!(layout.columns(ViewSize::new(500.0, 500.0)), 4);
        assert_eq!(layout.columns(ViewSize::new(504.0, 504.0)), 5);
    }

    #[test]
    fn frames_follow_row_major_order() {
        let layout = tight();
        let view = ViewSize::new(500.0, 500.0);
        assert_eq!(layout.frame_at(12, view), CellFrame { x: 200.0, y: 200.0, side: 100.0 });
        assert_eq!(layout.frame_at(24, view), CellFrame { x: 400.0, y: 400.0, side: 100.0 });
    }

    #[test]
    fn hit_test_resolves_cells() {
        let layout = tight();
        let view = ViewSize::new(500.0, 500.0);
        assert_eq!(layout.index_at(250.0, 250.0, view, 25), Some(12));
        assert_eq!(layout.index_at(0.0, 0.0, view, 25), Some(0));
        assert_eq!(layout.index_at(499.0, 499.0, view, 25), Some(24));
    }

    #[test]
    fn hit_test_misses_outside_content() {
        let layout = tight();
        let view = ViewSize::new(500.0, 500.0);
        assert_eq!(layout.index_at(-1.0, 10.0, view, 25), None);
        assert_eq!(layout.index_at(10.0, 510.0, view, 25), None);
        assert_eq!(layout.index_at(10.0, 10.0, view, 0), None);
    }

    #[test]
    fn hit_test_misses_gaps_and_insets() {
        let layout = FlowLayout::new(
            5,
            LayoutConfig {
                line_spacing: 4.0,
                interitem_spacing: 4.0,
                insets: EdgeInsets::uniform(10.0),
            },
        );
        let view = ViewSize::new(600.0, 600.0);
        // side = 120, stride = 124, columns = floor((580 + 4) / 124) = 4
        assert_eq!(layout.columns(view), 4);
        assert_eq!(layout.index_at(5.0, 50.0, view, 25), None);
        assert_eq!(layout.index_at(132.0, 50.0, view, 25), None);
        assert_eq!(layout.index_at(140.0, 50.0, view, 25), Some(1));
    }

    #[test]
    fn degenerate_view_has_no_hits() {
        let layout = tight();
        let view = ViewSize::new(3.0, 3.0);
        assert_eq!(layout.cell_side(view), 0.0);
        assert_eq!(layout.columns(view), 1);
        assert_eq!(layout.index_at(1.0, 1.0, view, 25), None);
    }
}
