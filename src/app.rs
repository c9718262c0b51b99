//=========================================================================
// Tile Puzzle
//
// Main entry point: configuration and runtime for a puzzle window.
//
// Architecture:
// ```text
//     PuzzleBuilder  ──build()──>  Puzzle  ──run()──>  [Event Loop]
//         │                          │
//         ├─ with_grid_dimension()   ├─ owns GridController
//         ├─ with_image[_path]()     │   (decode worker running)
//         └─ with_window_*()         └─ hands it to the platform
//                                       blocks until exit
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use image::{DynamicImage, Rgba, RgbaImage};
use log::{error, info};
use winit::dpi::LogicalSize;

//=== Internal Dependencies ===============================================

use crate::core::grid::layout::{EdgeInsets, LayoutConfig};
use crate::core::grid::{GridConfig, GridController};
use crate::core::tiles::SlicePolicy;
use crate::core::TileError;
use crate::platform::{Platform, PlatformError, WindowSettings};

//=== Constants ===========================================================

/// Side length of the generated default image.
const DEFAULT_IMAGE_SIDE: u32 = 500;

//=== Default Image =======================================================

/// Generated 500×500 picture used when no image is configured.
///
/// A red/green gradient over a 100px checker, so every tile of the
/// default 5×5 grid is visually distinct.
pub fn default_image() -> DynamicImage {
    let last = DEFAULT_IMAGE_SIDE - 1;
    let image = RgbaImage::from_fn(DEFAULT_IMAGE_SIDE, DEFAULT_IMAGE_SIDE, |x, y| {
        let red = (x * 255 / last) as u8;
        let green = (y * 255 / last) as u8;
        let blue = if (x / 100 + y / 100) % 2 == 0 { 200 } else { 60 };
        Rgba([red, green, blue, 255])
    });
    DynamicImage::ImageRgba8(image)
}

//=== ImageSource =========================================================

enum ImageSource {
    Generated,
    Image(DynamicImage),
    Path(PathBuf),
}

impl ImageSource {
    fn load(self) -> Result<DynamicImage, TileError> {
        match self {
            ImageSource::Generated => Ok(default_image()),
            ImageSource::Image(image) => Ok(image),
            ImageSource::Path(path) => {
                info!("Loading puzzle image from {}", path.display());
                let bytes = std::fs::read(&path)?;
                Ok(image::load_from_memory(&bytes)?)
            }
        }
    }
}

//=== PuzzleBuilder =======================================================

/// Builder for configuring and constructing a [`Puzzle`].
///
/// # Default Values
///
/// - **Grid dimension**: 5 (25 tiles)
/// - **Spacing**: 1.0 between lines and between items, no insets
/// - **Slice policy**: [`SlicePolicy::Clip`]
/// - **Image**: [`default_image`]
/// - **Decode capacity**: 4 pending external drops
/// - **Window**: "Tile Puzzle", 500×500 logical pixels
///
/// # Examples
///
/// ```no_run
/// use tile_puzzle::PuzzleBuilder;
///
/// PuzzleBuilder::new()
///     .with_grid_dimension(4)
///     .with_image_path("photo.jpg")
///     .build()
///     .expect("puzzle image")
///     .run()
///     .expect("event loop");
/// ```
pub struct PuzzleBuilder {
    dimension: usize,
    layout: LayoutConfig,
    slice_policy: SlicePolicy,
    image: ImageSource,
    decode_capacity: usize,
    title: String,
    window_size: LogicalSize<u32>,
}

impl PuzzleBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        let grid = GridConfig::default();
        Self {
            dimension: grid.dimension,
            layout: grid.layout,
            slice_policy: grid.slice_policy,
            image: ImageSource::Generated,
            decode_capacity: grid.decode_capacity,
            title: "Tile Puzzle".to_string(),
            window_size: LogicalSize::new(DEFAULT_IMAGE_SIDE, DEFAULT_IMAGE_SIDE),
        }
    }

    /// Sets the number of rows (and columns) of the puzzle.
    ///
    /// Default: 5
    ///
    /// # Panics
    ///
    /// Panics if `dimension == 0`.
    pub fn with_grid_dimension(mut self, dimension: usize) -> Self {
        assert!(dimension > 0, "Grid dimension must be positive");
        self.dimension = dimension;
        self
    }

    /// Sets the spacing between rows and between cells in a row.
    ///
    /// # Panics
    ///
    /// Panics if either value is negative.
    pub fn with_spacing(mut self, line_spacing: f64, interitem_spacing: f64) -> Self {
        assert!(
            line_spacing >= 0.0 && interitem_spacing >= 0.0,
            "Spacing must not be negative, got {} / {}",
            line_spacing,
            interitem_spacing
        );
        self.layout.line_spacing = line_spacing;
        self.layout.interitem_spacing = interitem_spacing;
        self
    }

    pub fn with_insets(mut self, insets: EdgeInsets) -> Self {
        self.layout.insets = insets;
        self
    }

    /// Sets how images that don't divide evenly are sliced.
    pub fn with_slice_policy(mut self, policy: SlicePolicy) -> Self {
        self.slice_policy = policy;
        self
    }

    /// Uses an already decoded image as the initial puzzle.
    pub fn with_image(mut self, image: DynamicImage) -> Self {
        self.image = ImageSource::Image(image);
        self
    }

    /// Loads the initial puzzle from a file at build time.
    pub fn with_image_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.image = ImageSource::Path(path.into());
        self
    }

    /// Sets how many external drops may wait for decoding.
    ///
    /// Drops beyond this are ignored until the worker catches up.
    ///
    /// Default: 4
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_decode_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Decode queue capacity must be positive");
        self.decode_capacity = capacity;
        self
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the initial window size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either side is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be positive, got {}x{}", width, height);
        self.window_size = LogicalSize::new(width, height);
        self
    }

    /// Loads the image, slices it and starts the decode worker.
    ///
    /// # Errors
    ///
    /// Returns [`TileError`] if the image file cannot be read or decoded,
    /// or if the strict slice policy rejects its size.
    pub fn build(self) -> Result<Puzzle, TileError> {
        info!(
            "Building puzzle ({}x{}, decode capacity: {})",
            self.dimension, self.dimension, self.decode_capacity
        );

        let config = GridConfig {
            dimension: self.dimension,
            layout: self.layout,
            slice_policy: self.slice_policy,
            decode_capacity: self.decode_capacity,
        };

        let source = self.image.load()?;
        let controller = GridController::new(&source, config)?;

        Ok(Puzzle {
            controller,
            window: WindowSettings {
                title: self.title,
                size: self.window_size,
            },
        })
    }
}

impl Default for PuzzleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Puzzle ==============================================================

/// A configured puzzle, ready to open its window.
///
/// Create via [`PuzzleBuilder`]. The controller is usable before `run()`,
/// e.g. to attach a custom [`GridView`](crate::core::grid::view::GridView)
/// in a headless host.
pub struct Puzzle {
    controller: GridController,
    window: WindowSettings,
}

impl Puzzle {
    pub fn controller(&self) -> &GridController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut GridController {
        &mut self.controller
    }

    /// Consumes the puzzle and returns its controller, for hosts that
    /// bring their own event loop.
    pub fn into_controller(self) -> GridController {
        self.controller
    }

    //--- Execution --------------------------------------------------------

    /// Opens the window and blocks until it closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Hands the controller to the platform
    /// 2. Runs the winit event loop (blocks here)
    /// 3. On window close: view dropped, loop exits
    /// 4. Controller dropped → decode worker joins
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop fails.
    pub fn run(self) -> Result<(), PlatformError> {
        info!("Starting puzzle runtime ({} tiles)", self.controller.cell_count());

        let platform = Platform::new(self.controller, self.window);
        let result = platform.run();

        match &result {
            Ok(()) => info!("Puzzle shutdown complete"),
            Err(e) => error!("Platform error: {}", e),
        }

        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
