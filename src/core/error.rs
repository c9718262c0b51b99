//=========================================================================
// Tile Errors
//=========================================================================
//
// Error taxonomy for tile slicing, tile access and payload decoding.
//
// Index violations are returned to the caller instead of aborting, so a
// host can recover from a stale cell index (e.g. a drop that raced a
// puzzle replacement).
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== TileError ===========================================================

/// Errors produced by [`TileSet`](crate::core::tiles::TileSet) and the
/// decode worker.
#[derive(Debug, Error)]
pub enum TileError {
    /// Grid dimension must be at least 1.
    #[error("grid dimension must be at least 1, got {0}")]
    InvalidDimension(usize),

    /// A tile index outside `[0, len)`.
    #[error("tile index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Source does not divide evenly under the strict slice policy.
    #[error("source {width}x{height} is not divisible into a {dimension}x{dimension} grid")]
    UnevenDimensions {
        width: u32,
        height: u32,
        dimension: usize,
    },

    /// Payload bytes could not be decoded into an image.
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// Dropped file could not be read.
    #[error("payload read failed: {0}")]
    Io(#[from] std::io::Error),
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_error_reports_index_and_len() {
        let err = TileError::IndexOutOfBounds { index: 30, len: 25 };
        assert_eq!(err.to_string(), "tile index 30 out of bounds (len 25)");
    }

    #[test]
    fn uneven_error_reports_geometry() {
        let err = TileError::UnevenDimensions {
            width: 501,
            height: 500,
            dimension: 5,
        };
        assert!(err.to_string().contains("501x500"));
        assert!(err.to_string().contains("5x5"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TileError = io.into();
        assert!(matches!(err, TileError::Io(_)));
    }
}
