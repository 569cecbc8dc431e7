//! Shutter stage error types.

use image::ColorType;
use thiserror::Error;

/// Errors that can occur while compositing a shutter or loading a
/// presentation document.
///
/// Missing or mistyped input data is never an error; it resolves to "no
/// shutter". Only failures of the pixel operations themselves surface here.
#[derive(Debug, Error)]
pub enum ShutterError {
    /// The image buffer uses a pixel layout the fill primitives cannot write.
    #[error("unsupported pixel layout: {0:?}")]
    UnsupportedPixelLayout(ColorType),

    /// A coverage bitmap does not match the buffer it is applied to.
    #[error(
        "coverage is {coverage_width}x{coverage_height} but the image is {image_width}x{image_height}"
    )]
    CoverageMismatch {
        /// Width of the coverage bitmap.
        coverage_width: u32,
        /// Height of the coverage bitmap.
        coverage_height: u32,
        /// Width of the image buffer.
        image_width: u32,
        /// Height of the image buffer.
        image_height: u32,
    },

    /// An overlay plane is larger than a DICOM overlay can be.
    #[error(
        "overlay group {group:#06x} of {rows}x{columns} pixels and {frames} frames exceeds the overlay size limit"
    )]
    OverlayTooLarge {
        /// Overlay group.
        group: u16,
        /// Overlay Rows.
        rows: u32,
        /// Overlay Columns.
        columns: u32,
        /// Number of Frames in Overlay.
        frames: u32,
    },

    /// A presentation document could not be read.
    #[error("failed to read presentation document: {0}")]
    Io(#[from] std::io::Error),

    /// A presentation document is not valid JSON for the expected schema.
    #[error("invalid presentation document: {0}")]
    Document(#[from] serde_json::Error),
}
