//! Shutter compositing.
//!
//! [`apply`] is a pure function of the source image and the parameters:
//!
//! 1. Without an active shutter (`show` off or no shape) the source is
//!    returned as is, without copying.
//! 2. The occluded side of the shape is filled with the shutter colour.
//! 3. When a presentation state supplies a bitmap shutter overlay for the
//!    current frame, the overlay's pixels are filled as well, on top of the
//!    result of step 2.

use std::borrow::Cow;

use image::{DynamicImage, GenericImageView};
use shutter_common::{AttributeValue, Tag};
use tracing::{debug, trace};

use crate::ShutterError;
use crate::overlay::OverlayBitmap;
use crate::params::ShutterParameters;
use crate::raster::{composite_mask, mask_region};

/// Composite the shutter described by `params` onto `source`.
///
/// # Errors
///
/// Fails only when the underlying pixel operation fails; see
/// [`mask_region`] and [`composite_mask`].
pub fn apply<'a>(
    source: &'a DynamicImage,
    params: &ShutterParameters,
) -> Result<Cow<'a, DynamicImage>, ShutterError> {
    let shape = match (params.show, params.shape.as_ref()) {
        (true, Some(shape)) => shape,
        (show, shape) => {
            trace!(show, has_shape = shape.is_some(), "shutter inactive");
            return Ok(Cow::Borrowed(source));
        }
    };

    let fill = params.fill();
    debug!(
        color = ?fill.color,
        source = ?fill.source,
        occlusion = ?params.occlusion,
        shapes = shape.shape_count(),
        "applying shutter"
    );
    let masked = mask_region(source, shape, params.occlusion, fill.color)?;

    let (width, height) = masked.dimensions();
    let result = match overlay_shutter(params, width, height) {
        Some(overlay) => {
            debug!(
                group = overlay.group(),
                covered = overlay.coverage().covered_count(),
                "applying shutter overlay"
            );
            composite_mask(masked, &overlay, fill.color)?
        }
        None => masked,
    };
    Ok(Cow::Owned(result))
}

/// The bitmap shutter for the current frame, when every input needed to
/// build it is available.
fn overlay_shutter(params: &ShutterParameters, width: u32, height: u32) -> Option<OverlayBitmap> {
    let pr = params.presentation.as_ref()?;

    let overlays = pr.shutter_overlays();
    if overlays.is_empty() {
        trace!("presentation state has no shutter overlays");
        return None;
    }

    let Some(image) = params.source_image.as_ref() else {
        trace!("overlay skipped: no source image");
        return None;
    };
    let Some(frame) = image.frame_index() else {
        trace!("overlay skipped: frame index unknown");
        return None;
    };
    if image.rows().is_none() || image.columns().is_none() {
        trace!("overlay skipped: image size unknown");
        return None;
    }
    let Some(group) = pr
        .attribute(Tag::SHUTTER_OVERLAY_GROUP)
        .and_then(AttributeValue::as_u16)
    else {
        trace!("overlay skipped: no shutter overlay group");
        return None;
    };

    Some(OverlayBitmap::extract(width, height, overlays, group, frame))
}
