//! Shutter parameter resolution.
//!
//! [`resolve`] is a pure function from a lifecycle event and the current
//! parameters to the next parameters. Every qualifying event rebuilds the
//! derived fields from scratch, so nothing from the previous image or
//! presentation state can leak into the new record.
//!
//! | Event | Shutter source |
//! |-------|----------------|
//! | image change, display reset | the image's own cached shutter tags |
//! | presentation state applied | the presentation state in the event bag |
//! | anything else | unchanged |

use std::sync::Arc;

use shutter_geom::Region;
use tracing::{debug, trace};

use crate::event::{CropRect, ImageOpEvent, OpEvent};
use crate::media::ImageHandle;
use crate::params::ShutterParameters;

/// Derive the parameters that follow `event`.
///
/// `show` and `occlusion` are user settings and are carried over from
/// `current`. Missing or mistyped data resolves to "no shutter".
#[must_use]
pub fn resolve(event: &ImageOpEvent, current: &ShutterParameters) -> ShutterParameters {
    match event.kind {
        OpEvent::ImageChange | OpEvent::ResetDisplay => {
            from_image(event.kind, event.image.as_ref(), current)
        }
        OpEvent::ApplyPresentationState => from_presentation_state(event, current),
        OpEvent::SeriesChange => {
            trace!(event = %event.kind, "shutter parameters unchanged");
            current.clone()
        }
    }
}

fn from_image(
    kind: OpEvent,
    image: Option<&Arc<dyn ImageHandle>>,
    current: &ShutterParameters,
) -> ShutterParameters {
    let Some(image) = image else {
        debug!(event = %kind, "no image; shutter cleared");
        return current.cleared();
    };

    let next = ShutterParameters {
        shape: image.shutter_shape().cloned(),
        gray_value: image.shutter_p_value(),
        rgb_color: image.shutter_rgb_color(),
        presentation: None,
        source_image: Some(Arc::clone(image)),
        ..current.cleared()
    };
    debug!(
        event = %kind,
        has_shape = next.shape.is_some(),
        gray_value = ?next.gray_value,
        rgb_color = ?next.rgb_color,
        "shutter taken from image"
    );
    next
}

fn from_presentation_state(event: &ImageOpEvent, current: &ShutterParameters) -> ShutterParameters {
    let source_image = event.image.clone();

    let Some(pr) = event.params.presentation_state() else {
        debug!("no presentation state in event; shutter cleared");
        return ShutterParameters {
            source_image,
            ..current.cleared()
        };
    };

    let shape = pr.shutter_shape().map(|shape| match event.params.crop() {
        Some(crop) => reanchor(shape, crop),
        None => shape.clone(),
    });

    let overlays = pr.shutter_overlays().len();
    let next = ShutterParameters {
        shape,
        gray_value: pr.shutter_p_value(),
        rgb_color: pr.shutter_rgb_color(),
        presentation: Some(pr),
        source_image,
        ..current.cleared()
    };
    debug!(
        has_shape = next.shape.is_some(),
        overlays,
        gray_value = ?next.gray_value,
        rgb_color = ?next.rgb_color,
        "shutter taken from presentation state"
    );
    next
}

/// Move a shutter region into the local frame of a cropped image.
///
/// The region may be shared with other images through the presentation
/// state, so the result is always a new value.
#[allow(clippy::cast_precision_loss)]
fn reanchor(shape: &Region, crop: CropRect) -> Region {
    trace!(x = crop.x, y = crop.y, "re-anchoring shutter to crop origin");
    shape.translated(-(crop.x as f32), -(crop.y as f32))
}
