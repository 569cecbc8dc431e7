//! Shutter stage parameters.

use std::sync::Arc;

use shutter_common::RgbColor;
use shutter_geom::Region;
use strum_macros::Display;

use crate::fill::{FillColor, resolve_fill};
use crate::media::{ImageHandle, PresentationState};

/// Which side of the shutter region is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Occlusion {
    /// The region is the visible area; everything outside it is filled.
    /// This is how DICOM display shutters are defined.
    #[default]
    Outside,
    /// The region itself is the occluded area.
    Inside,
}

/// The complete parameter set of one shutter stage instance.
///
/// A new record is built by [`crate::resolve`] for every lifecycle event;
/// records are never patched in place.
#[derive(Debug, Clone, Default)]
pub struct ShutterParameters {
    /// Whether shuttering is active. A user toggle, kept across events.
    pub show: bool,
    /// Which side of `shape` is filled. Kept across events.
    pub occlusion: Occlusion,
    /// Shutter region in the pixel space of the image being processed.
    pub shape: Option<Region>,
    /// Shutter Presentation Value (P-Value), used when `rgb_color` is absent.
    pub gray_value: Option<u16>,
    /// Explicit fill colour.
    pub rgb_color: Option<RgbColor>,
    /// Presentation state providing bitmap shutter overlays.
    pub presentation: Option<Arc<dyn PresentationState>>,
    /// The image the shutter was derived for.
    pub source_image: Option<Arc<dyn ImageHandle>>,
}

impl ShutterParameters {
    /// Parameters for a shutter with no associated image or presentation state.
    #[must_use]
    pub fn with_shape(shape: impl Into<Region>) -> Self {
        Self {
            show: true,
            shape: Some(shape.into()),
            ..Self::default()
        }
    }

    /// A copy with the shutter toggled.
    #[must_use]
    pub fn with_show(&self, show: bool) -> Self {
        Self {
            show,
            ..self.clone()
        }
    }

    /// A copy with a different occlusion convention.
    #[must_use]
    pub fn with_occlusion(&self, occlusion: Occlusion) -> Self {
        Self {
            occlusion,
            ..self.clone()
        }
    }

    /// A copy with an explicit fill colour.
    #[must_use]
    pub fn with_rgb_color(&self, color: RgbColor) -> Self {
        Self {
            rgb_color: Some(color),
            ..self.clone()
        }
    }

    /// A copy with a fill P-Value.
    #[must_use]
    pub fn with_gray_value(&self, p_value: u16) -> Self {
        Self {
            gray_value: Some(p_value),
            ..self.clone()
        }
    }

    /// Parameters with every derived field cleared, keeping only the user
    /// settings (`show`, `occlusion`).
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self {
            show: self.show,
            occlusion: self.occlusion,
            ..Self::default()
        }
    }

    /// Whether compositing would change the image at all.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.show && self.shape.is_some()
    }

    /// The fill colour these parameters resolve to.
    #[must_use]
    pub const fn fill(&self) -> FillColor {
        resolve_fill(self.rgb_color, self.gray_value)
    }
}
