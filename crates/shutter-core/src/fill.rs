//! Shutter fill colour resolution.
//!
//! [PS3.3 § C.7.6.11.1 Shutter Presentation Value](https://dicom.nema.org/medical/dicom/current/output/chtml/part03/sect_C.7.6.11.html)
//!
//! Exactly one source decides the colour: an explicit RGB colour, else the
//! Shutter Presentation Value as a gray level, else black. The colour is
//! recomputed on every composite since the parameters may have changed.

use shutter_common::RgbColor;
use strum_macros::Display;

use crate::params::ShutterParameters;

/// Where a fill colour came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum FillSource {
    /// An explicit RGB colour.
    Explicit,
    /// A Shutter Presentation Value.
    PresentationValue,
    /// Nothing was specified.
    Default,
}

/// A resolved fill colour with its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FillColor {
    /// The colour to write into occluded pixels.
    pub color: RgbColor,
    /// Which parameter decided it.
    pub source: FillSource,
}

/// Resolve the fill colour from the two optional colour parameters.
#[must_use]
pub const fn resolve_fill(rgb_color: Option<RgbColor>, gray_value: Option<u16>) -> FillColor {
    match (rgb_color, gray_value) {
        (Some(color), _) => FillColor {
            color,
            source: FillSource::Explicit,
        },
        (None, Some(p_value)) => FillColor {
            color: RgbColor::from_p_value(p_value),
            source: FillSource::PresentationValue,
        },
        (None, None) => FillColor {
            color: RgbColor::BLACK,
            source: FillSource::Default,
        },
    }
}

/// The fill colour for `params`.
#[must_use]
pub const fn shutter_color(params: &ShutterParameters) -> RgbColor {
    params.fill().color
}
