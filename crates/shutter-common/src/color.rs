//! Shutter fill colours.
//!
//! [PS3.3 § C.7.6.11 Display Shutter Module](https://dicom.nema.org/medical/dicom/current/output/chtml/part03/sect_C.7.6.11.html)
//!
//! A shutter is filled either with an explicit colour or with a single gray
//! level expressed in P-Values. Both end up as an [`RgbColor`].

use serde::{Deserialize, Serialize};

/// D65 reference white used for CIELab conversion.
const WHITE_X: f64 = 0.950_47;
const WHITE_Y: f64 = 1.0;
const WHITE_Z: f64 = 1.088_83;

/// An opaque 8-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Default for RgbColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl RgbColor {
    /// Black (#000000)
    pub const BLACK: Self = Self::gray(0);

    /// White (#ffffff)
    pub const WHITE: Self = Self::gray(255);

    /// Create a colour from its three channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A neutral gray with the same level in every channel.
    #[must_use]
    pub const fn gray(level: u8) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
        }
    }

    /// Gray colour for a Shutter Presentation Value.
    ///
    /// "A single gray unsigned value used to replace those parts of the image
    /// occluded by the shutter ... The units are specified in P-Values, from a
    /// minimum of 0000H (black) up to a maximum of FFFFH (white)."
    ///
    /// The 16-bit P-Value keeps its high byte.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_p_value(p_value: u16) -> Self {
        Self::gray((p_value >> 8) as u8)
    }

    /// Parse `#RGB` or `#RRGGBB` hex notation. The leading `#` is optional.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
                Some(Self { r, g, b })
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self { r, g, b })
            }
            _ => None,
        }
    }

    /// Convert a DICOM-encoded CIELab triple to sRGB.
    ///
    /// [PS3.3 § C.10.7.1.1 Encoding of CIELab Values](https://dicom.nema.org/medical/dicom/current/output/chtml/part03/sect_C.10.7.html)
    ///
    /// L* is scaled from 0..=100 onto 0..=0xFFFF, a* and b* from -128..=127
    /// onto 0..=0xFFFF. Out-of-gamut results are clamped.
    #[must_use]
    pub fn from_dicom_lab(lab: [u16; 3]) -> Self {
        let l = f64::from(lab[0]) * 100.0 / 65535.0;
        let a = f64::from(lab[1]).mul_add(255.0 / 65535.0, -128.0);
        let b = f64::from(lab[2]).mul_add(255.0 / 65535.0, -128.0);

        let fy = (l + 16.0) / 116.0;
        let fx = fy + a / 500.0;
        let fz = fy - b / 200.0;

        let x = WHITE_X * lab_inverse(fx);
        let y = WHITE_Y * lab_inverse(fy);
        let z = WHITE_Z * lab_inverse(fz);

        let r = 3.240_454_2f64.mul_add(x, (-1.537_138_5f64).mul_add(y, -0.498_531_4 * z));
        let g = (-0.969_266_0f64).mul_add(x, 1.876_010_8f64.mul_add(y, 0.041_556_0 * z));
        let bl = 0.055_643_4f64.mul_add(x, (-0.204_025_9f64).mul_add(y, 1.057_225_2 * z));

        Self {
            r: encode_srgb(r),
            g: encode_srgb(g),
            b: encode_srgb(bl),
        }
    }

    /// Luma of the colour with Rec. 709 weights, for gray buffers.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn luma(self) -> u8 {
        if self.r == self.g && self.g == self.b {
            return self.r;
        }
        let weighted =
            2126 * u32::from(self.r) + 7152 * u32::from(self.g) + 722 * u32::from(self.b);
        ((weighted + 5000) / 10000) as u8
    }
}

fn lab_inverse(t: f64) -> f64 {
    let cube = t * t * t;
    if cube > 0.008_856 {
        cube
    } else {
        (t - 16.0 / 116.0) / 7.787
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn encode_srgb(linear: f64) -> u8 {
    let linear = linear.clamp(0.0, 1.0);
    let encoded = if linear <= 0.003_130_8 {
        12.92 * linear
    } else {
        1.055f64.mul_add(linear.powf(1.0 / 2.4), -0.055)
    };
    (encoded * 255.0).round().clamp(0.0, 255.0) as u8
}
