//! Per-pixel coverage bitmaps.
//!
//! A [`Coverage`] records, for every pixel of a target buffer, whether a
//! region (or an overlay plane) covers it. Geometric regions and overlay
//! bitmaps both end up here, so the pixel fill code has a single input type.

use tiny_skia::Mask;

/// A binary bitmap with one entry per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coverage {
    width: u32,
    height: u32,
    covered: Vec<bool>,
}

impl Coverage {
    /// A bitmap covering nothing.
    #[must_use]
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            covered: vec![false; pixel_count(width, height)],
        }
    }

    /// A bitmap covering every pixel.
    #[must_use]
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            covered: vec![true; pixel_count(width, height)],
        }
    }

    /// Convert a rasterized `tiny-skia` mask; any non-zero value counts as covered.
    #[must_use]
    pub fn from_mask(mask: &Mask) -> Self {
        Self {
            width: mask.width(),
            height: mask.height(),
            covered: mask.data().iter().map(|&v| v != 0).collect(),
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether `(x, y)` is covered. Out-of-bounds pixels are not.
    #[must_use]
    pub fn is_covered(&self, x: u32, y: u32) -> bool {
        self.index(x, y).is_some_and(|i| self.covered[i])
    }

    /// Mark or clear `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, covered: bool) {
        if let Some(i) = self.index(x, y) {
            self.covered[i] = covered;
        }
    }

    /// Number of covered pixels.
    #[must_use]
    pub fn covered_count(&self) -> usize {
        self.covered.iter().filter(|&&c| c).count()
    }

    /// Covered pixels in row-major order.
    pub fn covered_pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width.max(1);
        self.covered
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .filter_map(move |(i, _)| {
                let i = u32::try_from(i).ok()?;
                Some((i % width, i / width))
            })
    }

    /// Add every pixel covered by `other`. Sizes must match.
    pub fn union_with(&mut self, other: &Self) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        for (a, b) in self.covered.iter_mut().zip(&other.covered) {
            *a |= *b;
        }
    }

    /// Keep only pixels also covered by `other`. Sizes must match.
    pub fn intersect_with(&mut self, other: &Self) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        for (a, b) in self.covered.iter_mut().zip(&other.covered) {
            *a &= *b;
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        usize::try_from(u64::from(y) * u64::from(self.width) + u64::from(x)).ok()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn pixel_count(width: u32, height: u32) -> usize {
    (u64::from(width) * u64::from(height)) as usize
}
