//! Shutter geometry.
//!
//! A shutter region is an immutable tree of primitive [`Shape`]s combined by
//! union or intersection. Regions are rasterized into a [`Coverage`] bitmap
//! at the size of the image being masked.
//!
//! # Coordinates
//!
//! Regions live in image pixel space: pixel `(x, y)` occupies the square
//! `[x, x + 1) × [y, y + 1)` and is covered when its centre lies inside the
//! region. No anti-aliasing is applied, so a shutter edge is always a hard
//! pixel boundary.

pub mod coverage;
pub mod region;
pub mod shape;

pub use coverage::Coverage;
pub use region::Region;
pub use shape::Shape;
