//! Shutter regions.
//!
//! DICOM lets a data set carry several shutter shapes at once; the visible
//! area is the part of the image inside *all* of them. [`Region`] expresses
//! that (and the occluded-area dual, a union) as a small expression tree.
//!
//! Regions have value semantics. Re-anchoring a region to a cropped image
//! produces a translated copy and never touches the original, which may be
//! shared by other images referencing the same presentation state.

use serde::{Deserialize, Serialize};

use crate::{Coverage, Shape};

/// An immutable area of the image plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// A single primitive shape.
    Shape(Shape),
    /// Pixels covered by any member.
    Union(Vec<Region>),
    /// Pixels covered by every member. An empty intersection covers nothing.
    Intersection(Vec<Region>),
}

impl From<Shape> for Region {
    fn from(shape: Shape) -> Self {
        Self::Shape(shape)
    }
}

impl Region {
    /// Union of `regions`, collapsing the single-member case.
    #[must_use]
    pub fn union(mut regions: Vec<Self>) -> Self {
        if regions.len() == 1 {
            return regions.remove(0);
        }
        Self::Union(regions)
    }

    /// Intersection of `regions`, collapsing the single-member case.
    #[must_use]
    pub fn intersection(mut regions: Vec<Self>) -> Self {
        if regions.len() == 1 {
            return regions.remove(0);
        }
        Self::Intersection(regions)
    }

    /// A copy of this region moved by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        match self {
            Self::Shape(shape) => Self::Shape(shape.translated(dx, dy)),
            Self::Union(members) => {
                Self::Union(members.iter().map(|m| m.translated(dx, dy)).collect())
            }
            Self::Intersection(members) => {
                Self::Intersection(members.iter().map(|m| m.translated(dx, dy)).collect())
            }
        }
    }

    /// Number of primitive shapes in the tree.
    #[must_use]
    pub fn shape_count(&self) -> usize {
        match self {
            Self::Shape(_) => 1,
            Self::Union(members) | Self::Intersection(members) => {
                members.iter().map(Self::shape_count).sum()
            }
        }
    }

    /// Rasterize into a `width × height` coverage bitmap.
    #[must_use]
    pub fn rasterize(&self, width: u32, height: u32) -> Coverage {
        match self {
            Self::Shape(shape) => shape.rasterize(width, height),
            Self::Union(members) => {
                let mut acc = Coverage::empty(width, height);
                for member in members {
                    acc.union_with(&member.rasterize(width, height));
                }
                acc
            }
            Self::Intersection(members) => {
                let Some((first, rest)) = members.split_first() else {
                    return Coverage::empty(width, height);
                };
                let mut acc = first.rasterize(width, height);
                for member in rest {
                    acc.intersect_with(&member.rasterize(width, height));
                }
                acc
            }
        }
    }
}
