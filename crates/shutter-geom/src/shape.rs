//! Primitive shutter shapes.
//!
//! [PS3.3 § C.7.6.11 Display Shutter Module](https://dicom.nema.org/medical/dicom/current/output/chtml/part03/sect_C.7.6.11.html)
//!
//! The DICOM shutter shapes are RECTANGULAR, CIRCULAR and POLYGONAL. The
//! `from_dicom_*` constructors take the 1-based row/column values found in
//! the data set and convert them to pixel space.

use serde::{Deserialize, Serialize};
use tiny_skia::{FillRule, Mask, Path, PathBuilder, Rect, Transform};

use crate::Coverage;

/// A single closed shape in image pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Axis-aligned rectangle with its top-left corner at `(x, y)`.
    Rectangle {
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// Width in pixels.
        width: f32,
        /// Height in pixels.
        height: f32,
    },
    /// Axis-aligned ellipse.
    Ellipse {
        /// Centre x.
        cx: f32,
        /// Centre y.
        cy: f32,
        /// Horizontal radius.
        rx: f32,
        /// Vertical radius.
        ry: f32,
    },
    /// Closed polygon through `points` (`[x, y]` pairs), filled even-odd.
    Polygon {
        /// Vertices in drawing order.
        points: Vec<[f32; 2]>,
    },
}

impl Shape {
    /// Rectangle from its top-left corner and size.
    #[must_use]
    pub const fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::Rectangle {
            x,
            y,
            width,
            height,
        }
    }

    /// Circle from its centre and radius.
    #[must_use]
    pub const fn circle(cx: f32, cy: f32, radius: f32) -> Self {
        Self::Ellipse {
            cx,
            cy,
            rx: radius,
            ry: radius,
        }
    }

    /// RECTANGULAR shutter from its inclusive 1-based edges.
    ///
    /// Shutter Left/Right Vertical Edge are columns, Shutter Upper/Lower
    /// Horizontal Edge are rows.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_dicom_rectangular(left: u32, right: u32, upper: u32, lower: u32) -> Self {
        let x = left.saturating_sub(1) as f32;
        let y = upper.saturating_sub(1) as f32;
        Self::Rectangle {
            x,
            y,
            width: right as f32 - x,
            height: lower as f32 - y,
        }
    }

    /// CIRCULAR shutter from its 1-based `(row, column)` centre and radius.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_dicom_circular(center_row: u32, center_column: u32, radius: u32) -> Self {
        Self::circle(
            center_column as f32 - 0.5,
            center_row as f32 - 0.5,
            radius as f32,
        )
    }

    /// POLYGONAL shutter from 1-based `(row, column)` vertices.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_dicom_polygonal(vertices: &[(u32, u32)]) -> Self {
        Self::Polygon {
            points: vertices
                .iter()
                .map(|&(row, column)| [column as f32 - 0.5, row as f32 - 0.5])
                .collect(),
        }
    }

    /// A copy of this shape moved by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        match self {
            Self::Rectangle {
                x,
                y,
                width,
                height,
            } => Self::Rectangle {
                x: x + dx,
                y: y + dy,
                width: *width,
                height: *height,
            },
            Self::Ellipse { cx, cy, rx, ry } => Self::Ellipse {
                cx: cx + dx,
                cy: cy + dy,
                rx: *rx,
                ry: *ry,
            },
            Self::Polygon { points } => Self::Polygon {
                points: points.iter().map(|[x, y]| [x + dx, y + dy]).collect(),
            },
        }
    }

    /// Rasterize into a `width × height` coverage bitmap.
    ///
    /// Degenerate shapes (non-positive size, fewer than three vertices,
    /// non-finite coordinates) cover nothing.
    #[must_use]
    pub fn rasterize(&self, width: u32, height: u32) -> Coverage {
        let Some(path) = self.to_path() else {
            return Coverage::empty(width, height);
        };
        let Some(mut mask) = Mask::new(width, height) else {
            return Coverage::empty(width, height);
        };
        mask.fill_path(&path, self.fill_rule(), false, Transform::identity());
        Coverage::from_mask(&mask)
    }

    const fn fill_rule(&self) -> FillRule {
        match self {
            Self::Polygon { .. } => FillRule::EvenOdd,
            Self::Rectangle { .. } | Self::Ellipse { .. } => FillRule::Winding,
        }
    }

    fn to_path(&self) -> Option<Path> {
        match self {
            Self::Rectangle {
                x,
                y,
                width,
                height,
            } => {
                if *width <= 0.0 || *height <= 0.0 {
                    return None;
                }
                let mut pb = PathBuilder::new();
                pb.move_to(*x, *y);
                pb.line_to(x + width, *y);
                pb.line_to(x + width, y + height);
                pb.line_to(*x, y + height);
                pb.close();
                pb.finish()
            }
            Self::Ellipse { cx, cy, rx, ry } => {
                if *rx <= 0.0 || *ry <= 0.0 {
                    return None;
                }
                let oval = Rect::from_xywh(cx - rx, cy - ry, rx * 2.0, ry * 2.0)?;
                PathBuilder::from_oval(oval)
            }
            Self::Polygon { points } => {
                let (first, rest) = points.split_first()?;
                if rest.len() < 2 {
                    return None;
                }
                let mut pb = PathBuilder::new();
                pb.move_to(first[0], first[1]);
                for [x, y] in rest {
                    pb.line_to(*x, *y);
                }
                pb.close();
                pb.finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dicom_rectangle_edges_are_inclusive() {
        // Columns 11..=60 and rows 11..=60 are the pixels 10..60.
        let shape = Shape::from_dicom_rectangular(11, 60, 11, 60);
        assert_eq!(shape, Shape::rect(10.0, 10.0, 50.0, 50.0));
    }

    #[test]
    fn dicom_circle_centre_is_pixel_centre() {
        let shape = Shape::from_dicom_circular(5, 8, 3);
        assert_eq!(shape, Shape::circle(7.5, 4.5, 3.0));
    }

    #[test]
    fn degenerate_shapes_cover_nothing() {
        assert_eq!(Shape::rect(0.0, 0.0, 0.0, 5.0).rasterize(8, 8).covered_count(), 0);
        assert_eq!(Shape::circle(4.0, 4.0, -1.0).rasterize(8, 8).covered_count(), 0);
        let line = Shape::Polygon {
            points: vec![[0.0, 0.0], [4.0, 4.0]],
        };
        assert_eq!(line.rasterize(8, 8).covered_count(), 0);
    }

    #[test]
    fn translation_keeps_size() {
        let moved = Shape::rect(1.0, 2.0, 3.0, 4.0).translated(-1.0, 5.0);
        assert_eq!(moved, Shape::rect(0.0, 7.0, 3.0, 4.0));
    }

    #[test]
    fn zero_sized_target_is_empty() {
        let coverage = Shape::rect(0.0, 0.0, 5.0, 5.0).rasterize(0, 0);
        assert_eq!(coverage.width(), 0);
        assert_eq!(coverage.covered_count(), 0);
    }
}
