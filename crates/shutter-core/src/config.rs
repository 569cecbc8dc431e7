//! JSON presentation documents.
//!
//! A presentation document describes the shutter-related content of a
//! presentation state in a form that is easy to write by hand:
//!
//! ```json
//! {
//!   "content_label": "COLLIMATED",
//!   "shutters": [
//!     { "shape": "rectangular", "left": 11, "right": 60, "upper": 11, "lower": 60 },
//!     { "shape": "circular", "center_row": 36, "center_column": 36, "radius": 30 }
//!   ],
//!   "presentation_value": 32768,
//!   "color": "#c80000",
//!   "shutter_overlay_group": 24576,
//!   "overlays": [
//!     { "group": 24576, "rows": 64, "columns": 64,
//!       "blocks": [{ "row": 0, "column": 0, "rows": 10, "columns": 10 }] }
//!   ]
//! }
//! ```
//!
//! Shutter positions use the 1-based DICOM conventions. When several
//! shutters are given, the visible area is their intersection.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shutter_common::{AttributeValue, Attributes, RgbColor, Tag};
use shutter_geom::{Region, Shape};

use crate::ShutterError;
use crate::media::{ImageInstance, PresentationStateObject, ShutterTag, TagValue};
use crate::overlay::OverlayDescriptor;

/// A presentation state described in JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresentationDocument {
    /// Content Label.
    pub content_label: Option<String>,
    /// Content Description.
    pub content_description: Option<String>,
    /// Geometric shutters.
    pub shutters: Vec<ShutterEntry>,
    /// Shutter Presentation Value, in P-Values.
    pub presentation_value: Option<u16>,
    /// Explicit fill colour in `#RRGGBB` or `#RGB` notation.
    pub color: Option<String>,
    /// Shutter Presentation Color CIELab Value, DICOM-encoded.
    pub cielab: Option<[u16; 3]>,
    /// Shutter Overlay Group.
    pub shutter_overlay_group: Option<u16>,
    /// Overlay planes used as bitmap shutters.
    pub overlays: Vec<OverlayPlane>,
}

/// One geometric shutter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ShutterEntry {
    /// RECTANGULAR shutter with inclusive 1-based edges.
    Rectangular {
        /// Shutter Left Vertical Edge.
        left: u32,
        /// Shutter Right Vertical Edge.
        right: u32,
        /// Shutter Upper Horizontal Edge.
        upper: u32,
        /// Shutter Lower Horizontal Edge.
        lower: u32,
    },
    /// CIRCULAR shutter.
    Circular {
        /// Center of Circular Shutter, row.
        center_row: u32,
        /// Center of Circular Shutter, column.
        center_column: u32,
        /// Radius of Circular Shutter.
        radius: u32,
    },
    /// POLYGONAL shutter.
    Polygonal {
        /// Vertices of the Polygonal Shutter as `[row, column]`.
        vertices: Vec<[u32; 2]>,
    },
    /// A region given directly in pixel coordinates.
    Region {
        /// The region.
        region: Region,
    },
}

impl ShutterEntry {
    /// DICOM Shutter Shape keywords of this shutter.
    ///
    /// A region reports one keyword per shape it contains, in order;
    /// ellipses report CIRCULAR.
    #[must_use]
    pub fn keywords(&self) -> Vec<&'static str> {
        match self {
            Self::Rectangular { .. } => vec!["RECTANGULAR"],
            Self::Circular { .. } => vec!["CIRCULAR"],
            Self::Polygonal { .. } => vec!["POLYGONAL"],
            Self::Region { region } => {
                let mut keywords = Vec::new();
                region_keywords(region, &mut keywords);
                keywords
            }
        }
    }

    /// The shutter as a pixel-space region.
    #[must_use]
    pub fn to_region(&self) -> Region {
        match self {
            Self::Rectangular {
                left,
                right,
                upper,
                lower,
            } => Shape::from_dicom_rectangular(*left, *right, *upper, *lower).into(),
            Self::Circular {
                center_row,
                center_column,
                radius,
            } => Shape::from_dicom_circular(*center_row, *center_column, *radius).into(),
            Self::Polygonal { vertices } => {
                let vertices: Vec<(u32, u32)> = vertices.iter().map(|[r, c]| (*r, *c)).collect();
                Shape::from_dicom_polygonal(&vertices).into()
            }
            Self::Region { region } => region.clone(),
        }
    }
}

fn region_keywords(region: &Region, keywords: &mut Vec<&'static str>) {
    match region {
        Region::Shape(Shape::Rectangle { .. }) => keywords.push("RECTANGULAR"),
        Region::Shape(Shape::Ellipse { .. }) => keywords.push("CIRCULAR"),
        Region::Shape(Shape::Polygon { .. }) => keywords.push("POLYGONAL"),
        Region::Union(members) | Region::Intersection(members) => {
            for member in members {
                region_keywords(member, keywords);
            }
        }
    }
}

/// An overlay plane, with its set bits given as rectangular blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverlayPlane {
    /// Overlay group, e.g. `24576` (0x6000).
    pub group: u16,
    /// Overlay Rows.
    pub rows: u32,
    /// Overlay Columns.
    pub columns: u32,
    /// Overlay Origin as 1-based `[row, column]`.
    #[serde(default = "default_origin")]
    pub origin: [i32; 2],
    /// Number of Frames in Overlay.
    #[serde(default = "default_one")]
    pub frames: u32,
    /// Image Frame Origin.
    #[serde(default = "default_one")]
    pub image_frame_origin: u32,
    /// Blocks of set bits.
    #[serde(default)]
    pub blocks: Vec<OverlayBlock>,
}

/// A block of set overlay bits, 0-based within the overlay plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverlayBlock {
    /// Overlay frame, 0-based.
    #[serde(default)]
    pub frame: u32,
    /// First row.
    pub row: u32,
    /// First column.
    pub column: u32,
    /// Number of rows.
    pub rows: u32,
    /// Number of columns.
    pub columns: u32,
}

const fn default_origin() -> [i32; 2] {
    [1, 1]
}

const fn default_one() -> u32 {
    1
}

impl OverlayPlane {
    /// Pack the plane into an overlay descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ShutterError::OverlayTooLarge`] if the plane is larger than
    /// an overlay can be.
    pub fn to_descriptor(&self) -> Result<OverlayDescriptor, ShutterError> {
        let mut descriptor =
            OverlayDescriptor::with_frames(self.group, self.rows, self.columns, self.frames)?
                .at(self.origin[0], self.origin[1]);
        descriptor.image_frame_origin = self.image_frame_origin;
        for block in &self.blocks {
            descriptor.fill_block(block.frame, block.row, block.column, block.rows, block.columns);
        }
        Ok(descriptor)
    }
}

impl PresentationDocument {
    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ShutterError::Document`] if the text is not a valid document.
    pub fn from_json(json: &str) -> Result<Self, ShutterError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a document from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ShutterError::Io`] if the file cannot be read and
    /// [`ShutterError::Document`] if it is not a valid document.
    pub fn from_path(path: &Path) -> Result<Self, ShutterError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ShutterError::Document`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ShutterError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The visible area: the intersection of all shutters.
    #[must_use]
    pub fn shutter_region(&self) -> Option<Region> {
        if self.shutters.is_empty() {
            return None;
        }
        Some(Region::intersection(
            self.shutters.iter().map(ShutterEntry::to_region).collect(),
        ))
    }

    /// Explicit fill colour: the hex colour when it parses, else the CIELab
    /// colour.
    #[must_use]
    pub fn fill_color(&self) -> Option<RgbColor> {
        self.color
            .as_deref()
            .and_then(RgbColor::from_hex)
            .or_else(|| self.cielab.map(RgbColor::from_dicom_lab))
    }

    /// The cached shutter values this document provides.
    #[must_use]
    pub fn cached_tags(&self) -> Vec<(ShutterTag, TagValue)> {
        let mut tags = Vec::new();
        if let Some(region) = self.shutter_region() {
            tags.push((ShutterTag::FinalShape, TagValue::Region(region)));
        }
        if let Some(p_value) = self.presentation_value {
            tags.push((ShutterTag::PresentationValue, TagValue::PValue(p_value)));
        }
        if let Some(color) = self.fill_color() {
            tags.push((ShutterTag::RgbColor, TagValue::Color(color)));
        }
        tags
    }

    /// The DICOM attributes this document stands for.
    #[must_use]
    pub fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        if let Some(label) = &self.content_label {
            attrs.set(Tag::CONTENT_LABEL, AttributeValue::Text(label.clone()));
        }
        if let Some(description) = &self.content_description {
            attrs.set(
                Tag::CONTENT_DESCRIPTION,
                AttributeValue::Text(description.clone()),
            );
        }
        let mut keywords: Vec<&str> = Vec::new();
        let bitmap = self.shutter_overlay_group.map(|_| "BITMAP");
        for keyword in self
            .shutters
            .iter()
            .flat_map(ShutterEntry::keywords)
            .chain(bitmap)
        {
            if !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        }
        if !keywords.is_empty() {
            attrs.set(Tag::SHUTTER_SHAPE, AttributeValue::Text(keywords.join("\\")));
        }
        if let Some(p_value) = self.presentation_value {
            attrs.set(
                Tag::SHUTTER_PRESENTATION_VALUE,
                AttributeValue::Int(i64::from(p_value)),
            );
        }
        if let Some(lab) = self.cielab {
            attrs.set(
                Tag::SHUTTER_PRESENTATION_COLOR_CIELAB,
                AttributeValue::Ints(lab.iter().map(|v| i64::from(*v)).collect()),
            );
        }
        if let Some(group) = self.shutter_overlay_group {
            attrs.set(
                Tag::SHUTTER_OVERLAY_GROUP,
                AttributeValue::Int(i64::from(group)),
            );
        }
        attrs
    }

    /// Build the in-memory presentation state.
    ///
    /// # Errors
    ///
    /// Returns [`ShutterError::OverlayTooLarge`] if an overlay plane is
    /// larger than an overlay can be.
    pub fn to_presentation_state(&self) -> Result<PresentationStateObject, ShutterError> {
        let mut pr = PresentationStateObject::new(self.attributes());
        for (tag, value) in self.cached_tags() {
            pr = pr.with_tag(tag, value);
        }
        for plane in &self.overlays {
            pr = pr.with_overlay(plane.to_descriptor()?);
        }
        Ok(pr)
    }

    /// Attach this document's shutter to an image as its embedded shutter.
    #[must_use]
    pub fn embed_in(&self, mut image: ImageInstance) -> ImageInstance {
        for (tag, value) in self.cached_tags() {
            image = image.with_tag(tag, value);
        }
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{PresentationState, Tagged};

    const DOCUMENT: &str = r##"{
        "content_label": "COLLIMATED",
        "shutters": [
            { "shape": "rectangular", "left": 11, "right": 60, "upper": 11, "lower": 60 }
        ],
        "presentation_value": 32768,
        "color": "#c80000",
        "shutter_overlay_group": 24576,
        "overlays": [
            { "group": 24576, "rows": 64, "columns": 64,
              "blocks": [{ "row": 0, "column": 0, "rows": 10, "columns": 10 }] }
        ]
    }"##;

    #[test]
    fn parses_and_builds_presentation_state() {
        let doc = PresentationDocument::from_json(DOCUMENT).unwrap();
        let pr = doc.to_presentation_state().unwrap();

        assert_eq!(pr.label(), Some("COLLIMATED"));
        assert_eq!(
            pr.shutter_shape(),
            Some(&Region::from(Shape::rect(10.0, 10.0, 50.0, 50.0)))
        );
        assert_eq!(pr.shutter_p_value(), Some(0x8000));
        assert_eq!(pr.shutter_rgb_color(), Some(RgbColor::new(200, 0, 0)));
        assert_eq!(
            pr.attribute(Tag::SHUTTER_OVERLAY_GROUP)
                .and_then(AttributeValue::as_u16),
            Some(0x6000)
        );
        assert_eq!(
            pr.attribute(Tag::SHUTTER_SHAPE)
                .and_then(AttributeValue::as_text),
            Some("RECTANGULAR\\BITMAP")
        );
        assert_eq!(pr.shutter_overlays().len(), 1);
        assert!(pr.shutter_overlays()[0].is_set(0, 9, 9));
        assert!(!pr.shutter_overlays()[0].is_set(0, 10, 10));
    }

    #[test]
    fn several_shutters_intersect() {
        let doc = PresentationDocument {
            shutters: vec![
                ShutterEntry::Rectangular {
                    left: 1,
                    right: 10,
                    upper: 1,
                    lower: 10,
                },
                ShutterEntry::Circular {
                    center_row: 5,
                    center_column: 5,
                    radius: 3,
                },
            ],
            ..PresentationDocument::default()
        };
        assert!(matches!(doc.shutter_region(), Some(Region::Intersection(m)) if m.len() == 2));
    }

    #[test]
    fn shutter_shape_keywords_are_unique_and_ordered() {
        let doc = PresentationDocument {
            shutters: vec![
                ShutterEntry::Rectangular {
                    left: 1,
                    right: 10,
                    upper: 1,
                    lower: 10,
                },
                ShutterEntry::Circular {
                    center_row: 5,
                    center_column: 5,
                    radius: 3,
                },
                ShutterEntry::Rectangular {
                    left: 2,
                    right: 9,
                    upper: 2,
                    lower: 9,
                },
                ShutterEntry::Region {
                    region: Region::union(vec![
                        Shape::Ellipse {
                            cx: 4.0,
                            cy: 4.0,
                            rx: 3.0,
                            ry: 2.0,
                        }
                        .into(),
                        Shape::Polygon {
                            points: vec![[0.0, 0.0], [4.0, 0.0], [0.0, 4.0]],
                        }
                        .into(),
                    ]),
                },
            ],
            shutter_overlay_group: Some(0x6000),
            ..PresentationDocument::default()
        };
        assert_eq!(
            doc.attributes().text(Tag::SHUTTER_SHAPE),
            Some("RECTANGULAR\\CIRCULAR\\POLYGONAL\\BITMAP")
        );
    }

    #[test]
    fn oversized_overlay_plane_is_an_error() {
        let doc = PresentationDocument::from_json(
            r#"{ "overlays": [
                { "group": 24576, "rows": 4000000000, "columns": 4000000000,
                  "frames": 4000000000 }
            ] }"#,
        )
        .unwrap();
        assert!(matches!(
            doc.to_presentation_state(),
            Err(ShutterError::OverlayTooLarge { .. })
        ));
    }

    #[test]
    fn huge_block_in_small_plane_loads_quickly() {
        let doc = PresentationDocument::from_json(
            r#"{ "overlays": [
                { "group": 24576, "rows": 4, "columns": 4,
                  "blocks": [{ "row": 0, "column": 0, "rows": 4294967295, "columns": 4294967295 }] }
            ] }"#,
        )
        .unwrap();
        let pr = doc.to_presentation_state().unwrap();
        let overlay = &pr.shutter_overlays()[0];
        assert!(overlay.is_set(0, 3, 3));
        assert_eq!(overlay.data, vec![0xFF, 0xFF]);
    }

    #[test]
    fn invalid_hex_falls_back_to_cielab() {
        let doc = PresentationDocument {
            color: Some("red".into()),
            cielab: Some([0, 0x8080, 0x8080]),
            ..PresentationDocument::default()
        };
        assert_eq!(doc.fill_color(), Some(RgbColor::BLACK));

        let nothing = PresentationDocument {
            color: Some("red".into()),
            ..PresentationDocument::default()
        };
        assert_eq!(nothing.fill_color(), None);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = PresentationDocument::from_json(r#"{ "shutter": [] }"#).unwrap_err();
        assert!(matches!(err, ShutterError::Document(_)));
    }

    #[test]
    fn empty_document_has_no_shutter() {
        let doc = PresentationDocument::from_json("{}").unwrap();
        assert!(doc.cached_tags().is_empty());
        assert!(doc.attributes().is_empty());
    }

    #[test]
    fn json_round_trip() {
        let doc = PresentationDocument::from_json(DOCUMENT).unwrap();
        let again = PresentationDocument::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(doc, again);
    }
}
