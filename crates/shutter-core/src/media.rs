//! Media collaborators consumed by the shutter stage.
//!
//! The DICOM object model lives outside this crate. The stage only needs a
//! narrow view of it, expressed by two traits:
//!
//! - [`ImageHandle`] - the image instance being displayed
//! - [`PresentationState`] - a presentation state that may override the
//!   image's own shutter and supply bitmap shutter overlays
//!
//! Both expose the shutter values cached upstream through [`Tagged`].
//! [`ImageInstance`] and [`PresentationStateObject`] are plain in-memory
//! implementations.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use shutter_common::{AttributeValue, Attributes, RgbColor, Tag};
use shutter_geom::Region;
use strum_macros::Display;

use crate::overlay::OverlayDescriptor;

/// Cached shutter values attached to an image or presentation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ShutterTag {
    /// The combined shutter region.
    FinalShape,
    /// Shutter Presentation Value, in P-Values.
    PresentationValue,
    /// Explicit shutter colour.
    RgbColor,
}

/// A cached tag value.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// A shutter region.
    Region(Region),
    /// A 16-bit P-Value.
    PValue(u16),
    /// An RGB colour.
    Color(RgbColor),
    /// Any other integer.
    Int(i64),
    /// Any other text.
    Text(String),
}

impl TagValue {
    /// The region, if this value holds one.
    #[must_use]
    pub const fn as_region(&self) -> Option<&Region> {
        match self {
            Self::Region(region) => Some(region),
            _ => None,
        }
    }

    /// The P-Value, if this value holds one.
    #[must_use]
    pub const fn as_p_value(&self) -> Option<u16> {
        match self {
            Self::PValue(v) => Some(*v),
            _ => None,
        }
    }

    /// The colour, if this value holds one.
    #[must_use]
    pub const fn as_color(&self) -> Option<RgbColor> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }
}

/// Access to cached shutter values.
pub trait Tagged {
    /// Look up a cached value.
    fn tag_value(&self, tag: ShutterTag) -> Option<&TagValue>;

    /// The shutter region, if set and well-typed.
    fn shutter_shape(&self) -> Option<&Region> {
        self.tag_value(ShutterTag::FinalShape)
            .and_then(TagValue::as_region)
    }

    /// The shutter P-Value, if set and well-typed.
    fn shutter_p_value(&self) -> Option<u16> {
        self.tag_value(ShutterTag::PresentationValue)
            .and_then(TagValue::as_p_value)
    }

    /// The explicit shutter colour, if set and well-typed.
    fn shutter_rgb_color(&self) -> Option<RgbColor> {
        self.tag_value(ShutterTag::RgbColor)
            .and_then(TagValue::as_color)
    }
}

/// An image instance as seen by the shutter stage.
pub trait ImageHandle: Tagged + fmt::Debug + Send + Sync {
    /// Zero-based frame index of this instance within its source, if known.
    fn frame_index(&self) -> Option<u32>;

    /// Number of rows, if known.
    fn rows(&self) -> Option<u32>;

    /// Number of columns, if known.
    fn columns(&self) -> Option<u32>;
}

/// A presentation state as seen by the shutter stage.
pub trait PresentationState: Tagged + fmt::Debug + Send + Sync {
    /// Overlay planes flagged as bitmap display shutters.
    fn shutter_overlays(&self) -> &[OverlayDescriptor];

    /// A raw attribute of the presentation state data set.
    fn attribute(&self, tag: Tag) -> Option<&AttributeValue>;

    /// The underlying document, for stages that know its concrete type.
    fn raw_object(&self) -> &dyn Any;
}

/// In-memory [`ImageHandle`].
#[derive(Debug, Clone, Default)]
pub struct ImageInstance {
    attributes: Attributes,
    frame_index: Option<u32>,
    tags: HashMap<ShutterTag, TagValue>,
}

impl ImageInstance {
    /// An image with the given Rows and Columns.
    #[must_use]
    pub fn new(rows: u32, columns: u32) -> Self {
        Self::from_attributes(
            Attributes::new()
                .with(Tag::ROWS, AttributeValue::Int(i64::from(rows)))
                .with(Tag::COLUMNS, AttributeValue::Int(i64::from(columns))),
        )
    }

    /// An image described by an arbitrary attribute set.
    #[must_use]
    pub fn from_attributes(attributes: Attributes) -> Self {
        Self {
            attributes,
            frame_index: None,
            tags: HashMap::new(),
        }
    }

    /// Builder-style frame index.
    #[must_use]
    pub fn with_frame(mut self, frame_index: u32) -> Self {
        self.frame_index = Some(frame_index);
        self
    }

    /// Builder-style cached tag.
    #[must_use]
    pub fn with_tag(mut self, tag: ShutterTag, value: TagValue) -> Self {
        let _ = self.tags.insert(tag, value);
        self
    }

    /// The image's attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

impl Tagged for ImageInstance {
    fn tag_value(&self, tag: ShutterTag) -> Option<&TagValue> {
        self.tags.get(&tag)
    }
}

impl ImageHandle for ImageInstance {
    fn frame_index(&self) -> Option<u32> {
        self.frame_index
    }

    fn rows(&self) -> Option<u32> {
        self.attributes.get(Tag::ROWS).and_then(AttributeValue::as_u32)
    }

    fn columns(&self) -> Option<u32> {
        self.attributes
            .get(Tag::COLUMNS)
            .and_then(AttributeValue::as_u32)
    }
}

/// In-memory [`PresentationState`].
#[derive(Debug, Clone, Default)]
pub struct PresentationStateObject {
    attributes: Attributes,
    tags: HashMap<ShutterTag, TagValue>,
    overlays: Vec<OverlayDescriptor>,
}

impl PresentationStateObject {
    /// A presentation state backed by `attributes`.
    #[must_use]
    pub fn new(attributes: Attributes) -> Self {
        Self {
            attributes,
            tags: HashMap::new(),
            overlays: Vec::new(),
        }
    }

    /// Builder-style cached tag.
    #[must_use]
    pub fn with_tag(mut self, tag: ShutterTag, value: TagValue) -> Self {
        let _ = self.tags.insert(tag, value);
        self
    }

    /// Builder-style shutter overlay plane.
    #[must_use]
    pub fn with_overlay(mut self, overlay: OverlayDescriptor) -> Self {
        self.overlays.push(overlay);
        self
    }

    /// The presentation state's attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Display label of the presentation state.
    ///
    /// [PS3.3 § C.10.9 Content Identification Macro](https://dicom.nema.org/medical/dicom/current/output/chtml/part03/sect_10.9.html)
    ///
    /// Content Label identifies the instance; Content Description is used
    /// when the label is missing.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.attributes
            .text(Tag::CONTENT_LABEL)
            .or_else(|| self.attributes.text(Tag::CONTENT_DESCRIPTION))
    }
}

impl Tagged for PresentationStateObject {
    fn tag_value(&self, tag: ShutterTag) -> Option<&TagValue> {
        self.tags.get(&tag)
    }
}

impl PresentationState for PresentationStateObject {
    fn shutter_overlays(&self) -> &[OverlayDescriptor] {
        &self.overlays
    }

    fn attribute(&self, tag: Tag) -> Option<&AttributeValue> {
        self.attributes.get(tag)
    }

    fn raw_object(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use shutter_geom::Shape;

    use super::*;

    #[test]
    fn mistyped_tags_read_as_absent() {
        let image = ImageInstance::new(10, 10)
            .with_tag(ShutterTag::FinalShape, TagValue::Int(3))
            .with_tag(ShutterTag::PresentationValue, TagValue::Text("x".into()))
            .with_tag(ShutterTag::RgbColor, TagValue::PValue(7));
        assert!(image.shutter_shape().is_none());
        assert!(image.shutter_p_value().is_none());
        assert!(image.shutter_rgb_color().is_none());
    }

    #[test]
    fn image_dimensions_come_from_attributes() {
        let image = ImageInstance::new(512, 256);
        assert_eq!(image.rows(), Some(512));
        assert_eq!(image.columns(), Some(256));
        assert_eq!(image.frame_index(), None);

        let bare = ImageInstance::from_attributes(Attributes::new());
        assert_eq!(bare.rows(), None);
    }

    #[test]
    fn presentation_label_falls_back_to_description() {
        let labelled = PresentationStateObject::new(
            Attributes::new()
                .with(Tag::CONTENT_LABEL, AttributeValue::Text("SHUTTERED".into()))
                .with(Tag::CONTENT_DESCRIPTION, AttributeValue::Text("desc".into())),
        );
        assert_eq!(labelled.label(), Some("SHUTTERED"));

        let described = PresentationStateObject::new(
            Attributes::new().with(Tag::CONTENT_DESCRIPTION, AttributeValue::Text("desc".into())),
        );
        assert_eq!(described.label(), Some("desc"));

        assert_eq!(PresentationStateObject::default().label(), None);
    }

    #[test]
    fn raw_object_downcasts_to_concrete_type() {
        let pr = PresentationStateObject::default().with_tag(
            ShutterTag::FinalShape,
            TagValue::Region(Shape::rect(0.0, 0.0, 1.0, 1.0).into()),
        );
        let raw = pr.raw_object();
        assert!(raw.downcast_ref::<PresentationStateObject>().is_some());
    }

    #[test]
    fn tag_names() {
        assert_eq!(ShutterTag::FinalShape.to_string(), "final-shape");
    }
}
