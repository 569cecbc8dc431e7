//! DICOM attribute tags and values.
//!
//! [PS3.5 § 7.1 Data Elements](https://dicom.nema.org/medical/dicom/current/output/chtml/part05/chapter_7.html)
//!
//! Only the handful of attributes the shutter stage reads are named here.
//! Values are typed; accessors return `None` when the stored value has a
//! different kind than the caller asked for.

use std::collections::BTreeMap;
use std::fmt;

/// A DICOM attribute tag, `(gggg,eeee)` packed as `0xggggeeee`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub u32);

impl Tag {
    /// Rows (0028,0010)
    pub const ROWS: Self = Self(0x0028_0010);
    /// Columns (0028,0011)
    pub const COLUMNS: Self = Self(0x0028_0011);
    /// Shutter Shape (0018,1600)
    pub const SHUTTER_SHAPE: Self = Self(0x0018_1600);
    /// Shutter Presentation Value (0018,1622)
    pub const SHUTTER_PRESENTATION_VALUE: Self = Self(0x0018_1622);
    /// Shutter Overlay Group (0018,1623)
    pub const SHUTTER_OVERLAY_GROUP: Self = Self(0x0018_1623);
    /// Shutter Presentation Color CIELab Value (0018,1624)
    pub const SHUTTER_PRESENTATION_COLOR_CIELAB: Self = Self(0x0018_1624);
    /// Content Label (0070,0080)
    pub const CONTENT_LABEL: Self = Self(0x0070_0080);
    /// Content Description (0070,0081)
    pub const CONTENT_DESCRIPTION: Self = Self(0x0070_0081);

    /// Group number.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn group(self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Element number.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn element(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.group(), self.element())
    }
}

/// The value of a single attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// A binary integer (US, SS, UL, SL).
    Int(i64),
    /// A multi-valued binary integer.
    Ints(Vec<i64>),
    /// A string value (CS, LO, IS, ...).
    Text(String),
}

impl AttributeValue {
    /// Integer view of the value.
    ///
    /// Integer strings (IS) are parsed; multi-valued integers yield their
    /// first value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Ints(values) => values.first().copied(),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Integer view restricted to the unsigned 16-bit range.
    #[must_use]
    pub fn as_u16(&self) -> Option<u16> {
        self.as_int().and_then(|v| u16::try_from(v).ok())
    }

    /// Integer view restricted to the unsigned 32-bit range.
    #[must_use]
    pub fn as_u32(&self) -> Option<u32> {
        self.as_int().and_then(|v| u32::try_from(v).ok())
    }

    /// Text view of the value, trimmed of DICOM padding.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.trim_end_matches(['\0', ' '])),
            Self::Int(_) | Self::Ints(_) => None,
        }
    }
}

/// An ordered attribute set, keyed by tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    values: BTreeMap<Tag, AttributeValue>,
}

impl Attributes {
    /// Create an empty attribute set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, tag: Tag, value: AttributeValue) -> Self {
        self.set(tag, value);
        self
    }

    /// Insert or replace a value.
    pub fn set(&mut self, tag: Tag, value: AttributeValue) {
        let _ = self.values.insert(tag, value);
    }

    /// Look up a value.
    #[must_use]
    pub fn get(&self, tag: Tag) -> Option<&AttributeValue> {
        self.values.get(&tag)
    }

    /// Text value of `tag`, if present, textual and not blank.
    #[must_use]
    pub fn text(&self, tag: Tag) -> Option<&str> {
        self.get(tag)
            .and_then(AttributeValue::as_text)
            .filter(|s| !s.trim().is_empty())
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
