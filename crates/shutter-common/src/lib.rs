//! Common types for the shutter stage.
//!
//! This crate provides the value types shared by every shutter component:
//! - **Colour** - 8-bit RGB fill colours and their DICOM encodings
//! - **Attributes** - DICOM tags and typed attribute values

pub mod attribute;
pub mod color;

pub use attribute::{AttributeValue, Attributes, Tag};
pub use color::RgbColor;
