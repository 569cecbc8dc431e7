//! Display shutter stage of the image rendering pipeline.
//!
//! [PS3.3 § C.7.6.11 Display Shutter Module](https://dicom.nema.org/medical/dicom/current/output/chtml/part03/sect_C.7.6.11.html)
//!
//! # Scope
//!
//! This crate provides:
//! - **Parameter Resolution** - [`resolve`] derives the active shutter from
//!   pipeline lifecycle events (image change, display reset, presentation
//!   state applied)
//! - **Compositing** - [`apply`] fills the occluded part of an image with the
//!   shutter colour, optionally overridden by a presentation state's bitmap
//!   shutter overlay
//! - **Stage Wrapper** - [`ShutterOp`] owns the parameters of one pipeline
//!   stage instance
//! - **Presentation Documents** - JSON descriptions of presentation states
//!   for tools and tests
//!
//! # Data flow
//!
//! ```text
//! ImageOpEvent → resolve → ShutterParameters → apply → output image
//! ```
//!
//! The stage is synchronous and performs no internal locking: callers
//! serialize event handling and processing on a given [`ShutterOp`].

pub mod compositor;
pub mod config;
pub mod event;
pub mod fill;
pub mod media;
pub mod op;
pub mod overlay;
pub mod params;
pub mod raster;
pub mod resolver;

mod error;

pub use shutter_common as common;
pub use shutter_geom as geom;

pub use compositor::apply;
pub use config::PresentationDocument;
pub use error::ShutterError;
pub use event::{CropRect, EventKey, EventParams, EventValue, ImageOpEvent, OpEvent};
pub use fill::{FillColor, FillSource, shutter_color};
pub use media::{
    ImageHandle, ImageInstance, PresentationState, PresentationStateObject, ShutterTag, TagValue,
    Tagged,
};
pub use op::ShutterOp;
pub use overlay::{OverlayBitmap, OverlayDescriptor};
pub use params::{Occlusion, ShutterParameters};
pub use raster::{composite_mask, mask_region};
pub use resolver::resolve;
