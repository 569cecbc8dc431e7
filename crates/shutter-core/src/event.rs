//! Pipeline lifecycle events.
//!
//! The pipeline notifies each stage when the displayed image changes, when
//! the display is reset, and when a presentation state is applied. Events
//! carry the current image and a parameter bag with well-known keys.
//!
//! The bag is heterogeneous: a value stored under a key may not have the kind
//! the key implies. Typed accessors return `None` on such a mismatch rather
//! than failing.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use strum_macros::Display;

use crate::media::{ImageHandle, PresentationState};

/// Kind of lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum OpEvent {
    /// The display was reset to the image's own settings.
    ResetDisplay,
    /// A new series was loaded.
    SeriesChange,
    /// Another image (or frame) is displayed.
    ImageChange,
    /// A presentation state was applied to the displayed image.
    ApplyPresentationState,
}

impl OpEvent {
    /// Every event kind.
    pub const ALL: [Self; 4] = [
        Self::ResetDisplay,
        Self::SeriesChange,
        Self::ImageChange,
        Self::ApplyPresentationState,
    ];
}

/// Crop rectangle of the displayed image, in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CropRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CropRect {
    /// Create a crop rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Well-known keys of the event parameter bag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKey {
    /// The presentation state being applied.
    PresentationState,
    /// The crop rectangle of the display.
    Crop,
    /// A key owned by another stage.
    Named(String),
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PresentationState => f.write_str("pr.state"),
            Self::Crop => f.write_str("crop"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// A value in the event parameter bag.
#[derive(Debug, Clone)]
pub enum EventValue {
    /// A presentation state.
    PresentationState(Arc<dyn PresentationState>),
    /// A crop rectangle.
    Crop(CropRect),
    /// A flag.
    Flag(bool),
    /// An integer.
    Int(i64),
    /// Text.
    Text(String),
}

/// Parameter bag of an event.
#[derive(Debug, Clone, Default)]
pub struct EventParams {
    values: HashMap<EventKey, EventValue>,
}

impl EventParams {
    /// An empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: EventKey, value: EventValue) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace a value.
    pub fn set(&mut self, key: EventKey, value: EventValue) {
        let _ = self.values.insert(key, value);
    }

    /// Raw lookup.
    #[must_use]
    pub fn get(&self, key: &EventKey) -> Option<&EventValue> {
        self.values.get(key)
    }

    /// The presentation state under [`EventKey::PresentationState`], if the
    /// value there is one.
    #[must_use]
    pub fn presentation_state(&self) -> Option<Arc<dyn PresentationState>> {
        match self.get(&EventKey::PresentationState)? {
            EventValue::PresentationState(pr) => Some(Arc::clone(pr)),
            _ => None,
        }
    }

    /// The crop rectangle under [`EventKey::Crop`], if the value there is one.
    #[must_use]
    pub fn crop(&self) -> Option<CropRect> {
        match self.get(&EventKey::Crop)? {
            EventValue::Crop(rect) => Some(*rect),
            _ => None,
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A lifecycle event delivered to the stage.
#[derive(Debug, Clone)]
pub struct ImageOpEvent {
    /// What happened.
    pub kind: OpEvent,
    /// The image displayed after the event, if any.
    pub image: Option<Arc<dyn ImageHandle>>,
    /// Event parameters.
    pub params: EventParams,
}

impl ImageOpEvent {
    /// An event with an empty parameter bag.
    #[must_use]
    pub fn new(kind: OpEvent, image: Option<Arc<dyn ImageHandle>>) -> Self {
        Self {
            kind,
            image,
            params: EventParams::new(),
        }
    }

    /// An [`OpEvent::ImageChange`] event.
    #[must_use]
    pub fn image_change(image: Option<Arc<dyn ImageHandle>>) -> Self {
        Self::new(OpEvent::ImageChange, image)
    }

    /// An [`OpEvent::ResetDisplay`] event.
    #[must_use]
    pub fn reset_display(image: Option<Arc<dyn ImageHandle>>) -> Self {
        Self::new(OpEvent::ResetDisplay, image)
    }

    /// An [`OpEvent::ApplyPresentationState`] event for `presentation`
    /// (or for no presentation state), optionally with a crop rectangle.
    #[must_use]
    pub fn apply_presentation_state(
        image: Option<Arc<dyn ImageHandle>>,
        presentation: Option<Arc<dyn PresentationState>>,
        crop: Option<CropRect>,
    ) -> Self {
        let mut event = Self::new(OpEvent::ApplyPresentationState, image);
        if let Some(pr) = presentation {
            event
                .params
                .set(EventKey::PresentationState, EventValue::PresentationState(pr));
        }
        if let Some(rect) = crop {
            event.params.set(EventKey::Crop, EventValue::Crop(rect));
        }
        event
    }

    /// Builder-style parameter.
    #[must_use]
    pub fn with_param(mut self, key: EventKey, value: EventValue) -> Self {
        self.params.set(key, value);
        self
    }
}
