//! The shutter pipeline stage.

use std::borrow::Cow;

use image::DynamicImage;
use tracing::trace;

use crate::ShutterError;
use crate::compositor::apply;
use crate::event::ImageOpEvent;
use crate::params::{Occlusion, ShutterParameters};
use crate::resolver::resolve;

/// One shutter stage instance of a rendering pipeline.
///
/// Owns the stage's [`ShutterParameters`]. Event handling replaces them as a
/// whole; processing only reads them. The stage does no locking, so calls
/// into one instance must be serialized by the caller.
#[derive(Debug, Clone, Default)]
pub struct ShutterOp {
    params: ShutterParameters,
}

impl ShutterOp {
    /// Display name of the stage.
    pub const NAME: &'static str = "Image Shutter";

    /// A stage with the shutter shown and nothing resolved yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            params: ShutterParameters {
                show: true,
                ..ShutterParameters::default()
            },
        }
    }

    /// A stage starting from explicit parameters.
    #[must_use]
    pub fn with_parameters(params: ShutterParameters) -> Self {
        Self { params }
    }

    /// Current parameters.
    #[must_use]
    pub const fn parameters(&self) -> &ShutterParameters {
        &self.params
    }

    /// Toggle the shutter.
    pub fn set_show(&mut self, show: bool) {
        self.params = self.params.with_show(show);
    }

    /// Choose which side of the shutter region is filled.
    pub fn set_occlusion(&mut self, occlusion: Occlusion) {
        self.params = self.params.with_occlusion(occlusion);
    }

    /// React to a lifecycle event.
    pub fn handle_event(&mut self, event: &ImageOpEvent) {
        trace!(stage = Self::NAME, event = %event.kind, "handling event");
        self.params = resolve(event, &self.params);
    }

    /// Produce the stage output for `source`.
    ///
    /// # Errors
    ///
    /// Propagates pixel operation failures from [`apply`].
    pub fn process<'a>(
        &self,
        source: &'a DynamicImage,
    ) -> Result<Cow<'a, DynamicImage>, ShutterError> {
        apply(source, &self.params)
    }
}
