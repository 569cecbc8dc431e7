//! Integration tests for shutter parameter resolution.

use std::sync::Arc;

use shutter_core::common::{AttributeValue, Attributes, RgbColor, Tag};
use shutter_core::geom::{Region, Shape};
use shutter_core::{
    CropRect, EventKey, EventValue, ImageHandle, ImageInstance, ImageOpEvent, Occlusion, OpEvent,
    PresentationState, PresentationStateObject, ShutterOp, ShutterParameters, ShutterTag, TagValue,
    resolve,
};

/// An image carrying its own shutter, colour and P-Value.
fn shuttered_image() -> Arc<dyn ImageHandle> {
    Arc::new(
        ImageInstance::new(100, 100)
            .with_frame(0)
            .with_tag(
                ShutterTag::FinalShape,
                TagValue::Region(Shape::rect(10.0, 10.0, 50.0, 50.0).into()),
            )
            .with_tag(ShutterTag::PresentationValue, TagValue::PValue(0xFFFF))
            .with_tag(ShutterTag::RgbColor, TagValue::Color(RgbColor::new(0, 0, 200))),
    )
}

/// A presentation state with a circular shutter and a P-Value.
fn presentation_state() -> Arc<dyn PresentationState> {
    Arc::new(
        PresentationStateObject::new(Attributes::new().with(
            Tag::SHUTTER_OVERLAY_GROUP,
            AttributeValue::Int(0x6000),
        ))
        .with_tag(
            ShutterTag::FinalShape,
            TagValue::Region(Shape::circle(40.0, 40.0, 20.0).into()),
        )
        .with_tag(ShutterTag::PresentationValue, TagValue::PValue(0x8000)),
    )
}

/// Parameters with every derived field populated, as a leak detector.
fn populated() -> ShutterParameters {
    resolve(
        &ImageOpEvent::apply_presentation_state(
            Some(shuttered_image()),
            Some(presentation_state()),
            None,
        ),
        &ShutterParameters::default().with_show(true),
    )
}

#[test]
fn test_image_change_takes_image_tags() {
    let params = resolve(
        &ImageOpEvent::image_change(Some(shuttered_image())),
        &populated(),
    );
    assert_eq!(
        params.shape,
        Some(Region::from(Shape::rect(10.0, 10.0, 50.0, 50.0)))
    );
    assert_eq!(params.gray_value, Some(0xFFFF));
    assert_eq!(params.rgb_color, Some(RgbColor::new(0, 0, 200)));
    assert!(params.presentation.is_none());
    assert!(params.source_image.is_some());
    assert!(params.show);
}

#[test]
fn test_reset_display_behaves_like_image_change() {
    let from_reset = resolve(
        &ImageOpEvent::reset_display(Some(shuttered_image())),
        &populated(),
    );
    let from_change = resolve(
        &ImageOpEvent::image_change(Some(shuttered_image())),
        &populated(),
    );
    assert_eq!(from_reset.shape, from_change.shape);
    assert_eq!(from_reset.gray_value, from_change.gray_value);
    assert_eq!(from_reset.rgb_color, from_change.rgb_color);
    assert!(from_reset.presentation.is_none());
}

#[test]
fn test_no_image_clears_everything() {
    let params = resolve(&ImageOpEvent::image_change(None), &populated());
    assert!(params.shape.is_none());
    assert!(params.gray_value.is_none());
    assert!(params.rgb_color.is_none());
    assert!(params.presentation.is_none());
    assert!(params.source_image.is_none());
}

#[test]
fn test_image_without_tags_does_not_inherit_previous_shutter() {
    let bare: Arc<dyn ImageHandle> = Arc::new(ImageInstance::new(10, 10));
    let params = resolve(&ImageOpEvent::image_change(Some(bare)), &populated());
    assert!(params.shape.is_none());
    assert!(params.gray_value.is_none());
    assert!(params.rgb_color.is_none());
    assert!(params.source_image.is_some());
}

#[test]
fn test_presentation_state_overrides_image_tags() {
    let params = populated();
    assert_eq!(
        params.shape,
        Some(Region::from(Shape::circle(40.0, 40.0, 20.0)))
    );
    assert_eq!(params.gray_value, Some(0x8000));
    assert_eq!(params.rgb_color, None);
    assert!(params.presentation.is_some());
    assert!(params.source_image.is_some());
}

#[test]
fn test_missing_presentation_state_clears_but_keeps_image() {
    let event = ImageOpEvent::apply_presentation_state(Some(shuttered_image()), None, None);
    let params = resolve(&event, &populated());
    assert!(params.shape.is_none());
    assert!(params.gray_value.is_none());
    assert!(params.rgb_color.is_none());
    assert!(params.presentation.is_none());
    assert!(params.source_image.is_some());
}

#[test]
fn test_mistyped_presentation_state_is_absent() {
    let event = ImageOpEvent::new(OpEvent::ApplyPresentationState, Some(shuttered_image()))
        .with_param(EventKey::PresentationState, EventValue::Int(42));
    let params = resolve(&event, &populated());
    assert!(params.shape.is_none());
    assert!(params.presentation.is_none());
}

#[test]
fn test_crop_reanchors_a_copy() {
    let pr = presentation_state();
    let event = ImageOpEvent::apply_presentation_state(
        Some(shuttered_image()),
        Some(Arc::clone(&pr)),
        Some(CropRect::new(15, 5, 50, 50)),
    );
    let params = resolve(&event, &ShutterParameters::default());

    assert_eq!(
        params.shape,
        Some(Region::from(Shape::circle(25.0, 35.0, 20.0)))
    );
    // The presentation state's own shape is untouched.
    assert_eq!(
        pr.shutter_shape(),
        Some(&Region::from(Shape::circle(40.0, 40.0, 20.0)))
    );

    // Reusing the presentation state without a crop sees the original shape.
    let uncropped = resolve(
        &ImageOpEvent::apply_presentation_state(Some(shuttered_image()), Some(pr), None),
        &params,
    );
    assert_eq!(
        uncropped.shape,
        Some(Region::from(Shape::circle(40.0, 40.0, 20.0)))
    );
}

#[test]
fn test_crop_without_shape_is_harmless() {
    let pr: Arc<dyn PresentationState> = Arc::new(PresentationStateObject::default());
    let event = ImageOpEvent::apply_presentation_state(
        None,
        Some(pr),
        Some(CropRect::new(1, 1, 2, 2)),
    );
    let params = resolve(&event, &ShutterParameters::default());
    assert!(params.shape.is_none());
    assert!(params.presentation.is_some());
}

#[test]
fn test_other_events_are_no_ops() {
    let current = populated();
    let params = resolve(
        &ImageOpEvent::new(OpEvent::SeriesChange, None),
        &current,
    );
    assert_eq!(params.shape, current.shape);
    assert_eq!(params.gray_value, current.gray_value);
    assert!(params.presentation.is_some());
    assert!(params.source_image.is_some());
}

#[test]
fn test_user_settings_survive_every_event() {
    let current = ShutterParameters::default()
        .with_show(true)
        .with_occlusion(Occlusion::Inside);
    for kind in OpEvent::ALL {
        let params = resolve(&ImageOpEvent::new(kind, None), &current);
        assert!(params.show, "{kind} dropped the show flag");
        assert_eq!(params.occlusion, Occlusion::Inside, "{kind} dropped occlusion");
    }
}

#[test]
fn test_stage_replaces_parameters_on_events() {
    let mut op = ShutterOp::new();
    assert!(op.parameters().show);

    op.handle_event(&ImageOpEvent::image_change(Some(shuttered_image())));
    assert!(op.parameters().shape.is_some());

    op.set_show(false);
    op.handle_event(&ImageOpEvent::image_change(None));
    assert!(!op.parameters().show);
    assert!(op.parameters().shape.is_none());
}
