//! Integration tests for region rasterization and re-anchoring.

use quickcheck_macros::quickcheck;
use shutter_geom::{Coverage, Region, Shape};

/// Covered pixels of `coverage` as a sorted list.
fn pixels(coverage: &Coverage) -> Vec<(u32, u32)> {
    coverage.covered_pixels().collect()
}

#[test]
fn test_rectangle_covers_half_open_span() {
    let coverage = Shape::rect(10.0, 10.0, 50.0, 50.0).rasterize(100, 80);
    assert_eq!(coverage.covered_count(), 50 * 50);
    assert!(coverage.is_covered(10, 10));
    assert!(coverage.is_covered(59, 59));
    assert!(!coverage.is_covered(60, 59));
    assert!(!coverage.is_covered(9, 10));
}

#[test]
fn test_rectangle_clipped_by_target() {
    let coverage = Shape::rect(-5.0, -5.0, 10.0, 10.0).rasterize(20, 20);
    assert_eq!(coverage.covered_count(), 25);
    assert!(coverage.is_covered(0, 0));
    assert!(!coverage.is_covered(5, 5));
}

#[test]
fn test_circle_area_is_close_to_pi_r_squared() {
    let coverage = Shape::circle(10.0, 10.0, 6.0).rasterize(20, 20);
    assert!(coverage.is_covered(10, 10));
    assert!(!coverage.is_covered(0, 0));
    assert!(!coverage.is_covered(19, 19));
    // pi * 6^2 ~= 113
    let count = coverage.covered_count();
    assert!((95..=130).contains(&count), "unexpected circle area {count}");
}

#[test]
fn test_polygon_triangle() {
    let triangle = Shape::Polygon {
        points: vec![[0.0, 0.0], [10.0, 0.0], [0.0, 10.0]],
    };
    let coverage = triangle.rasterize(10, 10);
    assert!(coverage.is_covered(0, 0));
    assert!(coverage.is_covered(1, 1));
    assert!(!coverage.is_covered(9, 9));
}

#[test]
fn test_intersection_of_shutters() {
    let region = Region::intersection(vec![
        Shape::rect(0.0, 0.0, 30.0, 30.0).into(),
        Shape::rect(20.0, 20.0, 30.0, 30.0).into(),
    ]);
    let coverage = region.rasterize(60, 60);
    assert_eq!(coverage.covered_count(), 100);
    assert!(coverage.is_covered(20, 20));
    assert!(!coverage.is_covered(19, 19));
    assert_eq!(region.shape_count(), 2);
}

#[test]
fn test_union_of_shutters() {
    let region = Region::union(vec![
        Shape::rect(0.0, 0.0, 2.0, 2.0).into(),
        Shape::rect(4.0, 4.0, 2.0, 2.0).into(),
    ]);
    assert_eq!(region.rasterize(8, 8).covered_count(), 8);
}

#[test]
fn test_empty_combinations() {
    assert_eq!(Region::Union(vec![]).rasterize(4, 4).covered_count(), 0);
    assert_eq!(Region::Intersection(vec![]).rasterize(4, 4).covered_count(), 0);
}

#[test]
fn test_single_member_collapses() {
    let shape = Shape::circle(1.0, 1.0, 1.0);
    assert_eq!(Region::union(vec![shape.clone().into()]), Region::Shape(shape));
}

#[test]
fn test_translated_is_a_copy() {
    let original = Region::from(Shape::rect(10.0, 10.0, 5.0, 5.0));
    let moved = original.translated(-10.0, -10.0);
    assert_eq!(original, Region::from(Shape::rect(10.0, 10.0, 5.0, 5.0)));
    assert_eq!(moved, Region::from(Shape::rect(0.0, 0.0, 5.0, 5.0)));
}

#[quickcheck]
fn prop_reanchored_rect_occludes_same_pixels(
    x: u8,
    y: u8,
    w: u8,
    h: u8,
    crop_x: u8,
    crop_y: u8,
) -> bool {
    let (full_w, full_h) = (48u32, 40u32);
    let shape = Shape::rect(
        f32::from(x % 48),
        f32::from(y % 40),
        f32::from(w % 30 + 1),
        f32::from(h % 30 + 1),
    );
    let (cx, cy) = (u32::from(crop_x % 24), u32::from(crop_y % 20));
    let (crop_w, crop_h) = (full_w - cx, full_h - cy);

    let full = Region::from(shape.clone()).rasterize(full_w, full_h);
    #[allow(clippy::cast_precision_loss)]
    let cropped = Region::from(shape)
        .translated(-(cx as f32), -(cy as f32))
        .rasterize(crop_w, crop_h);

    (0..crop_h).all(|py| {
        (0..crop_w).all(|px| cropped.is_covered(px, py) == full.is_covered(px + cx, py + cy))
    })
}

#[quickcheck]
fn prop_rect_coverage_count_matches_clipped_area(x: u8, y: u8, w: u8, h: u8) -> bool {
    let (x, y) = (u32::from(x % 40), u32::from(y % 40));
    let (w, h) = (u32::from(w % 40), u32::from(h % 40));
    #[allow(clippy::cast_precision_loss)]
    let coverage = Shape::rect(x as f32, y as f32, w as f32, h as f32).rasterize(32, 32);
    let visible_w = (x + w).min(32).saturating_sub(x);
    let visible_h = (y + h).min(32).saturating_sub(y);
    let expected = (visible_w * visible_h) as usize;
    coverage.covered_count() == expected && pixels(&coverage).len() == expected
}
