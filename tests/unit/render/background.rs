use super::*;
use crate::foundation::core::Point;

#[test]
fn cover_fills_canvas_and_crops_evenly() {
    let canvas = Canvas {
        width: 1080,
        height: 1920,
    };
    // Landscape 1920x1080 source must scale by 1920/1080 to cover the height.
    let t = cover_transform(1920, 1080, canvas);
    let tl = t * Point::new(0.0, 0.0);
    let br = t * Point::new(1920.0, 1080.0);
    assert!((tl.y - 0.0).abs() < 1e-9);
    assert!((br.y - 1920.0).abs() < 1e-9);
    assert!(tl.x < 0.0 && br.x > 1080.0);
    assert!(((tl.x + br.x) / 2.0 - 540.0).abs() < 1e-9);
}

#[test]
fn cover_of_matching_aspect_is_pure_scale() {
    let canvas = Canvas {
        width: 1080,
        height: 1920,
    };
    let t = cover_transform(540, 960, canvas);
    assert_eq!(t * Point::new(540.0, 960.0), Point::new(1080.0, 1920.0));
}

#[test]
fn gradient_stops_are_hit_at_ends_and_middle() {
    assert_eq!(sample_stops(0.0), GRADIENT_STOPS[0]);
    assert_eq!(sample_stops(0.5), GRADIENT_STOPS[1]);
    assert_eq!(sample_stops(1.0), GRADIENT_STOPS[2]);
}

#[test]
fn gradient_image_matches_canvas() {
    let img = diagonal_gradient(Canvas {
        width: 8,
        height: 16,
    })
    .unwrap();
    assert_eq!((img.width, img.height), (8, 16));
}
