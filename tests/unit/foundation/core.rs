use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert_eq!(Fps::new(30, 1).unwrap(), EXPORT_FPS);
}

#[test]
fn seconds_round_to_nearest_frame() {
    assert_eq!(EXPORT_FPS.secs_to_frames_round(7.0), 210);
    assert_eq!(EXPORT_FPS.secs_to_frames_round(1.01), 30);
    assert_eq!(EXPORT_FPS.secs_to_frames_round(1.02), 31);
    assert_eq!(EXPORT_FPS.secs_to_frames_round(-1.0), 0);
}

#[test]
fn frame_index_maps_back_to_seconds() {
    assert!((EXPORT_FPS.frames_to_secs(100) - 100.0 / 30.0).abs() < 1e-12);
}

#[test]
fn export_canvas_is_portrait_1080p() {
    assert_eq!(EXPORT_CANVAS.rgba_len(), 1080 * 1920 * 4);
    assert_eq!(EXPORT_CANVAS.rect().width(), 1080.0);
}
