use super::*;
use crate::foundation::core::EXPORT_FPS;

fn timeline(durations: &[f64]) -> Timeline {
    let slides: Vec<Slide> = durations
        .iter()
        .map(|&d| Slide::new("s", d))
        .collect();
    Timeline::new(&slides, EXPORT_FPS)
}

#[test]
fn scenario_a_frame_count_and_lookup() {
    let tl = timeline(&[2.0, 3.0, 2.0]);
    assert_eq!(tl.total_frames(), 210);

    let active = tl.locate(FrameIndex(100)).unwrap();
    assert_eq!(active.index, 1);
    assert!((active.slide_elapsed - 4.0 / 3.0).abs() < 1e-9);
    assert_eq!(active.transition_progress, 1.0);
}

#[test]
fn boundaries_switch_slides_exactly() {
    let tl = timeline(&[2.0, 3.0, 2.0]);
    assert_eq!(tl.locate(FrameIndex(0)).unwrap().index, 0);
    assert_eq!(tl.locate(FrameIndex(59)).unwrap().index, 0);

    let first_of_second = tl.locate(FrameIndex(60)).unwrap();
    assert_eq!(first_of_second.index, 1);
    assert_eq!(first_of_second.transition_progress, 0.0);

    let mid_transition = tl.locate(FrameIndex(66)).unwrap();
    assert!((mid_transition.transition_progress - 0.4).abs() < 1e-9);

    assert_eq!(tl.locate(FrameIndex(209)).unwrap().index, 2);
    assert_eq!(tl.locate(FrameIndex(10_000)).unwrap().index, 2);
}

#[test]
fn frame_count_rounds_to_nearest() {
    assert_eq!(timeline(&[1.01]).total_frames(), 30);
    assert_eq!(timeline(&[1.02]).total_frames(), 31);
    assert_eq!(timeline(&[]).total_frames(), 0);
    assert!(timeline(&[]).locate(FrameIndex(0)).is_none());
}
