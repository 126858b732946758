use super::*;
use serde_json::json;

#[test]
fn block_visibility_window() {
    let timed = TextBlock {
        delay: 2.0,
        duration: 1.0,
        ..TextBlock::new("B", None)
    };
    assert!(!timed.is_visible_at(1.999));
    assert!(timed.is_visible_at(2.0));
    assert!(timed.is_visible_at(2.5));
    assert!(!timed.is_visible_at(3.0));

    let open_ended = TextBlock {
        delay: 1.5,
        ..TextBlock::new("A", None)
    };
    assert!(!open_ended.is_visible_at(1.0));
    assert!(open_ended.is_visible_at(1.5));
    assert!(open_ended.is_visible_at(100.0));
}

#[test]
fn visibility_holds_across_slide_duration() {
    let block = TextBlock {
        delay: 0.75,
        duration: 2.25,
        ..TextBlock::new("x", None)
    };
    for i in 0..=500 {
        let t = f64::from(i) * 0.01;
        let expected = (0.75..3.0).contains(&t);
        assert_eq!(block.is_visible_at(t), expected, "t={t}");
    }
}

#[test]
fn implicit_block_uses_title_body_and_style_position() {
    let mut slide = Slide::new("Hello", 3.0);
    slide.body = Some("World".to_string());
    let blocks = slide.blocks();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].title, "Hello");
    assert_eq!(blocks[0].body.as_deref(), Some("World"));
    assert!(blocks[0].position.is_none());

    slide.style.text.position = Some(BlockPosition {
        x: 10.0,
        y: 10.0,
        width: 80.0,
        height: 20.0,
    });
    assert!(slide.blocks()[0].position.is_some());
}

#[test]
fn transition_names_parse_with_unknown_fallback() {
    let t: TransitionKind = serde_json::from_value(json!("slide-left")).unwrap();
    assert_eq!(t, TransitionKind::SlideLeft);
    let t: TransitionKind = serde_json::from_value(json!("sunlight")).unwrap();
    assert_eq!(t, TransitionKind::Sunlight);
    let t: TransitionKind = serde_json::from_value(json!("zoom-burst")).unwrap();
    assert_eq!(t, TransitionKind::None);
}

#[test]
fn unknown_transition_inside_slide_is_untransformed() {
    let slide: Slide = serde_json::from_value(json!({
        "title": "A",
        "durationSec": 1.0,
        "transition": "spin-3d"
    }))
    .unwrap();
    assert_eq!(slide.transition_kind(), TransitionKind::None);

    for kind in [
        TransitionKind::Fade,
        TransitionKind::Flash,
        TransitionKind::Glow,
        TransitionKind::SlideLeft,
        TransitionKind::SlideRight,
        TransitionKind::Sunlight,
    ] {
        let name = serde_json::to_value(kind).unwrap();
        assert_eq!(TransitionKind::from_name(name.as_str().unwrap()), kind);
    }
}

#[test]
fn validate_rejects_non_positive_duration_and_negative_delay() {
    assert!(Slide::new("x", 0.0).validate().is_err());
    assert!(Slide::new("x", f64::NAN).validate().is_err());
    assert!(Slide::new("x", 2.0).validate().is_ok());

    let mut slide = Slide::new("x", 2.0);
    slide.text_blocks = Some(vec![TextBlock {
        delay: -1.0,
        ..TextBlock::new("a", None)
    }]);
    assert!(slide.validate().is_err());
}

#[test]
fn deserializes_camel_case_slide() {
    let slide: Slide = serde_json::from_value(json!({
        "id": "s1",
        "projectId": "p1",
        "position": 0,
        "title": "Hi",
        "durationSec": 2.5,
        "textBlocks": [
            {"title": "A", "delay": 0},
            {"title": "B", "delay": 2, "duration": 1,
             "position": {"x": 10, "y": 70, "width": 80, "height": 10}}
        ],
        "transition": "fade"
    }))
    .unwrap();
    assert_eq!(slide.transition_kind(), TransitionKind::Fade);
    let blocks = slide.blocks();
    assert_eq!(blocks.len(), 2);
    let rect = blocks[1]
        .position
        .unwrap()
        .to_rect(crate::foundation::core::EXPORT_CANVAS);
    assert!((rect.x0 - 108.0).abs() < 1e-9);
    assert!((rect.y0 - 1344.0).abs() < 1e-9);
}
