use super::*;
use crate::foundation::core::EXPORT_CANVAS;
use crate::layout::measure::FixedAdvance;
use crate::model::slide::BlockPosition;
use crate::model::style::SlideStyle;

fn style(plate: bool, align: TextAlign) -> ResolvedStyle {
    let mut s = SlideStyle::default();
    s.text.font_size = 20.0;
    s.text.line_height = 1.0;
    s.text.align = align;
    s.plate.enabled = plate;
    ResolvedStyle::resolve(&s)
}

fn assert_rect(actual: Rect, expected: Rect) {
    let d = [
        actual.x0 - expected.x0,
        actual.y0 - expected.y0,
        actual.x1 - expected.x1,
        actual.y1 - expected.y1,
    ];
    assert!(d.iter().all(|v| v.abs() < 1e-6), "{actual:?} != {expected:?}");
}

fn measure() -> FixedAdvance {
    FixedAdvance { em_ratio: 0.5 }
}

#[test]
fn scenario_visibility_over_slide_time() {
    let mut slide = Slide::new("", 5.0);
    slide.text_blocks = Some(vec![
        TextBlock::new("A", None),
        TextBlock {
            delay: 2.0,
            duration: 1.0,
            ..TextBlock::new("B", None)
        },
    ]);
    let titles = |t: f64| -> Vec<String> {
        visible_blocks(&slide, Some(t))
            .into_iter()
            .map(|b| b.title)
            .collect()
    };
    assert_eq!(titles(1.0), ["A"]);
    assert_eq!(titles(2.5), ["A", "B"]);
    assert_eq!(titles(3.5), ["A"]);
    assert_eq!(visible_blocks(&slide, None).len(), 2);
}

#[test]
fn centered_anchor_respects_margins_and_safe_area() {
    let a = centered_anchor(EXPORT_CANVAS, SafeArea { top: 10.0, bottom: 15.0 });
    assert!((a.x0 - 81.0).abs() < 1e-9);
    assert!((a.x1 - 999.0).abs() < 1e-9);
    assert!((a.y0 - 192.0).abs() < 1e-9);
    assert!((a.y1 - 1632.0).abs() < 1e-9);
}

#[test]
fn centered_blocks_stack_with_gap_and_center_vertically() {
    let blocks = vec![TextBlock::new("AB", None), TextBlock::new("CDE", None)];
    let s = style(false, TextAlign::Center);
    let layout = layout_blocks(&mut measure(), &blocks, &s, EXPORT_CANVAS);
    assert_eq!(layout.groups.len(), 1);
    let g = &layout.groups[0];
    assert_eq!(g.blocks.len(), 2);
    assert_rect(g.blocks[0].rect, Rect::new(530.0, 872.0, 550.0, 892.0));
    assert_rect(g.blocks[1].rect, Rect::new(525.0, 932.0, 555.0, 952.0));
    assert!(g.plate.is_none());
    let gap = g.blocks[1].rect.y0 - g.blocks[0].rect.y1;
    assert!((gap - BLOCK_GAP).abs() < 1e-9);
}

#[test]
fn plate_wraps_stacked_content_with_padding() {
    let blocks = vec![TextBlock::new("AB", None), TextBlock::new("CDE", None)];
    let s = style(true, TextAlign::Center);
    let layout = layout_blocks(&mut measure(), &blocks, &s, EXPORT_CANVAS);
    let plate = layout.groups[0].plate.unwrap();
    assert!((plate.width() - (30.0 + 64.0)).abs() < 1e-9);
    assert!((plate.height() - (80.0 + 64.0)).abs() < 1e-9);
}

#[test]
fn positioned_blocks_get_their_own_anchor() {
    let mut blocks = vec![TextBlock::new("center", None)];
    blocks.push(TextBlock {
        position: Some(BlockPosition {
            x: 10.0,
            y: 80.0,
            width: 50.0,
            height: 10.0,
        }),
        ..TextBlock::new("corner", None)
    });
    let s = style(false, TextAlign::Left);
    let layout = layout_blocks(&mut measure(), &blocks, &s, EXPORT_CANVAS);
    assert_eq!(layout.groups.len(), 2);
    let corner = &layout.groups[1];
    assert_rect(corner.anchor, Rect::new(108.0, 1536.0, 648.0, 1728.0));
    assert!((corner.blocks[0].rect.x0 - 108.0).abs() < 1e-9);
    let mid = corner.anchor.center().y;
    assert!((corner.blocks[0].rect.center().y - mid).abs() < 1e-9);
}

#[test]
fn right_alignment_places_lines_flush_right() {
    let blocks = vec![TextBlock::new("aaaa bb", None)];
    let mut s = style(false, TextAlign::Right);
    s.title_font.size = 20.0;
    let anchor = Rect::new(0.0, 0.0, 50.0, 200.0);
    let refs: Vec<&TextBlock> = blocks.iter().collect();
    let g = layout_group(&mut measure(), &refs, anchor, &s).unwrap();
    let lines = &g.blocks[0].lines;
    assert_eq!(lines.len(), 2);
    for line in lines {
        assert!((line.origin.x + line.width - 50.0).abs() < 1e-9);
    }
}

#[test]
fn body_follows_title_with_gap() {
    let blocks = vec![TextBlock::new("T", Some("body".to_owned()))];
    let s = style(false, TextAlign::Center);
    let layout = layout_blocks(&mut measure(), &blocks, &s, EXPORT_CANVAS);
    let block = &layout.groups[0].blocks[0];
    assert_eq!(block.lines.len(), 2);
    assert_eq!(block.lines[0].role, TextRole::Title);
    assert_eq!(block.lines[1].role, TextRole::Body);
    // title 20, gap 0.5 × 12, body 12 × 1.2
    let expected = 20.0 + 6.0 + 12.0 * 1.2;
    assert!((block.rect.height() - expected).abs() < 1e-4);
}

#[test]
fn empty_blocks_produce_no_group() {
    let blocks = vec![TextBlock::new("", Some("   ".to_owned()))];
    let layout = layout_blocks(
        &mut measure(),
        &blocks,
        &style(true, TextAlign::Center),
        EXPORT_CANVAS,
    );
    assert!(layout.groups.is_empty());
}
