use crate::foundation::core::{Canvas, Point, Rect};
use crate::layout::markup::parse_markup;
use crate::layout::measure::{FontSpec, TextMeasure};
use crate::layout::plate::plate_rect;
use crate::layout::resolved::ResolvedStyle;
use crate::layout::wrap::{Segment, WrappedText, wrap_text};
use crate::model::slide::{Slide, TextBlock};
use crate::model::style::{SafeArea, TextAlign};
use smallvec::SmallVec;

/// Vertical gap between blocks sharing an anchor box.
pub const BLOCK_GAP: f64 = 40.0;
/// Left and right margin of the centered anchor box, fraction of canvas width.
pub const SIDE_MARGIN_RATIO: f64 = 0.075;
/// Gap between a block's title and body, in body em.
pub const TITLE_BODY_GAP_EM: f64 = 0.5;
/// Baseline position inside a glyph em box.
const BASELINE_RATIO: f64 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Body,
}

/// One wrapped line placed on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    pub role: TextRole,
    /// Left end of the baseline.
    pub origin: Point,
    pub width: f64,
    pub segments: SmallVec<[Segment; 2]>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedBlock {
    pub rect: Rect,
    pub lines: Vec<PlacedLine>,
}

/// Blocks stacked inside one anchor box.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorGroup {
    pub anchor: Rect,
    /// Union of the block rectangles.
    pub content: Rect,
    /// Plate bounds when the style enables a plate.
    pub plate: Option<Rect>,
    pub blocks: Vec<PlacedBlock>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlideLayout {
    pub groups: Vec<AnchorGroup>,
}

/// Blocks visible at `clock` seconds into the slide; `None` shows every block.
pub fn visible_blocks(slide: &Slide, clock: Option<f64>) -> Vec<TextBlock> {
    let blocks = slide.blocks();
    match clock {
        None => blocks,
        Some(t) => blocks.into_iter().filter(|b| b.is_visible_at(t)).collect(),
    }
}

/// Shared box for blocks without an explicit position.
pub fn centered_anchor(canvas: Canvas, safe_area: SafeArea) -> Rect {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    let side = w * SIDE_MARGIN_RATIO;
    Rect::new(
        side,
        h * safe_area.top / 100.0,
        w - side,
        h - h * safe_area.bottom / 100.0,
    )
}

/// Lay out blocks: the centered ones share one anchor, each positioned one gets its own.
pub fn layout_blocks(
    measure: &mut dyn TextMeasure,
    blocks: &[TextBlock],
    style: &ResolvedStyle,
    canvas: Canvas,
) -> SlideLayout {
    let (positioned, centered): (Vec<&TextBlock>, Vec<&TextBlock>) =
        blocks.iter().partition(|b| b.position.is_some());

    let mut groups = Vec::new();
    if !centered.is_empty() {
        let anchor = centered_anchor(canvas, style.safe_area);
        groups.extend(layout_group(measure, &centered, anchor, style));
    }
    for block in positioned {
        if let Some(pos) = block.position {
            groups.extend(layout_group(measure, &[block], pos.to_rect(canvas), style));
        }
    }
    SlideLayout { groups }
}

struct Measured {
    title: WrappedText,
    body: Option<WrappedText>,
    gap: f64,
    width: f64,
    height: f64,
}

/// Stack `blocks` vertically centered inside `anchor`.
pub fn layout_group(
    measure: &mut dyn TextMeasure,
    blocks: &[&TextBlock],
    anchor: Rect,
    style: &ResolvedStyle,
) -> Option<AnchorGroup> {
    let pad = style.plate.map(|p| p.padding).unwrap_or(0.0);
    let wrap_width = (anchor.width() - 2.0 * pad).max(1.0);

    let measured: Vec<Measured> = blocks
        .iter()
        .map(|b| measure_block(measure, b, style, wrap_width))
        .filter(|m| m.height > 0.0)
        .collect();
    if measured.is_empty() {
        return None;
    }

    let total = measured.iter().map(|m| m.height).sum::<f64>()
        + BLOCK_GAP * (measured.len() - 1) as f64;
    let mut top = anchor.center().y - total / 2.0;

    let mut placed = Vec::with_capacity(measured.len());
    for m in measured {
        let x0 = match style.align {
            TextAlign::Left => anchor.x0 + pad,
            TextAlign::Center => anchor.center().x - m.width / 2.0,
            TextAlign::Right => anchor.x1 - pad - m.width,
        };
        let rect = Rect::new(x0, top, x0 + m.width, top + m.height);

        let mut lines = Vec::new();
        let mut line_top = top;
        place_lines(
            &mut lines,
            &m.title,
            TextRole::Title,
            &style.title_font,
            rect,
            style.align,
            &mut line_top,
        );
        if let Some(body) = &m.body {
            line_top += m.gap;
            place_lines(
                &mut lines,
                body,
                TextRole::Body,
                &style.body_font,
                rect,
                style.align,
                &mut line_top,
            );
        }

        placed.push(PlacedBlock { rect, lines });
        top += m.height + BLOCK_GAP;
    }

    let content = placed
        .iter()
        .map(|b| b.rect)
        .reduce(|a, b| a.union(b))
        .unwrap_or(Rect::ZERO);
    Some(AnchorGroup {
        anchor,
        content,
        plate: style.plate.map(|p| plate_rect(content, p.padding)),
        blocks: placed,
    })
}

fn measure_block(
    measure: &mut dyn TextMeasure,
    block: &TextBlock,
    style: &ResolvedStyle,
    wrap_width: f64,
) -> Measured {
    let title = wrap_text(
        measure,
        &parse_markup(&block.title),
        &style.title_font,
        wrap_width,
        style.letter_spacing,
        style.title_line_height,
    );
    let body = block
        .body
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .map(|b| {
            wrap_text(
                measure,
                &parse_markup(b),
                &style.body_font,
                wrap_width,
                style.letter_spacing,
                style.body_line_height,
            )
        });

    let gap = match &body {
        Some(_) if title.height > 0.0 => TITLE_BODY_GAP_EM * f64::from(style.body_font.size),
        _ => 0.0,
    };
    let body_w = body.as_ref().map(|b| b.max_width).unwrap_or(0.0);
    let body_h = body.as_ref().map(|b| b.height).unwrap_or(0.0);
    Measured {
        width: title.max_width.max(body_w),
        height: title.height + gap + body_h,
        title,
        body,
        gap,
    }
}

fn place_lines(
    out: &mut Vec<PlacedLine>,
    text: &WrappedText,
    role: TextRole,
    font: &FontSpec,
    block: Rect,
    align: TextAlign,
    line_top: &mut f64,
) {
    let size = f64::from(font.size);
    for line in &text.lines {
        let x = match align {
            TextAlign::Left => block.x0,
            TextAlign::Center => block.x0 + (block.width() - line.width) / 2.0,
            TextAlign::Right => block.x1 - line.width,
        };
        let baseline = *line_top + (text.line_advance - size) / 2.0 + size * BASELINE_RATIO;
        out.push(PlacedLine {
            role,
            origin: Point::new(x, baseline),
            width: line.width,
            segments: line.segments.clone(),
        });
        *line_top += text.line_advance;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/blocks.rs"]
mod tests;
