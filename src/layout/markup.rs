use crate::foundation::color::Color;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(?:#([0-9a-fA-F]{6}))?\]").expect("marker regex is valid"));

/// Colored byte range inside [`Markup::plain`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorSpan {
    pub start: usize,
    pub end: usize,
    pub color: Color,
}

/// Text with inline color markers removed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Markup {
    pub plain: String,
    /// Non-overlapping spans ordered by `start`.
    pub spans: Vec<ColorSpan>,
}

impl Markup {
    /// Color override at a byte offset of `plain`.
    pub fn color_at(&self, offset: usize) -> Option<Color> {
        self.spans
            .iter()
            .find(|s| (s.start..s.end).contains(&offset))
            .map(|s| s.color)
    }
}

/// Strip `[#RRGGBB]…[]` markers, recording the colored ranges.
///
/// An opener without a closer colors to the end of the text. A new opener ends the
/// previous span. A closer with no open span and markers with invalid colors stay literal.
pub fn parse_markup(text: &str) -> Markup {
    let mut plain = String::with_capacity(text.len());
    let mut spans = Vec::new();
    let mut open: Option<(usize, Color)> = None;
    let mut cursor = 0usize;

    for caps in MARKER.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let opener = caps.get(1).and_then(|hex| Color::parse(&format!("#{}", hex.as_str())).ok());
        if opener.is_none() && open.is_none() {
            continue;
        }
        plain.push_str(&text[cursor..m.start()]);
        cursor = m.end();
        if let Some((start, color)) = open.take() {
            push_span(&mut spans, start..plain.len(), color);
        }
        if let Some(color) = opener {
            open = Some((plain.len(), color));
        }
    }
    plain.push_str(&text[cursor..]);
    if let Some((start, color)) = open {
        push_span(&mut spans, start..plain.len(), color);
    }

    Markup { plain, spans }
}

fn push_span(spans: &mut Vec<ColorSpan>, range: Range<usize>, color: Color) {
    if range.is_empty() {
        return;
    }
    spans.push(ColorSpan {
        start: range.start,
        end: range.end,
        color,
    });
}

#[cfg(test)]
#[path = "../../tests/unit/layout/markup.rs"]
mod tests;
