use crate::foundation::color::Color;
use crate::layout::markup::Markup;
use crate::layout::measure::{FontSpec, TextMeasure, measure_width};
use smallvec::SmallVec;
use std::ops::Range;

/// Run of one color inside a wrapped line.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub text: String,
    /// Marker color; `None` uses the block's default color.
    pub color: Option<Color>,
    /// Horizontal offset from the line start, measured before any text transform.
    pub x: f64,
    /// Segment begins a word.
    pub word_start: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    pub segments: SmallVec<[Segment; 2]>,
    pub width: f64,
}

/// Lines produced by [`wrap_text`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WrappedText {
    pub lines: Vec<WrappedLine>,
    /// Widest measured line.
    pub max_width: f64,
    /// Distance between consecutive line tops.
    pub line_advance: f64,
    /// `lines × size × line_height`.
    pub height: f64,
}

/// Greedy word wrap of the markup's plain text.
///
/// A line is committed once appending the next word would exceed `max_width`. A word wider
/// than `max_width` keeps its own line. `\n` forces a break. Color markers never influence
/// the decisions.
pub fn wrap_text(
    measure: &mut dyn TextMeasure,
    markup: &Markup,
    font: &FontSpec,
    max_width: f64,
    letter_spacing: f32,
    line_height: f32,
) -> WrappedText {
    let plain = markup.plain.as_str();
    let line_advance = f64::from(font.size) * f64::from(line_height);
    let mut lines = Vec::new();
    if plain.is_empty() {
        return WrappedText {
            lines,
            max_width: 0.0,
            line_advance,
            height: 0.0,
        };
    }

    let mut offset = 0usize;
    for paragraph in plain.split('\n') {
        let words = word_ranges(paragraph, offset);
        offset += paragraph.len() + 1;

        if words.is_empty() {
            lines.push(WrappedLine {
                text: String::new(),
                segments: SmallVec::new(),
                width: 0.0,
            });
            continue;
        }

        let mut current: Vec<Range<usize>> = Vec::new();
        let mut current_text = String::new();
        for w in words {
            let word = &plain[w.clone()];
            if current.is_empty() {
                current_text.push_str(word);
                current.push(w);
                continue;
            }
            let candidate = format!("{current_text} {word}");
            if measure_width(measure, &candidate, font, letter_spacing) > max_width {
                lines.push(build_line(measure, markup, &current, font, letter_spacing));
                current.clear();
                current_text.clear();
                current_text.push_str(word);
            } else {
                current_text = candidate;
            }
            current.push(w);
        }
        if !current.is_empty() {
            lines.push(build_line(measure, markup, &current, font, letter_spacing));
        }
    }

    let max_width = lines.iter().map(|l| l.width).fold(0.0, f64::max);
    let height = lines.len() as f64 * line_advance;
    WrappedText {
        lines,
        max_width,
        line_advance,
        height,
    }
}

fn word_ranges(paragraph: &str, base: usize) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    for (i, ch) in paragraph.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                out.push(base + s..base + i);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        out.push(base + s..base + paragraph.len());
    }
    out
}

fn build_line(
    measure: &mut dyn TextMeasure,
    markup: &Markup,
    words: &[Range<usize>],
    font: &FontSpec,
    letter_spacing: f32,
) -> WrappedLine {
    // (char, color, starts a word)
    let mut chars: Vec<(char, Option<Color>, bool)> = Vec::new();
    for (i, w) in words.iter().enumerate() {
        if i > 0 {
            chars.push((' ', markup.color_at(words[i - 1].end), false));
        }
        for (j, (off, ch)) in markup.plain[w.clone()].char_indices().enumerate() {
            chars.push((ch, markup.color_at(w.start + off), j == 0));
        }
    }

    let text: String = chars.iter().map(|(c, _, _)| *c).collect();
    let width = measure_width(measure, &text, font, letter_spacing);
    let gap = f64::from(letter_spacing) * f64::from(font.size);

    let mut segments: SmallVec<[Segment; 2]> = SmallVec::new();
    let mut prefix = String::new();
    let mut i = 0usize;
    while i < chars.len() {
        let color = chars[i].1;
        let word_start = chars[i].2;
        let mut seg = String::new();
        while i < chars.len() && chars[i].1 == color {
            seg.push(chars[i].0);
            i += 1;
        }
        let x = if prefix.is_empty() {
            0.0
        } else {
            measure_width(measure, &prefix, font, letter_spacing) + gap
        };
        prefix.push_str(&seg);
        segments.push(Segment {
            text: seg,
            color,
            x,
            word_start,
        });
    }

    WrappedLine {
        text,
        segments,
        width,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
