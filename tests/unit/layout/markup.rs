use super::*;

const RED: Color = Color::rgb(255, 0, 0);

#[test]
fn plain_text_has_no_spans() {
    let m = parse_markup("Hello world");
    assert_eq!(m.plain, "Hello world");
    assert!(m.spans.is_empty());
}

#[test]
fn closed_marker_colors_inner_range() {
    let m = parse_markup("Buy [#FF0000]now[] please");
    assert_eq!(m.plain, "Buy now please");
    assert_eq!(
        m.spans,
        vec![ColorSpan {
            start: 4,
            end: 7,
            color: RED
        }]
    );
    assert_eq!(m.color_at(5), Some(RED));
    assert_eq!(m.color_at(7), None);
}

#[test]
fn unterminated_marker_colors_to_end() {
    let m = parse_markup("a [#00ff00]green tail");
    assert_eq!(m.plain, "a green tail");
    assert_eq!(m.spans.len(), 1);
    assert_eq!(m.spans[0].start, 2);
    assert_eq!(m.spans[0].end, m.plain.len());
}

#[test]
fn invalid_color_stays_literal() {
    let m = parse_markup("x [#zzzzzz]y[] z");
    assert_eq!(m.plain, "x [#zzzzzz]y[] z");
    assert!(m.spans.is_empty());
}

#[test]
fn new_opener_ends_previous_span() {
    let m = parse_markup("[#ff0000]ab[#0000ff]cd[]");
    assert_eq!(m.plain, "abcd");
    assert_eq!(m.spans.len(), 2);
    assert_eq!((m.spans[0].start, m.spans[0].end), (0, 2));
    assert_eq!((m.spans[1].start, m.spans[1].end), (2, 4));
    assert_eq!(m.spans[1].color, Color::rgb(0, 0, 255));
}

#[test]
fn multibyte_offsets_are_byte_based() {
    let m = parse_markup("é[#ff0000]ü[]");
    assert_eq!(m.plain, "éü");
    assert_eq!((m.spans[0].start, m.spans[0].end), (2, 4));
}
