use super::*;

#[test]
fn body_falls_back_to_title_derived_values() {
    let mut style = SlideStyle::default();
    style.text.font_family = "Poppins".to_owned();
    style.text.font_size = 80.0;
    style.text.font_weight = 800;
    style.text.color = Color::rgb(10, 20, 30);

    let r = ResolvedStyle::resolve(&style);
    assert_eq!(r.body_font.family, "Poppins");
    assert_eq!(r.body_font.weight, 600);
    assert!((r.body_font.size - 48.0).abs() < 1e-6);
    assert_eq!(r.body_color, Color::rgb(10, 20, 30));
    assert_eq!(r.body_line_height, BODY_LINE_HEIGHT);
}

#[test]
fn body_weight_never_drops_below_100() {
    let mut style = SlideStyle::default();
    style.text.font_weight = 200;
    assert_eq!(ResolvedStyle::resolve(&style).body_font.weight, 100);
    style.text.font_weight = 100;
    assert_eq!(ResolvedStyle::resolve(&style).body_font.weight, 100);
}

#[test]
fn explicit_body_values_win() {
    let mut style = SlideStyle::default();
    style.text.body_font_family = Some("Lora".to_owned());
    style.text.body_font_size = Some(30.0);
    style.text.body_font_weight = Some(300);
    style.text.body_color = Some(Color::BLACK);
    let r = ResolvedStyle::resolve(&style);
    assert_eq!(r.body_font, FontSpec::new("Lora", 30.0, 300));
    assert_eq!(r.body_color, Color::BLACK);
}

#[test]
fn plate_disables_text_decorations() {
    let mut style = SlideStyle::default();
    style.text.stroke = Some(StrokeStyle {
        width: 2.0,
        color: Color::BLACK,
    });
    let bare = ResolvedStyle::resolve(&style);
    assert!(bare.plate.is_none());
    assert!(bare.stroke.is_some());
    assert_eq!(
        bare.shadow,
        Some(ShadowParams {
            intensity: DEFAULT_SHADOW_INTENSITY,
            radius: DEFAULT_SHADOW_RADIUS
        })
    );

    style.plate.enabled = true;
    style.plate.opacity = 0.5;
    let plated = ResolvedStyle::resolve(&style);
    let plate = plated.plate.unwrap();
    assert_eq!(plate.fill.a, 128);
    assert!(plated.stroke.is_none());
    assert!(plated.shadow.is_none());
}

#[test]
fn zero_shadow_intensity_disables_shadow() {
    let mut style = SlideStyle::default();
    style.text.shadow_intensity = Some(0.0);
    assert!(ResolvedStyle::resolve(&style).shadow.is_none());
}
