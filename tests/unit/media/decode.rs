use super::*;
use std::io::Cursor;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions() {
    let img = decode_image(&png_bytes(3, 2, [100, 50, 200, 128])).unwrap();
    assert_eq!((img.width, img.height), (3, 2));
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn svg_is_rasterized_to_cover_canvas() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
        <rect width="10" height="10" fill="#ff0000"/></svg>"##;
    let canvas = Canvas {
        width: 108,
        height: 192,
    };
    let img = rasterize_svg(svg, canvas).unwrap();
    assert!(img.width >= 108 && img.height >= 192);
    assert_eq!(img.width, img.height);
    assert!(rasterize_svg(b"<svg", canvas).is_err());
}

#[test]
fn load_still_reads_image_files_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("bg.png");
    std::fs::write(&png, png_bytes(4, 4, [0, 255, 0, 255])).unwrap();
    let canvas = Canvas {
        width: 8,
        height: 8,
    };
    let tools = MediaTools::default();
    let img = load_still(&tools, &png, MediaKind::Image, canvas, Duration::from_secs(5)).unwrap();
    assert_eq!((img.width, img.height), (4, 4));

    let missing = dir.path().join("missing.png");
    assert!(load_still(&tools, &missing, MediaKind::Image, canvas, Duration::from_secs(5)).is_err());
}

#[test]
fn audio_decode_stops_at_requested_length() {
    let tools = MediaTools::default();
    if !tools.ffmpeg_available() {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("tone.wav");
    let status = Command::new(&tools.ffmpeg)
        .args(["-v", "error", "-y", "-f", "lavfi", "-i", "sine=frequency=440:duration=4"])
        .arg(&wav)
        .status()
        .unwrap();
    assert!(status.success());

    let rate = 8_000;
    let full = decode_audio_f32_stereo(&tools, &wav, rate, None, Duration::from_secs(20)).unwrap();
    let cut =
        decode_audio_f32_stereo(&tools, &wav, rate, Some(0.5), Duration::from_secs(20)).unwrap();
    let frames = |pcm: &AudioPcm| pcm.interleaved_f32.len() / usize::from(pcm.channels);
    assert!(frames(&full) >= 3 * rate as usize);
    assert!(frames(&cut).abs_diff(rate as usize / 2) <= 64);
}
