use super::*;

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_premul_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &[0u8; 4], [0, 0, 0]).is_err());
}

#[test]
fn surface_rejects_oversized_canvas() {
    let canvas = Canvas {
        width: 70_000,
        height: 10,
    };
    assert!(Surface::new(canvas).is_err());
}

#[test]
fn png_and_jpeg_encodings_decode_back() {
    let frame = FrameRGBA {
        width: 4,
        height: 2,
        data: [200u8, 100, 50, 255].repeat(8),
        premultiplied: true,
    };
    let png = frame.encode(StillFormat::Png, 90).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (4, 2));
    assert_eq!(decoded.get_pixel(1, 1).0, [200, 100, 50, 255]);

    let jpg = frame.encode(StillFormat::Jpeg, 90).unwrap();
    assert_eq!(&jpg[..2], &[0xFF, 0xD8]);
    assert_eq!(StillFormat::Jpeg.extension(), "jpg");
}

#[test]
fn raster_image_checks_byte_length() {
    assert!(RasterImage::from_premul_bytes(&[0u8; 12], 2, 2).is_err());
    let img = RasterImage::from_straight_bytes(&[255u8; 16], 2, 2).unwrap();
    assert_eq!((img.width, img.height), (2, 2));
}
