use super::*;
use crate::export::progress::NullProgress;
use crate::model::asset::{Asset, MediaKind};
use crate::render::fonts::FontBook;
use std::io::Read;

fn small() -> Canvas {
    Canvas {
        width: 24,
        height: 40,
    }
}

fn project(n: usize) -> Project {
    Project::new((0..n).map(|i| Slide::new(format!("Slide {i}"), 2.0)).collect())
}

fn entries(blob: &MediaBlob) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(blob.bytes.clone())).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut f = archive.by_index(i).unwrap();
            let mut buf = Vec::new();
            f.read_to_end(&mut buf).unwrap();
            (f.name().to_owned(), buf)
        })
        .collect()
}

#[test]
fn entry_names_are_one_based_and_padded() {
    assert_eq!(still_entry_name(0, StillFormat::Png), "slide_001.png");
    assert_eq!(still_entry_name(41, StillFormat::Jpeg), "slide_042.jpg");
    assert_eq!(still_entry_name(1233, StillFormat::Png), "slide_1234.png");
}

#[test]
fn archive_holds_one_png_per_slide() {
    let mut compositor = Compositor::new(FontBook::new());
    let blob = export_stills(
        &project(3),
        &ExportConfig::default(),
        &mut compositor,
        small(),
        &mut NullProgress,
    )
    .unwrap();
    assert_eq!(blob.mime, ZIP_MIME);
    assert_eq!(blob.extension(), "zip");

    let files = entries(&blob);
    let names: Vec<_> = files.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["slide_001.png", "slide_002.png", "slide_003.png"]);
    for (_, bytes) in &files {
        let img = image::load_from_memory(bytes).unwrap();
        assert_eq!((img.width(), img.height()), (24, 40));
    }
}

#[test]
fn jpeg_format_and_broken_background_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let mut p = project(1);
    p.root = dir.path().to_path_buf();
    p.background = Some(Asset::new("bg", "missing.jpg", MediaKind::Image));

    let config = ExportConfig {
        still_format: StillFormat::Jpeg,
        ..ExportConfig::default()
    };
    let mut compositor = Compositor::new(FontBook::new());
    let blob = export_stills(&p, &config, &mut compositor, small(), &mut NullProgress).unwrap();
    let files = entries(&blob);
    assert_eq!(files[0].0, "slide_001.jpg");
    assert_eq!(&files[0].1[..2], &[0xFF, 0xD8]);
}

#[test]
fn stills_are_deterministic() {
    let mut compositor = Compositor::new(FontBook::new());
    let config = ExportConfig::default();
    let a = export_stills(&project(2), &config, &mut compositor, small(), &mut NullProgress)
        .unwrap();
    let b = export_stills(&project(2), &config, &mut compositor, small(), &mut NullProgress)
        .unwrap();
    assert_eq!(entries(&a), entries(&b));
}
