use super::*;
use crate::encode::sink::VideoTrackConfig;
use crate::foundation::core::{Canvas, Fps};
use std::path::PathBuf;

fn stream() -> CaptureStream {
    CaptureStream {
        video: VideoTrackConfig {
            canvas: Canvas {
                width: 16,
                height: 16,
            },
            fps: Fps::new(30, 1).unwrap(),
            bitrate: bitrate_for_duration(1.0),
        },
        audio: None,
    }
}

fn gray_frame(v: u8) -> FrameRGBA {
    FrameRGBA {
        width: 16,
        height: 16,
        data: [v, v, v, 255].repeat(256),
        premultiplied: true,
    }
}

#[test]
fn bitrate_tiers() {
    assert_eq!(bitrate_for_duration(10.0), 8_000_000);
    assert_eq!(bitrate_for_duration(30.0), 8_000_000);
    assert_eq!(bitrate_for_duration(30.5), 5_000_000);
    assert_eq!(bitrate_for_duration(90.0), 5_000_000);
    assert_eq!(bitrate_for_duration(120.0), 2_500_000);
}

#[test]
fn push_before_begin_fails() {
    let mut rec = ContainerRecorder::new(MediaTools::default());
    assert!(rec.push_frame(FrameIndex(0), &gray_frame(0)).is_err());
    assert!(rec.end().is_err());
}

#[test]
fn missing_ffmpeg_fails_to_begin() {
    let mut rec = ContainerRecorder::new(MediaTools {
        ffmpeg: PathBuf::from("/nonexistent/ffmpeg"),
        ffprobe: PathBuf::from("/nonexistent/ffprobe"),
    });
    let err = rec.begin(stream()).unwrap_err();
    assert!(matches!(err, ReelError::Encode(_)));
}

#[test]
fn records_webm_blob() {
    let tools = MediaTools::default();
    if !tools.ffmpeg_available() {
        eprintln!("skipping: ffmpeg not available");
        return;
    }
    let mut rec = ContainerRecorder::new(tools);
    if rec.begin(stream()).is_err() {
        eprintln!("skipping: ffmpeg could not start a vp8 encoder");
        return;
    }
    for i in 0..10u64 {
        rec.push_frame(FrameIndex(i), &gray_frame((i * 20) as u8))
            .unwrap();
    }
    assert!(rec.push_frame(FrameIndex(3), &gray_frame(0)).is_err());
    let blob = match rec.end() {
        Ok(blob) => blob,
        Err(err) => {
            eprintln!("skipping: ffmpeg build lacks libvpx: {err}");
            return;
        }
    };
    assert_eq!(blob.mime, WEBM_VP8);
    assert_eq!(blob.extension(), "webm");
    // EBML magic.
    assert_eq!(&blob.bytes[..4], &[0x1A, 0x45, 0xDF, 0xA3]);
}

#[test]
fn abort_releases_child() {
    let tools = MediaTools::default();
    if !tools.ffmpeg_available() {
        eprintln!("skipping: ffmpeg not available");
        return;
    }
    let mut rec = ContainerRecorder::new(tools);
    if rec.begin(stream()).is_err() {
        return;
    }
    let _ = rec.push_frame(FrameIndex(0), &gray_frame(10));
    rec.abort();
    assert!(rec.end().is_err());
    assert!(rec.push_frame(FrameIndex(1), &gray_frame(10)).is_err());
}
