use super::*;

fn stream(w: u32, h: u32) -> CaptureStream {
    CaptureStream {
        video: VideoTrackConfig {
            canvas: Canvas {
                width: w,
                height: h,
            },
            fps: Fps::new(30, 1).unwrap(),
            bitrate: 8_000_000,
        },
        audio: None,
    }
}

fn frame() -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    }
}

#[test]
fn odd_dimensions_are_rejected() {
    assert!(stream(3, 4).validate().is_err());
    assert!(stream(0, 4).validate().is_err());
    assert!(stream(4, 4).validate().is_ok());
}

#[test]
fn in_memory_sink_enforces_increasing_order() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), &frame()).is_err());
    sink.begin(stream(2, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &frame()).unwrap();
    sink.push_frame(FrameIndex(1), &frame()).unwrap();
    assert!(sink.push_frame(FrameIndex(1), &frame()).is_err());

    let blob = sink.end().unwrap();
    assert_eq!(blob.mime, "video/x-raw");
    assert_eq!(u64::from_le_bytes(blob.bytes.try_into().unwrap()), 2);
    assert_eq!(sink.frames().len(), 2);
}

#[test]
fn indices_only_drops_pixels() {
    let mut sink = InMemorySink::indices_only();
    sink.begin(stream(2, 2)).unwrap();
    sink.push_frame(FrameIndex(5), &frame()).unwrap();
    assert!(sink.frames()[0].1.data.is_empty());
    sink.abort();
    assert!(sink.was_aborted());
}
