use super::*;
use std::path::PathBuf;

fn pcm(samples: Vec<f32>) -> AudioPcm {
    AudioPcm {
        sample_rate: MIX_SAMPLE_RATE,
        channels: MIX_CHANNELS,
        interleaved_f32: samples,
    }
}

#[test]
fn gain_and_clamp_are_applied() {
    let graph = AudioMixGraph::default();
    let out = graph
        .process(&pcm(vec![0.5, -0.5, 2.0, -2.0]), 2.0 / 48_000.0)
        .unwrap();
    assert_eq!(out.len(), 4);
    assert!((out[0] - 0.4).abs() < 1e-6);
    assert!((out[1] + 0.4).abs() < 1e-6);
    assert_eq!(out[2], 1.0);
    assert_eq!(out[3], -1.0);
}

#[test]
fn short_source_is_padded_with_silence() {
    let graph = AudioMixGraph::default();
    let out = graph.process(&pcm(vec![0.5; 10]), 0.01).unwrap();
    assert_eq!(out.len(), 960);
    assert!(out[10..].iter().all(|&s| s == 0.0));
}

#[test]
fn long_source_is_truncated() {
    let graph = AudioMixGraph::default();
    let out = graph.process(&pcm(vec![0.25; 48_000 * 2]), 0.5).unwrap();
    assert_eq!(out.len(), 48_000);
}

#[test]
fn mismatched_format_is_rejected() {
    let graph = AudioMixGraph::default();
    let mono = AudioPcm {
        sample_rate: 44_100,
        channels: 1,
        interleaved_f32: vec![0.0; 4],
    };
    assert!(graph.process(&mono, 1.0).is_err());
}

#[test]
fn track_file_holds_le_samples_and_is_removed_on_drop() {
    let graph = AudioMixGraph::default();
    let track = graph.write_track(&[0.5, -0.25, 0.0, 1.0]).unwrap();
    let path = track.path().to_path_buf();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 16);
    assert_eq!(f32::from_le_bytes(bytes[4..8].try_into().unwrap()), -0.25);
    assert_eq!(track.channels, 2);
    assert!((track.duration_sec - 2.0 / 48_000.0).abs() < 1e-12);

    let clone = track.clone();
    drop(track);
    assert!(path.exists());
    drop(clone);
    assert!(!path.exists());
}

#[test]
fn prepare_degrades_to_none() {
    let tools = MediaTools {
        ffmpeg: PathBuf::from("/nonexistent/ffmpeg"),
        ffprobe: PathBuf::from("/nonexistent/ffprobe"),
    };
    let track = prepare_audio_track(
        &tools,
        Path::new("music.mp3"),
        3.0,
        Duration::from_secs(1),
    );
    assert!(track.is_none());
}
