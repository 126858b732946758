//! slidereel renders scripted text slides over a looping background into a video or a still
//! archive.
//!
//! - Load a [`Project`] (slides, styles, background, audio bed)
//! - Compose frames with a [`Compositor`]
//! - Export video through a [`VideoExporter`] into a [`FrameSink`], stills with
//!   [`export_stills`], or several projects with [`export_batch`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod audio;
pub mod config;
pub(crate) mod encode;
pub(crate) mod export;
pub(crate) mod layout;
pub mod logging;
pub(crate) mod media;
pub(crate) mod model;
pub(crate) mod render;

pub use crate::config::{ExportConfig, FontsConfig, LoggingConfig, Pacing, TranscodeConfig};
pub use crate::foundation::color::Color;
pub use crate::foundation::core::{
    Affine, BezPath, Canvas, DEFAULT_OVERLAY_PERCENT, EXPORT_CANVAS, EXPORT_FPS, Fps, FrameIndex,
    Point, Rect, TRANSITION_SECS, Vec2,
};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::layout::blocks::{
    AnchorGroup, PlacedBlock, PlacedLine, SlideLayout, TextRole, layout_blocks, visible_blocks,
};
pub use crate::layout::markup::{ColorSpan, Markup, parse_markup};
pub use crate::layout::measure::{FixedAdvance, FontSpec, TextMeasure, measure_width};
pub use crate::layout::resolved::ResolvedStyle;
pub use crate::layout::wrap::{Segment, WrappedLine, WrappedText, wrap_text};

pub use crate::model::asset::{Asset, MediaKind};
pub use crate::model::project::{MAX_OVERLAY_PERCENT, Project};
pub use crate::model::slide::{BlockPosition, Slide, TextBlock, TransitionKind};
pub use crate::model::style::{
    GlowStyle, PlateStyle, SafeArea, SlideStyle, StrokeStyle, TextAlign, TextStyle, TextTransform,
};

pub use crate::render::compositor::{Compositor, FrameRequest};
pub use crate::render::fonts::FontBook;
pub use crate::render::surface::{FrameRGBA, RasterImage, StillFormat, Surface};
pub use crate::render::transitions::{TransitionEffect, transition_effect, transition_progress};

pub use crate::audio::mix::{AudioMixGraph, AudioTrack, MUSIC_GAIN, prepare_audio_track};
pub use crate::media::decode::{AudioPcm, VideoSourceInfo, decode_image, probe_video};
pub use crate::media::playback::VideoPlayback;
pub use crate::media::process::MediaTools;

pub use crate::encode::blob::MediaBlob;
pub use crate::encode::recorder::{ContainerRecorder, bitrate_for_duration};
pub use crate::encode::sink::{CaptureStream, FrameSink, InMemorySink, VideoTrackConfig};
pub use crate::encode::transcode::{
    FfmpegTranscoder, Transcode, TranscodeOutcome, TranscodeTimeouts, TranscoderState,
    transcode_or_fallback,
};

pub use crate::export::batch::{BatchItem, BatchJob, export_batch};
pub use crate::export::capture::{
    ExportState, ExportStatus, FramePacer, RealtimePacer, UnpacedPacer, VideoExport,
    VideoExporter, export_video,
};
pub use crate::export::preview::render_preview_frame;
pub use crate::export::progress::{LogProgress, NullProgress, ProgressObserver};
pub use crate::export::stills::{ZIP_MIME, export_stills, still_entry_name};
pub use crate::export::timeline::{ActiveSlide, Timeline};
