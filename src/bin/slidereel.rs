use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use slidereel::{
    BatchJob, Compositor, ContainerRecorder, ExportConfig, ExportStatus, FontBook, FrameSink,
    LogProgress, MediaBlob, Pacing, Project, StillFormat, VideoExporter,
};

#[derive(Parser, Debug)]
#[command(name = "slidereel", version)]
struct Cli {
    /// Export configuration JSON. Missing fields use defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, overriding the configured level (`RUST_LOG` still wins).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a project to video (WebM, converted to MP4 when possible).
    Render(RenderArgs),
    /// Render one still per slide into a ZIP archive.
    Stills(StillsArgs),
    /// Render a single preview frame as a PNG.
    Frame(FrameArgs),
    /// Render several projects one after another.
    Batch(BatchArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output video path. The extension is corrected to match the produced container.
    #[arg(long)]
    out: PathBuf,

    /// Render as fast as possible instead of in real time.
    #[arg(long)]
    unpaced: bool,

    /// Keep the recorded WebM.
    #[arg(long)]
    no_transcode: bool,
}

#[derive(Parser, Debug)]
struct StillsArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output ZIP path.
    #[arg(long)]
    out: PathBuf,

    /// Image format for each still.
    #[arg(long, value_enum)]
    format: Option<FormatChoice>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Slide index (0-based).
    #[arg(long, default_value_t = 0)]
    slide: usize,

    /// Seconds into the slide.
    #[arg(long, default_value_t = 1.0)]
    at: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Input project JSON files, exported in order.
    #[arg(long = "in", required = true)]
    in_paths: Vec<PathBuf>,

    /// Directory receiving one output per input, named after the input file.
    #[arg(long)]
    out_dir: PathBuf,

    /// Render as fast as possible instead of in real time.
    #[arg(long)]
    unpaced: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Jpeg,
}

impl From<FormatChoice> for StillFormat {
    fn from(c: FormatChoice) -> Self {
        match c {
            FormatChoice::Png => StillFormat::Png,
            FormatChoice::Jpeg => StillFormat::Jpeg,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ExportConfig::from_path(path)?,
        None => ExportConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    slidereel::logging::init_logging(&config.logging);

    match cli.cmd {
        Command::Render(args) => cmd_render(args, config),
        Command::Stills(args) => cmd_stills(args, config),
        Command::Frame(args) => cmd_frame(args, config),
        Command::Batch(args) => cmd_batch(args, config),
    }
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

/// Write `blob` to `out`, swapping the extension when the container differs from the request.
fn write_blob(out: &Path, blob: &MediaBlob) -> anyhow::Result<PathBuf> {
    let ext = blob.extension();
    let path = match out.extension().and_then(|e| e.to_str()) {
        Some(e) if e.eq_ignore_ascii_case(ext) => out.to_path_buf(),
        _ => out.with_extension(ext),
    };
    ensure_parent_dir(&path)?;
    std::fs::write(&path, &blob.bytes).with_context(|| format!("write '{}'", path.display()))?;
    Ok(path)
}

fn cmd_render(args: RenderArgs, mut config: ExportConfig) -> anyhow::Result<()> {
    let project = Project::from_path(&args.in_path)?;
    if args.unpaced {
        config.pacing = Pacing::Unpaced;
    }
    if args.no_transcode {
        config.transcode.enabled = false;
    }

    let mut exporter = VideoExporter::new(config.clone())?;
    let mut recorder = ContainerRecorder::new(config.tools.clone());
    let export = exporter.export(&project, &mut recorder, &mut LogProgress)?;

    if let ExportStatus::CompleteViaFallback { reason } = &export.status {
        eprintln!("note: kept {} ({reason})", export.blob.mime);
    }
    let path = write_blob(&args.out, &export.blob)?;
    eprintln!("wrote {} ({} frames)", path.display(), export.frames);
    Ok(())
}

fn cmd_stills(args: StillsArgs, mut config: ExportConfig) -> anyhow::Result<()> {
    let project = Project::from_path(&args.in_path)?;
    if let Some(format) = args.format {
        config.still_format = format.into();
    }
    let mut compositor = Compositor::new(FontBook::from_config(&config.fonts)?);
    let blob = slidereel::export_stills(
        &project,
        &config,
        &mut compositor,
        slidereel::EXPORT_CANVAS,
        &mut LogProgress,
    )?;
    let path = write_blob(&args.out, &blob)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs, config: ExportConfig) -> anyhow::Result<()> {
    let project = Project::from_path(&args.in_path)?;
    let mut compositor = Compositor::new(FontBook::from_config(&config.fonts)?);
    let frame = slidereel::render_preview_frame(
        &project,
        args.slide,
        args.at,
        &config,
        &mut compositor,
        slidereel::EXPORT_CANVAS,
    )?;
    let png = frame.encode(StillFormat::Png, config.jpeg_quality)?;
    let path = write_blob(&args.out, &MediaBlob::new(png, StillFormat::Png.mime()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

/// Output stem per input: the file name without its final `.json`, suffixed
/// with `-2`, `-3`, ... when two inputs share a stem.
fn job_names(paths: &[PathBuf]) -> Vec<String> {
    let mut taken = std::collections::HashSet::new();
    paths
        .iter()
        .map(|path| {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .filter(|s| !s.is_empty())
                .unwrap_or("project");
            let mut name = stem.to_owned();
            let mut n = 2usize;
            while !taken.insert(name.clone()) {
                name = format!("{stem}-{n}");
                n += 1;
            }
            name
        })
        .collect()
}

fn cmd_batch(args: BatchArgs, mut config: ExportConfig) -> anyhow::Result<()> {
    if args.unpaced {
        config.pacing = Pacing::Unpaced;
    }
    let names = job_names(&args.in_paths);
    let mut jobs = Vec::with_capacity(args.in_paths.len());
    for (path, name) in args.in_paths.iter().zip(names) {
        jobs.push(BatchJob {
            name,
            project: Project::from_path(path)?,
        });
    }

    let tools = config.tools.clone();
    let mut exporter = VideoExporter::new(config)?;
    let mut make_sink =
        || -> Box<dyn FrameSink> { Box::new(ContainerRecorder::new(tools.clone())) };
    let items = slidereel::export_batch(&jobs, &mut exporter, &mut make_sink, &mut LogProgress);

    let mut failed = 0usize;
    for item in &items {
        let blob = item.blob();
        let path = args.out_dir.join(format!("{}.{}", item.name, blob.extension()));
        ensure_parent_dir(&path)?;
        std::fs::write(&path, &blob.bytes)
            .with_context(|| format!("write '{}'", path.display()))?;
        match &item.outcome {
            Ok(_) => eprintln!("wrote {}", path.display()),
            Err(reason) => {
                failed += 1;
                eprintln!("failed {}: {reason}", item.name);
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} batch jobs failed", items.len());
    }
    Ok(())
}
