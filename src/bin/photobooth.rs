use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use photobooth::{
    Bitmap, CaptureSession, Delivery, EffectKind, EncodeFormat, FrameColor, LibrarySink,
    PhotoboothConfig, Pipeline, StripSink as _, encode_bitmap,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "photobooth", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a photo strip from captured images.
    Strip(StripArgs),
    /// Apply one effect to a single image.
    Apply(ApplyArgs),
    /// List effects in picker order.
    Effects,
}

#[derive(Parser, Debug)]
struct StripArgs {
    /// Captured images, top to bottom.
    #[arg(long = "in", required = true, num_args = 1..)]
    in_paths: Vec<PathBuf>,

    /// Effect applied to every photo (defaults to the configured one).
    #[arg(long)]
    effect: Option<EffectKind>,

    /// Use a black frame.
    #[arg(long, conflicts_with = "frame_color")]
    dark_frame: bool,

    /// Frame colour: `white`, `black` or `#RRGGBB`.
    #[arg(long)]
    frame_color: Option<FrameColor>,

    /// Leave the caption band empty.
    #[arg(long)]
    no_date: bool,

    /// Caption date as `YYYY-MM-DD` (defaults to today).
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Number of shots expected (defaults to the configured count).
    #[arg(long)]
    shots: Option<usize>,

    /// Photobooth config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file; `.png`, `.jpg` or `.jpeg`.
    #[arg(long, required_unless_present = "library", conflicts_with = "library")]
    out: Option<PathBuf>,

    /// Save into this directory with a timestamped name instead of `--out`.
    #[arg(long)]
    library: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long)]
    effect: EffectKind,

    /// Output file; `.png`, `.jpg` or `.jpeg`.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Strip(args) => cmd_strip(args),
        Command::Apply(args) => cmd_apply(args),
        Command::Effects => {
            for kind in EffectKind::ALL {
                println!("{:<15}{}", kind.name(), kind.display_name());
            }
            Ok(())
        }
    }
}

fn cmd_strip(args: StripArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(p) => PhotoboothConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display()))?,
        None => PhotoboothConfig::default(),
    };
    if let Some(n) = args.shots {
        config.total_shots = n;
    }
    if args.dark_frame {
        config.frame_color = FrameColor::BLACK;
    }
    if let Some(c) = args.frame_color {
        config.frame_color = c;
    }
    if args.no_date {
        config.show_date = false;
    }
    let effect = args.effect.unwrap_or(config.effect);

    let mut session = CaptureSession::new(config.total_shots)?;
    for p in &args.in_paths {
        session
            .push(read_image(p)?)
            .with_context(|| format!("add shot '{}'", p.display()))?;
    }
    anyhow::ensure!(
        session.is_complete(),
        "got {} images, expected {}",
        session.captured(),
        session.total_shots()
    );
    let frames = session.finish()?;

    let mut pipeline = Pipeline::new(&config)?;
    let style = config.strip_style();
    let strip = match args.date {
        Some(date) => pipeline.render_strip(&frames, effect, &style, date),
        None => pipeline.render_strip_today(&frames, effect, &style),
    }
    .context("strip raster unavailable")?;

    if let Some(dir) = &args.library {
        let mut sink = LibrarySink::new(dir, config.export.encode_format());
        if let Delivery::Saved(path) = sink.deliver(&strip)? {
            eprintln!("wrote {}", path.display());
        }
        return Ok(());
    }
    let out = args.out.context("--out or --library is required")?;
    write_image(&strip, &out, config.export.jpeg_quality)
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let source = read_image(&args.in_path)?;
    let mut pipeline = Pipeline::new(&PhotoboothConfig::default())?;
    let out = pipeline.apply_effect(&source, args.effect);
    write_image(&out, &args.out, 90)
}

fn read_image(path: &Path) -> anyhow::Result<Bitmap> {
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    Bitmap::decode(&bytes).with_context(|| format!("decode '{}'", path.display()))
}

fn write_image(bitmap: &Bitmap, out: &Path, jpeg_quality: u8) -> anyhow::Result<()> {
    let ext = out
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let format = match ext.as_deref() {
        Some("png") => EncodeFormat::Png,
        Some("jpg" | "jpeg") => EncodeFormat::Jpeg {
            quality: jpeg_quality,
        },
        _ => anyhow::bail!("output '{}' must end in .png, .jpg or .jpeg", out.display()),
    };
    let bytes = encode_bitmap(bitmap, format)?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, bytes).with_context(|| format!("write '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}
