use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use abstrakt::{Canvas, FrameRGBA, SettingValue, Studio};

#[derive(Parser, Debug)]
#[command(name = "abstrakt", version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one image and write it as a PNG.
    Generate(GenerateArgs),
    /// Animate the waves of one generated image into numbered PNG frames.
    Animate(AnimateArgs),
    /// Print the effective settings as JSON.
    Settings(SettingsArgs),
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// Surface width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Seed for reproducible output. Entropy-seeded when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Font file used for text items. Text is skipped without one.
    #[arg(long)]
    font: Option<PathBuf>,

    /// JSON object of setting overrides, e.g. {"rectangleCount.max": 10}.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Single override as `path=value`; may be repeated. Applied after `--settings`.
    #[arg(long = "set", value_name = "PATH=VALUE")]
    set: Vec<String>,

    /// Pick a random post filter.
    #[arg(long)]
    apply_filter: bool,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Also write the generated scene as JSON.
    #[arg(long)]
    dump_scene: Option<PathBuf>,

    /// Write the surface without the post filter.
    #[arg(long)]
    unfiltered: bool,
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Directory receiving `frame_0000.png`, `frame_0001.png`, ...
    #[arg(long)]
    out_dir: PathBuf,

    /// Number of frames to write.
    #[arg(long, default_value_t = 30)]
    frames: u32,

    /// Animation rate; one full wave cycle takes `fps` frames.
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

#[derive(Parser, Debug)]
struct SettingsArgs {
    /// JSON object of setting overrides to merge before printing.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Single override as `path=value`; may be repeated.
    #[arg(long = "set", value_name = "PATH=VALUE")]
    set: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Animate(args) => cmd_animate(args),
        Command::Settings(args) => cmd_settings(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "abstrakt=debug" } else { "abstrakt=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_override(raw: &str) -> anyhow::Result<(&str, SettingValue)> {
    let (path, value) = raw
        .split_once('=')
        .with_context(|| format!("override '{raw}' is not of the form path=value"))?;
    let value = serde_json::from_str::<SettingValue>(value)
        .unwrap_or_else(|_| SettingValue::Text(value.to_string()));
    Ok((path.trim(), value))
}

fn read_overrides(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read settings '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse settings '{}'", path.display()))
}

fn open_studio(args: &SessionArgs) -> anyhow::Result<Studio> {
    let canvas = Canvas::new(args.width, args.height)?;
    let mut studio = match args.seed {
        Some(seed) => Studio::seeded(canvas, seed)?,
        None => Studio::new(canvas)?,
    };

    if let Some(path) = &args.settings {
        studio
            .apply_settings_json(&read_overrides(path)?)
            .with_context(|| format!("apply settings '{}'", path.display()))?;
    }
    for raw in &args.set {
        let (path, value) = parse_override(raw)?;
        studio
            .set_setting(path, value)
            .with_context(|| format!("apply override '{raw}'"))?;
    }
    if let Some(font) = &args.font {
        studio
            .set_setting("font", SettingValue::Text(font.to_string_lossy().into_owned()))
            .with_context(|| format!("load font '{}'", font.display()))?;
    }
    if args.apply_filter {
        studio.set_setting("applyRandomFilter", SettingValue::Boolean(true))?;
    }
    Ok(studio)
}

fn write_png(frame: &FrameRGBA, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame
        .write_png(out)
        .with_context(|| format!("write png '{}'", out.display()))
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut studio = open_studio(&args.session)?;
    let scene = studio.generate()?;

    if let Some(path) = &args.dump_scene {
        let json = scene.to_json_pretty()?;
        std::fs::write(path, json).with_context(|| format!("write scene '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }

    let frame = if args.unfiltered {
        studio.raster()
    } else {
        studio.presented()?
    };
    write_png(&frame, &args.out)?;
    studio.wait_for_snapshots(Duration::from_secs(5));

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_animate(args: AnimateArgs) -> anyhow::Result<()> {
    let fps = abstrakt::Fps::new(args.fps, 1)?;
    let mut studio = open_studio(&args.session)?;
    studio.generate()?;
    studio.toggle_animation();

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for i in 0..args.frames {
        let frame = studio.presented()?;
        write_png(&frame, &args.out_dir.join(format!("frame_{i:04}.png")))?;
        studio.tick(fps.as_f64())?;
    }
    studio.wait_for_snapshots(Duration::from_secs(5));

    eprintln!("wrote {} frames to {}", args.frames, args.out_dir.display());
    Ok(())
}

fn cmd_settings(args: SettingsArgs) -> anyhow::Result<()> {
    let mut store = abstrakt::SettingsStore::default();
    if let Some(path) = &args.settings {
        store
            .apply_json(&read_overrides(path)?)
            .with_context(|| format!("apply settings '{}'", path.display()))?;
    }
    for raw in &args.set {
        let (path, value) = parse_override(raw)?;
        store
            .set(path, value)
            .with_context(|| format!("apply override '{raw}'"))?;
    }
    println!("{}", serde_json::to_string_pretty(&store.to_json())?);
    Ok(())
}
