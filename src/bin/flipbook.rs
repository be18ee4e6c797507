use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "flipbook", version)]
struct Cli {
    /// JSON config file (canvas size, brush, onion skin, frame delay).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Canvas width in pixels; overrides the config file.
    #[arg(long, global = true)]
    width: Option<u32>,

    /// Canvas height in pixels; overrides the config file.
    #[arg(long, global = true)]
    height: Option<u32>,

    /// Log more (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a document of blank frames.
    New(NewArgs),
    /// Print frame count and canvas size of a document.
    Info(InfoArgs),
    /// Render one frame (with optional onion skin) as a PNG.
    Frame(FrameArgs),
    /// Export a document as a looping animated GIF.
    Export(ExportArgs),
    /// Open the drawing window (requires the `window` feature).
    Edit(EditArgs),
}

#[derive(Parser, Debug)]
struct NewArgs {
    /// Output document path.
    #[arg(long)]
    out: PathBuf,

    /// Number of blank frames.
    #[arg(long, default_value_t = 1)]
    frames: usize,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input document.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input document.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    index: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Onion skin pass for the previous frame.
    #[arg(long, value_enum, default_value_t = OnionChoice::Beneath)]
    onion: OnionChoice,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input document.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// Display time per frame; defaults to the config value (100 ms).
    #[arg(long)]
    delay_ms: Option<u64>,
}

#[derive(Parser, Debug)]
struct EditArgs {
    /// Document to open (if it exists) and to save to with Ctrl+S.
    #[arg(long)]
    file: Option<PathBuf>,

    /// GIF written by the export key.
    #[arg(long)]
    gif: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OnionChoice {
    Off,
    Beneath,
    Above,
}

impl OnionChoice {
    fn placement(self) -> Option<flipbook::OnionPlacement> {
        match self {
            OnionChoice::Off => None,
            OnionChoice::Beneath => Some(flipbook::OnionPlacement::Beneath),
            OnionChoice::Above => Some(flipbook::OnionPlacement::Above),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = resolve_config(&cli)?;
    match cli.cmd {
        Command::New(args) => cmd_new(&cfg, args),
        Command::Info(args) => cmd_info(&cfg, args),
        Command::Frame(args) => cmd_frame(&cfg, args),
        Command::Export(args) => cmd_export(&cfg, args),
        Command::Edit(args) => cmd_edit(cfg, args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_config(cli: &Cli) -> anyhow::Result<flipbook::AnimatorConfig> {
    let mut cfg = match &cli.config {
        Some(path) => flipbook::AnimatorConfig::load(path)?,
        None => flipbook::AnimatorConfig::default(),
    };
    if let Some(w) = cli.width {
        cfg.canvas.width = w;
    }
    if let Some(h) = cli.height {
        cfg.canvas.height = h;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn read_stack(cfg: &flipbook::AnimatorConfig, path: &Path) -> anyhow::Result<flipbook::FrameStack> {
    flipbook::load_file(path, cfg.canvas)
        .with_context(|| format!("load frames '{}'", path.display()))
}

fn cmd_new(cfg: &flipbook::AnimatorConfig, args: NewArgs) -> anyhow::Result<()> {
    let mut stack = flipbook::FrameStack::new(cfg.canvas);
    for _ in 0..args.frames {
        stack.create_frame();
    }
    flipbook::save_file(&stack, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_info(cfg: &flipbook::AnimatorConfig, args: InfoArgs) -> anyhow::Result<()> {
    let stack = read_stack(cfg, &args.in_path)?;
    println!("frames: {}", stack.len());
    println!("canvas: {}x{}", cfg.canvas.width, cfg.canvas.height);
    Ok(())
}

fn cmd_frame(cfg: &flipbook::AnimatorConfig, args: FrameArgs) -> anyhow::Result<()> {
    let mut stack = read_stack(cfg, &args.in_path)?;
    if !stack.select(args.index) {
        anyhow::bail!(
            "frame {} out of range (document has {} frames)",
            args.index,
            stack.len()
        );
    }
    let img = flipbook::render_with(&stack, args.onion.placement())
        .context("no frame to render")?;

    flipbook::codec::ensure_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(cfg: &flipbook::AnimatorConfig, args: ExportArgs) -> anyhow::Result<()> {
    let stack = read_stack(cfg, &args.in_path)?;
    let mut export = cfg.export_config();
    if let Some(ms) = args.delay_ms {
        export.frame_delay = Duration::from_millis(ms);
    }

    if flipbook::export_animation_with(&stack, &args.out, &export)? {
        eprintln!("wrote {}", args.out.display());
    } else {
        eprintln!("nothing to export: document has no frames");
    }
    Ok(())
}

#[cfg(feature = "window")]
fn cmd_edit(cfg: flipbook::AnimatorConfig, args: EditArgs) -> anyhow::Result<()> {
    let session = match args.file.as_deref().filter(|p| p.exists()) {
        Some(path) => {
            let stack = read_stack(&cfg, path)?;
            flipbook::Session::with_stack(cfg, stack)
        }
        None => flipbook::Session::new(cfg),
    };
    let paths = flipbook::shell::ShellPaths {
        document: args.file,
        gif: args.gif,
    };
    flipbook::shell::run(session, paths)?;
    Ok(())
}

#[cfg(not(feature = "window"))]
fn cmd_edit(_cfg: flipbook::AnimatorConfig, _args: EditArgs) -> anyhow::Result<()> {
    anyhow::bail!("flipbook was built without the `window` feature; rebuild with --features window")
}
