use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use scrollscene::{
    FixedClock, FramePump, Page, RecordingBackend, Session, SessionOptions, Viewport,
};

#[derive(Parser, Debug)]
#[command(name = "scrollscene", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a page headless and dump one snapshot of the final frame.
    Snapshot(SnapshotArgs),
    /// Run a page headless and dump every recorded frame.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct SnapshotArgs {
    /// Input page JSON.
    #[arg(long = "page")]
    page_path: PathBuf,

    /// Frames to run before capturing.
    #[arg(long, default_value_t = 1)]
    frames: u64,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input page JSON.
    #[arg(long = "page")]
    page_path: PathBuf,

    /// Frames to run.
    #[arg(long, default_value_t = 60)]
    frames: u64,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Click this element before the first frame.
    #[arg(long)]
    click: Option<String>,

    /// Apply this scroll delta before the first frame.
    #[arg(long)]
    scroll: Option<f64>,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Snapshot(args) => cmd_snapshot(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn read_page_json(path: &Path) -> anyhow::Result<Page> {
    let f = File::open(path).with_context(|| format!("open page '{}'", path.display()))?;
    let r = BufReader::new(f);
    let page: Page = serde_json::from_reader(r).with_context(|| "parse page JSON")?;
    Ok(page)
}

fn build_session(page_path: &Path, width: f64, height: f64) -> anyhow::Result<Session> {
    let page = read_page_json(page_path)?;
    let viewport = Viewport::new(width, height)?;
    let mut opts = SessionOptions::new(viewport);
    if let Some(root) = page_path.parent() {
        opts.assets_root = root.to_path_buf();
    }
    Ok(Session::new(page, opts)?)
}

fn write_json(out: Option<&Path>, value: &impl serde::Serialize) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize snapshot JSON")?;
    match out {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("write snapshot '{}'", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_snapshot(args: SnapshotArgs) -> anyhow::Result<()> {
    let mut session = build_session(&args.page_path, args.width, args.height)?;
    let mut backend = RecordingBackend::new();
    let mut clock = FixedClock::new(1.0 / 60.0);
    let mut pump = FramePump::new();
    pump.run_frames(&mut session, &mut backend, &mut clock, args.frames.max(1))?;

    let last = backend
        .last()
        .context("no frame recorded")?;
    write_json(args.out.as_deref(), last)
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut session = build_session(&args.page_path, args.width, args.height)?;

    if let Some(delta) = args.scroll {
        session.scroll_by(delta);
    }
    if let Some(element) = &args.click {
        anyhow::ensure!(
            session.click(element),
            "element '{element}' is not a tracked image"
        );
    }

    let mut backend = RecordingBackend::new();
    let mut clock = FixedClock::new(1.0 / 60.0);
    let mut pump = FramePump::new();
    pump.run_frames(&mut session, &mut backend, &mut clock, args.frames)?;

    write_json(args.out.as_deref(), &backend.into_frames())
}
