#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Maze Chase sessions.

mod config;
mod intent_script;
mod session;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use maze_chase_core::{ClydeMode, ReflectionAnchor, SessionConfig};
use maze_chase_rendering::{Palette, Presentation, RenderingBackend};
use maze_chase_rendering_macroquad::MacroquadBackend;
use maze_chase_system_orchestrator::{Orchestrator, TickOutcome};
use maze_chase_world::{Board, Layout, World};

use crate::{intent_script::IntentScript, session::Session};

const WINDOW_TITLE: &str = "Maze Chase";

/// Command-line arguments accepted by the binary.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", version, about = "Maze chase simulation")]
struct CliArgs {
    /// TOML file with session settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Layout file replacing the built-in maze.
    #[arg(long, value_name = "PATH")]
    layout: Option<PathBuf>,
    /// Whether Clyde joins the session.
    #[arg(long, value_enum)]
    clyde: Option<ClydeArg>,
    /// Point Inky reflects its aim through.
    #[arg(long = "inky-anchor", value_enum)]
    inky_anchor: Option<AnchorArg>,
    /// Runs without opening a window and prints a summary.
    #[arg(long)]
    headless: bool,
    /// Number of ticks simulated by a headless run.
    #[arg(long, default_value_t = 3600, value_name = "N")]
    ticks: u64,
    /// Scripted intents such as `0:down,30:right`.
    #[arg(long = "intent-script", value_name = "SCRIPT")]
    intent_script: Option<String>,
    /// Synchronises frames with the display refresh rate.
    #[arg(long, action = ArgAction::Set, default_value_t = true, value_name = "BOOL")]
    vsync: bool,
    /// Logs the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
    /// Prints the active layout in its text format and exits.
    #[arg(long)]
    export_layout: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ClydeArg {
    Absent,
    Idle,
}

impl From<ClydeArg> for ClydeMode {
    fn from(value: ClydeArg) -> Self {
        match value {
            ClydeArg::Absent => ClydeMode::Absent,
            ClydeArg::Idle => ClydeMode::Idle,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AnchorArg {
    Tile,
    Pixel,
}

impl From<AnchorArg> for ReflectionAnchor {
    fn from(value: AnchorArg) -> Self {
        match value {
            AnchorArg::Tile => ReflectionAnchor::Tile,
            AnchorArg::Pixel => ReflectionAnchor::Pixel,
        }
    }
}

impl CliArgs {
    fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => config::load(path)?,
            None => SessionConfig::default(),
        };
        if let Some(clyde) = self.clyde {
            config.clyde = clyde.into();
        }
        if let Some(anchor) = self.inky_anchor {
            config.inky_anchor = anchor.into();
        }
        Ok(config)
    }

    fn layout(&self) -> Result<Layout> {
        let Some(path) = &self.layout else {
            return Ok(Layout::classic());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read layout file {}", path.display()))?;
        Layout::parse(&text).with_context(|| format!("layout file {} is invalid", path.display()))
    }

    fn intent_script(&self) -> Result<IntentScript> {
        let Some(text) = &self.intent_script else {
            return Ok(IntentScript::default());
        };
        IntentScript::parse(text).context("invalid --intent-script")
    }
}

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let layout = args.layout()?;
    if args.export_layout {
        print!("{}", layout.encode());
        return Ok(());
    }

    let config = args.session_config()?;
    let script = args.intent_script()?;
    log::info!(
        "starting session: clyde {:?}, inky anchor {:?}, {} scripted intents",
        config.clyde,
        config.inky_anchor,
        script.len()
    );

    let world = World::with_board(Board::from_layout(&layout), config);
    let mut session = Session::new(world, Orchestrator::new(config.timing), script);

    if args.headless {
        let summary = session.run_headless(args.ticks);
        log::info!("headless run finished after {} ticks", summary.ticks);
        print!(
            "{}",
            toml::to_string(&summary).context("failed to encode run summary")?
        );
        return Ok(());
    }

    let presentation = Presentation::new(WINDOW_TITLE, Palette::default(), session.capture_scene());
    MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .run(presentation, move |_frame_dt, input, scene| {
            match session.present_frame(input, scene) {
                TickOutcome::Continue => {}
                TickOutcome::Ended => {
                    log::info!("session ended after {} ticks", scene.tick);
                }
            }
        })
        .context("rendering backend failed")
}
