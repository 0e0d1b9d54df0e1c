use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec2;
use tilewalk_common::Direction;
use tilewalk_input::{Command, Controls, Key, Outcome};
use tilewalk_kernel::{GameConfig, GameWorld, Scheduler, build_world};
use tilewalk_render::{AsciiMapRenderer, DebugTextRenderer, JsonRenderer, Renderer};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tilewalk-cli", about = "Headless driver for the tilewalk simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML game config; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info and the active config
    Info,
    /// Print the town as ASCII
    Map {
        /// Only the cells under the camera
        #[arg(long)]
        visible: bool,
    },
    /// Run frames through the scheduler with synthetic timestamps
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Frames per second used to space the timestamps
        #[arg(long, default_value = "60")]
        fps: f64,
        /// Hold a movement key for the whole run (up, down, left, right)
        #[arg(long)]
        hold: Option<Direction>,
        /// Click a screen point before the first frame, as X,Y
        #[arg(long, value_parser = parse_point)]
        click: Option<Vec2>,
        /// Print the final frame as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Walk up to Rex and talk to him
    Talk {
        /// How many lines to ask for
        #[arg(short, long, default_value = "3")]
        times: usize,
    },
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got `{s}`"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok(Vec2::new(x, y))
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GameConfig> {
    match path {
        Some(p) => GameConfig::load(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(GameConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("tilewalk-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("grid: {}", tilewalk_grid::crate_info());
            println!("kernel: {}", tilewalk_kernel::crate_info());
            println!("input: {}", tilewalk_input::crate_info());
            println!("render: {}", tilewalk_render::crate_info());
            println!("--- config ---");
            print!("{}", config.to_yaml()?);
        }
        Commands::Map { visible } => {
            let world = build_world(&config)?;
            let renderer = if visible {
                AsciiMapRenderer::visible()
            } else {
                AsciiMapRenderer::full()
            };
            print!("{}", renderer.render(&world));
        }
        Commands::Simulate {
            frames,
            fps,
            hold,
            click,
            json,
        } => {
            anyhow::ensure!(fps > 0.0, "fps must be positive, got {fps}");
            simulate(&config, frames, fps, hold, click, json)?;
        }
        Commands::Talk { times } => talk(&config, times)?,
    }

    Ok(())
}

fn simulate(
    config: &GameConfig,
    frames: u64,
    fps: f64,
    hold: Option<Direction>,
    click: Option<Vec2>,
    json: bool,
) -> anyhow::Result<()> {
    let mut world = build_world(config)?;
    let mut controls = Controls::new();
    if let Some(dir) = hold {
        controls.press(Key::from(dir));
    }
    if let Some(screen) = click {
        let outcome = controls.click(screen).apply(&mut world);
        println!("click at ({}, {}): {}", screen.x, screen.y, describe(&outcome));
    }

    let frame_ms = 1000.0 / fps;
    let mut scheduler = Scheduler::new();
    scheduler.start(0.0);
    let mut last = None;
    let mut events = world.drain_events().len();
    for n in 1..=frames {
        if let Some(cmd) = controls.frame_command(&world, (frame_ms / 1000.0) as f32) {
            if let Outcome::Refused(err) = cmd.apply(&mut world) {
                tracing::debug!(frame = n, %err, "held key refused");
            }
        }
        last = scheduler.tick(n as f64 * frame_ms, &mut world, |w: &GameWorld| {
            if json {
                JsonRenderer.render(w).map_err(anyhow::Error::from)
            } else {
                Ok(DebugTextRenderer::new().render(w))
            }
        });
        for event in world.drain_events() {
            tracing::debug!(frame = n, ?event, "world event");
            events += 1;
        }
    }
    scheduler.stop();

    if let Some(frame) = last {
        print!("{}", frame?);
        if json {
            println!();
        }
    }
    let stats = scheduler.stats();
    println!(
        "frames={} avg_dt={:.4}s min_dt={:.4}s max_dt={:.4}s events={}",
        scheduler.frames(),
        stats.average(),
        stats.min(),
        stats.max(),
        events
    );
    Ok(())
}

fn talk(config: &GameConfig, times: usize) -> anyhow::Result<()> {
    let mut world = build_world(config)?;
    let rex = world
        .entities()
        .iter()
        .find(|e| !e.is_player())
        .map(|e| e.position())
        .context("no NPC in the world")?;
    let player = world.player().context("no player in the world")?.position();

    // Stop with the interaction point on Rex's anchor.
    let gap = rex.x - player.x - world.reach();
    let direction = if gap >= 0.0 { Direction::Right } else { Direction::Left };
    world.request_move(direction, gap.abs())?;
    while world.player().is_some_and(|p| p.is_moving()) {
        world.update(0.1);
    }

    for _ in 0..times {
        match Command::Interact.apply(&mut world) {
            Outcome::Interacted(i) => {
                println!("{}: {}", i.label, i.message.as_deref().unwrap_or("..."));
            }
            other => {
                println!("{}", describe(&other));
                break;
            }
        }
    }
    Ok(())
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Moving(p) => format!("moving to ({:.1}, {:.1})", p.x, p.y),
        Outcome::Interacted(i) => match &i.message {
            Some(m) => format!("{} ({}): {m}", i.label, i.kind),
            None => format!("{} ({})", i.label, i.kind),
        },
        Outcome::Nothing => "nothing here".to_string(),
        Outcome::Refused(err) => format!("refused: {err}"),
    }
}
