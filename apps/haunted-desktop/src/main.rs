mod app;
mod ui;

use anyhow::{Context, Result};
use app::GpuApp;
use clap::Parser;
use haunted_panel::{ParameterPanel, parse_assignment};
use haunted_scene::{SceneContext, Viewport};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser)]
#[command(name = "haunted-desktop", about = "Haunted house scene with a live debug panel")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Initial window width in physical pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height in physical pixels
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Seed for grave placement; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Initial parameter override such as `fogNear=2` (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    tracing::info!("haunted-desktop starting");

    let seed = cli.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "grave layout seed");
    let viewport = Viewport {
        width: cli.width.max(1),
        height: cli.height.max(1),
    };
    let mut scene = SceneContext::build(&mut StdRng::seed_from_u64(seed), viewport);
    let mut panel = ParameterPanel::from_context(&scene);

    for assignment in &cli.overrides {
        let (id, value) = parse_assignment(assignment)
            .with_context(|| format!("invalid --set {assignment:?}"))?;
        panel.change(&mut scene, id, value)?;
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(scene, panel);
    event_loop.run_app(&mut app)?;

    match app.into_failure() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
