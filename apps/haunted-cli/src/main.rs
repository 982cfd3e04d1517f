use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use haunted_panel::{ControlSpec, ParameterPanel, parse_assignment};
use haunted_render::DebugTextRenderer;
use haunted_runtime::{ManualClock, RenderLoop};
use haunted_scene::{Node, NodeKind, Scene, SceneContext, Viewport};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "haunted-cli", about = "Headless tools for the haunted house scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List panel controls with their bounds and initial values
    Params,
    /// Dump every scene node
    Scene {
        /// Seed for grave placement
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
    /// Run the render loop against the text renderer on a manual clock
    Simulate {
        /// Number of frames to draw
        #[arg(short, long, default_value = "10")]
        frames: u64,
        /// Simulated frame rate
        #[arg(long, default_value = "60")]
        fps: f32,
        /// Seed for grave placement
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Parameter override such as `fogNear=2` (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,
        /// Print the full text frame after the last iteration
        #[arg(long)]
        dump: bool,
    },
}

fn build(seed: u64) -> SceneContext {
    SceneContext::build(&mut StdRng::seed_from_u64(seed), Viewport::default())
}

fn describe_node(scene: &Scene, node: &Node) -> String {
    let kind = match &node.kind {
        NodeKind::Group => "group".to_string(),
        NodeKind::Mesh { geometry, material } => format!("mesh {geometry:?} {}", material.color),
        NodeKind::Light(light) => {
            format!("light {:?} {} x{:.2}", light.kind, light.color, light.intensity)
        }
    };
    let parent = node
        .parent
        .and_then(|p| scene.get(p))
        .map(|p| p.name.as_str())
        .unwrap_or("-");
    let p = node.transform.position;
    format!(
        "{:<12} parent={:<8} pos=({:.2}, {:.2}, {:.2}) {kind}",
        node.name, parent, p.x, p.y, p.z
    )
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Params => {
            let ctx = build(0);
            let panel = ParameterPanel::from_context(&ctx);
            for control in panel.controls() {
                let bounds = match control.spec() {
                    ControlSpec::Range { min, max, step } => {
                        format!("range [{min}, {max}] step {step}")
                    }
                    ControlSpec::Color => "color".to_string(),
                };
                println!(
                    "{:<18} {:<22} {:<14} {:<28} = {}",
                    control.id.key(),
                    control.label(),
                    control.id.folder().title(),
                    bounds,
                    control.value
                );
            }
        }
        Commands::Scene { seed } => {
            let ctx = build(seed);
            let scene = &ctx.scene;
            println!("seed={seed} nodes={}", scene.node_count());
            println!(
                "background={} fog={} near={} far={}",
                scene.background, scene.fog.color, scene.fog.near, scene.fog.far
            );
            for (id, node) in scene.nodes() {
                println!("[{id}] {}", describe_node(scene, node));
            }
        }
        Commands::Simulate {
            frames,
            fps,
            seed,
            overrides,
            dump,
        } => {
            if fps.is_nan() || fps <= 0.0 {
                bail!("--fps must be positive, got {fps}");
            }
            tracing::info!(frames, fps, seed, "simulating");
            let mut ctx = build(seed);
            let mut panel = ParameterPanel::from_context(&ctx);
            for assignment in &overrides {
                let (id, value) = parse_assignment(assignment)
                    .with_context(|| format!("invalid --set {assignment:?}"))?;
                panel.change(&mut ctx, id, value)?;
            }

            let clock = ManualClock::new();
            let mut render_loop = RenderLoop::new(&clock);
            let mut target = DebugTextRenderer::new(ctx.viewport.width, ctx.viewport.height);
            for _ in 0..frames {
                clock.advance(1.0 / f64::from(fps));
                let info = render_loop.iterate(&mut ctx, &mut target)?;
                let [g1, g2, g3] = info.ghosts;
                println!(
                    "frame {:>4} t={:>7.3} ghost1=({:.2}, {:.2}, {:.2}) ghost2=({:.2}, {:.2}, {:.2}) ghost3=({:.2}, {:.2}, {:.2})",
                    info.frame, info.elapsed, g1.x, g1.y, g1.z, g2.x, g2.y, g2.z, g3.x, g3.y, g3.z
                );
            }
            render_loop.stop();
            println!(
                "drew {} frames, average {:.1} fps",
                render_loop.frame_count(),
                render_loop.timer().fps()
            );
            if dump {
                print!("{}", target.last_frame());
            }
        }
    }

    Ok(())
}
