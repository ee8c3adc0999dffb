//! Polyview - Platonic solid viewer
//!
//! Runs the interactive terminal viewer by default. `run` applies an action
//! script headlessly and `demo` prints a short tour of the transforms.
//! Controls (interactive):
//!   - 1-5: Switch solid
//!   - P/A: Perspective / axonometric projection
//!   - F G H J K L Z X C V B: Apply transform presets
//!   - R: Reset, Q/ESC: Quit

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use polyview_core::{
    parse_script, Outcome, Polyhedron, Preset, ProjectionConfig, ProjectionMode, Scene, SolidKind,
    Transform, Viewport,
};
use polyview_terminal::TerminalApp;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "polyview")]
#[command(about = "Platonic solid viewer with 3D transformations", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    view: ViewArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive terminal viewer
    View(ViewArgs),
    /// Apply an action script and print the resulting mesh
    Run {
        /// Script file, one action per line (`-` reads stdin)
        script: PathBuf,
        /// Also print projected screen coordinates
        #[arg(long)]
        project: bool,
        /// Viewport width used with --project
        #[arg(long, default_value_t = 1000)]
        width: u32,
        /// Viewport height used with --project
        #[arg(long, default_value_t = 700)]
        height: u32,
        #[command(flatten)]
        scene: SceneArgs,
    },
    /// Print vertex counts and a few sample transforms
    Demo,
}

#[derive(Args, Clone)]
struct ViewArgs {
    #[command(flatten)]
    scene: SceneArgs,
    /// Write log output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Args, Clone)]
struct SceneArgs {
    /// Starting solid
    #[arg(long, default_value = "tetrahedron")]
    solid: SolidKind,
    /// Starting projection
    #[arg(long, default_value = "axonometric")]
    projection: ProjectionMode,
    /// Eye distance for perspective projection
    #[arg(long, default_value_t = 5.0)]
    eye_distance: f64,
    /// Overall zoom factor
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

impl SceneArgs {
    fn scene(&self, x_stretch: f64) -> Scene {
        let config = ProjectionConfig {
            eye_distance: self.eye_distance,
            x_stretch,
            ..ProjectionConfig::default()
        }
        .zoomed(self.scale);
        Scene::new(self.solid, self.projection, config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::View(view)) => run_view(&view),
        Some(Commands::Run {
            script,
            project,
            width,
            height,
            scene,
        }) => {
            init_tracing(None)?;
            run_script(&script, &scene, project.then(|| Viewport::new(width, height)))
        }
        Some(Commands::Demo) => {
            init_tracing(None)?;
            run_demo()
        }
        None => run_view(&cli.view),
    }
}

/// Log to `log_file` if given, otherwise to stderr.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "polyview=info".into());

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
    Ok(())
}

fn run_view(view: &ViewArgs) -> Result<()> {
    // Nothing may reach the terminal while the alternate screen is up
    if let Some(path) = &view.log_file {
        init_tracing(Some(path.as_path()))?;
    }

    // Character cells are roughly twice as tall as they are wide
    let scene = view.scene.scene(2.0);
    let mut app = TerminalApp::new(scene).context("failed to initialise terminal")?;
    app.run().context("terminal viewer failed")?;

    println!("Thank you for using Polyview!");
    Ok(())
}

fn run_script(path: &Path, args: &SceneArgs, viewport: Option<Viewport>) -> Result<()> {
    let text = if path == Path::new("-") {
        io::read_to_string(io::stdin()).context("failed to read script from stdin")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?
    };
    let actions = parse_script(&text)?;

    let mut scene = args.scene(1.0);
    for action in &actions {
        let outcome = scene
            .handle(action)
            .with_context(|| format!("action `{action}` failed"))?;
        if outcome == Outcome::Quit {
            break;
        }
    }

    let polyhedron = scene.polyhedron();
    println!("{}", scene.summary());
    for (i, vertex) in polyhedron.vertices().iter().enumerate() {
        println!("  v{i:<2} {vertex}");
    }
    println!("Centroid: {}", polyhedron.centroid());

    if let Some(viewport) = viewport {
        println!(
            "Projection: {} ({}x{})",
            scene.mode(),
            viewport.width,
            viewport.height
        );
        let frame = scene.frame(viewport);
        for (i, (x, y)) in frame.vertices.iter().enumerate() {
            println!("  v{i:<2} ({x:.2}, {y:.2})");
        }
    }
    Ok(())
}

fn run_demo() -> Result<()> {
    for kind in SolidKind::ALL {
        let mut polyhedron = Polyhedron::from_kind(kind);
        println!(
            "{kind}: {} vertices, {} faces",
            polyhedron.vertices().len(),
            polyhedron.faces().len()
        );

        polyhedron.apply_transform(&Transform::rotation_x(45.0))?;
        polyhedron.apply_transform(&Transform::translation(0.5, 0.0, 0.0))?;
        println!("  after rotate-x 45, translate 0.5 0 0: centroid {}", polyhedron.centroid());
    }

    let preset = Preset::Composite;
    let matrix = preset.transform().matrix(&Polyhedron::tetrahedron())?;
    println!();
    print!("{}", Transform::format(&matrix, preset.label()));
    Ok(())
}
