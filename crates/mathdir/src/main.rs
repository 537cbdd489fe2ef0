//! mathdir CLI - Directional math notation renderer.
//!
//! Provides commands for:
//! - `render`: Render one equation as HTML, JSON or a stored value
//! - `convert`: Re-materialize every unit of a saved HTML document
//! - `inspect`: List the units of a saved HTML document
//! - `templates`: List the equation palette

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ConvertArgs, InspectArgs, RenderArgs, TemplatesArgs};
use output::Output;

/// mathdir - Directional math notation renderer.
#[derive(Parser)]
#[command(name = "mathdir", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover mathdir.toml).
    #[arg(short, long, global = true, env = "MATHDIR_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a single equation.
    Render(RenderArgs),
    /// Re-materialize the equations of a saved HTML document.
    Convert(ConvertArgs),
    /// List the equations of a saved HTML document.
    Inspect(InspectArgs),
    /// List equation templates.
    Templates(TemplatesArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Render(args) => args.execute(config),
        Commands::Convert(args) => args.execute(config),
        Commands::Inspect(args) => args.execute(config),
        Commands::Templates(args) => args.execute(config),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
