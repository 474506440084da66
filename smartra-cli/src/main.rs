//! smartra CLI - knitting community backend
//!
//! Entry point for:
//! - Running the HTTP API server (`serve`)
//! - Offline yarn estimates (`estimate`)
//! - Inspecting configuration (`config`)

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "smartra",
    author,
    version,
    about = "Backend for a knitting community: patterns, posts, and a yarn calculator"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Estimate yarn for a project and print it as JSON
    Estimate(commands::estimate::EstimateArgs),
    /// Inspect smartra configuration (path, show)
    Config(commands::config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

fn run_completions(args: CompletionsArgs) {
    use clap_complete::{generate, shells};

    let mut cmd = Cli::command();
    let mut stdout = std::io::stdout();
    match args.shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, "smartra", &mut stdout),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, "smartra", &mut stdout),
        Shell::Fish => generate(shells::Fish, &mut cmd, "smartra", &mut stdout),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, "smartra", &mut stdout),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Estimate(args) => commands::run_estimate(args)?,
        Commands::Config(args) => commands::run_config(args)?,
        Commands::Completions(args) => run_completions(args),
    }
    Ok(())
}
