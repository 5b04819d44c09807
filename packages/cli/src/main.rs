mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    apply, compile, init, paginate, ApplyArgs, CompileArgs, InitArgs, PaginateArgs,
};
use tracing_subscriber::EnvFilter;

/// Covenant CLI - structured agreements, numbered and paginated
#[derive(Parser, Debug)]
#[command(name = "covenant")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new agreement from the default skeleton
    Init(InitArgs),

    /// Compile agreements to markup, print HTML or normalized JSON
    Compile(CompileArgs),

    /// Show how an agreement is split into pages
    Paginate(PaginateArgs),

    /// Apply a list of mutations to an agreement
    Apply(ApplyArgs),
}

fn main() {
    // Library logs go to stderr; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("covenant=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Compile(args) => compile(args, &cwd),
        Command::Paginate(args) => paginate(args, &cwd),
        Command::Apply(args) => apply(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
