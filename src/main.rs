mod anchors;
mod commands;
mod config;
mod diagnostics;
mod discover;
mod error;
mod fixer;
mod index;
mod info;
mod report;
mod resolver;
mod scanner;
mod types;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::commands::EXIT_ERROR;

#[derive(Parser)]
#[command(
    name = "doclinks",
    version,
    about = "Validate and repair relative links between markdown documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Scan root (overrides `root` in .doclinks.toml)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate relative links and anchors under the scan root
    Check {
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
        /// Only scan this subtree of the scan root
        path: Option<PathBuf>,
        /// Rewrite links that have exactly one candidate target
        #[arg(long)]
        write: bool,
    },
    /// Show a reference document: syntax, commands, config, current state
    Info {
        /// Emit as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check once, then re-check whenever a markdown file changes
    Watch {
        /// Emit each report as JSON
        #[arg(long)]
        json: bool,
        /// Only watch this subtree of the scan root
        path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let root = cli.root.as_deref();

    let result = match cli.command {
        Commands::Check { json, path, write } => {
            commands::check(root, path.as_deref(), write, json)
        },
        Commands::Info { json } => {
            commands::info(root, json);
            Ok(ExitCode::SUCCESS)
        },
        Commands::Watch { json, path } => watch::run(root, path.as_deref(), json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(EXIT_ERROR)
        },
    }
}
