mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vitae",
    about = "Profile statistics pipeline — aggregate contribution stats, render a template, publish the profile document",
    version,
    propagate_version = true
)]
struct Cli {
    /// Profile configuration file
    #[arg(long, global = true, env = "VITAE_CONFIG", default_value = "vitae.yaml")]
    config: PathBuf,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: aggregate, render, publish
    Run {
        /// Template file with {{placeholder}} markers
        #[arg(long, default_value = "profile.tmpl")]
        template: PathBuf,

        /// Render only; print the document instead of publishing it
        #[arg(long)]
        dry_run: bool,

        /// Commit message for the document write
        #[arg(long, default_value = "chore: update profile statistics")]
        message: String,

        /// Seconds to pause between aggregation chunks
        #[arg(long, default_value = "2")]
        pace: u64,
    },

    /// Show the date ranges the aggregators would query
    Chunks {
        /// Chunk granularity: month or year
        #[arg(long, default_value = "month")]
        granularity: String,

        /// Start of the window as YYYY-MM (default: coding_since from config)
        #[arg(long)]
        from: Option<String>,
    },

    /// Inspect the profile configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Run {
            template,
            dry_run,
            message,
            pace,
        } => cmd::run::run(&cli.config, &template, dry_run, &message, pace, cli.json),
        Commands::Chunks { granularity, from } => {
            cmd::chunks::run(&cli.config, &granularity, from.as_deref(), cli.json)
        }
        Commands::Config { subcommand } => cmd::config::run(&cli.config, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
