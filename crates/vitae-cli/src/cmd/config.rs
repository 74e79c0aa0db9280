use crate::output::print_json;
use anyhow::Context;
use chrono::Utc;
use clap::Subcommand;
use std::path::Path;
use vitae_core::config::{Config, WarnLevel};

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the parsed configuration
    Show,

    /// Validate the config for common mistakes
    Validate,
}

pub fn run(config_path: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load(config_path).context("failed to load config")?;
    match subcmd {
        ConfigSubcommand::Show => show(&cfg, json),
        ConfigSubcommand::Validate => validate(&cfg, json),
    }
}

fn show(cfg: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(cfg);
    }
    print!("{}", serde_yaml::to_string(cfg)?);
    Ok(())
}

fn validate(cfg: &Config, json: bool) -> anyhow::Result<()> {
    let warnings = cfg.validate(Utc::now().date_naive());

    if json {
        print_json(&warnings)?;
    } else if warnings.is_empty() {
        println!("config ok");
    } else {
        for w in &warnings {
            let level = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("{level}: {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("configuration has errors");
    }
    Ok(())
}
