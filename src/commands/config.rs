use crate::core::Config;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::Path;

pub fn handle_set(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("store", sub_matches)) => set_store_path(sub_matches),
        Some(("markers", sub_matches)) => set_markers(sub_matches),
        _ => {
            println!("Use 'levelcheck set --help' for more information.");
            Ok(())
        }
    }
}

fn set_store_path(matches: &clap::ArgMatches) -> Result<()> {
    let path = matches
        .get_one::<String>("path")
        .context("Path argument is required")?;

    let path_buf = Path::new(path);
    if path_buf.is_dir() {
        bail!("'{}' is a directory, expected a file path", path);
    }

    let absolute_path = if path_buf.is_absolute() {
        path.to_string()
    } else {
        std::env::current_dir()
            .context("Failed to resolve current directory")?
            .join(path_buf)
            .to_string_lossy()
            .to_string()
    };

    let mut config = Config::load()?;
    config.set_store_path(absolute_path.clone());
    config.save()?;

    println!("{} {}", "✓ Store path set to:".green(), absolute_path);

    Ok(())
}

fn set_markers(matches: &clap::ArgMatches) -> Result<()> {
    let enabled = match matches
        .get_one::<String>("state")
        .context("State argument is required")?
        .as_str()
    {
        "on" | "true" | "yes" => true,
        "off" | "false" | "no" => false,
        other => bail!("Expected 'on' or 'off', got '{}'", other),
    };

    let mut config = Config::load()?;
    config.set_state_markers(enabled);
    config.save()?;

    println!(
        "{} {}",
        "✓ State markers:".green(),
        if enabled { "on" } else { "off" }
    );

    Ok(())
}

pub fn handle_get(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("store", _)) => get_store_path(),
        Some(("markers", _)) => {
            let config = Config::load()?;
            println!("{}", if config.state_markers { "on" } else { "off" });
            Ok(())
        }
        _ => {
            println!("Use 'levelcheck get --help' for more information.");
            Ok(())
        }
    }
}

fn get_store_path() -> Result<()> {
    let config = Config::load()?;

    match config.get_store_path() {
        Some(path) => {
            println!("{}", "Store path:".white());
            println!("{}", path.cyan().bold());
        }
        None => {
            let default = config.effective_store_path()?;
            println!("{}", "No store path configured, using the default:".yellow());
            println!("{}", default.display().to_string().cyan().bold());
            println!();
            println!("{}", "To set a store path, run:".white());
            println!("  {}", "levelcheck set store <path>".cyan().bold());
        }
    }

    Ok(())
}
