use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::{Config, FileValueStore, ValueStore};
use crate::ui::format_item_state;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("list", _)) => list(),
        Some(("clear", sub_matches)) => clear(sub_matches),
        _ => {
            println!("Use 'levelcheck store --help' for more information.");
            Ok(())
        }
    }
}

fn load() -> Result<FileValueStore> {
    let config = Config::load()?;
    let path = config.effective_store_path()?;
    FileValueStore::load(&path).with_context(|| format!("Failed to load value store {:?}", path))
}

fn list() -> Result<()> {
    let store = load()?;

    if store.items().is_empty() {
        println!("{}", "No stored counters.".yellow());
        println!("{}", format!("Store: {}", store.path().display()).dimmed());
        return Ok(());
    }

    for (key, state) in store.items().iter() {
        println!("{}", format_item_state(key, state));
    }
    println!();
    println!(
        "{}",
        format!("{} item(s) in {}", store.items().len(), store.path().display()).dimmed()
    );

    Ok(())
}

fn clear(matches: &ArgMatches) -> Result<()> {
    let mut store = load()?;
    let prefix = matches.get_one::<String>("prefix").map_or("", String::as_str);

    let removed = store.clear_prefix(prefix);
    store.save().context("Failed to save value store")?;

    if prefix.is_empty() {
        println!("{}", format!("✓ Removed all {} item(s)", removed).green());
    } else {
        println!(
            "{}",
            format!("✓ Removed {} item(s) starting with '{}'", removed, prefix).green()
        );
    }

    Ok(())
}
