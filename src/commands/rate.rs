//! `levelcheck rate` and `levelcheck average` - counters backed by the value store.

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::render;
use crate::core::{Config, FileValueStore, Rate, RateTracker};

fn open_store(config: &Config) -> Result<FileValueStore> {
    let path = config.effective_store_path()?;
    FileValueStore::load(&path).with_context(|| format!("Failed to load value store {:?}", path))
}

fn sample(matches: &ArgMatches) -> Result<(String, f64, f64)> {
    let key = matches
        .get_one::<String>("key")
        .context("Key argument is required")?
        .clone();
    let value = *matches
        .get_one::<f64>("value")
        .context("Value argument is required")?;
    let timestamp = matches
        .get_one::<f64>("timestamp")
        .copied()
        .unwrap_or_else(render::now);
    Ok((key, timestamp, value))
}

pub fn execute_rate(matches: &ArgMatches) -> Result<()> {
    let config = Config::load()?;
    let (key, timestamp, value) = sample(matches)?;
    let allow_wrap = !matches.get_flag("no-wrap");

    let mut store = open_store(&config)?;
    let outcome = RateTracker::new(&mut store).rate(&key, timestamp, value, allow_wrap);
    store.save().context("Failed to save value store")?;

    match outcome {
        Rate::Value(rate) => println!("{} {:.2}/s", format!("{}:", key).cyan(), rate),
        Rate::Unavailable(reason) => println!(
            "{} {}",
            format!("{}:", key).cyan(),
            format!("no data yet ({})", reason).yellow()
        ),
    }

    Ok(())
}

pub fn execute_average(matches: &ArgMatches) -> Result<()> {
    let config = Config::load()?;
    let (key, timestamp, value) = sample(matches)?;
    let backlog = matches
        .get_one::<f64>("backlog")
        .copied()
        .unwrap_or(config.average_backlog_minutes);

    let mut store = open_store(&config)?;
    let average = RateTracker::new(&mut store).average(&key, timestamp, value, backlog);
    store.save().context("Failed to save value store")?;

    println!(
        "{} {:.2} {}",
        format!("{}:", key).cyan(),
        average,
        format!("({} min average)", backlog).dimmed()
    );

    Ok(())
}
