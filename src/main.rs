//! Entry point: a headless container probe.
//!
//! The GUI shell and the audio backend connect to the controller through the
//! library crate; this binary exercises the ingestion path on its own:
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Sniff the container, read its chapter table, and print the result.

use anyhow::{Context, Result, anyhow};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

use m4b_player::chapters::ChapterTable;
use m4b_player::config::load_config;
use m4b_player::container::{is_chaptered_container, read_chapter_table};
use m4b_player::time_utils::format_clock;

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let path = parse_args()?;
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(path = %path.display(), level = %config.log_level, "Probing container");

    if !is_chaptered_container(&path) {
        println!(
            "{}: no MP4 signature, would play as plain media",
            path.display()
        );
        return Ok(());
    }
    let entries = read_chapter_table(&path)
        .with_context(|| format!("Failed to read chapters from {}", path.display()))?;
    if entries.is_empty() {
        println!("{}: MP4 container without chapters", path.display());
        return Ok(());
    }
    let table = ChapterTable::build(entries);
    println!("{}: {} chapters", path.display(), table.len());
    for chapter in table.iter() {
        println!(
            "{:>4}  {:>9}  {:>9}  {}",
            chapter.number,
            format_clock(chapter.start),
            format_clock(chapter.length()),
            chapter.title
        );
    }
    println!("total {}", format_clock(table.total_length()));
    Ok(())
}

fn parse_args() -> Result<PathBuf> {
    let mut args = env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| anyhow!("Usage: m4b-player <path-to-media>"))?;

    let path = PathBuf::from(path);
    if !path.exists() {
        return Err(anyhow!("File not found: {}", path.display()));
    }
    Ok(path)
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_filter(filter_layer))
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    }
}
