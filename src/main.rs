mod cli;
mod logging;
mod prompt;
mod reporter;

use std::path::PathBuf;
use std::process;

use autotorrent_index::config::{self, AppConfig};
use autotorrent_index::{Indexer, RocksStore, Store};
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use colored::*;
use dotenv::dotenv;
use reporter::CliReporter;
use tracing::{error, info, warn};

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() -> CliResult {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let result = match args.command {
        Some(Commands::ScanPaths { full, paths }) => run_scan_paths(&config, full, paths),
        Some(Commands::ScanClients {
            full,
            fast,
            clients,
        }) => run_scan_clients(&config, full, fast, &clients),
        Some(Commands::Stats) => run_stats(&config),
        Some(Commands::PrintConfig) => {
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        Some(Commands::Truncate { files, client }) => run_truncate(&config, files, client),
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("Error: {}", err);
        process::exit(1);
    }

    Ok(())
}

fn open_indexer(config: &AppConfig) -> Result<Indexer<RocksStore>, Box<dyn std::error::Error>> {
    let store = RocksStore::open(&config.store_path)?;
    let indexer =
        Indexer::new(store, &config.ignore_patterns)?.with_reporter(CliReporter::new());
    Ok(indexer)
}

fn run_scan_paths(config: &AppConfig, full: bool, paths: Vec<PathBuf>) -> CliResult {
    let requested: Vec<String> = if paths.is_empty() {
        config.root_paths.clone()
    } else {
        paths
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    };
    if requested.is_empty() {
        warn!("No paths given and no root_paths configured, nothing to index");
        return Ok(());
    }

    let roots = config::non_overlapping_directories(requested);
    info!("Processing directories: {:?}", roots);

    let mut indexer = open_indexer(config)?;
    let summary = indexer.scan_paths(roots.as_slice(), full)?;

    info!(
        "{} files indexed, {} ignored, {} directories, {} unsplitable roots in {}",
        format!("{}", summary.stats.files_indexed).green(),
        format!("{}", summary.stats.files_ignored).yellow(),
        summary.stats.directories,
        format!("{}", summary.stats.unsplitable_roots).cyan(),
        format!("{:.2}s", summary.duration.as_secs_f64()).green(),
    );
    Ok(())
}

fn run_scan_clients(config: &AppConfig, full: bool, fast: bool, only: &[String]) -> CliResult {
    for name in only {
        if !config.clients.contains_key(name) {
            warn!("Client '{}' is not configured, skipping", name);
        }
    }

    let clients = config.open_clients(only)?;
    if clients.is_empty() {
        warn!("No clients to scan");
        return Ok(());
    }

    let mut indexer = open_indexer(config)?;
    let summary = indexer.scan_clients(&clients, full, fast)?;

    for (name, stats) in &summary.clients {
        info!(
            "{}: {} torrents, {} indexed, {} unchanged, {} fast-skipped, {} removed",
            name.cyan(),
            stats.torrents_seen,
            format!("{}", stats.torrents_indexed).green(),
            stats.skipped_unchanged,
            stats.skipped_fast,
            format!("{}", stats.torrents_removed).red(),
        );
    }
    info!(
        "Client scan finished in {}",
        format!("{:.2}s", summary.duration.as_secs_f64()).green()
    );
    Ok(())
}

fn run_stats(config: &AppConfig) -> CliResult {
    let store = RocksStore::open(&config.store_path)?;
    let stats = store.stats()?;
    println!("Files:             {}", format!("{}", stats.files).green());
    println!("Unsplitable roots: {}", format!("{}", stats.unsplitable_roots).cyan());
    println!("Torrents:          {}", format!("{}", stats.torrents).green());
    println!("Torrent paths:     {}", stats.torrent_paths);
    Ok(())
}

fn run_truncate(config: &AppConfig, files: bool, client: Option<String>) -> CliResult {
    if !files && client.is_none() {
        warn!("Nothing to truncate, pass --files and/or --client NAME");
        return Ok(());
    }

    let question = match (&client, files) {
        (Some(name), true) => format!("Delete ALL indexed files and torrents of client '{}'?", name),
        (Some(name), false) => format!("Delete ALL indexed torrents of client '{}'?", name),
        (None, _) => "Delete ALL indexed files?".to_string(),
    };
    if !prompt::prompt_confirm(&question, Some(false))? {
        return Ok(());
    }

    let mut store = RocksStore::open(&config.store_path)?;
    if files {
        store.truncate_files()?;
    }
    if let Some(name) = &client {
        store.truncate_torrent_files(name)?;
    }
    store.commit()?;
    info!("Truncated");
    Ok(())
}
