use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "autotorrent-index")]
#[command(about = "Index local files and torrent client sessions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Walk paths (or the configured root paths) into the index
    ScanPaths {
        /// Drop all indexed files before walking
        #[arg(long)]
        full: bool,
        paths: Vec<PathBuf>,
    },
    /// Reconcile the index with configured torrent clients
    ScanClients {
        /// Drop each client's torrents before scanning it
        #[arg(long)]
        full: bool,
        /// Skip torrents that are already indexed
        #[arg(long)]
        fast: bool,
        /// Only scan these clients
        #[arg(long = "client")]
        clients: Vec<String>,
    },
    /// Print row counts of the index
    Stats,
    /// Print configuration values
    PrintConfig,
    /// Remove indexed files and/or one client's torrents
    Truncate {
        #[arg(long)]
        files: bool,
        #[arg(long)]
        client: Option<String>,
    },
}
