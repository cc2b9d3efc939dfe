pub mod client;
pub mod config;
pub mod error;
pub mod heuristic;
pub mod indexer;
pub mod progress;
pub mod scanner;
pub mod storage;
pub mod utils;

pub use crate::config::AppConfig;
pub use error::{Error, Result};
pub use heuristic::{SceneReleaseHeuristic, UnsplitableHeuristic};
pub use indexer::{ClientScanSummary, Indexer, PathScanSummary};
pub use progress::{IndexReporter, SilentReporter};
pub use storage::{RocksStore, Store};
