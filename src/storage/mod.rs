pub mod models;
pub mod rocks;

use ahash::AHashSet;
use std::path::Path;
use thiserror::Error;

pub use models::{IndexStats, TorrentFileInfo, TorrentFiles};
pub use rocks::RocksStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("RocksDB error: {0}")]
    Rocks(#[from] rocksdb::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("Missing column family '{0}'")]
    MissingColumnFamily(&'static str),

    #[error("Corrupt key in '{0}'")]
    CorruptKey(&'static str),
}

/// The durable index the scanners write into.
///
/// Writes are visible to later reads immediately; `commit` is the point after
/// which they survive a crash.
pub trait Store {
    /// Drop every file record and unsplitable root.
    fn truncate_files(&mut self) -> Result<(), StoreError>;

    /// Drop every torrent record belonging to `client_name`.
    fn truncate_torrent_files(&mut self, client_name: &str) -> Result<(), StoreError>;

    fn insert_file_path(&mut self, path: &Path) -> Result<(), StoreError>;

    fn mark_unsplitable_root(&mut self, path: &Path) -> Result<(), StoreError>;

    fn get_torrent_file_info(
        &self,
        client_name: &str,
        infohash: &str,
    ) -> Result<Option<TorrentFileInfo>, StoreError>;

    /// Insert or replace one record per infohash.
    fn insert_torrent_files_paths(
        &mut self,
        client_name: &str,
        batch: &[TorrentFiles],
    ) -> Result<(), StoreError>;

    /// Delete every record of `client_name` whose infohash is not in `live_infohashes`.
    /// Returns how many records were removed.
    fn remove_non_existing_infohashes(
        &mut self,
        client_name: &str,
        live_infohashes: &AHashSet<String>,
    ) -> Result<usize, StoreError>;

    fn commit(&mut self) -> Result<(), StoreError>;

    fn file_paths(&self) -> Result<Vec<String>, StoreError>;

    fn unsplitable_roots(&self) -> Result<Vec<String>, StoreError>;

    fn torrent_files(&self, client_name: &str) -> Result<Vec<TorrentFiles>, StoreError>;

    fn stats(&self) -> Result<IndexStats, StoreError>;
}
