use std::path::Path;

/// Receives indexing events as they happen.
///
/// The CLI implements this with indicatif spinners; library callers that don't
/// care use `SilentReporter`. All methods have default no-op implementations.
pub trait IndexReporter {
    fn on_path_scan_start(&self, _root: &Path) {}
    fn on_directory_scanned(&self, _directory: &Path, _files_indexed: usize) {}
    fn on_unsplitable_root(&self, _root: &Path) {}
    fn on_path_scan_complete(&self, _files_indexed: usize, _duration_secs: f64) {}
    fn on_client_scan_start(&self, _client_name: &str, _torrents: usize) {}
    fn on_torrent_indexed(&self, _client_name: &str, _infohash: &str, _paths: usize) {}
    fn on_batch_flushed(&self, _client_name: &str, _records: usize) {}
    fn on_client_scan_complete(&self, _client_name: &str, _indexed: usize, _removed: usize) {}
}

/// No-op reporter for silent operation.
pub struct SilentReporter;

impl IndexReporter for SilentReporter {}
