use ahash::AHashSet;
use std::path::Path;
use tracing::{debug, trace};

use super::queue::InsertQueue;
use crate::client::{TorrentClient, TorrentFile};
use crate::error::Result;
use crate::progress::IndexReporter;
use crate::storage::{Store, TorrentFiles};
use crate::utils::resolve_alias;

/// Counters for a single client pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClientScanStats {
    pub torrents_seen: usize,
    pub torrents_indexed: usize,
    pub skipped_fast: usize,
    pub skipped_unchanged: usize,
    pub torrents_removed: usize,
}

/// Brings the store's torrent records for one client in line with what the client reports.
pub struct ClientScanner<'a, S: ?Sized> {
    store: &'a mut S,
    reporter: &'a dyn IndexReporter,
}

impl<'a, S: Store + ?Sized> ClientScanner<'a, S> {
    pub fn new(store: &'a mut S, reporter: &'a dyn IndexReporter) -> Self {
        Self { store, reporter }
    }

    /// Index new and moved torrents, then drop records the client no longer holds.
    ///
    /// With `fast_scan`, a torrent that already has a stored download path is
    /// trusted as-is and the client is not asked about it at all.
    pub fn scan_client<C: TorrentClient + ?Sized>(
        &mut self,
        client_name: &str,
        client: &C,
        fast_scan: bool,
    ) -> Result<ClientScanStats> {
        let torrents = client.list()?;
        let mut stats = ClientScanStats {
            torrents_seen: torrents.len(),
            ..Default::default()
        };
        self.reporter.on_client_scan_start(client_name, torrents.len());

        let mut queue = InsertQueue::new(client_name);
        for torrent in &torrents {
            let stored = self
                .store
                .get_torrent_file_info(client_name, &torrent.infohash)?;

            if fast_scan && stored.is_some() {
                trace!(
                    "torrent:{} client:{} Skip indexing, already indexed and fast scan is enabled",
                    torrent.infohash,
                    client_name
                );
                stats.skipped_fast += 1;
                continue;
            }

            let download_path = client.get_download_path(&torrent.infohash)?;
            let download_path_str = download_path.to_string_lossy().into_owned();
            if stored.is_some_and(|info| info.download_path == download_path_str) {
                trace!(
                    "torrent:{} client:{} Skip indexing, download path not changed",
                    torrent.infohash,
                    client_name
                );
                stats.skipped_unchanged += 1;
                continue;
            }

            let files = client.get_files(&torrent.infohash)?;
            if files.is_empty() {
                debug!(
                    "torrent:{} client:{} No files reported, recording empty file list",
                    torrent.infohash, client_name
                );
            }
            let paths = torrent_paths(&download_path, &files);

            self.reporter
                .on_torrent_indexed(client_name, &torrent.infohash, paths.len());
            queue.push(
                &mut *self.store,
                self.reporter,
                TorrentFiles {
                    infohash: torrent.infohash.clone(),
                    name: torrent.name.clone(),
                    download_path: download_path_str,
                    paths,
                },
            )?;
        }
        stats.torrents_indexed = queue.finish(&mut *self.store, self.reporter)?;

        let live: AHashSet<String> = torrents.into_iter().map(|t| t.infohash).collect();
        stats.torrents_removed = self
            .store
            .remove_non_existing_infohashes(client_name, &live)?;

        self.reporter.on_client_scan_complete(
            client_name,
            stats.torrents_indexed,
            stats.torrents_removed,
        );
        Ok(stats)
    }
}

/// Absolute `(path, size)` entries for a torrent's files.
///
/// A file whose resolved location differs from the joined path gets a second
/// entry for the resolved path with the same size.
pub fn torrent_paths(download_path: &Path, files: &[TorrentFile]) -> Vec<(String, u64)> {
    let mut paths = Vec::with_capacity(files.len());
    for file in files {
        let file_path = download_path.join(&file.path);
        paths.push((file_path.to_string_lossy().into_owned(), file.size));

        let resolved = resolve_alias(&file_path);
        if resolved != file_path {
            paths.push((resolved.to_string_lossy().into_owned(), file.size));
        }
    }
    paths
}
