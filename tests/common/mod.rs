#![allow(dead_code)]

use ahash::AHashSet;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use autotorrent_index::client::{ClientError, TorrentClient, TorrentFile, TorrentListing};
use autotorrent_index::storage::{IndexStats, StoreError, TorrentFileInfo, TorrentFiles};
use autotorrent_index::{RocksStore, Store};
use tempfile::TempDir;

/// A RocksDB store that also counts the calls the scanners make.
pub struct RecordingStore {
    inner: RocksStore,
    _dir: TempDir,
    pub batch_inserts: Vec<usize>,
    pub unsplitable_writes: Vec<PathBuf>,
    pub commits: usize,
    pub truncated_clients: Vec<String>,
}

impl RecordingStore {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let inner = RocksStore::open(dir.path().join("index")).unwrap();
        Self {
            inner,
            _dir: dir,
            batch_inserts: Vec::new(),
            unsplitable_writes: Vec::new(),
            commits: 0,
            truncated_clients: Vec::new(),
        }
    }

    pub fn sorted_file_paths(&self) -> Vec<String> {
        let mut paths = self.inner.file_paths().unwrap();
        paths.sort();
        paths
    }

    pub fn sorted_infohashes(&self, client_name: &str) -> Vec<String> {
        let mut hashes: Vec<String> = self
            .inner
            .torrent_files(client_name)
            .unwrap()
            .into_iter()
            .map(|t| t.infohash)
            .collect();
        hashes.sort();
        hashes
    }

    pub fn record(&self, client_name: &str, infohash: &str) -> Option<TorrentFiles> {
        self.inner
            .torrent_files(client_name)
            .unwrap()
            .into_iter()
            .find(|t| t.infohash == infohash)
    }
}

impl Store for RecordingStore {
    fn truncate_files(&mut self) -> Result<(), StoreError> {
        self.inner.truncate_files()
    }

    fn truncate_torrent_files(&mut self, client_name: &str) -> Result<(), StoreError> {
        self.truncated_clients.push(client_name.to_string());
        self.inner.truncate_torrent_files(client_name)
    }

    fn insert_file_path(&mut self, path: &Path) -> Result<(), StoreError> {
        self.inner.insert_file_path(path)
    }

    fn mark_unsplitable_root(&mut self, path: &Path) -> Result<(), StoreError> {
        self.unsplitable_writes.push(path.to_path_buf());
        self.inner.mark_unsplitable_root(path)
    }

    fn get_torrent_file_info(
        &self,
        client_name: &str,
        infohash: &str,
    ) -> Result<Option<TorrentFileInfo>, StoreError> {
        self.inner.get_torrent_file_info(client_name, infohash)
    }

    fn insert_torrent_files_paths(
        &mut self,
        client_name: &str,
        batch: &[TorrentFiles],
    ) -> Result<(), StoreError> {
        self.batch_inserts.push(batch.len());
        self.inner.insert_torrent_files_paths(client_name, batch)
    }

    fn remove_non_existing_infohashes(
        &mut self,
        client_name: &str,
        live_infohashes: &AHashSet<String>,
    ) -> Result<usize, StoreError> {
        self.inner
            .remove_non_existing_infohashes(client_name, live_infohashes)
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.commits += 1;
        self.inner.commit()
    }

    fn file_paths(&self) -> Result<Vec<String>, StoreError> {
        self.inner.file_paths()
    }

    fn unsplitable_roots(&self) -> Result<Vec<String>, StoreError> {
        self.inner.unsplitable_roots()
    }

    fn torrent_files(&self, client_name: &str) -> Result<Vec<TorrentFiles>, StoreError> {
        self.inner.torrent_files(client_name)
    }

    fn stats(&self) -> Result<IndexStats, StoreError> {
        self.inner.stats()
    }
}

pub struct FakeTorrent {
    pub name: String,
    pub download_path: PathBuf,
    pub files: Vec<TorrentFile>,
}

/// An in-memory client that counts per-torrent lookups.
#[derive(Default)]
pub struct FakeClient {
    order: Vec<String>,
    torrents: BTreeMap<String, FakeTorrent>,
    pub list_calls: Cell<usize>,
    pub download_path_calls: RefCell<Vec<String>>,
    pub files_calls: RefCell<Vec<String>>,
    pub fail_files_for: Option<String>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_torrent(
        mut self,
        infohash: &str,
        name: &str,
        download_path: impl Into<PathBuf>,
        files: &[(&str, u64)],
    ) -> Self {
        self.add_torrent(infohash, name, download_path, files);
        self
    }

    pub fn add_torrent(
        &mut self,
        infohash: &str,
        name: &str,
        download_path: impl Into<PathBuf>,
        files: &[(&str, u64)],
    ) {
        if !self.torrents.contains_key(infohash) {
            self.order.push(infohash.to_string());
        }
        self.torrents.insert(
            infohash.to_string(),
            FakeTorrent {
                name: name.to_string(),
                download_path: download_path.into(),
                files: files
                    .iter()
                    .map(|(path, size)| TorrentFile {
                        path: PathBuf::from(path),
                        size: *size,
                    })
                    .collect(),
            },
        );
    }

    pub fn remove_torrent(&mut self, infohash: &str) {
        self.order.retain(|h| h != infohash);
        self.torrents.remove(infohash);
    }

    pub fn set_download_path(&mut self, infohash: &str, download_path: impl Into<PathBuf>) {
        if let Some(torrent) = self.torrents.get_mut(infohash) {
            torrent.download_path = download_path.into();
        }
    }

    pub fn reset_calls(&self) {
        self.list_calls.set(0);
        self.download_path_calls.borrow_mut().clear();
        self.files_calls.borrow_mut().clear();
    }

    fn torrent(&self, infohash: &str) -> Result<&FakeTorrent, ClientError> {
        self.torrents
            .get(infohash)
            .ok_or_else(|| ClientError::UnknownTorrent(infohash.to_string()))
    }
}

impl TorrentClient for FakeClient {
    fn list(&self) -> Result<Vec<TorrentListing>, ClientError> {
        self.list_calls.set(self.list_calls.get() + 1);
        Ok(self
            .order
            .iter()
            .map(|infohash| TorrentListing {
                infohash: infohash.clone(),
                name: self.torrents[infohash].name.clone(),
            })
            .collect())
    }

    fn get_download_path(&self, infohash: &str) -> Result<PathBuf, ClientError> {
        self.download_path_calls
            .borrow_mut()
            .push(infohash.to_string());
        Ok(self.torrent(infohash)?.download_path.clone())
    }

    fn get_files(&self, infohash: &str) -> Result<Vec<TorrentFile>, ClientError> {
        self.files_calls.borrow_mut().push(infohash.to_string());
        if self.fail_files_for.as_deref() == Some(infohash) {
            return Err(ClientError::UnknownTorrent(infohash.to_string()));
        }
        Ok(self.torrent(infohash)?.files.clone())
    }
}

pub fn single_client(name: &str, client: FakeClient) -> BTreeMap<String, FakeClient> {
    let mut clients = BTreeMap::new();
    clients.insert(name.to_string(), client);
    clients
}
