use ahash::AHashSet;
use rocksdb::{ColumnFamily, Direction, IteratorMode, Options, WriteBatch, DB};
use std::path::Path;
use tracing::{debug, trace};

use super::models::{IndexStats, TorrentFileInfo, TorrentFiles};
use super::{Store, StoreError};

const CF_FILES: &str = "files";
const CF_UNSPLITABLE_ROOTS: &str = "unsplitable_roots";
const CF_TORRENT_FILES: &str = "torrent_files";

const KEY_SEPARATOR: u8 = 0;

/// RocksDB-backed index.
///
/// Files and unsplitable roots are keyed by path with empty values. Torrent
/// records are keyed `client \0 infohash` and hold a bincode `TorrentFiles`.
pub struct RocksStore {
    db: DB,
}

impl RocksStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut db_options = Options::default();
        db_options.create_if_missing(true);
        db_options.create_missing_column_families(true);

        let db = DB::open_cf(
            &db_options,
            path.as_ref(),
            [CF_FILES, CF_UNSPLITABLE_ROOTS, CF_TORRENT_FILES],
        )?;
        debug!("Opened index store at '{}'", path.as_ref().display());
        Ok(Self { db })
    }

    fn cf(&self, name: &'static str) -> Result<&ColumnFamily, StoreError> {
        self.db
            .cf_handle(name)
            .ok_or(StoreError::MissingColumnFamily(name))
    }

    fn clear_cf(&self, name: &'static str) -> Result<usize, StoreError> {
        let cf = self.cf(name)?;
        let mut batch = WriteBatch::default();
        let mut count = 0usize;
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (key, _) = item?;
            batch.delete_cf(cf, key);
            count += 1;
        }
        self.db.write(batch)?;
        Ok(count)
    }

    fn keys_as_strings(&self, name: &'static str) -> Result<Vec<String>, StoreError> {
        let cf = self.cf(name)?;
        let mut keys = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (key, _) = item?;
            keys.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(keys)
    }

    fn count_keys(&self, name: &'static str) -> Result<usize, StoreError> {
        let cf = self.cf(name)?;
        let mut count = 0usize;
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            item?;
            count += 1;
        }
        Ok(count)
    }

    /// Visit every `(infohash, encoded record)` pair stored for one client.
    fn for_each_torrent<F>(&self, client_name: &str, mut f: F) -> Result<(), StoreError>
    where
        F: FnMut(&[u8], &str, &[u8]) -> Result<(), StoreError>,
    {
        let cf = self.cf(CF_TORRENT_FILES)?;
        let prefix = client_prefix(client_name);
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(&prefix, Direction::Forward));
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            let infohash = std::str::from_utf8(&key[prefix.len()..])
                .map_err(|_| StoreError::CorruptKey(CF_TORRENT_FILES))?;
            f(&key, infohash, &value)?;
        }
        Ok(())
    }
}

fn client_prefix(client_name: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(client_name.len() + 1);
    prefix.extend_from_slice(client_name.as_bytes());
    prefix.push(KEY_SEPARATOR);
    prefix
}

fn torrent_key(client_name: &str, infohash: &str) -> Vec<u8> {
    let mut key = client_prefix(client_name);
    key.extend_from_slice(infohash.as_bytes());
    key
}

/// Raw path bytes, so distinct non-UTF-8 names keep distinct keys.
#[cfg(unix)]
fn path_key(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
fn path_key(path: &Path) -> Vec<u8> {
    path.to_string_lossy().into_owned().into_bytes()
}

impl Store for RocksStore {
    fn truncate_files(&mut self) -> Result<(), StoreError> {
        let files = self.clear_cf(CF_FILES)?;
        let roots = self.clear_cf(CF_UNSPLITABLE_ROOTS)?;
        debug!("Truncated {} file records and {} unsplitable roots", files, roots);
        Ok(())
    }

    fn truncate_torrent_files(&mut self, client_name: &str) -> Result<(), StoreError> {
        let cf = self.cf(CF_TORRENT_FILES)?;
        let mut batch = WriteBatch::default();
        let mut count = 0usize;
        self.for_each_torrent(client_name, |key, _, _| {
            batch.delete_cf(cf, key);
            count += 1;
            Ok(())
        })?;
        self.db.write(batch)?;
        debug!("Truncated {} torrent records for client '{}'", count, client_name);
        Ok(())
    }

    fn insert_file_path(&mut self, path: &Path) -> Result<(), StoreError> {
        let cf = self.cf(CF_FILES)?;
        self.db.put_cf(cf, path_key(path), b"")?;
        Ok(())
    }

    fn mark_unsplitable_root(&mut self, path: &Path) -> Result<(), StoreError> {
        let cf = self.cf(CF_UNSPLITABLE_ROOTS)?;
        self.db.put_cf(cf, path_key(path), b"")?;
        Ok(())
    }

    fn get_torrent_file_info(
        &self,
        client_name: &str,
        infohash: &str,
    ) -> Result<Option<TorrentFileInfo>, StoreError> {
        let cf = self.cf(CF_TORRENT_FILES)?;
        match self.db.get_cf(cf, torrent_key(client_name, infohash))? {
            Some(value) => {
                let record: TorrentFiles = bincode::deserialize(&value)?;
                Ok(Some(TorrentFileInfo::from(&record)))
            }
            None => Ok(None),
        }
    }

    fn insert_torrent_files_paths(
        &mut self,
        client_name: &str,
        batch: &[TorrentFiles],
    ) -> Result<(), StoreError> {
        let cf = self.cf(CF_TORRENT_FILES)?;
        let mut write_batch = WriteBatch::default();
        for record in batch {
            let value = bincode::serialize(record)?;
            write_batch.put_cf(cf, torrent_key(client_name, &record.infohash), value);
        }
        self.db.write(write_batch)?;
        trace!("Wrote {} torrent records for client '{}'", batch.len(), client_name);
        Ok(())
    }

    fn remove_non_existing_infohashes(
        &mut self,
        client_name: &str,
        live_infohashes: &AHashSet<String>,
    ) -> Result<usize, StoreError> {
        let cf = self.cf(CF_TORRENT_FILES)?;
        let mut batch = WriteBatch::default();
        let mut removed = 0usize;
        self.for_each_torrent(client_name, |key, infohash, _| {
            if !live_infohashes.contains(infohash) {
                trace!("Removing stale torrent {} from client '{}'", infohash, client_name);
                batch.delete_cf(cf, key);
                removed += 1;
            }
            Ok(())
        })?;
        self.db.write(batch)?;
        Ok(removed)
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.db.flush_wal(true)?;
        trace!("Index store committed");
        Ok(())
    }

    fn file_paths(&self) -> Result<Vec<String>, StoreError> {
        self.keys_as_strings(CF_FILES)
    }

    fn unsplitable_roots(&self) -> Result<Vec<String>, StoreError> {
        self.keys_as_strings(CF_UNSPLITABLE_ROOTS)
    }

    fn torrent_files(&self, client_name: &str) -> Result<Vec<TorrentFiles>, StoreError> {
        let mut records: Vec<TorrentFiles> = Vec::new();
        self.for_each_torrent(client_name, |_, _, value| {
            records.push(bincode::deserialize(value)?);
            Ok(())
        })?;
        Ok(records)
    }

    fn stats(&self) -> Result<IndexStats, StoreError> {
        let cf = self.cf(CF_TORRENT_FILES)?;
        let mut torrents = 0usize;
        let mut torrent_paths = 0usize;
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_, value) = item?;
            let record: TorrentFiles = bincode::deserialize(&value)?;
            torrents += 1;
            torrent_paths += record.paths.len();
        }

        Ok(IndexStats {
            files: self.count_keys(CF_FILES)?,
            unsplitable_roots: self.count_keys(CF_UNSPLITABLE_ROOTS)?,
            torrents,
            torrent_paths,
        })
    }
}
