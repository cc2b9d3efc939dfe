use ahash::AHashMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{ClientError, TorrentClient, TorrentFile, TorrentListing};

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    torrents: Vec<ManifestTorrent>,
}

#[derive(Debug, Deserialize)]
struct ManifestTorrent {
    infohash: String,
    name: String,
    download_path: PathBuf,
    #[serde(default)]
    files: Vec<ManifestFile>,
}

#[derive(Debug, Deserialize)]
struct ManifestFile {
    path: PathBuf,
    size: u64,
}

/// A client backed by a JSON snapshot of a torrent session.
///
/// ```json
/// { "torrents": [ { "infohash": "..", "name": "..", "download_path": "/dl",
///                   "files": [ { "path": "a/b.mkv", "size": 1024 } ] } ] }
/// ```
///
/// The snapshot is read once when the client is opened.
#[derive(Debug)]
pub struct ManifestClient {
    torrents: Vec<ManifestTorrent>,
    by_infohash: AHashMap<String, usize>,
}

impl ManifestClient {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let client = Self::from_json(&raw).map_err(|source| ClientError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            "Loaded {} torrents from client session {}",
            client.torrents.len(),
            path.display()
        );
        Ok(client)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let manifest: Manifest = serde_json::from_str(raw)?;
        let by_infohash = manifest
            .torrents
            .iter()
            .enumerate()
            .map(|(idx, t)| (t.infohash.clone(), idx))
            .collect();
        Ok(Self {
            torrents: manifest.torrents,
            by_infohash,
        })
    }

    fn torrent(&self, infohash: &str) -> Result<&ManifestTorrent, ClientError> {
        self.by_infohash
            .get(infohash)
            .map(|&idx| &self.torrents[idx])
            .ok_or_else(|| ClientError::UnknownTorrent(infohash.to_string()))
    }
}

impl TorrentClient for ManifestClient {
    fn list(&self) -> Result<Vec<TorrentListing>, ClientError> {
        Ok(self
            .torrents
            .iter()
            .map(|t| TorrentListing {
                infohash: t.infohash.clone(),
                name: t.name.clone(),
            })
            .collect())
    }

    fn get_download_path(&self, infohash: &str) -> Result<PathBuf, ClientError> {
        Ok(self.torrent(infohash)?.download_path.clone())
    }

    fn get_files(&self, infohash: &str) -> Result<Vec<TorrentFile>, ClientError> {
        Ok(self
            .torrent(infohash)?
            .files
            .iter()
            .map(|f| TorrentFile {
                path: f.path.clone(),
                size: f.size,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION: &str = r#"{
        "torrents": [
            {
                "infohash": "abc",
                "name": "Some.Release",
                "download_path": "/downloads",
                "files": [
                    { "path": "Some.Release/a.mkv", "size": 1000 },
                    { "path": "Some.Release/a.nfo", "size": 12 }
                ]
            },
            { "infohash": "def", "name": "Empty", "download_path": "/downloads" }
        ]
    }"#;

    #[test]
    fn test_manifest_lists_torrents_in_order() {
        let client = ManifestClient::from_json(SESSION).unwrap();
        let listing = client.list().unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].infohash, "abc");
        assert_eq!(listing[1].name, "Empty");
    }

    #[test]
    fn test_manifest_files_and_download_path() {
        let client = ManifestClient::from_json(SESSION).unwrap();
        assert_eq!(
            client.get_download_path("abc").unwrap(),
            PathBuf::from("/downloads")
        );
        let files = client.get_files("abc").unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].size, 1000);
        assert!(client.get_files("def").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_infohash_is_an_error() {
        let client = ManifestClient::from_json(SESSION).unwrap();
        assert!(matches!(
            client.get_files("zzz"),
            Err(ClientError::UnknownTorrent(hash)) if hash == "zzz"
        ));
    }
}
