pub mod manifest;

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use manifest::ManifestClient;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("IO error reading client session {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed client session {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Torrent {0} is not known to the client")]
    UnknownTorrent(String),
}

/// One entry of a client's torrent list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentListing {
    pub infohash: String,
    pub name: String,
}

/// A file inside a torrent, relative to the torrent's download path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentFile {
    pub path: PathBuf,
    pub size: u64,
}

/// A torrent session the client scanner can read from.
pub trait TorrentClient {
    fn list(&self) -> Result<Vec<TorrentListing>, ClientError>;

    fn get_download_path(&self, infohash: &str) -> Result<PathBuf, ClientError>;

    fn get_files(&self, infohash: &str) -> Result<Vec<TorrentFile>, ClientError>;
}

impl<C: TorrentClient + ?Sized> TorrentClient for Box<C> {
    fn list(&self) -> Result<Vec<TorrentListing>, ClientError> {
        (**self).list()
    }

    fn get_download_path(&self, infohash: &str) -> Result<PathBuf, ClientError> {
        (**self).get_download_path(infohash)
    }

    fn get_files(&self, infohash: &str) -> Result<Vec<TorrentFile>, ClientError> {
        (**self).get_files(infohash)
    }
}
