use serde::{Deserialize, Serialize};

/// The files a client reports for one torrent, resolved to absolute paths.
///
/// `paths` may hold two entries for a single client-reported file when its
/// canonical on-disk location differs from the literal joined path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentFiles {
    pub infohash: String,
    pub name: String,
    pub download_path: String,
    pub paths: Vec<(String, u64)>,
}

/// What the store remembers about a torrent without loading its path list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentFileInfo {
    pub name: String,
    pub download_path: String,
}

impl From<&TorrentFiles> for TorrentFileInfo {
    fn from(record: &TorrentFiles) -> Self {
        Self {
            name: record.name.clone(),
            download_path: record.download_path.clone(),
        }
    }
}

/// Row counts across the whole index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub files: usize,
    pub unsplitable_roots: usize,
    pub torrents: usize,
    pub torrent_paths: usize,
}
