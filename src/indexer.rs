use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::client::TorrentClient;
use crate::error::Result;
use crate::heuristic::{SceneReleaseHeuristic, UnsplitableHeuristic};
use crate::progress::{IndexReporter, SilentReporter};
use crate::scanner::{ClientScanStats, ClientScanner, FileSystemScanner, IgnorePatterns, WalkStats};
use crate::storage::Store;

/// Keeps the store in step with the filesystem and with torrent clients.
///
/// `scan_paths` and `scan_clients` are independent; each ends with exactly one
/// `Store::commit`. An error aborts the call before that commit, but batches
/// already written stay in the store.
pub struct Indexer<S, H = SceneReleaseHeuristic> {
    store: S,
    heuristic: H,
    ignore_patterns: IgnorePatterns,
    reporter: Box<dyn IndexReporter>,
}

#[derive(Debug)]
pub struct PathScanSummary {
    pub roots: Vec<PathBuf>,
    pub full_scan: bool,
    pub stats: WalkStats,
    pub duration: Duration,
}

#[derive(Debug)]
pub struct ClientScanSummary {
    pub full_scan: bool,
    pub fast_scan: bool,
    pub clients: BTreeMap<String, ClientScanStats>,
    pub duration: Duration,
}

impl<S: Store> Indexer<S> {
    pub fn new<I, P>(store: S, ignore_patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let ignore_patterns = IgnorePatterns::new(ignore_patterns)?;
        debug!("Indexer configured with {} ignore patterns", ignore_patterns.len());
        Ok(Self {
            store,
            heuristic: SceneReleaseHeuristic,
            ignore_patterns,
            reporter: Box::new(SilentReporter),
        })
    }
}

impl<S: Store, H: UnsplitableHeuristic> Indexer<S, H> {
    pub fn with_heuristic<H2: UnsplitableHeuristic>(self, heuristic: H2) -> Indexer<S, H2> {
        Indexer {
            store: self.store,
            heuristic,
            ignore_patterns: self.ignore_patterns,
            reporter: self.reporter,
        }
    }

    pub fn with_reporter(mut self, reporter: impl IndexReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Walk each root into the store.
    ///
    /// A full scan first drops every file record and unsplitable root; this is
    /// the only way files deleted from disk leave the index.
    pub fn scan_paths<P: AsRef<Path>>(
        &mut self,
        roots: &[P],
        full_scan: bool,
    ) -> Result<PathScanSummary> {
        let start = Instant::now();
        if full_scan {
            info!("Full scan requested, discarding indexed files");
            self.store.truncate_files()?;
        }

        let mut stats = WalkStats::default();
        let mut scanner = FileSystemScanner::new(
            &mut self.store,
            &self.heuristic,
            &self.ignore_patterns,
            self.reporter.as_ref(),
        );
        for root in roots {
            let root = root.as_ref();
            info!("Indexing path {}", root.display());
            self.reporter.on_path_scan_start(root);
            scanner.scan_root(root, &mut stats)?;
        }

        self.store.commit()?;
        let duration = start.elapsed();
        self.reporter
            .on_path_scan_complete(stats.files_indexed, duration.as_secs_f64());
        debug!(
            "Path scan completed in {:.2}s: {} directories, {} files indexed, {} ignored, {} unsplitable roots",
            duration.as_secs_f64(),
            stats.directories,
            stats.files_indexed,
            stats.files_ignored,
            stats.unsplitable_roots,
        );

        Ok(PathScanSummary {
            roots: roots.iter().map(|r| r.as_ref().to_path_buf()).collect(),
            full_scan,
            stats,
            duration,
        })
    }

    /// Reconcile the store with every client in `clients`.
    ///
    /// `full_scan` drops a client's records before scanning it and disables
    /// `fast_scan` for that client.
    pub fn scan_clients<'c, I, K, C>(
        &mut self,
        clients: I,
        full_scan: bool,
        fast_scan: bool,
    ) -> Result<ClientScanSummary>
    where
        I: IntoIterator<Item = (K, &'c C)>,
        K: AsRef<str>,
        C: TorrentClient + ?Sized + 'c,
    {
        let start = Instant::now();
        let fast_scan = fast_scan && !full_scan;
        let mut summaries = BTreeMap::new();

        for (name, client) in clients {
            let name = name.as_ref();
            info!("Indexing client {}", name);
            if full_scan {
                self.store.truncate_torrent_files(name)?;
            }
            let stats = ClientScanner::new(&mut self.store, self.reporter.as_ref())
                .scan_client(name, client, fast_scan)?;
            debug!(
                "Client '{}': {} torrents, {} indexed, {} fast-skipped, {} unchanged, {} removed",
                name,
                stats.torrents_seen,
                stats.torrents_indexed,
                stats.skipped_fast,
                stats.skipped_unchanged,
                stats.torrents_removed,
            );
            summaries.insert(name.to_string(), stats);
        }

        self.store.commit()?;

        Ok(ClientScanSummary {
            full_scan,
            fast_scan,
            clients: summaries,
            duration: start.elapsed(),
        })
    }
}
