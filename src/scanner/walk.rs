use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::heuristic::UnsplitableHeuristic;
use crate::progress::IndexReporter;
use crate::storage::Store;

/// Shell-glob patterns matched case-sensitively against file base names.
#[derive(Debug, Clone, Default)]
pub struct IgnorePatterns {
    patterns: Vec<Pattern>,
}

impl IgnorePatterns {
    pub fn new<I, S>(globs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = globs
            .into_iter()
            .map(|glob| {
                let glob = glob.as_ref();
                Pattern::new(glob).map_err(|source| Error::IgnorePattern {
                    pattern: glob.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_ignored(&self, file_name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(file_name))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Counters for one or more walked roots.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WalkStats {
    pub directories: usize,
    pub files_indexed: usize,
    pub files_ignored: usize,
    pub unsplitable_roots: usize,
}

/// Walks directory trees into the store, one directory at a time.
pub struct FileSystemScanner<'a, S: ?Sized, H: ?Sized> {
    store: &'a mut S,
    heuristic: &'a H,
    ignore: &'a IgnorePatterns,
    reporter: &'a dyn IndexReporter,
}

impl<'a, S, H> FileSystemScanner<'a, S, H>
where
    S: Store + ?Sized,
    H: UnsplitableHeuristic + ?Sized,
{
    pub fn new(
        store: &'a mut S,
        heuristic: &'a H,
        ignore: &'a IgnorePatterns,
        reporter: &'a dyn IndexReporter,
    ) -> Self {
        Self {
            store,
            heuristic,
            ignore,
            reporter,
        }
    }

    /// Record every non-ignored file under `root` and mark unsplitable groups.
    ///
    /// Pending directories live on an explicit stack. Symlinked directories are
    /// followed and not de-duplicated, so a directory cycle is re-walked under a
    /// growing path until the OS refuses it. An ELOOP on the looping link skips
    /// that entry; an ENAMETOOLONG from `read_dir` aborts the scan.
    pub fn scan_root(&mut self, root: &Path, stats: &mut WalkStats) -> Result<()> {
        let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let files = self.scan_directory(&dir, &mut pending, stats)?;
            stats.directories += 1;
            self.reporter.on_directory_scanned(&dir, stats.files_indexed);

            if self.heuristic.is_unsplitable(&files) {
                let unsplitable_root = self.heuristic.resolve_unsplitable_root(&dir);
                debug!(
                    "{} is unsplitable, marking {} as root",
                    dir.display(),
                    unsplitable_root.display()
                );
                self.store.mark_unsplitable_root(&unsplitable_root)?;
                self.reporter.on_unsplitable_root(&unsplitable_root);
                stats.unsplitable_roots += 1;
            }
        }

        Ok(())
    }

    /// List `dir`, queueing sub-directories and recording its own files.
    /// Returns the non-ignored files directly inside `dir`.
    fn scan_directory(
        &mut self,
        dir: &Path,
        pending: &mut Vec<PathBuf>,
        stats: &mut WalkStats,
    ) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
        let mut files: Vec<PathBuf> = Vec::new();

        for entry_result in entries {
            let entry = entry_result.map_err(|e| Error::io(dir, e))?;
            let path = entry.path();

            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(err) if is_symlink(&entry) => {
                    trace!("Skipping unresolvable link {}: {}", path.display(), err);
                    continue;
                }
                Err(err) => return Err(Error::io(&path, err)),
            };

            if metadata.is_dir() {
                pending.push(path);
            } else if metadata.is_file() {
                if self.ignore.is_ignored(&entry.file_name().to_string_lossy()) {
                    trace!("Ignoring {}", path.display());
                    stats.files_ignored += 1;
                    continue;
                }
                self.store.insert_file_path(&path)?;
                stats.files_indexed += 1;
                files.push(path);
            }
        }

        Ok(files)
    }
}

fn is_symlink(entry: &fs::DirEntry) -> bool {
    entry.file_type().map(|t| t.is_symlink()).unwrap_or(false)
}
