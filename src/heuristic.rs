use std::path::{Path, PathBuf};

/// Decides which directories hold file groups that only make sense together.
pub trait UnsplitableHeuristic {
    /// Whether a directory's immediate files form an inseparable group.
    fn is_unsplitable(&self, files: &[PathBuf]) -> bool;

    /// The directory that should stand for the whole group.
    fn resolve_unsplitable_root(&self, directory: &Path) -> PathBuf;
}

/// Extension combinations that mark a scene-style release.
const UNSPLITABLE_EXTENSION_SETS: &[&[&str]] = &[&["rar", "sfv"], &["mp3", "sfv"], &["vob", "ifo"]];

/// Files whose presence alone makes a directory a disc structure.
const UNSPLITABLE_MARKER_FILES: &[&str] = &["movieobject.bdmv"];

/// Directory names that sit inside a release rather than naming it.
const RELEASE_SUBDIRECTORIES: &[&str] = &[
    "subs",
    "sub",
    "subtitles",
    "sample",
    "samples",
    "proof",
    "covers",
    "video_ts",
    "audio_ts",
    "bdmv",
    "backup",
    "stream",
    "playlist",
    "clipinf",
    "certificate",
    "meta",
    "jar",
    "auxdata",
];

/// Prefixes followed by a number, e.g. `cd1`, `disc 2`.
const NUMBERED_SUBDIRECTORY_PREFIXES: &[&str] = &["cd", "dvd", "disc", "disk"];

/// Scene release / disc image grouping.
#[derive(Debug, Default, Clone, Copy)]
pub struct SceneReleaseHeuristic;

impl SceneReleaseHeuristic {
    fn is_release_subdirectory(name: &str) -> bool {
        let name = name.to_lowercase();
        if RELEASE_SUBDIRECTORIES.contains(&name.as_str()) {
            return true;
        }
        NUMBERED_SUBDIRECTORY_PREFIXES.iter().any(|prefix| {
            name.strip_prefix(prefix)
                .map(|rest| rest.trim_start_matches([' ', '_', '-', '.']))
                .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
        })
    }
}

impl UnsplitableHeuristic for SceneReleaseHeuristic {
    fn is_unsplitable(&self, files: &[PathBuf]) -> bool {
        let extensions: Vec<String> = files
            .iter()
            .filter_map(|f| f.extension())
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .collect();

        let has_extension_set = UNSPLITABLE_EXTENSION_SETS
            .iter()
            .any(|set| set.iter().all(|ext| extensions.iter().any(|e| e == ext)));
        if has_extension_set {
            return true;
        }

        files.iter().any(|f| {
            f.file_name()
                .map(|name| name.to_string_lossy().to_lowercase())
                .is_some_and(|name| UNSPLITABLE_MARKER_FILES.contains(&name.as_str()))
        })
    }

    fn resolve_unsplitable_root(&self, directory: &Path) -> PathBuf {
        let mut current = directory;
        while let (Some(name), Some(parent)) = (current.file_name(), current.parent()) {
            if !Self::is_release_subdirectory(&name.to_string_lossy()) {
                break;
            }
            current = parent;
        }
        current.to_path_buf()
    }
}
