use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Resolve symlinks and mount aliases in `path` without requiring it to exist.
///
/// The longest existing ancestor is canonicalized and the missing tail is
/// appended lexically, with `.` dropped and `..` popping a component.
pub fn resolve_alias(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    if let Ok(canonical) = fs::canonicalize(&absolute) {
        return canonical;
    }

    let mut existing = absolute.as_path();
    let mut tail: Vec<Component> = Vec::new();
    let base = loop {
        match existing.parent() {
            Some(parent) => {
                if let Some(last) = existing.components().next_back() {
                    tail.push(last);
                }
                existing = parent;
                if let Ok(canonical) = fs::canonicalize(existing) {
                    break canonical;
                }
            }
            None => return normalize(&absolute),
        }
    };

    let mut resolved = base;
    for component in tail.into_iter().rev() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
