use autotorrent_index::IndexReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::path::Path;
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI reporter drawing one indicatif spinner per root or client.
pub struct CliReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
        }
    }

    fn start_spinner(&self, message: String) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars(TICK_CHARS));
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        if let Some(old) = self.bar.borrow_mut().replace(pb) {
            old.finish_and_clear();
        }
    }

    fn set_message(&self, message: String) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_message(message);
        }
    }

    fn finish_spinner(&self) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl IndexReporter for CliReporter {
    fn on_path_scan_start(&self, root: &Path) {
        self.start_spinner(format!("Indexing {}...", root.display()));
    }

    fn on_directory_scanned(&self, directory: &Path, files_indexed: usize) {
        self.set_message(format!(
            "Indexing... {} files, at {}",
            files_indexed,
            directory.display()
        ));
    }

    fn on_path_scan_complete(&self, files_indexed: usize, duration_secs: f64) {
        self.finish_spinner();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Path scan complete: {} files in {:.2}s",
            files_indexed, duration_secs
        );
    }

    fn on_client_scan_start(&self, client_name: &str, torrents: usize) {
        self.start_spinner(format!("Client {}: {} torrents", client_name, torrents));
    }

    fn on_torrent_indexed(&self, client_name: &str, infohash: &str, paths: usize) {
        self.set_message(format!(
            "Client {}: indexed {} ({} paths)",
            client_name, infohash, paths
        ));
    }

    fn on_client_scan_complete(&self, client_name: &str, indexed: usize, removed: usize) {
        self.finish_spinner();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Client {} complete: {} indexed, {} removed",
            client_name, indexed, removed
        );
    }
}
