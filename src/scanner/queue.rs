use tracing::debug;

use crate::progress::IndexReporter;
use crate::storage::{Store, StoreError, TorrentFiles};

/// Pending torrent records are written out once the queue holds more than this.
pub const INSERT_QUEUE_MAX_SIZE: usize = 1000;

/// Buffers torrent records for one client and writes them to the store in batches.
pub struct InsertQueue<'a> {
    client_name: &'a str,
    pending: Vec<TorrentFiles>,
    flushes: usize,
    written: usize,
}

impl<'a> InsertQueue<'a> {
    pub fn new(client_name: &'a str) -> Self {
        Self {
            client_name,
            pending: Vec::new(),
            flushes: 0,
            written: 0,
        }
    }

    /// Queue a record, flushing the whole queue if it grew past the limit.
    pub fn push<S: Store + ?Sized>(
        &mut self,
        store: &mut S,
        reporter: &dyn IndexReporter,
        record: TorrentFiles,
    ) -> Result<(), StoreError> {
        self.pending.push(record);
        if self.pending.len() > INSERT_QUEUE_MAX_SIZE {
            self.flush(store, reporter)?;
        }
        Ok(())
    }

    /// Write whatever is still queued. Returns how many records were written in total.
    pub fn finish<S: Store + ?Sized>(
        mut self,
        store: &mut S,
        reporter: &dyn IndexReporter,
    ) -> Result<usize, StoreError> {
        if !self.pending.is_empty() {
            self.flush(store, reporter)?;
        }
        debug!(
            "Client '{}': {} torrent records written in {} batches",
            self.client_name, self.written, self.flushes
        );
        Ok(self.written)
    }

    fn flush<S: Store + ?Sized>(
        &mut self,
        store: &mut S,
        reporter: &dyn IndexReporter,
    ) -> Result<(), StoreError> {
        store.insert_torrent_files_paths(self.client_name, &self.pending)?;
        self.flushes += 1;
        self.written += self.pending.len();
        reporter.on_batch_flushed(self.client_name, self.pending.len());
        self.pending.clear();
        Ok(())
    }
}
