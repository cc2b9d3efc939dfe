pub mod client;
pub mod queue;
pub mod walk;

pub use client::{ClientScanStats, ClientScanner};
pub use queue::{InsertQueue, INSERT_QUEUE_MAX_SIZE};
pub use walk::{FileSystemScanner, IgnorePatterns, WalkStats};
