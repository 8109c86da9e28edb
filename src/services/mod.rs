pub mod decoder;
pub mod file_watcher;
pub mod reform_service;

pub use decoder::{decode_file, decode_image};
pub use file_watcher::{FileChangeEvent, FileWatcher};
pub use reform_service::{ReformOutcome, ReformOutput, ReformService, ReformSummary};
