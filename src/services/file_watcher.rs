//! Watches the input image (and config file) for the `watch` command.
//!
//! Editors often replace a file instead of writing it in place, so the
//! parent directories are watched and events are filtered down to the
//! watched file names.

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// Quiet period before a burst of raw events is reported.
const DEBOUNCE: Duration = Duration::from_millis(200);

/// Event sent when watched files change
#[derive(Debug, Clone)]
pub struct FileChangeEvent {
    /// Watched paths that changed
    pub paths: Vec<PathBuf>,
}

/// Debounced watcher over a fixed set of files
pub struct FileWatcher {
    sender: broadcast::Sender<FileChangeEvent>,
    /// Kept alive for as long as the watcher is
    _watcher: Option<RecommendedWatcher>,
    active: bool,
}

impl FileWatcher {
    /// Watch `paths`. Must be called inside a Tokio runtime.
    ///
    /// Files that do not exist yet are still watched through their parent
    /// directory; the watcher is inactive only if no directory could be
    /// registered.
    pub fn new(paths: Vec<PathBuf>) -> Self {
        let (sender, _) = broadcast::channel(16);

        let targets: HashSet<PathBuf> = paths.iter().map(|p| absolute(p)).collect();
        if targets.is_empty() {
            tracing::debug!("No files to watch, file watching disabled");
            return Self {
                sender,
                _watcher: None,
                active: false,
            };
        }

        let (watcher, active) = match Self::start_watcher(targets, sender.clone()) {
            Ok(watcher) => {
                tracing::info!(files = ?paths, "File watcher started");
                (Some(watcher), true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to start file watcher");
                (None, false)
            }
        };

        Self {
            sender,
            _watcher: watcher,
            active,
        }
    }

    fn start_watcher(
        targets: HashSet<PathBuf>,
        sender: broadcast::Sender<FileChangeEvent>,
    ) -> Result<RecommendedWatcher, notify::Error> {
        let (tx, rx) = mpsc::channel::<PathBuf>(100);
        tokio::spawn(debounce(rx, sender));

        let dirs: HashSet<PathBuf> = targets
            .iter()
            .filter_map(|p| p.parent().map(Path::to_path_buf))
            .collect();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<notify::Event, notify::Error>| {
                let Ok(event) = res else { return };
                if event.kind.is_access() {
                    return;
                }
                for path in event.paths {
                    if targets.contains(&path) {
                        let _ = tx.blocking_send(path);
                    }
                }
            },
            Config::default(),
        )?;

        for dir in &dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
        }

        Ok(watcher)
    }

    /// Subscribe to file change events
    pub fn subscribe(&self) -> broadcast::Receiver<FileChangeEvent> {
        self.sender.subscribe()
    }

    /// Check if the watcher is active
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Collect raw paths until the channel has been quiet for [`DEBOUNCE`],
/// then broadcast them as one event.
async fn debounce(mut rx: mpsc::Receiver<PathBuf>, sender: broadcast::Sender<FileChangeEvent>) {
    while let Some(first) = rx.recv().await {
        let mut pending = HashSet::from([first]);
        loop {
            match tokio::time::timeout(DEBOUNCE, rx.recv()).await {
                Ok(Some(path)) => {
                    pending.insert(path);
                }
                Ok(None) | Err(_) => break,
            }
        }

        let paths: Vec<PathBuf> = pending.into_iter().collect();
        tracing::debug!(paths = ?paths, "Files changed (debounced)");
        let _ = sender.send(FileChangeEvent { paths });
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
