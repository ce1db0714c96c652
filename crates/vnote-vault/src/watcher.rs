//! Vault change watcher.
//!
//! Reports vault-relative paths of notes and pattern files that were
//! created, modified or removed. Uses the `notify` crate for filesystem
//! events with a periodic fallback poll.

use crate::error::Result;
use crate::{is_hidden, paths};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration for the vault watcher
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Fallback poll interval (safety net for missed events)
    pub poll_interval: Duration,
    /// Quiet period that closes a burst of filesystem events
    pub debounce: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            debounce: Duration::from_millis(100),
        }
    }
}

type Snapshot = HashMap<String, (SystemTime, u64)>;

/// Watches a vault directory and reports changed documents in batches.
pub struct VaultWatcher {
    root: PathBuf,
    snapshot: Arc<Mutex<Snapshot>>,
    config: WatcherConfig,
}

impl VaultWatcher {
    pub fn new(root: PathBuf, config: Option<WatcherConfig>) -> Self {
        Self {
            root,
            snapshot: Arc::new(Mutex::new(Snapshot::new())),
            config: config.unwrap_or_default(),
        }
    }

    /// Rescan the vault and return every path that changed since the last
    /// poll. The first poll reports every document.
    pub async fn poll(&self) -> Result<Vec<String>> {
        rescan(&self.root, &self.snapshot).await
    }

    /// Start watching and send each batch of changed paths to `tx`.
    ///
    /// Documents present at start are taken as the baseline and are not
    /// reported. Returns a handle that can be used to stop the watcher.
    pub async fn start(self, tx: mpsc::Sender<Vec<String>>) -> Result<WatcherHandle> {
        self.poll().await?;

        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        let root = self.root.clone();
        let snapshot = self.snapshot.clone();
        let poll_interval = self.config.poll_interval;
        let debounce = self.config.debounce;

        let (event_tx, mut event_rx) = mpsc::channel::<Vec<String>>(64);
        let roots = event_roots(&root);

        let watcher_result: std::result::Result<RecommendedWatcher, notify::Error> =
            notify::recommended_watcher(move |res: std::result::Result<Event, notify::Error>| {
                if let Ok(event) = res
                    && (event.kind.is_create() || event.kind.is_modify() || event.kind.is_remove())
                {
                    let changed: Vec<String> = event
                        .paths
                        .iter()
                        .filter(|p| paths::is_vault_text(p))
                        .filter_map(|p| roots.iter().find_map(|r| paths::to_reference(r, p)))
                        .filter(|r| !r.split('/').any(|part| is_hidden(std::ffi::OsStr::new(part))))
                        .collect();
                    if !changed.is_empty() {
                        let _ = event_tx.blocking_send(changed);
                    }
                }
            });

        let mut watcher = match watcher_result {
            Ok(mut w) => match w.watch(&root, RecursiveMode::Recursive) {
                Ok(()) => Some(w),
                Err(e) => {
                    warn!(error = %e, "cannot watch vault, using poll-only mode");
                    None
                }
            },
            Err(e) => {
                warn!(error = %e, "failed to create file watcher, using poll-only mode");
                None
            }
        };

        let handle = tokio::spawn(async move {
            let mut poll_timer = tokio::time::interval(poll_interval);

            loop {
                tokio::select! {
                    _ = stop_rx.recv() => {
                        break;
                    }

                    Some(first) = event_rx.recv() => {
                        let mut batch: BTreeSet<String> = first.into_iter().collect();
                        while let Ok(Some(more)) = tokio::time::timeout(debounce, event_rx.recv()).await {
                            batch.extend(more);
                        }
                        // keep the poll from reporting the same changes again
                        if let Ok(polled) = rescan(&root, &snapshot).await {
                            batch.extend(polled);
                        }
                        debug!(count = batch.len(), "vault changed");
                        if tx.send(batch.into_iter().collect()).await.is_err() {
                            break; // Receiver dropped
                        }
                    }

                    _ = poll_timer.tick() => {
                        if let Ok(changed) = rescan(&root, &snapshot).await
                            && !changed.is_empty() && tx.send(changed).await.is_err()
                        {
                            break; // Receiver dropped
                        }
                    }
                }
            }

            drop(watcher.take());
        });

        Ok(WatcherHandle {
            stop_tx,
            _task: handle,
        })
    }
}

/// The root as given and as canonicalized; event paths may use either.
fn event_roots(root: &Path) -> Vec<PathBuf> {
    let mut roots = vec![root.to_path_buf()];
    if let Ok(canonical) = root.canonicalize()
        && canonical != root
    {
        roots.push(canonical);
    }
    roots
}

fn scan(root: &Path) -> Result<Snapshot> {
    let mut snapshot = Snapshot::new();
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !paths::is_vault_text(entry.path()) {
            continue;
        }
        let meta = entry.metadata()?;
        if let Some(reference) = paths::to_reference(root, entry.path()) {
            snapshot.insert(reference, (meta.modified()?, meta.len()));
        }
    }
    Ok(snapshot)
}

/// Replace the snapshot with a fresh scan and return what differs.
async fn rescan(root: &Path, snapshot: &Arc<Mutex<Snapshot>>) -> Result<Vec<String>> {
    let fresh = scan(root)?;
    let mut current = snapshot.lock().await;
    let mut changed: BTreeSet<String> = fresh
        .iter()
        .filter(|(path, stamp)| current.get(*path) != Some(*stamp))
        .map(|(path, _)| path.clone())
        .collect();
    changed.extend(current.keys().filter(|p| !fresh.contains_key(*p)).cloned());
    *current = fresh;
    Ok(changed.into_iter().collect())
}

/// Handle to control a running watcher
pub struct WatcherHandle {
    stop_tx: mpsc::Sender<()>,
    _task: tokio::task::JoinHandle<()>,
}

impl WatcherHandle {
    /// Stop the watcher
    pub async fn stop(self) {
        let _ = self.stop_tx.send(()).await;
    }
}
