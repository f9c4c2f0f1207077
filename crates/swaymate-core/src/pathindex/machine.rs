//! Debounced, per-directory refresh state machine behind an actor task.
//!
//! All state transitions run on one task consuming `IndexMsg` values, so they
//! are serialized without per-directory locks. Listings run as independent
//! cancellable tasks and report back with their episode number; a completion
//! whose episode no longer matches the directory's current one is stale and
//! discarded.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use notify::{RecursiveMode, Watcher};
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::pathindex::errors::PathIndexError;
use crate::pathindex::scan;

/// Lifecycle phase of one watched directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirPhase {
    /// Known but never listed.
    Idle,
    /// A listing task is in flight.
    Refreshing,
    /// A refresh arrived while the cache was fresh; one delayed retry is
    /// scheduled and further requests are rejected until it fires.
    Debounced,
    /// Listing complete, cache valid.
    Cached,
}

/// Per-directory snapshot for logs and tests.
#[derive(Debug, Clone)]
pub struct DirStats {
    pub dir: PathBuf,
    pub phase: DirPhase,
    pub episodes: u64,
}

enum IndexMsg {
    Refresh {
        dir: PathBuf,
        /// Set on the delayed retry a `Debounced` transition schedules, which
        /// bypasses the freshness check.
        retry: bool,
    },
    Done {
        dir: PathBuf,
        episode: u64,
        result: Result<Vec<String>, PathIndexError>,
    },
    Stats {
        reply: oneshot::Sender<Vec<DirStats>>,
    },
}

struct DirState {
    phase: DirPhase,
    last_refresh: Option<Instant>,
    cache: Vec<String>,
    episode: u64,
    cancel: Option<CancellationToken>,
}

impl DirState {
    fn new() -> Self {
        Self {
            phase: DirPhase::Idle,
            last_refresh: None,
            cache: Vec::new(),
            episode: 0,
            cancel: None,
        }
    }
}

/// Handle to the running index machine.
///
/// The aggregated union sits behind its own mutex because RPC handlers read
/// it concurrently with refresh completions on the actor task.
pub struct PathWatcher {
    tx: mpsc::UnboundedSender<IndexMsg>,
    dirs: Vec<PathBuf>,
    results: Arc<Mutex<Vec<String>>>,
    refreshed_rx: watch::Receiver<bool>,
    fs_watcher: Option<notify::RecommendedWatcher>,
}

impl PathWatcher {
    /// Start the machine over the given directories and kick off one
    /// unconditional refresh per directory. Nonexistent directories are
    /// skipped silently.
    pub fn spawn(dirs: Vec<PathBuf>, debounce: Duration, shutdown: CancellationToken) -> Self {
        let dirs: Vec<PathBuf> = dirs
            .into_iter()
            .filter(|dir| {
                let exists = dir.is_dir();
                if !exists {
                    debug!(event = "core.pathindex.dir_skipped", dir = %dir.display());
                }
                exists
            })
            .collect();

        let (tx, rx) = mpsc::unbounded_channel();
        let results = Arc::new(Mutex::new(Vec::new()));
        let (refreshed_tx, refreshed_rx) = watch::channel(false);

        let machine = Machine {
            states: dirs.iter().cloned().map(|d| (d, DirState::new())).collect(),
            debounce,
            tx: tx.clone(),
            results: results.clone(),
            refreshed_tx,
            shutdown,
        };
        tokio::spawn(machine.run(rx));

        info!(event = "core.pathindex.started", dirs = dirs.len());
        for dir in &dirs {
            let _ = tx.send(IndexMsg::Refresh {
                dir: dir.clone(),
                retry: false,
            });
        }

        Self {
            tx,
            dirs,
            results,
            refreshed_rx,
            fs_watcher: None,
        }
    }

    /// Start over the directories of the `PATH` environment variable.
    pub fn spawn_from_path_env(debounce: Duration, shutdown: CancellationToken) -> Self {
        let dirs = std::env::var_os("PATH")
            .map(|raw| std::env::split_paths(&raw).collect())
            .unwrap_or_default();
        Self::spawn(dirs, debounce, shutdown)
    }

    /// Install filesystem watches on every tracked directory, feeding change
    /// events into the machine. Deletions always trigger a refresh of the
    /// containing directory; other events only when they concern an
    /// executable file.
    pub fn watch_filesystem(&mut self) -> Result<(), PathIndexError> {
        let tx = self.tx.clone();
        let mut watcher =
            notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                match res {
                    Ok(event) => forward_fs_event(&tx, event),
                    Err(e) => {
                        error!(event = "core.pathindex.watch_failed", error = %e);
                    }
                }
            })?;
        for dir in &self.dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
        }
        self.fs_watcher = Some(watcher);
        Ok(())
    }

    /// Request a refresh of one directory. Subject to the machine's debounce
    /// and in-flight rejection rules.
    pub fn request_refresh(&self, dir: &Path) {
        let _ = self.tx.send(IndexMsg::Refresh {
            dir: dir.to_path_buf(),
            retry: false,
        });
    }

    /// Wait until every directory has a settled cache, then return the
    /// deduplicated union of executable names.
    pub async fn wait_path_files(&self) -> Result<Vec<String>, PathIndexError> {
        let mut rx = self.refreshed_rx.clone();
        rx.wait_for(|ready| *ready)
            .await
            .map_err(|_| PathIndexError::MachineStopped)?;
        Ok(self.results.lock().unwrap().clone())
    }

    /// Whether the aggregation state currently holds.
    pub fn all_refreshed(&self) -> bool {
        *self.refreshed_rx.borrow()
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub async fn dir_stats(&self) -> Result<Vec<DirStats>, PathIndexError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(IndexMsg::Stats { reply })
            .map_err(|_| PathIndexError::MachineStopped)?;
        rx.await.map_err(|_| PathIndexError::MachineStopped)
    }
}

fn forward_fs_event(tx: &mpsc::UnboundedSender<IndexMsg>, event: notify::Event) {
    let is_remove = matches!(event.kind, notify::EventKind::Remove(_));
    for path in event.paths {
        let Some(dir) = path.parent() else {
            continue;
        };
        if is_remove || scan::is_executable_file(&path) {
            let _ = tx.send(IndexMsg::Refresh {
                dir: dir.to_path_buf(),
                retry: false,
            });
        }
    }
}

struct Machine {
    states: HashMap<PathBuf, DirState>,
    debounce: Duration,
    tx: mpsc::UnboundedSender<IndexMsg>,
    results: Arc<Mutex<Vec<String>>>,
    refreshed_tx: watch::Sender<bool>,
    shutdown: CancellationToken,
}

impl Machine {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<IndexMsg>) {
        // nothing to watch means nothing to wait for
        if self.states.is_empty() {
            let _ = self.refreshed_tx.send(true);
        }
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    for state in self.states.values() {
                        if let Some(cancel) = &state.cancel {
                            cancel.cancel();
                        }
                    }
                    info!(event = "core.pathindex.stopped");
                    break;
                }
                msg = rx.recv() => match msg {
                    Some(msg) => self.handle(msg),
                    None => break,
                },
            }
        }
    }

    fn handle(&mut self, msg: IndexMsg) {
        match msg {
            IndexMsg::Refresh { dir, retry } => self.handle_refresh(dir, retry),
            IndexMsg::Done {
                dir,
                episode,
                result,
            } => self.handle_done(dir, episode, result),
            IndexMsg::Stats { reply } => {
                let mut stats: Vec<DirStats> = self
                    .states
                    .iter()
                    .map(|(dir, state)| DirStats {
                        dir: dir.clone(),
                        phase: state.phase,
                        episodes: state.episode,
                    })
                    .collect();
                stats.sort_by(|a, b| a.dir.cmp(&b.dir));
                let _ = reply.send(stats);
            }
        }
    }

    fn handle_refresh(&mut self, dir: PathBuf, retry: bool) {
        let Some(state) = self.states.get_mut(&dir) else {
            debug!(event = "core.pathindex.unknown_dir", dir = %dir.display());
            return;
        };

        match state.phase {
            DirPhase::Refreshing => {
                debug!(event = "core.pathindex.refresh_rejected", dir = %dir.display(), reason = "in_flight");
                return;
            }
            DirPhase::Debounced if !retry => {
                debug!(event = "core.pathindex.refresh_rejected", dir = %dir.display(), reason = "retry_pending");
                return;
            }
            DirPhase::Cached if !retry => {
                let elapsed = state
                    .last_refresh
                    .map(|t| t.elapsed())
                    .unwrap_or(self.debounce);
                if elapsed < self.debounce {
                    state.phase = DirPhase::Debounced;
                    let delay = self.debounce - elapsed;
                    debug!(
                        event = "core.pathindex.debounced",
                        dir = %dir.display(),
                        delay_ms = delay.as_millis() as u64,
                    );
                    let tx = self.tx.clone();
                    let shutdown = self.shutdown.clone();
                    tokio::spawn(async move {
                        tokio::select! {
                            _ = shutdown.cancelled() => {}
                            _ = tokio::time::sleep(delay) => {
                                let _ = tx.send(IndexMsg::Refresh { dir, retry: true });
                            }
                        }
                    });
                    return;
                }
            }
            _ => {}
        }

        state.episode += 1;
        state.phase = DirPhase::Refreshing;
        let cancel = self.shutdown.child_token();
        state.cancel = Some(cancel.clone());
        let episode = state.episode;

        // any refresh start invalidates the aggregation state
        let _ = self.refreshed_tx.send(false);

        debug!(event = "core.pathindex.refreshing", dir = %dir.display(), episode);
        let tx = self.tx.clone();
        let scan_dir = dir.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                result = scan::list_executables(&scan_dir) => {
                    let _ = tx.send(IndexMsg::Done { dir, episode, result });
                }
            }
        });
    }

    fn handle_done(
        &mut self,
        dir: PathBuf,
        episode: u64,
        result: Result<Vec<String>, PathIndexError>,
    ) {
        let Some(state) = self.states.get_mut(&dir) else {
            return;
        };
        if state.episode != episode {
            debug!(
                event = "core.pathindex.stale_completion",
                dir = %dir.display(),
                episode,
                current = state.episode,
            );
            return;
        }

        state.phase = DirPhase::Cached;
        state.last_refresh = Some(Instant::now());
        state.cancel = None;
        match result {
            Ok(files) => {
                debug!(event = "core.pathindex.refreshed", dir = %dir.display(), files = files.len());
                state.cache = files;
            }
            Err(e) => {
                // this directory's cache empties; the others keep going
                warn!(event = "core.pathindex.listing_failed", dir = %dir.display(), error = %e);
                state.cache.clear();
            }
        }

        self.check_completion();
    }

    /// The aggregation state holds only with zero listings in flight.
    /// Reaching it recomputes the deduplicated union under the results lock.
    fn check_completion(&mut self) {
        if self
            .states
            .values()
            .any(|s| s.phase == DirPhase::Refreshing)
        {
            return;
        }
        let union: BTreeSet<String> = self
            .states
            .values()
            .flat_map(|s| s.cache.iter().cloned())
            .collect();
        let mut results = self.results.lock().unwrap();
        *results = union.into_iter().collect();
        drop(results);
        let _ = self.refreshed_tx.send(true);
    }
}
