//! Daemon state assembly and the window-event loop.

use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use swaymate_core::config::Config;
use swaymate_core::pathindex::PathWatcher;
use swaymate_core::tracker::Tracker;
use swaymate_core::usrcmds::CommandRegistry;
use swaymate_core::wm::{WindowChange, WindowEvent, WmClient, WmError};
use swaymate_core::SELF_WINDOW_TITLE;

use crate::errors::DaemonError;
use crate::session::PickerGate;

/// All daemon state, built once at startup and shared via `Arc`.
///
/// The tracker sits behind an RwLock: the event loop is its only writer, RPC
/// handlers take read guards (write guards for mutating operations), so every
/// tracker update is atomic with respect to RPC reads.
pub struct DaemonState {
    pub config: Config,
    pub tracker: RwLock<Tracker>,
    pub watcher: PathWatcher,
    pub gate: PickerGate,
    pub registry: CommandRegistry,
}

impl DaemonState {
    pub fn new(
        config: Config,
        wm: Arc<dyn WmClient>,
        watcher: PathWatcher,
        registry: CommandRegistry,
    ) -> Self {
        let gate = PickerGate::new(config.picker_timeout());
        let tracker = RwLock::new(Tracker::new(wm, config.clone()));
        Self {
            config,
            tracker,
            watcher,
            gate,
            registry,
        }
    }
}

/// Consume window events sequentially until shutdown or stream end.
///
/// Per-event errors are logged and skipped. The stream ending without a
/// shutdown request means the subscription child died, which is fatal.
pub async fn run_event_loop(
    state: Arc<DaemonState>,
    mut events: mpsc::UnboundedReceiver<WindowEvent>,
    shutdown: CancellationToken,
) -> Result<(), DaemonError> {
    info!(event = "daemon.events.loop_started");
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!(event = "daemon.events.loop_stopped");
                return Ok(());
            }
            event = events.recv() => match event {
                Some(event) => handle_window_event(&state, event).await,
                None => {
                    error!(event = "daemon.events.stream_closed");
                    shutdown.cancel();
                    return Err(DaemonError::EventStreamClosed);
                }
            },
        }
    }
}

async fn handle_window_event(state: &Arc<DaemonState>, event: WindowEvent) {
    let mut tracker = state.tracker.write().await;
    match event.change {
        WindowChange::Focus | WindowChange::New => {
            if let Some(record) = tracker.on_focus(&event.container) {
                state.registry.notify(event.change, &mut *tracker, &record);
            }
        }
        WindowChange::Close => {
            if let Some(record) = tracker.on_close(&event.container) {
                state
                    .registry
                    .notify(WindowChange::Close, &mut *tracker, &record);
            }
        }
        WindowChange::Other => {}
    }
}

/// Install for_window rules so the picker terminal floats above everything.
pub fn apply_autoconfig(wm: &dyn WmClient) -> Result<(), WmError> {
    info!(event = "daemon.startup.autoconfig");
    wm.run_commands(&[
        format!(r#"for_window [title="{SELF_WINDOW_TITLE}"] floating enable"#),
        format!(r#"for_window [title="{SELF_WINDOW_TITLE}"] border none"#),
        format!(r#"for_window [title="{SELF_WINDOW_TITLE}"] sticky enable"#),
    ])
}

/// Install the default picker keybindings.
pub fn apply_default_keybindings(wm: &dyn WmClient) -> Result<(), WmError> {
    info!(event = "daemon.startup.default_keybindings");
    wm.run_commands(&[
        "bindsym alt+tab exec swaymate switcher".to_string(),
        "bindsym mod4+o exec swaymate pick-space".to_string(),
        "bindsym mod4+p exec swaymate pick-win".to_string(),
        "bindsym mod4+d exec swaymate path".to_string(),
    ])
}

/// Seed the tracker from the current tree; a failure here degrades startup
/// to an empty MRU list instead of aborting.
pub async fn seed_tracker(state: &Arc<DaemonState>) {
    let mut tracker = state.tracker.write().await;
    if let Err(e) = tracker.seed_from_tree() {
        warn!(event = "daemon.startup.seed_failed", error = %e);
    }
}
