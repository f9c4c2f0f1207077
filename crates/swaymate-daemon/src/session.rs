//! Exclusive picker-session arbitration.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use swaymate_core::process::is_process_alive;

struct Holder {
    pid: u32,
    since: Instant,
}

/// Liveness-and-timeout lock over the single picker UI slot.
///
/// Holders never release. A grant goes to the requester whenever the slot is
/// unheld, the recorded holder's process is gone, or the holder has sat on
/// the slot past the timeout. The picker wrapper can be killed out-of-band,
/// so release-on-exit cannot be relied upon.
pub struct PickerGate {
    timeout: Duration,
    holder: Mutex<Option<Holder>>,
}

impl PickerGate {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            holder: Mutex::new(None),
        }
    }

    /// Try to claim the picker slot for `pid`. On a grant the requester
    /// becomes the holder with a fresh timestamp.
    pub fn should_open(&self, pid: u32) -> bool {
        let mut holder = self.holder.lock().unwrap();

        let grant = match holder.as_ref() {
            None => true,
            Some(h) => {
                if !is_process_alive(h.pid) {
                    debug!(event = "daemon.session.holder_dead", holder_pid = h.pid);
                    true
                } else if h.since.elapsed() >= self.timeout {
                    debug!(event = "daemon.session.holder_expired", holder_pid = h.pid);
                    true
                } else {
                    false
                }
            }
        };

        if grant {
            info!(event = "daemon.session.granted", pid);
            *holder = Some(Holder {
                pid,
                since: Instant::now(),
            });
        } else {
            debug!(event = "daemon.session.denied", pid);
        }
        grant
    }

    pub fn holder_pid(&self) -> Option<u32> {
        self.holder.lock().unwrap().as_ref().map(|h| h.pid)
    }
}
