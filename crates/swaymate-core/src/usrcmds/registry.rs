//! Explicit registry of user commands and window-event listeners.
//!
//! Populated once at startup; no load-time self-registration, so command
//! availability is visible at the construction site.

use std::collections::HashMap;

use tracing::info;

use crate::tracker::WindowRecord;
use crate::usrcmds::api::DaemonApi;
use crate::usrcmds::builtin;
use crate::usrcmds::errors::UsrCmdError;
use crate::wm::WindowChange;

pub type UserFn =
    Box<dyn Fn(&mut dyn DaemonApi, &HashMap<String, String>) -> Result<String, UsrCmdError> + Send + Sync>;
pub type ListenerFn = Box<dyn Fn(&mut dyn DaemonApi, &WindowRecord) + Send + Sync>;

#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, UserFn>,
    listeners: HashMap<WindowChange, Vec<ListenerFn>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in commands installed.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("resize-toggle", Box::new(builtin::resize_toggle));
        registry.register("titlebar-toggle", Box::new(builtin::titlebar_toggle));
        registry
    }

    pub fn register(&mut self, name: &str, command: UserFn) {
        info!(event = "core.usrcmds.registered", name);
        self.commands.insert(name.to_string(), command);
    }

    pub fn add_listener(&mut self, change: WindowChange, listener: ListenerFn) {
        self.listeners.entry(change).or_default().push(listener);
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    /// Invoke a registered command, relaying its output or error verbatim.
    pub fn run(
        &self,
        name: &str,
        api: &mut dyn DaemonApi,
        args: &HashMap<String, String>,
    ) -> Result<String, UsrCmdError> {
        let command = self
            .commands
            .get(name)
            .ok_or_else(|| UsrCmdError::UnknownCommand {
                name: name.to_string(),
            })?;
        command(api, args)
    }

    /// Invoke every listener registered for a window-event kind.
    pub fn notify(&self, change: WindowChange, api: &mut dyn DaemonApi, record: &WindowRecord) {
        if let Some(listeners) = self.listeners.get(&change) {
            for listener in listeners {
                listener(api, record);
            }
        }
    }
}
