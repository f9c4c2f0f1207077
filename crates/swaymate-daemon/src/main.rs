use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use swaymate_core::config;
use swaymate_core::pathindex::PathWatcher;
use swaymate_core::usrcmds::CommandRegistry;
use swaymate_core::wm::sway::{subscribe_window_events, SwaymsgClient};

use swaymate_daemon::state::{
    apply_autoconfig, apply_default_keybindings, run_event_loop, seed_tracker, DaemonState,
};
use swaymate_daemon::run_server;

#[derive(Debug, Parser)]
#[command(name = "swaymate", about = "MRU window switcher daemon for sway")]
struct Args {
    /// Listen on the debug port instead of the normal one.
    #[arg(long)]
    debug: bool,

    /// Log errors only.
    #[arg(long, short)]
    quiet: bool,

    /// Install for_window rules for the picker window at startup.
    #[arg(long)]
    autoconfig: bool,

    /// Install the default picker keybindings at startup.
    #[arg(long)]
    default_keybindings: bool,

    /// Relocate the pointer to the focused window's output.
    #[arg(long)]
    mouse_follows_focus: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    swaymate_core::init_logging(args.quiet);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(event = "daemon.main.fatal", error = %e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = config::load()?;
    // CLI flags turn features on over the config file, never off
    config.autoconfig |= args.autoconfig;
    config.default_keybindings |= args.default_keybindings;
    config.mouse_follows_focus |= args.mouse_follows_focus;

    let wm = Arc::new(SwaymsgClient::new()?);
    let shutdown = CancellationToken::new();

    let mut watcher = PathWatcher::spawn_from_path_env(config.debounce(), shutdown.clone());
    watcher.watch_filesystem()?;

    let state = Arc::new(DaemonState::new(
        config.clone(),
        wm.clone(),
        watcher,
        CommandRegistry::builtin(),
    ));
    seed_tracker(&state).await;

    if config.autoconfig {
        apply_autoconfig(wm.as_ref())?;
    }
    if config.default_keybindings {
        apply_default_keybindings(wm.as_ref())?;
    }

    let events = subscribe_window_events().await?;

    let addr = config.rpc_addr(args.debug);
    let listener = TcpListener::bind(&addr).await?;
    info!(event = "daemon.main.started", addr = %addr, debug = args.debug);

    let server = tokio::spawn(run_server(state.clone(), listener, shutdown.clone()));

    let ctrl_c_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!(event = "daemon.main.interrupted");
            ctrl_c_shutdown.cancel();
        }
    });

    // the event loop owns the daemon's lifetime; losing the subscription is
    // fatal, a requested shutdown is not
    let result = run_event_loop(state, events, shutdown.clone()).await;
    shutdown.cancel();
    let _ = server.await;

    result.map_err(Into::into)
}
