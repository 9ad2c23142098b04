//! Session command.
//!
//! A session loads the stored credential and arms auto-cleanup when the
//! credential asks for it. The session ends on Ctrl-C, SIGTERM, SIGHUP
//! (terminal closed) or when `--duration` elapses; the unload hook then
//! erases the key if armed.

use std::path::Path;
use std::time::Duration;

use clap::Args;
use console::style;
use promptlab_vault::SecureStorage;
use tracing::{info, warn};

use crate::render;

/// Session command arguments.
#[derive(Args)]
pub struct SessionArgs {
    /// End the session after this many seconds instead of waiting for a signal
    #[arg(long)]
    pub duration: Option<u64>,
}

/// Signals that end a session.
///
/// Unix handlers are installed up front so a signal arriving before the
/// wait starts still ends the session cleanly.
struct EndSignals {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
    #[cfg(unix)]
    hangup: tokio::signal::unix::Signal,
}

impl EndSignals {
    fn install() -> std::io::Result<Self> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            Ok(Self {
                terminate: signal(SignalKind::terminate())?,
                hangup: signal(SignalKind::hangup())?,
            })
        }
        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    /// Wait for the first end signal and name it.
    async fn recv(&mut self) -> &'static str {
        #[cfg(unix)]
        {
            tokio::select! {
                Ok(()) = tokio::signal::ctrl_c() => "interrupt",
                _ = self.terminate.recv() => "terminate",
                _ = self.hangup.recv() => "hangup",
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
            "interrupt"
        }
    }
}

/// Run the session command.
pub async fn run(args: SessionArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = crate::load_config(config_path)?;
    let store = SecureStorage::from_config(&config)
        .map_err(|e| anyhow::anyhow!("Failed to open credential store: {}", e))?;
    let mut signals = EndSignals::install()
        .map_err(|e| anyhow::anyhow!("Failed to install signal handlers: {}", e))?;

    match store.rehydrate().await {
        Some(credential) => {
            println!("Session started.");
            render::print_credential(&credential);
        }
        None => println!("Session started with no API key stored."),
    }

    let reason = match args.duration {
        Some(secs) => {
            tokio::select! {
                reason = signals.recv() => reason,
                _ = tokio::time::sleep(Duration::from_secs(secs)) => "duration elapsed",
            }
        }
        None => {
            println!("Press Ctrl-C to end the session.");
            signals.recv().await
        }
    };
    info!(reason, "session ending");

    if store.on_unload().await {
        println!(
            "{} Session ended. Stored API key erased.",
            style(render::CHECK).green()
        );
    } else if store.auto_cleanup_enabled() {
        warn!("auto-cleanup could not erase the stored credential");
        anyhow::bail!(
            "{} Session ended but the stored API key could not be erased. \
             Run `promptlab key remove` to retry.",
            style(render::WARN).yellow()
        );
    } else {
        println!("Session ended.");
    }
    Ok(())
}
