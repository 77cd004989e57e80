//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGTERM, SIGINT, SIGHUP)
//! - Translate SIGTERM/SIGINT into the shutdown broadcast
//! - Translate SIGHUP into an atomic routing-state reload
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP reloads config, not shutdown; a failed reload keeps the
//!   running state
//! - The swap is a single ArcSwap store, so no request ever observes a
//!   partially updated table

use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::loader::load_config;
use crate::http::server::RouteState;
use crate::lifecycle::shutdown::Shutdown;

/// Listen for signals until shutdown.
///
/// `config_path` is the file SIGHUP re-reads; `None` disables reload
/// (the router was started on built-in defaults).
pub async fn listen(
    shutdown: Arc<Shutdown>,
    route_state: Arc<ArcSwap<RouteState>>,
    config_path: Option<PathBuf>,
) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                return;
            }
        };
        let mut sighup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGHUP handler");
                return;
            }
        };

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("SIGINT received, shutting down");
                    shutdown.trigger();
                    return;
                }
                _ = sigterm.recv() => {
                    tracing::info!("SIGTERM received, shutting down");
                    shutdown.trigger();
                    return;
                }
                _ = sighup.recv() => {
                    reload(&route_state, config_path.as_deref());
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = (route_state, config_path);
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl+C received, shutting down");
            shutdown.trigger();
        }
    }
}

/// Re-read the config file and swap in freshly compiled routing state.
#[cfg(unix)]
fn reload(route_state: &ArcSwap<RouteState>, config_path: Option<&std::path::Path>) {
    let Some(path) = config_path else {
        tracing::warn!("SIGHUP received but no config file to reload");
        return;
    };

    tracing::info!(path = %path.display(), "SIGHUP received, reloading configuration");
    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Reload failed, keeping current routing state");
            return;
        }
    };

    match RouteState::compile(&config) {
        Ok(state) => {
            route_state.store(Arc::new(state));
            tracing::info!(rules = route_state.load().rules.len(), "Routing state swapped");
        }
        Err(e) => {
            tracing::error!(error = %e, "Reload compile failed, keeping current routing state");
        }
    }
}
