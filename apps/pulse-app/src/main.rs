//! # Pulse
//!
//! Opens the home feed and logs every state it goes through until Ctrl-C.

use anyhow::Context;

use pulse_app::config::AppConfig;
use pulse_app::render;
use pulse_app::screens::HomefeedScreen;
use pulse_app::state::AppState;
use pulse_app::telemetry::{TelemetryConfig, init_telemetry};
use pulse_core::domain::Post;
use pulse_shared::ViewState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    tracing::info!(backend = ?config.backend, seed = config.seed, "Starting Pulse");

    let state = AppState::new(&config)
        .await
        .context("failed to build application state")?;

    let feed = HomefeedScreen::open(&state);
    let mut states = feed.state();
    let mut notices = feed.notices().context("home feed notices already taken")?;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    log_feed(&states.borrow_and_update());
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = states.borrow_and_update().clone();
                log_feed(&current);
            }
            Some(notice) = notices.recv() => {
                tracing::info!(notice = %render::notice(&notice), "Notice");
            }
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}

fn log_feed(state: &ViewState<Vec<Post>>) {
    match serde_json::to_string(state) {
        Ok(json) => tracing::debug!(state = %json, "Feed state"),
        Err(e) => tracing::warn!(error = %e, "Feed state is not serializable"),
    }
    for line in render::feed(state) {
        tracing::info!("{line}");
    }
}
