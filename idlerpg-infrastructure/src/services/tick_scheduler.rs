use std::time::Duration;

use chrono::Utc;
use tracing::{error, info};

use idlerpg_application::commands::channel_commands::discover_all_channels;
use idlerpg_application::commands::run_tick;
use idlerpg_application::AppState;

/// Game clock. Resolves channels once, then runs a tick, waits for it to
/// settle and sleeps the configured interval, forever.
pub async fn schedule_ticks(state: AppState) {
    discover_all_channels(&state).await;

    let interval = Duration::from_secs(state.config.tick_interval_seconds.max(1));
    info!("tick loop started, interval {:?}", interval);
    loop {
        if let Err(err) = run_tick(&state, Utc::now()).await {
            state.metrics.record_tick_error();
            error!("tick failed: {}", err);
        }
        tokio::time::sleep(interval).await;
    }
}
