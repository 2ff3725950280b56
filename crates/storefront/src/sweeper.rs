//! Background removal of carts whose sessions have expired.
//!
//! Sessions expire after `session_expiry` of inactivity, and the cart record
//! keyed from a session is touched by every cart request in it. A record idle
//! for longer than the session expiry can no longer be reached, so the sweep
//! deletes it.

use shopcart_store::CartStorage;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument};

use crate::state::AppState;

/// Spawn the periodic idle cart sweep.
///
/// The task runs until the runtime shuts down or the handle is aborted.
pub fn spawn_cart_sweeper(state: AppState) -> JoinHandle<()> {
    let every = state.config().cart_sweep_interval;
    info!(interval_secs = every.as_secs(), "Spawning idle cart sweeper");

    tokio::spawn(async move {
        let mut ticks = tokio::time::interval(every);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; nothing can be idle yet.
        ticks.tick().await;
        loop {
            ticks.tick().await;
            sweep_idle_carts(&state).await;
        }
    })
}

/// Delete every cart record idle for longer than the session expiry.
///
/// Returns the number of records deleted. Storage failures are logged and
/// count as nothing deleted.
#[instrument(skip_all)]
pub async fn sweep_idle_carts(state: &AppState) -> usize {
    let max_idle = state.config().session_expiry;
    let _guard = state.lock_writes().await;

    match state.storage().purge_idle(max_idle) {
        Ok(0) => {
            debug!("No idle carts to remove");
            0
        }
        Ok(removed) => {
            info!(removed, "Removed idle carts");
            removed
        }
        Err(e) => {
            error!(error = %e, "Failed to sweep idle carts");
            0
        }
    }
}
