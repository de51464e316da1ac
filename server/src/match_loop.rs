//! Fixed-rate match loop
//!
//! A single process-lifetime task drives the simulation: every tick it takes
//! the shared lock, steps the physics while a rally is running, builds the
//! snapshot, then fans it out after releasing the lock. Pacing is self-timed:
//! each iteration sleeps for the period minus the time the tick itself took,
//! so jitter never accumulates across ticks.
//!
//! The loop never terminates. With nobody connected it idles through ticks
//! with `running` false and an empty recipient list.

use crate::broadcast;
use crate::game::SharedMatch;
use crate::physics;
use log::info;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Runs the match loop at the given tick rate. Intended to be spawned once
/// at process start.
pub async fn run(state: SharedMatch, tick_rate: u32) {
    let period = Duration::from_secs_f64(1.0 / f64::from(tick_rate));
    info!("Match loop running at {} Hz", tick_rate);

    loop {
        let tick_start = Instant::now();

        let (snapshot, handles) = {
            let mut state = state.lock().await;
            if state.running {
                if let Some(scorer) = physics::advance(&mut state) {
                    info!(
                        "{} scores, rally over ({} - {})",
                        scorer, state.score.p1, state.score.p2
                    );
                }
            }
            (state.snapshot(), state.players.connected_handles())
        };

        broadcast::notify_all(&handles, &snapshot);

        sleep(period.saturating_sub(tick_start.elapsed())).await;
    }
}
