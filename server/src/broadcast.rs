//! Best-effort event fanout to connected clients
//!
//! Events are serialized once and pushed onto each connection's outbound
//! channel. Delivery is at-most-once with no retry or buffering beyond the
//! channel itself; a recipient whose writer task has died is skipped without
//! affecting the others or the caller.

use crate::game::SharedMatch;
use crate::session::ConnectionHandle;
use log::{debug, error};
use shared::ServerEvent;

/// Sends an event to every handle in the list. Per-recipient failures are
/// swallowed.
pub fn notify_all(handles: &[ConnectionHandle], event: &ServerEvent) {
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to serialize event: {}", e);
            return;
        }
    };

    for handle in handles {
        if handle.send(text.clone()).is_err() {
            debug!("Dropping event for closed connection");
        }
    }
}

/// Sends an event to a single connection, ignoring a closed channel.
pub fn notify_one(handle: &ConnectionHandle, event: &ServerEvent) {
    notify_all(std::slice::from_ref(handle), event);
}

/// Broadcasts an event to all currently-connected players. The handle list
/// is captured under the match lock and the sends happen after release.
pub async fn broadcast(state: &SharedMatch, event: &ServerEvent) {
    let handles = {
        let state = state.lock().await;
        state.players.connected_handles()
    };
    notify_all(&handles, event);
}
