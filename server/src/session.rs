//! Player slot management for the two fixed sides of the board
//!
//! The registry owns exactly two slots, `p1` and `p2`. Slots are created once
//! and reused across connect/disconnect cycles; identity is the side label,
//! not the connection. Every mutator here must be called while holding the
//! shared match lock.

use log::info;
use shared::{clamp_paddle_y, PlayerSide, ReadyFlags, BOARD_HEIGHT, PADDLE_HEIGHT};
use tokio::sync::mpsc;

/// Outbound channel handle for one connection. The receiving end is drained
/// by the connection's writer task, so sends never block the lock holder.
pub type ConnectionHandle = mpsc::UnboundedSender<String>;

/// State of one player slot.
///
/// `handle` is present iff `connected` is true; it is installed on join and
/// cleared on leave or receive error. `ready` is cleared on disconnect and
/// whenever a rally ends.
#[derive(Debug)]
pub struct PlayerSlot {
    handle: Option<ConnectionHandle>,
    pub connected: bool,
    pub paddle_y: f64,
    pub ready: bool,
}

impl PlayerSlot {
    fn new() -> Self {
        Self {
            handle: None,
            connected: false,
            paddle_y: BOARD_HEIGHT / 2.0 - PADDLE_HEIGHT / 2.0,
            ready: false,
        }
    }

    pub fn handle(&self) -> Option<&ConnectionHandle> {
        self.handle.as_ref()
    }
}

/// The two addressable player slots.
#[derive(Debug)]
pub struct SessionRegistry {
    p1: PlayerSlot,
    p2: PlayerSlot,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            p1: PlayerSlot::new(),
            p2: PlayerSlot::new(),
        }
    }

    pub fn slot(&self, side: PlayerSide) -> &PlayerSlot {
        match side {
            PlayerSide::P1 => &self.p1,
            PlayerSide::P2 => &self.p2,
        }
    }

    pub fn slot_mut(&mut self, side: PlayerSide) -> &mut PlayerSlot {
        match side {
            PlayerSide::P1 => &mut self.p1,
            PlayerSide::P2 => &mut self.p2,
        }
    }

    /// Installs a connection handle on a slot. Re-attachment overwrites any
    /// stale handle left by an abrupt disconnect.
    pub fn attach(&mut self, side: PlayerSide, handle: ConnectionHandle) {
        let slot = self.slot_mut(side);
        slot.handle = Some(handle);
        slot.connected = true;
        slot.ready = false;
        info!("{} connected", side);
    }

    /// Clears a slot's connection handle and ready flag. The paddle position
    /// is kept so a reconnecting player resumes where they left off.
    pub fn detach(&mut self, side: PlayerSide) {
        let slot = self.slot_mut(side);
        slot.handle = None;
        slot.connected = false;
        slot.ready = false;
        info!("{} disconnected", side);
    }

    /// Stores a clamped paddle position for the given side.
    pub fn set_paddle_y(&mut self, side: PlayerSide, y: f64) {
        self.slot_mut(side).paddle_y = clamp_paddle_y(y);
    }

    pub fn both_connected(&self) -> bool {
        self.p1.connected && self.p2.connected
    }

    pub fn both_ready(&self) -> bool {
        self.p1.ready && self.p2.ready
    }

    /// Clears both ready flags; both players must re-ready after a rally ends.
    pub fn clear_ready(&mut self) {
        self.p1.ready = false;
        self.p2.ready = false;
    }

    pub fn ready_flags(&self) -> ReadyFlags {
        ReadyFlags {
            p1: self.p1.ready,
            p2: self.p2.ready,
        }
    }

    /// Snapshot of the outbound handles of all currently-connected slots.
    pub fn connected_handles(&self) -> Vec<ConnectionHandle> {
        PlayerSide::BOTH
            .iter()
            .filter_map(|&side| self.slot(side).handle.clone())
            .collect()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
