//! Authoritative match state
//!
//! One [`MatchState`] exists for the lifetime of the process. The match loop
//! and every connection handler share it behind a single [`tokio::sync::Mutex`];
//! that lock is the sole correctness mechanism for all cross-field mutations.

use crate::session::SessionRegistry;
use shared::{BallPos, Paddle, PlayerSide, Score, ServerEvent, BALL_SIZE, BALL_SPEED, BOARD_HEIGHT, BOARD_WIDTH};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Ball position and velocity in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl Ball {
    /// A ball centered on the board, serving toward p2 with no vertical drift.
    pub fn centered() -> Self {
        Self {
            x: BOARD_WIDTH / 2.0 - BALL_SIZE / 2.0,
            y: BOARD_HEIGHT / 2.0 - BALL_SIZE / 2.0,
            vx: BALL_SPEED,
            vy: 0.0,
        }
    }
}

/// The single shared-mutable-state domain: ball, score, running flag, and
/// both player slots.
#[derive(Debug)]
pub struct MatchState {
    pub ball: Ball,
    pub score: Score,
    pub running: bool,
    pub players: SessionRegistry,
}

pub type SharedMatch = Arc<Mutex<MatchState>>;

impl MatchState {
    pub fn new() -> Self {
        Self {
            ball: Ball::centered(),
            score: Score::default(),
            running: false,
            players: SessionRegistry::new(),
        }
    }

    pub fn new_shared() -> SharedMatch {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Builds the immutable per-tick snapshot broadcast to both clients.
    pub fn snapshot(&self) -> ServerEvent {
        ServerEvent::State {
            ball: BallPos {
                x: self.ball.x,
                y: self.ball.y,
            },
            p1: Paddle {
                y: self.players.slot(PlayerSide::P1).paddle_y,
            },
            p2: Paddle {
                y: self.players.slot(PlayerSide::P2).paddle_y,
            },
            score: self.score,
            running: self.running,
            ready: self.players.ready_flags(),
        }
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}
