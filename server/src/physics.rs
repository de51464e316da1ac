//! Ball physics and collision resolution
//!
//! [`advance`] is a pure state step: it integrates the ball, bounces it off
//! the horizontal walls, resolves paddle hits, and detects scoring. It is
//! called once per tick by the match loop while a rally is running, with the
//! shared lock held.
//!
//! Each paddle hit adds a flat [`SPEEDUP`] to the horizontal speed with no
//! cap; a long rally keeps escalating. That growth is deliberate.

use crate::game::{Ball, MatchState};
use rand::Rng;
use shared::{PlayerSide, BALL_SIZE, BALL_SPEED, BOARD_HEIGHT, BOARD_WIDTH, PADDLE_HEIGHT, PADDLE_WIDTH};
use std::time::{SystemTime, UNIX_EPOCH};

/// Flat horizontal speed gain per paddle hit.
pub const SPEEDUP: f64 = 0.2;
/// Vertical deflection per unit of offset between ball center and paddle center.
pub const DEFLECTION: f64 = 0.08;

/// Which side the ball is served toward after a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Serve {
    TowardP1,
    TowardP2,
}

impl Serve {
    /// Sign of the serve's x-velocity; p2 defends the right side.
    pub fn sign(self) -> f64 {
        match self {
            Serve::TowardP1 => -1.0,
            Serve::TowardP2 => 1.0,
        }
    }

    /// Picks a serve direction from wall-clock second parity.
    pub fn from_clock() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        if secs % 2 == 0 {
            Serve::TowardP2
        } else {
            Serve::TowardP1
        }
    }
}

/// Advances the simulation by one tick. Returns the scorer if this step
/// ended the rally.
///
/// Order of resolution matches a single frame: integrate, wall bounce,
/// paddle hits, then scoring. A scoring step resets the ball toward the
/// fixed per-branch direction, stops the rally, and clears both ready flags.
pub fn advance(state: &mut MatchState) -> Option<PlayerSide> {
    let (p1_y, p1_connected) = {
        let slot = state.players.slot(PlayerSide::P1);
        (slot.paddle_y, slot.connected)
    };
    let (p2_y, p2_connected) = {
        let slot = state.players.slot(PlayerSide::P2);
        (slot.paddle_y, slot.connected)
    };

    let ball = &mut state.ball;
    ball.x += ball.vx;
    ball.y += ball.vy;

    // Top and bottom walls are always bouncy, whoever is connected.
    if ball.y < 0.0 {
        ball.y = 0.0;
        ball.vy = -ball.vy;
    }
    if ball.y > BOARD_HEIGHT - BALL_SIZE {
        ball.y = BOARD_HEIGHT - BALL_SIZE;
        ball.vy = -ball.vy;
    }

    // Left paddle (p1). A disconnected side leaves its goal open.
    if ball.x <= PADDLE_WIDTH
        && p1_connected
        && ball.y + BALL_SIZE >= p1_y
        && ball.y <= p1_y + PADDLE_HEIGHT
    {
        ball.x = PADDLE_WIDTH;
        ball.vx = ball.vx.abs() + SPEEDUP;
        ball.vy = DEFLECTION * ((ball.y + BALL_SIZE / 2.0) - (p1_y + PADDLE_HEIGHT / 2.0));
    }

    // Right paddle (p2).
    if ball.x + BALL_SIZE >= BOARD_WIDTH - PADDLE_WIDTH
        && p2_connected
        && ball.y + BALL_SIZE >= p2_y
        && ball.y <= p2_y + PADDLE_HEIGHT
    {
        ball.x = BOARD_WIDTH - PADDLE_WIDTH - BALL_SIZE;
        ball.vx = -ball.vx.abs() - SPEEDUP;
        ball.vy = DEFLECTION * ((ball.y + BALL_SIZE / 2.0) - (p2_y + PADDLE_HEIGHT / 2.0));
    }

    // Scoring. The two exits are mutually exclusive within one step.
    if state.ball.x < -BALL_SIZE {
        state.score.award(PlayerSide::P2);
        reset_ball(&mut state.ball, Serve::TowardP2);
        state.running = false;
        state.players.clear_ready();
        return Some(PlayerSide::P2);
    }
    if state.ball.x > BOARD_WIDTH + BALL_SIZE {
        state.score.award(PlayerSide::P1);
        reset_ball(&mut state.ball, Serve::TowardP1);
        state.running = false;
        state.players.clear_ready();
        return Some(PlayerSide::P1);
    }

    None
}

/// Recenters the ball and serves it toward the given side at base speed,
/// with a small random vertical component to vary the opening angle.
pub fn reset_ball(ball: &mut Ball, serve: Serve) {
    ball.x = BOARD_WIDTH / 2.0 - BALL_SIZE / 2.0;
    ball.y = BOARD_HEIGHT / 2.0 - BALL_SIZE / 2.0;
    ball.vx = BALL_SPEED * serve.sign();
    ball.vy = rand::thread_rng().gen_range(-2.0..2.0);
}
