//! Wire protocol and board geometry shared between the server and its clients
//!
//! All traffic is JSON text frames tagged with a `type` field. Clients send
//! [`ClientMessage`] intents (paddle moves, ready-up, liveness pings) and the
//! server answers with [`ServerEvent`]s, the most frequent being the per-tick
//! `state` snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const BOARD_WIDTH: f64 = 900.0;
pub const BOARD_HEIGHT: f64 = 500.0;
pub const PADDLE_WIDTH: f64 = 14.0;
pub const PADDLE_HEIGHT: f64 = 100.0;
pub const BALL_SIZE: f64 = 14.0;
pub const BALL_SPEED: f64 = 6.0;
pub const TICK_RATE: u32 = 60;

/// One of the two fixed player identities.
///
/// A side is a slot label, not a connection: the same side is reused across
/// connect/disconnect cycles of the client that plays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerSide {
    P1,
    P2,
}

impl PlayerSide {
    pub const BOTH: [PlayerSide; 2] = [PlayerSide::P1, PlayerSide::P2];

    pub fn as_str(self) -> &'static str {
        match self {
            PlayerSide::P1 => "p1",
            PlayerSide::P2 => "p2",
        }
    }

    pub fn opponent(self) -> PlayerSide {
        match self {
            PlayerSide::P1 => PlayerSide::P2,
            PlayerSide::P2 => PlayerSide::P1,
        }
    }
}

impl fmt::Display for PlayerSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerSide {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "p1" => Ok(PlayerSide::P1),
            "p2" => Ok(PlayerSide::P2),
            _ => Err(()),
        }
    }
}

/// Ball position as broadcast in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallPos {
    pub x: f64,
    pub y: f64,
}

/// Vertical paddle position of one player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub y: f64,
}

/// Rally score per side. Monotonically non-decreasing; never reset between
/// rallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub p1: u32,
    pub p2: u32,
}

impl Score {
    pub fn get(&self, side: PlayerSide) -> u32 {
        match side {
            PlayerSide::P1 => self.p1,
            PlayerSide::P2 => self.p2,
        }
    }

    pub fn award(&mut self, side: PlayerSide) {
        match side {
            PlayerSide::P1 => self.p1 += 1,
            PlayerSide::P2 => self.p2 += 1,
        }
    }
}

/// Ready-up flags per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyFlags {
    pub p1: bool,
    pub p2: bool,
}

/// Server-to-client events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerEvent {
    /// Per-tick snapshot, broadcast to all connected clients.
    State {
        ball: BallPos,
        p1: Paddle,
        p2: Paddle,
        score: Score,
        running: bool,
        ready: ReadyFlags,
    },
    /// Join/leave notice, broadcast to all.
    Info { msg: String },
    /// Pre-match countdown, broadcast to all.
    Countdown { n: u32 },
    /// Rally begins, broadcast to all.
    Started,
    /// Sender-only: the other player is not ready yet.
    Waiting { msg: String },
    /// Sender-only reply to `ping`.
    Pong,
    /// Sent once to a rejected connection before closure.
    Error { msg: String },
}

/// Client-to-server intents.
///
/// Unknown `type` tags deserialize to [`ClientMessage::Unknown`] so new
/// client message kinds stay a forward-compatible no-op on old servers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Move the sender's paddle; the server clamps into the board.
    Move { y: f64 },
    /// Mark the sender ready to start a rally.
    Start,
    /// Liveness probe, answered with `pong`.
    Ping,
    #[serde(other)]
    Unknown,
}

/// Clamps a paddle position so the whole paddle stays on the board.
pub fn clamp_paddle_y(y: f64) -> f64 {
    y.clamp(0.0, BOARD_HEIGHT - PADDLE_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_side_labels() {
        assert_eq!(PlayerSide::P1.to_string(), "p1");
        assert_eq!(PlayerSide::P2.to_string(), "p2");
        assert_eq!("p1".parse::<PlayerSide>(), Ok(PlayerSide::P1));
        assert_eq!("p2".parse::<PlayerSide>(), Ok(PlayerSide::P2));
        assert!("p3".parse::<PlayerSide>().is_err());
        assert!("".parse::<PlayerSide>().is_err());
    }

    #[test]
    fn test_player_side_opponent() {
        assert_eq!(PlayerSide::P1.opponent(), PlayerSide::P2);
        assert_eq!(PlayerSide::P2.opponent(), PlayerSide::P1);
    }

    #[test]
    fn test_score_award() {
        let mut score = Score::default();
        score.award(PlayerSide::P2);
        score.award(PlayerSide::P2);
        score.award(PlayerSide::P1);
        assert_eq!(score.get(PlayerSide::P1), 1);
        assert_eq!(score.get(PlayerSide::P2), 2);
    }

    #[test]
    fn test_clamp_paddle_y_bounds() {
        assert_eq!(clamp_paddle_y(-50.0), 0.0);
        assert_eq!(clamp_paddle_y(0.0), 0.0);
        assert_eq!(clamp_paddle_y(250.0), 250.0);
        assert_eq!(clamp_paddle_y(1e9), BOARD_HEIGHT - PADDLE_HEIGHT);
        assert_eq!(clamp_paddle_y(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_client_message_wire_shapes() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"move","y":120.5}"#).unwrap();
        assert_eq!(msg, ClientMessage::Move { y: 120.5 });

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"start"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Start);

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Ping);
    }

    #[test]
    fn test_unknown_client_message_is_noop_variant() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"chat"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Unknown);

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"pause"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Unknown);
    }

    #[test]
    fn test_malformed_client_message_is_error() {
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"y":1}"#).is_err());
    }

    #[test]
    fn test_server_event_tags() {
        let json = serde_json::to_string(&ServerEvent::Started).unwrap();
        assert_eq!(json, r#"{"type":"started"}"#);

        let json = serde_json::to_string(&ServerEvent::Pong).unwrap();
        assert_eq!(json, r#"{"type":"pong"}"#);

        let json = serde_json::to_string(&ServerEvent::Countdown { n: 3 }).unwrap();
        assert_eq!(json, r#"{"type":"countdown","n":3}"#);

        let json = serde_json::to_string(&ServerEvent::Info {
            msg: "p1 joined".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"info","msg":"p1 joined"}"#);
    }

    #[test]
    fn test_state_event_wire_shape() {
        let event = ServerEvent::State {
            ball: BallPos { x: 443.0, y: 243.0 },
            p1: Paddle { y: 200.0 },
            p2: Paddle { y: 200.0 },
            score: Score { p1: 0, p2: 0 },
            running: false,
            ready: ReadyFlags {
                p1: false,
                p2: false,
            },
        };

        let json = serde_json::to_string(&event).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "state");
        assert_eq!(value["ball"]["x"], 443.0);
        assert_eq!(value["p1"]["y"], 200.0);
        assert_eq!(value["score"]["p2"], 0);
        assert_eq!(value["running"], false);
        assert_eq!(value["ready"]["p1"], false);

        let back: ServerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
