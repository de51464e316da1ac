//! # Pong Game Server Library
//!
//! Authoritative real-time server for two-player Pong over WebSockets. The
//! server owns all mutable game state; clients only send paddle-movement and
//! control intents and render the snapshots they are sent back.
//!
//! ## Architecture
//!
//! One [`game::MatchState`] instance lives for the whole process behind a
//! single `tokio::sync::Mutex`. Three kinds of tasks share it:
//!
//! - the **match loop** ([`match_loop`]), a process-lifetime task stepping
//!   the physics at a fixed 60 Hz and broadcasting a snapshot each tick;
//! - one **connection handler** per client ([`connection`]), attaching a
//!   player slot, applying intents under the lock, and driving the
//!   countdown-then-serve transition;
//! - short-lived **writer tasks**, one per connection, draining an outbound
//!   channel into the socket so no lock holder ever blocks on I/O.
//!
//! Every read-modify-write that spans more than one field holds the lock for
//! the whole sequence. The one deliberate exception is the pre-rally
//! countdown pause, which releases the lock so paddle moves keep flowing.
//!
//! No failure of a single connection is fatal: send errors are swallowed
//! per-recipient, receive errors only detach that player's slot, and the
//! match loop never stops.

pub mod broadcast;
pub mod connection;
pub mod game;
pub mod match_loop;
pub mod physics;
pub mod session;
