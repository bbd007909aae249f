//! # Paddle Game Client Library
//!
//! This library implements the client side of a real-time multiplayer
//! paddle game synchronized over a persistent WebSocket connection. The
//! client receives authoritative game-state snapshots from the remote
//! simulation, renders them at display rate, forwards player input with
//! minimal latency and tracks connection health.
//!
//! ## Architecture Overview
//!
//! The client is thin. It runs no game simulation of its own: every paddle
//! position, ball position and score on screen comes from the latest
//! server snapshot, applied wholesale. That keeps exactly one source of
//! truth for game rules and trades smoothness between sparse updates for
//! correctness, which is the right trade at LAN/demo scale.
//!
//! ### Snapshot-Driven Rendering
//! The server broadcasts complete snapshots; the client stores the latest
//! one and redraws from it on every display tick. Rendering cadence and
//! message arrival rate are fully decoupled: a slow stream means a stale
//! picture, never invented motion. There is no interpolation, prediction
//! or reconciliation.
//!
//! ### Server-Driven Phases
//! A match moves through waiting, starting, playing and finished phases.
//! The client never transitions on its own; whatever the most recently
//! applied `game_state` frame declares is the phase, and a per-connection
//! sequence number keeps late or reordered frames from regressing it.
//!
//! ### Latency Tracking
//! A once-per-second probe carries a monotonic microsecond timestamp and a
//! probe id; the matching reply yields the round-trip time shown in the
//! HUD. Ids make the match explicit instead of relying on probe cadence.
//!
//! ## Module Organization
//!
//! ### Session Module (`session`)
//! The state machine that owns identity, phase, the latest snapshot and
//! config, and the latency bookkeeping. Every inbound message funnels
//! through one write path.
//!
//! ### Latency Module (`latency`)
//! Probe issuance and id-correlated round-trip time computation.
//!
//! ### Network Module (`network`)
//! The WebSocket transport session and the `select!` event loop that
//! multiplexes inbound frames, timers and input on a single task.
//!
//! ### Input Module (`input`)
//! Arrow-key sampling into role-stamped `move` frames.
//!
//! ### Rendering Module (`rendering`)
//! Projection of the stored snapshot onto the 2D surface, lobby and result
//! screens, the HUD and the frame-rate counter.
//!
//! ## Failure Philosophy
//!
//! Nothing in this crate is fatal to the host process. A connection that
//! never opens, errors out or closes leaves the client rendering its last
//! known state with a status line; malformed or unrecognized frames are
//! logged, counted and dropped. There is no automatic reconnection: a dead
//! channel is terminal for the session.

pub mod input;
pub mod latency;
pub mod network;
pub mod rendering;
pub mod session;
