//! Session state machine: the single owner of all mutable session state.
//!
//! Every inbound server message funnels through [`Session::apply`], which is
//! the only write path for identity, phase, the latest snapshot, the applied
//! field config and the latency bookkeeping. The render and input paths only
//! read, between events, so no synchronization is needed on top of the
//! single-task event loop.

use crate::latency::LatencyTracker;
use log::{debug, info, warn};
use shared::{ClientMessage, GameConfig, RemoteState, Role, ServerMessage, SessionPhase, WinReason};

/// Lifecycle of the one transport connection. Terminal states stay terminal;
/// there is no reconnection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected,
    Error,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "Connecting to server",
            ConnectionStatus::Connected => "Connected to server",
            ConnectionStatus::Disconnected => "Disconnected",
            ConnectionStatus::Error => "Error connecting to server",
        }
    }
}

/// Server-assigned identity. Immutable between `client_id` frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub role: Role,
    pub display_name: String,
}

/// What [`Session::apply`] did with a message, observable for tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The message changed session state.
    Applied,
    /// A `game_state` whose sequence number was not greater than the last
    /// applied one; dropped without touching state.
    Stale,
    /// A pong that matched no outstanding probe; dropped.
    Unmatched,
}

pub struct Session {
    local_name: String,
    status: ConnectionStatus,
    identity: Option<Identity>,
    phase: SessionPhase,
    snapshot: Option<RemoteState>,
    config: Option<GameConfig>,
    last_seq: u64,
    ignored_frames: u64,
    tracker: LatencyTracker,
}

impl Session {
    pub fn new(local_name: &str) -> Self {
        Self {
            local_name: local_name.to_string(),
            status: ConnectionStatus::Connecting,
            identity: None,
            phase: SessionPhase::Waiting,
            snapshot: None,
            config: None,
            last_seq: 0,
            ignored_frames: 0,
            tracker: LatencyTracker::new(),
        }
    }

    /// Applies one classified server message. `now_us` is the monotonic
    /// microsecond clock reading at receipt, used for RTT samples.
    pub fn apply(&mut self, message: ServerMessage, now_us: u64) -> ApplyOutcome {
        match message {
            ServerMessage::ClientId { role, name } => {
                let display_name = name.unwrap_or_else(|| self.local_name.clone());
                let identity = Identity { role, display_name };
                if self.identity.as_ref() == Some(&identity) {
                    debug!("identity re-assignment is a no-op");
                } else {
                    info!("assigned role {} as \"{}\"", role, identity.display_name);
                }
                self.identity = Some(identity);
                ApplyOutcome::Applied
            }

            ServerMessage::GameState { seq, state, config } => {
                if seq <= self.last_seq {
                    warn!(
                        "dropping stale game_state (seq {} <= last applied {})",
                        seq, self.last_seq
                    );
                    self.ignored_frames += 1;
                    return ApplyOutcome::Stale;
                }

                // Config travels with the snapshot and must be in effect
                // before any of that snapshot's geometry is drawn.
                if let Some(config) = config {
                    if self.config != Some(config) {
                        info!(
                            "field config applied: {}x{}",
                            config.field_width, config.field_height
                        );
                    }
                    self.config = Some(config);
                }

                if state.state != self.phase {
                    info!("phase {} -> {}", self.phase, state.state);
                }
                self.phase = state.state;
                self.snapshot = Some(state);
                self.last_seq = seq;
                ApplyOutcome::Applied
            }

            ServerMessage::Pong {
                original_timestamp,
                probe_id,
            } => match self.tracker.on_pong(original_timestamp, probe_id, now_us) {
                Some(rtt_us) => {
                    debug!("rtt {:.2} ms", rtt_us as f64 / 1000.0);
                    ApplyOutcome::Applied
                }
                None => {
                    self.ignored_frames += 1;
                    ApplyOutcome::Unmatched
                }
            },
        }
    }

    /// Records a frame the transport boundary rejected as malformed or
    /// unrecognized. Counted so drops stay observable.
    pub fn note_rejected(&mut self) {
        self.ignored_frames += 1;
    }

    /// Builds the next latency probe, stamped with the given clock reading.
    pub fn start_probe(&mut self, now_us: u64) -> ClientMessage {
        self.tracker.start_probe(now_us)
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn set_status(&mut self, status: ConnectionStatus) {
        if self.status != status {
            info!("connection status: {}", status.label());
        }
        self.status = status;
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.identity.as_ref().map(|identity| identity.role)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn snapshot(&self) -> Option<&RemoteState> {
        self.snapshot.as_ref()
    }

    pub fn config(&self) -> Option<&GameConfig> {
        self.config.as_ref()
    }

    pub fn ignored_frames(&self) -> u64 {
        self.ignored_frames
    }

    pub fn rtt_display(&self) -> String {
        self.tracker.display()
    }

    /// Whole seconds left on the starting countdown, rounded up. Recomputed
    /// from the latest snapshot on every call; never locally ticked, so a
    /// stalled stream freezes the displayed number rather than drifting.
    pub fn countdown_seconds(&self, now_ms: u64) -> Option<u64> {
        if self.phase != SessionPhase::Starting {
            return None;
        }
        let start_time = self.snapshot.as_ref()?.start_time?;
        let remaining_ms = start_time.saturating_sub(now_ms);
        Some(remaining_ms.div_ceil(1000))
    }

    /// Result line for the finished phase. Win iff the announced winner
    /// equals the local role; always carries the final score.
    pub fn result_text(&self) -> Option<String> {
        if self.phase != SessionPhase::Finished {
            return None;
        }
        let snapshot = self.snapshot.as_ref()?;
        let winner = snapshot.winner?;
        let won = self.role() == Some(winner);
        let mut text = if won {
            format!("You win! Final score: {} - {}", snapshot.score1, snapshot.score2)
        } else {
            format!("You lose! Final score: {} - {}", snapshot.score1, snapshot.score2)
        };
        if snapshot.win_reason == Some(WinReason::OpponentDisconnected) {
            text.push_str(" (opponent disconnected)");
        }
        Some(text)
    }
}
