//! Paddle input capture and forwarding

use macroquad::prelude::*;
use shared::{ClientMessage, MoveDirection, Role};

/// Samples the arrow keys each input tick and turns held keys into `move`
/// frames, stamped with the local role and a monotonic send time the server
/// uses for latency accounting.
///
/// Sampling at tick rate while a key is held gives key-repeat behavior.
/// There is no phase gating here: the server owns the game rules, and this
/// relay only forwards. A move does need the assigned role on the wire, so
/// nothing is sent before the first `client_id` arrives.
pub struct InputRelay;

impl InputRelay {
    pub fn new() -> Self {
        Self
    }

    /// Reads current key state and builds the frame to send, if any.
    pub fn sample(&self, role: Option<Role>, now_us: u64) -> Option<ClientMessage> {
        let up = is_key_down(KeyCode::Up);
        let down = is_key_down(KeyCode::Down);
        Self::build(up, down, role, now_us)
    }

    fn build(up: bool, down: bool, role: Option<Role>, now_us: u64) -> Option<ClientMessage> {
        let role = role?;
        let direction = match (up, down) {
            (true, false) => MoveDirection::ArrowUp,
            (false, true) => MoveDirection::ArrowDown,
            // Both keys held cancel out; neither held sends nothing.
            _ => return None,
        };
        Some(ClientMessage::Move {
            direction,
            role,
            send_time: now_us,
        })
    }
}

impl Default for InputRelay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_key_produces_move() {
        let message = InputRelay::build(true, false, Some(Role::Player1), 42).unwrap();
        match message {
            ClientMessage::Move {
                direction,
                role,
                send_time,
            } => {
                assert_eq!(direction, MoveDirection::ArrowUp);
                assert_eq!(role, Role::Player1);
                assert_eq!(send_time, 42);
            }
            other => panic!("wrong message: {:?}", other),
        }
    }

    #[test]
    fn down_key_maps_to_arrow_down() {
        let message = InputRelay::build(false, true, Some(Role::Player2), 7).unwrap();
        assert!(matches!(
            message,
            ClientMessage::Move {
                direction: MoveDirection::ArrowDown,
                role: Role::Player2,
                ..
            }
        ));
    }

    #[test]
    fn no_move_without_role() {
        assert!(InputRelay::build(true, false, None, 0).is_none());
    }

    #[test]
    fn no_move_when_idle_or_ambiguous() {
        assert!(InputRelay::build(false, false, Some(Role::Player1), 0).is_none());
        assert!(InputRelay::build(true, true, Some(Role::Player1), 0).is_none());
    }
}
