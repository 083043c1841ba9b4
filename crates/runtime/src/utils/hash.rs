//! Short state fingerprints for logs.

use hexline_core::GameState;

/// First eight bytes of the state digest as hex, for compact logging.
pub fn short_digest(state: &GameState) -> String {
    hex::encode(&state.digest()[..8])
}
