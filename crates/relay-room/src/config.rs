//! Room configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a room instance.
///
/// Missing fields fall back to their defaults when deserialized, so a
/// config file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Optional cap on simultaneous participants. Joins beyond it are
    /// refused with [`RoomError::RoomFull`](crate::RoomError::RoomFull).
    /// `None` means the room never turns anyone away.
    pub max_participants: Option<usize>,

    /// Capacity of the room task's command channel. When it fills up,
    /// callers wait, which pushes back on the reading connection only.
    pub command_buffer: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_participants: None,
            command_buffer: 64,
        }
    }
}
