//! The membership set and its fan-out loop.

use std::collections::HashMap;

use relay_protocol::Message;
use relay_transport::ConnectionId;

use crate::{Participant, Peer, RoomConfig, RoomError};

/// A snapshot of room metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomInfo {
    /// Number of participants currently joined.
    pub member_count: usize,
    /// Participant cap, if the room has one.
    pub max_participants: Option<usize>,
}

/// Membership registry and broadcast dispatcher.
///
/// Members are keyed by [`ConnectionId`], so one connection can never
/// appear twice. A `Room` has no interior mutability and no locks: it
/// is meant to be owned by exactly one task (see
/// [`spawn_room`](crate::spawn_room)), which makes every mutation
/// naturally serialized.
pub struct Room<P = Peer> {
    config: RoomConfig,
    members: HashMap<ConnectionId, P>,
}

impl<P: Participant> Room<P> {
    /// Creates an empty room.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            config,
            members: HashMap::new(),
        }
    }

    /// Adds a participant.
    ///
    /// Idempotent: joining an id that is already a member leaves the
    /// existing entry in place and returns `Ok(false)`.
    ///
    /// # Errors
    /// Returns [`RoomError::RoomFull`] if the room has a
    /// `max_participants` cap and a new member would exceed it. Without a
    /// cap this never fails.
    pub fn join(&mut self, participant: P) -> Result<bool, RoomError> {
        let id = participant.id();
        if self.members.contains_key(&id) {
            return Ok(false);
        }
        if let Some(cap) = self.config.max_participants {
            if self.members.len() >= cap {
                return Err(RoomError::RoomFull(cap));
            }
        }

        self.members.insert(id, participant);
        tracing::info!(%id, members = self.members.len(), "participant joined");
        Ok(true)
    }

    /// Removes a participant. Safe to call on a non-member; returns
    /// whether anything was removed.
    pub fn leave(&mut self, id: ConnectionId) -> bool {
        let removed = self.members.remove(&id).is_some();
        if removed {
            tracing::info!(%id, members = self.members.len(), "participant left");
        }
        removed
    }

    /// Delivers `message` to every member except `sender`.
    ///
    /// Each delivery only enqueues on the member's own queue, so this
    /// returns as soon as the loop is done. Members whose queue turns out
    /// to be closed are dropped from the room on the way. Returns the
    /// number of members the message was handed to.
    pub fn broadcast(&mut self, sender: ConnectionId, message: &Message) -> usize {
        if !self.members.contains_key(&sender) {
            tracing::warn!(%sender, "broadcast from non-member, ignoring");
            return 0;
        }

        let mut delivered = 0;
        let mut gone = Vec::new();
        for (id, member) in &self.members {
            if *id == sender {
                continue;
            }
            match member.deliver(message.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::debug!(%id, error = %e, "dropping unreachable participant");
                    gone.push(*id);
                }
            }
        }

        for id in gone {
            self.leave(id);
        }

        tracing::trace!(%sender, bytes = message.body_len(), delivered, "broadcast");
        delivered
    }

    /// Returns `true` if `id` is a member.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.members.contains_key(&id)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the room has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Snapshot of the member count and cap.
    pub fn info(&self) -> RoomInfo {
        RoomInfo {
            member_count: self.members.len(),
            max_participants: self.config.max_participants,
        }
    }
}

impl<P: Participant> Default for Room<P> {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
