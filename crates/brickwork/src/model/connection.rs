//! Typed connection points and the graph linking them.
//!
//! Statement blocks chain through [`ConnectionKind::NextStatement`] and
//! [`ConnectionKind::PreviousStatement`]; value blocks plug their
//! [`ConnectionKind::OutputValue`] into an input's
//! [`ConnectionKind::InputValue`]. A link is always stored on both sides.

use std::fmt;

use log::debug;
use slab::Slab;
use thiserror::Error;

use super::{BlockId, InputId};

arena_id!(
    /// Handle to a [`Connection`] stored in a [`ConnectionGraph`].
    ConnectionId
);

/// Errors raised when linking connections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("cannot link {kind} to {target}")]
    IncompatibleKinds {
        kind: ConnectionKind,
        target: ConnectionKind,
    },

    #[error("{0} is already connected")]
    AlreadyConnected(ConnectionId),

    #[error("cannot connect a block to itself")]
    SameBlock,

    #[error("connecting would create a cycle")]
    WouldCreateCycle,

    #[error("unknown connection {0}")]
    UnknownConnection(ConnectionId),
}

/// The four connection kinds, forming two complementary pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    InputValue,
    OutputValue,
    NextStatement,
    PreviousStatement,
}

impl ConnectionKind {
    /// Returns the only kind this kind can link to.
    pub fn complement(self) -> Self {
        match self {
            Self::InputValue => Self::OutputValue,
            Self::OutputValue => Self::InputValue,
            Self::NextStatement => Self::PreviousStatement,
            Self::PreviousStatement => Self::NextStatement,
        }
    }

    pub fn can_link_to(self, other: Self) -> bool {
        self.complement() == other
    }

    /// True for the side that belongs to the block being plugged in or
    /// stacked below, as opposed to the side that receives it.
    pub fn is_child_side(self) -> bool {
        matches!(self, Self::OutputValue | Self::PreviousStatement)
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InputValue => "input value",
            Self::OutputValue => "output value",
            Self::NextStatement => "next statement",
            Self::PreviousStatement => "previous statement",
        };
        f.write_str(name)
    }
}

/// What a connection is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionOwner {
    Block(BlockId),
    Input(InputId),
}

#[derive(Debug, Clone)]
pub struct Connection {
    kind: ConnectionKind,
    owner: ConnectionOwner,
    linked_to: Option<ConnectionId>,
}

impl Connection {
    pub fn kind(&self) -> ConnectionKind {
        self.kind
    }

    pub fn owner(&self) -> ConnectionOwner {
        self.owner
    }

    pub fn linked_to(&self) -> Option<ConnectionId> {
        self.linked_to
    }

    pub fn is_connected(&self) -> bool {
        self.linked_to.is_some()
    }
}

/// Arena of connections. Keeps every link symmetric.
#[derive(Debug, Default)]
pub struct ConnectionGraph {
    connections: Slab<Connection>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ConnectionKind, owner: ConnectionOwner) -> ConnectionId {
        ConnectionId(self.connections.insert(Connection {
            kind,
            owner,
            linked_to: None,
        }))
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Removes a connection, unlinking its partner first.
    pub fn remove(&mut self, id: ConnectionId) -> Option<Connection> {
        self.disconnect(id);
        self.connections.try_remove(id.0)
    }

    /// Returns the owner of the connection linked to `id`.
    pub fn linked_owner(&self, id: ConnectionId) -> Option<ConnectionOwner> {
        let partner = self.get(id)?.linked_to?;
        self.get(partner).map(Connection::owner)
    }

    /// Checks whether `a` and `b` could be linked, without linking them.
    ///
    /// # Errors
    ///
    /// Returns the reason the link is rejected.
    pub fn check_connect(&self, a: ConnectionId, b: ConnectionId) -> Result<(), ConnectionError> {
        let first = self.get(a).ok_or(ConnectionError::UnknownConnection(a))?;
        let second = self.get(b).ok_or(ConnectionError::UnknownConnection(b))?;

        if a == b {
            return Err(ConnectionError::SameBlock);
        }
        if !first.kind.can_link_to(second.kind) {
            return Err(ConnectionError::IncompatibleKinds {
                kind: first.kind,
                target: second.kind,
            });
        }
        if first.is_connected() {
            return Err(ConnectionError::AlreadyConnected(a));
        }
        if second.is_connected() {
            return Err(ConnectionError::AlreadyConnected(b));
        }
        Ok(())
    }

    /// Links `a` and `b`. Nothing is modified when an error is returned.
    ///
    /// # Errors
    ///
    /// See [`check_connect`](Self::check_connect).
    pub fn connect(&mut self, a: ConnectionId, b: ConnectionId) -> Result<(), ConnectionError> {
        self.check_connect(a, b)?;

        self.connections[a.0].linked_to = Some(b);
        self.connections[b.0].linked_to = Some(a);
        debug!(a:% = a, b:% = b; "Connected");
        Ok(())
    }

    /// Clears the link on both sides and returns the former partner.
    pub fn disconnect(&mut self, id: ConnectionId) -> Option<ConnectionId> {
        let partner = self.connections.get_mut(id.0)?.linked_to.take()?;
        if let Some(other) = self.connections.get_mut(partner.0) {
            other.linked_to = None;
        }
        debug!(a:% = id, b:% = partner; "Disconnected");
        Some(partner)
    }
}
