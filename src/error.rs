//! Coordination error types

use thiserror::Error;

use crate::types::{EscalationId, SessionId};

/// Errors that can occur in the coordination core
///
/// All variants are structural or input-validation failures; none are
/// transient, so callers must not retry them. Handlers propagate these
/// verbatim to the calling agent.
#[derive(Debug, Error)]
pub enum CoordinationError {
    /// Session id did not resolve
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    /// Parent session id did not resolve during a spawn
    #[error("Parent session not found: {0}")]
    ParentNotFound(SessionId),

    /// Spawn would nest deeper than the tree allows
    #[error("Cannot nest agents further: depth {depth} exceeds maximum {max}")]
    DepthExceeded { depth: u32, max: u32 },

    /// Status string not in the recognized vocabulary
    #[error("Invalid status: {0:?}")]
    InvalidStatus(String),

    /// Agent type string not in the recognized vocabulary
    #[error("Invalid agent type: {0:?}")]
    InvalidAgentType(String),

    /// Escalation kind string not in the recognized vocabulary
    #[error("Invalid escalation kind: {0:?}")]
    InvalidEscalationKind(String),

    /// Context source string not in the recognized vocabulary
    #[error("Invalid context source: {0:?}")]
    InvalidContextSource(String),

    /// Escalation id did not resolve
    #[error("Escalation not found: {0}")]
    EscalationNotFound(EscalationId),

    /// Removal rejected because the session still has children
    #[error("Session {0} still has live children")]
    ChildrenPresent(SessionId),
}
