//! Append-only journal records visible tree-wide
//!
//! Decisions and artifacts are immutable once written: nothing in the
//! public contract can update or remove them. Both carry a denormalized
//! root anchor so "everything in this tree" is a single filtered pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{EscalationId, EscalationKind, SessionId};

/// A fact logged by a session, visible to the whole tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// Session that logged the decision
    pub session_id: SessionId,
    /// Denormalized tree anchor
    pub root_id: SessionId,
    pub decision: String,
    pub category: Option<String>,
    pub rationale: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Decision {
    /// Substring match over the textual fields, case-insensitive
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.decision.to_lowercase().contains(&query)
            || self
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&query))
            || self
                .rationale
                .as_deref()
                .is_some_and(|r| r.to_lowercase().contains(&query))
    }
}

/// A produced output recorded by a session, visible to the whole tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    /// Session that produced the artifact
    pub session_id: SessionId,
    /// Denormalized tree anchor
    pub root_id: SessionId,
    pub path: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Artifact {
    /// Substring match over path and description, case-insensitive
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.path.to_lowercase().contains(&query)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&query))
    }
}

/// A typed request for attention raised by a child toward its parent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Escalation {
    pub id: EscalationId,
    /// Session that raised the escalation
    pub session_id: SessionId,
    /// Denormalized tree anchor
    pub root_id: SessionId,
    pub kind: EscalationKind,
    pub summary: String,
    pub context: Option<String>,
    /// Set by an explicit resolution action. Resolving does NOT clear
    /// the owning session's `blocked` status; that is a separate
    /// `update_status` call.
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
}
