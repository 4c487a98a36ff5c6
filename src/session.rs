//! Session records - the nodes of the agent hierarchy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AgentType, SessionId, SessionStatus};

/// A single agent session in the hierarchy
///
/// Records are plain data; all mutation goes through the
/// [`HierarchyStore`](crate::store::HierarchyStore).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: SessionId,
    /// Parent session (None for roots)
    pub parent_id: Option<SessionId>,
    /// Top-of-tree anchor. Computed at creation, never mutated after.
    pub root_id: SessionId,
    /// Distance from the root (0 for roots)
    pub depth: u32,
    /// Display name for the tree view
    pub title: String,
    /// Free-text role label, e.g. "frontend"
    pub role: String,
    /// Free-text description of the delegated work
    pub task: String,
    /// Kind of agent backing this session
    pub agent_type: AgentType,
    /// Self-reported liveness
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    /// When the status last changed; drives the stale-waiting rule
    pub status_changed_at: DateTime<Utc>,
}

impl Session {
    /// Create a root session (depth 0, its own root anchor)
    pub fn root(
        title: impl Into<String>,
        role: impl Into<String>,
        task: impl Into<String>,
        agent_type: AgentType,
    ) -> Self {
        let id = SessionId::new();
        let now = Utc::now();
        Self {
            id,
            parent_id: None,
            root_id: id,
            depth: 0,
            title: title.into(),
            role: role.into(),
            task: task.into(),
            agent_type,
            status: SessionStatus::Working,
            created_at: now,
            status_changed_at: now,
        }
    }

    /// Create a child of `parent`, inheriting its root anchor
    ///
    /// Does not check the depth cap; the store enforces that before
    /// the record becomes visible.
    pub fn child_of(
        parent: &Session,
        title: impl Into<String>,
        role: impl Into<String>,
        task: impl Into<String>,
        agent_type: AgentType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            parent_id: Some(parent.id),
            root_id: parent.root_id,
            depth: parent.depth + 1,
            title: title.into(),
            role: role.into(),
            task: task.into(),
            agent_type,
            status: SessionStatus::Working,
            created_at: now,
            status_changed_at: now,
        }
    }

    /// Whether this session is the top of its tree
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub(crate) fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
        self.status_changed_at = Utc::now();
    }
}

/// A trimmed view of a session shared as context between agents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionBrief {
    pub id: SessionId,
    pub title: String,
    pub role: String,
    pub task: String,
    pub agent_type: AgentType,
    pub status: SessionStatus,
}

impl From<&Session> for SessionBrief {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            title: session.title.clone(),
            role: session.role.clone(),
            task: session.task.clone(),
            agent_type: session.agent_type,
            status: session.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_session() {
        let root = Session::root("App build", "lead", "build the app", AgentType::General);
        assert!(root.is_root());
        assert_eq!(root.depth, 0);
        assert_eq!(root.root_id, root.id);
        assert_eq!(root.status, SessionStatus::Working);
    }

    #[test]
    fn test_child_session() {
        let root = Session::root("App build", "lead", "build the app", AgentType::General);
        let child = Session::child_of(&root, "Frontend", "frontend", "build the UI", AgentType::Coding);

        assert!(!child.is_root());
        assert_eq!(child.parent_id, Some(root.id));
        assert_eq!(child.root_id, root.id);
        assert_eq!(child.depth, 1);
    }

    #[test]
    fn test_root_anchor_transitive() {
        let root = Session::root("Plan", "lead", "plan", AgentType::Planning);
        let child = Session::child_of(&root, "Frontend", "frontend", "UI", AgentType::Coding);
        let grandchild = Session::child_of(&child, "Styles", "styles", "CSS", AgentType::Coding);

        assert_eq!(grandchild.root_id, root.id);
        assert_eq!(grandchild.depth, 2);
    }

    #[test]
    fn test_set_status_touches_timestamp() {
        let mut session = Session::root("Plan", "lead", "plan", AgentType::General);
        let before = session.status_changed_at;
        session.set_status(SessionStatus::Waiting);
        assert_eq!(session.status, SessionStatus::Waiting);
        assert!(session.status_changed_at >= before);
    }

    #[test]
    fn test_brief_from_session() {
        let session = Session::root("Plan", "lead", "plan", AgentType::Research);
        let brief = SessionBrief::from(&session);
        assert_eq!(brief.id, session.id);
        assert_eq!(brief.role, "lead");
        assert_eq!(brief.agent_type, AgentType::Research);
    }
}
