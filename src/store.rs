//! Hierarchy store - the single writer surface over all session state

use std::collections::{HashMap, VecDeque};

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::error::CoordinationError;
use crate::journal::{Artifact, Decision, Escalation};
use crate::session::Session;
use crate::types::{AgentType, EscalationId, EscalationKind, SessionId, SessionStatus};

#[derive(Default)]
struct StoreState {
    /// All sessions by id
    sessions: HashMap<SessionId, Session>,
    /// Child lists in spawn order
    children: HashMap<SessionId, Vec<SessionId>>,
    /// Append-only, in write order
    decisions: Vec<Decision>,
    /// Append-only, in write order
    artifacts: Vec<Artifact>,
    escalations: Vec<Escalation>,
}

/// Stores Session/Decision/Artifact/Escalation records and enforces the
/// structural invariants at write time.
///
/// All state lives behind one lock: `create_session` reads the parent's
/// depth and inserts the child inside a single write-lock critical
/// section, so concurrent sibling spawns cannot observe a stale depth.
pub struct HierarchyStore {
    state: RwLock<StoreState>,
    max_depth: u32,
}

impl HierarchyStore {
    /// Create an empty store with the given depth cap
    pub fn new(max_depth: u32) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            max_depth,
        }
    }

    /// The depth cap this store enforces
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Create a session, as a root (no parent) or as a child
    ///
    /// Fails with `ParentNotFound` if the parent id does not resolve and
    /// with `DepthExceeded` if the child would sit deeper than the cap.
    /// A failed spawn leaves the tree untouched.
    pub fn create_session(
        &self,
        parent_id: Option<SessionId>,
        title: &str,
        role: &str,
        task: &str,
        agent_type: AgentType,
    ) -> Result<Session, CoordinationError> {
        let mut state = self.state.write();

        let session = match parent_id {
            None => Session::root(title, role, task, agent_type),
            Some(pid) => {
                let parent = state
                    .sessions
                    .get(&pid)
                    .ok_or(CoordinationError::ParentNotFound(pid))?;
                let depth = parent.depth + 1;
                if depth > self.max_depth {
                    warn!(
                        parent_id = %pid,
                        depth = depth,
                        max = self.max_depth,
                        "Rejecting spawn past depth cap"
                    );
                    return Err(CoordinationError::DepthExceeded {
                        depth,
                        max: self.max_depth,
                    });
                }
                Session::child_of(parent, title, role, task, agent_type)
            }
        };

        if let Some(pid) = parent_id {
            state.children.entry(pid).or_default().push(session.id);
        }
        state.children.entry(session.id).or_default();
        state.sessions.insert(session.id, session.clone());

        info!(
            session_id = %session.id,
            parent = ?parent_id,
            depth = session.depth,
            role = %session.role,
            "Created session"
        );

        Ok(session)
    }

    /// Look up a session by id
    pub fn session(&self, id: SessionId) -> Result<Session, CoordinationError> {
        self.state
            .read()
            .sessions
            .get(&id)
            .cloned()
            .ok_or(CoordinationError::SessionNotFound(id))
    }

    /// Set a session's self-reported status
    ///
    /// Any status may follow any other; only vocabulary membership is
    /// enforced, and that happens at the stringly tool boundary.
    pub fn update_status(
        &self,
        id: SessionId,
        status: SessionStatus,
    ) -> Result<Session, CoordinationError> {
        let mut state = self.state.write();
        let session = state
            .sessions
            .get_mut(&id)
            .ok_or(CoordinationError::SessionNotFound(id))?;
        session.set_status(status);
        let session = session.clone();

        info!(session_id = %id, status = %status, "Updated status");
        Ok(session)
    }

    /// Append a decision, resolving the tree anchor from the session
    pub fn append_decision(
        &self,
        session_id: SessionId,
        decision: &str,
        category: Option<&str>,
        rationale: Option<&str>,
    ) -> Result<Decision, CoordinationError> {
        let mut state = self.state.write();
        let root_id = state
            .sessions
            .get(&session_id)
            .ok_or(CoordinationError::SessionNotFound(session_id))?
            .root_id;

        let record = Decision {
            session_id,
            root_id,
            decision: decision.to_string(),
            category: category.map(str::to_string),
            rationale: rationale.map(str::to_string),
            created_at: Utc::now(),
        };
        state.decisions.push(record.clone());

        info!(session_id = %session_id, root = %root_id, "Logged decision");
        Ok(record)
    }

    /// Append an artifact, resolving the tree anchor from the session
    pub fn append_artifact(
        &self,
        session_id: SessionId,
        path: &str,
        description: Option<&str>,
    ) -> Result<Artifact, CoordinationError> {
        let mut state = self.state.write();
        let root_id = state
            .sessions
            .get(&session_id)
            .ok_or(CoordinationError::SessionNotFound(session_id))?
            .root_id;

        let record = Artifact {
            session_id,
            root_id,
            path: path.to_string(),
            description: description.map(str::to_string),
            created_at: Utc::now(),
        };
        state.artifacts.push(record.clone());

        info!(session_id = %session_id, path = %path, "Recorded artifact");
        Ok(record)
    }

    /// Raise an escalation and drive the owning session to `blocked`
    pub fn raise_escalation(
        &self,
        session_id: SessionId,
        kind: EscalationKind,
        summary: &str,
        context: Option<&str>,
    ) -> Result<Escalation, CoordinationError> {
        let mut state = self.state.write();
        let session = state
            .sessions
            .get_mut(&session_id)
            .ok_or(CoordinationError::SessionNotFound(session_id))?;
        session.set_status(SessionStatus::Blocked);
        let root_id = session.root_id;

        let escalation = Escalation {
            id: EscalationId::new(),
            session_id,
            root_id,
            kind,
            summary: summary.to_string(),
            context: context.map(str::to_string),
            resolved: false,
            created_at: Utc::now(),
        };
        state.escalations.push(escalation.clone());

        info!(
            session_id = %session_id,
            escalation_id = %escalation.id,
            kind = %kind,
            "Raised escalation"
        );
        Ok(escalation)
    }

    /// Mark an escalation resolved
    ///
    /// Idempotent: resolving an already-resolved escalation is an Ok
    /// no-op. The owning session stays `blocked` until a separate
    /// `update_status` call; resolution and unblocking are two steps.
    pub fn resolve_escalation(
        &self,
        escalation_id: EscalationId,
    ) -> Result<Escalation, CoordinationError> {
        let mut state = self.state.write();
        let escalation = state
            .escalations
            .iter_mut()
            .find(|e| e.id == escalation_id)
            .ok_or(CoordinationError::EscalationNotFound(escalation_id))?;
        escalation.resolved = true;
        let escalation = escalation.clone();

        info!(escalation_id = %escalation_id, "Resolved escalation");
        Ok(escalation)
    }

    /// Remove a session record
    ///
    /// Rejected with `ChildrenPresent` while the session has children.
    /// Journal rows written by the session are kept; they are
    /// append-only tree history, not part of the node.
    pub fn remove_session(&self, id: SessionId) -> Result<(), CoordinationError> {
        let mut state = self.state.write();
        let parent_id = state
            .sessions
            .get(&id)
            .ok_or(CoordinationError::SessionNotFound(id))?
            .parent_id;
        if state.children.get(&id).is_some_and(|c| !c.is_empty()) {
            warn!(session_id = %id, "Rejecting removal of session with live children");
            return Err(CoordinationError::ChildrenPresent(id));
        }

        state.sessions.remove(&id);
        state.children.remove(&id);
        if let Some(pid) = parent_id {
            if let Some(siblings) = state.children.get_mut(&pid) {
                siblings.retain(|c| *c != id);
            }
        }

        info!(session_id = %id, "Removed session");
        Ok(())
    }

    /// Parent of a session, if it has one
    pub fn parent_of(&self, id: SessionId) -> Result<Option<Session>, CoordinationError> {
        let state = self.state.read();
        let session = state
            .sessions
            .get(&id)
            .ok_or(CoordinationError::SessionNotFound(id))?;
        Ok(session
            .parent_id
            .and_then(|pid| state.sessions.get(&pid).cloned()))
    }

    /// Children of a session, in spawn order
    pub fn children_of(&self, id: SessionId) -> Result<Vec<Session>, CoordinationError> {
        let state = self.state.read();
        if !state.sessions.contains_key(&id) {
            return Err(CoordinationError::SessionNotFound(id));
        }
        Ok(state
            .children
            .get(&id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|cid| state.sessions.get(cid).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Sessions sharing this session's parent, excluding itself
    pub fn siblings_of(&self, id: SessionId) -> Result<Vec<Session>, CoordinationError> {
        let state = self.state.read();
        let session = state
            .sessions
            .get(&id)
            .ok_or(CoordinationError::SessionNotFound(id))?;
        let Some(pid) = session.parent_id else {
            return Ok(Vec::new());
        };
        Ok(state
            .children
            .get(&pid)
            .map(|ids| {
                ids.iter()
                    .filter(|cid| **cid != id)
                    .filter_map(|cid| state.sessions.get(cid).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    /// All descendants of a session, breadth-first, as a snapshot of the
    /// current state (the starting session itself is not included)
    pub fn list_descendants(&self, id: SessionId) -> Result<Vec<Session>, CoordinationError> {
        let state = self.state.read();
        if !state.sessions.contains_key(&id) {
            return Err(CoordinationError::SessionNotFound(id));
        }

        let mut out = Vec::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if let Some(child_ids) = state.children.get(&current) {
                for cid in child_ids {
                    if let Some(child) = state.sessions.get(cid) {
                        out.push(child.clone());
                    }
                    queue.push_back(*cid);
                }
            }
        }
        Ok(out)
    }

    /// Decisions logged anywhere in the tree, oldest first
    pub fn treewide_decisions(&self, root_id: SessionId) -> Vec<Decision> {
        self.state
            .read()
            .decisions
            .iter()
            .filter(|d| d.root_id == root_id)
            .cloned()
            .collect()
    }

    /// Artifacts recorded anywhere in the tree, oldest first
    pub fn treewide_artifacts(&self, root_id: SessionId) -> Vec<Artifact> {
        self.state
            .read()
            .artifacts
            .iter()
            .filter(|a| a.root_id == root_id)
            .cloned()
            .collect()
    }

    /// Escalations raised by one session, oldest first
    pub fn escalations_for(&self, session_id: SessionId) -> Vec<Escalation> {
        self.state
            .read()
            .escalations
            .iter()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect()
    }

    /// All currently unresolved escalations, oldest first
    pub fn unresolved_escalations(&self) -> Vec<Escalation> {
        self.state
            .read()
            .escalations
            .iter()
            .filter(|e| !e.resolved)
            .cloned()
            .collect()
    }

    /// Snapshot of every live session, across all trees
    pub fn sessions(&self) -> Vec<Session> {
        self.state.read().sessions.values().cloned().collect()
    }

    /// Total live session count
    pub fn len(&self) -> usize {
        self.state.read().sessions.len()
    }

    /// Check if the store holds no sessions
    pub fn is_empty(&self) -> bool {
        self.state.read().sessions.is_empty()
    }
}

impl Default for HierarchyStore {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_DEPTH)
    }
}
