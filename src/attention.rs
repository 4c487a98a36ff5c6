//! Read-side attention aggregation
//!
//! Answers "which sessions need human attention right now" for the
//! interface layer. This is a read model, not a cache: every call
//! recomputes from store reads, and correctness rides entirely on the
//! store's read consistency.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::session::Session;
use crate::store::HierarchyStore;
use crate::types::{SessionId, SessionStatus};

/// Why a session is in the attention set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttentionReason {
    /// Status is `blocked`
    Blocked,
    /// Status has been `waiting` past the threshold
    StaleWaiting,
    /// At least one escalation is unresolved
    UnresolvedEscalation,
}

/// One session needing attention, with every reason that applies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttentionEntry {
    pub session: Session,
    pub reasons: Vec<AttentionReason>,
}

/// Query-time reducer over the hierarchy store
pub struct StatusAggregator {
    store: Arc<HierarchyStore>,
    waiting_threshold: Duration,
}

impl StatusAggregator {
    pub fn new(store: Arc<HierarchyStore>, waiting_threshold: Duration) -> Self {
        Self {
            store,
            waiting_threshold,
        }
    }

    /// Sessions across all trees that currently need attention
    ///
    /// A session qualifies if it is blocked, has been waiting past the
    /// threshold, or owns an unresolved escalation. Ordered oldest
    /// session first so long-stuck work surfaces at the top.
    pub fn attention_set(&self) -> Vec<AttentionEntry> {
        let escalated: HashSet<SessionId> = self
            .store
            .unresolved_escalations()
            .into_iter()
            .map(|e| e.session_id)
            .collect();

        let now = Utc::now();
        let mut entries: Vec<AttentionEntry> = self
            .store
            .sessions()
            .into_iter()
            .filter_map(|session| {
                let mut reasons = Vec::new();
                match session.status {
                    SessionStatus::Blocked => reasons.push(AttentionReason::Blocked),
                    SessionStatus::Waiting => {
                        let waited = (now - session.status_changed_at)
                            .to_std()
                            .unwrap_or(Duration::ZERO);
                        if waited > self.waiting_threshold {
                            reasons.push(AttentionReason::StaleWaiting);
                        }
                    }
                    SessionStatus::Working | SessionStatus::Delivered => {}
                }
                if escalated.contains(&session.id) {
                    reasons.push(AttentionReason::UnresolvedEscalation);
                }
                (!reasons.is_empty()).then_some(AttentionEntry { session, reasons })
            })
            .collect();

        entries.sort_by_key(|e| e.session.created_at);
        entries
    }

    /// Attention set restricted to one tree
    pub fn attention_for_tree(&self, root_id: SessionId) -> Vec<AttentionEntry> {
        self.attention_set()
            .into_iter()
            .filter(|e| e.session.root_id == root_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgentType, EscalationKind};

    fn aggregator(threshold: Duration) -> (Arc<HierarchyStore>, StatusAggregator) {
        let store = Arc::new(HierarchyStore::default());
        let aggregator = StatusAggregator::new(Arc::clone(&store), threshold);
        (store, aggregator)
    }

    #[test]
    fn test_empty_store_needs_no_attention() {
        let (_store, aggregator) = aggregator(Duration::ZERO);
        assert!(aggregator.attention_set().is_empty());
    }

    #[test]
    fn test_blocked_session_qualifies() {
        let (store, aggregator) = aggregator(Duration::from_secs(3600));
        let root = store
            .create_session(None, "Lead", "lead", "coordinate", AgentType::General)
            .unwrap();
        store.update_status(root.id, SessionStatus::Blocked).unwrap();

        let entries = aggregator.attention_set();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].session.id, root.id);
        assert_eq!(entries[0].reasons, vec![AttentionReason::Blocked]);
    }

    #[test]
    fn test_working_and_delivered_do_not_qualify() {
        let (store, aggregator) = aggregator(Duration::ZERO);
        let root = store
            .create_session(None, "Lead", "lead", "coordinate", AgentType::General)
            .unwrap();
        assert!(aggregator.attention_set().is_empty());

        store
            .update_status(root.id, SessionStatus::Delivered)
            .unwrap();
        assert!(aggregator.attention_set().is_empty());
    }

    #[test]
    fn test_stale_waiting_depends_on_threshold() {
        let (store, aggregator) = aggregator(Duration::ZERO);
        let root = store
            .create_session(None, "Lead", "lead", "coordinate", AgentType::General)
            .unwrap();
        store.update_status(root.id, SessionStatus::Waiting).unwrap();

        // Zero threshold: any measurable wait is stale
        let entries = aggregator.attention_set();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].reasons, vec![AttentionReason::StaleWaiting]);

        // Generous threshold: the same session is fine
        let patient = StatusAggregator::new(store, Duration::from_secs(3600));
        assert!(patient.attention_set().is_empty());
    }

    #[test]
    fn test_unresolved_escalation_qualifies() {
        let (store, aggregator) = aggregator(Duration::from_secs(3600));
        let root = store
            .create_session(None, "Lead", "lead", "coordinate", AgentType::General)
            .unwrap();
        let child = store
            .create_session(Some(root.id), "Frontend", "frontend", "UI", AgentType::Coding)
            .unwrap();
        let escalation = store
            .raise_escalation(child.id, EscalationKind::Blocker, "missing endpoint", None)
            .unwrap();

        // Blocked by the escalation side effect AND owning it unresolved
        let entries = aggregator.attention_set();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].session.id, child.id);
        assert_eq!(
            entries[0].reasons,
            vec![
                AttentionReason::Blocked,
                AttentionReason::UnresolvedEscalation
            ]
        );

        // Resolving removes one reason but the session stays blocked
        store.resolve_escalation(escalation.id).unwrap();
        let entries = aggregator.attention_set();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].reasons, vec![AttentionReason::Blocked]);
    }

    #[test]
    fn test_attention_for_tree_scopes_by_root() {
        let (store, aggregator) = aggregator(Duration::from_secs(3600));
        let tree_a = store
            .create_session(None, "Project A", "lead", "project a", AgentType::General)
            .unwrap();
        let tree_b = store
            .create_session(None, "Project B", "lead", "project b", AgentType::General)
            .unwrap();
        store
            .update_status(tree_a.id, SessionStatus::Blocked)
            .unwrap();
        store
            .update_status(tree_b.id, SessionStatus::Blocked)
            .unwrap();

        assert_eq!(aggregator.attention_set().len(), 2);
        let scoped = aggregator.attention_for_tree(tree_a.id);
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].session.id, tree_a.id);
    }

    #[test]
    fn test_oldest_session_first() {
        let (store, aggregator) = aggregator(Duration::from_secs(3600));
        let first = store
            .create_session(None, "Project A", "lead", "project a", AgentType::General)
            .unwrap();
        let second = store
            .create_session(None, "Project B", "lead", "project b", AgentType::General)
            .unwrap();
        store
            .update_status(second.id, SessionStatus::Blocked)
            .unwrap();
        store
            .update_status(first.id, SessionStatus::Blocked)
            .unwrap();

        let entries = aggregator.attention_set();
        assert_eq!(entries[0].session.id, first.id);
        assert_eq!(entries[1].session.id, second.id);
    }
}
