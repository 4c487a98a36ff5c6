//! Coordination tool handlers - the boundary agents call through
//!
//! Each handler wraps one store operation, emits the matching event,
//! and (for spawn) hands the new session to the external executor.
//! Enum-valued arguments arrive as strings because the tool-call
//! boundary is stringly; parsing failures surface as the Invalid*
//! error kinds. Store errors propagate verbatim - the calling agent is
//! expected to reason about the failure and relay it to its user, so
//! nothing is retried or swallowed here.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::attention::StatusAggregator;
use crate::config::CoordinatorConfig;
use crate::error::CoordinationError;
use crate::events::{event_channel, Event, EventChannel};
use crate::executor::AgentExecutor;
use crate::journal::{Artifact, Decision, Escalation};
use crate::session::{Session, SessionBrief};
use crate::store::HierarchyStore;
use crate::types::{ContextSource, EscalationId, SessionId, SessionStatus};

/// One artifact entry in a delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSpec {
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Reply to a `get_context` call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ContextReply {
    Parent { parent: Option<SessionBrief> },
    Siblings { siblings: Vec<SessionBrief> },
    Decisions { decisions: Vec<Decision> },
    Artifacts { artifacts: Vec<Artifact> },
}

/// The coordination surface exposed to agent processes and the UI
pub struct Coordinator {
    store: Arc<HierarchyStore>,
    executor: Arc<dyn AgentExecutor>,
    config: CoordinatorConfig,
    event_tx: mpsc::UnboundedSender<Event>,
}

impl Coordinator {
    /// Create a coordinator and the event channel the UI consumes
    pub fn new(
        config: CoordinatorConfig,
        executor: Arc<dyn AgentExecutor>,
    ) -> (Self, EventChannel) {
        let (event_tx, events) = event_channel();
        let coordinator = Self {
            store: Arc::new(HierarchyStore::new(config.max_depth)),
            executor,
            config,
            event_tx,
        };
        (coordinator, events)
    }

    /// The underlying store, for read-side consumers
    pub fn store(&self) -> Arc<HierarchyStore> {
        Arc::clone(&self.store)
    }

    /// A read-side aggregator over this coordinator's store
    pub fn aggregator(&self) -> StatusAggregator {
        StatusAggregator::new(Arc::clone(&self.store), self.config.waiting_threshold)
    }

    /// Create a root session (a user-initiated chat)
    ///
    /// Roots are driven by the embedding application's own
    /// conversation loop, so no executor launch happens here.
    pub fn create_root(
        &self,
        title: &str,
        role: &str,
        task: &str,
        agent_type: &str,
    ) -> Result<Session, CoordinationError> {
        let agent_type = agent_type.parse()?;
        let session = self
            .store
            .create_session(None, title, role, task, agent_type)?;
        let _ = self.event_tx.send(Event::SessionSpawned {
            session: session.clone(),
        });
        Ok(session)
    }

    /// Spawn a child session under the calling session
    ///
    /// Returns the child id as soon as the store write succeeds; the
    /// agent run is started asynchronously and never awaited here
    /// (fire-and-continue - the caller polls status via the store).
    /// A `DepthExceeded` failure must be relayed to the user as
    /// "cannot nest agents further", not retried.
    pub async fn spawn_agent(
        &self,
        caller: SessionId,
        title: &str,
        role: &str,
        task: &str,
        agent_type: &str,
        model: Option<String>,
    ) -> Result<SessionId, CoordinationError> {
        let agent_type = agent_type.parse()?;
        let session = self
            .store
            .create_session(Some(caller), title, role, task, agent_type)?;
        let _ = self.event_tx.send(Event::SessionSpawned {
            session: session.clone(),
        });

        info!(
            session_id = %session.id,
            parent = %caller,
            role = %session.role,
            "Spawned agent session"
        );

        let executor = Arc::clone(&self.executor);
        let event_tx = self.event_tx.clone();
        let session_id = session.id;
        tokio::spawn(async move {
            if let Err(e) = executor.launch(&session, model.as_deref()).await {
                warn!(session_id = %session_id, error = %e, "Agent launch failed");
                let _ = event_tx.send(Event::LaunchFailed {
                    session_id,
                    reason: e.to_string(),
                });
            }
        });

        Ok(session_id)
    }

    /// Fetch context for the calling session
    ///
    /// `query` is a plain substring filter over decisions/artifacts;
    /// `sibling_role` a substring filter over sibling roles. There is
    /// no semantic search here.
    pub fn get_context(
        &self,
        caller: SessionId,
        source: &str,
        query: Option<&str>,
        sibling_role: Option<&str>,
    ) -> Result<ContextReply, CoordinationError> {
        let source: ContextSource = source.parse()?;
        match source {
            ContextSource::Parent => {
                let parent = self.store.parent_of(caller)?;
                Ok(ContextReply::Parent {
                    parent: parent.as_ref().map(SessionBrief::from),
                })
            }
            ContextSource::Sibling => {
                let role_filter = sibling_role.map(str::to_lowercase);
                let siblings = self
                    .store
                    .siblings_of(caller)?
                    .iter()
                    .filter(|s| match &role_filter {
                        Some(f) => s.role.to_lowercase().contains(f),
                        None => true,
                    })
                    .map(SessionBrief::from)
                    .collect();
                Ok(ContextReply::Siblings { siblings })
            }
            ContextSource::Decisions => {
                let root_id = self.store.session(caller)?.root_id;
                let decisions = self
                    .store
                    .treewide_decisions(root_id)
                    .into_iter()
                    .filter(|d| query.is_none_or(|q| d.matches(q)))
                    .collect();
                Ok(ContextReply::Decisions { decisions })
            }
            ContextSource::Artifacts => {
                let root_id = self.store.session(caller)?.root_id;
                let artifacts = self
                    .store
                    .treewide_artifacts(root_id)
                    .into_iter()
                    .filter(|a| query.is_none_or(|q| a.matches(q)))
                    .collect();
                Ok(ContextReply::Artifacts { artifacts })
            }
        }
    }

    /// Log a decision into the tree journal
    pub fn log_decision(
        &self,
        caller: SessionId,
        decision: &str,
        category: Option<&str>,
        rationale: Option<&str>,
    ) -> Result<Decision, CoordinationError> {
        let record = self
            .store
            .append_decision(caller, decision, category, rationale)?;
        let _ = self.event_tx.send(Event::DecisionLogged {
            decision: record.clone(),
        });
        Ok(record)
    }

    /// Raise an escalation; the calling session becomes `blocked`
    pub fn escalate(
        &self,
        caller: SessionId,
        kind: &str,
        summary: &str,
        context: Option<&str>,
    ) -> Result<Escalation, CoordinationError> {
        let kind = kind.parse()?;
        let escalation = self.store.raise_escalation(caller, kind, summary, context)?;
        let _ = self.event_tx.send(Event::StatusChanged {
            session_id: caller,
            status: SessionStatus::Blocked,
        });
        let _ = self.event_tx.send(Event::EscalationRaised {
            escalation: escalation.clone(),
        });
        Ok(escalation)
    }

    /// Deliver the calling session's result
    ///
    /// Records each artifact, then transitions the caller to
    /// `delivered` - the terminal happy path for a child's work.
    pub fn deliver(
        &self,
        caller: SessionId,
        kind: &str,
        summary: &str,
        content: serde_json::Value,
        artifacts: Vec<ArtifactSpec>,
    ) -> Result<Session, CoordinationError> {
        for spec in &artifacts {
            let artifact =
                self.store
                    .append_artifact(caller, &spec.path, spec.description.as_deref())?;
            let _ = self.event_tx.send(Event::ArtifactRecorded { artifact });
        }

        let session = self.store.update_status(caller, SessionStatus::Delivered)?;
        let _ = self.event_tx.send(Event::StatusChanged {
            session_id: caller,
            status: session.status,
        });
        let _ = self.event_tx.send(Event::Delivered {
            session_id: caller,
            kind: kind.to_string(),
            summary: summary.to_string(),
            content,
        });

        info!(session_id = %caller, kind = %kind, "Delivered result");
        Ok(session)
    }

    /// Update the calling session's self-reported status
    pub fn update_status(
        &self,
        caller: SessionId,
        status: &str,
    ) -> Result<Session, CoordinationError> {
        let status = status.parse()?;
        let session = self.store.update_status(caller, status)?;
        let _ = self.event_tx.send(Event::StatusChanged {
            session_id: caller,
            status,
        });
        Ok(session)
    }

    /// Resolve an escalation (a user dismissing a blocker)
    ///
    /// Does not clear the owning session's `blocked` status; callers
    /// that want the session unblocked must also call
    /// [`update_status`](Self::update_status).
    pub fn resolve_escalation(
        &self,
        escalation_id: EscalationId,
    ) -> Result<(), CoordinationError> {
        self.store.resolve_escalation(escalation_id)?;
        let _ = self.event_tx.send(Event::EscalationResolved { escalation_id });
        Ok(())
    }
}
