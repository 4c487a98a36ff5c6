//! Boundary to the external agent-execution engine
//!
//! The coordinator creates the session record, then hands the session
//! to an [`AgentExecutor`] to start the actual agent run. The run is
//! fire-and-continue: the spawner gets the child id back immediately
//! and polls status through the store, it never awaits the run.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::session::Session;

/// Errors surfaced by an executor when starting a run
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Launch failed: {0}")]
    Launch(String),
}

/// Starts agent runs for freshly spawned sessions
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    /// Start an execution context for `session`
    ///
    /// `model` is a hint for the engine; `None` means its default.
    async fn launch(&self, session: &Session, model: Option<&str>) -> Result<(), ExecutorError>;
}

/// Executor that records the launch and does nothing
///
/// For embedders that drive sessions themselves, and for tests.
#[derive(Debug, Default, Clone)]
pub struct NoopExecutor;

#[async_trait]
impl AgentExecutor for NoopExecutor {
    async fn launch(&self, session: &Session, model: Option<&str>) -> Result<(), ExecutorError> {
        debug!(session_id = %session.id, model = ?model, "Noop launch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AgentType;

    #[tokio::test]
    async fn test_noop_executor_launches() {
        let executor = NoopExecutor;
        let session = Session::root("Lead", "lead", "coordinate", AgentType::General);
        assert!(executor.launch(&session, Some("fast")).await.is_ok());
    }
}
