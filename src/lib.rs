//! # Conclave
//!
//! Hierarchical agent session coordination - delegation bookkeeping
//! for agent trees.
//!
//! This crate is the coordination core behind a chat application that
//! delegates work to child agent sessions: a tree of sessions with a
//! bounded depth, an append-only journal of decisions and artifacts
//! visible tree-wide, typed escalations toward the parent, and a
//! read-side view of everything that needs human attention.
//!
//! ## Architecture
//!
//! ```text
//!                    ┌─────────────────────────────┐
//!                    │        ROOT SESSION          │  depth 0
//!                    │   (user-initiated chat)      │
//!                    └──────────────┬───────────────┘
//!                ┌──────────────────┼──────────────────┐
//!                ▼                  ▼                  ▼
//!         ┌────────────┐    ┌────────────┐     ┌────────────┐
//!         │  frontend  │    │  backend   │     │  reviewer  │  depth 1
//!         └─────┬──────┘    └────────────┘     └────────────┘
//!               ▼                                              depth 2..3
//!         ┌────────────┐       spawns past depth 3 fail,
//!         │   styles   │       they are never clamped
//!         └────────────┘
//! ```
//!
//! Writes flow one direction: an agent invokes a coordination tool,
//! the [`Coordinator`] validates against the [`HierarchyStore`]'s
//! tree invariants, rows change, and the [`StatusAggregator`]
//! recomputes on the next read. There is no background scheduler;
//! every handler runs synchronously in the caller's turn, except the
//! agent run itself, which the [`AgentExecutor`] starts
//! fire-and-continue.
//!
//! ## Key Concepts
//!
//! - **Session**: one agent's execution context, a node in the tree
//! - **Root anchor**: every session points at its tree's root, making
//!   tree-wide journal queries a single pass
//! - **Decision / Artifact**: immutable facts any session can log and
//!   every session under the same root can read
//! - **Escalation**: a typed request for attention that blocks the
//!   raising session until someone explicitly unblocks it
//! - **Attention set**: the sessions a human should look at right now

pub mod attention;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod executor;
pub mod journal;
pub mod session;
pub mod store;
pub mod types;

pub use attention::{AttentionEntry, AttentionReason, StatusAggregator};
pub use config::CoordinatorConfig;
pub use coordinator::{ArtifactSpec, ContextReply, Coordinator};
pub use error::CoordinationError;
pub use events::{Event, EventChannel};
pub use executor::{AgentExecutor, ExecutorError, NoopExecutor};
pub use journal::{Artifact, Decision, Escalation};
pub use session::{Session, SessionBrief};
pub use store::HierarchyStore;
pub use types::{
    AgentType, ContextSource, EscalationId, EscalationKind, SessionId, SessionStatus,
};
