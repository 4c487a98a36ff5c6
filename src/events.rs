//! Event stream toward the presentation layer
//!
//! Every mutation emits an event so the UI can refresh its tree view
//! and badges without polling. Events are a notification surface only;
//! the store remains the source of truth.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::journal::{Artifact, Decision, Escalation};
use crate::session::Session;
use crate::types::{EscalationId, SessionId, SessionStatus};

/// Events emitted by the coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A new session was created (root or child)
    SessionSpawned { session: Session },
    /// A session's self-reported status changed
    StatusChanged {
        session_id: SessionId,
        status: SessionStatus,
    },
    /// A decision was appended to the tree journal
    DecisionLogged { decision: Decision },
    /// An artifact was appended to the tree journal
    ArtifactRecorded { artifact: Artifact },
    /// A child raised an escalation; its session is now blocked
    EscalationRaised { escalation: Escalation },
    /// An escalation was explicitly resolved
    EscalationResolved { escalation_id: EscalationId },
    /// A session delivered its result and is done
    Delivered {
        session_id: SessionId,
        kind: String,
        summary: String,
        content: serde_json::Value,
    },
    /// The external engine failed to start a spawned session's run
    LaunchFailed { session_id: SessionId, reason: String },
}

/// Create a connected sender/receiver pair for coordinator events
pub fn event_channel() -> (mpsc::UnboundedSender<Event>, EventChannel) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        tx,
        EventChannel {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Client-side handle for consuming coordinator events
#[derive(Clone)]
pub struct EventChannel {
    rx: Arc<Mutex<mpsc::UnboundedReceiver<Event>>>,
}

impl EventChannel {
    /// Try to receive an event (non-blocking)
    pub fn try_recv(&self) -> Option<Event> {
        self.rx.lock().try_recv().ok()
    }

    /// Receive an event, waiting until one arrives or the sender closes
    pub async fn recv(&self) -> Option<Event> {
        // Holds the mutex across the await; fine for a single consumer,
        // which is the intended use.
        let mut guard = self.rx.lock();
        guard.recv().await
    }

    /// Drain everything currently queued
    pub fn drain(&self) -> Vec<Event> {
        let mut guard = self.rx.lock();
        let mut out = Vec::new();
        while let Ok(event) = guard.try_recv() {
            out.push(event);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AgentType;

    #[test]
    fn test_send_and_try_recv() {
        let (tx, channel) = event_channel();
        let session = Session::root("Lead", "lead", "coordinate", AgentType::General);
        tx.send(Event::SessionSpawned {
            session: session.clone(),
        })
        .unwrap();

        let received = channel.try_recv();
        assert!(
            matches!(received, Some(Event::SessionSpawned { session: s }) if s.id == session.id)
        );
        assert!(channel.try_recv().is_none());
    }

    #[test]
    fn test_drain_preserves_order() {
        let (tx, channel) = event_channel();
        let session = Session::root("Lead", "lead", "coordinate", AgentType::General);
        tx.send(Event::StatusChanged {
            session_id: session.id,
            status: SessionStatus::Waiting,
        })
        .unwrap();
        tx.send(Event::StatusChanged {
            session_id: session.id,
            status: SessionStatus::Working,
        })
        .unwrap();

        let events = channel.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            Event::StatusChanged {
                status: SessionStatus::Waiting,
                ..
            }
        ));
    }

    #[test]
    fn test_recv_async() {
        let (tx, channel) = event_channel();
        let session = Session::root("Lead", "lead", "coordinate", AgentType::General);
        tx.send(Event::SessionSpawned { session }).unwrap();

        let received = tokio_test::block_on(channel.recv());
        assert!(matches!(received, Some(Event::SessionSpawned { .. })));
    }

    #[test]
    fn test_event_wire_shape() {
        let json = serde_json::to_value(Event::StatusChanged {
            session_id: SessionId::new(),
            status: SessionStatus::Blocked,
        })
        .unwrap();
        assert_eq!(json["type"], "status_changed");
        assert_eq!(json["status"], "blocked");
    }
}
