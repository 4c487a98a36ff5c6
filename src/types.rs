//! Identifiers and closed vocabularies shared across the crate

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoordinationError;

/// Unique identifier for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for an escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EscalationId(Uuid);

impl EscalationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EscalationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EscalationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Kind of agent backing a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Browser,
    Coding,
    Runner,
    Research,
    Planning,
    Reviewer,
    General,
}

impl AgentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Coding => "coding",
            Self::Runner => "runner",
            Self::Research => "research",
            Self::Planning => "planning",
            Self::Reviewer => "reviewer",
            Self::General => "general",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentType {
    type Err = CoordinationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "browser" => Ok(Self::Browser),
            "coding" => Ok(Self::Coding),
            "runner" => Ok(Self::Runner),
            "research" => Ok(Self::Research),
            "planning" => Ok(Self::Planning),
            "reviewer" => Ok(Self::Reviewer),
            "general" => Ok(Self::General),
            other => Err(CoordinationError::InvalidAgentType(other.to_string())),
        }
    }
}

/// Self-reported liveness of a session
///
/// Any status may follow any other. Agents report their own state and
/// nothing here can verify a "working" vs "waiting" claim, so no
/// transition table is enforced beyond vocabulary membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Working,
    Waiting,
    Delivered,
    Blocked,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Working => "working",
            Self::Waiting => "waiting",
            Self::Delivered => "delivered",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = CoordinationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "working" => Ok(Self::Working),
            "waiting" => Ok(Self::Waiting),
            "delivered" => Ok(Self::Delivered),
            "blocked" => Ok(Self::Blocked),
            other => Err(CoordinationError::InvalidStatus(other.to_string())),
        }
    }
}

/// Kind of attention an escalation requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationKind {
    Question,
    DecisionNeeded,
    Blocker,
    Permission,
}

impl EscalationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::DecisionNeeded => "decision_needed",
            Self::Blocker => "blocker",
            Self::Permission => "permission",
        }
    }
}

impl fmt::Display for EscalationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EscalationKind {
    type Err = CoordinationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "question" => Ok(Self::Question),
            "decision_needed" => Ok(Self::DecisionNeeded),
            "blocker" => Ok(Self::Blocker),
            "permission" => Ok(Self::Permission),
            other => Err(CoordinationError::InvalidEscalationKind(other.to_string())),
        }
    }
}

/// Where a context query should look
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextSource {
    Parent,
    Sibling,
    Decisions,
    Artifacts,
}

impl FromStr for ContextSource {
    type Err = CoordinationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parent" => Ok(Self::Parent),
            "sibling" => Ok(Self::Sibling),
            "decisions" => Ok(Self::Decisions),
            "artifacts" => Ok(Self::Artifacts),
            other => Err(CoordinationError::InvalidContextSource(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn test_status_round_trip() {
        for s in ["working", "waiting", "delivered", "blocked"] {
            let status: SessionStatus = s.parse().unwrap();
            assert_eq!(status.as_str(), s);
        }
    }

    #[test]
    fn test_status_invalid() {
        let err = "paused".parse::<SessionStatus>().unwrap_err();
        assert!(matches!(err, CoordinationError::InvalidStatus(_)));
    }

    #[test]
    fn test_agent_type_round_trip() {
        for s in [
            "browser", "coding", "runner", "research", "planning", "reviewer", "general",
        ] {
            let ty: AgentType = s.parse().unwrap();
            assert_eq!(ty.as_str(), s);
        }
    }

    #[test]
    fn test_agent_type_invalid() {
        let err = "designer".parse::<AgentType>().unwrap_err();
        assert!(matches!(err, CoordinationError::InvalidAgentType(_)));
    }

    #[test]
    fn test_escalation_kind_round_trip() {
        for s in ["question", "decision_needed", "blocker", "permission"] {
            let kind: EscalationKind = s.parse().unwrap();
            assert_eq!(kind.as_str(), s);
        }
    }

    #[test]
    fn test_context_source_parse() {
        assert!(matches!(
            "decisions".parse::<ContextSource>(),
            Ok(ContextSource::Decisions)
        ));
        assert!(matches!(
            "everything".parse::<ContextSource>(),
            Err(CoordinationError::InvalidContextSource(_))
        ));
    }

    #[test]
    fn test_serde_wire_names() {
        let json = serde_json::to_string(&EscalationKind::DecisionNeeded).unwrap();
        assert_eq!(json, "\"decision_needed\"");
        let json = serde_json::to_string(&SessionStatus::Blocked).unwrap();
        assert_eq!(json, "\"blocked\"");
    }
}
