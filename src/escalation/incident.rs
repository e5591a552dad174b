// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sentra

//! Incident records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// How an incident was triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentKind {
    /// Fired by the escalation policy crossing its threshold
    Automatic,
    /// Fired by an explicit user action
    Manual,
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncidentKind::Automatic => f.write_str("automatic"),
            IncidentKind::Manual => f.write_str("manual"),
        }
    }
}

/// A durable record of one escalation event. Immutable once created;
/// session logs only ever append these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    /// Unique incident id
    pub id: Uuid,
    /// Trigger time
    pub timestamp: DateTime<Utc>,
    /// Monitored person's name
    pub user: String,
    /// Risk score at trigger time
    pub risk_score: f64,
    /// Trigger kind tag
    pub kind: IncidentKind,
}

impl Incident {
    /// Record an incident at the current time
    pub fn new(user: &str, risk_score: f64, kind: IncidentKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user: user.to_string(),
            risk_score,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incident_ids_are_unique() {
        let a = Incident::new("Asha", 0.9, IncidentKind::Automatic);
        let b = Incident::new("Asha", 1.0, IncidentKind::Manual);
        assert_ne!(a.id, b.id);
        assert_eq!(a.kind.to_string(), "automatic");
        assert_eq!(b.kind.to_string(), "manual");
    }
}
