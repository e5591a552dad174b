// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sentra

//! Event bus - observability sink for monitoring sessions
//!
//! Injected into the orchestrator so tests and embedding services can
//! observe assessments, incidents, and tick errors without scraping global
//! logger state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::escalation::Incident;
use crate::fusion::RiskAssessment;

/// Event types emitted during a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventType {
    /// A per-tick risk assessment
    Assessment,
    /// An escalation fired
    Incident,
    /// A tick-level processing error
    Error,
}

/// Generic event wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic event id within this bus
    pub id: u64,
    /// Event type tag
    pub event_type: EventType,
    /// Emission time
    pub timestamp: DateTime<Utc>,
    /// Event payload
    pub payload: EventPayload,
}

/// Payload carried by an [`Event`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    /// A per-tick risk assessment
    Assessment(RiskAssessment),
    /// An escalation fired
    Incident(Incident),
    /// A tick-level processing error
    Error {
        /// Diagnostic message
        message: String,
    },
}

/// Central pub/sub bus for session events
pub struct EventBus {
    assessment_tx: broadcast::Sender<RiskAssessment>,
    incident_tx: broadcast::Sender<Incident>,
    event_tx: broadcast::Sender<Event>,
    event_counter: std::sync::atomic::AtomicU64,
}

impl EventBus {
    /// Create a bus whose channels buffer up to `capacity` events per
    /// subscriber
    pub fn new(capacity: usize) -> Self {
        let (assessment_tx, _) = broadcast::channel(capacity);
        let (incident_tx, _) = broadcast::channel(capacity);
        let (event_tx, _) = broadcast::channel(capacity);

        Self {
            assessment_tx,
            incident_tx,
            event_tx,
            event_counter: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Publish a per-tick assessment
    pub fn publish_assessment(&self, assessment: RiskAssessment) {
        let _ = self.assessment_tx.send(assessment.clone());
        self.publish_event(EventType::Assessment, EventPayload::Assessment(assessment));
    }

    /// Publish a fired incident
    pub fn publish_incident(&self, incident: Incident) {
        let _ = self.incident_tx.send(incident.clone());
        self.publish_event(EventType::Incident, EventPayload::Incident(incident));
    }

    /// Publish a tick-level error
    pub fn publish_error(&self, message: &str) {
        self.publish_event(
            EventType::Error,
            EventPayload::Error {
                message: message.to_string(),
            },
        );
    }

    fn publish_event(&self, event_type: EventType, payload: EventPayload) {
        let id = self
            .event_counter
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let event = Event {
            id,
            event_type,
            timestamp: Utc::now(),
            payload,
        };
        let _ = self.event_tx.send(event);
    }

    /// Subscribe to per-tick assessments
    pub fn subscribe_assessments(&self) -> broadcast::Receiver<RiskAssessment> {
        self.assessment_tx.subscribe()
    }

    /// Subscribe to fired incidents
    pub fn subscribe_incidents(&self) -> broadcast::Receiver<Incident> {
        self.incident_tx.subscribe()
    }

    /// Subscribe to the combined event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
