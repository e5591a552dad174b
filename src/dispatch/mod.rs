// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sentra

//! Alert dispatch boundary
//!
//! The orchestrator hands finalized incidents to an [`AlertDispatcher`] and
//! treats the hand-off as success once the call returns. Retry, backoff, and
//! the actual SMS/call/push plumbing live behind this trait.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::escalation::Incident;
use crate::profile::Contact;

/// Outcome of one delivery attempt across a contact list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryResult {
    /// Contacts the dispatcher attempted to reach
    pub attempted: usize,
    /// Contacts the dispatcher believes were reached
    pub delivered: usize,
}

/// Delivers incidents to emergency contacts and authorities
#[async_trait]
pub trait AlertDispatcher: Send + Sync {
    /// Deliver one incident to the given contacts. The orchestrator does
    /// not retry; any retry policy is internal to the implementation.
    async fn deliver(&self, incident: &Incident, contacts: &[Contact]) -> Result<DeliveryResult>;
}

/// Dispatcher that records deliveries in the process log only. Stands in
/// for a real SMS/call gateway in demos and local runs.
pub struct LogDispatcher;

#[async_trait]
impl AlertDispatcher for LogDispatcher {
    async fn deliver(&self, incident: &Incident, contacts: &[Contact]) -> Result<DeliveryResult> {
        if contacts.is_empty() {
            error!(
                incident = %incident.id,
                "no emergency contacts configured; alert not deliverable"
            );
            return Ok(DeliveryResult {
                attempted: 0,
                delivered: 0,
            });
        }

        for contact in contacts {
            info!(
                incident = %incident.id,
                kind = %incident.kind,
                risk = incident.risk_score,
                "EMERGENCY ALERT -> {} ({})",
                contact.name,
                contact.phone
            );
        }

        Ok(DeliveryResult {
            attempted: contacts.len(),
            delivered: contacts.len(),
        })
    }
}
