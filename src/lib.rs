// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sentra

//! Sentra - Personal Safety Monitoring Agent
//!
//! Continuously samples proxies for a person's physical state (location,
//! motion, ambient audio, device health), fuses them into a bounded risk
//! score with attributed reasons, and escalates to an emergency-alert state
//! when that estimate crosses a threshold.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Escalation Orchestrator                 │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌──────────┐   ┌───────────┐             │
//! │  │ Sensor   │ → │  Fusion  │ → │ Escalation│ → Dispatcher│
//! │  │ Provider │   │  Engine  │   │  Policy   │             │
//! │  └──────────┘   └──────────┘   └───────────┘             │
//! │        ↓             ↓              ↓                    │
//! │  ┌──────────────────────────────────────────┐            │
//! │  │                Event Bus                 │            │
//! │  └──────────────────────────────────────────┘            │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Sensor acquisition and alert delivery are pluggable boundaries: the
//! orchestrator only sees the [`sensors::SensorProvider`] and
//! [`dispatch::AlertDispatcher`] traits, so real hardware and real
//! SMS/call gateways can replace the shipped simulations without touching
//! the fusion or escalation core.

#![warn(missing_docs)]

pub mod config;
pub mod dispatch;
pub mod escalation;
pub mod events;
pub mod fusion;
pub mod profile;
pub mod sensors;

// Re-exports for convenience
pub use config::Config;
pub use dispatch::{AlertDispatcher, DeliveryResult, LogDispatcher};
pub use escalation::{Incident, IncidentKind, Orchestrator, SessionPhase, StatusSnapshot};
pub use events::EventBus;
pub use fusion::{FusionEngine, RiskAssessment, RiskCategory};
pub use profile::{Contact, SafetyProfile, SafeZone};
pub use sensors::{
    ScriptedProvider, SensorProvider, SensorSample, SimulatedProvider,
};

/// Sentra version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sentra name
pub const NAME: &str = "Sentra";
