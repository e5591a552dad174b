//! Sensor module - sample types and pluggable providers

mod provider;
mod simulator;
mod types;

pub use provider::{ProviderError, ScriptedProvider, SensorProvider};
pub use simulator::SimulatedProvider;
pub use types::{AudioAssessment, LocationFix, MotionReading, SensorSample};
