// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sentra

//! Risk fusion engine - weighted combination of per-factor sub-scores

mod factors;

pub use factors::FactorScore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::config::RiskConfig;
use crate::profile::SafetyProfile;
use crate::sensors::SensorSample;

/// Coarse risk bucket derived from the score for display and decisioning
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskCategory {
    /// Score in [0, medium_cut)
    Low,
    /// Score in [medium_cut, high_cut)
    Medium,
    /// Score in [high_cut, critical_cut)
    High,
    /// Score in [critical_cut, 1]
    Critical,
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskCategory::Low => "LOW",
            RiskCategory::Medium => "MEDIUM",
            RiskCategory::High => "HIGH",
            RiskCategory::Critical => "CRITICAL",
        };
        f.write_str(name)
    }
}

/// The fused risk estimate for one sensor sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Normalized risk score in [0, 1]
    pub risk_score: f64,
    /// Category bucket for the score
    pub category: RiskCategory,
    /// Human-readable reasons, in factor evaluation order
    pub reasons: Vec<String>,
    /// Timestamp copied from the input sample
    pub timestamp: DateTime<Utc>,
}

impl RiskAssessment {
    /// The degraded assessment returned when a whole tick cannot be
    /// analyzed: zero risk, with a single diagnostic reason.
    pub fn degraded(timestamp: DateTime<Utc>) -> Self {
        Self {
            risk_score: 0.0,
            category: RiskCategory::Low,
            reasons: vec!["Analysis error".to_string()],
            timestamp,
        }
    }
}

/// Fuses heterogeneous, partially-available sensor readings into one bounded
/// risk score with attributed reasons.
///
/// Stateless per call; the same sample and profile always produce the same
/// assessment.
pub struct FusionEngine {
    risk: RiskConfig,
}

impl FusionEngine {
    /// Build an engine with the given tuning
    pub fn new(risk: RiskConfig) -> Self {
        Self { risk }
    }

    /// Map a score to its category bucket. Total over [0, 1], half-open at
    /// each cut, inclusive-lower for the higher band.
    pub fn categorize(&self, score: f64) -> RiskCategory {
        if score < self.risk.medium_cut {
            RiskCategory::Low
        } else if score < self.risk.high_cut {
            RiskCategory::Medium
        } else if score < self.risk.critical_cut {
            RiskCategory::High
        } else {
            RiskCategory::Critical
        }
    }

    /// Assess one sample against the bound profile.
    ///
    /// Absent sub-readings contribute zero and emit no reason. A faulty
    /// factor is degraded to zero with a diagnostic reason; only when every
    /// present factor faults does the whole assessment degrade.
    pub fn assess(&self, sample: &SensorSample, profile: &SafetyProfile) -> RiskAssessment {
        let mut score = 0.0_f64;
        let mut reasons = Vec::new();
        let mut attempted = 0usize;
        let mut faulted = 0usize;

        let mut apply = |result: anyhow::Result<FactorScore>, factor: &str| match result {
            Ok(fs) => {
                score = (score + fs.contribution.max(0.0)).clamp(0.0, 1.0);
                if let Some(reason) = fs.reason {
                    reasons.push(reason);
                }
                true
            }
            Err(e) => {
                debug!("{factor} factor degraded: {e:#}");
                reasons.push(format!("{factor} analysis error"));
                false
            }
        };

        if let Some(fix) = &sample.location {
            attempted += 1;
            if !apply(
                factors::analyze_location(fix, &profile.safe_zones, &self.risk),
                "Location",
            ) {
                faulted += 1;
            }
        }

        if let Some(motion) = &sample.motion {
            attempted += 1;
            if !apply(factors::analyze_motion(motion, &self.risk), "Motion") {
                faulted += 1;
            }
        }

        if let Some(audio) = &sample.audio {
            attempted += 1;
            if !apply(factors::analyze_audio(audio, &self.risk), "Audio") {
                faulted += 1;
            }
        }

        let battery = factors::analyze_battery(sample.battery, &self.risk);
        score = (score + battery.contribution).clamp(0.0, 1.0);
        if let Some(reason) = battery.reason {
            reasons.push(reason);
        }

        if attempted > 0 && faulted == attempted && battery.contribution == 0.0 {
            return RiskAssessment::degraded(sample.timestamp);
        }

        RiskAssessment {
            risk_score: score,
            category: self.categorize(score),
            reasons,
            timestamp: sample.timestamp,
        }
    }
}

impl Default for FusionEngine {
    fn default() -> Self {
        Self::new(RiskConfig::default())
    }
}
