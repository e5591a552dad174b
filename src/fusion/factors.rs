// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sentra

//! Per-factor risk analyzers
//!
//! Each analyzer turns one sub-reading into a weighted contribution plus an
//! optional human-readable reason. Analyzers return `Result` values so the
//! fusion engine can degrade a single faulty factor to zero without
//! aborting the rest of the assessment.

use anyhow::{bail, Result};

use crate::config::RiskConfig;
use crate::profile::SafeZone;
use crate::sensors::{AudioAssessment, LocationFix, MotionReading};

/// One factor's weighted share of the final risk score
#[derive(Debug, Clone)]
pub struct FactorScore {
    /// Weighted contribution to the final score, >= 0
    pub contribution: f64,
    /// Reason emitted for this factor, if it cleared its reporting threshold
    pub reason: Option<String>,
}

impl FactorScore {
    fn silent(contribution: f64) -> Self {
        Self {
            contribution,
            reason: None,
        }
    }
}

/// Distance outside the nearest safe zone at which the location sub-score
/// saturates, in meters.
const LOCATION_SATURATION_M: f64 = 10_000.0;

/// Location risk: zero inside a known-safe zone, growing with distance
/// outside all of them. Raw sub-score lives in [0, 0.3] and is scaled by
/// the location weight.
pub fn analyze_location(
    fix: &LocationFix,
    safe_zones: &[SafeZone],
    cfg: &RiskConfig,
) -> Result<FactorScore> {
    if !fix.latitude.is_finite() || !fix.longitude.is_finite() {
        bail!("non-finite coordinates in GPS fix");
    }

    if safe_zones.is_empty() {
        // No zones to judge against
        return Ok(FactorScore::silent(0.0));
    }

    let mut nearest_excess_m = f64::INFINITY;
    for zone in safe_zones {
        let excess = zone.distance_m(fix.latitude, fix.longitude) - zone.radius_m;
        if excess <= 0.0 {
            return Ok(FactorScore::silent(0.0));
        }
        nearest_excess_m = nearest_excess_m.min(excess);
    }

    let raw = ((nearest_excess_m / LOCATION_SATURATION_M) * 0.3).clamp(0.0, 0.3);
    let reason = (raw > 0.15).then(|| "Location analysis: In unsafe area".to_string());

    Ok(FactorScore {
        contribution: raw * cfg.location_weight,
        reason,
    })
}

/// Motion risk: acceleration magnitude against the full-scale value.
/// A violent, sudden movement may indicate a struggle.
pub fn analyze_motion(motion: &MotionReading, cfg: &RiskConfig) -> Result<FactorScore> {
    if !motion.magnitude.is_finite() {
        bail!("non-finite accelerometer magnitude");
    }
    if motion.magnitude < 0.0 {
        bail!("negative accelerometer magnitude");
    }

    let raw = (motion.magnitude / cfg.motion_full_scale).min(1.0);
    let reason = (raw > 0.5).then(|| "Unusual movement detected".to_string());

    Ok(FactorScore {
        contribution: raw * cfg.motion_weight,
        reason,
    })
}

/// Audio risk: the distress pipeline's confidence when it flags distress,
/// nothing otherwise.
pub fn analyze_audio(audio: &AudioAssessment, cfg: &RiskConfig) -> Result<FactorScore> {
    if !audio.confidence.is_finite() {
        bail!("non-finite audio confidence");
    }

    if !audio.distress_detected {
        return Ok(FactorScore::silent(0.0));
    }

    let raw = audio.confidence.clamp(0.0, 1.0);
    Ok(FactorScore {
        contribution: raw * cfg.audio_weight,
        reason: Some("Distress detected in audio".to_string()),
    })
}

/// Battery risk: flat penalty once the device is close to dying
pub fn analyze_battery(battery: u8, cfg: &RiskConfig) -> FactorScore {
    if battery < cfg.low_battery_cutoff {
        FactorScore {
            contribution: cfg.battery_penalty,
            reason: Some("Low battery".to_string()),
        }
    } else {
        FactorScore::silent(0.0)
    }
}
