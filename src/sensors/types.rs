// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sentra

//! Sensor sample types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A GPS position fix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationFix {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Estimated horizontal accuracy in meters
    pub accuracy_m: f64,
}

/// A three-axis accelerometer reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionReading {
    /// X-axis acceleration in m/s²
    pub x: f64,
    /// Y-axis acceleration in m/s²
    pub y: f64,
    /// Z-axis acceleration in m/s²
    pub z: f64,
    /// Derived acceleration magnitude in m/s²
    pub magnitude: f64,
}

impl MotionReading {
    /// Build a reading from axis values, deriving the magnitude
    pub fn from_axes(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            magnitude: (x * x + y * y + z * z).sqrt(),
        }
    }
}

/// The microphone pipeline's distress assessment for one window of audio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioAssessment {
    /// Ambient noise level in dB
    pub noise_level_db: f64,
    /// Whether the audio pipeline flagged distress
    pub distress_detected: bool,
    /// Confidence of the distress flag in [0, 1]
    pub confidence: f64,
}

/// One timestamped bundle of raw readings, produced per sampling tick.
///
/// Any sub-reading may be `None` when its source sensor is disabled or
/// unavailable; absence means "not measured", never "measured zero".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorSample {
    /// Capture time
    pub timestamp: DateTime<Utc>,
    /// GPS fix, if the location sensor is enabled
    pub location: Option<LocationFix>,
    /// Accelerometer reading, if the motion sensor is enabled
    pub motion: Option<MotionReading>,
    /// Audio distress assessment, if the microphone is enabled
    pub audio: Option<AudioAssessment>,
    /// Device battery level, 0-100
    pub battery: u8,
    /// Network signal strength, ordinal 1-5
    pub signal_strength: u8,
}

impl SensorSample {
    /// A sample with every sub-reading absent, full battery, full signal
    pub fn empty() -> Self {
        Self {
            timestamp: Utc::now(),
            location: None,
            motion: None,
            audio: None,
            battery: 100,
            signal_strength: 5,
        }
    }

    /// Set the battery level (builder style, used by tests and demos)
    pub fn with_battery(mut self, battery: u8) -> Self {
        self.battery = battery;
        self
    }

    /// Set the motion reading (builder style)
    pub fn with_motion(mut self, motion: MotionReading) -> Self {
        self.motion = Some(motion);
        self
    }

    /// Set the audio assessment (builder style)
    pub fn with_audio(mut self, audio: AudioAssessment) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Set the location fix (builder style)
    pub fn with_location(mut self, location: LocationFix) -> Self {
        self.location = Some(location);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_magnitude_derivation() {
        let motion = MotionReading::from_axes(3.0, 4.0, 0.0);
        assert!((motion.magnitude - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_sample_has_no_sub_readings() {
        let sample = SensorSample::empty();
        assert!(sample.location.is_none());
        assert!(sample.motion.is_none());
        assert!(sample.audio.is_none());
        assert_eq!(sample.battery, 100);
    }
}
