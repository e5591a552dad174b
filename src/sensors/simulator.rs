// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sentra

//! Simulated sensor provider for demo/testing

use async_trait::async_trait;
use chrono::Utc;
use rand::prelude::*;
use rand_distr::Normal;

use crate::config::SensorConfig;

use super::{
    AudioAssessment, LocationFix, MotionReading, ProviderError, SensorProvider, SensorSample,
};

/// Generates plausible device readings in place of real GPS, accelerometer,
/// and microphone pipelines. A production build substitutes a provider backed
/// by platform APIs; the fusion and escalation logic is identical either way.
pub struct SimulatedProvider {
    toggles: SensorConfig,
    rng: StdRng,

    // Simulation state
    home: (f64, f64),
    distress_probability: f64,
}

impl SimulatedProvider {
    /// Simulate a device wandering near the given home coordinate
    pub fn new(toggles: SensorConfig, home_latitude: f64, home_longitude: f64) -> Self {
        Self {
            toggles,
            rng: StdRng::from_entropy(),
            home: (home_latitude, home_longitude),
            distress_probability: 0.1,
        }
    }

    /// Seeded variant for reproducible runs
    pub fn with_seed(
        toggles: SensorConfig,
        home_latitude: f64,
        home_longitude: f64,
        seed: u64,
    ) -> Self {
        Self {
            toggles,
            rng: StdRng::seed_from_u64(seed),
            home: (home_latitude, home_longitude),
            distress_probability: 0.1,
        }
    }

    /// Probability per sample that the simulated microphone flags distress
    pub fn set_distress_probability(&mut self, p: f64) {
        self.distress_probability = p.clamp(0.0, 1.0);
    }

    fn generate_location(&mut self) -> LocationFix {
        LocationFix {
            latitude: self.home.0 + self.rng.gen_range(-0.01..0.01),
            longitude: self.home.1 + self.rng.gen_range(-0.01..0.01),
            accuracy_m: self.rng.gen_range(5.0..20.0),
        }
    }

    fn generate_motion(&mut self) -> MotionReading {
        let x = self.rng.gen_range(-10.0..10.0);
        let y = self.rng.gen_range(-10.0..10.0);
        let z = self.rng.gen_range(-10.0..10.0);
        MotionReading::from_axes(x, y, z)
    }

    fn generate_audio(&mut self) -> AudioAssessment {
        // Street-level ambient noise, clamped to the meter's dB window
        let noise = self
            .rng
            .sample::<f64, _>(Normal::new(65.0, 12.0).expect("valid distribution"))
            .clamp(40.0, 90.0);

        AudioAssessment {
            noise_level_db: noise,
            distress_detected: self.rng.gen::<f64>() < self.distress_probability,
            confidence: self.rng.gen_range(0.5..1.0),
        }
    }
}

#[async_trait]
impl SensorProvider for SimulatedProvider {
    async fn sample(&mut self) -> Result<SensorSample, ProviderError> {
        let location = self.toggles.gps_enabled.then(|| self.generate_location());
        let motion = self
            .toggles
            .accelerometer_enabled
            .then(|| self.generate_motion());
        let audio = self
            .toggles
            .microphone_enabled
            .then(|| self.generate_audio());

        Ok(SensorSample {
            timestamp: Utc::now(),
            location,
            motion,
            audio,
            battery: self.rng.gen_range(20..=100),
            signal_strength: self.rng.gen_range(1..=5),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_categories_are_omitted() {
        let toggles = SensorConfig {
            gps_enabled: false,
            accelerometer_enabled: false,
            microphone_enabled: false,
        };
        let mut provider = SimulatedProvider::with_seed(toggles, 28.6139, 77.2090, 7);

        let sample = provider.sample().await.unwrap();
        assert!(sample.location.is_none());
        assert!(sample.motion.is_none());
        assert!(sample.audio.is_none());
    }

    #[tokio::test]
    async fn test_enabled_categories_stay_in_range() {
        let mut provider =
            SimulatedProvider::with_seed(SensorConfig::default(), 28.6139, 77.2090, 7);

        for _ in 0..64 {
            let sample = provider.sample().await.unwrap();
            let fix = sample.location.expect("gps enabled");
            assert!((fix.latitude - 28.6139).abs() <= 0.01);
            assert!((fix.longitude - 77.2090).abs() <= 0.01);
            assert!((5.0..20.0).contains(&fix.accuracy_m));

            let audio = sample.audio.expect("microphone enabled");
            assert!((40.0..=90.0).contains(&audio.noise_level_db));
            assert!((0.5..1.0).contains(&audio.confidence));

            assert!((20..=100).contains(&sample.battery));
            assert!((1..=5).contains(&sample.signal_strength));
        }
    }
}
