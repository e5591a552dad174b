// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sentra

//! Sensor provider trait and deterministic scripted implementation

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::SensorSample;

/// Sensor acquisition failures surfaced at the provider boundary
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The underlying read did not complete within its budget
    #[error("sensor read timed out after {0:?}")]
    Timeout(Duration),
    /// The sensor source has nothing more to offer
    #[error("sensor source unavailable: {0}")]
    Unavailable(String),
    /// Anything else the platform layer reports
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Source of sensor samples, one bundle per tick.
///
/// Implementations must return within a bounded time; the monitoring loop
/// additionally wraps each call in its own timeout. Disabled sensor
/// categories are represented as absent sub-readings, not zero values.
#[async_trait]
pub trait SensorProvider: Send + Sync {
    /// Obtain the next sample
    async fn sample(&mut self) -> Result<SensorSample, ProviderError>;
}

/// Replays a fixed sequence of samples. Deterministic provider for tests
/// and offline replay.
pub struct ScriptedProvider {
    queue: VecDeque<SensorSample>,
    last: Option<SensorSample>,
    hold_last: bool,
}

impl ScriptedProvider {
    /// Replay the samples in order, then keep returning the final one
    pub fn new(samples: Vec<SensorSample>) -> Self {
        Self {
            queue: samples.into(),
            last: None,
            hold_last: true,
        }
    }

    /// Replay the samples in order, then fail with `Unavailable`
    pub fn once(samples: Vec<SensorSample>) -> Self {
        Self {
            queue: samples.into(),
            last: None,
            hold_last: false,
        }
    }
}

#[async_trait]
impl SensorProvider for ScriptedProvider {
    async fn sample(&mut self) -> Result<SensorSample, ProviderError> {
        if let Some(sample) = self.queue.pop_front() {
            self.last = Some(sample.clone());
            return Ok(sample);
        }
        if self.hold_last {
            if let Some(last) = &self.last {
                return Ok(last.clone());
            }
        }
        Err(ProviderError::Unavailable("script exhausted".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_replays_in_order() {
        let mut provider = ScriptedProvider::new(vec![
            SensorSample::empty().with_battery(50),
            SensorSample::empty().with_battery(40),
        ]);

        assert_eq!(provider.sample().await.unwrap().battery, 50);
        assert_eq!(provider.sample().await.unwrap().battery, 40);
        // Holds the last sample once the script runs out
        assert_eq!(provider.sample().await.unwrap().battery, 40);
    }

    #[tokio::test]
    async fn test_scripted_once_exhausts() {
        let mut provider = ScriptedProvider::once(vec![SensorSample::empty()]);

        assert!(provider.sample().await.is_ok());
        assert!(matches!(
            provider.sample().await,
            Err(ProviderError::Unavailable(_))
        ));
    }
}
