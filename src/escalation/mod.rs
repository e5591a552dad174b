// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sentra

//! Escalation orchestrator - session state machine and monitoring loop

mod incident;

pub use incident::{Incident, IncidentKind};

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::time::{interval, timeout, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::{Config, MonitorConfig};
use crate::dispatch::AlertDispatcher;
use crate::events::EventBus;
use crate::fusion::{FusionEngine, RiskAssessment};
use crate::profile::SafetyProfile;
use crate::sensors::SensorProvider;

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No profile bound; monitoring refused
    Inactive,
    /// Profile bound, no loop running
    ActiveIdle,
    /// Monitoring loop in flight
    ActiveMonitoring,
}

/// Mutable session state guarded by the orchestrator.
///
/// The incident and alert-history logs are append-only: entries are never
/// mutated or removed by this core, and both logs are appended under one
/// write guard per escalation so their relative order matches the order of
/// the samples that produced them.
#[derive(Debug, Default)]
struct SessionState {
    phase: SessionPhase,
    profile: Option<SafetyProfile>,
    incidents: Vec<Incident>,
    alert_history: Vec<Incident>,
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::Inactive
    }
}

/// Read-only status snapshot
#[derive(Debug, Clone, serde::Serialize)]
pub struct StatusSnapshot {
    /// Whether a profile is bound (idle or monitoring)
    pub is_active: bool,
    /// Bound person's name, if any
    pub user: Option<String>,
    /// Cumulative alert-history length
    pub total_alerts: usize,
    /// Cumulative incident-log length
    pub incidents_logged: usize,
}

/// Drives the sampling cadence, feeds samples through the fusion engine,
/// fires escalations, and records incidents.
///
/// Designed to sit behind an [`Arc`]: `deactivate`, `manual_alert`, and
/// `get_status` are safe to call from other tasks while a `monitor` loop is
/// in flight; cancellation is observed within one sampling interval.
pub struct Orchestrator {
    monitor_cfg: MonitorConfig,
    fusion: FusionEngine,
    provider: Mutex<Box<dyn SensorProvider>>,
    dispatcher: Arc<dyn AlertDispatcher>,
    events: Arc<EventBus>,
    state: RwLock<SessionState>,
    cancel_tx: broadcast::Sender<()>,
}

impl Orchestrator {
    /// Build an orchestrator over the given boundaries. Created inactive.
    pub fn new(
        config: &Config,
        provider: Box<dyn SensorProvider>,
        dispatcher: Arc<dyn AlertDispatcher>,
        events: Arc<EventBus>,
    ) -> Self {
        let (cancel_tx, _) = broadcast::channel(8);
        Self {
            monitor_cfg: config.monitor.clone(),
            fusion: FusionEngine::new(config.risk.clone()),
            provider: Mutex::new(provider),
            dispatcher,
            events,
            state: RwLock::new(SessionState::default()),
            cancel_tx,
        }
    }

    /// Bind a profile and enter `ActiveIdle`. Returns `false` only if the
    /// profile itself fails validation; never panics into the caller.
    pub async fn activate(&self, profile: SafetyProfile) -> bool {
        if let Err(e) = profile.validate() {
            error!("Activation failed: {e:#}");
            return false;
        }

        let mut state = self.state.write().await;
        if state.phase == SessionPhase::ActiveMonitoring {
            // Rebinding mid-run stops the loop first
            let _ = self.cancel_tx.send(());
        }
        info!("Agent activated for: {}", profile.name);
        state.profile = Some(profile);
        state.phase = SessionPhase::ActiveIdle;
        true
    }

    /// Enter `Inactive` and stop any in-progress monitoring loop. The
    /// profile and logs persist for the process lifetime.
    pub async fn deactivate(&self) {
        let mut state = self.state.write().await;
        state.phase = SessionPhase::Inactive;
        let _ = self.cancel_tx.send(());
        info!("Agent deactivated");
    }

    /// Run the monitoring loop for up to `duration`, sampling at the
    /// configured cadence. No-op with a warning unless the session is
    /// `ActiveIdle`. Returns early when cancelled by `deactivate` or a
    /// re-activation, observing the signal within one sampling interval.
    pub async fn monitor(&self, duration: Duration) {
        // The cancel receiver is created under the same guard deactivate
        // takes, so a cancel sent after this point always has a subscriber.
        let mut cancel_rx = {
            let mut state = self.state.write().await;
            match state.phase {
                SessionPhase::ActiveIdle => state.phase = SessionPhase::ActiveMonitoring,
                SessionPhase::Inactive => {
                    warn!("Agent not active");
                    return;
                }
                SessionPhase::ActiveMonitoring => {
                    warn!("Monitoring already in progress");
                    return;
                }
            }
            self.cancel_tx.subscribe()
        };

        info!("Monitoring started for {:?}", duration);
        let cadence = Duration::from_secs(self.monitor_cfg.cadence_secs.max(1));
        let deadline = Instant::now() + duration;
        let mut ticker = interval(cadence);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut iteration = 0u64;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    iteration += 1;
                    self.tick(iteration).await;
                    // A phase flip that somehow outran the cancel signal
                    // still stops the loop within one tick
                    if self.state.read().await.phase != SessionPhase::ActiveMonitoring {
                        info!("Monitoring cancelled");
                        break;
                    }
                    if Instant::now() >= deadline {
                        break;
                    }
                }
                _ = cancel_rx.recv() => {
                    info!("Monitoring cancelled");
                    break;
                }
                _ = tokio::time::sleep_until(deadline) => {
                    break;
                }
            }
        }

        let mut state = self.state.write().await;
        if state.phase == SessionPhase::ActiveMonitoring {
            state.phase = SessionPhase::ActiveIdle;
        }
        info!("Monitoring ended after {} iterations", iteration);
    }

    /// One sampling tick: acquire a sample, fuse it, escalate if the score
    /// crosses the threshold. A failed tick degrades to a zero-risk
    /// assessment and the loop carries on.
    async fn tick(&self, iteration: u64) {
        let profile = {
            let state = self.state.read().await;
            if state.phase != SessionPhase::ActiveMonitoring {
                return;
            }
            match &state.profile {
                Some(profile) => profile.clone(),
                None => return,
            }
        };

        let budget = Duration::from_secs(self.monitor_cfg.sample_timeout_secs.max(1));
        let sample = {
            let mut provider = self.provider.lock().await;
            timeout(budget, provider.sample()).await
        };

        let assessment = match sample {
            Ok(Ok(sample)) => self.fusion.assess(&sample, &profile),
            Ok(Err(e)) => {
                error!("Error collecting sensor data: {e}");
                self.events.publish_error(&e.to_string());
                RiskAssessment::degraded(Utc::now())
            }
            Err(_) => {
                error!("Sensor read exceeded {budget:?} budget");
                self.events.publish_error("sensor read timed out");
                RiskAssessment::degraded(Utc::now())
            }
        };

        info!(
            "Iteration {}: Risk Level = {:.2} ({})",
            iteration, assessment.risk_score, assessment.category
        );
        if !assessment.reasons.is_empty() {
            debug!("Risk reasons: {:?}", assessment.reasons);
        }

        let score = assessment.risk_score;
        self.events.publish_assessment(assessment);

        if score >= self.monitor_cfg.escalation_threshold {
            warn!("High risk detected, escalating");
            self.handle_escalation(score, IncidentKind::Automatic).await;
        }
    }

    /// Manually trigger a maximal-risk incident, bypassing fusion. Callable
    /// in any active state; returns `false` when the session is inactive.
    pub async fn manual_alert(&self) -> bool {
        {
            let state = self.state.read().await;
            if state.phase == SessionPhase::Inactive {
                warn!("Agent not active");
                return false;
            }
        }

        warn!("Manual emergency alert triggered");
        self.handle_escalation(1.0, IncidentKind::Manual).await;
        true
    }

    /// Build the incident, append it to both logs, publish it, and hand it
    /// to the dispatcher. Hand-off counts as success once the call returns;
    /// delivery faults are logged, never unwound.
    async fn handle_escalation(&self, risk_score: f64, kind: IncidentKind) {
        let (incident, contacts) = {
            let mut state = self.state.write().await;
            let user = state
                .profile
                .as_ref()
                .map(|p| p.name.clone())
                .unwrap_or_else(|| "unknown".to_string());
            let contacts = state
                .profile
                .as_ref()
                .map(|p| p.emergency_contacts.clone())
                .unwrap_or_default();

            let incident = Incident::new(&user, risk_score, kind);
            state.alert_history.push(incident.clone());
            state.incidents.push(incident.clone());
            (incident, contacts)
        };

        error!(
            "EMERGENCY ALERT: user={} risk={:.2} kind={}",
            incident.user, incident.risk_score, incident.kind
        );
        self.events.publish_incident(incident.clone());

        match self.dispatcher.deliver(&incident, &contacts).await {
            Ok(result) => info!(
                "Alert handed off: {}/{} contacts reached",
                result.delivered, result.attempted
            ),
            Err(e) => error!("Alert delivery failed: {e:#}"),
        }
    }

    /// Read-only status snapshot; never mutates state
    pub async fn get_status(&self) -> StatusSnapshot {
        let state = self.state.read().await;
        StatusSnapshot {
            is_active: state.phase != SessionPhase::Inactive,
            user: state.profile.as_ref().map(|p| p.name.clone()),
            total_alerts: state.alert_history.len(),
            incidents_logged: state.incidents.len(),
        }
    }

    /// Snapshot of the incident log, oldest first
    pub async fn incidents(&self) -> Vec<Incident> {
        self.state.read().await.incidents.clone()
    }

    /// Snapshot of the alert history, oldest first
    pub async fn alert_history(&self) -> Vec<Incident> {
        self.state.read().await.alert_history.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dispatch::{AlertDispatcher, DeliveryResult};
    use crate::profile::Contact;
    use crate::sensors::{AudioAssessment, MotionReading, ScriptedProvider, SensorSample};
    use anyhow::Result;
    use async_trait::async_trait;

    struct RecordingDispatcher {
        delivered: std::sync::Mutex<Vec<Incident>>,
    }

    impl RecordingDispatcher {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                delivered: std::sync::Mutex::new(Vec::new()),
            })
        }

        fn count(&self) -> usize {
            self.delivered.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl AlertDispatcher for RecordingDispatcher {
        async fn deliver(
            &self,
            incident: &Incident,
            contacts: &[Contact],
        ) -> Result<DeliveryResult> {
            self.delivered.lock().unwrap().push(incident.clone());
            Ok(DeliveryResult {
                attempted: contacts.len(),
                delivered: contacts.len(),
            })
        }
    }

    struct CountingProvider {
        samples_taken: Arc<std::sync::atomic::AtomicUsize>,
    }

    #[async_trait]
    impl SensorProvider for CountingProvider {
        async fn sample(&mut self) -> Result<SensorSample, crate::sensors::ProviderError> {
            self.samples_taken
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(quiet_sample())
        }
    }

    fn profile() -> SafetyProfile {
        SafetyProfile::new("Asha", "+1-555-0100").with_contact("Mom", "+1-555-0101")
    }

    fn quiet_sample() -> SensorSample {
        SensorSample::empty().with_battery(80)
    }

    fn high_risk_sample() -> SensorSample {
        SensorSample::empty()
            .with_motion(MotionReading::from_axes(0.0, 0.0, 50.0))
            .with_audio(AudioAssessment {
                noise_level_db: 90.0,
                distress_detected: true,
                confidence: 1.0,
            })
    }

    fn orchestrator_with(
        config: Config,
        provider: ScriptedProvider,
        dispatcher: Arc<RecordingDispatcher>,
    ) -> Orchestrator {
        Orchestrator::new(
            &config,
            Box::new(provider),
            dispatcher,
            Arc::new(EventBus::default()),
        )
    }

    #[tokio::test]
    async fn test_activate_rejects_invalid_profile() {
        let orchestrator = orchestrator_with(
            Config::default(),
            ScriptedProvider::new(vec![quiet_sample()]),
            RecordingDispatcher::new(),
        );

        assert!(!orchestrator.activate(SafetyProfile::new("", "")).await);
        assert!(!orchestrator.get_status().await.is_active);
    }

    #[tokio::test]
    async fn test_activate_binds_profile() {
        let orchestrator = orchestrator_with(
            Config::default(),
            ScriptedProvider::new(vec![quiet_sample()]),
            RecordingDispatcher::new(),
        );

        assert!(orchestrator.activate(profile()).await);
        let status = orchestrator.get_status().await;
        assert!(status.is_active);
        assert_eq!(status.user.as_deref(), Some("Asha"));
        assert_eq!(status.total_alerts, 0);
    }

    #[tokio::test]
    async fn test_manual_alert_requires_active_session() {
        let orchestrator = orchestrator_with(
            Config::default(),
            ScriptedProvider::new(vec![quiet_sample()]),
            RecordingDispatcher::new(),
        );

        assert!(!orchestrator.manual_alert().await);
        assert_eq!(orchestrator.get_status().await.incidents_logged, 0);
    }

    #[tokio::test]
    async fn test_manual_alert_records_maximal_incident() {
        let dispatcher = RecordingDispatcher::new();
        let orchestrator = orchestrator_with(
            Config::default(),
            ScriptedProvider::new(vec![quiet_sample()]),
            dispatcher.clone(),
        );
        orchestrator.activate(profile()).await;

        assert!(orchestrator.manual_alert().await);

        let status = orchestrator.get_status().await;
        assert_eq!(status.total_alerts, 1);
        assert_eq!(status.incidents_logged, 1);

        let incidents = orchestrator.incidents().await;
        assert_eq!(incidents[0].risk_score, 1.0);
        assert_eq!(incidents[0].kind, IncidentKind::Manual);
        assert_eq!(incidents[0].user, "Asha");
        assert_eq!(dispatcher.count(), 1);
    }

    #[tokio::test]
    async fn test_monitor_refused_when_inactive() {
        let orchestrator = orchestrator_with(
            Config::default(),
            ScriptedProvider::new(vec![quiet_sample()]),
            RecordingDispatcher::new(),
        );

        orchestrator.monitor(Duration::from_secs(4)).await;
        assert_eq!(orchestrator.get_status().await.incidents_logged, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_sub_threshold_produces_no_incidents() {
        let orchestrator = orchestrator_with(
            Config::default(),
            ScriptedProvider::new(vec![quiet_sample()]),
            RecordingDispatcher::new(),
        );
        orchestrator.activate(profile()).await;

        let started = Instant::now();
        orchestrator.monitor(Duration::from_secs(6)).await;
        assert!(started.elapsed() <= Duration::from_secs(6) + Duration::from_millis(100));

        let status = orchestrator.get_status().await;
        assert_eq!(status.incidents_logged, 0);
        assert_eq!(status.total_alerts, 0);
        // Back to idle, still active
        assert!(status.is_active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_escalates_and_keeps_sampling() {
        let mut config = Config::default();
        // Reachable with motion + audio factors alone
        config.monitor.escalation_threshold = 0.5;

        let dispatcher = RecordingDispatcher::new();
        let orchestrator = orchestrator_with(
            config,
            ScriptedProvider::new(vec![high_risk_sample()]),
            dispatcher.clone(),
        );
        orchestrator.activate(profile()).await;

        orchestrator.monitor(Duration::from_secs(6)).await;

        let incidents = orchestrator.incidents().await;
        // Escalation does not terminate the loop; every tick fired
        assert!(incidents.len() >= 2, "got {} incidents", incidents.len());
        assert!(incidents.iter().all(|i| i.kind == IncidentKind::Automatic));
        assert!(incidents.iter().all(|i| i.risk_score >= 0.5));
        assert_eq!(dispatcher.count(), incidents.len());

        // Same relative order as the ticks that produced them
        for pair in incidents.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deactivate_cancels_monitor() {
        let orchestrator = Arc::new(orchestrator_with(
            Config::default(),
            ScriptedProvider::new(vec![quiet_sample()]),
            RecordingDispatcher::new(),
        ));
        orchestrator.activate(profile()).await;

        let runner = Arc::clone(&orchestrator);
        let handle = tokio::spawn(async move {
            runner.monitor(Duration::from_secs(600)).await;
        });

        tokio::time::sleep(Duration::from_secs(3)).await;
        orchestrator.deactivate().await;

        // The loop must observe cancellation within one sampling interval
        tokio::time::timeout(Duration::from_secs(3), handle)
            .await
            .expect("monitor did not stop after deactivate")
            .unwrap();

        assert!(!orchestrator.get_status().await.is_active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_samples_taken_after_deactivate() {
        let samples_taken = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let orchestrator = Arc::new(Orchestrator::new(
            &Config::default(),
            Box::new(CountingProvider {
                samples_taken: Arc::clone(&samples_taken),
            }),
            RecordingDispatcher::new(),
            Arc::new(EventBus::default()),
        ));
        orchestrator.activate(profile()).await;

        let runner = Arc::clone(&orchestrator);
        let handle = tokio::spawn(async move {
            runner.monitor(Duration::from_secs(600)).await;
        });

        // Ticks land at t=0 and t=2 before the cut-off at t=3
        tokio::time::sleep(Duration::from_secs(3)).await;
        orchestrator.deactivate().await;
        tokio::time::timeout(Duration::from_secs(3), handle)
            .await
            .expect("monitor did not stop after deactivate")
            .unwrap();

        let at_stop = samples_taken.load(std::sync::atomic::Ordering::SeqCst);
        assert_eq!(at_stop, 2);

        // An inactive session must not keep sampling, however long we wait
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(samples_taken.load(std::sync::atomic::Ordering::SeqCst), at_stop);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_failure_degrades_but_never_aborts() {
        let events = Arc::new(EventBus::default());
        let orchestrator = Orchestrator::new(
            &Config::default(),
            // Script exhausts immediately; every tick fails
            Box::new(ScriptedProvider::once(vec![])),
            RecordingDispatcher::new(),
            Arc::clone(&events),
        );
        orchestrator.activate(profile()).await;

        let mut assessments = events.subscribe_assessments();
        orchestrator.monitor(Duration::from_secs(4)).await;

        let first = assessments.recv().await.unwrap();
        assert_eq!(first.risk_score, 0.0);
        assert_eq!(first.reasons, vec!["Analysis error".to_string()]);
        assert_eq!(orchestrator.get_status().await.incidents_logged, 0);
    }

    #[tokio::test]
    async fn test_logs_are_append_only() {
        let orchestrator = orchestrator_with(
            Config::default(),
            ScriptedProvider::new(vec![quiet_sample()]),
            RecordingDispatcher::new(),
        );
        orchestrator.activate(profile()).await;

        orchestrator.manual_alert().await;
        let after_one = orchestrator.incidents().await;

        orchestrator.manual_alert().await;
        orchestrator.deactivate().await;
        let after_two = orchestrator.incidents().await;

        assert_eq!(after_one.len(), 1);
        assert_eq!(after_two.len(), 2);
        // Earlier entries are never mutated
        assert_eq!(after_two[0].id, after_one[0].id);
        assert_eq!(
            orchestrator.alert_history().await.len(),
            after_two.len()
        );
    }

    #[tokio::test]
    async fn test_logs_persist_across_deactivate_cycles() {
        let orchestrator = orchestrator_with(
            Config::default(),
            ScriptedProvider::new(vec![quiet_sample()]),
            RecordingDispatcher::new(),
        );

        orchestrator.activate(profile()).await;
        orchestrator.manual_alert().await;
        orchestrator.deactivate().await;

        orchestrator.activate(profile()).await;
        orchestrator.manual_alert().await;

        let status = orchestrator.get_status().await;
        assert_eq!(status.total_alerts, 2);
        assert_eq!(status.incidents_logged, 2);
    }
}
