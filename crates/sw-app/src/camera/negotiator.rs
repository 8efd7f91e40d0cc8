//! Camera permission negotiator.
//!
//! Drives [`CameraPermissionMachine`] and executes its actions against the
//! camera, permission registry and preference ports.
//!
//! 摄像头权限协商器：驱动纯状态机并执行副作用。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, info_span, warn, Instrument};

use sw_core::camera::{
    AcquisitionError, CameraAcquisitionState, CameraPermissionMachine, FacingMode,
    NegotiationAction, NegotiationEvent, NegotiationPhase, PermissionState, PlanKind,
    RecoveryGuidance, StrategyPlan,
};
use sw_core::config::ScannerConfig;
use sw_core::ports::{AcquisitionPreferencePort, CameraPort, CameraStream, PermissionRegistryPort};
use sw_core::preference::AcquisitionPreference;
use sw_core::runtime::RuntimeContext;

/// Negotiator tuning taken from [`ScannerConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiatorSettings {
    pub acquisition_timeout: Duration,
    pub max_failed_attempts: u32,
    pub ideal_resolution: (u32, u32),
}

impl From<&ScannerConfig> for NegotiatorSettings {
    fn from(config: &ScannerConfig) -> Self {
        Self {
            acquisition_timeout: config.acquisition_timeout(),
            max_failed_attempts: config.max_failed_attempts,
            ideal_resolution: config.ideal_resolution(),
        }
    }
}

impl Default for NegotiatorSettings {
    fn default() -> Self {
        Self::from(&ScannerConfig::default())
    }
}

pub struct CameraNegotiator {
    camera: Arc<dyn CameraPort>,
    registry: Option<Arc<dyn PermissionRegistryPort>>,
    preference: Arc<dyn AcquisitionPreferencePort>,
    context: RuntimeContext,
    settings: NegotiatorSettings,

    phase: NegotiationPhase,
    state: CameraAcquisitionState,
    stream: Option<Arc<dyn CameraStream>>,
    permission_changes: Option<mpsc::Receiver<PermissionState>>,
}

impl CameraNegotiator {
    pub fn new(
        camera: Arc<dyn CameraPort>,
        registry: Option<Arc<dyn PermissionRegistryPort>>,
        preference: Arc<dyn AcquisitionPreferencePort>,
        context: RuntimeContext,
        settings: NegotiatorSettings,
    ) -> Self {
        Self {
            camera,
            registry,
            preference,
            context,
            settings,
            phase: NegotiationPhase::Unknown,
            state: CameraAcquisitionState::default(),
            stream: None,
            permission_changes: None,
        }
    }

    pub fn phase(&self) -> &NegotiationPhase {
        &self.phase
    }

    pub fn state(&self) -> &CameraAcquisitionState {
        &self.state
    }

    /// The live stream, only while `Granted`.
    pub fn stream(&self) -> Option<Arc<dyn CameraStream>> {
        self.stream.clone()
    }

    pub fn threshold_reached(&self) -> bool {
        self.state
            .threshold_reached(self.settings.max_failed_attempts)
    }

    /// Guidance for the current denial, if any.
    pub fn guidance(&self) -> Option<RecoveryGuidance> {
        self.phase.denial_reason().map(|reason| {
            RecoveryGuidance::for_failure(reason, &self.context, self.threshold_reached())
        })
    }

    /// Start negotiating. Installed apps prompt directly.
    pub async fn begin(&mut self) -> NegotiationPhase {
        let skip_check = self.context.is_installed_app;
        self.dispatch(NegotiationEvent::Begin { skip_check }).await
    }

    pub async fn retry(&mut self) -> NegotiationPhase {
        self.dispatch(NegotiationEvent::RetryRequested).await
    }

    /// Switch front/back camera and re-acquire with a fresh failure count.
    pub async fn toggle_facing_mode(&mut self) -> NegotiationPhase {
        self.state.facing_mode = self.state.facing_mode.toggled();
        info!(facing_mode = %self.state.facing_mode.as_str(), "camera facing mode toggled");
        self.dispatch(NegotiationEvent::FacingModeToggled).await
    }

    pub fn set_facing_mode(&mut self, facing_mode: FacingMode) {
        self.state.facing_mode = facing_mode;
    }

    /// Stop the stream, clear permission facts and walk the force-reset plan.
    pub async fn force_reset(&mut self) -> NegotiationPhase {
        self.dispatch(NegotiationEvent::ForceReset).await
    }

    /// Leave camera mode: stop the stream and return to `Unknown`.
    pub async fn release(&mut self) -> NegotiationPhase {
        self.dispatch(NegotiationEvent::Released).await
    }

    /// Feed queued registry change reports into the machine.
    pub async fn drain_permission_changes(&mut self) -> NegotiationPhase {
        let mut reported = Vec::new();
        if let Some(rx) = self.permission_changes.as_mut() {
            loop {
                match rx.try_recv() {
                    Ok(state) => reported.push(state),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        debug!("permission change channel closed");
                        self.permission_changes = None;
                        break;
                    }
                }
            }
        }

        for state in reported {
            info!(permission_state = %state.as_str(), "platform reported permission change");
            self.state.permission_state = state;
            self.dispatch(NegotiationEvent::PermissionReported(state))
                .await;
        }
        self.phase.clone()
    }

    async fn dispatch(&mut self, event: NegotiationEvent) -> NegotiationPhase {
        let span = info_span!("usecase.camera_negotiator.dispatch", event = ?event);
        async {
            let mut pending = vec![event];
            while let Some(event) = pending.pop() {
                let from = self.phase.clone();
                let event_name = format!("{:?}", event);
                let (next, actions) = CameraPermissionMachine::transition(from.clone(), event);
                info!(from = ?from, to = ?next, event = %event_name, "camera negotiation transition");
                self.phase = next;
                pending.extend(self.execute_actions(actions).await);
            }
            self.phase.clone()
        }
        .instrument(span)
        .await
    }

    async fn execute_actions(&mut self, actions: Vec<NegotiationAction>) -> Vec<NegotiationEvent> {
        let mut follow_up = Vec::new();
        for action in actions {
            debug!(?action, "camera negotiator executing action");
            match action {
                NegotiationAction::QueryPermission => {
                    let state = self.check_permission().await;
                    follow_up.push(NegotiationEvent::PermissionReported(state));
                }
                NegotiationAction::AcquireStream { plan } => {
                    self.state.is_loading = true;
                    let outcome = self.acquire_stream(plan).await;
                    self.state.is_loading = false;
                    match outcome {
                        Ok(stream) => {
                            self.stream = Some(stream);
                            follow_up.push(NegotiationEvent::AcquisitionSucceeded);
                        }
                        Err(reason) => {
                            follow_up.push(NegotiationEvent::AcquisitionFailed { reason });
                        }
                    }
                }
                NegotiationAction::ReleaseStream => self.release_stream(),
                NegotiationAction::ResetPermission => self.state.reset_permission(),
                NegotiationAction::ResetFailures => self.state.reset_failures(),
                NegotiationAction::RecordFailure { reason } => {
                    let reached = self
                        .state
                        .record_failure(self.settings.max_failed_attempts);
                    warn!(
                        reason = %reason,
                        failed_attempts = self.state.failed_attempt_count,
                        "camera acquisition failed"
                    );
                    if reached {
                        self.persist_sticky_flag().await;
                    }
                }
                NegotiationAction::RecordSuccess => self.state.record_success(),
                NegotiationAction::ClearStickyFlag => self.clear_sticky_flag().await,
            }
        }
        follow_up
    }

    /// Query the platform registry and make sure a change listener exists.
    ///
    /// Missing registry or a failed query both report `Unknown`.
    pub async fn check_permission(&mut self) -> PermissionState {
        let Some(registry) = self.registry.clone() else {
            debug!("no permission registry; treating camera permission as unknown");
            self.state.permission_state = PermissionState::Unknown;
            return PermissionState::Unknown;
        };

        if self.permission_changes.is_none() {
            match registry.subscribe().await {
                Ok(rx) => self.permission_changes = Some(rx),
                Err(err) => warn!(error = %err, "failed to subscribe to permission changes"),
            }
        }

        let state = match registry.query().await {
            Ok(state) => state,
            Err(err) => {
                warn!(error = %err, "permission query failed; treating as unknown");
                PermissionState::Unknown
            }
        };
        info!(permission_state = %state.as_str(), "camera permission checked");
        self.state.permission_state = state;
        state
    }

    /// Walk a strategy plan and return the first stream opened by a final
    /// strategy.
    ///
    /// Each attempt is bounded by the acquisition timeout; an elapsed attempt
    /// counts as `AcquisitionTimeout` and the plan moves on. A granted primer
    /// is stopped at once and the remaining primers are skipped, so the kept
    /// stream always carries the requested facing mode.
    pub async fn acquire_stream(
        &self,
        plan_kind: PlanKind,
    ) -> Result<Arc<dyn CameraStream>, AcquisitionError> {
        match self.camera.has_video_input().await {
            Ok(false) => {
                warn!("no video input device enumerated");
                return Err(AcquisitionError::NoCameraFound);
            }
            Ok(true) => {}
            Err(err) => debug!(error = %err, "device enumeration failed; trying anyway"),
        }

        let facing = self.state.facing_mode;
        let ideal = self.settings.ideal_resolution;
        let plan = match plan_kind {
            PlanKind::Standard => StrategyPlan::standard(facing, ideal, &self.context),
            PlanKind::ForceReset => StrategyPlan::force_reset(facing, ideal, &self.context),
        };

        let mut failures = Vec::with_capacity(plan.len());
        let mut primed = false;
        for strategy in plan.iter() {
            if primed && strategy.is_primer() {
                continue;
            }
            debug!(strategy = %strategy.label, constraints = ?strategy.constraints, "requesting camera stream");
            let attempt = tokio::time::timeout(
                self.settings.acquisition_timeout,
                self.camera.open_stream(&strategy.constraints),
            )
            .await;

            match attempt {
                Ok(Ok(stream)) if strategy.is_primer() => {
                    if let Err(err) = stream.stop() {
                        warn!(stream_id = %stream.id(), error = %err, "failed to stop primer tracks");
                    }
                    debug!(strategy = %strategy.label, "camera permission primed");
                    primed = true;
                }
                Ok(Ok(stream)) => {
                    info!(strategy = %strategy.label, stream_id = %stream.id(), "camera stream acquired");
                    return Ok(stream);
                }
                Ok(Err(err)) => {
                    warn!(
                        strategy = %strategy.label,
                        error = %err,
                        "{}",
                        strategy.failure_reason
                    );
                    failures.push(AcquisitionError::from(err));
                }
                Err(_) => {
                    warn!(
                        strategy = %strategy.label,
                        timeout_ms = self.settings.acquisition_timeout.as_millis() as u64,
                        "camera request timed out"
                    );
                    failures.push(AcquisitionError::AcquisitionTimeout);
                }
            }
        }

        Err(AcquisitionError::summarize(&failures))
    }

    fn release_stream(&mut self) {
        if let Some(stream) = self.stream.take() {
            match stream.stop() {
                Ok(()) => debug!(stream_id = %stream.id(), "camera stream released"),
                Err(err) => {
                    warn!(stream_id = %stream.id(), error = %err, "failed to stop camera tracks")
                }
            }
        }
    }

    async fn persist_sticky_flag(&self) {
        info!(
            failed_attempts = self.state.failed_attempt_count,
            "camera failure threshold reached; recommending manual mode"
        );
        if let Err(err) = self
            .preference
            .set_preference(&AcquisitionPreference::flagged())
            .await
        {
            warn!(error = %err, "failed to persist camera access issues flag");
        }
    }

    async fn clear_sticky_flag(&self) {
        match self.preference.has_camera_access_issues().await {
            Ok(false) => {}
            Ok(true) => {
                if let Err(err) = self.preference.reset().await {
                    warn!(error = %err, "failed to clear camera access issues flag");
                } else {
                    info!("camera access issues flag cleared");
                }
            }
            Err(err) => warn!(error = %err, "failed to read acquisition preference"),
        }
    }
}

impl Drop for CameraNegotiator {
    fn drop(&mut self) {
        self.release_stream();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use sw_core::camera::{CameraError, VideoConstraints};
    use sw_core::decode::FrameBuffer;
    use sw_core::ids::StreamId;

    struct FakeStream {
        id: StreamId,
        facing: FacingMode,
        stopped: AtomicBool,
    }

    #[async_trait]
    impl CameraStream for FakeStream {
        fn id(&self) -> &StreamId {
            &self.id
        }
        fn facing_mode(&self) -> FacingMode {
            self.facing
        }
        fn dimensions(&self) -> Option<(u32, u32)> {
            Some((4, 4))
        }
        async fn wait_until_ready(&self) -> Result<(u32, u32), CameraError> {
            Ok((4, 4))
        }
        fn snapshot(&self) -> anyhow::Result<FrameBuffer> {
            Ok(FrameBuffer::luma(4, 4, vec![0; 16]))
        }
        fn stop(&self) -> anyhow::Result<()> {
            self.stopped.store(true, Ordering::SeqCst);
            Ok(())
        }
        fn is_active(&self) -> bool {
            !self.stopped.load(Ordering::SeqCst)
        }
    }

    /// Pops scripted outcomes; `None` in the script hangs forever.
    struct ScriptedCamera {
        has_input: bool,
        script: Mutex<Vec<Option<Result<(), CameraError>>>>,
        requests: Mutex<Vec<VideoConstraints>>,
        opened: Mutex<Vec<Arc<FakeStream>>>,
    }

    impl ScriptedCamera {
        fn new(script: Vec<Option<Result<(), CameraError>>>) -> Arc<Self> {
            Arc::new(Self {
                has_input: true,
                script: Mutex::new(script.into_iter().rev().collect()),
                requests: Mutex::new(Vec::new()),
                opened: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CameraPort for ScriptedCamera {
        async fn has_video_input(&self) -> anyhow::Result<bool> {
            Ok(self.has_input)
        }

        async fn open_stream(
            &self,
            constraints: &VideoConstraints,
        ) -> Result<Arc<dyn CameraStream>, CameraError> {
            self.requests.lock().unwrap().push(constraints.clone());
            let next = self
                .script
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Some(Err(CameraError::NotAllowed)));
            match next {
                None => std::future::pending().await,
                Some(Ok(())) => {
                    let stream = Arc::new(FakeStream {
                        id: StreamId::new(),
                        facing: constraints
                            .facing
                            .map(|f| f.mode())
                            .unwrap_or(FacingMode::Environment),
                        stopped: AtomicBool::new(false),
                    });
                    self.opened.lock().unwrap().push(stream.clone());
                    Ok(stream)
                }
                Some(Err(err)) => Err(err),
            }
        }
    }

    #[derive(Default)]
    struct MemoryPreference {
        flag: AtomicBool,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl AcquisitionPreferencePort for MemoryPreference {
        async fn get_preference(&self) -> anyhow::Result<AcquisitionPreference> {
            Ok(AcquisitionPreference {
                camera_access_issues: self.flag.load(Ordering::SeqCst),
            })
        }
        async fn set_preference(&self, preference: &AcquisitionPreference) -> anyhow::Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.flag
                .store(preference.camera_access_issues, Ordering::SeqCst);
            Ok(())
        }
        async fn reset(&self) -> anyhow::Result<()> {
            self.flag.store(false, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FixedRegistry {
        state: PermissionState,
        tx: Mutex<Option<mpsc::Sender<PermissionState>>>,
    }

    #[async_trait]
    impl PermissionRegistryPort for FixedRegistry {
        async fn query(&self) -> anyhow::Result<PermissionState> {
            Ok(self.state)
        }
        async fn subscribe(&self) -> anyhow::Result<mpsc::Receiver<PermissionState>> {
            let (tx, rx) = mpsc::channel(8);
            *self.tx.lock().unwrap() = Some(tx);
            Ok(rx)
        }
    }

    fn negotiator(
        camera: Arc<ScriptedCamera>,
        registry: Option<Arc<dyn PermissionRegistryPort>>,
        preference: Arc<MemoryPreference>,
        context: RuntimeContext,
    ) -> CameraNegotiator {
        CameraNegotiator::new(camera, registry, preference, context, NegotiatorSettings::default())
    }

    #[tokio::test]
    async fn primer_stream_is_stopped_and_preferred_stream_kept() {
        let camera = ScriptedCamera::new(vec![Some(Ok(())), Some(Ok(()))]);
        let mut negotiator = negotiator(
            camera.clone(),
            None,
            Arc::new(MemoryPreference::default()),
            RuntimeContext::default(),
        );

        let phase = negotiator.begin().await;

        assert_eq!(phase, NegotiationPhase::Granted);
        assert!(negotiator.stream().is_some());
        assert_eq!(negotiator.state().permission_state, PermissionState::Granted);
        let requests = camera.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].audio == Some(false));
        assert_eq!(requests[1].ideal_width, Some(1280));

        let opened = camera.opened.lock().unwrap();
        assert!(!opened[0].is_active());
        assert!(opened[1].is_active());
        assert_eq!(negotiator.stream().unwrap().id(), &opened[1].id);
    }

    #[tokio::test]
    async fn second_strategy_is_tried_after_first_fails() {
        let camera = ScriptedCamera::new(vec![
            Some(Err(CameraError::Platform("overconstrained".into()))),
            Some(Ok(())),
        ]);
        let mut negotiator = negotiator(
            camera.clone(),
            None,
            Arc::new(MemoryPreference::default()),
            RuntimeContext::default(),
        );

        assert_eq!(negotiator.begin().await, NegotiationPhase::Granted);
        let requests = camera.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].ideal_width, Some(1280));
    }

    #[tokio::test]
    async fn each_failed_sequence_counts_once() {
        let camera = ScriptedCamera::new(Vec::new());
        let preference = Arc::new(MemoryPreference::default());
        let mut negotiator = negotiator(
            camera.clone(),
            None,
            preference.clone(),
            RuntimeContext::default(),
        );

        negotiator.begin().await;
        assert_eq!(negotiator.state().failed_attempt_count, 1);
        assert_eq!(
            negotiator.phase().denial_reason(),
            Some(&AcquisitionError::PermissionDenied)
        );
        assert!(!preference.flag.load(Ordering::SeqCst));

        negotiator.retry().await;
        assert_eq!(negotiator.state().failed_attempt_count, 2);
        assert!(!negotiator.threshold_reached());

        negotiator.retry().await;
        assert_eq!(negotiator.state().failed_attempt_count, 3);
        assert!(negotiator.threshold_reached());
        assert!(preference.flag.load(Ordering::SeqCst));
        assert!(negotiator.guidance().unwrap().manual_mode_recommended);
    }

    #[tokio::test]
    async fn registry_denial_does_not_prompt_or_count() {
        let camera = ScriptedCamera::new(vec![Some(Ok(()))]);
        let registry = Arc::new(FixedRegistry {
            state: PermissionState::Denied,
            tx: Mutex::new(None),
        });
        let mut negotiator = negotiator(
            camera.clone(),
            Some(registry),
            Arc::new(MemoryPreference::default()),
            RuntimeContext::default(),
        );

        let phase = negotiator.begin().await;

        assert!(phase.denial_reason().is_some());
        assert!(camera.requests.lock().unwrap().is_empty());
        assert_eq!(negotiator.state().failed_attempt_count, 0);
    }

    #[tokio::test]
    async fn platform_grant_report_reenters_prompting() {
        let camera = ScriptedCamera::new(vec![Some(Ok(())), Some(Ok(()))]);
        let registry = Arc::new(FixedRegistry {
            state: PermissionState::Denied,
            tx: Mutex::new(None),
        });
        let mut negotiator = negotiator(
            camera,
            Some(registry.clone()),
            Arc::new(MemoryPreference::default()),
            RuntimeContext::default(),
        );
        negotiator.begin().await;

        let tx = registry.tx.lock().unwrap().clone().unwrap();
        tx.send(PermissionState::Granted).await.unwrap();

        assert_eq!(
            negotiator.drain_permission_changes().await,
            NegotiationPhase::Granted
        );
    }

    #[tokio::test]
    async fn installed_app_skips_registry() {
        let camera = ScriptedCamera::new(vec![Some(Ok(())), Some(Ok(()))]);
        let registry = Arc::new(FixedRegistry {
            state: PermissionState::Denied,
            tx: Mutex::new(None),
        });
        let context = RuntimeContext {
            is_installed_app: true,
            ..RuntimeContext::default()
        };
        let mut negotiator = negotiator(
            camera,
            Some(registry),
            Arc::new(MemoryPreference::default()),
            context,
        );

        assert_eq!(negotiator.begin().await, NegotiationPhase::Granted);
    }

    #[tokio::test]
    async fn no_video_input_is_reported_without_prompting() {
        let camera = Arc::new(ScriptedCamera {
            has_input: false,
            script: Mutex::new(vec![Some(Ok(()))]),
            requests: Mutex::new(Vec::new()),
            opened: Mutex::new(Vec::new()),
        });
        let mut negotiator = negotiator(
            camera.clone(),
            None,
            Arc::new(MemoryPreference::default()),
            RuntimeContext::default(),
        );

        let phase = negotiator.begin().await;

        assert_eq!(
            phase.denial_reason(),
            Some(&AcquisitionError::NoCameraFound)
        );
        assert!(camera.requests.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn hung_request_times_out_instead_of_blocking() {
        // Every strategy hangs.
        let camera = ScriptedCamera::new(vec![None, None]);
        let mut negotiator = negotiator(
            camera.clone(),
            None,
            Arc::new(MemoryPreference::default()),
            RuntimeContext::default(),
        );

        let phase = negotiator.begin().await;

        assert_eq!(
            phase.denial_reason(),
            Some(&AcquisitionError::AcquisitionTimeout)
        );
        assert_eq!(negotiator.state().failed_attempt_count, 1);
        assert!(!negotiator.state().is_loading);
    }

    #[tokio::test]
    async fn toggle_releases_old_stream_and_resets_count() {
        let camera = ScriptedCamera::new(vec![
            Some(Err(CameraError::NotAllowed)),
            Some(Err(CameraError::NotAllowed)),
            Some(Ok(())),
            Some(Ok(())),
            Some(Ok(())),
            Some(Ok(())),
        ]);
        let mut negotiator = negotiator(
            camera.clone(),
            None,
            Arc::new(MemoryPreference::default()),
            RuntimeContext::default(),
        );
        negotiator.begin().await;
        assert_eq!(negotiator.state().failed_attempt_count, 1);

        negotiator.retry().await;
        assert_eq!(negotiator.state().failed_attempt_count, 0);
        let first = negotiator.stream().unwrap();
        assert_eq!(first.facing_mode(), FacingMode::Environment);

        let phase = negotiator.toggle_facing_mode().await;

        assert_eq!(phase, NegotiationPhase::Granted);
        assert!(!first.is_active());
        assert_eq!(negotiator.state().facing_mode, FacingMode::User);
        assert_eq!(negotiator.stream().unwrap().facing_mode(), FacingMode::User);
        assert_eq!(negotiator.state().failed_attempt_count, 0);
    }

    #[tokio::test]
    async fn preset_facing_mode_reaches_the_kept_stream() {
        let camera = ScriptedCamera::new(vec![Some(Ok(())), Some(Ok(()))]);
        let mut negotiator = negotiator(
            camera.clone(),
            None,
            Arc::new(MemoryPreference::default()),
            RuntimeContext::default(),
        );
        negotiator.set_facing_mode(FacingMode::User);

        assert_eq!(negotiator.begin().await, NegotiationPhase::Granted);
        assert_eq!(negotiator.stream().unwrap().facing_mode(), FacingMode::User);
    }

    #[tokio::test]
    async fn granted_primer_with_rejected_preferred_request_is_a_failure() {
        let camera = ScriptedCamera::new(vec![
            Some(Ok(())),
            Some(Err(CameraError::Platform("overconstrained".into()))),
        ]);
        let mut negotiator = negotiator(
            camera.clone(),
            None,
            Arc::new(MemoryPreference::default()),
            RuntimeContext::default(),
        );

        let phase = negotiator.begin().await;

        assert!(phase.denial_reason().is_some());
        assert!(negotiator.stream().is_none());
        assert_eq!(negotiator.state().failed_attempt_count, 1);
        assert!(!camera.opened.lock().unwrap()[0].is_active());
    }

    #[tokio::test]
    async fn success_clears_sticky_flag() {
        let camera = ScriptedCamera::new(vec![Some(Ok(())), Some(Ok(()))]);
        let preference = Arc::new(MemoryPreference::default());
        preference.flag.store(true, Ordering::SeqCst);
        let mut negotiator = negotiator(
            camera,
            None,
            preference.clone(),
            RuntimeContext::default(),
        );

        negotiator.begin().await;

        assert!(!preference.flag.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn force_reset_walks_force_plan_first() {
        let camera = ScriptedCamera::new(vec![Some(Ok(())); 4]);
        let mut negotiator = negotiator(
            camera.clone(),
            None,
            Arc::new(MemoryPreference::default()),
            RuntimeContext::default(),
        );
        negotiator.begin().await;
        let first = negotiator.stream().unwrap();

        let phase = negotiator.force_reset().await;

        assert_eq!(phase, NegotiationPhase::Granted);
        assert!(!first.is_active());
        let requests = camera.requests.lock().unwrap();
        assert_eq!(requests.len(), 4);
        // force-minimal primes, then straight to the preferred request.
        assert!(requests[2].is_bare());
        assert_eq!(requests[3].ideal_width, Some(1280));
    }

    #[tokio::test]
    async fn release_stops_stream_and_returns_to_unknown() {
        let camera = ScriptedCamera::new(vec![Some(Ok(())), Some(Ok(()))]);
        let mut negotiator = negotiator(
            camera.clone(),
            None,
            Arc::new(MemoryPreference::default()),
            RuntimeContext::default(),
        );
        negotiator.begin().await;

        let phase = negotiator.release().await;

        assert_eq!(phase, NegotiationPhase::Unknown);
        assert!(negotiator.stream().is_none());
        assert!(camera
            .opened
            .lock()
            .unwrap()
            .iter()
            .all(|s| !s.is_active()));
    }
}
