//! Scanner screen controller.
//!
//! Owns the lifecycle token, the current acquisition mode, the negotiator
//! and the running scan cycle. Everything the screen does goes through it.
//!
//! 扫描页控制器：持有生命周期令牌、当前获取模式、协商器与扫描周期。

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use sw_core::camera::{CameraAcquisitionState, FacingMode, NegotiationPhase, RecoveryGuidance};
use sw_core::config::ScannerConfig;
use sw_core::decode::DecodeError;
use sw_core::ids::ScanCycleId;
use sw_core::navigation::Route;
use sw_core::payload::{DecodedPayload, PayloadSource};
use sw_core::ports::{AcquisitionPreferencePort, QrDecoderPort};
use sw_core::preference::{AcquisitionMode, AcquisitionPreference};
use sw_core::runtime::RuntimeContext;

use crate::camera::{CameraNegotiator, NegotiatorSettings};
use crate::deps::ScannerDeps;
use crate::payload::{ClassifyPayload, DispatchOutcome, DispatchPayload};
use crate::scan::{DecodeUploadedImage, FrameScanner, ScanHandle, UploadedImage};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScreenError {
    #[error("please enter a URL")]
    EmptyInput,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("scanner screen is no longer mounted")]
    Unmounted,

    #[error("camera is not scanning")]
    NotScanning,

    #[error("scan cycle was cancelled")]
    ScanCancelled,
}

/// Read-only view of the screen state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenSnapshot {
    pub mounted: bool,
    pub mode: AcquisitionMode,
    pub phase: NegotiationPhase,
    pub camera: CameraAcquisitionState,
    pub guidance: Option<RecoveryGuidance>,
    pub scanning: bool,
    pub scan_cycle: Option<ScanCycleId>,
    pub runtime: RuntimeContext,
}

struct ScreenState {
    mounted: bool,
    mode: AcquisitionMode,
    negotiator: CameraNegotiator,
    scan: Option<Arc<ScanHandle>>,
}

pub struct ScannerController {
    classify: ClassifyPayload,
    dispatch: DispatchPayload,
    decode_image: DecodeUploadedImage,
    decoder: Arc<dyn QrDecoderPort>,
    preference: Arc<dyn AcquisitionPreferencePort>,
    runtime: RuntimeContext,
    config: ScannerConfig,
    lifecycle: CancellationToken,
    inner: Mutex<ScreenState>,
}

impl ScannerController {
    pub fn new(deps: ScannerDeps, config: ScannerConfig) -> Self {
        let negotiator = CameraNegotiator::new(
            deps.camera,
            deps.permission_registry,
            deps.preference.clone(),
            deps.runtime.clone(),
            NegotiatorSettings::from(&config),
        );

        Self {
            classify: ClassifyPayload::from_ports(deps.payload_fetcher),
            dispatch: DispatchPayload::from_ports(deps.session_store, deps.navigation),
            decode_image: DecodeUploadedImage::from_ports(
                deps.image_rasterizer,
                deps.qr_decoder.clone(),
            ),
            decoder: deps.qr_decoder,
            preference: deps.preference,
            runtime: deps.runtime,
            config,
            lifecycle: CancellationToken::new(),
            inner: Mutex::new(ScreenState {
                mounted: false,
                mode: AcquisitionMode::Camera,
                negotiator,
                scan: None,
            }),
        }
    }

    /// Mount the screen.
    ///
    /// `manual_override`: `Some(true)` forces manual mode, `Some(false)`
    /// forces camera mode even with the sticky flag set.
    pub async fn mount(&self, manual_override: Option<bool>) -> Result<ScreenSnapshot, ScreenError> {
        if self.lifecycle.is_cancelled() {
            return Err(ScreenError::Unmounted);
        }
        let span = info_span!("usecase.scanner_controller.mount", ?manual_override);
        async {
            let preference = match self.preference.get_preference().await {
                Ok(preference) => preference,
                Err(err) => {
                    warn!(error = %err, "failed to read acquisition preference; using defaults");
                    AcquisitionPreference::default()
                }
            };
            let mode = AcquisitionMode::initial(&preference, manual_override);
            info!(
                mode = ?mode,
                camera_access_issues = preference.camera_access_issues,
                "scanner screen mounted"
            );

            let mut state = self.inner.lock().await;
            state.mounted = true;
            state.mode = mode;
            if mode.uses_camera() {
                state.negotiator.begin().await;
                self.start_scan_if_granted(&mut state);
            }
            Ok(self.snapshot_of(&state))
        }
        .instrument(span)
        .await
    }

    /// Camera to request on the next acquisition. Does not reacquire.
    pub async fn prefer_facing_mode(&self, facing_mode: FacingMode) {
        let mut state = self.inner.lock().await;
        state.negotiator.set_facing_mode(facing_mode);
    }

    /// Tear down: cancel polling, stop all tracks, block late navigation.
    pub async fn unmount(&self) {
        self.lifecycle.cancel();
        let mut state = self.inner.lock().await;
        Self::stop_scan(&mut state);
        state.negotiator.release().await;
        state.mounted = false;
        info!("scanner screen unmounted");
    }

    pub async fn switch_mode(&self, mode: AcquisitionMode) -> Result<ScreenSnapshot, ScreenError> {
        let mut state = self.ensure_mounted().await?;
        if state.mode == mode {
            return Ok(self.snapshot_of(&state));
        }

        info!(from = ?state.mode, to = ?mode, "acquisition mode switched");
        let leaving_camera = state.mode.uses_camera();
        state.mode = mode;

        if leaving_camera {
            Self::stop_scan(&mut state);
            state.negotiator.release().await;
        }
        if mode.uses_camera() {
            state.negotiator.begin().await;
            self.start_scan_if_granted(&mut state);
        }
        Ok(self.snapshot_of(&state))
    }

    pub async fn toggle_facing_mode(&self) -> Result<ScreenSnapshot, ScreenError> {
        let mut state = self.ensure_mounted().await?;
        if !state.mode.uses_camera() {
            let toggled = state.negotiator.state().facing_mode.toggled();
            state.negotiator.set_facing_mode(toggled);
            return Ok(self.snapshot_of(&state));
        }
        Self::stop_scan(&mut state);
        state.negotiator.toggle_facing_mode().await;
        self.start_scan_if_granted(&mut state);
        Ok(self.snapshot_of(&state))
    }

    /// "Force camera access": switch to camera mode and walk the force plan.
    pub async fn force_reset(&self) -> Result<ScreenSnapshot, ScreenError> {
        let mut state = self.ensure_mounted().await?;
        Self::stop_scan(&mut state);
        state.mode = AcquisitionMode::Camera;
        state.negotiator.force_reset().await;
        self.start_scan_if_granted(&mut state);
        Ok(self.snapshot_of(&state))
    }

    pub async fn retry(&self) -> Result<ScreenSnapshot, ScreenError> {
        let mut state = self.ensure_mounted().await?;
        if !state.mode.uses_camera() {
            return Ok(self.snapshot_of(&state));
        }
        state.negotiator.retry().await;
        self.start_scan_if_granted(&mut state);
        Ok(self.snapshot_of(&state))
    }

    /// Apply queued platform permission reports.
    pub async fn sync_permission_changes(&self) -> Result<ScreenSnapshot, ScreenError> {
        let mut state = self.ensure_mounted().await?;
        if !state.mode.uses_camera() {
            return Ok(self.snapshot_of(&state));
        }
        let phase = state.negotiator.drain_permission_changes().await;
        if phase.is_granted() {
            if state.scan.is_none() {
                self.start_scan_if_granted(&mut state);
            }
        } else {
            Self::stop_scan(&mut state);
        }
        Ok(self.snapshot_of(&state))
    }

    /// Wait for the running scan cycle to detect a symbol, then classify and dispatch it.
    pub async fn next_scan(&self) -> Result<DispatchOutcome, ScreenError> {
        let handle = {
            let state = self.ensure_mounted().await?;
            state.scan.clone().ok_or(ScreenError::NotScanning)?
        };

        match handle.detected().await {
            Some(payload) => self.process_payload(payload).await,
            None if self.lifecycle.is_cancelled() => Err(ScreenError::Unmounted),
            None => Err(ScreenError::ScanCancelled),
        }
    }

    pub async fn submit_manual_url(&self, input: &str) -> Result<DispatchOutcome, ScreenError> {
        let url = input.trim();
        if url.is_empty() {
            return Err(ScreenError::EmptyInput);
        }
        self.process_payload(DecodedPayload::new(url, PayloadSource::Manual))
            .await
    }

    /// Decode an uploaded image and dispatch its payload.
    ///
    /// Decode errors leave the screen in upload mode.
    pub async fn upload_image(&self, image: &UploadedImage) -> Result<DispatchOutcome, ScreenError> {
        {
            let mut state = self.ensure_mounted().await?;
            if state.mode != AcquisitionMode::Upload {
                if state.mode.uses_camera() {
                    Self::stop_scan(&mut state);
                    state.negotiator.release().await;
                }
                state.mode = AcquisitionMode::Upload;
            }
        }
        let payload = self.decode_image.execute(image).await?;
        self.process_payload(payload).await
    }

    /// Classify and dispatch a decoded payload.
    ///
    /// A classification that completes after unmount is dropped: nothing is
    /// stored and no navigation happens.
    pub async fn process_payload(
        &self,
        payload: DecodedPayload,
    ) -> Result<DispatchOutcome, ScreenError> {
        if self.lifecycle.is_cancelled() {
            return Err(ScreenError::Unmounted);
        }

        let classification = self.classify.execute(&payload).await;

        if self.lifecycle.is_cancelled() {
            info!(raw_url = %payload.raw_url, "classification finished after unmount; dropped");
            return Err(ScreenError::Unmounted);
        }
        let outcome = self.dispatch.execute(classification).await;
        debug!(route = ?outcome.route, "payload dispatched");
        Ok(outcome)
    }

    pub async fn snapshot(&self) -> ScreenSnapshot {
        let state = self.inner.lock().await;
        self.snapshot_of(&state)
    }

    /// Where the user goes on "back": stop the camera first.
    pub async fn back(&self) -> Route {
        let mut state = self.inner.lock().await;
        Self::stop_scan(&mut state);
        state.negotiator.release().await;
        Route::Back
    }

    pub fn lifecycle_token(&self) -> CancellationToken {
        self.lifecycle.clone()
    }

    async fn ensure_mounted(&self) -> Result<tokio::sync::MutexGuard<'_, ScreenState>, ScreenError> {
        if self.lifecycle.is_cancelled() {
            return Err(ScreenError::Unmounted);
        }
        let state = self.inner.lock().await;
        if !state.mounted {
            return Err(ScreenError::Unmounted);
        }
        Ok(state)
    }

    fn start_scan_if_granted(&self, state: &mut ScreenState) {
        if !state.negotiator.phase().is_granted() {
            return;
        }
        let Some(stream) = state.negotiator.stream() else {
            return;
        };
        Self::stop_scan(state);
        let handle = FrameScanner::start(
            stream,
            self.decoder.clone(),
            self.config.poll_interval(),
            self.lifecycle.child_token(),
        );
        info!(cycle_id = %handle.cycle_id(), "scan cycle started");
        state.scan = Some(Arc::new(handle));
    }

    fn stop_scan(state: &mut ScreenState) {
        if let Some(handle) = state.scan.take() {
            handle.cancel();
            debug!(cycle_id = %handle.cycle_id(), "scan cycle stopped");
        }
    }

    fn snapshot_of(&self, state: &ScreenState) -> ScreenSnapshot {
        ScreenSnapshot {
            mounted: state.mounted && !self.lifecycle.is_cancelled(),
            mode: state.mode,
            phase: state.negotiator.phase().clone(),
            camera: state.negotiator.state().clone(),
            guidance: state.negotiator.guidance(),
            scanning: state
                .scan
                .as_ref()
                .map(|h| !h.is_cancelled())
                .unwrap_or(false),
            scan_cycle: state.scan.as_ref().map(|h| h.cycle_id().clone()),
            runtime: self.runtime.clone(),
        }
    }
}
