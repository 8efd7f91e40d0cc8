//! Scanner commands
//! 扫描相关命令

use std::path::PathBuf;
use std::time::Duration;

use sw_app::scan::UploadedImage;
use sw_app::ScannerController;
use sw_core::camera::{FacingMode, PermissionState};
use sw_core::payload::{DecodedPayload, PayloadSource, PayloadType};
use sw_core::ports::AcquisitionPreferencePort;
use sw_core::runtime::RuntimeContext;
use sw_core::session::SessionKey;
use sw_platform::{detect_runtime_context, RuntimeProbe};
use tracing::{info, info_span, Instrument};

use crate::bootstrap::{CameraSource, ShellRuntime};
use crate::commands::dto::{DecodedPayloadDto, DispatchDto, ScanReportDto, StoredPayloadDto};
use crate::commands::CommandError;

/// Report the runtime context a probe resolves to.
pub fn probe_runtime(probe: &RuntimeProbe) -> RuntimeContext {
    let _span = info_span!("command.scanner.probe").entered();
    detect_runtime_context(probe)
}

/// Decode the QR symbol in an image file.
pub async fn decode_image(
    runtime: &ShellRuntime,
    path: PathBuf,
) -> Result<DecodedPayloadDto, CommandError> {
    let span = info_span!("command.scanner.decode_image", path = %path.display());
    async {
        let image = UploadedImage::read_from_path(&path).await?;
        let payload = runtime.decode_uploaded_image().execute(&image).await?;
        Ok(payload.into())
    }
    .instrument(span)
    .await
}

/// Manual entry: classify a URL and dispatch it into the session store.
pub async fn classify_url(runtime: &ShellRuntime, input: &str) -> Result<DispatchDto, CommandError> {
    let span = info_span!("command.scanner.classify_url");
    async {
        let url = input.trim();
        if url.is_empty() {
            return Err(CommandError::InvalidInput("please enter a URL".to_string()));
        }
        let payload = DecodedPayload::new(url, PayloadSource::Manual);
        let classification = runtime.classify_payload().execute(&payload).await;
        let outcome = runtime.dispatch_payload().execute(classification).await;
        Ok(outcome.into())
    }
    .instrument(span)
    .await
}

/// Parameters of one scanner screen run.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub frames_dir: PathBuf,
    pub facing_mode: FacingMode,
    pub permission: PermissionState,
    pub manual_override: Option<bool>,
    /// Give up when nothing is detected within this window.
    pub deadline: Duration,
}

/// Mount the scanner screen on still frames and wait for one detection.
pub async fn scan_frames(
    runtime: &ShellRuntime,
    request: ScanRequest,
) -> Result<ScanReportDto, CommandError> {
    let span = info_span!(
        "command.scanner.scan_frames",
        frames_dir = %request.frames_dir.display(),
        facing = request.facing_mode.as_str(),
    );
    async {
        let deps = runtime
            .scanner_deps(CameraSource::StillFrames {
                dir: request.frames_dir.clone(),
                permission: request.permission,
                facing_modes: vec![FacingMode::Environment, FacingMode::User],
            })
            .await?;
        let controller = ScannerController::new(deps, runtime.config.clone());
        controller.prefer_facing_mode(request.facing_mode).await;

        let mounted = controller.mount(request.manual_override).await?;
        if !mounted.scanning {
            info!(phase = ?mounted.phase, mode = ?mounted.mode, "camera not scanning");
            controller.unmount().await;
            return Ok(ScanReportDto {
                mounted,
                outcome: None,
                timed_out: false,
            });
        }

        let result = tokio::time::timeout(request.deadline, controller.next_scan()).await;
        controller.unmount().await;

        match result {
            Ok(outcome) => Ok(ScanReportDto {
                mounted,
                outcome: Some(outcome?.into()),
                timed_out: false,
            }),
            Err(_) => {
                info!(deadline_ms = request.deadline.as_millis() as u64, "no symbol detected");
                Ok(ScanReportDto {
                    mounted,
                    outcome: None,
                    timed_out: true,
                })
            }
        }
    }
    .instrument(span)
    .await
}

/// Read-then-clear a stored payload for the consuming screen.
pub async fn take_payload(
    runtime: &ShellRuntime,
    payload_type: PayloadType,
) -> Result<StoredPayloadDto, CommandError> {
    let span = info_span!("command.scanner.take_payload", payload_type = payload_type.as_str());
    async {
        let value = runtime.take_stored_payload().execute(payload_type).await?;
        Ok(StoredPayloadDto {
            key: SessionKey::for_payload(payload_type),
            value,
        })
    }
    .instrument(span)
    .await
}

/// Forget the sticky camera-issues flag.
pub async fn reset_preference(runtime: &ShellRuntime) -> Result<(), CommandError> {
    let span = info_span!("command.scanner.reset_preference");
    async {
        runtime.preference.reset().await?;
        info!("acquisition preference reset");
        Ok(())
    }
    .instrument(span)
    .await
}
