//! Frame scanner.
//!
//! Polls a live stream at a fixed period, decodes each snapshot and emits
//! the first decoded text exactly once per acquisition cycle.
//!
//! 帧扫描器：固定周期轮询视频帧，首次识别后停止，且只发出一次结果。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, Instrument};

use sw_core::decode::FrameBuffer;
use sw_core::ids::ScanCycleId;
use sw_core::payload::{DecodedPayload, PayloadSource};
use sw_core::ports::{CameraStream, QrDecoderPort};

pub struct FrameScanner {
    decoder: Arc<dyn QrDecoderPort>,
    scanned: Arc<AtomicBool>,
}

impl FrameScanner {
    pub fn new(decoder: Arc<dyn QrDecoderPort>) -> Self {
        Self {
            decoder,
            scanned: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn has_emitted(&self) -> bool {
        self.scanned.load(Ordering::Acquire)
    }

    /// Decode one frame.
    ///
    /// Returns a payload only for the first successful decode; every later
    /// call returns `None`, even when the frame holds a symbol.
    pub fn tick(&self, frame: &FrameBuffer) -> Option<DecodedPayload> {
        if self.scanned.load(Ordering::Acquire) {
            return None;
        }

        let text = self.decoder.decode(frame)?;

        // Latch inside the detection path as well.
        if self
            .scanned
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }

        Some(DecodedPayload::new(text, PayloadSource::Camera))
    }

    /// Spawn the poll loop for `stream`.
    ///
    /// Polling starts once the stream reports its dimensions and stops on
    /// detection or when `token` is cancelled.
    pub fn start(
        stream: Arc<dyn CameraStream>,
        decoder: Arc<dyn QrDecoderPort>,
        period: Duration,
        token: CancellationToken,
    ) -> ScanHandle {
        let scanner = Arc::new(FrameScanner::new(decoder));
        let scanned = scanner.scanned.clone();
        let cycle_id = ScanCycleId::new();
        let (tx, rx) = oneshot::channel();

        let span = info_span!("usecase.frame_scanner.poll", cycle_id = %cycle_id);
        let loop_token = token.clone();
        let task = tokio::spawn(
            async move {
                let ready = tokio::select! {
                    _ = loop_token.cancelled() => {
                        debug!("scan cancelled before stream was ready");
                        return;
                    }
                    ready = stream.wait_until_ready() => ready,
                };
                match ready {
                    Ok((width, height)) => debug!(width, height, "stream ready; polling frames"),
                    Err(err) => {
                        debug!(error = %err, "stream never became ready");
                        return;
                    }
                }

                // `interval` panics on a zero period.
                let mut ticker = interval(period.max(Duration::from_millis(1)));
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

                loop {
                    tokio::select! {
                        _ = loop_token.cancelled() => {
                            debug!("frame polling stopped");
                            return;
                        }
                        _ = ticker.tick() => {}
                    }

                    if scanner.has_emitted() || loop_token.is_cancelled() {
                        return;
                    }
                    if !stream.is_active() {
                        debug!("stream no longer active; stopping frame polling");
                        return;
                    }

                    let frame = match stream.snapshot() {
                        Ok(frame) => frame,
                        Err(err) => {
                            debug!(error = %err, "frame snapshot failed; skipping tick");
                            continue;
                        }
                    };

                    if loop_token.is_cancelled() {
                        return;
                    }
                    if let Some(payload) = scanner.tick(&frame) {
                        info!(raw_url = %payload.raw_url, "QR code detected");
                        // Send before cancelling so a waiter never misses the payload.
                        let _ = tx.send(payload);
                        loop_token.cancel();
                        return;
                    }
                }
            }
            .instrument(span),
        );

        ScanHandle {
            cycle_id,
            token,
            scanned,
            detection: Mutex::new(Some(rx)),
            task,
        }
    }
}

/// Handle to one running scan cycle.
pub struct ScanHandle {
    cycle_id: ScanCycleId,
    token: CancellationToken,
    scanned: Arc<AtomicBool>,
    detection: Mutex<Option<oneshot::Receiver<DecodedPayload>>>,
    task: JoinHandle<()>,
}

impl ScanHandle {
    pub fn cycle_id(&self) -> &ScanCycleId {
        &self.cycle_id
    }

    /// Wait for the single detection of this cycle.
    ///
    /// `None` if the cycle was cancelled first, or the detection was
    /// already taken by another waiter.
    pub async fn detected(&self) -> Option<DecodedPayload> {
        let rx = self.detection.lock().await.take()?;
        tokio::select! {
            biased;
            payload = rx => payload.ok(),
            _ = self.token.cancelled() => None,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn has_emitted(&self) -> bool {
        self.scanned.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ScanHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
