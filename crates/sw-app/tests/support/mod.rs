//! In-memory fakes shared by the scanner flow tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, Notify};

use sw_app::ScannerDeps;
use sw_core::camera::{CameraError, FacingMode, PermissionState, VideoConstraints};
use sw_core::decode::{DecodeError, FrameBuffer};
use sw_core::ids::StreamId;
use sw_core::navigation::Route;
use sw_core::payload::FetchError;
use sw_core::ports::*;
use sw_core::preference::AcquisitionPreference;
use sw_core::runtime::RuntimeContext;
use sw_core::session::SessionKey;

pub const HIT_URL: &str = "https://issuer.example/offer/42";

pub struct FakeStream {
    id: StreamId,
    facing: FacingMode,
    hit_after: usize,
    ticks: AtomicUsize,
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
        Some((1, 1))
    }
    async fn wait_until_ready(&self) -> Result<(u32, u32), CameraError> {
        Ok((1, 1))
    }
    fn snapshot(&self) -> anyhow::Result<FrameBuffer> {
        let n = self.ticks.fetch_add(1, Ordering::SeqCst);
        let marker = if n >= self.hit_after { 255 } else { 0 };
        Ok(FrameBuffer::luma(1, 1, vec![marker]))
    }
    fn stop(&self) -> anyhow::Result<()> {
        self.stopped.store(true, Ordering::SeqCst);
        Ok(())
    }
    fn is_active(&self) -> bool {
        !self.stopped.load(Ordering::SeqCst)
    }
}

/// Camera that either always denies or always grants.
pub struct FakeCamera {
    pub allow: AtomicBool,
    pub requests: AtomicUsize,
    pub hit_after: usize,
    pub opened: Mutex<Vec<Arc<FakeStream>>>,
}

impl FakeCamera {
    pub fn denying() -> Arc<Self> {
        Arc::new(Self {
            allow: AtomicBool::new(false),
            requests: AtomicUsize::new(0),
            hit_after: usize::MAX,
            opened: Mutex::new(Vec::new()),
        })
    }

    pub fn granting(hit_after: usize) -> Arc<Self> {
        Arc::new(Self {
            allow: AtomicBool::new(true),
            requests: AtomicUsize::new(0),
            hit_after,
            opened: Mutex::new(Vec::new()),
        })
    }

    pub fn active_streams(&self) -> usize {
        self.opened
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.is_active())
            .count()
    }

    /// Facing modes of the streams still running.
    pub fn active_facings(&self) -> Vec<FacingMode> {
        self.opened
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.is_active())
            .map(|s| s.facing)
            .collect()
    }
}

#[async_trait]
impl CameraPort for FakeCamera {
    async fn has_video_input(&self) -> anyhow::Result<bool> {
        Ok(true)
    }

    async fn open_stream(
        &self,
        constraints: &VideoConstraints,
    ) -> Result<Arc<dyn CameraStream>, CameraError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if !self.allow.load(Ordering::SeqCst) {
            return Err(CameraError::NotAllowed);
        }
        let stream = Arc::new(FakeStream {
            id: StreamId::new(),
            facing: constraints
                .facing
                .map(|f| f.mode())
                .unwrap_or(FacingMode::Environment),
            hit_after: self.hit_after,
            ticks: AtomicUsize::new(0),
            stopped: AtomicBool::new(false),
        });
        self.opened.lock().unwrap().push(stream.clone());
        Ok(stream)
    }
}

/// Decodes frames whose first byte is 255 as [`HIT_URL`].
pub struct MarkerDecoder;

impl QrDecoderPort for MarkerDecoder {
    fn decode(&self, frame: &FrameBuffer) -> Option<String> {
        (frame.data.first() == Some(&255)).then(|| HIT_URL.to_string())
    }
}

/// Treats the bytes themselves as a luma row.
pub struct BytesRasterizer;

impl ImageRasterizerPort for BytesRasterizer {
    fn rasterize(&self, bytes: &[u8]) -> Result<FrameBuffer, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::read("empty file"));
        }
        Ok(FrameBuffer::luma(bytes.len() as u32, 1, bytes.to_vec()))
    }
}

/// Scripted fetcher; optionally waits on a gate before answering.
pub struct FakeFetcher {
    pub responses: Mutex<HashMap<String, Result<Value, FetchError>>>,
    pub gate: Option<Arc<Notify>>,
    pub calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(self, url: &str, response: Result<Value, FetchError>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl PayloadFetchPort for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Network("unreachable".into())))
    }
}

#[derive(Default)]
pub struct MemorySession(pub Mutex<HashMap<SessionKey, Value>>);

#[async_trait]
impl SessionStorePort for MemorySession {
    async fn get(&self, key: SessionKey) -> anyhow::Result<Option<Value>> {
        Ok(self.0.lock().unwrap().get(&key).cloned())
    }
    async fn set(&self, key: SessionKey, value: &Value) -> anyhow::Result<()> {
        self.0.lock().unwrap().insert(key, value.clone());
        Ok(())
    }
    async fn remove(&self, key: SessionKey) -> anyhow::Result<()> {
        self.0.lock().unwrap().remove(&key);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryPreference(pub Mutex<AcquisitionPreference>);

#[async_trait]
impl AcquisitionPreferencePort for MemoryPreference {
    async fn get_preference(&self) -> anyhow::Result<AcquisitionPreference> {
        Ok(self.0.lock().unwrap().clone())
    }
    async fn set_preference(&self, preference: &AcquisitionPreference) -> anyhow::Result<()> {
        *self.0.lock().unwrap() = preference.clone();
        Ok(())
    }
    async fn reset(&self) -> anyhow::Result<()> {
        *self.0.lock().unwrap() = AcquisitionPreference::default();
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNavigator(pub Mutex<Vec<Route>>);

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.0.lock().unwrap().clone()
    }
}

impl NavigationPort for RecordingNavigator {
    fn navigate(&self, route: Route) -> anyhow::Result<()> {
        self.0.lock().unwrap().push(route);
        Ok(())
    }
}

pub struct FixedRegistry(pub PermissionState);

#[async_trait]
impl PermissionRegistryPort for FixedRegistry {
    async fn query(&self) -> anyhow::Result<PermissionState> {
        Ok(self.0)
    }
    async fn subscribe(&self) -> anyhow::Result<mpsc::Receiver<PermissionState>> {
        let (_tx, rx) = mpsc::channel(1);
        Ok(rx)
    }
}

pub struct Harness {
    pub camera: Arc<FakeCamera>,
    pub fetcher: Arc<FakeFetcher>,
    pub session: Arc<MemorySession>,
    pub preference: Arc<MemoryPreference>,
    pub navigator: Arc<RecordingNavigator>,
}

impl Harness {
    pub fn new(camera: Arc<FakeCamera>, fetcher: FakeFetcher) -> Self {
        Self {
            camera,
            fetcher: Arc::new(fetcher),
            session: Arc::new(MemorySession::default()),
            preference: Arc::new(MemoryPreference::default()),
            navigator: Arc::new(RecordingNavigator::default()),
        }
    }

    pub fn deps(&self) -> ScannerDeps {
        ScannerDeps {
            camera: self.camera.clone(),
            permission_registry: None,
            qr_decoder: Arc::new(MarkerDecoder),
            image_rasterizer: Arc::new(BytesRasterizer),
            payload_fetcher: self.fetcher.clone(),
            session_store: self.session.clone(),
            preference: self.preference.clone(),
            navigation: self.navigator.clone(),
            runtime: RuntimeContext::default(),
        }
    }

    pub fn stored(&self, key: SessionKey) -> Option<Value> {
        self.session.0.lock().unwrap().get(&key).cloned()
    }
}
