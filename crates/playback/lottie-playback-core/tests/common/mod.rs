#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use lottie_playback_core::{
    ContainerStore, FetchError, InteractionEvent, InteractiveStateMachine, Manifest, RenderError,
    Renderer, ResolvedSource, SourceDescriptor,
};
use serde_json::json;

/// Minimal Lottie document with `frames` frames at `fps`.
pub fn doc(frames: u32, fps: u32) -> Vec<u8> {
    json!({ "v": "5.7.0", "fr": fps, "ip": 0, "op": frames, "w": 64, "h": 64, "layers": [] })
        .to_string()
        .into_bytes()
}

/// Renderer that reads `ip`/`op`/`fr` and fills the buffer with the frame number.
#[derive(Debug, Default)]
pub struct MockRenderer {
    pub frames: f32,
    pub fps: f32,
    pub loads: usize,
    pub rendered: Vec<f32>,
    pub background: Option<u32>,
}

impl Renderer for MockRenderer {
    fn load(&mut self, bytes: &[u8], _width: u32, _height: u32) -> Result<(), RenderError> {
        self.loads += 1;
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| RenderError::new(e.to_string()))?;
        let field = |k: &str| value.get(k).and_then(serde_json::Value::as_f64);
        match (field("ip"), field("op"), field("fr")) {
            (Some(ip), Some(op), Some(fr)) if op > ip && fr > 0.0 => {
                self.frames = (op - ip) as f32;
                self.fps = fr as f32;
                Ok(())
            }
            _ => Err(RenderError::new("missing ip/op/fr")),
        }
    }

    fn render_frame(&mut self, frame: f32, buffer: &mut [u32]) {
        self.rendered.push(frame);
        buffer.fill(frame as u32);
    }

    fn total_frames(&self) -> f32 {
        self.frames
    }

    fn duration(&self) -> f32 {
        if self.fps > 0.0 {
            self.frames / self.fps
        } else {
            0.0
        }
    }

    fn set_background_color(&mut self, argb: u32) {
        self.background = Some(argb);
    }
}

/// In-memory store keyed by descriptor display name.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub containers: HashMap<String, Manifest>,
    pub files: HashMap<String, Vec<u8>>,
    pub requests: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn with_container(name: &str, manifest: Manifest, frames: &[(&str, u32)]) -> Self {
        let mut store = Self::default();
        store.containers.insert(name.to_string(), manifest);
        for (id, count) in frames {
            store.files.insert(format!("{name}#{id}"), doc(*count, 30));
        }
        store
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl ContainerStore for MemoryStore {
    fn resolve(&self, source: &SourceDescriptor) -> Result<ResolvedSource, FetchError> {
        let name = source.display_name();
        self.requests.lock().unwrap().push(name.clone());
        if let Some(manifest) = self.containers.get(&name) {
            return Ok(ResolvedSource {
                bytes: Vec::new(),
                manifest: Some(manifest.clone()),
            });
        }
        self.files
            .get(&name)
            .map(|bytes| ResolvedSource {
                bytes: bytes.clone(),
                manifest: None,
            })
            .ok_or_else(|| FetchError::new(name, "not found"))
    }
}

/// State machine that records what it receives.
#[derive(Debug, Default, Clone)]
pub struct RecordingMachine {
    pub received: Arc<Mutex<Vec<InteractionEvent>>>,
}

impl InteractiveStateMachine for RecordingMachine {
    fn post_event(&mut self, event: &InteractionEvent) {
        self.received.lock().unwrap().push(*event);
    }
}

/// Shared log of lifecycle event names.
pub fn event_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}
