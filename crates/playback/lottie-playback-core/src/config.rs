//! Core configuration for lottie-playback-core.

use serde::{Deserialize, Serialize};

use crate::interaction::CoordinateOrigin;

/// Engine-wide playback configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Start playing immediately after a successful load.
    pub autoplay: bool,

    /// Frame rate the speed remapping treats as nominal. Historically fixed at 30.
    pub nominal_fps: f32,

    /// Declared frame rate of the source document. `None` uses `nominal_fps`,
    /// which keeps the remap at exactly `speed` frames per tick.
    pub source_fps: Option<f32>,

    /// Upper bound on queued commands applied per tick.
    pub max_commands_per_tick: usize,

    /// Size used when neither the caller nor the manifest supplies one.
    pub default_width: u32,
    pub default_height: u32,

    /// Native pointer origin of the host platform.
    pub origin: CoordinateOrigin,
}

pub const NOMINAL_FPS: f32 = 30.0;

impl Default for Config {
    fn default() -> Self {
        Self {
            autoplay: false,
            nominal_fps: NOMINAL_FPS,
            source_fps: None,
            max_commands_per_tick: 256,
            default_width: 512,
            default_height: 512,
            origin: CoordinateOrigin::TopLeft,
        }
    }
}

impl Config {
    /// Parse a configuration document; missing fields take their defaults.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Frame rate of the document as seen by the clock.
    #[inline]
    pub fn effective_source_fps(&self) -> f32 {
        match self.source_fps {
            Some(fps) if fps > 0.0 => fps,
            _ => self.nominal_fps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json(r#"{ "autoplay": true, "sourceFps": 60 }"#).unwrap();
        assert!(cfg.autoplay);
        assert_eq!(cfg.source_fps, Some(60.0));
        assert_eq!(cfg.nominal_fps, 30.0);
        assert_eq!(cfg.max_commands_per_tick, 256);
        assert_eq!(cfg.origin, CoordinateOrigin::TopLeft);
    }

    #[test]
    fn source_fps_falls_back_to_nominal() {
        let mut cfg = Config::default();
        assert_eq!(cfg.effective_source_fps(), 30.0);
        cfg.source_fps = Some(0.0);
        assert_eq!(cfg.effective_source_fps(), 30.0);
        cfg.source_fps = Some(24.0);
        assert_eq!(cfg.effective_source_fps(), 24.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Config::from_json("{ autoplay: yes }").is_err());
    }
}
