//! Container manifest model.

use serde::{Deserialize, Serialize};

use crate::error::PlaybackError;
use crate::settings::{AnimationSettings, Color, Direction, PlayMode, Segment};

/// Per-animation entry; every field but `id` overrides a default setting.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, rename = "loop", skip_serializing_if = "Option::is_none")]
    pub loop_animation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_mode: Option<PlayMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Segment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
    /// Play while the pointer is over the view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover: Option<bool>,
}

impl ManifestEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Overlay this entry's overrides on `base`.
    ///
    /// A play mode without an explicit direction also sets the direction the
    /// mode starts in.
    pub fn apply_to(&self, base: &AnimationSettings) -> AnimationSettings {
        let mut out = base.clone();
        if let Some(mode) = self.play_mode {
            out.play_mode = mode;
            out.direction = mode.initial_direction();
        }
        if let Some(direction) = self.direction {
            out.direction = direction;
        }
        if let Some(value) = self.loop_animation {
            out.loop_animation = value;
        }
        if let Some(speed) = self.speed.filter(|s| *s > 0) {
            out.speed = speed;
        }
        if self.segments.is_some() {
            out.segments = self.segments;
        }
        if let Some(width) = self.width.filter(|w| *w > 0) {
            out.width = width;
        }
        if let Some(height) = self.height.filter(|h| *h > 0) {
            out.height = height;
        }
        if self.background_color.is_some() {
            out.background_color = self.background_color;
        }
        if let Some(autoplay) = self.autoplay {
            out.autoplay = autoplay;
        }
        out
    }

    #[inline]
    pub fn hover(&self) -> bool {
        self.hover.unwrap_or(false)
    }
}

/// Ordered list of bundled animations. Order drives next/previous.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub animations: Vec<ManifestEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_animation_id: Option<String>,
}

impl Manifest {
    pub fn new(animations: Vec<ManifestEntry>) -> Self {
        Self {
            animations,
            ..Self::default()
        }
    }

    /// Parse and validate a manifest document.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        let manifest: Manifest = serde_json::from_str(text)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Reject manifests whose ids are not unique.
    pub fn validate(&self) -> crate::Result<()> {
        let mut seen = hashbrown::HashSet::with_capacity(self.animations.len());
        for entry in &self.animations {
            if entry.id.is_empty() {
                return Err(PlaybackError::InvalidManifest {
                    reason: "animation id must not be empty".into(),
                });
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(PlaybackError::InvalidManifest {
                    reason: format!("duplicate animation id '{}'", entry.id),
                });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn entry(&self, id: &str) -> Option<&ManifestEntry> {
        self.animations.iter().find(|e| e.id == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.animations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}
