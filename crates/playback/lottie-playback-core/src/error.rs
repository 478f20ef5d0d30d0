//! Error types for the playback engine

use serde::{Deserialize, Serialize};

/// Errors surfaced by playback, navigation and loading operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PlaybackError {
    /// Animation bytes could not be parsed by the renderer
    #[error("Failed to load animation: {reason}")]
    LoadFailure { reason: String },

    /// Manifest lookup miss
    #[error("Animation not found: {id}")]
    MissingAnimation { id: String },

    /// Seek outside the active frame range
    #[error("Frame {frame} is out of range [0, {total})")]
    OutOfRangeFrame { frame: f32, total: f32 },

    /// Output size whose pixel buffer cannot be allocated
    #[error("Output size {width}x{height} exceeds the pixel buffer limit")]
    InvalidSize { width: u32, height: u32 },

    /// Container store could not produce the animation bytes
    #[error("Failed to fetch animation: {reason}")]
    FetchFailure { reason: String },

    /// Manifest document is malformed or inconsistent
    #[error("Invalid manifest: {reason}")]
    InvalidManifest { reason: String },

    /// A load completion arrived after a newer load was started
    #[error("Load generation {generation} superseded by {current}")]
    StaleLoad { generation: u64, current: u64 },
}

impl PlaybackError {
    /// Check if the engine can continue without a fresh load
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MissingAnimation { .. }
                | Self::OutOfRangeFrame { .. }
                | Self::InvalidSize { .. }
                | Self::StaleLoad { .. }
        )
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::LoadFailure { .. } => "load",
            Self::MissingAnimation { .. } | Self::InvalidManifest { .. } => "manifest",
            Self::OutOfRangeFrame { .. } | Self::InvalidSize { .. } => "validation",
            Self::FetchFailure { .. } => "fetch",
            Self::StaleLoad { .. } => "concurrency",
        }
    }
}

/// Failure reported by a [`ContainerStore`](crate::renderer::ContainerStore).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{source_name}: {reason}")]
pub struct FetchError {
    pub source_name: String,
    pub reason: String,
}

impl FetchError {
    pub fn new(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

/// Failure reported by a [`Renderer`](crate::renderer::Renderer) while loading a document.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("renderer rejected document: {reason}")]
pub struct RenderError {
    pub reason: String,
}

impl RenderError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<FetchError> for PlaybackError {
    fn from(err: FetchError) -> Self {
        Self::FetchFailure {
            reason: err.to_string(),
        }
    }
}

impl From<RenderError> for PlaybackError {
    fn from(err: RenderError) -> Self {
        Self::LoadFailure { reason: err.reason }
    }
}

impl From<serde_json::Error> for PlaybackError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidManifest {
            reason: err.to_string(),
        }
    }
}
