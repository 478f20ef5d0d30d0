//! Seams to the external collaborators: the rasterizing renderer and the
//! container store that resolves animation bytes.

use serde::{Deserialize, Serialize};

use crate::error::{FetchError, RenderError};
use crate::manifest::Manifest;

/// Rasterizing backend. The engine never touches pixels itself.
pub trait Renderer {
    /// Parse `bytes` as an animation document sized `width` x `height`.
    fn load(&mut self, bytes: &[u8], width: u32, height: u32) -> Result<(), RenderError>;

    /// Rasterize `frame` into `buffer` (`width * height` packed ARGB pixels).
    fn render_frame(&mut self, frame: f32, buffer: &mut [u32]);

    /// Total frame count of the loaded document, 0 when nothing is loaded.
    fn total_frames(&self) -> f32;

    /// Duration of the loaded document in seconds.
    fn duration(&self) -> f32;

    /// Background fill applied behind the document.
    fn set_background_color(&mut self, _argb: u32) {}

    /// Output size changed; the next `render_frame` gets a buffer of the new size.
    fn resize(&mut self, _width: u32, _height: u32) {}
}

/// Where a container or single animation lives.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SourceDescriptor {
    Url { url: String },
    Bundle { name: String },
    Archive { path: String },
    /// One animation inside an already-identified container.
    Animation {
        container: Box<SourceDescriptor>,
        id: String,
    },
}

impl SourceDescriptor {
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url { url: url.into() }
    }

    /// Descriptor for animation `id` inside this container.
    pub fn animation(&self, id: impl Into<String>) -> Self {
        let container = match self {
            Self::Animation { container, .. } => container.clone(),
            other => Box::new(other.clone()),
        };
        Self::Animation {
            container,
            id: id.into(),
        }
    }

    /// Short name for logs and fetch errors.
    pub fn display_name(&self) -> String {
        match self {
            Self::Url { url } => url.clone(),
            Self::Bundle { name } => name.clone(),
            Self::Archive { path } => path.clone(),
            Self::Animation { container, id } => format!("{}#{id}", container.display_name()),
        }
    }
}

/// Bytes of the requested animation plus the container manifest when present.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedSource {
    pub bytes: Vec<u8>,
    pub manifest: Option<Manifest>,
}

/// Fetches and unpacks animation sources. May run off the playback thread;
/// results are handed back through the player's command queue.
pub trait ContainerStore {
    fn resolve(&self, source: &SourceDescriptor) -> Result<ResolvedSource, FetchError>;
}
