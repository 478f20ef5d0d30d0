//! Lottie Playback Core (renderer-agnostic)
//!
//! Turns display ticks and pointer gestures into frame selections, looping and
//! bouncing, lifecycle events and container navigation for Lottie-style
//! animations. Rasterization, byte fetching and platform views stay behind the
//! [`Renderer`] and [`ContainerStore`] traits.
//!
//! Per display refresh the host calls [`Player::tick`] then [`Player::render`].
//! Work produced on other threads (fetch results, gesture callbacks) reaches
//! the player as [`PlayerCommand`]s through a [`CommandSender`].

pub mod clock;
pub mod config;
pub mod container;
pub mod error;
pub mod events;
pub mod ids;
pub mod inputs;
pub mod interaction;
pub mod manifest;
pub mod navigator;
pub mod player;
pub mod renderer;
pub mod settings;

// Re-exports for hosts
pub use clock::{compute_next_frame, FrameClock, FrameStep};
pub use config::Config;
pub use container::ContainerSession;
pub use error::{FetchError, PlaybackError, RenderError};
pub use events::{EventDispatcher, EventKind, LifecycleEvent, LoopCounter};
pub use ids::{ListenerId, LoadGeneration};
pub use inputs::{CommandSender, LoadTicket, PlayerCommand};
pub use interaction::{
    map_to_document_space, CoordinateOrigin, InteractionBridge, InteractionEvent,
    InteractiveStateMachine, Point, PointerKind, ViewSize,
};
pub use manifest::{Manifest, ManifestEntry};
pub use navigator::{resolve_initial_animation, ManifestNavigator};
pub use player::{LifecycleState, PlaybackSnapshot, Player, MAX_BUFFER_PIXELS};
pub use renderer::{ContainerStore, Renderer, ResolvedSource, SourceDescriptor};
pub use settings::{AnimationSettings, Color, Direction, PlayMode, Segment};

/// Playback result type
pub type Result<T> = core::result::Result<T, PlaybackError>;
