//! Player: lifecycle state machine around one loaded animation.
//!
//! The display driver calls `tick()` then `render()` once per refresh. All
//! mutation happens through `&mut self` on the owning context; other threads
//! post [`PlayerCommand`]s through a [`CommandSender`] and those are applied at
//! the start of the next tick.

use serde::{Deserialize, Serialize};

use crate::clock::{compute_next_frame, FrameClock};
use crate::config::Config;
use crate::error::{FetchError, PlaybackError};
use crate::events::{EventDispatcher, EventKind, LifecycleEvent, LoopCounter};
use crate::ids::{IdAllocator, ListenerId};
use crate::inputs::{CommandQueue, CommandSender, LoadTicket, PlayerCommand};
use crate::renderer::Renderer;
use crate::settings::{frame_bounds, AnimationSettings, Color, Direction, PlayMode, Segment};

/// Lifecycle state of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    Playing,
    Paused,
    Stopped,
    /// Held externally (e.g. pending resize); frames do not advance.
    Frozen,
    /// Last load failed; only a new load leaves this state.
    Error,
}

impl LifecycleState {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
            Self::Frozen => "frozen",
            Self::Error => "error",
        }
    }
}

/// Read-only view of playback progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub current_frame: f32,
    pub total_frames: f32,
    pub duration_seconds: f32,
    pub lifecycle_state: LifecycleState,
    pub loop_count: u64,
}

/// Playback state machine bound to a renderer.
pub struct Player<R: Renderer> {
    cfg: Config,
    clock: FrameClock,
    renderer: R,
    settings: AnimationSettings,

    current_frame: f32,
    total_frames: f32,
    duration: f32,
    state: LifecycleState,
    /// State to restore when a freeze is lifted.
    frozen_intent: Option<LifecycleState>,

    events: EventDispatcher,
    commands: CommandQueue,
    loads: IdAllocator,

    buffer: Vec<u32>,
    must_resize: bool,
    skip_render: bool,
}

impl<R: Renderer> std::fmt::Debug for Player<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("state", &self.state)
            .field("current_frame", &self.current_frame)
            .field("total_frames", &self.total_frames)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<R: Renderer> Player<R> {
    /// Create a player with nothing loaded.
    pub fn new(renderer: R, mut cfg: Config) -> Self {
        if cfg.max_commands_per_tick == 0 {
            log::warn!("max_commands_per_tick = 0 would stall the command queue, using 1");
            cfg.max_commands_per_tick = 1;
        }
        let settings = AnimationSettings::from_config(&cfg);
        let state = initial_state(settings.autoplay);
        Self {
            clock: FrameClock::from_config(&cfg),
            cfg,
            renderer,
            settings,
            current_frame: 0.0,
            total_frames: 0.0,
            duration: 0.0,
            state,
            frozen_intent: None,
            events: EventDispatcher::new(),
            commands: CommandQueue::new(),
            loads: IdAllocator::new(),
            buffer: Vec::new(),
            must_resize: false,
            skip_render: false,
        }
    }

    // ---------------------------------------------------------------------
    // Loading

    /// Load a document, keeping current playback settings at the given size.
    pub fn load_animation(&mut self, bytes: &[u8], width: u32, height: u32) -> crate::Result<()> {
        let settings = self.settings.clone().with_size(width, height);
        self.load_with_settings(bytes, settings)
    }

    /// Load a document with a fully resolved set of settings.
    pub fn load_with_settings(
        &mut self,
        bytes: &[u8],
        settings: AnimationSettings,
    ) -> crate::Result<()> {
        self.loads.alloc_load();
        self.finish_load(bytes, settings)
    }

    /// Start an off-thread load. Completing an older ticket after a newer one
    /// was issued, or after a synchronous load, is rejected as stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        LoadTicket {
            generation: self.loads.alloc_load(),
        }
    }

    /// Apply the result of an off-thread fetch.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<u8>, FetchError>,
        settings: Option<AnimationSettings>,
    ) -> crate::Result<()> {
        let current = self.loads.current_load();
        if ticket.generation != current {
            log::debug!(
                "discarding stale load {:?}, latest is {:?}",
                ticket.generation,
                current
            );
            return Err(PlaybackError::StaleLoad {
                generation: ticket.generation.0,
                current: current.0,
            });
        }
        match result {
            Ok(bytes) => {
                let settings = settings.unwrap_or_else(|| self.settings.clone());
                self.finish_load(&bytes, settings)
            }
            Err(err) => {
                log::warn!("fetch failed: {err}");
                self.enter_error();
                Err(err.into())
            }
        }
    }

    /// Record a fetch failure that happened before any bytes were available.
    pub(crate) fn fail_fetch(&mut self, err: FetchError) -> PlaybackError {
        log::warn!("fetch failed: {err}");
        self.loads.alloc_load();
        self.enter_error();
        err.into()
    }

    fn finish_load(&mut self, bytes: &[u8], settings: AnimationSettings) -> crate::Result<()> {
        self.settings = settings;
        self.current_frame = 0.0;
        self.frozen_intent = None;
        self.must_resize = false;
        self.skip_render = false;
        self.events.reset_loop_count();

        let (width, height) = (self.settings.width, self.settings.height);
        let Some(pixels) = buffer_len(width, height) else {
            log::warn!("animation load rejected: output size {width}x{height} too large");
            self.enter_error();
            return Err(PlaybackError::InvalidSize { width, height });
        };
        if let Err(err) = self.renderer.load(bytes, width, height) {
            log::warn!("animation load failed: {err}");
            self.enter_error();
            return Err(err.into());
        }

        self.total_frames = self.renderer.total_frames().max(0.0);
        self.duration = self.renderer.duration().max(0.0);
        self.buffer = vec![0; pixels];
        self.push_background();

        self.state = initial_state(self.settings.autoplay);
        if self.settings.direction == Direction::Reverse {
            self.current_frame = self.bounds().1;
        } else {
            self.current_frame = self.bounds().0;
        }
        log::debug!(
            "loaded animation: {} frames, {:.3}s, state {}",
            self.total_frames,
            self.duration,
            self.state.name()
        );

        self.events.dispatch(LifecycleEvent::Load);
        if self.state == LifecycleState::Playing {
            self.events.dispatch(LifecycleEvent::Play);
        }
        Ok(())
    }

    fn enter_error(&mut self) {
        self.state = LifecycleState::Error;
        self.frozen_intent = None;
        self.total_frames = 0.0;
        self.duration = 0.0;
        self.current_frame = 0.0;
        self.events.dispatch(LifecycleEvent::LoadError);
    }

    // ---------------------------------------------------------------------
    // Lifecycle commands

    pub fn play(&mut self) {
        match self.state {
            LifecycleState::Error => log::debug!("play ignored: player is in error state"),
            LifecycleState::Playing => {}
            LifecycleState::Frozen => {
                if self.frozen_intent != Some(LifecycleState::Playing) {
                    self.frozen_intent = Some(LifecycleState::Playing);
                    self.events.dispatch(LifecycleEvent::Play);
                }
            }
            LifecycleState::Paused | LifecycleState::Stopped => {
                if self.state == LifecycleState::Stopped
                    && self.settings.direction == Direction::Reverse
                {
                    self.current_frame = self.bounds().1;
                }
                self.state = LifecycleState::Playing;
                self.events.dispatch(LifecycleEvent::Play);
            }
        }
    }

    pub fn pause(&mut self) {
        match self.state {
            LifecycleState::Playing => {
                self.state = LifecycleState::Paused;
                self.events.dispatch(LifecycleEvent::Pause);
            }
            LifecycleState::Frozen if self.frozen_intent == Some(LifecycleState::Playing) => {
                self.frozen_intent = Some(LifecycleState::Paused);
                self.events.dispatch(LifecycleEvent::Pause);
            }
            other => log::debug!("pause ignored in state {}", other.name()),
        }
    }

    /// Stop and rewind to the first frame of the active range.
    pub fn stop(&mut self) {
        match self.state {
            LifecycleState::Error => {
                log::debug!("stop ignored: player is in error state");
                return;
            }
            LifecycleState::Frozen => self.frozen_intent = Some(LifecycleState::Stopped),
            _ => self.state = LifecycleState::Stopped,
        }
        self.current_frame = self.bounds().0;
        self.events.dispatch(LifecycleEvent::Stop);
    }

    /// Advance one display tick. Returns the clock event, if any.
    pub fn tick(&mut self) -> Option<LifecycleEvent> {
        self.apply_pending();

        if self.must_resize {
            self.must_resize = false;
            self.skip_render = true;
            let pixels = buffer_len(self.settings.width, self.settings.height).unwrap_or(0);
            self.buffer = vec![0; pixels];
            self.renderer.resize(self.settings.width, self.settings.height);
        }

        match self.state {
            LifecycleState::Playing => self.advance(),
            LifecycleState::Stopped => {
                self.current_frame = self.bounds().0;
                None
            }
            LifecycleState::Paused | LifecycleState::Frozen | LifecycleState::Error => None,
        }
    }

    fn advance(&mut self) -> Option<LifecycleEvent> {
        let step = compute_next_frame(
            self.current_frame,
            self.total_frames,
            &mut self.settings,
            &self.clock,
        );
        self.current_frame = step.next;
        if step.completed {
            self.state = LifecycleState::Paused;
        }
        if let Some(event) = step.event {
            self.events.dispatch(event);
        }
        step.event
    }

    /// Rasterize the current frame into the owned pixel buffer.
    ///
    /// In `Error` state, or on the tick that applied a resize, the buffer is
    /// returned as-is.
    pub fn render(&mut self) -> &[u32] {
        if self.skip_render {
            self.skip_render = false;
        } else if self.state != LifecycleState::Error && self.total_frames > 0.0 {
            self.renderer
                .render_frame(self.current_frame, &mut self.buffer);
        }
        &self.buffer
    }

    // ---------------------------------------------------------------------
    // Settings commands

    /// Seek to `frame`. Requests outside `[0, total - 1]` are logged and ignored.
    pub fn set_frame(&mut self, frame: f32) -> crate::Result<()> {
        let last = self.total_frames - 1.0;
        if !(frame >= 0.0 && frame <= last) {
            log::warn!("set_frame({frame}) ignored: valid range is [0, {last}]");
            return Err(PlaybackError::OutOfRangeFrame {
                frame,
                total: self.total_frames,
            });
        }
        self.current_frame = frame;
        self.events.dispatch(LifecycleEvent::Frame(frame));
        Ok(())
    }

    /// Set the integer speed multiplier. Zero is ignored.
    pub fn set_speed(&mut self, speed: u32) {
        if speed == 0 {
            log::warn!("set_speed(0) ignored: speed must be positive");
            return;
        }
        self.settings.speed = speed;
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.settings.direction = direction;
    }

    pub fn set_loop(&mut self, loop_animation: bool) {
        self.settings.loop_animation = loop_animation;
    }

    /// Set the play mode; direction follows the mode's starting direction.
    pub fn set_play_mode(&mut self, mode: PlayMode) {
        self.settings.play_mode = mode;
        self.settings.direction = mode.initial_direction();
    }

    /// Restrict playback to a segment; the current frame is clamped into it.
    /// Segments with a non-finite bound are ignored.
    pub fn set_segments(&mut self, segments: Option<Segment>) {
        if let Some(seg) = segments.filter(|seg| !seg.is_finite()) {
            log::warn!("set_segments({}, {}) ignored: bounds must be finite", seg.start, seg.end);
            return;
        }
        self.settings.segments = segments;
        if self.total_frames > 0.0 {
            let (start, end) = self.bounds();
            self.current_frame = self.current_frame.clamp(start, end);
        }
    }

    pub fn set_background_color(&mut self, color: Option<Color>) {
        self.settings.background_color = color;
        self.push_background();
    }

    /// Request a new output size; applied on the next tick. Sizes whose pixel
    /// buffer would exceed `MAX_BUFFER_PIXELS` are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> crate::Result<()> {
        let (width, height) = (width.max(1), height.max(1));
        if buffer_len(width, height).is_none() {
            log::warn!("resize({width}, {height}) ignored: pixel buffer too large");
            return Err(PlaybackError::InvalidSize { width, height });
        }
        self.settings.width = width;
        self.settings.height = height;
        self.must_resize = true;
        Ok(())
    }

    /// Hold the current frame without changing playback intent.
    pub fn freeze(&mut self) {
        match self.state {
            LifecycleState::Frozen | LifecycleState::Error => {}
            other => {
                self.frozen_intent = Some(other);
                self.state = LifecycleState::Frozen;
            }
        }
    }

    pub fn unfreeze(&mut self) {
        if self.state == LifecycleState::Frozen {
            self.state = self.frozen_intent.take().unwrap_or(LifecycleState::Paused);
        }
    }

    fn push_background(&mut self) {
        let color = self.settings.background_color.unwrap_or(Color::TRANSPARENT);
        self.renderer.set_background_color(color.to_argb());
    }

    // ---------------------------------------------------------------------
    // Command queue

    /// Handle for posting commands from other threads or listeners.
    pub fn command_sender(&self) -> CommandSender {
        self.commands.sender()
    }

    /// Apply one command immediately.
    pub fn apply(&mut self, cmd: PlayerCommand) -> crate::Result<()> {
        match cmd {
            PlayerCommand::Play => self.play(),
            PlayerCommand::Pause => self.pause(),
            PlayerCommand::Stop => self.stop(),
            PlayerCommand::SetFrame(frame) => self.set_frame(frame)?,
            PlayerCommand::SetSpeed(speed) => self.set_speed(speed),
            PlayerCommand::SetDirection(direction) => self.set_direction(direction),
            PlayerCommand::SetLoop(value) => self.set_loop(value),
            PlayerCommand::SetPlayMode(mode) => self.set_play_mode(mode),
            PlayerCommand::SetSegments(segments) => self.set_segments(segments),
            PlayerCommand::SetBackgroundColor(color) => self.set_background_color(color),
            PlayerCommand::Resize { width, height } => self.resize(width, height)?,
            PlayerCommand::Freeze => self.freeze(),
            PlayerCommand::Unfreeze => self.unfreeze(),
            PlayerCommand::CompleteLoad {
                ticket,
                result,
                settings,
            } => self.complete_load(ticket, result, settings)?,
        }
        Ok(())
    }

    /// Apply queued commands, bounded by `max_commands_per_tick`.
    /// Returns how many were applied.
    pub fn apply_pending(&mut self) -> usize {
        let batch = self.commands.drain(self.cfg.max_commands_per_tick);
        let applied = batch.len();
        for cmd in batch {
            if let Err(err) = self.apply(cmd) {
                log::debug!("queued command failed ({}): {err}", err.category());
            }
        }
        applied
    }

    // ---------------------------------------------------------------------
    // Events

    /// Register a lifecycle listener.
    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&LifecycleEvent) + Send + 'static,
    {
        self.events.on(kind, listener)
    }

    /// Revoke a listener registration.
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    pub fn events_mut(&mut self) -> &mut EventDispatcher {
        &mut self.events
    }

    pub fn loop_counter(&self) -> LoopCounter {
        self.events.loop_counter()
    }

    // ---------------------------------------------------------------------
    // Accessors

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_frame: self.current_frame,
            total_frames: self.total_frames,
            duration_seconds: self.duration,
            lifecycle_state: self.state,
            loop_count: self.events.loop_count(),
        }
    }

    #[inline]
    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    #[inline]
    pub fn current_frame(&self) -> f32 {
        self.current_frame
    }

    #[inline]
    pub fn total_frames(&self) -> f32 {
        self.total_frames
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    pub fn loop_count(&self) -> u64 {
        self.events.loop_count()
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state == LifecycleState::Playing
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.state == LifecycleState::Paused
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.state == LifecycleState::Stopped
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.state == LifecycleState::Frozen
    }

    /// Position within the active range, 0.0 to 1.0.
    pub fn progress(&self) -> f32 {
        let (start, end) = self.bounds();
        if end <= start {
            return 0.0;
        }
        ((self.current_frame - start) / (end - start)).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[inline]
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[inline]
    fn bounds(&self) -> (f32, f32) {
        frame_bounds(self.total_frames, self.settings.segments.as_ref())
    }
}

fn initial_state(autoplay: bool) -> LifecycleState {
    if autoplay {
        LifecycleState::Playing
    } else {
        LifecycleState::Paused
    }
}

/// Upper bound on output pixels (16384 x 16384).
pub const MAX_BUFFER_PIXELS: usize = 1 << 28;

fn buffer_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .filter(|n| *n <= MAX_BUFFER_PIXELS)
}
