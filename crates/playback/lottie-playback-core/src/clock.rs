//! Playback clock: pure per-tick frame stepping.
//!
//! `compute_next_frame` maps (current frame, total frames, settings) to the next
//! frame plus at most one lifecycle event. It owns no state besides flipping
//! `settings.direction` at bounce boundaries, so later reads observe the new
//! direction.
//!
//! Speed remapping treats the timeline as authored at `nominal_fps` (30):
//! a speed multiplier `k > 1` advances `round(k * source_fps / nominal_fps)`
//! frames per tick, and a remapped step that reaches the far boundary wraps to
//! the reset target. With the default `source_fps == nominal_fps` this is
//! exactly `k` frames per tick. Behavior for documents authored at other rates
//! is an approximation carried over from earlier players.

use serde::{Deserialize, Serialize};

use crate::config::{Config, NOMINAL_FPS};
use crate::events::LifecycleEvent;
use crate::settings::{frame_bounds, AnimationSettings, Direction};

/// Frame-rate parameters for speed remapping.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameClock {
    pub nominal_fps: f32,
    pub source_fps: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            nominal_fps: NOMINAL_FPS,
            source_fps: NOMINAL_FPS,
        }
    }
}

impl FrameClock {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            nominal_fps: if cfg.nominal_fps > 0.0 {
                cfg.nominal_fps
            } else {
                NOMINAL_FPS
            },
            source_fps: cfg.effective_source_fps(),
        }
    }

    /// Whole frames advanced per tick at `speed`.
    #[inline]
    pub fn frames_per_tick(&self, speed: u32) -> f32 {
        if speed <= 1 {
            return 1.0;
        }
        let frame_duration = 1.0 / self.nominal_fps;
        let scaled_duration = 1.0 / self.source_fps / speed as f32;
        (frame_duration / scaled_duration).round().max(1.0)
    }
}

/// Result of one clock step.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameStep {
    pub next: f32,
    /// One of `Frame`, `Loop` or `Complete`, or nothing on an empty timeline.
    pub event: Option<LifecycleEvent>,
    /// Terminal boundary reached on a non-looping animation.
    pub completed: bool,
}

impl FrameStep {
    fn idle() -> Self {
        Self {
            next: 0.0,
            event: None,
            completed: false,
        }
    }

    fn frame(next: f32) -> Self {
        Self {
            next,
            event: Some(LifecycleEvent::Frame(next)),
            completed: false,
        }
    }

    fn looped(next: f32) -> Self {
        Self {
            next,
            event: Some(LifecycleEvent::Loop),
            completed: false,
        }
    }

    fn complete(next: f32) -> Self {
        Self {
            next,
            event: Some(LifecycleEvent::Complete),
            completed: true,
        }
    }
}

/// Advance one tick from `current` on a timeline of `total` frames.
pub fn compute_next_frame(
    current: f32,
    total: f32,
    settings: &mut AnimationSettings,
    clock: &FrameClock,
) -> FrameStep {
    if total <= 0.0 {
        return FrameStep::idle();
    }

    let (start, end) = frame_bounds(total, settings.segments.as_ref());
    let step = clock.frames_per_tick(settings.speed);
    let current = current.clamp(start, end);
    let remapped = step > 1.0;

    let outcome = match settings.direction {
        Direction::Forward => {
            let candidate = current + step;
            if current >= end {
                Boundary::Reached
            } else if remapped && candidate >= end {
                Boundary::Overshot
            } else {
                return FrameStep::frame(candidate.min(end));
            }
        }
        Direction::Reverse => {
            let candidate = current - step;
            if current <= start {
                Boundary::Reached
            } else if remapped && candidate <= start {
                Boundary::Overshot
            } else {
                return FrameStep::frame(candidate.max(start));
            }
        }
    };

    let forward = settings.direction == Direction::Forward;
    let (near, far) = if forward { (start, end) } else { (end, start) };

    if !settings.loop_animation {
        log::trace!("clock: terminal boundary at {current}, resetting to {near}");
        return FrameStep::complete(near);
    }

    if settings.play_mode.is_bounce() {
        settings.direction = settings.direction.flipped();
        let next = match outcome {
            // Land on the boundary; the next tick steps away from it.
            Boundary::Overshot => far,
            Boundary::Reached if forward => (end - step).max(start),
            Boundary::Reached => (start + step).min(end),
        };
        log::trace!(
            "clock: bounce at {current}, direction now {:?}",
            settings.direction
        );
        return FrameStep::looped(next);
    }

    FrameStep::looped(near)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Boundary {
    /// Already sitting on the far boundary.
    Reached,
    /// A remapped step would land on or beyond the far boundary.
    Overshot,
}
