//! Per-animation playback settings.

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Traversal direction along the timeline. Encoded as `1` / `-1` on the wire.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    /// Signed unit step: `1.0` or `-1.0`.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Self::Forward => 1.0,
            Self::Reverse => -1.0,
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Forward),
            -1 => Ok(Self::Reverse),
            other => Err(format!("direction must be 1 or -1, got {other}")),
        }
    }
}

impl From<Direction> for i8 {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Forward => 1,
            Direction::Reverse => -1,
        }
    }
}

/// Traversal pattern of the timeline.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayMode {
    #[default]
    #[serde(rename = "normal", alias = "forward")]
    Forward,
    #[serde(rename = "reverse")]
    Reverse,
    #[serde(rename = "bounce")]
    Bounce,
    #[serde(rename = "reverse-bounce", alias = "bounceReverse")]
    BounceReverse,
}

impl PlayMode {
    #[inline]
    pub fn is_bounce(self) -> bool {
        matches!(self, Self::Bounce | Self::BounceReverse)
    }

    /// Direction a traversal in this mode starts with.
    #[inline]
    pub fn initial_direction(self) -> Direction {
        match self {
            Self::Forward | Self::Bounce => Direction::Forward,
            Self::Reverse | Self::BounceReverse => Direction::Reverse,
        }
    }
}

/// Sub-range of frames restricting playback, inclusive on both ends.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Segment {
    pub start: f32,
    pub end: f32,
}

impl Segment {
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }

    /// Clamp this segment into `[0, total - 1]`. Returns `(0, 0)` for an empty
    /// timeline; a segment with a non-finite bound resolves to the full range.
    pub fn resolve(&self, total: f32) -> (f32, f32) {
        full_range(total).map_or((0.0, 0.0), |(lo, hi)| {
            if !self.is_finite() {
                return (lo, hi);
            }
            let start = self.start.min(self.end).clamp(lo, hi);
            let end = self.end.max(self.start).clamp(start, hi);
            (start, end)
        })
    }
}

impl From<[f32; 2]> for Segment {
    fn from([start, end]: [f32; 2]) -> Self {
        Self { start, end }
    }
}

impl From<Segment> for [f32; 2] {
    fn from(s: Segment) -> Self {
        [s.start, s.end]
    }
}

fn full_range(total: f32) -> Option<(f32, f32)> {
    (total > 0.0).then(|| (0.0, (total - 1.0).max(0.0)))
}

/// Active frame bounds for a timeline of `total` frames under optional segments.
pub fn frame_bounds(total: f32, segments: Option<&Segment>) -> (f32, f32) {
    match segments {
        Some(seg) => seg.resolve(total),
        None => full_range(total).unwrap_or((0.0, 0.0)),
    }
}

/// RGBA background color. Serialized as `#RRGGBB` or `#RRGGBBAA`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Packed `0xAARRGGBB`, the layout of the pixel buffer.
    #[inline]
    pub fn to_argb(self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }

    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.strip_prefix('#').unwrap_or(text);
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, 0xff)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color '{value}'"))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
    }
}

/// Playback settings for one animation. Replaced wholesale on animation switch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationSettings {
    pub direction: Direction,
    #[serde(rename = "loop")]
    pub loop_animation: bool,
    /// Positive integer multiplier.
    pub speed: u32,
    pub play_mode: PlayMode,
    pub segments: Option<Segment>,
    pub width: u32,
    pub height: u32,
    pub background_color: Option<Color>,
    pub autoplay: bool,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl AnimationSettings {
    /// Defaults derived from engine configuration.
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            direction: Direction::Forward,
            loop_animation: false,
            speed: 1,
            play_mode: PlayMode::Forward,
            segments: None,
            width: cfg.default_width.max(1),
            height: cfg.default_height.max(1),
            background_color: None,
            autoplay: cfg.autoplay,
        }
    }

    #[inline]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    #[inline]
    pub fn with_loop(mut self, loop_animation: bool) -> Self {
        self.loop_animation = loop_animation;
        self
    }

    #[inline]
    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed.max(1);
        self
    }

    /// Set play mode together with the direction it starts in.
    #[inline]
    pub fn with_play_mode(mut self, mode: PlayMode) -> Self {
        self.play_mode = mode;
        self.direction = mode.initial_direction();
        self
    }
}
