//! Pointer input bridge into an external interactive state machine.
//!
//! Hosts hand in view-space coordinates; the bridge rescales them into
//! document space following the platform's native pointer origin and forwards
//! a semantic [`InteractionEvent`]. Nothing is buffered or retried.

use serde::{Deserialize, Serialize};

/// Where the host's pointer coordinates originate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoordinateOrigin {
    /// Touch-style platforms: y grows downward, x is in points and needs the
    /// device pixel scale.
    #[default]
    TopLeft,
    /// Desktop-style platforms: y grows upward from the bottom edge.
    BottomLeft,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewSize {
    pub width: f32,
    pub height: f32,
}

impl ViewSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerKind {
    Click,
    PointerMove,
    PointerDown,
    PointerUp,
}

/// Pointer event in document coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InteractionEvent {
    Click { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerDown { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
}

impl InteractionEvent {
    pub fn new(kind: PointerKind, at: Point) -> Self {
        let Point { x, y } = at;
        match kind {
            PointerKind::Click => Self::Click { x, y },
            PointerKind::PointerMove => Self::PointerMove { x, y },
            PointerKind::PointerDown => Self::PointerDown { x, y },
            PointerKind::PointerUp => Self::PointerUp { x, y },
        }
    }

    pub fn position(&self) -> Point {
        match *self {
            Self::Click { x, y }
            | Self::PointerMove { x, y }
            | Self::PointerDown { x, y }
            | Self::PointerUp { x, y } => Point { x, y },
        }
    }
}

/// The externally owned state machine receiving pointer events.
pub trait InteractiveStateMachine {
    fn post_event(&mut self, event: &InteractionEvent);
}

/// Map a view-space point into document space.
///
/// Scale is anisotropic (`document / view` per axis). On top-left platforms
/// the x axis additionally carries `device_pixel_scale`; on bottom-left
/// platforms y is flipped against the view height.
pub fn map_to_document_space(
    view_point: Point,
    view_size: ViewSize,
    document_width: f32,
    document_height: f32,
    device_pixel_scale: f32,
    origin: CoordinateOrigin,
) -> Point {
    let scale_x = document_width / view_size.width;
    let scale_y = document_height / view_size.height;
    match origin {
        CoordinateOrigin::TopLeft => Point {
            x: view_point.x * scale_x * device_pixel_scale,
            y: view_point.y * scale_y,
        },
        CoordinateOrigin::BottomLeft => Point {
            x: view_point.x * scale_x,
            y: (view_size.height - view_point.y) * scale_y,
        },
    }
}

/// Holds the last known view size and forwards mapped pointer events.
#[derive(Clone, Debug)]
pub struct InteractionBridge {
    origin: CoordinateOrigin,
    device_pixel_scale: f32,
    view_size: Option<ViewSize>,
}

impl InteractionBridge {
    pub fn new(origin: CoordinateOrigin, device_pixel_scale: f32) -> Self {
        Self {
            origin,
            device_pixel_scale: if device_pixel_scale > 0.0 {
                device_pixel_scale
            } else {
                1.0
            },
            view_size: None,
        }
    }

    /// Resize notification from the host view.
    pub fn resize(&mut self, view_size: ViewSize) {
        self.view_size = Some(view_size);
    }

    #[inline]
    pub fn view_size(&self) -> Option<ViewSize> {
        self.view_size
    }

    #[inline]
    pub fn origin(&self) -> CoordinateOrigin {
        self.origin
    }

    /// Map a view point using the last known view size.
    pub fn map(&self, view_point: Point, document_width: f32, document_height: f32) -> Option<Point> {
        let size = self.view_size.filter(|s| !s.is_empty())?;
        Some(map_to_document_space(
            view_point,
            size,
            document_width,
            document_height,
            self.device_pixel_scale,
            self.origin,
        ))
    }

    /// Forward an event already in document space.
    pub fn post_pointer_event<M>(&self, kind: PointerKind, document_point: Point, machine: &mut M)
    where
        M: InteractiveStateMachine + ?Sized,
    {
        let event = InteractionEvent::new(kind, document_point);
        log::trace!("pointer event {event:?}");
        machine.post_event(&event);
    }

    /// Map a view-space pointer and forward it. Returns false when the event
    /// was dropped because no usable view size is known.
    pub fn post_view_pointer<M>(
        &self,
        kind: PointerKind,
        view_point: Point,
        document_width: f32,
        document_height: f32,
        machine: &mut M,
    ) -> bool
    where
        M: InteractiveStateMachine + ?Sized,
    {
        match self.map(view_point, document_width, document_height) {
            Some(point) => {
                self.post_pointer_event(kind, point, machine);
                true
            }
            None => {
                log::warn!("dropping {kind:?}: view size unknown");
                false
            }
        }
    }
}
