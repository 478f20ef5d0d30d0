//! Lifecycle events and the listener registry.
//!
//! Listeners are keyed by [`EventKind`] and invoked synchronously, in
//! registration order, on the thread that calls `dispatch`. Panics inside a
//! listener propagate to the caller. Each registration returns a
//! [`ListenerId`] that revokes it via [`EventDispatcher::off`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hashbrown::HashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ids::{IdAllocator, ListenerId};

/// Playback milestones emitted by the player.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "frame")]
pub enum LifecycleEvent {
    Load,
    LoadError,
    Play,
    Pause,
    Stop,
    /// Frame number reported for the new position.
    Frame(f32),
    Loop,
    Complete,
}

/// Payload-free discriminant of [`LifecycleEvent`], used as registry key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Load,
    LoadError,
    Play,
    Pause,
    Stop,
    Frame,
    Loop,
    Complete,
}

impl LifecycleEvent {
    #[inline]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Load => EventKind::Load,
            Self::LoadError => EventKind::LoadError,
            Self::Play => EventKind::Play,
            Self::Pause => EventKind::Pause,
            Self::Stop => EventKind::Stop,
            Self::Frame(_) => EventKind::Frame,
            Self::Loop => EventKind::Loop,
            Self::Complete => EventKind::Complete,
        }
    }
}

impl EventKind {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::LoadError => "loadError",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Frame => "frame",
            Self::Loop => "loop",
            Self::Complete => "complete",
        }
    }
}

/// Shared view of the completed-loop counter.
///
/// Clones observe the same count, so a listener can capture one and read the
/// already-incremented value while handling `Loop`.
#[derive(Clone, Debug, Default)]
pub struct LoopCounter(Arc<AtomicU64>);

impl LoopCounter {
    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    #[inline]
    fn increment(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }

    #[inline]
    fn reset(&self) {
        self.0.store(0, Ordering::Release);
    }
}

pub type Listener = Box<dyn FnMut(&LifecycleEvent) + Send>;

/// Registry of lifecycle listeners.
#[derive(Default)]
pub struct EventDispatcher {
    ids: IdAllocator,
    callbacks: HashMap<EventKind, IndexMap<ListenerId, Listener>>,
    owners: HashMap<ListenerId, EventKind>,
    loops: LoopCounter,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.owners.len())
            .field("loop_count", &self.loops.get())
            .finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `kind`. Registrations are never deduplicated.
    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&LifecycleEvent) + Send + 'static,
    {
        let id = self.ids.alloc_listener();
        self.callbacks
            .entry(kind)
            .or_default()
            .insert(id, Box::new(listener));
        self.owners.insert(id, kind);
        id
    }

    /// Revoke a registration. Returns false if the handle was already revoked.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let Some(kind) = self.owners.remove(&id) else {
            return false;
        };
        self.callbacks
            .get_mut(&kind)
            .and_then(|table| table.shift_remove(&id))
            .is_some()
    }

    /// Invoke every listener for the event's kind, in registration order.
    /// `Loop` bumps the loop counter first.
    pub fn dispatch(&mut self, event: LifecycleEvent) {
        if event == LifecycleEvent::Loop {
            let count = self.loops.increment();
            log::trace!("loop count now {count}");
        }
        if let Some(table) = self.callbacks.get_mut(&event.kind()) {
            for listener in table.values_mut() {
                listener(&event);
            }
        }
    }

    #[inline]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.callbacks.get(&kind).map_or(0, IndexMap::len)
    }

    #[inline]
    pub fn loop_count(&self) -> u64 {
        self.loops.get()
    }

    /// Handle sharing the loop counter.
    #[inline]
    pub fn loop_counter(&self) -> LoopCounter {
        self.loops.clone()
    }

    pub(crate) fn reset_loop_count(&self) {
        self.loops.reset();
    }

    /// Drop every registration.
    pub fn clear(&mut self) {
        self.callbacks.clear();
        self.owners.clear();
    }
}
