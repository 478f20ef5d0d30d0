//! Identifiers and simple allocators for listeners and loads.

use serde::{Deserialize, Serialize};

/// Revocable handle returned when a listener is registered.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ListenerId(pub u64);

/// Monotonic load counter; a completion carrying an older value is stale.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct LoadGeneration(pub u64);

/// Monotonic allocator for ListenerId and LoadGeneration.
/// IDs are never reused within one allocator.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_listener: u64,
    next_load: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_listener(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener = self.next_listener.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_load(&mut self) -> LoadGeneration {
        self.next_load = self.next_load.wrapping_add(1);
        LoadGeneration(self.next_load)
    }

    /// Latest generation handed out (0 before any load).
    #[inline]
    pub fn current_load(&self) -> LoadGeneration {
        LoadGeneration(self.next_load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_listener(), ListenerId(0));
        assert_eq!(alloc.alloc_listener(), ListenerId(1));
        assert_eq!(alloc.current_load(), LoadGeneration(0));
        assert_eq!(alloc.alloc_load(), LoadGeneration(1));
        assert_eq!(alloc.alloc_load(), LoadGeneration(2));
        assert_eq!(alloc.current_load(), LoadGeneration(2));
    }
}
