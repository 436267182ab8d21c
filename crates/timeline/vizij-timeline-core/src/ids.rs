//! Identifiers handed out by the animation manager.

use serde::{Deserialize, Serialize};

/// A running animation instance.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

/// The composition chain of one animated property.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChainId(pub u32);

/// Monotonic allocator for instance and chain ids. Ids are never reused until
/// [`IdAllocator::reset`].
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_instance: u32,
    next_chain: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_instance(&mut self) -> InstanceId {
        let id = InstanceId(self.next_instance);
        self.next_instance = self.next_instance.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_chain(&mut self) -> ChainId {
        let id = ChainId(self.next_chain);
        self.next_chain = self.next_chain.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_instance(), InstanceId(0));
        assert_eq!(alloc.alloc_instance(), InstanceId(1));
        assert_eq!(alloc.alloc_chain(), ChainId(0));
        assert_eq!(alloc.alloc_chain(), ChainId(1));
        alloc.reset();
        assert_eq!(alloc.alloc_instance(), InstanceId(0));
    }
}
