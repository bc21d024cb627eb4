//! Sample memory owned by the engine, addressed by opaque handles.
//!
//! The host never sees pointers: it holds `Handle` values across calls and
//! the pool maps them to contiguous float storage. Handles stay valid from
//! allocation to deallocation; slot indices are recycled but a freed handle
//! simply stops resolving.

use render_core::Sample;

/// Opaque buffer identifier. Zero is the null handle and never resolves.
pub type Handle = u32;

/// The handle returned when allocation cannot be satisfied.
pub const NULL_HANDLE: Handle = 0;

/// Slab of engine-owned sample buffers.
#[derive(Default)]
pub struct BufferPool {
    slots: Vec<Option<Vec<Sample>>>,
    free: Vec<usize>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(&self, handle: Handle) -> Option<usize> {
        let index = (handle as usize).checked_sub(1)?;
        match self.slots.get(index) {
            Some(Some(_)) => Some(index),
            _ => None,
        }
    }

    /// Allocate a buffer of `frames * channels` samples and return its
    /// handle. The buffer is zeroed. `_zero` is the host's hint that junk
    /// would be acceptable; Rust allocation hands back zeroed memory on the
    /// only path we have, so the hint is moot.
    pub fn allocate(&mut self, frames: usize, channels: usize, _zero: bool) -> Handle {
        let Some(size) = frames.checked_mul(channels) else {
            return NULL_HANDLE;
        };
        let buffer = vec![0.0; size];
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(buffer);
                index
            }
            None => {
                self.slots.push(Some(buffer));
                self.slots.len() - 1
            }
        };
        (index + 1) as Handle
    }

    /// Grow (or shrink) the buffer behind `handle` to `new_frames`. The
    /// extension is zeroed and the handle keeps addressing the same buffer.
    pub fn reallocate(&mut self, handle: Handle, new_frames: usize, channels: usize) -> Handle {
        let Some(index) = self.index(handle) else {
            return NULL_HANDLE;
        };
        let Some(size) = new_frames.checked_mul(channels) else {
            return NULL_HANDLE;
        };
        if let Some(buffer) = self.slots[index].as_mut() {
            buffer.resize(size, 0.0);
        }
        handle
    }

    /// Release the buffer behind `handle`. The slot is recycled.
    pub fn deallocate(&mut self, handle: Handle) -> bool {
        match self.index(handle) {
            Some(index) => {
                self.slots[index] = None;
                self.free.push(index);
                true
            }
            None => false,
        }
    }

    pub fn slice(&self, handle: Handle) -> Option<&[Sample]> {
        let index = self.index(handle)?;
        self.slots[index].as_deref()
    }

    pub fn slice_mut(&mut self, handle: Handle) -> Option<&mut [Sample]> {
        let index = self.index(handle)?;
        self.slots[index].as_deref_mut()
    }

    /// Borrow two distinct buffers at once, both mutably.
    pub fn pair_mut(&mut self, a: Handle, b: Handle) -> Option<(&mut [Sample], &mut [Sample])> {
        let ia = self.index(a)?;
        let ib = self.index(b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (head, tail) = self.slots.split_at_mut(ib);
            Some((head[ia].as_deref_mut()?, tail[0].as_deref_mut()?))
        } else {
            let (head, tail) = self.slots.split_at_mut(ia);
            Some((tail[0].as_deref_mut()?, head[ib].as_deref_mut()?))
        }
    }

    /// Move a buffer out of its slot; pair with [`BufferPool::put_back`].
    /// Used where an operation needs one destination plus several sources.
    pub fn take(&mut self, handle: Handle) -> Option<Vec<Sample>> {
        let index = self.index(handle)?;
        self.slots[index].take()
    }

    pub fn put_back(&mut self, handle: Handle, buffer: Vec<Sample>) {
        if let Some(index) = (handle as usize).checked_sub(1) {
            if let Some(slot) = self.slots.get_mut(index) {
                *slot = Some(buffer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_is_zeroed_and_sized() {
        let mut pool = BufferPool::new();
        let handle = pool.allocate(8, 2, true);
        assert_ne!(handle, NULL_HANDLE);
        let buf = pool.slice(handle).unwrap();
        assert_eq!(buf.len(), 16);
        assert!(buf.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn null_and_freed_handles_do_not_resolve() {
        let mut pool = BufferPool::new();
        assert!(pool.slice(NULL_HANDLE).is_none());
        let handle = pool.allocate(4, 1, true);
        assert!(pool.deallocate(handle));
        assert!(pool.slice(handle).is_none());
        assert!(!pool.deallocate(handle));
    }

    #[test]
    fn reallocate_keeps_contents_and_zeroes_the_tail() {
        let mut pool = BufferPool::new();
        let handle = pool.allocate(2, 1, true);
        pool.slice_mut(handle).unwrap().copy_from_slice(&[1.0, 2.0]);
        assert_eq!(pool.reallocate(handle, 4, 1), handle);
        assert_eq!(pool.slice(handle).unwrap(), &[1.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn reallocate_of_a_bogus_handle_is_null() {
        let mut pool = BufferPool::new();
        assert_eq!(pool.reallocate(42, 4, 1), NULL_HANDLE);
    }

    #[test]
    fn pair_access_borrows_two_buffers() {
        let mut pool = BufferPool::new();
        let a = pool.allocate(4, 1, true);
        let b = pool.allocate(4, 1, true);
        {
            let (dst, src) = pool.pair_mut(a, b).unwrap();
            src.fill(1.0);
            dst.copy_from_slice(src);
        }
        assert_eq!(pool.slice(a).unwrap(), &[1.0; 4]);
        assert!(pool.pair_mut(a, a).is_none());
    }

    #[test]
    fn slots_are_recycled_under_fresh_handles() {
        let mut pool = BufferPool::new();
        let a = pool.allocate(4, 1, true);
        pool.deallocate(a);
        let b = pool.allocate(2, 1, true);
        // the slot is reused, so the new handle matches the old index
        assert_eq!(a, b);
        assert_eq!(pool.slice(b).unwrap().len(), 2);
    }
}
