//! Memory management utilities
//!
//! The engine's scratch memory is a bump arena: allocation advances an
//! offset through a fixed backing buffer, freeing is wholesale via
//! [`Arena::reset`] or a scope mark. The arena only ever holds plain-old
//! data, so nothing is dropped when offsets rewind.

use thiserror::Error;

/// Default alignment for arena allocations, two machine words.
pub const ARENA_DEFAULT_ALIGNMENT: usize = 2 * std::mem::size_of::<usize>();

/// Errors produced by [`Arena`]
#[derive(Debug, Error)]
pub enum ArenaError {
    /// The backing buffer cannot satisfy the request.
    #[error("arena out of memory: requested {requested} bytes with {remaining} remaining")]
    OutOfArena {
        /// Bytes asked for (after alignment padding)
        requested: usize,
        /// Bytes left in the backing buffer
        remaining: usize,
    },
}

/// A saved pair of offsets; restoring it discards everything allocated
/// after [`Arena::begin_scope`] returned it.
#[derive(Debug, Clone, Copy)]
pub struct ArenaMark {
    prev_offset: usize,
    curr_offset: usize,
}

/// Bump allocator over an owned contiguous byte region
pub struct Arena {
    buf: Box<[u8]>,
    prev_offset: usize,
    curr_offset: usize,
}

impl Arena {
    /// Create an arena backed by a freshly allocated buffer of `len` bytes
    pub fn with_capacity(len: usize) -> Self {
        Self {
            buf: vec![0u8; len].into_boxed_slice(),
            prev_offset: 0,
            curr_offset: 0,
        }
    }

    /// Total size of the backing buffer in bytes
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes still available from the current offset
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.curr_offset
    }

    /// Allocate `size` bytes at the given alignment.
    ///
    /// The returned region is zero-filled. `align` must be a power of two.
    pub fn alloc_aligned(&mut self, size: usize, align: usize) -> Result<&mut [u8], ArenaError> {
        assert!(align.is_power_of_two(), "arena alignment must be a power of two");

        let misalignment = self.curr_offset & (align - 1);
        let padding = if misalignment == 0 { 0 } else { align - misalignment };
        let offset = self.curr_offset + padding;

        if offset + size > self.buf.len() {
            return Err(ArenaError::OutOfArena {
                requested: padding + size,
                remaining: self.remaining(),
            });
        }

        self.prev_offset = offset;
        self.curr_offset = offset + size;

        let region = &mut self.buf[offset..offset + size];
        region.fill(0);
        Ok(region)
    }

    /// Allocate a zeroed, default-aligned slice of `count` values of `T`
    pub fn alloc_slice<T: bytemuck::Pod>(&mut self, count: usize) -> Result<&mut [T], ArenaError> {
        let align = std::mem::align_of::<T>().max(ARENA_DEFAULT_ALIGNMENT);
        let bytes = self.alloc_aligned(count * std::mem::size_of::<T>(), align)?;
        Ok(bytemuck::cast_slice_mut(bytes))
    }

    /// Forget every allocation. The backing buffer is retained.
    pub fn reset(&mut self) {
        self.prev_offset = 0;
        self.curr_offset = 0;
    }

    /// Save the current offsets so a batch of temporary allocations can be
    /// rolled back with [`Arena::end_scope`]
    pub fn begin_scope(&self) -> ArenaMark {
        ArenaMark {
            prev_offset: self.prev_offset,
            curr_offset: self.curr_offset,
        }
    }

    /// Roll back to a mark taken by [`Arena::begin_scope`]
    pub fn end_scope(&mut self, mark: ArenaMark) {
        self.prev_offset = mark.prev_offset;
        self.curr_offset = mark.curr_offset;
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.buf.len())
            .field("curr_offset", &self.curr_offset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_are_aligned_and_zeroed() {
        let mut arena = Arena::with_capacity(256);
        arena.alloc_aligned(3, 1).unwrap();
        let slice = arena.alloc_slice::<f32>(4).unwrap();
        assert_eq!(slice.as_ptr() as usize % ARENA_DEFAULT_ALIGNMENT, 0);
        assert!(slice.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn exhaustion_reports_out_of_arena() {
        let mut arena = Arena::with_capacity(64);
        arena.alloc_aligned(48, 16).unwrap();
        let err = arena.alloc_aligned(32, 16).unwrap_err();
        let ArenaError::OutOfArena { requested, remaining } = err;
        assert_eq!(requested, 32);
        assert_eq!(remaining, 16);
    }

    #[test]
    fn reset_reclaims_everything() {
        let mut arena = Arena::with_capacity(64);
        arena.alloc_aligned(64, 1).unwrap();
        assert_eq!(arena.remaining(), 0);
        arena.reset();
        assert_eq!(arena.remaining(), 64);
        arena.alloc_aligned(64, 1).unwrap();
    }

    #[test]
    fn scopes_nest_and_restore() {
        let mut arena = Arena::with_capacity(256);
        arena.alloc_aligned(16, 16).unwrap();
        let outer = arena.begin_scope();

        arena.alloc_aligned(32, 16).unwrap();
        let inner = arena.begin_scope();
        arena.alloc_aligned(64, 16).unwrap();
        arena.end_scope(inner);
        assert_eq!(arena.remaining(), 256 - 48);

        arena.end_scope(outer);
        assert_eq!(arena.remaining(), 256 - 16);
    }

    #[test]
    fn scope_rollback_leaves_reused_memory_zeroed() {
        let mut arena = Arena::with_capacity(64);
        let mark = arena.begin_scope();
        let slice = arena.alloc_slice::<u32>(4).unwrap();
        slice.fill(0xDEAD_BEEF);
        arena.end_scope(mark);
        let fresh = arena.alloc_slice::<u32>(4).unwrap();
        assert!(fresh.iter().all(|&v| v == 0));
    }
}
