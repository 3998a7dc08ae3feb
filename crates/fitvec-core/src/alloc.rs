//! Raw memory acquisition and release.
//!
//! A [`RawAllocator`] hands out uninitialized blocks and takes them back.
//! There is no recoverable out-of-memory path: an allocator that cannot
//! satisfy a request terminates the process through
//! [`handle_alloc_error`].

use std::alloc::{handle_alloc_error, Layout};
use std::ptr::NonNull;

/// Source of raw buffer memory.
///
/// Implementations are swappable so tests can route every buffer of a
/// vector through an instrumented allocator and assert that nothing is
/// outstanding at scope exit.
///
/// # Safety
///
/// Implementors must return blocks that are valid for reads and writes of
/// `layout.size()` bytes, aligned to `layout.align()`, and disjoint from
/// every other live block handed out by the same allocator.
pub unsafe trait RawAllocator {
    /// Allocate an uninitialized block for `layout`.
    ///
    /// `layout.size()` is never zero. Never returns on failure.
    fn alloc(&self, layout: Layout) -> NonNull<u8>;

    /// Release a block previously returned by [`alloc`](Self::alloc).
    ///
    /// # Safety
    ///
    /// `ptr` must come from `self.alloc(layout)` with the same `layout` and
    /// must not have been freed already.
    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout);
}

// SAFETY: forwards to `A`, which upholds the contract.
unsafe impl<A: RawAllocator + ?Sized> RawAllocator for &A {
    #[inline]
    fn alloc(&self, layout: Layout) -> NonNull<u8> {
        (**self).alloc(layout)
    }

    #[inline]
    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller contract is passed through unchanged.
        unsafe { (**self).free(ptr, layout) }
    }
}

/// The process-wide global allocator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemAllocator;

// SAFETY: `std::alloc::alloc` returns distinct, suitably aligned blocks.
unsafe impl RawAllocator for SystemAllocator {
    #[inline]
    fn alloc(&self, layout: Layout) -> NonNull<u8> {
        debug_assert!(layout.size() > 0, "zero-sized allocation request");
        // SAFETY: layout has non-zero size (checked above in debug builds,
        // guaranteed by callers otherwise).
        let ptr = unsafe { std::alloc::alloc(layout) };
        match NonNull::new(ptr) {
            Some(ptr) => ptr,
            None => handle_alloc_error(layout),
        }
    }

    #[inline]
    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller guarantees `ptr` came from `alloc(layout)`.
        unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
    }
}

/// Layout of a buffer holding `count` slots of `T`.
///
/// # Panics
///
/// Panics with "capacity overflow" if the byte size exceeds `isize::MAX`.
pub fn array_layout<T>(count: usize) -> Layout {
    match Layout::array::<T>(count) {
        Ok(layout) => layout,
        Err(_) => capacity_overflow(),
    }
}

/// Abort the current operation because a slot count cannot be represented.
#[cold]
#[inline(never)]
pub fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}
