//! Construction primitives over raw buffer memory.
//!
//! Every function here operates on slots the caller has already classified
//! as live or dead; none of them track that state. Each picks its strategy
//! from compile-time facts about `T`:
//!
//! - Moves are always a bulk `ptr::copy`. A moved-from slot is dead and is
//!   never destroyed again; [`forget_range`] marks it.
//! - Destruction skips the drop loop when [`trivially_destructible`] holds.
//! - Copies go through the element's [`CopyStrategy`].
//!
//! Debug builds poison dead slots (see [`fitvec_core::poison`]).

#![allow(unsafe_code)]

use std::ptr::{self, NonNull};

use fitvec_core::poison;
use fitvec_core::{array_layout, trivially_destructible, CopyStrategy, Element, RawAllocator};
use tracing::trace;

/// Allocate an uninitialized buffer of exactly `capacity` slots.
///
/// Zero-sized element types never reach the allocator; they get a dangling,
/// well-aligned pointer.
///
/// # Panics
///
/// Panics in debug builds if `capacity` is zero, and with "capacity
/// overflow" if the byte size is not representable.
pub fn allocate<T, A: RawAllocator>(alloc: &A, capacity: usize) -> NonNull<T> {
    debug_assert!(capacity > 0, "allocate called with zero capacity");
    let layout = array_layout::<T>(capacity);
    if layout.size() == 0 {
        return NonNull::dangling();
    }
    let ptr = alloc.alloc(layout).cast::<T>();
    // SAFETY: the block was just allocated for `capacity` slots and holds no
    // live value.
    unsafe { poison::fill(ptr.as_ptr(), capacity, poison::UNINIT) };
    ptr
}

/// Release a buffer obtained from [`allocate`].
///
/// # Safety
///
/// `data` must come from `allocate(alloc, capacity)` with the same
/// allocator and capacity, must not be freed twice, and must hold no live
/// element.
pub unsafe fn release<T, A: RawAllocator>(alloc: &A, data: NonNull<T>, capacity: usize) {
    let layout = array_layout::<T>(capacity);
    if layout.size() == 0 {
        return;
    }
    // SAFETY: guaranteed by the caller.
    unsafe { alloc.free(data.cast(), layout) }
}

/// Releases a detached buffer when dropped, including during unwinding.
pub(crate) struct ReleaseOnDrop<'a, T, A: RawAllocator> {
    alloc: &'a A,
    data: NonNull<T>,
    capacity: usize,
}

impl<'a, T, A: RawAllocator> ReleaseOnDrop<'a, T, A> {
    /// Every slot of `data` must be dead or moved-from by the time the guard
    /// drops, and `data` must come from `allocate(alloc, capacity)`.
    pub(crate) fn new(alloc: &'a A, data: NonNull<T>, capacity: usize) -> Self {
        Self {
            alloc,
            data,
            capacity,
        }
    }
}

impl<T, A: RawAllocator> Drop for ReleaseOnDrop<'_, T, A> {
    fn drop(&mut self) {
        trace!(
            target: "fitvec::vector",
            capacity = self.capacity,
            "release buffer"
        );
        // SAFETY: guaranteed by the caller of `new`.
        unsafe { release(self.alloc, self.data, self.capacity) };
    }
}

/// Place one element at `at`.
///
/// # Safety
///
/// `at` must be valid for writes and hold no live value.
#[inline]
pub unsafe fn construct_single<T>(at: *mut T, value: T) {
    // SAFETY: guaranteed by the caller.
    unsafe { at.write(value) }
}

/// Construct `count` elements forward from `at`, each produced by `make`.
///
/// `make` is a repeatable source (`Default::default`, or a clone of one
/// value); a single value cannot be moved into several slots.
///
/// # Safety
///
/// `at` must be valid for `count` writes and the slots must hold no live
/// values.
pub unsafe fn construct_n<T>(at: *mut T, count: usize, mut make: impl FnMut() -> T) {
    for i in 0..count {
        // SAFETY: `i < count`, within the caller's writable range.
        unsafe { at.add(i).write(make()) };
    }
}

/// Destroy the element at `at`.
///
/// # Safety
///
/// `at` must hold a live element, which is dead afterwards.
#[inline]
pub unsafe fn destroy_single<T>(at: *mut T) {
    if !trivially_destructible::<T>() {
        // SAFETY: the slot holds a live element.
        unsafe { ptr::drop_in_place(at) };
    }
    // SAFETY: the slot is now dead.
    unsafe { poison::fill(at, 1, poison::DESTROYED) };
}

/// Destroy `count` elements starting at `first`.
///
/// # Safety
///
/// Every slot in `[first, first + count)` must hold a live element; all are
/// dead afterwards.
pub unsafe fn destroy_range<T>(first: *mut T, count: usize) {
    if !trivially_destructible::<T>() {
        // SAFETY: the range holds `count` live elements.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(first, count)) };
    }
    // SAFETY: the range is now dead.
    unsafe { poison::fill(first, count, poison::DESTROYED) };
}

/// Mark `count` moved-from slots at `first` as dead without running
/// destructors.
///
/// # Safety
///
/// The slots must be writable and their values must already have been
/// moved elsewhere.
#[inline]
pub unsafe fn forget_range<T>(first: *mut T, count: usize) {
    // SAFETY: guaranteed by the caller.
    unsafe { poison::fill(first, count, poison::DESTROYED) };
}

/// Copy-construct `src` into fresh memory at `dest`.
///
/// Uses a bulk byte copy for [`Bitwise`](fitvec_core::Bitwise) elements and
/// `Clone::clone` per element otherwise.
///
/// # Safety
///
/// `dest` must be valid for `src.len()` writes, hold no live values, and
/// not overlap `src`.
#[inline]
pub unsafe fn copy_construct_range<T: Element>(src: &[T], dest: *mut T) {
    // SAFETY: guaranteed by the caller.
    unsafe { <T::Copier as CopyStrategy<T>>::copy_construct(src, dest) }
}

/// Relocate `count` elements from `first` into fresh memory at `dest`.
///
/// The source slots are moved-from afterwards; the caller must not destroy
/// them.
///
/// # Safety
///
/// `first` must hold `count` live elements, `dest` must be valid for
/// `count` writes with no live values, and the two ranges must not overlap.
#[inline]
pub unsafe fn move_construct_range<T>(first: *const T, count: usize, dest: *mut T) {
    // SAFETY: guaranteed by the caller.
    unsafe { ptr::copy_nonoverlapping(first, dest, count) }
}

/// Copy-assign `src` over the live slots starting at `dest`, front to back.
///
/// Returns one past the last written slot.
///
/// # Safety
///
/// `[dest, dest + src.len())` must hold live elements and must not overlap
/// `src`.
pub unsafe fn copy_assign_range<T: Element>(src: &[T], dest: *mut T) -> *mut T {
    // SAFETY: the caller guarantees `src.len()` live, unaliased slots.
    let live = unsafe { std::slice::from_raw_parts_mut(dest, src.len()) };
    <T::Copier as CopyStrategy<T>>::copy_assign(src, live);
    // SAFETY: one past the end of the range just written.
    unsafe { dest.add(src.len()) }
}

/// Move `count` elements from `first` to `dest`, front to back.
///
/// Supports `dest < first` with overlap (shifting a block left). Returns
/// `dest + count`.
///
/// # Safety
///
/// `first` must hold `count` live elements. Destination slots outside the
/// source range must already be dead (their previous values destroyed).
/// Source slots not covered by the destination are moved-from afterwards.
#[inline]
pub unsafe fn move_assign_range<T>(first: *const T, count: usize, dest: *mut T) -> *mut T {
    // SAFETY: `ptr::copy` tolerates overlap; validity is the caller's.
    unsafe {
        ptr::copy(first, dest, count);
        dest.add(count)
    }
}

/// Move `count` elements from `first` so that the block ends at `dest_end`,
/// working back to front.
///
/// Shifts a block right (`dest_end > first + count`) without a temporary.
/// Returns the new start of the block, `dest_end - count`.
///
/// # Safety
///
/// Same contract as [`move_assign_range`], with the destination range
/// `[dest_end - count, dest_end)`.
#[inline]
pub unsafe fn move_assign_backward_range<T>(
    first: *const T,
    count: usize,
    dest_end: *mut T,
) -> *mut T {
    // SAFETY: `ptr::copy` tolerates overlap; validity is the caller's.
    unsafe {
        let dest = dest_end.sub(count);
        ptr::copy(first, dest, count);
        dest
    }
}
