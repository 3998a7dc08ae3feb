//! The exact-fit dynamic array.
//!
//! [`Vector`] owns one contiguous buffer obtained from its [`RawAllocator`].
//! Slots `[0, len)` hold live elements; slots `[len, capacity)` are
//! allocated but uninitialized. The buffer handle is `None` exactly when
//! the capacity is zero.
//!
//! Growth is exact-fit: appending to a full vector reallocates to
//! `capacity + 1`. This keeps the footprint minimal at the cost of O(n)
//! appends; call [`Vector::reserve`] up front when the final size is known.

#![allow(unsafe_code)]

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut, Index, IndexMut, Range};
use std::ptr::{self, NonNull};
use std::slice;

use fitvec_core::{capacity_overflow, CopyStrategy, Element, RawAllocator, SystemAllocator};
use tracing::trace;

use crate::into_iter::IntoIter;
use crate::raw;

/// A contiguous, exact-fit growable array with a pluggable allocator.
///
/// # Examples
///
/// ```
/// use fitvec::Vector;
///
/// let mut v = Vector::new();
/// v.push_back(10);
/// v.push_back(30);
/// v.insert(1, 20);
/// assert_eq!(v, [10, 20, 30]);
/// assert_eq!(v.capacity(), 3);
///
/// v.erase(0);
/// assert_eq!(v, [20, 30]);
/// ```
pub struct Vector<T, A: RawAllocator = SystemAllocator> {
    /// Buffer handle. `None` iff `capacity == 0`.
    data: Option<NonNull<T>>,
    /// Allocated slot count.
    capacity: usize,
    /// Live element count, always `<= capacity`.
    len: usize,
    alloc: A,
    _owns: PhantomData<T>,
}

// SAFETY: the vector uniquely owns its buffer and elements.
unsafe impl<T: Send, A: RawAllocator + Send> Send for Vector<T, A> {}
// SAFETY: shared access only hands out `&T` and `&A`.
unsafe impl<T: Sync, A: RawAllocator + Sync> Sync for Vector<T, A> {}

impl<T> Vector<T> {
    /// Create an empty vector. Does not allocate.
    pub const fn new() -> Self {
        Self::new_in(SystemAllocator)
    }

    /// Create a vector of `count` default-constructed elements.
    ///
    /// Allocates exactly `count` slots.
    pub fn with_len(count: usize) -> Self
    where
        T: Default,
    {
        Self::with_len_in(count, SystemAllocator)
    }

    /// Create a vector of `count` copies of `value`.
    ///
    /// Allocates exactly `count` slots.
    pub fn from_elem(count: usize, value: &T) -> Self
    where
        T: Element,
    {
        Self::from_elem_in(count, value, SystemAllocator)
    }
}

impl<T, A: RawAllocator> Vector<T, A> {
    /// Create an empty vector drawing memory from `alloc`. Does not
    /// allocate.
    pub const fn new_in(alloc: A) -> Self {
        Self {
            data: None,
            capacity: 0,
            len: 0,
            alloc,
            _owns: PhantomData,
        }
    }

    /// [`with_len`](Vector::with_len) with an explicit allocator.
    pub fn with_len_in(count: usize, alloc: A) -> Self
    where
        T: Default,
    {
        let mut v = Self::new_in(alloc);
        if count > 0 {
            let data = raw::allocate::<T, A>(&v.alloc, count);
            v.data = Some(data);
            v.capacity = count;
            // SAFETY: `count` fresh slots.
            unsafe { raw::construct_n(data.as_ptr(), count, T::default) };
            v.len = count;
        }
        v
    }

    /// [`from_elem`](Vector::from_elem) with an explicit allocator.
    pub fn from_elem_in(count: usize, value: &T, alloc: A) -> Self
    where
        T: Element,
    {
        let mut v = Self::new_in(alloc);
        if count > 0 {
            let data = raw::allocate::<T, A>(&v.alloc, count);
            v.data = Some(data);
            v.capacity = count;
            // SAFETY: `count` fresh slots.
            unsafe { raw::construct_n(data.as_ptr(), count, || value.clone()) };
            v.len = count;
        }
        v
    }

    /// The allocator backing this vector.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    // ── Element access ──────────────────────────────────────────────

    /// Raw pointer to the buffer, null iff the capacity is zero.
    ///
    /// Invalidated by any reallocation and by inserts/erases that shift
    /// elements at or after the pointed-to slot.
    pub fn as_ptr(&self) -> *const T {
        self.data.map_or(ptr::null(), |p| p.as_ptr().cast_const())
    }

    /// Mutable counterpart of [`as_ptr`](Vector::as_ptr).
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` are live; `base` is non-null and aligned even
        // without a buffer.
        unsafe { slice::from_raw_parts(self.base(), self.len) }
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, with unique access through `&mut self`.
        unsafe { slice::from_raw_parts_mut(self.base(), self.len) }
    }

    /// First element. Requires a non-empty vector.
    pub fn front(&self) -> &T {
        debug_assert!(self.len > 0, "front() on an empty vector");
        &self.as_slice()[0]
    }

    /// Mutable first element. Requires a non-empty vector.
    pub fn front_mut(&mut self) -> &mut T {
        debug_assert!(self.len > 0, "front_mut() on an empty vector");
        &mut self.as_mut_slice()[0]
    }

    /// Last element. Requires a non-empty vector.
    pub fn back(&self) -> &T {
        debug_assert!(self.len > 0, "back() on an empty vector");
        &self.as_slice()[self.len.wrapping_sub(1)]
    }

    /// Mutable last element. Requires a non-empty vector.
    pub fn back_mut(&mut self) -> &mut T {
        debug_assert!(self.len > 0, "back_mut() on an empty vector");
        let last = self.len.wrapping_sub(1);
        &mut self.as_mut_slice()[last]
    }

    // ── Capacity ────────────────────────────────────────────────────

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no live elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Grow the buffer to exactly `new_capacity` slots.
    ///
    /// No-op if `new_capacity <= capacity()`; never shrinks. Elements are
    /// relocated into the new buffer and the old one is released.
    pub fn reserve(&mut self, new_capacity: usize) {
        if new_capacity > self.capacity {
            self.set_capacity(new_capacity);
        }
    }

    /// Reallocate to exactly `len()` slots, releasing the buffer entirely
    /// when empty.
    pub fn shrink_to_fit(&mut self) {
        self.set_capacity(self.len);
    }

    // ── Modifiers ───────────────────────────────────────────────────

    /// Destroy all elements. The capacity is unchanged.
    pub fn clear(&mut self) {
        if self.len > 0 {
            let len = mem::replace(&mut self.len, 0);
            // SAFETY: `[0, len)` were live and are no longer counted.
            unsafe { raw::destroy_range(self.base(), len) };
        }
    }

    /// Append `value`, growing by exactly one slot when full.
    ///
    /// Returns a reference to the new element.
    pub fn emplace_back(&mut self, value: T) -> &mut T {
        self.emplace_back_with(|| value)
    }

    /// Append the value produced by `make`, growing by exactly one slot when
    /// full. `make` runs after any reallocation.
    pub fn emplace_back_with(&mut self, make: impl FnOnce() -> T) -> &mut T {
        if self.len == self.capacity {
            self.set_capacity(self.grown_capacity());
        }
        let slot = self.slot(self.len);
        // SAFETY: `len < capacity`, so the slot is allocated and dead.
        unsafe { raw::construct_single(slot, make()) };
        self.len += 1;
        // SAFETY: the slot was just constructed and is uniquely borrowed.
        unsafe { &mut *slot }
    }

    /// Append `value`.
    pub fn push_back(&mut self, value: T) {
        self.emplace_back(value);
    }

    /// Destroy the last element. Requires a non-empty vector; does nothing
    /// on an empty one in release builds.
    pub fn pop_back(&mut self) {
        debug_assert!(self.len > 0, "pop_back() on an empty vector");
        if self.len == 0 {
            return;
        }
        self.len -= 1;
        // SAFETY: the former last slot is live and no longer counted.
        unsafe { raw::destroy_single(self.slot(self.len)) };
    }

    /// Move the last element out, or `None` when empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let slot = self.slot(self.len);
        // SAFETY: the slot is live; reading moves it out, after which it is
        // dead.
        unsafe {
            let value = slot.read();
            raw::forget_range(slot, 1);
            Some(value)
        }
    }

    /// Insert `value` at index `pos`, shifting later elements right.
    ///
    /// Returns `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos > len()`.
    pub fn emplace(&mut self, pos: usize, value: T) -> usize {
        self.emplace_from(pos, |_| value)
    }

    /// Insert the value produced by `make` at index `pos`.
    ///
    /// `make` runs before any element moves or any memory is allocated.
    /// Returns `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos > len()`.
    pub fn emplace_with(&mut self, pos: usize, make: impl FnOnce() -> T) -> usize {
        self.emplace_from(pos, |_| make())
    }

    /// Insert `value` at index `pos`. Returns `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos > len()`.
    pub fn insert(&mut self, pos: usize, value: T) -> usize {
        self.emplace(pos, value)
    }

    /// Insert a copy of this vector's own element `source` at index `pos`.
    ///
    /// The copy is always taken from the untouched current contents, so
    /// `source` may lie anywhere in the vector, including at or after
    /// `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos > len()` or `source >= len()`.
    pub fn insert_copy_of(&mut self, pos: usize, source: usize) -> usize
    where
        T: Clone,
    {
        assert!(
            source < self.len,
            "copy source (is {source}) should be < len (is {})",
            self.len
        );
        self.emplace_from(pos, |live| live[source].clone())
    }

    /// Remove the element at `pos`, shifting later elements left.
    ///
    /// Returns `pos`, which now addresses the following element, or equals
    /// `len()` if the removed element was last.
    ///
    /// # Panics
    ///
    /// Panics if `pos >= len()`.
    pub fn erase(&mut self, pos: usize) -> usize {
        assert!(
            pos < self.len,
            "erase index (is {pos}) should be < len (is {})",
            self.len
        );
        let old_len = self.len;
        // Elements after `pos` leak rather than double-drop if a destructor
        // panics.
        self.len = pos;
        let at = self.slot(pos);
        // SAFETY: `pos` is live; after its destruction the tail
        // `[pos + 1, old_len)` moves down into dead-or-vacated slots and the
        // last slot becomes moved-from.
        unsafe {
            raw::destroy_single(at);
            raw::move_assign_range(at.add(1), old_len - pos - 1, at);
            raw::forget_range(self.slot(old_len - 1), 1);
        }
        self.len = old_len - 1;
        pos
    }

    /// Remove the elements in `range`, shifting later elements left.
    ///
    /// An empty range is a no-op. Returns `range.start`.
    ///
    /// # Panics
    ///
    /// Panics if `range.start > range.end` or `range.end > len()`.
    pub fn erase_range(&mut self, range: Range<usize>) -> usize {
        let Range { start, end } = range;
        assert!(
            start <= end && end <= self.len,
            "erase range {start}..{end} out of bounds for len {}",
            self.len
        );
        if start == end {
            return start;
        }
        let old_len = self.len;
        let removed = end - start;
        self.len = start;
        let first = self.slot(start);
        // SAFETY: `[start, end)` are live and destroyed first; the tail
        // `[end, old_len)` then moves down and the leftover
        // `[old_len - removed, old_len)` is moved-from.
        unsafe {
            raw::destroy_range(first, removed);
            let new_end = raw::move_assign_range(self.slot(end), old_len - end, first);
            raw::forget_range(new_end, removed);
        }
        self.len = old_len - removed;
        start
    }

    /// Replace the contents with copies of `src`.
    ///
    /// Reallocates at most once, to exactly `src.len()` slots, and only when
    /// the current capacity is too small. Live slots are copy-assigned
    /// rather than destroyed and rebuilt.
    pub fn assign(&mut self, src: &[T])
    where
        T: Element,
    {
        let new_len = src.len();

        if <T::Copier as CopyStrategy<T>>::BITWISE {
            if new_len > self.capacity {
                self.clear();
                self.set_capacity(new_len);
            }
            let old_len = mem::replace(&mut self.len, 0);
            // SAFETY: bitwise elements carry no drop glue, so overwriting
            // live slots needs no destruction; `[new_len, old_len)` only get
            // their dead-slot marking.
            unsafe {
                raw::copy_construct_range(src, self.base());
                if old_len > new_len {
                    raw::destroy_range(self.slot(new_len), old_len - new_len);
                }
            }
            self.len = new_len;
            return;
        }

        if new_len > self.len {
            if new_len > self.capacity {
                // Leaves no live slots, so nothing is copy-assigned below.
                self.clear();
                self.set_capacity(new_len);
            }
            let live = self.len;
            // SAFETY: `[0, live)` are live and receive assignments;
            // `[live, new_len)` are allocated and dead.
            unsafe {
                raw::copy_assign_range(&src[..live], self.base());
                raw::copy_construct_range(&src[live..], self.slot(live));
            }
            self.len = new_len;
        } else {
            let old_len = self.len;
            // SAFETY: `[0, new_len)` are live.
            unsafe { raw::copy_assign_range(src, self.base()) };
            self.len = new_len;
            // SAFETY: `[new_len, old_len)` are live and no longer counted.
            unsafe { raw::destroy_range(self.slot(new_len), old_len - new_len) };
        }
    }

    /// Move the contents out, leaving this vector empty with no buffer.
    ///
    /// O(1); no element is constructed or destroyed.
    pub fn take(&mut self) -> Self
    where
        A: Clone,
    {
        let empty = Self::new_in(self.alloc.clone());
        mem::replace(self, empty)
    }

    /// Destroy the current contents and take over `other`'s buffer, leaving
    /// `other` empty.
    pub fn move_from(&mut self, other: &mut Self)
    where
        A: Clone,
    {
        *self = other.take();
    }

    // ── Internals ───────────────────────────────────────────────────

    /// Base pointer of the buffer; dangling but aligned without one.
    #[inline]
    fn base(&self) -> *mut T {
        self.data.unwrap_or(NonNull::dangling()).as_ptr()
    }

    /// Pointer to slot `index`, which must be `<= capacity`.
    #[inline]
    fn slot(&self, index: usize) -> *mut T {
        debug_assert!(index <= self.capacity);
        // SAFETY: `index <= capacity` stays within (or one past) the
        // allocation; with no buffer `index` is 0.
        unsafe { self.base().add(index) }
    }

    fn grown_capacity(&self) -> usize {
        match self.capacity.checked_add(1) {
            Some(capacity) => capacity,
            None => capacity_overflow(),
        }
    }

    /// Reallocate to exactly `new_capacity` slots, relocating live
    /// elements. Frees the buffer when `new_capacity` is zero.
    fn set_capacity(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity >= self.len);
        if new_capacity == self.capacity {
            return;
        }

        trace!(
            target: "fitvec::vector",
            old_capacity = self.capacity,
            new_capacity,
            len = self.len,
            elem_size = mem::size_of::<T>(),
            "reallocate"
        );

        let new_data = if new_capacity == 0 {
            None
        } else {
            let fresh = raw::allocate::<T, A>(&self.alloc, new_capacity);
            // SAFETY: `[0, len)` are live in the old buffer and the fresh
            // buffer has at least `len` dead slots; afterwards the old slots
            // are moved-from.
            unsafe {
                raw::move_construct_range(self.base(), self.len, fresh.as_ptr());
                raw::forget_range(self.base(), self.len);
            }
            Some(fresh)
        };
        self.release_buffer();
        self.data = new_data;
        self.capacity = new_capacity;
    }

    /// Free the buffer without touching elements. Every slot must already
    /// be dead or moved-from.
    fn release_buffer(&mut self) {
        if let Some(data) = self.data.take() {
            trace!(
                target: "fitvec::vector",
                capacity = self.capacity,
                "release buffer"
            );
            // SAFETY: `data` was allocated with `capacity` slots by this
            // vector's allocator and holds no live elements.
            unsafe { raw::release(&self.alloc, data, self.capacity) };
        }
        self.capacity = 0;
    }

    /// Destroy every element and free the buffer.
    ///
    /// The buffer is released even if an element destructor panics.
    fn tidy(&mut self) {
        let len = mem::replace(&mut self.len, 0);
        let capacity = mem::replace(&mut self.capacity, 0);
        let Some(data) = self.data.take() else {
            return;
        };
        let _release = raw::ReleaseOnDrop::new(&self.alloc, data, capacity);
        // SAFETY: `[0, len)` were live and are no longer counted; the guard
        // frees the buffer afterwards, or during unwinding.
        unsafe { raw::destroy_range(data.as_ptr(), len) };
    }

    /// Shared insertion path. `make` receives the current live elements,
    /// before anything has been moved.
    fn emplace_from(&mut self, pos: usize, make: impl FnOnce(&[T]) -> T) -> usize {
        assert!(
            pos <= self.len,
            "insertion index (is {pos}) should be <= len (is {})",
            self.len
        );

        if self.len == self.capacity {
            return self.emplace_reallocate(pos, make);
        }

        let value = make(self.as_slice());
        if pos == self.len {
            // SAFETY: spare capacity, so the slot is allocated and dead.
            unsafe { raw::construct_single(self.slot(pos), value) };
            self.len += 1;
            return pos;
        }

        let len = self.len;
        // SAFETY: `len < capacity`. The last element moves into the dead
        // slot `len`; `[pos, len - 1)` then shifts right by one into
        // `[pos + 1, len)`; slot `pos` is left moved-from and receives the
        // new value.
        unsafe {
            let end = self.slot(len);
            raw::move_construct_range(self.slot(len - 1), 1, end);
            raw::move_assign_backward_range(self.slot(pos), len - 1 - pos, end);
            raw::construct_single(self.slot(pos), value);
        }
        self.len = len + 1;
        pos
    }

    fn emplace_reallocate(&mut self, pos: usize, make: impl FnOnce(&[T]) -> T) -> usize {
        debug_assert_eq!(self.len, self.capacity);
        let new_capacity = self.grown_capacity();
        let len = self.len;

        trace!(
            target: "fitvec::vector",
            old_capacity = self.capacity,
            new_capacity,
            pos,
            "reallocate for insert"
        );

        // Built from the intact old buffer, before anything is allocated.
        let value = make(self.as_slice());
        let fresh = raw::allocate::<T, A>(&self.alloc, new_capacity);
        let dest = fresh.as_ptr();
        // SAFETY: the new element goes to its final slot, then `[0, pos)` and
        // `[pos, len)` relocate around it. Old slots are moved-from
        // afterwards.
        unsafe {
            raw::construct_single(dest.add(pos), value);
            raw::move_construct_range(self.base(), pos, dest);
            raw::move_construct_range(self.slot(pos), len - pos, dest.add(pos + 1));
            raw::forget_range(self.base(), len);
        }
        self.release_buffer();
        self.data = Some(fresh);
        self.capacity = new_capacity;
        self.len = len + 1;
        pos
    }

    /// Hand the buffer over to an owning iterator.
    pub(crate) fn into_raw_parts(self) -> (Option<NonNull<T>>, usize, usize, A) {
        let me = mem::ManuallyDrop::new(self);
        // SAFETY: `me` is never dropped, so the allocator is moved out
        // exactly once.
        let alloc = unsafe { ptr::read(&me.alloc) };
        (me.data, me.capacity, me.len, alloc)
    }
}

impl<T, A: RawAllocator> Drop for Vector<T, A> {
    fn drop(&mut self) {
        self.tidy();
    }
}

impl<T: Element, A: RawAllocator + Clone> Clone for Vector<T, A> {
    /// Copy-construct into a buffer of exactly `self.len()` slots.
    fn clone(&self) -> Self {
        let mut out = Self::new_in(self.alloc.clone());
        if self.len > 0 {
            let data = raw::allocate::<T, A>(&out.alloc, self.len);
            out.data = Some(data);
            out.capacity = self.len;
            // SAFETY: `len` fresh slots, disjoint from `self`.
            unsafe { raw::copy_construct_range(self.as_slice(), data.as_ptr()) };
            out.len = self.len;
        }
        out
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source.as_slice());
    }
}

impl<T: Element, A: RawAllocator + Clone> Element for Vector<T, A> {
    type Copier = fitvec_core::ElementWise;
}

impl<T, A: RawAllocator + Default> Default for Vector<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, A: RawAllocator> Deref for Vector<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: RawAllocator> DerefMut for Vector<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: RawAllocator> AsRef<[T]> for Vector<T, A> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: RawAllocator> AsMut<[T]> for Vector<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: RawAllocator> Index<usize> for Vector<T, A> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        debug_assert!(index < self.len, "index {index} out of range for len {}", self.len);
        &self.as_slice()[index]
    }
}

impl<T, A: RawAllocator> IndexMut<usize> for Vector<T, A> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len, "index {index} out of range for len {}", self.len);
        &mut self.as_mut_slice()[index]
    }
}

impl<T, U, A, B> PartialEq<Vector<U, B>> for Vector<T, A>
where
    T: PartialEq<U>,
    A: RawAllocator,
    B: RawAllocator,
{
    /// Equal iff same length and element-wise equal; capacity is ignored.
    fn eq(&self, other: &Vector<U, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: RawAllocator> Eq for Vector<T, A> {}

impl<T, U, A: RawAllocator> PartialEq<[U]> for Vector<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, A: RawAllocator> PartialEq<&[U]> for Vector<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, A: RawAllocator, const N: usize> PartialEq<[U; N]> for Vector<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Hash, A: RawAllocator> Hash for Vector<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T: fmt::Debug, A: RawAllocator> fmt::Debug for Vector<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Element> From<&[T]> for Vector<T> {
    fn from(src: &[T]) -> Self {
        let mut v = Self::new();
        v.assign(src);
        v
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T> {
    fn from(items: [T; N]) -> Self {
        let mut v = Self::new();
        v.reserve(N);
        for item in items {
            v.push_back(item);
        }
        v
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut v = Self::new();
        v.extend(iter);
        v
    }
}

impl<T, A: RawAllocator> Extend<T> for Vector<T, A> {
    /// Reserves exactly `len() + lower size hint`, then appends with
    /// exact-fit growth for anything beyond the hint.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(self.len.saturating_add(lower));
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T, A: RawAllocator> IntoIterator for Vector<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter::new(self)
    }
}

impl<'a, T, A: RawAllocator> IntoIterator for &'a Vector<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> slice::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: RawAllocator> IntoIterator for &'a mut Vector<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn filled(values: &[i32]) -> Vector<i32> {
        let mut v = Vector::new();
        for &x in values {
            v.push_back(x);
        }
        v
    }

    #[test]
    fn new_does_not_allocate() {
        let v: Vector<String> = Vector::new();
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), 0);
        assert!(v.as_ptr().is_null());
    }

    #[test]
    fn with_len_default_constructs_exactly() {
        let v: Vector<i32> = Vector::with_len(3);
        assert_eq!(v, [0, 0, 0]);
        assert_eq!(v.capacity(), 3);
        assert!(!v.as_ptr().is_null());
    }

    #[test]
    fn from_elem_copies_value() {
        let v = Vector::from_elem(2, &String::from("ab"));
        assert_eq!(v, ["ab", "ab"]);
        assert_eq!(v.capacity(), 2);
    }

    #[test]
    fn push_back_grows_exactly_one_slot() {
        let mut v = Vector::new();
        for i in 0..5 {
            v.push_back(i);
            assert_eq!(v.capacity(), i as usize + 1);
        }
        assert_eq!(v, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn emplace_back_returns_new_element() {
        let mut v = filled(&[1]);
        *v.emplace_back(5) += 1;
        assert_eq!(v, [1, 6]);
        let s = Vector::<String>::new().emplace_back_with(|| "x".into()).clone();
        assert_eq!(s, "x");
    }

    #[test]
    fn reserve_smaller_is_noop() {
        let mut v = filled(&[1, 2, 3]);
        let ptr = v.as_ptr();
        v.reserve(2);
        v.reserve(3);
        assert_eq!(v.as_ptr(), ptr);
        assert_eq!(v.capacity(), 3);
    }

    #[test]
    fn scenario_a_reserve_reallocates_exactly() {
        let mut v: Vector<i32> = Vector::with_len(3);
        v[0] = 1;
        v[1] = 2;
        v[2] = 3;
        let ptr = v.as_ptr();
        v.reserve(10);
        assert_eq!(v.capacity(), 10);
        assert_ne!(v.as_ptr(), ptr);
        assert_eq!(v, [1, 2, 3]);
    }

    #[test]
    fn shrink_to_fit_matches_len() {
        let mut v = filled(&[1, 2]);
        v.reserve(8);
        v.shrink_to_fit();
        assert_eq!(v.capacity(), 2);
        assert_eq!(v, [1, 2]);

        v.clear();
        v.shrink_to_fit();
        assert_eq!(v.capacity(), 0);
        assert!(v.as_ptr().is_null());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut v = filled(&[1, 2, 3]);
        v.clear();
        assert!(v.is_empty());
        assert_eq!(v.capacity(), 3);
    }

    #[test]
    fn front_and_back() {
        let mut v = filled(&[4, 5, 6]);
        assert_eq!(*v.front(), 4);
        assert_eq!(*v.back(), 6);
        *v.front_mut() = 1;
        *v.back_mut() = 9;
        assert_eq!(v, [1, 5, 9]);
    }

    #[test]
    fn pop_back_and_pop() {
        let mut v = filled(&[1, 2, 3]);
        v.pop_back();
        assert_eq!(v, [1, 2]);
        assert_eq!(v.pop(), Some(2));
        assert_eq!(v.pop(), Some(1));
        assert_eq!(v.pop(), None);
        assert_eq!(v.capacity(), 3);
    }

    #[test]
    fn scenario_b_erase_middle() {
        let mut v = filled(&[1, 2, 3, 4, 5]);
        let pos = v.erase(2);
        assert_eq!(v, [1, 2, 4, 5]);
        assert_eq!(v[pos], 4);
    }

    #[test]
    fn erase_last_returns_end() {
        let mut v = filled(&[1, 2, 3]);
        assert_eq!(v.erase(2), v.len());
        assert_eq!(v, [1, 2]);
    }

    #[test]
    fn erase_range_removes_block() {
        let mut v: Vector<String> =
            ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
        assert_eq!(v.erase_range(1..3), 1);
        assert_eq!(v, ["a", "d", "e"]);
        assert_eq!(v.erase_range(2..2), 2);
        assert_eq!(v.len(), 3);
        assert_eq!(v.erase_range(0..3), 0);
        assert!(v.is_empty());
    }

    #[test]
    fn scenario_c_insert_at_full_capacity() {
        let mut v = filled(&[10, 20, 30]);
        v.shrink_to_fit();
        let pos = v.insert(1, 99);
        assert_eq!(pos, 1);
        assert_eq!(v, [10, 99, 20, 30]);
        assert_eq!(v.capacity(), 4);
    }

    #[test]
    fn insert_with_spare_capacity_keeps_buffer() {
        let mut v = filled(&[10, 20, 30]);
        v.reserve(5);
        let ptr = v.as_ptr();
        v.insert(0, 5);
        v.insert(4, 40);
        assert_eq!(v, [5, 10, 20, 30, 40]);
        assert_eq!(v.as_ptr(), ptr);
        assert_eq!(v.capacity(), 5);
    }

    #[test]
    fn insert_middle_with_spare_capacity_shifts_tail() {
        for pos in 0..=3 {
            let mut v: Vector<String> = Vector::new();
            v.reserve(4);
            for s in ["a", "b", "c"] {
                v.push_back(s.to_string());
            }
            let mut expected = vec!["a", "b", "c"];
            expected.insert(pos, "x");

            v.insert(pos, "x".to_string());
            assert_eq!(v, expected.as_slice());
            assert_eq!(v.capacity(), 4);
        }
    }

    #[test]
    fn insert_copy_of_aliases_own_element() {
        // Reallocating path: source sits after the insertion point.
        let mut v: Vector<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        v.shrink_to_fit();
        v.insert_copy_of(0, 2);
        assert_eq!(v, ["c", "a", "b", "c"]);

        // In-place path: source is the element being shifted.
        v.reserve(10);
        v.insert_copy_of(1, 1);
        assert_eq!(v, ["c", "a", "a", "b", "c"]);
    }

    #[test]
    fn scenario_d_assign_shorter() {
        let mut v: Vector<String> =
            ["1", "2", "3", "4", "5"].iter().map(|s| s.to_string()).collect();
        let cap = v.capacity();
        let src = [String::from("x"), String::from("y")];
        v.assign(&src);
        assert_eq!(v, ["x", "y"]);
        assert_eq!(v.capacity(), cap);
    }

    #[test]
    fn assign_longer_reallocates_exactly() {
        let mut v = filled(&[1]);
        v.assign(&[7, 8, 9]);
        assert_eq!(v, [7, 8, 9]);
        assert_eq!(v.capacity(), 3);

        let mut s: Vector<String> = Vector::new();
        s.push_back("keep".into());
        s.reserve(4);
        s.assign(&["p".to_string(), "q".to_string(), "r".to_string()]);
        assert_eq!(s, ["p", "q", "r"]);
        assert_eq!(s.capacity(), 4);
    }

    #[test]
    fn scenario_e_equality_ignores_capacity() {
        let mut a = filled(&[1, 2, 3]);
        let mut b = filled(&[1, 2, 3]);
        b.reserve(10);
        assert_eq!(a, b);
        a.push_back(4);
        assert_ne!(a, b);
    }

    #[test]
    fn clone_uses_len_as_capacity() {
        let mut v = filled(&[1, 2]);
        v.reserve(10);
        let mut c = v.clone();
        assert_eq!(c, v);
        assert_eq!(c.capacity(), 2);
        c[0] = 100;
        assert_eq!(v[0], 1);
    }

    #[test]
    fn take_leaves_source_empty() {
        let mut v = filled(&[1, 2, 3]);
        let ptr = v.as_ptr();
        let moved = v.take();
        assert_eq!(moved.as_ptr(), ptr);
        assert_eq!(moved, [1, 2, 3]);
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), 0);
        assert!(v.as_ptr().is_null());
    }

    #[test]
    fn move_from_steals_buffer() {
        let mut a = filled(&[9]);
        let mut b = filled(&[1, 2]);
        let ptr = b.as_ptr();
        a.move_from(&mut b);
        assert_eq!(a, [1, 2]);
        assert_eq!(a.as_ptr(), ptr);
        assert!(b.is_empty());
        assert_eq!(b.capacity(), 0);
    }

    #[test]
    fn zero_sized_elements() {
        let mut v: Vector<()> = Vector::new();
        for _ in 0..4 {
            v.push_back(());
        }
        v.insert(2, ());
        v.erase(0);
        assert_eq!(v.len(), 4);
        assert_eq!(v.capacity(), 5);
    }

    #[test]
    fn collect_and_extend() {
        let mut v: Vector<i32> = (1..=3).collect();
        assert_eq!(v.capacity(), 3);
        v.extend([4, 5]);
        assert_eq!(v, [1, 2, 3, 4, 5]);
        assert_eq!(v.capacity(), 5);
        let from_slice = Vector::from(&[1, 2][..]);
        assert_eq!(from_slice, [1, 2]);
    }

    #[test]
    fn debug_formats_as_list() {
        assert_eq!(format!("{:?}", filled(&[1, 2])), "[1, 2]");
    }

    #[test]
    #[should_panic(expected = "insertion index")]
    fn insert_past_end_panics() {
        let mut v = filled(&[1]);
        v.insert(2, 0);
    }

    #[test]
    #[should_panic(expected = "erase index")]
    fn erase_out_of_range_panics() {
        let mut v = filled(&[1]);
        v.erase(1);
    }

    proptest! {
        #[test]
        fn push_sequence_preserves_order(values in proptest::collection::vec(any::<i32>(), 0..64)) {
            let v = filled(&values);
            prop_assert_eq!(v.len(), values.len());
            prop_assert_eq!(v.as_slice(), values.as_slice());
        }

        #[test]
        fn insert_matches_reference(
            values in proptest::collection::vec(any::<i32>(), 0..32),
            pos_seed in any::<usize>(),
            spare in 0usize..3,
            item in any::<i32>(),
        ) {
            let mut v = filled(&values);
            v.reserve(values.len() + spare);
            let old_cap = v.capacity();
            let pos = pos_seed % (values.len() + 1);

            let mut expected = values.clone();
            expected.insert(pos, item);
            v.insert(pos, item);

            prop_assert_eq!(v.as_slice(), expected.as_slice());
            if spare == 0 {
                prop_assert_eq!(v.capacity(), values.len() + 1);
            } else {
                prop_assert_eq!(v.capacity(), old_cap);
            }
        }

        #[test]
        fn erase_matches_reference(
            values in proptest::collection::vec(any::<i32>(), 1..32),
            pos_seed in any::<usize>(),
        ) {
            let mut v = filled(&values);
            let pos = pos_seed % values.len();
            let mut expected = values.clone();
            expected.remove(pos);

            let ret = v.erase(pos);
            prop_assert_eq!(v.as_slice(), expected.as_slice());
            prop_assert_eq!(ret == v.len(), pos == values.len() - 1);
        }

        #[test]
        fn erase_range_matches_reference(
            values in proptest::collection::vec(any::<i32>(), 0..32),
            a in any::<usize>(),
            b in any::<usize>(),
        ) {
            let mut v = filled(&values);
            let (mut start, mut end) = (a % (values.len() + 1), b % (values.len() + 1));
            if start > end {
                std::mem::swap(&mut start, &mut end);
            }
            let mut expected = values.clone();
            expected.drain(start..end).for_each(drop);

            prop_assert_eq!(v.erase_range(start..end), start);
            prop_assert_eq!(v.as_slice(), expected.as_slice());
        }
    }
}
