//! Owning iterator over a [`Vector`].

#![allow(unsafe_code)]

use std::fmt;
use std::iter::FusedIterator;
use std::ptr::NonNull;
use std::slice;

use fitvec_core::RawAllocator;

use crate::raw;
use crate::vector::Vector;

/// Consumes a [`Vector`] and yields its elements by value.
///
/// Elements not yielded are destroyed when the iterator is dropped, and the
/// buffer goes back to the vector's allocator.
pub struct IntoIter<T, A: RawAllocator> {
    data: Option<NonNull<T>>,
    capacity: usize,
    /// Live elements occupy `[start, end)`.
    start: usize,
    end: usize,
    alloc: A,
}

// SAFETY: same ownership story as `Vector`.
unsafe impl<T: Send, A: RawAllocator + Send> Send for IntoIter<T, A> {}
// SAFETY: shared access only exposes `&T`.
unsafe impl<T: Sync, A: RawAllocator + Sync> Sync for IntoIter<T, A> {}

impl<T, A: RawAllocator> IntoIter<T, A> {
    pub(crate) fn new(vector: Vector<T, A>) -> Self {
        let (data, capacity, len, alloc) = vector.into_raw_parts();
        Self {
            data,
            capacity,
            start: 0,
            end: len,
            alloc,
        }
    }

    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[start, end)` are live.
        unsafe { slice::from_raw_parts(self.slot(self.start), self.end - self.start) }
    }

    fn slot(&self, index: usize) -> *mut T {
        let base = self.data.unwrap_or(NonNull::dangling()).as_ptr();
        // SAFETY: `index <= end <= capacity`.
        unsafe { base.add(index) }
    }
}

impl<T, A: RawAllocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let slot = self.slot(self.start);
        self.start += 1;
        // SAFETY: the slot was live and is now outside `[start, end)`.
        unsafe {
            let value = slot.read();
            raw::forget_range(slot, 1);
            Some(value)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T, A: RawAllocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        let slot = self.slot(self.end);
        // SAFETY: the slot was live and is now outside `[start, end)`.
        unsafe {
            let value = slot.read();
            raw::forget_range(slot, 1);
            Some(value)
        }
    }
}

impl<T, A: RawAllocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: RawAllocator> FusedIterator for IntoIter<T, A> {}

impl<T: fmt::Debug, A: RawAllocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: RawAllocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        let remaining = self.end - self.start;
        let first = self.slot(self.start);
        self.end = self.start;
        let _release = self
            .data
            .take()
            .map(|data| raw::ReleaseOnDrop::new(&self.alloc, data, self.capacity));
        // SAFETY: `[start, start + remaining)` were live and are no longer
        // counted; every other slot is dead, so the guard frees the buffer
        // afterwards, or during unwinding.
        unsafe { raw::destroy_range(first, remaining) };
    }
}

#[cfg(test)]
mod tests {
    use crate::Vector;

    #[test]
    fn yields_in_order_both_ends() {
        let v: Vector<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let mut it = v.into_iter();
        assert_eq!(it.len(), 4);
        assert_eq!(it.next().as_deref(), Some("a"));
        assert_eq!(it.next_back().as_deref(), Some("d"));
        assert_eq!(it.as_slice(), ["b", "c"]);
        let rest: Vec<String> = it.collect();
        assert_eq!(rest, ["b", "c"]);
    }

    #[test]
    fn partial_iteration_drops_remainder() {
        let shared = std::rc::Rc::new(());
        let v: Vector<_> = (0..3).map(|_| shared.clone()).collect();
        assert_eq!(std::rc::Rc::strong_count(&shared), 4);
        let mut it = v.into_iter();
        let first = it.next();
        drop(it);
        assert_eq!(std::rc::Rc::strong_count(&shared), 2);
        drop(first);
        assert_eq!(std::rc::Rc::strong_count(&shared), 1);
    }

    #[test]
    fn empty_vector_iterates_nothing() {
        let v: Vector<i32> = Vector::new();
        assert_eq!(v.into_iter().next(), None);
    }
}
