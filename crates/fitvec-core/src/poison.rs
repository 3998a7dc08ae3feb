//! Debug poison patterns for dead buffer slots.
//!
//! Debug builds overwrite memory that holds no live element, so a
//! use-after-destroy reads an obvious byte pattern instead of a plausible
//! stale value. Release builds compile the fills away.

/// Written into freshly allocated, never-constructed slots.
pub const UNINIT: u8 = 0xCD;

/// Written into slots whose element was destroyed or moved out.
pub const DESTROYED: u8 = 0xDD;

/// Whether this build poisons dead slots.
pub const ENABLED: bool = cfg!(debug_assertions);

/// Fill `count` slots of `T` starting at `ptr` with `pattern`.
///
/// No-op unless [`ENABLED`].
///
/// # Safety
///
/// `ptr` must be valid for writes of `count * size_of::<T>()` bytes and the
/// slots must hold no live value.
#[inline]
pub unsafe fn fill<T>(ptr: *mut T, count: usize, pattern: u8) {
    if ENABLED {
        // SAFETY: caller guarantees the byte range is writable and dead.
        unsafe { ptr.cast::<u8>().write_bytes(pattern, count * std::mem::size_of::<T>()) }
    }
}
