//! Compile-time element capabilities.
//!
//! The dynamic array needs three facts about an element type to pick
//! between a bulk-memory and an element-wise code path:
//!
//! | Capability | How it is known |
//! |------------|-----------------|
//! | trivial move | always: a Rust move is a bitwise copy |
//! | trivial destroy | [`trivially_destructible`] (`!mem::needs_drop::<T>()`) |
//! | trivial copy | [`Element::Copier`] is [`Bitwise`] |
//!
//! All three are constants of the monomorphized type, so the unused path
//! is removed at compile time.
//!
//! ```
//! use fitvec_core::{impl_bitwise_element, impl_cloned_element, CopyStrategy, Element};
//!
//! #[derive(Clone, Copy)]
//! struct Rgb(u8, u8, u8);
//! impl_bitwise_element!(Rgb);
//!
//! #[derive(Clone)]
//! struct Label(String);
//! impl_cloned_element!(Label);
//!
//! assert!(<<Rgb as Element>::Copier as CopyStrategy<Rgb>>::BITWISE);
//! assert!(!<<Label as Element>::Copier as CopyStrategy<Label>>::BITWISE);
//! ```

use std::mem;
use std::ptr;
use std::rc::Rc;
use std::sync::Arc;

/// How values of `T` are duplicated into fresh or live slots.
pub trait CopyStrategy<T> {
    /// `true` when duplication is a plain byte copy.
    const BITWISE: bool;

    /// Copy-construct every element of `src` into uninitialized memory.
    ///
    /// # Safety
    ///
    /// `dest` must be valid for `src.len()` writes, properly aligned, and
    /// must not overlap `src`. The destination slots are treated as
    /// uninitialized: nothing is dropped.
    unsafe fn copy_construct(src: &[T], dest: *mut T);

    /// Copy-assign `src` over the live slots of `dest`, front to back.
    ///
    /// `src` and `dest` have the same length.
    fn copy_assign(src: &[T], dest: &mut [T]);
}

/// Byte-copy strategy for `Copy` types.
#[derive(Debug)]
pub enum Bitwise {}

impl<T: Copy> CopyStrategy<T> for Bitwise {
    const BITWISE: bool = true;

    #[inline]
    unsafe fn copy_construct(src: &[T], dest: *mut T) {
        // SAFETY: caller guarantees `dest` is writable for `src.len()`
        // elements and disjoint from `src`.
        unsafe { ptr::copy_nonoverlapping(src.as_ptr(), dest, src.len()) }
    }

    #[inline]
    fn copy_assign(src: &[T], dest: &mut [T]) {
        dest.copy_from_slice(src);
    }
}

/// Element-wise strategy: `Clone::clone` into fresh slots,
/// `Clone::clone_from` over live ones.
#[derive(Debug)]
pub enum ElementWise {}

impl<T: Clone> CopyStrategy<T> for ElementWise {
    const BITWISE: bool = false;

    unsafe fn copy_construct(src: &[T], dest: *mut T) {
        for (i, item) in src.iter().enumerate() {
            // SAFETY: `i < src.len()`, and the caller guarantees that many
            // writable slots at `dest`.
            unsafe { dest.add(i).write(item.clone()) };
        }
    }

    fn copy_assign(src: &[T], dest: &mut [T]) {
        dest.clone_from_slice(src);
    }
}

/// An element type whose copy strategy is known at compile time.
///
/// Only the duplication capability needs declaring; moves and destruction
/// are derived from the language itself. `Bitwise` can only be named for
/// `Copy` types, so a wrong choice fails to compile rather than
/// misbehaving.
pub trait Element: Clone {
    /// Strategy used by copy construction and copy assignment.
    type Copier: CopyStrategy<Self>;
}

/// Whether destroying a `T` is a no-op.
#[inline]
pub const fn trivially_destructible<T>() -> bool {
    !mem::needs_drop::<T>()
}

/// Declare one or more `Copy` types as [`Element`]s with the [`Bitwise`]
/// strategy.
#[macro_export]
macro_rules! impl_bitwise_element {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Element for $ty {
                type Copier = $crate::Bitwise;
            }
        )+
    };
}

/// Declare one or more `Clone` types as [`Element`]s with the
/// [`ElementWise`] strategy.
#[macro_export]
macro_rules! impl_cloned_element {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Element for $ty {
                type Copier = $crate::ElementWise;
            }
        )+
    };
}

impl_bitwise_element!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char, ()
);
impl_cloned_element!(String);

impl<T: ?Sized> Element for &T {
    type Copier = Bitwise;
}

impl<T: ?Sized> Element for *const T {
    type Copier = Bitwise;
}

impl<T: ?Sized> Element for *mut T {
    type Copier = Bitwise;
}

impl<T: Copy, const N: usize> Element for [T; N] {
    type Copier = Bitwise;
}

impl<T: Clone> Element for Option<T> {
    type Copier = ElementWise;
}

impl<T: Clone> Element for Vec<T> {
    type Copier = ElementWise;
}

impl<T: Clone> Element for Box<T> {
    type Copier = ElementWise;
}

impl<T: ?Sized> Element for Rc<T> {
    type Copier = ElementWise;
}

impl<T: ?Sized> Element for Arc<T> {
    type Copier = ElementWise;
}
