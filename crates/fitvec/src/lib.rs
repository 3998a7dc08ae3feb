//! Exact-fit dynamic array with explicit allocation and lifetime control.
//!
//! [`Vector`] is a contiguous growable array that reallocates to exactly the
//! size it needs, draws memory from a pluggable [`RawAllocator`], and never
//! reports failure through `Result`: allocation failure is fatal and
//! precondition violations are assertions.
//!
//! # Architecture
//!
//! ```text
//! Vector<T, A> (capacity / len bookkeeping, insert / erase / assign)
//! ├── raw (construct / destroy / copy / move over raw slots)
//! │   └── Element::Copier + needs_drop (compile-time strategy choice)
//! └── A: RawAllocator (buffer acquisition and release only)
//! ```
//!
//! The allocator is touched only when the capacity changes; every element
//! state change goes through [`raw`].
//!
//! # Quick start
//!
//! ```
//! use fitvec::{fitvec, Vector};
//!
//! let mut v = fitvec![1, 2, 3];
//! v.insert(1, 99);
//! assert_eq!(v, [1, 99, 2, 3]);
//! assert_eq!(v.capacity(), 4);
//!
//! let copy = v.clone();
//! v.erase_range(0..2);
//! assert_eq!(v, [2, 3]);
//! assert_eq!(copy.len(), 4);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod into_iter;
pub mod raw;
pub mod vector;

pub use fitvec_core::{
    impl_bitwise_element, impl_cloned_element, poison, Bitwise, CopyStrategy, Element,
    ElementWise, RawAllocator, SystemAllocator,
};
pub use into_iter::IntoIter;
pub use vector::Vector;

/// Common imports for working with fitvec.
pub mod prelude {
    pub use crate::fitvec;
    pub use crate::{Element, RawAllocator, SystemAllocator, Vector};
}

/// Build a [`Vector`] from a list of elements or a repeated element.
///
/// `fitvec![a, b, c]` moves the elements in; `fitvec![value; n]` copies
/// `value` into `n` slots. Either form allocates exactly once.
///
/// ```
/// use fitvec::fitvec;
///
/// let zeros = fitvec![0u8; 4];
/// assert_eq!(zeros, [0, 0, 0, 0]);
/// assert_eq!(zeros.capacity(), 4);
/// ```
#[macro_export]
macro_rules! fitvec {
    () => {
        $crate::Vector::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::Vector::from_elem($n, &$elem)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::Vector::from([$($x),+])
    };
}
