//! Allocator seam and element capability traits for fitvec.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! two contracts the dynamic array is built on:
//!
//! - [`RawAllocator`]: where buffer memory comes from and goes back to.
//! - [`Element`] / [`CopyStrategy`]: how an element type is duplicated,
//!   resolved per type at compile time.
//!
//! Debug poison patterns live in [`poison`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod alloc;
pub mod element;
pub mod poison;

pub use alloc::{array_layout, capacity_overflow, RawAllocator, SystemAllocator};
pub use element::{trivially_destructible, Bitwise, CopyStrategy, Element, ElementWise};
