//! Test utilities for fitvec development.
//!
//! - [`TrackingAllocator`]: a [`RawAllocator`](fitvec_core::RawAllocator)
//!   that records every live block in a fixed-size ledger, so tests can
//!   assert that a scope released everything it allocated.
//! - [`ScopedCheck`]: asserts a balanced ledger on entry and on drop.
//! - [`Counted`]: an element type that tallies its constructions, clones,
//!   assignments and destructions in per-thread [`Counters`].

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod config;
pub mod counted;
pub mod error;
pub mod tracking;

pub use config::TrackerConfig;
pub use counted::{Counted, Counters};
pub use error::LedgerError;
pub use tracking::{ScopedCheck, TrackingAllocator};
