//! Ledger-backed allocator for leak and balance checks.
//!
//! [`TrackingAllocator`] is a cheap-to-clone handle: every clone records
//! into the same ledger, so a test can hand one to several vectors and
//! inspect the totals afterwards.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::cell::RefCell;
use std::ptr::NonNull;
use std::rc::Rc;

use fitvec_core::{RawAllocator, SystemAllocator};
use tracing::{trace, warn};

use crate::config::TrackerConfig;
use crate::error::LedgerError;

#[derive(Clone, Copy, Debug)]
struct Block {
    addr: usize,
    bytes: usize,
}

#[derive(Debug)]
struct Ledger {
    config: TrackerConfig,
    /// Fixed-size slot table; `None` marks a free slot.
    slots: Vec<Option<Block>>,
    total_allocations: usize,
    total_frees: usize,
}

impl Ledger {
    fn record(&mut self, block: Block) -> Result<(), LedgerError> {
        let limit = self.config.max_live_allocations;
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.is_none())
            .ok_or(LedgerError::SlotsExhausted { limit })?;
        *slot = Some(block);
        self.total_allocations += 1;
        Ok(())
    }

    fn forget(&mut self, addr: usize, bytes: usize) -> Result<(), LedgerError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| matches!(s, Some(b) if b.addr == addr))
            .ok_or(LedgerError::UnknownPointer { addr })?;
        if let Some(block) = slot {
            if block.bytes != bytes {
                return Err(LedgerError::LayoutMismatch {
                    addr,
                    expected: block.bytes,
                    actual: bytes,
                });
            }
        }
        *slot = None;
        self.total_frees += 1;
        Ok(())
    }

    fn live(&self) -> impl Iterator<Item = &Block> {
        self.slots.iter().flatten()
    }
}

/// A [`RawAllocator`] that records every live block.
///
/// Misuse (freeing an unknown pointer, a size mismatch, or running out of
/// ledger slots) panics with the corresponding [`LedgerError`], failing the
/// test at the offending call.
#[derive(Clone, Debug)]
pub struct TrackingAllocator {
    ledger: Rc<RefCell<Ledger>>,
}

impl TrackingAllocator {
    /// Create an allocator with an empty ledger.
    pub fn new(config: TrackerConfig) -> Self {
        let slots = vec![None; config.max_live_allocations];
        Self {
            ledger: Rc::new(RefCell::new(Ledger {
                config,
                slots,
                total_allocations: 0,
                total_frees: 0,
            })),
        }
    }

    /// Number of blocks currently live.
    pub fn live_allocations(&self) -> usize {
        self.ledger.borrow().live().count()
    }

    /// Total bytes in live blocks.
    pub fn live_bytes(&self) -> usize {
        self.ledger.borrow().live().map(|b| b.bytes).sum()
    }

    /// Number of `alloc` calls so far.
    pub fn total_allocations(&self) -> usize {
        self.ledger.borrow().total_allocations
    }

    /// Number of `free` calls so far.
    pub fn total_frees(&self) -> usize {
        self.ledger.borrow().total_frees
    }

    /// Whether `ptr` is the start of a live block.
    pub fn is_live<T>(&self, ptr: *const T) -> bool {
        let addr = ptr as usize;
        self.ledger.borrow().live().any(|b| b.addr == addr)
    }

    /// `Ok` iff no block is live.
    pub fn check_balanced(&self) -> Result<(), LedgerError> {
        let allocations = self.live_allocations();
        if allocations == 0 {
            return Ok(());
        }
        let bytes = self.live_bytes();
        warn!(allocations, bytes, "allocator ledger has outstanding blocks");
        Err(LedgerError::Unbalanced { allocations, bytes })
    }
}

impl Default for TrackingAllocator {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

// SAFETY: blocks come from `SystemAllocator`; the ledger only observes them.
unsafe impl RawAllocator for TrackingAllocator {
    fn alloc(&self, layout: Layout) -> NonNull<u8> {
        let ptr = SystemAllocator.alloc(layout);
        let block = Block {
            addr: ptr.as_ptr() as usize,
            bytes: layout.size(),
        };
        let recorded = self.ledger.borrow_mut().record(block);
        if let Err(err) = recorded {
            // SAFETY: just allocated with `layout`, never handed out.
            unsafe { SystemAllocator.free(ptr, layout) };
            panic!("{err}");
        }
        if let Some(byte) = self.ledger.borrow().config.fill_on_alloc {
            // SAFETY: the block is `layout.size()` writable bytes.
            unsafe { ptr.as_ptr().write_bytes(byte, layout.size()) };
        }
        trace!(addr = block.addr, bytes = block.bytes, "tracked alloc");
        ptr
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        let addr = ptr.as_ptr() as usize;
        let forgotten = self.ledger.borrow_mut().forget(addr, layout.size());
        if let Err(err) = forgotten {
            panic!("{err}");
        }
        trace!(addr, bytes = layout.size(), "tracked free");
        // SAFETY: the ledger confirmed a live block of this size.
        unsafe { SystemAllocator.free(ptr, layout) }
    }
}

/// Asserts a balanced ledger when created and again when dropped.
///
/// The drop-time check is skipped while unwinding so the original panic is
/// reported.
#[must_use = "the check runs when the guard is dropped"]
pub struct ScopedCheck<'a> {
    alloc: &'a TrackingAllocator,
}

impl<'a> ScopedCheck<'a> {
    /// Begin a checked scope.
    ///
    /// # Panics
    ///
    /// Panics if blocks are already live.
    pub fn new(alloc: &'a TrackingAllocator) -> Self {
        if let Err(err) = alloc.check_balanced() {
            panic!("{err}");
        }
        Self { alloc }
    }
}

impl Drop for ScopedCheck<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        if let Err(err) = self.alloc.check_balanced() {
            panic!("{err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitvec::Vector;
    use fitvec_core::array_layout;

    #[test]
    fn ledger_tracks_alloc_and_free() {
        let alloc = TrackingAllocator::default();
        let layout = array_layout::<u32>(4);
        let ptr = alloc.alloc(layout);
        assert_eq!(alloc.live_allocations(), 1);
        assert_eq!(alloc.live_bytes(), 16);
        assert!(alloc.is_live(ptr.as_ptr()));
        assert_eq!(
            alloc.check_balanced(),
            Err(LedgerError::Unbalanced {
                allocations: 1,
                bytes: 16
            })
        );
        unsafe { alloc.free(ptr, layout) };
        assert_eq!(alloc.check_balanced(), Ok(()));
        assert_eq!(alloc.total_allocations(), 1);
        assert_eq!(alloc.total_frees(), 1);
    }

    #[test]
    fn fresh_blocks_are_filled() {
        let alloc = TrackingAllocator::default();
        let layout = array_layout::<u8>(8);
        let ptr = alloc.alloc(layout);
        let bytes = unsafe { std::slice::from_raw_parts(ptr.as_ptr(), 8) };
        assert!(bytes.iter().all(|&b| b == 0xCD));
        unsafe { alloc.free(ptr, layout) };
    }

    #[test]
    #[should_panic(expected = "allocation ledger full")]
    fn exhausting_slots_panics() {
        let alloc = TrackingAllocator::new(TrackerConfig::new(1));
        let layout = array_layout::<u8>(1);
        let _first = alloc.alloc(layout);
        let _second = alloc.alloc(layout);
    }

    #[test]
    #[should_panic(expected = "free of unknown pointer")]
    fn unknown_free_panics() {
        let alloc = TrackingAllocator::default();
        let other = TrackingAllocator::default();
        let layout = array_layout::<u8>(1);
        let ptr = other.alloc(layout);
        unsafe { alloc.free(ptr, layout) };
    }

    #[test]
    fn clones_share_one_ledger() {
        let alloc = TrackingAllocator::default();
        let _check = ScopedCheck::new(&alloc);
        let mut v: Vector<i32, TrackingAllocator> = Vector::new_in(alloc.clone());
        v.push_back(1);
        assert_eq!(alloc.live_allocations(), 1);
        drop(v);
        assert_eq!(alloc.live_allocations(), 0);
    }

    #[test]
    #[should_panic(expected = "unbalanced allocator")]
    fn scoped_check_catches_leak() {
        let alloc = TrackingAllocator::default();
        let _check = ScopedCheck::new(&alloc);
        let v: Vector<i32, TrackingAllocator> = Vector::with_len_in(2, alloc.clone());
        std::mem::forget(v);
    }
}
