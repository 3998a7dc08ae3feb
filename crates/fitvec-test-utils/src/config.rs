//! Tracking allocator configuration.

use fitvec_core::poison;

/// Configuration for a [`TrackingAllocator`](crate::TrackingAllocator).
///
/// Plain data; all values are fixed once the allocator is created.
#[derive(Clone, Debug)]
pub struct TrackerConfig {
    /// Number of ledger slots, i.e. the most blocks that may be live at
    /// once. Exceeding it is a test failure.
    ///
    /// Default: 20.
    pub max_live_allocations: usize,

    /// Byte written over every fresh block before it is handed out, or
    /// `None` to leave it untouched.
    ///
    /// Default: `Some(poison::UNINIT)`.
    pub fill_on_alloc: Option<u8>,
}

impl TrackerConfig {
    /// Default ledger size.
    pub const DEFAULT_MAX_LIVE_ALLOCATIONS: usize = 20;

    /// Default fill byte for fresh blocks.
    pub const DEFAULT_FILL_ON_ALLOC: Option<u8> = Some(poison::UNINIT);

    /// Create a config with the given ledger size and default fill.
    pub fn new(max_live_allocations: usize) -> Self {
        Self {
            max_live_allocations,
            fill_on_alloc: Self::DEFAULT_FILL_ON_ALLOC,
        }
    }

    /// Same config without the fresh-block fill.
    pub fn without_fill(mut self) -> Self {
        self.fill_on_alloc = None;
        self
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_LIVE_ALLOCATIONS)
    }
}
