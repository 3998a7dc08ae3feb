//! Instrumented element type.
//!
//! [`Counted`] wraps an `i32` and bumps a per-thread [`Counters`] record on
//! every construction, clone, clone-assignment and drop. The test harness
//! runs each test on its own thread, so tests never see each other's
//! counts.

use std::cell::Cell;
use std::fmt;

use fitvec_core::impl_cloned_element;

thread_local! {
    static COUNTERS: Cell<Counters> = const { Cell::new(Counters::ZERO) };
}

fn bump(update: impl FnOnce(&mut Counters)) {
    COUNTERS.with(|cell| {
        let mut counters = cell.get();
        update(&mut counters);
        cell.set(counters);
    });
}

/// Lifecycle event tallies for [`Counted`] on the current thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    /// `Counted::default()` calls.
    pub default_constructed: usize,
    /// `Counted::new` / `From<i32>` calls.
    pub constructed: usize,
    /// `Clone::clone` calls (copy construction).
    pub cloned: usize,
    /// `Clone::clone_from` calls (copy assignment).
    pub clone_assigned: usize,
    /// Drops.
    pub dropped: usize,
}

impl Counters {
    const ZERO: Self = Self {
        default_constructed: 0,
        constructed: 0,
        cloned: 0,
        clone_assigned: 0,
        dropped: 0,
    };

    /// Current tallies for this thread.
    pub fn snapshot() -> Self {
        COUNTERS.with(Cell::get)
    }

    /// Zero this thread's tallies.
    pub fn reset() {
        COUNTERS.with(|cell| cell.set(Self::ZERO));
    }

    /// Total values brought into existence.
    pub fn created(&self) -> usize {
        self.default_constructed + self.constructed + self.cloned
    }

    /// Values created and not yet dropped.
    pub fn alive(&self) -> usize {
        self.created().saturating_sub(self.dropped)
    }

    /// Events recorded between `earlier` and `self`.
    pub fn since(&self, earlier: &Counters) -> Counters {
        Counters {
            default_constructed: self.default_constructed - earlier.default_constructed,
            constructed: self.constructed - earlier.constructed,
            cloned: self.cloned - earlier.cloned,
            clone_assigned: self.clone_assigned - earlier.clone_assigned,
            dropped: self.dropped - earlier.dropped,
        }
    }
}

/// An `i32` that reports its lifecycle to [`Counters`].
pub struct Counted {
    value: i32,
}

impl Counted {
    pub fn new(value: i32) -> Self {
        bump(|c| c.constructed += 1);
        Self { value }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn set(&mut self, value: i32) {
        self.value = value;
    }
}

impl Default for Counted {
    fn default() -> Self {
        bump(|c| c.default_constructed += 1);
        Self { value: 0 }
    }
}

impl From<i32> for Counted {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl Clone for Counted {
    fn clone(&self) -> Self {
        bump(|c| c.cloned += 1);
        Self { value: self.value }
    }

    fn clone_from(&mut self, source: &Self) {
        bump(|c| c.clone_assigned += 1);
        self.value = source.value;
    }
}

impl Drop for Counted {
    fn drop(&mut self) {
        bump(|c| c.dropped += 1);
    }
}

impl PartialEq for Counted {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Counted {}

impl PartialEq<i32> for Counted {
    fn eq(&self, other: &i32) -> bool {
        self.value == *other
    }
}

impl fmt::Debug for Counted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Counted({})", self.value)
    }
}

impl_cloned_element!(Counted);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_is_tallied() {
        Counters::reset();
        let a = Counted::new(1);
        let mut b = Counted::default();
        let c = a.clone();
        b.clone_from(&c);
        assert_eq!(b, 1);
        drop((a, b, c));

        let counts = Counters::snapshot();
        assert_eq!(
            counts,
            Counters {
                default_constructed: 1,
                constructed: 1,
                cloned: 1,
                clone_assigned: 1,
                dropped: 3,
            }
        );
        assert_eq!(counts.alive(), 0);
    }

    #[test]
    fn since_subtracts_baseline() {
        Counters::reset();
        let _keep = Counted::new(0);
        let before = Counters::snapshot();
        drop(Counted::from(5));
        let delta = Counters::snapshot().since(&before);
        assert_eq!(delta.constructed, 1);
        assert_eq!(delta.dropped, 1);
    }
}
