//! View and window identifiers, and the allocator for generated ones.
//!
//! Callers normally pick their own identifiers. The allocator is only used
//! for windows and views nobody named: the lazily created default window,
//! the migration target when a caller claims the default window's id, and
//! the `register_view_with_window` pairing shortcut.

use std::collections::HashSet;
use std::fmt;
use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{SwitcherError, SwitcherResult};

/// Default identifier range: 9,000,000 seven-digit values.
pub const DEFAULT_ID_RANGE: RangeInclusive<u64> = 1_000_000..=9_999_999;

/// Random draws attempted before falling back to a linear scan.
const MAX_RANDOM_ATTEMPTS: usize = 64;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw identifier.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the raw u64 value of this identifier.
            pub const fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Stable, caller-chosen identifier of a view.
    ViewId,
    "view"
);

define_id!(
    /// Identifier of a window hosting views.
    WindowId,
    "window"
);

/// Generates collision-free identifiers from a bounded range.
///
/// Values are drawn at random and retried on collision. Every value ever
/// returned is remembered, so an identifier is never handed out twice even
/// after the window that used it is gone. The caller additionally supplies a
/// predicate for identifiers that are taken without having come from this
/// allocator (caller-named windows).
#[derive(Debug)]
pub struct IdAllocator {
    low: u64,
    high: u64,
    issued: HashSet<u64>,
    rng: StdRng,
}

impl IdAllocator {
    /// Create an allocator over `range`, seeded from OS entropy.
    pub fn new(range: RangeInclusive<u64>) -> Self {
        Self::with_rng(range, StdRng::from_entropy())
    }

    /// Create an allocator with a fixed seed, for reproducible identifiers.
    pub fn with_seed(range: RangeInclusive<u64>, seed: u64) -> Self {
        Self::with_rng(range, StdRng::seed_from_u64(seed))
    }

    fn with_rng(range: RangeInclusive<u64>, rng: StdRng) -> Self {
        let (low, high) = range.into_inner();
        Self {
            low,
            high,
            issued: HashSet::new(),
            rng,
        }
    }

    /// Number of identifiers the range can hold.
    pub fn capacity(&self) -> u64 {
        if self.low > self.high {
            0
        } else {
            (self.high - self.low).saturating_add(1)
        }
    }

    /// Number of identifiers handed out so far.
    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }

    /// Check whether `raw` was handed out by this allocator.
    pub fn was_issued(&self, raw: u64) -> bool {
        self.issued.contains(&raw)
    }

    /// Allocate a fresh identifier.
    ///
    /// `is_taken` reports identifiers already in use elsewhere; they are
    /// skipped just like previously issued ones.
    ///
    /// # Errors
    ///
    /// Returns [`SwitcherError::AllocatorExhausted`] when no free value is
    /// left in the range.
    pub fn next(&mut self, is_taken: impl Fn(u64) -> bool) -> SwitcherResult<u64> {
        let capacity = self.capacity();
        if capacity == 0 || self.issued.len() as u64 >= capacity {
            return Err(self.exhausted());
        }

        for _ in 0..MAX_RANDOM_ATTEMPTS {
            let candidate = self.rng.gen_range(self.low..=self.high);
            if !self.issued.contains(&candidate) && !is_taken(candidate) {
                self.issued.insert(candidate);
                return Ok(candidate);
            }
        }

        // Nearly full: walk the range once from a random starting point.
        let start = self.rng.gen_range(0..capacity);
        for offset in 0..capacity {
            let candidate = self.low + (start + offset) % capacity;
            if !self.issued.contains(&candidate) && !is_taken(candidate) {
                self.issued.insert(candidate);
                return Ok(candidate);
            }
        }

        Err(self.exhausted())
    }

    fn exhausted(&self) -> SwitcherError {
        tracing::error!(
            target: "switcher::registry",
            low = self.low,
            high = self.high,
            "identifier range exhausted"
        );
        SwitcherError::AllocatorExhausted {
            low: self.low,
            high: self.high,
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_RANGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_stay_in_range() {
        let mut alloc = IdAllocator::with_seed(10..=20, 7);
        for _ in 0..5 {
            let id = alloc.next(|_| false).unwrap();
            assert!((10..=20).contains(&id));
        }
        assert_eq!(alloc.issued_count(), 5);
    }

    #[test]
    fn test_ids_never_repeat() {
        let mut alloc = IdAllocator::with_seed(1..=50, 42);
        let mut seen = HashSet::new();
        for _ in 0..50 {
            assert!(seen.insert(alloc.next(|_| false).unwrap()));
        }
    }

    #[test]
    fn test_taken_ids_are_skipped() {
        let mut alloc = IdAllocator::with_seed(1..=4, 3);
        let taken = [1, 2, 4];
        let id = alloc.next(|v| taken.contains(&v)).unwrap();
        assert_eq!(id, 3);
    }

    #[test]
    fn test_exhaustion() {
        let mut alloc = IdAllocator::with_seed(5..=6, 1);
        alloc.next(|_| false).unwrap();
        alloc.next(|_| false).unwrap();
        assert_eq!(
            alloc.next(|_| false),
            Err(SwitcherError::AllocatorExhausted { low: 5, high: 6 })
        );
    }

    #[test]
    fn test_exhaustion_by_external_use() {
        let mut alloc = IdAllocator::with_seed(5..=6, 1);
        assert!(matches!(
            alloc.next(|_| true),
            Err(SwitcherError::AllocatorExhausted { .. })
        ));
        assert_eq!(alloc.issued_count(), 0);
    }

    #[test]
    fn test_empty_range() {
        #[allow(clippy::reversed_empty_ranges)]
        let mut alloc = IdAllocator::with_seed(9..=1, 0);
        assert_eq!(alloc.capacity(), 0);
        assert!(alloc.next(|_| false).is_err());
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(IdAllocator::default().capacity(), 9_000_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(ViewId::new(3).to_string(), "view#3");
        assert_eq!(WindowId::from(12).to_string(), "window#12");
    }
}
