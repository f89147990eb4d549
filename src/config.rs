//! Sizing configuration for [`RingDeque`](crate::RingDeque).

/// Capacity used for the first allocation when no minimum size was configured.
pub const DEFAULT_MIN_SIZE: usize = 32;

/// When a [`RingDeque`](crate::RingDeque) gives memory back after removals.
///
/// Shrinking always reallocates down to the configured minimum size and only
/// happens when every live element fits in that minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ShrinkPolicy {
    /// Capacity never decreases.
    #[default]
    Never,
    /// Shrink once the deque becomes empty.
    IfEmpty,
    /// Shrink once occupancy drops to 20% of capacity or less.
    At20Pct,
}

/// Minimum size and shrink policy of a deque.
///
/// A `min_size` of `0` means "unset": the deque replaces it with
/// [`DEFAULT_MIN_SIZE`] the first time it has to allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DequeConfig {
    /// First allocation size and the capacity a shrink returns to.
    pub min_size: usize,
    /// When removals give memory back.
    pub shrink_policy: ShrinkPolicy,
}

impl DequeConfig {
    /// Builds a configuration; pass `0` for `min_size` to use the default.
    pub const fn new(min_size: usize, shrink_policy: ShrinkPolicy) -> Self {
        Self {
            min_size,
            shrink_policy,
        }
    }

    /// Returns the minimum size that is actually in effect.
    #[inline(always)]
    pub const fn effective_min_size(&self) -> usize {
        if self.min_size == 0 {
            DEFAULT_MIN_SIZE
        } else {
            self.min_size
        }
    }
}
