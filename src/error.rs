use thiserror::Error;

/// Returned by [`RingDeque::try_reserve`](crate::RingDeque::try_reserve) when the
/// buffer cannot be grown. The deque is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TryReserveError {
    /// The doubled capacity does not fit in `usize` or exceeds `isize::MAX` bytes.
    #[error("capacity overflow")]
    CapacityOverflow,
    /// The allocator refused a buffer of `capacity` slots.
    #[error("memory allocation failed for a capacity of {capacity} elements")]
    AllocError { capacity: usize },
}
