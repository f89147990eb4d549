//! # Ring Deque
//!
//! A growable double-ended queue stored in one contiguous, circularly indexed
//! buffer.  Pushing and popping at either end is amortized O(1), and the caller
//! decides when (if ever) the buffer is given back.
//!
//! ## Key Features
//!
//! * **Lazy allocation:** `RingDeque::new()` allocates nothing until the first push.
//! * **Doubling growth:** capacity doubles from the configured minimum size, and a
//!   batch push (`push_back_all` / `push_front_all`) grows at most once.
//! * **Shrink policies:** [`ShrinkPolicy::Never`] (default), [`ShrinkPolicy::IfEmpty`]
//!   or [`ShrinkPolicy::At20Pct`] decide when capacity falls back to the minimum size.
//! * **Buffer adoption:** an existing `Vec<T>` can become the backing store without
//!   copying, and `into_vec` hands the buffer back.
//! * **Prompt release:** popped values are moved out of their slot, so the deque never
//!   keeps a removed element alive.
//!
//! ## Configuration
//!
//! | Setting | Default | Effect |
//! |---------|---------|--------|
//! | `min_size` | `0` (→ [`DEFAULT_MIN_SIZE`]) | First allocation size and shrink target |
//! | `shrink_policy` | `Never` | When capacity returns to `min_size` |
//!
//! With the `serde` feature, [`DequeConfig`] can be loaded from a host application's
//! configuration.  With the `heapless` feature, a `heapless::Deque` can be moved into
//! a `RingDeque` once it outgrows its fixed capacity.
//!
//! ## Examples
//!
//! ```rust
//! use ring_deque::{RingDeque, ShrinkPolicy};
//!
//! let mut d = RingDeque::new()
//!     .with_min_size(2)
//!     .with_shrink_policy(ShrinkPolicy::At20Pct);
//!
//! for i in 1..=5 {
//!     d.push_back(i);
//! }
//! assert_eq!(d.capacity(), 8);
//!
//! // Occupancy falls to 1/8 <= 20%: capacity drops back to 2.
//! for i in 1..=4 {
//!     assert_eq!(d.pop_front(), Some(i));
//! }
//! assert_eq!(d.capacity(), 2);
//! assert_eq!(d.linearize(), &[5]);
//! ```
//!
//! ## Logging
//!
//! Reallocations are reported at `TRACE` and shrink decisions at `DEBUG` through
//! [`tracing`].  The crate never installs a subscriber.

// --- Module Declarations ---

pub mod config;
pub mod deque;
pub mod error;
pub mod iter;

// --- Re-exports ---

pub use config::{DEFAULT_MIN_SIZE, DequeConfig, ShrinkPolicy};
pub use deque::{AnyDeque, RingDeque};
pub use error::TryReserveError;
pub use iter::{IntoIter, Iter};
