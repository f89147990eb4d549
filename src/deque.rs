//! Growable double-ended queue stored in one circular buffer.
//!
//! # Layout
//! Elements live in a single `Box<[MaybeUninit<T>]>`.  `head` and `tail` are the
//! physical slots of the first and last element; walking forward from `head` for
//! `len` slots (wrapping at the end of the buffer) visits exactly the live
//! elements and ends on `tail`.  Every other slot is uninitialized.
//!
//! Cursors move with an explicit compare-and-reset instead of a modulo, so the
//! capacity does not have to be a power of two (adopted buffers keep whatever
//! capacity the caller's `Vec` had).
//!
//! # Growth and shrinking
//! The buffer is only ever replaced by `resize`, which moves the live run to the
//! start of a fresh allocation.  Growth doubles from the current capacity (or from
//! the configured minimum size on first allocation).  Shrinking is controlled by
//! [`ShrinkPolicy`] and runs after removals only; the gap between the 20% shrink
//! trigger and the 100% grow trigger keeps alternating push/pop from thrashing.

use core::fmt;
use core::mem::{self, ManuallyDrop, MaybeUninit};
use core::ptr;
use core::slice;
use std::alloc::Layout;
use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::config::{DequeConfig, ShrinkPolicy};
use crate::error::TryReserveError;
use crate::iter::{IntoIter, Iter};

// ─── AnyDeque ─────────────────────────────────────────────────────────────────

/// Object-safe view of a growable deque, for code that takes either a
/// [`RingDeque`] or a std `VecDeque` behind `&mut dyn AnyDeque<T>`.
///
/// Peeks follow this crate's naming; on `VecDeque` they map to `front`/`back`.
pub trait AnyDeque<T> {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Slots currently allocated; never less than `len`.
    fn capacity(&self) -> usize;
    fn push_back(&mut self, item: T);
    fn push_front(&mut self, item: T);
    /// Removes the back element. `None` means the deque was empty.
    fn pop_back(&mut self) -> Option<T>;
    /// Removes the front element. `None` means the deque was empty.
    fn pop_front(&mut self) -> Option<T>;
    fn peek_back(&self) -> Option<&T>;
    fn peek_front(&self) -> Option<&T>;
    fn peek_back_mut(&mut self) -> Option<&mut T>;
    fn peek_front_mut(&mut self) -> Option<&mut T>;
    /// Drops every element. Whether memory is returned depends on the deque.
    fn clear(&mut self);
}

impl<T> AnyDeque<T> for VecDeque<T> {
    fn len(&self) -> usize {
        self.len()
    }
    fn capacity(&self) -> usize {
        self.capacity()
    }
    fn push_back(&mut self, item: T) {
        self.push_back(item);
    }
    fn push_front(&mut self, item: T) {
        self.push_front(item);
    }
    fn pop_back(&mut self) -> Option<T> {
        self.pop_back()
    }
    fn pop_front(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn peek_back(&self) -> Option<&T> {
        self.back()
    }
    fn peek_front(&self) -> Option<&T> {
        self.front()
    }
    fn peek_back_mut(&mut self) -> Option<&mut T> {
        self.back_mut()
    }
    fn peek_front_mut(&mut self) -> Option<&mut T> {
        self.front_mut()
    }
    fn clear(&mut self) {
        self.clear();
    }
}

// ─── RingDeque ────────────────────────────────────────────────────────────────

/// A double-ended queue backed by a single contiguous ring buffer.
///
/// A new deque allocates nothing; the first push allocates
/// [`DequeConfig::effective_min_size`] slots (or more, doubling, for large
/// batches).  Removed elements are moved out of their slot immediately, so the
/// deque never keeps a popped value alive.
///
/// # Example
/// ```rust
/// use ring_deque::{RingDeque, ShrinkPolicy};
///
/// let mut d = RingDeque::new()
///     .with_min_size(2)
///     .with_shrink_policy(ShrinkPolicy::IfEmpty);
///
/// d.push_back_all([1, 2, 3]);
/// assert_eq!(d.capacity(), 4);
/// assert_eq!(d.pop_front(), Some(1));
/// assert_eq!(d.peek_back(), Some(&3));
///
/// d.pop_back();
/// d.pop_back();
/// assert_eq!(d.capacity(), 2);
/// ```
pub struct RingDeque<T> {
    buf: Box<[MaybeUninit<T>]>,
    head: usize,
    tail: usize,
    len: usize,
    config: DequeConfig,
}

impl<T> RingDeque<T> {
    /// Creates an empty deque with the default configuration. Does not allocate.
    pub fn new() -> Self {
        Self::with_config(DequeConfig::default())
    }

    /// Creates an empty deque with `config`. Does not allocate.
    pub fn with_config(config: DequeConfig) -> Self {
        Self {
            buf: Box::default(),
            head: 0,
            tail: 0,
            len: 0,
            config,
        }
    }

    /// Creates a deque that uses `buffer` as its initial storage.
    ///
    /// See [`adopt`](RingDeque::adopt).
    pub fn with_buffer(buffer: Vec<T>, config: DequeConfig) -> Self {
        let mut deque = Self::with_config(config);
        deque.adopt(buffer);
        deque
    }

    /// Sets the minimum size and returns the deque, for chaining after `new`.
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.config.min_size = min_size;
        self
    }

    /// Sets the shrink policy and returns the deque, for chaining after `new`.
    pub fn with_shrink_policy(mut self, policy: ShrinkPolicy) -> Self {
        self.config.shrink_policy = policy;
        self
    }

    /// Returns the current configuration. An unset `min_size` reads `0` until the
    /// deque first allocates or shrinks.
    pub fn config(&self) -> DequeConfig {
        self.config
    }

    /// Changes the floor used for the first allocation and for shrinking.
    /// `0` restores the default.
    pub fn set_min_size(&mut self, min_size: usize) {
        self.config.min_size = min_size;
    }

    /// Changes the shrink policy. Takes effect on the next removal.
    pub fn set_shrink_policy(&mut self, policy: ShrinkPolicy) {
        self.config.shrink_policy = policy;
    }

    /// Returns the number of elements currently in the deque.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the deque contains no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in the backing buffer.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    // --- Growth ---

    /// Ensures room for `additional` more elements, doubling the capacity as
    /// many times as needed.
    ///
    /// # Panics
    /// Panics if the new capacity overflows. Aborts through the global allocator
    /// if memory is exhausted.
    pub fn reserve(&mut self, additional: usize) {
        match self.grow_target(additional) {
            Ok(None) => {}
            Ok(Some(capacity)) => {
                self.resolve_min_size();
                self.resize(capacity);
            }
            Err(_) => capacity_overflow(),
        }
    }

    /// Fallible counterpart of [`reserve`](RingDeque::reserve).
    ///
    /// On error the deque is unchanged.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        if let Some(capacity) = self.grow_target(additional)? {
            let buf = Self::try_allocate(capacity)?;
            self.resolve_min_size();
            self.relocate(buf);
        }
        Ok(())
    }

    /// Computes the capacity needed to hold `additional` more elements, or `None`
    /// if the current buffer already fits them.
    fn grow_target(&self, additional: usize) -> Result<Option<usize>, TryReserveError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(TryReserveError::CapacityOverflow)?;
        let capacity = self.capacity();
        if required <= capacity {
            return Ok(None);
        }
        let mut size = if capacity == 0 {
            self.config.effective_min_size()
        } else {
            capacity
        };
        while size < required {
            size = size
                .checked_mul(2)
                .ok_or(TryReserveError::CapacityOverflow)?;
        }
        Ok(Some(size))
    }

    /// Pins an unset minimum size to the default once the deque allocates.
    #[inline]
    fn resolve_min_size(&mut self) {
        if self.config.min_size == 0 {
            self.config.min_size = self.config.effective_min_size();
        }
    }

    /// Gives memory back according to the shrink policy. Runs after removals.
    fn shrink(&mut self) {
        let policy = self.config.shrink_policy;
        if policy == ShrinkPolicy::Never {
            return;
        }
        let min_size = self.config.effective_min_size();
        let capacity = self.capacity();
        if self.len > min_size || capacity <= min_size {
            return;
        }
        match policy {
            ShrinkPolicy::At20Pct if self.len.saturating_mul(5) > capacity => return,
            ShrinkPolicy::IfEmpty if self.len > 0 => return,
            _ => {}
        }
        debug!(?policy, from = capacity, to = min_size, len = self.len, "shrinking ring deque");
        self.resolve_min_size();
        self.resize(min_size);
    }

    // --- Reallocation ---

    #[inline(never)]
    fn resize(&mut self, capacity: usize) {
        let buf = Box::new_uninit_slice(capacity);
        self.relocate(buf);
    }

    fn try_allocate(capacity: usize) -> Result<Box<[MaybeUninit<T>]>, TryReserveError> {
        Layout::array::<T>(capacity).map_err(|_| TryReserveError::CapacityOverflow)?;
        let mut slots: Vec<MaybeUninit<T>> = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| TryReserveError::AllocError { capacity })?;
        slots.resize_with(capacity, MaybeUninit::uninit);
        Ok(slots.into_boxed_slice())
    }

    /// Moves the live run into `buf` starting at slot 0 and makes `buf` the
    /// backing store.  The old allocation is released; its slots are not dropped
    /// because every live value has been moved out.
    fn relocate(&mut self, mut buf: Box<[MaybeUninit<T>]>) {
        assert!(buf.len() >= self.len);
        let from = self.capacity();
        if self.len > 0 {
            let (front_len, back_len) = self.segment_lens();
            unsafe {
                let src = self.buf.as_ptr();
                let dst = buf.as_mut_ptr();
                ptr::copy_nonoverlapping(src.add(self.head), dst, front_len);
                ptr::copy_nonoverlapping(src, dst.add(front_len), back_len);
            }
        }
        self.buf = buf;
        self.reset_cursors();
        trace!(from, to = self.capacity(), len = self.len, "ring deque reallocated");
    }

    /// Puts `head` at slot 0 and `tail` just behind `head + len`.
    #[inline]
    fn reset_cursors(&mut self) {
        self.head = 0;
        self.tail = if self.len == 0 {
            self.capacity().saturating_sub(1)
        } else {
            self.len - 1
        };
    }

    /// Lengths of the `[head, end)` run and of the wrapped remainder at `[0, ..)`.
    #[inline(always)]
    fn segment_lens(&self) -> (usize, usize) {
        let front_len = (self.capacity() - self.head).min(self.len);
        (front_len, self.len - front_len)
    }

    // --- Adoption ---

    /// Replaces the backing store with `buffer` without copying.
    ///
    /// The vector's allocated capacity becomes the deque's capacity and its
    /// elements become the deque's content, front to back.  Any elements already
    /// in the deque are dropped.  The allocation is used until the next resize.
    pub fn adopt(&mut self, buffer: Vec<T>) {
        self.drop_elements();

        let mut buffer = ManuallyDrop::new(buffer);
        let (ptr, len, capacity) = (buffer.as_mut_ptr(), buffer.len(), buffer.capacity());
        // SAFETY: `MaybeUninit<T>` has the layout of `T`, the allocation came from a
        // `Vec<T>` of exactly `capacity` slots, and uninitialized tails are valid
        // `MaybeUninit` values.
        let slots = unsafe { Vec::from_raw_parts(ptr.cast::<MaybeUninit<T>>(), capacity, capacity) };

        self.buf = slots.into_boxed_slice();
        self.len = len;
        self.reset_cursors();
        trace!(capacity, len, "ring deque adopted buffer");
    }

    // --- Push ---

    /// Appends `item` to the back, growing the buffer if it is full.
    #[inline(always)]
    pub fn push_back(&mut self, item: T) {
        if self.len == self.capacity() {
            self.reserve(1);
        }
        self.push_back_unchecked(item);
    }

    /// Prepends `item` to the front, growing the buffer if it is full.
    #[inline(always)]
    pub fn push_front(&mut self, item: T) {
        if self.len == self.capacity() {
            self.reserve(1);
        }
        self.push_front_unchecked(item);
    }

    /// Appends every item in order, growing at most once for the whole batch.
    pub fn push_back_all<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let items = items.into_iter();
        self.reserve(items.len());
        for item in items {
            self.push_back(item);
        }
    }

    /// Prepends every item in turn, growing at most once for the whole batch.
    ///
    /// Each item goes in front of the previous one, so `[1, 2, 3]` ends up as
    /// `3, 2, 1` at the front of the deque.
    pub fn push_front_all<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let items = items.into_iter();
        self.reserve(items.len());
        for item in items {
            self.push_front(item);
        }
    }

    /// Caller guarantees `len < capacity`.
    #[inline(always)]
    fn push_back_unchecked(&mut self, item: T) {
        self.len += 1;
        self.tail += 1;
        if self.tail == self.capacity() {
            self.tail = 0;
        }
        self.buf[self.tail].write(item);
    }

    /// Caller guarantees `len < capacity`.
    #[inline(always)]
    fn push_front_unchecked(&mut self, item: T) {
        self.len += 1;
        if self.head == 0 {
            self.head = self.capacity();
        }
        self.head -= 1;
        self.buf[self.head].write(item);
    }

    // --- Pop ---

    /// Removes and returns the last element, or `None` if empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: `tail` is a live slot; it is treated as uninitialized from now on.
        let item = unsafe { self.buf[self.tail].assume_init_read() };
        if self.tail == 0 {
            self.tail = self.capacity();
        }
        self.tail -= 1;
        self.shrink();
        Some(item)
    }

    /// Removes and returns the first element, or `None` if empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: `head` is a live slot; it is treated as uninitialized from now on.
        let item = unsafe { self.buf[self.head].assume_init_read() };
        self.head += 1;
        if self.head == self.capacity() {
            self.head = 0;
        }
        self.shrink();
        Some(item)
    }

    // --- Peek ---

    /// Returns the last element without removing it.
    #[inline]
    pub fn peek_back(&self) -> Option<&T> {
        if self.len == 0 {
            None
        } else {
            // SAFETY: `tail` is a live slot while `len > 0`.
            Some(unsafe { self.buf[self.tail].assume_init_ref() })
        }
    }

    /// Returns the first element without removing it.
    #[inline]
    pub fn peek_front(&self) -> Option<&T> {
        if self.len == 0 {
            None
        } else {
            // SAFETY: `head` is a live slot while `len > 0`.
            Some(unsafe { self.buf[self.head].assume_init_ref() })
        }
    }

    /// Mutable counterpart of [`peek_back`](RingDeque::peek_back).
    #[inline]
    pub fn peek_back_mut(&mut self) -> Option<&mut T> {
        if self.len == 0 {
            None
        } else {
            // SAFETY: `tail` is a live slot while `len > 0`.
            Some(unsafe { self.buf[self.tail].assume_init_mut() })
        }
    }

    /// Mutable counterpart of [`peek_front`](RingDeque::peek_front).
    #[inline]
    pub fn peek_front_mut(&mut self) -> Option<&mut T> {
        if self.len == 0 {
            None
        } else {
            // SAFETY: `head` is a live slot while `len > 0`.
            Some(unsafe { self.buf[self.head].assume_init_mut() })
        }
    }

    /// Returns the element at logical `index` (0 is the front), or `None`.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        // Compared against the room left before the end so that `head + index`
        // is never formed past `usize::MAX` (zero-sized `T` adopts `usize::MAX` slots).
        let room = self.capacity() - self.head;
        let slot = if index < room { self.head + index } else { index - room };
        // SAFETY: `index < len`, so `slot` lies inside the live run.
        Some(unsafe { self.buf[slot].assume_init_ref() })
    }

    // --- Views ---

    /// Returns the content as up to two slices, front part first.
    ///
    /// The second slice is empty unless the live run wraps past the end of the
    /// buffer.  Never relocates anything.
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let (front_len, back_len) = self.live_parts();
        let ptr = self.buf.as_ptr().cast::<T>();
        unsafe {
            (
                slice::from_raw_parts(ptr.add(self.head_or_zero()), front_len),
                slice::from_raw_parts(ptr, back_len),
            )
        }
    }

    /// Mutable counterpart of [`as_slices`](RingDeque::as_slices).
    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let (front_len, back_len) = self.live_parts();
        let head = self.head_or_zero();
        let ptr = self.buf.as_mut_ptr().cast::<T>();
        // SAFETY: the two ranges are disjoint because `front_len + back_len <= capacity`.
        unsafe {
            (
                slice::from_raw_parts_mut(ptr.add(head), front_len),
                slice::from_raw_parts_mut(ptr, back_len),
            )
        }
    }

    #[inline(always)]
    fn live_parts(&self) -> (usize, usize) {
        if self.len == 0 { (0, 0) } else { self.segment_lens() }
    }

    #[inline(always)]
    fn head_or_zero(&self) -> usize {
        if self.len == 0 { 0 } else { self.head }
    }

    /// Returns the content as one contiguous slice in front-to-back order.
    ///
    /// If the live run wraps, the buffer is first reallocated at the same
    /// capacity so that the run starts at slot 0.  Length, capacity and values
    /// are unchanged either way.
    pub fn linearize(&mut self) -> &mut [T] {
        if self.len == 0 {
            return &mut [];
        }
        if self.head > self.tail {
            self.resize(self.capacity());
        }
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr().add(self.head).cast::<T>(), self.len) }
    }

    /// Converts the deque into a `Vec`, reusing the buffer.
    pub fn into_vec(mut self) -> Vec<T> {
        if self.len > 0 && self.head != 0 {
            self.resize(self.capacity());
        }
        let len = mem::replace(&mut self.len, 0);
        let buf = mem::take(&mut self.buf);
        let capacity = buf.len();
        let ptr = Box::into_raw(buf).cast::<T>();
        // SAFETY: the first `len` slots are initialized, and the allocation holds
        // exactly `capacity` slots of `T`.
        unsafe { Vec::from_raw_parts(ptr, len, capacity) }
    }

    /// Returns a front-to-back iterator over shared references.
    pub fn iter(&self) -> Iter<'_, T> {
        let (front, back) = self.as_slices();
        Iter::new(front, back)
    }

    /// Drops every element, then applies the shrink policy.
    pub fn clear(&mut self) {
        self.drop_elements();
        self.shrink();
    }

    /// Drops every live element and resets the cursors. Capacity is untouched.
    fn drop_elements(&mut self) {
        let (front, back) = self.as_mut_slices();
        let front: *mut [T] = front;
        let back: *mut [T] = back;
        self.len = 0;
        self.reset_cursors();
        unsafe {
            ptr::drop_in_place(front);
            ptr::drop_in_place(back);
        }
    }
}

#[cold]
#[inline(never)]
fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

impl<T> AnyDeque<T> for RingDeque<T> {
    fn len(&self) -> usize {
        self.len
    }
    fn capacity(&self) -> usize {
        self.capacity()
    }
    fn push_back(&mut self, item: T) {
        self.push_back(item);
    }
    fn push_front(&mut self, item: T) {
        self.push_front(item);
    }
    fn pop_back(&mut self) -> Option<T> {
        self.pop_back()
    }
    fn pop_front(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn peek_back(&self) -> Option<&T> {
        self.peek_back()
    }
    fn peek_front(&self) -> Option<&T> {
        self.peek_front()
    }
    fn peek_back_mut(&mut self) -> Option<&mut T> {
        self.peek_back_mut()
    }
    fn peek_front_mut(&mut self) -> Option<&mut T> {
        self.peek_front_mut()
    }
    fn clear(&mut self) {
        self.clear();
    }
}

// --- Traits ---

impl<T> Drop for RingDeque<T> {
    fn drop(&mut self) {
        let (front, back) = self.as_mut_slices();
        unsafe {
            ptr::drop_in_place(front);
            ptr::drop_in_place(back);
        }
    }
}

impl<T: Clone> Clone for RingDeque<T> {
    fn clone(&self) -> Self {
        let mut deque = Self::with_config(self.config);
        if self.capacity() > 0 {
            deque.resize(self.capacity());
        }
        deque.push_back_all(self.iter().cloned());
        deque
    }
}

impl<T: fmt::Debug> fmt::Debug for RingDeque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for RingDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for RingDeque<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}
impl<T: Eq> Eq for RingDeque<T> {}

impl<T> Extend<T> for RingDeque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T> FromIterator<T> for RingDeque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut deque = Self::new();
        deque.extend(iter);
        deque
    }
}

impl<T> From<Vec<T>> for RingDeque<T> {
    fn from(buffer: Vec<T>) -> Self {
        Self::with_buffer(buffer, DequeConfig::default())
    }
}

impl<T> From<RingDeque<T>> for Vec<T> {
    fn from(deque: RingDeque<T>) -> Self {
        deque.into_vec()
    }
}

#[cfg(feature = "heapless")]
impl<T, const N: usize> From<heapless::Deque<T, N>> for RingDeque<T> {
    fn from(stack: heapless::Deque<T, N>) -> Self {
        let mut deque = Self::new();
        deque.reserve(stack.len());
        deque.extend(stack);
        deque
    }
}

impl<T> IntoIterator for RingDeque<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a RingDeque<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
