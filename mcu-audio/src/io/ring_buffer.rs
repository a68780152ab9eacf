//! Lock-free single-producer single-consumer (SPSC) ring buffer for audio frames.
//!
//! Bridges the cooperative producer (`tick()`) and the interrupt-context
//! consumer (`drain()`). Full and empty are told apart by one wrap flag per
//! index rather than a shared element count, so neither side ever performs a
//! read-modify-write on state that the other side also writes.
//!
//! # Safety Contract
//!
//! - Only the [`Writer`] half may store frames and advance the write cursor.
//! - Only the [`Reader`] half may take frames and advance the read cursor.
//! - [`RingBuffer::split`] hands out exactly one of each, so the rule is
//!   checked by the borrow checker instead of by convention.
//!
//! # Cursor layout
//!
//! Each side owns a single free-running `u32` cursor:
//!
//! ```text
//!  31              log2(N)+1   log2(N)   log2(N)-1          0
//! ┌─────────────────────────┬──────────┬─────────────────────┐
//! │    laps (upper bits)    │ wrap bit │        index        │
//! └─────────────────────────┴──────────┴─────────────────────┘
//! ```
//!
//! The wrap flag flips every time the index wraps, and for the read cursor the
//! bits from `log2(N)` upward are the number of completed laps. Index and flag
//! change in one atomic store, so the other context can never observe a torn
//! index/flag pair.

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicU32, Ordering};

/// A fixed-capacity lock-free SPSC ring buffer.
///
/// Unlike a Lamport queue, all `N` slots are usable: when the two indices are
/// equal, equal wrap flags mean empty and differing wrap flags mean full.
///
/// # Type Parameters
///
/// - `T`: The element type. Must be `Send` for cross-context safety.
/// - `N`: Number of slots. Must be a power of two, at most 2^16.
pub struct RingBuffer<T, const N: usize> {
    slots: [UnsafeCell<MaybeUninit<T>>; N],
    /// Write cursor (only modified by the writer).
    write: AtomicU32,
    /// Read cursor (only modified by the reader).
    read: AtomicU32,
}

// SAFETY: T: Send is required because values cross thread/ISR boundaries.
// The split halves guarantee a single writer and a single reader, each
// cursor is only stored by its owning half, and release/acquire ordering on
// the cursors publishes slot contents before they become visible.
unsafe impl<T: Send, const N: usize> Sync for RingBuffer<T, N> {}
unsafe impl<T: Send, const N: usize> Send for RingBuffer<T, N> {}

impl<T, const N: usize> RingBuffer<T, N> {
    const SHIFT: u32 = N.trailing_zeros();
    const MASK: u32 = (N - 1) as u32;

    /// Create a new empty buffer.
    ///
    /// # Panics
    ///
    /// Compile-time assertion: `N` must be a power of two no larger than 2^16.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "ring buffer size must be a power of two");
        assert!(N <= 1 << 16, "ring buffer indices are 16 bits wide");

        RingBuffer {
            // SAFETY: An array of uninitialized MaybeUninit<T> is always valid.
            // UnsafeCell is a transparent wrapper that doesn't affect validity.
            slots: unsafe {
                MaybeUninit::<[UnsafeCell<MaybeUninit<T>>; N]>::uninit().assume_init()
            },
            write: AtomicU32::new(0),
            read: AtomicU32::new(0),
        }
    }

    #[inline(always)]
    fn index_of(cursor: u32) -> usize {
        (cursor & Self::MASK) as usize
    }

    #[inline(always)]
    fn wrap_of(cursor: u32) -> bool {
        (cursor >> Self::SHIFT) & 1 == 1
    }

    #[inline(always)]
    fn full(write: u32, read: u32) -> bool {
        Self::index_of(write) == Self::index_of(read) && Self::wrap_of(write) != Self::wrap_of(read)
    }

    #[inline(always)]
    fn empty(write: u32, read: u32) -> bool {
        Self::index_of(write) == Self::index_of(read) && Self::wrap_of(write) == Self::wrap_of(read)
    }

    /// Split into the writer and reader halves.
    ///
    /// Move the [`Writer`] to the producing context and the [`Reader`] to the
    /// consuming one (e.g. the timer ISR).
    pub fn split(&mut self) -> (Writer<'_, T, N>, Reader<'_, T, N>) {
        let ring: &Self = self;
        (Writer { ring }, Reader { ring })
    }

    /// Store a value at the write index (single-context form of [`Writer::write`]).
    pub fn write(&mut self, value: T) {
        self.push(value);
    }

    /// Take the oldest unread value (single-context form of [`Reader::read`]).
    pub fn read(&mut self) -> Option<T> {
        self.pop()
    }

    /// Discard all unread values and rewind both cursors (and the lap count) to zero.
    pub fn reset(&mut self) {
        while self.pop().is_some() {}
        *self.write.get_mut() = 0;
        *self.read.get_mut() = 0;
    }

    /// `true` when every slot holds an unread value.
    pub fn is_full(&self) -> bool {
        Self::full(self.write.load(Ordering::Acquire), self.read.load(Ordering::Acquire))
    }

    /// `true` when there is nothing to read.
    pub fn is_empty(&self) -> bool {
        Self::empty(self.write.load(Ordering::Acquire), self.read.load(Ordering::Acquire))
    }

    /// Number of unread values.
    pub fn len(&self) -> usize {
        let read = self.read.load(Ordering::Acquire);
        let write = self.write.load(Ordering::Acquire);
        write.wrapping_sub(read) as usize
    }

    /// Total number of slots.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Total number of values ever read, wrapping at `u32::MAX`.
    ///
    /// Computed as `(laps << log2(N)) + read_index` from a single load of the
    /// read cursor.
    pub fn count(&self) -> u32 {
        let cursor = self.read.load(Ordering::Acquire);
        ((cursor >> Self::SHIFT) << Self::SHIFT).wrapping_add(Self::index_of(cursor) as u32)
    }

    /// Number of times the read index has wrapped around.
    pub fn laps(&self) -> u32 {
        self.read.load(Ordering::Acquire) >> Self::SHIFT
    }

    /// Slot the next write goes to.
    pub fn write_index(&self) -> usize {
        Self::index_of(self.write.load(Ordering::Acquire))
    }

    /// Slot the next read comes from.
    pub fn read_index(&self) -> usize {
        Self::index_of(self.read.load(Ordering::Acquire))
    }

    /// Wrap flag of the write index.
    pub fn write_wrap(&self) -> bool {
        Self::wrap_of(self.write.load(Ordering::Acquire))
    }

    /// Wrap flag of the read index.
    pub fn read_wrap(&self) -> bool {
        Self::wrap_of(self.read.load(Ordering::Acquire))
    }

    fn push(&self, value: T) {
        let write = self.write.load(Ordering::Relaxed);
        let read = self.read.load(Ordering::Acquire);

        debug_assert!(!Self::full(write, read), "write() on a full ring buffer");
        if Self::full(write, read) {
            // Overwriting would race with the reader; the frame is lost instead.
            return;
        }

        // SAFETY: We are the sole writer and the write cursor is only advanced
        // by us. The buffer is not full, so the reader is not touching this slot.
        unsafe {
            (*self.slots[Self::index_of(write)].get()).write(value);
        }

        // Release ordering ensures the slot write is visible before the cursor advances.
        self.write.store(write.wrapping_add(1), Ordering::Release);
    }

    fn pop(&self) -> Option<T> {
        let read = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Acquire);

        if Self::empty(write, read) {
            return None;
        }

        // SAFETY: We are the sole reader and the read cursor is only advanced
        // by us. The buffer is not empty, so this slot holds a written value.
        let value = unsafe { (*self.slots[Self::index_of(read)].get()).assume_init_read() };

        // Release ordering ensures the read completes before the slot is
        // handed back to the writer. Wrapping the index flips the wrap flag and
        // bumps the lap count in the same store.
        self.read.store(read.wrapping_add(1), Ordering::Release);
        Some(value)
    }
}

impl<T, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Drop for RingBuffer<T, N> {
    fn drop(&mut self) {
        // Drop any remaining items to avoid leaks.
        while self.pop().is_some() {}
    }
}

/// Producing half of a [`RingBuffer`].
pub struct Writer<'a, T, const N: usize> {
    ring: &'a RingBuffer<T, N>,
}

impl<T, const N: usize> Writer<'_, T, N> {
    /// Store `value` and advance the write index.
    ///
    /// The caller must check [`is_full()`](Self::is_full) first. Writing to a
    /// full buffer is a logic error: debug builds panic, release builds drop
    /// `value`.
    #[inline]
    pub fn write(&mut self, value: T) {
        self.ring.push(value);
    }

    /// `true` when every slot holds an unread value.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// `true` when there is nothing to read.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Total number of values ever read by the other half.
    #[inline]
    pub fn count(&self) -> u32 {
        self.ring.count()
    }
}

/// Consuming half of a [`RingBuffer`].
pub struct Reader<'a, T, const N: usize> {
    ring: &'a RingBuffer<T, N>,
}

impl<T, const N: usize> Reader<'_, T, N> {
    /// Take the oldest unread value, or `None` if the buffer is empty.
    #[inline]
    pub fn read(&mut self) -> Option<T> {
        self.ring.pop()
    }

    /// `true` when there is nothing to read.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// `true` when every slot holds an unread value.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Total number of values read so far.
    #[inline]
    pub fn count(&self) -> u32 {
        self.ring.count()
    }
}
