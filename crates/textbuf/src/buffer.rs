//! The buffer type: packed small/large storage, growth policy, append engine.
//!
//! Representation
//! - Short contents live inline: a length byte plus a fixed block of units,
//!   no heap allocation. The count occupies the low seven bits of the length
//!   byte; the high bit is reserved as the large-representation discriminant
//!   and stays clear while contents are inline.
//! - Longer contents are promoted to a heap vector behind a shared-ownership
//!   handle. Snapshots taken by views hold the same handle, which is what
//!   makes them immune to later appends: storage that is shared is never
//!   written in place, it is replaced by a private reallocation.
//!
//! Transitions
//! - Every representation change is computed fully in local state and then
//!   committed in a single assignment. No caller ever observes a
//!   half-transitioned buffer.
//!
//! Growth
//! - New backing allocations are sized so the byte footprint is a multiple
//!   of the 16-byte allocation quantum.
//! - Appends with a statically knowable length reserve the whole amount in
//!   one step. Element streams of unknown length extend speculatively by a
//!   small fixed chunk whenever headroom runs out.
//! - Capacity arithmetic is checked; overflow is fatal, never wrapped. A
//!   failed allocation aborts inside the allocator, so growth never returns
//!   a degraded buffer.

use alloc::{sync::Arc, vec::Vec};
use core::fmt;

use crate::{
    error::EncodingError,
    snapshot::Snapshot,
    unit::Unit,
    views::{CodePoints, CodeUnits, Transcoded, Utf16Units, Utf8Units},
};

/// Byte granularity of fresh backing allocations.
const ALLOC_QUANTUM_BYTES: usize = 16;

/// Headroom claimed per speculative extension when a sequence does not
/// announce its length up front.
const CHUNK_UNITS: usize = 8;

/// Low seven bits of the small length byte hold the count; the high bit is
/// the large-representation discriminant.
const SMALL_LEN_MASK: u8 = 0x7F;

#[cold]
fn capacity_overflow() -> ! {
    panic!("capacity arithmetic overflowed usize")
}

/// `units` rounded up so the allocation's byte size lands on the quantum.
fn rounded_capacity<U: Unit>(units: usize) -> usize {
    let size = size_of::<U>();
    let bytes = units.checked_mul(size).unwrap_or_else(|| capacity_overflow());
    let bytes = bytes
        .checked_add(ALLOC_QUANTUM_BYTES - 1)
        .unwrap_or_else(|| capacity_overflow())
        & !(ALLOC_QUANTUM_BYTES - 1);
    bytes / size
}

// ------------------------------------------------------------------------------------------------
// Storage representation
// ------------------------------------------------------------------------------------------------

#[derive(Clone, Copy)]
struct Small<U: Unit> {
    len: u8,
    buf: U::Inline,
}

impl<U: Unit> Small<U> {
    fn empty() -> Self {
        Small {
            len: 0,
            buf: U::Inline::default(),
        }
    }

    fn len(&self) -> usize {
        usize::from(self.len & SMALL_LEN_MASK)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn set_len(&mut self, len: usize) {
        debug_assert!(len <= U::INLINE_CAP);
        let byte = len as u8;
        debug_assert_eq!(byte & !SMALL_LEN_MASK, 0);
        self.len = byte;
    }

    fn as_slice(&self) -> &[U] {
        &self.buf.as_ref()[..self.len()]
    }

    fn push(&mut self, unit: U) {
        let len = self.len();
        debug_assert!(len < U::INLINE_CAP);
        self.buf.as_mut()[len] = unit;
        self.set_len(len + 1);
    }

    fn push_slice(&mut self, units: &[U]) {
        let len = self.len();
        debug_assert!(units.len() <= U::INLINE_CAP - len);
        self.buf.as_mut()[len..len + units.len()].copy_from_slice(units);
        self.set_len(len + units.len());
    }

    /// A heap vector seeded with the inline contents, sized for at least
    /// `units` elements.
    fn promoted(&self, units: usize) -> Vec<U> {
        let mut data = Vec::with_capacity(rounded_capacity::<U>(units));
        data.extend_from_slice(self.as_slice());
        data
    }
}

#[derive(Clone)]
struct Large<U: Unit> {
    data: Arc<Vec<U>>,
}

impl<U: Unit> Large<U> {
    /// Grants write access to the vector with room for `needed` total units.
    ///
    /// Storage shared with snapshots or buffer clones cannot be touched in
    /// place; it is left to its other holders and replaced by a private
    /// reallocation. Unique storage is extended through the allocator, which
    /// grows the array in place when it can and moves it otherwise.
    fn ensure(&mut self, needed: usize) -> &mut Vec<U> {
        if Arc::get_mut(&mut self.data).is_none() {
            let target = rounded_capacity::<U>(needed.max(self.data.len()));
            let mut next = Vec::with_capacity(target);
            next.extend_from_slice(&self.data);
            self.data = Arc::new(next);
        }
        let vec = Arc::make_mut(&mut self.data);
        if vec.capacity() < needed {
            let target = rounded_capacity::<U>(needed);
            vec.reserve_exact(target - vec.len());
        }
        vec
    }
}

#[derive(Clone)]
enum Repr<U: Unit> {
    Small(Small<U>),
    Large(Large<U>),
}

// ------------------------------------------------------------------------------------------------
// Buffer
// ------------------------------------------------------------------------------------------------

/// A resizable text buffer with small-size optimization, generic over its
/// native code-unit width.
///
/// Short contents are stored inline with no heap allocation; longer contents
/// are promoted to a growable heap array. Reads go through snapshot-bound
/// views ([`code_units`](TextBuf::code_units) and friends) that pick an
/// encoding explicitly; the buffer itself imposes no decoding policy.
///
/// Cloning copies the header: inline contents by value, heap storage by
/// reference. A clone aliases the same allocation until either side next
/// needs to write, at which point the writing side reallocates privately and
/// the two diverge. Views rely on the same rule to stay valid across appends
/// on the source buffer.
///
/// ```
/// use textbuf::Utf8Buf;
///
/// let mut buf = Utf8Buf::from("test");
/// let before = buf.code_units();
/// buf.push_str(" more");
/// assert_eq!(before.len(), 4);
/// assert_eq!(buf.code_units().len(), 9);
/// ```
#[derive(Clone)]
pub struct TextBuf<U: Unit> {
    repr: Repr<U>,
}

/// Buffer of 8-bit code units.
pub type Utf8Buf = TextBuf<u8>;
/// Buffer of 16-bit code units.
pub type Utf16Buf = TextBuf<u16>;
/// Buffer of 32-bit code units.
pub type Utf32Buf = TextBuf<u32>;

impl<U: Unit> TextBuf<U> {
    /// An empty buffer in the small representation.
    #[must_use]
    pub fn new() -> Self {
        TextBuf {
            repr: Repr::Small(Small::empty()),
        }
    }

    /// A buffer holding a copy of `units`.
    #[must_use]
    pub fn from_units(units: &[U]) -> Self {
        let mut buf = TextBuf::new();
        buf.push_units(units);
        buf
    }

    /// Current length in units.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Small(small) => small.len(),
            Repr::Large(large) => large.data.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Units the buffer can hold before its next growth step.
    #[must_use]
    pub fn capacity(&self) -> usize {
        match &self.repr {
            Repr::Small(_) => U::INLINE_CAP,
            Repr::Large(large) => large.data.capacity(),
        }
    }

    /// Whether contents have been promoted to the heap representation.
    #[must_use]
    pub fn is_large(&self) -> bool {
        matches!(self.repr, Repr::Large(_))
    }

    fn headroom(&self) -> usize {
        self.capacity() - self.len()
    }

    fn units(&self) -> &[U] {
        match &self.repr {
            Repr::Small(small) => small.as_slice(),
            Repr::Large(large) => &large.data,
        }
    }

    // --------------------------------------------------------------------------------------------
    // Capacity
    // --------------------------------------------------------------------------------------------

    /// Ensures total capacity for at least `capacity` units without changing
    /// the length. Promotes to the heap representation when `capacity`
    /// exceeds the inline block; no-op when current capacity already
    /// suffices.
    pub fn reserve(&mut self, capacity: usize) -> &mut Self {
        if capacity <= self.capacity() {
            return self;
        }
        match &mut self.repr {
            Repr::Small(small) => {
                let data = small.promoted(capacity);
                self.repr = Repr::Large(Large {
                    data: Arc::new(data),
                });
            }
            Repr::Large(large) => {
                large.ensure(capacity);
            }
        }
        self
    }

    fn reserve_additional(&mut self, additional: usize) {
        let needed = self
            .len()
            .checked_add(additional)
            .unwrap_or_else(|| capacity_overflow());
        self.reserve(needed);
    }

    /// Empties the buffer: length zero, inline region cleared.
    ///
    /// Reverting to the empty small layout drops this handle's reference to
    /// any heap storage; snapshots keep theirs until they are dropped.
    pub fn reset(&mut self) -> &mut Self {
        self.repr = Repr::Small(Small::empty());
        self
    }

    // --------------------------------------------------------------------------------------------
    // Append engine
    // --------------------------------------------------------------------------------------------

    /// Appends one native-width unit.
    pub fn push(&mut self, unit: U) -> &mut Self {
        match &mut self.repr {
            Repr::Small(small) if small.len() < U::INLINE_CAP => small.push(unit),
            Repr::Small(small) => {
                // Inline block is full: promote, landing the unit on the
                // large path. The new layout is computed fully, then
                // committed.
                let mut data = small.promoted(small.len() + 1);
                data.push(unit);
                self.repr = Repr::Large(Large {
                    data: Arc::new(data),
                });
            }
            Repr::Large(large) => {
                let needed = large
                    .data
                    .len()
                    .checked_add(1)
                    .unwrap_or_else(|| capacity_overflow());
                large.ensure(needed).push(unit);
            }
        }
        self
    }

    /// Sink-style append of one unit, identical to [`push`](TextBuf::push).
    pub fn put(&mut self, unit: U) -> &mut Self {
        self.push(unit)
    }

    /// Appends one scalar, encoded into 1..=4 native units.
    pub fn push_char(&mut self, c: char) -> &mut Self {
        let mut units = [U::default(); 4];
        let written = U::encode_char(c, &mut units);
        self.push_units(&units[..written])
    }

    /// Appends one code unit of any supported width, transcoding when the
    /// widths differ.
    ///
    /// # Errors
    ///
    /// A foreign unit must itself be a complete scalar; fragments (non-ASCII
    /// bytes, surrogate halves, out-of-range values) fail with
    /// [`EncodingError`] and leave the buffer untouched.
    pub fn try_push<S: Unit>(&mut self, unit: S) -> Result<&mut Self, EncodingError> {
        if S::BITS == U::BITS {
            return Ok(self.push(U::from_u32(unit.to_u32())));
        }
        let c = unit.try_scalar()?;
        Ok(self.push_char(c))
    }

    /// Appends a span of native units in one reserve + copy.
    pub fn push_units(&mut self, units: &[U]) -> &mut Self {
        if units.is_empty() {
            return self;
        }
        match &mut self.repr {
            Repr::Small(small) if units.len() <= U::INLINE_CAP - small.len() => {
                small.push_slice(units);
            }
            Repr::Small(small) => {
                let total = small
                    .len()
                    .checked_add(units.len())
                    .unwrap_or_else(|| capacity_overflow());
                let mut data = small.promoted(total);
                data.extend_from_slice(units);
                self.repr = Repr::Large(Large {
                    data: Arc::new(data),
                });
            }
            Repr::Large(large) => {
                let total = large
                    .data
                    .len()
                    .checked_add(units.len())
                    .unwrap_or_else(|| capacity_overflow());
                large.ensure(total).extend_from_slice(units);
            }
        }
        self
    }

    /// Appends a string. Byte-width buffers bulk-copy the span; wider
    /// buffers reserve once and encode per scalar (the byte length bounds
    /// the unit count at any width).
    pub fn push_str(&mut self, text: &str) -> &mut Self {
        if let Some(units) = U::str_as_units(text) {
            return self.push_units(units);
        }
        self.reserve_additional(text.len());
        for c in text.chars() {
            self.push_char(c);
        }
        self
    }

    /// Appends a sequence of native units.
    ///
    /// A sequence that announces its exact length is reserved for in one
    /// step; otherwise capacity is extended speculatively in small chunks as
    /// the elements arrive.
    pub fn extend_units<I>(&mut self, units: I) -> &mut Self
    where
        I: IntoIterator<Item = U>,
    {
        let iter = units.into_iter();
        let (lower, upper) = iter.size_hint();
        if upper == Some(lower) {
            self.reserve_additional(lower);
            for unit in iter {
                self.push(unit);
            }
        } else {
            for unit in iter {
                if self.headroom() == 0 {
                    self.reserve_additional(CHUNK_UNITS);
                }
                self.push(unit);
            }
        }
        self
    }

    /// Appends a sequence of code units of any supported width, transcoding
    /// each element like [`try_push`](TextBuf::try_push).
    ///
    /// # Errors
    ///
    /// Fails on the first element that is not a complete scalar. Elements
    /// appended before the offending one remain in the buffer.
    pub fn try_extend<S, I>(&mut self, units: I) -> Result<&mut Self, EncodingError>
    where
        S: Unit,
        I: IntoIterator<Item = S>,
    {
        let iter = units.into_iter();
        let (lower, upper) = iter.size_hint();
        if upper == Some(lower) {
            // Every source element lands at least one native unit.
            self.reserve_additional(lower);
            for unit in iter {
                self.try_push(unit)?;
            }
        } else {
            for unit in iter {
                if self.headroom() == 0 {
                    self.reserve_additional(CHUNK_UNITS);
                }
                self.try_push(unit)?;
            }
        }
        Ok(self)
    }

    /// Replaces the contents with a copy of `units`.
    pub fn assign_units(&mut self, units: &[U]) -> &mut Self {
        self.reset().push_units(units)
    }

    /// Replaces the contents with `text`.
    pub fn assign_str(&mut self, text: &str) -> &mut Self {
        self.reset().push_str(text)
    }

    // --------------------------------------------------------------------------------------------
    // Views
    // --------------------------------------------------------------------------------------------

    fn snapshot(&self) -> Snapshot<U> {
        match &self.repr {
            Repr::Small(small) => Snapshot::Inline {
                buf: small.buf,
                len: small.len,
            },
            Repr::Large(large) => Snapshot::Heap {
                data: Arc::clone(&large.data),
                len: large.data.len(),
            },
        }
    }

    /// Random-access view of the raw code units as they are now. Later
    /// appends on the buffer do not affect it.
    #[must_use]
    pub fn code_units(&self) -> CodeUnits<U> {
        CodeUnits::new(self.snapshot())
    }

    /// Lazy traversal as 8-bit units, transcoding unless this is already a
    /// byte buffer.
    #[must_use]
    pub fn utf8_units(&self) -> Utf8Units<U> {
        Transcoded::new(self.snapshot())
    }

    /// Lazy traversal as 16-bit units, transcoding unless this is already a
    /// wide buffer.
    #[must_use]
    pub fn utf16_units(&self) -> Utf16Units<U> {
        Transcoded::new(self.snapshot())
    }

    /// Lazy bidirectional traversal over full scalars.
    #[must_use]
    pub fn code_points(&self) -> CodePoints<U> {
        CodePoints::new(self.snapshot())
    }
}

// ------------------------------------------------------------------------------------------------
// Standard traits
// ------------------------------------------------------------------------------------------------

impl<U: Unit> Default for TextBuf<U> {
    fn default() -> Self {
        TextBuf::new()
    }
}

impl<U: Unit> fmt::Debug for TextBuf<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        U::fmt_units(self.units(), f)
    }
}

// Equality is defined between buffers of the same width only. Comparing
// against plain sequences goes through an explicit view:
// `buf.code_units().as_slice() == expected`.
impl<U: Unit> PartialEq for TextBuf<U> {
    fn eq(&self, other: &Self) -> bool {
        self.units() == other.units()
    }
}

impl<U: Unit> Eq for TextBuf<U> {}

impl<U: Unit> From<&str> for TextBuf<U> {
    fn from(text: &str) -> Self {
        let mut buf = TextBuf::new();
        buf.push_str(text);
        buf
    }
}

impl<U: Unit> From<&[U]> for TextBuf<U> {
    fn from(units: &[U]) -> Self {
        TextBuf::from_units(units)
    }
}

impl<U: Unit> FromIterator<U> for TextBuf<U> {
    fn from_iter<I: IntoIterator<Item = U>>(iter: I) -> Self {
        let mut buf = TextBuf::new();
        buf.extend_units(iter);
        buf
    }
}

impl<U: Unit> FromIterator<char> for TextBuf<U> {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut buf = TextBuf::new();
        buf.extend(iter);
        buf
    }
}

impl<U: Unit> Extend<U> for TextBuf<U> {
    fn extend<I: IntoIterator<Item = U>>(&mut self, iter: I) {
        self.extend_units(iter);
    }
}

impl<U: Unit> Extend<char> for TextBuf<U> {
    fn extend<I: IntoIterator<Item = char>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, upper) = iter.size_hint();
        if upper == Some(lower) {
            self.reserve_additional(lower);
            for c in iter {
                self.push_char(c);
            }
        } else {
            for c in iter {
                if self.headroom() == 0 {
                    self.reserve_additional(CHUNK_UNITS);
                }
                self.push_char(c);
            }
        }
    }
}

// The generic stream-consumer protocol: anything that writes through
// `core::fmt` can sink into a buffer of any width. Growth failures abort by
// policy, so this never reports `fmt::Error` itself.
impl<U: Unit> fmt::Write for TextBuf<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }

    fn write_char(&mut self, c: char) -> fmt::Result {
        self.push_char(c);
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl<U: Unit + serde::Serialize> serde::Serialize for TextBuf<U> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.units().iter().copied())
    }
}

#[cfg(feature = "serde")]
impl<'de, U: Unit + serde::Deserialize<'de>> serde::Deserialize<'de> for TextBuf<U> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let units = Vec::<U>::deserialize(deserializer)?;
        Ok(TextBuf::from_units(&units))
    }
}
