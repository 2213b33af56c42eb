//! Lazy read-only traversals over a buffer snapshot.
//!
//! Every view is created from a [`Snapshot`] and is therefore unaffected by
//! whatever happens to the source buffer afterwards. Views are `Clone`;
//! cloning copies the cursor bounds, not the data, yielding an independent
//! cursor over the same snapshot that can be used to restart traversal.
//!
//! Decoding is strictly lazy. The transcoding views ([`Utf8Units`],
//! [`Utf16Units`]) and the code-point view ([`CodePoints`]) yield `Result`s:
//! malformed native content surfaces as an [`EncodingError`] item, after
//! which the view fuses and yields `None`. When the requested width equals
//! the buffer's native width the units pass through verbatim and no error is
//! ever produced.

use core::iter::FusedIterator;

use crate::{error::EncodingError, snapshot::Snapshot, unit::Unit};

// ------------------------------------------------------------------------------------------------
// Code units
// ------------------------------------------------------------------------------------------------

/// Random-access, fixed-length traversal of the raw code units. No decoding.
#[derive(Debug, Clone)]
pub struct CodeUnits<U: Unit> {
    snap: Snapshot<U>,
    front: usize,
    back: usize,
}

impl<U: Unit> CodeUnits<U> {
    pub(crate) fn new(snap: Snapshot<U>) -> Self {
        let back = snap.len();
        CodeUnits {
            snap,
            front: 0,
            back,
        }
    }

    /// The units not yet consumed from either end.
    pub fn as_slice(&self) -> &[U] {
        &self.snap.as_slice()[self.front..self.back]
    }

    /// Random access into the remaining units.
    pub fn get(&self, index: usize) -> Option<U> {
        self.as_slice().get(index).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.back - self.front
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.front == self.back
    }
}

impl<U: Unit> Iterator for CodeUnits<U> {
    type Item = U;

    fn next(&mut self) -> Option<U> {
        if self.front == self.back {
            return None;
        }
        let unit = self.snap.as_slice()[self.front];
        self.front += 1;
        Some(unit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<U: Unit> DoubleEndedIterator for CodeUnits<U> {
    fn next_back(&mut self) -> Option<U> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.snap.as_slice()[self.back])
    }
}

impl<U: Unit> ExactSizeIterator for CodeUnits<U> {}
impl<U: Unit> FusedIterator for CodeUnits<U> {}

// ------------------------------------------------------------------------------------------------
// Width-transcoding traversal
// ------------------------------------------------------------------------------------------------

/// Forward traversal that re-encodes the native units into width `T` one
/// scalar at a time.
///
/// When `T` is the native width this degenerates to unit-identity (use
/// [`CodeUnits`] instead if random access is needed). Otherwise each scalar
/// is decoded from the native span and its `T`-encoding is drained unit by
/// unit before the next scalar is touched.
#[derive(Debug, Clone)]
pub struct Transcoded<U: Unit, T: Unit> {
    snap: Snapshot<U>,
    pos: usize,
    pending: [T; 4],
    pending_len: u8,
    pending_pos: u8,
    failed: bool,
}

/// Traversal as 8-bit units (UTF-8 when transcoding).
pub type Utf8Units<U> = Transcoded<U, u8>;
/// Traversal as 16-bit units (UTF-16 when transcoding).
pub type Utf16Units<U> = Transcoded<U, u16>;

impl<U: Unit, T: Unit> Transcoded<U, T> {
    pub(crate) fn new(snap: Snapshot<U>) -> Self {
        Transcoded {
            snap,
            pos: 0,
            pending: [T::default(); 4],
            pending_len: 0,
            pending_pos: 0,
            failed: false,
        }
    }
}

impl<U: Unit, T: Unit> Iterator for Transcoded<U, T> {
    type Item = Result<T, EncodingError>;

    #[allow(clippy::cast_possible_truncation)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.pending_pos < self.pending_len {
            let unit = self.pending[usize::from(self.pending_pos)];
            self.pending_pos += 1;
            return Some(Ok(unit));
        }
        if self.failed {
            return None;
        }
        let units = &self.snap.as_slice()[self.pos..];
        let &first = units.first()?;
        if T::BITS == U::BITS {
            // Same width: pass the unit through without validating.
            self.pos += 1;
            return Some(Ok(T::from_u32(first.to_u32())));
        }
        match U::decode_front(units) {
            Ok((c, read)) => {
                self.pos += read;
                let mut out = [T::default(); 4];
                let written = T::encode_char(c, &mut out);
                self.pending = out;
                self.pending_len = written as u8;
                self.pending_pos = 1;
                Some(Ok(out[0]))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending = usize::from(self.pending_len - self.pending_pos);
        let remaining = if self.failed {
            0
        } else {
            self.snap.len() - self.pos
        };
        if T::BITS == U::BITS {
            (pending + remaining, Some(pending + remaining))
        } else {
            // A scalar spans at most four units at either width.
            let upper = remaining
                .checked_mul(4)
                .and_then(|n| n.checked_add(pending));
            (pending + usize::from(remaining > 0), upper)
        }
    }
}

impl<U: Unit, T: Unit> FusedIterator for Transcoded<U, T> {}

// ------------------------------------------------------------------------------------------------
// Code points
// ------------------------------------------------------------------------------------------------

/// Bidirectional decoding traversal over full scalars.
///
/// Built on the forward-only [`Unit::decode_front`] primitive: stepping from
/// the back scans to the nearest unit a scalar can begin at, then decodes
/// forward from there. Both cursors operate on the same snapshot span, so
/// backward traversal yields the exact reverse of forward traversal.
#[derive(Debug, Clone)]
pub struct CodePoints<U: Unit> {
    snap: Snapshot<U>,
    front: usize,
    back: usize,
    failed: bool,
}

impl<U: Unit> CodePoints<U> {
    pub(crate) fn new(snap: Snapshot<U>) -> Self {
        let back = snap.len();
        CodePoints {
            snap,
            front: 0,
            back,
            failed: false,
        }
    }
}

impl<U: Unit> Iterator for CodePoints<U> {
    type Item = Result<char, EncodingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.front == self.back {
            return None;
        }
        let span = &self.snap.as_slice()[self.front..self.back];
        match U::decode_front(span) {
            Ok((c, read)) => {
                self.front += read;
                Some(Ok(c))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = self.back - self.front;
        (usize::from(remaining > 0), Some(remaining))
    }
}

impl<U: Unit> DoubleEndedIterator for CodePoints<U> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.failed || self.front == self.back {
            return None;
        }
        let span = &self.snap.as_slice()[self.front..self.back];
        // A scalar spans at most four units. Walk past trailing units to the
        // nearest possible start, then lean on the forward decoder.
        let mut start = span.len() - 1;
        while start > 0 && span.len() - start < 4 && !U::is_boundary(span[start]) {
            start -= 1;
        }
        let tail = &span[start..];
        let decoded = match U::decode_front(tail) {
            // The decoded sequence must cover the whole tail; leftover units
            // after it mean the span ends with stray trailing units.
            Ok((c, read)) if read == tail.len() => Ok((c, read)),
            Ok(_) => Err(EncodingError::InvalidUnit {
                value: span[span.len() - 1].to_u32(),
            }),
            Err(err) => Err(err),
        };
        match decoded {
            Ok((c, read)) => {
                self.back -= read;
                Some(Ok(c))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl<U: Unit> FusedIterator for CodePoints<U> {}
