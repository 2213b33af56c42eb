//! The header copy a view binds to at creation time.
//!
//! A snapshot captures the buffer's representation at one instant: inline
//! contents by value, heap contents by sharing the backing allocation and
//! remembering the length that was current. Later appends on the source
//! buffer either leave the shared storage untouched or replace it with a
//! private reallocation, so a snapshot never observes them.

use alloc::{sync::Arc, vec::Vec};
use core::fmt;

use crate::unit::Unit;

#[derive(Clone)]
pub(crate) enum Snapshot<U: Unit> {
    Inline { buf: U::Inline, len: u8 },
    Heap { data: Arc<Vec<U>>, len: usize },
}

impl<U: Unit> Snapshot<U> {
    pub(crate) fn as_slice(&self) -> &[U] {
        match self {
            Snapshot::Inline { buf, len } => &buf.as_ref()[..usize::from(*len)],
            Snapshot::Heap { data, len } => &data[..*len],
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Snapshot::Inline { len, .. } => usize::from(*len),
            Snapshot::Heap { len, .. } => *len,
        }
    }
}

impl<U: Unit> fmt::Debug for Snapshot<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        U::fmt_units(self.as_slice(), f)
    }
}
