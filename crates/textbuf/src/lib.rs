//! Small-buffer-optimized text storage with explicit-encoding views.
//!
//! [`TextBuf`] keeps short contents inline in its header and promotes longer
//! contents to a growable heap array, so appends are cheap at both ends of
//! the size spectrum. It stores raw code units of one native width (8, 16
//! or 32 bits, as [`Utf8Buf`], [`Utf16Buf`] and [`Utf32Buf`]) and never
//! decodes behind the caller's back: reading happens through views that name
//! their encoding explicitly.
//!
//! Views bind to a snapshot of the buffer taken at creation and stay valid
//! (and unchanged) across later appends, even ones that reallocate:
//!
//! ```
//! use textbuf::Utf16Buf;
//!
//! let mut buf = Utf16Buf::from("øōôòœõ");
//! let points = buf.code_points();
//! buf.push_str(" and more");
//!
//! let decoded: Result<Vec<char>, _> = points.collect();
//! assert_eq!(decoded.unwrap(), ['ø', 'ō', 'ô', 'ò', 'œ', 'õ']);
//! ```
//!
//! Transcoding a whole sequence between widths is a composition of the two
//! explicit halves, decoding on one side and appending scalars on the other:
//!
//! ```
//! use textbuf::{EncodingError, Utf8Buf, Utf16Buf};
//!
//! fn widen(narrow: &Utf8Buf) -> Result<Utf16Buf, EncodingError> {
//!     let mut wide = Utf16Buf::new();
//!     for point in narrow.code_points() {
//!         wide.push_char(point?);
//!     }
//!     Ok(wide)
//! }
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod error;
mod snapshot;
mod unit;
mod views;

#[cfg(test)]
mod tests;

pub use buffer::{TextBuf, Utf8Buf, Utf16Buf, Utf32Buf};
pub use error::EncodingError;
pub use unit::Unit;
pub use views::{CodePoints, CodeUnits, Transcoded, Utf8Units, Utf16Units};
