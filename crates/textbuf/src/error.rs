use thiserror::Error;

/// Raised when transcoding between code-unit widths cannot produce a valid
/// representation.
///
/// Transcoding never substitutes a replacement character: the offending unit
/// is reported and the buffer or view is left exactly as it was. Errors only
/// arise when the source and target widths differ; same-width traversal and
/// appends pass units through verbatim.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingError {
    /// A 16-bit unit that is one half of a surrogate pair appeared without
    /// its partner.
    #[error("unpaired surrogate 0x{unit:04X}")]
    UnpairedSurrogate { unit: u16 },

    /// A unit that cannot begin a scalar (a UTF-8 continuation or invalid
    /// lead byte, or a 32-bit value outside the scalar range).
    #[error("invalid code unit 0x{value:X}")]
    InvalidUnit { value: u32 },

    /// The span ended in the middle of a multi-unit sequence.
    #[error("truncated code unit sequence")]
    Truncated,
}
