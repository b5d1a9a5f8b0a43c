use thiserror::Error;

/// Internal failure reason for the byte-level primitives.
///
/// Nothing in the public API returns this type: every parser site catches
/// it and degrades to "absent" or "skip this record" per spec §7. It exists
/// so the primitives can distinguish absence from a genuine zero without
/// every caller re-deriving bounds checks by hand.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ZmdbError {
    #[error("requested range [{offset}, {offset}+{len}) is outside the {buf_len}-byte buffer")]
    OutOfBounds {
        offset: usize,
        len: usize,
        buf_len: usize,
    },
}
