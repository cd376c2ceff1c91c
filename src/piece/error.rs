use crate::bitfield::BitfieldError;
use thiserror::Error;

/// Errors reported for malformed input to the piece manager.
///
/// Verification failures are not errors (they surface as `Ok(false)` from
/// completion checks), and internal consistency violations abort instead of
/// being reported, since continuing would risk corrupt assignment state.
#[derive(Debug, Error)]
pub enum PieceError {
    /// A peer bitfield whose length does not match the local bitfield.
    #[error("peer bitfield has wrong size: {actual} bytes, expected {expected}")]
    BitfieldSizeMismatch { expected: usize, actual: usize },

    /// A piece index outside `[0, piece_count)`.
    #[error("invalid piece index: {0}")]
    InvalidPieceIndex(usize),

    /// A bit index past the end of a bitfield.
    #[error("bitfield error: {0}")]
    Bitfield(#[from] BitfieldError),
}
