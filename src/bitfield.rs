//! BitTorrent bitfield wire codec (BEP-3).
//!
//! A bitfield packs one bit per piece, numbered from the high bit of the
//! first byte: bit `i` lives in byte `i / 8` at position `7 - (i % 8)`.
//! Spare bits in the final byte are always zero. This layout is the wire
//! format exchanged in BITFIELD messages and must match it exactly.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitfieldError {
    #[error("bit index out of range: {index} (bitfield is {len} bytes)")]
    OutOfRange { index: usize, len: usize },
}

/// Encodes a sequence of piece statuses into wire-format bytes.
///
/// The result is `ceil(n / 8)` bytes long; trailing spare bits are zero.
pub fn encode(statuses: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; statuses.len().div_ceil(8)];
    for (i, &set) in statuses.iter().enumerate() {
        if set {
            bytes[i / 8] |= 1 << (7 - (i % 8));
        }
    }
    bytes
}

/// Reads the bit at the given absolute index.
pub fn get_bit(bytes: &[u8], index: usize) -> Result<bool, BitfieldError> {
    let byte_index = index / 8;
    if byte_index >= bytes.len() {
        return Err(BitfieldError::OutOfRange {
            index,
            len: bytes.len(),
        });
    }
    Ok((bytes[byte_index] >> (7 - (index % 8))) & 1 == 1)
}

/// Sets the bit at the given absolute index to 1. Never clears bits.
pub fn set_bit(bytes: &mut [u8], index: usize) -> Result<(), BitfieldError> {
    let byte_index = index / 8;
    if byte_index >= bytes.len() {
        return Err(BitfieldError::OutOfRange {
            index,
            len: bytes.len(),
        });
    }
    bytes[byte_index] |= 1 << (7 - (index % 8));
    Ok(())
}
