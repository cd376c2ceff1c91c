//! Peer connection interface and block-level requests.
//!
//! The transport layer owns peer connections; this crate only references
//! them, using each handle as a hashable identity and a liveness probe.

use std::hash::Hash;

/// Handle to a peer connection owned by the transport layer.
///
/// Equality and hashing must be stable for the lifetime of the connection,
/// independent of its mutable state. Liveness is polled via `is_closed`, not
/// pushed; the piece manager prunes a peer's state lazily the next time a
/// prune-eligible operation runs.
pub trait Peer: Clone + Eq + Hash {
    fn is_closed(&self) -> bool;
}

/// A request for one block of a piece, as sent in a REQUEST message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockRequest {
    pub piece: u32,
    pub offset: u32,
    pub length: u32,
}

impl BlockRequest {
    pub fn new(piece: u32, offset: u32, length: u32) -> Self {
        Self {
            piece,
            offset,
            length,
        }
    }
}

/// Number of blocks a piece of the given size is split into.
pub fn compute_block_count(piece_size: u64, block_size: u64) -> u32 {
    piece_size.div_ceil(block_size) as u32
}

/// Length of the block at `block_index`; the final block is shorter when the
/// piece size is not block-aligned.
pub fn compute_block_length(piece_size: u64, block_index: u32, block_size: u64) -> u32 {
    let offset = block_index as u64 * block_size;
    piece_size.saturating_sub(offset).min(block_size) as u32
}
