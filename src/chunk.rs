//! Chunk store interface.
//!
//! Disk storage and hash verification live outside this crate; the piece
//! manager only needs a narrow view of each piece's on-disk chunk. The
//! storage layer implements [`ChunkDescriptor`] and handles its own
//! synchronization, since `verify` may block on disk and CPU.

use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chunk store error: {0}")]
    Store(String),
}

/// Verification state of a chunk's on-disk data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStatus {
    Missing,
    Partial,
    Verified,
}

/// Per-piece view of the chunk store.
pub trait ChunkDescriptor {
    /// Current verification state without re-hashing.
    fn status(&self) -> DataStatus;

    /// Re-checks the chunk's data against its expected hash.
    ///
    /// `Ok(false)` means the data is absent or does not match; an `Err` means
    /// the check itself could not be carried out (e.g. a read failure).
    fn verify(&self) -> Result<bool, ChunkError>;

    /// Completion bitfield with one bit per block, in wire layout.
    fn block_bitfield(&self) -> Bytes;

    /// Size in bytes of the blocks this chunk is requested in.
    fn block_size(&self) -> u64;

    /// Total size of the piece in bytes.
    fn size(&self) -> u64;
}
