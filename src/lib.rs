//! rpiece - BitTorrent piece selection and download coordination
//!
//! This library implements the piece-selection core of a BitTorrent client:
//! tracking which pieces are locally complete, which pieces each remote peer
//! claims to have, and deciding which piece a given peer should fetch next.
//!
//! # Modules
//!
//! - [`bitfield`] - BEP-3 bitfield wire codec
//! - [`chunk`] - Chunk store interface for piece verification
//! - [`peer`] - Peer handle interface and block-level requests
//! - [`piece`] - Rarity tracking, piece selection and assignment

pub mod bitfield;
pub mod chunk;
pub mod peer;
pub mod piece;

pub use bitfield::BitfieldError;
pub use chunk::{ChunkDescriptor, ChunkError, DataStatus};
pub use peer::{BlockRequest, Peer};
pub use piece::{
    Assignments, PeerRegistry, PieceError, PieceManager, PieceSelector, PieceStats,
    RarestFirstSelector,
};
