//! Piece selection and download coordination.
//!
//! This module decides which piece a peer should download next and keeps the
//! bookkeeping that decision depends on consistent under concurrent peer
//! activity.
//!
//! # Components
//!
//! - [`PieceStats`] - Per-piece rarity counts across the known swarm
//! - [`PeerRegistry`] - Each connected peer's known bitfield, feeding the stats
//! - [`PieceSelector`] - Pluggable priority ordering over candidate pieces
//! - [`Assignments`] - Exclusive peer-to-piece assignment table
//! - [`PieceManager`] - Orchestrator owning the local completion bitfield

mod assignments;
mod error;
mod manager;
mod registry;
mod selector;
mod stats;

pub use assignments::Assignments;
pub use error::PieceError;
pub use manager::PieceManager;
pub use registry::PeerRegistry;
pub use selector::{PieceSelector, RarestFirstSelector};
pub use stats::PieceStats;
