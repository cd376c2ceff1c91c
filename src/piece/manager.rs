use super::assignments::Assignments;
use super::error::PieceError;
use super::registry::PeerRegistry;
use super::selector::PieceSelector;
use crate::bitfield;
use crate::chunk::{ChunkDescriptor, DataStatus};
use crate::peer::{compute_block_count, compute_block_length, BlockRequest, Peer};
use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Upper bound on how many candidate pieces the selection strategy is asked
/// for per call, independent of swarm size.
const PIECE_SELECTION_LIMIT: usize = 25;

/// Coordinates piece downloads across all connected peers.
///
/// Owns the local completion bitfield and composes the registry, selection
/// strategy and assignment table to answer what a given peer should download
/// next. All piece-indexed state lives behind a single mutex; peer workers
/// call in concurrently and each public operation is atomic.
pub struct PieceManager<P: Peer, C: ChunkDescriptor> {
    chunks: Vec<C>,
    selector: Box<dyn PieceSelector>,
    // sticky, readable without the lock
    have_any_data: AtomicBool,
    state: Mutex<State<P>>,
}

struct State<P: Peer> {
    bitfield: Vec<u8>,
    complete_pieces: usize,
    registry: PeerRegistry<P>,
    assignments: Assignments<P>,
}

impl<P: Peer, C: ChunkDescriptor> PieceManager<P, C> {
    /// Builds a manager over one chunk per piece, seeding the local bitfield
    /// from chunks that are already verified on disk.
    pub fn new(selector: Box<dyn PieceSelector>, chunks: Vec<C>) -> Self {
        let piece_count = chunks.len();
        let statuses: Vec<bool> = chunks
            .iter()
            .map(|c| c.status() == DataStatus::Verified)
            .collect();
        let complete_pieces = statuses.iter().filter(|&&s| s).count();
        Self {
            chunks,
            selector,
            have_any_data: AtomicBool::new(complete_pieces > 0),
            state: Mutex::new(State {
                bitfield: bitfield::encode(&statuses),
                complete_pieces,
                registry: PeerRegistry::new(piece_count),
                assignments: Assignments::new(),
            }),
        }
    }

    pub fn piece_count(&self) -> usize {
        self.chunks.len()
    }

    /// True once any piece has ever verified locally. Never reverts.
    pub fn have_any_data(&self) -> bool {
        self.have_any_data.load(Ordering::Relaxed)
    }

    /// A copy of the local completion bitfield; later completions are not
    /// visible through it.
    pub fn local_bitfield(&self) -> Bytes {
        Bytes::copy_from_slice(&self.state.lock().bitfield)
    }

    /// Registers or replaces the peer's full bitfield.
    pub fn peer_has_bitfield(&self, peer: P, peer_bitfield: Bytes) -> Result<(), PieceError> {
        let mut state = self.state.lock();
        if peer_bitfield.len() != state.bitfield.len() {
            return Err(PieceError::BitfieldSizeMismatch {
                expected: state.bitfield.len(),
                actual: peer_bitfield.len(),
            });
        }
        state.registry.set_bitfield(peer, peer_bitfield.to_vec());
        Ok(())
    }

    /// Records that the peer announced a single piece (a HAVE message).
    pub fn peer_has_piece(&self, peer: P, piece: usize) -> Result<(), PieceError> {
        self.validate_piece_index(piece)?;
        self.state.lock().registry.mark_piece(peer, piece);
        Ok(())
    }

    /// Checks whether a piece is complete, verifying its chunk on disk if it
    /// has not been verified before.
    ///
    /// An already complete piece returns true without re-verification. On a
    /// fresh successful verification the completion bit is set and any
    /// assignment for the piece is cleared. Hash mismatches and chunk store
    /// errors both come back as `Ok(false)`; the downloader re-requests.
    pub fn check_piece_completed(&self, piece: usize) -> Result<bool, PieceError> {
        self.validate_piece_index(piece)?;
        let mut state = self.state.lock();
        if bitfield::get_bit(&state.bitfield, piece)? {
            return Ok(true);
        }
        match self.chunks[piece].verify() {
            Ok(true) => {
                bitfield::set_bit(&mut state.bitfield, piece)?;
                self.have_any_data.store(true, Ordering::Relaxed);
                state.complete_pieces += 1;
                assert!(
                    state.complete_pieces <= self.chunks.len(),
                    "complete piece count {} exceeds piece count {}",
                    state.complete_pieces,
                    self.chunks.len()
                );
                state.assignments.remove_assignee(piece);
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(e) => {
                tracing::error!("failed to verify chunk for piece {}: {}", piece, e);
                Ok(false)
            }
        }
    }

    /// Probes whether a selection for this peer would currently succeed:
    /// the pipeline must produce a piece and that piece must be free.
    ///
    /// Never mutates assignment state; a closed holder counts as free since
    /// the next `select_piece_for_peer` would prune it.
    pub fn might_select_piece_for_peer(&self, peer: &P) -> bool {
        let mut state = self.state.lock();
        match Self::next_piece_for_peer(
            &mut state,
            self.selector.as_ref(),
            self.chunks.len(),
            peer,
        ) {
            Some(piece) => match state.assignments.assignee(piece) {
                Some(holder) => holder.is_closed(),
                None => true,
            },
            None => false,
        }
    }

    /// Returns the piece this peer should be downloading.
    ///
    /// Sticky: an existing assignment is returned unchanged until the piece
    /// completes or the peer disconnects. Otherwise runs the selection
    /// pipeline and records the assignment before returning, all under one
    /// lock acquisition. Returns None when the pipeline produces nothing or
    /// the produced piece is already held by another live peer.
    pub fn select_piece_for_peer(&self, peer: &P) -> Option<usize> {
        let mut state = self.state.lock();
        if let Some(assigned) = state.assignments.assigned_piece(peer) {
            return Some(assigned);
        }
        let piece = Self::next_piece_for_peer(
            &mut state,
            self.selector.as_ref(),
            self.chunks.len(),
            peer,
        )?;
        if state.assignments.assign(peer.clone(), piece) {
            Some(piece)
        } else {
            None
        }
    }

    /// The selection pipeline: prune disconnected peers, ask the strategy for
    /// an ordered candidate list, return the first candidate the requesting
    /// peer has.
    fn next_piece_for_peer(
        state: &mut State<P>,
        selector: &dyn PieceSelector,
        piece_count: usize,
        peer: &P,
    ) -> Option<usize> {
        let pruned = state.registry.prune_closed();
        if pruned > 0 {
            tracing::debug!("pruned {} disconnected peers from the registry", pruned);
        }
        let candidates = {
            let local = &state.bitfield;
            let valid =
                |i: usize| i < piece_count && !bitfield::get_bit(local, i).unwrap_or(false);
            selector.next_pieces(state.registry.stats(), PIECE_SELECTION_LIMIT, &valid)
        };
        let peer_bitfield = state.registry.bitfield(peer)?;
        candidates
            .into_iter()
            .find(|&i| bitfield::get_bit(peer_bitfield, i).unwrap_or(false))
    }

    /// Builds requests for every block of the piece that the chunk store does
    /// not already hold, in block order.
    pub fn build_requests_for_piece(&self, piece: usize) -> Result<Vec<BlockRequest>, PieceError> {
        self.validate_piece_index(piece)?;
        let chunk = &self.chunks[piece];
        let blocks = chunk.block_bitfield();
        let block_size = chunk.block_size();
        let piece_size = chunk.size();

        let mut requests = Vec::new();
        for block in 0..compute_block_count(piece_size, block_size) {
            // a bit missing from a short bitfield counts as an absent block
            let present = bitfield::get_bit(&blocks, block as usize).unwrap_or(false);
            if !present {
                let offset = block as u64 * block_size;
                let length = compute_block_length(piece_size, block, block_size);
                requests.push(BlockRequest::new(piece as u32, offset as u32, length));
            }
        }
        Ok(requests)
    }

    /// Number of pieces not yet verified complete.
    pub fn pieces_left(&self) -> usize {
        let state = self.state.lock();
        assert!(
            state.complete_pieces <= self.chunks.len(),
            "unexpected number of complete pieces: {} of {}",
            state.complete_pieces,
            self.chunks.len()
        );
        self.chunks.len() - state.complete_pieces
    }

    fn validate_piece_index(&self, piece: usize) -> Result<(), PieceError> {
        if piece >= self.chunks.len() {
            return Err(PieceError::InvalidPieceIndex(piece));
        }
        Ok(())
    }
}
