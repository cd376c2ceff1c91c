use crate::peer::Peer;
use std::collections::HashMap;

/// Bidirectional exclusive mapping between peers and the single piece each
/// one is currently downloading.
///
/// Invariants: a peer holds at most one piece, a piece is held by at most one
/// peer, and both directions of the mapping agree after every mutation.
#[derive(Debug)]
pub struct Assignments<P: Peer> {
    by_peer: HashMap<P, usize>,
    by_piece: HashMap<usize, P>,
}

impl<P: Peer> Assignments<P> {
    pub fn new() -> Self {
        Self {
            by_peer: HashMap::new(),
            by_piece: HashMap::new(),
        }
    }

    /// Drops entries whose peer connection reports closed.
    pub fn prune_closed(&mut self) {
        let by_piece = &mut self.by_piece;
        self.by_peer.retain(|peer, piece| {
            if peer.is_closed() {
                by_piece.remove(piece);
                false
            } else {
                true
            }
        });
    }

    /// Assigns `piece` to `peer` after pruning closed peers.
    ///
    /// Returns false without changing anything when the piece is already held
    /// by a different live peer. A peer re-assigning its own piece succeeds,
    /// and a prior assignment of the same peer to another piece is dropped
    /// from both directions.
    pub fn assign(&mut self, peer: P, piece: usize) -> bool {
        self.prune_closed();
        if let Some(holder) = self.by_piece.get(&piece) {
            if *holder != peer {
                return false;
            }
        }
        if let Some(previous) = self.by_peer.insert(peer.clone(), piece) {
            if previous != piece {
                self.by_piece.remove(&previous);
            }
        }
        self.by_piece.insert(piece, peer);
        true
    }

    pub fn assigned_piece(&self, peer: &P) -> Option<usize> {
        self.by_peer.get(peer).copied()
    }

    pub fn assignee(&self, piece: usize) -> Option<&P> {
        self.by_piece.get(&piece)
    }

    /// Clears the assignment for a piece, if any.
    pub fn remove_assignee(&mut self, piece: usize) {
        if let Some(peer) = self.by_piece.remove(&piece) {
            self.by_peer.remove(&peer);
        }
    }
}

impl<P: Peer> Default for Assignments<P> {
    fn default() -> Self {
        Self::new()
    }
}
