use super::stats::PieceStats;
use crate::bitfield;
use crate::peer::Peer;
use std::collections::HashMap;

/// Tracks which pieces each connected peer claims to have and keeps the
/// aggregate rarity counts in sync with the tracked bitfields.
#[derive(Debug)]
pub struct PeerRegistry<P: Peer> {
    bitfields: HashMap<P, Vec<u8>>,
    stats: PieceStats,
    bitfield_len: usize,
}

impl<P: Peer> PeerRegistry<P> {
    pub fn new(piece_count: usize) -> Self {
        Self {
            bitfields: HashMap::new(),
            stats: PieceStats::new(piece_count),
            bitfield_len: piece_count.div_ceil(8),
        }
    }

    /// Replaces the peer's known bitfield wholesale.
    ///
    /// The contribution of any previously tracked bitfield is subtracted
    /// before the new one is added, so a full BITFIELD message arriving after
    /// individual HAVE messages does not double-count.
    pub fn set_bitfield(&mut self, peer: P, bytes: Vec<u8>) {
        debug_assert_eq!(bytes.len(), self.bitfield_len);
        if let Some(old) = self.bitfields.get(&peer) {
            self.stats.remove_bitfield(old);
        }
        self.stats.add_bitfield(&bytes);
        self.bitfields.insert(peer, bytes);
    }

    /// Marks a single piece in the peer's tracked bitfield, creating an
    /// all-zero bitfield the first time the peer reports anything.
    ///
    /// Rarity only changes when the bit actually flips, so repeated HAVE
    /// messages for the same piece are idempotent.
    pub fn mark_piece(&mut self, peer: P, index: usize) {
        let bytes = self
            .bitfields
            .entry(peer)
            .or_insert_with(|| vec![0; self.bitfield_len]);
        let already = bitfield::get_bit(bytes, index).unwrap_or(false);
        if !already && bitfield::set_bit(bytes, index).is_ok() {
            self.stats.add_piece(index);
        }
    }

    /// Drops entries whose peer connection reports closed, subtracting each
    /// removed bitfield from the rarity counts. Returns how many were pruned.
    pub fn prune_closed(&mut self) -> usize {
        let stats = &mut self.stats;
        let before = self.bitfields.len();
        self.bitfields.retain(|peer, bytes| {
            if peer.is_closed() {
                stats.remove_bitfield(bytes);
                false
            } else {
                true
            }
        });
        before - self.bitfields.len()
    }

    pub fn bitfield(&self, peer: &P) -> Option<&[u8]> {
        self.bitfields.get(peer).map(|b| b.as_slice())
    }

    pub fn stats(&self) -> &PieceStats {
        &self.stats
    }
}
