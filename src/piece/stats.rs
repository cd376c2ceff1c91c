use crate::bitfield;

/// Per-piece rarity counts: how many known peers have each piece.
#[derive(Debug)]
pub struct PieceStats {
    counts: Vec<u32>,
}

impl PieceStats {
    pub fn new(piece_count: usize) -> Self {
        Self {
            counts: vec![0; piece_count],
        }
    }

    /// Folds a whole peer bitfield into the counts.
    pub fn add_bitfield(&mut self, bytes: &[u8]) {
        for i in 0..self.counts.len() {
            if bitfield::get_bit(bytes, i).unwrap_or(false) {
                self.counts[i] += 1;
            }
        }
    }

    /// Subtracts a previously added peer bitfield from the counts.
    pub fn remove_bitfield(&mut self, bytes: &[u8]) {
        for i in 0..self.counts.len() {
            if bitfield::get_bit(bytes, i).unwrap_or(false) {
                self.remove_piece(i);
            }
        }
    }

    pub fn add_piece(&mut self, index: usize) {
        self.counts[index] += 1;
    }

    fn remove_piece(&mut self, index: usize) {
        assert!(
            self.counts[index] > 0,
            "rarity count underflow for piece {index}"
        );
        self.counts[index] -= 1;
    }

    pub fn count(&self, index: usize) -> u32 {
        self.counts[index]
    }

    /// Total number of pieces tracked.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
