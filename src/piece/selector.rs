use super::stats::PieceStats;
use rand::seq::SliceRandom;

/// Priority ordering over candidate pieces.
///
/// The selection pipeline proposes pieces globally; per-peer applicability is
/// filtered afterwards by the registry, so implementations only see rarity
/// data and a validity predicate.
pub trait PieceSelector: Send + Sync {
    /// Returns up to `limit` piece indices in download-priority order.
    /// Every returned index must satisfy `valid`.
    fn next_pieces(
        &self,
        stats: &PieceStats,
        limit: usize,
        valid: &dyn Fn(usize) -> bool,
    ) -> Vec<usize>;
}

/// Prefers the pieces the fewest known peers have.
///
/// Pieces no peer has are never proposed. Equal counts are randomized so
/// concurrent downloaders spread across equally-rare pieces instead of all
/// converging on the lowest index.
#[derive(Debug, Default)]
pub struct RarestFirstSelector;

impl PieceSelector for RarestFirstSelector {
    fn next_pieces(
        &self,
        stats: &PieceStats,
        limit: usize,
        valid: &dyn Fn(usize) -> bool,
    ) -> Vec<usize> {
        let mut candidates: Vec<usize> = (0..stats.len())
            .filter(|&i| stats.count(i) > 0 && valid(i))
            .collect();
        // shuffle first; the stable sort then keeps the random order
        // within each rarity tier
        candidates.shuffle(&mut rand::rng());
        candidates.sort_by_key(|&i| stats.count(i));
        candidates.truncate(limit);
        candidates
    }
}
