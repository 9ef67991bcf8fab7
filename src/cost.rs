//! Cost kernel (C3): ring cost, out-of-ring assignment cost, and their sum.
//!
//! The out-of-ring kernel is the hot loop this crate cares most about: one
//! O(N) bitset build, then one ranking-list scan per non-member station
//! that stops at the first ring hit. No allocation beyond the bitset.

use crate::geometry::DistanceOracle;
use crate::individual::Individual;

/// The fixed model constant from the objective: ring edges are weighted
/// by `alpha`, outside-assignment edges by `10 - alpha`.
pub const WEIGHT_TOTAL: f64 = 10.0;

/// Sum of Euclidean edge lengths around the closed ring, weighted by
/// `alpha`. Zero for rings of length <= 1 (never constructed in practice,
/// but the contract is explicit).
pub fn ring_cost(ring: &[u32], alpha: f64, oracle: &DistanceOracle) -> f64 {
    let m = ring.len();
    if m <= 1 {
        return 0.0;
    }
    let mut sum = 0.0;
    for k in 0..m {
        let a = ring[k];
        let b = ring[(k + 1) % m];
        sum += oracle.dist(a, b);
    }
    alpha * sum
}

/// A bitset over station ids `1..=n` used to test ring membership in O(1).
struct MembershipBitset {
    bits: Vec<bool>,
}

impl MembershipBitset {
    fn build(ring: &[u32], n: usize) -> Self {
        let mut bits = vec![false; n + 1];
        for &id in ring {
            bits[id as usize] = true;
        }
        MembershipBitset { bits }
    }

    #[inline]
    fn contains(&self, id: u32) -> bool {
        self.bits[id as usize]
    }
}

/// For every station not in the ring, find its nearest ring member via
/// the precomputed ranking list and add `(10 - alpha) * dist`. Returns 0
/// if the ring already covers every station.
pub fn out_of_ring_cost(ring: &[u32], alpha: f64, oracle: &DistanceOracle) -> f64 {
    let n = oracle.n();
    let member = MembershipBitset::build(ring, n);
    let weight = WEIGHT_TOTAL - alpha;

    let mut sum = 0.0;
    for s in 1..=n as u32 {
        if member.contains(s) {
            continue;
        }
        let nearest = oracle
            .rank(s)
            .iter()
            .map(|&row| row + 1)
            .find(|&candidate| member.contains(candidate))
            .expect("ring is non-empty, so every station has a ring member in its ranking");
        sum += oracle.dist(s, nearest);
    }
    weight * sum
}

/// `ring_cost + out_of_ring_cost`.
pub fn total_cost(ring: &[u32], alpha: f64, oracle: &DistanceOracle) -> f64 {
    ring_cost(ring, alpha, oracle) + out_of_ring_cost(ring, alpha, oracle)
}

/// Returns the Individual's cost, using the cache if valid, otherwise
/// computing and memoising it.
pub fn evaluate(ind: &mut Individual, alpha: f64, oracle: &DistanceOracle) -> f64 {
    if !ind.is_dirty() {
        return ind.cached_cost();
    }
    let cost = total_cost(ind.ring(), alpha, oracle);
    ind.set_cached_cost(cost);
    cost
}

/// Evaluates every Individual in a species, using cached values where
/// present. No ordering requirement among individuals (see §4.1).
pub fn evaluate_all(individuals: &mut [Individual], alpha: f64, oracle: &DistanceOracle) -> Vec<f64> {
    individuals
        .iter_mut()
        .map(|ind| evaluate(ind, alpha, oracle))
        .collect()
}
