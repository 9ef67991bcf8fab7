//! Mutation operators (C4): five in-place structural perturbations.
//!
//! Each operator is independently gated by its percentage (interpreted as
//! a probability out of 100) and always leaves the cache invalidated,
//! even when it turns out to be a no-op — callers should not have to
//! reason about which branch ran.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::geometry::DistanceOracle;
use crate::individual::{Individual, DEPOT};

/// The five mutation percentages, each interpreted as "probability out of
/// 100 that this operator fires this call".
#[derive(Clone, Copy, Debug)]
pub struct MutationPercents {
    pub add_pct: f64,
    pub remove_pct: f64,
    pub swap_pct: f64,
    pub inv_pct: f64,
    pub scr_pct: f64,
}

const REMOVE_FLOOR: usize = 3;

fn roll<R: Rng + ?Sized>(rng: &mut R, pct: f64) -> bool {
    rng.gen_range(0.0..100.0) < pct
}

/// Best-insertion add: picks a random station not yet in the ring and
/// inserts it at the position minimising the insertion delta.
pub fn add_node<R: Rng + ?Sized>(ind: &mut Individual, oracle: &DistanceOracle, rng: &mut R) {
    let n = oracle.n() as u32;
    if ind.len() as u32 >= n {
        ind.invalidate();
        return;
    }

    let candidates: Vec<u32> = (1..=n).filter(|id| !ind.contains(*id)).collect();
    debug_assert!(!candidates.is_empty());
    let s = *candidates.choose(rng).unwrap();

    let ring = ind.ring();
    let m = ring.len();
    let mut best_pos = 0usize;
    let mut best_delta = f64::INFINITY;
    for p in 0..m {
        let a = ring[p];
        let b = ring[(p + 1) % m];
        let delta = oracle.dist(a, s) + oracle.dist(s, b) - oracle.dist(a, b);
        if delta < best_delta {
            best_delta = delta;
            best_pos = p;
        }
    }

    ind.ring_mut().insert(best_pos + 1, s);
}

/// Removes a uniformly chosen non-depot position, refusing to shrink the
/// ring below `REMOVE_FLOOR`.
pub fn remove_node<R: Rng + ?Sized>(ind: &mut Individual, rng: &mut R) {
    let m = ind.len();
    if m <= REMOVE_FLOOR {
        ind.invalidate();
        return;
    }

    let removable: Vec<usize> = (0..m).filter(|&p| ind.ring()[p] != DEPOT).collect();
    if removable.is_empty() {
        ind.invalidate();
        return;
    }
    let pos = *removable.choose(rng).unwrap();
    ind.ring_mut().remove(pos);
}

/// Swaps two distinct random positions.
pub fn swap<R: Rng + ?Sized>(ind: &mut Individual, rng: &mut R) {
    let m = ind.len();
    if m < 2 {
        ind.invalidate();
        return;
    }
    let i = rng.gen_range(0..m);
    let mut j = rng.gen_range(0..m);
    while j == i {
        j = rng.gen_range(0..m);
    }
    ind.ring_mut().swap(i, j);
}

/// Reverses a random sub-slice `[a..=b]`.
pub fn inversion<R: Rng + ?Sized>(ind: &mut Individual, rng: &mut R) {
    let m = ind.len();
    if m < 2 {
        ind.invalidate();
        return;
    }
    let (a, b) = random_span(m, rng);
    ind.ring_mut()[a..=b].reverse();
}

/// Fisher-Yates shuffles a random sub-slice `[a..=b]`.
pub fn scramble<R: Rng + ?Sized>(ind: &mut Individual, rng: &mut R) {
    let m = ind.len();
    if m < 2 {
        ind.invalidate();
        return;
    }
    let (a, b) = random_span(m, rng);
    ind.ring_mut()[a..=b].shuffle(rng);
}

fn random_span<R: Rng + ?Sized>(m: usize, rng: &mut R) -> (usize, usize) {
    let mut a = rng.gen_range(0..m);
    let mut b = rng.gen_range(0..m);
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }
    (a, b)
}

/// Applies the five operators, in fixed order, each independently gated
/// by its percentage.
pub fn apply_mutations<R: Rng + ?Sized>(
    ind: &mut Individual,
    oracle: &DistanceOracle,
    percents: &MutationPercents,
    rng: &mut R,
) {
    if roll(rng, percents.add_pct) {
        add_node(ind, oracle, rng);
    }
    if roll(rng, percents.remove_pct) {
        remove_node(ind, rng);
    }
    if roll(rng, percents.swap_pct) {
        swap(ind, rng);
    }
    if roll(rng, percents.inv_pct) {
        inversion(ind, rng);
    }
    if roll(rng, percents.scr_pct) {
        scramble(ind, rng);
    }
}
