//! 2-opt local search (C6).
//!
//! The decision only needs ring edge weights — alpha cancels out of the
//! comparison between two candidate rings' edge sets — so both variants
//! take the oracle directly rather than the (alpha, oracle) pair the
//! cost kernel needs.

use crate::geometry::DistanceOracle;
use crate::individual::Individual;

const EPSILON: f64 = 1e-9;

/// Delta-cost of replacing edges `(r[i], r[i+1])` and
/// `(r[j], r[(j+1) mod m])` with `(r[i], r[j])` and
/// `(r[i+1], r[(j+1) mod m])`.
fn delta(ring: &[u32], oracle: &DistanceOracle, i: usize, j: usize) -> f64 {
    let m = ring.len();
    let a = ring[i];
    let b = ring[i + 1];
    let c = ring[j];
    let d = ring[(j + 1) % m];
    oracle.dist(a, c) + oracle.dist(b, d) - oracle.dist(a, b) - oracle.dist(c, d)
}

/// Runs one first-improvement sweep over all `(i, j)` pairs; applies the
/// first improving move it finds and returns immediately. Returns
/// whether a move was applied.
fn first_improving_sweep(ring: &mut Vec<u32>, oracle: &DistanceOracle) -> bool {
    let m = ring.len();
    if m <= 3 {
        return false;
    }
    for i in 0..m {
        for j in (i + 1)..m {
            if delta(ring, oracle, i, j) < -EPSILON {
                ring[i + 1..=j].reverse();
                return true;
            }
        }
    }
    false
}

/// Exhaustive first-improvement 2-opt: sweeps until a full pass yields no
/// improving move. Used once during population seeding (§4.7).
pub fn two_opt_exhaustive(ind: &mut Individual, oracle: &DistanceOracle) {
    if ind.len() <= 3 {
        return;
    }
    let mut ring = ind.ring().to_vec();
    let mut improved = true;
    while improved {
        improved = first_improving_sweep(&mut ring, oracle);
    }
    *ind.ring_mut() = ring;
}

/// Bounded first-improvement 2-opt: at most `max_sweeps` full sweeps.
/// Used on every offspring during evolution to cap per-generation cost.
pub fn two_opt_bounded(ind: &mut Individual, oracle: &DistanceOracle, max_sweeps: usize) {
    if ind.len() <= 3 {
        return;
    }
    let mut ring = ind.ring().to_vec();
    for _ in 0..max_sweeps {
        if !first_improving_sweep(&mut ring, oracle) {
            break;
        }
    }
    *ind.ring_mut() = ring;
}

/// The per-call sweep cap used during evolution: proportional to ring
/// length, with a small floor so short rings still get a chance to
/// settle.
pub fn bounded_sweep_budget(ring_len: usize) -> usize {
    (ring_len / 4).max(2)
}

/// True iff no single 2-opt move on `ring` would strictly improve it.
/// Used to check the exhaustive variant's fixed-point property.
pub fn is_two_opt_local_optimum(ring: &[u32], oracle: &DistanceOracle) -> bool {
    let m = ring.len();
    if m <= 3 {
        return true;
    }
    for i in 0..m {
        for j in (i + 1)..m {
            if delta(ring, oracle, i, j) < -EPSILON {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::ring_cost;
    use crate::geometry::Station;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn square() -> DistanceOracle {
        let stations = vec![
            Station { id: 1, x: 0.0, y: 0.0 },
            Station { id: 2, x: 10.0, y: 0.0 },
            Station { id: 3, x: 10.0, y: 10.0 },
            Station { id: 4, x: 0.0, y: 10.0 },
        ];
        DistanceOracle::build(&stations).unwrap()
    }

    /// Scenario 5: one move on [1,3,2,4] fixes the crossed diagonals.
    #[test]
    fn scenario_single_move_fixes_crossed_square() {
        let oracle = square();
        let mut ind = Individual::new(vec![1, 3, 2, 4]);
        two_opt_exhaustive(&mut ind, &oracle);
        let cost = ring_cost(ind.ring(), 1.0, &oracle);
        assert!((cost - 40.0).abs() < 1e-9, "expected edge-sum 40, got {cost}");
    }

    /// Scenario 1: exhaustive 2-opt from any starting permutation reaches
    /// edge-sum 40 (cost 120 at alpha=3) on the unit square.
    #[test]
    fn scenario_square_converges_from_any_permutation() {
        let oracle = square();
        let mut rng = XorShiftRng::seed_from_u64(99);
        let mut base = vec![1u32, 2, 3, 4];
        for _ in 0..20 {
            base.shuffle(&mut rng);
            let mut ring = base.clone();
            if !ring.contains(&1) {
                continue;
            }
            let mut ind = Individual::new(ring.clone());
            two_opt_exhaustive(&mut ind, &oracle);
            let cost = ring_cost(ind.ring(), 3.0, &oracle);
            assert!((cost - 120.0).abs() < 1e-6, "got {cost} from {ring:?}");
            ring.clear();
        }
    }

    #[test]
    fn exhaustive_never_increases_cost() {
        let oracle = square();
        let mut rng = XorShiftRng::seed_from_u64(5);
        let mut base = vec![1u32, 2, 3, 4];
        for _ in 0..30 {
            base.shuffle(&mut rng);
            if !base.contains(&1) {
                continue;
            }
            let mut ind = Individual::new(base.clone());
            let before = ring_cost(ind.ring(), 4.0, &oracle);
            two_opt_exhaustive(&mut ind, &oracle);
            let after = ring_cost(ind.ring(), 4.0, &oracle);
            assert!(after <= before + 1e-9);
        }
    }

    #[test]
    fn exhaustive_reaches_fixed_point() {
        let oracle = square();
        let mut ind = Individual::new(vec![1, 3, 2, 4]);
        two_opt_exhaustive(&mut ind, &oracle);
        assert!(is_two_opt_local_optimum(ind.ring(), &oracle));
    }

    #[test]
    fn bounded_never_increases_cost() {
        let oracle = square();
        let mut ind = Individual::new(vec![1, 3, 2, 4]);
        let before = ring_cost(ind.ring(), 2.0, &oracle);
        two_opt_bounded(&mut ind, &oracle, 3);
        let after = ring_cost(ind.ring(), 2.0, &oracle);
        assert!(after <= before + 1e-9);
    }

    #[test]
    fn short_rings_are_noop() {
        let oracle = square();
        let mut ind = Individual::new(vec![1, 2, 3]);
        let before = ind.ring().to_vec();
        two_opt_exhaustive(&mut ind, &oracle);
        assert_eq!(ind.ring(), before.as_slice());
    }

    #[test]
    fn preserves_depot_and_distinctness() {
        let oracle = square();
        let mut ind = Individual::new(vec![1, 3, 2, 4]);
        two_opt_exhaustive(&mut ind, &oracle);
        assert!(ind.contains(1));
        let mut sorted = ind.ring().to_vec();
        sorted.sort();
        assert_eq!(sorted, vec![1, 2, 3, 4]);
    }
}
