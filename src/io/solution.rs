//! Solution writer and the stubbed visualisation hook (§4.11).

use std::fmt::Write as _;
use std::path::Path;

use crate::cost::total_cost;
use crate::error::{Result, RspError};
use crate::geometry::DistanceOracle;
use crate::individual::Individual;

/// Renders the `Genetic_Solution.txt` contract described in §6 and
/// writes it to `path`.
pub fn write_solution(path: &Path, best: &Individual, alpha: f64, oracle: &DistanceOracle) -> Result<()> {
    let text = render_solution(best, alpha, oracle);
    std::fs::write(path, text).map_err(|e| RspError::Resource(format!("writing solution {path:?}: {e}")))
}

fn render_solution(best: &Individual, alpha: f64, oracle: &DistanceOracle) -> String {
    let n = oracle.n();
    let cost = total_cost(best.ring(), alpha, oracle);
    let member: Vec<bool> = {
        let mut bits = vec![false; n + 1];
        for &id in best.ring() {
            bits[id as usize] = true;
        }
        bits
    };

    let mut out = String::new();
    let _ = writeln!(out, "DIMENSION: {n}");
    let _ = writeln!(out, "ALPHA: {alpha}");
    let _ = writeln!(out, "BEST_COST: {cost}");

    let _ = write!(out, "RING:");
    for &id in best.ring() {
        let _ = write!(out, " {id}");
    }
    let _ = writeln!(out, " {}", crate::individual::DEPOT);

    let outsiders: Vec<u32> = (1..=n as u32).filter(|id| !member[*id as usize]).collect();
    if outsiders.is_empty() {
        let _ = writeln!(out, "ASSIGNMENTS: none");
    } else {
        let _ = writeln!(out, "ASSIGNMENTS:");
        for s in outsiders {
            let nearest = oracle
                .rank(s)
                .iter()
                .map(|&row| row + 1)
                .find(|&candidate| member[candidate as usize])
                .expect("ring is non-empty");
            let _ = writeln!(out, "{s} -> {nearest}");
        }
    }

    out
}

/// Out of scope: HTML/SVG rendering has no bearing on optimiser
/// correctness, so this is a deliberate no-op kept for interface parity
/// with the external writer described in §6.
pub fn write_visualisation(_path: &Path, _best: &Individual, _oracle: &DistanceOracle) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Station;

    fn square() -> DistanceOracle {
        let stations = vec![
            Station { id: 1, x: 0.0, y: 0.0 },
            Station { id: 2, x: 10.0, y: 0.0 },
            Station { id: 3, x: 10.0, y: 10.0 },
            Station { id: 4, x: 0.0, y: 10.0 },
            Station { id: 5, x: 5.0, y: 5.0 },
        ];
        DistanceOracle::build(&stations).unwrap()
    }

    #[test]
    fn renders_full_ring_with_no_assignments() {
        let oracle = square();
        let best = Individual::new(vec![1, 2, 3, 4, 5]);
        let text = render_solution(&best, 3.0, &oracle);
        assert!(text.contains("DIMENSION: 5"));
        assert!(text.contains("ALPHA: 3"));
        assert!(text.contains("RING: 1 2 3 4 5 1"));
        assert!(text.contains("ASSIGNMENTS: none"));
    }

    #[test]
    fn renders_assignments_for_excluded_stations() {
        let oracle = square();
        let best = Individual::new(vec![1, 2, 3, 4]);
        let text = render_solution(&best, 3.0, &oracle);
        assert!(text.contains("RING: 1 2 3 4 1"));
        assert!(text.contains("5 -> "));
    }

    #[test]
    fn visualisation_is_a_noop() {
        let oracle = square();
        let best = Individual::new(vec![1, 2, 3, 4, 5]);
        assert!(write_visualisation(Path::new("/nonexistent/ignored.svg"), &best, &oracle).is_ok());
    }
}
