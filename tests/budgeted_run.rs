//! End-to-end budgeted run: exercises the whole orchestrator loop over a
//! small dataset within a short wall-clock budget.

use ringstar_solver::config::RunConfig;
use ringstar_solver::geometry::{DistanceOracle, Station};
use ringstar_solver::{cost, local_search, orchestrator, DEPOT};

fn small_instance() -> Vec<Station> {
    // A ring of 8 stations around a circle plus a couple of interior
    // points, small enough to keep the test fast.
    let mut stations = Vec::new();
    for i in 0..8u32 {
        let angle = std::f64::consts::TAU * (i as f64) / 8.0;
        stations.push(Station {
            id: i + 1,
            x: 50.0 * angle.cos(),
            y: 50.0 * angle.sin(),
        });
    }
    stations.push(Station { id: 9, x: 5.0, y: 5.0 });
    stations.push(Station { id: 10, x: -5.0, y: -5.0 });
    stations
}

/// Scenario 6: a short budgeted run completes at least one generation
/// and its solution is no worse than the best initial individual's
/// post-2-opt cost.
#[test]
fn budgeted_run_matches_or_beats_seeded_baseline() {
    let stations = small_instance();
    let oracle = DistanceOracle::build(&stations).unwrap();

    let mut cfg = RunConfig::default();
    cfg.time_limit_secs = 2.0;
    cfg.species_count = 4;
    cfg.population_size = 20;
    cfg.elitism = 1;
    cfg.log_interval = 5;
    cfg.worker_count = 2;
    cfg.alpha = 5;
    cfg.validate().unwrap();

    // Baseline: one individual covering every station, polished with
    // exhaustive 2-opt, the same seeding improvement the orchestrator
    // applies to a fifth of its species.
    let mut baseline = ringstar_solver::Individual::new((1..=stations.len() as u32).collect());
    local_search::two_opt_exhaustive(&mut baseline, &oracle);
    let baseline_cost = cost::total_cost(baseline.ring(), cfg.alpha as f64, &oracle);

    let outcome = orchestrator::run(&cfg, &stations).unwrap();

    assert!(outcome.generations_completed >= 1);
    assert!(outcome.best.contains(DEPOT));
    let mut sorted = outcome.best.ring().to_vec();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), outcome.best.len(), "ring must stay distinct");
    assert!(
        outcome.best_cost <= baseline_cost + 1e-6,
        "optimiser result {} should not be worse than seeded baseline {}",
        outcome.best_cost,
        baseline_cost
    );
}
