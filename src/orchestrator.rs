//! Orchestrator (C9): seeds the population, drives the generation loop
//! against a wall-clock budget, and hands the final best ring to the
//! solution writer.

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::config::RunConfig;
use crate::cost::total_cost;
use crate::error::Result;
use crate::geometry::{DistanceOracle, Station};
use crate::individual::{Individual, DEPOT};
use crate::local_search::two_opt_exhaustive;
use crate::mutation::MutationPercents;
use crate::pool::EvolutionPool;
use crate::species::{EvolutionParams, Species};

/// Everything the orchestrator produces at the end of a run.
pub struct RunOutcome {
    pub best: Individual,
    pub best_cost: f64,
    pub generations_completed: u64,
}

/// Builds one randomly seeded Individual: target size `k = U{2..N}`,
/// depot first, then a Fisher-Yates-shuffled truncation of `{2..N}`.
fn random_individual<R: rand::Rng + ?Sized>(n: usize, rng: &mut R) -> Individual {
    let k = rng.gen_range(2..=n);
    let mut rest: Vec<u32> = (2..=n as u32).collect();
    rest.shuffle(rng);
    rest.truncate(k - 1);

    let mut ring = Vec::with_capacity(k);
    ring.push(DEPOT);
    ring.extend(rest);
    Individual::new(ring)
}

/// Seeds `species_count` species of `population_size` individuals each,
/// applying exhaustive 2-opt to every individual of every `seed_stride`-th
/// species (§4.7 step 4).
fn seed_population(cfg: &RunConfig, oracle: &DistanceOracle, rng: &mut impl rand::Rng) -> Vec<Species> {
    let n = oracle.n();
    (0..cfg.species_count)
        .map(|species_idx| {
            let mut individuals: Vec<Individual> = (0..cfg.population_size)
                .map(|_| random_individual(n, rng))
                .collect();
            if species_idx % cfg.seed_stride == 0 {
                for ind in &mut individuals {
                    two_opt_exhaustive(ind, oracle);
                }
            }
            Species::new(individuals)
        })
        .collect()
}

fn evolution_params(cfg: &RunConfig, mutation_rate: f64) -> EvolutionParams {
    EvolutionParams {
        alpha: cfg.alpha as f64,
        mutation_rate,
        elitism: cfg.elitism,
        percents: MutationPercents {
            add_pct: cfg.mutation_rates.add_pct,
            remove_pct: cfg.mutation_rates.remove_pct,
            swap_pct: cfg.mutation_rates.swap_pct,
            inv_pct: cfg.mutation_rates.inv_pct,
            scr_pct: cfg.mutation_rates.scr_pct,
        },
        pool_fraction: cfg.pool_fraction,
    }
}

/// Per-species bookkeeping the diversity controller needs between checks.
struct DiversityTracking {
    last_best: Vec<f64>,
    stagnant_checks: Vec<u32>,
}

impl DiversityTracking {
    fn new(species_count: usize) -> Self {
        DiversityTracking {
            last_best: vec![f64::INFINITY; species_count],
            stagnant_checks: vec![0; species_count],
        }
    }

    fn reset(&mut self, idx: usize) {
        self.last_best[idx] = f64::INFINITY;
        self.stagnant_checks[idx] = 0;
    }
}

/// Re-seeds at most one species when two distinct species have converged
/// to statistically the same best cost and both have been stagnant for
/// more than five checks.
fn run_diversity_controller(
    species: &mut [Species],
    tracking: &mut DiversityTracking,
    cfg: &RunConfig,
    oracle: &DistanceOracle,
    rng: &mut impl rand::Rng,
) {
    let costs: Vec<f64> = species
        .iter_mut()
        .map(|s| s.best_cost(cfg.alpha as f64, oracle))
        .collect();

    for (idx, &cost) in costs.iter().enumerate() {
        if (cost - tracking.last_best[idx]).abs() < 1e-9 {
            tracking.stagnant_checks[idx] += 1;
        } else {
            tracking.stagnant_checks[idx] = 0;
        }
        tracking.last_best[idx] = cost;
    }

    for i in 0..species.len() {
        for j in (i + 1)..species.len() {
            let close = (costs[i] - costs[j]).abs() < 0.01;
            let both_stagnant = tracking.stagnant_checks[i] > 5 && tracking.stagnant_checks[j] > 5;
            if close && both_stagnant {
                let n = oracle.n();
                let fresh: Vec<Individual> = (0..cfg.population_size)
                    .map(|_| random_individual(n, rng))
                    .collect();
                species[j] = Species::new(fresh);
                tracking.reset(j);
                tracing::info!(reseeded = j, peer = i, cost = costs[i], "diversity controller re-seeded species");
                return;
            }
        }
    }
}

/// The three stagnation escalation tiers from §4.7: multiplier and cap.
const STAGNATION_TIERS: [(u32, f64, f64); 3] = [(5, 1.20, 0.50), (10, 1.15, 0.70), (20, 1.10, 0.90)];

fn escalate_mutation_rate(rate: f64, consecutive_stagnant_reports: u32) -> f64 {
    let mut rate = rate;
    for &(threshold, multiplier, cap) in STAGNATION_TIERS.iter().rev() {
        if consecutive_stagnant_reports >= threshold {
            rate = (rate * multiplier).min(cap);
            break;
        }
    }
    rate
}

/// Runs the full algorithm against a wall-clock budget and returns the
/// best ring found.
pub fn run(cfg: &RunConfig, stations: &[Station]) -> Result<RunOutcome> {
    let oracle = DistanceOracle::build(stations)?;
    let mut seed_rng = XorShiftRng::seed_from_u64(cfg.seed);

    let mut species = seed_population(cfg, &oracle, &mut seed_rng);
    let pool = EvolutionPool::build(cfg.resolved_worker_count())?;

    let mut mutation_rate = cfg.base_mutation_rate;
    let mut global_best = f64::INFINITY;
    let mut stagnant_reports: u32 = 0;
    let mut tracking = DiversityTracking::new(cfg.species_count);

    let deadline = Instant::now() + Duration::from_secs_f64(cfg.time_limit_secs);
    let mut generation: u64 = 0;

    while Instant::now() < deadline {
        let gen_start = Instant::now();
        let params = evolution_params(cfg, mutation_rate);
        pool.run_generation(&mut species, &oracle, &params, cfg.seed, generation);
        generation += 1;

        if generation % cfg.log_interval == 0 {
            let best_this_round = species
                .iter_mut()
                .map(|s| s.best_cost(cfg.alpha as f64, &oracle))
                .fold(f64::INFINITY, f64::min);

            if best_this_round < global_best - 1e-9 {
                global_best = best_this_round;
                mutation_rate = cfg.base_mutation_rate;
                stagnant_reports = 0;
            } else {
                stagnant_reports += 1;
                if stagnant_reports % 5 == 0 {
                    mutation_rate = escalate_mutation_rate(mutation_rate, stagnant_reports);
                }
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            tracing::info!(
                generation,
                global_best,
                mutation_rate,
                remaining_secs = remaining.as_secs_f64(),
                "generation report"
            );
        }

        if generation % 10 == 0 {
            run_diversity_controller(&mut species, &mut tracking, cfg, &oracle, &mut seed_rng);
        }

        let gen_elapsed = gen_start.elapsed();
        let remaining = deadline.saturating_duration_since(Instant::now());
        if gen_elapsed > remaining {
            tracing::warn!(
                generation,
                gen_elapsed_secs = gen_elapsed.as_secs_f64(),
                "generation exceeded remaining budget; run will overshoot on its next boundary check"
            );
        }
    }

    let mut best_cost = f64::INFINITY;
    let mut best: Option<Individual> = None;
    for s in &mut species {
        let candidate = s.best_individual(cfg.alpha as f64, &oracle);
        let cost = total_cost(candidate.ring(), cfg.alpha as f64, &oracle);
        if cost < best_cost {
            best_cost = cost;
            best = Some(candidate.clone());
        }
    }

    Ok(RunOutcome {
        best: best.expect("species_count > 0 guarantees at least one candidate"),
        best_cost,
        generations_completed: generation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_config() -> RunConfig {
        let mut cfg = RunConfig::default();
        cfg.time_limit_secs = 1.0;
        cfg.species_count = 4;
        cfg.population_size = 20;
        cfg.elitism = 2;
        cfg.log_interval = 2;
        cfg.worker_count = 2;
        cfg
    }

    fn square_stations() -> Vec<Station> {
        vec![
            Station { id: 1, x: 0.0, y: 0.0 },
            Station { id: 2, x: 10.0, y: 0.0 },
            Station { id: 3, x: 10.0, y: 10.0 },
            Station { id: 4, x: 0.0, y: 10.0 },
            Station { id: 5, x: 5.0, y: 5.0 },
        ]
    }

    /// Scenario 6: a budgeted run completes at least one generation and
    /// produces a valid ring.
    #[test]
    fn budgeted_run_completes_and_produces_valid_ring() {
        let cfg = tiny_config();
        let stations = square_stations();
        let outcome = run(&cfg, &stations).unwrap();

        assert!(outcome.generations_completed >= 1);
        assert!(outcome.best.contains(DEPOT));
        let mut sorted = outcome.best.ring().to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), outcome.best.len());
        assert!(outcome.best_cost.is_finite());
    }

    #[test]
    fn escalation_caps_at_tier_bound() {
        let mut rate = 0.30;
        for _ in 0..100 {
            rate = escalate_mutation_rate(rate, 25);
        }
        assert!(rate <= 0.90 + 1e-9);
    }

    #[test]
    fn escalation_noop_below_first_tier() {
        assert_eq!(escalate_mutation_rate(0.30, 3), 0.30);
    }

    #[test]
    fn random_individual_always_includes_depot() {
        let oracle = DistanceOracle::build(&square_stations()).unwrap();
        let mut rng = XorShiftRng::seed_from_u64(1);
        for _ in 0..50 {
            let ind = random_individual(oracle.n(), &mut rng);
            assert!(ind.contains(DEPOT));
            assert!(ind.len() >= 2);
        }
    }
}
