//! Thread pool (C8): a fixed `rayon::ThreadPool`, built once, driving one
//! generation's species array per `run_generation` call.
//!
//! Rayon's work-stealing scheduler gives us the atomic-claim-of-disjoint-
//! indices-plus-barrier contract directly: `par_iter_mut` enforces
//! exclusive access to each `Species` at compile time, so no hand-rolled
//! atomics or locks are needed anywhere on this path.

use rayon::prelude::*;

use crate::error::{Result, RspError};
use crate::geometry::DistanceOracle;
use crate::rng::task_rng;
use crate::species::{evolve_specie, EvolutionParams, Species};

/// Owns the worker threads for the whole run's lifetime.
pub struct EvolutionPool {
    pool: rayon::ThreadPool,
}

impl EvolutionPool {
    /// Builds a pool with exactly `workers` threads.
    pub fn build(workers: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| RspError::Resource(format!("failed to start thread pool: {e}")))?;
        Ok(EvolutionPool { pool })
    }

    /// Runs one generation: every species is evolved exactly once,
    /// concurrently, with a deterministic per-(generation, species index)
    /// RNG. Blocks until every species has completed (the barrier in
    /// §4.6).
    pub fn run_generation(
        &self,
        species: &mut [Species],
        oracle: &DistanceOracle,
        params: &EvolutionParams,
        master_seed: u64,
        generation: u64,
    ) {
        self.pool.install(|| {
            species.par_iter_mut().enumerate().for_each(|(idx, s)| {
                let mut rng = task_rng(master_seed, generation, idx);
                evolve_specie(s, oracle, params, &mut rng);
            });
        });
    }
}
