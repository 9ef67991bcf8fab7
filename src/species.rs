//! Species (C7): a fixed-size sub-population and its one-generation
//! evolution step.
//!
//! `evolve_specie` is the unit of work rayon hands to one worker per
//! generation. It owns its `Species` exclusively for the call's
//! duration (see pool.rs) and touches nothing else mutable.

use rand::Rng;

use crate::cost::evaluate;
use crate::crossover::slice_crossover;
use crate::geometry::DistanceOracle;
use crate::individual::Individual;
use crate::local_search::{bounded_sweep_budget, two_opt_bounded};
use crate::mutation::{apply_mutations, MutationPercents};

/// A sub-population of `Individual`s evolved independently of every
/// other species within a generation.
#[derive(Clone, Debug)]
pub struct Species {
    individuals: Vec<Individual>,
}

impl Species {
    pub fn new(individuals: Vec<Individual>) -> Self {
        Species { individuals }
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn individuals_mut(&mut self) -> &mut [Individual] {
        &mut self.individuals
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// The lowest cost among the species' individuals, evaluating any
    /// that are still dirty. Empty species have no best; callers never
    /// construct one.
    pub fn best_cost(&mut self, alpha: f64, oracle: &DistanceOracle) -> f64 {
        self.individuals
            .iter_mut()
            .map(|ind| evaluate(ind, alpha, oracle))
            .fold(f64::INFINITY, f64::min)
    }

    /// The individual with the lowest cost, evaluating any that are
    /// still dirty.
    pub fn best_individual(&mut self, alpha: f64, oracle: &DistanceOracle) -> &Individual {
        for ind in &mut self.individuals {
            evaluate(ind, alpha, oracle);
        }
        self.individuals
            .iter()
            .min_by(|a, b| a.cached_cost().partial_cmp(&b.cached_cost()).unwrap())
            .expect("species is never empty")
    }
}

/// Every per-generation parameter `evolve_specie` needs, bundled so the
/// orchestrator can build it once per generation and hand a `&` copy to
/// every task.
#[derive(Clone, Copy, Debug)]
pub struct EvolutionParams {
    pub alpha: f64,
    pub mutation_rate: f64,
    pub elitism: usize,
    pub percents: MutationPercents,
    pub pool_fraction: f64,
}

/// Runs one generation of the algorithm in §4.5 on `species`, replacing
/// its individuals in place.
pub fn evolve_specie<R: Rng + ?Sized>(
    species: &mut Species,
    oracle: &DistanceOracle,
    params: &EvolutionParams,
    rng: &mut R,
) {
    let p = species.len();
    debug_assert!(p > 0, "species must not be empty");

    // 1. Evaluate + 2. Sort.
    let costs: Vec<f64> = species
        .individuals
        .iter_mut()
        .map(|ind| evaluate(ind, params.alpha, oracle))
        .collect();
    let mut order: Vec<usize> = (0..p).collect();
    order.sort_by(|&a, &b| costs[a].partial_cmp(&costs[b]).unwrap());

    // 3. Elitism.
    let e = params.elitism.min(p);
    let mut next: Vec<Individual> = order[..e]
        .iter()
        .map(|&i| species.individuals[i].clone())
        .collect();

    // 4. Mating pool.
    let pool_size = ((params.pool_fraction * p as f64).floor() as usize).clamp(2, p);
    let pool = &order[..pool_size];

    // 5. Breed.
    while next.len() < p {
        let i1 = pool[rng.gen_range(0..pool_size)];
        let i2 = pool[rng.gen_range(0..pool_size)];
        let parent1 = &species.individuals[i1];
        let parent2 = &species.individuals[i2];

        let mut child = slice_crossover(parent1, parent2, rng);

        let identical_to_parent1 = child.ring() == parent1.ring();
        if identical_to_parent1 || rng.gen_range(0.0..1.0) < params.mutation_rate {
            apply_mutations(&mut child, oracle, &params.percents, rng);
        }

        if child.len() >= 3 {
            two_opt_bounded(&mut child, oracle, bounded_sweep_budget(child.len()));
        }

        evaluate(&mut child, params.alpha, oracle);
        next.push(child);
    }

    // 6. Replace.
    species.individuals = next;
}
