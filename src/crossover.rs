//! Slice crossover (C5): produces a child ring from two parents.
//!
//! Copies a random slice from parent A, then appends whatever of parent
//! B hasn't already been used, and finally restores the depot if the
//! slice happened to exclude it.

use rand::Rng;
use std::collections::HashSet;

use crate::individual::{Individual, DEPOT};

/// Builds a child ring from two parent rings (§4.3).
pub fn slice_crossover<R: Rng + ?Sized>(a: &Individual, b: &Individual, rng: &mut R) -> Individual {
    let ring_a = a.ring();
    let ring_b = b.ring();
    let bound = ring_a.len().min(ring_b.len());

    let mut c1 = rng.gen_range(0..bound);
    let mut c2 = rng.gen_range(0..bound);
    if c1 > c2 {
        std::mem::swap(&mut c1, &mut c2);
    }

    let mut used: HashSet<u32> = HashSet::with_capacity(ring_a.len() + ring_b.len());
    let mut child: Vec<u32> = ring_a[c1..=c2].to_vec();
    for &id in &child {
        used.insert(id);
    }

    for &id in ring_b {
        if used.insert(id) {
            child.push(id);
        }
    }

    if !child.contains(&DEPOT) {
        child.insert(0, DEPOT);
    }

    Individual::new(child)
}
