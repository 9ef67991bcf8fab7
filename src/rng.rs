//! Per-task deterministic randomness.
//!
//! Sharing one RNG across rayon workers is forbidden by the concurrency
//! model (correctness + contention). Instead every `evolve_specie` call
//! builds its own `XorShiftRng` seeded from the master seed, the
//! generation counter, and the species index. Two runs with the same
//! seed produce the same per-species trajectory regardless of how many
//! worker threads rayon happens to use (see the "parallel equivalence"
//! property).

use rand_xorshift::XorShiftRng;
use rand::SeedableRng;

/// Mixes three integers into a 128-bit seed using SplitMix64-style
/// multiplicative mixing. Cheap, and collisions across (generation,
/// species_index) pairs are not a correctness concern here.
fn mix(seed: u64, generation: u64, species_index: u64) -> [u8; 16] {
    const GOLDEN: u64 = 0x9E37_79B9_7F4A_7C15;

    let mut state = seed ^ GOLDEN;
    let mut stream = |x: u64| -> u64 {
        state = state.wrapping_add(x.wrapping_mul(GOLDEN));
        let mut z = state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    };

    let lo = stream(generation);
    let hi = stream(species_index);

    let mut bytes = [0u8; 16];
    bytes[0..8].copy_from_slice(&lo.to_le_bytes());
    bytes[8..16].copy_from_slice(&hi.to_le_bytes());
    bytes
}

/// Builds the deterministic RNG for one `(generation, species_index)` task.
pub fn task_rng(master_seed: u64, generation: u64, species_index: usize) -> XorShiftRng {
    let seed_bytes = mix(master_seed, generation, species_index as u64);
    XorShiftRng::from_seed(seed_bytes)
}
