//! ringstar-solver - parallel island-model memetic optimiser for the
//! Ring Star Problem.
//!
//! A fixed number of species (islands) evolve independently per
//! generation across a `rayon` thread pool; each species runs slice
//! crossover, structural mutation, and bounded 2-opt local search over
//! its own population before the orchestrator checks the wall-clock
//! budget and starts the next generation.

pub mod config;
pub mod cost;
pub mod crossover;
pub mod error;
pub mod geometry;
pub mod individual;
pub mod io;
pub mod local_search;
pub mod mutation;
pub mod orchestrator;
pub mod pool;
pub mod rng;
pub mod species;

pub use config::RunConfig;
pub use error::{Result, RspError};
pub use geometry::{DistanceOracle, Station};
pub use individual::{Individual, DEPOT};
pub use orchestrator::{run, RunOutcome};
pub use species::Species;

/// Initialises the global `tracing` subscriber from a log level string
/// (e.g. `"info"`, `"debug"`). Safe to call more than once; later calls
/// are no-ops.
pub fn setup_logging(level: &str) {
    let _ = tracing_subscriber::fmt().with_env_filter(level.to_string()).try_init();
}
