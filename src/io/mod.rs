//! Dataset and solution I/O (C13).

pub mod dataset;
pub mod solution;

pub use dataset::load_dataset;
pub use solution::{write_solution, write_visualisation};
