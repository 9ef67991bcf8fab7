//! CLI entrypoint: parse config, load the dataset, run the optimiser,
//! write the solution file.

use std::path::PathBuf;
use std::process::ExitCode;

use ringstar_solver::config::RunConfig;
use ringstar_solver::io::{load_dataset, write_solution};
use ringstar_solver::{orchestrator, setup_logging};

fn run_cli() -> ringstar_solver::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut cfg = RunConfig::default();
    cfg.apply_args(&args)?;
    cfg.validate()?;

    setup_logging(&cfg.log_level);

    let dataset_path = PathBuf::from(format!("datasets/{}.txt", cfg.dataset_id));
    let stations = load_dataset(&dataset_path)?;

    tracing::info!(
        dimension = stations.len(),
        alpha = cfg.alpha,
        species_count = cfg.species_count,
        population_size = cfg.population_size,
        time_limit_secs = cfg.time_limit_secs,
        "starting run"
    );

    let outcome = orchestrator::run(&cfg, &stations)?;

    tracing::info!(
        generations = outcome.generations_completed,
        best_cost = outcome.best_cost,
        "run complete"
    );

    let oracle = ringstar_solver::DistanceOracle::build(&stations)?;
    write_solution(
        &PathBuf::from("Genetic_Solution.txt"),
        &outcome.best,
        cfg.alpha as f64,
        &oracle,
    )?;

    Ok(())
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ringstar: {e}");
            ExitCode::FAILURE
        }
    }
}
