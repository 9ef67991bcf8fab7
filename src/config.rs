//! Run configuration.
//!
//! Mirrors the "CLI / configuration" options in the system spec. Defaults
//! live on `Default`; a JSON overlay and a minimal `--key=value` argument
//! surface can each override fields afterwards. `validate` is the single
//! gate every run passes through before any thread is spawned.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RspError};

/// Mutation operator percentages, grouped because they are always passed
/// and validated together.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MutationRates {
    pub add_pct: f64,
    pub remove_pct: f64,
    pub swap_pct: f64,
    pub inv_pct: f64,
    pub scr_pct: f64,
}

impl Default for MutationRates {
    fn default() -> Self {
        MutationRates {
            add_pct: 15.0,
            remove_pct: 10.0,
            swap_pct: 15.0,
            inv_pct: 5.0,
            scr_pct: 5.0,
        }
    }
}

/// Every option recognised by the binary, with the spec's documented
/// defaults.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    pub time_limit_secs: f64,
    pub dataset_id: u32,
    pub alpha: u8,

    pub species_count: usize,
    pub population_size: usize,
    pub elitism: usize,

    pub log_interval: u64,
    pub mutation_rates: MutationRates,
    pub base_mutation_rate: f64,
    pub pool_fraction: f64,
    pub stagnation_limit: u32,
    pub seed_stride: usize,

    /// 0 means "use the available CPU count, capped by species_count".
    pub worker_count: usize,

    /// Master RNG seed; per-task generators are derived from this plus
    /// (generation, species index).
    pub seed: u64,

    pub log_level: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        let population_size = 200;
        RunConfig {
            time_limit_secs: 60.0,
            dataset_id: 1,
            alpha: 5,

            species_count: 30,
            population_size,
            elitism: (population_size as f64 * 0.05).max(1.0) as usize,

            log_interval: 150,
            mutation_rates: MutationRates::default(),
            base_mutation_rate: 0.30,
            pool_fraction: 0.5,
            stagnation_limit: 50,
            seed_stride: 5,

            worker_count: 0,
            seed: 0x5EED_1234_ABCD_EF01,
            log_level: "info".to_string(),
        }
    }
}

impl RunConfig {
    /// Merge a JSON file's fields on top of `self`.
    pub fn load_overlay(&mut self, path: &std::path::Path) -> Result<()> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| RspError::Input(format!("reading config overlay {path:?}: {e}")))?;
        *self = serde_json::from_str(&text)
            .map_err(|e| RspError::Input(format!("parsing config overlay {path:?}: {e}")))?;
        Ok(())
    }

    /// Parse a minimal `--key value` / `--key=value` argument surface.
    /// Unknown keys are rejected; this is an out-of-scope interface kept
    /// deliberately small.
    pub fn apply_args<S: AsRef<str>>(&mut self, args: &[S]) -> Result<()> {
        let mut iter = args.iter().map(|s| s.as_ref());
        while let Some(arg) = iter.next() {
            let (key, inline_value) = match arg.strip_prefix("--") {
                Some(rest) => match rest.split_once('=') {
                    Some((k, v)) => (k, Some(v.to_string())),
                    None => (rest, None),
                },
                None => {
                    return Err(RspError::Input(format!("unrecognised argument {arg:?}")));
                }
            };
            let value = match inline_value {
                Some(v) => v,
                None => iter
                    .next()
                    .ok_or_else(|| RspError::Input(format!("missing value for --{key}")))?
                    .to_string(),
            };
            self.apply_one(key, &value)?;
        }
        Ok(())
    }

    fn apply_one(&mut self, key: &str, value: &str) -> Result<()> {
        let parse_f64 = |v: &str| {
            v.parse::<f64>()
                .map_err(|e| RspError::Input(format!("--{key}: {e}")))
        };
        let parse_usize = |v: &str| {
            v.parse::<usize>()
                .map_err(|e| RspError::Input(format!("--{key}: {e}")))
        };
        match key {
            "time_limit" => self.time_limit_secs = parse_f64(value)?,
            "dataset_id" => self.dataset_id = value.parse().map_err(|e| RspError::Input(format!("--dataset_id: {e}")))?,
            "alpha" => self.alpha = value.parse().map_err(|e| RspError::Input(format!("--alpha: {e}")))?,
            "species_count" => self.species_count = parse_usize(value)?,
            "population_size" => self.population_size = parse_usize(value)?,
            "elitism" => self.elitism = parse_usize(value)?,
            "log_interval" => self.log_interval = value.parse().map_err(|e| RspError::Input(format!("--log_interval: {e}")))?,
            "base_mutation_rate" => self.base_mutation_rate = parse_f64(value)?,
            "pool_fraction" => self.pool_fraction = parse_f64(value)?,
            "stagnation_limit" => self.stagnation_limit = value.parse().map_err(|e| RspError::Input(format!("--stagnation_limit: {e}")))?,
            "seed_stride" => self.seed_stride = parse_usize(value)?,
            "worker_count" => self.worker_count = parse_usize(value)?,
            "seed" => self.seed = value.parse().map_err(|e| RspError::Input(format!("--seed: {e}")))?,
            "log_level" => self.log_level = value.to_string(),
            "config" => self.load_overlay(std::path::Path::new(value))?,
            other => return Err(RspError::Input(format!("unknown option --{other}"))),
        }
        Ok(())
    }

    /// Validate everything that must hold before any thread is spawned.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.alpha, 3 | 5 | 7 | 9) {
            return Err(RspError::Input(format!(
                "alpha must be one of 3, 5, 7, 9, got {}",
                self.alpha
            )));
        }
        if !(self.time_limit_secs > 0.0) {
            return Err(RspError::Input(format!(
                "time_limit must be positive, got {}",
                self.time_limit_secs
            )));
        }
        if self.species_count == 0 {
            return Err(RspError::Input("species_count must be > 0".to_string()));
        }
        if self.population_size < 2 {
            return Err(RspError::Input(format!(
                "population_size must be >= 2, got {}",
                self.population_size
            )));
        }
        if self.elitism > self.population_size {
            return Err(RspError::Input(
                "elitism cannot exceed population_size".to_string(),
            ));
        }
        if self.log_interval == 0 {
            return Err(RspError::Input("log_interval must be > 0".to_string()));
        }
        let m = &self.mutation_rates;
        for (name, pct) in [
            ("add_pct", m.add_pct),
            ("remove_pct", m.remove_pct),
            ("swap_pct", m.swap_pct),
            ("inv_pct", m.inv_pct),
            ("scr_pct", m.scr_pct),
        ] {
            if !(0.0..=100.0).contains(&pct) {
                return Err(RspError::Input(format!(
                    "{name} must be within [0, 100], got {pct}"
                )));
            }
        }
        if !(0.0 < self.pool_fraction && self.pool_fraction <= 1.0) {
            return Err(RspError::Input(format!(
                "pool_fraction must be within (0, 1], got {}",
                self.pool_fraction
            )));
        }
        Ok(())
    }

    /// Resolve `worker_count` against the available parallelism, capped by
    /// `species_count` as the spec requires.
    pub fn resolved_worker_count(&self) -> usize {
        let available = if self.worker_count > 0 {
            self.worker_count
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        };
        available.min(self.species_count).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(RunConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_alpha() {
        let mut cfg = RunConfig::default();
        cfg.alpha = 4;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_nonpositive_time_limit() {
        let mut cfg = RunConfig::default();
        cfg.time_limit_secs = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_population_size_below_two() {
        let mut cfg = RunConfig::default();
        cfg.population_size = 1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_log_interval() {
        let mut cfg = RunConfig::default();
        cfg.log_interval = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn apply_args_overrides_fields() {
        let mut cfg = RunConfig::default();
        cfg.apply_args(&["--alpha=7", "--species_count", "4"]).unwrap();
        assert_eq!(cfg.alpha, 7);
        assert_eq!(cfg.species_count, 4);
    }

    #[test]
    fn apply_args_rejects_unknown_key() {
        let mut cfg = RunConfig::default();
        assert!(cfg.apply_args(&["--bogus=1"]).is_err());
    }

    #[test]
    fn worker_count_capped_by_species_count() {
        let mut cfg = RunConfig::default();
        cfg.worker_count = 64;
        cfg.species_count = 3;
        assert_eq!(cfg.resolved_worker_count(), 3);
    }
}
