use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::network::NetworkSettings;
use crate::solvers::gillespie::WaitingTime;

/// Which solver a scoring generation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolverKind {
    #[default]
    Deterministic,
    Stochastic,
}

/// Full configuration of one experiment run. Serialized as
/// `<outdir>/<pid>/config.json` so a run can be reproduced from its
/// output tree (together with `seed`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    // population
    pub cells: usize,
    pub generations: u64,
    pub scoring_interval: u64,

    // kinetic rate interval
    pub min_rate: f64,
    pub max_rate: f64,

    // mutation caps
    pub max_basic: usize,
    pub max_ptm: usize,
    pub max_complex: usize,
    pub max_promoter: usize,

    // numeric knobs
    pub initial_conc: f64,
    pub t_limit: f64,
    pub h_step: f64,
    pub hill: u32,

    // solver selection
    pub solver: SolverKind,
    pub exponential_wait: bool,

    // reproducibility: base seed for the per-cell RNG streams
    pub seed: Option<u64>,

    // output selection
    pub outdir: PathBuf,
    pub graphviz: bool,
    pub gnuplot: bool,
    pub output_all: bool,
    pub csv_cell: bool,
    pub csv_data: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cells: 2,
            generations: 10,
            scoring_interval: 1,
            min_rate: 0.0,
            max_rate: 1.0,
            max_basic: 1,
            max_ptm: 1,
            max_complex: 1,
            max_promoter: 1,
            initial_conc: 0.0,
            t_limit: 20.0,
            h_step: 0.05,
            hill: 1,
            solver: SolverKind::Deterministic,
            exponential_wait: false,
            seed: None,
            outdir: PathBuf::from("output"),
            graphviz: false,
            gnuplot: false,
            output_all: false,
            csv_cell: false,
            csv_data: false,
        }
    }
}

impl SimConfig {
    /// Reject configurations the solvers would refuse anyway, before
    /// any cell is built.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.cells == 0 {
            return Err(SimError::NumericDomain("population must not be empty".into()));
        }
        if self.scoring_interval == 0 {
            return Err(SimError::NumericDomain(
                "scoring interval must be at least 1".into(),
            ));
        }
        if !self.h_step.is_finite() || self.h_step <= 0.0 {
            return Err(SimError::NumericDomain(format!(
                "step size must be positive and finite, got {}",
                self.h_step
            )));
        }
        if !self.t_limit.is_finite() || self.t_limit < 0.0 {
            return Err(SimError::NumericDomain(format!(
                "time limit must be non-negative and finite, got {}",
                self.t_limit
            )));
        }
        if self.min_rate < 0.0 || self.max_rate <= self.min_rate {
            return Err(SimError::NumericDomain(format!(
                "rate interval must satisfy 0 <= min < max, got [{}, {}]",
                self.min_rate, self.max_rate
            )));
        }
        if self.initial_conc < 0.0 {
            return Err(SimError::NumericDomain(format!(
                "initial concentration must be non-negative, got {}",
                self.initial_conc
            )));
        }
        Ok(())
    }

    /// Per-network slice of this configuration.
    pub fn network_settings(&self) -> NetworkSettings {
        NetworkSettings {
            max_basic: self.max_basic,
            max_ptm: self.max_ptm,
            max_complex: self.max_complex,
            max_promoter: self.max_promoter,
            min_rate: self.min_rate,
            max_rate: self.max_rate,
            h_step: self.h_step,
            t_limit: self.t_limit,
            initial_conc: self.initial_conc,
            hill: self.hill,
        }
    }

    #[inline]
    pub fn waiting_time(&self) -> WaitingTime {
        if self.exponential_wait {
            WaitingTime::Exponential
        } else {
            WaitingTime::Uniform
        }
    }
}
