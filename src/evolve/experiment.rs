use std::fs::{File, create_dir_all};
use std::io::Write;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::SimConfig;
use crate::error::SimError;
use crate::evolve::Cell;
use crate::output;

/// ==============================================================================================
/// ==================================== Experiment Runner =======================================
/// ==============================================================================================

/// A population of cells and a generation budget.
///
/// Per generation: mutate every cell; every `scoring_interval`-th
/// generation, re-solve and score every live cell, then emit outputs
/// for the best one (or for all with `output_all`). Mutation and
/// integration fan out across cells with rayon -- each cell carries an
/// independent RNG stream -- while emission stays on the driving
/// thread. Cells that hit a fatal solver error are logged and excluded
/// for the remainder of the run; the run itself always completes.
pub struct Experiment {
    cfg: SimConfig,
    cells: Vec<Cell>,
    pid: u32,
}

impl Experiment {
    pub fn new(cfg: SimConfig) -> Result<Self, SimError> {
        cfg.validate()?;
        let base_seed = cfg.seed.unwrap_or_else(rand::random);
        info!(
            cells = cfg.cells,
            generations = cfg.generations,
            interval = cfg.scoring_interval,
            seed = base_seed,
            "experiment created"
        );
        let cells = (0..cfg.cells)
            .map(|i| Cell::new(i, cfg.network_settings(), base_seed.wrapping_add(i as u64)))
            .collect();
        Ok(Self {
            cfg,
            cells,
            pid: std::process::id(),
        })
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn run(&mut self) {
        self.snapshot_config();

        let pb = ProgressBar::new(self.cfg.generations);
        pb.set_style(
            ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
                .unwrap()
                .progress_chars("=>-"),
        );
        pb.set_message("generations");

        for generation in 1..=self.cfg.generations {
            self.cells.par_iter_mut().for_each(Cell::mutate);

            if generation % self.cfg.scoring_interval == 0 {
                self.score_and_emit(generation);
            }
            pb.inc(1);
        }
        pb.finish_with_message("done");
    }

    fn score_and_emit(&mut self, generation: u64) {
        let solver = self.cfg.solver;
        let waiting = self.cfg.waiting_time();
        let scores: Vec<Option<u32>> = self
            .cells
            .par_iter_mut()
            .map(|c| c.integrate_and_score(solver, waiting))
            .collect();

        // Best live cell; ties resolve to the lowest cell id.
        let mut best: Option<(usize, u32)> = None;
        for (i, score) in scores.iter().enumerate() {
            if let Some(v) = *score {
                if best.is_none_or(|(_, bv)| v > bv) {
                    best = Some((i, v));
                }
            }
        }
        let Some((best_id, best_score)) = best else {
            warn!(generation, "no live cells left to score");
            return;
        };
        info!(generation, best_cell = best_id, score = best_score, "scored");

        if self.cfg.output_all {
            for i in 0..self.cells.len() {
                if self.cells[i].failure().is_none() {
                    self.emit_cell(i, generation);
                }
            }
        } else {
            self.emit_cell(best_id, generation);
        }
    }

    /// All emission is best-effort: a missing `dot`/`gnuplot` binary or
    /// an unwritable tree is logged and the simulation continues.
    fn emit_cell(&self, cell_idx: usize, generation: u64) {
        let cell = &self.cells[cell_idx];
        let net = cell.network();
        let dir = output::cell_dir(&self.cfg.outdir, self.pid, cell.id());
        let csv_dir = dir.join("csv");

        if self.cfg.graphviz {
            let path = dir.join(format!("Cell{}Gen{}.png", cell.id(), generation));
            if let Err(e) = output::dot::write_network_png(net, &path) {
                warn!(cell = cell.id(), "graphviz emission failed: {e}");
            }
        }
        if self.cfg.gnuplot {
            if let Err(e) = output::plot::write_species_plots(net, &dir, cell.id(), generation) {
                warn!(cell = cell.id(), "gnuplot emission failed: {e}");
            }
        }
        if self.cfg.csv_data {
            if let Err(e) =
                output::csv::write_concentration_csvs(net, &csv_dir, cell.id(), generation)
            {
                warn!(cell = cell.id(), "concentration csv emission failed: {e}");
            }
        }
        if self.cfg.csv_cell {
            if let Err(e) = output::csv::write_interaction_csv(net, &csv_dir, cell.id(), generation)
            {
                warn!(cell = cell.id(), "interaction csv emission failed: {e}");
            }
        }
    }

    /// Persist the run configuration next to its outputs so a tree can
    /// be reproduced from `config.json` plus the seed.
    fn snapshot_config(&self) {
        if !(self.cfg.graphviz || self.cfg.gnuplot || self.cfg.csv_cell || self.cfg.csv_data) {
            return;
        }
        let dir = output::run_dir(&self.cfg.outdir, self.pid);
        let write = || -> Result<(), SimError> {
            create_dir_all(&dir)?;
            let json = serde_json::to_string_pretty(&self.cfg)
                .map_err(|e| SimError::IoEmission(std::io::Error::other(e)))?;
            let mut file = File::create(dir.join("config.json"))?;
            file.write_all(json.as_bytes())?;
            Ok(())
        };
        if let Err(e) = write() {
            warn!("config snapshot failed: {e}");
        }
    }
}
