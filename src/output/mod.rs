//! Output adapters: GraphViz and Gnuplot child processes plus plain CSV
//! files. All emission is best-effort; callers log failures and keep
//! the simulation running. File naming keys on `(pid, cell, generation)`
//! so parallel runs and repeated generations never collide.

pub mod csv;
pub mod dot;
pub mod plot;

use std::path::{Path, PathBuf};

/// `<outdir>/<pid>/cell<cellId>/`
pub fn cell_dir(outdir: &Path, pid: u32, cell_id: usize) -> PathBuf {
    outdir.join(pid.to_string()).join(format!("cell{cell_id}"))
}

/// `<outdir>/<pid>/`
pub fn run_dir(outdir: &Path, pid: u32) -> PathBuf {
    outdir.join(pid.to_string())
}
