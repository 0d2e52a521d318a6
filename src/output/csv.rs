use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::Path;

use crate::error::SimError;
use crate::network::ReactionNetwork;

/// Committed trajectory points are subsampled: every Nth point lands in
/// the concentration CSV.
const SUBSAMPLE: usize = 5;

/// One `t,value` CSV per species:
/// `<csv_dir>/<shortName>c<cell>g<gen>.csv`.
pub fn write_concentration_csvs(
    net: &ReactionNetwork,
    csv_dir: &Path,
    cell: usize,
    generation: u64,
) -> Result<(), SimError> {
    create_dir_all(csv_dir)?;
    for species in net.species_table() {
        let path = csv_dir.join(format!(
            "{}c{}g{}.csv",
            species.short_name(),
            cell,
            generation
        ));
        let mut file = File::create(path)?;
        for point in species.trajectory().iter().step_by(SUBSAMPLE) {
            writeln!(file, "{},{}", point.t, point.value)?;
        }
    }
    Ok(())
}

/// The interaction table as
/// `interactionKind,sourceShortName,targetShortName,rate` rows:
/// `<csv_dir>/Cell<cell>Gen<gen>.csv`.
pub fn write_interaction_csv(
    net: &ReactionNetwork,
    csv_dir: &Path,
    cell: usize,
    generation: u64,
) -> Result<(), SimError> {
    create_dir_all(csv_dir)?;
    let path = csv_dir.join(format!("Cell{cell}Gen{generation}.csv"));
    let mut file = File::create(path)?;
    for arc in net.graph().arcs() {
        let inter = net.interaction(arc);
        let (src, dst) = net.graph().endpoints(arc)?;
        writeln!(
            file,
            "{},{},{},{}",
            inter.kind.label(),
            net.species(src).short_name(),
            net.species(dst).short_name(),
            inter.rate()
        )?;
    }
    Ok(())
}
