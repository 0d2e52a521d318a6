use std::fs::create_dir_all;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::SimError;
use crate::network::{ReactionNetwork, Species};

/// Gnuplot script for one species: png terminal, inline data block.
fn render_script(species: &Species, path: &Path) -> String {
    let mut script = String::new();
    script.push_str("set terminal png size 800,600\n");
    script.push_str(&format!("set output '{}'\n", path.display()));
    script.push_str(&format!(
        "set title '{} {} concentration'\n",
        species.kind.label(),
        species.species_id()
    ));
    script.push_str("set xlabel 'time'\n");
    script.push_str("set ylabel 'concentration'\n");
    script.push_str(&format!(
        "plot '-' using 1:2 with lines title '{}'\n",
        species.short_name()
    ));
    for point in species.trajectory() {
        script.push_str(&format!("{} {}\n", point.t, point.value));
    }
    script.push_str("e\n");
    script
}

/// One concentration-vs-time png per species:
/// `<dir>/<shortName>c<cell>g<gen>.plot.png`. Requires a `gnuplot`
/// binary; failures surface as soft `IoEmission`.
pub fn write_species_plots(
    net: &ReactionNetwork,
    dir: &Path,
    cell: usize,
    generation: u64,
) -> Result<(), SimError> {
    create_dir_all(dir)?;
    for species in net.species_table() {
        let path = dir.join(format!(
            "{}c{}g{}.plot.png",
            species.short_name(),
            cell,
            generation
        ));
        let script = render_script(species, &path);

        let mut child = Command::new("gnuplot")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(script.as_bytes())?;
        }
        let status = child.wait()?;
        if !status.success() {
            return Err(SimError::IoEmission(std::io::Error::other(format!(
                "gnuplot exited with {status} for {}",
                path.display()
            ))));
        }
    }
    Ok(())
}
