use std::fs::create_dir_all;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::SimError;
use crate::network::ReactionNetwork;

/// The network as GraphViz source: one node per species (short name),
/// one labelled edge per interaction, insertion order.
pub fn render_dot(net: &ReactionNetwork) -> Result<String, SimError> {
    let mut out = String::from("digraph mol_interactions {\n");
    out.push_str("size=\"8,5\"\n");
    out.push_str("node [shape = circle];\n");
    for arc in net.graph().arcs() {
        let (src, dst) = net.graph().endpoints(arc)?;
        out.push_str(&format!(
            "{} -> {} [ label = \"{}\" ];\n",
            net.species(src).short_name(),
            net.species(dst).short_name(),
            net.interaction(arc).kind.label()
        ));
    }
    out.push_str("}\n");
    Ok(out)
}

/// Pipe the network through `dot -Tpng` into `path`. Absence or failure
/// of the `dot` binary surfaces as a soft `IoEmission`.
pub fn write_network_png(net: &ReactionNetwork, path: &Path) -> Result<(), SimError> {
    let source = render_dot(net)?;
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut child = Command::new("dot")
        .arg("-Tpng")
        .arg("-o")
        .arg(path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(source.as_bytes())?;
    }
    let status = child.wait()?;
    if !status.success() {
        return Err(SimError::IoEmission(std::io::Error::other(format!(
            "dot exited with {status}"
        ))));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{InteractionKind, NetworkSettings, SpeciesKind};

    #[test]
    fn dot_source_names_every_arc() {
        let mut net = ReactionNetwork::new(NetworkSettings::default());
        let d = net.insert_species(
            SpeciesKind::Dna {
                promoter: None,
                hill: 1,
                histone_factor: 1.0,
            },
            1,
            0.0,
        );
        let m = net.insert_species(SpeciesKind::Mrna, 1, 0.0);
        net.insert_arc(d, m, InteractionKind::Transcription, 0.5);

        let source = render_dot(&net).expect("render");
        assert!(source.starts_with("digraph mol_interactions {"));
        assert!(source.contains("g1 -> m1 [ label = \"txn\" ];"));
        assert!(source.trim_end().ends_with('}'));
    }
}
