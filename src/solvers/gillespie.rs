use petgraph::graph::EdgeIndex;
use rand::Rng;
use rand_distr::{Distribution, Exp};

use crate::error::SimError;
use crate::network::{InteractionKind, ReactionNetwork};

/// ==============================================================================================
/// ================================== Gillespie Simulator =======================================
/// ==============================================================================================

/// Upper bound of the uniform inter-event draw carried over from the
/// original simulator.
const UNIFORM_WAIT_MAX: f64 = 0.05;

/// Inter-event time model.
///
/// `Uniform` reproduces the original simulator verbatim: waiting times
/// are drawn uniformly from [0, 0.05) regardless of the total
/// propensity. That is a known modelling bug kept for compatibility.
/// `Exponential` is the textbook Gillespie draw, `Exp(A)` with `A` the
/// total propensity (enabled with `--expwait`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitingTime {
    #[default]
    Uniform,
    Exponential,
}

/// Discrete-event stochastic simulation over the reaction graph.
///
/// Every arc carries propensity `rate * count(source)`. Each round:
/// total the propensities, advance time, roulette-pick one arc, apply
/// its discrete effect, and record `(t, count)` for both endpoint
/// species. Complexation and promoter-binding arcs contribute
/// propensity but have no discrete effect. A zero propensity total
/// means the system is exhausted and the run stops early.
pub fn simulate(
    net: &mut ReactionNetwork,
    t_limit: f64,
    waiting: WaitingTime,
    rng: &mut impl Rng,
) -> Result<(), SimError> {
    if !t_limit.is_finite() || t_limit < 0.0 {
        return Err(SimError::NumericDomain(format!(
            "time limit must be non-negative and finite, got {t_limit}"
        )));
    }
    if net.settings().max_rate <= net.settings().min_rate {
        return Err(SimError::NumericDomain(format!(
            "rate interval is empty: [{}, {}]",
            net.settings().min_rate,
            net.settings().max_rate
        )));
    }

    net.reset_all();
    let arcs: Vec<EdgeIndex> = net.graph().arcs().collect();
    if arcs.is_empty() {
        return Ok(());
    }

    let mut propensities = vec![0.0f64; arcs.len()];
    let mut t = 0.0;
    while t < t_limit {
        let mut total = 0.0;
        for (i, &arc) in arcs.iter().enumerate() {
            let src = net.graph().source(arc)?;
            let a = net.interaction(arc).rate() * net.species(src).molecule_count() as f64;
            propensities[i] = a;
            total += a;
        }
        if total <= 0.0 {
            break;
        }

        let dt = match waiting {
            WaitingTime::Uniform => rng.random_range(0.0..UNIFORM_WAIT_MAX),
            WaitingTime::Exponential => match Exp::new(total) {
                Ok(exp) => exp.sample(rng),
                Err(_) => break,
            },
        };
        t += dt;

        // Roulette over propensity mass.
        let mut mass = rng.random_range(0.0..total);
        let mut chosen = arcs.len() - 1;
        for (i, &a) in propensities.iter().enumerate() {
            if mass < a {
                chosen = i;
                break;
            }
            mass -= a;
        }
        let arc = arcs[chosen];
        let (src, dst) = net.graph().endpoints(arc)?;

        match net.interaction(arc).kind {
            InteractionKind::Transcription => {
                let c = net.species(dst).molecule_count();
                net.species_mut(dst).set_molecule_count(c + 1);
            }
            InteractionKind::Translation
            | InteractionKind::ForwardPtm
            | InteractionKind::ReversePtm => {
                let cs = net.species(src).molecule_count();
                net.species_mut(src).set_molecule_count(cs.saturating_sub(1));
                let cd = net.species(dst).molecule_count();
                net.species_mut(dst).set_molecule_count(cd + 1);
            }
            InteractionKind::Degradation => {
                let cs = net.species(src).molecule_count();
                net.species_mut(src).set_molecule_count(cs.saturating_sub(1));
            }
            InteractionKind::ForwardComplexation { .. }
            | InteractionKind::ReverseComplexation { .. }
            | InteractionKind::PromoterBind { .. } => {}
        }

        let src_count = net.species(src).molecule_count() as f64;
        net.species_mut(src).record_point(t, src_count);
        let dst_count = net.species(dst).molecule_count() as f64;
        net.species_mut(dst).record_point(t, dst_count);
    }
    Ok(())
}
