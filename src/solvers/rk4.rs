use petgraph::graph::EdgeIndex;

use crate::error::SimError;
use crate::network::{ReactionNetwork, contribution};

/// ==============================================================================================
/// ==================================== RK4 Integrator ==========================================
/// ==============================================================================================

/// Entry validation shared with the stochastic simulator's time checks.
fn validate(net: &ReactionNetwork, h: f64, t_limit: f64) -> Result<(), SimError> {
    if !h.is_finite() || h <= 0.0 {
        return Err(SimError::NumericDomain(format!(
            "step size must be positive and finite, got {h}"
        )));
    }
    if !t_limit.is_finite() || t_limit < 0.0 {
        return Err(SimError::NumericDomain(format!(
            "time limit must be non-negative and finite, got {t_limit}"
        )));
    }
    let s = net.settings();
    if s.max_rate <= s.min_rate {
        return Err(SimError::NumericDomain(format!(
            "rate interval is empty: [{}, {}]",
            s.min_rate, s.max_rate
        )));
    }
    Ok(())
}

/// Classical fourth-order Runge-Kutta over the reaction graph.
///
/// Phase order within one step is strict:
///     stage 0..3 -> per-arc contributions accumulated into `k[stage]`
///     commit     -> weighted sum, clamp, trajectory append, staging cleared
///
/// Arcs are visited in insertion order. Reads inside a stage use
/// `rk_approx(stage)`, which depends only on `k[stage - 1]`, so the
/// accumulation order cannot change what any contribution observes.
///
/// `t_limit = 0` (and a network without arcs) yields exactly the reset
/// trajectory: one point per species at its initial concentration.
pub fn solve(net: &mut ReactionNetwork, h: f64, t_limit: f64) -> Result<(), SimError> {
    validate(net, h, t_limit)?;

    net.reset_all();
    if net.graph().arc_count() == 0 {
        return Ok(());
    }
    let arcs: Vec<EdgeIndex> = net.graph().arcs().collect();

    let mut t = 0.0;
    while t < t_limit {
        for stage in 0..4 {
            for &arc in &arcs {
                let (src, dst) = net.graph().endpoints(arc)?;
                let d_src = contribution(net, arc, src, stage, h)?;
                let d_dst = contribution(net, arc, dst, stage, h)?;
                net.species_mut(src).accumulate(stage, d_src);
                net.species_mut(dst).accumulate(stage, d_dst);
            }
        }
        for s in net.species_table_mut() {
            s.commit(h);
        }
        t += h;
    }
    Ok(())
}
