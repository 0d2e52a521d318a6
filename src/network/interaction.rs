use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::error::SimError;
use crate::network::ReactionNetwork;
use crate::network::species::SpeciesKind;

/// ==============================================================================================
/// ================================ Interaction (graph arc) =====================================
/// ==============================================================================================

/// Effect of a bound promoter on its DNA's transcription output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoterMode {
    Repression,
    Activation,
}

/// Kind tag plus kind-specific attributes of a kinetic interaction.
///
/// `ForwardComplexation`/`ReverseComplexation` reference the sibling arc
/// attached to the other monomer of the same complex via `pair`; the
/// reference is an arena index, never a pointer. `pair` is `None` only
/// transiently while `add_complex` wires a new complex; every completed
/// mutation leaves both directions set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionKind {
    Transcription,
    Translation,
    Degradation,
    ForwardComplexation { pair: Option<EdgeIndex> },
    ReverseComplexation { pair: Option<EdgeIndex> },
    ForwardPtm,
    ReversePtm,
    PromoterBind { kf: f64, kr: f64, mode: PromoterMode },
}

impl InteractionKind {
    /// Short label used in interaction CSVs and dot edge labels.
    pub fn label(&self) -> &'static str {
        match self {
            InteractionKind::Transcription => "txn",
            InteractionKind::Translation => "tsln",
            InteractionKind::Degradation => "deg",
            InteractionKind::ForwardComplexation { .. } => "f_cmplx",
            InteractionKind::ReverseComplexation { .. } => "r_cmplx",
            InteractionKind::ForwardPtm => "f_ptm",
            InteractionKind::ReversePtm => "r_ptm",
            InteractionKind::PromoterBind { .. } => "pro",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Interaction {
    pub kind: InteractionKind,
    rate: f64,
    arc: EdgeIndex,
}

impl Interaction {
    pub fn new(kind: InteractionKind, rate: f64, arc: EdgeIndex) -> Self {
        Self { kind, rate, arc }
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    #[inline]
    pub(crate) fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    #[inline]
    pub fn arc(&self) -> EdgeIndex {
        self.arc
    }

    /// Sibling arc for complexation kinds, `None` for every other kind.
    #[inline]
    pub fn pair(&self) -> Option<EdgeIndex> {
        match self.kind {
            InteractionKind::ForwardComplexation { pair }
            | InteractionKind::ReverseComplexation { pair } => pair,
            _ => None,
        }
    }

    pub(crate) fn set_pair(&mut self, pair: EdgeIndex) {
        match &mut self.kind {
            InteractionKind::ForwardComplexation { pair: p }
            | InteractionKind::ReverseComplexation { pair: p } => *p = Some(pair),
            _ => debug_assert!(false, "set_pair on a non-complexation interaction"),
        }
    }
}

#[inline]
fn shape(arc: EdgeIndex, kind: &'static str, detail: impl Into<String>) -> SimError {
    SimError::GraphShape {
        arc: arc.index(),
        kind,
        detail: detail.into(),
    }
}

/// ==============================================================================================
/// ============================== Per-kind derivative contribution ==============================
/// ==============================================================================================

/// Instantaneous rate-of-change contribution of `arc` to the endpoint
/// `node` at RK4 stage `stage` with step `h`.
///
/// All staged reads go through `Species::rk_approx`, which depends only
/// on the previous stage's accumulator, so contributions within one
/// stage are order-independent on the read side.
///
/// Sign conventions and factors follow the kinetic templates:
///     - Transcription and translation produce without consuming their
///       source (the template molecule persists).
///     - A bound promoter drains DNA availability at `kf * s * r` and
///       releases it at `kr * (1 - t)`, with `t` the DNA's staged value.
///     - The two forward complexation arcs each deposit half of
///       `rate * s * p` on the complex, so the pair together deposits
///       the full product term; the reverse pair mirrors this.
pub fn contribution(
    net: &ReactionNetwork,
    arc: EdgeIndex,
    node: NodeIndex,
    stage: usize,
    h: f64,
) -> Result<f64, SimError> {
    let inter = net.interaction(arc);
    let kind_label = inter.kind.label();
    let (src, dst) = net.graph().endpoints(arc)?;

    let is_source = if node == src {
        true
    } else if node == dst {
        false
    } else {
        return Err(shape(
            arc,
            kind_label,
            format!("node {} is neither source nor target", node.index()),
        ));
    };

    let rate = inter.rate();

    match inter.kind {
        InteractionKind::Transcription => {
            let dna = net.species(src);
            let SpeciesKind::Dna { promoter, .. } = dna.kind else {
                return Err(shape(
                    arc,
                    kind_label,
                    format!("source species {} is not a DNA", dna.short_name()),
                ));
            };
            if is_source {
                // Bound promoter drains availability; free DNA is inert.
                match promoter {
                    Some(pb_arc) => {
                        let pb = net.interaction(pb_arc);
                        let InteractionKind::PromoterBind { kf, .. } = pb.kind else {
                            return Err(shape(
                                arc,
                                kind_label,
                                format!(
                                    "promoter back-reference {} is not a PromoterBind",
                                    pb_arc.index()
                                ),
                            ));
                        };
                        let binder = net.graph().source(pb_arc)?;
                        let s = dna.rk_approx(stage, h);
                        let r = net.species(binder).rk_approx(stage, h);
                        Ok(-kf * s * r)
                    }
                    None => Ok(0.0),
                }
            } else {
                Ok(net.species(src).rk_approx(stage, h) * rate)
            }
        }

        InteractionKind::Translation | InteractionKind::ForwardPtm | InteractionKind::ReversePtm => {
            if is_source {
                Ok(0.0)
            } else {
                Ok(net.species(src).rk_approx(stage, h) * rate)
            }
        }

        InteractionKind::Degradation => {
            if is_source {
                Ok(-net.species(src).rk_approx(stage, h) * rate)
            } else {
                Ok(0.0)
            }
        }

        InteractionKind::ForwardComplexation { pair } => {
            let pair = pair.ok_or_else(|| shape(arc, kind_label, "pair arc is unwired"))?;
            let other_monomer = net.graph().source(pair)?;
            let s = net.species(src).rk_approx(stage, h);
            let p = net.species(other_monomer).rk_approx(stage, h);
            if is_source {
                Ok(-rate * s * p)
            } else {
                Ok(0.5 * rate * s * p)
            }
        }

        InteractionKind::ReverseComplexation { .. } => {
            let s = net.species(src).rk_approx(stage, h);
            if is_source {
                Ok(-0.5 * rate * s)
            } else {
                Ok(rate * s)
            }
        }

        InteractionKind::PromoterBind { kf, kr, .. } => {
            let t = net.species(dst).rk_approx(stage, h);
            if is_source {
                Ok(-t * (kf - kr))
            } else {
                Ok(kr * (1.0 - t))
            }
        }
    }
}
