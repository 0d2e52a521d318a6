use petgraph::graph::{EdgeIndex, NodeIndex};

/// ==============================================================================================
/// ================================== Species (graph vertex) ====================================
/// ==============================================================================================

/// Kind tag plus kind-specific attributes of a species.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeciesKind {
    /// Singleton degradation sink; its value is identically 0.
    Null,
    /// `promoter` is the bound `PromoterBind` arc, if any. `histone_factor`
    /// in [0, 2] is the fractional availability to transcription machinery.
    Dna {
        promoter: Option<EdgeIndex>,
        hill: u32,
        histone_factor: f64,
    },
    Mrna,
    Protein,
    /// Composite of two distinct component species.
    Complex { parts: (NodeIndex, NodeIndex) },
    /// Post-translationally modified protein; four-slot modification counts.
    Ptm { mods: [u32; 4] },
}

impl SpeciesKind {
    /// Short-name prefix used in output file and dot node names.
    #[inline]
    pub fn short_prefix(&self) -> &'static str {
        match self {
            SpeciesKind::Null => "n",
            SpeciesKind::Dna { .. } => "g",
            SpeciesKind::Mrna => "m",
            SpeciesKind::Protein => "p",
            SpeciesKind::Complex { .. } => "c",
            SpeciesKind::Ptm { .. } => "ptm",
        }
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        match self {
            SpeciesKind::Null => "Null",
            SpeciesKind::Dna { .. } => "DNA",
            SpeciesKind::Mrna => "mRNA",
            SpeciesKind::Protein => "Protein",
            SpeciesKind::Complex { .. } => "Complex",
            SpeciesKind::Ptm { .. } => "PTM",
        }
    }

    /// True for species that carry mass and therefore a degradation arc.
    #[inline]
    pub fn degrades(&self) -> bool {
        matches!(
            self,
            SpeciesKind::Mrna
                | SpeciesKind::Protein
                | SpeciesKind::Complex { .. }
                | SpeciesKind::Ptm { .. }
        )
    }
}

/// One committed trajectory sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracePoint {
    pub t: f64,
    pub value: f64,
}

/// Direction of the trajectory between consecutive committed points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trend {
    Flat,
    Rising,
    Falling,
}

/// Sign flips smaller than this are floating noise, not oscillation.
const NOISE_EPS: f64 = 1e-4;

/// Per-species state: concentration, RK4 staging, trajectory buffer,
/// stochastic molecule count, and incremental oscillation scoring.
#[derive(Debug, Clone)]
pub struct Species {
    pub kind: SpeciesKind,
    species_id: u32,
    node: NodeIndex,
    initial_concentration: f64,
    concentration: f64,
    k: [f64; 4], // RK4 staging: zero before stage 0, zero after commit
    trajectory: Vec<TracePoint>,
    molecule_count: u64,
    current_dir: Trend,
    oscillation_count: u32,
    minima: Vec<f64>,
    maxima: Vec<f64>,
}

impl Species {
    pub fn new(kind: SpeciesKind, species_id: u32, node: NodeIndex, initial: f64) -> Self {
        let mut s = Self {
            kind,
            species_id,
            node,
            initial_concentration: initial.max(0.0),
            concentration: 0.0,
            k: [0.0; 4],
            trajectory: Vec::new(),
            molecule_count: 0,
            current_dir: Trend::Flat,
            oscillation_count: 0,
            minima: Vec::new(),
            maxima: Vec::new(),
        };
        s.reset();
        s
    }

    #[inline]
    pub fn species_id(&self) -> u32 {
        self.species_id
    }

    #[inline]
    pub fn node(&self) -> NodeIndex {
        self.node
    }

    #[inline]
    pub fn concentration(&self) -> f64 {
        self.concentration
    }

    #[inline]
    pub fn initial_concentration(&self) -> f64 {
        self.initial_concentration
    }

    #[inline]
    pub fn trajectory(&self) -> &[TracePoint] {
        &self.trajectory
    }

    #[inline]
    pub fn oscillation_count(&self) -> u32 {
        self.oscillation_count
    }

    #[inline]
    pub fn minima(&self) -> &[f64] {
        &self.minima
    }

    #[inline]
    pub fn maxima(&self) -> &[f64] {
        &self.maxima
    }

    /// `g3`, `m3`, `p3`, `c7`, `ptm4`, `n0` -- used for output naming.
    pub fn short_name(&self) -> String {
        format!("{}{}", self.kind.short_prefix(), self.species_id)
    }

    /// Current observable value. Null reads 0; DNA reads its histone
    /// factor (availability), not the committed concentration.
    #[inline]
    pub fn value(&self) -> f64 {
        match self.kind {
            SpeciesKind::Null => 0.0,
            SpeciesKind::Dna { histone_factor, .. } => histone_factor,
            _ => self.concentration,
        }
    }

    /// Staged value read by the integrator at RK4 stage `stage`.
    /// Depends only on `k[stage - 1]`, never on `k[stage]`, so the
    /// accumulation order within a stage cannot change what is read.
    #[inline]
    pub fn rk_approx(&self, stage: usize, h: f64) -> f64 {
        debug_assert!(stage < 4, "RK4 stage out of range");
        let base = self.value();
        let v = match stage {
            0 => base,
            1 => base + self.k[0] * (h / 2.0),
            2 => base + self.k[1] * (h / 2.0),
            3 => base + self.k[2] * h,
            _ => base,
        };
        v.max(0.0)
    }

    /// Add one arc's contribution into the staging slot.
    #[inline]
    pub fn accumulate(&mut self, stage: usize, delta: f64) {
        debug_assert!(stage < 4, "RK4 stage out of range");
        self.k[stage] += delta;
    }

    /// Commit one RK4 step: weighted staging sum, clamp, record, clear.
    pub fn commit(&mut self, h: f64) {
        let incr = (h / 6.0) * (self.k[0] + 2.0 * self.k[1] + 2.0 * self.k[2] + self.k[3]);
        let mut next = self.concentration + incr;
        if !next.is_finite() || next < 0.0 {
            next = 0.0;
        }
        self.concentration = next;
        let t = self.trajectory.last().map_or(0.0, |p| p.t) + h;
        self.record_point(t, next);
        self.k = [0.0; 4];
    }

    /// Append a trajectory point and update the direction-change
    /// bookkeeping. Shared by the RK4 commit and the stochastic event
    /// loop; tests feed synthetic trajectories through here.
    pub fn record_point(&mut self, t: f64, value: f64) {
        let prev = self.trajectory.last().map(|p| p.value);
        self.trajectory.push(TracePoint { t, value });

        let Some(prev) = prev else {
            return;
        };
        let delta = value - prev;
        if delta.abs() <= NOISE_EPS {
            return;
        }
        let dir = if delta > 0.0 {
            Trend::Rising
        } else {
            Trend::Falling
        };
        if self.current_dir != Trend::Flat && self.current_dir != dir {
            self.oscillation_count += 1;
            match self.current_dir {
                Trend::Rising => self.maxima.push(prev),
                Trend::Falling => self.minima.push(prev),
                Trend::Flat => {}
            }
        }
        self.current_dir = dir;
    }

    /// Clear trajectory and staging, reseed from the initial
    /// concentration, reset direction state and the molecule count.
    pub fn reset(&mut self) {
        self.concentration = self.initial_concentration;
        self.k = [0.0; 4];
        self.trajectory.clear();
        self.trajectory.push(TracePoint {
            t: 0.0,
            value: self.initial_concentration,
        });
        self.molecule_count = self.initial_concentration.round().max(0.0) as u64;
        self.current_dir = Trend::Flat;
        self.oscillation_count = 0;
        self.minima.clear();
        self.maxima.clear();
    }

    #[inline]
    pub fn molecule_count(&self) -> u64 {
        self.molecule_count
    }

    #[inline]
    pub fn set_molecule_count(&mut self, count: u64) {
        self.molecule_count = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(initial: f64) -> Species {
        Species::new(SpeciesKind::Protein, 1, NodeIndex::new(0), initial)
    }

    #[test]
    fn rk_approx_reads_previous_stage() {
        let mut s = plain(2.0);
        let h = 0.1;
        assert_eq!(s.rk_approx(0, h), 2.0);

        s.accumulate(0, 1.0);
        s.accumulate(1, 3.0);
        s.accumulate(2, 5.0);
        assert!((s.rk_approx(1, h) - (2.0 + 1.0 * 0.05)).abs() < 1e-12);
        assert!((s.rk_approx(2, h) - (2.0 + 3.0 * 0.05)).abs() < 1e-12);
        assert!((s.rk_approx(3, h) - (2.0 + 5.0 * 0.1)).abs() < 1e-12);
    }

    #[test]
    fn rk_approx_clamps_negative() {
        let mut s = plain(0.1);
        s.accumulate(0, -100.0);
        assert_eq!(s.rk_approx(1, 0.1), 0.0);
    }

    #[test]
    fn commit_applies_weighted_sum_and_clears_staging() {
        let mut s = plain(1.0);
        let h = 0.6;
        s.accumulate(0, 1.0);
        s.accumulate(1, 2.0);
        s.accumulate(2, 3.0);
        s.accumulate(3, 4.0);
        s.commit(h);
        // 1 + 0.1 * (1 + 4 + 6 + 4)
        assert!((s.concentration() - 2.5).abs() < 1e-12);
        assert_eq!(s.trajectory().len(), 2);
        assert_eq!(s.rk_approx(1, h), s.value());
    }

    #[test]
    fn commit_clamps_below_zero() {
        let mut s = plain(0.5);
        s.accumulate(0, -100.0);
        s.accumulate(1, -100.0);
        s.accumulate(2, -100.0);
        s.accumulate(3, -100.0);
        s.commit(1.0);
        assert_eq!(s.concentration(), 0.0);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut s = plain(1.5);
        s.accumulate(0, 4.0);
        s.commit(0.1);
        s.commit(0.1);
        s.reset();
        assert_eq!(s.concentration(), 1.5);
        assert_eq!(s.trajectory().len(), 1);
        assert_eq!(s.trajectory()[0].value, 1.5);
        assert_eq!(s.oscillation_count(), 0);
        assert_eq!(s.molecule_count(), 2);
    }

    #[test]
    fn dna_value_reads_histone_factor() {
        let s = Species::new(
            SpeciesKind::Dna {
                promoter: None,
                hill: 2,
                histone_factor: 1.7,
            },
            0,
            NodeIndex::new(0),
            3.0,
        );
        assert_eq!(s.value(), 1.7);
        let null = Species::new(SpeciesKind::Null, 0, NodeIndex::new(1), 3.0);
        assert_eq!(null.value(), 0.0);
    }

    #[test]
    fn sinusoid_scores_twenty_oscillations() {
        let mut s = plain(0.0);
        let h = 0.01;
        for k in 0..=1000u32 {
            let t = f64::from(k) * h;
            s.record_point(t, (2.0 * std::f64::consts::PI * t).sin());
        }
        assert_eq!(s.oscillation_count(), 20);
        assert_eq!(s.maxima().len(), 10);
        assert_eq!(s.minima().len(), 10);
    }

    #[test]
    fn tiny_deltas_do_not_flip_direction() {
        let mut s = plain(0.0);
        s.record_point(0.0, 1.0);
        s.record_point(1.0, 2.0); // rising
        s.record_point(2.0, 2.0 - 5e-5); // below noise threshold
        s.record_point(3.0, 3.0); // still rising
        assert_eq!(s.oscillation_count(), 0);
    }
}
