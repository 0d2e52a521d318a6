pub mod graph;
pub mod interaction;
pub mod species;

pub use graph::ReactionGraph;
pub use interaction::{Interaction, InteractionKind, PromoterMode, contribution};
pub use species::{Species, SpeciesKind, TracePoint};

use petgraph::graph::{EdgeIndex, NodeIndex};
use rand::Rng;
use tracing::debug;

use crate::error::{MutationOutcome, SimError};
use crate::solvers;
use crate::solvers::gillespie::WaitingTime;

/// ==============================================================================================
/// =================================== Reaction Network =========================================
/// ==============================================================================================

/// Caps and numeric knobs of one network. Values mirror the CLI
/// parameters; defaults match the original simulator's.
#[derive(Debug, Clone)]
pub struct NetworkSettings {
    pub max_basic: usize,    // cap on basic cassettes
    pub max_ptm: usize,      // cap on PTM proteins
    pub max_complex: usize,  // cap on protein-protein complexes
    pub max_promoter: usize, // cap on promoter bindings
    pub min_rate: f64,       // lower bound for random kinetic rates
    pub max_rate: f64,       // upper bound for random kinetic rates
    pub h_step: f64,         // RK4 step size
    pub t_limit: f64,        // RK4 time limit
    pub initial_conc: f64,   // default initial concentration
    pub hill: u32,           // Hill coefficient carried by DNA species
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            max_basic: 1,
            max_ptm: 1,
            max_complex: 1,
            max_promoter: 1,
            min_rate: 0.0,
            max_rate: 1.0,
            h_step: 0.05,
            t_limit: 20.0,
            initial_conc: 0.0,
            hill: 1,
        }
    }
}

/// Bounded rejection sampling for `add_promoter`'s `kf > kr` draw; a
/// degenerate `min_rate == max_rate` interval can never satisfy it.
const MAX_PROMOTER_DRAWS: usize = 100;

/// A reaction network: the typed graph, the parallel species and
/// interaction tables, and append-only per-kind index lists.
///
/// Mutation operators are sampling steps: the ones that cannot proceed
/// (cap reached, precondition missed) report a soft [`MutationOutcome`]
/// and leave the network untouched. Nothing is ever removed, so every
/// `NodeIndex`/`EdgeIndex` handed out stays valid for the network's
/// lifetime.
#[derive(Debug, Clone)]
pub struct ReactionNetwork {
    graph: ReactionGraph,
    species: Vec<Species>,         // indexed by NodeIndex
    interactions: Vec<Interaction>, // indexed by EdgeIndex
    null_node: NodeIndex,
    next_species_id: u32,
    settings: NetworkSettings,

    // per-kind index lists, append-only mirrors of the graph
    dna_nodes: Vec<NodeIndex>,
    mrna_nodes: Vec<NodeIndex>,
    protein_nodes: Vec<NodeIndex>,
    complex_nodes: Vec<NodeIndex>,
    ptm_nodes: Vec<NodeIndex>,
    transcription_arcs: Vec<EdgeIndex>,
    translation_arcs: Vec<EdgeIndex>,
    degradation_arcs: Vec<EdgeIndex>,
    forward_complexation_arcs: Vec<EdgeIndex>,
    reverse_complexation_arcs: Vec<EdgeIndex>,
    forward_ptm_arcs: Vec<EdgeIndex>,
    reverse_ptm_arcs: Vec<EdgeIndex>,
    promoter_bind_arcs: Vec<EdgeIndex>,
}

impl ReactionNetwork {
    /// Empty network holding only the Null sink (species id 0).
    pub fn new(settings: NetworkSettings) -> Self {
        let mut net = Self {
            graph: ReactionGraph::new(),
            species: Vec::new(),
            interactions: Vec::new(),
            null_node: NodeIndex::new(0),
            next_species_id: 0,
            settings,
            dna_nodes: Vec::new(),
            mrna_nodes: Vec::new(),
            protein_nodes: Vec::new(),
            complex_nodes: Vec::new(),
            ptm_nodes: Vec::new(),
            transcription_arcs: Vec::new(),
            translation_arcs: Vec::new(),
            degradation_arcs: Vec::new(),
            forward_complexation_arcs: Vec::new(),
            reverse_complexation_arcs: Vec::new(),
            forward_ptm_arcs: Vec::new(),
            reverse_ptm_arcs: Vec::new(),
            promoter_bind_arcs: Vec::new(),
        };
        let null_id = net.take_species_id();
        net.null_node = net.insert_species(SpeciesKind::Null, null_id, 0.0);
        net
    }

    /// ------------------------------------------------------------------------------------------
    /// Accessors
    /// ------------------------------------------------------------------------------------------

    #[inline]
    pub fn graph(&self) -> &ReactionGraph {
        &self.graph
    }

    #[inline]
    pub fn settings(&self) -> &NetworkSettings {
        &self.settings
    }

    #[inline]
    pub fn null_node(&self) -> NodeIndex {
        self.null_node
    }

    #[inline]
    pub fn species(&self, node: NodeIndex) -> &Species {
        &self.species[node.index()]
    }

    #[inline]
    pub(crate) fn species_mut(&mut self, node: NodeIndex) -> &mut Species {
        &mut self.species[node.index()]
    }

    #[inline]
    pub fn interaction(&self, arc: EdgeIndex) -> &Interaction {
        &self.interactions[arc.index()]
    }

    #[inline]
    pub(crate) fn interaction_mut(&mut self, arc: EdgeIndex) -> &mut Interaction {
        &mut self.interactions[arc.index()]
    }

    #[inline]
    pub fn species_table(&self) -> &[Species] {
        &self.species
    }

    #[inline]
    pub(crate) fn species_table_mut(&mut self) -> &mut [Species] {
        &mut self.species
    }

    #[inline]
    pub fn interaction_table(&self) -> &[Interaction] {
        &self.interactions
    }

    #[inline]
    pub fn dna_nodes(&self) -> &[NodeIndex] {
        &self.dna_nodes
    }

    #[inline]
    pub fn mrna_nodes(&self) -> &[NodeIndex] {
        &self.mrna_nodes
    }

    #[inline]
    pub fn protein_nodes(&self) -> &[NodeIndex] {
        &self.protein_nodes
    }

    #[inline]
    pub fn complex_nodes(&self) -> &[NodeIndex] {
        &self.complex_nodes
    }

    #[inline]
    pub fn ptm_nodes(&self) -> &[NodeIndex] {
        &self.ptm_nodes
    }

    #[inline]
    pub fn transcription_arcs(&self) -> &[EdgeIndex] {
        &self.transcription_arcs
    }

    #[inline]
    pub fn translation_arcs(&self) -> &[EdgeIndex] {
        &self.translation_arcs
    }

    #[inline]
    pub fn degradation_arcs(&self) -> &[EdgeIndex] {
        &self.degradation_arcs
    }

    #[inline]
    pub fn forward_complexation_arcs(&self) -> &[EdgeIndex] {
        &self.forward_complexation_arcs
    }

    #[inline]
    pub fn reverse_complexation_arcs(&self) -> &[EdgeIndex] {
        &self.reverse_complexation_arcs
    }

    #[inline]
    pub fn forward_ptm_arcs(&self) -> &[EdgeIndex] {
        &self.forward_ptm_arcs
    }

    #[inline]
    pub fn reverse_ptm_arcs(&self) -> &[EdgeIndex] {
        &self.reverse_ptm_arcs
    }

    #[inline]
    pub fn promoter_bind_arcs(&self) -> &[EdgeIndex] {
        &self.promoter_bind_arcs
    }

    /// ------------------------------------------------------------------------------------------
    /// Insertion primitives (shared by all mutation operators)
    /// ------------------------------------------------------------------------------------------

    fn take_species_id(&mut self) -> u32 {
        let id = self.next_species_id;
        self.next_species_id += 1;
        id
    }

    pub(crate) fn insert_species(
        &mut self,
        kind: SpeciesKind,
        species_id: u32,
        initial: f64,
    ) -> NodeIndex {
        let node = self.graph.add_node();
        debug_assert_eq!(node.index(), self.species.len());
        match kind {
            SpeciesKind::Dna { .. } => self.dna_nodes.push(node),
            SpeciesKind::Mrna => self.mrna_nodes.push(node),
            SpeciesKind::Protein => self.protein_nodes.push(node),
            SpeciesKind::Complex { .. } => self.complex_nodes.push(node),
            SpeciesKind::Ptm { .. } => self.ptm_nodes.push(node),
            SpeciesKind::Null => {}
        }
        self.species
            .push(Species::new(kind, species_id, node, initial));
        node
    }

    pub(crate) fn insert_arc(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        kind: InteractionKind,
        rate: f64,
    ) -> EdgeIndex {
        // PromoterBind keeps its derived rate kf - kr exact; every other
        // kind is clamped into the configured kinetic interval.
        let rate = match kind {
            InteractionKind::PromoterBind { .. } => rate,
            _ => self.clamp_rate(rate),
        };
        let arc = self.graph.add_arc(from, to);
        debug_assert_eq!(arc.index(), self.interactions.len());
        match kind {
            InteractionKind::Transcription => self.transcription_arcs.push(arc),
            InteractionKind::Translation => self.translation_arcs.push(arc),
            InteractionKind::Degradation => self.degradation_arcs.push(arc),
            InteractionKind::ForwardComplexation { .. } => {
                self.forward_complexation_arcs.push(arc)
            }
            InteractionKind::ReverseComplexation { .. } => {
                self.reverse_complexation_arcs.push(arc)
            }
            InteractionKind::ForwardPtm => self.forward_ptm_arcs.push(arc),
            InteractionKind::ReversePtm => self.reverse_ptm_arcs.push(arc),
            InteractionKind::PromoterBind { .. } => self.promoter_bind_arcs.push(arc),
        }
        self.interactions.push(Interaction::new(kind, rate, arc));
        arc
    }

    #[inline]
    fn clamp_rate(&self, rate: f64) -> f64 {
        rate.clamp(self.settings.min_rate, self.settings.max_rate)
    }

    #[inline]
    fn sample_rate(&self, rng: &mut impl Rng) -> f64 {
        rng.random_range(self.settings.min_rate..=self.settings.max_rate)
    }

    /// Uniform pick across the concatenation of index lists.
    fn pick_concat(rng: &mut impl Rng, lists: &[&[NodeIndex]]) -> Option<NodeIndex> {
        let total: usize = lists.iter().map(|l| l.len()).sum();
        if total == 0 {
            return None;
        }
        let mut i = rng.random_range(0..total);
        for l in lists {
            if i < l.len() {
                return Some(l[i]);
            }
            i -= l.len();
        }
        None
    }

    fn pick_arc_concat(rng: &mut impl Rng, lists: &[&[EdgeIndex]]) -> Option<EdgeIndex> {
        let total: usize = lists.iter().map(|l| l.len()).sum();
        if total == 0 {
            return None;
        }
        let mut i = rng.random_range(0..total);
        for l in lists {
            if i < l.len() {
                return Some(l[i]);
            }
            i -= l.len();
        }
        None
    }

    /// Set an interaction's rate and keep its complexation pair in sync.
    fn set_rate_synced(&mut self, arc: EdgeIndex, rate: f64) {
        self.interaction_mut(arc).set_rate(rate);
        if let Some(pair) = self.interaction(arc).pair() {
            self.interaction_mut(pair).set_rate(rate);
        }
    }

    /// ------------------------------------------------------------------------------------------
    /// Mutation operators
    /// ------------------------------------------------------------------------------------------

    /// New basic gene cassette: DNA, mRNA and Protein sharing one
    /// species id, plus transcription, translation and the two
    /// degradation arcs, each with a fresh random rate.
    pub fn add_basic(&mut self, rng: &mut impl Rng) -> MutationOutcome {
        if self.dna_nodes.len() >= self.settings.max_basic {
            debug!("add_basic rejected: cassette cap reached");
            return MutationOutcome::CapReached;
        }
        let id = self.take_species_id();
        let conc = self.settings.initial_conc;
        let hill = self.settings.hill;

        let dna = self.insert_species(
            SpeciesKind::Dna {
                promoter: None,
                hill,
                histone_factor: 1.0,
            },
            id,
            conc,
        );
        let mrna = self.insert_species(SpeciesKind::Mrna, id, conc);
        let protein = self.insert_species(SpeciesKind::Protein, id, conc);

        let txn = self.sample_rate(rng);
        let tsln = self.sample_rate(rng);
        let deg_m = self.sample_rate(rng);
        let deg_p = self.sample_rate(rng);
        self.insert_arc(dna, mrna, InteractionKind::Transcription, txn);
        self.insert_arc(mrna, protein, InteractionKind::Translation, tsln);
        self.insert_arc(mrna, self.null_node, InteractionKind::Degradation, deg_m);
        self.insert_arc(protein, self.null_node, InteractionKind::Degradation, deg_p);

        debug!("add_basic: cassette {id} (g{id}, m{id}, p{id})");
        MutationOutcome::Applied
    }

    /// New post-translationally modified protein derived from a random
    /// Protein or PTM parent: the parent's modification vector with one
    /// random slot incremented.
    pub fn add_ptm(&mut self, rng: &mut impl Rng) -> MutationOutcome {
        if self.ptm_nodes.len() >= self.settings.max_ptm {
            debug!("add_ptm rejected: PTM cap reached");
            return MutationOutcome::CapReached;
        }
        let Some(parent) = Self::pick_concat(rng, &[&self.protein_nodes, &self.ptm_nodes]) else {
            debug!("add_ptm rejected: no protein to modify");
            return MutationOutcome::PreconditionMiss;
        };

        let mut mods = match self.species(parent).kind {
            SpeciesKind::Protein => [0u32; 4],
            SpeciesKind::Ptm { mods } => mods,
            _ => {
                debug_assert!(false, "PTM parent pool contained a non-protein");
                return MutationOutcome::PreconditionMiss;
            }
        };
        mods[rng.random_range(0..4usize)] += 1;

        let id = self.take_species_id();
        let conc = self.settings.initial_conc;
        let ptm = self.insert_species(SpeciesKind::Ptm { mods }, id, conc);

        let fwd = self.sample_rate(rng);
        let rev = self.sample_rate(rng);
        let deg = self.sample_rate(rng);
        self.insert_arc(parent, ptm, InteractionKind::ForwardPtm, fwd);
        self.insert_arc(ptm, parent, InteractionKind::ReversePtm, rev);
        self.insert_arc(ptm, self.null_node, InteractionKind::Degradation, deg);

        debug!("add_ptm: ptm{id} from {}", self.species(parent).short_name());
        MutationOutcome::Applied
    }

    /// New protein-protein complex from two distinct members of the
    /// Protein/Complex pool. The four complexation arcs share one
    /// forward and one reverse rate and are pair-wired both ways.
    pub fn add_complex(&mut self, rng: &mut impl Rng) -> MutationOutcome {
        if self.complex_nodes.len() >= self.settings.max_complex {
            debug!("add_complex rejected: complex cap reached");
            return MutationOutcome::CapReached;
        }
        let total = self.protein_nodes.len() + self.complex_nodes.len();
        if total < 2 {
            debug!("add_complex rejected: fewer than two candidate monomers");
            return MutationOutcome::PreconditionMiss;
        }

        // Two distinct indices, uniform over ordered pairs.
        let i = rng.random_range(0..total);
        let mut j = rng.random_range(0..total - 1);
        if j >= i {
            j += 1;
        }
        let nth = |k: usize| -> NodeIndex {
            if k < self.protein_nodes.len() {
                self.protein_nodes[k]
            } else {
                self.complex_nodes[k - self.protein_nodes.len()]
            }
        };
        let a = nth(i);
        let b = nth(j);

        // A complex is unique up to its unordered component pair.
        let duplicate = self.complex_nodes.iter().any(|&c| {
            matches!(self.species(c).kind,
                SpeciesKind::Complex { parts } if parts == (a, b) || parts == (b, a))
        });
        if duplicate {
            debug!(
                "add_complex rejected: complex over {{{}, {}}} already exists",
                self.species(a).short_name(),
                self.species(b).short_name()
            );
            return MutationOutcome::PreconditionMiss;
        }

        let id = self.take_species_id();
        let conc = self.settings.initial_conc;
        let complex = self.insert_species(SpeciesKind::Complex { parts: (a, b) }, id, conc);

        let kf = self.sample_rate(rng);
        let kr = self.sample_rate(rng);
        let f1 = self.insert_arc(
            a,
            complex,
            InteractionKind::ForwardComplexation { pair: None },
            kf,
        );
        let f2 = self.insert_arc(
            b,
            complex,
            InteractionKind::ForwardComplexation { pair: None },
            kf,
        );
        self.interaction_mut(f1).set_pair(f2);
        self.interaction_mut(f2).set_pair(f1);

        let r1 = self.insert_arc(
            complex,
            a,
            InteractionKind::ReverseComplexation { pair: None },
            kr,
        );
        let r2 = self.insert_arc(
            complex,
            b,
            InteractionKind::ReverseComplexation { pair: None },
            kr,
        );
        self.interaction_mut(r1).set_pair(r2);
        self.interaction_mut(r2).set_pair(r1);

        let deg = self.sample_rate(rng);
        self.insert_arc(complex, self.null_node, InteractionKind::Degradation, deg);

        debug!(
            "add_complex: c{id} = {{{}, {}}}",
            self.species(a).short_name(),
            self.species(b).short_name()
        );
        MutationOutcome::Applied
    }

    /// Bind a random Protein/PTM to a random promoter-free DNA.
    /// `kf`/`kr` are redrawn until `kf > kr`; the binding starts out as
    /// a repressor.
    pub fn add_promoter(&mut self, rng: &mut impl Rng) -> MutationOutcome {
        if self.promoter_bind_arcs.len() >= self.settings.max_promoter {
            debug!("add_promoter rejected: promoter cap reached");
            return MutationOutcome::CapReached;
        }
        let free: Vec<NodeIndex> = self
            .dna_nodes
            .iter()
            .copied()
            .filter(|&n| {
                matches!(
                    self.species(n).kind,
                    SpeciesKind::Dna { promoter: None, .. }
                )
            })
            .collect();
        if free.is_empty() {
            debug!("add_promoter rejected: no promoter-free DNA");
            return MutationOutcome::PreconditionMiss;
        }
        let dna = free[rng.random_range(0..free.len())];
        let Some(binder) = Self::pick_concat(rng, &[&self.protein_nodes, &self.ptm_nodes]) else {
            debug!("add_promoter rejected: no protein to bind");
            return MutationOutcome::PreconditionMiss;
        };

        let mut drawn = None;
        for _ in 0..MAX_PROMOTER_DRAWS {
            let kf = self.sample_rate(rng);
            let kr = self.sample_rate(rng);
            if kf > kr {
                drawn = Some((kf, kr));
                break;
            }
        }
        let Some((kf, kr)) = drawn else {
            debug!("add_promoter rejected: could not draw kf > kr");
            return MutationOutcome::PreconditionMiss;
        };

        let arc = self.insert_arc(
            binder,
            dna,
            InteractionKind::PromoterBind {
                kf,
                kr,
                mode: PromoterMode::Repression,
            },
            kf - kr,
        );
        if let SpeciesKind::Dna { promoter, .. } = &mut self.species_mut(dna).kind {
            *promoter = Some(arc);
        }

        debug!(
            "add_promoter: {} -> {} (kf {kf:.4}, kr {kr:.4})",
            self.species(binder).short_name(),
            self.species(dna).short_name()
        );
        MutationOutcome::Applied
    }

    /// Redraw the rate of a random forward-direction arc (translation,
    /// forward complexation, forward PTM). Complexation pairs stay in
    /// sync.
    pub fn perturb_forward_rate(&mut self, rng: &mut impl Rng) -> MutationOutcome {
        let Some(arc) = Self::pick_arc_concat(
            rng,
            &[
                &self.translation_arcs,
                &self.forward_complexation_arcs,
                &self.forward_ptm_arcs,
            ],
        ) else {
            debug!("perturb_forward_rate rejected: no forward arcs");
            return MutationOutcome::PreconditionMiss;
        };
        let rate = self.sample_rate(rng);
        self.set_rate_synced(arc, rate);
        debug!("perturb_forward_rate: arc {} -> {rate:.4}", arc.index());
        MutationOutcome::Applied
    }

    /// Redraw the rate of a random reverse-direction arc (reverse
    /// complexation, reverse PTM). Complexation pairs stay in sync.
    pub fn perturb_reverse_rate(&mut self, rng: &mut impl Rng) -> MutationOutcome {
        let Some(arc) = Self::pick_arc_concat(
            rng,
            &[&self.reverse_complexation_arcs, &self.reverse_ptm_arcs],
        ) else {
            debug!("perturb_reverse_rate rejected: no reverse arcs");
            return MutationOutcome::PreconditionMiss;
        };
        let rate = self.sample_rate(rng);
        self.set_rate_synced(arc, rate);
        debug!("perturb_reverse_rate: arc {} -> {rate:.4}", arc.index());
        MutationOutcome::Applied
    }

    /// Redraw the rate of a random degradation arc.
    pub fn perturb_degradation_rate(&mut self, rng: &mut impl Rng) -> MutationOutcome {
        let Some(arc) = Self::pick_arc_concat(rng, &[&self.degradation_arcs]) else {
            debug!("perturb_degradation_rate rejected: no degradation arcs");
            return MutationOutcome::PreconditionMiss;
        };
        let rate = self.sample_rate(rng);
        self.set_rate_synced(arc, rate);
        debug!("perturb_degradation_rate: arc {} -> {rate:.4}", arc.index());
        MutationOutcome::Applied
    }

    /// Redraw a random DNA's histone factor uniformly from [0, 2).
    pub fn perturb_histone(&mut self, rng: &mut impl Rng) -> MutationOutcome {
        if self.dna_nodes.is_empty() {
            debug!("perturb_histone rejected: no DNA");
            return MutationOutcome::PreconditionMiss;
        }
        let node = self.dna_nodes[rng.random_range(0..self.dna_nodes.len())];
        let factor = rng.random_range(0.0..2.0);
        if let SpeciesKind::Dna { histone_factor, .. } = &mut self.species_mut(node).kind {
            *histone_factor = factor;
        }
        debug!(
            "perturb_histone: {} -> {factor:.4}",
            self.species(node).short_name()
        );
        MutationOutcome::Applied
    }

    /// ------------------------------------------------------------------------------------------
    /// Integration and scoring
    /// ------------------------------------------------------------------------------------------

    pub fn reset_all(&mut self) {
        for s in &mut self.species {
            s.reset();
        }
    }

    /// Solve the ODE system with the RK4 integrator (see `solvers::rk4`).
    pub fn integrate_deterministic(&mut self, h: f64, t_limit: f64) -> Result<(), SimError> {
        solvers::rk4::solve(self, h, t_limit)
    }

    /// Simulate the network stochastically (see `solvers::gillespie`).
    pub fn integrate_stochastic(
        &mut self,
        t_limit: f64,
        waiting: WaitingTime,
        rng: &mut impl Rng,
    ) -> Result<(), SimError> {
        solvers::gillespie::simulate(self, t_limit, waiting, rng)
    }

    /// Network fitness: the best oscillation count over all species.
    pub fn best_species_score(&self) -> u32 {
        self.species
            .iter()
            .map(|s| s.oscillation_count())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(1234)
    }

    fn settings() -> NetworkSettings {
        NetworkSettings {
            max_basic: 4,
            max_ptm: 4,
            max_complex: 4,
            max_promoter: 4,
            initial_conc: 1.0,
            ..NetworkSettings::default()
        }
    }

    #[test]
    fn new_network_holds_only_the_null_sink() {
        let net = ReactionNetwork::new(settings());
        assert_eq!(net.graph().node_count(), 1);
        assert_eq!(net.graph().arc_count(), 0);
        assert_eq!(net.species(net.null_node()).kind, SpeciesKind::Null);
        assert_eq!(net.species(net.null_node()).species_id(), 0);
    }

    #[test]
    fn add_basic_builds_a_cassette_with_a_shared_id() {
        let mut net = ReactionNetwork::new(settings());
        let mut r = rng();
        assert!(net.add_basic(&mut r).applied());

        assert_eq!(net.dna_nodes().len(), 1);
        assert_eq!(net.protein_nodes().len(), 1);
        let dna = net.species(net.dna_nodes()[0]);
        let protein = net.species(net.protein_nodes()[0]);
        assert_eq!(dna.species_id(), protein.species_id());
        assert_eq!(dna.species_id(), 1);

        // transcription, translation, two degradations into Null
        assert_eq!(net.graph().arc_count(), 4);
        assert_eq!(net.degradation_arcs().len(), 2);
        for &arc in net.degradation_arcs() {
            assert_eq!(net.graph().target(arc).expect("target"), net.null_node());
        }
    }

    #[test]
    fn add_basic_respects_the_cassette_cap() {
        let mut net = ReactionNetwork::new(NetworkSettings {
            max_basic: 2,
            ..settings()
        });
        let mut r = rng();
        for _ in 0..10 {
            net.add_basic(&mut r);
        }
        assert_eq!(net.dna_nodes().len(), 2);
        // no orphan arcs from rejected calls: two full cassettes only
        assert_eq!(net.graph().arc_count(), 8);
        assert_eq!(net.graph().node_count(), 1 + 6);
    }

    #[test]
    fn add_ptm_increments_one_slot_of_the_parent_vector() {
        let mut net = ReactionNetwork::new(settings());
        let mut r = rng();
        net.add_basic(&mut r);
        assert!(net.add_ptm(&mut r).applied());

        assert_eq!(net.ptm_nodes().len(), 1);
        let SpeciesKind::Ptm { mods } = net.species(net.ptm_nodes()[0]).kind else {
            panic!("expected a PTM species");
        };
        assert_eq!(mods.iter().sum::<u32>(), 1);

        // forward, reverse, degradation
        assert_eq!(net.graph().arc_count(), 4 + 3);
    }

    #[test]
    fn add_ptm_rejects_without_a_parent() {
        let mut net = ReactionNetwork::new(settings());
        let mut r = rng();
        assert_eq!(net.add_ptm(&mut r), MutationOutcome::PreconditionMiss);
        assert_eq!(net.graph().node_count(), 1);
    }

    #[test]
    fn add_complex_wires_the_four_paired_arcs() {
        let mut net = ReactionNetwork::new(settings());
        let mut r = rng();
        net.add_basic(&mut r);
        net.add_basic(&mut r);
        assert!(net.add_complex(&mut r).applied());

        assert_eq!(net.complex_nodes().len(), 1);
        let complex = net.complex_nodes()[0];
        let SpeciesKind::Complex { parts: (a, b) } = net.species(complex).kind else {
            panic!("expected a complex species");
        };
        assert_ne!(a, b);

        assert_eq!(net.forward_complexation_arcs.len(), 2);
        assert_eq!(net.reverse_complexation_arcs.len(), 2);
        for arcs in [
            &net.forward_complexation_arcs,
            &net.reverse_complexation_arcs,
        ] {
            let (x, y) = (arcs[0], arcs[1]);
            // symmetric and involutive pair references, matching rates
            assert_eq!(net.interaction(x).pair(), Some(y));
            assert_eq!(net.interaction(y).pair(), Some(x));
            assert_eq!(net.interaction(x).rate(), net.interaction(y).rate());
        }

        // the complex degrades into Null
        let deg = net
            .degradation_arcs()
            .iter()
            .filter(|&&arc| net.graph().source(arc).expect("source") == complex)
            .count();
        assert_eq!(deg, 1);
    }

    #[test]
    fn add_complex_never_duplicates_a_component_pair() {
        let mut net = ReactionNetwork::new(settings());
        let mut r = rng();
        net.add_basic(&mut r);
        net.add_basic(&mut r);
        assert!(net.add_complex(&mut r).applied());
        let SpeciesKind::Complex { parts: first } = net.species(net.complex_nodes()[0]).kind
        else {
            panic!("expected a complex species");
        };

        // The second call may pick the existing pair (rejected) or pull
        // the complex itself into a new pair; either way no duplicate
        // unordered pair can appear.
        for _ in 0..20 {
            net.add_complex(&mut r);
        }
        let pairs: Vec<(NodeIndex, NodeIndex)> = net
            .complex_nodes()
            .iter()
            .map(|&c| match net.species(c).kind {
                SpeciesKind::Complex { parts } => parts,
                _ => panic!("complex list holds a non-complex"),
            })
            .collect();
        assert!(pairs.contains(&first));
        for (i, &(a, b)) in pairs.iter().enumerate() {
            for &(x, y) in &pairs[i + 1..] {
                assert!(!((a, b) == (x, y) || (a, b) == (y, x)));
            }
        }
    }

    #[test]
    fn add_complex_needs_two_candidates() {
        let mut net = ReactionNetwork::new(settings());
        let mut r = rng();
        net.add_basic(&mut r); // one protein only
        assert_eq!(net.add_complex(&mut r), MutationOutcome::PreconditionMiss);
    }

    #[test]
    fn add_promoter_binds_a_free_dna() {
        let mut net = ReactionNetwork::new(settings());
        let mut r = rng();
        net.add_basic(&mut r);
        assert!(net.add_promoter(&mut r).applied());

        assert_eq!(net.promoter_bind_arcs().len(), 1);
        let arc = net.promoter_bind_arcs()[0];
        let dna = net.graph().target(arc).expect("target");
        match net.species(dna).kind {
            SpeciesKind::Dna { promoter, .. } => assert_eq!(promoter, Some(arc)),
            _ => panic!("promoter target is not a DNA"),
        }
        let InteractionKind::PromoterBind { kf, kr, mode } = net.interaction(arc).kind else {
            panic!("expected a promoter binding");
        };
        assert!(kf > kr);
        assert_eq!(mode, PromoterMode::Repression);
        assert!((net.interaction(arc).rate() - (kf - kr)).abs() < 1e-12);

        // the only DNA is now bound
        assert_eq!(net.add_promoter(&mut r), MutationOutcome::PreconditionMiss);
    }

    #[test]
    fn add_promoter_respects_the_cap() {
        let mut net = ReactionNetwork::new(NetworkSettings {
            max_promoter: 0,
            ..settings()
        });
        let mut r = rng();
        net.add_basic(&mut r);
        assert_eq!(net.add_promoter(&mut r), MutationOutcome::CapReached);
    }

    #[test]
    fn perturbed_complexation_rates_stay_paired() {
        let mut net = ReactionNetwork::new(settings());
        let mut r = rng();
        net.add_basic(&mut r);
        net.add_basic(&mut r);
        net.add_complex(&mut r);

        for _ in 0..50 {
            net.perturb_forward_rate(&mut r);
            net.perturb_reverse_rate(&mut r);
            for arcs in [
                &net.forward_complexation_arcs,
                &net.reverse_complexation_arcs,
            ] {
                assert_eq!(
                    net.interaction(arcs[0]).rate(),
                    net.interaction(arcs[1]).rate()
                );
            }
        }
    }

    #[test]
    fn perturb_histone_stays_in_range() {
        let mut net = ReactionNetwork::new(settings());
        let mut r = rng();
        net.add_basic(&mut r);
        for _ in 0..50 {
            assert!(net.perturb_histone(&mut r).applied());
            let SpeciesKind::Dna { histone_factor, .. } = net.species(net.dna_nodes()[0]).kind
            else {
                panic!("expected a DNA");
            };
            assert!((0.0..2.0).contains(&histone_factor));
        }
    }

    #[test]
    fn perturb_operators_reject_on_an_empty_network() {
        let mut net = ReactionNetwork::new(settings());
        let mut r = rng();
        assert_eq!(
            net.perturb_forward_rate(&mut r),
            MutationOutcome::PreconditionMiss
        );
        assert_eq!(
            net.perturb_reverse_rate(&mut r),
            MutationOutcome::PreconditionMiss
        );
        assert_eq!(
            net.perturb_degradation_rate(&mut r),
            MutationOutcome::PreconditionMiss
        );
        assert_eq!(net.perturb_histone(&mut r), MutationOutcome::PreconditionMiss);
    }
}
