use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, error};

use crate::config::SolverKind;
use crate::network::{NetworkSettings, ReactionNetwork};
use crate::solvers::gillespie::WaitingTime;

/// One evolving cell: a reaction network, its generation counter, and
/// its own RNG stream (cells mutate and integrate independently, so
/// each carries an independent seeded generator).
#[derive(Debug)]
pub struct Cell {
    id: usize,
    generation: u64,
    net: ReactionNetwork,
    rng: SmallRng,
    /// First fatal integration error; once set, the cell is skipped for
    /// the remainder of the run.
    failure: Option<String>,
}

impl Cell {
    /// Every cell begins its life with a single basic cassette.
    pub fn new(id: usize, settings: NetworkSettings, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut net = ReactionNetwork::new(settings);
        net.add_basic(&mut rng);
        Self {
            id,
            generation: 0,
            net,
            rng,
            failure: None,
        }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn network(&self) -> &ReactionNetwork {
        &self.net
    }

    #[inline]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Apply one random mutation.
    ///
    /// A category is drawn first, then an operator within the category:
    ///     Small (0.4) -- forward / reverse / degradation rate change,
    ///                    new PTM, histone modification (0.2 each)
    ///     Large (0.3) -- new complex, new cassette, new promoter
    ///     Null  (0.3) -- no-op
    /// Operators that cannot proceed reject softly; the generation
    /// still counts.
    pub fn mutate(&mut self) {
        if self.failure.is_some() {
            return;
        }
        self.generation += 1;

        let category: f64 = self.rng.random();
        let which: f64 = self.rng.random();

        if category < 0.4 {
            if which < 0.2 {
                self.net.perturb_forward_rate(&mut self.rng);
            } else if which < 0.4 {
                self.net.perturb_reverse_rate(&mut self.rng);
            } else if which < 0.6 {
                self.net.perturb_degradation_rate(&mut self.rng);
            } else if which < 0.8 {
                self.net.add_ptm(&mut self.rng);
            } else {
                self.net.perturb_histone(&mut self.rng);
            }
        } else if category < 0.7 {
            if which < 1.0 / 3.0 {
                self.net.add_complex(&mut self.rng);
            } else if which < 2.0 / 3.0 {
                self.net.add_basic(&mut self.rng);
            } else {
                self.net.add_promoter(&mut self.rng);
            }
        } else {
            debug!(cell = self.id, "null mutation");
        }
    }

    /// Re-solve the network and return its score, or `None` if the cell
    /// has failed (now or earlier). A fatal solver error is recorded
    /// against the cell and excludes it from the rest of the run.
    pub fn integrate_and_score(&mut self, solver: SolverKind, waiting: WaitingTime) -> Option<u32> {
        if self.failure.is_some() {
            return None;
        }
        let h = self.net.settings().h_step;
        let t_limit = self.net.settings().t_limit;
        let result = match solver {
            SolverKind::Deterministic => self.net.integrate_deterministic(h, t_limit),
            SolverKind::Stochastic => self.net.integrate_stochastic(t_limit, waiting, &mut self.rng),
        };
        match result {
            Ok(()) => Some(self.net.best_species_score()),
            Err(e) => {
                error!(cell = self.id, "integration failed, cell excluded: {e}");
                self.failure = Some(e.to_string());
                None
            }
        }
    }
}
