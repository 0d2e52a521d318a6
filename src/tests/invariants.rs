//! Structural invariants that must hold for every network reachable by
//! any mutation sequence. Networks are built by seeded mutation storms
//! so the checks sweep a spread of shapes, deterministically.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::network::{InteractionKind, NetworkSettings, ReactionNetwork, SpeciesKind};

fn storm(seed: u64, ops: usize) -> ReactionNetwork {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut net = ReactionNetwork::new(NetworkSettings {
        max_basic: 3,
        max_ptm: 3,
        max_complex: 3,
        max_promoter: 3,
        initial_conc: 1.0,
        ..NetworkSettings::default()
    });
    net.add_basic(&mut rng);
    for _ in 0..ops {
        let _ = match rng.random_range(0..8u32) {
            0 => net.add_basic(&mut rng),
            1 => net.add_ptm(&mut rng),
            2 => net.add_complex(&mut rng),
            3 => net.add_promoter(&mut rng),
            4 => net.perturb_forward_rate(&mut rng),
            5 => net.perturb_reverse_rate(&mut rng),
            6 => net.perturb_degradation_rate(&mut rng),
            _ => net.perturb_histone(&mut rng),
        };
    }
    net
}

fn check_degradation(net: &ReactionNetwork) {
    for &arc in net.degradation_arcs() {
        assert_eq!(net.graph().target(arc).expect("target"), net.null_node());
    }
    for s in net.species_table() {
        let count = net
            .degradation_arcs()
            .iter()
            .filter(|&&arc| net.graph().source(arc).expect("source") == s.node())
            .count();
        if s.kind.degrades() {
            assert_eq!(count, 1, "{} must degrade exactly once", s.short_name());
        } else {
            assert_eq!(count, 0, "{} must not degrade", s.short_name());
        }
    }
}

fn check_complex_wiring(net: &ReactionNetwork) {
    for &complex in net.complex_nodes() {
        let SpeciesKind::Complex { parts: (a, b) } = net.species(complex).kind else {
            panic!("complex list holds a non-complex");
        };
        assert_ne!(a, b);

        let forward: Vec<_> = net
            .forward_complexation_arcs()
            .iter()
            .copied()
            .filter(|&arc| net.graph().target(arc).expect("target") == complex)
            .collect();
        let reverse: Vec<_> = net
            .reverse_complexation_arcs()
            .iter()
            .copied()
            .filter(|&arc| net.graph().source(arc).expect("source") == complex)
            .collect();
        assert_eq!(forward.len(), 2);
        assert_eq!(reverse.len(), 2);

        let fw_sources: Vec<_> = forward
            .iter()
            .map(|&arc| net.graph().source(arc).expect("source"))
            .collect();
        assert!(fw_sources.contains(&a) && fw_sources.contains(&b));
        let rv_targets: Vec<_> = reverse
            .iter()
            .map(|&arc| net.graph().target(arc).expect("target"))
            .collect();
        assert!(rv_targets.contains(&a) && rv_targets.contains(&b));

        for arcs in [forward, reverse] {
            // symmetric, involutive, rates agree
            assert_eq!(net.interaction(arcs[0]).pair(), Some(arcs[1]));
            assert_eq!(net.interaction(arcs[1]).pair(), Some(arcs[0]));
            assert_eq!(
                net.interaction(arcs[0]).rate(),
                net.interaction(arcs[1]).rate()
            );
        }
    }
}

fn check_promoters(net: &ReactionNetwork) {
    for &dna in net.dna_nodes() {
        let SpeciesKind::Dna { promoter, .. } = net.species(dna).kind else {
            panic!("DNA list holds a non-DNA");
        };
        if let Some(arc) = promoter {
            assert!(matches!(
                net.interaction(arc).kind,
                InteractionKind::PromoterBind { .. }
            ));
            assert_eq!(net.graph().target(arc).expect("target"), dna);
        }
    }
    for &arc in net.promoter_bind_arcs() {
        let InteractionKind::PromoterBind { kf, kr, .. } = net.interaction(arc).kind else {
            panic!("promoter list holds a non-promoter");
        };
        assert!(kf > kr);
    }
}

fn check_unique_complex_pairs(net: &ReactionNetwork) {
    let pairs: Vec<_> = net
        .complex_nodes()
        .iter()
        .map(|&c| match net.species(c).kind {
            SpeciesKind::Complex { parts } => parts,
            _ => panic!("complex list holds a non-complex"),
        })
        .collect();
    for (i, &(a, b)) in pairs.iter().enumerate() {
        for &(x, y) in &pairs[i + 1..] {
            assert!(
                !((a, b) == (x, y) || (a, b) == (y, x)),
                "two complexes share a component pair"
            );
        }
    }
}

fn check_rate_bounds(net: &ReactionNetwork) {
    let s = net.settings();
    for inter in net.interaction_table() {
        match inter.kind {
            // the derived promoter rate is kf - kr, not a sampled rate
            InteractionKind::PromoterBind { kf, kr, .. } => {
                assert!((inter.rate() - (kf - kr)).abs() < 1e-12);
                assert!(inter.rate() >= 0.0);
            }
            _ => {
                assert!(inter.rate() >= s.min_rate && inter.rate() <= s.max_rate);
            }
        }
    }
}

fn check_back_references(net: &ReactionNetwork) {
    for (i, s) in net.species_table().iter().enumerate() {
        assert_eq!(s.node().index(), i);
    }
    for (i, inter) in net.interaction_table().iter().enumerate() {
        assert_eq!(inter.arc().index(), i);
    }
}

#[test]
fn stormed_networks_keep_every_structural_invariant() {
    for seed in 0..24u64 {
        let net = storm(seed, 200);
        check_degradation(&net);
        check_complex_wiring(&net);
        check_promoters(&net);
        check_unique_complex_pairs(&net);
        check_rate_bounds(&net);
        check_back_references(&net);
    }
}

#[test]
fn stormed_networks_integrate_without_negative_concentrations() {
    for seed in 0..8u64 {
        let mut net = storm(seed, 120);
        net.integrate_deterministic(0.05, 10.0).expect("integrate");
        for s in net.species_table() {
            for p in s.trajectory() {
                assert!(
                    p.value >= 0.0,
                    "{} went negative at t = {}",
                    s.short_name(),
                    p.t
                );
            }
        }
    }
}

#[test]
fn pair_rates_survive_random_perturbation_storms() {
    for seed in 100..110u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut net = storm(seed, 60);
        for _ in 0..100 {
            let _ = match rng.random_range(0..3u32) {
                0 => net.perturb_forward_rate(&mut rng),
                1 => net.perturb_reverse_rate(&mut rng),
                _ => net.perturb_degradation_rate(&mut rng),
            };
            check_complex_wiring(&net);
            check_rate_bounds(&net);
        }
    }
}
