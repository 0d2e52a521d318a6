//! Evolutionary simulator for small gene reaction networks.
//!
//! A population of cells is evolved by repeated random mutation of each
//! cell's reaction network -- a typed directed multigraph whose nodes
//! are molecular species (DNA, mRNA, proteins, complexes, PTM variants,
//! a Null sink) and whose arcs are kinetic interactions. Every scoring
//! generation the network's ODE system is solved with a classical RK4
//! integrator (or simulated stochastically, Gillespie-style) and scored
//! by counting trajectory oscillations; outputs for the best cell are
//! emitted as GraphViz/Gnuplot images and CSV files.
//!
//! The binary `gene-network-evo` drives an [`evolve::Experiment`] from
//! the command line; the library exposes every layer underneath it:
//! [`network::ReactionNetwork`] with its mutation operators,
//! [`solvers::rk4`] and [`solvers::gillespie`], and the output
//! adapters.

pub mod config;
pub mod error;
pub mod evolve;
pub mod network;
pub mod output;
pub mod solvers;

#[cfg(test)]
mod tests;
