//! Population lifecycle for the runner controller.
//!
//! This crate owns the generational state of the controller:
//!
//! - [`genome::Genome`] — one candidate network plus its fitness score
//! - [`population::PopulationStore`] — exclusive owner of the live
//!   population, with atomic replacement and snapshot import/export
//! - [`genetic`] — the evolution step: fitness ranking, elitism,
//!   single-point bias crossover, and parameter mutation
//!
//! # Evolution cycle
//!
//! 1. A generation run scores every genome (see `dinoai-session`)
//! 2. [`genetic::EvolutionEngine::evolve`] ranks the population by those
//!    scores, keeps the top elites verbatim, and fills the rest of the next
//!    generation with crossover children and mutated elite copies
//! 3. The store adopts the new population wholesale; the old one is dropped
//!
//! All stochastic operations take a caller-provided `Rng`, so tests drive
//! them with a seeded generator.

pub mod genetic;
pub mod genome;
pub mod population;
