//! The evolution step: ranking, elitism, crossover, mutation.
//!
//! One call to [`EvolutionEngine::evolve`] turns a scored generation into
//! the next one:
//!
//! 1. Each genome is assigned the terminal score of its game instance
//! 2. The population is ranked by fitness, best first (ties keep their
//!    original order)
//! 3. The top `elite_count` genomes survive verbatim as deep copies
//! 4. Crossover children of random elite pairs fill the population up to
//!    `size - size/5`
//! 5. Mutated copies of random elites fill the remainder
//!
//! Crossover is single-point over neuron biases only; connection weights
//! pass through a parent untouched. Mutation perturbs each bias and weight
//! independently with probability `learning_rate`, combining a
//! proportional term with an additive one so parameters near zero can
//! still move.

use std::mem;

use dinoai_network::NetworkParameters;
use rand::Rng;

use crate::genome::Genome;

pub const DEFAULT_ELITE_COUNT: usize = 4;
pub const DEFAULT_LEARNING_RATE: f64 = 0.3;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum EvolveError {
    /// No completed generation to evolve from.
    #[display("no fitness data: run a generation before evolving")]
    NoFitnessData,
    #[display("got {actual} scores for {expected} genomes")]
    ScoreCountMismatch { expected: usize, actual: usize },
}

/// Evolution parameters; one instance drives every generation.
#[derive(Debug, Clone, Copy)]
pub struct EvolutionEngine {
    /// Number of top genomes carried over unchanged.
    pub elite_count: usize,
    /// Per-parameter probability of mutation.
    pub learning_rate: f64,
}

impl Default for EvolutionEngine {
    fn default() -> Self {
        Self {
            elite_count: DEFAULT_ELITE_COUNT,
            learning_rate: DEFAULT_LEARNING_RATE,
        }
    }
}

impl EvolutionEngine {
    /// Produces the next generation from the current population and the
    /// terminal scores of its generation run.
    ///
    /// Elites keep the fitness they were scored with; crossover and
    /// mutation children start back at zero. The returned population has
    /// the same length as the input.
    pub fn evolve<R>(
        &self,
        population: &[Genome],
        scores: &[f64],
        rng: &mut R,
    ) -> Result<Vec<Genome>, EvolveError>
    where
        R: Rng + ?Sized,
    {
        if scores.is_empty() {
            return Err(EvolveError::NoFitnessData);
        }
        if scores.len() != population.len() {
            return Err(EvolveError::ScoreCountMismatch {
                expected: population.len(),
                actual: scores.len(),
            });
        }

        let mut ranked: Vec<Genome> = population
            .iter()
            .cloned()
            .zip(scores)
            .map(|(mut genome, &score)| {
                genome.set_fitness(score);
                genome
            })
            .collect();
        // stable sort: equal scores keep their original order
        ranked.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));

        let size = population.len();
        let elites = &ranked[..self.elite_count.min(size)];

        let mut next: Vec<Genome> = elites.to_vec();

        // crossover phase fills 4/5 of the population
        let crossover_target = size - size / 5;
        while next.len() < crossover_target {
            let a = pick(elites, rng);
            let b = pick(elites, rng);
            let child = cross_over(a.network(), b.network(), rng);
            next.push(Genome::new(child));
        }

        // mutation-only phase fills the rest
        while next.len() < size {
            let parent = pick(elites, rng);
            let mut network = parent.network().clone();
            mutate(&mut network, self.learning_rate, rng);
            next.push(Genome::new(network));
        }

        Ok(next)
    }
}

fn pick<'a, R>(elites: &'a [Genome], rng: &mut R) -> &'a Genome
where
    R: Rng + ?Sized,
{
    &elites[rng.random_range(0..elites.len())]
}

/// Single-point crossover over neuron biases.
///
/// With probability 0.5 the parents swap roles first, removing positional
/// bias between the two picks. Both parents are deep-copied; a cut index
/// is drawn uniformly from `[0, neuron_count]` and every bias at or after
/// it is exchanged between the copies. The copy holding role `a` after the
/// optional swap is returned, connections untouched.
///
/// # Panics
///
/// Panics if the parents do not share one topology; the population store
/// guarantees this for every population it adopts.
pub fn cross_over<R>(a: &NetworkParameters, b: &NetworkParameters, rng: &mut R) -> NetworkParameters
where
    R: Rng + ?Sized,
{
    assert_eq!(
        a.shape(),
        b.shape(),
        "crossover requires identical topologies"
    );

    let (mut mother, mut father) = if rng.random_bool(0.5) {
        (b.clone(), a.clone())
    } else {
        (a.clone(), b.clone())
    };

    let cut = rng.random_range(0..=mother.neurons.len());
    for i in cut..mother.neurons.len() {
        mem::swap(&mut mother.neurons[i].bias, &mut father.neurons[i].bias);
    }

    mother
}

/// Perturbs every bias and connection weight independently with
/// probability `learning_rate`.
///
/// Mutation happens in place; callers that need the original must clone
/// first. `learning_rate` 0 leaves the network untouched, 1 touches every
/// parameter.
pub fn mutate<R>(network: &mut NetworkParameters, learning_rate: f64, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for neuron in &mut network.neurons {
        perturb(&mut neuron.bias, learning_rate, rng);
    }
    for connection in &mut network.connections {
        perturb(&mut connection.weight, learning_rate, rng);
    }
}

fn perturb<R>(value: &mut f64, rate: f64, rng: &mut R)
where
    R: Rng + ?Sized,
{
    if !rng.random_bool(rate) {
        return;
    }
    // proportional term scales with the current value, the additive term
    // keeps zero-valued parameters from being stuck
    let proportional = rng.random::<f64>() - 0.5;
    let additive = rng.random::<f64>() - 0.5;
    *value += *value * proportional * 3.0 + additive;
}
