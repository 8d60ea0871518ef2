use dinoai_network::NetworkParameters;
use serde::{Deserialize, Serialize};

/// One candidate controller: a network definition and its fitness score.
///
/// Fitness starts at zero and is assigned exactly once per generation, from
/// the terminal score of the game instance the genome was paired with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    fitness: f64,
    network: NetworkParameters,
}

impl Genome {
    #[must_use]
    pub fn new(network: NetworkParameters) -> Self {
        Self {
            fitness: 0.0,
            network,
        }
    }

    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    #[must_use]
    pub fn network(&self) -> &NetworkParameters {
        &self.network
    }

    pub(crate) fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}
