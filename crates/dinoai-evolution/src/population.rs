//! Owner of the live population.
//!
//! The store holds exactly one population of fixed size and replaces it
//! atomically: import and clone operations fully parse and validate their
//! input before anything visible changes, so a bad snapshot can never
//! partially overwrite a good population.

use dinoai_network::{NetworkParameters, NetworkShape, NetworkShapeError};
use rand::Rng;

use crate::genome::Genome;

// Default topology for freshly initialized populations: the sensor vector
// (distance, width, speed) in, the single action scalar out.
const INPUT_NEURONS: usize = 3;
const HIDDEN_NEURONS: usize = 4;
const OUTPUT_NEURONS: usize = 1;

#[derive(Debug, Clone, Copy, derive_more::Display, derive_more::Error)]
#[display("genome {index} not found (population holds {len})")]
pub struct GenomeNotFound {
    pub index: usize,
    pub len: usize,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SnapshotError {
    /// The bytes do not parse as the expected structure (missing fields,
    /// non-numeric fitness, absent network shape, invalid JSON).
    #[display("malformed snapshot: {_0}")]
    Malformed(serde_json::Error),
    #[display("snapshot encoding failed: {_0}")]
    Encode(serde_json::Error),
    #[display("snapshot holds {actual} genomes, expected {expected}")]
    WrongGenomeCount { expected: usize, actual: usize },
    #[display("snapshot mixes network topologies: {first} vs {other}")]
    TopologyMismatch {
        first: NetworkShape,
        other: NetworkShape,
    },
    #[display("invalid network in snapshot: {_0}")]
    InvalidNetwork(NetworkShapeError),
}

/// Exclusive owner of the current generation's genomes.
#[derive(Debug, Clone)]
pub struct PopulationStore {
    size: usize,
    genomes: Vec<Genome>,
}

impl PopulationStore {
    /// Creates `size` genomes sharing the default perceptron topology, all
    /// with fresh random parameters and zero fitness.
    #[must_use]
    pub fn initialize<R>(size: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let genomes = (0..size)
            .map(|_| {
                Genome::new(NetworkParameters::perceptron(
                    INPUT_NEURONS,
                    HIDDEN_NEURONS,
                    OUTPUT_NEURONS,
                    rng,
                ))
            })
            .collect();
        Self { size, genomes }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn get(&self, index: usize) -> Result<&Genome, GenomeNotFound> {
        self.genomes.get(index).ok_or(GenomeNotFound {
            index,
            len: self.genomes.len(),
        })
    }

    /// Atomically swaps in the next generation; the old one is dropped.
    ///
    /// # Panics
    ///
    /// Panics if `next` does not hold exactly `size` genomes -- producing a
    /// wrongly sized generation is a programming error, not an input error.
    pub fn replace(&mut self, next: Vec<Genome>) {
        assert_eq!(next.len(), self.size, "population size invariant broken");
        self.genomes = next;
    }

    /// Serializes the full population (fitness and network for every
    /// genome) as self-describing JSON.
    pub fn export_snapshot(&self) -> Result<Vec<u8>, SnapshotError> {
        serde_json::to_vec_pretty(&self.genomes).map_err(SnapshotError::Encode)
    }

    /// Parses a snapshot and replaces the population with its genomes.
    ///
    /// The snapshot must hold exactly `size` genomes of one shared
    /// topology; anything else is rejected before the current population
    /// is touched.
    pub fn import_snapshot(&mut self, bytes: &[u8]) -> Result<(), SnapshotError> {
        let genomes: Vec<Genome> =
            serde_json::from_slice(bytes).map_err(SnapshotError::Malformed)?;
        if genomes.len() != self.size {
            return Err(SnapshotError::WrongGenomeCount {
                expected: self.size,
                actual: genomes.len(),
            });
        }
        check_uniform_topology(&genomes)?;
        self.genomes = genomes;
        Ok(())
    }

    /// Parses one network definition and seeds the whole population with
    /// `size` independent copies of it, each with zero fitness.
    pub fn clone_singleton(&mut self, network_bytes: &[u8]) -> Result<(), SnapshotError> {
        let network: NetworkParameters =
            serde_json::from_slice(network_bytes).map_err(SnapshotError::Malformed)?;
        network.validate().map_err(SnapshotError::InvalidNetwork)?;
        self.genomes = (0..self.size)
            .map(|_| Genome::new(network.clone()))
            .collect();
        Ok(())
    }
}

fn check_uniform_topology(genomes: &[Genome]) -> Result<(), SnapshotError> {
    let mut first = None;
    for genome in genomes {
        genome
            .network()
            .validate()
            .map_err(SnapshotError::InvalidNetwork)?;
        let shape = genome.network().shape();
        match first {
            None => first = Some(shape),
            Some(first) if first != shape => {
                return Err(SnapshotError::TopologyMismatch {
                    first,
                    other: shape,
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}
