use rand::Rng;
use serde::{Deserialize, Serialize};

/// Where a neuron sits in the feed-forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeuronRole {
    Input,
    Hidden,
    Output,
}

/// One neuron record: identity, position metadata, and its bias.
///
/// Records are stored in feed-forward order (inputs first, outputs last);
/// the position of a record in [`NetworkParameters::neurons`] is meaningful
/// for positional crossover and must be stable across serialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neuron {
    pub id: u32,
    pub role: NeuronRole,
    pub bias: f64,
}

/// One weighted connection between two neurons, referenced by id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: u32,
    pub to: u32,
    pub weight: f64,
}

/// Neuron and connection counts, used to compare topologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("{neurons} neurons / {connections} connections")]
pub struct NetworkShape {
    pub neurons: usize,
    pub connections: usize,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum NetworkShapeError {
    #[display("network has no input neurons")]
    NoInputNeurons,
    #[display("network has no output neuron")]
    NoOutputNeuron,
    #[display("duplicate neuron id {id}")]
    DuplicateNeuronId { id: u32 },
    #[display("connection references unknown neuron id {id}")]
    UnknownEndpoint { id: u32 },
}

/// A complete serializable network: ordered neurons plus ordered connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkParameters {
    pub neurons: Vec<Neuron>,
    pub connections: Vec<Connection>,
}

impl NetworkParameters {
    /// Builds a fully-connected feed-forward perceptron.
    ///
    /// Neurons get sequential ids in layer order (input, hidden, output);
    /// connections are ordered input→hidden first, then hidden→output.
    /// Biases and weights start uniformly in [-0.1, 0.1]; input neurons
    /// carry a zero bias, which the forward pass never applies.
    #[must_use]
    pub fn perceptron<R>(inputs: usize, hidden: usize, outputs: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut neurons = Vec::with_capacity(inputs + hidden + outputs);
        let mut next_id = 0u32;
        let mut input_ids = Vec::with_capacity(inputs);
        let mut hidden_ids = Vec::with_capacity(hidden);
        let mut output_ids = Vec::with_capacity(outputs);
        for (count, role, ids) in [
            (inputs, NeuronRole::Input, &mut input_ids),
            (hidden, NeuronRole::Hidden, &mut hidden_ids),
            (outputs, NeuronRole::Output, &mut output_ids),
        ] {
            for _ in 0..count {
                let bias = match role {
                    NeuronRole::Input => 0.0,
                    NeuronRole::Hidden | NeuronRole::Output => init_value(rng),
                };
                neurons.push(Neuron {
                    id: next_id,
                    role,
                    bias,
                });
                ids.push(next_id);
                next_id += 1;
            }
        }

        let mut connections = Vec::with_capacity(inputs * hidden + hidden * outputs);
        for &from in &input_ids {
            for &to in &hidden_ids {
                connections.push(Connection {
                    from,
                    to,
                    weight: init_value(rng),
                });
            }
        }
        for &from in &hidden_ids {
            for &to in &output_ids {
                connections.push(Connection {
                    from,
                    to,
                    weight: init_value(rng),
                });
            }
        }

        Self {
            neurons,
            connections,
        }
    }

    /// Checks structural integrity without evaluating anything.
    ///
    /// Import paths must call this before adopting an externally produced
    /// network, so a malformed definition is rejected up front rather than
    /// failing mid-generation.
    pub fn validate(&self) -> Result<(), NetworkShapeError> {
        let mut seen = Vec::with_capacity(self.neurons.len());
        for neuron in &self.neurons {
            if seen.contains(&neuron.id) {
                return Err(NetworkShapeError::DuplicateNeuronId { id: neuron.id });
            }
            seen.push(neuron.id);
        }
        if !self
            .neurons
            .iter()
            .any(|n| n.role == NeuronRole::Input)
        {
            return Err(NetworkShapeError::NoInputNeurons);
        }
        if !self
            .neurons
            .iter()
            .any(|n| n.role == NeuronRole::Output)
        {
            return Err(NetworkShapeError::NoOutputNeuron);
        }
        for connection in &self.connections {
            for id in [connection.from, connection.to] {
                if !seen.contains(&id) {
                    return Err(NetworkShapeError::UnknownEndpoint { id });
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn shape(&self) -> NetworkShape {
        NetworkShape {
            neurons: self.neurons.len(),
            connections: self.connections.len(),
        }
    }

    /// Number of input-role neurons, i.e. the expected input vector length.
    #[must_use]
    pub fn input_len(&self) -> usize {
        self.neurons
            .iter()
            .filter(|n| n.role == NeuronRole::Input)
            .count()
    }
}

fn init_value<R>(rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    rng.random_range(-0.1..0.1)
}
