use std::collections::HashMap;

use crate::{NetworkParameters, NeuronRole};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ActivateError {
    #[display("expected {expected} inputs, got {actual}")]
    InputLengthMismatch { expected: usize, actual: usize },
    #[display("connection from unknown or not-yet-evaluated neuron id {id}")]
    UnknownSource { id: u32 },
    #[display("network has no output neuron")]
    NoOutputNeuron,
}

impl NetworkParameters {
    /// Forward-evaluates the network over `inputs` and returns the scalar
    /// activation of the first output neuron, in [0, 1].
    ///
    /// Input neurons take the input values positionally and pass them
    /// through unsquashed; every other neuron computes
    /// `sigmoid(bias + Σ weight·activation(source))`. Records are evaluated
    /// in stored order, which is feed-forward by construction, so a
    /// connection from a later record is an error rather than a stale read.
    pub fn activate(&self, inputs: &[f64]) -> Result<f64, ActivateError> {
        let expected = self.input_len();
        if inputs.len() != expected {
            return Err(ActivateError::InputLengthMismatch {
                expected,
                actual: inputs.len(),
            });
        }

        let mut activations: HashMap<u32, f64> = HashMap::with_capacity(self.neurons.len());
        let mut next_input = 0;
        let mut output = None;
        for neuron in &self.neurons {
            let value = match neuron.role {
                NeuronRole::Input => {
                    let value = inputs[next_input];
                    next_input += 1;
                    value
                }
                NeuronRole::Hidden | NeuronRole::Output => {
                    let mut sum = neuron.bias;
                    for connection in self.connections.iter().filter(|c| c.to == neuron.id) {
                        let source = activations
                            .get(&connection.from)
                            .ok_or(ActivateError::UnknownSource {
                                id: connection.from,
                            })?;
                        sum += connection.weight * source;
                    }
                    sigmoid(sum)
                }
            };
            activations.insert(neuron.id, value);
            if neuron.role == NeuronRole::Output && output.is_none() {
                output = Some(value);
            }
        }

        output.ok_or(ActivateError::NoOutputNeuron)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
