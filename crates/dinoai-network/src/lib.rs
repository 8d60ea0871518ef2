//! Neural-network parameter model for the runner controller.
//!
//! A network is a flat, ordered list of neuron records (bias plus position
//! metadata) and connection records (weight plus endpoint ids). The ordering
//! is part of the model: genetic operators in `dinoai-evolution` cross
//! networks over positionally, so two networks of the same topology must
//! serialize to identically shaped record sequences.
//!
//! Forward evaluation is a plain sigmoid feed-forward pass over the record
//! order; see [`NetworkParameters::activate`].

pub use self::{
    forward::ActivateError,
    params::{
        Connection, NetworkParameters, NetworkShape, NetworkShapeError, Neuron, NeuronRole,
    },
};

mod forward;
mod params;
