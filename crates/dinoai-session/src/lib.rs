//! Generation-execution protocol between the controller and the game.
//!
//! One generation pairs every genome with a live game instance. The
//! controller resets the game layer, waits for the instances to come up,
//! starts them, answers each per-tick sensor batch with one action per
//! genome, and harvests the terminal scores when every instance has died.
//!
//! The exchange is modeled as an explicit state machine
//! ([`runner::GenerationRunner`]) over a transport-agnostic
//! [`gateway::SessionGateway`]; the logical message set lives in
//! [`message`]. The per-genome action decision is [`evaluator::decide`].

pub use self::{
    evaluator::{CROUCH_THRESHOLD, JUMP_THRESHOLD, decide},
    gateway::{ChannelGateway, GameEndpoint, GatewayError, SessionGateway},
    message::{Action, ControllerMessage, GameMessage, SensorReading},
    runner::{GenerationRunner, RunError, RunnerState},
};

pub mod evaluator;
pub mod gateway;
pub mod message;
pub mod runner;
