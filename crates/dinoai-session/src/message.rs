//! Logical message set of the session protocol.
//!
//! These are the five exchanges of one generation, independent of any
//! transport framing. Instance-indexed arrays (`readings`, `actions`,
//! `scores`) are always ordered to match the population; a `null` entry is
//! the inactive sentinel for an instance that has already died.

use serde::{Deserialize, Serialize};

/// Per-instance sensor data for one tick.
///
/// `obstacle_distance` is `+inf` when no obstacle is in view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub obstacle_distance: f64,
    pub obstacle_width: f64,
    pub obstacle_speed: f64,
}

/// What a controller tells one game instance to do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    None,
    Jump,
    Crouch,
}

/// Controller → game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ControllerMessage {
    /// Tear down and rebuild `genome_count` fresh instances.
    Reset { genome_count: usize, generation: u64 },
    /// Begin the run; sent once after the ready signal.
    Start,
    /// Reply to one sensor batch, index-aligned with the population.
    Actions { actions: Vec<Option<Action>> },
}

/// Game → controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GameMessage {
    /// All instances rebuilt and waiting for the start directive.
    PlayersReady,
    /// One sensor batch; expects an `Actions` reply.
    Input { readings: Vec<Option<SensorReading>> },
    /// Terminal scores, one per instance; ends the generation.
    #[serde(rename = "gameover")]
    GameOver { scores: Vec<f64> },
}

impl GameMessage {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            GameMessage::PlayersReady => "players-ready",
            GameMessage::Input { .. } => "input",
            GameMessage::GameOver { .. } => "gameover",
        }
    }
}
