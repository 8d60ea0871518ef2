//! The boundary between the controller and the running game instances.
//!
//! [`SessionGateway`] is the controller-side handle: fire-and-forget sends
//! of directives and action batches, and a blocking receive of the next
//! game signal. The generation runner suspends only here; every transport
//! (TCP in the CLI, in-process channels in tests) implements this trait.

use std::sync::mpsc::{Receiver, Sender, channel};

use crate::message::{ControllerMessage, GameMessage};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum GatewayError {
    /// The game side went away.
    #[display("session closed by the game side")]
    Closed,
    #[display("transport failure: {_0}")]
    Io(std::io::Error),
    #[display("message framing failure: {_0}")]
    Codec(serde_json::Error),
}

/// Controller-side channel to the game layer.
pub trait SessionGateway {
    fn send(&mut self, message: ControllerMessage) -> Result<(), GatewayError>;

    /// Blocks until the game sends its next signal.
    fn recv(&mut self) -> Result<GameMessage, GatewayError>;
}

/// In-process gateway over `std::sync::mpsc`, paired with a
/// [`GameEndpoint`] by [`ChannelGateway::in_process`].
#[derive(Debug)]
pub struct ChannelGateway {
    tx: Sender<ControllerMessage>,
    rx: Receiver<GameMessage>,
}

impl ChannelGateway {
    /// Builds a connected gateway/endpoint pair for tests and in-process
    /// game simulations.
    #[must_use]
    pub fn in_process() -> (ChannelGateway, GameEndpoint) {
        let (controller_tx, controller_rx) = channel();
        let (game_tx, game_rx) = channel();
        (
            ChannelGateway {
                tx: controller_tx,
                rx: game_rx,
            },
            GameEndpoint {
                tx: game_tx,
                rx: controller_rx,
            },
        )
    }
}

impl SessionGateway for ChannelGateway {
    fn send(&mut self, message: ControllerMessage) -> Result<(), GatewayError> {
        self.tx.send(message).map_err(|_| GatewayError::Closed)
    }

    fn recv(&mut self) -> Result<GameMessage, GatewayError> {
        self.rx.recv().map_err(|_| GatewayError::Closed)
    }
}

/// The game side of an in-process pair; what a simulated game session
/// holds in tests.
#[derive(Debug)]
pub struct GameEndpoint {
    tx: Sender<GameMessage>,
    rx: Receiver<ControllerMessage>,
}

impl GameEndpoint {
    pub fn send(&self, message: GameMessage) -> Result<(), GatewayError> {
        self.tx.send(message).map_err(|_| GatewayError::Closed)
    }

    pub fn recv(&self) -> Result<ControllerMessage, GatewayError> {
        self.rx.recv().map_err(|_| GatewayError::Closed)
    }
}
