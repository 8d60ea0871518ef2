//! One generation, end to end.
//!
//! The runner drives the reset / ready / start / input / gameover exchange
//! as an explicit state machine with guarded transitions. Signals that
//! arrive out of the expected state (or with the wrong instance count) are
//! logged and dropped; the protocol is cooperative with a game renderer
//! the controller does not control, so nothing short of a dead transport
//! or an unevaluable network aborts the generation.
//!
//! [`GenerationRunner::run`] consumes the runner, so a second generation
//! cannot be started on one that is already in flight, and its completion
//! resolves exactly once -- there are no subscriptions to tear down.

use dinoai_evolution::genome::Genome;
use dinoai_network::ActivateError;

use crate::{
    evaluator::decide,
    gateway::{GatewayError, SessionGateway},
    message::{ControllerMessage, GameMessage},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum RunnerState {
    Idle,
    Resetting,
    AwaitingReady,
    Running,
    Done,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum RunError {
    #[display("gateway failure: {_0}")]
    Gateway(GatewayError),
    #[display("network evaluation failed: {_0}")]
    Evaluate(ActivateError),
}

/// Executes one generation against a live game session.
#[derive(Debug)]
pub struct GenerationRunner<'a> {
    genomes: &'a [Genome],
    generation: u64,
    state: RunnerState,
}

impl<'a> GenerationRunner<'a> {
    #[must_use]
    pub fn new(genomes: &'a [Genome], generation: u64) -> Self {
        Self {
            genomes,
            generation,
            state: RunnerState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Runs the generation to completion and returns the terminal scores,
    /// index-aligned with the genomes.
    ///
    /// Blocks on the gateway between signals; the tick cadence is owned by
    /// the game layer. There is no timeout -- a stalled game session must
    /// be recovered by restarting it.
    pub fn run<G>(mut self, gateway: &mut G) -> Result<Vec<f64>, RunError>
    where
        G: SessionGateway + ?Sized,
    {
        eprintln!("Executing generation #{}", self.generation);

        self.state = RunnerState::Resetting;
        gateway.send(ControllerMessage::Reset {
            genome_count: self.genomes.len(),
            generation: self.generation,
        })?;
        self.state = RunnerState::AwaitingReady;

        loop {
            let message = gateway.recv()?;
            match (self.state, message) {
                (RunnerState::AwaitingReady, GameMessage::PlayersReady) => {
                    eprintln!("Starting players");
                    gateway.send(ControllerMessage::Start)?;
                    self.state = RunnerState::Running;
                }
                (RunnerState::Running, GameMessage::Input { readings })
                    if readings.len() == self.genomes.len() =>
                {
                    let actions = self
                        .genomes
                        .iter()
                        .zip(&readings)
                        .map(|(genome, reading)| decide(genome.network(), reading.as_ref()))
                        .collect::<Result<Vec<_>, _>>()?;
                    gateway.send(ControllerMessage::Actions { actions })?;
                }
                (RunnerState::Running, GameMessage::GameOver { scores })
                    if scores.len() == self.genomes.len() =>
                {
                    self.state = RunnerState::Done;
                    let mut best = scores.clone();
                    best.sort_by(f64::total_cmp);
                    best.reverse();
                    best.truncate(4);
                    eprintln!(
                        "Generation #{} over, best scores: {best:?}",
                        self.generation
                    );
                    return Ok(scores);
                }
                (state, message) => {
                    eprintln!(
                        "Ignoring unexpected {} signal in state {state:?}",
                        message.kind()
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use dinoai_network::NetworkParameters;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use crate::{
        gateway::ChannelGateway,
        message::{Action, SensorReading},
    };

    use super::*;

    fn genomes(count: usize) -> Vec<Genome> {
        let mut rng = Pcg32::seed_from_u64(31);
        (0..count)
            .map(|_| Genome::new(NetworkParameters::perceptron(3, 4, 1, &mut rng)))
            .collect()
    }

    fn reading() -> Option<SensorReading> {
        Some(SensorReading {
            obstacle_distance: 100.0,
            obstacle_width: 20.0,
            obstacle_speed: 6.0,
        })
    }

    #[test]
    fn test_happy_path_generation() {
        let genomes = genomes(3);
        let (mut gateway, game) = ChannelGateway::in_process();

        let game_side = thread::spawn(move || {
            assert_eq!(
                game.recv().unwrap(),
                ControllerMessage::Reset {
                    genome_count: 3,
                    generation: 7
                }
            );
            game.send(GameMessage::PlayersReady).unwrap();
            assert_eq!(game.recv().unwrap(), ControllerMessage::Start);

            // two ticks, second with a dead middle instance
            for readings in [
                vec![reading(), reading(), reading()],
                vec![reading(), None, reading()],
            ] {
                game.send(GameMessage::Input { readings }).unwrap();
                let ControllerMessage::Actions { actions } = game.recv().unwrap() else {
                    panic!("expected actions reply");
                };
                assert_eq!(actions.len(), 3);
            }

            game.send(GameMessage::GameOver {
                scores: vec![12.0, 4.0, 30.0],
            })
            .unwrap();
        });

        let runner = GenerationRunner::new(&genomes, 7);
        let scores = runner.run(&mut gateway).unwrap();
        assert_eq!(scores, [12.0, 4.0, 30.0]);
        game_side.join().unwrap();
    }

    #[test]
    fn test_dead_instances_mirror_inactive() {
        let genomes = genomes(2);
        let (mut gateway, game) = ChannelGateway::in_process();

        let game_side = thread::spawn(move || {
            game.recv().unwrap();
            game.send(GameMessage::PlayersReady).unwrap();
            game.recv().unwrap();

            game.send(GameMessage::Input {
                readings: vec![None, reading()],
            })
            .unwrap();
            let ControllerMessage::Actions { actions } = game.recv().unwrap() else {
                panic!("expected actions reply");
            };
            assert_eq!(actions[0], None);
            assert!(matches!(
                actions[1],
                Some(Action::None | Action::Jump | Action::Crouch)
            ));

            game.send(GameMessage::GameOver {
                scores: vec![1.0, 2.0],
            })
            .unwrap();
        });

        let scores = GenerationRunner::new(&genomes, 1)
            .run(&mut gateway)
            .unwrap();
        assert_eq!(scores, [1.0, 2.0]);
        game_side.join().unwrap();
    }

    #[test]
    fn test_out_of_order_signals_are_ignored() {
        let genomes = genomes(2);
        let (mut gateway, game) = ChannelGateway::in_process();

        let game_side = thread::spawn(move || {
            game.recv().unwrap();

            // both early: input before ready, gameover before running
            game.send(GameMessage::Input {
                readings: vec![reading(), reading()],
            })
            .unwrap();
            game.send(GameMessage::GameOver {
                scores: vec![9.0, 9.0],
            })
            .unwrap();

            game.send(GameMessage::PlayersReady).unwrap();
            assert_eq!(game.recv().unwrap(), ControllerMessage::Start);
            // a second ready signal mid-run is dropped too
            game.send(GameMessage::PlayersReady).unwrap();

            game.send(GameMessage::GameOver {
                scores: vec![5.0, 6.0],
            })
            .unwrap();

            // the early input was never answered: after the runner is done
            // the only thing left on this side is the closed channel
            assert!(matches!(game.recv(), Err(GatewayError::Closed)));
        });

        let scores = GenerationRunner::new(&genomes, 2)
            .run(&mut gateway)
            .unwrap();
        assert_eq!(scores, [5.0, 6.0]);
        drop(gateway);
        game_side.join().unwrap();
    }

    #[test]
    fn test_wrong_arity_batches_are_ignored() {
        let genomes = genomes(3);
        let (mut gateway, game) = ChannelGateway::in_process();

        let game_side = thread::spawn(move || {
            game.recv().unwrap();
            game.send(GameMessage::PlayersReady).unwrap();
            game.recv().unwrap();

            // two readings for three genomes: no reply expected
            game.send(GameMessage::Input {
                readings: vec![reading(), reading()],
            })
            .unwrap();
            // short score vector: not a valid terminal signal
            game.send(GameMessage::GameOver { scores: vec![1.0] }).unwrap();

            game.send(GameMessage::GameOver {
                scores: vec![1.0, 2.0, 3.0],
            })
            .unwrap();
            assert!(matches!(game.recv(), Err(GatewayError::Closed)));
        });

        let scores = GenerationRunner::new(&genomes, 3)
            .run(&mut gateway)
            .unwrap();
        assert_eq!(scores, [1.0, 2.0, 3.0]);
        drop(gateway);
        game_side.join().unwrap();
    }

    #[test]
    fn test_disconnected_game_aborts_run() {
        let genomes = genomes(2);
        let (mut gateway, game) = ChannelGateway::in_process();
        drop(game);

        let err = GenerationRunner::new(&genomes, 1)
            .run(&mut gateway)
            .unwrap_err();
        assert!(matches!(err, RunError::Gateway(GatewayError::Closed)));
    }
}
