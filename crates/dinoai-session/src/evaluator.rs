//! Per-tick action decision for one genome.

use dinoai_network::{ActivateError, NetworkParameters};

use crate::message::{Action, SensorReading};

/// Outputs below this press crouch.
pub const CROUCH_THRESHOLD: f64 = 0.45;
/// Outputs above this press jump.
pub const JUMP_THRESHOLD: f64 = 0.55;

/// Maps one sensor reading to an action by forward-evaluating `network`.
///
/// An inactive reading (`None`) is mirrored back immediately without
/// evaluating the network; dead instances cost nothing per tick. Otherwise
/// the input vector is `[distance, width, speed]` and the scalar output is
/// thresholded: below [`CROUCH_THRESHOLD`] crouches, above
/// [`JUMP_THRESHOLD`] jumps, the band in between does nothing.
pub fn decide(
    network: &NetworkParameters,
    reading: Option<&SensorReading>,
) -> Result<Option<Action>, ActivateError> {
    let Some(reading) = reading else {
        return Ok(None);
    };

    let inputs = [
        reading.obstacle_distance,
        reading.obstacle_width,
        reading.obstacle_speed,
    ];
    let output = network.activate(&inputs)?;

    let action = if output < CROUCH_THRESHOLD {
        Action::Crouch
    } else if output > JUMP_THRESHOLD {
        Action::Jump
    } else {
        Action::None
    };
    Ok(Some(action))
}

#[cfg(test)]
mod tests {
    use dinoai_network::{Connection, Neuron, NeuronRole};

    use super::*;

    /// Ignores its input entirely: output is `sigmoid(bias)`.
    fn constant_output_net(output: f64) -> NetworkParameters {
        let bias = (output / (1.0 - output)).ln();
        NetworkParameters {
            neurons: vec![
                Neuron {
                    id: 0,
                    role: NeuronRole::Input,
                    bias: 0.0,
                },
                Neuron {
                    id: 1,
                    role: NeuronRole::Input,
                    bias: 0.0,
                },
                Neuron {
                    id: 2,
                    role: NeuronRole::Input,
                    bias: 0.0,
                },
                Neuron {
                    id: 3,
                    role: NeuronRole::Output,
                    bias,
                },
            ],
            // connects from the speed input, which tests keep finite:
            // 0.0 * distance would be NaN for an infinite distance
            connections: vec![Connection {
                from: 2,
                to: 3,
                weight: 0.0,
            }],
        }
    }

    fn reading() -> SensorReading {
        SensorReading {
            obstacle_distance: 42.0,
            obstacle_width: 17.0,
            obstacle_speed: 6.0,
        }
    }

    #[test]
    fn test_threshold_bands() {
        let cases = [
            (0.2, Action::Crouch),
            (0.44, Action::Crouch),
            (0.5, Action::None),
            (0.56, Action::Jump),
            (0.9, Action::Jump),
        ];
        for (output, expected) in cases {
            let net = constant_output_net(output);
            let action = decide(&net, Some(&reading())).unwrap();
            assert_eq!(action, Some(expected), "output {output}");
        }
    }

    #[test]
    fn test_midpoint_is_exactly_no_action() {
        // zero bias, zero weight: output is sigmoid(0) = 0.5 exactly
        let net = constant_output_net(0.5);
        assert_eq!(net.neurons[3].bias, 0.0);
        assert_eq!(decide(&net, Some(&reading())).unwrap(), Some(Action::None));
    }

    #[test]
    fn test_inactive_reading_short_circuits() {
        // this network cannot be activated at all; reaching it would error
        let broken = NetworkParameters {
            neurons: vec![],
            connections: vec![],
        };
        assert!(broken.activate(&[]).is_err());
        assert!(matches!(decide(&broken, None), Ok(None)));
    }

    #[test]
    fn test_infinite_distance_still_decides() {
        let net = constant_output_net(0.7);
        let far = SensorReading {
            obstacle_distance: f64::INFINITY,
            ..reading()
        };
        assert_eq!(decide(&net, Some(&far)).unwrap(), Some(Action::Jump));
    }
}
