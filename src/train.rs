//! Backpropagation: delta computation and the in-place weight update.
//!
//! Training is online stochastic gradient descent on one example at a time.
//! There is no gradient accumulation buffer; weight corrections are applied
//! directly to the weight region as they are computed.

use log::trace;

use crate::{activation::Activation, error::NetError, network::Network};

impl Network {
    /// One backprop update: forward pass, output and hidden deltas, weight
    /// update.
    ///
    /// Composition of [`Network::prepare_inputs`],
    /// [`Network::prepare_desired_outputs`] and
    /// [`Network::process_training`]; use the decomposed steps when the
    /// desired outputs can only be derived after seeing the forward result.
    ///
    /// # Errors
    /// Returns `NetError::ShapeMismatch` when either vector does not match
    /// the configuration.
    pub fn train(
        &mut self,
        inputs: &[f64],
        desired_outputs: &[f64],
        learning_rate: f64,
    ) -> Result<(), NetError> {
        self.prepare_inputs(inputs)?;
        self.prepare_desired_outputs(desired_outputs)?;
        self.process_training(learning_rate);
        Ok(())
    }

    /// Runs the network forward so the scratch area holds every activation
    /// the update step needs.
    pub fn prepare_inputs(&mut self, inputs: &[f64]) -> Result<(), NetError> {
        self.run(inputs).map(|_| ())
    }

    /// Computes the output layer's deltas against `desired_outputs`.
    ///
    /// With a linear output activation the delta is the raw error; for the
    /// sigmoid family it is scaled by the sigmoid derivative expressed in
    /// terms of the activation itself.
    ///
    /// # Errors
    /// Returns `NetError::ShapeMismatch` when the vector does not match the
    /// configured output count.
    pub fn prepare_desired_outputs(&mut self, desired_outputs: &[f64]) -> Result<(), NetError> {
        let outputs = self.config.outputs();
        if desired_outputs.len() != outputs {
            return Err(NetError::ShapeMismatch {
                what: "desired outputs",
                got: desired_outputs.len(),
                expected: outputs,
            });
        }

        let o = self.layout.output_slots().start;
        let d = self.layout.output_deltas().start;

        match self.output_activation {
            Activation::Linear => {
                for j in 0..outputs {
                    self.data[d + j] = desired_outputs[j] - self.data[o + j];
                }
            }
            _ => {
                for j in 0..outputs {
                    let actual = self.data[o + j];
                    self.data[d + j] = (desired_outputs[j] - actual) * actual * (1.0 - actual);
                }
            }
        }
        Ok(())
    }

    /// Backpropagates the output deltas through the hidden layers and applies
    /// the weight update, scaled by `learning_rate`.
    ///
    /// Must follow [`Network::prepare_inputs`] and
    /// [`Network::prepare_desired_outputs`] on the same example.
    pub fn process_training(&mut self, learning_rate: f64) {
        self.backpropagate_hidden_deltas();
        self.update_output_weights(learning_rate);
        self.update_hidden_weights(learning_rate);
        trace!(rate = learning_rate; "applied weight update");
    }

    /// Hidden deltas, last hidden layer first. Skipped entirely for networks
    /// without hidden layers.
    fn backpropagate_hidden_deltas(&mut self) {
        let layers = self.config.hidden_layers();
        let hidden = self.config.hidden();

        for h in (0..layers).rev() {
            let o = self.layout.hidden_layer_outputs(h).start;
            let d = self.layout.hidden_layer_deltas(h).start;

            // The following layer may be hidden or the output layer; either
            // way its per-neuron weight block is `hidden + 1` wide here.
            let (next_deltas, next_weights) = if h + 1 == layers {
                (self.layout.output_deltas(), self.layout.output_layer_weights())
            } else {
                (
                    self.layout.hidden_layer_deltas(h + 1),
                    self.layout.hidden_layer_weights(h + 1),
                )
            };
            let next_count = next_deltas.len();

            for j in 0..hidden {
                let mut delta = 0.0;
                for k in 0..next_count {
                    let forward_delta = self.data[next_deltas.start + k];
                    // Slot 0 of each block is the bias, so connection j sits
                    // at offset j + 1.
                    let forward_weight =
                        self.data[next_weights.start + k * (hidden + 1) + (j + 1)];
                    delta += forward_delta * forward_weight;
                }
                let out = self.data[o + j];
                self.data[d + j] = out * (1.0 - out) * delta;
            }
        }
    }

    /// Applies the update to the output layer's weights from its deltas and
    /// the last hidden layer's activations (or the raw inputs when there are
    /// no hidden layers).
    fn update_output_weights(&mut self, learning_rate: f64) {
        let layers = self.config.hidden_layers();

        let d = self.layout.output_deltas().start;
        let first_input = if layers > 0 {
            self.layout.hidden_layer_outputs(layers - 1).start
        } else {
            self.layout.input_slots().start
        };
        let fan_in = self.layout.output_fan_in();

        let mut w = self.layout.output_layer_weights().start;
        for j in 0..self.config.outputs() {
            let delta = self.data[d + j];
            self.apply_correction(&mut w, delta * learning_rate, first_input, fan_in);
        }
    }

    /// Applies the update to every hidden layer's weights, last layer first,
    /// each from its own deltas and the preceding layer's activations.
    fn update_hidden_weights(&mut self, learning_rate: f64) {
        let layers = self.config.hidden_layers();
        let hidden = self.config.hidden();

        for h in (0..layers).rev() {
            let d = self.layout.hidden_layer_deltas(h).start;
            let first_input = if h == 0 {
                self.layout.input_slots().start
            } else {
                self.layout.hidden_layer_outputs(h - 1).start
            };
            let fan_in = self.layout.hidden_fan_in(h);

            let mut w = self.layout.hidden_layer_weights(h).start;
            for j in 0..hidden {
                let delta = self.data[d + j];
                self.apply_correction(&mut w, delta * learning_rate, first_input, fan_in);
            }
        }
    }

    /// Corrects one neuron's weight block in place: the bias weight moves
    /// against its constant -1 input, each connection weight along its
    /// source activation. Advances the weight cursor past the block.
    fn apply_correction(&mut self, w: &mut usize, step: f64, first_input: usize, fan_in: usize) {
        self.data[*w] += step * -1.0;
        *w += 1;
        for k in 0..fan_in {
            self.data[*w] += step * self.data[first_input + k];
            *w += 1;
        }
    }
}
