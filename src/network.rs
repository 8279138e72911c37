use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{activation::Activation, config::NetConfig, error::NetError, layout::Layout};

/// Seed used for the initial weight fill at construction time.
const DEFAULT_SEED: u64 = 0;

/// A fully-connected feedforward network over one flat `f64` buffer.
///
/// The buffer is partitioned by [`Layout`] into weights, neuron outputs and
/// deltas; every operation mutates it in place and nothing ever resizes it.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) config: NetConfig,
    pub(crate) layout: Layout,
    pub(crate) hidden_activation: Activation,
    pub(crate) output_activation: Activation,
    pub(crate) data: Vec<f64>,
}

impl Network {
    /// Creates a network and fills its weights from the default seed.
    ///
    /// # Args
    /// * `inputs` - Number of input slots, at least 1.
    /// * `hidden_layers` - Number of hidden layers, may be 0.
    /// * `hidden` - Neurons per hidden layer (raised to 1 when 0 and
    ///   `hidden_layers > 0`).
    /// * `outputs` - Number of output neurons, at least 1.
    ///
    /// # Errors
    /// Returns `NetError::InvalidInput` for a degenerate shape.
    pub fn new(
        inputs: usize,
        hidden_layers: usize,
        hidden: usize,
        outputs: usize,
    ) -> Result<Self, NetError> {
        Ok(Self::from_config(NetConfig::new(
            inputs,
            hidden_layers,
            hidden,
            outputs,
        )?))
    }

    /// Creates a network from an already-validated configuration.
    pub fn from_config(config: NetConfig) -> Self {
        let layout = Layout::new(config);
        layout.validate();

        let mut net = Self {
            config,
            data: vec![0.0; layout.buffer_len()],
            layout,
            hidden_activation: Activation::default(),
            output_activation: Activation::default(),
        };
        net.randomize(DEFAULT_SEED);

        debug!(
            weights = net.layout.total_weights(),
            neurons = net.layout.total_neurons();
            "created network"
        );
        net
    }

    /// Overwrites the weight region with uniform draws from `[-0.5, 0.5)`.
    ///
    /// Deterministic for a given seed. Neuron outputs and deltas are left
    /// untouched.
    pub fn randomize(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let weights = self.layout.weights();
        for w in &mut self.data[weights] {
            *w = rng.random::<f64>() - 0.5;
        }
    }

    /// Runs the feedforward algorithm and returns the output layer's
    /// activations.
    ///
    /// The returned slice borrows the network's buffer, so it is only valid
    /// until the next `run`/`train` call overwrites it.
    ///
    /// # Errors
    /// Returns `NetError::ShapeMismatch` when `inputs` does not match the
    /// configured input count.
    pub fn run(&mut self, inputs: &[f64]) -> Result<&[f64], NetError> {
        let n = self.config.inputs();
        if inputs.len() != n {
            return Err(NetError::ShapeMismatch {
                what: "inputs",
                got: inputs.len(),
                expected: n,
            });
        }

        // Inputs live in the scratch area next to every neuron's output, so
        // the first layer is not a special case.
        let input_slots = self.layout.input_slots();
        self.data[input_slots.clone()].copy_from_slice(inputs);

        let mut w = 0; // weight cursor, advances over the whole region
        let mut o = input_slots.end; // next activation slot to fill
        let mut i = input_slots.start; // first output of the previous layer

        if self.config.hidden_layers() == 0 {
            for _ in 0..self.config.outputs() {
                let sum = self.weighted_sum(&mut w, i, n);
                self.data[o] = self.output_activation.apply(sum);
                o += 1;
            }
            return Ok(&self.data[self.layout.output_slots()]);
        }

        // First hidden layer reads the input slots.
        for _ in 0..self.config.hidden() {
            let sum = self.weighted_sum(&mut w, i, n);
            self.data[o] = self.hidden_activation.apply(sum);
            o += 1;
        }
        i += n;

        // Remaining hidden layers, if any.
        for _ in 1..self.config.hidden_layers() {
            for _ in 0..self.config.hidden() {
                let sum = self.weighted_sum(&mut w, i, self.config.hidden());
                self.data[o] = self.hidden_activation.apply(sum);
                o += 1;
            }
            i += self.config.hidden();
        }

        // Output layer.
        for _ in 0..self.config.outputs() {
            let sum = self.weighted_sum(&mut w, i, self.config.hidden());
            self.data[o] = self.output_activation.apply(sum);
            o += 1;
        }

        Ok(&self.data[self.layout.output_slots()])
    }

    /// One neuron's weighted sum: the bias weight times a constant -1 input,
    /// then one weight per previous-layer output. Advances the weight cursor
    /// past the neuron's block.
    fn weighted_sum(&self, w: &mut usize, first_input: usize, fan_in: usize) -> f64 {
        let mut sum = self.data[*w] * -1.0;
        *w += 1;
        for k in 0..fan_in {
            sum += self.data[*w] * self.data[first_input + k];
            *w += 1;
        }
        sum
    }

    #[inline]
    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The weight region, in the same linear order the persisted format uses.
    pub fn weights(&self) -> &[f64] {
        &self.data[self.layout.weights()]
    }

    pub fn weights_mut(&mut self) -> &mut [f64] {
        let weights = self.layout.weights();
        &mut self.data[weights]
    }

    #[inline]
    pub fn hidden_activation(&self) -> Activation {
        self.hidden_activation
    }

    #[inline]
    pub fn output_activation(&self) -> Activation {
        self.output_activation
    }

    pub fn set_hidden_activation(&mut self, activation: Activation) {
        self.hidden_activation = activation;
    }

    pub fn set_output_activation(&mut self, activation: Activation) {
        self.output_activation = activation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn randomize_is_deterministic_per_seed() {
        let mut a = Network::new(2, 1, 2, 1).unwrap();
        let mut b = Network::new(2, 1, 2, 1).unwrap();
        a.randomize(7);
        b.randomize(7);
        assert_eq!(a.weights(), b.weights());

        b.randomize(8);
        assert_ne!(a.weights(), b.weights());
    }

    #[test]
    fn randomize_only_touches_weights() {
        let mut net = Network::new(2, 1, 2, 1).unwrap();
        net.run(&[0.25, 0.75]).unwrap();
        let scratch_before = net.data[net.layout.neurons()].to_vec();
        net.randomize(99);
        assert_eq!(&net.data[net.layout.neurons()], &scratch_before[..]);
    }

    #[test]
    fn weights_stay_in_init_range() {
        let mut net = Network::new(4, 2, 8, 3).unwrap();
        net.randomize(123);
        assert!(net.weights().iter().all(|w| (-0.5..0.5).contains(w)));
    }

    #[test]
    fn run_rejects_wrong_input_length() {
        let mut net = Network::new(3, 1, 2, 1).unwrap();
        let err = net.run(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            NetError::ShapeMismatch { what: "inputs", got: 2, expected: 3 }
        ));
    }

    #[test]
    fn run_is_pure_in_weights_and_inputs() {
        let mut net = Network::new(3, 2, 4, 2).unwrap();
        net.randomize(5);
        let first = net.run(&[0.1, 0.2, 0.3]).unwrap().to_vec();
        let second = net.run(&[0.1, 0.2, 0.3]).unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
