use std::ops::Range;

use crate::config::NetConfig;

/// Maps the flat network buffer into named regions and per-layer slices.
/// This is the core "offsets + sizes" mechanism.
///
/// The buffer holds three disjoint regions, in order:
/// 1. weights - one block per neuron, bias slot first, then one slot per
///    incoming connection;
/// 2. neurons - the latest input vector followed by every hidden/output
///    activation from the latest forward pass;
/// 3. deltas  - one error-signal slot per non-input neuron, output layer
///    last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    config: NetConfig,
    hidden_weights: usize,
    output_weights: usize,
    total_weights: usize,
    total_neurons: usize,
    weights: Range<usize>,
    neurons: Range<usize>,
    deltas: Range<usize>,
}

impl Layout {
    pub fn new(config: NetConfig) -> Self {
        let inputs = config.inputs();
        let layers = config.hidden_layers();
        let hidden = config.hidden();
        let outputs = config.outputs();

        let hidden_weights = if layers > 0 {
            (inputs + 1) * hidden + (layers - 1) * (hidden + 1) * hidden
        } else {
            0
        };
        let output_fan_in = if layers > 0 { hidden } else { inputs };
        let output_weights = (output_fan_in + 1) * outputs;
        let total_weights = hidden_weights + output_weights;
        let total_neurons = inputs + hidden * layers + outputs;

        let weights = 0..total_weights;
        let neurons = weights.end..weights.end + total_neurons;
        let deltas = neurons.end..neurons.end + (total_neurons - inputs);

        Self {
            config,
            hidden_weights,
            output_weights,
            total_weights,
            total_neurons,
            weights,
            neurons,
            deltas,
        }
    }

    #[inline]
    pub fn total_weights(&self) -> usize {
        self.total_weights
    }

    #[inline]
    pub fn total_neurons(&self) -> usize {
        self.total_neurons
    }

    /// Length of the backing buffer: weights + neurons + deltas.
    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.deltas.end
    }

    #[inline]
    pub fn weights(&self) -> Range<usize> {
        self.weights.clone()
    }

    #[inline]
    pub fn neurons(&self) -> Range<usize> {
        self.neurons.clone()
    }

    #[inline]
    pub fn deltas(&self) -> Range<usize> {
        self.deltas.clone()
    }

    /// Weight block of hidden layer `h`, bias slots included.
    ///
    /// Layer 0 fans in from the inputs, every later layer from the previous
    /// hidden layer.
    pub fn hidden_layer_weights(&self, h: usize) -> Range<usize> {
        debug_assert!(h < self.config.hidden_layers());
        let inputs = self.config.inputs();
        let hidden = self.config.hidden();
        if h == 0 {
            0..(inputs + 1) * hidden
        } else {
            let start = (inputs + 1) * hidden + (h - 1) * (hidden + 1) * hidden;
            start..start + (hidden + 1) * hidden
        }
    }

    /// Weight block of the output layer, bias slots included.
    pub fn output_layer_weights(&self) -> Range<usize> {
        self.hidden_weights..self.hidden_weights + self.output_weights
    }

    /// Slots holding the latest input vector.
    pub fn input_slots(&self) -> Range<usize> {
        self.neurons.start..self.neurons.start + self.config.inputs()
    }

    /// Activation slots of hidden layer `h`.
    pub fn hidden_layer_outputs(&self, h: usize) -> Range<usize> {
        debug_assert!(h < self.config.hidden_layers());
        let hidden = self.config.hidden();
        let start = self.neurons.start + self.config.inputs() + h * hidden;
        start..start + hidden
    }

    /// Activation slots of the output layer.
    pub fn output_slots(&self) -> Range<usize> {
        let start =
            self.neurons.start + self.config.inputs() + self.config.hidden_layers() * self.config.hidden();
        start..start + self.config.outputs()
    }

    /// Delta slots of hidden layer `h`.
    pub fn hidden_layer_deltas(&self, h: usize) -> Range<usize> {
        debug_assert!(h < self.config.hidden_layers());
        let hidden = self.config.hidden();
        let start = self.deltas.start + h * hidden;
        start..start + hidden
    }

    /// Delta slots of the output layer; the highest offsets of the region.
    pub fn output_deltas(&self) -> Range<usize> {
        let start = self.deltas.start + self.config.hidden_layers() * self.config.hidden();
        start..start + self.config.outputs()
    }

    /// Fan-in of hidden layer `h`.
    pub fn hidden_fan_in(&self, h: usize) -> usize {
        if h == 0 {
            self.config.inputs()
        } else {
            self.config.hidden()
        }
    }

    /// Fan-in of the output layer.
    pub fn output_fan_in(&self) -> usize {
        if self.config.hidden_layers() > 0 {
            self.config.hidden()
        } else {
            self.config.inputs()
        }
    }

    /// Sanity check: regions must be contiguous, in order and non-overlapping.
    pub fn validate(&self) {
        assert_eq!(self.weights.start, 0, "weights must open the buffer");
        assert!(self.weights.end <= self.neurons.start, "regions overlap");
        assert!(self.neurons.end <= self.deltas.start, "regions overlap");
        assert_eq!(
            self.total_weights,
            self.hidden_weights + self.output_weights,
            "weight partition must cover the region"
        );
        assert_eq!(
            self.deltas.len(),
            self.total_neurons - self.config.inputs(),
            "one delta slot per non-input neuron"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(inputs: usize, layers: usize, hidden: usize, outputs: usize) -> Layout {
        Layout::new(NetConfig::new(inputs, layers, hidden, outputs).unwrap())
    }

    #[test]
    fn sizes_for_one_hidden_layer() {
        let l = layout(2, 1, 2, 1);
        l.validate();
        assert_eq!(l.total_weights(), 9); // 3*2 hidden + 3*1 output
        assert_eq!(l.total_neurons(), 5);
        assert_eq!(l.buffer_len(), 9 + 5 + 3);
    }

    #[test]
    fn sizes_without_hidden_layers() {
        let l = layout(2, 0, 0, 1);
        l.validate();
        assert_eq!(l.total_weights(), 3);
        assert_eq!(l.total_neurons(), 3);
        assert_eq!(l.buffer_len(), 3 + 3 + 1);
        assert_eq!(l.output_layer_weights(), 0..3);
        assert_eq!(l.output_fan_in(), 2);
    }

    #[test]
    fn weight_blocks_tile_the_region() {
        let l = layout(3, 3, 4, 2);
        l.validate();
        assert_eq!(l.hidden_layer_weights(0), 0..16); // (3+1)*4
        assert_eq!(l.hidden_layer_weights(1), 16..36); // (4+1)*4
        assert_eq!(l.hidden_layer_weights(2), 36..56);
        assert_eq!(l.output_layer_weights(), 56..66); // (4+1)*2
        assert_eq!(l.output_layer_weights().end, l.weights().end);
    }

    #[test]
    fn neuron_and_delta_slices_line_up() {
        let l = layout(3, 2, 4, 2);
        let n = l.neurons().start;
        assert_eq!(l.input_slots(), n..n + 3);
        assert_eq!(l.hidden_layer_outputs(0), n + 3..n + 7);
        assert_eq!(l.hidden_layer_outputs(1), n + 7..n + 11);
        assert_eq!(l.output_slots(), n + 11..n + 13);

        let d = l.deltas().start;
        assert_eq!(l.hidden_layer_deltas(0), d..d + 4);
        assert_eq!(l.hidden_layer_deltas(1), d + 4..d + 8);
        assert_eq!(l.output_deltas(), d + 8..d + 10);
        assert_eq!(l.output_deltas().end, l.deltas().end);
    }
}
