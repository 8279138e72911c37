use crate::error::NetError;

/// How many inputs, hidden layers, hidden neurons per layer, and outputs.
///
/// A configuration is immutable once built; every derived buffer size is a
/// pure function of these four counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetConfig {
    inputs: usize,
    hidden_layers: usize,
    hidden: usize,
    outputs: usize,
}

impl NetConfig {
    /// Creates a validated network configuration.
    ///
    /// A width of 0 for a network that has hidden layers is silently raised
    /// to 1, so every hidden layer always holds at least one neuron.
    ///
    /// # Args
    /// * `inputs` - Number of input slots, at least 1.
    /// * `hidden_layers` - Number of hidden layers, may be 0.
    /// * `hidden` - Neurons per hidden layer; shared by all hidden layers.
    /// * `outputs` - Number of output neurons, at least 1.
    ///
    /// # Errors
    /// Returns `NetError::InvalidInput` when `inputs` or `outputs` is 0.
    pub fn new(
        inputs: usize,
        hidden_layers: usize,
        hidden: usize,
        outputs: usize,
    ) -> Result<Self, NetError> {
        if inputs == 0 {
            return Err(NetError::InvalidInput("network needs at least one input"));
        }
        if outputs == 0 {
            return Err(NetError::InvalidInput("network needs at least one output"));
        }

        let hidden = if hidden_layers > 0 && hidden == 0 { 1 } else { hidden };

        Ok(Self {
            inputs,
            hidden_layers,
            hidden,
            outputs,
        })
    }

    #[inline]
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    #[inline]
    pub fn hidden_layers(&self) -> usize {
        self.hidden_layers
    }

    /// Neurons per hidden layer.
    #[inline]
    pub fn hidden(&self) -> usize {
        self.hidden
    }

    #[inline]
    pub fn outputs(&self) -> usize {
        self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_width_hidden_layers_are_widened() {
        let cfg = NetConfig::new(2, 3, 0, 1).unwrap();
        assert_eq!(cfg.hidden(), 1);
    }

    #[test]
    fn zero_hidden_layers_keep_width_as_given() {
        let cfg = NetConfig::new(2, 0, 0, 1).unwrap();
        assert_eq!(cfg.hidden(), 0);
    }

    #[test]
    fn degenerate_shapes_are_rejected() {
        assert!(NetConfig::new(0, 1, 2, 1).is_err());
        assert!(NetConfig::new(2, 1, 2, 0).is_err());
    }
}
