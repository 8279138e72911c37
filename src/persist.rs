//! Plain-text persistence of a network's configuration and weights.
//!
//! One header line with the four configuration counts, then one weight per
//! line in weight-region order. There is no version field; format changes
//! are breaking.

use std::io::{BufRead, Read, Write};

use log::debug;

use crate::{error::FormatError, network::Network};

impl Network {
    /// Encodes the network as text.
    ///
    /// Weights are printed with Rust's shortest round-trip `f64` formatting,
    /// so decoding reproduces them bit for bit.
    pub fn to_text(&self) -> String {
        let cfg = self.config();
        let mut out = format!(
            "{} {} {} {}\n",
            cfg.inputs(),
            cfg.hidden_layers(),
            cfg.hidden(),
            cfg.outputs()
        );
        for w in self.weights() {
            out.push_str(&format!("{w}\n"));
        }
        out
    }

    /// Writes the text encoding to `writer`.
    ///
    /// # Errors
    /// Returns `FormatError::Io` when the writer fails.
    pub fn dump<W: Write>(&self, mut writer: W) -> Result<(), FormatError> {
        writer.write_all(self.to_text().as_bytes())?;
        Ok(())
    }

    /// Decodes a network from its text encoding.
    ///
    /// Exactly `total_weights` weight lines are consumed; anything after
    /// them is ignored.
    ///
    /// # Errors
    /// Returns `FormatError` when the header is missing or malformed, the
    /// configuration is degenerate, a weight line does not parse, or the
    /// weight list is shorter than the configuration demands.
    pub fn from_text(text: &str) -> Result<Network, FormatError> {
        let mut lines = text.lines();
        let header = lines.next().ok_or(FormatError::MissingHeader)?;
        let mut fields = header.split_whitespace();
        let mut field = |name: &'static str| -> Result<usize, FormatError> {
            fields
                .next()
                .ok_or(FormatError::BadHeader { field: name })?
                .parse()
                .map_err(|_| FormatError::BadHeader { field: name })
        };

        let inputs = field("inputs")?;
        let hidden_layers = field("hidden layers")?;
        let hidden = field("hidden")?;
        let outputs = field("outputs")?;

        let mut net = Network::new(inputs, hidden_layers, hidden, outputs)?;
        let expected = net.layout().total_weights();

        let mut count = 0;
        for (index, line) in lines.enumerate() {
            if count == expected {
                break;
            }
            let value: f64 = line
                .trim()
                .parse()
                .map_err(|_| FormatError::BadWeight { line: index + 2 })?;
            net.weights_mut()[count] = value;
            count += 1;
        }
        if count < expected {
            return Err(FormatError::Truncated {
                got: count,
                expected,
            });
        }

        debug!(weights = expected; "loaded network");
        Ok(net)
    }

    /// Reads the text encoding from `reader` and decodes it.
    ///
    /// # Errors
    /// Returns `FormatError::Io` when the reader fails, or any decoding
    /// error from [`Network::from_text`].
    pub fn load<R: BufRead>(mut reader: R) -> Result<Network, FormatError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Network::from_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_precedes_one_weight_per_line() {
        let mut net = Network::new(2, 1, 2, 1).unwrap();
        net.randomize(11);
        let text = net.to_text();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("2 1 2 1"));
        assert_eq!(lines.count(), net.layout().total_weights());
    }

    #[test]
    fn missing_header_is_rejected() {
        assert!(matches!(
            Network::from_text("").unwrap_err(),
            FormatError::MissingHeader
        ));
    }

    #[test]
    fn short_or_non_numeric_header_is_rejected() {
        assert!(matches!(
            Network::from_text("2 1 2\n").unwrap_err(),
            FormatError::BadHeader { field: "outputs" }
        ));
        assert!(matches!(
            Network::from_text("2 x 2 1\n").unwrap_err(),
            FormatError::BadHeader { field: "hidden layers" }
        ));
    }

    #[test]
    fn degenerate_header_config_is_rejected() {
        assert!(matches!(
            Network::from_text("0 1 2 1\n0.5\n").unwrap_err(),
            FormatError::Config(_)
        ));
    }

    #[test]
    fn bad_weight_line_is_located() {
        let err = Network::from_text("2 0 0 1\n0.5\nnope\n0.25\n").unwrap_err();
        assert!(matches!(err, FormatError::BadWeight { line: 3 }));
    }

    #[test]
    fn truncated_weight_list_is_rejected() {
        let err = Network::from_text("2 0 0 1\n0.5\n0.25\n").unwrap_err();
        assert!(matches!(err, FormatError::Truncated { got: 2, expected: 3 }));
    }

    #[test]
    fn trailing_content_is_ignored() {
        let net = Network::from_text("2 0 0 1\n0.5\n0.25\n-1\nleftover\n").unwrap();
        assert_eq!(net.weights(), &[0.5, 0.25, -1.0]);
    }

    #[test]
    fn dump_and_load_pair_through_io() {
        let mut net = Network::new(3, 2, 4, 2).unwrap();
        net.randomize(21);

        let mut buf = Vec::new();
        net.dump(&mut buf).unwrap();
        let restored = Network::load(buf.as_slice()).unwrap();
        assert_eq!(restored.weights(), net.weights());
        assert_eq!(restored.config(), net.config());
    }
}
