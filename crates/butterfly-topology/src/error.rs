//! Error types for butterfly-topology.

use thiserror::Error;

/// Result type for butterfly-topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which side of a stage boundary a port index belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Output ports of the left-hand stage
    Source,
    /// Input ports of the right-hand stage
    Destination,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Source => write!(f, "source"),
            Side::Destination => write!(f, "destination"),
        }
    }
}

/// Errors raised while building or querying a butterfly network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Fewer than two stages requested.
    #[error("network needs at least 2 stages, got {0}")]
    TooFewStages(usize),

    /// Stage count does not match the radix list.
    #[error("number of stages ({n_stage}) does not match the length of the radix list ({radix_len})")]
    StageCountMismatch { n_stage: usize, radix_len: usize },

    /// A radix other than 2 or 4.
    #[error("stage {stage}: invalid radix {radix}, allowed values are 2 or 4")]
    UnsupportedRadix { stage: usize, radix: usize },

    /// Port count is not the product of the radices.
    #[error("port count {n_port} does not match the radix product {product}")]
    PortCountMismatch { n_port: usize, product: usize },

    /// Port count above the supported ceiling.
    #[error("port count {n_port} exceeds the supported maximum of {max}")]
    TooManyPorts { n_port: usize, max: usize },

    /// Rendering resolution outside the supported range.
    #[error("invalid {axis} resolution {value}, allowed range is {min} to {max}")]
    ResolutionOutOfRange {
        axis: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// Node name prefixes do not cover every stage.
    #[error("number of stages ({n_stage}) does not match the length of the prefix list ({prefix_len})")]
    PrefixCountMismatch { n_stage: usize, prefix_len: usize },

    /// A stage index past the last stage (or boundary).
    #[error("stage {stage} out of range, network has {limit}")]
    StageOutOfRange { stage: usize, limit: usize },

    /// A global port index outside `0..n_port`.
    #[error("port index {index} out of range 0..{n_port}")]
    PortOutOfRange { index: usize, n_port: usize },

    /// A node or local port outside its stage.
    #[error("node {node} port {port} out of range for radix {radix} with {n_port} ports")]
    NodeOutOfRange {
        node: usize,
        port: usize,
        radix: usize,
        n_port: usize,
    },

    /// A node without exactly one self-routing port.
    #[error("boundary {stage}->{next}: node {node} has {matches} fixed ports, expected exactly one", next = .stage + 1)]
    FixedPort {
        stage: usize,
        node: usize,
        matches: usize,
    },

    /// A boundary whose connections are not a perfect matching.
    #[error("boundary {stage}->{next}: {side} port {index} used {count} times", next = .stage + 1)]
    NotBijective {
        stage: usize,
        side: Side,
        index: usize,
        count: usize,
    },
}

impl Error {
    /// True for errors that indicate a wiring defect rather than bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Error::FixedPort { .. } | Error::NotBijective { .. })
    }

    /// True for errors caused by the supplied configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::TooFewStages(_)
                | Error::StageCountMismatch { .. }
                | Error::UnsupportedRadix { .. }
                | Error::PortCountMismatch { .. }
                | Error::TooManyPorts { .. }
                | Error::ResolutionOutOfRange { .. }
                | Error::PrefixCountMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_are_disjoint() {
        let invariant = Error::FixedPort { stage: 1, node: 3, matches: 0 };
        assert!(invariant.is_invariant_violation());
        assert!(!invariant.is_configuration());

        let config = Error::TooManyPorts { n_port: 512, max: 256 };
        assert!(config.is_configuration());
        assert!(!config.is_invariant_violation());

        let precondition = Error::PortOutOfRange { index: 9, n_port: 8 };
        assert!(!precondition.is_configuration());
        assert!(!precondition.is_invariant_violation());
    }

    #[test]
    fn messages_carry_context() {
        let err = Error::NotBijective {
            stage: 2,
            side: Side::Destination,
            index: 17,
            count: 2,
        };
        assert_eq!(err.to_string(), "boundary 2->3: destination port 17 used 2 times");

        let err = Error::UnsupportedRadix { stage: 1, radix: 8 };
        assert_eq!(err.to_string(), "stage 1: invalid radix 8, allowed values are 2 or 4");
    }
}
