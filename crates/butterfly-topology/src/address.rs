//! Port addressing.
//!
//! Every stage numbers its `n_port` ports with a global index `0..n_port`.
//! Ports are grouped node-major, so with radix `r`:
//!
//! ```text
//! node = index / r
//! port = index % r
//! ```
//!
//! The radix may change from stage to stage, so an index is only meaningful
//! together with the radix of the stage it belongs to.

use crate::config::Radix;
use crate::error::{Error, Result};

/// A (node, local port) pair within one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortAddress {
    /// Node index within the stage
    pub node: usize,
    /// Port index within the node
    pub port: usize,
}

impl PortAddress {
    pub const fn new(node: usize, port: usize) -> Self {
        Self { node, port }
    }
}

impl std::fmt::Display for PortAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.node, self.port)
    }
}

/// A fully qualified pin: (stage, node, local port).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinRef {
    pub stage: usize,
    pub node: usize,
    pub port: usize,
}

impl PinRef {
    pub const fn new(stage: usize, node: usize, port: usize) -> Self {
        Self { stage, node, port }
    }

    /// Qualify a stage-local address with its stage.
    pub const fn at(stage: usize, address: PortAddress) -> Self {
        Self {
            stage,
            node: address.node,
            port: address.port,
        }
    }

    /// Drop the stage.
    pub const fn address(&self) -> PortAddress {
        PortAddress::new(self.node, self.port)
    }
}

impl std::fmt::Display for PinRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.stage, self.node, self.port)
    }
}

/// Converts between global port indices and (node, port) pairs.
///
/// Stateless apart from the port count used for range checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressCodec {
    n_port: usize,
}

impl AddressCodec {
    pub const fn new(n_port: usize) -> Self {
        Self { n_port }
    }

    #[inline]
    pub const fn n_port(&self) -> usize {
        self.n_port
    }

    /// Split a global index into (node, port) for a stage of the given radix.
    pub fn to_triple(&self, index: usize, radix: Radix) -> Result<PortAddress> {
        if index >= self.n_port {
            return Err(Error::PortOutOfRange {
                index,
                n_port: self.n_port,
            });
        }
        let r = radix.ports();
        Ok(PortAddress::new(index / r, index % r))
    }

    /// Inverse of [`to_triple`](Self::to_triple).
    pub fn to_global_index(&self, address: PortAddress, radix: Radix) -> Result<usize> {
        let r = radix.ports();
        if address.port >= r || address.node >= self.n_port / r {
            return Err(Error::NodeOutOfRange {
                node: address.node,
                port: address.port,
                radix: r,
                n_port: self.n_port,
            });
        }
        Ok(address.node * r + address.port)
    }
}
