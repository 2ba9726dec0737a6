//! Inter-stage wiring.
//!
//! # Mixed-Radix Digit Rotation
//!
//! A global port index is read as a mixed-radix number whose digits are the
//! stage radices. Crossing the boundary after stage `i` resolves digit `i`:
//! inside each address group of size
//!
//! ```text
//! pre_span = n_port / (r0 * r1 * ... * r(i-1))
//! ```
//!
//! the group splits into `r(i)` sub-groups of size
//! `cur_span = pre_span / r(i)`, and the outputs of one node fan out to one
//! input in each sub-group.
//!
//! Each node has exactly one *fixed port*: the local port `k` whose own
//! index falls in sub-group `k`. That port goes straight across; the others
//! follow it in cyclic order, each shifted by another `cur_span`:
//!
//! ```text
//! src = node*r + (fixed + l) % r
//! dst = group_base + (node*r + fixed + cur_span*l) % pre_span
//! ```
//!
//! The pairs of one boundary must form a perfect matching between the
//! outputs of stage `i` and the inputs of stage `i+1`. Both the fixed-port
//! uniqueness and the matching are checked on every resolution.

use tracing::{debug, error};

use crate::address::{AddressCodec, PinRef};
use crate::config::NetworkConfig;
use crate::error::{Error, Result, Side};

/// One wire: an output pin of stage `i` to an input pin of stage `i+1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Connection {
    pub source: PinRef,
    pub dest: PinRef,
}

impl std::fmt::Display for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.source, self.dest)
    }
}

/// All wires between stage `stage` and stage `stage + 1`, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Boundary {
    stage: usize,
    connections: Vec<Connection>,
}

impl Boundary {
    /// Index of the left-hand (source) stage.
    #[inline]
    pub fn stage(&self) -> usize {
        self.stage
    }

    /// Wires ordered by source node, each node starting at its fixed port.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Connection> {
        self.connections.iter()
    }
}

impl<'a> IntoIterator for &'a Boundary {
    type Item = &'a Connection;
    type IntoIter = std::slice::Iter<'a, Connection>;

    fn into_iter(self) -> Self::IntoIter {
        self.connections.iter()
    }
}

/// Address spans for one boundary.
///
/// Only [`BoundarySpans::of`] builds these, so every span is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundarySpans {
    pre_span: usize,
    cur_span: usize,
    n_ports: usize,
    n_nodes: usize,
}

impl BoundarySpans {
    /// Spans of the boundary `stage -> stage + 1`.
    pub fn of(config: &NetworkConfig, stage: usize) -> Result<Self> {
        check_boundary(config, stage)?;
        let n_port = config.n_port();
        let n_ports = config.radix(stage)?.ports();
        Ok(Self {
            pre_span: n_port / config.radix_product(stage),
            cur_span: n_port / config.radix_product(stage + 1),
            n_ports,
            n_nodes: n_port / n_ports,
        })
    }

    /// Group size before this stage's digit is consumed.
    #[inline]
    pub fn pre_span(&self) -> usize {
        self.pre_span
    }

    /// Group size after this stage's digit is consumed.
    #[inline]
    pub fn cur_span(&self) -> usize {
        self.cur_span
    }

    /// Ports per node in the source stage.
    #[inline]
    pub fn n_ports(&self) -> usize {
        self.n_ports
    }

    /// Nodes in the source stage.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }
}

fn check_boundary(config: &NetworkConfig, stage: usize) -> Result<()> {
    if stage >= config.n_boundary() {
        return Err(Error::StageOutOfRange {
            stage,
            limit: config.n_boundary(),
        });
    }
    Ok(())
}

/// Find the self-routing port of `node`.
///
/// Fails if the node has no such port or more than one.
pub fn fixed_port(stage: usize, node: usize, spans: &BoundarySpans) -> Result<usize> {
    let mut found = None;
    let mut matches = 0;

    for k in 0..spans.n_ports {
        let src = node * spans.n_ports + k;
        if (src % spans.pre_span) / spans.cur_span == k {
            found = Some(k);
            matches += 1;
        }
    }

    match found {
        Some(k) if matches == 1 => Ok(k),
        _ => {
            error!(stage, node, matches, "node does not have exactly one fixed port");
            Err(Error::FixedPort {
                stage,
                node,
                matches,
            })
        }
    }
}

/// Global-index pairs `(src, dst)` for one boundary, checked for bijection.
///
/// `src` is in the source stage's numbering, `dst` in the destination's.
pub fn index_pairs(config: &NetworkConfig, stage: usize) -> Result<Vec<(usize, usize)>> {
    let spans = BoundarySpans::of(config, stage)?;
    let BoundarySpans {
        pre_span,
        cur_span,
        n_ports,
        n_nodes,
    } = spans;

    let mut pairs = Vec::with_capacity(config.n_port());
    for node in 0..n_nodes {
        let base = node * n_ports;
        let group_offset = base / pre_span * pre_span;
        let fixed = fixed_port(stage, node, &spans)?;

        for l in 0..n_ports {
            let src = base + (fixed + l) % n_ports;
            let dst = group_offset + (base + fixed + cur_span * l) % pre_span;
            pairs.push((src, dst));
        }
    }

    check_bijection(stage, &pairs, config.n_port())?;
    Ok(pairs)
}

/// Verify that `pairs` use every source and destination index exactly once.
pub fn check_bijection(stage: usize, pairs: &[(usize, usize)], n_port: usize) -> Result<()> {
    let mut src_uses = vec![0usize; n_port];
    let mut dst_uses = vec![0usize; n_port];

    for &(src, dst) in pairs {
        for (side, index, uses) in [
            (Side::Source, src, &mut src_uses),
            (Side::Destination, dst, &mut dst_uses),
        ] {
            match uses.get_mut(index) {
                Some(count) => *count += 1,
                None => {
                    error!(stage, %side, index, n_port, "wire endpoint outside the stage");
                    return Err(Error::NotBijective {
                        stage,
                        side,
                        index,
                        count: 1,
                    });
                }
            }
        }
    }

    for (side, uses) in [(Side::Source, &src_uses), (Side::Destination, &dst_uses)] {
        if let Some((index, &count)) = uses.iter().enumerate().find(|&(_, &c)| c != 1) {
            error!(stage, %side, index, count, "boundary is not a perfect matching");
            return Err(Error::NotBijective {
                stage,
                side,
                index,
                count,
            });
        }
    }

    Ok(())
}

/// Resolve the wiring of boundary `stage -> stage + 1`.
pub fn resolve_boundary(config: &NetworkConfig, stage: usize) -> Result<Boundary> {
    let pairs = index_pairs(config, stage)?;

    let codec = AddressCodec::new(config.n_port());
    let src_radix = config.radix(stage)?;
    let dst_radix = config.radix(stage + 1)?;

    let connections = pairs
        .into_iter()
        .map(|(src, dst)| {
            Ok(Connection {
                source: PinRef::at(stage, codec.to_triple(src, src_radix)?),
                dest: PinRef::at(stage + 1, codec.to_triple(dst, dst_radix)?),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        stage,
        src_radix = src_radix.ports(),
        dst_radix = dst_radix.ports(),
        wires = connections.len(),
        "resolved boundary"
    );

    Ok(Boundary { stage, connections })
}

/// Resolve every boundary of the network, in stage order.
pub fn resolve(config: &NetworkConfig) -> Result<Vec<Boundary>> {
    (0..config.n_boundary())
        .map(|stage| resolve_boundary(config, stage))
        .collect()
}
