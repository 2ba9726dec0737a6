//! Butterfly Network Topology
//!
//! Wiring and layout of multistage butterfly networks built from 2x2 and 4x4
//! crossbar switch nodes.
//!
//! # Addressing
//!
//! Every stage has the same number of ports, `n_port`, equal to the product
//! of the stage radices. A port is named by its global index within the
//! stage, or equivalently by `(node, port)` with ports grouped node-major.
//!
//! # Wiring
//!
//! The boundary after stage `i` resolves the `i`-th mixed-radix digit of the
//! port index. Every node has exactly one port that routes straight across;
//! its remaining ports rotate through the other sub-groups. Each boundary is
//! checked to be a perfect matching of outputs to inputs.
//!
//! # Layout
//!
//! Stages are placed left to right and nodes top to bottom. Pin order inside
//! a node matches local port order, so the renderer and the connection
//! listing always agree.
//!
//! # Usage
//!
//! ```
//! use butterfly_topology::{NetworkConfig, Resolution, TopologyModel};
//!
//! let config = NetworkConfig::new(3, 32, &[4, 2, 4], Resolution::default())?;
//! let model = TopologyModel::build(config)?;
//!
//! let netlist = model.connection_view().netlist()?;
//! assert_eq!(netlist.boundaries.len(), 2);
//!
//! let scene = model.render_view().scene()?;
//! assert_eq!(scene.stages.len(), 3);
//! # Ok::<(), butterfly_topology::Error>(())
//! ```

mod address;
mod config;
pub mod connectivity;
mod error;
pub mod layout;
mod model;
mod views;

pub use address::{AddressCodec, PinRef, PortAddress};
pub use config::{NetworkConfig, Radix, Resolution};
pub use connectivity::{Boundary, BoundarySpans, Connection};
pub use error::{Error, Result, Side};
pub use layout::{Layout, LayoutParams, NodePlacement, Point, Segment, SizeClass};
pub use model::TopologyModel;
pub use views::{
    BoundaryLinks, Canvas, ConnectionView, NamedLink, Netlist, NodeBody, RenderView, Scene,
    StageScene, StageSummary,
};

/// Supported switch radices.
pub const SUPPORTED_RADICES: [usize; 2] = [2, 4];

/// Largest supported network.
pub const MAX_PORTS: usize = 256;

/// Fewest stages a network can have.
pub const MIN_STAGES: usize = 2;

// Port ceiling must be reachable with the supported radices
const _: () = assert!(MAX_PORTS.is_power_of_two() && MAX_PORTS >= 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radices_match_enum() {
        for r in SUPPORTED_RADICES {
            assert_eq!(Radix::try_from(r).map(Radix::ports), Ok(r));
        }
    }

    #[test]
    fn largest_network_builds() {
        let model = TopologyModel::build(
            NetworkConfig::from_radices(&[4, 4, 4, 4], Resolution::default()).unwrap(),
        )
        .unwrap();
        assert_eq!(model.n_port(), MAX_PORTS);

        let model = TopologyModel::build(
            NetworkConfig::from_radices(&[2; 8], Resolution::default()).unwrap(),
        )
        .unwrap();
        assert_eq!(model.boundaries().len(), 7);
    }
}
