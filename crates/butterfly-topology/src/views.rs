//! Read-only views over a [`TopologyModel`].
//!
//! The same model feeds two unrelated consumers:
//!
//! - **RenderView**: node bodies, pin stubs and wire segments for a renderer
//! - **ConnectionView**: named pin-to-pin links for a connection-script emitter
//!
//! Neither view computes topology; both only walk what the model holds.
//! Each can also be materialized into an owned document ([`Scene`],
//! [`Netlist`]) for export.

use crate::config::Radix;
use crate::connectivity::{Boundary, Connection};
use crate::error::{Error, Result};
use crate::layout::{NodePlacement, Point, Segment, SizeClass};
use crate::model::TopologyModel;

/// Canvas extent in layout units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

/// A node rectangle as a renderer needs it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeBody {
    pub stage: usize,
    pub node: usize,
    pub center: Point,
    pub class: SizeClass,
    pub width: f64,
    pub height: f64,
}

impl From<&NodePlacement> for NodeBody {
    fn from(p: &NodePlacement) -> Self {
        Self {
            stage: p.stage,
            node: p.node,
            center: p.center,
            class: p.class,
            width: p.width,
            height: p.height,
        }
    }
}

/// Everything drawn for one stage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageScene {
    pub stage: usize,
    pub bodies: Vec<NodeBody>,
    /// Body outlines, four per node (top, bottom, left, right)
    pub edges: Vec<Segment>,
    pub input_stubs: Vec<Segment>,
    pub output_stubs: Vec<Segment>,
}

/// Owned drawing of the whole network.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scene {
    pub canvas: Canvas,
    pub stages: Vec<StageScene>,
    /// Wire segments per boundary, in connection order
    pub wires: Vec<Vec<Segment>>,
}

/// Geometry view for renderers.
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    model: &'a TopologyModel,
}

impl<'a> RenderView<'a> {
    pub fn new(model: &'a TopologyModel) -> Self {
        Self { model }
    }

    pub fn canvas(&self) -> Canvas {
        let (width, height) = self.model.layout().params().canvas();
        Canvas { width, height }
    }

    fn placements(&self, stage: usize) -> Result<&'a [NodePlacement]> {
        self.model.layout().stage(stage).ok_or(Error::StageOutOfRange {
            stage,
            limit: self.model.n_stage(),
        })
    }

    /// Node rectangles of one stage, in node order.
    pub fn bodies(&self, stage: usize) -> Result<Vec<NodeBody>> {
        Ok(self.placements(stage)?.iter().map(NodeBody::from).collect())
    }

    /// Pin stubs of one stage: all input stubs, then all output stubs.
    pub fn pin_stubs(&self, stage: usize) -> Result<Vec<Segment>> {
        let placements = self.placements(stage)?;
        Ok(placements
            .iter()
            .flat_map(NodePlacement::input_stubs)
            .chain(placements.iter().flat_map(NodePlacement::output_stubs))
            .collect())
    }

    /// Wire segments of boundary `stage -> stage + 1`.
    pub fn wires(&self, stage: usize) -> Result<Vec<Segment>> {
        self.model
            .boundary(stage)?
            .iter()
            .map(|c| self.model.wire(c))
            .collect()
    }

    /// Materialize the full drawing.
    pub fn scene(&self) -> Result<Scene> {
        let stages = (0..self.model.n_stage())
            .map(|stage| {
                let placements = self.placements(stage)?;
                Ok(StageScene {
                    stage,
                    bodies: placements.iter().map(NodeBody::from).collect(),
                    edges: placements.iter().flat_map(|p| p.edges()).collect(),
                    input_stubs: placements.iter().flat_map(NodePlacement::input_stubs).collect(),
                    output_stubs: placements.iter().flat_map(NodePlacement::output_stubs).collect(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let wires = (0..self.model.boundaries().len())
            .map(|stage| self.wires(stage))
            .collect::<Result<Vec<_>>>()?;

        Ok(Scene {
            canvas: self.canvas(),
            stages,
            wires,
        })
    }
}

/// Per-stage facts an emitter needs to name signals.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageSummary {
    pub stage: usize,
    pub radix: Radix,
    pub nodes: usize,
    pub prefix: String,
}

/// A connection together with the signal names of both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamedLink {
    pub connection: Connection,
    pub source: String,
    pub dest: String,
}

/// All named links of one boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundaryLinks {
    pub stage: usize,
    pub links: Vec<NamedLink>,
}

/// Owned connection listing of the whole network.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Netlist {
    pub n_port: usize,
    pub stages: Vec<StageSummary>,
    pub boundaries: Vec<BoundaryLinks>,
}

/// Wiring view for connection-script emitters.
#[derive(Debug, Clone)]
pub struct ConnectionView<'a> {
    model: &'a TopologyModel,
    prefixes: Vec<String>,
}

impl<'a> ConnectionView<'a> {
    /// View with the default `sw{stage}_` prefixes.
    pub fn new(model: &'a TopologyModel) -> Self {
        let prefixes = (0..model.n_stage()).map(default_prefix).collect();
        Self { model, prefixes }
    }

    /// Replace the node name prefixes, one per stage.
    pub fn with_prefixes<S: Into<String>>(
        mut self,
        prefixes: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let prefixes: Vec<String> = prefixes.into_iter().map(Into::into).collect();
        if prefixes.len() != self.model.n_stage() {
            return Err(Error::PrefixCountMismatch {
                n_stage: self.model.n_stage(),
                prefix_len: prefixes.len(),
            });
        }
        self.prefixes = prefixes;
        Ok(self)
    }

    /// Prefix of a stage's node names.
    pub fn prefix(&self, stage: usize) -> Result<&str> {
        self.prefixes
            .get(stage)
            .map(String::as_str)
            .ok_or(Error::StageOutOfRange {
                stage,
                limit: self.prefixes.len(),
            })
    }

    /// Radix, node count and prefix of every stage.
    pub fn stages(&self) -> Vec<StageSummary> {
        self.model
            .config()
            .radices()
            .iter()
            .zip(&self.prefixes)
            .enumerate()
            .map(|(stage, (&radix, prefix))| StageSummary {
                stage,
                radix,
                nodes: self.model.n_port() / radix.ports(),
                prefix: prefix.clone(),
            })
            .collect()
    }

    pub fn boundaries(&self) -> &'a [Boundary] {
        self.model.boundaries()
    }

    /// Connections of boundary `stage -> stage + 1`.
    pub fn boundary(&self, stage: usize) -> Result<&'a [Connection]> {
        Ok(self.model.boundary(stage)?.connections())
    }

    /// Name both ends of a connection.
    pub fn name(&self, connection: &Connection) -> Result<NamedLink> {
        let src = connection.source;
        let dst = connection.dest;
        Ok(NamedLink {
            connection: *connection,
            source: format!("{}{}.out{}", self.prefix(src.stage)?, src.node, src.port),
            dest: format!("{}{}.in{}", self.prefix(dst.stage)?, dst.node, dst.port),
        })
    }

    /// Materialize the full connection listing.
    pub fn netlist(&self) -> Result<Netlist> {
        let boundaries = self
            .boundaries()
            .iter()
            .map(|boundary| {
                Ok(BoundaryLinks {
                    stage: boundary.stage(),
                    links: boundary.iter().map(|c| self.name(c)).collect::<Result<_>>()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Netlist {
            n_port: self.model.n_port(),
            stages: self.stages(),
            boundaries,
        })
    }
}

fn default_prefix(stage: usize) -> String {
    format!("sw{stage}_")
}
