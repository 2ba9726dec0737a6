//! The assembled network: configuration, wiring and layout.

use tracing::info;

use crate::address::PinRef;
use crate::config::{NetworkConfig, Radix, Resolution};
use crate::connectivity::{self, Boundary, Connection};
use crate::error::{Error, Result};
use crate::layout::{Layout, NodePlacement, Point, Segment};
use crate::views::{ConnectionView, RenderView};

/// Read-only butterfly network model.
///
/// Built once from a [`NetworkConfig`]; any change means building a new
/// model. External consumers read it through [`RenderView`] and
/// [`ConnectionView`].
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyModel {
    config: NetworkConfig,
    boundaries: Vec<Boundary>,
    layout: Layout,
}

impl TopologyModel {
    /// Resolve the wiring and layout of a validated configuration.
    pub fn build(config: NetworkConfig) -> Result<Self> {
        let boundaries = connectivity::resolve(&config)?;
        let layout = Layout::compute(&config);

        info!(
            n_stage = config.n_stage(),
            n_port = config.n_port(),
            radices = %config.artifact_stem(),
            "built butterfly network"
        );

        Ok(Self {
            config,
            boundaries,
            layout,
        })
    }

    /// Validate raw parameters and build.
    pub fn from_parts(
        n_stage: usize,
        n_port: usize,
        radices: &[usize],
        resolution: Resolution,
    ) -> Result<Self> {
        Self::build(NetworkConfig::new(n_stage, n_port, radices, resolution)?)
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    #[inline]
    pub fn n_stage(&self) -> usize {
        self.config.n_stage()
    }

    #[inline]
    pub fn n_port(&self) -> usize {
        self.config.n_port()
    }

    pub fn radix(&self, stage: usize) -> Result<Radix> {
        self.config.radix(stage)
    }

    /// Wiring of every boundary, in stage order.
    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    /// Wiring of boundary `stage -> stage + 1`.
    pub fn boundary(&self, stage: usize) -> Result<&Boundary> {
        self.boundaries.get(stage).ok_or(Error::StageOutOfRange {
            stage,
            limit: self.boundaries.len(),
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn placement(&self, stage: usize, node: usize) -> Option<&NodePlacement> {
        self.layout.node(stage, node)
    }

    /// Canvas segment for one wire, output pin to input pin.
    pub fn wire(&self, connection: &Connection) -> Result<Segment> {
        Ok(Segment::new(
            self.locate(connection.source, Layout::output_pin)?,
            self.locate(connection.dest, Layout::input_pin)?,
        ))
    }

    fn locate(&self, pin: PinRef, lookup: fn(&Layout, PinRef) -> Option<Point>) -> Result<Point> {
        let radix = self.config.radix(pin.stage)?;
        lookup(&self.layout, pin).ok_or(Error::NodeOutOfRange {
            node: pin.node,
            port: pin.port,
            radix: radix.ports(),
            n_port: self.n_port(),
        })
    }

    /// Input pin coordinate.
    pub fn input_pin(&self, pin: PinRef) -> Option<Point> {
        self.layout.input_pin(pin)
    }

    /// Output pin coordinate.
    pub fn output_pin(&self, pin: PinRef) -> Option<Point> {
        self.layout.output_pin(pin)
    }

    /// Geometry for a renderer.
    pub fn render_view(&self) -> RenderView<'_> {
        RenderView::new(self)
    }

    /// Wiring for a connection-script emitter, with default node prefixes.
    pub fn connection_view(&self) -> ConnectionView<'_> {
        ConnectionView::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_network() {
        let model = TopologyModel::from_parts(2, 4, &[2, 2], Resolution::default()).unwrap();
        assert_eq!(model.boundaries().len(), 1);
        assert_eq!(model.boundary(0).unwrap().len(), 4);
        assert_eq!(model.layout().n_stage(), 2);
        assert!(model.boundary(1).is_err());
    }

    #[test]
    fn configuration_errors_surface() {
        let err = TopologyModel::from_parts(3, 16, &[4, 2, 4], Resolution::default()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn every_wire_has_geometry() {
        let model = TopologyModel::from_parts(3, 32, &[4, 2, 4], Resolution::default()).unwrap();
        for boundary in model.boundaries() {
            for c in boundary {
                let wire = model.wire(c).unwrap();
                assert!(wire.from.x < wire.to.x);
                assert_eq!(Some(wire.from), model.output_pin(c.source));
                assert_eq!(Some(wire.to), model.input_pin(c.dest));
            }
        }
    }

    #[test]
    fn wire_to_missing_pin_fails() {
        let model = TopologyModel::from_parts(2, 4, &[2, 2], Resolution::default()).unwrap();
        let bogus = Connection {
            source: PinRef::new(0, 0, 0),
            dest: PinRef::new(1, 2, 0),
        };
        assert!(matches!(model.wire(&bogus), Err(Error::NodeOutOfRange { node: 2, .. })));

        let bogus = Connection {
            source: PinRef::new(0, 0, 0),
            dest: PinRef::new(2, 0, 0),
        };
        assert!(matches!(model.wire(&bogus), Err(Error::StageOutOfRange { stage: 2, .. })));
    }

    #[test]
    fn rebuild_is_identical() {
        let config = NetworkConfig::from_radices(&[2, 4, 2, 2], Resolution::default()).unwrap();
        let a = TopologyModel::build(config.clone()).unwrap();
        let b = TopologyModel::build(config).unwrap();
        assert_eq!(a, b);
    }
}
