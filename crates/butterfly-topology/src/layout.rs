//! Geometric placement of switch nodes and pins.
//!
//! Stages run left to right, nodes top to bottom. Coordinates are in layout
//! units with `y` growing downward, so a higher local port index always has
//! a larger `y`.
//!
//! # Sizing
//!
//! All sizes are derived from the configuration:
//!
//! - `scale = height / 1440` normalizes to the target resolution
//! - `zoom = 256 / n_port` keeps small networks from looking sparse
//! - node width and stage pitch shrink as `8 / n_stage`
//!
//! A radix-4 ("wide") node is exactly as tall as two stacked radix-2
//! ("narrow") nodes, and the gap after every pair of narrow nodes equals the
//! gap after one wide node. Mixed-radix columns
//! therefore line up group for group.

use tracing::debug;

use crate::address::PinRef;
use crate::config::{NetworkConfig, Radix};

/// Horizontal margin before the first stage.
pub const H_MARGIN: f64 = 6.0;

/// Vertical margin above the first node.
pub const V_MARGIN: f64 = 1.0;

/// Resolution height the constants below were tuned for.
pub const BASELINE_HEIGHT: f64 = 1440.0;

/// Largest supported network, the reference for the zoom factor.
pub const ZOOM_REFERENCE_PORTS: f64 = 256.0;

/// Stage count the width constants were tuned for.
pub const REFERENCE_STAGES: f64 = 8.0;

/// Vertical distance between adjacent pins, before scaling.
const PIN_PITCH: f64 = 0.4;

/// Stub length as a fraction of node width.
pub const STUB_FRACTION: f64 = 0.25;

/// A point on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A straight line between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    #[inline]
    pub const fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }
}

/// Drawing size class of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SizeClass {
    /// Radix-2 node
    Narrow,
    /// Radix-4 node, twice as tall
    Wide,
}

impl From<Radix> for SizeClass {
    fn from(radix: Radix) -> Self {
        match radix {
            Radix::Two => SizeClass::Narrow,
            Radix::Four => SizeClass::Wide,
        }
    }
}

/// Sizes derived from a configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutParams {
    pub scale_factor: f64,
    pub zoom_factor: f64,
    pub node_width: f64,
    /// Horizontal distance between the centers of adjacent stages
    pub stage_pitch: f64,
    pub narrow_height: f64,
    pub wide_height: f64,
    /// Gap below each wide node, or below each pair of narrow nodes
    pub group_spacing: f64,
}

impl LayoutParams {
    pub fn derive(config: &NetworkConfig) -> Self {
        let scale = f64::from(config.resolution().height) / BASELINE_HEIGHT;
        let zoom = ZOOM_REFERENCE_PORTS / config.n_port() as f64;
        let stretch = REFERENCE_STAGES / config.n_stage() as f64;
        let unit = scale * zoom;

        Self {
            scale_factor: scale,
            zoom_factor: zoom,
            node_width: 1.2 * stretch,
            stage_pitch: 24.4 * scale * stretch,
            narrow_height: 0.8 * unit,
            wide_height: 1.6 * unit,
            group_spacing: 0.36 * unit,
        }
    }

    /// Height of a node body.
    pub fn node_height(&self, class: SizeClass) -> f64 {
        match class {
            SizeClass::Narrow => self.narrow_height,
            SizeClass::Wide => self.wide_height,
        }
    }

    /// Vertical distance between pins of one node.
    pub fn pin_pitch(&self) -> f64 {
        PIN_PITCH * self.scale_factor * self.zoom_factor
    }

    /// Horizontal distance from a node center to its pins.
    pub fn pin_reach(&self) -> f64 {
        self.node_width * (0.5 + STUB_FRACTION)
    }

    /// Canvas size `(width, height)` in layout units.
    pub fn canvas(&self) -> (f64, f64) {
        (216.0 * self.scale_factor, 128.0 * self.scale_factor)
    }

    /// Center of node `node` in stage `stage` with the given radix.
    pub fn center(&self, stage: usize, node: usize, radix: Radix) -> Point {
        let x = H_MARGIN + self.node_width / 2.0 + stage as f64 * self.stage_pitch;
        let j = node as f64;
        let y = match radix {
            Radix::Two => {
                V_MARGIN
                    + self.narrow_height / 2.0
                    + j * self.narrow_height
                    + (node / 2) as f64 * self.group_spacing
            }
            Radix::Four => {
                V_MARGIN + self.wide_height / 2.0 + j * (self.wide_height + self.group_spacing)
            }
        };
        Point::new(x, y)
    }

    /// Vertical offsets of a node's pins from its center, top to bottom.
    pub fn pin_offsets(&self, radix: Radix) -> impl Iterator<Item = f64> {
        let r = radix.ports() as f64;
        let pitch = self.pin_pitch();
        (0..radix.ports()).map(move |k| (k as f64 - (r - 1.0) / 2.0) * pitch)
    }
}

/// Placement of one switch node and its pins.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodePlacement {
    pub stage: usize,
    pub node: usize,
    pub class: SizeClass,
    pub center: Point,
    pub width: f64,
    pub height: f64,
    /// Input pins, indexed by local port
    pub inputs: Vec<Point>,
    /// Output pins, indexed by local port
    pub outputs: Vec<Point>,
}

impl NodePlacement {
    fn place(params: &LayoutParams, stage: usize, node: usize, radix: Radix) -> Self {
        let center = params.center(stage, node, radix);
        let reach = params.pin_reach();
        let (inputs, outputs) = params
            .pin_offsets(radix)
            .map(|dy| {
                (
                    Point::new(center.x - reach, center.y + dy),
                    Point::new(center.x + reach, center.y + dy),
                )
            })
            .unzip();

        let class = SizeClass::from(radix);
        Self {
            stage,
            node,
            class,
            center,
            width: params.node_width,
            height: params.node_height(class),
            inputs,
            outputs,
        }
    }

    pub fn left(&self) -> f64 {
        self.center.x - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.center.x + self.width / 2.0
    }

    pub fn top(&self) -> f64 {
        self.center.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.center.y + self.height / 2.0
    }

    /// Body outline as top, bottom, left and right edges.
    pub fn edges(&self) -> [Segment; 4] {
        let tl = Point::new(self.left(), self.top());
        let tr = Point::new(self.right(), self.top());
        let bl = Point::new(self.left(), self.bottom());
        let br = Point::new(self.right(), self.bottom());
        [
            Segment::new(tl, tr),
            Segment::new(bl, br),
            Segment::new(tl, bl),
            Segment::new(tr, br),
        ]
    }

    /// Stubs from each input pin to the left edge.
    pub fn input_stubs(&self) -> impl Iterator<Item = Segment> + '_ {
        self.inputs
            .iter()
            .map(|&pin| Segment::new(pin, Point::new(self.left(), pin.y)))
    }

    /// Stubs from the right edge to each output pin.
    pub fn output_stubs(&self) -> impl Iterator<Item = Segment> + '_ {
        self.outputs
            .iter()
            .map(|&pin| Segment::new(Point::new(self.right(), pin.y), pin))
    }
}

/// Placement of the whole network, indexed by stage then node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    params: LayoutParams,
    stages: Vec<Vec<NodePlacement>>,
}

impl Layout {
    /// Place every node of the network.
    pub fn compute(config: &NetworkConfig) -> Self {
        let params = LayoutParams::derive(config);
        let n_port = config.n_port();

        let stages = config
            .radices()
            .iter()
            .enumerate()
            .map(|(stage, &radix)| {
                let nodes: Vec<_> = (0..n_port / radix.ports())
                    .map(|node| NodePlacement::place(&params, stage, node, radix))
                    .collect();
                debug!(stage, nodes = nodes.len(), radix = radix.ports(), "placed stage");
                nodes
            })
            .collect();

        Self { params, stages }
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    pub fn n_stage(&self) -> usize {
        self.stages.len()
    }

    /// All placements of one stage, in node order.
    pub fn stage(&self, stage: usize) -> Option<&[NodePlacement]> {
        self.stages.get(stage).map(Vec::as_slice)
    }

    pub fn stages(&self) -> impl Iterator<Item = &[NodePlacement]> {
        self.stages.iter().map(Vec::as_slice)
    }

    pub fn node(&self, stage: usize, node: usize) -> Option<&NodePlacement> {
        self.stages.get(stage)?.get(node)
    }

    /// Coordinate of an input pin.
    pub fn input_pin(&self, pin: PinRef) -> Option<Point> {
        self.node(pin.stage, pin.node)?.inputs.get(pin.port).copied()
    }

    /// Coordinate of an output pin.
    pub fn output_pin(&self, pin: PinRef) -> Option<Point> {
        self.node(pin.stage, pin.node)?.outputs.get(pin.port).copied()
    }
}
