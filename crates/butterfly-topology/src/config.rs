//! Network configuration and its validation.
//!
//! A configuration is checked once, at construction, and is immutable
//! afterwards. Every derived artifact (wiring, layout) is a pure function of
//! it, so two equal configurations always produce identical models.

use crate::error::{Error, Result};
use crate::{MAX_PORTS, MIN_STAGES};

/// Switch radix of a stage. Only 2x2 and 4x4 crossbars are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "usize", into = "usize"))]
pub enum Radix {
    /// 2 inputs, 2 outputs
    Two,
    /// 4 inputs, 4 outputs
    Four,
}

impl Radix {
    /// Number of input (and output) ports on one node.
    #[inline]
    pub const fn ports(self) -> usize {
        match self {
            Radix::Two => 2,
            Radix::Four => 4,
        }
    }

    /// Parse a radix for the given stage, reporting the stage on failure.
    pub fn for_stage(stage: usize, radix: usize) -> Result<Self> {
        Self::try_from(radix).map_err(|radix| Error::UnsupportedRadix { stage, radix })
    }
}

impl TryFrom<usize> for Radix {
    type Error = usize;

    fn try_from(value: usize) -> std::result::Result<Self, Self::Error> {
        match value {
            2 => Ok(Radix::Two),
            4 => Ok(Radix::Four),
            other => Err(other),
        }
    }
}

impl From<Radix> for usize {
    fn from(value: Radix) -> Self {
        value.ports()
    }
}

impl std::fmt::Display for Radix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ports())
    }
}

/// Target rendering resolution in pixels.
///
/// Only the height feeds the layout (through the scale factor); the width is
/// validated so that a renderer can rely on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const MIN_WIDTH: u32 = 1280;
    pub const MAX_WIDTH: u32 = 3840;
    pub const MIN_HEIGHT: u32 = 720;
    pub const MAX_HEIGHT: u32 = 2160;

    /// The 2K monitor the layout constants were tuned for.
    pub const BASELINE: Self = Self { width: 2560, height: 1440 };

    /// Create a validated resolution.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let resolution = Self { width, height };
        resolution.validate()?;
        Ok(resolution)
    }

    /// Check both axes against the supported range.
    pub fn validate(&self) -> Result<()> {
        if !(Self::MIN_WIDTH..=Self::MAX_WIDTH).contains(&self.width) {
            return Err(Error::ResolutionOutOfRange {
                axis: "width",
                value: self.width,
                min: Self::MIN_WIDTH,
                max: Self::MAX_WIDTH,
            });
        }
        if !(Self::MIN_HEIGHT..=Self::MAX_HEIGHT).contains(&self.height) {
            return Err(Error::ResolutionOutOfRange {
                axis: "height",
                value: self.height,
                min: Self::MIN_HEIGHT,
                max: Self::MAX_HEIGHT,
            });
        }
        Ok(())
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::BASELINE
    }
}

/// Validated description of a butterfly network.
///
/// Deserialization goes through [`NetworkConfig::new`], so a decoded
/// configuration is as valid as a constructed one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawNetworkConfig"))]
pub struct NetworkConfig {
    n_port: usize,
    radices: Vec<Radix>,
    resolution: Resolution,
}

impl NetworkConfig {
    /// Validate and build a configuration.
    ///
    /// Checks run in a fixed order so the first reported error is stable:
    /// stage count, radix list length, radix values, port count against the
    /// radix product, port ceiling, resolution.
    pub fn new(
        n_stage: usize,
        n_port: usize,
        radices: &[usize],
        resolution: Resolution,
    ) -> Result<Self> {
        if n_stage < MIN_STAGES {
            return Err(Error::TooFewStages(n_stage));
        }
        if n_stage != radices.len() {
            return Err(Error::StageCountMismatch {
                n_stage,
                radix_len: radices.len(),
            });
        }

        let radices = radices
            .iter()
            .enumerate()
            .map(|(stage, &radix)| Radix::for_stage(stage, radix))
            .collect::<Result<Vec<_>>>()?;

        let product = radices
            .iter()
            .try_fold(1usize, |acc, r| acc.checked_mul(r.ports()))
            .unwrap_or(usize::MAX);
        if n_port != product {
            return Err(Error::PortCountMismatch { n_port, product });
        }
        if n_port > MAX_PORTS {
            return Err(Error::TooManyPorts {
                n_port,
                max: MAX_PORTS,
            });
        }

        resolution.validate()?;

        Ok(Self {
            n_port,
            radices,
            resolution,
        })
    }

    /// Build a configuration whose port count is the radix product.
    pub fn from_radices(radices: &[usize], resolution: Resolution) -> Result<Self> {
        let n_port = radices
            .iter()
            .try_fold(1usize, |acc, &r| acc.checked_mul(r))
            .unwrap_or(usize::MAX);
        Self::new(radices.len(), n_port, radices, resolution)
    }

    /// Number of stages (columns of switch nodes).
    #[inline]
    pub fn n_stage(&self) -> usize {
        self.radices.len()
    }

    /// Number of network ports, equal in every stage.
    #[inline]
    pub fn n_port(&self) -> usize {
        self.n_port
    }

    /// Number of stage boundaries (`n_stage - 1`).
    #[inline]
    pub fn n_boundary(&self) -> usize {
        self.radices.len() - 1
    }

    /// Per-stage radix list.
    pub fn radices(&self) -> &[Radix] {
        &self.radices
    }

    /// Radix of one stage.
    pub fn radix(&self, stage: usize) -> Result<Radix> {
        self.radices
            .get(stage)
            .copied()
            .ok_or(Error::StageOutOfRange {
                stage,
                limit: self.radices.len(),
            })
    }

    /// Number of switch nodes in one stage.
    pub fn nodes_in_stage(&self, stage: usize) -> Result<usize> {
        Ok(self.n_port / self.radix(stage)?.ports())
    }

    /// Target resolution.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Product of the radices of stages `0..end`.
    ///
    /// Used for the address spans of the wiring; `end == 0` yields 1.
    pub fn radix_product(&self, end: usize) -> usize {
        self.radices[..end.min(self.radices.len())]
            .iter()
            .map(|r| r.ports())
            .product()
    }

    /// Default artifact name, e.g. `ButterflyNet_32X32_4_2_4`.
    pub fn artifact_stem(&self) -> String {
        let radices: String = self.radices.iter().map(|r| format!("_{r}")).collect();
        format!("ButterflyNet_{0}X{0}{1}", self.n_port, radices)
    }
}

/// Unchecked wire form of [`NetworkConfig`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawNetworkConfig {
    n_port: usize,
    radices: Vec<usize>,
    #[serde(default)]
    resolution: Resolution,
}

#[cfg(feature = "serde")]
impl TryFrom<RawNetworkConfig> for NetworkConfig {
    type Error = Error;

    fn try_from(raw: RawNetworkConfig) -> Result<Self> {
        Self::new(raw.radices.len(), raw.n_port, &raw.radices, raw.resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_mixed_radix() {
        let config = NetworkConfig::new(3, 32, &[4, 2, 4], Resolution::default()).unwrap();
        assert_eq!(config.n_stage(), 3);
        assert_eq!(config.n_port(), 32);
        assert_eq!(config.n_boundary(), 2);
        assert_eq!(config.radices(), &[Radix::Four, Radix::Two, Radix::Four]);
        assert_eq!(config.nodes_in_stage(0).unwrap(), 8);
        assert_eq!(config.nodes_in_stage(1).unwrap(), 16);
    }

    #[test]
    fn rejects_product_mismatch() {
        let err = NetworkConfig::new(3, 16, &[4, 2, 4], Resolution::default()).unwrap_err();
        assert_eq!(err, Error::PortCountMismatch { n_port: 16, product: 32 });
        assert!(err.is_configuration());
    }

    #[test]
    fn rejects_bad_radix_with_stage() {
        let err = NetworkConfig::new(3, 24, &[2, 3, 4], Resolution::default()).unwrap_err();
        assert_eq!(err, Error::UnsupportedRadix { stage: 1, radix: 3 });
    }

    #[test]
    fn rejects_stage_count_mismatch() {
        let err = NetworkConfig::new(3, 4, &[2, 2], Resolution::default()).unwrap_err();
        assert_eq!(err, Error::StageCountMismatch { n_stage: 3, radix_len: 2 });
    }

    #[test]
    fn rejects_single_stage() {
        let err = NetworkConfig::new(1, 4, &[4], Resolution::default()).unwrap_err();
        assert_eq!(err, Error::TooFewStages(1));
    }

    #[test]
    fn rejects_more_than_256_ports() {
        let err = NetworkConfig::from_radices(&[4, 4, 4, 4, 2], Resolution::default()).unwrap_err();
        assert_eq!(err, Error::TooManyPorts { n_port: 512, max: 256 });
    }

    #[test]
    fn huge_radix_product_does_not_overflow() {
        let radices = vec![4; 64];
        let err = NetworkConfig::new(64, 256, &radices, Resolution::default()).unwrap_err();
        assert!(matches!(err, Error::PortCountMismatch { n_port: 256, .. }));
    }

    #[test]
    fn resolution_bounds() {
        assert!(Resolution::new(1280, 720).is_ok());
        assert!(Resolution::new(3840, 2160).is_ok());

        let err = Resolution::new(1279, 1080).unwrap_err();
        assert!(matches!(err, Error::ResolutionOutOfRange { axis: "width", value: 1279, .. }));

        let err = Resolution::new(1920, 2161).unwrap_err();
        assert!(matches!(err, Error::ResolutionOutOfRange { axis: "height", value: 2161, .. }));

        let bad = Resolution { width: 800, height: 600 };
        assert!(NetworkConfig::new(2, 4, &[2, 2], bad).is_err());
    }

    #[test]
    fn radix_product_prefixes() {
        let config = NetworkConfig::from_radices(&[4, 2, 4], Resolution::default()).unwrap();
        assert_eq!(config.radix_product(0), 1);
        assert_eq!(config.radix_product(1), 4);
        assert_eq!(config.radix_product(2), 8);
        assert_eq!(config.radix_product(3), 32);
    }

    #[test]
    fn artifact_stem_lists_radices() {
        let config = NetworkConfig::from_radices(&[4, 2, 4], Resolution::default()).unwrap();
        assert_eq!(config.artifact_stem(), "ButterflyNet_32X32_4_2_4");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_validates() {
        let config = NetworkConfig::new(3, 32, &[4, 2, 4], Resolution::new(1920, 1080).unwrap())
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back: NetworkConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        let defaulted: NetworkConfig =
            serde_json::from_str(r#"{"n_port": 4, "radices": [2, 2]}"#).unwrap();
        assert_eq!(defaulted.resolution(), Resolution::BASELINE);

        let err = serde_json::from_str::<NetworkConfig>(r#"{"n_port": 16, "radices": [4, 2, 4]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("does not match"), "{err}");

        let err = serde_json::from_str::<NetworkConfig>(r#"{"n_port": 16, "radices": [8, 2]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("invalid radix 8"), "{err}");
    }
}
