use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A terrain mix percentage constrained to [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "u32")]
pub struct Percentage(u32);

impl Percentage {
    const MAX: u32 = 100;

    pub fn new(value: u32) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Value as a fraction of one
    pub fn fraction(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::new(0)
    }
}

impl From<u32> for Percentage {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

/// A clustering coefficient constrained to [-10.0, 10.0]. Positive values
/// make a terrain attract more of itself, negative values repel it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f64")]
pub struct ClusteringFactor(f64);

impl ClusteringFactor {
    const MIN: f64 = -10.0;
    const MAX: f64 = 10.0;

    pub fn new(value: f64) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for ClusteringFactor {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl From<f64> for ClusteringFactor {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

/// Maximum perpendicular wobble of a smoothed path in pixels, constrained to [0.0, 500.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f64")]
pub struct Curvature(f64);

impl Curvature {
    const MIN: f64 = 0.0;
    const MAX: f64 = 500.0;

    pub fn new(value: f64) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Curvature {
    fn default() -> Self {
        Self::new(60.0)
    }
}

impl From<f64> for Curvature {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

/// Subdivisions per hex-to-hex edge of a smoothed path, constrained to [1, 32]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "u32")]
pub struct SegmentCount(u32);

impl SegmentCount {
    const MIN: u32 = 1;
    const MAX: u32 = 32;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for SegmentCount {
    fn default() -> Self {
        Self::new(4)
    }
}

impl From<u32> for SegmentCount {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

/// Chance in percent that an eligible tile gets a label, constrained to [0.0, 100.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f64")]
pub struct LabelChance(f64);

impl LabelChance {
    const MIN: f64 = 0.0;
    const MAX: f64 = 100.0;

    pub fn new(value: f64) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for LabelChance {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl From<f64> for LabelChance {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}
