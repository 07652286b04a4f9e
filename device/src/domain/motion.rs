//! Three-axis motion quantities.

use core::fmt::{Display, Formatter};
use serde::Serialize;

/// One sample per axis, already scaled into physical units.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Axes {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Axes {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Scales raw two's-complement counts by a datasheet LSB factor.
    pub fn from_counts(counts: [i16; 3], lsb_per_unit: f32) -> Self {
        Self {
            x: counts[0] as f32 / lsb_per_unit,
            y: counts[1] as f32 / lsb_per_unit,
            z: counts[2] as f32 / lsb_per_unit,
        }
    }
}

impl Display for Axes {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2} {:.2} {:.2}", self.x, self.y, self.z)
    }
}
