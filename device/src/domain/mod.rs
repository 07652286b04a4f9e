pub mod motion;
pub mod temperature;

use core::fmt::{Debug, Display, Formatter, Write};
use heapless::String;
use motion::Axes;
use serde::Deserialize;

/// Largest rendered payload, a three-axis JSON object with full `f32` precision.
pub const PAYLOAD_CAPACITY: usize = 96;

/// The physical quantity a telemetry feed carries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Quantity {
    #[default]
    Temperature,
    Acceleration,
    AngularRate,
}

/// A scaled sensor value ready for display and publishing.
#[derive(Copy, Clone, PartialEq)]
pub enum PhysicalReading {
    /// Whole degrees Fahrenheit.
    Temperature(i32),
    /// Acceleration in units of standard gravity.
    Acceleration(Axes),
    /// Angular rate in degrees per second.
    AngularRate(Axes),
}

impl PhysicalReading {
    pub fn quantity(&self) -> Quantity {
        match self {
            PhysicalReading::Temperature(_) => Quantity::Temperature,
            PhysicalReading::Acceleration(_) => Quantity::Acceleration,
            PhysicalReading::AngularRate(_) => Quantity::AngularRate,
        }
    }

    /// Renders the message body published for this reading.
    ///
    /// Temperatures are sent as plain integer text, three-axis readings as a
    /// JSON object with `x`, `y` and `z` members.
    pub fn payload(&self) -> Option<String<PAYLOAD_CAPACITY>> {
        match self {
            PhysicalReading::Temperature(degrees) => {
                let mut payload = String::new();
                write!(payload, "{}", degrees).ok()?;
                Some(payload)
            }
            PhysicalReading::Acceleration(axes) | PhysicalReading::AngularRate(axes) => {
                serde_json_core::to_string(axes).ok()
            }
        }
    }
}

impl Display for PhysicalReading {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            PhysicalReading::Temperature(degrees) => write!(f, "{}", degrees),
            PhysicalReading::Acceleration(axes) | PhysicalReading::AngularRate(axes) => {
                Display::fmt(axes, f)
            }
        }
    }
}

impl Debug for PhysicalReading {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            PhysicalReading::Temperature(degrees) => write!(f, "Temperature({}°F)", degrees),
            PhysicalReading::Acceleration(axes) => f.debug_tuple("Acceleration").field(axes).finish(),
            PhysicalReading::AngularRate(axes) => f.debug_tuple("AngularRate").field(axes).finish(),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PhysicalReading {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            PhysicalReading::Temperature(degrees) => defmt::write!(f, "Temperature({} F)", degrees),
            PhysicalReading::Acceleration(axes) => defmt::write!(f, "Acceleration({})", axes),
            PhysicalReading::AngularRate(axes) => defmt::write!(f, "AngularRate({})", axes),
        }
    }
}
