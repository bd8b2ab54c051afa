use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calibration::ScaleCalibration;

pub const FEET_TO_METERS: f64 = 0.3048;
pub const METERS_TO_FEET: f64 = 1.0 / FEET_TO_METERS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Feet,
    Meters,
}

impl Unit {
    pub const ALL: [Unit; 2] = [Unit::Feet, Unit::Meters];

    pub fn name(self) -> &'static str {
        match self {
            Unit::Feet => "feet",
            Unit::Meters => "meters",
        }
    }

    pub fn area_symbol(self) -> &'static str {
        match self {
            Unit::Feet => "ft²",
            Unit::Meters => "m²",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Multiplier taking a length in `from` to a length in `to`.
pub fn linear_factor(from: Unit, to: Unit) -> f64 {
    match (from, to) {
        (Unit::Feet, Unit::Meters) => FEET_TO_METERS,
        (Unit::Meters, Unit::Feet) => METERS_TO_FEET,
        _ => 1.0,
    }
}

/// Multiplier for areas: the square of the linear factor.
pub fn area_factor(from: Unit, to: Unit) -> f64 {
    let k = linear_factor(from, to);
    k * k
}

pub fn convert_units(value: f64, from: Unit, to: Unit) -> f64 {
    if from == to {
        return value;
    }
    value * linear_factor(from, to)
}

/// Canvas pixels to a real-world length in `target`.
pub fn pixels_to_real_world(pixel_distance: f64, scale: &ScaleCalibration, target: Unit) -> f64 {
    let real = pixel_distance / scale.pixel_distance() * scale.real_world_distance();
    convert_units(real, scale.unit(), target)
}

pub fn format_measurement(value: f64, unit: Unit, decimals: usize) -> String {
    format!("{:.*} {}", decimals, value, unit)
}

pub fn format_area(value: f64, unit: Unit, decimals: usize) -> String {
    format!("{:.*} {}", decimals, value, unit.area_symbol())
}

/// Fewer decimals for larger magnitudes.
pub fn appropriate_decimals(value: f64) -> usize {
    if value < 1.0 {
        3
    } else if value < 10.0 {
        2
    } else if value < 100.0 {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LineSegment, Point};

    #[test]
    fn feet_to_meters() {
        assert!((convert_units(10.0, Unit::Feet, Unit::Meters) - 3.048).abs() < 1e-12);
        assert_eq!(convert_units(7.25, Unit::Meters, Unit::Meters), 7.25);
        let x = 123.456;
        let back = convert_units(convert_units(x, Unit::Feet, Unit::Meters), Unit::Meters, Unit::Feet);
        assert!((back - x).abs() < 1e-9);
    }

    #[test]
    fn area_factor_is_squared() {
        assert!((area_factor(Unit::Feet, Unit::Meters) - 0.09290304).abs() < 1e-15);
        assert_eq!(area_factor(Unit::Feet, Unit::Feet), 1.0);
    }

    #[test]
    fn pixels_through_calibration() {
        let line = LineSegment::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let scale = ScaleCalibration::new(line, 10.0, Unit::Feet).unwrap();
        assert!((pixels_to_real_world(250.0, &scale, Unit::Feet) - 25.0).abs() < 1e-12);
        assert!((pixels_to_real_world(250.0, &scale, Unit::Meters) - 7.62).abs() < 1e-12);
    }

    #[test]
    fn formatting() {
        assert_eq!(format_measurement(12.346, Unit::Feet, 2), "12.35 feet");
        assert_eq!(format_area(3.0, Unit::Meters, 1), "3.0 m²");
        assert_eq!(format_area(3.0, Unit::Feet, 0), "3 ft²");
        assert_eq!(appropriate_decimals(0.5), 3);
        assert_eq!(appropriate_decimals(5.0), 2);
        assert_eq!(appropriate_decimals(50.0), 1);
        assert_eq!(appropriate_decimals(500.0), 0);
    }
}
