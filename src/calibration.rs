//! Scale calibration: a drawn reference line plus the real-world length the
//! user says it spans. A calibration is never edited, only replaced.

use serde::{Deserialize, Serialize};

use crate::model::LineSegment;
use crate::units::Unit;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalibrationError {
    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("real-world distance must be greater than zero (got {0})")]
    NonPositiveDistance(f64),

    #[error("calibration line has zero length")]
    DegenerateLine,

    #[error("no scale line has been drawn")]
    NoLine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleCalibration {
    pixel_distance: f64,
    real_world_distance: f64,
    unit: Unit,
    calibration_line: LineSegment,
}

impl ScaleCalibration {
    /// The pixel distance is measured from `line` once, here.
    pub fn new(
        line: LineSegment,
        real_world_distance: f64,
        unit: Unit,
    ) -> Result<Self, CalibrationError> {
        if !real_world_distance.is_finite() || real_world_distance <= 0.0 {
            return Err(CalibrationError::NonPositiveDistance(real_world_distance));
        }
        let pixel_distance = line.length();
        if !pixel_distance.is_finite() || pixel_distance <= 0.0 {
            return Err(CalibrationError::DegenerateLine);
        }
        Ok(Self {
            pixel_distance,
            real_world_distance,
            unit,
            calibration_line: line,
        })
    }

    /// Builds a calibration from the text the user typed for the distance.
    pub fn from_input(line: LineSegment, input: &str, unit: Unit) -> Result<Self, CalibrationError> {
        let trimmed = input.trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| CalibrationError::NotANumber(trimmed.to_string()))?;
        if !value.is_finite() {
            return Err(CalibrationError::NotANumber(trimmed.to_string()));
        }
        Self::new(line, value, unit)
    }

    pub fn pixel_distance(&self) -> f64 {
        self.pixel_distance
    }

    pub fn real_world_distance(&self) -> f64 {
        self.real_world_distance
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn calibration_line(&self) -> LineSegment {
        self.calibration_line
    }

    /// Real-world units (in `unit()`) per canvas pixel.
    pub fn factor(&self) -> f64 {
        self.real_world_distance / self.pixel_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    fn line(len: f64) -> LineSegment {
        LineSegment::new(Point::new(10.0, 10.0), Point::new(10.0 + len, 10.0))
    }

    #[test]
    fn measures_line_once() {
        let cal = ScaleCalibration::new(line(100.0), 10.0, Unit::Feet).unwrap();
        assert_eq!(cal.pixel_distance(), 100.0);
        assert_eq!(cal.real_world_distance(), 10.0);
        assert_eq!(cal.unit(), Unit::Feet);
        assert!((cal.factor() - 0.1).abs() < 1e-12);
        assert_eq!(cal.calibration_line(), line(100.0));
    }

    #[test]
    fn rejects_non_positive_distance() {
        assert_eq!(
            ScaleCalibration::new(line(100.0), 0.0, Unit::Feet),
            Err(CalibrationError::NonPositiveDistance(0.0))
        );
        assert!(ScaleCalibration::new(line(100.0), -4.0, Unit::Meters).is_err());
        assert!(ScaleCalibration::new(line(100.0), f64::INFINITY, Unit::Meters).is_err());
    }

    #[test]
    fn rejects_degenerate_line() {
        assert_eq!(
            ScaleCalibration::new(line(0.0), 10.0, Unit::Feet),
            Err(CalibrationError::DegenerateLine)
        );
    }

    #[test]
    fn parses_user_input() {
        let cal = ScaleCalibration::from_input(line(50.0), " 12.5 ", Unit::Meters).unwrap();
        assert_eq!(cal.real_world_distance(), 12.5);
        assert_eq!(
            ScaleCalibration::from_input(line(50.0), "ten", Unit::Meters),
            Err(CalibrationError::NotANumber("ten".to_string()))
        );
        assert!(matches!(
            ScaleCalibration::from_input(line(50.0), "NaN", Unit::Meters),
            Err(CalibrationError::NotANumber(_))
        ));
        assert!(matches!(
            ScaleCalibration::from_input(line(50.0), "", Unit::Meters),
            Err(CalibrationError::NotANumber(_))
        ));
    }

    #[test]
    fn infinite_input_is_not_a_number() {
        for input in ["inf", "-infinity", "1e999"] {
            assert_eq!(
                ScaleCalibration::from_input(line(50.0), input, Unit::Feet),
                Err(CalibrationError::NotANumber(input.to_string()))
            );
        }
    }
}
