//! Real-world measurements derived from shape geometry and the current
//! calibration. Nothing here is cached; callers recompute per query.

use crate::calibration::ScaleCalibration;
use crate::geometry;
use crate::model::{Point, Shape, ShapeKind};
use crate::units::{self, Unit, format_area, format_measurement};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub area: Option<f64>,
    pub perimeter: Option<f64>,
    pub unit: Unit,
}

impl Measurement {
    fn empty(unit: Unit) -> Self {
        Self {
            length: None,
            width: None,
            height: None,
            area: None,
            perimeter: None,
            unit,
        }
    }
}

/// `None` when uncalibrated.
pub fn calculate_measurements(
    shape: &Shape,
    scale: Option<&ScaleCalibration>,
    target: Unit,
) -> Option<Measurement> {
    let scale = scale?;
    let mut m = Measurement::empty(target);
    match &shape.kind {
        ShapeKind::Line { start, end } => {
            let px = geometry::distance(*start, *end);
            m.length = Some(units::pixels_to_real_world(px, scale, target));
        }
        ShapeKind::Rectangle {
            top_left,
            bottom_right,
            ..
        } => {
            let (pw, ph) = geometry::rectangle_dimensions(*top_left, *bottom_right);
            let width = units::pixels_to_real_world(pw, scale, target);
            let height = units::pixels_to_real_world(ph, scale, target);
            m.width = Some(width);
            m.height = Some(height);
            // derived in target units, not converted from a pixel area
            m.area = Some(width * height);
            m.perimeter = Some(2.0 * (width + height));
        }
        ShapeKind::Polygon { points, closed, .. } => {
            let px_perimeter = geometry::polygon_perimeter(points);
            m.perimeter = Some(units::pixels_to_real_world(px_perimeter, scale, target));
            if *closed && points.len() >= 3 {
                m.area = Some(polygon_real_area(points, scale, target));
            }
        }
    }
    Some(m)
}

/// Pixel area scaled by the squared calibration factor, then by the squared
/// unit factor when the display unit differs from the calibration unit.
fn polygon_real_area(points: &[Point], scale: &ScaleCalibration, target: Unit) -> f64 {
    let pixel_area = geometry::polygon_area(points);
    let k = scale.factor();
    let mut area = pixel_area * (k * k);
    if scale.unit() != target {
        area *= units::area_factor(scale.unit(), target);
    }
    area
}

/// Length of each edge at its on-canvas position, paired with the edge midpoint.
/// Lines have no sides.
pub fn side_lengths(shape: &Shape, scale: &ScaleCalibration, target: Unit) -> Vec<(Point, f64)> {
    if matches!(shape.kind, ShapeKind::Line { .. }) {
        return Vec::new();
    }
    let vertices = shape.vertices();
    let n = vertices.len();
    if n < 2 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let (a, b) = (vertices[i], vertices[(i + 1) % n]);
            let px = geometry::distance(a, b);
            (a.midpoint(b), units::pixels_to_real_world(px, scale, target))
        })
        .collect()
}

/// Live length for a line being drawn.
pub fn preview_line_length(
    start: Point,
    end: Point,
    scale: &ScaleCalibration,
    target: Unit,
) -> f64 {
    units::pixels_to_real_world(geometry::distance(start, end), scale, target)
}

/// Live (width, height) for a rectangle being drawn.
pub fn preview_rectangle_size(
    start: Point,
    end: Point,
    scale: &ScaleCalibration,
    target: Unit,
) -> (f64, f64) {
    let (pw, ph) = geometry::rectangle_dimensions(start, end);
    (
        units::pixels_to_real_world(pw, scale, target),
        units::pixels_to_real_world(ph, scale, target),
    )
}

pub fn format_measurement_display(measurement: Option<&Measurement>) -> String {
    let Some(m) = measurement else {
        return "Scale not calibrated".to_string();
    };
    let mut parts = Vec::new();
    if let Some(length) = m.length {
        parts.push(format!("Length: {}", format_measurement(length, m.unit, 2)));
    }
    if let (Some(w), Some(h)) = (m.width, m.height) {
        parts.push(format!(
            "{} × {}",
            format_measurement(w, m.unit, 2),
            format_measurement(h, m.unit, 2)
        ));
    }
    if let Some(area) = m.area {
        parts.push(format!("Area: {}", format_area(area, m.unit, 2)));
    }
    if let Some(perimeter) = m.perimeter {
        parts.push(format!("Perimeter: {}", format_measurement(perimeter, m.unit, 2)));
    }
    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory;
    use crate::model::{LineSegment, ShapeStyle};
    use crate::units::FEET_TO_METERS;

    const EPS: f64 = 1e-9;

    fn scale_100px_10ft() -> ScaleCalibration {
        let line = LineSegment::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        ScaleCalibration::new(line, 10.0, Unit::Feet).unwrap()
    }

    fn style() -> ShapeStyle {
        ShapeStyle::default()
    }

    #[test]
    fn uncalibrated_is_none() {
        let line = factory::create_line(1, Point::new(0.0, 0.0), Point::new(5.0, 0.0), &style());
        assert_eq!(calculate_measurements(&line, None, Unit::Feet), None);
        assert_eq!(format_measurement_display(None), "Scale not calibrated");
    }

    #[test]
    fn line_length() {
        let scale = scale_100px_10ft();
        let line = factory::create_line(1, Point::new(0.0, 0.0), Point::new(30.0, 40.0), &style());
        let m = calculate_measurements(&line, Some(&scale), Unit::Feet).unwrap();
        assert!((m.length.unwrap() - 5.0).abs() < EPS);
        assert_eq!(m.area, None);
        let m = calculate_measurements(&line, Some(&scale), Unit::Meters).unwrap();
        assert!((m.length.unwrap() - 5.0 * FEET_TO_METERS).abs() < EPS);
        assert_eq!(m.unit, Unit::Meters);
    }

    #[test]
    fn rectangle_200_by_100() {
        let scale = scale_100px_10ft();
        let rect = factory::create_rectangle(
            2,
            Point::new(50.0, 50.0),
            Point::new(250.0, 150.0),
            &style(),
        );
        let m = calculate_measurements(&rect, Some(&scale), Unit::Feet).unwrap();
        assert!((m.width.unwrap() - 20.0).abs() < EPS);
        assert!((m.height.unwrap() - 10.0).abs() < EPS);
        assert!((m.area.unwrap() - 200.0).abs() < EPS);
        assert!((m.perimeter.unwrap() - 60.0).abs() < EPS);
        assert_eq!(
            format_measurement_display(Some(&m)),
            "20.00 feet × 10.00 feet | Area: 200.00 ft² | Perimeter: 60.00 feet"
        );
    }

    #[test]
    fn rectangle_area_in_meters_is_squared() {
        let scale = scale_100px_10ft();
        let rect = factory::create_rectangle(
            2,
            Point::new(0.0, 0.0),
            Point::new(200.0, 100.0),
            &style(),
        );
        let m = calculate_measurements(&rect, Some(&scale), Unit::Meters).unwrap();
        let expected = 200.0 * FEET_TO_METERS * FEET_TO_METERS;
        assert!((m.area.unwrap() - expected).abs() < EPS);
    }

    #[test]
    fn polygon_area_crosses_units_squared() {
        let scale = scale_100px_10ft();
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(300.0, 0.0),
            Point::new(300.0, 120.0),
            Point::new(0.0, 120.0),
        ];
        let pixel_area = geometry::polygon_area(&points);
        let poly = factory::create_polygon(3, points, &style());
        let m = calculate_measurements(&poly, Some(&scale), Unit::Meters).unwrap();
        let expected = pixel_area * (10.0f64 / 100.0).powi(2) * FEET_TO_METERS.powi(2);
        assert!((m.area.unwrap() - expected).abs() < EPS);
        assert!((m.perimeter.unwrap() - 84.0 * FEET_TO_METERS).abs() < EPS);
    }

    #[test]
    fn polygon_rotation_does_not_change_values() {
        let scale = scale_100px_10ft();
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(50.0, 80.0),
        ];
        let mut poly = factory::create_polygon(4, points, &style());
        let before = calculate_measurements(&poly, Some(&scale), Unit::Feet).unwrap();
        crate::transform::rotate_shape(&mut poly, 37.0);
        let after = calculate_measurements(&poly, Some(&scale), Unit::Feet).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn open_polygon_reports_perimeter_only() {
        let scale = scale_100px_10ft();
        let mut poly = factory::create_polygon(
            5,
            vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(100.0, 100.0),
            ],
            &style(),
        );
        if let ShapeKind::Polygon { closed, .. } = &mut poly.kind {
            *closed = false;
        }
        let m = calculate_measurements(&poly, Some(&scale), Unit::Feet).unwrap();
        assert_eq!(m.area, None);
        let expected = (200.0 + 20000f64.sqrt()) / 10.0;
        assert!((m.perimeter.unwrap() - expected).abs() < EPS);
    }

    #[test]
    fn side_lengths_follow_edges() {
        let scale = scale_100px_10ft();
        let rect = factory::create_rectangle(
            6,
            Point::new(0.0, 0.0),
            Point::new(200.0, 100.0),
            &style(),
        );
        let sides = side_lengths(&rect, &scale, Unit::Feet);
        assert_eq!(sides.len(), 4);
        assert!((sides[0].1 - 20.0).abs() < EPS);
        assert!((sides[1].1 - 10.0).abs() < EPS);
        assert_eq!(sides[0].0, Point::new(100.0, 0.0));
        let line = factory::create_line(7, Point::new(0.0, 0.0), Point::new(1.0, 1.0), &style());
        assert!(side_lengths(&line, &scale, Unit::Feet).is_empty());
    }

    #[test]
    fn previews() {
        let scale = scale_100px_10ft();
        let len = preview_line_length(Point::new(0.0, 0.0), Point::new(0.0, 50.0), &scale, Unit::Feet);
        assert!((len - 5.0).abs() < EPS);
        let (w, h) = preview_rectangle_size(
            Point::new(100.0, 100.0),
            Point::new(0.0, 50.0),
            &scale,
            Unit::Feet,
        );
        assert!((w - 10.0).abs() < EPS);
        assert!((h - 5.0).abs() < EPS);
    }
}
