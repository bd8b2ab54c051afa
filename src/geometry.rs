//! Pure canvas-space geometry. Thresholds passed in here are already in
//! canvas units; callers divide screen-pixel tolerances by the zoom first.

use crate::model::Point;

pub fn distance(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Shoelace area, always non-negative. Fewer than three points have no area.
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        twice += p.x * q.y - q.x * p.y;
    }
    (twice / 2.0).abs()
}

/// Sum of edge lengths including the closing edge.
pub fn polygon_perimeter(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    points
        .iter()
        .enumerate()
        .map(|(i, p)| distance(*p, points[(i + 1) % points.len()]))
        .sum()
}

pub fn rectangle_dimensions(top_left: Point, bottom_right: Point) -> (f64, f64) {
    (
        (bottom_right.x - top_left.x).abs(),
        (bottom_right.y - top_left.y).abs(),
    )
}

/// Arithmetic mean of the points.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Even-odd ray casting.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        let crosses = (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Distance from `point` to the closest point of segment `a`-`b`.
pub fn distance_to_line_segment(point: Point, a: Point, b: Point) -> f64 {
    let cx = b.x - a.x;
    let cy = b.y - a.y;
    let len2 = cx * cx + cy * cy;
    if len2 == 0.0 {
        return distance(point, a);
    }
    let t = ((point.x - a.x) * cx + (point.y - a.y) * cy) / len2;
    let t = t.clamp(0.0, 1.0);
    distance(point, Point::new(a.x + t * cx, a.y + t * cy))
}

pub fn point_near_line(point: Point, a: Point, b: Point, threshold: f64) -> bool {
    distance_to_line_segment(point, a, b) <= threshold
}

pub fn point_near_vertex(point: Point, vertex: Point, threshold: f64) -> bool {
    distance(point, vertex) <= threshold
}

/// Axis-aligned containment, inclusive of the edges. Corner order does not matter.
pub fn point_in_rectangle(point: Point, top_left: Point, bottom_right: Point) -> bool {
    let (min_x, max_x) = (top_left.x.min(bottom_right.x), top_left.x.max(bottom_right.x));
    let (min_y, max_y) = (top_left.y.min(bottom_right.y), top_left.y.max(bottom_right.y));
    point.x >= min_x && point.x <= max_x && point.y >= min_y && point.y <= max_y
}

pub fn point_in_rotated_rectangle(
    point: Point,
    top_left: Point,
    bottom_right: Point,
    rotation: f64,
) -> bool {
    if rotation == 0.0 {
        return point_in_rectangle(point, top_left, bottom_right);
    }
    let center = top_left.midpoint(bottom_right);
    let local = rotate_point(point, center, -rotation);
    point_in_rectangle(local, top_left, bottom_right)
}

/// Rotates a direction vector by `angle_degrees`.
pub fn rotate_vec(dx: f64, dy: f64, angle_degrees: f64) -> (f64, f64) {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    (dx * cos - dy * sin, dx * sin + dy * cos)
}

pub fn rotate_point(point: Point, center: Point, angle_degrees: f64) -> Point {
    let (rx, ry) = rotate_vec(point.x - center.x, point.y - center.y, angle_degrees);
    Point::new(center.x + rx, center.y + ry)
}

/// Corners in order top-left, top-right, bottom-right, bottom-left.
pub fn rectangle_corners(top_left: Point, bottom_right: Point) -> [Point; 4] {
    [
        top_left,
        Point::new(bottom_right.x, top_left.y),
        bottom_right,
        Point::new(top_left.x, bottom_right.y),
    ]
}

pub fn rotated_rectangle_corners(top_left: Point, bottom_right: Point, rotation: f64) -> [Point; 4] {
    let center = top_left.midpoint(bottom_right);
    rectangle_corners(top_left, bottom_right).map(|c| rotate_point(c, center, rotation))
}

/// Angle of `point` around `center` in degrees, measured like `atan2(dy, dx)`.
pub fn angle_degrees(center: Point, point: Point) -> f64 {
    (point.y - center.y).atan2(point.x - center.x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn unit_square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    #[test]
    fn unit_square_area_and_perimeter() {
        let sq = unit_square();
        assert!((polygon_area(&sq) - 1.0).abs() < EPS);
        assert!((polygon_perimeter(&sq) - 4.0).abs() < EPS);
    }

    #[test]
    fn degenerate_polygons() {
        let p = [Point::new(0.0, 0.0), Point::new(3.0, 4.0)];
        assert_eq!(polygon_area(&p), 0.0);
        // two points: there and back
        assert!((polygon_perimeter(&p) - 10.0).abs() < EPS);
        assert_eq!(polygon_perimeter(&p[..1]), 0.0);
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn area_ignores_winding() {
        let mut sq = unit_square();
        sq.reverse();
        assert!((polygon_area(&sq) - 1.0).abs() < EPS);
    }

    #[test]
    fn ray_casting() {
        let tri = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 10.0),
        ];
        assert!(point_in_polygon(Point::new(5.0, 3.0), &tri));
        assert!(!point_in_polygon(Point::new(9.0, 9.0), &tri));
        assert!(!point_in_polygon(Point::new(1.0, 1.0), &[]));
    }

    #[test]
    fn segment_distance_clamps_to_ends() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((distance_to_line_segment(Point::new(5.0, 3.0), a, b) - 3.0).abs() < EPS);
        assert!((distance_to_line_segment(Point::new(-3.0, 4.0), a, b) - 5.0).abs() < EPS);
        assert!((distance_to_line_segment(Point::new(13.0, 4.0), a, b) - 5.0).abs() < EPS);
        assert!((distance_to_line_segment(Point::new(3.0, 4.0), a, a) - 5.0).abs() < EPS);
        assert!(point_near_line(Point::new(5.0, 5.0), a, b, 5.0));
        assert!(!point_near_line(Point::new(5.0, 5.1), a, b, 5.0));
    }

    #[test]
    fn vertex_is_near_itself() {
        let v = Point::new(4.2, -1.0);
        assert!(point_near_vertex(v, v, 0.0));
    }

    #[test]
    fn rotate_quarter_turn() {
        let p = rotate_point(Point::new(1.0, 0.0), Point::new(0.0, 0.0), 90.0);
        assert!(p.x.abs() < EPS);
        assert!((p.y - 1.0).abs() < EPS);
    }

    #[test]
    fn rotated_rectangle_containment() {
        let tl = Point::new(0.0, 0.0);
        let br = Point::new(10.0, 2.0);
        // A thin horizontal bar turned 90 degrees becomes vertical around (5, 1).
        assert!(point_in_rotated_rectangle(Point::new(5.0, 5.0), tl, br, 90.0));
        assert!(!point_in_rotated_rectangle(Point::new(9.0, 1.0), tl, br, 90.0));
        assert!(point_in_rotated_rectangle(Point::new(9.0, 1.0), tl, br, 0.0));
    }

    #[test]
    fn rotated_corners_keep_center() {
        let corners = rotated_rectangle_corners(Point::new(0.0, 0.0), Point::new(4.0, 2.0), 33.0);
        let c = centroid(&corners).unwrap();
        assert!((c.x - 2.0).abs() < EPS);
        assert!((c.y - 1.0).abs() < EPS);
        assert!((distance(corners[0], corners[2]) - 20f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn angle_is_atan2_in_degrees() {
        let c = Point::new(0.0, 0.0);
        assert!((angle_degrees(c, Point::new(0.0, 1.0)) - 90.0).abs() < EPS);
        assert!((angle_degrees(c, Point::new(-1.0, 0.0)) - 180.0).abs() < EPS);
    }
}
