use crate::geometry;
use crate::model::{Point, Shape, ShapeKind, ShapeStyle};

fn base(id: u64, style: &ShapeStyle, kind: ShapeKind) -> Shape {
    Shape {
        id,
        color: style.color,
        opacity: style.opacity,
        stroke_width: style.stroke_width,
        label: None,
        visible: true,
        kind,
    }
}

/// Lines have no fill, so their opacity is always 1.
pub fn create_line(id: u64, start: Point, end: Point, style: &ShapeStyle) -> Shape {
    let mut shape = base(id, style, ShapeKind::Line { start, end });
    shape.opacity = 1.0;
    shape
}

/// Corners are normalized so `top_left <= bottom_right` componentwise.
pub fn create_rectangle(id: u64, a: Point, b: Point, style: &ShapeStyle) -> Shape {
    let top_left = Point::new(a.x.min(b.x), a.y.min(b.y));
    let bottom_right = Point::new(a.x.max(b.x), a.y.max(b.y));
    base(
        id,
        style,
        ShapeKind::Rectangle {
            top_left,
            bottom_right,
            rotation: 0.0,
        },
    )
}

/// Points are kept as given. The center is the mean of the points and is
/// frozen from here on.
pub fn create_polygon(id: u64, points: Vec<Point>, style: &ShapeStyle) -> Shape {
    let center = geometry::centroid(&points).unwrap_or_default();
    base(
        id,
        style,
        ShapeKind::Polygon {
            points,
            closed: true,
            rotation: 0.0,
            center,
        },
    )
}
