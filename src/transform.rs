//! In-place shape edits driven by the active gesture.

use crate::geometry;
use crate::model::{Point, Shape, ShapeKind};

/// Smallest half-extent a rectangle can be resized down to.
const MIN_HALF_EXTENT: f64 = 1.0;

pub fn translate_shape(shape: &mut Shape, dx: f64, dy: f64) {
    match &mut shape.kind {
        ShapeKind::Line { start, end } => {
            *start = start.offset(dx, dy);
            *end = end.offset(dx, dy);
        }
        ShapeKind::Rectangle {
            top_left,
            bottom_right,
            ..
        } => {
            *top_left = top_left.offset(dx, dy);
            *bottom_right = bottom_right.offset(dx, dy);
        }
        ShapeKind::Polygon { points, center, .. } => {
            for p in points.iter_mut() {
                *p = p.offset(dx, dy);
            }
            *center = center.offset(dx, dy);
        }
    }
}

/// Sets the absolute rotation in degrees. Lines cannot rotate; returns
/// whether the shape accepted the rotation.
pub fn rotate_shape(shape: &mut Shape, degrees: f64) -> bool {
    match &mut shape.kind {
        ShapeKind::Line { .. } => false,
        ShapeKind::Rectangle { rotation, .. } | ShapeKind::Polygon { rotation, .. } => {
            *rotation = degrees;
            true
        }
    }
}

/// Moves vertex `index` to `target`, given in canvas space with the shape's
/// rotation already applied. Out-of-range indices leave the shape untouched.
pub fn update_vertex(shape: &mut Shape, index: usize, target: Point) -> bool {
    match &mut shape.kind {
        ShapeKind::Line { start, end } => {
            if index == 0 {
                *start = target;
            } else {
                *end = target;
            }
            true
        }
        ShapeKind::Rectangle {
            top_left,
            bottom_right,
            rotation,
        } => {
            if index >= 4 {
                return false;
            }
            let corners = geometry::rotated_rectangle_corners(*top_left, *bottom_right, *rotation);
            // resize from the diagonally opposite corner
            let anchor = corners[(index + 2) % 4];
            let center = anchor.midpoint(target);
            let (lx, ly) = geometry::rotate_vec(target.x - anchor.x, target.y - anchor.y, -*rotation);
            let half_w = (lx.abs() / 2.0).max(MIN_HALF_EXTENT);
            let half_h = (ly.abs() / 2.0).max(MIN_HALF_EXTENT);
            *top_left = Point::new(center.x - half_w, center.y - half_h);
            *bottom_right = Point::new(center.x + half_w, center.y + half_h);
            true
        }
        ShapeKind::Polygon {
            points,
            rotation,
            center,
            ..
        } => {
            let Some(stored) = points.get_mut(index) else {
                return false;
            };
            let current = geometry::rotate_point(*stored, *center, *rotation);
            let (lx, ly) =
                geometry::rotate_vec(target.x - current.x, target.y - current.y, -*rotation);
            *stored = stored.offset(lx, ly);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory;
    use crate::model::ShapeStyle;

    const EPS: f64 = 1e-9;

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS,
            "{a:?} != {b:?}"
        );
    }

    fn rect(tl: Point, br: Point) -> Shape {
        factory::create_rectangle(1, tl, br, &ShapeStyle::default())
    }

    #[test]
    fn translate_moves_polygon_center() {
        let mut poly = factory::create_polygon(
            1,
            vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(4.0, 4.0),
            ],
            &ShapeStyle::default(),
        );
        rotate_shape(&mut poly, 45.0);
        let before = poly.center();
        translate_shape(&mut poly, 3.0, -2.0);
        assert_close(poly.center(), before.offset(3.0, -2.0));
        assert_eq!(poly.rotation(), Some(45.0));
        assert_eq!(poly.vertices().len(), 3);
    }

    #[test]
    fn translate_line_and_rectangle() {
        let mut line = factory::create_line(
            2,
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            &ShapeStyle::default(),
        );
        translate_shape(&mut line, 1.0, 2.0);
        assert_eq!(line.vertices(), vec![Point::new(1.0, 2.0), Point::new(2.0, 3.0)]);

        let mut r = rect(Point::new(0.0, 0.0), Point::new(10.0, 5.0));
        translate_shape(&mut r, -5.0, 5.0);
        assert_eq!(r.center(), Point::new(0.0, 7.5));
    }

    #[test]
    fn rotate_line_is_noop() {
        let mut line = factory::create_line(
            3,
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            &ShapeStyle::default(),
        );
        let before = line.clone();
        assert!(!rotate_shape(&mut line, 90.0));
        assert_eq!(line, before);
    }

    #[test]
    fn rotation_is_absolute() {
        let mut r = rect(Point::new(0.0, 0.0), Point::new(10.0, 5.0));
        assert!(rotate_shape(&mut r, 30.0));
        assert!(rotate_shape(&mut r, 30.0));
        assert_eq!(r.rotation(), Some(30.0));
    }

    #[test]
    fn line_vertex_indices() {
        let mut line = factory::create_line(
            4,
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            &ShapeStyle::default(),
        );
        update_vertex(&mut line, 0, Point::new(-1.0, -1.0));
        update_vertex(&mut line, 5, Point::new(9.0, 9.0));
        assert_eq!(line.vertices(), vec![Point::new(-1.0, -1.0), Point::new(9.0, 9.0)]);
    }

    #[test]
    fn rectangle_drag_to_same_position_is_idempotent() {
        let mut r = rect(Point::new(10.0, 20.0), Point::new(110.0, 70.0));
        let before = r.clone();
        for i in 0..4 {
            let corner = r.vertices()[i];
            update_vertex(&mut r, i, corner);
            assert_eq!(r, before);
        }
    }

    #[test]
    fn rectangle_resizes_from_opposite_corner() {
        let mut r = rect(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        // drag bottom-right out, top-left stays
        update_vertex(&mut r, 2, Point::new(20.0, 30.0));
        assert_eq!(
            r.kind,
            ShapeKind::Rectangle {
                top_left: Point::new(0.0, 0.0),
                bottom_right: Point::new(20.0, 30.0),
                rotation: 0.0
            }
        );
    }

    #[test]
    fn rotated_rectangle_keeps_anchor_and_rotation() {
        let mut r = rect(Point::new(0.0, 0.0), Point::new(40.0, 20.0));
        rotate_shape(&mut r, 30.0);
        let anchor = r.vertices()[0];
        let dragged = r.vertices()[2];
        update_vertex(&mut r, 2, dragged.offset(5.0, 8.0));
        let after = r.vertices();
        assert_close(after[0], anchor);
        assert_close(after[2], dragged.offset(5.0, 8.0));
        assert_eq!(r.rotation(), Some(30.0));
    }

    #[test]
    fn rectangle_collapse_is_floored() {
        let mut r = rect(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        update_vertex(&mut r, 2, Point::new(0.0, 0.0));
        if let ShapeKind::Rectangle {
            top_left,
            bottom_right,
            ..
        } = r.kind
        {
            assert_eq!(bottom_right.x - top_left.x, 2.0);
            assert_eq!(bottom_right.y - top_left.y, 2.0);
        }
        assert!(!update_vertex(&mut r, 4, Point::new(1.0, 1.0)));
    }

    #[test]
    fn polygon_vertex_lands_under_pointer_and_center_stays() {
        let mut poly = factory::create_polygon(
            5,
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(5.0, 10.0),
            ],
            &ShapeStyle::default(),
        );
        rotate_shape(&mut poly, 60.0);
        let center = poly.center();
        let target = Point::new(25.0, -4.0);
        assert!(update_vertex(&mut poly, 1, target));
        assert_close(poly.vertices()[1], target);
        assert_eq!(poly.center(), center);
        assert!(!update_vertex(&mut poly, 3, target));
    }
}
