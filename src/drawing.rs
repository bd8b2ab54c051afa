//! In-progress drawing for the creation tools. Shapes are only produced when
//! a draw completes; until then everything here is a preview.

use crate::geometry;
use crate::interaction::HitThresholds;
use crate::model::{LineSegment, Point, Tool};

/// What a pointer event did to the current draw.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOutcome {
    Pending,
    Scale(LineSegment),
    Line { start: Point, end: Point },
    Rectangle { start: Point, end: Point },
    Polygon(Vec<Point>),
    /// Released without dragging; carries the hint for the user.
    Rejected(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragDraw {
    pub tool: Tool,
    pub start: Point,
    pub current: Point,
    has_dragged: bool,
}

#[derive(Debug, Default)]
pub struct Drawing {
    drag: Option<DragDraw>,
    polygon: Vec<Point>,
    cursor: Option<Point>,
}

impl Drawing {
    pub fn is_active(&self) -> bool {
        self.drag.is_some() || !self.polygon.is_empty()
    }

    pub fn drag(&self) -> Option<&DragDraw> {
        self.drag.as_ref()
    }

    pub fn polygon_points(&self) -> &[Point] {
        &self.polygon
    }

    /// Last pointer position seen while a polygon is being placed.
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    /// Whether a press at `point` would close the polygon under construction.
    pub fn can_close_polygon(&self, point: Point, zoom: f64, thresholds: &HitThresholds) -> bool {
        self.polygon.len() >= 3
            && geometry::point_near_vertex(point, self.polygon[0], thresholds.polygon_close / zoom)
    }

    pub fn press(
        &mut self,
        tool: Tool,
        point: Point,
        zoom: f64,
        thresholds: &HitThresholds,
    ) -> DrawOutcome {
        match tool {
            Tool::Scale | Tool::Line | Tool::Rectangle => {
                self.drag = Some(DragDraw {
                    tool,
                    start: point,
                    current: point,
                    has_dragged: false,
                });
                DrawOutcome::Pending
            }
            Tool::Polygon => {
                if self.can_close_polygon(point, zoom, thresholds) {
                    self.cursor = None;
                    return DrawOutcome::Polygon(std::mem::take(&mut self.polygon));
                }
                self.polygon.push(point);
                DrawOutcome::Pending
            }
            Tool::Select | Tool::Pan => DrawOutcome::Pending,
        }
    }

    pub fn motion(&mut self, point: Point, thresholds: &HitThresholds) {
        if !self.polygon.is_empty() {
            self.cursor = Some(point);
        }
        if let Some(drag) = &mut self.drag {
            drag.current = point;
            if !drag.has_dragged && geometry::distance(drag.start, point) > thresholds.drag_detection {
                drag.has_dragged = true;
            }
        }
    }

    pub fn release(&mut self, point: Point, thresholds: &HitThresholds) -> DrawOutcome {
        let Some(drag) = self.drag.take() else {
            return DrawOutcome::Pending;
        };
        let dragged =
            drag.has_dragged || geometry::distance(drag.start, point) > thresholds.drag_detection;
        if !dragged {
            return match drag.tool.drag_hint() {
                Some(hint) => DrawOutcome::Rejected(hint),
                None => DrawOutcome::Pending,
            };
        }
        let (start, end) = (drag.start, point);
        match drag.tool {
            Tool::Scale => DrawOutcome::Scale(LineSegment::new(start, end)),
            Tool::Line => DrawOutcome::Line { start, end },
            Tool::Rectangle => DrawOutcome::Rectangle { start, end },
            Tool::Polygon | Tool::Select | Tool::Pan => DrawOutcome::Pending,
        }
    }

    /// Finishes the polygon on a double-click. The second press of the
    /// double-click already added a point; it is dropped when enough remain.
    pub fn double_click(&mut self) -> DrawOutcome {
        if self.polygon.len() < 3 {
            return DrawOutcome::Pending;
        }
        let mut points = std::mem::take(&mut self.polygon);
        if points.len() > 3 {
            points.pop();
        }
        self.cursor = None;
        DrawOutcome::Polygon(points)
    }

    pub fn cancel(&mut self) {
        self.drag = None;
        self.polygon.clear();
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn th() -> HitThresholds {
        HitThresholds::default()
    }

    #[test]
    fn click_without_drag_is_rejected() {
        let mut d = Drawing::default();
        d.press(Tool::Line, Point::new(10.0, 10.0), 1.0, &th());
        d.motion(Point::new(12.0, 11.0), &th());
        assert_eq!(
            d.release(Point::new(12.0, 11.0), &th()),
            DrawOutcome::Rejected("Please click and drag to make a line")
        );
        assert!(!d.is_active());
    }

    #[test]
    fn drag_latches_even_if_released_near_start() {
        let mut d = Drawing::default();
        d.press(Tool::Rectangle, Point::new(0.0, 0.0), 1.0, &th());
        d.motion(Point::new(20.0, 20.0), &th());
        assert_eq!(
            d.release(Point::new(1.0, 1.0), &th()),
            DrawOutcome::Rectangle {
                start: Point::new(0.0, 0.0),
                end: Point::new(1.0, 1.0)
            }
        );
    }

    #[test]
    fn final_distance_counts_without_motion() {
        let mut d = Drawing::default();
        d.press(Tool::Scale, Point::new(0.0, 0.0), 1.0, &th());
        assert_eq!(
            d.release(Point::new(100.0, 0.0), &th()),
            DrawOutcome::Scale(LineSegment::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0)))
        );
    }

    #[test]
    fn polygon_closes_near_first_point() {
        let mut d = Drawing::default();
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
        ];
        for p in pts {
            assert_eq!(d.press(Tool::Polygon, p, 1.0, &th()), DrawOutcome::Pending);
        }
        d.motion(Point::new(50.0, 50.0), &th());
        assert_eq!(d.cursor(), Some(Point::new(50.0, 50.0)));
        // 10 px away: outside 12/2 at zoom 2, inside at zoom 1
        assert!(!d.can_close_polygon(Point::new(10.0, 0.0), 2.0, &th()));
        assert_eq!(
            d.press(Tool::Polygon, Point::new(10.0, 0.0), 1.0, &th()),
            DrawOutcome::Polygon(pts.to_vec())
        );
        assert!(!d.is_active());
        assert_eq!(d.cursor(), None);
    }

    #[test]
    fn polygon_needs_three_points_to_close() {
        let mut d = Drawing::default();
        d.press(Tool::Polygon, Point::new(0.0, 0.0), 1.0, &th());
        d.press(Tool::Polygon, Point::new(50.0, 0.0), 1.0, &th());
        assert_eq!(
            d.press(Tool::Polygon, Point::new(1.0, 1.0), 1.0, &th()),
            DrawOutcome::Pending
        );
        assert_eq!(d.polygon_points().len(), 3);
    }

    #[test]
    fn double_click_drops_duplicate_point() {
        let mut d = Drawing::default();
        for p in [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 10.0),
        ] {
            d.press(Tool::Polygon, p, 1.0, &th());
        }
        match d.double_click() {
            DrawOutcome::Polygon(points) => assert_eq!(points.len(), 3),
            other => panic!("unexpected {other:?}"),
        }

        let mut d = Drawing::default();
        for p in [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)] {
            d.press(Tool::Polygon, p, 1.0, &th());
        }
        match d.double_click() {
            DrawOutcome::Polygon(points) => assert_eq!(points.len(), 3),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(d.double_click(), DrawOutcome::Pending);
    }

    #[test]
    fn cancel_discards_everything() {
        let mut d = Drawing::default();
        d.press(Tool::Polygon, Point::new(0.0, 0.0), 1.0, &th());
        d.press(Tool::Polygon, Point::new(5.0, 5.0), 1.0, &th());
        d.cancel();
        assert!(!d.is_active());
        d.press(Tool::Line, Point::new(0.0, 0.0), 1.0, &th());
        d.cancel();
        assert_eq!(d.release(Point::new(50.0, 50.0), &th()), DrawOutcome::Pending);
    }
}
