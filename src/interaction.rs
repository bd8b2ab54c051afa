//! Pointer gesture state machine for editing existing shapes.
//!
//! Exactly one [`Gesture`] is active at a time. A press resolves, in order,
//! against the selected shape's rotation handle, then its vertices, then the
//! body of every shape from the top of the z-order down. Tolerances in
//! [`HitThresholds`] are screen pixels and get divided by the zoom before
//! they are compared against canvas distances.

use serde::{Deserialize, Serialize};

use crate::geometry;
use crate::model::{Point, Shape, ShapeKind};
use crate::transform;
use crate::view::View;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    Idle,
    /// `grab` is the pointer position relative to the pan offset at press time.
    Panning { grab: Point },
    /// `start_angle_offset` is pointer angle minus shape rotation at press time, in degrees.
    RotatingShape { id: u64, start_angle_offset: f64 },
    DraggingVertex { id: u64, index: usize },
    DraggingShape { id: u64, last_point: Point },
}

impl Gesture {
    pub fn label(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Panning { .. } => "panning",
            Gesture::RotatingShape { .. } => "rotating",
            Gesture::DraggingVertex { .. } => "dragging vertex",
            Gesture::DraggingShape { .. } => "dragging shape",
        }
    }

    /// Shape the gesture is editing, if any.
    pub fn target(&self) -> Option<u64> {
        match *self {
            Gesture::Idle | Gesture::Panning { .. } => None,
            Gesture::RotatingShape { id, .. }
            | Gesture::DraggingVertex { id, .. }
            | Gesture::DraggingShape { id, .. } => Some(id),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitKind {
    RotationHandle,
    Vertex(usize),
    Body,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HitThresholds {
    pub vertex: f64,
    pub line: f64,
    pub polygon_close: f64,
    /// Canvas pixels, not divided by zoom.
    pub drag_detection: f64,
    pub rotation_handle_distance: f64,
}

impl Default for HitThresholds {
    fn default() -> Self {
        Self {
            vertex: 8.0,
            line: 5.0,
            polygon_close: 12.0,
            drag_detection: 5.0,
            rotation_handle_distance: 30.0,
        }
    }
}

/// Where the rotation handle of `shape` sits, if it has one. Only
/// rectangles and closed polygons rotate.
pub fn rotation_handle_point(shape: &Shape, zoom: f64, handle_distance: f64) -> Option<Point> {
    let center = shape.center();
    let reach = match &shape.kind {
        ShapeKind::Line { .. } => return None,
        ShapeKind::Polygon { closed: false, .. } => return None,
        ShapeKind::Rectangle {
            top_left,
            bottom_right,
            ..
        } => {
            let (w, h) = geometry::rectangle_dimensions(*top_left, *bottom_right);
            w.max(h) / 2.0
        }
        ShapeKind::Polygon { .. } => shape
            .vertices()
            .into_iter()
            .map(|v| geometry::distance(center, v))
            .fold(0.0, f64::max),
    };
    let d = reach + handle_distance / zoom;
    let rotation = shape.rotation().unwrap_or(0.0);
    Some(geometry::rotate_point(
        Point::new(center.x, center.y - d),
        center,
        rotation,
    ))
}

/// Whether `point` falls on the body of `shape`. Open polygons never hit.
pub fn hits_shape(shape: &Shape, point: Point, line_threshold: f64) -> bool {
    match &shape.kind {
        ShapeKind::Line { start, end } => geometry::point_near_line(point, *start, *end, line_threshold),
        ShapeKind::Rectangle {
            top_left,
            bottom_right,
            rotation,
        } => geometry::point_in_rotated_rectangle(point, *top_left, *bottom_right, *rotation),
        ShapeKind::Polygon { closed: true, .. } => {
            geometry::point_in_polygon(point, &shape.vertices())
        }
        ShapeKind::Polygon { .. } => false,
    }
}

/// Id of the topmost shape under `point`. Hidden shapes still take part.
pub fn topmost_hit(shapes: &[Shape], point: Point, line_threshold: f64) -> Option<u64> {
    shapes
        .iter()
        .rev()
        .find(|s| hits_shape(s, point, line_threshold))
        .map(|s| s.id)
}

#[derive(Debug)]
pub struct Interaction {
    gesture: Gesture,
    /// Set once the active gesture has changed any geometry.
    modified: bool,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            gesture: Gesture::Idle,
            modified: false,
        }
    }
}

impl Interaction {
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    fn begin(&mut self, gesture: Gesture) {
        log::debug!("gesture begin: {}", gesture.label());
        self.gesture = gesture;
        self.modified = false;
    }

    /// Resolves a press at canvas point `point`. Updates `selected` when a
    /// body is hit or nothing is hit. Ignored while another gesture runs.
    pub fn pointer_down(
        &mut self,
        shapes: &[Shape],
        selected: &mut Option<u64>,
        point: Point,
        zoom: f64,
        thresholds: &HitThresholds,
    ) -> Option<HitKind> {
        if self.is_active() {
            return None;
        }
        let vertex_threshold = thresholds.vertex / zoom;

        if let Some(shape) = selected.and_then(|id| shapes.iter().find(|s| s.id == id)) {
            let handle = rotation_handle_point(shape, zoom, thresholds.rotation_handle_distance);
            if let Some(handle) = handle {
                if geometry::point_near_vertex(point, handle, vertex_threshold) {
                    let angle = geometry::angle_degrees(shape.center(), point);
                    let rotation = shape.rotation().unwrap_or(0.0);
                    self.begin(Gesture::RotatingShape {
                        id: shape.id,
                        start_angle_offset: angle - rotation,
                    });
                    return Some(HitKind::RotationHandle);
                }
            }

            let vertex = shape
                .vertices()
                .iter()
                .position(|v| geometry::point_near_vertex(point, *v, vertex_threshold));
            if let Some(index) = vertex {
                self.begin(Gesture::DraggingVertex {
                    id: shape.id,
                    index,
                });
                return Some(HitKind::Vertex(index));
            }
        }

        match topmost_hit(shapes, point, thresholds.line / zoom) {
            Some(id) => {
                *selected = Some(id);
                self.begin(Gesture::DraggingShape {
                    id,
                    last_point: point,
                });
                Some(HitKind::Body)
            }
            None => {
                *selected = None;
                None
            }
        }
    }

    /// Applies a pointer move to the active gesture. Returns whether any
    /// geometry changed.
    pub fn pointer_move(&mut self, shapes: &mut [Shape], point: Point) -> bool {
        let changed = match self.gesture {
            Gesture::Idle | Gesture::Panning { .. } => false,
            Gesture::RotatingShape {
                id,
                start_angle_offset,
            } => match shapes.iter_mut().find(|s| s.id == id) {
                Some(shape) => {
                    let angle = geometry::angle_degrees(shape.center(), point);
                    let rotation = angle - start_angle_offset;
                    let before = shape.rotation();
                    transform::rotate_shape(shape, rotation) && before != Some(rotation)
                }
                None => self.lost(id),
            },
            Gesture::DraggingVertex { id, index } => match shapes.iter_mut().find(|s| s.id == id) {
                Some(shape) => {
                    let before = shape.kind.clone();
                    transform::update_vertex(shape, index, point) && shape.kind != before
                }
                None => self.lost(id),
            },
            Gesture::DraggingShape { id, last_point } => match shapes.iter_mut().find(|s| s.id == id) {
                Some(shape) => {
                    let (dx, dy) = (point.x - last_point.x, point.y - last_point.y);
                    transform::translate_shape(shape, dx, dy);
                    self.gesture = Gesture::DraggingShape {
                        id,
                        last_point: point,
                    };
                    dx != 0.0 || dy != 0.0
                }
                None => self.lost(id),
            },
        };
        self.modified |= changed;
        changed
    }

    fn lost(&mut self, id: u64) -> bool {
        log::debug!("gesture target {id} is gone, dropping gesture");
        self.gesture = Gesture::Idle;
        self.modified = false;
        false
    }

    /// Ends the active gesture. Returns whether it modified any geometry.
    pub fn pointer_up(&mut self) -> bool {
        if self.is_active() {
            log::debug!("gesture end: {}", self.gesture.label());
        }
        let modified = self.modified;
        self.gesture = Gesture::Idle;
        self.modified = false;
        modified
    }

    pub fn begin_pan(&mut self, screen: Point, view: &View) {
        if self.is_active() {
            return;
        }
        self.begin(Gesture::Panning {
            grab: Point::new(screen.x - view.pan_offset.x, screen.y - view.pan_offset.y),
        });
    }

    pub fn pan_move(&mut self, screen: Point, view: &mut View) {
        if let Gesture::Panning { grab } = self.gesture {
            view.pan_offset = Point::new(screen.x - grab.x, screen.y - grab.y);
        }
    }

    /// Drops the active gesture without reporting a change.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
        self.modified = false;
    }
}
