use serde::{Deserialize, Serialize};

use crate::model::Point;

pub fn screen_to_canvas(screen: Point, pan_offset: Point, zoom: f64) -> Point {
    Point::new(
        (screen.x - pan_offset.x) / zoom,
        (screen.y - pan_offset.y) / zoom,
    )
}

pub fn canvas_to_screen(canvas: Point, pan_offset: Point, zoom: f64) -> Point {
    Point::new(
        canvas.x * zoom + pan_offset.x,
        canvas.y * zoom + pan_offset.y,
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
    /// Fractional change per wheel tick.
    pub factor: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 5.0,
            factor: 0.1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    pub pan_offset: Point,
    pub zoom: f64,
}

impl Default for View {
    fn default() -> Self {
        Self {
            pan_offset: Point::default(),
            zoom: 1.0,
        }
    }
}

impl View {
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        screen_to_canvas(screen, self.pan_offset, self.zoom)
    }

    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        canvas_to_screen(canvas, self.pan_offset, self.zoom)
    }

    /// One wheel tick. Scrolling down (positive delta) zooms out. The step is a
    /// flat multiplication of the current zoom; the pan offset is left alone, so
    /// the zoom is anchored at the screen origin rather than at the cursor.
    pub fn wheel_step(&mut self, delta_y: f64, limits: &ZoomLimits) {
        if delta_y == 0.0 {
            return;
        }
        let step = if delta_y > 0.0 {
            1.0 - limits.factor
        } else {
            1.0 + limits.factor
        };
        self.zoom = (self.zoom * step).clamp(limits.min, limits.max);
        log::debug!("zoom -> {:.3}", self.zoom);
    }

    /// Scales the image to 90% of the best fit and centers it.
    pub fn fit_to_image(&mut self, image_w: f64, image_h: f64, canvas_w: f64, canvas_h: f64) {
        if image_w <= 0.0 || image_h <= 0.0 || canvas_w <= 0.0 || canvas_h <= 0.0 {
            return;
        }
        let scale = (canvas_w / image_w).min(canvas_h / image_h) * 0.9;
        self.zoom = scale;
        self.pan_offset = Point::new(
            (canvas_w - image_w * scale) / 2.0,
            (canvas_h - image_h * scale) / 2.0,
        );
    }
}
