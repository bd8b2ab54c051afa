//! The document session: owns the shape list, calibration, selection, view
//! and history, and routes pointer and keyboard input to the drawing and
//! editing state machines. Front-ends talk only to [`Session`].

use crate::calibration::{CalibrationError, ScaleCalibration};
use crate::drawing::{DrawOutcome, Drawing};
use crate::factory;
use crate::history::History;
use crate::interaction::{Gesture, HitKind, HitThresholds, Interaction};
use crate::measurement::{self, Measurement};
use crate::model::{LineSegment, Point, Shape, ShapeAttributes, ShapeStyle, Tool};
use crate::settings::Settings;
use crate::units::Unit;
use crate::view::{View, ZoomLimits};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Undo,
    Redo,
    Delete,
    Cancel,
    Tool(Tool),
}

impl KeyCommand {
    /// Single-letter tool shortcuts, case-insensitive.
    pub fn from_char(c: char) -> Option<Self> {
        let tool = match c.to_ascii_lowercase() {
            'v' | 's' => Tool::Select,
            'l' => Tool::Line,
            'r' => Tool::Rectangle,
            'p' => Tool::Polygon,
            'h' => Tool::Pan,
            _ => return None,
        };
        Some(KeyCommand::Tool(tool))
    }
}

#[derive(Debug)]
pub struct Session {
    shapes: Vec<Shape>,
    calibration: Option<ScaleCalibration>,
    pending_calibration: Option<LineSegment>,
    selected: Option<u64>,
    tool: Tool,
    style: ShapeStyle,
    unit: Unit,
    view: View,
    interaction: Interaction,
    drawing: Drawing,
    history: History<Vec<Shape>>,
    next_id: u64,
    image_size: Option<(f64, f64)>,
    zoom_limits: ZoomLimits,
    thresholds: HitThresholds,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl Session {
    pub fn new(settings: &Settings) -> Self {
        Self {
            shapes: Vec::new(),
            calibration: None,
            pending_calibration: None,
            selected: None,
            tool: Tool::Select,
            style: settings.style(),
            unit: settings.default_unit,
            view: View::default(),
            interaction: Interaction::default(),
            drawing: Drawing::default(),
            history: History::new(Vec::new(), settings.max_history),
            next_id: 1,
            image_size: None,
            zoom_limits: settings.zoom_limits(),
            thresholds: settings.thresholds(),
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, id: u64) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    fn shape_mut(&mut self, id: u64) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    pub fn calibration(&self) -> Option<&ScaleCalibration> {
        self.calibration.as_ref()
    }

    /// Scale line drawn and waiting for the user to enter its length.
    pub fn pending_calibration(&self) -> Option<LineSegment> {
        self.pending_calibration
    }

    pub fn selected(&self) -> Option<u64> {
        self.selected
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selected.and_then(|id| self.shape(id))
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn style(&self) -> ShapeStyle {
        self.style
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn gesture(&self) -> Gesture {
        self.interaction.gesture()
    }

    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    pub fn thresholds(&self) -> &HitThresholds {
        &self.thresholds
    }

    pub fn image_size(&self) -> Option<(f64, f64)> {
        self.image_size
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Starts a fresh document: previous shapes, scale, selection and
    /// history are dropped and the view is fitted to the image.
    pub fn load_document(&mut self, image_w: f64, image_h: f64, canvas_w: f64, canvas_h: f64) {
        self.shapes.clear();
        self.calibration = None;
        self.pending_calibration = None;
        self.selected = None;
        self.tool = Tool::Select;
        self.interaction.cancel();
        self.drawing.cancel();
        self.history.reset(Vec::new());
        self.view = View::default();
        self.view.fit_to_image(image_w, image_h, canvas_w, canvas_h);
        self.image_size = Some((image_w, image_h));
        log::info!(
            "loaded {image_w}x{image_h} document, zoom {:.3}",
            self.view.zoom
        );
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if tool != self.tool {
            self.drawing.cancel();
            self.tool = tool;
        }
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
    }

    pub fn set_style(&mut self, style: ShapeStyle) {
        self.style = style;
    }

    // --- pointer input ------------------------------------------------------

    /// `pan_modifier` is set for the middle button or ctrl+primary.
    pub fn pointer_down(&mut self, screen: Point, pan_modifier: bool) -> Option<HitKind> {
        if self.tool == Tool::Pan || pan_modifier {
            self.interaction.begin_pan(screen, &self.view);
            return None;
        }
        let canvas = self.view.screen_to_canvas(screen);
        match self.tool {
            Tool::Select => self.interaction.pointer_down(
                &self.shapes,
                &mut self.selected,
                canvas,
                self.view.zoom,
                &self.thresholds,
            ),
            tool => {
                let outcome = self
                    .drawing
                    .press(tool, canvas, self.view.zoom, &self.thresholds);
                self.apply_draw_outcome(outcome);
                None
            }
        }
    }

    pub fn pointer_move(&mut self, screen: Point) {
        if matches!(self.interaction.gesture(), Gesture::Panning { .. }) {
            self.interaction.pan_move(screen, &mut self.view);
            return;
        }
        let canvas = self.view.screen_to_canvas(screen);
        self.interaction.pointer_move(&mut self.shapes, canvas);
        self.drawing.motion(canvas, &self.thresholds);
    }

    /// Returns a hint for the user when a draw was rejected.
    pub fn pointer_up(&mut self, screen: Point) -> Option<&'static str> {
        if matches!(self.interaction.gesture(), Gesture::Panning { .. }) {
            self.interaction.pointer_up();
            return None;
        }
        if self.interaction.pointer_up() {
            self.commit();
        }
        let canvas = self.view.screen_to_canvas(screen);
        let outcome = self.drawing.release(canvas, &self.thresholds);
        self.apply_draw_outcome(outcome)
    }

    pub fn double_click(&mut self) {
        if self.tool == Tool::Polygon {
            let outcome = self.drawing.double_click();
            self.apply_draw_outcome(outcome);
        }
    }

    pub fn wheel(&mut self, delta_y: f64) {
        self.view.wheel_step(delta_y, &self.zoom_limits);
    }

    fn apply_draw_outcome(&mut self, outcome: DrawOutcome) -> Option<&'static str> {
        let style = self.style;
        match outcome {
            DrawOutcome::Pending => {}
            DrawOutcome::Scale(line) => {
                log::debug!("scale line drawn, {:.1} px", line.length());
                self.pending_calibration = Some(line);
            }
            DrawOutcome::Line { start, end } => {
                let id = self.allocate_id();
                self.add_shape(factory::create_line(id, start, end, &style));
            }
            DrawOutcome::Rectangle { start, end } => {
                let id = self.allocate_id();
                self.add_shape(factory::create_rectangle(id, start, end, &style));
            }
            DrawOutcome::Polygon(points) => {
                let id = self.allocate_id();
                self.add_shape(factory::create_polygon(id, points, &style));
            }
            DrawOutcome::Rejected(hint) => {
                log::warn!("{hint}");
                return Some(hint);
            }
        }
        None
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn add_shape(&mut self, shape: Shape) {
        log::info!("created {}", shape.display_name());
        self.shapes.push(shape);
        self.commit();
    }

    fn commit(&mut self) {
        self.history.push(self.shapes.clone());
    }

    // --- calibration --------------------------------------------------------

    /// Turns the pending scale line into the calibration. On error the line
    /// stays pending so the user can be asked again.
    pub fn apply_calibration(&mut self, input: &str, unit: Unit) -> Result<(), CalibrationError> {
        let line = self.pending_calibration.ok_or(CalibrationError::NoLine)?;
        match ScaleCalibration::from_input(line, input, unit) {
            Ok(calibration) => {
                log::info!(
                    "scale set: {:.1} px = {} {}",
                    calibration.pixel_distance(),
                    calibration.real_world_distance(),
                    calibration.unit()
                );
                self.calibration = Some(calibration);
                self.pending_calibration = None;
                self.tool = Tool::Select;
                Ok(())
            }
            Err(err) => {
                log::warn!("rejected scale input: {err}");
                Err(err)
            }
        }
    }

    pub fn cancel_calibration(&mut self) {
        self.pending_calibration = None;
    }

    pub fn reset_calibration(&mut self) {
        if self.calibration.take().is_some() {
            log::info!("scale reset");
        }
        self.pending_calibration = None;
        self.set_tool(Tool::Select);
    }

    // --- shape edits --------------------------------------------------------

    pub fn select(&mut self, id: Option<u64>) -> bool {
        match id {
            Some(id) if self.shape(id).is_none() => false,
            _ => {
                self.selected = id;
                true
            }
        }
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selected {
            Some(id) => self.delete_shape(id),
            None => false,
        }
    }

    pub fn delete_shape(&mut self, id: u64) -> bool {
        let Some(index) = self.shapes.iter().position(|s| s.id == id) else {
            return false;
        };
        let shape = self.shapes.remove(index);
        log::info!("deleted {}", shape.display_name());
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.interaction.gesture().target() == Some(id) {
            self.interaction.cancel();
        }
        self.commit();
        true
    }

    /// An empty label clears it.
    pub fn set_label(&mut self, id: u64, label: &str) -> bool {
        let label = (!label.is_empty()).then(|| label.to_string());
        let Some(shape) = self.shape_mut(id) else {
            return false;
        };
        if shape.label == label {
            return true;
        }
        shape.label = label;
        self.commit();
        true
    }

    pub fn set_visibility(&mut self, id: u64, visible: bool) -> bool {
        let Some(shape) = self.shape_mut(id) else {
            return false;
        };
        if shape.visible == visible {
            return true;
        }
        shape.visible = visible;
        self.commit();
        true
    }

    pub fn set_attributes(&mut self, id: u64, attrs: ShapeAttributes) -> bool {
        let Some(shape) = self.shape_mut(id) else {
            return false;
        };
        let before = (shape.color, shape.opacity, shape.stroke_width);
        shape.apply_attributes(attrs);
        if (shape.color, shape.opacity, shape.stroke_width) != before {
            self.commit();
        }
        true
    }

    // --- history ------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        let Some(shapes) = self.history.undo() else {
            return false;
        };
        self.shapes = shapes.clone();
        self.after_history_move();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(shapes) = self.history.redo() else {
            return false;
        };
        self.shapes = shapes.clone();
        self.after_history_move();
        true
    }

    fn after_history_move(&mut self) {
        self.interaction.cancel();
        if self.selected.is_some_and(|id| self.shape(id).is_none()) {
            self.selected = None;
        }
    }

    // --- queries ------------------------------------------------------------

    /// Measurement of shape `id` in the current display unit.
    pub fn measurement(&self, id: u64) -> Option<Measurement> {
        let shape = self.shape(id)?;
        measurement::calculate_measurements(shape, self.calibration.as_ref(), self.unit)
    }

    pub fn side_lengths(&self, id: u64) -> Vec<(Point, f64)> {
        match (self.shape(id), self.calibration.as_ref()) {
            (Some(shape), Some(scale)) => measurement::side_lengths(shape, scale, self.unit),
            _ => Vec::new(),
        }
    }

    // --- keyboard -----------------------------------------------------------

    /// Abandons any draw or gesture in progress. Geometry changed by an
    /// unfinished gesture is rolled back to the last committed state.
    pub fn cancel(&mut self) {
        if self.interaction.is_active() {
            let dirty = self.interaction.pointer_up();
            if dirty {
                if let Some(shapes) = self.history.current() {
                    self.shapes = shapes.clone();
                }
            }
        }
        self.drawing.cancel();
        self.pending_calibration = None;
        self.selected = None;
        self.tool = Tool::Select;
    }

    /// Returns whether the command did anything.
    pub fn handle_key(&mut self, command: KeyCommand) -> bool {
        match command {
            KeyCommand::Undo => self.undo(),
            KeyCommand::Redo => self.redo(),
            KeyCommand::Delete => self.delete_selected(),
            KeyCommand::Cancel => {
                self.cancel();
                true
            }
            KeyCommand::Tool(tool) => {
                self.set_tool(tool);
                true
            }
        }
    }
}
