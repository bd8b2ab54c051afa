use eframe::egui;
use serde::{Deserialize, Serialize};

use crate::geometry;

/// A point in canvas space.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn from_pos2(p: egui::Pos2) -> Self {
        Self {
            x: p.x as f64,
            y: p.y as f64,
        }
    }

    pub fn to_pos2(self) -> egui::Pos2 {
        egui::pos2(self.x as f32, self.y as f32)
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
}

impl LineSegment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        geometry::distance(self.start, self.end)
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const RED: Rgba = Rgba {
        r: 255,
        g: 0,
        b: 0,
        a: 255,
    };

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }

    pub fn from_color32(c: egui::Color32) -> Self {
        let [r, g, b, a] = c.to_srgba_unmultiplied();
        Self { r, g, b, a }
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b, a: 255 })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Select,
    Scale,
    Line,
    Rectangle,
    Polygon,
    Pan,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::Select,
        Tool::Scale,
        Tool::Line,
        Tool::Rectangle,
        Tool::Polygon,
        Tool::Pan,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Scale => "Set Scale",
            Tool::Line => "Line",
            Tool::Rectangle => "Rectangle",
            Tool::Polygon => "Polygon",
            Tool::Pan => "Pan",
        }
    }

    /// Hint shown when a drag tool is released without dragging.
    pub fn drag_hint(self) -> Option<&'static str> {
        match self {
            Tool::Scale => Some("Please click and drag to set scale"),
            Tool::Line => Some("Please click and drag to make a line"),
            Tool::Rectangle => Some("Please click and drag to make a rectangle"),
            Tool::Polygon => Some("Please click and drag to make a polygon"),
            Tool::Select | Tool::Pan => None,
        }
    }
}

/// Draw style applied to newly created shapes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ShapeStyle {
    pub color: Rgba,
    pub opacity: f32,
    pub stroke_width: f32,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: Rgba::RED,
            opacity: 0.3,
            stroke_width: 2.0,
        }
    }
}

/// Partial attribute edit; `None` fields are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShapeAttributes {
    pub color: Option<Rgba>,
    pub opacity: Option<f32>,
    pub stroke_width: Option<f32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Shape {
    pub id: u64,
    pub color: Rgba,
    pub opacity: f32,
    pub stroke_width: f32,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub kind: ShapeKind,
}

fn default_visible() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum ShapeKind {
    Line {
        start: Point,
        end: Point,
    },
    Rectangle {
        top_left: Point,
        bottom_right: Point,
        /// Degrees, about the rectangle's own center.
        rotation: f64,
    },
    Polygon {
        points: Vec<Point>,
        closed: bool,
        rotation: f64,
        /// Centroid frozen at creation; follows translation but not vertex edits.
        center: Point,
    },
}

impl Shape {
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ShapeKind::Line { .. } => "Line",
            ShapeKind::Rectangle { .. } => "Rectangle",
            ShapeKind::Polygon { .. } => "Polygon",
        }
    }

    pub fn display_name(&self) -> String {
        match &self.label {
            Some(label) if !label.is_empty() => label.clone(),
            _ => format!("{} {}", self.type_name(), self.id),
        }
    }

    pub fn rotation(&self) -> Option<f64> {
        match &self.kind {
            ShapeKind::Line { .. } => None,
            ShapeKind::Rectangle { rotation, .. } | ShapeKind::Polygon { rotation, .. } => {
                Some(*rotation)
            }
        }
    }

    /// Pivot used for rotation. Lines have none and report the origin.
    pub fn center(&self) -> Point {
        match &self.kind {
            ShapeKind::Line { .. } => Point::default(),
            ShapeKind::Rectangle {
                top_left,
                bottom_right,
                ..
            } => top_left.midpoint(*bottom_right),
            ShapeKind::Polygon { center, .. } => *center,
        }
    }

    /// Vertices in their on-canvas (rotated) positions.
    pub fn vertices(&self) -> Vec<Point> {
        match &self.kind {
            ShapeKind::Line { start, end } => vec![*start, *end],
            ShapeKind::Rectangle {
                top_left,
                bottom_right,
                rotation,
            } => geometry::rotated_rectangle_corners(*top_left, *bottom_right, *rotation).to_vec(),
            ShapeKind::Polygon {
                points,
                rotation,
                center,
                ..
            } => points
                .iter()
                .map(|p| geometry::rotate_point(*p, *center, *rotation))
                .collect(),
        }
    }

    pub fn apply_attributes(&mut self, attrs: ShapeAttributes) {
        if let Some(color) = attrs.color {
            self.color = color;
        }
        if let Some(opacity) = attrs.opacity {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(width) = attrs.stroke_width {
            if width > 0.0 {
                self.stroke_width = width;
            }
        }
    }
}
