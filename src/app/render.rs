use eframe::egui;

use takeoff::interaction;
use takeoff::measurement::{self, calculate_measurements};
use takeoff::model::{Point, Rgba, Shape, ShapeKind, ShapeStyle, Tool};
use takeoff::units::{format_area, format_measurement};
use takeoff::view::View;
use takeoff::{ScaleCalibration, Session, Unit};

const SCALE_LINE_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 255, 0);
const ROTATION_HANDLE_COLOR: egui::Color32 = egui::Color32::from_rgb(58, 123, 200);
const VERTEX_RADIUS: f32 = 5.0;
const ROTATION_HANDLE_RADIUS: f32 = 6.0;
const CLOSE_HINT_RADIUS: f32 = 10.0;
const LABEL_PADDING: f32 = 4.0;
const LABEL_OFFSET_Y: f32 = 12.0;

pub(super) fn tool_button(ui: &mut egui::Ui, tool: Tool, session: &mut Session) -> bool {
    let active = session.tool() == tool;
    if ui.selectable_label(active, tool.label()).clicked() {
        session.set_tool(tool);
        return true;
    }
    false
}

fn color_row(ui: &mut egui::Ui, rgba: &mut Rgba) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        let presets = [
            egui::Color32::from_rgb(255, 0, 0),
            egui::Color32::from_rgb(40, 140, 60),
            egui::Color32::from_rgb(40, 90, 200),
            egui::Color32::from_rgb(200, 140, 40),
            egui::Color32::from_rgb(130, 60, 180),
        ];
        for c in presets {
            if ui
                .add_sized([18.0, 18.0], egui::Button::new("").fill(c))
                .clicked()
            {
                *rgba = Rgba::from_color32(c);
                changed = true;
            }
        }
        let mut arr = [rgba.r, rgba.g, rgba.b];
        if ui.color_edit_button_srgb(&mut arr).changed() {
            *rgba = Rgba {
                r: arr[0],
                g: arr[1],
                b: arr[2],
                a: 255,
            };
            changed = true;
        }
    });
    changed
}

/// Editor for the style applied to new shapes.
pub(super) fn style_editor(ui: &mut egui::Ui, style: &mut ShapeStyle) -> bool {
    let mut changed = false;
    ui.label("Color");
    changed |= color_row(ui, &mut style.color);
    changed |= ui
        .add(egui::Slider::new(&mut style.opacity, 0.0..=1.0).text("Opacity"))
        .changed();
    changed |= ui
        .add(egui::Slider::new(&mut style.stroke_width, 0.5..=12.0).text("Stroke"))
        .changed();
    changed
}

/// Attribute sliders report a commit only when the user lets go.
pub(super) fn attribute_editor(
    ui: &mut egui::Ui,
    color: &mut Rgba,
    opacity: &mut f32,
    stroke_width: &mut f32,
) -> bool {
    let mut commit = color_row(ui, color);
    let r = ui.add(egui::Slider::new(opacity, 0.0..=1.0).text("Opacity"));
    commit |= r.drag_stopped() || (r.changed() && !r.dragged());
    let r = ui.add(egui::Slider::new(stroke_width, 0.5..=12.0).text("Stroke"));
    commit |= r.drag_stopped() || (r.changed() && !r.dragged());
    commit
}

fn to_screen(origin: egui::Pos2, view: &View, p: Point) -> egui::Pos2 {
    origin + view.canvas_to_screen(p).to_pos2().to_vec2()
}

fn fill_color(color: Rgba, opacity: f32) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, (opacity * 255.0).round() as u8)
}

pub(super) fn draw_background(painter: &egui::Painter, rect: egui::Rect) {
    let bg = painter.ctx().style().visuals.extreme_bg_color;
    painter.rect_filled(rect, 0.0, bg);
}

pub(super) fn draw_document(
    painter: &egui::Painter,
    origin: egui::Pos2,
    view: &View,
    texture: &egui::TextureHandle,
    size: (f64, f64),
) {
    let min = to_screen(origin, view, Point::new(0.0, 0.0));
    let max = to_screen(origin, view, Point::new(size.0, size.1));
    painter.image(
        texture.id(),
        egui::Rect::from_min_max(min, max),
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

pub(super) fn draw_label(painter: &egui::Painter, anchor: egui::Pos2, text: String) {
    let galley = painter.layout_no_wrap(
        text,
        egui::FontId::proportional(12.0),
        egui::Color32::WHITE,
    );
    let center = anchor - egui::vec2(0.0, LABEL_OFFSET_Y);
    let rect = egui::Align2::CENTER_CENTER
        .anchor_size(center, galley.size())
        .expand(LABEL_PADDING);
    painter.rect_filled(rect, 2.0, egui::Color32::from_black_alpha(180));
    painter.galley(rect.min + egui::vec2(LABEL_PADDING, LABEL_PADDING), galley, egui::Color32::WHITE);
}

fn draw_vertex(painter: &egui::Painter, p: egui::Pos2) {
    painter.circle(
        p,
        VERTEX_RADIUS,
        egui::Color32::WHITE,
        egui::Stroke::new(1.0, egui::Color32::BLACK),
    );
}

fn dashed(painter: &egui::Painter, points: &[egui::Pos2], stroke: egui::Stroke, dash: f32) {
    painter.extend(egui::Shape::dashed_line(points, stroke, dash, dash));
}

pub(super) fn draw_shapes(
    painter: &egui::Painter,
    origin: egui::Pos2,
    session: &Session,
    show_side_lengths: bool,
) {
    let view = session.view();
    for shape in session.shapes().iter().filter(|s| s.visible) {
        let selected = session.selected() == Some(shape.id);
        draw_shape(painter, origin, view, shape, selected);
        draw_shape_labels(
            painter,
            origin,
            view,
            shape,
            session.calibration(),
            session.unit(),
            show_side_lengths,
        );
    }
    if let Some(shape) = session.selected_shape().filter(|s| s.visible) {
        draw_handles(painter, origin, session, shape);
    }
}

fn draw_shape(painter: &egui::Painter, origin: egui::Pos2, view: &View, shape: &Shape, selected: bool) {
    let stroke = egui::Stroke::new(shape.stroke_width, shape.color.to_color32());
    let points: Vec<egui::Pos2> = shape
        .vertices()
        .into_iter()
        .map(|p| to_screen(origin, view, p))
        .collect();
    match &shape.kind {
        ShapeKind::Line { .. } => {
            if let &[a, b] = points.as_slice() {
                painter.line_segment([a, b], stroke);
            }
        }
        ShapeKind::Rectangle { .. } => {
            painter.add(egui::Shape::convex_polygon(
                points,
                fill_color(shape.color, shape.opacity),
                stroke,
            ));
        }
        ShapeKind::Polygon { closed, .. } => {
            if *closed && points.len() >= 3 {
                // egui only fills convex paths; concave plans get an outline-correct,
                // approximately filled polygon.
                painter.add(egui::Shape::convex_polygon(
                    points.clone(),
                    fill_color(shape.color, shape.opacity),
                    egui::Stroke::NONE,
                ));
                painter.add(egui::Shape::closed_line(points, stroke));
            } else {
                painter.add(egui::Shape::line(points, stroke));
            }
        }
    }
    if selected {
        for v in shape.vertices() {
            draw_vertex(painter, to_screen(origin, view, v));
        }
    }
}

fn draw_handles(painter: &egui::Painter, origin: egui::Pos2, session: &Session, shape: &Shape) {
    let view = session.view();
    let Some(handle) = interaction::rotation_handle_point(
        shape,
        view.zoom,
        session.thresholds().rotation_handle_distance,
    ) else {
        return;
    };
    let center = to_screen(origin, view, shape.center());
    let handle = to_screen(origin, view, handle);
    dashed(
        painter,
        &[center, handle],
        egui::Stroke::new(1.0, ROTATION_HANDLE_COLOR),
        3.0,
    );
    painter.circle(
        handle,
        ROTATION_HANDLE_RADIUS,
        ROTATION_HANDLE_COLOR,
        egui::Stroke::new(2.0, egui::Color32::WHITE),
    );
}

fn draw_shape_labels(
    painter: &egui::Painter,
    origin: egui::Pos2,
    view: &View,
    shape: &Shape,
    scale: Option<&ScaleCalibration>,
    unit: Unit,
    show_side_lengths: bool,
) {
    let Some(scale) = scale else {
        return;
    };
    let Some(m) = calculate_measurements(shape, Some(scale), unit) else {
        return;
    };
    match &shape.kind {
        ShapeKind::Line { start, end } => {
            if let Some(length) = m.length {
                let mid = to_screen(origin, view, start.midpoint(*end));
                draw_label(painter, mid, format_measurement(length, unit, 2));
            }
        }
        ShapeKind::Rectangle { .. } | ShapeKind::Polygon { .. } => {
            if show_side_lengths {
                for (mid, length) in measurement::side_lengths(shape, scale, unit) {
                    draw_label(
                        painter,
                        to_screen(origin, view, mid),
                        format_measurement(length, unit, 2),
                    );
                }
            }
            if let Some(area) = m.area {
                let center = to_screen(origin, view, shape.center());
                draw_label(painter, center, format_area(area, unit, 2));
            }
        }
    }
}

pub(super) fn draw_calibration(painter: &egui::Painter, origin: egui::Pos2, session: &Session) {
    let view = session.view();
    let stroke = egui::Stroke::new(2.0, SCALE_LINE_COLOR);
    let lines = session
        .calibration()
        .map(|c| c.calibration_line())
        .into_iter()
        .chain(session.pending_calibration());
    for line in lines {
        let a = to_screen(origin, view, line.start);
        let b = to_screen(origin, view, line.end);
        dashed(painter, &[a, b], stroke, 5.0);
    }
}

/// Previews for the draw in progress, with live measurements when calibrated.
pub(super) fn draw_in_progress(painter: &egui::Painter, origin: egui::Pos2, session: &Session) {
    let view = session.view();
    let style = session.style();
    let stroke = egui::Stroke::new(style.stroke_width, style.color.to_color32());
    let drawing = session.drawing();

    if let Some(drag) = drawing.drag() {
        let a = to_screen(origin, view, drag.start);
        let b = to_screen(origin, view, drag.current);
        match drag.tool {
            Tool::Scale => dashed(painter, &[a, b], egui::Stroke::new(2.0, SCALE_LINE_COLOR), 5.0),
            Tool::Line => {
                dashed(painter, &[a, b], stroke, 5.0);
                if let Some(scale) = session.calibration() {
                    let len = measurement::preview_line_length(drag.start, drag.current, scale, session.unit());
                    draw_label(painter, a.lerp(b, 0.5), format_measurement(len, session.unit(), 2));
                }
            }
            Tool::Rectangle => {
                let r = egui::Rect::from_two_pos(a, b);
                painter.rect_filled(r, 0.0, fill_color(style.color, style.opacity));
                let corners = [r.left_top(), r.right_top(), r.right_bottom(), r.left_bottom(), r.left_top()];
                dashed(painter, &corners, stroke, 5.0);
                if let Some(scale) = session.calibration() {
                    let unit = session.unit();
                    let (w, h) = measurement::preview_rectangle_size(drag.start, drag.current, scale, unit);
                    draw_label(
                        painter,
                        r.center(),
                        format!(
                            "{} × {}",
                            format_measurement(w, unit, 2),
                            format_measurement(h, unit, 2)
                        ),
                    );
                }
            }
            Tool::Polygon | Tool::Select | Tool::Pan => {}
        }
    }

    let points = drawing.polygon_points();
    if points.is_empty() {
        return;
    }
    let screen: Vec<egui::Pos2> = points.iter().map(|p| to_screen(origin, view, *p)).collect();
    painter.add(egui::Shape::line(screen.clone(), stroke));
    for p in &screen {
        draw_vertex(painter, *p);
    }
    if let (Some(cursor), Some(last)) = (drawing.cursor(), screen.last()) {
        let c = to_screen(origin, view, cursor);
        dashed(painter, &[*last, c], stroke, 5.0);
        if drawing.can_close_polygon(cursor, view.zoom, session.thresholds()) {
            painter.circle_stroke(screen[0], CLOSE_HINT_RADIUS, egui::Stroke::new(2.0, SCALE_LINE_COLOR));
            painter.circle_filled(screen[0], 4.0, SCALE_LINE_COLOR);
        }
    }
}
