use eframe::egui;

use takeoff::measurement::format_measurement_display;
use takeoff::model::{Point, Tool};
use takeoff::{KeyCommand, Unit};

use super::render::{
    attribute_editor, draw_background, draw_calibration, draw_document, draw_in_progress,
    draw_shapes, style_editor, tool_button,
};
use super::{AttributeDraft, MeasureApp};

impl eframe::App for MeasureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.open_scale_dialog_if_needed();
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open... (⌘O)").clicked() {
                        self.open_dialog();
                        ui.close();
                    }
                });
                ui.menu_button("Edit", |ui| {
                    if ui
                        .add_enabled(self.session.can_undo(), egui::Button::new("Undo (⌘Z)"))
                        .clicked()
                    {
                        self.session.undo();
                        ui.close();
                    }
                    if ui
                        .add_enabled(self.session.can_redo(), egui::Button::new("Redo (⌘⇧Z)"))
                        .clicked()
                    {
                        self.session.redo();
                        ui.close();
                    }
                    ui.separator();
                    if ui
                        .add_enabled(
                            self.session.selected().is_some(),
                            egui::Button::new("Delete (Del)"),
                        )
                        .clicked()
                    {
                        self.session.delete_selected();
                        ui.close();
                    }
                });
                ui.separator();
                if let Some(name) = &self.document_name {
                    ui.label(name);
                }
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match &self.status {
                    Some(status) => ui.label(status),
                    None => ui.label("Ready"),
                };
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("Zoom: {:.0}%", self.session.view().zoom * 100.0));
                    ui.separator();
                    ui.label(format!("Shapes: {}", self.session.shapes().len()));
                    ui.separator();
                    ui.label(self.session.gesture().label());
                });
            });
        });

        egui::SidePanel::left("toolbar")
            .resizable(false)
            .default_width(170.0)
            .show(ctx, |ui| self.toolbar(ui));

        egui::SidePanel::right("right_panel")
            .resizable(true)
            .min_width(220.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.shape_panel(ui));
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.canvas(ctx, ui));

        self.scale_dialog_window(ctx);
    }
}

impl MeasureApp {
    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() || self.scale_dialog.is_some() {
            return;
        }
        let mut commands = Vec::new();
        let mut open = false;
        ctx.input_mut(|i| {
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::O) {
                open = true;
            }
            if i.consume_key(egui::Modifiers::COMMAND | egui::Modifiers::SHIFT, egui::Key::Z)
                || i.consume_key(egui::Modifiers::COMMAND, egui::Key::Y)
            {
                commands.push(KeyCommand::Redo);
            } else if i.consume_key(egui::Modifiers::COMMAND, egui::Key::Z) {
                commands.push(KeyCommand::Undo);
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::Delete)
                || i.consume_key(egui::Modifiers::NONE, egui::Key::Backspace)
            {
                commands.push(KeyCommand::Delete);
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::Escape) {
                commands.push(KeyCommand::Cancel);
            }
            let tool_keys = [
                (egui::Key::V, 'v'),
                (egui::Key::S, 's'),
                (egui::Key::L, 'l'),
                (egui::Key::R, 'r'),
                (egui::Key::P, 'p'),
                (egui::Key::H, 'h'),
            ];
            for (key, c) in tool_keys {
                if i.consume_key(egui::Modifiers::NONE, key) {
                    commands.extend(KeyCommand::from_char(c));
                }
            }
        });
        if open {
            self.open_dialog();
        }
        for command in commands {
            self.session.handle_key(command);
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tools");
        for tool in Tool::ALL {
            if tool_button(ui, tool, &mut self.session) && tool == Tool::Scale {
                self.status = Some("Click and drag along a known distance".to_string());
            }
        }
        ui.separator();

        ui.label("Units");
        let mut unit = self.session.unit();
        egui::ComboBox::from_id_salt("unit")
            .selected_text(unit.name())
            .show_ui(ui, |ui| {
                for u in Unit::ALL {
                    ui.selectable_value(&mut unit, u, u.name());
                }
            });
        if unit != self.session.unit() {
            self.session.set_unit(unit);
            self.persist_settings();
        }
        ui.separator();

        ui.label("New shapes");
        let mut style = self.session.style();
        if style_editor(ui, &mut style) {
            self.session.set_style(style);
            self.persist_settings();
        }
        ui.separator();

        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.session.can_undo(), egui::Button::new("Undo"))
                .clicked()
            {
                self.session.undo();
            }
            if ui
                .add_enabled(self.session.can_redo(), egui::Button::new("Redo"))
                .clicked()
            {
                self.session.redo();
            }
        });
        if ui
            .add_enabled(self.session.selected().is_some(), egui::Button::new("Delete"))
            .clicked()
        {
            self.session.delete_selected();
        }
        ui.separator();

        match self.session.calibration() {
            Some(scale) => {
                ui.label(format!(
                    "Scale: {:.1} px = {} {}",
                    scale.pixel_distance(),
                    scale.real_world_distance(),
                    scale.unit()
                ));
                if ui.button("Reset scale").clicked() {
                    self.session.reset_calibration();
                    self.status = Some("Scale reset".to_string());
                }
            }
            None => {
                ui.label("Scale not calibrated");
            }
        }
        if ui
            .checkbox(&mut self.settings.show_side_lengths, "Show side lengths")
            .changed()
        {
            self.persist_settings();
        }
    }

    fn shape_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Shapes");
        ui.separator();
        let rows: Vec<(u64, String, bool)> = self
            .session
            .shapes()
            .iter()
            .rev()
            .map(|s| (s.id, s.display_name(), s.visible))
            .collect();
        if rows.is_empty() {
            ui.weak("No shapes yet");
        }
        for (id, name, visible) in rows {
            ui.horizontal(|ui| {
                let mut shown = visible;
                if ui.checkbox(&mut shown, "").changed() {
                    self.session.set_visibility(id, shown);
                }
                let selected = self.session.selected() == Some(id);
                if ui.selectable_label(selected, name).clicked() {
                    self.session.select(Some(id));
                }
                if ui.small_button("🗑").clicked() {
                    self.session.delete_shape(id);
                }
            });
        }

        let Some(shape) = self.session.selected_shape().cloned() else {
            self.attribute_draft = None;
            self.label_draft = None;
            return;
        };
        ui.separator();
        ui.heading(shape.type_name());

        ui.label("Label");
        if self.label_draft.as_ref().map(|(id, _)| *id) != Some(shape.id) {
            self.label_draft = Some((shape.id, shape.label.clone().unwrap_or_default()));
        }
        let Some((_, label)) = &mut self.label_draft else {
            return;
        };
        let response = ui.text_edit_singleline(label);
        if response.lost_focus() {
            let text = label.clone();
            self.session.set_label(shape.id, &text);
        }

        ui.separator();
        ui.label("Attributes");
        let mut draft = match self.attribute_draft {
            Some(d) if d.id == shape.id => d,
            _ => AttributeDraft {
                id: shape.id,
                color: shape.color,
                opacity: shape.opacity,
                stroke_width: shape.stroke_width,
            },
        };
        if attribute_editor(ui, &mut draft.color, &mut draft.opacity, &mut draft.stroke_width) {
            self.session.set_attributes(shape.id, draft.to_attributes());
        }
        self.attribute_draft = Some(draft);

        ui.separator();
        ui.label("Measurements");
        let m = self.session.measurement(shape.id);
        for part in format_measurement_display(m.as_ref()).split(" | ") {
            ui.label(part);
        }
        if let Some(rotation) = shape.rotation() {
            ui.weak(format!("Rotation: {rotation:.1}°"));
        }
    }

    fn canvas(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        let origin = rect.min;
        self.install_pending_document(ctx, rect);

        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);
        if self.texture.is_none() {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Open an image (⌘O) to start measuring",
                egui::FontId::proportional(16.0),
                ui.visuals().weak_text_color(),
            );
        }

        if self.scale_dialog.is_none() {
            self.route_pointer(ctx, &response, origin);
        }

        let view = *self.session.view();
        if let (Some(texture), Some(size)) = (&self.texture, self.session.image_size()) {
            draw_document(&painter, origin, &view, texture, size);
        }
        draw_shapes(&painter, origin, &self.session, self.settings.show_side_lengths);
        draw_calibration(&painter, origin, &self.session);
        draw_in_progress(&painter, origin, &self.session);
    }

    fn route_pointer(&mut self, ctx: &egui::Context, response: &egui::Response, origin: egui::Pos2) {
        let local = |p: egui::Pos2| Point::from_pos2((p - origin).to_pos2());

        let scroll = ctx.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 && response.hovered() {
            // egui reports wheel-down as negative
            self.session.wheel(-scroll as f64);
        }

        let pan_modifier = ctx.input(|i| i.modifiers.ctrl)
            || response.dragged_by(egui::PointerButton::Middle);

        if response.drag_started() {
            if let Some(p) = ctx.input(|i| i.pointer.press_origin()) {
                self.session.pointer_down(local(p), pan_modifier);
            }
        }
        if response.dragged() {
            if let Some(p) = response.interact_pointer_pos() {
                self.session.pointer_move(local(p));
            }
        } else if let Some(p) = response.hover_pos() {
            if self.last_hover != Some(p) {
                self.last_hover = Some(p);
                self.session.pointer_move(local(p));
            }
        }
        if response.drag_stopped() {
            let p = response
                .interact_pointer_pos()
                .or_else(|| ctx.input(|i| i.pointer.latest_pos()));
            if let Some(p) = p {
                let hint = self.session.pointer_up(local(p));
                self.report(hint);
            }
        }
        if response.clicked() {
            if let Some(p) = response.interact_pointer_pos() {
                self.session.pointer_down(local(p), false);
                let hint = self.session.pointer_up(local(p));
                self.report(hint);
            }
        }
        if response.double_clicked() {
            self.session.double_click();
        }
    }

    fn report(&mut self, hint: Option<&'static str>) {
        if let Some(hint) = hint {
            self.status = Some(hint.to_string());
        }
    }

    fn scale_dialog_window(&mut self, ctx: &egui::Context) {
        let Some(line) = self.session.pending_calibration() else {
            self.scale_dialog = None;
            return;
        };
        let mut apply = false;
        let mut cancel = false;
        if let Some(dialog) = &mut self.scale_dialog {
            egui::Window::new("Set Scale")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.label(format!("Line length: {:.1} px", line.length()));
                    ui.horizontal(|ui| {
                        ui.label("Real distance:");
                        let r = ui.text_edit_singleline(&mut dialog.input);
                        if r.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            apply = true;
                        }
                    });
                    egui::ComboBox::from_id_salt("scale_unit")
                        .selected_text(dialog.unit.name())
                        .show_ui(ui, |ui| {
                            for u in Unit::ALL {
                                ui.selectable_value(&mut dialog.unit, u, u.name());
                            }
                        });
                    if let Some(err) = &dialog.error {
                        ui.colored_label(ui.visuals().error_fg_color, err);
                    }
                    ui.horizontal(|ui| {
                        apply |= ui.button("Apply").clicked();
                        cancel |= ui.button("Cancel").clicked();
                    });
                });
            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                cancel = true;
            }
        }
        if apply {
            self.apply_scale_dialog();
        } else if cancel {
            self.cancel_scale_dialog();
        }
    }
}
