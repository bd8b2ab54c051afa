use eframe::egui;
use std::path::{Path, PathBuf};

use takeoff::model::{Rgba, ShapeAttributes};
use takeoff::settings::{self, Settings};
use takeoff::{Session, Unit};

mod document;
mod render;
mod update;

use document::LoadedDocument;

/// Draft of the selected shape's attributes while a slider is being dragged,
/// so that one drag becomes one history entry.
#[derive(Clone, Copy, Debug, PartialEq)]
struct AttributeDraft {
    id: u64,
    color: Rgba,
    opacity: f32,
    stroke_width: f32,
}

impl AttributeDraft {
    fn to_attributes(self) -> ShapeAttributes {
        ShapeAttributes {
            color: Some(self.color),
            opacity: Some(self.opacity),
            stroke_width: Some(self.stroke_width),
        }
    }
}

struct ScaleDialog {
    input: String,
    unit: Unit,
    error: Option<String>,
}

pub struct MeasureApp {
    session: Session,
    settings: Settings,
    settings_path: PathBuf,
    texture: Option<egui::TextureHandle>,
    document_name: Option<String>,
    /// Decoded but not yet shown; fitted once the canvas size is known.
    pending_document: Option<LoadedDocument>,
    scale_dialog: Option<ScaleDialog>,
    attribute_draft: Option<AttributeDraft>,
    label_draft: Option<(u64, String)>,
    last_hover: Option<egui::Pos2>,
    status: Option<String>,
}

impl MeasureApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, open: Option<PathBuf>) -> Self {
        let settings_path = settings::config_path().unwrap_or_else(|| PathBuf::from("settings.toml"));
        let settings = settings::load_or_default();
        let session = Session::new(&settings);

        let mut app = Self {
            session,
            settings,
            settings_path,
            texture: None,
            document_name: None,
            pending_document: None,
            scale_dialog: None,
            attribute_draft: None,
            label_draft: None,
            last_hover: None,
            status: None,
        };
        if let Some(path) = open {
            app.open_path(&path);
        }
        app
    }

    fn persist_settings(&mut self) {
        let style = self.session.style();
        self.settings.default_color = style.color.to_hex();
        self.settings.default_opacity = style.opacity;
        self.settings.default_stroke_width = style.stroke_width;
        self.settings.default_unit = self.session.unit();
        if let Err(e) = settings::save_settings(&self.settings_path, &self.settings) {
            log::warn!("could not save settings: {e}");
            self.status = Some(format!("Settings not saved: {e}"));
        }
    }

    fn open_dialog(&mut self) {
        if let Some(path) = document::pick_document() {
            self.open_path(&path);
        }
    }

    fn open_path(&mut self, path: &Path) {
        match document::load_document(path) {
            Ok(doc) => {
                self.status = Some(format!("Opened {}", doc.name));
                self.pending_document = Some(doc);
            }
            Err(e) => {
                log::warn!("{}: {e}", path.display());
                self.status = Some(e.to_string());
            }
        }
    }

    /// Swaps in a pending document once the canvas size is known.
    fn install_pending_document(&mut self, ctx: &egui::Context, canvas: egui::Rect) {
        let Some(doc) = self.pending_document.take() else {
            return;
        };
        self.session.load_document(
            doc.width(),
            doc.height(),
            canvas.width() as f64,
            canvas.height() as f64,
        );
        self.texture = Some(ctx.load_texture(
            doc.name.clone(),
            doc.image,
            egui::TextureOptions::LINEAR,
        ));
        self.document_name = Some(doc.name);
        self.scale_dialog = None;
        self.attribute_draft = None;
        self.label_draft = None;
    }

    fn open_scale_dialog_if_needed(&mut self) {
        if self.session.pending_calibration().is_some() && self.scale_dialog.is_none() {
            self.scale_dialog = Some(ScaleDialog {
                input: String::new(),
                unit: self.session.unit(),
                error: None,
            });
        }
    }

    fn apply_scale_dialog(&mut self) {
        let Some(dialog) = &mut self.scale_dialog else {
            return;
        };
        match self.session.apply_calibration(&dialog.input, dialog.unit) {
            Ok(()) => {
                let unit = dialog.unit;
                self.scale_dialog = None;
                self.session.set_unit(unit);
                self.status = Some("Scale set".to_string());
            }
            Err(e) => dialog.error = Some(e.to_string()),
        }
    }

    fn cancel_scale_dialog(&mut self) {
        self.session.cancel_calibration();
        self.scale_dialog = None;
    }
}
