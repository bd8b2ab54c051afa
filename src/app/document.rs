use eframe::egui;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
const CAD_EXTENSIONS: &[&str] = &["dwg", "dxf", "dwf"];

#[derive(Debug, thiserror::Error)]
pub(super) enum DocumentError {
    #[error("unsupported file type: {0}")]
    Unsupported(String),

    #[error("PDF documents are not supported yet")]
    PdfNotSupported,

    #[error("CAD documents are not supported yet")]
    CadNotSupported,

    #[error("could not read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not decode image: {0}")]
    Image(#[from] image::ImageError),
}

/// A decoded plan image ready to be uploaded as a texture.
pub(super) struct LoadedDocument {
    pub name: String,
    pub image: egui::ColorImage,
}

impl LoadedDocument {
    pub fn width(&self) -> f64 {
        self.image.size[0] as f64
    }

    pub fn height(&self) -> f64 {
        self.image.size[1] as f64
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

pub(super) fn load_document(path: &Path) -> Result<LoadedDocument, DocumentError> {
    let ext = extension(path);
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string();
    if ext == "pdf" {
        return Err(DocumentError::PdfNotSupported);
    }
    if CAD_EXTENSIONS.contains(&ext.as_str()) {
        return Err(DocumentError::CadNotSupported);
    }
    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Err(DocumentError::Unsupported(name));
    }

    let bytes = std::fs::read(path)?;
    let rgba = image::load_from_memory(&bytes)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
    log::info!("decoded {name}: {}x{}", size[0], size[1]);
    Ok(LoadedDocument { name, image })
}

pub(super) fn pick_document() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Images", IMAGE_EXTENSIONS)
        .add_filter("All files", &["*"])
        .pick_file()
}
