//! PDF engine seam and its PDFium implementation.
//!
//! The converter only needs four things from a PDF library: open a file,
//! count pages, tell whether a password is required, and rasterise one page
//! at a given scale. [`PdfEngine`] and [`PdfHandle`] capture exactly that, so
//! the pipeline can be exercised without a native library and the backend
//! can be swapped without touching validation or naming.
//!
//! ## Threading
//!
//! PDFium keeps thread-local state and its document handles borrow the
//! binding. Bind a [`PdfiumEngine`] on the thread that converts; do not move
//! documents across threads.

use crate::error::Pdf2PngError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming a pdfium library file or the directory that
/// holds it.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Why a document could not be opened.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OpenError {
    /// The document is encrypted and the empty password does not unlock it.
    #[error("document requires a password")]
    PasswordRequired,

    /// The library could not parse the file.
    #[error("{0}")]
    Unreadable(String),
}

/// A PDF backend able to open documents by path.
pub trait PdfEngine {
    /// Open `path`. The returned handle is released when dropped.
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PdfHandle + 'a>, OpenError>;
}

/// An open document.
pub trait PdfHandle {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Whether the document still needs a password to read its content.
    fn needs_password(&self) -> bool {
        false
    }

    /// Rasterise page `index` (0-based) at `scale` × its size in points.
    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, String>;
}

/// Creates an engine on the thread that will use it.
pub type EngineLoader = Arc<dyn Fn() -> Result<Box<dyn PdfEngine>, Pdf2PngError> + Send + Sync>;

/// Loader that binds a fresh [`PdfiumEngine`] on each call.
pub fn pdfium_loader() -> EngineLoader {
    Arc::new(|| PdfiumEngine::bind().map(|engine| Box::new(engine) as Box<dyn PdfEngine>))
}

// ── PDFium ───────────────────────────────────────────────────────────────

/// [`PdfEngine`] backed by the PDFium library.
pub struct PdfiumEngine {
    pdfium: Pdfium,
}

impl PdfiumEngine {
    /// Bind to a PDFium library.
    ///
    /// When `PDFIUM_LIB_PATH` is set (a library file or the directory that
    /// holds it) only that location is tried. Otherwise: the executable's
    /// directory, the working directory, then the system library path.
    pub fn bind() -> Result<Self, Pdf2PngError> {
        let bindings = match std::env::var_os(PDFIUM_LIB_PATH_ENV).map(PathBuf::from) {
            Some(path) if path.is_dir() => bind_in_dir(&path),
            Some(path) => {
                debug!("Binding PDFium from {}", path.display());
                Pdfium::bind_to_library(path.to_string_lossy().into_owned())
            }
            None => bind_in_dir(&executable_dir())
                .or_else(|_| bind_in_dir(Path::new(".")))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|e| Pdf2PngError::PdfiumBindingFailed(format!("{:?}", e)))?;

        info!("PDFium bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// The underlying binding, for callers that need PDFium directly.
    pub fn pdfium(&self) -> &Pdfium {
        &self.pdfium
    }
}

fn bind_in_dir(dir: &Path) -> Result<Box<dyn PdfiumLibraryBindings>, PdfiumError> {
    let dir = dir.to_string_lossy();
    debug!("Looking for PDFium in {}", dir);
    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&*dir))
}

fn executable_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl PdfEngine for PdfiumEngine {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn PdfHandle + 'a>, OpenError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| match e {
                PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
                    OpenError::PasswordRequired
                }
                other => OpenError::Unreadable(format!("{:?}", other)),
            })?;

        Ok(Box::new(PdfiumHandle { document }))
    }
}

struct PdfiumHandle<'a> {
    document: PdfDocument<'a>,
}

impl PdfHandle for PdfiumHandle<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, String> {
        let index = u16::try_from(index).map_err(|_| format!("page index {index} out of range"))?;
        let page = self
            .document
            .pages()
            .get(index)
            .map_err(|e| format!("{:?}", e))?;

        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| format!("{:?}", e))?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            index as usize + 1,
            image.width(),
            image.height()
        );
        Ok(image)
    }
}
