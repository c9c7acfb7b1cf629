//! Configuration for PDF-to-PNG conversion.
//!
//! The desktop app runs with two fixed constants, [`DPI`] and [`MAX_PAGES`],
//! and one computed value, the output directory from
//! [`default_output_dir`]. Library and CLI callers may override the constants
//! through [`ConversionConfig::builder()`]; the defaults are the constants.

use crate::error::Pdf2PngError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Rendering resolution in dots per inch.
pub const DPI: u32 = 200;

/// Largest accepted page count (inclusive).
pub const MAX_PAGES: usize = 30;

/// PDF user space is defined in 72 units per inch.
pub const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Subdirectory of the user's pictures folder that receives output.
pub const OUTPUT_DIR_NAME: &str = "PDF_PNG";

/// Directory under the working directory used when the default is unusable.
pub const FALLBACK_DIR_NAME: &str = "Output";

const MIN_DPI: u32 = 72;
const MAX_DPI: u32 = 600;

/// Configuration for a PDF-to-PNG conversion.
///
/// # Example
/// ```rust
/// use pdf2png::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .dpi(300)
///     .max_pages(10)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 300);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Rendering DPI. Range: 72–600. Default: [`DPI`].
    pub dpi: u32,

    /// Maximum page count; documents with more pages are rejected.
    /// Default: [`MAX_PAGES`].
    pub max_pages: usize,

    /// Receives per-page events. See [`crate::progress`].
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            dpi: DPI,
            max_pages: MAX_PAGES,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("dpi", &self.dpi)
            .field("max_pages", &self.max_pages)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Scale factor handed to the renderer: `dpi / 72`.
    pub fn scale(&self) -> f32 {
        self.dpi as f32 / PDF_POINTS_PER_INCH
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    /// Must be within 72–600; checked by [`Self::build`].
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    /// Must be at least 1; checked by [`Self::build`].
    pub fn max_pages(mut self, n: usize) -> Self {
        self.config.max_pages = n;
        self
    }

    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2PngError> {
        let c = &self.config;
        if c.dpi < MIN_DPI || c.dpi > MAX_DPI {
            return Err(Pdf2PngError::InvalidConfig(format!(
                "DPI must be {MIN_DPI}–{MAX_DPI}, got {}",
                c.dpi
            )));
        }
        if c.max_pages == 0 {
            return Err(Pdf2PngError::InvalidConfig(
                "Page limit must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Output directory ─────────────────────────────────────────────────────

/// Default output directory: `<Pictures>/PDF_PNG`, created if missing.
///
/// Falls back to `<cwd>/Output` when the preferred directory cannot be
/// created. Never fails.
pub fn default_output_dir() -> PathBuf {
    let pictures = dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("Pictures"));

    let fallback = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(FALLBACK_DIR_NAME);

    ensure_output_dir(pictures.join(OUTPUT_DIR_NAME), fallback)
}

/// Create `preferred` (and its parents) and return it, or return `fallback`
/// if that fails for any reason.
///
/// Creating the fallback is best-effort; the converter creates the output
/// directory again before writing.
pub fn ensure_output_dir(preferred: PathBuf, fallback: PathBuf) -> PathBuf {
    match create_dir(&preferred) {
        Ok(()) => preferred,
        Err(e) => {
            warn!(
                "Cannot use output directory {}: {}; falling back to {}",
                preferred.display(),
                e,
                fallback.display()
            );
            if let Err(e) = create_dir(&fallback) {
                warn!("Cannot create {}: {}", fallback.display(), e);
            }
            fallback
        }
    }
}

fn create_dir(path: &Path) -> std::io::Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(path)?;
    debug!("Created output directory {}", path.display());
    Ok(())
}
