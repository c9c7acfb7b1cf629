//! Conversion entry points.
//!
//! [`convert`] is the primary API: validate a PDF, then render every page to
//! `<output_dir>/<stem>_<NNN>.png`, firing the configured progress callback
//! after each page is written. It blocks; call [`convert_async`] from async
//! code so PDFium runs on Tokio's blocking pool instead of a worker thread.

use crate::config::ConversionConfig;
use crate::error::Pdf2PngError;
use crate::output::{ConversionOutput, ConversionStats, ProgressEvent};
use crate::pipeline::render::{pdfium_loader, EngineLoader, PdfEngine, PdfHandle, PdfiumEngine};
use crate::pipeline::{encode, naming, validate};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert every page of a PDF into a PNG.
///
/// # Arguments
/// * `input`      : path to a `.pdf` file
/// * `output_dir` : directory receiving the PNGs; created if missing
/// * `config`     : DPI, page limit and optional progress callback
///
/// # Returns
/// The written paths in page order. A 0-page document yields an empty list.
///
/// # Errors
/// Validation errors ([`Pdf2PngError::FileNotFound`],
/// [`Pdf2PngError::InvalidFormat`], [`Pdf2PngError::Unreadable`],
/// [`Pdf2PngError::Encrypted`], [`Pdf2PngError::TooManyPages`]) are returned
/// before anything is written. A page failure aborts with
/// [`Pdf2PngError::ConversionFailed`]; pages written before it stay on disk.
pub fn convert(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PngError> {
    let engine = PdfiumEngine::bind()?;
    convert_with_engine(&engine, input, output_dir, config)
}

/// [`convert`] with a caller-supplied PDF engine.
pub fn convert_with_engine(
    engine: &dyn PdfEngine,
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PngError> {
    let total_start = Instant::now();
    let input = input.as_ref();
    let output_dir = output_dir.as_ref();
    info!("Starting conversion: {}", input.display());

    // ── Step 1: Validate ─────────────────────────────────────────────────
    let document = validate::validate(engine, input, config)?;
    let total_pages = document.page_count();

    // ── Step 2: Prepare output ───────────────────────────────────────────
    let base = naming::base_name(input);
    std::fs::create_dir_all(output_dir).map_err(|e| Pdf2PngError::OutputDirFailed {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let callback = config.progress_callback.as_deref();
    if let Some(cb) = callback {
        cb.on_conversion_start(total_pages);
    }

    // ── Step 3: Render and write each page ───────────────────────────────
    let scale = config.scale();
    let mut files = Vec::with_capacity(total_pages);
    let mut render_duration_ms = 0;
    let mut write_duration_ms = 0;

    for index in 0..total_pages {
        let page_num = index + 1;
        let file_name = naming::page_file_name(&base, page_num);
        let path = output_dir.join(&file_name);

        let (render_ms, write_ms) =
            match render_and_write(document.handle(), index, scale, &path) {
                Ok(timings) => timings,
                Err(detail) => {
                    warn!("Page {}/{} failed: {}", page_num, total_pages, detail);
                    if let Some(cb) = callback {
                        cb.on_page_error(page_num, total_pages, &detail);
                    }
                    return Err(Pdf2PngError::ConversionFailed {
                        page: page_num,
                        detail,
                    });
                }
            };
        render_duration_ms += render_ms;
        write_duration_ms += write_ms;

        debug!("Page {}/{} → {}", page_num, total_pages, file_name);
        files.push(path.clone());

        if let Some(cb) = callback {
            cb.on_page_complete(&ProgressEvent {
                page: page_num,
                total_pages,
                file_name,
                path,
            });
        }
    }

    drop(document);

    if let Some(cb) = callback {
        cb.on_conversion_complete(total_pages);
    }

    let stats = ConversionStats {
        total_pages,
        dpi: config.dpi,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        render_duration_ms,
        write_duration_ms,
    };

    info!(
        "Conversion complete: {} pages → {}, {}ms total",
        total_pages,
        output_dir.display(),
        stats.total_duration_ms
    );

    Ok(ConversionOutput { files, stats })
}

/// Async wrapper around [`convert`].
///
/// PDFium is CPU-bound and not async-safe, so the work runs inside
/// `spawn_blocking`.
pub async fn convert_async(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PngError> {
    convert_async_with(pdfium_loader(), input, output_dir, config).await
}

/// [`convert_async`] with a caller-supplied engine loader.
///
/// The loader runs on the blocking thread, so engines need not be `Send`.
pub async fn convert_async_with(
    loader: EngineLoader,
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PngError> {
    let input = input.as_ref().to_path_buf();
    let output_dir = output_dir.as_ref().to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || {
        let engine = loader()?;
        convert_with_engine(engine.as_ref(), &input, &output_dir, &config)
    })
    .await
    .map_err(|e| Pdf2PngError::Internal(format!("Conversion task panicked: {}", e)))?
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Render page `index`, flatten it and write it to `path`.
///
/// Returns the time spent rendering and writing, in milliseconds.
fn render_and_write(
    handle: &dyn PdfHandle,
    index: usize,
    scale: f32,
    path: &Path,
) -> Result<(u64, u64), String> {
    let render_start = Instant::now();
    let image = handle.render_page(index, scale)?;
    let render_ms = render_start.elapsed().as_millis() as u64;

    let write_start = Instant::now();
    let flat = encode::flatten(image);
    encode::write_png(&flat, path).map_err(|e| e.to_string())?;
    let write_ms = write_start.elapsed().as_millis() as u64;

    Ok((render_ms, write_ms))
}
