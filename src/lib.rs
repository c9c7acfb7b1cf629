//! # pdf2png
//!
//! Convert the pages of a PDF into numbered PNG images.
//!
//! Rendering is delegated to PDFium through `pdfium-render`. This crate adds
//! the pieces around it: input validation, file naming, alpha flattening,
//! per-page progress events, and a background worker that keeps an
//! interactive front-end responsive.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Validate  exists, .pdf extension, opens, no password, ≤ MAX_PAGES
//!  ├─ 2. Render    each page at DPI (scale = DPI / 72)
//!  ├─ 3. Flatten   composite alpha onto white
//!  ├─ 4. Write     <stem>_<NNN>.png, then fire the progress callback
//!  └─ 5. Output    written paths in page order + stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2png::{convert, default_output_dir, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let output = convert("document.pdf", default_output_dir(), &ConversionConfig::default())?;
//!     for path in &output.files {
//!         println!("{}", path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2png` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! The drag-and-drop desktop app lives in the `pdf2png-desktop` workspace
//! member.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;
pub mod worker;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    default_output_dir, ensure_output_dir, ConversionConfig, ConversionConfigBuilder, DPI,
    MAX_PAGES,
};
pub use convert::{convert, convert_async, convert_async_with, convert_with_engine};
pub use error::{ErrorCategory, Pdf2PngError};
pub use output::{ConversionOutput, ConversionStats, ProgressEvent};
pub use pipeline::render::{pdfium_loader, EngineLoader, OpenError, PdfEngine, PdfHandle, PdfiumEngine};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback, ProgressFn};
pub use stream::{convert_stream, convert_stream_with, ConversionEvent, EventStream};
pub use worker::{ConversionWorker, SubmitOutcome, WorkerMessage, POLL_INTERVAL};
