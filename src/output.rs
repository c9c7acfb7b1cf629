//! Result and event types produced by a conversion.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Emitted after each page's PNG has been written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// 1-indexed page number.
    pub page: usize,
    /// Total pages in the document.
    pub total_pages: usize,
    /// File name of the PNG just written, e.g. `report_003.png`.
    pub file_name: String,
    /// Full path of the PNG just written.
    pub path: PathBuf,
}

impl ProgressEvent {
    /// Completion in percent, `0.0..=100.0`.
    pub fn percent(&self) -> f32 {
        if self.total_pages == 0 {
            return 100.0;
        }
        self.page as f32 / self.total_pages as f32 * 100.0
    }
}

/// The complete result of converting one PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Written PNG paths, in page order.
    pub files: Vec<PathBuf>,
    /// Timing and size statistics.
    pub stats: ConversionStats,
}

/// Statistics for a finished conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the source document.
    pub total_pages: usize,
    /// Resolution the pages were rendered at.
    pub dpi: u32,
    /// Wall-clock time for the whole call, validation included.
    pub total_duration_ms: u64,
    /// Time spent inside the PDF renderer.
    pub render_duration_ms: u64,
    /// Time spent flattening, encoding and writing PNGs.
    pub write_duration_ms: u64,
}
