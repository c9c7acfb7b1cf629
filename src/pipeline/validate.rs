//! Input validation: reject a file before any page is rendered.
//!
//! Checks run cheapest first so that a wrong path or extension never touches
//! the PDF library:
//!
//! 1. the path exists,
//! 2. the extension is `pdf` (any case),
//! 3. the engine can open it,
//! 4. it does not need a password,
//! 5. its page count is within the limit (inclusive).
//!
//! A handle opened in step 3 is dropped before a step-4 or step-5 error is
//! returned.

use crate::config::ConversionConfig;
use crate::error::Pdf2PngError;
use crate::pipeline::render::{OpenError, PdfEngine, PdfHandle};
use std::path::Path;
use tracing::{debug, info};

/// An open document that passed validation.
pub struct ValidatedDocument<'a> {
    handle: Box<dyn PdfHandle + 'a>,
    page_count: usize,
}

impl<'a> ValidatedDocument<'a> {
    /// Pages in the document, at most the configured limit.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// The open document.
    pub fn handle(&self) -> &(dyn PdfHandle + 'a) {
        self.handle.as_ref()
    }
}

/// Whether `path` carries a `.pdf` extension, ignoring ASCII case.
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Validate `path` and return the open document.
pub fn validate<'a>(
    engine: &'a dyn PdfEngine,
    path: &Path,
    config: &ConversionConfig,
) -> Result<ValidatedDocument<'a>, Pdf2PngError> {
    if !path.exists() {
        return Err(Pdf2PngError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    if !has_pdf_extension(path) {
        return Err(Pdf2PngError::InvalidFormat {
            path: path.to_path_buf(),
        });
    }

    let handle = engine.open(path).map_err(|e| match e {
        OpenError::PasswordRequired => Pdf2PngError::Encrypted {
            path: path.to_path_buf(),
        },
        OpenError::Unreadable(detail) => Pdf2PngError::Unreadable {
            path: path.to_path_buf(),
            detail,
        },
    })?;

    if handle.needs_password() {
        drop(handle);
        return Err(Pdf2PngError::Encrypted {
            path: path.to_path_buf(),
        });
    }

    let page_count = handle.page_count();
    if page_count > config.max_pages {
        drop(handle);
        return Err(Pdf2PngError::TooManyPages {
            count: page_count,
            limit: config.max_pages,
        });
    }

    debug!("Validated {} ({} pages)", path.display(), page_count);
    info!("PDF loaded: {} pages", page_count);

    Ok(ValidatedDocument { handle, page_count })
}
