//! Pipeline stages for PDF-to-PNG conversion.
//!
//! Each submodule implements exactly one step, which keeps each independently
//! testable and lets the rendering backend change without touching the rest.
//!
//! ## Data Flow
//!
//! ```text
//! validate ──▶ render ──▶ encode
//! (checks)     (pdfium)   (flatten + PNG)
//!                  naming ──┘
//! ```
//!
//! 1. [`validate`]: existence, extension, open, password and page-limit
//!    checks; yields the open document
//! 2. [`render`]:   the [`render::PdfEngine`] seam and its PDFium backend
//! 3. [`naming`]:   sanitised base name and `<base>_<NNN>.png` file names
//! 4. [`encode`]:   composite alpha onto white and write the PNG atomically

pub mod encode;
pub mod naming;
pub mod render;
pub mod validate;
