//! Progress-callback trait for per-page conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the converter writes each page.
//!
//! Events are delivered synchronously on the converting thread, in page
//! order, exactly once per written page. A slow callback slows the
//! conversion down; forward to a channel if the consumer lives elsewhere
//! (the [`crate::worker`] does exactly that).
//!
//! # Example
//!
//! ```rust
//! use pdf2png::{ConversionConfig, ProgressEvent, ProgressFn};
//! use std::sync::Arc;
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(ProgressFn(|event: &ProgressEvent| {
//!         eprintln!("{}/{} {}", event.page, event.total_pages, event.file_name);
//!     })))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::ProgressEvent;
use std::sync::Arc;

/// Called by the converter as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after validation, before the first page is rendered.
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after a page's PNG has been written.
    fn on_page_complete(&self, event: &ProgressEvent) {
        let _ = event;
    }

    /// Called when a page fails; the conversion aborts right after.
    ///
    /// # Arguments
    /// * `page_num`    : 1-indexed page number
    /// * `total_pages` : total pages in the document
    /// * `error`       : human-readable error description
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once after every page has been written.
    fn on_conversion_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Adapts a plain closure into a callback that only sees page completions.
pub struct ProgressFn<F>(pub F);

impl<F> ConversionProgressCallback for ProgressFn<F>
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn on_page_complete(&self, event: &ProgressEvent) {
        (self.0)(event)
    }
}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
