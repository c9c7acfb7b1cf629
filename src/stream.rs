//! Streaming conversion API: emit page events as they are written.
//!
//! [`crate::convert::convert_async`] resolves once all pages are on disk.
//! [`convert_stream`] instead returns immediately with a `Stream` that yields
//! a [`ConversionEvent::Started`], one [`ConversionEvent::PageWritten`] per
//! page in page order, and a final [`ConversionEvent::Completed`]. A failure
//! ends the stream with a single `Err`.

use crate::config::ConversionConfig;
use crate::convert::convert_with_engine;
use crate::error::Pdf2PngError;
use crate::output::{ConversionOutput, ProgressEvent};
use crate::pipeline::render::{pdfium_loader, EngineLoader};
use crate::progress::ConversionProgressCallback;
use crate::worker::panic_message;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::Stream;
use tracing::{info, warn};

/// One step of a streamed conversion.
#[derive(Debug, Clone)]
pub enum ConversionEvent {
    /// Validation passed.
    Started { total_pages: usize },
    /// A page was written.
    PageWritten(ProgressEvent),
    /// All pages were written.
    Completed(ConversionOutput),
}

/// A boxed stream of conversion events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<ConversionEvent, Pdf2PngError>> + Send>>;

/// Convert a PDF, streaming events as pages are written.
///
/// Must be called from within a Tokio runtime.
pub fn convert_stream(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> EventStream {
    convert_stream_with(pdfium_loader(), input, output_dir, config)
}

/// [`convert_stream`] with a caller-supplied engine loader.
pub fn convert_stream_with(
    loader: EngineLoader,
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> EventStream {
    let input = input.as_ref().to_path_buf();
    let output_dir = output_dir.as_ref().to_path_buf();
    let (tx, rx) = mpsc::unbounded_channel();

    info!("Starting streaming conversion: {}", input.display());

    let config = ConversionConfig {
        progress_callback: Some(Arc::new(StreamCallback { tx: tx.clone() })),
        ..config.clone()
    };

    // The task owns the sender; the stream ends when it returns. A panic is
    // caught here so the stream still ends with an `Err`.
    tokio::task::spawn_blocking(move || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            loader().and_then(|engine| {
                convert_with_engine(engine.as_ref(), &input, &output_dir, &config)
            })
        }));
        let result = outcome.unwrap_or_else(|payload| {
            let detail = panic_message(payload.as_ref());
            warn!("Streaming conversion of {} panicked: {}", input.display(), detail);
            Err(Pdf2PngError::Internal(format!("Unexpected error: {detail}")))
        });
        let _ = tx.send(result.map(ConversionEvent::Completed));
    });

    Box::pin(UnboundedReceiverStream::new(rx))
}

struct StreamCallback {
    tx: UnboundedSender<Result<ConversionEvent, Pdf2PngError>>,
}

impl ConversionProgressCallback for StreamCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = self.tx.send(Ok(ConversionEvent::Started { total_pages }));
    }

    fn on_page_complete(&self, event: &ProgressEvent) {
        let _ = self.tx.send(Ok(ConversionEvent::PageWritten(event.clone())));
    }
}
