//! Background conversion worker for interactive front-ends.
//!
//! The interface thread calls [`ConversionWorker::submit`] and then drains
//! [`ConversionWorker::drain`] on a fixed [`POLL_INTERVAL`]. Each accepted
//! request runs on its own thread, which never touches interface state: it
//! only sends [`WorkerMessage`]s down a channel with a single reader.
//!
//! At most one conversion runs at a time. The busy flag is claimed with an
//! atomic compare-and-swap at submit time, so two drops arriving back to
//! back cannot both start; the second gets [`SubmitOutcome::Busy`]. The flag
//! is released just before the final message is sent, including when the
//! conversion panics, so a caller that has seen [`WorkerMessage::is_terminal`]
//! can submit again straight away.
//!
//! ## Message order
//!
//! ```text
//! Validating ─▶ Converting ─▶ Progress × n ─▶ Finished
//!      │             │              │
//!      └─────────────┴──────────────┴──────▶ Failed
//! ```

use crate::config::ConversionConfig;
use crate::convert::convert_with_engine;
use crate::error::ErrorCategory;
use crate::output::ProgressEvent;
use crate::pipeline::render::{pdfium_loader, EngineLoader};
use crate::progress::ConversionProgressCallback;
use crossbeam_channel::{Receiver, Sender};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How often the interface thread should drain the queue.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A status update sent from the conversion thread to the interface thread.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerMessage {
    /// The request was accepted; the file is being validated.
    Validating { file_name: String },
    /// Validation passed; pages are about to be rendered.
    Converting { total_pages: usize },
    /// A page was written.
    Progress(ProgressEvent),
    /// Every page was written.
    Finished {
        output_dir: PathBuf,
        files: Vec<PathBuf>,
    },
    /// The request failed; `message` is ready to show to the user.
    Failed {
        category: ErrorCategory,
        message: String,
    },
}

impl WorkerMessage {
    /// Whether this is the last message of a request.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkerMessage::Finished { .. } | WorkerMessage::Failed { .. }
        )
    }
}

/// What happened to a submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A conversion thread now owns the request.
    Accepted,
    /// Another conversion is running; the request was dropped.
    Busy,
}

/// Runs one conversion at a time on a background thread.
pub struct ConversionWorker {
    output_dir: PathBuf,
    config: ConversionConfig,
    loader: EngineLoader,
    busy: Arc<AtomicBool>,
    tx: Sender<WorkerMessage>,
    rx: Receiver<WorkerMessage>,
}

impl ConversionWorker {
    /// Worker converting into `output_dir` with the default configuration
    /// and a PDFium engine.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self::with_loader(output_dir, ConversionConfig::default(), pdfium_loader())
    }

    /// Worker with an explicit configuration and engine loader.
    ///
    /// Any progress callback in `config` is replaced by the worker's queue.
    pub fn with_loader(
        output_dir: impl Into<PathBuf>,
        config: ConversionConfig,
        loader: EngineLoader,
    ) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            output_dir: output_dir.into(),
            config,
            loader,
            busy: Arc::new(AtomicBool::new(false)),
            tx,
            rx,
        }
    }

    /// Directory the PNGs are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Whether a conversion is currently running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Start converting `input` unless a conversion is already running.
    ///
    /// On acceptance a [`WorkerMessage::Validating`] is queued before this
    /// returns.
    pub fn submit(&self, input: impl Into<PathBuf>) -> SubmitOutcome {
        let input = input.into();
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Busy; ignoring {}", input.display());
            return SubmitOutcome::Busy;
        }
        let guard = BusyGuard(Arc::clone(&self.busy));

        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.display().to_string());
        info!("Accepted {}", input.display());
        let _ = self.tx.send(WorkerMessage::Validating { file_name });

        let request = Request {
            input,
            output_dir: self.output_dir.clone(),
            config: self.config.clone(),
            loader: Arc::clone(&self.loader),
            tx: self.tx.clone(),
        };

        let spawned = thread::Builder::new()
            .name("pdf2png-worker".into())
            .spawn(move || request.run(guard));

        // On spawn failure the closure, and with it the guard, is dropped.
        if let Err(e) = spawned {
            warn!("Could not spawn conversion thread: {}", e);
            let _ = self.tx.send(WorkerMessage::Failed {
                category: ErrorCategory::Conversion,
                message: format!("Could not start the conversion thread: {e}"),
            });
        }

        SubmitOutcome::Accepted
    }

    /// Take every queued message without blocking.
    pub fn drain(&self) -> Vec<WorkerMessage> {
        self.rx.try_iter().collect()
    }

    /// Wait up to `timeout` for the next message.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<WorkerMessage> {
        self.rx.recv_timeout(timeout).ok()
    }
}

/// Clears the busy flag when dropped, whether the thread finishes or unwinds.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct Request {
    input: PathBuf,
    output_dir: PathBuf,
    config: ConversionConfig,
    loader: EngineLoader,
    tx: Sender<WorkerMessage>,
}

impl Request {
    fn run(self, guard: BusyGuard) {
        let config = ConversionConfig {
            progress_callback: Some(Arc::new(QueueCallback {
                tx: self.tx.clone(),
            })),
            ..self.config
        };
        let loader = self.loader;
        let input = self.input;
        let output_dir = self.output_dir;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let engine = loader()?;
            convert_with_engine(engine.as_ref(), &input, &output_dir, &config)
        }));

        let message = match outcome {
            Ok(Ok(output)) => WorkerMessage::Finished {
                output_dir,
                files: output.files,
            },
            Ok(Err(e)) => {
                warn!("Conversion of {} failed: {}", input.display(), e);
                WorkerMessage::Failed {
                    category: e.category(),
                    message: e.to_string(),
                }
            }
            Err(payload) => {
                let detail = panic_message(payload.as_ref());
                warn!("Conversion of {} panicked: {}", input.display(), detail);
                WorkerMessage::Failed {
                    category: ErrorCategory::Conversion,
                    message: format!("Unexpected error: {detail}"),
                }
            }
        };
        drop(guard);
        let _ = self.tx.send(message);
    }
}

/// Forwards converter events into the worker's queue.
struct QueueCallback {
    tx: Sender<WorkerMessage>,
}

impl ConversionProgressCallback for QueueCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = self.tx.send(WorkerMessage::Converting { total_pages });
    }

    fn on_page_complete(&self, event: &ProgressEvent) {
        let _ = self.tx.send(WorkerMessage::Progress(event.clone()));
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
