//! What the window shows, driven by worker messages.
//!
//! ```text
//! Idle ─▶ Validating ─▶ Converting ─▶ Success ─┐
//!   ▲          │             │                 │ dismiss
//!   │          └─────────────┴──▶ Error ───────┤
//!   └──────────────────────────────────────────┘
//! ```
//!
//! Every transition except `dismiss` comes from a [`WorkerMessage`].

use pdf2png::{ErrorCategory, WorkerMessage};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Validating {
        file_name: String,
    },
    Converting {
        done: usize,
        total: usize,
        last_file: Option<String>,
    },
    Success {
        output_dir: PathBuf,
        pages: usize,
    },
    Error {
        category: ErrorCategory,
        message: String,
    },
}

/// A modal result dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub body: String,
}

#[derive(Debug)]
pub struct StatusModel {
    phase: Phase,
}

impl Default for StatusModel {
    fn default() -> Self {
        Self { phase: Phase::Idle }
    }
}

impl StatusModel {
    #[cfg(test)]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn apply(&mut self, message: WorkerMessage) {
        self.phase = match message {
            WorkerMessage::Validating { file_name } => Phase::Validating { file_name },
            WorkerMessage::Converting { total_pages } => Phase::Converting {
                done: 0,
                total: total_pages,
                last_file: None,
            },
            WorkerMessage::Progress(event) => Phase::Converting {
                done: event.page,
                total: event.total_pages,
                last_file: Some(event.file_name),
            },
            WorkerMessage::Finished { output_dir, files } => Phase::Success {
                output_dir,
                pages: files.len(),
            },
            WorkerMessage::Failed { category, message } => Phase::Error { category, message },
        };
    }

    /// Close the result dialog. No effect unless one is showing.
    pub fn dismiss(&mut self) {
        if matches!(self.phase, Phase::Success { .. } | Phase::Error { .. }) {
            self.phase = Phase::Idle;
        }
    }

    /// Whether a conversion is in flight.
    pub fn is_working(&self) -> bool {
        matches!(
            self.phase,
            Phase::Validating { .. } | Phase::Converting { .. }
        )
    }

    pub fn status_text(&self) -> String {
        match &self.phase {
            Phase::Idle => "Waiting for a PDF".to_string(),
            Phase::Validating { file_name } => format!("Validating: {file_name}…"),
            Phase::Converting {
                done,
                total,
                last_file: Some(file),
            } => format!("Converting ({done}/{total}): {file}"),
            Phase::Converting { done, total, .. } => format!("Converting ({done}/{total})…"),
            Phase::Success { .. } => "Done".to_string(),
            Phase::Error { .. } => "An error occurred".to_string(),
        }
    }

    /// Progress bar fill in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        match &self.phase {
            Phase::Converting { done, total, .. } if *total > 0 => *done as f32 / *total as f32,
            Phase::Success { .. } => 1.0,
            _ => 0.0,
        }
    }

    pub fn dialog(&self) -> Option<Dialog> {
        match &self.phase {
            Phase::Success { output_dir, pages } => Some(Dialog {
                title: "Success".to_string(),
                body: format!(
                    "Finished! {pages} page(s) written.\nOutput: {}",
                    output_dir.display()
                ),
            }),
            Phase::Error { category, message } => Some(Dialog {
                title: category.to_string(),
                body: message.clone(),
            }),
            _ => None,
        }
    }
}
