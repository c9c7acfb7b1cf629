//! Drag-and-drop PDF → PNG converter window.
//!
//! Drop a PDF onto the window (or pass it on the command line) and every page
//! is written to `~/Pictures/PDF_PNG/<name>_<NNN>.png`.

mod app;
mod dropped;
mod state;

use anyhow::{Context, Result};
use app::ConverterApp;
use clap::Parser;
use eframe::egui;
use pdf2png::{default_output_dir, ConversionWorker};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pdf2png-desktop",
    version,
    about = "Drag-and-drop window that converts a PDF into numbered PNG images"
)]
struct Cli {
    /// PDF to convert as soon as the window opens.
    input: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2PNG_VERBOSE")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let output_dir = default_output_dir();
    info!("Writing PNGs to {}", output_dir.display());

    let app = ConverterApp::new(ConversionWorker::new(output_dir), cli.input);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([600.0, 400.0])
            .with_resizable(false)
            .with_drag_and_drop(true)
            .with_title("PDF → PNG Converter"),
        ..Default::default()
    };

    eframe::run_native(
        "pdf2png-desktop",
        native_options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("Failed to open the converter window")
}
