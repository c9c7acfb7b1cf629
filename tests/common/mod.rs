//! Shared fixtures: an in-memory PDF engine and a recording callback.

#![allow(dead_code)]

use crossbeam_channel::Receiver;
use image::{DynamicImage, Rgba, RgbaImage};
use pdf2png::{
    ConversionProgressCallback, EngineLoader, OpenError, PdfEngine, PdfHandle, ProgressEvent,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Letter-size page, in points.
pub const PAGE_WIDTH_PT: f32 = 8.5 * 72.0;
pub const PAGE_HEIGHT_PT: f32 = 11.0 * 72.0;

/// Points per pixel in the fake renderer; keeps test images tiny.
const FAKE_POINTS_PER_PIXEL: f32 = 72.0;

/// A `PdfEngine` that fabricates documents from its own settings.
#[derive(Clone, Default)]
pub struct FakeEngine {
    pub pages: usize,
    pub needs_password: bool,
    pub open_error: Option<OpenError>,
    /// 1-based page whose render fails.
    pub fail_on_page: Option<usize>,
    /// 1-based page whose render panics.
    pub panic_on_page: Option<usize>,
    /// Top-left pixel of every page is fully transparent.
    pub transparent: bool,
    /// Every render waits for one token from this channel.
    pub gate: Option<Receiver<()>>,
    /// Number of `open` calls.
    pub opened: Arc<AtomicUsize>,
    /// Handles currently alive.
    pub live: Arc<AtomicUsize>,
}

impl FakeEngine {
    pub fn with_pages(pages: usize) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Loader handing out clones that share this engine's counters.
    pub fn loader(&self) -> EngineLoader {
        let template = self.clone();
        Arc::new(move || Ok(Box::new(template.clone()) as Box<dyn PdfEngine>))
    }
}

impl PdfEngine for FakeEngine {
    fn open<'a>(&'a self, _path: &Path) -> Result<Box<dyn PdfHandle + 'a>, OpenError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = &self.open_error {
            return Err(e.clone());
        }
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeHandle { engine: self }))
    }
}

struct FakeHandle<'a> {
    engine: &'a FakeEngine,
}

impl Drop for FakeHandle<'_> {
    fn drop(&mut self) {
        self.engine.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl PdfHandle for FakeHandle<'_> {
    fn page_count(&self) -> usize {
        self.engine.pages
    }

    fn needs_password(&self) -> bool {
        self.engine.needs_password
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, String> {
        if let Some(gate) = &self.engine.gate {
            gate.recv().map_err(|_| "render gate closed".to_string())?;
        }
        let page_num = index + 1;
        if self.engine.panic_on_page == Some(page_num) {
            panic!("renderer crashed on page {page_num}");
        }
        if self.engine.fail_on_page == Some(page_num) {
            return Err(format!("simulated render failure on page {page_num}"));
        }

        let (width, height) = fake_page_size(scale);
        let shade = (page_num * 10 % 256) as u8;
        let mut img = RgbaImage::from_pixel(width, height, Rgba([shade, 64, 128, 255]));
        if self.engine.transparent {
            img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        }
        Ok(DynamicImage::ImageRgba8(img))
    }
}

/// Pixel size the fake renderer produces at `scale`.
pub fn fake_page_size(scale: f32) -> (u32, u32) {
    let w = (PAGE_WIDTH_PT / FAKE_POINTS_PER_PIXEL * scale).ceil() as u32;
    let h = (PAGE_HEIGHT_PT / FAKE_POINTS_PER_PIXEL * scale).ceil() as u32;
    (w, h)
}

/// Create a placeholder `.pdf` file; the fake engine never reads it.
pub fn pdf_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.7\n% placeholder\n").unwrap();
    path
}

/// Sorted names of the PNG files in `dir`; empty if `dir` does not exist.
pub fn png_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".png"))
        .collect();
    names.sort();
    names
}

/// Names of every entry in `dir`, sorted.
pub fn all_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Records every callback as a short string.
#[derive(Default)]
pub struct RecordingCallback {
    pub events: Mutex<Vec<String>>,
    pub pages: Mutex<Vec<ProgressEvent>>,
}

impl RecordingCallback {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn pages(&self) -> Vec<ProgressEvent> {
        self.pages.lock().unwrap().clone()
    }
}

impl ConversionProgressCallback for RecordingCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        self.events.lock().unwrap().push(format!("start:{total_pages}"));
    }

    fn on_page_complete(&self, event: &ProgressEvent) {
        self.events
            .lock()
            .unwrap()
            .push(format!("page:{}/{}", event.page, event.total_pages));
        self.pages.lock().unwrap().push(event.clone());
    }

    fn on_page_error(&self, page_num: usize, total_pages: usize, _error: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("error:{page_num}/{total_pages}"));
    }

    fn on_conversion_complete(&self, total_pages: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("complete:{total_pages}"));
    }
}
