//! Turning drag-and-drop payloads into a filesystem path.
//!
//! Native drops carry a path, opened exactly as given. Its bytes may be in a
//! legacy code page rather than UTF-8, which only matters for showing the
//! name. Some platforms hand over no path, just a name or a `text/uri-list`
//! line.

use eframe::egui::DroppedFile;
use encoding_rs::Encoding;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Names an `encoding_rs` label (e.g. `shift_jis`, `windows-1252`) used for
/// dropped paths whose bytes are not valid UTF-8.
pub const DROP_ENCODING_ENV: &str = "PDF2PNG_DROP_ENCODING";

/// One dropped item, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DroppedPath {
    Native(PathBuf),
    Text(String),
}

impl DroppedPath {
    pub fn from_dropped(file: &DroppedFile) -> Option<Self> {
        if let Some(path) = &file.path {
            return Some(DroppedPath::Native(path.clone()));
        }
        // `bytes` holds file contents, never a path.
        if file.name.trim().is_empty() {
            return None;
        }
        Some(DroppedPath::Text(file.name.clone()))
    }

    /// The path to open, or `None` if nothing usable remains.
    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            DroppedPath::Native(path) if path.as_os_str().is_empty() => None,
            DroppedPath::Native(path) => Some(path),
            DroppedPath::Text(text) => path_from_text(&text),
        }
    }
}

/// Human-readable form of `path`, decoding raw bytes with `legacy` when they
/// are not UTF-8.
pub fn display_name(path: &Path, legacy: &'static Encoding) -> String {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        decode_bytes(path.as_os_str().as_bytes(), legacy)
    }
    #[cfg(not(unix))]
    {
        let _ = legacy;
        path.to_string_lossy().into_owned()
    }
}

/// UTF-8 first, then `legacy`, then lossy UTF-8.
pub fn decode_bytes(bytes: &[u8], legacy: &'static Encoding) -> String {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }
    if let Some(s) = legacy.decode_without_bom_handling_and_without_replacement(bytes) {
        debug!("Decoded dropped path as {}", legacy.name());
        return s.into_owned();
    }
    String::from_utf8_lossy(bytes).into_owned()
}

/// First usable line of a text payload, minus quotes and a `file://` scheme.
fn path_from_text(text: &str) -> Option<PathBuf> {
    let line = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#'))?;
    let line = line.trim_matches('"');
    let line = line.strip_prefix("file://").unwrap_or(line);
    if line.is_empty() {
        return None;
    }
    Some(PathBuf::from(line))
}

/// The legacy code page for dropped paths: `PDF2PNG_DROP_ENCODING`, or
/// Shift_JIS.
pub fn legacy_encoding() -> &'static Encoding {
    std::env::var(DROP_ENCODING_ENV)
        .ok()
        .and_then(|label| Encoding::for_label(label.trim().as_bytes()))
        .unwrap_or(encoding_rs::SHIFT_JIS)
}

/// The first dropped item that decodes to a path. The rest are ignored.
pub fn first_path(files: &[DroppedFile]) -> Option<PathBuf> {
    if files.len() > 1 {
        debug!("{} items dropped; using the first", files.len());
    }
    files
        .iter()
        .filter_map(DroppedPath::from_dropped)
        .find_map(DroppedPath::into_path)
}
