//! Output file naming.
//!
//! Pages are written as `<stem>_<NNN>.png` where `<stem>` is the input file
//! stem with every character that Windows forbids in file names replaced by
//! `_`, and `NNN` is the 1-based page number padded to three digits.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Characters replaced by [`sanitize_stem`].
pub const FORBIDDEN_CHARS: &str = r#"<>:"/\|?*"#;

static RE_FORBIDDEN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).unwrap());

/// Replace each of `< > : " / \ | ? *` with `_`.
pub fn sanitize_stem(stem: &str) -> String {
    RE_FORBIDDEN.replace_all(stem, "_").into_owned()
}

/// Sanitised base name for the pages of `input`: its file stem with the
/// extension stripped.
pub fn base_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    sanitize_stem(&stem)
}

/// File name of page `page_num` (1-based).
pub fn page_file_name(base: &str, page_num: usize) -> String {
    format!("{base}_{page_num:03}.png")
}
