//! Converter behaviour against the in-memory engine.
//!
//! These tests need no PDFium library; see `tests/pdfium.rs` for the
//! end-to-end checks against real documents.

mod common;

use common::{all_names, fake_page_size, pdf_file, png_names, FakeEngine, RecordingCallback};
use pdf2png::{
    convert_with_engine, ConversionConfig, ErrorCategory, OpenError, Pdf2PngError, MAX_PAGES,
};
use std::sync::Arc;

fn recording_config() -> (ConversionConfig, Arc<RecordingCallback>) {
    let recorder = Arc::new(RecordingCallback::default());
    let config = ConversionConfig::builder()
        .progress_callback(recorder.clone())
        .build()
        .expect("default config is valid");
    (config, recorder)
}

// ── Happy path ───────────────────────────────────────────────────────────────

#[test]
fn converts_every_page_to_a_numbered_png() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = pdf_file(tmp.path(), "report.pdf");
    let out = tmp.path().join("out");
    let engine = FakeEngine::with_pages(3);
    let (config, recorder) = recording_config();

    let output = convert_with_engine(&engine, &pdf, &out, &config).expect("conversion");

    assert_eq!(
        png_names(&out),
        ["report_001.png", "report_002.png", "report_003.png"]
    );
    assert_eq!(output.files.len(), 3);
    for (i, path) in output.files.iter().enumerate() {
        assert_eq!(path, &out.join(format!("report_{:03}.png", i + 1)));
        assert!(path.is_file());
    }
    assert_eq!(output.stats.total_pages, 3);
    assert_eq!(output.stats.dpi, 200);

    assert_eq!(
        recorder.events(),
        ["start:3", "page:1/3", "page:2/3", "page:3/3", "complete:3"]
    );
    let pages = recorder.pages();
    assert_eq!(pages[1].file_name, "report_002.png");
    assert_eq!(pages[1].path, out.join("report_002.png"));
    assert_eq!(engine.live(), 0, "document handle must be released");
}

#[test]
fn progress_fires_after_the_file_is_on_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = pdf_file(tmp.path(), "doc.pdf");
    let out = tmp.path().join("out");
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = seen.clone();
    let config = ConversionConfig::builder()
        .progress_callback(Arc::new(pdf2png::ProgressFn(move |e: &pdf2png::ProgressEvent| {
            sink.lock().unwrap().push(e.path.is_file());
        })))
        .build()
        .unwrap();

    convert_with_engine(&FakeEngine::with_pages(4), &pdf, &out, &config).unwrap();

    assert_eq!(*seen.lock().unwrap(), [true, true, true, true]);
}

#[test]
fn page_limit_is_inclusive() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = pdf_file(tmp.path(), "limit.pdf");
    let out = tmp.path().join("out");

    let output = convert_with_engine(
        &FakeEngine::with_pages(MAX_PAGES),
        &pdf,
        &out,
        &ConversionConfig::default(),
    )
    .expect("exactly MAX_PAGES is accepted");

    assert_eq!(output.files.len(), MAX_PAGES);
    assert_eq!(png_names(&out).last().unwrap(), "limit_030.png");
}

#[test]
fn zero_page_document_succeeds_with_no_files() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = pdf_file(tmp.path(), "empty.pdf");
    let out = tmp.path().join("out");
    let (config, recorder) = recording_config();

    let output = convert_with_engine(&FakeEngine::with_pages(0), &pdf, &out, &config).unwrap();

    assert!(output.files.is_empty());
    assert!(png_names(&out).is_empty());
    assert!(recorder.pages().is_empty());
}

#[test]
fn uppercase_extension_is_accepted() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = pdf_file(tmp.path(), "SCAN.PDF");
    let out = tmp.path().join("out");

    let output =
        convert_with_engine(&FakeEngine::with_pages(1), &pdf, &out, &ConversionConfig::default())
            .unwrap();

    assert_eq!(png_names(&out), ["SCAN_001.png"]);
    assert_eq!(output.files.len(), 1);
}

#[test]
fn missing_output_directory_is_created() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = pdf_file(tmp.path(), "doc.pdf");
    let out = tmp.path().join("a").join("b").join("c");

    convert_with_engine(&FakeEngine::with_pages(1), &pdf, &out, &ConversionConfig::default())
        .unwrap();

    assert_eq!(png_names(&out), ["doc_001.png"]);
}

#[cfg(unix)]
#[test]
fn forbidden_characters_are_replaced_in_output_names() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = pdf_file(tmp.path(), "a<b>c:d\"e\\f|g?h*i.pdf");
    let out = tmp.path().join("out");

    convert_with_engine(&FakeEngine::with_pages(2), &pdf, &out, &ConversionConfig::default())
        .unwrap();

    assert_eq!(
        png_names(&out),
        ["a_b_c_d_e_f_g_h_i_001.png", "a_b_c_d_e_f_g_h_i_002.png"]
    );
}

#[test]
fn transparent_pixels_are_flattened_onto_white() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = pdf_file(tmp.path(), "alpha.pdf");
    let out = tmp.path().join("out");
    let engine = FakeEngine {
        transparent: true,
        ..FakeEngine::with_pages(1)
    };

    let output =
        convert_with_engine(&engine, &pdf, &out, &ConversionConfig::default()).unwrap();

    let img = image::open(&output.files[0]).unwrap();
    assert_eq!(img.color(), image::ColorType::Rgb8);
    let rgb = img.to_rgb8();
    assert_eq!(rgb.get_pixel(0, 0).0, [255, 255, 255]);
    assert_eq!(rgb.get_pixel(1, 1).0, [10, 64, 128]);
}

#[test]
fn image_size_follows_dpi() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = pdf_file(tmp.path(), "doc.pdf");

    for dpi in [72, 200, 300] {
        let out = tmp.path().join(format!("out{dpi}"));
        let config = ConversionConfig::builder().dpi(dpi).build().unwrap();
        let output =
            convert_with_engine(&FakeEngine::with_pages(1), &pdf, &out, &config).unwrap();

        let img = image::open(&output.files[0]).unwrap();
        let expected = fake_page_size(config.scale());
        assert_eq!((img.width(), img.height()), expected, "dpi {dpi}");
        assert_eq!(output.stats.dpi, dpi);
    }
}

#[test]
fn converting_twice_overwrites_with_identical_files() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = pdf_file(tmp.path(), "same.pdf");
    let out = tmp.path().join("out");
    let engine = FakeEngine::with_pages(2);

    let first = convert_with_engine(&engine, &pdf, &out, &ConversionConfig::default()).unwrap();
    let bytes: Vec<Vec<u8>> = first
        .files
        .iter()
        .map(|p| std::fs::read(p).unwrap())
        .collect();

    let second = convert_with_engine(&engine, &pdf, &out, &ConversionConfig::default()).unwrap();

    assert_eq!(first.files, second.files);
    assert_eq!(all_names(&out), ["same_001.png", "same_002.png"]);
    for (path, before) in second.files.iter().zip(bytes) {
        assert_eq!(std::fs::read(path).unwrap(), before);
    }
}

// ── Validation ───────────────────────────────────────────────────────────────

#[test]
fn one_page_over_the_limit_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = pdf_file(tmp.path(), "long.pdf");
    let out = tmp.path().join("out");
    let engine = FakeEngine::with_pages(MAX_PAGES + 1);
    let (config, recorder) = recording_config();

    let err = convert_with_engine(&engine, &pdf, &out, &config).unwrap_err();

    match &err {
        Pdf2PngError::TooManyPages { count, limit } => {
            assert_eq!(*count, 31);
            assert_eq!(*limit, 30);
        }
        other => panic!("expected TooManyPages, got {other:?}"),
    }
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert!(err.to_string().contains("Max: 30, Actual: 31"));
    assert!(!out.exists(), "output directory must not be created");
    assert!(recorder.events().is_empty());
    assert_eq!(engine.live(), 0);
}

#[test]
fn custom_page_limit_is_enforced() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = pdf_file(tmp.path(), "doc.pdf");
    let config = ConversionConfig::builder().max_pages(2).build().unwrap();

    let err = convert_with_engine(&FakeEngine::with_pages(3), &pdf, tmp.path(), &config)
        .unwrap_err();

    assert!(matches!(
        err,
        Pdf2PngError::TooManyPages { count: 3, limit: 2 }
    ));
}

#[test]
fn missing_file_is_rejected_without_opening() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = FakeEngine::with_pages(1);

    let err = convert_with_engine(
        &engine,
        tmp.path().join("nope.pdf"),
        tmp.path().join("out"),
        &ConversionConfig::default(),
    )
    .unwrap_err();

    assert!(matches!(err, Pdf2PngError::FileNotFound { .. }), "{err:?}");
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert_eq!(engine.opened(), 0);
}

#[test]
fn non_pdf_extension_is_rejected_without_opening() {
    let tmp = tempfile::tempdir().unwrap();
    let txt = tmp.path().join("notes.txt");
    std::fs::write(&txt, b"%PDF-1.7 but named wrong").unwrap();
    let engine = FakeEngine::with_pages(1);

    let err = convert_with_engine(&engine, &txt, tmp.path().join("out"), &ConversionConfig::default())
        .unwrap_err();

    assert!(matches!(err, Pdf2PngError::InvalidFormat { .. }), "{err:?}");
    assert_eq!(engine.opened(), 0);
    assert!(!tmp.path().join("out").exists());
}

#[test]
fn unreadable_document_reports_details() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = pdf_file(tmp.path(), "broken.pdf");
    let engine = FakeEngine {
        open_error: Some(OpenError::Unreadable("FormatError".into())),
        ..FakeEngine::with_pages(1)
    };

    let err = convert_with_engine(&engine, &pdf, tmp.path().join("out"), &ConversionConfig::default())
        .unwrap_err();

    assert!(matches!(err, Pdf2PngError::Unreadable { .. }), "{err:?}");
    let msg = err.to_string();
    assert!(msg.contains("may be corrupted"), "got: {msg}");
    assert!(msg.contains("FormatError"), "got: {msg}");
}

#[test]
fn password_error_on_open_is_encrypted() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = pdf_file(tmp.path(), "locked.pdf");
    let engine = FakeEngine {
        open_error: Some(OpenError::PasswordRequired),
        ..FakeEngine::with_pages(1)
    };

    let err = convert_with_engine(&engine, &pdf, tmp.path().join("out"), &ConversionConfig::default())
        .unwrap_err();

    assert!(matches!(err, Pdf2PngError::Encrypted { .. }), "{err:?}");
    assert!(err.to_string().contains("Password protected PDFs are not supported."));
}

#[test]
fn encrypted_document_is_released_before_returning() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = pdf_file(tmp.path(), "locked.pdf");
    let out = tmp.path().join("out");
    let engine = FakeEngine {
        needs_password: true,
        ..FakeEngine::with_pages(2)
    };

    let err = convert_with_engine(&engine, &pdf, &out, &ConversionConfig::default()).unwrap_err();

    assert!(matches!(err, Pdf2PngError::Encrypted { .. }), "{err:?}");
    assert_eq!(engine.opened(), 1);
    assert_eq!(engine.live(), 0, "handle must be closed on rejection");
    assert!(!out.exists());
    std::fs::remove_file(&pdf).expect("input must not stay locked");
}

// ── Conversion failures ──────────────────────────────────────────────────────

#[test]
fn page_failure_keeps_earlier_pages_and_names_the_page() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = pdf_file(tmp.path(), "doc.pdf");
    let out = tmp.path().join("out");
    let engine = FakeEngine {
        fail_on_page: Some(3),
        ..FakeEngine::with_pages(5)
    };
    let (config, recorder) = recording_config();

    let err = convert_with_engine(&engine, &pdf, &out, &config).unwrap_err();

    assert_eq!(err.page(), Some(3));
    assert_eq!(err.category(), ErrorCategory::Conversion);
    assert!(err.to_string().contains("page 3"), "got: {err}");
    assert_eq!(all_names(&out), ["doc_001.png", "doc_002.png"]);
    assert_eq!(
        recorder.events(),
        ["start:5", "page:1/5", "page:2/5", "error:3/5"]
    );
    assert_eq!(engine.live(), 0);
}

#[test]
fn unwritable_output_directory_is_a_conversion_error() {
    let tmp = tempfile::tempdir().unwrap();
    let pdf = pdf_file(tmp.path(), "doc.pdf");
    let blocker = tmp.path().join("blocker");
    std::fs::write(&blocker, b"file, not dir").unwrap();

    let err = convert_with_engine(
        &FakeEngine::with_pages(1),
        &pdf,
        blocker.join("out"),
        &ConversionConfig::default(),
    )
    .unwrap_err();

    assert!(matches!(err, Pdf2PngError::OutputDirFailed { .. }), "{err:?}");
    assert_eq!(err.category(), ErrorCategory::Conversion);
}
