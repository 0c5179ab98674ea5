#![cfg(feature = "image-io")]

use labelmatch::{
    load, load_bytes, load_path, Comparator, ComparisonMethod, ImageSource, LabelMatchError,
};
use std::path::Path;

fn write_gray_png(path: &Path, width: u32, height: u32) {
    let img = image::GrayImage::from_fn(width, height, |x, y| image::Luma([(x * 10 + y) as u8]));
    img.save(path).unwrap();
}

#[test]
fn loads_grayscale_png_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gray.png");
    write_gray_png(&path, 12, 7);

    let img = load_path(&path).unwrap();
    assert_eq!((img.width(), img.height()), (12, 7));
    assert_eq!(img.data()[0], 0);
    assert_eq!(img.data()[7 * 12 - 1], 116);

    let via_source = load(&ImageSource::parse(path.to_str().unwrap())).unwrap();
    assert_eq!(via_source, img);
}

#[test]
fn color_images_are_reduced_to_luminance() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("color.png");
    let rgb = image::RgbImage::from_fn(4, 4, |x, _| {
        if x < 2 {
            image::Rgb([255, 255, 255])
        } else {
            image::Rgb([0, 0, 0])
        }
    });
    rgb.save(&path).unwrap();

    let img = load_path(&path).unwrap();
    assert_eq!((img.width(), img.height()), (4, 4));
    assert_eq!(img.data()[0], 255);
    assert_eq!(img.data()[3], 0);
}

#[test]
fn missing_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_path(dir.path().join("absent.png")).unwrap_err();
    assert!(matches!(err, LabelMatchError::Load { .. }), "{err:?}");
}

#[test]
fn empty_and_garbage_payloads_are_rejected() {
    let err = load_bytes(&[]).unwrap_err();
    assert_eq!(
        err,
        LabelMatchError::Load {
            origin: "<memory>".to_string(),
            reason: "empty payload".to_string(),
        }
    );
    assert!(matches!(
        load_bytes(b"definitely not an image"),
        Err(LabelMatchError::Load { .. })
    ));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.png");
    std::fs::write(&path, b"").unwrap();
    assert!(matches!(load_path(&path), Err(LabelMatchError::Load { .. })));
}

#[test]
fn comparing_sources_downgrades_load_failures() {
    let dir = tempfile::tempdir().unwrap();
    let reference = dir.path().join("ref.png");
    write_gray_png(&reference, 32, 32);
    let reference = ImageSource::parse(reference.to_str().unwrap());
    let missing = ImageSource::parse(dir.path().join("missing.png").to_str().unwrap());

    let comparator = Comparator::new();
    let result =
        comparator.compare_sources(&reference, &missing, ComparisonMethod::TemplateCorrelation);
    assert!(!result.success());
    assert_eq!(result.score(), 0.0);
    assert!(result.error().unwrap().contains("missing.png"));

    let report = comparator.compare_all_sources(&missing, &reference);
    assert!(!report.success());
    assert_eq!(report.best_method(), ComparisonMethod::StructuralSimilarity);
    assert!(report.results().values().all(|r| !r.success() && r.score() == 0.0));

    let ok = comparator.compare_sources(&reference, &reference, ComparisonMethod::StructuralSimilarity);
    assert!(ok.success());
    assert_eq!(ok.score(), 1.0);
}

#[cfg(not(feature = "http"))]
#[test]
fn urls_need_the_http_feature() {
    let err = load(&ImageSource::parse("https://example.invalid/label.png")).unwrap_err();
    match err {
        LabelMatchError::Load { origin, reason } => {
            assert_eq!(origin, "https://example.invalid/label.png");
            assert!(reason.contains("http"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}
