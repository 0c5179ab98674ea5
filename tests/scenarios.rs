use labelmatch::{Comparator, ComparisonMethod, Image};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random grey blocks with no flat background.
fn block_texture(seed: u64, width: usize, height: usize, block: usize) -> Image {
    let mut rng = StdRng::seed_from_u64(seed);
    let cols = width.div_ceil(block);
    let rows = height.div_ceil(block);
    let cells: Vec<u8> = (0..cols * rows).map(|_| rng.random_range(0..=255)).collect();
    Image::from_fn(width, height, |x, y| cells[(y / block) * cols + x / block]).unwrap()
}

/// Rotates a quarter turn clockwise.
fn rotate_quarter(img: &Image) -> Image {
    let (w, h) = (img.width(), img.height());
    Image::from_fn(h, w, |x, y| img.data()[(h - 1 - x) * w + y]).unwrap()
}

/// Rotates by `angle_deg` about the center with bilinear sampling, then
/// removes `crop` pixels from every side.
fn rotate_and_crop(img: &Image, angle_deg: f32, crop: usize) -> Image {
    let (w, h) = (img.width(), img.height());
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let (cx, cy) = ((w as f32 - 1.0) / 2.0, (h as f32 - 1.0) / 2.0);
    let sample = |x: f32, y: f32| -> f32 {
        if x < 0.0 || y < 0.0 || x > (w - 1) as f32 || y > (h - 1) as f32 {
            return 128.0;
        }
        let (x0, y0) = (x.floor() as usize, y.floor() as usize);
        let (x1, y1) = ((x0 + 1).min(w - 1), (y0 + 1).min(h - 1));
        let (fx, fy) = (x - x0 as f32, y - y0 as f32);
        let px = |x: usize, y: usize| img.data()[y * w + x] as f32;
        let top = px(x0, y0) + (px(x1, y0) - px(x0, y0)) * fx;
        let bottom = px(x0, y1) + (px(x1, y1) - px(x0, y1)) * fx;
        top + (bottom - top) * fy
    };
    Image::from_fn(w - 2 * crop, h - 2 * crop, |x, y| {
        let dx = (x + crop) as f32 - cx;
        let dy = (y + crop) as f32 - cy;
        let sx = cos * dx + sin * dy + cx;
        let sy = -sin * dx + cos * dy + cy;
        sample(sx, sy).round().clamp(0.0, 255.0) as u8
    })
    .unwrap()
}

#[test]
fn identical_labels_score_one() {
    let img = block_texture(1, 96, 64, 5);
    let result = Comparator::new().compare(&img, &img, ComparisonMethod::StructuralSimilarity);
    assert!(result.success());
    assert_eq!(result.score(), 1.0);
    assert_eq!(result.score_percentage(), 100.0);
}

#[test]
fn black_versus_white_scores_near_zero() {
    let black = Image::from_fn(640, 480, |_, _| 0).unwrap();
    let white = Image::from_fn(640, 480, |_, _| 255).unwrap();
    let result = Comparator::new().compare(&black, &white, ComparisonMethod::StructuralSimilarity);
    assert!(result.success());
    assert!(result.score() < 0.01, "score {}", result.score());
}

#[test]
fn rotated_label_is_best_matched_by_keypoints() {
    let reference = block_texture(2024, 160, 120, 6);
    let test = rotate_quarter(&reference);
    assert_eq!((test.width(), test.height()), (120, 160));

    let report = Comparator::new().compare_all(&reference, &test);
    let orb = report.result(ComparisonMethod::FeatureMatch).unwrap();
    let template = report.result(ComparisonMethod::TemplateCorrelation).unwrap();
    assert!(orb.success());
    assert!(
        orb.score() > template.score(),
        "orb {} template {}",
        orb.score(),
        template.score()
    );
    assert_eq!(report.best_method(), ComparisonMethod::FeatureMatch);
}

#[test]
fn tilted_and_cropped_label_is_best_matched_by_keypoints() {
    let reference = block_texture(77, 320, 240, 8);
    let test = rotate_and_crop(&reference, 20.0, 30);
    assert_eq!((test.width(), test.height()), (260, 180));

    let report = Comparator::new().compare_all(&reference, &test);
    let orb = report.result(ComparisonMethod::FeatureMatch).unwrap();
    let template = report.result(ComparisonMethod::TemplateCorrelation).unwrap();
    assert!(orb.success());
    assert!(
        orb.score() > template.score(),
        "orb {} template {}",
        orb.score(),
        template.score()
    );
    assert_eq!(report.best_method(), ComparisonMethod::FeatureMatch);
}

#[test]
fn batch_results_follow_input_order() {
    let reference = block_texture(3, 80, 80, 4);
    let tests = vec![
        reference.clone(),
        Image::from_fn(80, 80, |_, _| 0).unwrap(),
        Image::from_fn(4, 4, |x, y| (x * y) as u8).unwrap(),
        block_texture(4, 80, 80, 4),
    ];
    let comparator = Comparator::new();
    let batch = comparator.compare_batch(&reference, &tests, ComparisonMethod::TemplateCorrelation);
    assert_eq!(batch.len(), tests.len());
    for (result, test) in batch.iter().zip(tests.iter()) {
        let single = comparator.compare(&reference, test, ComparisonMethod::TemplateCorrelation);
        assert_eq!(result, &single);
    }
    assert!(batch[0].score() > 0.9999);
    assert!(!batch[1].success());
}
