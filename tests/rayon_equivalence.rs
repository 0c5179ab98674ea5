#![cfg(feature = "rayon")]

use labelmatch::{Comparator, ComparatorConfig, ComparisonMethod, Image};

fn make_label(seed: usize, width: usize, height: usize) -> Image {
    Image::from_fn(width, height, |x, y| (((x * 11) ^ (y * 3) ^ (x * y * seed)) & 0xFF) as u8)
        .unwrap()
}

#[test]
fn parallel_batch_matches_sequential() {
    let reference = make_label(1, 96, 80);
    let tests: Vec<Image> = (1..7).map(|seed| make_label(seed, 96, 80)).collect();

    let sequential = Comparator::with_config(ComparatorConfig {
        parallel: false,
        ..ComparatorConfig::default()
    });
    let parallel = Comparator::with_config(ComparatorConfig {
        parallel: true,
        ..ComparatorConfig::default()
    });

    for method in ComparisonMethod::ALL {
        let seq = sequential.compare_batch(&reference, &tests, method);
        let par = parallel.compare_batch(&reference, &tests, method);
        assert_eq!(seq, par, "{method}");
    }
}
