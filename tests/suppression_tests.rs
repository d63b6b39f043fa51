// tests/suppression_tests.rs
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smartcart_core::ClassNames;
use smartcart_nms::{
    BBox, Detection, SuppressionError, intersection_over_union, select_survivors,
    suppress_duplicates,
};

fn cart_names() -> ClassNames {
    ClassNames::from_names(["apple", "banana"])
}

fn det(class_id: usize, confidence: f64, bbox: [f64; 4]) -> Detection {
    Detection::new(class_id, confidence, BBox::from(bbox))
}

/// Integer-aligned boxes keep the geometry exact in f64
fn random_detections(rng: &mut StdRng, count: usize, classes: usize) -> Vec<Detection> {
    (0..count)
        .map(|_| {
            let x = rng.gen_range(0..50) as f64;
            let y = rng.gen_range(0..50) as f64;
            let w = rng.gen_range(0..20) as f64;
            let h = rng.gen_range(0..20) as f64;
            Detection::new(
                rng.gen_range(0..classes),
                rng.gen_range(0.0..=1.0),
                BBox::new(x, y, x + w, y + h),
            )
        })
        .collect()
}

#[test]
fn test_overlapping_apples_collapse() {
    // IoU 0.5
    let detections = vec![
        det(0, 0.9, [0.0, 0.0, 10.0, 10.0]),
        det(0, 0.8, [0.0, 0.0, 10.0, 5.0]),
    ];
    let labels = suppress_duplicates(&detections, &cart_names(), 0.15).unwrap();
    assert_eq!(labels, vec!["apple"]);
}

#[test]
fn test_slightly_overlapping_apples_both_kept() {
    // IoU 10 / 100 = 0.10
    let detections = vec![
        det(0, 0.9, [0.0, 0.0, 10.0, 10.0]),
        det(0, 0.8, [9.0, 0.0, 10.0, 10.0]),
    ];
    assert_eq!(
        intersection_over_union(&detections[0].bbox, &detections[1].bbox),
        0.1
    );

    let labels = suppress_duplicates(&detections, &cart_names(), 0.15).unwrap();
    assert_eq!(labels, vec!["apple", "apple"]);
}

#[test]
fn test_different_classes_never_suppress_each_other() {
    let same_box = [0.0, 0.0, 10.0, 10.0];

    let banana_first = vec![det(1, 0.95, same_box), det(0, 0.9, same_box)];
    let labels = suppress_duplicates(&banana_first, &cart_names(), 0.15).unwrap();
    assert_eq!(labels, vec!["banana", "apple"]);

    // Order across classes follows first appearance, not confidence
    let apple_first = vec![det(0, 0.9, same_box), det(1, 0.95, same_box)];
    let labels = suppress_duplicates(&apple_first, &cart_names(), 0.15).unwrap();
    assert_eq!(labels, vec!["apple", "banana"]);
}

#[test]
fn test_empty_detections() {
    let labels = suppress_duplicates(&[], &cart_names(), 0.15).unwrap();
    assert!(labels.is_empty());
}

#[test]
fn test_unknown_class_fails_request() {
    let detections = vec![
        det(0, 0.9, [0.0, 0.0, 10.0, 10.0]),
        det(3, 0.9, [20.0, 20.0, 30.0, 30.0]),
    ];
    let err = suppress_duplicates(&detections, &cart_names(), 0.15).unwrap_err();
    assert_eq!(err, SuppressionError::UnknownClass { index: 1, class_id: 3 });
}

#[test]
fn test_greedy_keep_count_can_drop_when_threshold_rises() {
    // A suppresses B at 0.15 which frees C and D; at 0.3 B survives and takes them out.
    let detections = vec![
        det(0, 0.9, [0.0, 7.0, 10.0, 17.0]),
        det(0, 0.8, [0.0, 0.0, 10.0, 10.0]),
        det(0, 0.7, [0.0, 0.0, 5.0, 10.0]),
        det(0, 0.6, [5.0, 0.0, 10.0, 10.0]),
    ];
    assert_eq!(select_survivors(&detections, 0.15).unwrap(), vec![0, 2, 3]);
    assert_eq!(select_survivors(&detections, 0.3).unwrap(), vec![0, 1]);
}

#[test]
fn test_iou_symmetric_and_bounded() {
    let mut rng = StdRng::seed_from_u64(7);
    let detections = random_detections(&mut rng, 200, 1);

    for a in &detections {
        for b in &detections {
            let forward = intersection_over_union(&a.bbox, &b.bbox);
            assert_eq!(forward, intersection_over_union(&b.bbox, &a.bbox));
            assert!((0.0..=1.0).contains(&forward));
        }
        if a.bbox.area() > 0.0 {
            assert_eq!(intersection_over_union(&a.bbox, &a.bbox), 1.0);
        }
    }
}

#[test]
fn test_repeated_runs_match() {
    let mut rng = StdRng::seed_from_u64(11);
    let names = ClassNames::from_names(["a", "b", "c", "d"]);

    for _ in 0..50 {
        let detections = random_detections(&mut rng, 40, 4);
        let first = suppress_duplicates(&detections, &names, 0.15).unwrap();
        let second = suppress_duplicates(&detections, &names, 0.15).unwrap();
        assert_eq!(first, second);
        assert!(first.len() <= detections.len());
    }
}

#[test]
fn test_classes_are_independent() {
    let mut rng = StdRng::seed_from_u64(23);

    for _ in 0..50 {
        let detections = random_detections(&mut rng, 40, 3);
        let combined = select_survivors(&detections, 0.15).unwrap();

        let mut first_seen = Vec::new();
        for detection in &detections {
            if !first_seen.contains(&detection.class_id) {
                first_seen.push(detection.class_id);
            }
        }

        let mut separate = Vec::new();
        for class_id in first_seen {
            let members: Vec<usize> = (0..detections.len())
                .filter(|&i| detections[i].class_id == class_id)
                .collect();
            let alone: Vec<Detection> = members.iter().map(|&i| detections[i].clone()).collect();
            let kept = select_survivors(&alone, 0.15).unwrap();
            separate.extend(kept.into_iter().map(|i| members[i]));
        }

        assert_eq!(combined, separate);
    }
}

#[test]
fn test_threshold_of_one_keeps_everything() {
    let mut rng = StdRng::seed_from_u64(31);
    let detections = random_detections(&mut rng, 60, 2);

    let kept = select_survivors(&detections, 1.0).unwrap();
    assert_eq!(kept.len(), detections.len());
}

#[test]
fn test_pairs_keep_more_as_threshold_rises() {
    let mut rng = StdRng::seed_from_u64(47);
    let thresholds = [0.05, 0.15, 0.3, 0.5, 0.75, 1.0];

    for _ in 0..200 {
        let detections = random_detections(&mut rng, 2, 1);
        let counts: Vec<usize> = thresholds
            .iter()
            .map(|&t| select_survivors(&detections, t).unwrap().len())
            .collect();
        assert!(counts.windows(2).all(|w| w[0] <= w[1]), "{:?}", counts);
    }
}
