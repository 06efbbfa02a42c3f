//! Integration tests for band dedup and left-to-right ordering.

mod common;

use resistor_reader::detection::{dedup_bands, merge_sort_by_key, order_bands};

use common::*;

fn xs(outlines: &[Outline]) -> Vec<i32> {
    outlines.iter().map(|o| o.bounding_box().x).collect()
}

#[test]
fn test_overlapping_bands_keep_first() {
    let bands = vec![
        rect_outline(10, 5, 10, 30),
        rect_outline(14, 8, 10, 20),
        rect_outline(40, 5, 10, 30),
    ];

    let unique = dedup_bands(bands);

    assert_eq!(xs(&unique), vec![10, 40]);
    assert_eq!(unique[0].bounding_box().y, 5);
}

#[test]
fn test_touching_bands_overlap() {
    // First band spans x 10..=19, second starts right after it
    let unique = dedup_bands(vec![rect_outline(10, 0, 10, 20), rect_outline(20, 0, 10, 20)]);

    assert_eq!(unique.len(), 1);
}

#[test]
fn test_separated_bands_survive() {
    let one_px_gap = dedup_bands(vec![rect_outline(10, 0, 10, 20), rect_outline(21, 0, 10, 20)]);
    let two_px_gap = dedup_bands(vec![rect_outline(10, 0, 10, 20), rect_outline(22, 0, 10, 20)]);

    assert_eq!(one_px_gap.len(), 2);
    assert_eq!(two_px_gap.len(), 2);
}

#[test]
fn test_contained_band_is_dropped() {
    let unique = dedup_bands(vec![rect_outline(10, 0, 30, 20), rect_outline(15, 0, 5, 20)]);

    assert_eq!(xs(&unique), vec![10]);
}

#[test]
fn test_dedup_empty() {
    assert!(dedup_bands(Vec::new()).is_empty());
}

#[test]
fn test_order_is_independent_of_input_order() {
    let a = vec![
        rect_outline(70, 0, 8, 40),
        rect_outline(10, 0, 8, 40),
        rect_outline(100, 0, 8, 40),
        rect_outline(40, 0, 8, 40),
    ];
    let mut b = a.clone();
    b.reverse();

    let ordered_a = order_bands(a);
    let ordered_b = order_bands(b);

    assert_eq!(xs(&ordered_a), vec![10, 40, 70, 100]);
    assert_eq!(ordered_a, ordered_b);
}

#[test]
fn test_order_is_idempotent() {
    let bands = vec![
        rect_outline(50, 0, 8, 40),
        rect_outline(5, 0, 8, 40),
        rect_outline(25, 0, 8, 40),
    ];

    let once = order_bands(bands);
    let twice = order_bands(once.clone());

    assert_eq!(once, twice);
}

#[test]
fn test_merge_sort_is_stable() {
    let items = vec![(3, 'a'), (1, 'b'), (3, 'c'), (2, 'd'), (1, 'e'), (3, 'f')];

    let sorted = merge_sort_by_key(items, &|item: &(i32, char)| item.0);

    assert_eq!(
        sorted,
        vec![(1, 'b'), (1, 'e'), (2, 'd'), (3, 'a'), (3, 'c'), (3, 'f')]
    );
}

#[test]
fn test_merge_sort_handles_short_inputs() {
    let key = |v: &i32| *v;

    assert!(merge_sort_by_key(Vec::<i32>::new(), &key).is_empty());
    assert_eq!(merge_sort_by_key(vec![7], &key), vec![7]);
    assert_eq!(merge_sort_by_key(vec![2, 1], &key), vec![1, 2]);
}
