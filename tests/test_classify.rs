//! Integration tests for band colour classification.
//!
//! Tests cover:
//! - Shape distance between outlines
//! - Priority and position matching against references
//! - The bounded retry loop and its stop conditions

mod common;

use resistor_reader::detection::shape_distance;

use common::*;

fn classifier() -> ColorClassifier {
    ColorClassifier::new(&ClassifierConfig::default())
}

#[test]
fn test_shape_distance() {
    let band = rect_outline(10, 10, 8, 40);
    let moved = rect_outline(70, 30, 8, 40);
    let square = rect_outline(10, 10, 10, 10);

    assert!(shape_distance(&band, &band) < 1e-6);
    assert!(shape_distance(&band, &moved) < 1e-6);
    assert!(shape_distance(&band, &square) > 0.1);
}

#[test]
fn test_classify_four_bands() -> anyhow::Result<()> {
    let (bands, refs) = banded_references(&[
        Some(BandColor::Brown),
        Some(BandColor::Black),
        Some(BandColor::Red),
        Some(BandColor::Gold),
    ]);

    let reading = classifier().classify(&bands, &refs)?;

    assert_eq!(
        reading,
        Reading::new([BandColor::Brown, BandColor::Black, BandColor::Red, BandColor::Gold])
    );
    assert_eq!(resistor_reader::decode_reading(&reading)?.ohms, 1000);
    Ok(())
}

#[test]
fn test_reference_too_far_away_does_not_match() {
    let band = rect_outline(10, 10, 8, 40);
    let mut refs = ReferenceOutlines::new();
    refs.insert(BandColor::Red, vec![rect_outline(40, 10, 8, 40)]);

    assert_eq!(classifier().classify_band(&band, &refs), None);
}

#[test]
fn test_priority_decides_between_matching_colours() {
    let band = rect_outline(10, 10, 8, 40);
    let mut refs = ReferenceOutlines::new();
    refs.insert(BandColor::Brown, vec![band.clone()]);
    refs.insert(BandColor::Red, vec![band.clone()]);

    assert_eq!(classifier().classify_band(&band, &refs), Some(BandColor::Red));
}

#[test]
fn test_unmatched_band_exhausts_budget() {
    let (bands, refs) = banded_references(&[
        Some(BandColor::Brown),
        Some(BandColor::Black),
        Some(BandColor::Red),
        None,
    ]);

    let classification = classifier().assign(&bands, &refs);

    assert_eq!(classification.comparisons, 20);
    assert_eq!(
        classification.labels,
        vec![Some(BandColor::Brown), Some(BandColor::Black), Some(BandColor::Red), None]
    );

    let err = classifier().classify(&bands, &refs).unwrap_err();
    assert!(matches!(
        err,
        ReaderError::IncompleteReading { found: 3, expected: 4 }
    ));
}

#[test]
fn test_small_budget_stops_early() {
    let (bands, refs) = banded_references(&[
        Some(BandColor::Brown),
        Some(BandColor::Black),
        Some(BandColor::Red),
        Some(BandColor::Gold),
    ]);
    let config = ClassifierConfig {
        comparison_budget: 2,
        ..Default::default()
    };

    let classification = ColorClassifier::new(&config).assign(&bands, &refs);

    assert_eq!(classification.comparisons, 2);
    assert_eq!(classification.colors(), vec![BandColor::Brown, BandColor::Black]);
}

#[test]
fn test_gold_stops_retries_after_pass() {
    let (bands, refs) = banded_references(&[Some(BandColor::Gold), None, None, None]);

    let classification = classifier().assign(&bands, &refs);

    assert_eq!(classification.comparisons, 4);
    assert_eq!(classification.colors(), vec![BandColor::Gold]);
}

#[test]
fn test_extra_bands_are_not_labelled() {
    let (bands, refs) = banded_references(&[
        Some(BandColor::Yellow),
        Some(BandColor::Violet),
        Some(BandColor::Orange),
        Some(BandColor::Gold),
        Some(BandColor::White),
    ]);

    let classification = classifier().assign(&bands, &refs);

    assert_eq!(classification.comparisons, 4);
    assert_eq!(classification.labels[4], None);
    assert_eq!(
        classifier().classify(&bands, &refs).ok(),
        Some(Reading::new([
            BandColor::Yellow,
            BandColor::Violet,
            BandColor::Orange,
            BandColor::Gold
        ]))
    );
}

#[test]
fn test_no_bands() {
    let err = classifier()
        .classify(&[], &ReferenceOutlines::new())
        .unwrap_err();

    assert!(matches!(err, ReaderError::NoBandsFound));
}
