//! Integration tests for turning band colours into a resistance.
//!
//! Tests cover:
//! - Digit, multiplier and tolerance lookups
//! - Readings taken right to left (gold first)
//! - Failure positions and roles for undecodable bands
//! - Label parsing, including the "gray" alias

mod common;

use resistor_reader::{BandRole, decode, decode_reading};

use common::*;

#[test]
fn test_decode_standard_reading() -> anyhow::Result<()> {
    let value = decode(&["brown", "black", "red", "gold"])?;

    assert_eq!(value.ohms, 1000);
    assert_eq!(value.tolerance, "+/- 5 %");
    assert_eq!(value.to_string(), "1000 Ohms +/- 5 %");
    Ok(())
}

#[test]
fn test_gold_first_reading_is_reversed() -> anyhow::Result<()> {
    let forward = decode(&["brown", "black", "red", "gold"])?;
    let backward = decode(&["gold", "red", "black", "brown"])?;

    assert_eq!(forward, backward);
    Ok(())
}

#[test]
fn test_missing_tolerance_band() -> anyhow::Result<()> {
    let value = decode(&["yellow", "violet", "orange", "none"])?;

    assert_eq!(value.to_string(), "47000 Ohms +/- 20 %");
    Ok(())
}

#[test]
fn test_gray_alias_and_case() -> anyhow::Result<()> {
    let value = decode(&["Gray", "red", "black", "brown"])?;

    assert_eq!(value.ohms, 82);
    assert_eq!(value.tolerance, "+/- 1 %");
    Ok(())
}

#[test]
fn test_largest_multiplier() -> anyhow::Result<()> {
    let value = decode(&["white", "white", "white", "silver"])?;

    assert_eq!(value.ohms, 99_000_000_000);
    assert_eq!(value.tolerance, "+/- 10 %");
    Ok(())
}

#[test]
fn test_gold_in_digit_position_fails() {
    let err = decode(&["brown", "gold", "red", "gold"]).unwrap_err();

    match err {
        ReaderError::DecodeFailure { position, label, role } => {
            assert_eq!(position, 1);
            assert_eq!(label, "gold");
            assert_eq!(role, BandRole::Digit);
        }
        other => panic!("Expected DecodeFailure, got {other:?}"),
    }
}

#[test]
fn test_digit_colour_as_tolerance_fails() {
    let reading = Reading::new([BandColor::Brown, BandColor::Black, BandColor::Red, BandColor::Orange]);
    let err = decode_reading(&reading).unwrap_err();

    assert!(matches!(
        err,
        ReaderError::DecodeFailure { position: 3, role: BandRole::Tolerance, .. }
    ));
}

#[test]
fn test_silver_multiplier_fails() {
    let err = decode(&["brown", "black", "silver", "gold"]).unwrap_err();

    assert!(matches!(
        err,
        ReaderError::DecodeFailure { position: 2, role: BandRole::Multiplier, .. }
    ));
}

#[test]
fn test_unknown_label_fails_at_its_position() {
    let err = decode(&["purple", "black", "red", "gold"]).unwrap_err();

    match err {
        ReaderError::DecodeFailure { position, label, .. } => {
            assert_eq!(position, 0);
            assert_eq!(label, "purple");
        }
        other => panic!("Expected DecodeFailure, got {other:?}"),
    }
}

#[test]
fn test_unknown_label_position_follows_reversal() {
    // Read right to left, "purple" lands in the first digit slot
    let err = decode(&["gold", "red", "black", "purple"]).unwrap_err();

    match err {
        ReaderError::DecodeFailure { position, label, role } => {
            assert_eq!(position, 0);
            assert_eq!(label, "purple");
            assert_eq!(role, BandRole::Digit);
        }
        other => panic!("Expected DecodeFailure, got {other:?}"),
    }
}

#[test]
fn test_unknown_label_in_last_slot_is_tolerance() {
    let err = decode(&["brown", "black", "red", "purple"]).unwrap_err();

    assert!(matches!(
        err,
        ReaderError::DecodeFailure { position: 3, role: BandRole::Tolerance, .. }
    ));
}

#[test]
fn test_wrong_band_count_is_incomplete() {
    let err = decode(&["brown", "black", "red"]).unwrap_err();

    assert!(matches!(
        err,
        ReaderError::IncompleteReading { found: 3, expected: 4 }
    ));
}

#[test]
fn test_reading_display() {
    let reading = Reading::new([BandColor::Brown, BandColor::Black, BandColor::Red, BandColor::Gold]);

    assert_eq!(reading.to_string(), "brown, black, red, gold");
    assert_eq!(format!("{:<7}|", BandColor::Red), "red    |");
}
