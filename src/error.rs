use std::fmt;

use thiserror::Error;

/// Role a band plays in a four-band reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandRole {
    Digit,
    Multiplier,
    Tolerance,
}

impl fmt::Display for BandRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BandRole::Digit => "digit",
            BandRole::Multiplier => "multiplier",
            BandRole::Tolerance => "tolerance",
        };
        f.write_str(name)
    }
}

/// Terminal failures of the image-to-reading pipeline.
///
/// Segmentation, dedup and ordering never fail on sparse detections; only
/// normalization, classification and decoding produce these.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("no foreground detected in captured frame")]
    NoForegroundDetected,

    #[error("failed to localize resistor: {reason}")]
    LocalizationFailure { reason: String },

    #[error("no bands found on resistor body")]
    NoBandsFound,

    #[error("incomplete reading: {found} of {expected} bands classified")]
    IncompleteReading { found: usize, expected: usize },

    #[error("cannot decode band {position} ('{label}') as a {role} colour")]
    DecodeFailure {
        position: usize,
        label: String,
        role: BandRole,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
