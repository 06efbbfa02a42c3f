use tracing::debug;

use crate::error::{BandRole, ReaderError};
use crate::models::{BandColor, Reading, ResistanceValue};

/// Value of a colour in one of the two digit positions.
pub fn digit(color: BandColor) -> Option<u64> {
    match color {
        BandColor::Black => Some(0),
        BandColor::Brown => Some(1),
        BandColor::Red => Some(2),
        BandColor::Orange => Some(3),
        BandColor::Yellow => Some(4),
        BandColor::Green => Some(5),
        BandColor::Blue => Some(6),
        BandColor::Violet => Some(7),
        BandColor::Grey => Some(8),
        BandColor::White => Some(9),
        BandColor::Gold | BandColor::Silver | BandColor::Blank => None,
    }
}

/// Power-of-ten factor of a colour in the multiplier position.
pub fn multiplier(color: BandColor) -> Option<u64> {
    digit(color).map(|exp| 10u64.pow(exp as u32))
}

/// Tolerance text of a colour in the last position.
pub fn tolerance(color: BandColor) -> Option<&'static str> {
    match color {
        BandColor::Brown => Some("+/- 1 %"),
        BandColor::Red => Some("+/- 2 %"),
        BandColor::Green => Some("+/- 0.5 %"),
        BandColor::Blue => Some("+/- 0.25 %"),
        BandColor::Violet => Some("+/- 0.1 %"),
        BandColor::Gold => Some("+/- 5 %"),
        BandColor::Silver => Some("+/- 10 %"),
        BandColor::Blank => Some("+/- 20 %"),
        _ => None,
    }
}

fn decode_failure(position: usize, color: BandColor, role: BandRole) -> ReaderError {
    ReaderError::DecodeFailure {
        position,
        label: color.name().to_string(),
        role,
    }
}

/// Decode a reading as digit, digit, multiplier, tolerance.
///
/// A reading that starts with gold was read right to left and is reversed
/// first; failure positions refer to the reversed order.
pub fn decode_reading(reading: &Reading) -> Result<ResistanceValue, ReaderError> {
    let mut colors = *reading.colors();
    if colors[0] == BandColor::Gold {
        colors.reverse();
    }
    let [first, second, mult, tol] = colors;

    let tens = digit(first).ok_or_else(|| decode_failure(0, first, BandRole::Digit))?;
    let ones = digit(second).ok_or_else(|| decode_failure(1, second, BandRole::Digit))?;
    let factor = multiplier(mult).ok_or_else(|| decode_failure(2, mult, BandRole::Multiplier))?;
    let tolerance_text = tolerance(tol).ok_or_else(|| decode_failure(3, tol, BandRole::Tolerance))?;

    let value = ResistanceValue {
        ohms: (10 * tens + ones) * factor,
        tolerance: tolerance_text,
    };
    debug!(%value, "Decoded resistance");
    Ok(value)
}

fn role_at(position: usize) -> BandRole {
    match position {
        0 | 1 => BandRole::Digit,
        2 => BandRole::Multiplier,
        _ => BandRole::Tolerance,
    }
}

/// Decode colour labels such as `["brown", "black", "red", "gold"]`.
///
/// Fails with [`ReaderError::IncompleteReading`] unless exactly four labels
/// are given, and with [`ReaderError::DecodeFailure`] for a label that isn't
/// a colour at all. As with [`decode_reading`], positions refer to the
/// reversed order when the first label is gold.
pub fn decode<S: AsRef<str>>(labels: &[S]) -> Result<ResistanceValue, ReaderError> {
    let found = labels.len();
    if found != 4 {
        return Err(ReaderError::IncompleteReading { found, expected: 4 });
    }

    let reversed = matches!(labels[0].as_ref().parse::<BandColor>(), Ok(BandColor::Gold));
    let colors = labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let label = label.as_ref();
            let position = if reversed { found - 1 - index } else { index };
            label.parse::<BandColor>().map_err(|_| ReaderError::DecodeFailure {
                position,
                label: label.to_string(),
                role: role_at(position),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    decode_reading(&Reading::try_from(colors)?)
}
