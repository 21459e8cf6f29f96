//! Position signal generation from a fast/slow moving-average pair.
//!
//! The signal is level-based: at each timestamp the state reflects the
//! current relative order of the two averages, not a prior crossover event,
//! so consecutive timestamps with the same ordering stay in the same state.

use crate::domain::error::MatraderError;
use crate::domain::moving_average::MaSeries;
use chrono::NaiveDate;

/// Position held during a trading period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Flat,
    Long,
}

/// One point of a position signal, aligned to the price series' timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalPoint {
    pub date: NaiveDate,
    pub position: Position,
}

/// Derive the position signal from a fast and a slow moving-average series.
///
/// Long where both averages are defined and fast > slow; flat otherwise,
/// including ties (a deliberate policy to avoid oscillation on exact
/// equality) and warmup positions where either average is undefined.
/// Fails with `MisalignedSeries` when the two timestamp domains differ.
pub fn generate_signals(
    fast: &MaSeries,
    slow: &MaSeries,
) -> Result<Vec<SignalPoint>, MatraderError> {
    if fast.points.len() != slow.points.len() {
        return Err(MatraderError::MisalignedSeries {
            reason: format!(
                "fast series has {} points, slow series has {}",
                fast.points.len(),
                slow.points.len()
            ),
        });
    }

    let mut signals = Vec::with_capacity(fast.points.len());

    for (i, (f, s)) in fast.points.iter().zip(&slow.points).enumerate() {
        if f.date != s.date {
            return Err(MatraderError::MisalignedSeries {
                reason: format!("date mismatch at index {}: {} vs {}", i, f.date, s.date),
            });
        }

        let position = match (f.value, s.value) {
            (Some(fast_value), Some(slow_value)) if fast_value > slow_value => Position::Long,
            _ => Position::Flat,
        };

        signals.push(SignalPoint {
            date: f.date,
            position,
        });
    }

    Ok(signals)
}
