//! Schedule settings and the start time rule.
//!
//! Every start instant in the system is derived from
//! `start_instant + floor(sequence / lane_count) * interval_seconds`.
//! Downstream consumers recompute this value, so it must stay bit-exact.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::ValidationError;

/// Immutable scheduling configuration for one race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleSettings {
    /// Start instant of the first wave.
    start_instant: DateTime<Utc>,
    /// Seconds between two consecutive waves.
    interval_seconds: i64,
    /// Number of physical start lanes.
    lane_count: u32,
}

impl ScheduleSettings {
    /// Creates validated settings.
    pub fn configure(
        start_instant: DateTime<Utc>,
        interval_seconds: i64,
        lane_count: i64,
    ) -> Result<Self, ValidationError> {
        if interval_seconds <= 0 {
            return Err(ValidationError::NonPositiveInterval {
                value: interval_seconds,
            });
        }
        if lane_count <= 0 {
            return Err(ValidationError::NonPositiveLaneCount { value: lane_count });
        }
        let lane_count = u32::try_from(lane_count)
            .map_err(|_| ValidationError::LaneCountTooLarge { value: lane_count })?;

        Ok(Self {
            start_instant,
            interval_seconds,
            lane_count,
        })
    }

    /// Creates validated settings from an RFC 3339 start instant.
    pub fn parse(
        start_instant: &str,
        interval_seconds: i64,
        lane_count: i64,
    ) -> Result<Self, ValidationError> {
        let start = DateTime::parse_from_rfc3339(start_instant.trim()).map_err(|_| {
            ValidationError::InvalidInstant {
                value: start_instant.to_string(),
            }
        })?;
        Self::configure(start.with_timezone(&Utc), interval_seconds, lane_count)
    }

    pub const fn start_instant(&self) -> DateTime<Utc> {
        self.start_instant
    }

    pub const fn interval_seconds(&self) -> i64 {
        self.interval_seconds
    }

    pub const fn lane_count(&self) -> u32 {
        self.lane_count
    }

    /// Wave index of a sequence number: `floor(sequence / lane_count)`.
    pub fn wave_of(&self, sequence: i64) -> Result<i64, ValidationError> {
        if sequence < 0 {
            return Err(ValidationError::NegativeSequence { value: sequence });
        }
        Ok(sequence / i64::from(self.lane_count))
    }

    /// Computes the start instant of the slot at `sequence`.
    pub fn calculate_start_instant(&self, sequence: i64) -> Result<DateTime<Utc>, ValidationError> {
        let wave = self.wave_of(sequence)?;
        wave.checked_mul(self.interval_seconds)
            .and_then(Duration::try_seconds)
            .and_then(|offset| self.start_instant.checked_add_signed(offset))
            .ok_or(ValidationError::StartInstantOutOfRange { sequence })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-05-17T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn configure_rejects_non_positive_values() {
        assert_eq!(
            ScheduleSettings::configure(t0(), 0, 2),
            Err(ValidationError::NonPositiveInterval { value: 0 })
        );
        assert_eq!(
            ScheduleSettings::configure(t0(), -30, 2),
            Err(ValidationError::NonPositiveInterval { value: -30 })
        );
        assert_eq!(
            ScheduleSettings::configure(t0(), 60, 0),
            Err(ValidationError::NonPositiveLaneCount { value: 0 })
        );
        assert_eq!(
            ScheduleSettings::configure(t0(), 60, i64::from(u32::MAX) + 1),
            Err(ValidationError::LaneCountTooLarge {
                value: i64::from(u32::MAX) + 1
            })
        );
    }

    #[test]
    fn parse_rejects_invalid_instant() {
        let err = ScheduleSettings::parse("next tuesday", 60, 2).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidInstant {
                value: "next tuesday".to_string()
            }
        );
    }

    #[test]
    fn parse_normalizes_offsets_to_utc() {
        let settings = ScheduleSettings::parse("2025-05-17T12:00:00+02:00", 60, 2).unwrap();
        assert_eq!(settings.start_instant(), t0());
    }

    #[test]
    fn start_instant_follows_wave_formula() {
        for lanes in 1..=5_i64 {
            for interval in [1_i64, 30, 120] {
                let settings = ScheduleSettings::configure(t0(), interval, lanes).unwrap();
                for sequence in 0..40_i64 {
                    let expected = t0() + Duration::seconds((sequence / lanes) * interval);
                    assert_eq!(
                        settings.calculate_start_instant(sequence).unwrap(),
                        expected,
                        "lanes={lanes} interval={interval} sequence={sequence}"
                    );
                }
            }
        }
    }

    #[test]
    fn start_instant_rejects_negative_sequence() {
        let settings = ScheduleSettings::configure(t0(), 120, 2).unwrap();
        assert_eq!(
            settings.calculate_start_instant(-1),
            Err(ValidationError::NegativeSequence { value: -1 })
        );
    }

    #[test]
    fn start_instant_reports_overflow() {
        let settings = ScheduleSettings::configure(t0(), i64::MAX, 1).unwrap();
        assert_eq!(
            settings.calculate_start_instant(2),
            Err(ValidationError::StartInstantOutOfRange { sequence: 2 })
        );
    }
}
