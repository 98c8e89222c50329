//! Shared utilities for CLI commands.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};

use startlist_core::{EventId, LaneRequest, RaceId};

use crate::cli::RaceArgs;

/// Validates the race identity given on the command line.
pub fn race_ids(race: &RaceArgs) -> Result<(EventId, RaceId)> {
    let event_id = EventId::new(race.event.as_str()).context("invalid --event")?;
    let race_id = RaceId::new(race.race.as_str()).context("invalid --race")?;
    Ok((event_id, race_id))
}

/// Parses a `LANE=CLASS` argument.
pub fn parse_lane_request(value: &str) -> Result<LaneRequest> {
    let Some((lane, class)) = value.split_once('=') else {
        anyhow::bail!("Invalid lane assignment: {value}. Use LANE=CLASS (e.g., 1=M21E)");
    };
    let lane: i64 = lane
        .trim()
        .parse()
        .with_context(|| format!("invalid lane number in {value}"))?;
    Ok(LaneRequest::new(lane, class.trim()))
}

/// Formats an instant for display, with second precision.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lane_request_splits_lane_and_class() {
        assert_eq!(
            parse_lane_request("2=W21E").unwrap(),
            LaneRequest::new(2, "W21E")
        );
        assert_eq!(
            parse_lane_request(" 3 = H35 ").unwrap(),
            LaneRequest::new(3, "H35")
        );
    }

    #[test]
    fn parse_lane_request_rejects_malformed_input() {
        assert!(parse_lane_request("W21E").is_err());
        let err = parse_lane_request("one=W21E").unwrap_err();
        assert!(err.to_string().contains("invalid lane number"));
    }

    #[test]
    fn race_ids_rejects_empty_values() {
        let race = RaceArgs {
            event: String::new(),
            race: "sprint".to_string(),
        };
        assert!(race_ids(&race).is_err());
    }
}
