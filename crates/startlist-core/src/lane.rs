//! Lane to entry class assignments.

use serde::Serialize;

use crate::error::ValidationError;
use crate::settings::ScheduleSettings;
use crate::types::EntryClassId;

/// Validates a raw lane number against the configured lane count.
pub(crate) fn validate_lane(
    lane_number: i64,
    settings: &ScheduleSettings,
) -> Result<u32, ValidationError> {
    if lane_number <= 0 {
        return Err(ValidationError::NonPositiveLane { value: lane_number });
    }
    let lane_count = settings.lane_count();
    if lane_number > i64::from(lane_count) {
        return Err(ValidationError::LaneOutOfRange {
            lane: lane_number,
            lane_count,
        });
    }
    // Bounded by lane_count above.
    u32::try_from(lane_number).map_err(|_| ValidationError::LaneOutOfRange {
        lane: lane_number,
        lane_count,
    })
}

/// One physical lane reserved for one entry class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaneAssignment {
    lane_number: u32,
    entry_class_id: EntryClassId,
}

impl LaneAssignment {
    /// Assigns `entry_class_id` to `lane_number`.
    pub fn assign(
        lane_number: i64,
        entry_class_id: &str,
        settings: &ScheduleSettings,
    ) -> Result<Self, ValidationError> {
        let lane_number = validate_lane(lane_number, settings)?;
        let entry_class_id = EntryClassId::new(entry_class_id)?;
        Ok(Self {
            lane_number,
            entry_class_id,
        })
    }

    pub const fn lane_number(&self) -> u32 {
        self.lane_number
    }

    pub const fn entry_class_id(&self) -> &EntryClassId {
        &self.entry_class_id
    }
}
