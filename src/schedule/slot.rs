use chrono::{Duration, NaiveTime};

use crate::RowNum;

/// Maps body rows to wall-clock time: fixed-size slots starting at `first_row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlots {
    pub first_row: RowNum,
    pub day_start: NaiveTime,
    pub slot_minutes: u32,
}

impl Default for TimeSlots {
    fn default() -> Self {
        TimeSlots {
            first_row: 6,
            day_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            slot_minutes: 15,
        }
    }
}

impl TimeSlots {
    /// start of the slot a row stands for; header rows have none
    pub fn start_of(&self, row: RowNum) -> Option<NaiveTime> {
        let idx = row.checked_sub(self.first_row)?;
        Some(self.advance(self.day_start, idx))
    }

    /// end of a block `height` slots tall starting at `start`
    pub fn end_of(&self, start: NaiveTime, height: RowNum) -> NaiveTime {
        self.advance(start, height)
    }

    // wraps past midnight, schedules never get there
    fn advance(&self, time: NaiveTime, slots: RowNum) -> NaiveTime {
        let minutes = i64::from(slots) * i64::from(self.slot_minutes);
        time.overflowing_add_signed(Duration::minutes(minutes)).0
    }
}
