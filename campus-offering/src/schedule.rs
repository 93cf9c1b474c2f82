//! Weekly schedule blocks and the instructor availability check

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use campus_common::db::OfferedCourse;
use campus_common::time::hhmm;
use campus_common::Weekday;

/// A recurring weekly meeting: the days it meets on and its `[start, end)` range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleBlock {
    pub days: BTreeSet<Weekday>,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

impl ScheduleBlock {
    pub fn new(days: impl IntoIterator<Item = Weekday>, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            days: days.into_iter().collect(),
            start_time,
            end_time,
        }
    }

    pub fn shares_day_with(&self, other: &ScheduleBlock) -> bool {
        !self.days.is_disjoint(&other.days)
    }

    /// Half-open overlap: blocks that only touch at an endpoint do not overlap
    pub fn overlaps_in_time(&self, other: &ScheduleBlock) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }

    pub fn conflicts_with(&self, other: &ScheduleBlock) -> bool {
        self.shares_day_with(other) && self.overlaps_in_time(other)
    }
}

impl From<&OfferedCourse> for ScheduleBlock {
    fn from(course: &OfferedCourse) -> Self {
        Self {
            days: course.days.clone(),
            start_time: course.start_time,
            end_time: course.end_time,
        }
    }
}

/// True if `candidate` collides with any already-assigned block
pub fn has_time_conflict(existing: &[ScheduleBlock], candidate: &ScheduleBlock) -> bool {
    existing.iter().any(|block| block.conflicts_with(candidate))
}
