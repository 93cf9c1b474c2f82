//! Request payloads for the offering workflows

use chrono::NaiveTime;
use serde::Deserialize;
use std::collections::BTreeSet;
use uuid::Uuid;

use campus_common::time::hhmm;
use campus_common::{Error, Result, Weekday};

use crate::schedule::ScheduleBlock;

/// Full payload for creating an offered course
///
/// Carries no `academicSemester`: that is derived from the semester
/// registration, and a value sent by the caller is dropped.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferedCourse {
    pub semester_registration: Uuid,
    pub academic_faculty: Uuid,
    pub academic_department: Uuid,
    pub course: Uuid,
    pub faculty: Uuid,
    pub max_capacity: i64,
    pub section: i64,
    pub days: BTreeSet<Weekday>,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

impl CreateOfferedCourse {
    pub fn validate(&self) -> Result<()> {
        if self.section < 1 {
            return Err(Error::bad_request("Section must be a positive number"));
        }
        if self.max_capacity < 1 {
            return Err(Error::bad_request("Max capacity must be a positive number"));
        }
        validate_meeting(&self.days, self.start_time, self.end_time)
    }

    pub fn schedule(&self) -> ScheduleBlock {
        ScheduleBlock::new(self.days.iter().copied(), self.start_time, self.end_time)
    }
}

/// The only fields an offered course may change once created
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOfferedCourse {
    pub faculty: Uuid,
    pub days: BTreeSet<Weekday>,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

impl UpdateOfferedCourse {
    pub fn validate(&self) -> Result<()> {
        validate_meeting(&self.days, self.start_time, self.end_time)
    }

    pub fn schedule(&self) -> ScheduleBlock {
        ScheduleBlock::new(self.days.iter().copied(), self.start_time, self.end_time)
    }
}

fn validate_meeting(days: &BTreeSet<Weekday>, start_time: NaiveTime, end_time: NaiveTime) -> Result<()> {
    if days.is_empty() {
        return Err(Error::bad_request("At least one day is required"));
    }
    if start_time >= end_time {
        return Err(Error::bad_request("Start time should be before End time !"));
    }
    Ok(())
}
