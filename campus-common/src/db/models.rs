//! Database models

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::time::{hhmm, Weekday};
use crate::{Error, Result};

/// Lifecycle state of a semester registration window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegistrationStatus {
    Upcoming,
    Ongoing,
    Ended,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Upcoming => "UPCOMING",
            RegistrationStatus::Ongoing => "ONGOING",
            RegistrationStatus::Ended => "ENDED",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "UPCOMING" => Ok(RegistrationStatus::Upcoming),
            "ONGOING" => Ok(RegistrationStatus::Ongoing),
            "ENDED" => Ok(RegistrationStatus::Ended),
            other => Err(Error::Internal(format!("Unknown registration status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterRegistration {
    pub id: Uuid,
    pub academic_semester: Uuid,
    pub status: RegistrationStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub min_credit: i64,
    pub max_credit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicFaculty {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicDepartment {
    pub id: Uuid,
    pub name: String,
    pub academic_faculty: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub prefix: String,
    pub code: i64,
    pub credits: i64,
}

/// Instructor record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub id: Uuid,
    pub name: String,
    pub designation: String,
    pub academic_department: Uuid,
}

/// One scheduled section of a course in a semester registration
///
/// `academic_semester` is always copied from the semester registration at
/// creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferedCourse {
    pub id: Uuid,
    pub semester_registration: Uuid,
    pub academic_semester: Uuid,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&RegistrationStatus::Upcoming).unwrap();
        assert_eq!(json, r#""UPCOMING""#);
        assert_eq!("ENDED".parse::<RegistrationStatus>().unwrap(), RegistrationStatus::Ended);
        assert!("upcoming".parse::<RegistrationStatus>().is_err());
    }

    #[test]
    fn test_offered_course_json_shape() {
        let now = Utc::now();
        let course = OfferedCourse {
            id: Uuid::new_v4(),
            semester_registration: Uuid::new_v4(),
            academic_semester: Uuid::new_v4(),
            academic_faculty: Uuid::new_v4(),
            academic_department: Uuid::new_v4(),
            course: Uuid::new_v4(),
            faculty: Uuid::new_v4(),
            max_capacity: 40,
            section: 1,
            days: [Weekday::Mon, Weekday::Sat].into_iter().collect(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&course).unwrap();
        assert_eq!(value["startTime"], "09:00");
        assert_eq!(value["endTime"], "10:30");
        assert_eq!(value["maxCapacity"], 40);
        // BTreeSet keeps the academic-week order
        assert_eq!(value["days"], serde_json::json!(["Sat", "Mon"]));
    }
}
