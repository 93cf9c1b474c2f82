//! Listing query: filters, sort order and paging for offered courses

use serde::Deserialize;
use std::cmp::Ordering;
use uuid::Uuid;

use campus_common::db::OfferedCourse;
use campus_common::{Error, Result, Weekday};

use crate::pagination::{calculate_pagination, Pagination};

/// Raw query parameters as received from the caller
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferedCourseQuery {
    pub semester_registration: Option<Uuid>,
    pub academic_semester: Option<Uuid>,
    pub academic_faculty: Option<Uuid>,
    pub academic_department: Option<Uuid>,
    pub course: Option<Uuid>,
    pub faculty: Option<Uuid>,
    pub section: Option<i64>,
    /// Comma-separated weekdays; a record matches if it meets on any of them
    pub days: Option<String>,
    /// Field name, `-` prefix for descending
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Sortable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Section,
    MaxCapacity,
    StartTime,
    EndTime,
}

impl SortField {
    fn parse(name: &str) -> Result<Self> {
        match name {
            "createdAt" => Ok(SortField::CreatedAt),
            "updatedAt" => Ok(SortField::UpdatedAt),
            "section" => Ok(SortField::Section),
            "maxCapacity" => Ok(SortField::MaxCapacity),
            "startTime" => Ok(SortField::StartTime),
            "endTime" => Ok(SortField::EndTime),
            other => Err(Error::bad_request(format!("Cannot sort by: {}", other))),
        }
    }

    /// Column name in `offered_courses`
    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Section => "section",
            SortField::MaxCapacity => "max_capacity",
            SortField::StartTime => "start_time",
            SortField::EndTime => "end_time",
        }
    }

    fn compare(&self, a: &OfferedCourse, b: &OfferedCourse) -> Ordering {
        match self {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Section => a.section.cmp(&b.section),
            SortField::MaxCapacity => a.max_capacity.cmp(&b.max_capacity),
            SortField::StartTime => a.start_time.cmp(&b.start_time),
            SortField::EndTime => a.end_time.cmp(&b.end_time),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub descending: bool,
}

impl Default for SortOrder {
    /// Newest first
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            descending: true,
        }
    }
}

/// Validated listing request handed to repositories
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub semester_registration: Option<Uuid>,
    pub academic_semester: Option<Uuid>,
    pub academic_faculty: Option<Uuid>,
    pub academic_department: Option<Uuid>,
    pub course: Option<Uuid>,
    pub faculty: Option<Uuid>,
    pub section: Option<i64>,
    pub days: Vec<Weekday>,
    pub sort: SortOrder,
    pub pagination: Pagination,
}

impl OfferedCourseQuery {
    pub fn resolve(&self) -> Result<ListQuery> {
        let days = match &self.days {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<Weekday>())
                .collect::<Result<Vec<Weekday>>>()?,
            None => Vec::new(),
        };

        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") => SortOrder::default(),
            Some(raw) => match raw.strip_prefix('-') {
                Some(name) => SortOrder {
                    field: SortField::parse(name)?,
                    descending: true,
                },
                None => SortOrder {
                    field: SortField::parse(raw)?,
                    descending: false,
                },
            },
        };

        Ok(ListQuery {
            semester_registration: self.semester_registration,
            academic_semester: self.academic_semester,
            academic_faculty: self.academic_faculty,
            academic_department: self.academic_department,
            course: self.course,
            faculty: self.faculty,
            section: self.section,
            days,
            sort,
            pagination: calculate_pagination(self.page, self.limit),
        })
    }
}

impl ListQuery {
    /// In-process filter predicate, equivalent to the SQL WHERE clause
    pub fn matches(&self, record: &OfferedCourse) -> bool {
        fn eq<T: PartialEq>(want: &Option<T>, have: &T) -> bool {
            want.as_ref().map_or(true, |w| w == have)
        }

        eq(&self.semester_registration, &record.semester_registration)
            && eq(&self.academic_semester, &record.academic_semester)
            && eq(&self.academic_faculty, &record.academic_faculty)
            && eq(&self.academic_department, &record.academic_department)
            && eq(&self.course, &record.course)
            && eq(&self.faculty, &record.faculty)
            && eq(&self.section, &record.section)
            && (self.days.is_empty() || self.days.iter().any(|d| record.days.contains(d)))
    }

    /// In-process ordering, ties broken by id
    pub fn compare(&self, a: &OfferedCourse, b: &OfferedCourse) -> Ordering {
        let ord = self.sort.field.compare(a, b);
        let ord = if self.sort.descending { ord.reverse() } else { ord };
        ord.then_with(|| a.id.cmp(&b.id))
    }
}
