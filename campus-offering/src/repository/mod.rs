//! Storage collaborators for the offering workflows
//!
//! The orchestrator only sees these traits. `sqlite` is the production
//! store; `memory` backs tests and local experiments.

use async_trait::async_trait;
use std::collections::BTreeSet;
use uuid::Uuid;

use campus_common::db::{
    AcademicDepartment, AcademicFaculty, Course, Faculty, OfferedCourse, SemesterRegistration,
};
use campus_common::{Result, Weekday};

use crate::pagination::Page;
use crate::payload::UpdateOfferedCourse;
use crate::query::ListQuery;
use crate::schedule::ScheduleBlock;

pub mod memory;
pub mod sqlite;

pub use memory::{MemoryCatalog, MemoryOfferedCourses};
pub use sqlite::{SqliteCatalog, SqliteOfferedCourses};

/// Message reported when a section already exists for the course
pub const DUPLICATE_SECTION: &str = "Offered course with same section is already exist!";

/// Identity of a section within a semester registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionKey {
    pub semester_registration: Uuid,
    pub course: Uuid,
    pub section: i64,
}

/// Selects the meetings already assigned to an instructor
#[derive(Debug, Clone)]
pub struct ScheduleFilter {
    pub semester_registration: Uuid,
    pub faculty: Uuid,
    /// Only blocks meeting on at least one of these days
    pub days: BTreeSet<Weekday>,
    /// Record to leave out, used when re-checking an existing offering
    pub exclude: Option<Uuid>,
}

impl ScheduleFilter {
    pub fn matches(&self, record: &OfferedCourse) -> bool {
        record.semester_registration == self.semester_registration
            && record.faculty == self.faculty
            && Some(record.id) != self.exclude
            && !record.days.is_disjoint(&self.days)
    }
}

/// Department lookup constrained to a parent faculty
#[derive(Debug, Clone, Copy)]
pub struct DepartmentFilter {
    pub id: Uuid,
    pub academic_faculty: Uuid,
}

/// Read-only master data owned by other campus modules
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_semester_registration(&self, id: Uuid) -> Result<Option<SemesterRegistration>>;

    async fn find_academic_faculty(&self, id: Uuid) -> Result<Option<AcademicFaculty>>;

    async fn find_academic_department(&self, id: Uuid) -> Result<Option<AcademicDepartment>>;

    async fn find_departments(&self, filter: DepartmentFilter) -> Result<Vec<AcademicDepartment>>;

    async fn find_course(&self, id: Uuid) -> Result<Option<Course>>;

    async fn find_faculty(&self, id: Uuid) -> Result<Option<Faculty>>;
}

/// Offered-course records
#[async_trait]
pub trait OfferedCourseRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OfferedCourse>>;

    async fn find_one(&self, key: SectionKey) -> Result<Option<OfferedCourse>>;

    async fn find_schedules(&self, filter: &ScheduleFilter) -> Result<Vec<ScheduleBlock>>;

    async fn find_all(&self, query: &ListQuery) -> Result<Page<OfferedCourse>>;

    /// Insert a new record
    ///
    /// A duplicate section must fail with `Error::BadRequest`.
    async fn create(&self, record: OfferedCourse) -> Result<OfferedCourse>;

    /// Apply a patch, returning `None` if the record does not exist
    async fn update(&self, id: Uuid, patch: &UpdateOfferedCourse) -> Result<Option<OfferedCourse>>;

    /// Remove a record, returning whether it existed
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Confirm the backing store answers queries
    async fn ping(&self) -> Result<()>;
}
