//! Offered course lifecycle: create, read, update and delete workflows
//!
//! Every workflow runs its validations first and performs at most one write
//! at the end, so a rejected request never leaves partial state behind.

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use campus_common::db::OfferedCourse;
use campus_common::{time, uuid_utils, Error, Result};

use crate::locks::ScheduleLocks;
use crate::pagination::Page;
use crate::payload::{CreateOfferedCourse, UpdateOfferedCourse};
use crate::query::OfferedCourseQuery;
use crate::repository::{CatalogStore, OfferedCourseRepository, ScheduleFilter, SectionKey, DUPLICATE_SECTION};
use crate::schedule::has_time_conflict;
use crate::validators::{
    require_academic_department, require_academic_faculty, require_course,
    require_department_in_faculty, require_faculty, require_semester_registration,
    require_upcoming,
};

/// Reported when an instructor already teaches at the requested time
pub const FACULTY_UNAVAILABLE: &str =
    "This faculty is not available at that time ! Choose other time or day";

/// Reported when the offering id does not resolve
pub const OFFERED_COURSE_NOT_FOUND: &str = "Offered course not found !";

pub struct OfferedCourseService {
    catalog: Arc<dyn CatalogStore>,
    offered_courses: Arc<dyn OfferedCourseRepository>,
    locks: ScheduleLocks,
}

impl OfferedCourseService {
    pub fn new(catalog: Arc<dyn CatalogStore>, offered_courses: Arc<dyn OfferedCourseRepository>) -> Self {
        Self {
            catalog,
            offered_courses,
            locks: ScheduleLocks::new(),
        }
    }

    /// Register a new section
    ///
    /// The five reference lookups run concurrently; their failures are
    /// reported in the fixed order semester registration, academic faculty,
    /// academic department, course, faculty.
    pub async fn create_offered_course(&self, payload: CreateOfferedCourse) -> Result<OfferedCourse> {
        payload.validate()?;

        let catalog = self.catalog.as_ref();
        let (registration, academic_faculty, academic_department, course, faculty) = tokio::join!(
            require_semester_registration(catalog, payload.semester_registration),
            require_academic_faculty(catalog, payload.academic_faculty),
            require_academic_department(catalog, payload.academic_department),
            require_course(catalog, payload.course),
            require_faculty(catalog, payload.faculty),
        );
        let registration = registration?;
        let academic_faculty = academic_faculty?;
        let academic_department = academic_department?;
        let course = course?;
        let faculty = faculty?;

        require_department_in_faculty(catalog, &academic_department, &academic_faculty).await?;

        let key = SectionKey {
            semester_registration: registration.id,
            course: course.id,
            section: payload.section,
        };
        if self.offered_courses.find_one(key).await?.is_some() {
            return Err(Error::bad_request(DUPLICATE_SECTION));
        }

        let candidate = payload.schedule();
        let _guard = self.locks.acquire(registration.id, faculty.id).await;

        let assigned = self
            .offered_courses
            .find_schedules(&ScheduleFilter {
                semester_registration: registration.id,
                faculty: faculty.id,
                days: candidate.days.clone(),
                exclude: None,
            })
            .await?;

        if has_time_conflict(&assigned, &candidate) {
            debug!(faculty = %faculty.id, assigned = assigned.len(), "Schedule conflict on create");
            return Err(Error::conflict(FACULTY_UNAVAILABLE));
        }

        let now = time::now();
        let record = OfferedCourse {
            id: uuid_utils::generate(),
            semester_registration: registration.id,
            academic_semester: registration.academic_semester,
            academic_faculty: academic_faculty.id,
            academic_department: academic_department.id,
            course: course.id,
            faculty: faculty.id,
            max_capacity: payload.max_capacity,
            section: payload.section,
            days: payload.days,
            start_time: payload.start_time,
            end_time: payload.end_time,
            created_at: now,
            updated_at: now,
        };

        let created = self.offered_courses.create(record).await?;
        info!(
            id = %created.id,
            course = %created.course,
            section = created.section,
            "Created offered course"
        );
        Ok(created)
    }

    /// Reachability of the offered-course store
    pub async fn check_storage(&self) -> Result<()> {
        self.offered_courses.ping().await
    }

    pub async fn get_all_offered_courses(&self, query: &OfferedCourseQuery) -> Result<Page<OfferedCourse>> {
        let query = query.resolve()?;
        self.offered_courses.find_all(&query).await
    }

    pub async fn get_single_offered_course(&self, id: Uuid) -> Result<OfferedCourse> {
        self.offered_courses
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(OFFERED_COURSE_NOT_FOUND))
    }

    /// Reassign the instructor or meeting time of an offering
    ///
    /// Only allowed while the offering's semester registration is UPCOMING.
    /// The availability check is keyed by the offering's own registration and
    /// the new instructor, and ignores the offering's current meeting.
    pub async fn update_offered_course(&self, id: Uuid, patch: UpdateOfferedCourse) -> Result<OfferedCourse> {
        patch.validate()?;

        let existing = self.get_single_offered_course(id).await?;
        let faculty = require_faculty(self.catalog.as_ref(), patch.faculty).await?;

        let registration =
            require_semester_registration(self.catalog.as_ref(), existing.semester_registration).await?;
        if let Err(e) = require_upcoming(&registration, "update") {
            warn!(id = %id, status = %registration.status, "Rejected offered course update");
            return Err(e);
        }

        let candidate = patch.schedule();
        let _guard = self.locks.acquire(registration.id, faculty.id).await;

        let assigned = self
            .offered_courses
            .find_schedules(&ScheduleFilter {
                semester_registration: registration.id,
                faculty: faculty.id,
                days: candidate.days.clone(),
                exclude: Some(existing.id),
            })
            .await?;

        if has_time_conflict(&assigned, &candidate) {
            debug!(faculty = %faculty.id, assigned = assigned.len(), "Schedule conflict on update");
            return Err(Error::conflict(FACULTY_UNAVAILABLE));
        }

        let updated = self
            .offered_courses
            .update(id, &patch)
            .await?
            .ok_or_else(|| Error::not_found(OFFERED_COURSE_NOT_FOUND))?;

        info!(id = %updated.id, faculty = %updated.faculty, "Updated offered course");
        Ok(updated)
    }

    /// Remove an offering while its semester registration is still UPCOMING
    pub async fn delete_offered_course(&self, id: Uuid) -> Result<()> {
        let existing = self.get_single_offered_course(id).await?;

        let registration =
            require_semester_registration(self.catalog.as_ref(), existing.semester_registration).await?;
        if let Err(e) = require_upcoming(&registration, "delete") {
            warn!(id = %id, status = %registration.status, "Rejected offered course delete");
            return Err(e);
        }

        if !self.offered_courses.delete(id).await? {
            return Err(Error::not_found(OFFERED_COURSE_NOT_FOUND));
        }

        info!(id = %id, "Deleted offered course");
        Ok(())
    }
}
