//! In-memory stores
//!
//! Same observable behavior as the SQLite stores, including the
//! duplicate-section rejection on create.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use campus_common::db::{
    AcademicDepartment, AcademicFaculty, Course, Faculty, OfferedCourse, SemesterRegistration,
};
use campus_common::{Error, Result};

use super::{
    CatalogStore, DepartmentFilter, OfferedCourseRepository, ScheduleFilter, SectionKey,
    DUPLICATE_SECTION,
};
use crate::pagination::{Page, PageMeta};
use crate::payload::UpdateOfferedCourse;
use crate::query::ListQuery;
use crate::schedule::ScheduleBlock;

/// Master data held in maps, filled through the `insert_*` methods
#[derive(Default)]
pub struct MemoryCatalog {
    semester_registrations: RwLock<HashMap<Uuid, SemesterRegistration>>,
    academic_faculties: RwLock<HashMap<Uuid, AcademicFaculty>>,
    academic_departments: RwLock<HashMap<Uuid, AcademicDepartment>>,
    courses: RwLock<HashMap<Uuid, Course>>,
    faculties: RwLock<HashMap<Uuid, Faculty>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_semester_registration(&self, value: SemesterRegistration) {
        self.semester_registrations.write().await.insert(value.id, value);
    }

    pub async fn insert_academic_faculty(&self, value: AcademicFaculty) {
        self.academic_faculties.write().await.insert(value.id, value);
    }

    pub async fn insert_academic_department(&self, value: AcademicDepartment) {
        self.academic_departments.write().await.insert(value.id, value);
    }

    pub async fn insert_course(&self, value: Course) {
        self.courses.write().await.insert(value.id, value);
    }

    pub async fn insert_faculty(&self, value: Faculty) {
        self.faculties.write().await.insert(value.id, value);
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn find_semester_registration(&self, id: Uuid) -> Result<Option<SemesterRegistration>> {
        Ok(self.semester_registrations.read().await.get(&id).cloned())
    }

    async fn find_academic_faculty(&self, id: Uuid) -> Result<Option<AcademicFaculty>> {
        Ok(self.academic_faculties.read().await.get(&id).cloned())
    }

    async fn find_academic_department(&self, id: Uuid) -> Result<Option<AcademicDepartment>> {
        Ok(self.academic_departments.read().await.get(&id).cloned())
    }

    async fn find_departments(&self, filter: DepartmentFilter) -> Result<Vec<AcademicDepartment>> {
        Ok(self
            .academic_departments
            .read()
            .await
            .values()
            .filter(|d| d.id == filter.id && d.academic_faculty == filter.academic_faculty)
            .cloned()
            .collect())
    }

    async fn find_course(&self, id: Uuid) -> Result<Option<Course>> {
        Ok(self.courses.read().await.get(&id).cloned())
    }

    async fn find_faculty(&self, id: Uuid) -> Result<Option<Faculty>> {
        Ok(self.faculties.read().await.get(&id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryOfferedCourses {
    records: RwLock<HashMap<Uuid, OfferedCourse>>,
}

impl MemoryOfferedCourses {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl OfferedCourseRepository for MemoryOfferedCourses {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OfferedCourse>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn find_one(&self, key: SectionKey) -> Result<Option<OfferedCourse>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|r| {
                r.semester_registration == key.semester_registration
                    && r.course == key.course
                    && r.section == key.section
            })
            .cloned())
    }

    async fn find_schedules(&self, filter: &ScheduleFilter) -> Result<Vec<ScheduleBlock>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|r| filter.matches(r))
            .map(ScheduleBlock::from)
            .collect())
    }

    async fn find_all(&self, query: &ListQuery) -> Result<Page<OfferedCourse>> {
        let records = self.records.read().await;
        let mut matching: Vec<&OfferedCourse> = records.values().filter(|r| query.matches(r)).collect();
        matching.sort_by(|a, b| query.compare(a, b));

        let total = matching.len() as i64;
        let data = matching
            .into_iter()
            .skip(usize::try_from(query.pagination.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(query.pagination.limit).unwrap_or(0))
            .cloned()
            .collect();

        Ok(Page {
            meta: PageMeta::new(&query.pagination, total),
            data,
        })
    }

    async fn create(&self, record: OfferedCourse) -> Result<OfferedCourse> {
        let mut records = self.records.write().await;

        let duplicate = records.values().any(|r| {
            r.semester_registration == record.semester_registration
                && r.course == record.course
                && r.section == record.section
        });
        if duplicate {
            return Err(Error::bad_request(DUPLICATE_SECTION));
        }

        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, patch: &UpdateOfferedCourse) -> Result<Option<OfferedCourse>> {
        let mut records = self.records.write().await;
        let Some(record) = records.get_mut(&id) else {
            return Ok(None);
        };

        record.faculty = patch.faculty;
        record.days = patch.days.clone();
        record.start_time = patch.start_time;
        record.end_time = patch.end_time;
        record.updated_at = campus_common::time::now();

        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
