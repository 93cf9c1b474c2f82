//! Reference validators
//!
//! Each lookup resolves a referenced entity or fails with `Error::NotFound`
//! naming it. None of them write.

use uuid::Uuid;

use campus_common::db::{
    AcademicDepartment, AcademicFaculty, Course, Faculty, RegistrationStatus, SemesterRegistration,
};
use campus_common::{Error, Result};

use crate::repository::{CatalogStore, DepartmentFilter};

pub async fn require_semester_registration(
    catalog: &dyn CatalogStore,
    id: Uuid,
) -> Result<SemesterRegistration> {
    catalog
        .find_semester_registration(id)
        .await?
        .ok_or_else(|| Error::not_found("Semester registration is not found"))
}

pub async fn require_academic_faculty(catalog: &dyn CatalogStore, id: Uuid) -> Result<AcademicFaculty> {
    catalog
        .find_academic_faculty(id)
        .await?
        .ok_or_else(|| Error::not_found("Academic Faculty is not found"))
}

pub async fn require_academic_department(
    catalog: &dyn CatalogStore,
    id: Uuid,
) -> Result<AcademicDepartment> {
    catalog
        .find_academic_department(id)
        .await?
        .ok_or_else(|| Error::not_found("Academic Department is not found"))
}

pub async fn require_course(catalog: &dyn CatalogStore, id: Uuid) -> Result<Course> {
    catalog
        .find_course(id)
        .await?
        .ok_or_else(|| Error::not_found("Course is not found"))
}

pub async fn require_faculty(catalog: &dyn CatalogStore, id: Uuid) -> Result<Faculty> {
    catalog
        .find_faculty(id)
        .await?
        .ok_or_else(|| Error::not_found("Faculty is not found"))
}

/// Fails unless the department is registered under the academic faculty
///
/// An empty match list is a failure.
pub async fn require_department_in_faculty(
    catalog: &dyn CatalogStore,
    department: &AcademicDepartment,
    faculty: &AcademicFaculty,
) -> Result<()> {
    let matches = catalog
        .find_departments(DepartmentFilter {
            id: department.id,
            academic_faculty: faculty.id,
        })
        .await?;

    if matches.is_empty() {
        return Err(Error::bad_request(format!(
            "This {} is not belong to {}",
            department.name, faculty.name
        )));
    }

    Ok(())
}

/// Offered courses can only change while registration has not opened
pub fn require_upcoming(registration: &SemesterRegistration, action: &str) -> Result<()> {
    if registration.status != RegistrationStatus::Upcoming {
        return Err(Error::bad_request(format!(
            "You can not {} this offered course as it is {}",
            action, registration.status
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryCatalog;
    use chrono::Utc;

    fn registration(status: RegistrationStatus) -> SemesterRegistration {
        SemesterRegistration {
            id: Uuid::new_v4(),
            academic_semester: Uuid::new_v4(),
            status,
            start_date: Utc::now(),
            end_date: Utc::now(),
            min_credit: 3,
            max_credit: 16,
        }
    }

    #[tokio::test]
    async fn test_missing_entities_are_not_found() {
        let catalog = MemoryCatalog::new();
        let id = Uuid::new_v4();

        let err = require_course(&catalog, id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(ref m) if m == "Course is not found"));

        let err = require_semester_registration(&catalog, id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_department_outside_faculty_is_rejected() {
        let catalog = MemoryCatalog::new();
        let science = AcademicFaculty { id: Uuid::new_v4(), name: "Faculty of Science".into() };
        let arts = AcademicFaculty { id: Uuid::new_v4(), name: "Faculty of Arts".into() };
        let physics = AcademicDepartment {
            id: Uuid::new_v4(),
            name: "Department of Physics".into(),
            academic_faculty: science.id,
        };
        catalog.insert_academic_faculty(science.clone()).await;
        catalog.insert_academic_faculty(arts.clone()).await;
        catalog.insert_academic_department(physics.clone()).await;

        assert!(require_department_in_faculty(&catalog, &physics, &science).await.is_ok());

        let err = require_department_in_faculty(&catalog, &physics, &arts).await.unwrap_err();
        match err {
            Error::BadRequest(msg) => {
                assert!(msg.contains("Department of Physics"));
                assert!(msg.contains("Faculty of Arts"));
            }
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_require_upcoming() {
        assert!(require_upcoming(&registration(RegistrationStatus::Upcoming), "update").is_ok());

        let err = require_upcoming(&registration(RegistrationStatus::Ongoing), "update").unwrap_err();
        assert!(matches!(err, Error::BadRequest(ref m) if m.ends_with("as it is ONGOING")));

        let err = require_upcoming(&registration(RegistrationStatus::Ended), "delete").unwrap_err();
        assert!(matches!(err, Error::BadRequest(ref m) if m.contains("delete")));
    }
}
