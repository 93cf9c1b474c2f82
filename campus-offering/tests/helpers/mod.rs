//! Shared fixtures for campus-offering integration tests
//!
//! A small catalog: two academic faculties, one department (under Science),
//! two courses, two instructors and two semester registrations.

#![allow(dead_code)]

use chrono::{Duration, NaiveTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

use campus_common::db::{
    AcademicDepartment, AcademicFaculty, Course, Faculty, RegistrationStatus, SemesterRegistration,
};
use campus_common::Weekday;
use campus_offering::payload::{CreateOfferedCourse, UpdateOfferedCourse};
use campus_offering::repository::{MemoryCatalog, MemoryOfferedCourses, SqliteCatalog, SqliteOfferedCourses};
use campus_offering::OfferedCourseService;

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub struct Catalog {
    pub registration: SemesterRegistration,
    pub other_registration: SemesterRegistration,
    pub science: AcademicFaculty,
    pub arts: AcademicFaculty,
    pub physics: AcademicDepartment,
    pub mechanics: Course,
    pub optics: Course,
    pub instructor: Faculty,
    pub other_instructor: Faculty,
}

fn registration(status: RegistrationStatus) -> SemesterRegistration {
    let start = Utc::now() + Duration::days(30);
    SemesterRegistration {
        id: Uuid::new_v4(),
        academic_semester: Uuid::new_v4(),
        status,
        start_date: start,
        end_date: start + Duration::days(120),
        min_credit: 3,
        max_credit: 16,
    }
}

impl Catalog {
    pub fn new() -> Self {
        let science = AcademicFaculty {
            id: Uuid::new_v4(),
            name: "Faculty of Science".to_string(),
        };
        let arts = AcademicFaculty {
            id: Uuid::new_v4(),
            name: "Faculty of Arts".to_string(),
        };
        let physics = AcademicDepartment {
            id: Uuid::new_v4(),
            name: "Department of Physics".to_string(),
            academic_faculty: science.id,
        };
        let mechanics = Course {
            id: Uuid::new_v4(),
            title: "Classical Mechanics".to_string(),
            prefix: "PHY".to_string(),
            code: 101,
            credits: 3,
        };
        let optics = Course {
            id: Uuid::new_v4(),
            title: "Optics".to_string(),
            prefix: "PHY".to_string(),
            code: 204,
            credits: 3,
        };
        let instructor = Faculty {
            id: Uuid::new_v4(),
            name: "Dr. Rahman".to_string(),
            designation: "Professor".to_string(),
            academic_department: physics.id,
        };
        let other_instructor = Faculty {
            id: Uuid::new_v4(),
            name: "Dr. Chowdhury".to_string(),
            designation: "Lecturer".to_string(),
            academic_department: physics.id,
        };

        Self {
            registration: registration(RegistrationStatus::Upcoming),
            other_registration: registration(RegistrationStatus::Upcoming),
            science,
            arts,
            physics,
            mechanics,
            optics,
            instructor,
            other_instructor,
        }
    }

    /// Create payload for the default registration, course and instructor
    pub fn payload(&self, section: i64, days: &[Weekday], start: NaiveTime, end: NaiveTime) -> CreateOfferedCourse {
        CreateOfferedCourse {
            semester_registration: self.registration.id,
            academic_faculty: self.science.id,
            academic_department: self.physics.id,
            course: self.mechanics.id,
            faculty: self.instructor.id,
            max_capacity: 40,
            section,
            days: days.iter().copied().collect(),
            start_time: start,
            end_time: end,
        }
    }

    pub fn patch(&self, faculty: Uuid, days: &[Weekday], start: NaiveTime, end: NaiveTime) -> UpdateOfferedCourse {
        UpdateOfferedCourse {
            faculty,
            days: days.iter().copied().collect(),
            start_time: start,
            end_time: end,
        }
    }

    pub async fn seed_memory(&self, catalog: &MemoryCatalog) {
        catalog.insert_semester_registration(self.registration.clone()).await;
        catalog.insert_semester_registration(self.other_registration.clone()).await;
        catalog.insert_academic_faculty(self.science.clone()).await;
        catalog.insert_academic_faculty(self.arts.clone()).await;
        catalog.insert_academic_department(self.physics.clone()).await;
        catalog.insert_course(self.mechanics.clone()).await;
        catalog.insert_course(self.optics.clone()).await;
        catalog.insert_faculty(self.instructor.clone()).await;
        catalog.insert_faculty(self.other_instructor.clone()).await;
    }

    pub async fn seed_sqlite(&self, pool: &SqlitePool) {
        for reg in [&self.registration, &self.other_registration] {
            sqlx::query(
                r#"
                INSERT INTO semester_registrations
                    (id, academic_semester_id, status, start_date, end_date, min_credit, max_credit)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(reg.id.to_string())
            .bind(reg.academic_semester.to_string())
            .bind(reg.status.as_str())
            .bind(reg.start_date)
            .bind(reg.end_date)
            .bind(reg.min_credit)
            .bind(reg.max_credit)
            .execute(pool)
            .await
            .unwrap();
        }

        for faculty in [&self.science, &self.arts] {
            sqlx::query("INSERT INTO academic_faculties (id, name) VALUES (?, ?)")
                .bind(faculty.id.to_string())
                .bind(&faculty.name)
                .execute(pool)
                .await
                .unwrap();
        }

        sqlx::query("INSERT INTO academic_departments (id, name, academic_faculty_id) VALUES (?, ?, ?)")
            .bind(self.physics.id.to_string())
            .bind(&self.physics.name)
            .bind(self.physics.academic_faculty.to_string())
            .execute(pool)
            .await
            .unwrap();

        for course in [&self.mechanics, &self.optics] {
            sqlx::query("INSERT INTO courses (id, title, prefix, code, credits) VALUES (?, ?, ?, ?, ?)")
                .bind(course.id.to_string())
                .bind(&course.title)
                .bind(&course.prefix)
                .bind(course.code)
                .bind(course.credits)
                .execute(pool)
                .await
                .unwrap();
        }

        for instructor in [&self.instructor, &self.other_instructor] {
            sqlx::query(
                "INSERT INTO faculties (id, name, designation, academic_department_id) VALUES (?, ?, ?, ?)",
            )
            .bind(instructor.id.to_string())
            .bind(&instructor.name)
            .bind(&instructor.designation)
            .bind(instructor.academic_department.to_string())
            .execute(pool)
            .await
            .unwrap();
        }
    }
}

/// Service over in-memory stores, with handles to both for direct inspection
pub struct MemoryHarness {
    pub catalog: Catalog,
    pub store: Arc<MemoryCatalog>,
    pub offered: Arc<MemoryOfferedCourses>,
    pub service: Arc<OfferedCourseService>,
}

impl MemoryHarness {
    pub async fn new() -> Self {
        let catalog = Catalog::new();
        let store = Arc::new(MemoryCatalog::new());
        catalog.seed_memory(&store).await;
        let offered = Arc::new(MemoryOfferedCourses::new());
        let service = Arc::new(OfferedCourseService::new(store.clone(), offered.clone()));

        Self {
            catalog,
            store,
            offered,
            service,
        }
    }

    pub async fn set_status(&self, status: RegistrationStatus) {
        let mut reg = self.catalog.registration.clone();
        reg.status = status;
        self.store.insert_semester_registration(reg).await;
    }
}

/// Service over a private in-memory SQLite database
pub async fn sqlite_service(catalog: &Catalog) -> (SqlitePool, OfferedCourseService) {
    let pool = campus_common::db::init_memory_database().await.unwrap();
    catalog.seed_sqlite(&pool).await;
    let service = OfferedCourseService::new(
        Arc::new(SqliteCatalog::new(pool.clone())),
        Arc::new(SqliteOfferedCourses::new(pool.clone())),
    );
    (pool, service)
}

pub async fn set_sqlite_status(pool: &SqlitePool, registration: Uuid, status: RegistrationStatus) {
    sqlx::query("UPDATE semester_registrations SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(registration.to_string())
        .execute(pool)
        .await
        .unwrap();
}
