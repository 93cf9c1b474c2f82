//! SQLite-backed stores
//!
//! Ids are stored as hyphenated UUID text, meeting days as a JSON array of
//! weekday names, meeting times as zero-padded `HH:MM` text (so string
//! comparison orders them correctly).

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::collections::BTreeSet;
use tracing::debug;
use uuid::Uuid;

use campus_common::db::{
    AcademicDepartment, AcademicFaculty, Course, Faculty, OfferedCourse, RegistrationStatus,
    SemesterRegistration,
};
use campus_common::time::{format_time_of_day, parse_time_of_day};
use campus_common::uuid_utils::parse_stored;
use campus_common::{Error, Result, Weekday};

use super::{
    CatalogStore, DepartmentFilter, OfferedCourseRepository, ScheduleFilter, SectionKey,
    DUPLICATE_SECTION,
};
use crate::pagination::{Page, PageMeta};
use crate::payload::UpdateOfferedCourse;
use crate::query::ListQuery;
use crate::schedule::ScheduleBlock;

const OFFERED_COURSE_COLUMNS: &str = "id, semester_registration_id, academic_semester_id, \
    academic_faculty_id, academic_department_id, course_id, faculty_id, max_capacity, section, \
    days, start_time, end_time, created_at, updated_at";

/// Master-data lookups
#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn find_semester_registration(&self, id: Uuid) -> Result<Option<SemesterRegistration>> {
        let row = sqlx::query(
            r#"
            SELECT id, academic_semester_id, status, start_date, end_date, min_credit, max_credit
            FROM semester_registrations
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(semester_registration_from_row).transpose()
    }

    async fn find_academic_faculty(&self, id: Uuid) -> Result<Option<AcademicFaculty>> {
        let row = sqlx::query("SELECT id, name FROM academic_faculties WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(academic_faculty_from_row).transpose()
    }

    async fn find_academic_department(&self, id: Uuid) -> Result<Option<AcademicDepartment>> {
        let row = sqlx::query(
            "SELECT id, name, academic_faculty_id FROM academic_departments WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(department_from_row).transpose()
    }

    async fn find_departments(&self, filter: DepartmentFilter) -> Result<Vec<AcademicDepartment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, academic_faculty_id
            FROM academic_departments
            WHERE id = ? AND academic_faculty_id = ?
            "#,
        )
        .bind(filter.id.to_string())
        .bind(filter.academic_faculty.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(department_from_row).collect()
    }

    async fn find_course(&self, id: Uuid) -> Result<Option<Course>> {
        let row = sqlx::query("SELECT id, title, prefix, code, credits FROM courses WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(course_from_row).transpose()
    }

    async fn find_faculty(&self, id: Uuid) -> Result<Option<Faculty>> {
        let row = sqlx::query(
            "SELECT id, name, designation, academic_department_id FROM faculties WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(faculty_from_row).transpose()
    }
}

/// Offered-course store
#[derive(Clone)]
pub struct SqliteOfferedCourses {
    pool: SqlitePool,
}

impl SqliteOfferedCourses {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfferedCourseRepository for SqliteOfferedCourses {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<OfferedCourse>> {
        let sql = format!("SELECT {} FROM offered_courses WHERE id = ?", OFFERED_COURSE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(offered_course_from_row).transpose()
    }

    async fn find_one(&self, key: SectionKey) -> Result<Option<OfferedCourse>> {
        let sql = format!(
            "SELECT {} FROM offered_courses \
             WHERE semester_registration_id = ? AND course_id = ? AND section = ?",
            OFFERED_COURSE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(key.semester_registration.to_string())
            .bind(key.course.to_string())
            .bind(key.section)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(offered_course_from_row).transpose()
    }

    async fn find_schedules(&self, filter: &ScheduleFilter) -> Result<Vec<ScheduleBlock>> {
        if filter.days.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT days, start_time, end_time FROM offered_courses WHERE semester_registration_id = ",
        );
        qb.push_bind(filter.semester_registration.to_string());
        qb.push(" AND faculty_id = ");
        qb.push_bind(filter.faculty.to_string());
        if let Some(exclude) = filter.exclude {
            qb.push(" AND id <> ");
            qb.push_bind(exclude.to_string());
        }
        push_days_filter(&mut qb, filter.days.iter());

        let rows = qb.build().fetch_all(&self.pool).await?;
        debug!(
            semester_registration = %filter.semester_registration,
            faculty = %filter.faculty,
            count = rows.len(),
            "Fetched assigned schedules"
        );

        rows.iter().map(schedule_from_row).collect()
    }

    async fn find_all(&self, query: &ListQuery) -> Result<Page<OfferedCourse>> {
        let mut count_qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM offered_courses WHERE 1 = 1");
        push_list_filters(&mut count_qb, query);
        let total: i64 = count_qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM offered_courses WHERE 1 = 1",
            OFFERED_COURSE_COLUMNS
        ));
        push_list_filters(&mut qb, query);

        // Column name comes from a fixed whitelist
        let direction = if query.sort.descending { "DESC" } else { "ASC" };
        qb.push(format!(
            " ORDER BY {} {}, id ASC LIMIT ",
            query.sort.field.column(),
            direction
        ));
        qb.push_bind(query.pagination.limit);
        qb.push(" OFFSET ");
        qb.push_bind(query.pagination.offset);

        let rows = qb.build().fetch_all(&self.pool).await?;
        let data = rows
            .iter()
            .map(offered_course_from_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page {
            meta: PageMeta::new(&query.pagination, total),
            data,
        })
    }

    async fn create(&self, record: OfferedCourse) -> Result<OfferedCourse> {
        let result = sqlx::query(
            r#"
            INSERT INTO offered_courses (
                id, semester_registration_id, academic_semester_id,
                academic_faculty_id, academic_department_id, course_id, faculty_id,
                max_capacity, section, days, start_time, end_time,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.semester_registration.to_string())
        .bind(record.academic_semester.to_string())
        .bind(record.academic_faculty.to_string())
        .bind(record.academic_department.to_string())
        .bind(record.course.to_string())
        .bind(record.faculty.to_string())
        .bind(record.max_capacity)
        .bind(record.section)
        .bind(days_to_json(&record.days)?)
        .bind(format_time_of_day(&record.start_time))
        .bind(format_time_of_day(&record.end_time))
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(record),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(Error::bad_request(DUPLICATE_SECTION))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, id: Uuid, patch: &UpdateOfferedCourse) -> Result<Option<OfferedCourse>> {
        let result = sqlx::query(
            r#"
            UPDATE offered_courses
            SET faculty_id = ?, days = ?, start_time = ?, end_time = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(patch.faculty.to_string())
        .bind(days_to_json(&patch.days)?)
        .bind(format_time_of_day(&patch.start_time))
        .bind(format_time_of_day(&patch.end_time))
        .bind(campus_common::time::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM offered_courses WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1 FROM offered_courses LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(())
    }
}

fn push_days_filter<'w>(qb: &mut QueryBuilder<'_, Sqlite>, days: impl Iterator<Item = &'w Weekday>) {
    let mut days = days.peekable();
    if days.peek().is_none() {
        return;
    }

    qb.push(" AND EXISTS (SELECT 1 FROM json_each(offered_courses.days) WHERE json_each.value IN (");
    let mut separated = qb.separated(", ");
    for day in days {
        separated.push_bind(day.as_str());
    }
    separated.push_unseparated("))");
}

fn push_list_filters(qb: &mut QueryBuilder<'_, Sqlite>, query: &ListQuery) {
    let id_filters = [
        ("semester_registration_id", query.semester_registration),
        ("academic_semester_id", query.academic_semester),
        ("academic_faculty_id", query.academic_faculty),
        ("academic_department_id", query.academic_department),
        ("course_id", query.course),
        ("faculty_id", query.faculty),
    ];
    for (column, value) in id_filters {
        if let Some(id) = value {
            qb.push(format!(" AND {} = ", column));
            qb.push_bind(id.to_string());
        }
    }

    if let Some(section) = query.section {
        qb.push(" AND section = ");
        qb.push_bind(section);
    }

    push_days_filter(qb, query.days.iter());
}

fn uuid_column(row: &SqliteRow, column: &str) -> Result<Uuid> {
    let raw: String = row.try_get(column)?;
    parse_stored(column, &raw)
}

fn time_column(row: &SqliteRow, column: &str) -> Result<chrono::NaiveTime> {
    let raw: String = row.try_get(column)?;
    parse_time_of_day(&raw)
        .map_err(|_| Error::Internal(format!("Corrupt {} value {:?}", column, raw)))
}

fn days_column(row: &SqliteRow) -> Result<BTreeSet<Weekday>> {
    let raw: String = row.try_get("days")?;
    serde_json::from_str(&raw).map_err(|e| Error::Internal(format!("Corrupt days value {:?}: {}", raw, e)))
}

fn days_to_json(days: &BTreeSet<Weekday>) -> Result<String> {
    serde_json::to_string(days).map_err(|e| Error::Internal(format!("Cannot encode days: {}", e)))
}

fn schedule_from_row(row: &SqliteRow) -> Result<ScheduleBlock> {
    Ok(ScheduleBlock {
        days: days_column(row)?,
        start_time: time_column(row, "start_time")?,
        end_time: time_column(row, "end_time")?,
    })
}

fn semester_registration_from_row(row: &SqliteRow) -> Result<SemesterRegistration> {
    let status: String = row.try_get("status")?;
    Ok(SemesterRegistration {
        id: uuid_column(row, "id")?,
        academic_semester: uuid_column(row, "academic_semester_id")?,
        status: status.parse::<RegistrationStatus>()?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        min_credit: row.try_get("min_credit")?,
        max_credit: row.try_get("max_credit")?,
    })
}

fn academic_faculty_from_row(row: &SqliteRow) -> Result<AcademicFaculty> {
    Ok(AcademicFaculty {
        id: uuid_column(row, "id")?,
        name: row.try_get("name")?,
    })
}

fn course_from_row(row: &SqliteRow) -> Result<Course> {
    Ok(Course {
        id: uuid_column(row, "id")?,
        title: row.try_get("title")?,
        prefix: row.try_get("prefix")?,
        code: row.try_get("code")?,
        credits: row.try_get("credits")?,
    })
}

fn faculty_from_row(row: &SqliteRow) -> Result<Faculty> {
    Ok(Faculty {
        id: uuid_column(row, "id")?,
        name: row.try_get("name")?,
        designation: row.try_get("designation")?,
        academic_department: uuid_column(row, "academic_department_id")?,
    })
}

fn department_from_row(row: &SqliteRow) -> Result<AcademicDepartment> {
    Ok(AcademicDepartment {
        id: uuid_column(row, "id")?,
        name: row.try_get("name")?,
        academic_faculty: uuid_column(row, "academic_faculty_id")?,
    })
}

fn offered_course_from_row(row: &SqliteRow) -> Result<OfferedCourse> {
    Ok(OfferedCourse {
        id: uuid_column(row, "id")?,
        semester_registration: uuid_column(row, "semester_registration_id")?,
        academic_semester: uuid_column(row, "academic_semester_id")?,
        academic_faculty: uuid_column(row, "academic_faculty_id")?,
        academic_department: uuid_column(row, "academic_department_id")?,
        course: uuid_column(row, "course_id")?,
        faculty: uuid_column(row, "faculty_id")?,
        max_capacity: row.try_get("max_capacity")?,
        section: row.try_get("section")?,
        days: days_column(row)?,
        start_time: time_column(row, "start_time")?,
        end_time: time_column(row, "end_time")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
