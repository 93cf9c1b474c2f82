//! Database initialization
//!
//! Creates the database on first run and brings the schema up idempotently.
//! Master-data tables are owned by other campus modules; they are created
//! here so a fresh root folder is usable.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the full schema
///
/// Limited to a single connection: every SQLite `:memory:` connection is a
/// separate database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    create_academic_faculties_table(pool).await?;
    create_academic_departments_table(pool).await?;
    create_courses_table(pool).await?;
    create_faculties_table(pool).await?;
    create_semester_registrations_table(pool).await?;
    create_offered_courses_table(pool).await?;

    Ok(())
}

async fn create_academic_faculties_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS academic_faculties (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_academic_departments_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS academic_departments (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            academic_faculty_id TEXT NOT NULL REFERENCES academic_faculties(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_courses_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL UNIQUE,
            prefix TEXT NOT NULL,
            code INTEGER NOT NULL,
            credits INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_faculties_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS faculties (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            designation TEXT NOT NULL,
            academic_department_id TEXT NOT NULL REFERENCES academic_departments(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_semester_registrations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS semester_registrations (
            id TEXT PRIMARY KEY,
            academic_semester_id TEXT NOT NULL UNIQUE,
            status TEXT NOT NULL DEFAULT 'UPCOMING'
                CHECK (status IN ('UPCOMING', 'ONGOING', 'ENDED')),
            start_date TIMESTAMP NOT NULL,
            end_date TIMESTAMP NOT NULL,
            min_credit INTEGER NOT NULL DEFAULT 3,
            max_credit INTEGER NOT NULL DEFAULT 15
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Offered courses
///
/// `days` holds a JSON array of weekday names. The unique index closes the
/// duplicate-section race between concurrent creates.
async fn create_offered_courses_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS offered_courses (
            id TEXT PRIMARY KEY,
            semester_registration_id TEXT NOT NULL REFERENCES semester_registrations(id),
            academic_semester_id TEXT NOT NULL,
            academic_faculty_id TEXT NOT NULL REFERENCES academic_faculties(id),
            academic_department_id TEXT NOT NULL REFERENCES academic_departments(id),
            course_id TEXT NOT NULL REFERENCES courses(id),
            faculty_id TEXT NOT NULL REFERENCES faculties(id),
            max_capacity INTEGER NOT NULL CHECK (max_capacity > 0),
            section INTEGER NOT NULL CHECK (section > 0),
            days TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (start_time < end_time)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_offered_courses_section
            ON offered_courses (semester_registration_id, course_id, section)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_offered_courses_faculty
            ON offered_courses (semester_registration_id, faculty_id)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
