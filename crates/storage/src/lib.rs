use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{NewVolunteer, VolunteerId, VolunteerRecord};

/// Persistence for volunteer submissions. Records are append-only.
#[async_trait]
pub trait VolunteerStore: Send + Sync {
    async fn insert_volunteer(&self, volunteer: &NewVolunteer) -> Result<VolunteerId>;
    async fn load_volunteer(&self, volunteer_id: VolunteerId) -> Result<Option<VolunteerRecord>>;
    async fn list_volunteers(&self) -> Result<Vec<VolunteerRecord>>;
    async fn count_volunteers(&self) -> Result<i64>;
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }
}

#[async_trait]
impl VolunteerStore for Storage {
    async fn insert_volunteer(&self, volunteer: &NewVolunteer) -> Result<VolunteerId> {
        let rec = sqlx::query(
            "INSERT INTO volunteers (name, email, phone, dob, gender, interest, why)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&volunteer.name)
        .bind(&volunteer.email)
        .bind(&volunteer.phone)
        .bind(volunteer.date_of_birth.as_deref())
        .bind(&volunteer.gender)
        .bind(&volunteer.interest)
        .bind(&volunteer.motivation)
        .fetch_one(&self.pool)
        .await
        .context("failed to insert volunteer")?;
        Ok(VolunteerId(rec.get::<i64, _>(0)))
    }

    async fn load_volunteer(&self, volunteer_id: VolunteerId) -> Result<Option<VolunteerRecord>> {
        let row = sqlx::query(
            "SELECT id, name, email, phone, dob, gender, interest, why
             FROM volunteers WHERE id = ?",
        )
        .bind(volunteer_id.0)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| volunteer_from_row(&r)).transpose()
    }

    async fn list_volunteers(&self) -> Result<Vec<VolunteerRecord>> {
        let rows = sqlx::query(
            "SELECT id, name, email, phone, dob, gender, interest, why
             FROM volunteers ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(volunteer_from_row).collect()
    }

    async fn count_volunteers(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM volunteers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn volunteer_from_row(row: &SqliteRow) -> Result<VolunteerRecord> {
    Ok(VolunteerRecord {
        id: VolunteerId(row.try_get("id")?),
        volunteer: NewVolunteer {
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            date_of_birth: row.try_get("dob")?,
            gender: row.try_get("gender")?,
            interest: row.try_get("interest")?,
            motivation: row.try_get("why")?,
        },
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
