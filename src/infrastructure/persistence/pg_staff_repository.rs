//! PostgreSQL implementation of the staff repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewStaff, Staff};
use crate::domain::repositories::StaffRepository;
use crate::error::AppError;

const COLUMNS: &str = "id, pharmacy_id, email, name, role, password_hash, active, created_at";

pub struct PgStaffRepository {
    pool: Arc<PgPool>,
}

impl PgStaffRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaffRepository for PgStaffRepository {
    async fn create(&self, new_staff: NewStaff) -> Result<Staff, AppError> {
        let sql = format!(
            "INSERT INTO staff (pharmacy_id, email, name, role, password_hash)
             VALUES ($1, LOWER($2), $3, $4, $5)
             RETURNING {COLUMNS}"
        );

        let staff = sqlx::query_as::<_, Staff>(&sql)
            .bind(new_staff.pharmacy_id)
            .bind(new_staff.email)
            .bind(new_staff.name)
            .bind(new_staff.role.as_str())
            .bind(new_staff.password_hash)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(staff)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Staff>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM staff WHERE email = LOWER($1)");

        let staff = sqlx::query_as::<_, Staff>(&sql)
            .bind(email)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(staff)
    }

    async fn list(&self, pharmacy_id: i64) -> Result<Vec<Staff>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM staff WHERE pharmacy_id = $1 ORDER BY name, id");

        let staff = sqlx::query_as::<_, Staff>(&sql)
            .bind(pharmacy_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(staff)
    }
}
