//! PostgreSQL implementation of the customer repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::like_pattern;
use crate::domain::entities::{Customer, CustomerPatch, HealthRecord, NewCustomer, NewHealthRecord};
use crate::domain::repositories::CustomerRepository;
use crate::error::AppError;

const COLUMNS: &str = "id, pharmacy_id, name, email, phone, date_of_birth, address, \
                       latitude, longitude, created_at, updated_at";

const SEARCH: &str = "($2::text IS NULL OR name ILIKE $2 OR email ILIKE $2 OR phone ILIKE $2)";

pub struct PgCustomerRepository {
    pool: Arc<PgPool>,
}

impl PgCustomerRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn create(&self, new_customer: NewCustomer) -> Result<Customer, AppError> {
        let sql = format!(
            "INSERT INTO customers (pharmacy_id, name, email, phone, date_of_birth, address, latitude, longitude)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(new_customer.pharmacy_id)
            .bind(new_customer.name)
            .bind(new_customer.email)
            .bind(new_customer.phone)
            .bind(new_customer.date_of_birth)
            .bind(new_customer.address)
            .bind(new_customer.latitude)
            .bind(new_customer.longitude)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(customer)
    }

    async fn find_by_id(&self, pharmacy_id: i64, id: i64) -> Result<Option<Customer>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM customers WHERE pharmacy_id = $1 AND id = $2");

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(pharmacy_id)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(customer)
    }

    async fn list(
        &self,
        pharmacy_id: i64,
        query: Option<String>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Customer>, AppError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM customers
             WHERE pharmacy_id = $1 AND {SEARCH}
             ORDER BY name, id
             LIMIT $3 OFFSET $4"
        );

        let customers = sqlx::query_as::<_, Customer>(&sql)
            .bind(pharmacy_id)
            .bind(like_pattern(query))
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(customers)
    }

    async fn count(&self, pharmacy_id: i64, query: Option<String>) -> Result<i64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM customers WHERE pharmacy_id = $1 AND {SEARCH}");

        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(pharmacy_id)
            .bind(like_pattern(query))
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn update(
        &self,
        pharmacy_id: i64,
        id: i64,
        patch: CustomerPatch,
    ) -> Result<Option<Customer>, AppError> {
        let set_coordinates = patch.coordinates.is_some();
        let (latitude, longitude) = patch.coordinates.flatten().unzip();

        let sql = format!(
            "UPDATE customers SET
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                date_of_birth = COALESCE($6, date_of_birth),
                address = COALESCE($7, address),
                latitude = CASE WHEN $8 THEN $9 ELSE latitude END,
                longitude = CASE WHEN $8 THEN $10 ELSE longitude END,
                updated_at = NOW()
             WHERE pharmacy_id = $1 AND id = $2
             RETURNING {COLUMNS}"
        );

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(pharmacy_id)
            .bind(id)
            .bind(patch.name)
            .bind(patch.email)
            .bind(patch.phone)
            .bind(patch.date_of_birth)
            .bind(patch.address)
            .bind(set_coordinates)
            .bind(latitude)
            .bind(longitude)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(customer)
    }

    async fn add_health_record(&self, record: NewHealthRecord) -> Result<HealthRecord, AppError> {
        let record = sqlx::query_as::<_, HealthRecord>(
            "INSERT INTO health_records (pharmacy_id, customer_id, kind, description)
             VALUES ($1, $2, $3, $4)
             RETURNING id, pharmacy_id, customer_id, kind, description, recorded_at",
        )
        .bind(record.pharmacy_id)
        .bind(record.customer_id)
        .bind(record.kind.as_str())
        .bind(record.description)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn list_health_records(
        &self,
        pharmacy_id: i64,
        customer_id: i64,
    ) -> Result<Vec<HealthRecord>, AppError> {
        let records = sqlx::query_as::<_, HealthRecord>(
            "SELECT id, pharmacy_id, customer_id, kind, description, recorded_at
             FROM health_records
             WHERE pharmacy_id = $1 AND customer_id = $2
             ORDER BY recorded_at DESC, id DESC",
        )
        .bind(pharmacy_id)
        .bind(customer_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(records)
    }
}
