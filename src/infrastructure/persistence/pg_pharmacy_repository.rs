//! PostgreSQL implementation of the pharmacy repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewPharmacy, Pharmacy, PharmacyPatch};
use crate::domain::repositories::PharmacyRepository;
use crate::error::AppError;

const COLUMNS: &str = "id, name, address, phone, latitude, longitude, created_at, updated_at";

pub struct PgPharmacyRepository {
    pool: Arc<PgPool>,
}

impl PgPharmacyRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PharmacyRepository for PgPharmacyRepository {
    async fn create(&self, new_pharmacy: NewPharmacy) -> Result<Pharmacy, AppError> {
        let sql = format!(
            "INSERT INTO pharmacies (name, address, phone, latitude, longitude)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );

        let pharmacy = sqlx::query_as::<_, Pharmacy>(&sql)
            .bind(new_pharmacy.name)
            .bind(new_pharmacy.address)
            .bind(new_pharmacy.phone)
            .bind(new_pharmacy.latitude)
            .bind(new_pharmacy.longitude)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(pharmacy)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Pharmacy>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM pharmacies WHERE id = $1");

        let pharmacy = sqlx::query_as::<_, Pharmacy>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(pharmacy)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Pharmacy>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM pharmacies WHERE name = $1");

        let pharmacy = sqlx::query_as::<_, Pharmacy>(&sql)
            .bind(name)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(pharmacy)
    }

    async fn update(&self, id: i64, patch: PharmacyPatch) -> Result<Option<Pharmacy>, AppError> {
        let set_coordinates = patch.coordinates.is_some();
        let (latitude, longitude) = patch.coordinates.flatten().unzip();

        let sql = format!(
            "UPDATE pharmacies SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                phone = COALESCE($4, phone),
                latitude = CASE WHEN $5 THEN $6 ELSE latitude END,
                longitude = CASE WHEN $5 THEN $7 ELSE longitude END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );

        let pharmacy = sqlx::query_as::<_, Pharmacy>(&sql)
            .bind(id)
            .bind(patch.name)
            .bind(patch.address)
            .bind(patch.phone)
            .bind(set_coordinates)
            .bind(latitude)
            .bind(longitude)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(pharmacy)
    }
}
