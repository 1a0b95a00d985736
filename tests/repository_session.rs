mod common;

use chrono::{TimeDelta, Utc};
use pharmacy_api::domain::entities::{NewSession, StaffRole};
use pharmacy_api::domain::repositories::SessionRepository;
use pharmacy_api::infrastructure::persistence::PgSessionRepository;
use sqlx::PgPool;
use std::sync::Arc;

async fn setup(pool: &PgPool) -> (PgSessionRepository, i64, i64) {
    let pharmacy_id = common::create_test_pharmacy(pool, "Central Pharmacy").await;
    let staff_id =
        common::create_test_staff(pool, pharmacy_id, "ann@pharmacy.test", StaffRole::Pharmacist)
            .await;
    (
        PgSessionRepository::new(Arc::new(pool.clone())),
        pharmacy_id,
        staff_id,
    )
}

#[sqlx::test]
async fn test_find_identity(pool: PgPool) {
    let (repo, pharmacy_id, staff_id) = setup(&pool).await;

    repo.create(NewSession {
        staff_id,
        token_hash: "hash-live".to_string(),
        expires_at: Utc::now() + TimeDelta::hours(1),
    })
    .await
    .unwrap();

    let identity = repo.find_identity("hash-live").await.unwrap().unwrap();
    assert_eq!(identity.staff_id, staff_id);
    assert_eq!(identity.pharmacy_id, pharmacy_id);
    assert_eq!(identity.role, StaffRole::Pharmacist);

    assert!(repo.find_identity("hash-unknown").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_expired_and_revoked_sessions_are_rejected(pool: PgPool) {
    let (repo, _, staff_id) = setup(&pool).await;

    repo.create(NewSession {
        staff_id,
        token_hash: "hash-expired".to_string(),
        expires_at: Utc::now() - TimeDelta::minutes(1),
    })
    .await
    .unwrap();
    assert!(repo.find_identity("hash-expired").await.unwrap().is_none());

    repo.create(NewSession {
        staff_id,
        token_hash: "hash-revoked".to_string(),
        expires_at: Utc::now() + TimeDelta::hours(1),
    })
    .await
    .unwrap();
    assert!(repo.revoke("hash-revoked").await.unwrap());
    assert!(!repo.revoke("hash-revoked").await.unwrap());
    assert!(repo.find_identity("hash-revoked").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_deactivated_staff_cannot_authenticate(pool: PgPool) {
    let (repo, _, staff_id) = setup(&pool).await;

    repo.create(NewSession {
        staff_id,
        token_hash: "hash-live".to_string(),
        expires_at: Utc::now() + TimeDelta::hours(1),
    })
    .await
    .unwrap();

    sqlx::query("UPDATE staff SET active = FALSE WHERE id = $1")
        .bind(staff_id)
        .execute(&pool)
        .await
        .unwrap();

    assert!(repo.find_identity("hash-live").await.unwrap().is_none());
}
