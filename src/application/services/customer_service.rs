//! Customers and their health history.

use serde_json::json;
use std::sync::Arc;

use super::geo_service::GeoService;
use super::page::{Page, offset_limit};
use crate::domain::entities::{
    Customer, CustomerPatch, HealthRecord, HealthRecordKind, NewCustomer, NewHealthRecord,
};
use crate::domain::repositories::CustomerRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, keys};

pub struct CustomerService<C: CustomerRepository> {
    repository: Arc<C>,
    cache: CacheService,
    geo: GeoService,
}

impl<C: CustomerRepository> CustomerService<C> {
    pub fn new(repository: Arc<C>, cache: CacheService, geo: GeoService) -> Self {
        Self {
            repository,
            cache,
            geo,
        }
    }

    fn not_found(id: i64) -> AppError {
        AppError::not_found("Customer not found", json!({ "id": id }))
    }

    /// Creates a customer, geocoding the address when present.
    pub async fn create(&self, mut new_customer: NewCustomer) -> Result<Customer, AppError> {
        if new_customer.latitude.is_none()
            && let Some(address) = new_customer.address.as_deref()
            && let Some((lat, lng)) = self.geo.locate(address).await
        {
            new_customer.latitude = Some(lat);
            new_customer.longitude = Some(lng);
        }

        let customer = self.repository.create(new_customer).await?;
        tracing::info!(
            pharmacy_id = customer.pharmacy_id,
            customer_id = customer.id,
            "customer created"
        );
        Ok(customer)
    }

    pub async fn get(&self, pharmacy_id: i64, id: i64) -> Result<Customer, AppError> {
        let repository = self.repository.clone();

        self.cache
            .get_or_compute(&keys::customer(pharmacy_id, id), None, || async move {
                repository.find_by_id(pharmacy_id, id).await
            })
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn list(
        &self,
        pharmacy_id: i64,
        page: u32,
        page_size: u32,
        query: Option<String>,
    ) -> Result<Page<Customer>, AppError> {
        let (offset, limit) = offset_limit(page, page_size);
        let items = self
            .repository
            .list(pharmacy_id, query.clone(), offset, limit)
            .await?;
        let total = self.repository.count(pharmacy_id, query).await?;

        Ok(Page {
            items,
            page,
            page_size,
            total,
        })
    }

    /// Updates a customer. A changed address is re-geocoded unless
    /// coordinates are part of the patch.
    pub async fn update(
        &self,
        pharmacy_id: i64,
        id: i64,
        mut patch: CustomerPatch,
    ) -> Result<Customer, AppError> {
        if patch.name.is_none()
            && patch.email.is_none()
            && patch.phone.is_none()
            && patch.date_of_birth.is_none()
            && patch.address.is_none()
            && patch.coordinates.is_none()
        {
            return Err(AppError::bad_request("No fields to update", json!({})));
        }

        if patch.coordinates.is_none()
            && let Some(address) = patch.address.as_deref()
        {
            patch.coordinates = Some(self.geo.locate(address).await);
        }

        let customer = self
            .repository
            .update(pharmacy_id, id, patch)
            .await?
            .ok_or_else(|| Self::not_found(id))?;

        self.cache.delete(&keys::customer(pharmacy_id, id)).await;
        Ok(customer)
    }

    /// Appends an entry to a customer's health history.
    pub async fn add_health_record(
        &self,
        pharmacy_id: i64,
        customer_id: i64,
        kind: HealthRecordKind,
        description: String,
    ) -> Result<HealthRecord, AppError> {
        self.ensure_exists(pharmacy_id, customer_id).await?;

        let record = self
            .repository
            .add_health_record(NewHealthRecord {
                pharmacy_id,
                customer_id,
                kind,
                description,
            })
            .await?;

        self.cache
            .delete(&keys::customer_health_records(pharmacy_id, customer_id))
            .await;
        Ok(record)
    }

    /// Health history of a customer, newest first.
    pub async fn health_records(
        &self,
        pharmacy_id: i64,
        customer_id: i64,
    ) -> Result<Vec<HealthRecord>, AppError> {
        self.ensure_exists(pharmacy_id, customer_id).await?;

        let repository = self.repository.clone();
        self.cache
            .get_or_compute(
                &keys::customer_health_records(pharmacy_id, customer_id),
                None,
                || async move {
                    repository
                        .list_health_records(pharmacy_id, customer_id)
                        .await
                },
            )
            .await
    }

    async fn ensure_exists(&self, pharmacy_id: i64, customer_id: i64) -> Result<(), AppError> {
        self.get(pharmacy_id, customer_id).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockCustomerRepository;
    use crate::infrastructure::cache::{DEFAULT_TTL, MemoryCache};
    use crate::infrastructure::geocoding::{GeocodingError, MockGeocoder};
    use chrono::Utc;

    fn customer(id: i64, pharmacy_id: i64) -> Customer {
        Customer {
            id,
            pharmacy_id,
            name: "Jo Doe".to_string(),
            email: None,
            phone: None,
            date_of_birth: None,
            address: None,
            latitude: None,
            longitude: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn record(id: i64, new: &NewHealthRecord) -> HealthRecord {
        HealthRecord {
            id,
            pharmacy_id: new.pharmacy_id,
            customer_id: new.customer_id,
            kind: new.kind,
            description: new.description.clone(),
            recorded_at: Utc::now(),
        }
    }

    fn service(repo: MockCustomerRepository, geo: GeoService) -> CustomerService<MockCustomerRepository> {
        let cache = CacheService::new(Arc::new(MemoryCache::new()), DEFAULT_TTL);
        CustomerService::new(Arc::new(repo), cache, geo)
    }

    #[tokio::test]
    async fn test_create_survives_geocoder_failure() {
        let mut geocoder = MockGeocoder::new();
        geocoder
            .expect_geocode()
            .times(1)
            .returning(|_| Err(GeocodingError::Status {
                status: "UNKNOWN_ERROR".to_string(),
                message: None,
            }));

        let mut repo = MockCustomerRepository::new();
        repo.expect_create()
            .withf(|new| new.latitude.is_none() && new.address.is_some())
            .times(1)
            .returning(|new| Ok(customer(1, new.pharmacy_id)));

        let service = service(repo, GeoService::new(Some(Arc::new(geocoder))));
        let created = service
            .create(NewCustomer {
                pharmacy_id: 2,
                name: "Jo Doe".to_string(),
                address: Some("Main St 1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(created.pharmacy_id, 2);
    }

    #[tokio::test]
    async fn test_customers_of_other_pharmacy_are_not_found() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_id()
            .withf(|ph, _| *ph == 2)
            .returning(|_, _| Ok(None));

        let err = service(repo, GeoService::disabled())
            .get(2, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_health_record_requires_existing_customer() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_id().returning(|_, _| Ok(None));
        repo.expect_add_health_record().never();

        let err = service(repo, GeoService::disabled())
            .add_health_record(1, 9, HealthRecordKind::Allergy, "Penicillin".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_new_health_record_refreshes_cached_history() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(|ph, id| Ok(Some(customer(id, ph))));
        repo.expect_list_health_records()
            .times(2)
            .returning(|_, _| Ok(Vec::new()));
        repo.expect_add_health_record()
            .times(1)
            .returning(|new| Ok(record(1, &new)));

        let service = service(repo, GeoService::disabled());

        assert!(service.health_records(1, 4).await.unwrap().is_empty());
        let added = service
            .add_health_record(1, 4, HealthRecordKind::Medication, "Metformin".to_string())
            .await
            .unwrap();
        assert_eq!(added.kind, HealthRecordKind::Medication);
        service.health_records(1, 4).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_pages() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_list()
            .withf(|_, _, offset, limit| *offset == 10 && *limit == 10)
            .returning(|ph, _, _, _| Ok(vec![customer(11, ph)]));
        repo.expect_count().returning(|_, _| Ok(11));

        let page = service(repo, GeoService::disabled())
            .list(1, 2, 10, None)
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_pages(), 2);
    }
}
