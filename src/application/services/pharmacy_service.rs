//! Pharmacy (tenant) profile management.

use serde_json::json;
use std::sync::Arc;

use super::geo_service::GeoService;
use crate::domain::entities::{NewPharmacy, Pharmacy, PharmacyPatch};
use crate::domain::repositories::PharmacyRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, keys};

pub struct PharmacyService<P: PharmacyRepository> {
    repository: Arc<P>,
    cache: CacheService,
    geo: GeoService,
}

impl<P: PharmacyRepository> PharmacyService<P> {
    pub fn new(repository: Arc<P>, cache: CacheService, geo: GeoService) -> Self {
        Self {
            repository,
            cache,
            geo,
        }
    }

    /// Returns a pharmacy, served from cache when possible.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no pharmacy has this id.
    pub async fn get(&self, id: i64) -> Result<Pharmacy, AppError> {
        let repository = self.repository.clone();

        self.cache
            .get_or_compute(&keys::pharmacy(id), None, || async move {
                repository.find_by_id(id).await
            })
            .await?
            .ok_or_else(|| AppError::not_found("Pharmacy not found", json!({ "id": id })))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Pharmacy>, AppError> {
        self.repository.find_by_name(name).await
    }

    /// Creates a pharmacy, geocoding its address when no coordinates are given.
    pub async fn create(&self, mut new_pharmacy: NewPharmacy) -> Result<Pharmacy, AppError> {
        if new_pharmacy.latitude.is_none()
            && let Some(address) = new_pharmacy.address.as_deref()
            && let Some((lat, lng)) = self.geo.locate(address).await
        {
            new_pharmacy.latitude = Some(lat);
            new_pharmacy.longitude = Some(lng);
        }

        let pharmacy = self.repository.create(new_pharmacy).await?;
        tracing::info!(pharmacy_id = pharmacy.id, name = %pharmacy.name, "pharmacy created");
        Ok(pharmacy)
    }

    /// Updates the profile of a pharmacy.
    ///
    /// A new address without explicit coordinates is geocoded; if that fails
    /// the old coordinates are cleared rather than left pointing elsewhere.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the patch is empty
    /// - [`AppError::NotFound`] if the pharmacy does not exist
    pub async fn update(&self, id: i64, mut patch: PharmacyPatch) -> Result<Pharmacy, AppError> {
        if patch.name.is_none()
            && patch.address.is_none()
            && patch.phone.is_none()
            && patch.coordinates.is_none()
        {
            return Err(AppError::bad_request("No fields to update", json!({})));
        }

        if patch.coordinates.is_none()
            && let Some(address) = patch.address.as_deref()
        {
            patch.coordinates = Some(self.geo.locate(address).await);
        }

        let pharmacy = self
            .repository
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("Pharmacy not found", json!({ "id": id })))?;

        self.cache.delete(&keys::pharmacy(id)).await;

        Ok(pharmacy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockPharmacyRepository;
    use crate::infrastructure::cache::{DEFAULT_TTL, MemoryCache};
    use crate::infrastructure::geocoding::{GeoPoint, GeocodeResult, MockGeocoder};
    use chrono::Utc;

    fn pharmacy(id: i64, name: &str) -> Pharmacy {
        Pharmacy {
            id,
            name: name.to_string(),
            address: Some("Main St 1".to_string()),
            phone: None,
            latitude: None,
            longitude: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn memory_cache() -> CacheService {
        CacheService::new(Arc::new(MemoryCache::new()), DEFAULT_TTL)
    }

    fn geo_resolving_to(lat: f64, lng: f64) -> GeoService {
        let mut geocoder = MockGeocoder::new();
        geocoder.expect_geocode().returning(move |address| {
            Ok(Some(GeocodeResult {
                location: GeoPoint::new(lat, lng),
                formatted_address: address.to_string(),
                place_id: None,
            }))
        });
        GeoService::new(Some(Arc::new(geocoder)))
    }

    #[tokio::test]
    async fn test_get_is_cached() {
        let mut repo = MockPharmacyRepository::new();
        repo.expect_find_by_id()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|id| Ok(Some(pharmacy(id, "Central"))));

        let service = PharmacyService::new(Arc::new(repo), memory_cache(), GeoService::disabled());

        assert_eq!(service.get(1).await.unwrap().name, "Central");
        assert_eq!(service.get(1).await.unwrap().name, "Central");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found_and_not_cached() {
        let mut repo = MockPharmacyRepository::new();
        repo.expect_find_by_id().times(2).returning(|_| Ok(None));

        let service = PharmacyService::new(Arc::new(repo), memory_cache(), GeoService::disabled());

        assert!(matches!(service.get(9).await, Err(AppError::NotFound { .. })));
        assert!(matches!(service.get(9).await, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_create_geocodes_address() {
        let mut repo = MockPharmacyRepository::new();
        repo.expect_create()
            .withf(|new| new.latitude == Some(48.1) && new.longitude == Some(11.5))
            .times(1)
            .returning(|new| {
                let mut created = pharmacy(1, &new.name);
                created.latitude = new.latitude;
                created.longitude = new.longitude;
                Ok(created)
            });

        let service = PharmacyService::new(Arc::new(repo), memory_cache(), geo_resolving_to(48.1, 11.5));

        let created = service
            .create(NewPharmacy {
                name: "Central".to_string(),
                address: Some("Marienplatz 1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(created.coordinates(), Some((48.1, 11.5)));
    }

    #[tokio::test]
    async fn test_update_address_without_geocoder_clears_coordinates() {
        let mut repo = MockPharmacyRepository::new();
        repo.expect_update()
            .withf(|id, patch| *id == 1 && patch.coordinates == Some(None))
            .times(1)
            .returning(|id, _| Ok(Some(pharmacy(id, "Central"))));

        let service = PharmacyService::new(Arc::new(repo), memory_cache(), GeoService::disabled());

        service
            .update(
                1,
                PharmacyPatch {
                    address: Some("Elsewhere 5".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_invalidates_cache() {
        let mut repo = MockPharmacyRepository::new();
        repo.expect_find_by_id()
            .times(2)
            .returning(|id| Ok(Some(pharmacy(id, "Central"))));
        repo.expect_update()
            .times(1)
            .returning(|id, _| Ok(Some(pharmacy(id, "Renamed"))));

        let service = PharmacyService::new(Arc::new(repo), memory_cache(), GeoService::disabled());

        service.get(1).await.unwrap();
        service
            .update(
                1,
                PharmacyPatch {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        service.get(1).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected() {
        let service = PharmacyService::new(
            Arc::new(MockPharmacyRepository::new()),
            memory_cache(),
            GeoService::disabled(),
        );

        let err = service.update(1, PharmacyPatch::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}
