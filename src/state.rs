//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{
    AuthService, CatalogService, CustomerService, GeoService, OrderService, PharmacyService,
    StaffService,
};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::geocoding::Geocoder;
use crate::infrastructure::persistence::{
    PgCustomerRepository, PgOrderRepository, PgPharmacyRepository, PgProductRepository,
    PgSessionRepository, PgStaffRepository,
};

pub type PgAuthService = AuthService<PgStaffRepository, PgSessionRepository>;
pub type PgOrderService =
    OrderService<PgOrderRepository, PgProductRepository, PgPharmacyRepository, PgCustomerRepository>;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PgPool>,
    pub auth_service: Arc<PgAuthService>,
    pub pharmacy_service: Arc<PharmacyService<PgPharmacyRepository>>,
    pub staff_service: Arc<StaffService<PgStaffRepository>>,
    pub catalog_service: Arc<CatalogService<PgProductRepository>>,
    pub customer_service: Arc<CustomerService<PgCustomerRepository>>,
    pub order_service: Arc<PgOrderService>,
    pub geo_service: GeoService,
    pub cache: CacheService,
}

/// Settings the services need beyond their dependencies.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub signing_secret: String,
    pub session_ttl_hours: i64,
}

impl AppState {
    /// Wires repositories and services over one connection pool.
    pub fn new(
        pool: Arc<PgPool>,
        cache: CacheService,
        geocoder: Option<Arc<dyn Geocoder>>,
        auth: AuthSettings,
    ) -> Self {
        let pharmacy_repo = Arc::new(PgPharmacyRepository::new(pool.clone()));
        let staff_repo = Arc::new(PgStaffRepository::new(pool.clone()));
        let session_repo = Arc::new(PgSessionRepository::new(pool.clone()));
        let product_repo = Arc::new(PgProductRepository::new(pool.clone()));
        let customer_repo = Arc::new(PgCustomerRepository::new(pool.clone()));
        let order_repo = Arc::new(PgOrderRepository::new(pool.clone()));

        let geo_service = GeoService::new(geocoder);

        let auth_service = Arc::new(AuthService::new(
            staff_repo.clone(),
            session_repo,
            auth.signing_secret.clone(),
            auth.session_ttl_hours,
        ));
        let pharmacy_service = Arc::new(PharmacyService::new(
            pharmacy_repo.clone(),
            cache.clone(),
            geo_service.clone(),
        ));
        let staff_service = Arc::new(StaffService::new(staff_repo, auth.signing_secret));
        let catalog_service = Arc::new(CatalogService::new(product_repo.clone(), cache.clone()));
        let customer_service = Arc::new(CustomerService::new(
            customer_repo.clone(),
            cache.clone(),
            geo_service.clone(),
        ));
        let order_service = Arc::new(OrderService::new(
            order_repo,
            product_repo,
            pharmacy_repo,
            customer_repo,
            cache.clone(),
            geo_service.clone(),
        ));

        Self {
            db: pool,
            auth_service,
            pharmacy_service,
            staff_service,
            catalog_service,
            customer_service,
            order_service,
            geo_service,
            cache,
        }
    }
}
