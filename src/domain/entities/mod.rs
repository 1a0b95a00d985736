//! Core domain entities.
//!
//! Entities are plain data. Creation and partial updates use separate input
//! structs (`NewProduct`, `ProductPatch`, ...). Every tenant-scoped entity
//! carries its `pharmacy_id`.
//!
//! - [`Pharmacy`] - the tenant
//! - [`Staff`] / [`StaffIdentity`] - accounts and the authenticated caller
//! - [`Product`] - catalog entry with stock level
//! - [`Customer`] / [`HealthRecord`] - customers and their health history
//! - [`Order`] / [`OrderItem`] - sales

pub mod customer;
pub mod order;
pub mod pharmacy;
pub mod product;
pub mod staff;

pub use customer::{
    Customer, CustomerPatch, HealthRecord, HealthRecordKind, NewCustomer, NewHealthRecord,
};
pub use order::{NewOrder, NewOrderLine, Order, OrderItem, OrderStatus, OrderWithItems};
pub use pharmacy::{NewPharmacy, Pharmacy, PharmacyPatch};
pub use product::{NewProduct, Product, ProductPatch};
pub use staff::{NewSession, NewStaff, Staff, StaffIdentity, StaffRole};
