//! Typed client facade
//!
//! One accessor per entity family on top of the request executor, the page
//! merger and the cache store.

pub mod filters;
pub mod options;
pub mod resource;
pub mod wowi;

pub use filters::{
    BuildingLandFilter, ContractPositionFilter, ContractorFilter, EconomicUnitFilter,
    EntityFilter, InvoiceReceiptFilter, LicenseAgreementFilter, ManagementFilter, OwnerFilter,
    PersonFilter, TicketFilter, UseUnitFilter,
};
pub use options::ListOptions;
pub use resource::Resource;
pub use wowi::WowiClient;
