//! Domain types and models
//!
//! One module per OPENWOWI entity family. All types derive serde so that the
//! cache store can persist them, and implement
//! [`FromRecord`](crate::mapping::FromRecord) so that accessors can map raw
//! records into them.

pub mod commissioning;
pub mod common;
pub mod inventory;
pub mod person;
pub mod rent;
pub mod ticket;

pub use commissioning::{
    Commission, CommissionItem, InvoiceReceipt, MonetaryTotal, PaymentOrderElement, TaxSubtotal,
    TaxTotal,
};
pub use common::{Address, BankAccount, CatalogEntry, Communication, CompanyCode, EstateAddress};
pub use inventory::{
    BillingUnit, Building, BuildingLand, BuildingLandShort, EconomicUnit, EconomicUnitShort, Floor,
    Land, Management, Owner, OwnerShort, UseUnit, UseUnitShort, UseUnitType,
};
pub use person::{Contractor, LegalPerson, NaturalPerson, Person};
pub use rent::{
    ContractPosition, ContractPositionType, DunningData, LicenseAgreement, LicenseAgreementShort,
    RestrictionOfUse,
};
pub use ticket::{
    CatalogMap, CommunicationCatalog, EntityAssignment, NewTicket, Ticket, TicketAssignment, TicketComment,
    TicketRef,
};
