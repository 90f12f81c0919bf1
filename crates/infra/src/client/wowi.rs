//! High-level OPENWOWI client
//!
//! [`WowiClient`] pairs a request executor with the in-memory cache store and
//! offers one typed accessor per entity family. Every accessor follows the
//! same mode selection, see [`ListOptions`].

use std::path::Path;

use openwowi_domain::{
    ApiResponse, BuildingLand, CacheSlot, CatalogMap, CommunicationCatalog, ContractPosition,
    Contractor, EconomicUnit, InvoiceReceipt, LicenseAgreement, Management, NewTicket, Owner,
    Person, Result, Ticket, UseUnit, WowiError,
};
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use super::filters::{
    BuildingLandFilter, ContractPositionFilter, ContractorFilter, EconomicUnitFilter,
    EntityFilter, InvoiceReceiptFilter, LicenseAgreementFilter, ManagementFilter, OwnerFilter,
    PersonFilter, TicketFilter, UseUnitFilter,
};
use super::options::ListOptions;
use super::resource::Resource;
use crate::api::{fetch_all, ApiClient, ApiRequest, QueryParams, RequestExecutor};
use crate::cache::{CacheStore, Cacheable};
use crate::config::ClientConfig;

const TICKET_ENDPOINT: &str = "CommunicationEdit/Ticket";
const TICKET_COMMENT_ENDPOINT: &str = "CommunicationEdit/Ticket/AddComment";
const CATALOG_ASSIGNMENT_ENTITIES: &str = "CommunicationCatalog/TicketAssignmentEntity";
const CATALOG_PRIORITIES: &str = "CommunicationCatalog/TicketPriority";
const CATALOG_SOURCES: &str = "CommunicationCatalog/TicketSource";
const CATALOG_STATUSES: &str = "CommunicationCatalog/TicketStatus";

/// Typed client over one OPENWOWI installation.
///
/// Owns its executor (token pair included) and its cache store. Not meant to
/// be shared between threads without external synchronization.
pub struct WowiClient<E = ApiClient> {
    api: E,
    cache: CacheStore,
}

impl WowiClient<ApiClient> {
    /// Validate `config`, build the transport and log in.
    ///
    /// # Errors
    ///
    /// `WowiError::Config` for incomplete settings, `WowiError::Auth` when the
    /// password grant is rejected, `WowiError::Transport` when the token
    /// endpoint cannot be reached.
    #[instrument(skip(config), fields(base_url = %config.base_url))]
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let mut api = ApiClient::from_config(config)?;
        api.login()?;
        info!(version = %config.version, "connected to OPENWOWI");
        Ok(Self::with_executor(api))
    }
}

impl<E: RequestExecutor> WowiClient<E> {
    /// Wrap an already authenticated executor. All cache slots start empty.
    pub fn with_executor(api: E) -> Self {
        Self { api, cache: CacheStore::new() }
    }

    pub const fn api(&self) -> &E {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut E {
        &mut self.api
    }

    pub const fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut CacheStore {
        &mut self.cache
    }

    /// Generic collection accessor.
    ///
    /// # Errors
    ///
    /// `WowiError::Config` when `use_cache` is requested for a type without a
    /// cache slot; any executor or mapping error otherwise.
    #[instrument(skip(self, filter, options), fields(endpoint = T::ENDPOINT))]
    pub fn list<T: Resource>(&mut self, filter: &T::Filter, options: &ListOptions) -> Result<Vec<T>> {
        if options.use_cache {
            let entries = T::cached(&self.cache).ok_or_else(|| {
                WowiError::Config(format!("no cache slot for endpoint '{}'", T::ENDPOINT))
            })?;
            let hits: Vec<T> = entries.iter().filter(|e| filter.matches(e)).cloned().collect();
            debug!(hits = hits.len(), "answered from cache");
            return Ok(hits);
        }

        let mut params = T::default_params();
        params.extend(&filter.params());

        let records = if options.fetch_all {
            params.extend(&options.extra_params);
            fetch_all(&mut self.api, T::ENDPOINT, &params, options.bypass_cache)?
        } else {
            params.insert_opt(QueryParams::LIMIT, options.limit);
            params.insert(QueryParams::OFFSET, options.offset);
            params.extend(&options.extra_params);
            let request = ApiRequest::get(T::ENDPOINT).with_params(params);
            self.api.execute(&request, options.bypass_cache)?.into_data()
        };

        openwowi_domain::map_records(&records)
    }

    /// Fetch every record of `T` matching `filter` and replace its cache
    /// slot. Returns the number of cached objects.
    ///
    /// # Errors
    ///
    /// Any fetch or mapping error; the slot keeps its previous contents.
    pub fn build_cache<T: Resource + Cacheable>(&mut self, filter: &T::Filter) -> Result<usize> {
        let entries = self.list::<T>(filter, &ListOptions::all())?;
        let count = entries.len();
        self.cache.write(entries);
        Ok(count)
    }

    /// [`build_cache`](Self::build_cache) with an empty filter, addressed by
    /// slot.
    pub fn build_slot(&mut self, slot: CacheSlot) -> Result<usize> {
        match slot {
            CacheSlot::LicenseAgreements => self.build_cache::<LicenseAgreement>(&LicenseAgreementFilter::default()),
            CacheSlot::Contractors => self.build_cache::<Contractor>(&ContractorFilter::default()),
            CacheSlot::Persons => self.build_cache::<Person>(&PersonFilter::default()),
            CacheSlot::EconomicUnits => self.build_cache::<EconomicUnit>(&EconomicUnitFilter::default()),
            CacheSlot::BuildingLands => self.build_cache::<BuildingLand>(&BuildingLandFilter::default()),
            CacheSlot::UseUnits => self.build_cache::<UseUnit>(&UseUnitFilter::default()),
        }
    }

    /// Write one slot to `path`.
    pub fn persist_cache(&self, slot: CacheSlot, path: &Path) -> Result<()> {
        self.cache.persist_slot(slot, path)
    }

    /// Replace one slot with the contents of `path`.
    pub fn restore_cache(&mut self, slot: CacheSlot, path: &Path) -> Result<usize> {
        self.cache.restore_slot(slot, path)
    }

    /// License agreements, optionally with their contractors attached.
    ///
    /// With `include_contractors` in network mode one contractor query is
    /// issued per agreement; in cache mode the contractor slot is used.
    pub fn license_agreements(
        &mut self,
        filter: &LicenseAgreementFilter,
        options: &ListOptions,
        include_contractors: bool,
    ) -> Result<Vec<LicenseAgreement>> {
        let mut agreements = self.list::<LicenseAgreement>(filter, options)?;
        if !include_contractors {
            return Ok(agreements);
        }

        let contractor_options = if options.use_cache {
            ListOptions::cached()
        } else {
            ListOptions { bypass_cache: options.bypass_cache, ..ListOptions::default() }
        };
        for agreement in &mut agreements {
            let contractors = self
                .list::<Contractor>(&ContractorFilter::for_agreement(agreement.id), &contractor_options)?;
            agreement.contractors = Some(contractors);
        }
        Ok(agreements)
    }

    pub fn managements(&mut self, filter: &ManagementFilter, options: &ListOptions) -> Result<Vec<Management>> {
        self.list(filter, options)
    }

    pub fn economic_units(&mut self, filter: &EconomicUnitFilter, options: &ListOptions) -> Result<Vec<EconomicUnit>> {
        self.list(filter, options)
    }

    pub fn building_lands(&mut self, filter: &BuildingLandFilter, options: &ListOptions) -> Result<Vec<BuildingLand>> {
        self.list(filter, options)
    }

    pub fn owners(&mut self, filter: &OwnerFilter, options: &ListOptions) -> Result<Vec<Owner>> {
        self.list(filter, options)
    }

    pub fn invoice_receipts(&mut self, options: &ListOptions) -> Result<Vec<InvoiceReceipt>> {
        self.list(&InvoiceReceiptFilter, options)
    }

    pub fn use_units(&mut self, filter: &UseUnitFilter, options: &ListOptions) -> Result<Vec<UseUnit>> {
        self.list(filter, options)
    }

    pub fn contractors(&mut self, filter: &ContractorFilter, options: &ListOptions) -> Result<Vec<Contractor>> {
        self.list(filter, options)
    }

    pub fn persons(&mut self, filter: &PersonFilter, options: &ListOptions) -> Result<Vec<Person>> {
        self.list(filter, options)
    }

    pub fn contract_positions(
        &mut self,
        filter: &ContractPositionFilter,
        options: &ListOptions,
    ) -> Result<Vec<ContractPosition>> {
        self.list(filter, options)
    }

    pub fn tickets(&mut self, filter: &TicketFilter, options: &ListOptions) -> Result<Vec<Ticket>> {
        self.list(filter, options)
    }

    /// Read the four ticket catalogs.
    pub fn communication_catalog(&mut self) -> Result<CommunicationCatalog> {
        Ok(CommunicationCatalog {
            assignment_entities: self.catalog("assignment_entity", CATALOG_ASSIGNMENT_ENTITIES)?,
            priorities: self.catalog("priority", CATALOG_PRIORITIES)?,
            sources: self.catalog("source", CATALOG_SOURCES)?,
            statuses: self.catalog("status", CATALOG_STATUSES)?,
        })
    }

    fn catalog(&mut self, name: &str, endpoint: &str) -> Result<CatalogMap> {
        let response = self.api.execute(&ApiRequest::get(endpoint), false)?;
        Ok(CatalogMap::from_records(name, &response.data))
    }

    /// `POST CommunicationEdit/Ticket`.
    #[instrument(skip(self, ticket), fields(subject = %ticket.subject))]
    pub fn create_ticket(&mut self, ticket: &NewTicket) -> Result<ApiResponse> {
        let body = serde_json::to_value(ticket)
            .map_err(|e| WowiError::Validation(format!("cannot encode ticket: {e}")))?;
        let response = self.api.execute(&ApiRequest::post(TICKET_ENDPOINT).with_body(body), false)?;
        info!(status = response.status_code, "ticket created");
        Ok(response)
    }

    /// `POST CommunicationEdit/Ticket/AddComment`.
    pub fn create_ticket_comment(&mut self, ticket_id: i64, content: &str) -> Result<ApiResponse> {
        let body: Value = json!({ "TicketId": ticket_id, "Content": content });
        self.api.execute(&ApiRequest::post(TICKET_COMMENT_ENDPOINT).with_body(body), false)
    }
}
