//! Commissioning: invoice receipts and their commission items

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::common::{CatalogEntry, CompanyCode};
use crate::impl_from_record;
use crate::mapping::{null_to_default, opt_timestamp};

/// Payment order created for an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOrderElement {
    pub payment_order_number: Option<String>,
    pub maturity: Option<String>,
    pub transfer_date: Option<String>,
    pub payment_file_status: Option<CatalogEntry>,
}

/// Net/gross totals of an invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonetaryTotal {
    pub tax_exclusive_amount: Option<f64>,
    pub tax_inclusive_amount: Option<f64>,
    pub labor_cost: Option<f64>,
    pub material_cost: Option<f64>,
}

/// VAT share for one tax code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSubtotal {
    pub net: Option<f64>,
    pub vat: Option<f64>,
    pub tax: Option<CatalogEntry>,
}

/// VAT summary of an invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxTotal {
    pub tax_amount: Option<f64>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub tax_subtotals: Vec<TaxSubtotal>,
}

/// Commission (work order) an item belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commission {
    pub id: i64,
    pub id_num: Option<String>,
    pub commission_type: Option<CatalogEntry>,
    pub commission_status: Option<CatalogEntry>,
    pub order_date: Option<String>,
}

/// Invoiced commission item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionItem {
    pub id: i64,
    pub code: Option<String>,
    pub unit_price: Option<f64>,
    pub gross_amount: Option<f64>,
    pub net_amount: Option<f64>,
    pub approved_net_amount: Option<f64>,
    pub units: Option<f64>,
    pub commission_text: Option<String>,
    pub internal_description: Option<String>,
    pub position_number: Option<i32>,
    pub sales_tax: Option<CatalogEntry>,
    pub craft_activity: Option<CatalogEntry>,
    pub quantity_type: Option<CompanyCode>,
    pub component: Option<CatalogEntry>,
    pub facility: Option<CatalogEntry>,
    pub commission: Option<Commission>,
}

/// Incoming invoice with its payment orders and commission items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceReceipt {
    pub id: i64,
    pub number: Option<String>,
    pub company_code: Option<CompanyCode>,
    #[serde(default, deserialize_with = "opt_timestamp")]
    pub invoice_date: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "opt_timestamp")]
    pub maturity_date: Option<DateTime<FixedOffset>>,
    pub monetary_total: Option<MonetaryTotal>,
    pub tax_total: Option<TaxTotal>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub payment_orders: Vec<PaymentOrderElement>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub commission_items: Vec<CommissionItem>,
}

impl_from_record!(
    PaymentOrderElement,
    MonetaryTotal,
    TaxSubtotal,
    TaxTotal,
    Commission,
    CommissionItem,
    InvoiceReceipt,
);
