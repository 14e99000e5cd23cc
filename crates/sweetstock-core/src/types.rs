//! # Domain Types
//!
//! Core domain types used throughout SweetStock.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────┐   ┌──────────────────┐   ┌──────────────────────┐    │
//! │  │   Product    │◄──│      Batch       │◄──│     Allocation       │    │
//! │  │ ──────────── │   │ ──────────────── │   │ ──────────────────── │    │
//! │  │ id           │   │ batch_code       │   │ batch_id             │    │
//! │  │ name         │   │ qty initial/rem  │   │ quantity             │    │
//! │  │ category     │   │ unit_cost        │   │ unit_cost (snapshot) │    │
//! │  └──────┬───────┘   │ expiry_date      │   └──────────┬───────────┘    │
//! │         │           │ supplier_name ◄─ snapshot       │                │
//! │         │           └──────────────────┘              │                │
//! │         │                                             │                │
//! │         │           ┌──────────────────┐              │                │
//! │         └───────────│       Sale       │──────────────┘                │
//! │                     │ ──────────────── │  owns 1..n allocations        │
//! │                     │ quantity         │                               │
//! │                     │ selling_price    │                               │
//! │                     │ customer_name ◄─ snapshot                        │
//! │                     └──────────────────┘                               │
//! │                                                                         │
//! │  Supplier / Retailer: weak references (optional id + name snapshot)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every stored entity has an `i64` id assigned by the database. Batches are
//! additionally keyed by `(product_id, batch_code)`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Pack Size
// =============================================================================

/// Weight unit of one sellable pack.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    /// Grams
    #[default]
    G,
    /// Kilograms
    Kg,
}

impl SizeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeUnit::G => "g",
            SizeUnit::Kg => "kg",
        }
    }
}

/// Default pack weight value (one unit of `unit_size_unit`).
pub fn default_unit_size_value() -> Decimal {
    Decimal::ONE
}

// =============================================================================
// Catalog
// =============================================================================

/// A sellable product. Identity only; stock lives in batches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or renaming a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
}

// =============================================================================
// Partners
// =============================================================================

/// Upstream vendor a batch was bought from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub gst_number: Option<String>,
    pub city: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSupplier {
    pub name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gst_number: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Downstream shop or channel a sale was made to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Retailer {
    pub id: i64,
    pub name: String,
    pub channel: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub gst_number: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewRetailer {
    pub name: String,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gst_number: Option<String>,
}

// =============================================================================
// Batch Ledger
// =============================================================================

/// One receipt of physical stock.
///
/// ## Lifecycle
/// ```text
///   purchase ──► quantity_remaining = quantity_initial
///                      │
///                      ▼  allocations only ever subtract
///               0 ≤ quantity_remaining ≤ quantity_initial
///                      │
///                      ▼
///               remaining == 0: kept for the cost trail,
///               skipped by FIFO selection
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Batch {
    pub id: i64,
    pub product_id: i64,
    pub batch_code: String,
    pub quantity_initial: i64,
    pub quantity_remaining: i64,
    #[ts(as = "String")]
    pub unit_cost: Money,
    #[ts(as = "String")]
    pub unit_size_value: Decimal,
    pub unit_size_unit: SizeUnit,
    #[ts(as = "String")]
    pub expiry_date: NaiveDate,
    pub supplier_id: Option<i64>,
    pub supplier_name: Option<String>,
    #[ts(as = "String")]
    pub purchased_at: DateTime<Utc>,
}

/// Purchase read model: the batch plus its live supplier row.
///
/// `supplier` is `None` once the supplier has been deleted; the batch
/// keeps its `supplier_name` snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Purchase {
    #[serde(flatten)]
    pub batch: Batch,
    pub supplier: Option<Supplier>,
}

/// Payload for recording a purchase (creates one batch).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewPurchase {
    pub product_id: i64,
    pub batch_code: String,
    pub quantity: i64,
    #[ts(as = "String")]
    pub unit_cost: Money,
    #[ts(as = "String")]
    pub expiry_date: NaiveDate,
    #[serde(default)]
    pub supplier_name: Option<String>,
    #[serde(default = "default_unit_size_value")]
    #[ts(as = "String")]
    pub unit_size_value: Decimal,
    #[serde(default)]
    pub unit_size_unit: SizeUnit,
    #[serde(default)]
    pub supplier_id: Option<i64>,
}

// =============================================================================
// Sales
// =============================================================================

/// How much of a sale was drawn from which batch, at what cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Allocation {
    pub batch_id: i64,
    pub quantity: i64,
    /// The batch's unit cost at the moment of consumption.
    #[ts(as = "String")]
    pub unit_cost: Money,
}

impl Allocation {
    /// quantity × unit_cost
    #[inline]
    pub fn cost(&self) -> CoreResult<Money> {
        self.unit_cost
            .checked_mul(self.quantity)
            .ok_or_else(|| CoreError::overflow("allocation cost"))
    }
}

/// Σ allocation.quantity × allocation.unit_cost
pub fn allocation_cost(allocations: &[Allocation]) -> CoreResult<Money> {
    allocations.iter().try_fold(Money::ZERO, |acc, a| {
        acc.checked_add(a.cost()?)
            .ok_or_else(|| CoreError::overflow("cost of goods sold"))
    })
}

/// Sale read model with its allocation trail and live retailer row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    pub product_id: i64,
    pub retailer_id: Option<i64>,
    pub quantity: i64,
    #[ts(as = "String")]
    pub selling_price: Money,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
    pub customer_name: Option<String>,
    #[ts(as = "String")]
    pub unit_size_value: Decimal,
    pub unit_size_unit: SizeUnit,
    pub invoice_number: Option<String>,
    pub retailer: Option<Retailer>,
    pub allocations: Vec<Allocation>,
}

impl Sale {
    /// quantity × selling_price
    pub fn revenue(&self) -> CoreResult<Money> {
        self.selling_price
            .checked_mul(self.quantity)
            .ok_or_else(|| CoreError::overflow("sale revenue"))
    }

    pub fn cogs(&self) -> CoreResult<Money> {
        allocation_cost(&self.allocations)
    }
}

/// Payload for recording a sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    pub product_id: i64,
    pub quantity: i64,
    #[ts(as = "String")]
    pub selling_price: Money,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default = "default_unit_size_value")]
    #[ts(as = "String")]
    pub unit_size_value: Decimal,
    #[serde(default)]
    pub unit_size_unit: SizeUnit,
    #[serde(default)]
    pub retailer_id: Option<i64>,
    #[serde(default)]
    pub invoice_number: Option<String>,
}

// =============================================================================
// Stock Views
// =============================================================================

/// A batch joined with its product, as shown on the stock page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockBatch {
    pub batch_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub batch_code: String,
    pub quantity_remaining: i64,
    #[ts(as = "String")]
    pub expiry_date: NaiveDate,
    #[ts(as = "String")]
    pub unit_cost: Money,
    #[ts(as = "String")]
    pub unit_size_value: Decimal,
    pub unit_size_unit: SizeUnit,
    pub supplier_id: Option<i64>,
    pub supplier_name: Option<String>,
    #[ts(as = "String")]
    pub purchased_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockOverview {
    pub total_products: i64,
    pub total_batches: i64,
    pub total_units: i64,
    pub batches: Vec<StockBatch>,
}

/// A live batch that expires inside the alert window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExpiryAlert {
    pub product_id: i64,
    pub product_name: String,
    pub batch_code: String,
    #[ts(as = "String")]
    pub expires_on: NaiveDate,
    pub days_remaining: i64,
    pub quantity_remaining: i64,
    #[ts(as = "String")]
    pub unit_size_value: Decimal,
    pub unit_size_unit: SizeUnit,
}

// =============================================================================
// Reports
// =============================================================================

/// One sale flattened for reporting: what was sold, when, for how much,
/// and what the allocated stock cost.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleFact {
    pub sale_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub selling_price: Money,
    pub sale_date: DateTime<Utc>,
    pub cogs: Money,
}

impl SaleFact {
    pub fn revenue(&self) -> CoreResult<Money> {
        self.selling_price
            .checked_mul(self.quantity)
            .ok_or_else(|| CoreError::overflow("sale revenue"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopProduct {
    pub product_id: i64,
    pub product_name: String,
    pub total_quantity: i64,
    #[ts(as = "String")]
    pub total_revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SlowProduct {
    pub product_id: i64,
    pub product_name: String,
    pub sold_last_30_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfitLine {
    /// Calendar month, `YYYY-MM`.
    pub month: String,
    #[ts(as = "String")]
    pub revenue: Money,
    #[ts(as = "String")]
    pub cogs: Money,
    #[ts(as = "String")]
    pub profit: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfitReport {
    pub currency: String,
    pub months: Vec<ProfitLine>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_batch() -> Batch {
        Batch {
            id: 7,
            product_id: 1,
            batch_code: "KJ-0424".to_string(),
            quantity_initial: 10,
            quantity_remaining: 4,
            unit_cost: Money::from_paise(950),
            unit_size_value: Decimal::new(500, 0),
            unit_size_unit: SizeUnit::G,
            expiry_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            supplier_id: None,
            supplier_name: Some("Haldiram Foods".to_string()),
            purchased_at: Utc.with_ymd_and_hms(2024, 4, 1, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_size_unit_wire_format() {
        assert_eq!(serde_json::to_string(&SizeUnit::Kg).unwrap(), "\"kg\"");
        let unit: SizeUnit = serde_json::from_str("\"g\"").unwrap();
        assert_eq!(unit, SizeUnit::G);
        assert!(serde_json::from_str::<SizeUnit>("\"lb\"").is_err());
    }

    #[test]
    fn test_purchase_flattens_batch_fields() {
        let purchase = Purchase {
            batch: sample_batch(),
            supplier: None,
        };
        let json = serde_json::to_value(&purchase).unwrap();
        assert_eq!(json["batch_code"], "KJ-0424");
        assert_eq!(json["quantity_remaining"], 4);
        assert_eq!(json["unit_cost"], "9.50");
        assert_eq!(json["unit_size_value"], "500");
        assert_eq!(json["expiry_date"], "2024-05-01");
        assert!(json["supplier"].is_null());
    }

    #[test]
    fn test_new_sale_defaults() {
        let sale: NewSale = serde_json::from_str(
            r#"{"product_id": 3, "quantity": 2, "selling_price": "15.00"}"#,
        )
        .unwrap();
        assert_eq!(sale.unit_size_value, Decimal::ONE);
        assert_eq!(sale.unit_size_unit, SizeUnit::G);
        assert!(sale.retailer_id.is_none());
        assert!(sale.invoice_number.is_none());
    }

    #[test]
    fn test_sale_revenue_and_cogs() {
        let sale = Sale {
            id: 1,
            product_id: 1,
            retailer_id: None,
            quantity: 3,
            selling_price: Money::from_paise(1500),
            sale_date: Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap(),
            customer_name: Some("Walk-in".to_string()),
            unit_size_value: Decimal::ONE,
            unit_size_unit: SizeUnit::Kg,
            invoice_number: None,
            retailer: None,
            allocations: vec![
                Allocation {
                    batch_id: 2,
                    quantity: 2,
                    unit_cost: Money::from_paise(900),
                },
                Allocation {
                    batch_id: 5,
                    quantity: 1,
                    unit_cost: Money::from_paise(1100),
                },
            ],
        };
        assert_eq!(sale.revenue().unwrap(), Money::from_paise(4500));
        assert_eq!(sale.cogs().unwrap(), Money::from_paise(2900));
    }

    #[test]
    fn test_allocation_cost_overflow_is_an_error() {
        let allocations = [
            Allocation {
                batch_id: 1,
                quantity: 1000,
                unit_cost: Money::from_paise(10_000_000_000_000_000),
            },
        ];
        assert!(matches!(
            allocation_cost(&allocations),
            Err(CoreError::Overflow { .. })
        ));

        let near_max = Allocation {
            batch_id: 2,
            quantity: 1,
            unit_cost: Money::from_paise(i64::MAX),
        };
        assert!(allocation_cost(&[near_max, near_max]).is_err());
    }
}
