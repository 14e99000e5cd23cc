//! # Validation Module
//!
//! Input validation and normalization for SweetStock payloads.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: JSON extraction (axum)                                       │
//! │  └── Types, enums ("g" | "kg"), decimal parsing                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Trim text, empty optional → None                                  │
//! │  ├── Length limits per column                                          │
//! │  ├── Sign rules (quantity > 0, cost ≥ 0, pack size > 0)                │
//! │  └── Upper bounds so quantity × unit amount always fits in i64 paise   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── CHECK constraints on quantities                                   │
//! │  ├── UNIQUE (product_id, batch_code), invoice, partner names           │
//! │  └── Foreign keys                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sweetstock_core::NewProduct;
//!
//! let product = NewProduct {
//!     name: "  Kaju Katli ".to_string(),
//!     category: Some("   ".to_string()),
//!     brand: None,
//! }
//! .normalized()
//! .unwrap();
//!
//! assert_eq!(product.name, "Kaju Katli");
//! assert_eq!(product.category, None);
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewProduct, NewPurchase, NewRetailer, NewSale, NewSupplier};
use crate::{MAX_REPORT_LIMIT, DEFAULT_REPORT_LIMIT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Column Limits
// =============================================================================

pub const MAX_NAME_LEN: usize = 120;
pub const MAX_LABEL_LEN: usize = 80;
pub const MAX_PHONE_LEN: usize = 30;
pub const MAX_GST_LEN: usize = 30;
pub const MAX_INVOICE_LEN: usize = 40;
pub const MAX_IDEMPOTENCY_KEY_LEN: usize = 128;

/// Decimal places kept on pack sizes.
pub const UNIT_SIZE_SCALE: u32 = 3;

// =============================================================================
// Numeric Limits
// =============================================================================

/// Largest quantity a single purchase or sale may carry.
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// Largest unit cost or selling price: ₹1,00,00,000.00.
///
/// `MAX_QUANTITY × MAX_UNIT_AMOUNT` is 1e18 paise, below `i64::MAX`.
pub const MAX_UNIT_AMOUNT: Money = Money::from_paise(1_000_000_000);

// =============================================================================
// String Validators
// =============================================================================

/// Trims a required text field and enforces its length limit.
pub fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Trims an optional text field. Blank becomes `None`.
pub fn optional_text(
    field: &str,
    value: Option<String>,
    max: usize,
) -> ValidationResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Ok(None),
        Some(v) => required_text(field, &v, max).map(Some),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit quantity (purchase or sale). Must be in `1..=MAX_QUANTITY`.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    if quantity > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a unit amount that may be zero but not negative, and not
/// above [`MAX_UNIT_AMOUNT`].
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    if amount > MAX_UNIT_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            // whole rupees, as the caller wrote them
            max: MAX_UNIT_AMOUNT.paise() / 100,
        });
    }
    Ok(())
}

/// Validates a pack size and rounds it to three places.
pub fn validate_unit_size(value: Decimal) -> ValidationResult<Decimal> {
    let value = value.round_dp(UNIT_SIZE_SCALE);
    if value <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "unit_size_value".to_string(),
        });
    }
    Ok(value.normalize())
}

/// Validates a positive foreign id when one is supplied.
fn validate_ref(field: &str, id: Option<i64>) -> ValidationResult<Option<i64>> {
    match id {
        Some(id) if id <= 0 => Err(ValidationError::MustBePositive {
            field: field.to_string(),
        }),
        other => Ok(other),
    }
}

/// Resolves a report `limit` query value.
///
/// `None` gives the default; anything outside `1..=50` is rejected.
pub fn validate_report_limit(limit: Option<i64>) -> ValidationResult<u32> {
    let Some(limit) = limit else {
        return Ok(DEFAULT_REPORT_LIMIT);
    };

    if !(1..=MAX_REPORT_LIMIT as i64).contains(&limit) {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max: MAX_REPORT_LIMIT as i64,
        });
    }

    Ok(limit as u32)
}

/// Validates a client-supplied `Idempotency-Key`.
///
/// 1 to 128 visible ASCII characters, no whitespace.
pub fn validate_idempotency_key(key: &str) -> ValidationResult<String> {
    if key.is_empty() {
        return Err(ValidationError::Required {
            field: "Idempotency-Key".to_string(),
        });
    }

    if key.len() > MAX_IDEMPOTENCY_KEY_LEN {
        return Err(ValidationError::TooLong {
            field: "Idempotency-Key".to_string(),
            max: MAX_IDEMPOTENCY_KEY_LEN,
        });
    }

    if !key.chars().all(|c| c.is_ascii_graphic()) {
        return Err(ValidationError::InvalidFormat {
            field: "Idempotency-Key".to_string(),
            reason: "must be visible ASCII without spaces".to_string(),
        });
    }

    Ok(key.to_string())
}

// =============================================================================
// Payload Normalization
// =============================================================================

impl NewProduct {
    /// Trims fields and checks limits.
    pub fn normalized(self) -> ValidationResult<Self> {
        Ok(NewProduct {
            name: required_text("name", &self.name, MAX_NAME_LEN)?,
            category: optional_text("category", self.category, MAX_LABEL_LEN)?,
            brand: optional_text("brand", self.brand, MAX_LABEL_LEN)?,
        })
    }
}

impl NewSupplier {
    pub fn normalized(self) -> ValidationResult<Self> {
        Ok(NewSupplier {
            name: required_text("name", &self.name, MAX_NAME_LEN)?,
            contact_person: optional_text("contact_person", self.contact_person, MAX_NAME_LEN)?,
            phone: optional_text("phone", self.phone, MAX_PHONE_LEN)?,
            email: optional_text("email", self.email, MAX_NAME_LEN)?,
            gst_number: optional_text("gst_number", self.gst_number, MAX_GST_LEN)?,
            city: optional_text("city", self.city, MAX_LABEL_LEN)?,
        })
    }
}

impl NewRetailer {
    pub fn normalized(self) -> ValidationResult<Self> {
        Ok(NewRetailer {
            name: required_text("name", &self.name, MAX_NAME_LEN)?,
            channel: optional_text("channel", self.channel, MAX_LABEL_LEN)?,
            contact_person: optional_text("contact_person", self.contact_person, MAX_NAME_LEN)?,
            phone: optional_text("phone", self.phone, MAX_PHONE_LEN)?,
            email: optional_text("email", self.email, MAX_NAME_LEN)?,
            gst_number: optional_text("gst_number", self.gst_number, MAX_GST_LEN)?,
        })
    }
}

impl NewPurchase {
    /// Checks a purchase before it becomes a batch.
    ///
    /// ## Rules
    /// - `batch_code` required, at most 80 characters
    /// - `quantity` in `1..=MAX_QUANTITY`
    /// - `unit_cost` in `0..=MAX_UNIT_AMOUNT` (free samples are still stock)
    /// - `unit_size_value` > 0
    pub fn normalized(self) -> ValidationResult<Self> {
        validate_quantity(self.quantity)?;
        validate_non_negative("unit_cost", self.unit_cost)?;

        Ok(NewPurchase {
            product_id: self.product_id,
            batch_code: required_text("batch_code", &self.batch_code, MAX_LABEL_LEN)?,
            quantity: self.quantity,
            unit_cost: self.unit_cost,
            expiry_date: self.expiry_date,
            supplier_name: optional_text("supplier_name", self.supplier_name, MAX_NAME_LEN)?,
            unit_size_value: validate_unit_size(self.unit_size_value)?,
            unit_size_unit: self.unit_size_unit,
            supplier_id: validate_ref("supplier_id", self.supplier_id)?,
        })
    }
}

impl NewSale {
    /// Checks a sale before allocation.
    ///
    /// ## Rules
    /// - `quantity` in `1..=MAX_QUANTITY`
    /// - `selling_price` in `0..=MAX_UNIT_AMOUNT`
    /// - `customer_name` at most 120, `invoice_number` at most 40
    pub fn normalized(self) -> ValidationResult<Self> {
        validate_quantity(self.quantity)?;
        validate_non_negative("selling_price", self.selling_price)?;

        Ok(NewSale {
            product_id: self.product_id,
            quantity: self.quantity,
            selling_price: self.selling_price,
            customer_name: optional_text("customer_name", self.customer_name, MAX_NAME_LEN)?,
            unit_size_value: validate_unit_size(self.unit_size_value)?,
            unit_size_unit: self.unit_size_unit,
            retailer_id: validate_ref("retailer_id", self.retailer_id)?,
            invoice_number: optional_text("invoice_number", self.invoice_number, MAX_INVOICE_LEN)?,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SizeUnit;
    use chrono::NaiveDate;

    fn purchase() -> NewPurchase {
        NewPurchase {
            product_id: 1,
            batch_code: " LDU-01 ".to_string(),
            quantity: 10,
            unit_cost: Money::from_paise(1200),
            expiry_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            supplier_name: Some("".to_string()),
            unit_size_value: Decimal::new(2500, 1),
            unit_size_unit: SizeUnit::G,
            supplier_id: None,
        }
    }

    fn sale() -> NewSale {
        NewSale {
            product_id: 1,
            quantity: 3,
            selling_price: Money::from_paise(1500),
            customer_name: Some("  Sharma Stores ".to_string()),
            unit_size_value: Decimal::ONE,
            unit_size_unit: SizeUnit::Kg,
            retailer_id: None,
            invoice_number: Some(" ".to_string()),
        }
    }

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("name", "  Barfi ", 120).unwrap(), "Barfi");
        assert_eq!(
            required_text("name", "   ", 120),
            Err(ValidationError::Required {
                field: "name".to_string()
            })
        );
        assert!(required_text("name", &"x".repeat(121), 120).is_err());
        assert!(required_text("name", &"ल".repeat(120), 120).is_ok());
    }

    #[test]
    fn test_purchase_normalization() {
        let p = purchase().normalized().unwrap();
        assert_eq!(p.batch_code, "LDU-01");
        assert_eq!(p.supplier_name, None);
        assert_eq!(p.unit_size_value, Decimal::new(250, 0));
    }

    #[test]
    fn test_purchase_rejects_bad_numbers() {
        let mut p = purchase();
        p.quantity = 0;
        assert!(matches!(
            p.normalized(),
            Err(ValidationError::MustBePositive { .. })
        ));

        let mut p = purchase();
        p.unit_cost = Money::from_paise(-1);
        assert!(matches!(p.normalized(), Err(ValidationError::Negative { .. })));

        let mut p = purchase();
        p.unit_size_value = Decimal::ZERO;
        assert!(p.normalized().is_err());

        let mut p = purchase();
        p.supplier_id = Some(0);
        assert!(p.normalized().is_err());
    }

    #[test]
    fn test_quantity_and_amount_upper_bounds() {
        let mut p = purchase();
        p.quantity = MAX_QUANTITY;
        p.unit_cost = MAX_UNIT_AMOUNT;
        assert!(p.normalized().is_ok());

        let mut p = purchase();
        p.quantity = MAX_QUANTITY + 1;
        assert!(matches!(
            p.normalized(),
            Err(ValidationError::OutOfRange { max: MAX_QUANTITY, .. })
        ));

        let mut p = purchase();
        p.unit_cost = Money::from_paise(10_000_000_000_000_000);
        assert_eq!(
            p.normalized().unwrap_err().to_string(),
            "unit_cost must be between 0 and 10000000"
        );

        let mut s = sale();
        s.selling_price = Money::from_paise(MAX_UNIT_AMOUNT.paise() + 1);
        assert!(s.normalized().is_err());

        // The largest line total still fits.
        assert!(MAX_UNIT_AMOUNT.checked_mul(MAX_QUANTITY).is_some());
    }

    #[test]
    fn test_zero_cost_purchase_allowed() {
        let mut p = purchase();
        p.unit_cost = Money::ZERO;
        assert!(p.normalized().is_ok());
    }

    #[test]
    fn test_sale_normalization() {
        let s = sale().normalized().unwrap();
        assert_eq!(s.customer_name.as_deref(), Some("Sharma Stores"));
        assert_eq!(s.invoice_number, None);

        let mut s = sale();
        s.quantity = -2;
        assert!(s.normalized().is_err());

        let mut s = sale();
        s.invoice_number = Some("INV-".repeat(11));
        assert!(matches!(s.normalized(), Err(ValidationError::TooLong { max: 40, .. })));
    }

    #[test]
    fn test_report_limit() {
        assert_eq!(validate_report_limit(None).unwrap(), 5);
        assert_eq!(validate_report_limit(Some(50)).unwrap(), 50);
        assert!(validate_report_limit(Some(0)).is_err());
        assert!(validate_report_limit(Some(51)).is_err());
    }

    #[test]
    fn test_idempotency_key() {
        assert!(validate_idempotency_key("sale-7f3a9c").is_ok());
        assert!(validate_idempotency_key("").is_err());
        assert!(validate_idempotency_key("has space").is_err());
        assert!(validate_idempotency_key(&"k".repeat(129)).is_err());
    }
}
