//! Validation rules for network links.
//!
//! [`clean`] runs before every persisted write of a link, whichever path
//! the write comes from. The request guards ([`reject_debt_field`],
//! [`require_products`], [`check_supplier_cycle`]) only apply to writes
//! arriving through the public API.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::hierarchy::{would_create_cycle, SupplierLookup};
use crate::types::DbId;
use crate::validation::ValidationErrors;

pub const FIELD_DEBT: &str = "debt_to_supplier";
pub const FIELD_PRODUCTS: &str = "products";
pub const FIELD_SUPPLIER: &str = "supplier";

pub const MSG_NEGATIVE_DEBT: &str = "Debt to supplier cannot be negative.";
pub const MSG_SELF_SUPPLY: &str = "A network link cannot be its own supplier.";
pub const MSG_DEBT_READ_ONLY: &str = "Updating debt to supplier through the API is forbidden.";
pub const MSG_EMPTY_PRODUCTS: &str = "This field cannot be empty.";
pub const MSG_SUPPLIER_CYCLE: &str = "Supplier chain would form a cycle.";
pub const MSG_DEBT_PRECISION: &str = "Ensure that there are no more than 2 decimal places.";
pub const MSG_DEBT_TOO_LARGE: &str = "Ensure that there are no more than 10 digits in total.";

/// Fraction digits stored for `debt_to_supplier` (`NUMERIC(10, 2)`).
pub const DEBT_SCALE: u32 = 2;

/// Largest value `NUMERIC(10, 2)` can hold.
pub fn max_debt() -> Decimal {
    Decimal::new(99_999_999_99, DEBT_SCALE)
}

/// `debt` at the stored scale, so a zero read back as `0` renders as `0.00`.
pub fn with_debt_scale(mut debt: Decimal) -> Decimal {
    debt.rescale(DEBT_SCALE);
    debt
}

/// The parts of a link the record rules look at.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkState {
    /// `None` for a link that has not been inserted yet.
    pub id: Option<DbId>,
    pub supplier: Option<DbId>,
    pub debt_to_supplier: Decimal,
}

/// Record-level validation of a link about to be saved.
///
/// Every failing rule is reported; nothing is corrected silently.
pub fn clean(link: &LinkState) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if link.debt_to_supplier < Decimal::ZERO {
        errors.add_field(FIELD_DEBT, MSG_NEGATIVE_DEBT);
    }
    if link.debt_to_supplier.normalize().scale() > DEBT_SCALE {
        errors.add_field(FIELD_DEBT, MSG_DEBT_PRECISION);
    }
    if link.debt_to_supplier.abs() > max_debt() {
        errors.add_field(FIELD_DEBT, MSG_DEBT_TOO_LARGE);
    }

    if let (Some(id), Some(supplier)) = (link.id, link.supplier) {
        if id == supplier {
            errors.add_non_field(MSG_SELF_SUPPLY);
        }
    }

    errors.into_result()
}

/// Reject any write payload that mentions `debt_to_supplier`, whatever its
/// value (including `null`).
pub fn reject_debt_field(payload: &Value) -> Result<(), ValidationErrors> {
    match payload {
        Value::Object(map) if map.contains_key(FIELD_DEBT) => {
            Err(ValidationErrors::non_field(MSG_DEBT_READ_ONLY))
        }
        _ => Ok(()),
    }
}

/// A product list supplied on update must name at least one product.
/// An absent list leaves the associations alone.
pub fn require_products(products: Option<&[DbId]>) -> Result<(), ValidationErrors> {
    match products {
        Some([]) => Err(ValidationErrors::field(FIELD_PRODUCTS, MSG_EMPTY_PRODUCTS)),
        _ => Ok(()),
    }
}

/// Reject a supplier assignment that would make `id` transitively supply
/// itself. Direct self-supply is left to [`clean`].
pub fn check_supplier_cycle<L>(
    id: DbId,
    supplier: Option<DbId>,
    lookup: &L,
) -> Result<(), ValidationErrors>
where
    L: SupplierLookup + ?Sized,
{
    match supplier {
        Some(supplier) if supplier != id && would_create_cycle(id, supplier, lookup) => Err(
            ValidationErrors::field(FIELD_SUPPLIER, MSG_SUPPLIER_CYCLE),
        ),
        _ => Ok(()),
    }
}
