//! Postal address owned by a network link.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Full address. Every sub-field is required when an address is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Address {
    #[validate(length(min = 1, max = 100, message = "Ensure this field has 1 to 100 characters."))]
    pub country: String,
    #[validate(length(min = 1, max = 100, message = "Ensure this field has 1 to 100 characters."))]
    pub city: String,
    #[validate(length(min = 1, max = 255, message = "Ensure this field has 1 to 255 characters."))]
    pub street: String,
    #[validate(length(min = 1, max = 10, message = "Ensure this field has 1 to 10 characters."))]
    pub house_number: String,
}

/// Address sub-fields supplied on update. Absent sub-fields keep their
/// current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressPatch {
    pub country: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
}

impl AddressPatch {
    /// Overlay the present sub-fields onto `current`.
    pub fn apply(self, current: Address) -> Address {
        Address {
            country: self.country.unwrap_or(current.country),
            city: self.city.unwrap_or(current.city),
            street: self.street.unwrap_or(current.street),
            house_number: self.house_number.unwrap_or(current.house_number),
        }
    }
}
