pub mod admin;
pub mod auth;
pub mod network_links;
pub mod products;

use tradenet_core::types::DbId;
use tradenet_core::validation::ValidationErrors;

/// Record a field error for every id in `requested` that is not in
/// `existing`.
pub(crate) fn report_missing_ids(
    errors: &mut ValidationErrors,
    field: &str,
    requested: &[DbId],
    existing: &[DbId],
) {
    for id in requested {
        if !existing.contains(id) {
            errors.add_field(field, does_not_exist(*id));
        }
    }
}

pub(crate) fn does_not_exist(id: DbId) -> String {
    format!("Invalid pk \"{id}\" - object does not exist.")
}
