//! Request-body plumbing shared by write handlers.
//!
//! Bodies are first read as raw JSON so guards can inspect which keys were
//! sent (a present-but-`null` field differs from an absent one), then
//! deserialized into the handler's DTO. Malformed JSON and type mismatches
//! are reported as validation errors rather than axum's plain-text
//! rejections, keyed by the field they concern.

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tradenet_core::validation::ValidationErrors;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Message reported for a field the request must include.
pub const MSG_REQUIRED: &str = "This field is required.";

/// Raw JSON object body.
#[derive(Debug)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::from(ValidationErrors::non_field(rejection.body_text()))
            })?;
        if !value.is_object() {
            return Err(ValidationErrors::non_field("Expected a JSON object.").into());
        }
        Ok(JsonBody(value))
    }
}

impl JsonBody {
    /// Deserialize into `T`, then run its `validator` rules.
    pub fn parse<T>(self) -> AppResult<T>
    where
        T: DeserializeOwned + Validate,
    {
        let input: T = serde_path_to_error::deserialize(self.0)
            .map_err(|err| AppError::from(deserialize_errors(&err)))?;
        input.validate().map_err(ValidationErrors::from)?;
        Ok(input)
    }
}

/// Key a deserialization failure by the field it concerns.
///
/// A missing field is reported under its own name with [`MSG_REQUIRED`];
/// a bad value under the path of that value (`address.city`,
/// `products[1]`). Only failures of the body as a whole are record-level.
fn deserialize_errors(err: &serde_path_to_error::Error<serde_json::Error>) -> ValidationErrors {
    let at_root = err.path().iter().next().is_none();
    let path = err.path().to_string();
    let message = err.inner().to_string();

    if let Some(field) = missing_field(&message) {
        let key = if at_root {
            field.to_string()
        } else {
            format!("{path}.{field}")
        };
        return ValidationErrors::field(key, MSG_REQUIRED);
    }
    if at_root {
        ValidationErrors::non_field(format!("Invalid request body: {message}"))
    } else {
        ValidationErrors::field(path, message)
    }
}

/// Field name out of serde's "missing field `name`" message.
fn missing_field(message: &str) -> Option<&str> {
    message.strip_prefix("missing field `")?.strip_suffix('`')
}

/// Deserialize a present field as `Some(..)`, so that with
/// `#[serde(default)]` an absent field is `None` and an explicit `null` is
/// `Some(None)`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
