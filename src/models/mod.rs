//! In-memory records exchanged between handlers and repositories.
//!
//! A record is built from an untrusted JSON document in two steps: the
//! document is parsed into a typed payload (presence and JSON type of each
//! key), then the payload is validated for column limits before it is
//! applied onto the record.

pub mod item;
pub mod wishlist;

pub use item::{Item, ItemPayload, ItemResponse};
pub use wishlist::{Wishlist, WishlistPayload, WishlistResponse};

use serde_json::{Map, Value};
use thiserror::Error;
use validator::ValidationErrors;

/// Reasons an incoming document cannot be turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataValidationError {
    #[error("Invalid {entity}: missing {field}")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("Invalid {entity}: body of request contained bad or no data")]
    BadData { entity: &'static str },

    #[error("Invalid {entity}: {field} {reason}")]
    InvalidField {
        entity: &'static str,
        field: &'static str,
        reason: String,
    },
}

/// Keyed view over a JSON object, reporting errors against `entity`.
pub(crate) struct Document<'a> {
    entity: &'static str,
    fields: &'a Map<String, Value>,
}

impl<'a> Document<'a> {
    pub(crate) fn parse(entity: &'static str, data: &'a Value) -> Result<Self, DataValidationError> {
        match data {
            Value::Object(fields) => Ok(Self { entity, fields }),
            _ => Err(DataValidationError::BadData { entity }),
        }
    }

    fn required(&self, field: &'static str) -> Result<&'a Value, DataValidationError> {
        self.fields
            .get(field)
            .ok_or(DataValidationError::MissingField {
                entity: self.entity,
                field,
            })
    }

    fn invalid(&self, field: &'static str, reason: &str) -> DataValidationError {
        DataValidationError::InvalidField {
            entity: self.entity,
            field,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn string(&self, field: &'static str) -> Result<String, DataValidationError> {
        match self.required(field)? {
            Value::String(value) => Ok(value.clone()),
            _ => Err(self.invalid(field, "must be a string")),
        }
    }

    pub(crate) fn integer(&self, field: &'static str) -> Result<i32, DataValidationError> {
        self.required(field)?
            .as_i64()
            .and_then(|value| i32::try_from(value).ok())
            .ok_or_else(|| self.invalid(field, "must be an integer"))
    }
}

/// Picks the first failing field (in `order`) out of a validator report.
pub(crate) fn first_invalid_field(
    entity: &'static str,
    order: &[&'static str],
    errors: &ValidationErrors,
) -> DataValidationError {
    let field_errors = errors.field_errors();
    for &field in order {
        if let Some(reason) = field_errors
            .get(field)
            .and_then(|errs| errs.first())
            .map(|err| {
                err.message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| err.code.to_string())
            })
        {
            return DataValidationError::InvalidField {
                entity,
                field,
                reason,
            };
        }
    }
    DataValidationError::BadData { entity }
}
