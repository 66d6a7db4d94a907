//! Tag-driven validation: the condition chain and whole-record checks.

mod condition;

#[cfg(test)]
mod tests;

pub use condition::{Condition, ConditionKind, IntWidth, Rule};

use crate::{
    Error,
    catalog::Catalog,
    error::ErrorClass,
    property::{Property, decode_default},
    value::Value,
};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// ValidationError
///
/// Internal: the rule got a value of the wrong basic kind; a caller or
/// schema bug. User: a well-typed value broke a declared constraint; safe
/// to show verbatim.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValidationError {
    #[error("{message}")]
    Internal { property: String, message: String },

    #[error("{message}")]
    User { property: String, message: String },
}

impl ValidationError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Internal { .. } => ErrorClass::InternalValidation,
            Self::User { .. } => ErrorClass::UserValidation,
        }
    }

    #[must_use]
    pub fn property(&self) -> &str {
        match self {
            Self::Internal { property, .. } | Self::User { property, .. } => property,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Internal { message, .. } | Self::User { message, .. } => message,
        }
    }
}

/// Build the chain for `property` and run it; stops at the first failure.
pub fn verify_property(property: &dyn Property, value: &Value) -> Result<(), Error> {
    for condition in Condition::build(property)? {
        if let Err(err) = condition.verify(value) {
            match &err {
                ValidationError::Internal { message, .. } => tracing::warn!(
                    owner = property.owner(),
                    property = property.name(),
                    %message,
                    "internal validation failure"
                ),
                ValidationError::User { message, .. } => tracing::debug!(
                    property = property.name(),
                    %message,
                    "value rejected"
                ),
            }

            return Err(err.into());
        }
    }

    Ok(())
}

/// Null on a nullable property is accepted without running the chain.
fn check(property: &dyn Property, value: &Value) -> Result<(), Error> {
    if property.is_nullable() && value.is_null() {
        return Ok(());
    }

    verify_property(property, value)
}

impl Catalog {
    /// Validate a full record for `path`. Each property takes the supplied
    /// value, else its decoded `@default`, else fails as not set.
    pub fn validate(&self, path: &str, values: &BTreeMap<String, Value>) -> Result<(), Error> {
        for property in self.properties(path)?.iter() {
            let value = if let Some(value) = values.get(property.name()) {
                value.clone()
            } else if property.has_tag("default") {
                match property.tag("default") {
                    Some(raw) => decode_default(property.as_ref(), raw)?,
                    None => Value::Null,
                }
            } else {
                return Err(ValidationError::User {
                    property: property.name().to_string(),
                    message: format!("{} was not set", property.name()),
                }
                .into());
            };

            check(property.as_ref(), &value)?;
        }

        Ok(())
    }

    /// Validate one value against every descriptor named `name`. Unknown
    /// names pass.
    pub fn validate_one(&self, path: &str, name: &str, value: &Value) -> Result<(), Error> {
        for property in self.properties(path)?.iter().filter(|p| p.name() == name) {
            check(property.as_ref(), value)?;
        }

        Ok(())
    }
}
