//! Tagged modification request payloads
//!
//! A request is a variant tag plus job-specific fields. The tag is the only
//! part this crate interprets; the fields stay opaque until a job decodes
//! them. On the wire the tag travels as the `type` field:
//!
//! ```json
//! { "type": "PurgeRequest", "table": "shard_2024", "dry_run": false }
//! ```

use crate::error::{CoreError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Field name carrying the variant tag
pub const VARIANT_FIELD: &str = "type";

/// Discriminant identifying the shape of a modification request
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestVariant(String);

impl RequestVariant {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestVariant {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for RequestVariant {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

/// A request shape with a fixed variant tag
///
/// Implemented by job-specific payload structs so jobs can build and decode
/// requests without spelling the tag by hand.
pub trait TypedRequest: Serialize + DeserializeOwned {
    /// Variant tag for this payload type
    const VARIANT: &'static str;

    fn variant() -> RequestVariant {
        RequestVariant::new(Self::VARIANT)
    }
}

/// A submitted modification request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModificationRequest {
    #[serde(rename = "type")]
    variant: RequestVariant,

    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl ModificationRequest {
    /// Create a request with no fields
    pub fn new(variant: impl Into<RequestVariant>) -> Self {
        Self {
            variant: variant.into(),
            fields: Map::new(),
        }
    }

    /// Build a request from a typed payload
    pub fn from_typed<T: TypedRequest>(payload: &T) -> Result<Self> {
        Self::from_payload(T::variant(), payload)
    }

    /// Build a request from any serializable payload under the given tag
    ///
    /// The payload must serialize to a JSON object and must not use the
    /// reserved `type` field.
    pub fn from_payload<T: Serialize>(
        variant: impl Into<RequestVariant>,
        payload: &T,
    ) -> Result<Self> {
        let variant = variant.into();
        match serde_json::to_value(payload)? {
            Value::Object(fields) => {
                if fields.contains_key(VARIANT_FIELD) {
                    return Err(CoreError::ReservedField(VARIANT_FIELD.into()));
                }
                Ok(Self { variant, fields })
            }
            _ => Err(CoreError::PayloadNotObject(variant.to_string())),
        }
    }

    /// Add a field (builder pattern)
    ///
    /// # Returns
    /// * `Err(CoreError::ReservedField)` if `key` is the reserved `type`
    ///   field; the tag is fixed at construction
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Result<Self> {
        let key = key.into();
        if key == VARIANT_FIELD {
            return Err(CoreError::ReservedField(key));
        }
        self.fields.insert(key, value);
        Ok(self)
    }

    pub fn variant(&self) -> &RequestVariant {
        &self.variant
    }

    /// Job-specific fields, excluding the tag
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Decode the fields into a payload struct regardless of tag
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }

    /// Decode into a typed payload, checking the tag first
    pub fn decode_typed<T: TypedRequest>(&self) -> Result<T> {
        if self.variant.as_str() != T::VARIANT {
            return Err(CoreError::VariantMismatch {
                expected: T::VARIANT.into(),
                actual: self.variant.to_string(),
            });
        }
        self.decode()
    }
}
