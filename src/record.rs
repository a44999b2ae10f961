use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;

/// A single schema-less record, the decoded form of one `write` call.
///
/// No shape is imposed beyond "valid JSON": objects, arrays and scalars
/// are all accepted. The sink decides how the value is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    /// Decode exactly one JSON value from `bytes`.
    ///
    /// **Returns**
    /// - `Ok(Record)` if `bytes` contained a single complete JSON value.
    /// - `Err(DecodeError)` on malformed input, trailing data, or more
    ///   than one value per payload.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let value = serde_json::from_slice(bytes)?;
        Ok(Record(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Record(value)
    }
}
