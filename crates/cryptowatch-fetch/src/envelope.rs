//! Response envelope decoding.

use cryptowatch_types::{Allowance, ApiError, Result};
use serde_json::Value;

/// A decoded response envelope.
///
/// Successful responses look like `{"result": ..., "allowance": {"cost": .., "remaining": ..}}`
/// and rejected ones like `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// The `result` payload, if present.
    pub result: Option<Value>,
    /// The `allowance` object, if present.
    pub allowance: Option<Allowance>,
    /// The `error` message, if present.
    pub error: Option<String>,
}

impl Envelope {
    /// Parses a response body into its envelope fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a JSON object or the allowance is malformed.
    pub fn parse(body: &str) -> Result<Self> {
        let Value::Object(mut fields) = serde_json::from_str::<Value>(body)? else {
            return Err(ApiError::Decode(
                "response body is not a JSON object".to_string(),
            ));
        };

        let allowance = fields
            .remove("allowance")
            .map(serde_json::from_value::<Allowance>)
            .transpose()?;

        let error = fields.remove("error").map(|error| match error {
            Value::String(message) => message,
            other => other.to_string(),
        });

        Ok(Self {
            result: fields.remove("result"),
            allowance,
            error,
        })
    }

    /// Takes the `result` payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the envelope has no `result` field.
    pub fn into_result(self) -> Result<Value> {
        self.result
            .ok_or_else(|| ApiError::Decode("response has no result field".to_string()))
    }
}
