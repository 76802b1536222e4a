//! Free-text conversion options.
//!
//! Users type options as JSON (`{"dpi":300}`). Malformed text never blocks a
//! submission: [`ConversionOptions::parse`] falls back to an empty object and
//! the server decides whether the options make sense for the target.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Why a raw options payload could not be turned into [`ConversionOptions`].
#[derive(Debug, Error)]
pub enum OptionParseError {
    #[error("options are not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("options must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Target-specific option keys and values, always a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversionOptions(Map<String, Value>);

impl ConversionOptions {
    /// Parses `raw`, returning an empty mapping for blank or malformed input.
    pub fn parse(raw: &str) -> Self {
        match Self::try_parse(raw) {
            Ok(options) => options,
            Err(e) => {
                debug!(error = %e, "ignoring unparseable conversion options");
                Self::default()
            }
        }
    }

    /// Strict variant of [`parse`](Self::parse) that reports the failure.
    pub fn try_parse(raw: &str) -> Result<Self, OptionParseError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }
        match serde_json::from_str::<Value>(raw)? {
            Value::Object(map) => Ok(Self(map)),
            Value::Array(_) => Err(OptionParseError::NotAnObject("an array")),
            Value::String(_) => Err(OptionParseError::NotAnObject("a string")),
            Value::Number(_) => Err(OptionParseError::NotAnObject("a number")),
            Value::Bool(_) => Err(OptionParseError::NotAnObject("a boolean")),
            Value::Null => Err(OptionParseError::NotAnObject("null")),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Compact JSON text, as sent in the `options` form field.
    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}
