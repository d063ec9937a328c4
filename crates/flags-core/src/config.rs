//! Flag configuration input
//!
//! The client hands its feature flags over as a loosely typed object:
//!
//! ```text
//! { "runInLiteMode": true, "ssrcRewritingEnabled": 1 }
//! ```
//!
//! Both options are optional and any value is accepted. A value enables its
//! flag when it is truthy, see [`is_truthy`]. The same object can be read
//! from a TOML file with [`FlagsInit::load`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{FlagsError, Result};
use crate::flags::FlagState;

/// Key of the lite mode option
pub const RUN_IN_LITE_MODE_KEY: &str = "runInLiteMode";

/// Key of the SSRC rewriting option
pub const SSRC_REWRITING_ENABLED_KEY: &str = "ssrcRewritingEnabled";

/// Options accepted by [`FeatureFlags::init`](crate::FeatureFlags::init)
///
/// Unset options leave their flag `false`; there is no merge with state
/// from an earlier `init`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagsInit {
    /// Enables lite mode, which discards received media before decode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_in_lite_mode: Option<Value>,
    /// Trust SSRC rewriting performed by the bridge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssrc_rewriting_enabled: Option<Value>,
}

impl FlagsInit {
    /// Create an empty configuration; both flags resolve to `false`
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lite mode option
    pub fn with_run_in_lite_mode(mut self, value: impl Into<Value>) -> Self {
        self.run_in_lite_mode = Some(value.into());
        self
    }

    /// Set the SSRC rewriting option
    pub fn with_ssrc_rewriting_enabled(mut self, value: impl Into<Value>) -> Self {
        self.ssrc_rewriting_enabled = Some(value.into());
        self
    }

    /// Read the options out of a JSON value
    ///
    /// Fails with [`FlagsError::InvalidConfiguration`] unless `value` is an
    /// object. Unknown keys are ignored.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => return Err(FlagsError::invalid_configuration(value_kind(other))),
        };

        Ok(Self {
            run_in_lite_mode: map.get(RUN_IN_LITE_MODE_KEY).cloned(),
            ssrc_rewriting_enabled: map.get(SSRC_REWRITING_ENABLED_KEY).cloned(),
        })
    }

    /// Parse the options from a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(contents)?;
        Self::from_value(&toml_to_json(toml::Value::Table(table)))
    }

    /// Load the options from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| FlagsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let init = Self::from_toml_str(&contents)?;
        debug!("Loaded feature flags from {}: {:?}", path.display(), init);
        Ok(init)
    }

    /// Coerce both options to booleans
    pub fn resolve(&self) -> FlagState {
        FlagState {
            run_in_lite_mode: option_is_truthy(self.run_in_lite_mode.as_ref()),
            ssrc_rewriting_enabled: option_is_truthy(self.ssrc_rewriting_enabled.as_ref()),
        }
    }
}

/// Loose boolean coercion
///
/// `null`, `false`, `0`, `0.0` and `""` are falsy. Everything else is truthy,
/// including `"false"`, `"0"`, empty arrays and empty objects.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Convert a TOML value for truthiness checks
///
/// JSON numbers are finite, so `inf`/`-inf` become `true` and `nan` becomes
/// `false`. Datetimes are kept as their string form.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) if f.is_nan() => Value::Bool(false),
        toml::Value::Float(f) if f.is_infinite() => Value::Bool(true),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}

fn option_is_truthy(value: Option<&Value>) -> bool {
    value.map_or(false, is_truthy)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
