//! Run-scoped values shared between the steps of one job.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{HarnessError, Result};
use crate::steps::Outputs;

/// Values produced by completed steps, keyed by name.
///
/// Every key is written at most once per run, and only by the executor
/// after the producing step has succeeded. Steps and wiring functions get
/// read-only access, so a value observed by one step can never change under
/// a later one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionContext {
    values: BTreeMap<String, Value>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value produced by an earlier step.
    pub fn get(&self, key: &str) -> Result<&Value> {
        self.values.get(key).ok_or_else(|| HarnessError::MissingKey {
            key: key.to_string(),
        })
    }

    /// Look up a string value.
    ///
    /// A value that exists but is not a JSON string is reported as missing;
    /// callers that accept other shapes should use [`get`](Self::get).
    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.get(key)?
            .as_str()
            .ok_or_else(|| HarnessError::MissingKey {
                key: key.to_string(),
            })
    }

    /// Deserialize a value into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self.get(key)?.clone();
        serde_json::from_value(value).map_err(|e| {
            HarnessError::Other(anyhow::anyhow!(
                "Context key '{}' has an unexpected shape: {}",
                key,
                e
            ))
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Record one value. Rejects keys that are already present.
    pub(crate) fn insert(&mut self, key: String, value: Value, step: &str) -> Result<()> {
        if self.values.contains_key(&key) {
            return Err(HarnessError::DuplicateKey {
                key,
                step: step.to_string(),
            });
        }
        self.values.insert(key, value);
        Ok(())
    }

    /// Commit every output of `step`, or none of them.
    pub(crate) fn merge(&mut self, outputs: Outputs, step: &str) -> Result<()> {
        if let Some(key) = outputs.keys().find(|k| self.values.contains_key(*k)) {
            return Err(HarnessError::DuplicateKey {
                key: key.to_string(),
                step: step.to_string(),
            });
        }
        for (key, value) in outputs {
            self.insert(key, value, step)?;
        }
        Ok(())
    }
}
