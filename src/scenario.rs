//! Named-scenario store
//!
//! The store is an explicit interface owned by the caller, not module
//! state: collaborators inject whatever implementation they want and the
//! core never touches it directly. Values are held as serialized
//! configuration payloads, mirroring how collaborators marshal them.

use std::collections::HashMap;

use thiserror::Error;

use crate::config::ScenarioConfig;

/// Errors raised by scenario storage and marshaling
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario {0:?} not found")]
    NotFound(String),

    #[error("invalid scenario payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl ScenarioConfig {
    /// Serialize for storage or transport
    pub fn to_json(&self) -> Result<String, ScenarioError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a stored payload; absent fields take their defaults
    pub fn from_json(payload: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// Name-keyed scenario storage
pub trait ScenarioStore {
    fn get(&self, name: &str) -> Result<ScenarioConfig, ScenarioError>;
    fn put(&mut self, name: &str, config: &ScenarioConfig) -> Result<(), ScenarioError>;
    /// Remove a scenario; returns whether it existed
    fn delete(&mut self, name: &str) -> bool;
    /// Stored names in sorted order
    fn list(&self) -> Vec<String>;
}

/// In-memory store holding serialized payloads; no persistence
#[derive(Debug, Default)]
pub struct MemoryScenarioStore {
    scenarios: HashMap<String, String>,
}

impl MemoryScenarioStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

impl ScenarioStore for MemoryScenarioStore {
    fn get(&self, name: &str) -> Result<ScenarioConfig, ScenarioError> {
        let payload = self
            .scenarios
            .get(name)
            .ok_or_else(|| ScenarioError::NotFound(name.to_string()))?;
        ScenarioConfig::from_json(payload)
    }

    fn put(&mut self, name: &str, config: &ScenarioConfig) -> Result<(), ScenarioError> {
        let payload = config.to_json()?;
        self.scenarios.insert(name.to_string(), payload);
        Ok(())
    }

    fn delete(&mut self, name: &str) -> bool {
        self.scenarios.remove(name).is_some()
    }

    fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.scenarios.keys().cloned().collect();
        names.sort();
        names
    }
}
