use super::FlowDefinition;
use crate::error::DocumentError;
use std::fs;

impl FlowDefinition {
    /// Parses a canonical workflow document.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the workflow as a pretty-printed canonical document.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Saves the workflow to a file as a canonical JSON document.
    pub fn save(&self, path: &str) -> Result<(), DocumentError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| DocumentError::Io {
            path: path.to_string(),
            source,
        })
    }

    /// Loads a workflow from a canonical JSON document.
    pub fn from_file(path: &str) -> Result<Self, DocumentError> {
        let json = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}
