use serde::{Deserialize, Serialize};

use super::Result;

/// Registry settings.
///
/// Deserializes from JSON with every field optional:
/// `{"max_cells": 1024}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Upper bound on simultaneously live cells.
    pub max_cells: usize,
}

impl RegistryConfig {
    /// Default value of [`max_cells`](Self::max_cells).
    pub const DEFAULT_MAX_CELLS: usize = 65_536;

    /// Parses a JSON config document.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Sets the cell limit.
    #[must_use]
    pub const fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_cells: Self::DEFAULT_MAX_CELLS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        assert_eq!(RegistryConfig::from_json("{}").unwrap(), RegistryConfig::default());
        assert_eq!(
            RegistryConfig::from_json(r#"{"max_cells": 4}"#).unwrap().max_cells,
            4
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = RegistryConfig::from_json(r#"{"max_cels": 4}"#).unwrap_err();
        assert_eq!(err.kind(), "decode");
    }
}
