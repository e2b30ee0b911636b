// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Display configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! precision = 4
//! summary_limit = 16
//! ```

use std::path::Path;

use crate::TensorError;

/// Controls how tensors, views and broadcasts are rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DisplayOptions {
    /// Digits after the decimal point.
    #[serde(default = "default_precision")]
    pub precision: usize,
    /// Maximum number of flattened values printed for rank ≥ 3 before the
    /// output is cut short with `...`.
    #[serde(default = "default_summary_limit")]
    pub summary_limit: usize,
}

fn default_precision() -> usize {
    2
}

fn default_summary_limit() -> usize {
    32
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            summary_limit: default_summary_limit(),
        }
    }
}

impl DisplayOptions {
    /// Loads options from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, TensorError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TensorError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses options from a TOML string. Missing keys take their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, TensorError> {
        toml::from_str(toml_str)
            .map_err(|e| TensorError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises options to TOML.
    pub fn to_toml(&self) -> Result<String, TensorError> {
        toml::to_string_pretty(self)
            .map_err(|e| TensorError::Config(format!("TOML serialise error: {e}")))
    }
}
