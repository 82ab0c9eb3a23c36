use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Settings for a debug session.
///
/// Every field has a default, so the struct can be embedded in a host's own
/// configuration file and only the overrides need to be spelled out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugOptions {
    /// Kernel recorded in the notebook's `metadata.kernelspec`.
    pub kernel_name: String,
    /// One level of body indentation, stripped from cells and added back on write-back.
    /// `None` uses the indentation found in the function body.
    pub indent: Option<String>,
    /// Directory for the temp notebook; the system temp directory when `None`.
    pub temp_dir: Option<PathBuf>,
}

impl Default for DebugOptions {
    fn default() -> Self {
        Self {
            kernel_name: "python3".to_owned(),
            indent: None,
            temp_dir: None,
        }
    }
}

impl DebugOptions {
    #[must_use]
    pub fn with_kernel_name(mut self, kernel_name: impl Into<String>) -> Self {
        self.kernel_name = kernel_name.into();
        self
    }

    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = Some(indent.into());
        self
    }

    #[must_use]
    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(temp_dir.into());
        self
    }

    pub(crate) fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
