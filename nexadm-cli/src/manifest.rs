//! Manifest loading: a YAML list of declared resources.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use nexadm_client::Intent;

#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}

/// One declared resource instance.
#[derive(Debug, Deserialize)]
pub struct ResourceEntry {
    /// Registry kind name, e.g. `routing-rule` or `repository-maven-hosted`.
    pub kind: String,
    #[serde(default)]
    pub state: State,
    /// The desired spec, passed to the engine as an opaque tree.
    pub spec: Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    #[default]
    Present,
    Absent,
}

impl From<State> for Intent {
    fn from(state: State) -> Self {
        match state {
            State::Present => Intent::Present,
            State::Absent => Intent::Absent,
        }
    }
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse manifest {}", path.display()))
    }
}
