//! Published artifacts and publish requests.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::reference::ArtifactId;

/// An immutable, versioned file with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    /// Artifact name.
    pub name: String,
    /// Version assigned by the store, starting at 1.
    pub version: u32,
    /// Type tag, e.g. `clean_sample`.
    #[serde(rename = "type")]
    pub artifact_type: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Name of the backing file inside the version directory.
    pub file_name: String,
    /// Local path of the backing file. Filled in by the store.
    #[serde(skip)]
    pub path: PathBuf,
    /// SHA-256 of the backing file (`sha256:<hex>`).
    pub digest: String,
    /// Size of the backing file.
    pub size_bytes: u64,
    /// When the version was published.
    pub created_at: DateTime<Utc>,
    /// Artifacts this one was derived from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lineage: Vec<ArtifactId>,
    /// Run that produced this version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produced_by: Option<String>,
    /// Extra key-value metadata, in insertion order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub metadata: IndexMap<String, JsonValue>,
}

impl Artifact {
    pub fn id(&self) -> ArtifactId {
        ArtifactId::new(self.name.clone(), self.version)
    }
}

/// Everything a store needs to publish a new artifact version.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub name: String,
    pub artifact_type: String,
    pub description: String,
    /// File to publish; the store copies it.
    pub file: PathBuf,
    pub lineage: Vec<ArtifactId>,
    pub produced_by: Option<String>,
    pub metadata: IndexMap<String, JsonValue>,
}

impl PublishRequest {
    pub fn new(
        name: impl Into<String>,
        artifact_type: impl Into<String>,
        file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            artifact_type: artifact_type.into(),
            description: String::new(),
            file: file.into(),
            lineage: Vec::new(),
            produced_by: None,
            metadata: IndexMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Record an input this artifact was derived from.
    pub fn with_input(mut self, input: ArtifactId) -> Self {
        self.lineage.push(input);
        self
    }

    pub fn with_produced_by(mut self, run_id: impl Into<String>) -> Self {
        self.produced_by = Some(run_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
