//! Versioned artifacts and the store that holds them.

mod local;
mod model;
mod reference;
mod store;

pub use local::{file_digest, LocalArtifactStore, MANIFEST_FILE};
pub use model::{Artifact, PublishRequest};
pub use reference::{validate_artifact_name, ArtifactId, ArtifactRef, VersionSpec};
pub use store::ArtifactStore;
