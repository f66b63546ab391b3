//! The artifact store abstraction.

use crate::error::Result;

use super::model::{Artifact, PublishRequest};
use super::reference::ArtifactRef;

/// A versioned blob store keyed by artifact name and version.
///
/// Implementations own version assignment: every successful
/// [`publish`](ArtifactStore::publish) yields a version number not used
/// before for that name. Failures are reported as
/// [`SieveError::StoreUnavailable`](crate::SieveError::StoreUnavailable)
/// or [`SieveError::ArtifactNotFound`](crate::SieveError::ArtifactNotFound);
/// callers do not retry.
pub trait ArtifactStore {
    /// Resolve a reference to a published artifact with a readable local path.
    fn resolve(&self, reference: &ArtifactRef) -> Result<Artifact>;

    /// Publish a file as the next version of `request.name`.
    ///
    /// Either the whole version becomes visible or nothing does.
    fn publish(&self, request: PublishRequest) -> Result<Artifact>;

    /// Published versions of `name`, ascending.
    fn versions(&self, name: &str) -> Result<Vec<u32>>;
}

impl<S: ArtifactStore + ?Sized> ArtifactStore for &S {
    fn resolve(&self, reference: &ArtifactRef) -> Result<Artifact> {
        (**self).resolve(reference)
    }

    fn publish(&self, request: PublishRequest) -> Result<Artifact> {
        (**self).publish(request)
    }

    fn versions(&self, name: &str) -> Result<Vec<u32>> {
        (**self).versions(name)
    }
}
