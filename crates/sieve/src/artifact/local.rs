//! Directory-backed artifact store.
//!
//! ```text
//! <root>/
//! └── clean_sample.csv/
//!     ├── v1/
//!     │   ├── artifact.json      # manifest
//!     │   └── clean_sample.csv   # backing file
//!     └── v2/
//!         └── ...
//! ```

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{Result, SieveError};

use super::model::{Artifact, PublishRequest};
use super::reference::{validate_artifact_name, ArtifactRef, VersionSpec};
use super::store::ArtifactStore;

/// File name of the per-version manifest.
pub const MANIFEST_FILE: &str = "artifact.json";

/// Artifact store rooted at a local directory.
///
/// A version is staged in a hidden directory and renamed into place, so
/// readers never observe a half-written version and two publishers can
/// never share a version number.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn artifact_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn version_dir(&self, name: &str, version: u32) -> PathBuf {
        self.artifact_dir(name).join(format!("v{}", version))
    }

    fn ensure_root(&self) -> Result<()> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(SieveError::StoreUnavailable(format!(
                "store root '{}' does not exist",
                self.root.display()
            )))
        }
    }

    fn load_manifest(&self, name: &str, version: u32) -> Result<Artifact> {
        let dir = self.version_dir(name, version);
        let manifest_path = dir.join(MANIFEST_FILE);

        let file = File::open(&manifest_path).map_err(|e| {
            SieveError::StoreUnavailable(format!(
                "failed to open manifest '{}': {}",
                manifest_path.display(),
                e
            ))
        })?;
        let mut artifact: Artifact =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                SieveError::StoreUnavailable(format!(
                    "failed to parse manifest '{}': {}",
                    manifest_path.display(),
                    e
                ))
            })?;

        artifact.path = dir.join(&artifact.file_name);
        Ok(artifact)
    }

    fn stage_version(&self, request: &PublishRequest, staging: &Path) -> Result<Artifact> {
        let file_name = request
            .file
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| {
                SieveError::Configuration(format!(
                    "publish source '{}' has no file name",
                    request.file.display()
                ))
            })?;

        fs::create_dir_all(staging).map_err(|e| store_io("create staging directory", staging, e))?;

        let target = staging.join(&file_name);
        fs::copy(&request.file, &target).map_err(|e| SieveError::io(&request.file, e))?;
        let (digest, size_bytes) = file_digest(&target)?;

        let artifact = Artifact {
            name: request.name.clone(),
            version: 0,
            artifact_type: request.artifact_type.clone(),
            description: request.description.clone(),
            file_name,
            path: target,
            digest,
            size_bytes,
            created_at: Utc::now(),
            lineage: request.lineage.clone(),
            produced_by: request.produced_by.clone(),
            metadata: request.metadata.clone(),
        };
        Ok(artifact)
    }

    fn write_manifest(artifact: &Artifact, dir: &Path) -> Result<()> {
        let path = dir.join(MANIFEST_FILE);
        let file = File::create(&path).map_err(|e| store_io("write manifest", &path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, artifact)?;
        writer
            .flush()
            .map_err(|e| store_io("write manifest", &path, e))?;
        Ok(())
    }
}

impl ArtifactStore for LocalArtifactStore {
    fn resolve(&self, reference: &ArtifactRef) -> Result<Artifact> {
        self.ensure_root()?;

        let version = match reference.version {
            VersionSpec::Exact(v) => v,
            VersionSpec::Latest => self
                .versions(&reference.name)?
                .last()
                .copied()
                .ok_or_else(|| SieveError::ArtifactNotFound(reference.to_string()))?,
        };

        if !self.version_dir(&reference.name, version).is_dir() {
            return Err(SieveError::ArtifactNotFound(reference.to_string()));
        }

        let artifact = self.load_manifest(&reference.name, version)?;
        let (digest, _) = file_digest(&artifact.path)?;
        if digest != artifact.digest {
            return Err(SieveError::StoreUnavailable(format!(
                "digest mismatch for {}: manifest {}, file {}",
                artifact.id(),
                artifact.digest,
                digest
            )));
        }

        debug!(artifact = %artifact.id(), path = %artifact.path.display(), "resolved artifact");
        Ok(artifact)
    }

    fn publish(&self, request: PublishRequest) -> Result<Artifact> {
        validate_artifact_name(&request.name)?;
        if !request.file.is_file() {
            return Err(SieveError::io(
                &request.file,
                std::io::Error::new(std::io::ErrorKind::NotFound, "publish source is not a file"),
            ));
        }

        let artifact_dir = self.artifact_dir(&request.name);
        fs::create_dir_all(&artifact_dir)
            .map_err(|e| store_io("create artifact directory", &artifact_dir, e))?;

        let staging = artifact_dir.join(format!(
            ".staging-{}-{}",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));

        let result = self.stage_version(&request, &staging).and_then(|mut artifact| {
            let version = self.versions(&request.name)?.last().copied().unwrap_or(0) + 1;
            artifact.version = version;
            Self::write_manifest(&artifact, &staging)?;

            let final_dir = self.version_dir(&request.name, version);
            if final_dir.exists() {
                return Err(SieveError::StoreUnavailable(format!(
                    "version {} of '{}' already exists",
                    version, request.name
                )));
            }
            fs::rename(&staging, &final_dir)
                .map_err(|e| store_io("move staged version into place", &final_dir, e))?;

            artifact.path = final_dir.join(&artifact.file_name);
            Ok(artifact)
        });

        match result {
            Ok(artifact) => {
                info!(
                    artifact = %artifact.id(),
                    digest = %artifact.digest,
                    size_bytes = artifact.size_bytes,
                    "published artifact"
                );
                Ok(artifact)
            }
            Err(e) => {
                if staging.exists() {
                    if let Err(cleanup) = fs::remove_dir_all(&staging) {
                        warn!(path = %staging.display(), error = %cleanup, "failed to remove staging directory");
                    }
                }
                Err(e)
            }
        }
    }

    fn versions(&self, name: &str) -> Result<Vec<u32>> {
        self.ensure_root()?;
        let dir = self.artifact_dir(name);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut versions: Vec<u32> = fs::read_dir(&dir)
            .map_err(|e| store_io("list versions", &dir, e))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().join(MANIFEST_FILE).is_file())
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .and_then(|n| n.strip_prefix('v'))
                    .and_then(|n| n.parse::<u32>().ok())
            })
            .collect();

        versions.sort_unstable();
        Ok(versions)
    }
}

/// SHA-256 digest and size of a file.
pub fn file_digest(path: &Path) -> Result<(String, u64)> {
    let file = File::open(path).map_err(|e| store_io("read", path, e))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    let mut size = 0u64;

    loop {
        let n = reader.read(&mut buf).map_err(|e| store_io("read", path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        size += n as u64;
    }

    Ok((format!("sha256:{:x}", hasher.finalize()), size))
}

fn store_io(action: &str, path: &Path, e: std::io::Error) -> SieveError {
    SieveError::StoreUnavailable(format!("failed to {} '{}': {}", action, path.display(), e))
}
