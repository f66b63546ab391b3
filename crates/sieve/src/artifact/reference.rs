//! Artifact names, versions, and references.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SieveError};

static ARTIFACT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,127}$").expect("valid artifact name pattern")
});

/// Check that a name is usable as an artifact name and file name.
pub fn validate_artifact_name(name: &str) -> Result<()> {
    if ARTIFACT_NAME.is_match(name) {
        Ok(())
    } else {
        Err(SieveError::Configuration(format!(
            "invalid artifact name '{}': use letters, digits, '.', '_' or '-'",
            name
        )))
    }
}

/// Which version of an artifact a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSpec {
    /// The highest published version.
    Latest,
    /// One specific version (1-based).
    Exact(u32),
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Latest => write!(f, "latest"),
            VersionSpec::Exact(v) => write!(f, "v{}", v),
        }
    }
}

/// A `name[:version]` reference to an artifact.
///
/// Versions may be written `latest`, `3` or `v3`; a missing version
/// means `latest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub name: String,
    pub version: VersionSpec,
}

impl ArtifactRef {
    pub fn latest(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: VersionSpec::Latest,
        }
    }

    pub fn exact(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version: VersionSpec::Exact(version),
        }
    }
}

impl FromStr for ArtifactRef {
    type Err = SieveError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, version) = match s.rsplit_once(':') {
            Some((name, version)) => (name, Some(version)),
            None => (s, None),
        };
        validate_artifact_name(name)?;

        let version = match version {
            None | Some("latest") => VersionSpec::Latest,
            Some(v) => {
                let digits = v.strip_prefix('v').unwrap_or(v);
                match digits.parse::<u32>() {
                    Ok(n) if n > 0 => VersionSpec::Exact(n),
                    _ => {
                        return Err(SieveError::Configuration(format!(
                            "invalid artifact version '{}' in '{}'",
                            v, s
                        )));
                    }
                }
            }
        };

        Ok(Self {
            name: name.to_string(),
            version,
        })
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

/// A concrete, published artifact version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactId {
    pub name: String,
    pub version: u32,
}

impl ArtifactId {
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:v{}", self.name, self.version)
    }
}

impl From<&ArtifactId> for ArtifactRef {
    fn from(id: &ArtifactId) -> Self {
        ArtifactRef::exact(id.name.clone(), id.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference() {
        let r: ArtifactRef = "sample.csv:latest".parse().unwrap();
        assert_eq!(r, ArtifactRef::latest("sample.csv"));

        let r: ArtifactRef = "sample.csv".parse().unwrap();
        assert_eq!(r.version, VersionSpec::Latest);

        let r: ArtifactRef = "sample.csv:v3".parse().unwrap();
        assert_eq!(r, ArtifactRef::exact("sample.csv", 3));

        let r: ArtifactRef = "sample.csv:2".parse().unwrap();
        assert_eq!(r.version, VersionSpec::Exact(2));
    }

    #[test]
    fn test_parse_invalid_reference() {
        assert!("".parse::<ArtifactRef>().is_err());
        assert!(":v1".parse::<ArtifactRef>().is_err());
        assert!("sample.csv:v0".parse::<ArtifactRef>().is_err());
        assert!("sample.csv:newest".parse::<ArtifactRef>().is_err());
        assert!("../escape:v1".parse::<ArtifactRef>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ArtifactRef::latest("a").to_string(), "a:latest");
        assert_eq!(ArtifactRef::exact("a", 4).to_string(), "a:v4");
        assert_eq!(ArtifactId::new("clean_sample.csv", 2).to_string(), "clean_sample.csv:v2");
    }

    #[test]
    fn test_validate_artifact_name() {
        assert!(validate_artifact_name("clean_sample.csv").is_ok());
        assert!(validate_artifact_name("raw-data.v2").is_ok());
        assert!(validate_artifact_name(".hidden").is_err());
        assert!(validate_artifact_name("a/b").is_err());
        assert!(validate_artifact_name("with space").is_err());
    }
}
