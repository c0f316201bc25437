//! The package catalog: which Exchange submissions to install.
//!
//! A catalog is an ordered list of entries, each naming one submission
//! by its numeric id, with an optional GitHub mirror reference for
//! submissions that are developed on GitHub. Catalogs come from the
//! built-in table or from a caller-supplied JSON file, and are
//! validated up front: a malformed catalog fails the whole run before
//! any network fetch begins.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("Failed to read catalog file '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The catalog file was not valid JSON.
    #[error("Failed to parse catalog file '{path}': {source}")]
    Parse {
        /// Path that was being parsed.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// An entry has an empty name.
    #[error("Catalog entry with id {id} has an empty name")]
    EmptyName {
        /// Submission id of the offending entry.
        id: u32,
    },

    /// An entry has a zero submission id.
    #[error("Catalog entry '{name}' has id 0 (ids are positive integers)")]
    ZeroId {
        /// Name of the offending entry.
        name: String,
    },

    /// Two entries share the same name (names double as directory names).
    #[error("Catalog contains duplicate entry name '{name}'")]
    DuplicateName {
        /// The duplicated name.
        name: String,
    },
}

/// Reference to a GitHub repository in `owner/repo` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoRef {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoRef {
    /// Create a repo reference from owner and name parts.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse an `owner/repo` string.
    ///
    /// Returns `None` if the string does not contain exactly one `/`
    /// separating two non-empty components.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split('/');
        let owner = parts.next()?.trim();
        let name = parts.next()?.trim();
        if owner.is_empty() || name.is_empty() || parts.next().is_some() {
            return None;
        }
        Some(Self::new(owner, name))
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl TryFrom<String> for RepoRef {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s).ok_or_else(|| format!("invalid repo reference '{s}'"))
    }
}

impl From<RepoRef> for String {
    fn from(r: RepoRef) -> Self {
        r.to_string()
    }
}

/// One installable package: a named Exchange submission.
///
/// The name doubles as the install directory name, so it must be
/// unique within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Package name; used as the directory name under the install root.
    pub name: String,
    /// Numeric submission id on the Exchange (positive).
    pub id: u32,
    /// Optional GitHub mirror; overrides any mirror marker found on
    /// the submission page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<RepoRef>,
}

impl CatalogEntry {
    /// Create an entry with no GitHub mirror.
    pub fn new(name: impl Into<String>, id: u32) -> Self {
        Self {
            name: name.into(),
            id,
            github: None,
        }
    }

    /// Create an entry with a GitHub mirror reference.
    pub fn with_github(name: impl Into<String>, id: u32, owner: &str, repo: &str) -> Self {
        Self {
            name: name.into(),
            id,
            github: Some(RepoRef::new(owner, repo)),
        }
    }
}

/// An ordered, validated collection of catalog entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from a list of entries, validating it.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let catalog = Self { entries };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The built-in default catalog.
    ///
    /// A small table of widely used Exchange submissions; callers that
    /// want something else supply their own JSON file.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                CatalogEntry::with_github("export_fig", 23629, "altmany", "export_fig"),
                CatalogEntry::new("xml2struct", 28518),
                CatalogEntry::new("tight_subplot", 27991),
                CatalogEntry::with_github("gramm", 54465, "piermorel", "gramm"),
                CatalogEntry::with_github("shadedErrorBar", 26311, "raacampbell", "shadedErrorBar"),
                CatalogEntry::new("findjobj", 14317),
                CatalogEntry::new("cbrewer", 34087),
                CatalogEntry::new("xlwrite", 38591),
            ],
        }
    }

    /// Load a catalog from a JSON file.
    ///
    /// The file holds an array of `{name, id, github?}` objects. The
    /// loaded catalog is validated before it is returned.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog: Self =
            serde_json::from_str(&text).map_err(|source| CatalogError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Validate every entry: non-empty unique names, positive ids.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for entry in &self.entries {
            if entry.name.trim().is_empty() {
                return Err(CatalogError::EmptyName { id: entry.id });
            }
            if entry.id == 0 {
                return Err(CatalogError::ZeroId {
                    name: entry.name.clone(),
                });
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(CatalogError::DuplicateName {
                    name: entry.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Iterate entries in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
