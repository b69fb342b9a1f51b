//! # Project Container
//!
//! A `Project` is one scaffold configuration plus who planned it, where and
//! when. Projects serialize to `.tko` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, id, site, planner, timestamps)
//! └── configuration: Configuration
//! ```
//!
//! Only the JSON conversion lives here; reading and writing files is left to
//! the caller.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::project::Project;
//!
//! let project = Project::new("Riverside Block C", "K. Sato");
//! let json = project.to_json().unwrap();
//! let loaded = Project::from_json(&json).unwrap();
//! assert_eq!(loaded.meta.site, "Riverside Block C");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Configuration;
use crate::errors::{CalcError, CalcResult};

/// Current schema version for .tko files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// File extension for saved projects
pub const FILE_EXTENSION: &str = "tko";

/// Root project container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub meta: ProjectMetadata,

    pub configuration: Configuration,
}

impl Project {
    /// Create a project with a default configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use takeoff_core::project::Project;
    ///
    /// let project = Project::new("Harbour Road", "M. Ito");
    /// assert_eq!(project.meta.planner, "M. Ito");
    /// assert_eq!(project.configuration.level_count, 1);
    /// ```
    pub fn new(site: impl Into<String>, planner: impl Into<String>) -> Self {
        Project::with_configuration(site, planner, Configuration::default())
    }

    pub fn with_configuration(
        site: impl Into<String>,
        planner: impl Into<String>,
        configuration: Configuration,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                id: Uuid::new_v4(),
                site: site.into(),
                planner: planner.into(),
                created: now,
                modified: now,
            },
            configuration,
        }
    }

    /// Replace the configuration and mark the project modified
    pub fn set_configuration(&mut self, configuration: Configuration) {
        self.configuration = configuration;
        self.touch();
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Pretty-printed JSON, as written to a `.tko` file
    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a `.tko` document and check its schema version
    pub fn from_json(json: &str) -> CalcResult<Project> {
        let project: Project = serde_json::from_str(json)?;
        validate_version(&project.meta.version)?;
        Ok(project)
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub id: Uuid,

    /// Site or building name
    pub site: String,

    /// Person responsible for the scaffold plan
    pub planner: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Check that a file version is compatible with the current schema.
///
/// Major versions must match; while the schema is 0.x a file with a newer
/// minor version is also refused.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let parse = |v: &str| -> Option<Vec<u32>> { v.split('.').map(|p| p.parse().ok()).collect() };

    let file_parts = parse(file_version).filter(|p| !p.is_empty()).ok_or_else(mismatch)?;
    let current_parts = parse(SCHEMA_VERSION).ok_or_else(mismatch)?;

    match (file_parts.as_slice(), current_parts.as_slice()) {
        ([file_major, ..], [current_major, ..]) if file_major != current_major => Err(mismatch()),
        ([0, file_minor, ..], [0, current_minor, ..]) if file_minor > current_minor => Err(mismatch()),
        _ => Ok(()),
    }
}
