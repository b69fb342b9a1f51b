//! Reading inputs and writing project files.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use takeoff_core::project::FILE_EXTENSION;
use takeoff_core::{Configuration, Project};

/// What was read from disk: a bare configuration or a whole project
pub struct Input {
    pub configuration: Configuration,
    pub project: Option<Project>,
}

impl Input {
    /// One-line project banner, if the input was a project
    pub fn header(&self) -> Option<String> {
        self.project.as_ref().map(|project| {
            format!(
                "{} ({}), last modified {}",
                project.meta.site,
                project.meta.planner,
                project.meta.modified.format("%Y-%m-%d %H:%M")
            )
        })
    }
}

/// Load a configuration JSON or a project; a document with a `meta` header is a project
pub fn load_input(path: &Path) -> Result<Input> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))?;

    if value.get("meta").is_some() {
        let project = Project::from_json(&text).with_context(|| format!("Failed to load project {}", path.display()))?;
        log::debug!("loaded project {} ({})", project.meta.id, project.meta.version);
        Ok(Input {
            configuration: project.configuration.clone(),
            project: Some(project),
        })
    } else {
        let configuration: Configuration = serde_json::from_value(value)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(Input {
            configuration,
            project: None,
        })
    }
}

/// Write a fresh project, refusing to overwrite an existing file
pub fn create_project(path: &Path, site: String, planner: String) -> Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    let path = if path.extension().is_none() {
        path.with_extension(FILE_EXTENSION)
    } else {
        path.to_path_buf()
    };
    save_project(&Project::new(site, planner), &path)?;
    println!("Created {}", path.display());
    Ok(())
}

/// Save through a temp file and rename, so an interrupted write never
/// leaves a truncated project behind
pub fn save_project(project: &Project, path: &Path) -> Result<()> {
    let json = project.to_json()?;
    let tmp_path = path.with_extension(format!("{}.tmp", FILE_EXTENSION));

    let mut tmp_file =
        File::create(&tmp_path).with_context(|| format!("Failed to create {}", tmp_path.display()))?;
    tmp_file
        .write_all(json.as_bytes())
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    tmp_file
        .sync_all()
        .with_context(|| format!("Failed to sync {}", tmp_path.display()))?;

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err).with_context(|| format!("Failed to move project to {}", path.display()));
    }
    Ok(())
}
