use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::format::format_html;
use crate::naming::{self, TEMPLATE_EXT, TEMPLATE_PREFIX};

/// A template file found in the store directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTemplate {
    /// Identifier parsed out of the filename.
    pub template_id: u64,
    /// The bare filename, e.g. `template_555_foo.html`.
    pub filename: String,
    /// Absolute path to the file.
    pub path: PathBuf,
}

/// Flat directory of template files named by the `template_{id}_{slug}.html`
/// convention.
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        TemplateStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Find the filename already claimed by `template_id`, if any.
    ///
    /// Filenames are sticky: once a template has a file, later saves reuse it
    /// even if the remote name has since changed. Only one file may claim an
    /// identifier, so the first match wins.
    pub fn resolve_existing_filename(&self, template_id: u64) -> Option<String> {
        let prefix = format!("{TEMPLATE_PREFIX}{template_id}_");
        let entries = fs::read_dir(&self.dir).ok()?;

        entries
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .find(|name| name.starts_with(&prefix) && name.ends_with(TEMPLATE_EXT))
    }

    /// Write formatted content for a template, creating the store directory
    /// on demand.
    ///
    /// Reuses the existing filename for the identifier when one exists,
    /// otherwise derives a new one from `human_name`. The write is a plain
    /// overwrite; version control is the audit trail.
    pub fn save(&self, template_id: u64, content: &str, human_name: Option<&str>) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create template directory: {}", self.dir.display())
        })?;

        let filename = self
            .resolve_existing_filename(template_id)
            .unwrap_or_else(|| naming::encode(template_id, human_name));

        let path = self.dir.join(&filename);
        fs::write(&path, format_html(content))
            .with_context(|| format!("Failed to write template to {}", path.display()))?;

        log::debug!("Saved template {} to {}", template_id, path.display());
        Ok(path)
    }

    /// Read a template file's raw content.
    pub fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read template file: {}", path.display()))
    }

    /// Enumerate every file in the store matching the naming convention.
    ///
    /// Non-matching files are skipped silently. Order is the directory's
    /// native listing order; callers must not rely on it for correctness.
    pub fn list_all(&self) -> Result<Vec<LocalTemplate>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).with_context(|| {
            format!("Failed to list template directory: {}", self.dir.display())
        })?;

        let mut templates = Vec::new();
        for entry in entries.filter_map(|e| e.ok()) {
            let filename = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };

            if !filename.ends_with(TEMPLATE_EXT) {
                continue;
            }

            match naming::decode(&filename) {
                Some(template_id) => templates.push(LocalTemplate {
                    template_id,
                    filename,
                    path: entry.path(),
                }),
                None => log::debug!("Skipping non-template file: {filename}"),
            }
        }

        Ok(templates)
    }
}
