use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-project settings file, looked up in the app directory.
pub const PROJECT_CONFIG: &str = ".couchapprc.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub vendor: VendorConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplatesConfig {
    #[serde(default)]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorConfig {
    #[serde(default)]
    pub staging_dir: Option<String>,
    /// Handler key -> external fetch program.
    #[serde(default)]
    pub handlers: BTreeMap<String, HandlerConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HandlerConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub schemes: Vec<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub copyright: String,
}

impl Settings {
    /// Load configuration with layering: defaults → user config → explicit file.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut settings = Self::defaults()?;

        if let Some(proj_dirs) = project_dirs() {
            let config_path = proj_dirs.config_dir().join("config.toml");
            if config_path.exists() {
                settings.merge(Self::from_file(&config_path)?);
            }
        }

        if let Some(path) = explicit {
            settings.merge(Self::from_file(path)?);
        }

        Ok(settings)
    }

    pub fn defaults() -> Result<Self> {
        let defaults = include_str!("../../config/default.toml");
        Self::from_toml(defaults).context("embedded default config")
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Layer `<app_dir>/.couchapprc.toml` on top, when the project has one.
    pub fn with_project(mut self, app_dir: &Path) -> Result<Self> {
        let project = app_dir.join(PROJECT_CONFIG);
        if project.is_file() {
            self.merge(Self::from_file(&project)?);
        }
        Ok(self)
    }

    /// Later layers win. Handler tables are merged entry by entry so a layer
    /// can add one scheme without restating the built-ins.
    pub fn merge(&mut self, other: Settings) {
        if other.general.log_dir.is_some() {
            self.general.log_dir = other.general.log_dir;
        }
        if other.templates.dir.is_some() {
            self.templates.dir = other.templates.dir;
        }
        if other.vendor.staging_dir.is_some() {
            self.vendor.staging_dir = other.vendor.staging_dir;
        }
        self.vendor.handlers.extend(other.vendor.handlers);
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        non_empty_path(self.general.log_dir.as_deref())
    }

    pub fn templates_dir(&self) -> Option<PathBuf> {
        non_empty_path(self.templates.dir.as_deref())
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join("templates")))
    }

    pub fn staging_root(&self) -> PathBuf {
        non_empty_path(self.vendor.staging_dir.as_deref()).unwrap_or_else(std::env::temp_dir)
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "couchapp")
}

fn non_empty_path(value: Option<&str>) -> Option<PathBuf> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| expand_tilde(Path::new(value)))
}

pub fn expand_tilde(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    if !text.starts_with('~') {
        return path.to_path_buf();
    }

    if let Some(base_dirs) = directories::BaseDirs::new() {
        let home = base_dirs.home_dir().to_string_lossy();
        return PathBuf::from(text.replacen('~', &home, 1));
    }

    path.to_path_buf()
}
