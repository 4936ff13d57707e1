use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

use crate::pagination::DEFAULT_PAGE_SIZE;

pub const ENV_REGISTRY_URL: &str = "MANGA_GALLERY_REGISTRY_URL";
pub const ENV_PAGE_SIZE: &str = "MANGA_GALLERY_PAGE_SIZE";
pub const ENV_DETAIL_PAGE: &str = "MANGA_GALLERY_DETAIL_PAGE";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Registry document location: an `http(s)` URL or a local path.
    pub registry_url: String,
    pub page_size: usize,
    /// Target of the detail links rendered on gallery cards.
    pub detail_page: String,
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_url: "data/registry.json".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            detail_page: "detail.html".to_string(),
            request_timeout_secs: None,
            user_agent: concat!("manga-gallery/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Load from an explicit file, or from the per-user config file when it exists,
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_path().filter(|p| p.exists()) {
                Some(p) => Self::from_file(&p)?,
                None => Self::default(),
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("invalid config: {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw)?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_REGISTRY_URL).filter(|v| !v.trim().is_empty()) {
            self.registry_url = v;
        }
        if let Some(v) = lookup(ENV_PAGE_SIZE) {
            self.page_size = v
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PAGE_SIZE} must be a positive integer, got `{v}`"))?;
        }
        if let Some(v) = lookup(ENV_DETAIL_PAGE).filter(|v| !v.trim().is_empty()) {
            self.detail_page = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        if self.registry_url.trim().is_empty() {
            bail!("registry_url must not be empty");
        }
        Ok(())
    }
}

pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "manga-gallery").map(|dirs| dirs.config_dir().join("config.toml"))
}
