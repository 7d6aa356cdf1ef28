//! `AppConfig` struct and TOML loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use marquee_api::catalog::MediaUrls;
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable that overrides `tmdb.api_key`.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Directory name under the user config root.
const APP_DIR: &str = "marquee";

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB client settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
}

/// TMDB client configuration. Unset fields fall back to the client defaults.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TmdbConfig {
    /// API key. `TMDB_API_KEY` takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Response language (e.g. "pt-BR").
    #[serde(default)]
    pub language: Option<String>,
    /// API base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Poster image prefix.
    #[serde(default)]
    pub poster_base_url: Option<String>,
    /// Backdrop image prefix.
    #[serde(default)]
    pub backdrop_base_url: Option<String>,
    /// Trailer embed prefix.
    #[serde(default)]
    pub embed_base_url: Option<String>,
    /// Image shown when an item has no poster or backdrop.
    #[serde(default)]
    pub placeholder: Option<String>,
}

impl AppConfig {
    /// Config file path: `{dir}/config.toml` when `--dir` is given, the
    /// default location otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory is given and neither
    /// `XDG_CONFIG_HOME` nor `HOME` is set.
    pub fn path(dir: Option<&Path>) -> Result<PathBuf> {
        match dir {
            Some(d) => Ok(d.join(CONFIG_FILE)),
            None => Self::default_path(
                std::env::var("XDG_CONFIG_HOME").ok().as_deref(),
                std::env::var("HOME").ok().as_deref(),
            ),
        }
    }

    /// `$XDG_CONFIG_HOME/marquee/config.toml`, falling back to
    /// `$HOME/.config/marquee/config.toml`. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if both roots are unset.
    pub fn default_path(xdg_config_home: Option<&str>, home: Option<&str>) -> Result<PathBuf> {
        let non_blank = |v: Option<&str>| v.filter(|s| !s.trim().is_empty()).map(PathBuf::from);
        let root = non_blank(xdg_config_home)
            .or_else(|| non_blank(home).map(|h| h.join(".config")))
            .context("neither XDG_CONFIG_HOME nor HOME is set")?;
        Ok(root.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}

impl TmdbConfig {
    /// Picks the API key: a non-blank environment value wins over the file.
    ///
    /// # Errors
    ///
    /// Returns an error if neither source provides a non-blank key.
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Result<String> {
        let key = env_value
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()));
        match key {
            Some(k) => Ok(k),
            None => bail!("{API_KEY_ENV} environment variable or tmdb.api_key in config is required"),
        }
    }

    /// Parses the configured base URL, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is set but is not a valid URL.
    pub fn parsed_base_url(&self) -> Result<Option<Url>> {
        self.base_url
            .as_deref()
            .map(|raw| Url::parse(raw).with_context(|| format!("invalid tmdb.base_url: {raw}")))
            .transpose()
    }

    /// Builds image and embed prefixes, overriding defaults with configured values.
    #[must_use]
    pub fn media_urls(&self) -> MediaUrls {
        let defaults = MediaUrls::default();
        MediaUrls {
            poster_base_url: self
                .poster_base_url
                .clone()
                .unwrap_or(defaults.poster_base_url),
            backdrop_base_url: self
                .backdrop_base_url
                .clone()
                .unwrap_or(defaults.backdrop_base_url),
            embed_base_url: self
                .embed_base_url
                .clone()
                .unwrap_or(defaults.embed_base_url),
            placeholder: self.placeholder.clone().unwrap_or(defaults.placeholder),
        }
    }
}
