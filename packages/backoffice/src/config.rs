//! Where `backoffice` keeps its files, and the settings it runs with.
//!
//! Settings come from, in order of precedence: command line flags,
//! environment variables, the config file, then built-in defaults. Clap
//! takes care of the first two; this module merges the result with the
//! file.

use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use color_eyre::{
    Result,
    eyre::{Context, OptionExt as _},
};
use serde::{Deserialize, Serialize};
use tap::TapFallible as _;
use tokio::task::spawn_blocking;
use tracing::{debug, instrument, trace};
use url::Url;

/// The API base used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/";

/// Rows per listing page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(9);

const CONFIG_FILE: &str = "config.toml";
const TOKEN_FILE: &str = "token";

/// Locations of the files `backoffice` reads and writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paths {
    dir: PathBuf,
}

impl Paths {
    /// Use the given directory for all files.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Find the configuration directory following the conventions of the
    /// operating system:
    ///
    /// - Linux: `$XDG_CONFIG_HOME/backoffice`
    /// - macOS: `$HOME/Library/Application Support/com.agency.backoffice`
    /// - Windows: `%APPDATA%\agency\backoffice\config`
    ///
    /// If unable to find those directories, falls back to
    /// `$HOME/.config/backoffice`.
    #[instrument]
    pub async fn discover() -> Result<Self> {
        let dirs = spawn_blocking(|| directories::ProjectDirs::from("com", "agency", "backoffice"))
            .await
            .context("join directory lookup")?;

        let dir = if let Some(dirs) = dirs {
            dirs.config_dir().to_path_buf()
        } else {
            homedir::my_home()
                .context("get user home directory")?
                .ok_or_eyre("user has no home directory")?
                .join(".config")
                .join("backoffice")
        };

        debug!(?dir, "configuration directory");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn token_file(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }
}

/// The contents of `config.toml`. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Base URL of the agency API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<Url>,

    /// Rows per listing page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<NonZeroUsize>,
}

impl FileConfig {
    /// Read the config file; a missing file is an empty config.
    #[instrument]
    pub async fn load(path: &Path) -> Result<Self> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                trace!(?path, "no config file");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("read config file: {path:?}"));
            }
        };
        toml::from_str::<Self>(&content)
            .with_context(|| format!("parse config file: {path:?}"))
            .tap_ok(|config| debug!(?config, "loaded config file"))
    }
}

/// The settings a command runs with, after merging every source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub api_url: Url,
    pub page_size: NonZeroUsize,
}

impl Settings {
    /// Merge values from the command line (or its environment variables)
    /// over the config file and defaults.
    pub fn resolve(
        api_url: Option<Url>,
        page_size: Option<NonZeroUsize>,
        file: &FileConfig,
    ) -> Result<Self> {
        let api_url = match api_url.or_else(|| file.api_url.clone()) {
            Some(url) => url,
            None => Url::parse(DEFAULT_API_URL).context("parse default API URL")?,
        };
        let page_size = page_size.or(file.page_size).unwrap_or(DEFAULT_PAGE_SIZE);
        Ok(Self { api_url, page_size })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq as pretty_assert_eq;

    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).expect("parse url")
    }

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).expect("non-zero size")
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let settings = Settings::resolve(None, None, &FileConfig::default()).expect("resolve");
        pretty_assert_eq!(settings.api_url.as_str(), DEFAULT_API_URL);
        pretty_assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn file_overrides_defaults() {
        let file = FileConfig {
            api_url: Some(url("https://agence.example/api/")),
            page_size: Some(size(25)),
        };
        let settings = Settings::resolve(None, None, &file).expect("resolve");
        pretty_assert_eq!(settings.api_url, url("https://agence.example/api/"));
        pretty_assert_eq!(settings.page_size, size(25));
    }

    #[test]
    fn command_line_overrides_file() {
        let file = FileConfig {
            api_url: Some(url("https://agence.example/api/")),
            page_size: Some(size(25)),
        };
        let settings =
            Settings::resolve(Some(url("http://127.0.0.1:9000/api/")), Some(size(5)), &file)
                .expect("resolve");
        pretty_assert_eq!(settings.api_url, url("http://127.0.0.1:9000/api/"));
        pretty_assert_eq!(settings.page_size, size(5));
    }

    #[test]
    fn parses_config_file() {
        let file = toml::from_str::<FileConfig>(
            r#"
            api_url = "https://agence.example/api/"
            page_size = 20
            "#,
        )
        .expect("parse config");
        pretty_assert_eq!(file.api_url, Some(url("https://agence.example/api/")));
        pretty_assert_eq!(file.page_size, Some(size(20)));
    }

    #[test]
    fn rejects_zero_page_size() {
        assert!(toml::from_str::<FileConfig>("page_size = 0").is_err());
    }

    #[test_log::test(tokio::test)]
    async fn missing_file_is_empty_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let paths = Paths::at(dir.path());
        let file = FileConfig::load(&paths.config_file()).await.expect("load");
        pretty_assert_eq!(file, FileConfig::default());
    }
}
