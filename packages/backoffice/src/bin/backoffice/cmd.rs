use std::{num::NonZeroUsize, path::PathBuf};

use agency_api::{Agency, Token, v1::ApiError};
use backoffice::{
    config::{FileConfig, Paths, Settings},
    listing::Page,
    session::TokenStore,
};
use color_eyre::{
    Report, Result, Section as _, SectionExt as _,
    eyre::{Context as _, eyre},
};
use jiff::{Zoned, civil::Date};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod invoices;
pub mod permissions;
pub mod resource;
pub mod users;
pub mod voyages;

/// Options shared by every command.
#[derive(Clone, clap::Args, Debug)]
pub struct GlobalOptions {
    /// Base URL for the agency API.
    #[arg(long, env = "BACKOFFICE_API_URL", global = true)]
    pub api_url: Option<Url>,

    /// Bearer token for the agency API, used instead of the stored one.
    #[arg(long, env = "BACKOFFICE_API_TOKEN", global = true, hide_env_values = true)]
    pub api_token: Option<Token>,

    /// Rows per listing page.
    #[arg(long, env = "BACKOFFICE_PAGE_SIZE", global = true)]
    pub page_size: Option<NonZeroUsize>,

    /// Print JSON instead of tables.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Directory holding `config.toml` and the stored token.
    #[arg(long, env = "BACKOFFICE_CONFIG_DIR", global = true)]
    pub config_dir: Option<PathBuf>,
}

/// Everything a command needs to run.
#[derive(Debug)]
pub struct Context {
    pub settings: Settings,
    pub paths: Paths,
    pub json: bool,
    token: Option<Token>,
}

impl Context {
    #[instrument(name = "Context::load")]
    pub async fn load(options: GlobalOptions) -> Result<Self> {
        let paths = match options.config_dir {
            Some(dir) => Paths::at(dir),
            None => Paths::discover().await?,
        };
        let file = FileConfig::load(&paths.config_file()).await?;
        let settings = Settings::resolve(options.api_url, options.page_size, &file)?;
        debug!(?settings, "resolved settings");
        Ok(Self {
            settings,
            paths,
            json: options.json,
            token: options.api_token,
        })
    }

    pub fn tokens(&self) -> TokenStore {
        TokenStore::new(self.paths.token_file())
    }

    /// A client that sends no token.
    pub fn anonymous(&self) -> Agency {
        Agency::new(self.settings.api_url.clone())
    }

    /// The token given on the command line, or else the stored one.
    pub async fn token(&self) -> Result<Option<Token>> {
        match &self.token {
            Some(token) => Ok(Some(token.clone())),
            None => self.tokens().load().await,
        }
    }

    /// A client authenticated with the current token.
    pub async fn agency(&self) -> Result<Agency> {
        let token = self.token().await?.ok_or_else(|| {
            eyre!("not signed in")
                .suggestion("Sign in with `backoffice auth login`")
                .suggestion("Set the `BACKOFFICE_API_TOKEN` environment variable")
                .suggestion("Provide it with the `--api-token` argument")
        })?;
        Ok(self.anonymous().with_token(token))
    }

    /// The requested page, falling back to the configured page size.
    pub fn page(&self, number: usize, per_page: Option<NonZeroUsize>) -> Page {
        Page::new(number, per_page.unwrap_or(self.settings.page_size))
    }

    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value).context("serialize output")?;
        println!("{json}");
        Ok(())
    }

    pub fn today() -> Date {
        Zoned::now().date()
    }
}

/// Attach hints to errors the backend returned.
pub fn explain(err: Report) -> Report {
    let Some(api) = err.downcast_ref::<ApiError>() else {
        return err;
    };
    let unauthorized = api.is_unauthorized();
    let forbidden = api.is_forbidden();
    let fields = api
        .fields
        .iter()
        .map(|field| format!("{}: {}", field.field, field.message))
        .collect::<Vec<_>>();

    if unauthorized {
        err.suggestion("Sign in again with `backoffice auth login`")
    } else if forbidden {
        err.suggestion("Ask an administrator for the missing permission")
    } else if !fields.is_empty() {
        err.section(fields.join("\n").header("Rejected fields:"))
    } else {
        err
    }
}
