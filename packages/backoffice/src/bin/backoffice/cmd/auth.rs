use agency_api::v1::{ApiError, User};
use backoffice::{notify, progress::spin, table::details, view::View as _};
use clap::Subcommand;
use color_eyre::{Result, eyre::Context as _};
use inquire::{Password, Text};
use serde_json::json;
use tracing::instrument;

use super::Context;

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session token.
    Login {
        /// Account email; prompted for when not given.
        #[arg(long, env = "BACKOFFICE_EMAIL")]
        email: Option<String>,

        /// Account password; prompted for when not given.
        #[arg(long, env = "BACKOFFICE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session token.
    Logout,

    /// Show who the current token belongs to.
    Status,
}

pub async fn exec(ctx: &Context, cmd: Command) -> Result<()> {
    match cmd {
        Command::Login { email, password } => login(ctx, email, password).await,
        Command::Logout => logout(ctx).await,
        Command::Status => status(ctx).await,
    }
}

#[instrument(skip(ctx, password))]
async fn login(ctx: &Context, email: Option<String>, password: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => Text::new("Email :").prompt().context("prompt for email")?,
    };
    let password = match password {
        Some(password) => password,
        None => Password::new("Mot de passe :")
            .without_confirmation()
            .prompt()
            .context("prompt for password")?,
    };

    let agency = ctx.anonymous();
    let session = spin("Connexion", agency.login(&email, &password)).await?;
    ctx.tokens().save(&session.token).await?;

    let user = match session.user {
        Some(user) => Some(user),
        None => ctx
            .anonymous()
            .with_token(&session.token)
            .me()
            .await
            .ok(),
    };
    let who = user
        .as_ref()
        .map(|user| user.name.clone())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(email);
    notify::success(format!("Connecté en tant que {who}"));
    Ok(())
}

#[instrument(skip(ctx))]
async fn logout(ctx: &Context) -> Result<()> {
    if ctx.tokens().clear().await? {
        notify::success("Déconnecté");
    } else {
        notify::info("Aucune session enregistrée");
    }
    Ok(())
}

#[instrument(skip(ctx))]
async fn status(ctx: &Context) -> Result<()> {
    let Some(token) = ctx.token().await? else {
        if ctx.json {
            return ctx.print_json(&json!({ "signed_in": false }));
        }
        notify::warning("Non connecté");
        notify::info("Connectez-vous avec `backoffice auth login`");
        return Ok(());
    };

    let agency = ctx.anonymous().with_token(token);
    let user = match spin("Vérification de la session", agency.me()).await {
        Ok(user) => user,
        Err(err) if err.downcast_ref::<ApiError>().is_some_and(ApiError::is_unauthorized) => {
            if ctx.json {
                return ctx.print_json(&json!({ "signed_in": false, "expired": true }));
            }
            notify::failure("Session expirée ou jeton invalide");
            notify::info("Reconnectez-vous avec `backoffice auth login`");
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    if ctx.json {
        return ctx.print_json(&json!({ "signed_in": true, "user": user }));
    }
    notify::success(format!("Connecté à {}", ctx.settings.api_url));
    print_user(&user);
    Ok(())
}

fn print_user(user: &User) {
    println!("{}", details(user.details(Context::today())));
}
