use clap::{Parser, Subcommand};
use color_eyre::Result;
use tracing::level_filters::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};
use tracing_tree::time::Uptime;

mod cmd;

/// Back-office for the travel agency: clients, voyages, quotes and
/// invoices, user accounts and permissions.
#[derive(Parser, Debug)]
#[command(name = "backoffice", author, version, about, long_about = None)]
struct TopLevelFlags {
    #[command(flatten)]
    global: cmd::GlobalOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Subcommand, Debug)]
enum Command {
    /// Sign in and out.
    #[command(subcommand)]
    Auth(cmd::auth::Command),

    /// Manage clients.
    #[command(subcommand)]
    Clients(cmd::clients::Command),

    /// Manage voyages.
    #[command(subcommand)]
    Voyages(cmd::voyages::Command),

    /// Manage quotes and invoices.
    #[command(subcommand, visible_aliases = ["devis", "factures"])]
    Invoices(cmd::invoices::Command),

    /// Manage user accounts.
    #[command(subcommand)]
    Users(cmd::users::Command),

    /// Manage access permissions.
    #[command(subcommand)]
    Permissions(cmd::permissions::Command),

    /// Show counts per status and money totals.
    Dashboard(cmd::dashboard::Options),
}

#[tokio::main]
async fn main() -> Result<()> {
    let top = TopLevelFlags::parse();
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(
            tracing_tree::HierarchicalLayer::default()
                .with_indent_lines(true)
                .with_indent_amount(2)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_verbose_exit(false)
                .with_verbose_entry(false)
                .with_deferred_spans(true)
                .with_bracketed_fields(true)
                .with_span_retrace(true)
                .with_timer(Uptime::default())
                .with_targets(false),
        )
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let ctx = cmd::Context::load(top.global).await?;
    let result = match top.command {
        Command::Auth(cmd) => cmd::auth::exec(&ctx, cmd).await,
        Command::Clients(cmd) => cmd::clients::exec(&ctx, cmd).await,
        Command::Voyages(cmd) => cmd::voyages::exec(&ctx, cmd).await,
        Command::Invoices(cmd) => cmd::invoices::exec(&ctx, cmd).await,
        Command::Users(cmd) => cmd::users::exec(&ctx, cmd).await,
        Command::Permissions(cmd) => cmd::permissions::exec(&ctx, cmd).await,
        Command::Dashboard(options) => cmd::dashboard::exec(&ctx, options).await,
    };
    result.map_err(cmd::explain)
}
