//! The list/show/create/update/delete flow every resource shares.

use std::num::NonZeroUsize;

use agency_api::v1::{Resource, Validate as _};
use backoffice::{
    listing::{Filter, Listable, Page, SortKey, select},
    notify,
    progress::spin,
    table,
    view::{self, View},
};
use clap::Args;
use color_eyre::{Result, Section as _, eyre::Context as _};
use inquire::Confirm;
use serde::Serialize;
use tracing::instrument;

use super::Context;

/// Options for every `list` command.
#[derive(Clone, Args, Debug)]
pub struct ListOptions {
    /// Only show records containing all of these words.
    #[arg(long, short)]
    pub search: Option<String>,

    /// Only show records with this status.
    #[arg(long)]
    pub status: Option<String>,

    /// Page to show, starting at 1.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page.
    #[arg(long)]
    pub per_page: Option<NonZeroUsize>,

    /// Show every matching record on a single page.
    #[arg(long, default_value_t = false, conflicts_with_all = ["page", "per_page"])]
    pub all: bool,

    /// Order of the records.
    #[arg(long, value_enum, default_value_t)]
    pub sort: SortKey,
}

impl ListOptions {
    pub fn filter(&self) -> Filter {
        Filter {
            search: self.search.clone(),
            status: self.status.clone(),
            ..Filter::default()
        }
    }
}

/// Blank text clears a field.
pub fn optional(text: String) -> Option<String> {
    Some(text).filter(|text| !text.trim().is_empty())
}

#[instrument(skip(ctx), fields(resource = R::NAME))]
pub async fn list<R>(ctx: &Context, options: &ListOptions, filter: Filter) -> Result<()>
where
    R: Listable + View + Serialize,
{
    let agency = ctx.agency().await?;
    let records = spin(format!("Chargement des {}s", R::NAME), agency.list::<R>()).await?;

    let today = Context::today();
    let selected = select(records, &filter, options.sort, today);
    let page = if options.all {
        Page::first(NonZeroUsize::new(selected.len()).unwrap_or(NonZeroUsize::MIN))
    } else {
        ctx.page(options.page, options.per_page)
    };
    let page = page.of(selected);

    if ctx.json {
        return ctx.print_json(&page);
    }
    if page.items.is_empty() {
        notify::info("Aucun résultat");
        return Ok(());
    }
    println!("{}", view::table(&page.items, today).render());
    notify::info(format!("{} · page {}/{}", page.range(), page.page, page.pages));
    Ok(())
}

/// Print one record: its details, or JSON.
pub fn print_record<R: View + Serialize>(ctx: &Context, record: &R) -> Result<()> {
    if ctx.json {
        return ctx.print_json(record);
    }
    println!("{}", table::details(record.details(Context::today())));
    Ok(())
}

#[instrument(skip(ctx), fields(resource = R::NAME, %id))]
pub async fn show<R>(ctx: &Context, id: R::Id) -> Result<()>
where
    R: Resource + View + Serialize,
{
    let agency = ctx.agency().await?;
    let record = spin(format!("Chargement {} #{id}", R::NAME), agency.get::<R>(id)).await?;
    print_record(ctx, &record)
}

/// Validate and submit a new record, then show it as stored.
#[instrument(skip(ctx, draft), fields(resource = R::NAME))]
pub async fn create<R>(ctx: &Context, draft: R::Draft) -> Result<()>
where
    R: Resource + View + Serialize,
{
    draft
        .validate()
        .with_context(|| format!("check new {}", R::NAME))?;
    let agency = ctx.agency().await?;
    let created = spin(format!("Création {}", R::NAME), agency.create::<R>(&draft)).await?;
    match created {
        Some(record) => {
            let id = record.id();
            let stored = spin(format!("Chargement {} #{id}", R::NAME), agency.get::<R>(id)).await?;
            notify::success(format!("Enregistré : {} #{id}", R::NAME));
            print_record(ctx, &stored)
        }
        None => {
            notify::success(format!("Enregistré : {}", R::NAME));
            Ok(())
        }
    }
}

/// Fetch the record, apply the edit to a draft of it, then submit and show
/// the record as stored.
#[instrument(skip(ctx, edit), fields(resource = R::NAME, %id))]
pub async fn update<R>(ctx: &Context, id: R::Id, edit: impl FnOnce(&mut R::Draft)) -> Result<()>
where
    R: Resource + View + Serialize,
    for<'a> R::Draft: From<&'a R>,
{
    let agency = ctx.agency().await?;
    let current = spin(format!("Chargement {} #{id}", R::NAME), agency.get::<R>(id)).await?;

    let mut draft = R::Draft::from(&current);
    edit(&mut draft);
    draft
        .validate()
        .with_context(|| format!("check {} #{id}", R::NAME))?;

    spin(
        format!("Mise à jour {} #{id}", R::NAME),
        agency.update::<R>(id, &draft),
    )
    .await?;
    let stored = spin(format!("Chargement {} #{id}", R::NAME), agency.get::<R>(id)).await?;
    notify::success(format!("Mis à jour : {} #{id}", R::NAME));
    print_record(ctx, &stored)
}

#[instrument(skip(ctx), fields(resource = R::NAME, %id))]
pub async fn delete<R: Resource>(ctx: &Context, id: R::Id, yes: bool) -> Result<()> {
    if !yes {
        let confirmed = Confirm::new(&format!("Supprimer {} #{id} ?", R::NAME))
            .with_default(false)
            .prompt()
            .context("confirm deletion")
            .suggestion("Pass `--yes` to skip the confirmation")?;
        if !confirmed {
            notify::info("Suppression annulée");
            return Ok(());
        }
    }

    let agency = ctx.agency().await?;
    spin(format!("Suppression {} #{id}", R::NAME), agency.delete::<R>(id)).await?;
    notify::success(format!("Supprimé : {} #{id}", R::NAME));
    Ok(())
}
