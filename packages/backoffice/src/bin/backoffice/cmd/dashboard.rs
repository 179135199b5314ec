use agency_api::v1::{Customer, Invoice, Voyage};
use backoffice::{progress::spin, summary::Summary};
use clap::Args;
use color_eyre::Result;
use tracing::instrument;

use super::Context;

#[derive(Clone, Args, Debug)]
pub struct Options {}

/// Counts per status and money totals across clients, voyages and invoices.
#[instrument(skip(ctx))]
pub async fn exec(ctx: &Context, _options: Options) -> Result<()> {
    let agency = ctx.agency().await?;
    let (customers, voyages, invoices) = spin("Chargement du tableau de bord", async {
        tokio::try_join!(
            agency.list::<Customer>(),
            agency.list::<Voyage>(),
            agency.list::<Invoice>(),
        )
    })
    .await?;

    let summary = Summary::compute(&customers, &voyages, &invoices, Context::today());
    if ctx.json {
        return ctx.print_json(&summary);
    }
    println!("{}", summary.render());
    Ok(())
}
