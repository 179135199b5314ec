use agency_api::v1::{Amount, CustomerId, Voyage, VoyageDraft, VoyageId, VoyageStatus};
use clap::{Args, Subcommand};
use color_eyre::Result;
use jiff::civil::Date;

use super::{
    Context,
    resource::{self, ListOptions, optional},
};

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// List voyages.
    List {
        #[command(flatten)]
        options: ListOptions,

        /// Only show the voyages of this client.
        #[arg(long)]
        client: Option<CustomerId>,
    },

    /// Show a voyage with its balance.
    Show { id: VoyageId },

    /// Create a voyage.
    Create(Fields),

    /// Update a voyage; fields not given keep their value.
    Update {
        id: VoyageId,

        #[command(flatten)]
        fields: Fields,
    },

    /// Delete a voyage.
    Delete {
        id: VoyageId,

        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Voyage fields. Dates are `YYYY-MM-DD`; amounts accept `1500.50` or
/// `1 500,50`.
#[derive(Clone, Args, Debug)]
pub struct Fields {
    /// The client travelling.
    #[arg(long)]
    client: Option<CustomerId>,

    #[arg(long)]
    destination: Option<String>,

    /// Departure date.
    #[arg(long)]
    departure: Option<Date>,

    /// Return date.
    #[arg(long = "return")]
    return_on: Option<Date>,

    #[arg(long)]
    price: Option<Amount>,

    /// Deposit received.
    #[arg(long)]
    deposit: Option<Amount>,

    /// Status (en_preparation, confirme, en_cours, termine, annule).
    #[arg(long)]
    status: Option<VoyageStatus>,

    /// Free-form notes; pass an empty value to clear them.
    #[arg(long)]
    notes: Option<String>,
}

impl Fields {
    fn apply(self, draft: &mut VoyageDraft) {
        if let Some(client) = self.client {
            draft.customer_id = client;
        }
        if let Some(destination) = self.destination {
            draft.destination = destination;
        }
        if let Some(departure) = self.departure {
            draft.departure = Some(departure);
        }
        if let Some(return_on) = self.return_on {
            draft.return_on = Some(return_on);
        }
        if let Some(price) = self.price {
            draft.price = price;
        }
        if let Some(deposit) = self.deposit {
            draft.deposit = Some(deposit);
        }
        if let Some(status) = self.status {
            draft.status = Some(status);
        }
        if let Some(notes) = self.notes {
            draft.notes = optional(notes);
        }
    }
}

pub async fn exec(ctx: &Context, cmd: Command) -> Result<()> {
    match cmd {
        Command::List { options, client } => {
            let mut filter = options.filter();
            filter.customer = client;
            resource::list::<Voyage>(ctx, &options, filter).await
        }
        Command::Show { id } => resource::show::<Voyage>(ctx, id).await,
        Command::Create(fields) => {
            let mut draft = VoyageDraft::builder()
                .customer_id(CustomerId::default())
                .destination("")
                .build();
            fields.apply(&mut draft);
            resource::create::<Voyage>(ctx, draft).await
        }
        Command::Update { id, fields } => {
            resource::update::<Voyage>(ctx, id, |draft| fields.apply(draft)).await
        }
        Command::Delete { id, yes } => resource::delete::<Voyage>(ctx, id, yes).await,
    }
}
