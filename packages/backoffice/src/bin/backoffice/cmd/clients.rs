use agency_api::v1::{Customer, CustomerDraft, CustomerId, PaymentStatus, VisaType, Voyage};
use backoffice::{
    listing::{Filter, SortKey, select},
    progress::spin,
    table::details,
    view::{self, View as _},
};
use clap::{Args, Subcommand};
use color_eyre::Result;
use itertools::Itertools as _;
use serde_json::json;
use tracing::instrument;

use super::{
    Context,
    resource::{self, ListOptions, optional},
};

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// List clients.
    List(ListOptions),

    /// Show a client with their voyages and documents.
    Show { id: CustomerId },

    /// Create a client.
    Create(Fields),

    /// Update a client; fields not given keep their value.
    Update {
        id: CustomerId,

        #[command(flatten)]
        fields: Fields,
    },

    /// Delete a client.
    Delete {
        id: CustomerId,

        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Client fields. Pass an empty value to clear an optional field.
#[derive(Clone, Args, Debug)]
pub struct Fields {
    /// Last name.
    #[arg(long)]
    last_name: Option<String>,

    /// First name.
    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    /// Passport number.
    #[arg(long)]
    passport: Option<String>,

    #[arg(long)]
    nationality: Option<String>,

    /// Visa type (touriste, affaires, etudiant, travail, transit, omra, hajj).
    #[arg(long)]
    visa: Option<VisaType>,

    /// Payment status (paye, partiel, impaye, en_attente).
    #[arg(long)]
    payment_status: Option<PaymentStatus>,
}

impl Fields {
    fn apply(self, draft: &mut CustomerDraft) {
        if let Some(last_name) = self.last_name {
            draft.last_name = last_name;
        }
        if let Some(first_name) = self.first_name {
            draft.first_name = first_name;
        }
        if let Some(email) = self.email {
            draft.email = optional(email);
        }
        if let Some(phone) = self.phone {
            draft.phone = optional(phone);
        }
        if let Some(passport) = self.passport {
            draft.passport_number = optional(passport);
        }
        if let Some(nationality) = self.nationality {
            draft.nationality = optional(nationality);
        }
        if let Some(visa) = self.visa {
            draft.visa_type = Some(visa);
        }
        if let Some(status) = self.payment_status {
            draft.payment_status = Some(status);
        }
    }
}

pub async fn exec(ctx: &Context, cmd: Command) -> Result<()> {
    match cmd {
        Command::List(options) => {
            let filter = options.filter();
            resource::list::<Customer>(ctx, &options, filter).await
        }
        Command::Show { id } => show(ctx, id).await,
        Command::Create(fields) => {
            let mut draft = CustomerDraft::default();
            fields.apply(&mut draft);
            resource::create::<Customer>(ctx, draft).await
        }
        Command::Update { id, fields } => {
            resource::update::<Customer>(ctx, id, |draft| fields.apply(draft)).await
        }
        Command::Delete { id, yes } => resource::delete::<Customer>(ctx, id, yes).await,
    }
}

/// The client's details, followed by their voyages and documents.
#[instrument(skip(ctx))]
async fn show(ctx: &Context, id: CustomerId) -> Result<()> {
    let agency = ctx.agency().await?;
    let query = [("client_id", id.to_string())];
    let (customer, voyages) = spin(format!("Chargement client #{id}"), async {
        tokio::try_join!(
            agency.get::<Customer>(id),
            agency.list_where::<Voyage>(&query),
        )
    })
    .await?;

    // The backend may ignore the query parameter.
    let filter = Filter {
        customer: Some(id),
        ..Filter::default()
    };
    let today = Context::today();
    let voyages = select(voyages, &filter, SortKey::Date, today);

    if ctx.json {
        return ctx.print_json(&json!({ "client": customer, "voyages": voyages }));
    }

    println!("{}", details(customer.details(today)));
    println!();
    if voyages.is_empty() {
        println!("Aucun voyage");
    } else {
        println!("Voyages ({})", voyages.len());
        println!("{}", view::table(&voyages, today).render());
    }
    if !customer.documents.is_empty() {
        println!();
        println!("Documents ({})", customer.documents.len());
        let lines = customer
            .documents
            .iter()
            .map(|document| match &document.kind {
                Some(kind) => format!("  {} ({kind})", document.name),
                None => format!("  {}", document.name),
            })
            .join("\n");
        println!("{lines}");
    }
    Ok(())
}
