use agency_api::v1::{
    Amount, CustomerId, Invoice, InvoiceDraft, InvoiceId, InvoiceKind, InvoiceStatus,
    PaymentRequest, Validate as _, VoyageId, status::normalize,
};
use backoffice::{notify, progress::spin};
use clap::{Args, Subcommand};
use color_eyre::{
    Result, Section as _,
    eyre::{Context as _, bail, eyre},
};
use jiff::civil::Date;
use tracing::instrument;

use super::{
    Context,
    resource::{self, ListOptions, optional, print_record},
};

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// List quotes and invoices.
    List {
        #[command(flatten)]
        options: ListOptions,

        /// Only show the documents of this client.
        #[arg(long)]
        client: Option<CustomerId>,

        /// Only show quotes (`devis`) or invoices (`facture`).
        #[arg(long, value_parser = parse_kind)]
        kind: Option<InvoiceKind>,
    },

    /// Show a quote or invoice with what remains to be paid.
    Show { id: InvoiceId },

    /// Create a quote or invoice.
    Create(Fields),

    /// Update a quote or invoice; fields not given keep their value.
    Update {
        id: InvoiceId,

        #[command(flatten)]
        fields: Fields,
    },

    /// Delete a quote or invoice.
    Delete {
        id: InvoiceId,

        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Turn a quote into an invoice.
    Convert { id: InvoiceId },

    /// Record a payment against an invoice.
    Pay {
        id: InvoiceId,

        /// Amount received, e.g. `1500.50` or `1 500,50`.
        amount: Amount,

        /// Day the payment was received; defaults to today.
        #[arg(long)]
        date: Option<Date>,

        /// Payment method (espèces, virement, carte...).
        #[arg(long)]
        method: Option<String>,
    },
}

/// Quote or invoice fields. Dates are `YYYY-MM-DD`.
#[derive(Clone, Args, Debug)]
pub struct Fields {
    /// `devis` or `facture`.
    #[arg(long, value_parser = parse_kind)]
    kind: Option<InvoiceKind>,

    /// Document number; pass an empty value to clear it.
    #[arg(long)]
    number: Option<String>,

    /// The client billed.
    #[arg(long)]
    client: Option<CustomerId>,

    /// The voyage billed.
    #[arg(long)]
    voyage: Option<VoyageId>,

    #[arg(long)]
    total: Option<Amount>,

    /// Amount already paid.
    #[arg(long)]
    paid: Option<Amount>,

    /// Status (brouillon, envoye, en_attente, partiel, paye, en_retard,
    /// annule, accepte, refuse).
    #[arg(long)]
    status: Option<InvoiceStatus>,

    /// Issue date.
    #[arg(long)]
    issued: Option<Date>,

    /// Due date.
    #[arg(long)]
    due: Option<Date>,
}

impl Fields {
    fn apply(self, draft: &mut InvoiceDraft) {
        if let Some(kind) = self.kind {
            draft.kind = kind;
        }
        if let Some(number) = self.number {
            draft.number = optional(number);
        }
        if let Some(client) = self.client {
            draft.customer_id = client;
        }
        if let Some(voyage) = self.voyage {
            draft.voyage_id = Some(voyage);
        }
        if let Some(total) = self.total {
            draft.total = total;
        }
        if let Some(paid) = self.paid {
            draft.paid = Some(paid);
        }
        if let Some(status) = self.status {
            draft.status = Some(status);
        }
        if let Some(issued) = self.issued {
            draft.issued_on = Some(issued);
        }
        if let Some(due) = self.due {
            draft.due_on = Some(due);
        }
    }
}

pub async fn exec(ctx: &Context, cmd: Command) -> Result<()> {
    match cmd {
        Command::List {
            options,
            client,
            kind,
        } => {
            let mut filter = options.filter();
            filter.customer = client;
            filter.kind = kind;
            resource::list::<Invoice>(ctx, &options, filter).await
        }
        Command::Show { id } => resource::show::<Invoice>(ctx, id).await,
        Command::Create(fields) => {
            let mut draft = InvoiceDraft::builder()
                .customer_id(CustomerId::default())
                .issued_on(Context::today())
                .build();
            fields.apply(&mut draft);
            resource::create::<Invoice>(ctx, draft).await
        }
        Command::Update { id, fields } => {
            resource::update::<Invoice>(ctx, id, |draft| fields.apply(draft)).await
        }
        Command::Delete { id, yes } => resource::delete::<Invoice>(ctx, id, yes).await,
        Command::Convert { id } => convert(ctx, id).await,
        Command::Pay {
            id,
            amount,
            date,
            method,
        } => {
            let payment = PaymentRequest::builder()
                .amount(amount)
                .paid_on(date.unwrap_or_else(Context::today))
                .maybe_method(method.and_then(optional))
                .build();
            pay(ctx, id, payment).await
        }
    }
}

#[instrument(skip(ctx))]
async fn convert(ctx: &Context, id: InvoiceId) -> Result<()> {
    let agency = ctx.agency().await?;
    let quote = spin(format!("Chargement devis #{id}"), agency.get::<Invoice>(id)).await?;
    if quote.kind != InvoiceKind::Quote {
        bail!("{} is already an invoice", quote.display_number());
    }

    let invoice = spin(format!("Conversion devis #{id}"), agency.convert_quote(id)).await?;
    notify::success(format!(
        "Devis {} converti en facture {}",
        quote.display_number(),
        invoice.display_number()
    ));
    print_record(ctx, &invoice)
}

#[instrument(skip(ctx))]
async fn pay(ctx: &Context, id: InvoiceId, payment: PaymentRequest) -> Result<()> {
    payment.validate().context("check payment")?;

    let agency = ctx.agency().await?;
    let invoice = spin(format!("Chargement facture #{id}"), agency.get::<Invoice>(id)).await?;
    if invoice.kind == InvoiceKind::Quote {
        return Err(eyre!("{} is a quote", invoice.display_number()))
            .suggestion(format!("Convert it first with `backoffice invoices convert {id}`"));
    }
    let due = invoice.amount_due();
    if payment.amount > due {
        return Err(eyre!(
            "payment of {} exceeds the {due} remaining on {}",
            payment.amount,
            invoice.display_number()
        ))
        .suggestion(format!("Pay at most {due}"));
    }

    let updated = spin(
        format!("Enregistrement du paiement sur {}", invoice.display_number()),
        agency.record_payment(id, &payment),
    )
    .await?;
    notify::success(format!(
        "Paiement de {} enregistré ; reste {}",
        payment.amount,
        updated.amount_due()
    ));
    print_record(ctx, &updated)
}

/// Parse `--kind`, accepting only the two document kinds.
fn parse_kind(raw: &str) -> Result<InvoiceKind, String> {
    match normalize(raw).as_str() {
        "devis" => Ok(InvoiceKind::Quote),
        "facture" => Ok(InvoiceKind::Invoice),
        _ => Err(format!("expected `devis` or `facture`, got `{raw}`")),
    }
}
