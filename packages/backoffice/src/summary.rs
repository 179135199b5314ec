//! Dashboard figures: record counts per status and money totals.

use std::hash::Hash;

use agency_api::v1::{
    Amount, Customer, Invoice, InvoiceKind, InvoiceStatus, PaymentStatus, Tone, Voyage,
    VoyageStatus,
};
use itertools::Itertools as _;
use jiff::civil::Date;
use serde::Serialize;

use crate::table::{Cell, Table, details};

const NO_STATUS: &str = "Sans statut";

/// How many records have a given status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    /// The wire value; empty for records without a status.
    pub status: String,
    pub label: String,
    pub tone: Tone,
    pub count: usize,
}

/// Everything the dashboard shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub customers: usize,
    pub customers_by_payment: Vec<StatusCount>,

    pub voyages: usize,
    pub voyages_by_status: Vec<StatusCount>,
    /// Price of every trip that wasn't cancelled.
    pub voyage_revenue: Amount,
    /// Balance still owed on trips that weren't cancelled.
    pub voyage_outstanding: Amount,

    pub invoices: usize,
    pub invoices_by_status: Vec<StatusCount>,
    /// Total of every invoice that wasn't cancelled.
    pub invoiced: Amount,
    pub collected: Amount,
    pub outstanding: Amount,
    pub overdue: usize,

    pub quotes: usize,
    /// Total of the quotes still awaiting an answer.
    pub open_quotes_total: Amount,
}

impl Summary {
    pub fn compute(
        customers: &[Customer],
        voyages: &[Voyage],
        invoices: &[Invoice],
        today: Date,
    ) -> Self {
        let customers_by_payment = tally(
            PaymentStatus::known(),
            customers.iter().map(|customer| customer.payment_status.clone()),
            |status| (status.as_str().to_string(), status.label().to_string(), status.tone()),
        );

        let voyages_by_status = tally(
            VoyageStatus::known(),
            voyages.iter().map(|voyage| voyage.status.clone()),
            |status| (status.as_str().to_string(), status.label().to_string(), status.tone()),
        );
        let (voyage_revenue, voyage_outstanding) = voyages
            .iter()
            .filter(|voyage| voyage.status != Some(VoyageStatus::Cancelled))
            .fold((Amount::ZERO, Amount::ZERO), |(revenue, outstanding), voyage| {
                (revenue + voyage.price, outstanding + voyage.balance_due())
            });

        let (quotes, invoices) = invoices
            .iter()
            .partition::<Vec<_>, _>(|invoice| invoice.kind == InvoiceKind::Quote);

        let invoices_by_status = tally(
            InvoiceStatus::known(),
            invoices
                .iter()
                .map(|invoice| Some(invoice.effective_status(today))),
            |status| (status.as_str().to_string(), status.label().to_string(), status.tone()),
        );
        let billable = invoices
            .iter()
            .filter(|invoice| invoice.effective_status(today) != InvoiceStatus::Cancelled)
            .collect::<Vec<_>>();

        let open_quotes_total: Amount = quotes
            .iter()
            .filter(|quote| {
                !matches!(
                    quote.status,
                    Some(
                        InvoiceStatus::Accepted
                            | InvoiceStatus::Refused
                            | InvoiceStatus::Cancelled
                    )
                )
            })
            .map(|quote| quote.total)
            .sum();

        Self {
            customers: customers.len(),
            customers_by_payment,
            voyages: voyages.len(),
            voyages_by_status,
            voyage_revenue,
            voyage_outstanding,
            invoices: invoices.len(),
            invoices_by_status,
            invoiced: billable.iter().map(|invoice| invoice.total).sum(),
            collected: billable.iter().map(|invoice| invoice.paid_amount()).sum(),
            outstanding: billable.iter().map(|invoice| invoice.amount_due()).sum(),
            overdue: billable.iter().filter(|invoice| invoice.is_overdue(today)).count(),
            quotes: quotes.len(),
            open_quotes_total,
        }
    }

    pub fn render(&self) -> String {
        let sections = [
            format!("Clients ({})\n{}", self.customers, counts(&self.customers_by_payment)),
            format!(
                "Voyages ({})\n{}\n{}",
                self.voyages,
                counts(&self.voyages_by_status),
                details([
                    ("Chiffre d'affaires", Cell::amount(self.voyage_revenue)),
                    ("Soldes à encaisser", Cell::amount(self.voyage_outstanding)),
                ])
            ),
            format!(
                "Factures ({})\n{}\n{}",
                self.invoices,
                counts(&self.invoices_by_status),
                details([
                    ("Facturé", Cell::amount(self.invoiced)),
                    ("Encaissé", Cell::amount(self.collected)),
                    ("Reste à encaisser", Cell::amount(self.outstanding)),
                    (
                        "En retard",
                        Cell::toned(
                            self.overdue.to_string(),
                            if self.overdue > 0 { Tone::Danger } else { Tone::Success },
                        ),
                    ),
                ])
            ),
            format!(
                "Devis ({})\n{}",
                self.quotes,
                details([("En attente de réponse", Cell::amount(self.open_quotes_total))])
            ),
        ];
        sections.join("\n\n")
    }
}

fn counts(counts: &[StatusCount]) -> String {
    let mut table = Table::new(["Statut", "Nombre"]);
    for count in counts {
        table.push([
            Cell::toned(count.label.as_str(), count.tone),
            Cell::new(count.count.to_string()),
        ]);
    }
    table.render()
}

/// Count records per status.
///
/// Known statuses come first in their usual order, even when no record
/// has them; unknown ones follow alphabetically, then records with no
/// status at all.
fn tally<S: Eq + Hash + Clone>(
    known: impl IntoIterator<Item = S>,
    values: impl IntoIterator<Item = Option<S>>,
    describe: impl Fn(&S) -> (String, String, Tone),
) -> Vec<StatusCount> {
    let mut counts = values.into_iter().counts();
    let mut tallied = Vec::new();

    for status in known {
        let count = counts.remove(&Some(status.clone())).unwrap_or_default();
        let (wire, label, tone) = describe(&status);
        tallied.push(StatusCount {
            status: wire,
            label,
            tone,
            count,
        });
    }

    let missing = counts.remove(&None);
    let others = counts
        .into_iter()
        .filter_map(|(status, count)| {
            let (wire, label, tone) = describe(&status?);
            Some(StatusCount {
                status: wire,
                label,
                tone,
                count,
            })
        })
        .sorted_by(|a, b| a.label.cmp(&b.label));
    tallied.extend(others);

    if let Some(count) = missing {
        tallied.push(StatusCount {
            status: String::new(),
            label: String::from(NO_STATUS),
            tone: Tone::Neutral,
            count,
        });
    }
    tallied
}
