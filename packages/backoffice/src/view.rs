//! How each kind of record is shown: its listing row and its detail view.

use agency_api::v1::{Customer, Invoice, Permission, Tone, User, Voyage};
use itertools::Itertools as _;
use jiff::civil::Date;

use crate::table::{Cell, Table};

/// A record that can be shown in a listing and on its own.
pub trait View {
    /// Column headers of the listing.
    fn headers() -> Vec<&'static str>;

    /// The record as a listing row, matching [`View::headers`].
    fn row(&self, today: Date) -> Vec<Cell>;

    /// Every field of the record, labelled.
    fn details(&self, today: Date) -> Vec<(&'static str, Cell)>;
}

/// Render the records as a listing table.
pub fn table<'a, R: View + 'a>(records: impl IntoIterator<Item = &'a R>, today: Date) -> Table {
    let mut table = Table::new(R::headers());
    for record in records {
        table.push(record.row(today));
    }
    table
}

/// Dates are shown the French way: `31/12/2024`.
pub fn date(date: Option<Date>) -> Cell {
    date.map(|date| date.strftime("%d/%m/%Y").to_string()).into()
}

fn badge(label: &str, tone: Tone) -> Cell {
    Cell::toned(label, tone)
}

fn yes_no(value: bool) -> Cell {
    if value {
        badge("Oui", Tone::Success)
    } else {
        badge("Non", Tone::Danger)
    }
}

impl View for Customer {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Nom", "Email", "Téléphone", "Visa", "Paiement"]
    }

    fn row(&self, _today: Date) -> Vec<Cell> {
        vec![
            Cell::new(self.id.to_string()),
            self.full_name().into(),
            self.email.clone().into(),
            self.phone.clone().into(),
            self.visa_type
                .as_ref()
                .map(|visa| badge(visa.label(), visa.tone()))
                .into(),
            self.payment_status
                .as_ref()
                .map(|status| badge(status.label(), status.tone()))
                .into(),
        ]
    }

    fn details(&self, today: Date) -> Vec<(&'static str, Cell)> {
        let documents = self
            .documents
            .iter()
            .map(|document| document.name.as_str())
            .join(", ");
        let mut pairs = Self::headers().into_iter().zip(self.row(today)).collect::<Vec<_>>();
        pairs.extend([
            ("Passeport", self.passport_number.clone().into()),
            ("Nationalité", self.nationality.clone().into()),
            ("Créé le", date(self.created_on)),
            ("Documents", documents.into()),
        ]);
        pairs
    }
}

impl View for Voyage {
    fn headers() -> Vec<&'static str> {
        vec![
            "ID",
            "Client",
            "Destination",
            "Départ",
            "Retour",
            "Prix",
            "Solde",
            "Statut",
        ]
    }

    fn row(&self, _today: Date) -> Vec<Cell> {
        vec![
            Cell::new(self.id.to_string()),
            Cell::new(
                self.customer_name()
                    .unwrap_or_else(|| format!("#{}", self.customer_id)),
            ),
            self.destination.clone().into(),
            date(self.departure),
            date(self.return_on),
            Cell::amount(self.price),
            Cell::amount(self.balance_due()),
            self.status
                .as_ref()
                .map(|status| badge(status.label(), status.tone()))
                .into(),
        ]
    }

    fn details(&self, today: Date) -> Vec<(&'static str, Cell)> {
        let mut pairs = Self::headers().into_iter().zip(self.row(today)).collect::<Vec<_>>();
        pairs.extend([
            ("Acompte", Cell::amount(self.deposit_paid())),
            ("Soldé", yes_no(self.is_settled())),
            ("Nuits", self.nights().map(|nights| nights.to_string()).into()),
            ("Notes", self.notes.clone().into()),
        ]);
        pairs
    }
}

impl View for Invoice {
    fn headers() -> Vec<&'static str> {
        vec![
            "Numéro",
            "Type",
            "Client",
            "Émission",
            "Échéance",
            "Total",
            "Payé",
            "Reste",
            "Statut",
        ]
    }

    fn row(&self, today: Date) -> Vec<Cell> {
        let status = self.effective_status(today);
        vec![
            Cell::new(self.display_number()),
            Cell::new(self.kind.label()),
            Cell::new(
                self.customer_name()
                    .unwrap_or_else(|| format!("#{}", self.customer_id)),
            ),
            date(self.issued_on),
            date(self.due_on),
            Cell::amount(self.total),
            Cell::amount(self.paid_amount()),
            Cell::amount(self.amount_due()),
            badge(status.label(), status.tone()),
        ]
    }

    fn details(&self, today: Date) -> Vec<(&'static str, Cell)> {
        let mut pairs = vec![("ID", Cell::new(self.id.to_string()))];
        pairs.extend(Self::headers().into_iter().zip(self.row(today)));
        pairs.extend([
            (
                "Voyage",
                self.voyage_id.map(|voyage| format!("#{voyage}")).into(),
            ),
            (
                "Réglé",
                self.paid_percent()
                    .map(|percent| format!("{percent} %"))
                    .into(),
            ),
            ("En retard", yes_no(self.is_overdue(today))),
        ]);
        pairs
    }
}

impl View for User {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Nom", "Email", "Rôle", "Actif"]
    }

    fn row(&self, _today: Date) -> Vec<Cell> {
        vec![
            Cell::new(self.id.to_string()),
            self.name.clone().into(),
            self.email.clone().into(),
            self.role
                .as_ref()
                .map(|role| badge(role.label(), role.tone()))
                .into(),
            yes_no(self.is_active()),
        ]
    }

    fn details(&self, today: Date) -> Vec<(&'static str, Cell)> {
        let mut pairs = Self::headers().into_iter().zip(self.row(today)).collect::<Vec<_>>();
        pairs.push(("Créé le", date(self.created_on)));
        pairs
    }
}

impl View for Permission {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Bénéficiaire", "Ressource", "Actions"]
    }

    fn row(&self, _today: Date) -> Vec<Cell> {
        vec![
            Cell::new(self.id.to_string()),
            Cell::new(self.grantee()),
            self.resource.clone().into(),
            self.actions.iter().map(|action| action.label()).join(", ").into(),
        ]
    }

    fn details(&self, today: Date) -> Vec<(&'static str, Cell)> {
        Self::headers().into_iter().zip(self.row(today)).collect()
    }
}
