//! Quotes and invoices.

use bon::Builder;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{
    Amount, Customer, CustomerId, DraftError, InvoiceId, InvoiceKind, InvoiceStatus, Resource,
    VoyageId, amount, de,
    draft::{Checks, Validate},
};

/// A quote ("devis") or invoice ("facture") issued to a client.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize, Builder)]
#[non_exhaustive]
pub struct Invoice {
    pub id: InvoiceId,

    #[serde(
        rename = "numero",
        alias = "reference",
        default,
        deserialize_with = "de::string_non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    #[builder(into)]
    pub number: Option<String>,

    #[serde(rename = "type", default)]
    #[builder(default)]
    pub kind: InvoiceKind,

    #[serde(rename = "client_id")]
    pub customer_id: CustomerId,

    /// The client record, when the endpoint embeds it.
    #[serde(rename = "client", default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub customer: Option<Box<Customer>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voyage_id: Option<VoyageId>,

    #[serde(
        rename = "montant_total",
        alias = "montant",
        default,
        deserialize_with = "amount::or_zero"
    )]
    #[builder(default)]
    pub total: Amount,

    #[serde(
        rename = "montant_paye",
        default,
        deserialize_with = "amount::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub paid: Option<Amount>,

    /// The remaining amount as stored by the backend; see
    /// [`Invoice::amount_due`].
    #[serde(
        rename = "montant_restant",
        default,
        deserialize_with = "amount::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub remaining: Option<Amount>,

    #[serde(
        rename = "statut",
        default,
        deserialize_with = "de::non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    #[builder(into)]
    pub status: Option<InvoiceStatus>,

    #[serde(
        rename = "date_emission",
        alias = "date",
        default,
        deserialize_with = "de::date_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub issued_on: Option<Date>,

    #[serde(
        rename = "date_echeance",
        default,
        deserialize_with = "de::date_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_on: Option<Date>,
}

impl Invoice {
    /// The amount received, zero when nothing was recorded.
    pub fn paid_amount(&self) -> Amount {
        self.paid.unwrap_or_default()
    }

    /// What remains to be paid.
    ///
    /// Uses the backend's stored remainder when present, otherwise
    /// `total - paid`. Never negative.
    pub fn amount_due(&self) -> Amount {
        match self.remaining {
            Some(remaining) => remaining.saturating_sub(Amount::ZERO),
            None => self.total.saturating_sub(self.paid_amount()),
        }
    }

    /// Share of the total already paid, as a percentage capped at 100.
    ///
    /// `None` for a zero total.
    pub fn paid_percent(&self) -> Option<u8> {
        let total = self.total.cents();
        if total <= 0 {
            return None;
        }
        let paid = self.paid_amount().cents().max(0);
        let percent = (paid.saturating_mul(100) / total).min(100);
        u8::try_from(percent).ok()
    }

    /// Whether an invoice is past its due date with money still owed.
    /// Quotes are never overdue.
    pub fn is_overdue(&self, today: Date) -> bool {
        self.kind == InvoiceKind::Invoice
            && !self.amount_due().is_zero()
            && self.due_on.is_some_and(|due| due < today)
            && !matches!(
                self.status,
                Some(InvoiceStatus::Cancelled | InvoiceStatus::Refused)
            )
    }

    /// The status to display.
    ///
    /// The backend's status wins when it sent one; otherwise the status is
    /// derived from the amounts and due date.
    pub fn effective_status(&self, today: Date) -> InvoiceStatus {
        if let Some(status) = &self.status {
            return status.clone();
        }
        if self.kind == InvoiceKind::Quote {
            return InvoiceStatus::Draft;
        }
        let paid = self.paid_amount();
        if paid >= self.total {
            InvoiceStatus::Paid
        } else if paid.cents() > 0 {
            InvoiceStatus::Partial
        } else if self.is_overdue(today) {
            InvoiceStatus::Overdue
        } else {
            InvoiceStatus::Pending
        }
    }

    /// The embedded client's name, if the endpoint embedded it.
    pub fn customer_name(&self) -> Option<String> {
        self.customer.as_deref().map(Customer::full_name)
    }

    /// The invoice number, or `#<id>` when none was assigned yet.
    pub fn display_number(&self) -> String {
        match &self.number {
            Some(number) => number.clone(),
            None => format!("#{}", self.id),
        }
    }
}

impl From<&Invoice> for Invoice {
    fn from(invoice: &Invoice) -> Self {
        invoice.clone()
    }
}

impl Resource for Invoice {
    type Id = InvoiceId;
    type Draft = InvoiceDraft;

    const PATH: &'static str = "factures";
    const NAME: &'static str = "facture";

    fn id(&self) -> InvoiceId {
        self.id
    }
}

/// The editable fields of a quote or invoice.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize, Builder)]
pub struct InvoiceDraft {
    #[serde(rename = "type")]
    #[builder(default)]
    pub kind: InvoiceKind,

    #[serde(rename = "numero", skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub number: Option<String>,

    #[serde(rename = "client_id")]
    #[builder(into)]
    pub customer_id: CustomerId,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub voyage_id: Option<VoyageId>,

    #[serde(rename = "montant_total")]
    #[builder(default)]
    pub total: Amount,

    #[serde(rename = "montant_paye", skip_serializing_if = "Option::is_none")]
    pub paid: Option<Amount>,

    #[serde(rename = "statut", skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub status: Option<InvoiceStatus>,

    #[serde(rename = "date_emission", skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<Date>,

    #[serde(rename = "date_echeance", skip_serializing_if = "Option::is_none")]
    pub due_on: Option<Date>,
}

impl Validate for InvoiceDraft {
    fn validate(&self) -> Result<(), DraftError> {
        Checks::default()
            .check(
                "client_id",
                self.customer_id.as_u64() != 0,
                "est obligatoire",
            )
            .non_negative("montant_total", Some(self.total))
            .non_negative("montant_paye", self.paid)
            .at_most("montant_paye", self.paid, Some(self.total), "le montant total")
            .chronological(
                "date_echeance",
                self.issued_on,
                self.due_on,
                "la date d'émission",
            )
            .finish()
    }
}

impl From<&Invoice> for InvoiceDraft {
    fn from(invoice: &Invoice) -> Self {
        Self {
            kind: invoice.kind,
            number: invoice.number.clone(),
            customer_id: invoice.customer_id,
            voyage_id: invoice.voyage_id,
            total: invoice.total,
            paid: invoice.paid,
            status: invoice.status.clone(),
            issued_on: invoice.issued_on,
            due_on: invoice.due_on,
        }
    }
}

/// A payment recorded against an invoice.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize, Builder)]
pub struct PaymentRequest {
    #[serde(rename = "montant")]
    pub amount: Amount,

    #[serde(rename = "date_paiement", skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<Date>,

    /// Payment method (cash, transfer, card...), free text.
    #[serde(rename = "mode_paiement", skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub method: Option<String>,
}

impl Validate for PaymentRequest {
    fn validate(&self) -> Result<(), DraftError> {
        Checks::default()
            .check(
                "montant",
                self.amount.cents() > 0,
                "doit être strictement positif",
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq as pretty_assert_eq;
    use serde_json::json;
    use simple_test_case::test_case;

    use super::*;

    const TODAY: Date = jiff::civil::date(2024, 7, 1);

    fn invoice(total: i64, paid: Option<i64>, due: Option<Date>) -> Invoice {
        Invoice::builder()
            .id(InvoiceId::new(5))
            .customer_id(CustomerId::new(1))
            .total(Amount::from_units(total))
            .maybe_paid(paid.map(Amount::from_units))
            .maybe_due_on(due)
            .build()
    }

    #[test_case(1000, None, None, InvoiceStatus::Pending; "nothing_paid")]
    #[test_case(1000, Some(250), None, InvoiceStatus::Partial; "partial")]
    #[test_case(1000, Some(1000), None, InvoiceStatus::Paid; "paid")]
    #[test_case(1000, Some(1200), None, InvoiceStatus::Paid; "overpaid")]
    #[test_case(1000, None, Some(jiff::civil::date(2024, 6, 1)), InvoiceStatus::Overdue; "overdue")]
    #[test_case(1000, None, Some(jiff::civil::date(2024, 7, 1)), InvoiceStatus::Pending; "due_today")]
    #[test_case(0, Some(0), None, InvoiceStatus::Paid; "zero_total")]
    #[test]
    fn derives_status(total: i64, paid: Option<i64>, due: Option<Date>, expected: InvoiceStatus) {
        pretty_assert_eq!(invoice(total, paid, due).effective_status(TODAY), expected);
    }

    #[test]
    fn stale_remaining_does_not_hide_payment() {
        let mut settled = invoice(1000, Some(1000), None);
        settled.remaining = Some(Amount::from_units(1000));
        pretty_assert_eq!(settled.effective_status(TODAY), InvoiceStatus::Paid);

        let mut partial = invoice(1000, Some(200), None);
        partial.remaining = Some(Amount::ZERO);
        pretty_assert_eq!(partial.effective_status(TODAY), InvoiceStatus::Partial);
    }

    #[test]
    fn explicit_status_wins() {
        let mut invoice = invoice(1000, Some(1000), None);
        invoice.status = Some(InvoiceStatus::Sent);
        pretty_assert_eq!(invoice.effective_status(TODAY), InvoiceStatus::Sent);
    }

    #[test]
    fn quotes_are_drafts_and_never_overdue() {
        let mut quote = invoice(1000, None, Some(jiff::civil::date(2024, 1, 1)));
        quote.kind = InvoiceKind::Quote;
        pretty_assert_eq!(quote.effective_status(TODAY), InvoiceStatus::Draft);
        assert!(!quote.is_overdue(TODAY));
    }

    #[test_case(1000, None, Some(0); "none")]
    #[test_case(1000, Some(333), Some(33); "third")]
    #[test_case(1000, Some(5000), Some(100); "capped")]
    #[test_case(0, Some(10), None; "zero_total")]
    #[test]
    fn computes_paid_percent(total: i64, paid: Option<i64>, expected: Option<u8>) {
        pretty_assert_eq!(invoice(total, paid, None).paid_percent(), expected);
    }

    #[test]
    fn decodes_backend_record() {
        let invoice = serde_json::from_value::<Invoice>(json!({
            "id": 31,
            "numero": "FAC-2024-031",
            "type": "facture",
            "client_id": 4,
            "voyage_id": "9",
            "montant_total": "3000.00",
            "montant_paye": "1000.00",
            "montant_restant": "2000.00",
            "statut": "partiellement_paye",
            "date_emission": "2024-05-02T00:00:00.000000Z",
            "date_echeance": "2024-06-02"
        }))
        .expect("decode invoice");

        pretty_assert_eq!(invoice.voyage_id, Some(VoyageId::new(9)));
        pretty_assert_eq!(invoice.amount_due(), Amount::from_units(2000));
        pretty_assert_eq!(invoice.status, Some(InvoiceStatus::Partial));
        pretty_assert_eq!(invoice.display_number(), "FAC-2024-031");
        assert!(invoice.is_overdue(TODAY));
    }

    #[test]
    fn missing_number_displays_id() {
        pretty_assert_eq!(invoice(10, None, None).display_number(), "#5");
    }

    #[test]
    fn draft_rejects_overpayment_and_reversed_dates() {
        let draft = InvoiceDraft::builder()
            .customer_id(CustomerId::new(1))
            .total(Amount::from_units(100))
            .paid(Amount::from_units(150))
            .issued_on(jiff::civil::date(2024, 5, 2))
            .due_on(jiff::civil::date(2024, 5, 1))
            .build();
        let err = draft.validate().expect_err("draft should be invalid");
        let fields = err
            .violations
            .iter()
            .map(|violation| violation.field)
            .collect::<Vec<_>>();
        pretty_assert_eq!(fields, vec!["montant_paye", "date_echeance"]);
    }

    #[test]
    fn payment_must_be_positive() {
        let payment = PaymentRequest::builder().amount(Amount::ZERO).build();
        assert!(payment.validate().is_err());
        let payment = PaymentRequest::builder()
            .amount(Amount::from_units(50))
            .method("virement")
            .build();
        pretty_assert_eq!(payment.validate(), Ok(()));
    }
}
