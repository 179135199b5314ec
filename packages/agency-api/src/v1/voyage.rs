//! Travel dossiers.

use bon::Builder;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{
    Amount, Customer, CustomerId, DraftError, Resource, VoyageId, VoyageStatus, amount, de,
    draft::{Checks, Validate},
};

/// A trip booked for a client: destination, dates and the money involved.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize, Builder)]
#[non_exhaustive]
pub struct Voyage {
    pub id: VoyageId,

    #[serde(rename = "client_id")]
    pub customer_id: CustomerId,

    /// The client record, when the endpoint embeds it.
    #[serde(rename = "client", default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub customer: Option<Box<Customer>>,

    #[serde(default)]
    #[builder(into)]
    pub destination: String,

    #[serde(
        rename = "date_depart",
        default,
        deserialize_with = "de::date_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub departure: Option<Date>,

    #[serde(
        rename = "date_retour",
        default,
        deserialize_with = "de::date_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub return_on: Option<Date>,

    #[serde(rename = "prix", default, deserialize_with = "amount::or_zero")]
    #[builder(default)]
    pub price: Amount,

    #[serde(
        rename = "acompte",
        default,
        deserialize_with = "amount::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub deposit: Option<Amount>,

    /// The balance as stored by the backend; see [`Voyage::balance_due`].
    #[serde(
        rename = "solde",
        alias = "reste",
        default,
        deserialize_with = "amount::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub balance: Option<Amount>,

    #[serde(
        rename = "statut",
        default,
        deserialize_with = "de::non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    #[builder(into)]
    pub status: Option<VoyageStatus>,

    #[serde(
        default,
        deserialize_with = "de::string_non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    #[builder(into)]
    pub notes: Option<String>,
}

impl Voyage {
    /// The deposit received, zero when none was recorded.
    pub fn deposit_paid(&self) -> Amount {
        self.deposit.unwrap_or_default()
    }

    /// What the client still owes on the trip.
    ///
    /// Uses the backend's stored balance when present, otherwise
    /// `price - deposit`. Never negative.
    pub fn balance_due(&self) -> Amount {
        match self.balance {
            Some(balance) => balance.saturating_sub(Amount::ZERO),
            None => self.price.saturating_sub(self.deposit_paid()),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.balance_due().is_zero()
    }

    /// Number of nights between departure and return.
    ///
    /// `None` when either date is missing or the return precedes departure.
    pub fn nights(&self) -> Option<i64> {
        let (departure, return_on) = (self.departure?, self.return_on?);
        if return_on < departure {
            return None;
        }
        let span = return_on.since(departure).ok()?;
        Some(i64::from(span.get_days()))
    }

    /// The embedded client's name, if the endpoint embedded it.
    pub fn customer_name(&self) -> Option<String> {
        self.customer.as_deref().map(Customer::full_name)
    }
}

impl From<&Voyage> for Voyage {
    fn from(voyage: &Voyage) -> Self {
        voyage.clone()
    }
}

impl Resource for Voyage {
    type Id = VoyageId;
    type Draft = VoyageDraft;

    const PATH: &'static str = "voyages";
    const NAME: &'static str = "voyage";

    fn id(&self) -> VoyageId {
        self.id
    }
}

/// The editable fields of a travel dossier.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize, Builder)]
pub struct VoyageDraft {
    #[serde(rename = "client_id")]
    #[builder(into)]
    pub customer_id: CustomerId,

    #[builder(into)]
    pub destination: String,

    #[serde(rename = "date_depart", skip_serializing_if = "Option::is_none")]
    pub departure: Option<Date>,

    #[serde(rename = "date_retour", skip_serializing_if = "Option::is_none")]
    pub return_on: Option<Date>,

    #[serde(rename = "prix")]
    #[builder(default)]
    pub price: Amount,

    #[serde(rename = "acompte", skip_serializing_if = "Option::is_none")]
    pub deposit: Option<Amount>,

    #[serde(rename = "statut", skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub status: Option<VoyageStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub notes: Option<String>,
}

impl Validate for VoyageDraft {
    fn validate(&self) -> Result<(), DraftError> {
        Checks::default()
            .check(
                "client_id",
                self.customer_id.as_u64() != 0,
                "est obligatoire",
            )
            .required("destination", &self.destination)
            .non_negative("prix", Some(self.price))
            .non_negative("acompte", self.deposit)
            .at_most("acompte", self.deposit, Some(self.price), "le prix")
            .chronological(
                "date_retour",
                self.departure,
                self.return_on,
                "la date de départ",
            )
            .finish()
    }
}

impl From<&Voyage> for VoyageDraft {
    fn from(voyage: &Voyage) -> Self {
        Self {
            customer_id: voyage.customer_id,
            destination: voyage.destination.clone(),
            departure: voyage.departure,
            return_on: voyage.return_on,
            price: voyage.price,
            deposit: voyage.deposit,
            status: voyage.status.clone(),
            notes: voyage.notes.clone(),
        }
    }
}
