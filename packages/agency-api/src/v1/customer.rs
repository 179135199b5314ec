//! Travel-agency clients.

use bon::Builder;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{
    CustomerId, DraftError, PaymentStatus, Resource, VisaType, de,
    draft::{Checks, Validate},
};

/// A travel-agency client: identity, travel documents and payment state.
///
/// Named `Customer` in code so it doesn't collide with the HTTP client; the
/// backend calls these "clients".
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize, Builder)]
#[non_exhaustive]
pub struct Customer {
    pub id: CustomerId,

    #[serde(rename = "nom", default)]
    #[builder(into)]
    pub last_name: String,

    #[serde(rename = "prenom", default)]
    #[builder(into, default)]
    pub first_name: String,

    #[serde(
        default,
        deserialize_with = "de::string_non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    #[builder(into)]
    pub email: Option<String>,

    #[serde(
        rename = "telephone",
        alias = "tel",
        default,
        deserialize_with = "de::string_non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    #[builder(into)]
    pub phone: Option<String>,

    #[serde(
        rename = "numero_passeport",
        alias = "passeport",
        default,
        deserialize_with = "de::string_non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    #[builder(into)]
    pub passport_number: Option<String>,

    #[serde(
        rename = "nationalite",
        default,
        deserialize_with = "de::string_non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    #[builder(into)]
    pub nationality: Option<String>,

    #[serde(
        rename = "type_visa",
        alias = "visa",
        default,
        deserialize_with = "de::non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    #[builder(into)]
    pub visa_type: Option<VisaType>,

    #[serde(
        rename = "statut_paiement",
        default,
        deserialize_with = "de::non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    #[builder(into)]
    pub payment_status: Option<PaymentStatus>,

    /// Documents on file. Listed only; their content is never transferred.
    #[serde(default, deserialize_with = "de::vec_or_null")]
    #[builder(default, with = |i: impl IntoIterator<Item = impl Into<Document>>| i.into_iter().map(Into::into).collect())]
    pub documents: Vec<Document>,

    #[serde(
        rename = "created_at",
        default,
        deserialize_with = "de::date_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_on: Option<Date>,
}

impl Customer {
    /// "Prénom Nom", tolerating either part being empty.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

impl From<&Customer> for Customer {
    fn from(customer: &Customer) -> Self {
        customer.clone()
    }
}

impl Resource for Customer {
    type Id = CustomerId;
    type Draft = CustomerDraft;

    const PATH: &'static str = "clients";
    const NAME: &'static str = "client";

    fn id(&self) -> CustomerId {
        self.id
    }
}

/// A document attached to a client file (passport scan, photo, ticket...).
///
/// Older endpoints list documents as bare file names rather than objects.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize, Builder)]
#[serde(from = "RawDocument")]
#[non_exhaustive]
pub struct Document {
    #[serde(rename = "nom")]
    #[builder(into)]
    pub name: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub url: Option<String>,
}

impl From<&Document> for Document {
    fn from(document: &Document) -> Self {
        document.clone()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Name(String),
    Object {
        #[serde(alias = "nom", alias = "filename", alias = "fichier", default)]
        name: Option<String>,
        #[serde(rename = "type", default)]
        kind: Option<String>,
        #[serde(alias = "chemin", alias = "path", default)]
        url: Option<String>,
    },
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        match raw {
            RawDocument::Name(name) => Self {
                name,
                kind: None,
                url: None,
            },
            RawDocument::Object { name, kind, url } => {
                let name = name
                    .or_else(|| {
                        url.as_deref()
                            .and_then(|url| url.rsplit('/').next())
                            .map(String::from)
                    })
                    .unwrap_or_default();
                Self { name, kind, url }
            }
        }
    }
}

/// The editable fields of a client, sent when creating or updating one.
#[derive(Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize, Builder)]
pub struct CustomerDraft {
    #[serde(rename = "nom")]
    #[builder(into)]
    pub last_name: String,

    #[serde(rename = "prenom")]
    #[builder(into, default)]
    pub first_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub email: Option<String>,

    #[serde(rename = "telephone", skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub phone: Option<String>,

    #[serde(rename = "numero_passeport", skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub passport_number: Option<String>,

    #[serde(rename = "nationalite", skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub nationality: Option<String>,

    #[serde(rename = "type_visa", skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub visa_type: Option<VisaType>,

    #[serde(rename = "statut_paiement", skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub payment_status: Option<PaymentStatus>,
}

impl Validate for CustomerDraft {
    fn validate(&self) -> Result<(), DraftError> {
        Checks::default()
            .required("nom", &self.last_name)
            .email("email", self.email.as_deref())
            .check(
                "numero_passeport",
                self.passport_number
                    .as_deref()
                    .is_none_or(|number| number.trim().chars().all(char::is_alphanumeric)),
                "ne doit contenir que des lettres et des chiffres",
            )
            .finish()
    }
}

impl From<&Customer> for CustomerDraft {
    fn from(customer: &Customer) -> Self {
        Self {
            last_name: customer.last_name.clone(),
            first_name: customer.first_name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            passport_number: customer.passport_number.clone(),
            nationality: customer.nationality.clone(),
            visa_type: customer.visa_type.clone(),
            payment_status: customer.payment_status.clone(),
        }
    }
}
