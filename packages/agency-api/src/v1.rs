//! Agency v1 API types and client.

use std::{fmt, str::FromStr};

use derive_more::{Display, From, Into};
use duplicate::duplicate_item;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

mod amount;
mod customer;
pub(crate) mod de;
mod draft;
pub mod envelope;
mod error;
mod invoice;
mod permission;
pub mod status;
mod user;
mod voyage;

#[cfg(feature = "client")]
mod client;

#[cfg(feature = "client")]
pub use client::{Client, Session};

pub use amount::{Amount, AmountError};
pub use customer::{Customer, CustomerDraft, Document};
pub use draft::{DraftError, Validate, Violation};
pub use error::{ApiError, FieldError};
pub use invoice::{Invoice, InvoiceDraft, PaymentRequest};
pub use permission::{Permission, PermissionDraft};
pub use status::{
    Action, InvoiceKind, InvoiceStatus, PaymentStatus, Role, Tone, VisaType, VoyageStatus,
};
pub use user::{User, UserDraft};
pub use voyage::{Voyage, VoyageDraft};

/// A collection exposed by the backend under a fixed path.
///
/// Every resource supports the same list/get/create/update/delete
/// operations; the path is the only thing that differs between them.
pub trait Resource: DeserializeOwned + Send + Sync + 'static {
    /// Identifier type of the resource.
    type Id: Copy + Ord + fmt::Display + fmt::Debug + Send + Sync;

    /// Request body used to create or update the resource.
    type Draft: Serialize + Validate + Send + Sync;

    /// Path segment of the collection, relative to the API base.
    const PATH: &'static str;

    /// Human-readable singular name, used in error context.
    const NAME: &'static str;

    /// The identifier of this record.
    fn id(&self) -> Self::Id;
}

#[duplicate_item(
    name;
    [ CustomerId ];
    [ VoyageId ];
    [ InvoiceId ];
    [ UserId ];
    [ PermissionId ];
)]
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Default, Serialize, From, Into,
)]
#[serde(transparent)]
pub struct name(u64);

#[duplicate_item(
    name;
    [ CustomerId ];
    [ VoyageId ];
    [ InvoiceId ];
    [ UserId ];
    [ PermissionId ];
)]
impl name {
    /// Create the identifier from its numeric value.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The numeric value of the identifier.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

// The backend sends identifiers as numbers on most endpoints but as strings
// on a few of them (notably foreign keys on embedded records).
#[duplicate_item(
    name;
    [ CustomerId ];
    [ VoyageId ];
    [ InvoiceId ];
    [ UserId ];
    [ PermissionId ];
)]
impl<'de> Deserialize<'de> for name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        de::u64_lenient(deserializer).map(Self)
    }
}

#[duplicate_item(
    name;
    [ CustomerId ];
    [ VoyageId ];
    [ InvoiceId ];
    [ UserId ];
    [ PermissionId ];
)]
impl FromStr for name {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(Self)
    }
}
