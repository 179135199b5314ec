//! Status tables: wire values, French display labels and badge tones.
//!
//! Every status enum has a set of known variants plus `Other(String)`, which
//! preserves values this client does not recognize so they round-trip back
//! to the backend untouched and still render (verbatim, with a neutral tone).
//!
//! Parsing is forgiving: values are trimmed, lowercased, stripped of French
//! accents and have spaces/hyphens folded into underscores before lookup,
//! and each enum accepts a few aliases (English spellings, feminine forms)
//! that the backend has been seen to emit.

use std::fmt;

use duplicate::duplicate_item;
use enum_assoc::Assoc;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{EnumIter, IntoEnumIterator};
use subenum::subenum;

/// The colour family a status badge is rendered with.
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    strum::Display,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tone {
    Success,
    Warning,
    Danger,
    Info,
    Neutral,
}

/// Payment state of a client file.
#[subenum(PaymentStatusKnown(derive(EnumIter)))]
#[derive(Clone, Eq, PartialEq, Hash, Debug, Assoc)]
#[func(pub fn as_str(&self) -> &str)]
#[func(pub fn label(&self) -> &str)]
#[func(pub fn tone(&self) -> Tone)]
pub enum PaymentStatus {
    #[assoc(as_str = "paye")]
    #[assoc(label = "Payé")]
    #[assoc(tone = Tone::Success)]
    #[subenum(PaymentStatusKnown)]
    Paid,

    #[assoc(as_str = "partiel")]
    #[assoc(label = "Partiel")]
    #[assoc(tone = Tone::Warning)]
    #[subenum(PaymentStatusKnown)]
    Partial,

    #[assoc(as_str = "impaye")]
    #[assoc(label = "Impayé")]
    #[assoc(tone = Tone::Danger)]
    #[subenum(PaymentStatusKnown)]
    Unpaid,

    #[assoc(as_str = "en_attente")]
    #[assoc(label = "En attente")]
    #[assoc(tone = Tone::Info)]
    #[subenum(PaymentStatusKnown)]
    Pending,

    /// A status this client does not know, preserved verbatim.
    #[assoc(as_str = _0.as_str())]
    #[assoc(label = _0.as_str())]
    #[assoc(tone = Tone::Neutral)]
    Other(String),
}

impl PaymentStatus {
    fn alias(key: &str) -> Option<Self> {
        match key {
            "paid" | "payee" | "regle" | "reglee" | "solde" => Some(Self::Paid),
            "partial" | "partiellement_paye" | "partiellement_payee" | "acompte" => {
                Some(Self::Partial)
            }
            "unpaid" | "impayee" | "non_paye" | "non_payee" => Some(Self::Unpaid),
            "pending" | "attente" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// Lifecycle of a travel dossier.
#[subenum(VoyageStatusKnown(derive(EnumIter)))]
#[derive(Clone, Eq, PartialEq, Hash, Debug, Assoc)]
#[func(pub fn as_str(&self) -> &str)]
#[func(pub fn label(&self) -> &str)]
#[func(pub fn tone(&self) -> Tone)]
pub enum VoyageStatus {
    #[assoc(as_str = "en_preparation")]
    #[assoc(label = "En préparation")]
    #[assoc(tone = Tone::Neutral)]
    #[subenum(VoyageStatusKnown)]
    Draft,

    #[assoc(as_str = "confirme")]
    #[assoc(label = "Confirmé")]
    #[assoc(tone = Tone::Info)]
    #[subenum(VoyageStatusKnown)]
    Confirmed,

    #[assoc(as_str = "en_cours")]
    #[assoc(label = "En cours")]
    #[assoc(tone = Tone::Warning)]
    #[subenum(VoyageStatusKnown)]
    InProgress,

    #[assoc(as_str = "termine")]
    #[assoc(label = "Terminé")]
    #[assoc(tone = Tone::Success)]
    #[subenum(VoyageStatusKnown)]
    Completed,

    #[assoc(as_str = "annule")]
    #[assoc(label = "Annulé")]
    #[assoc(tone = Tone::Danger)]
    #[subenum(VoyageStatusKnown)]
    Cancelled,

    /// A status this client does not know, preserved verbatim.
    #[assoc(as_str = _0.as_str())]
    #[assoc(label = _0.as_str())]
    #[assoc(tone = Tone::Neutral)]
    Other(String),
}

impl VoyageStatus {
    fn alias(key: &str) -> Option<Self> {
        match key {
            "draft" | "brouillon" | "preparation" | "en_preparation" => Some(Self::Draft),
            "confirmed" | "confirmee" | "valide" | "validee" => Some(Self::Confirmed),
            "in_progress" | "en_voyage" | "ongoing" => Some(Self::InProgress),
            "completed" | "terminee" | "done" | "cloture" | "cloturee" => Some(Self::Completed),
            "cancelled" | "canceled" | "annulee" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// State of a quote or invoice.
#[subenum(InvoiceStatusKnown(derive(EnumIter)))]
#[derive(Clone, Eq, PartialEq, Hash, Debug, Assoc)]
#[func(pub fn as_str(&self) -> &str)]
#[func(pub fn label(&self) -> &str)]
#[func(pub fn tone(&self) -> Tone)]
pub enum InvoiceStatus {
    #[assoc(as_str = "brouillon")]
    #[assoc(label = "Brouillon")]
    #[assoc(tone = Tone::Neutral)]
    #[subenum(InvoiceStatusKnown)]
    Draft,

    #[assoc(as_str = "envoye")]
    #[assoc(label = "Envoyé")]
    #[assoc(tone = Tone::Info)]
    #[subenum(InvoiceStatusKnown)]
    Sent,

    #[assoc(as_str = "en_attente")]
    #[assoc(label = "En attente")]
    #[assoc(tone = Tone::Info)]
    #[subenum(InvoiceStatusKnown)]
    Pending,

    #[assoc(as_str = "partiel")]
    #[assoc(label = "Partiellement payé")]
    #[assoc(tone = Tone::Warning)]
    #[subenum(InvoiceStatusKnown)]
    Partial,

    #[assoc(as_str = "paye")]
    #[assoc(label = "Payé")]
    #[assoc(tone = Tone::Success)]
    #[subenum(InvoiceStatusKnown)]
    Paid,

    #[assoc(as_str = "impaye")]
    #[assoc(label = "Impayé")]
    #[assoc(tone = Tone::Danger)]
    #[subenum(InvoiceStatusKnown)]
    Unpaid,

    #[assoc(as_str = "en_retard")]
    #[assoc(label = "En retard")]
    #[assoc(tone = Tone::Danger)]
    #[subenum(InvoiceStatusKnown)]
    Overdue,

    #[assoc(as_str = "annule")]
    #[assoc(label = "Annulé")]
    #[assoc(tone = Tone::Danger)]
    #[subenum(InvoiceStatusKnown)]
    Cancelled,

    #[assoc(as_str = "accepte")]
    #[assoc(label = "Accepté")]
    #[assoc(tone = Tone::Success)]
    #[subenum(InvoiceStatusKnown)]
    Accepted,

    #[assoc(as_str = "refuse")]
    #[assoc(label = "Refusé")]
    #[assoc(tone = Tone::Danger)]
    #[subenum(InvoiceStatusKnown)]
    Refused,

    /// A status this client does not know, preserved verbatim.
    #[assoc(as_str = _0.as_str())]
    #[assoc(label = _0.as_str())]
    #[assoc(tone = Tone::Neutral)]
    Other(String),
}

impl InvoiceStatus {
    fn alias(key: &str) -> Option<Self> {
        match key {
            "draft" => Some(Self::Draft),
            "sent" | "envoyee" | "emis" | "emise" => Some(Self::Sent),
            "pending" | "attente" => Some(Self::Pending),
            "partial" | "partiellement_paye" | "partiellement_payee" => Some(Self::Partial),
            "paid" | "payee" | "regle" | "reglee" => Some(Self::Paid),
            "unpaid" | "impayee" | "non_paye" | "non_payee" => Some(Self::Unpaid),
            "overdue" | "retard" => Some(Self::Overdue),
            "cancelled" | "canceled" | "annulee" => Some(Self::Cancelled),
            "accepted" | "acceptee" | "valide" | "validee" => Some(Self::Accepted),
            "refused" | "rejected" | "refusee" | "rejete" | "rejetee" => Some(Self::Refused),
            _ => None,
        }
    }

    /// Whether the document still expects money.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            Self::Sent | Self::Pending | Self::Partial | Self::Unpaid | Self::Overdue
        )
    }
}

/// Visa category requested for a client.
#[subenum(VisaTypeKnown(derive(EnumIter)))]
#[derive(Clone, Eq, PartialEq, Hash, Debug, Assoc)]
#[func(pub fn as_str(&self) -> &str)]
#[func(pub fn label(&self) -> &str)]
#[func(pub fn tone(&self) -> Tone)]
pub enum VisaType {
    #[assoc(as_str = "touriste")]
    #[assoc(label = "Touriste")]
    #[assoc(tone = Tone::Info)]
    #[subenum(VisaTypeKnown)]
    Tourist,

    #[assoc(as_str = "affaires")]
    #[assoc(label = "Affaires")]
    #[assoc(tone = Tone::Info)]
    #[subenum(VisaTypeKnown)]
    Business,

    #[assoc(as_str = "etudiant")]
    #[assoc(label = "Étudiant")]
    #[assoc(tone = Tone::Info)]
    #[subenum(VisaTypeKnown)]
    Student,

    #[assoc(as_str = "travail")]
    #[assoc(label = "Travail")]
    #[assoc(tone = Tone::Info)]
    #[subenum(VisaTypeKnown)]
    Work,

    #[assoc(as_str = "transit")]
    #[assoc(label = "Transit")]
    #[assoc(tone = Tone::Neutral)]
    #[subenum(VisaTypeKnown)]
    Transit,

    #[assoc(as_str = "omra")]
    #[assoc(label = "Omra")]
    #[assoc(tone = Tone::Success)]
    #[subenum(VisaTypeKnown)]
    Umrah,

    #[assoc(as_str = "hajj")]
    #[assoc(label = "Hajj")]
    #[assoc(tone = Tone::Success)]
    #[subenum(VisaTypeKnown)]
    Hajj,

    /// A visa type this client does not know, preserved verbatim.
    #[assoc(as_str = _0.as_str())]
    #[assoc(label = _0.as_str())]
    #[assoc(tone = Tone::Neutral)]
    Other(String),
}

impl VisaType {
    fn alias(key: &str) -> Option<Self> {
        match key {
            "tourist" | "tourisme" | "touristique" => Some(Self::Tourist),
            "business" | "affaire" => Some(Self::Business),
            "student" | "etudiante" | "etudes" => Some(Self::Student),
            "work" | "travailleur" => Some(Self::Work),
            "umrah" | "omrah" | "umra" => Some(Self::Umrah),
            "hadj" | "haj" => Some(Self::Hajj),
            _ => None,
        }
    }
}

/// Role of a back-office user account.
#[subenum(RoleKnown(derive(EnumIter)))]
#[derive(Clone, Eq, PartialEq, Hash, Debug, Assoc)]
#[func(pub fn as_str(&self) -> &str)]
#[func(pub fn label(&self) -> &str)]
#[func(pub fn tone(&self) -> Tone)]
pub enum Role {
    #[assoc(as_str = "admin")]
    #[assoc(label = "Administrateur")]
    #[assoc(tone = Tone::Danger)]
    #[subenum(RoleKnown)]
    Admin,

    #[assoc(as_str = "manager")]
    #[assoc(label = "Gestionnaire")]
    #[assoc(tone = Tone::Warning)]
    #[subenum(RoleKnown)]
    Manager,

    #[assoc(as_str = "agent")]
    #[assoc(label = "Agent")]
    #[assoc(tone = Tone::Info)]
    #[subenum(RoleKnown)]
    Agent,

    #[assoc(as_str = "comptable")]
    #[assoc(label = "Comptable")]
    #[assoc(tone = Tone::Info)]
    #[subenum(RoleKnown)]
    Accountant,

    /// A role this client does not know, preserved verbatim.
    #[assoc(as_str = _0.as_str())]
    #[assoc(label = _0.as_str())]
    #[assoc(tone = Tone::Neutral)]
    Other(String),
}

impl Role {
    fn alias(key: &str) -> Option<Self> {
        match key {
            "administrateur" | "administrator" | "super_admin" | "superadmin" => Some(Self::Admin),
            "gestionnaire" => Some(Self::Manager),
            "commercial" | "conseiller" | "conseillere" => Some(Self::Agent),
            "accountant" | "finance" => Some(Self::Accountant),
            _ => None,
        }
    }
}

/// An operation a permission grants on a resource.
#[subenum(ActionKnown(derive(EnumIter)))]
#[derive(Clone, Eq, PartialEq, Hash, Debug, Assoc)]
#[func(pub fn as_str(&self) -> &str)]
#[func(pub fn label(&self) -> &str)]
#[func(pub fn tone(&self) -> Tone)]
pub enum Action {
    #[assoc(as_str = "lire")]
    #[assoc(label = "Lire")]
    #[assoc(tone = Tone::Info)]
    #[subenum(ActionKnown)]
    Read,

    #[assoc(as_str = "creer")]
    #[assoc(label = "Créer")]
    #[assoc(tone = Tone::Success)]
    #[subenum(ActionKnown)]
    Create,

    #[assoc(as_str = "modifier")]
    #[assoc(label = "Modifier")]
    #[assoc(tone = Tone::Warning)]
    #[subenum(ActionKnown)]
    Update,

    #[assoc(as_str = "supprimer")]
    #[assoc(label = "Supprimer")]
    #[assoc(tone = Tone::Danger)]
    #[subenum(ActionKnown)]
    Delete,

    /// An action this client does not know, preserved verbatim.
    #[assoc(as_str = _0.as_str())]
    #[assoc(label = _0.as_str())]
    #[assoc(tone = Tone::Neutral)]
    Other(String),
}

impl Action {
    fn alias(key: &str) -> Option<Self> {
        match key {
            "read" | "view" | "voir" | "consulter" | "lecture" => Some(Self::Read),
            "create" | "ajouter" | "creation" => Some(Self::Create),
            "update" | "edit" | "editer" | "modification" => Some(Self::Update),
            "delete" | "remove" | "suppression" => Some(Self::Delete),
            _ => None,
        }
    }
}

#[duplicate_item(
    ty known_ty;
    [ PaymentStatus ] [ PaymentStatusKnown ];
    [ VoyageStatus ] [ VoyageStatusKnown ];
    [ InvoiceStatus ] [ InvoiceStatusKnown ];
    [ VisaType ] [ VisaTypeKnown ];
    [ Role ] [ RoleKnown ];
    [ Action ] [ ActionKnown ];
)]
impl ty {
    /// All known variants, in display order.
    pub fn known() -> impl Iterator<Item = Self> {
        known_ty::iter().map(Self::from)
    }

    /// Whether this is a value the client recognizes.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

#[duplicate_item(
    ty known_ty;
    [ PaymentStatus ] [ PaymentStatusKnown ];
    [ VoyageStatus ] [ VoyageStatusKnown ];
    [ InvoiceStatus ] [ InvoiceStatusKnown ];
    [ VisaType ] [ VisaTypeKnown ];
    [ Role ] [ RoleKnown ];
    [ Action ] [ ActionKnown ];
)]
impl From<&str> for ty {
    fn from(raw: &str) -> Self {
        let key = normalize(raw);
        if let Some(variant) = Self::alias(&key) {
            return variant;
        }
        for variant in known_ty::iter() {
            if variant.as_str() == key {
                return variant.into();
            }
        }
        Self::Other(raw.trim().to_string())
    }
}

#[duplicate_item(
    ty;
    [ PaymentStatus ];
    [ VoyageStatus ];
    [ InvoiceStatus ];
    [ VisaType ];
    [ Role ];
    [ Action ];
)]
impl From<String> for ty {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

#[duplicate_item(
    ty;
    [ PaymentStatus ];
    [ VoyageStatus ];
    [ InvoiceStatus ];
    [ VisaType ];
    [ Role ];
    [ Action ];
)]
impl fmt::Display for ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[duplicate_item(
    ty;
    [ PaymentStatus ];
    [ VoyageStatus ];
    [ InvoiceStatus ];
    [ VisaType ];
    [ Role ];
    [ Action ];
)]
impl Serialize for ty {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[duplicate_item(
    ty;
    [ PaymentStatus ];
    [ VoyageStatus ];
    [ InvoiceStatus ];
    [ VisaType ];
    [ Role ];
    [ Action ];
)]
impl<'de> Deserialize<'de> for ty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// Whether a record is a quote or an invoice.
///
/// Unlike the status enums there is no catch-all: anything that isn't
/// recognizably a quote is treated as an invoice, which is what the backend
/// defaults to when the field is missing.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Assoc, EnumIter)]
#[func(pub const fn as_str(&self) -> &'static str)]
#[func(pub const fn label(&self) -> &'static str)]
pub enum InvoiceKind {
    #[assoc(as_str = "devis")]
    #[assoc(label = "Devis")]
    Quote,

    #[default]
    #[assoc(as_str = "facture")]
    #[assoc(label = "Facture")]
    Invoice,
}

impl From<&str> for InvoiceKind {
    fn from(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "devis" | "quote" | "proforma" | "pro_forma" | "estimate" => Self::Quote,
            _ => Self::Invoice,
        }
    }
}

impl fmt::Display for InvoiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for InvoiceKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for InvoiceKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::from).unwrap_or_default())
    }
}

/// Lowercase the text and strip French diacritics.
///
/// Used both for status lookup and for accent-insensitive search.
pub fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'à' | 'â' | 'ä' | 'á' | 'ã' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' | 'í' | 'ì' => 'i',
            'ô' | 'ö' | 'ó' | 'ò' | 'õ' => 'o',
            'ù' | 'û' | 'ü' | 'ú' => 'u',
            'ÿ' => 'y',
            'ç' => 'c',
            c => c,
        })
        .collect()
}

/// Fold the text into a lookup key: [`fold`]ed, with runs of spaces,
/// hyphens, underscores and apostrophes collapsed into a single `_`.
pub fn normalize(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    for c in fold(raw.trim()).chars() {
        let c = match c {
            ' ' | '-' | '_' | '\'' | '’' => '_',
            c => c,
        };
        if c == '_' && (key.is_empty() || key.ends_with('_')) {
            continue;
        }
        key.push(c);
    }
    while key.ends_with('_') {
        key.pop();
    }
    key
}
