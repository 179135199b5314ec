//! Filtering, sorting and pagination of fetched records.
//!
//! The backend returns whole collections; everything a listing offers on
//! top of that (search, status filter, ordering, pages) happens here, in
//! memory.

use std::{cmp::Ordering, num::NonZeroUsize};

use agency_api::v1::{
    Amount, Customer, CustomerId, Invoice, InvoiceKind, InvoiceStatus, PaymentStatus, Permission,
    Resource, Role, User, Voyage, VoyageStatus,
    status::{fold, normalize},
};
use bon::Builder;
use jiff::civil::Date;
use serde::Serialize;

/// Records that can be found by free-text search.
pub trait Searchable {
    /// The text fields a search looks through.
    fn haystack(&self) -> Vec<String>;
}

/// Records that can be listed: searched, filtered and sorted.
pub trait Listable: Resource + Searchable {
    /// The canonical status values of the record, as matched by `--status`.
    fn statuses(&self, today: Date) -> Vec<String>;

    /// Turn a user-supplied status into the canonical value for this kind
    /// of record.
    fn canonical_status(raw: &str) -> String;

    fn customer_id(&self) -> Option<CustomerId> {
        None
    }

    fn kind(&self) -> Option<InvoiceKind> {
        None
    }

    /// Text used when sorting by name.
    fn name_key(&self) -> String;

    /// Date used when sorting by date.
    fn date_key(&self) -> Option<Date> {
        None
    }

    /// Amount used when sorting by amount.
    fn amount_key(&self) -> Option<Amount> {
        None
    }
}

/// Whether every whitespace-separated term of the query appears in one of
/// the fields, ignoring case and accents.
pub fn matches_search(haystack: &[String], query: &str) -> bool {
    let haystack = fold(&haystack.join("\n"));
    fold(query)
        .split_whitespace()
        .all(|term| haystack.contains(term))
}

/// Record ordering for listings.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Most recently created first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
    /// Alphabetically by name, number or destination.
    Name,
    /// Most recent date first (departure, issue or creation date).
    Date,
    /// Largest amount first.
    Amount,
}

impl SortKey {
    pub fn compare<R: Listable>(self, a: &R, b: &R) -> Ordering {
        let newest = || b.id().cmp(&a.id());
        match self {
            Self::Newest => newest(),
            Self::Oldest => a.id().cmp(&b.id()),
            Self::Name => fold(&a.name_key())
                .cmp(&fold(&b.name_key()))
                .then_with(newest),
            // Records without a date sort last.
            Self::Date => match (a.date_key(), b.date_key()) {
                (Some(a), Some(b)) => b.cmp(&a),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
            .then_with(newest),
            Self::Amount => b
                .amount_key()
                .unwrap_or_default()
                .cmp(&a.amount_key().unwrap_or_default())
                .then_with(newest),
        }
    }
}

/// What a listing is narrowed down to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Builder)]
pub struct Filter {
    #[builder(into)]
    pub search: Option<String>,

    #[builder(into)]
    pub status: Option<String>,

    pub customer: Option<CustomerId>,

    pub kind: Option<InvoiceKind>,
}

impl Filter {
    pub fn matches<R: Listable>(&self, record: &R, today: Date) -> bool {
        if let Some(query) = &self.search
            && !matches_search(&record.haystack(), query)
        {
            return false;
        }
        if let Some(status) = &self.status {
            let wanted = normalize(&R::canonical_status(status));
            if !record
                .statuses(today)
                .iter()
                .any(|status| normalize(status) == wanted)
            {
                return false;
            }
        }
        if self.customer.is_some() && record.customer_id() != self.customer {
            return false;
        }
        if self.kind.is_some() && record.kind() != self.kind {
            return false;
        }
        true
    }
}

/// Apply the filter and ordering to the records.
pub fn select<R: Listable>(
    records: impl IntoIterator<Item = R>,
    filter: &Filter,
    sort: SortKey,
    today: Date,
) -> Vec<R> {
    let mut selected = records
        .into_iter()
        .filter(|record| filter.matches(record, today))
        .collect::<Vec<_>>();
    selected.sort_by(|a, b| sort.compare(a, b));
    selected
}

/// A page request: 1-based page number and page size.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Page {
    number: usize,
    size: NonZeroUsize,
}

impl Page {
    /// Page numbers below 1 are treated as the first page.
    pub fn new(number: usize, size: NonZeroUsize) -> Self {
        Self {
            number: number.max(1),
            size,
        }
    }

    pub fn first(size: NonZeroUsize) -> Self {
        Self::new(1, size)
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn size(&self) -> NonZeroUsize {
        self.size
    }

    /// Cut the page out of the records.
    ///
    /// A page past the end shows the last page; an empty listing is a
    /// single empty page.
    pub fn of<T>(self, items: Vec<T>) -> Paginated<T> {
        let size = self.size.get();
        let total = items.len();
        let pages = total.div_ceil(size).max(1);
        let page = self.number.min(pages);
        let offset = (page - 1) * size;
        let items = items.into_iter().skip(offset).take(size).collect();
        Paginated {
            page,
            pages,
            per_page: size,
            total,
            offset,
            items,
        }
    }
}

/// One page of a listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
    pub page: usize,
    pub pages: usize,
    pub per_page: usize,
    pub total: usize,
    #[serde(skip)]
    offset: usize,
    pub items: Vec<T>,
}

impl<T> Paginated<T> {
    /// The records shown, as "11–20 sur 47".
    pub fn range(&self) -> String {
        if self.items.is_empty() {
            return format!("0 sur {}", self.total);
        }
        let first = self.offset + 1;
        let last = self.offset + self.items.len();
        format!("{first}–{last} sur {}", self.total)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            page: self.page,
            pages: self.pages,
            per_page: self.per_page,
            total: self.total,
            offset: self.offset,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

fn labels<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Vec<String> {
    values.into_iter().flatten().map(String::from).collect()
}

impl Searchable for Customer {
    fn haystack(&self) -> Vec<String> {
        let mut fields = vec![self.full_name()];
        fields.extend(labels([
            self.email.as_deref(),
            self.phone.as_deref(),
            self.passport_number.as_deref(),
            self.nationality.as_deref(),
            self.visa_type.as_ref().map(|visa| visa.label()),
            self.payment_status.as_ref().map(|status| status.label()),
        ]));
        fields
    }
}

impl Listable for Customer {
    fn statuses(&self, _today: Date) -> Vec<String> {
        labels([self.payment_status.as_ref().map(|status| status.as_str())])
    }

    fn canonical_status(raw: &str) -> String {
        PaymentStatus::from(raw).as_str().to_string()
    }

    fn name_key(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }

    fn date_key(&self) -> Option<Date> {
        self.created_on
    }
}

impl Searchable for Voyage {
    fn haystack(&self) -> Vec<String> {
        let mut fields = vec![self.destination.clone()];
        fields.extend(self.customer_name());
        fields.extend(labels([
            self.status.as_ref().map(|status| status.label()),
            self.notes.as_deref(),
        ]));
        fields
    }
}

impl Listable for Voyage {
    fn statuses(&self, _today: Date) -> Vec<String> {
        labels([self.status.as_ref().map(|status| status.as_str())])
    }

    fn canonical_status(raw: &str) -> String {
        VoyageStatus::from(raw).as_str().to_string()
    }

    fn customer_id(&self) -> Option<CustomerId> {
        Some(self.customer_id)
    }

    fn name_key(&self) -> String {
        self.destination.clone()
    }

    fn date_key(&self) -> Option<Date> {
        self.departure
    }

    fn amount_key(&self) -> Option<Amount> {
        Some(self.price)
    }
}

impl Searchable for Invoice {
    fn haystack(&self) -> Vec<String> {
        let mut fields = vec![self.display_number(), self.kind.label().to_string()];
        fields.extend(self.customer_name());
        fields.extend(labels([self.status.as_ref().map(|status| status.label())]));
        fields
    }
}

impl Listable for Invoice {
    /// The status shown for the invoice, plus `en_retard` when it is past
    /// due, so `--status en_retard` finds invoices the backend never
    /// flagged.
    fn statuses(&self, today: Date) -> Vec<String> {
        let effective = self.effective_status(today);
        let mut statuses = vec![effective.as_str().to_string()];
        if self.is_overdue(today) && effective != InvoiceStatus::Overdue {
            statuses.push(InvoiceStatus::Overdue.as_str().to_string());
        }
        statuses
    }

    fn canonical_status(raw: &str) -> String {
        InvoiceStatus::from(raw).as_str().to_string()
    }

    fn customer_id(&self) -> Option<CustomerId> {
        Some(self.customer_id)
    }

    fn kind(&self) -> Option<InvoiceKind> {
        Some(self.kind)
    }

    fn name_key(&self) -> String {
        self.display_number()
    }

    fn date_key(&self) -> Option<Date> {
        self.issued_on
    }

    fn amount_key(&self) -> Option<Amount> {
        Some(self.total)
    }
}

const ACTIVE: &str = "actif";
const INACTIVE: &str = "inactif";

impl Searchable for User {
    fn haystack(&self) -> Vec<String> {
        let mut fields = vec![self.name.clone(), self.email.clone()];
        fields.extend(labels([self.role.as_ref().map(|role| role.label())]));
        fields
    }
}

impl Listable for User {
    /// The role and whether the account is active.
    fn statuses(&self, _today: Date) -> Vec<String> {
        let activity = if self.is_active() { ACTIVE } else { INACTIVE };
        let mut statuses = vec![activity.to_string()];
        statuses.extend(labels([self.role.as_ref().map(|role| role.as_str())]));
        statuses
    }

    fn canonical_status(raw: &str) -> String {
        match normalize(raw).as_str() {
            "actif" | "active" | "actifs" => String::from(ACTIVE),
            "inactif" | "inactive" | "inactifs" | "desactive" => String::from(INACTIVE),
            _ => Role::from(raw).as_str().to_string(),
        }
    }

    fn name_key(&self) -> String {
        self.name.clone()
    }

    fn date_key(&self) -> Option<Date> {
        self.created_on
    }
}

impl Searchable for Permission {
    fn haystack(&self) -> Vec<String> {
        let mut fields = vec![self.resource.clone(), self.grantee()];
        fields.extend(self.actions.iter().map(|action| action.label().to_string()));
        fields
    }
}

impl Listable for Permission {
    fn statuses(&self, _today: Date) -> Vec<String> {
        labels([self.role.as_ref().map(|role| role.as_str())])
    }

    fn canonical_status(raw: &str) -> String {
        Role::from(raw).as_str().to_string()
    }

    fn name_key(&self) -> String {
        self.resource.clone()
    }
}
