//! Validation of records before they are submitted.
//!
//! The backend validates too, but its messages are inconsistent and a
//! round-trip per mistake is slow; checking locally first reports every
//! problem with a draft at once.

use std::fmt;

use derive_more::Error;
use jiff::civil::Date;
use serde::Serialize;

use super::Amount;

/// A single problem with a draft.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub struct Violation {
    /// The wire name of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A draft failed validation.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub struct DraftError {
    #[error(not(source))]
    pub violations: Vec<Violation>,
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid record")?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

/// Drafts that can be checked before they are submitted.
pub trait Validate {
    /// Check the draft, reporting every problem at once.
    fn validate(&self) -> Result<(), DraftError>;
}

/// Accumulates violations while a draft is checked.
#[derive(Default, Debug)]
pub(crate) struct Checks(Vec<Violation>);

impl Checks {
    pub fn check(&mut self, field: &'static str, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.0.push(Violation {
                field,
                message: message.into(),
            });
        }
        self
    }

    pub fn required(&mut self, field: &'static str, value: &str) -> &mut Self {
        self.check(field, !value.trim().is_empty(), "est obligatoire")
    }

    pub fn email(&mut self, field: &'static str, value: Option<&str>) -> &mut Self {
        let ok = value.is_none_or(|value| {
            value
                .trim()
                .split_once('@')
                .is_some_and(|(user, _)| !user.is_empty())
        });
        self.check(field, ok, "n'est pas une adresse email valide")
    }

    pub fn non_negative(&mut self, field: &'static str, value: Option<Amount>) -> &mut Self {
        let ok = value.is_none_or(|value| !value.is_negative());
        self.check(field, ok, "ne peut pas être négatif")
    }

    /// `value` must not exceed `limit`, when both are present.
    pub fn at_most(
        &mut self,
        field: &'static str,
        value: Option<Amount>,
        limit: Option<Amount>,
        limit_name: &str,
    ) -> &mut Self {
        let ok = match (value, limit) {
            (Some(value), Some(limit)) => value <= limit,
            _ => true,
        };
        self.check(field, ok, format!("ne peut pas dépasser {limit_name}"))
    }

    /// `end` must not be before `start`, when both are present.
    pub fn chronological(
        &mut self,
        field: &'static str,
        start: Option<Date>,
        end: Option<Date>,
        start_name: &str,
    ) -> &mut Self {
        let ok = match (start, end) {
            (Some(start), Some(end)) => end >= start,
            _ => true,
        };
        self.check(field, ok, format!("ne peut pas précéder {start_name}"))
    }

    pub fn finish(&mut self) -> Result<(), DraftError> {
        if self.0.is_empty() {
            return Ok(());
        }
        Err(DraftError {
            violations: std::mem::take(&mut self.0),
        })
    }
}
