use std::str::FromStr;

use derive_more::{Debug, Display, Error};
use serde::{Deserialize, Serialize};

/// A bearer token authenticating requests to the agency backend.
///
/// The token is opaque to the client: it is obtained from the login endpoint,
/// stored locally, and attached to requests as `Authorization: Bearer <token>`.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[debug("Token(..)")]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Create a token from its raw value.
    ///
    /// Surrounding whitespace and a leading `Bearer` scheme are removed, so
    /// a header value copied verbatim still works.
    pub fn new(token: impl AsRef<str>) -> Result<Self, EmptyTokenError> {
        let token = token.as_ref().trim();
        let token = token
            .strip_prefix("Bearer ")
            .or_else(|| token.strip_prefix("bearer "))
            .unwrap_or(token)
            .trim();
        if token.is_empty() {
            return Err(EmptyTokenError);
        }
        Ok(Self(token.to_string()))
    }

    /// View the secret value of the token.
    ///
    /// Named so that call sites reading the secret stand out in review.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl FromStr for Token {
    type Err = EmptyTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<&Token> for Token {
    fn from(token: &Token) -> Self {
        token.clone()
    }
}

/// The provided token was empty.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display, Error)]
#[display("token is empty")]
pub struct EmptyTokenError;
