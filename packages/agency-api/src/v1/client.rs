//! HTTP client for the agency v1 API.

use std::time::Duration;

use color_eyre::{
    Result,
    eyre::{Context, OptionExt as _, eyre},
};
use reqwest::{Method, RequestBuilder, Response, header::ACCEPT};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, trace};
use url::Url;

use crate::{
    Token,
    ext::{join_all, with_trailing_slash},
};

use super::{
    ApiError, Invoice, InvoiceId, PaymentRequest, Resource, User, envelope,
};

/// How long a single request may take before it is abandoned.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the agency API.
#[derive(Clone, Debug)]
pub struct Client {
    base: Url,
    http: reqwest::Client,
    token: Option<Token>,
}

/// A signed-in session, as returned by the login endpoint.
#[derive(Clone, Debug)]
pub struct Session {
    pub token: Token,

    /// The signed-in user, when the backend includes it in the response.
    pub user: Option<User>,
}

impl Session {
    /// Extract the session from a login response.
    ///
    /// The token has been seen under `token`, `access_token` and either of
    /// those nested in a `data` envelope; the user under `user` or
    /// `data.user`.
    pub fn from_response(body: Value) -> Result<Self> {
        let scopes = [Some(&body), body.get("data")];
        let raw = scopes
            .iter()
            .flatten()
            .flat_map(|scope| [scope.get("token"), scope.get("access_token")])
            .flatten()
            .find_map(Value::as_str)
            .ok_or_eyre("login response carries no token")?;
        let token = Token::new(raw).context("parse token")?;
        let user = scopes
            .iter()
            .flatten()
            .find_map(|scope| scope.get("user"))
            .cloned()
            .and_then(|user| serde_json::from_value::<User>(user).ok());
        Ok(Self { token, user })
    }
}

impl Client {
    /// Create a new client with the given base URL.
    ///
    /// Endpoint paths are resolved relative to the base, so a base of
    /// `https://agence.example/api` reaches clients at
    /// `https://agence.example/api/clients`.
    pub fn new(base: impl Into<Url>) -> Self {
        Self {
            base: base.into().with_trailing_slash(),
            http: reqwest::Client::new(),
            token: None,
        }
    }

    /// Attach a bearer token to every request made by this client.
    pub fn with_token(mut self, token: impl Into<Token>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Check that the backend is reachable.
    ///
    /// Any response other than a server error counts: the base URL itself
    /// commonly answers `404` or `401`.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<()> {
        let response = self
            .request(Method::GET, self.base.clone())
            .send()
            .await
            .context("send GET request")?;
        match response.status() {
            status if status.is_server_error() => Err(eyre!("backend is unhealthy: {status}")),
            status => {
                trace!(?status, "backend reachable");
                Ok(())
            }
        }
    }

    /// Exchange credentials for a session token.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        #[derive(Serialize)]
        struct Credentials<'a> {
            email: &'a str,
            password: &'a str,
        }

        let url = self.url(["auth", "login"])?;
        let request = self
            .request(Method::POST, url)
            .json(&Credentials { email, password });
        let body = self.send_json(request, "login").await?;
        Session::from_response(body)
    }

    /// The user the current token belongs to.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<User> {
        let url = self.url(["auth", "me"])?;
        let body = self
            .send_json(self.request(Method::GET, url), "fetch current user")
            .await?;
        let body = match body {
            Value::Object(mut object) if object.get("user").is_some_and(Value::is_object) => {
                object.remove("user").unwrap_or_default()
            }
            body => body,
        };
        envelope::decode_record(body).context("decode current user")
    }

    /// Fetch every record of a resource.
    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn list<R: Resource>(&self) -> Result<Vec<R>> {
        self.list_where::<R>(&[]).await
    }

    /// Fetch the records of a resource, passing the given query parameters.
    ///
    /// The backend honors filters inconsistently; callers that need a filter
    /// to hold should also apply it to the result.
    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn list_where<R: Resource>(&self, query: &[(&str, String)]) -> Result<Vec<R>> {
        let url = self.url([R::PATH])?;
        let request = self.request(Method::GET, url).query(query);
        let body = self
            .send_json(request, format!("list {}s", R::NAME))
            .await?;
        let records = envelope::decode_collection::<R>(body)
            .with_context(|| format!("decode {} list", R::NAME))?;
        debug!(count = records.len(), "listed records");
        Ok(records)
    }

    /// Fetch a single record.
    #[instrument(skip(self), fields(resource = R::NAME, %id))]
    pub async fn get<R: Resource>(&self, id: R::Id) -> Result<R> {
        let url = self.url([R::PATH, id.to_string().as_str()])?;
        let body = self
            .send_json(self.request(Method::GET, url), format!("fetch {} {id}", R::NAME))
            .await?;
        envelope::decode_record(body).with_context(|| format!("decode {} {id}", R::NAME))
    }

    /// Create a record.
    ///
    /// Returns the stored record when the backend echoes it back; some
    /// endpoints only answer with a message.
    #[instrument(skip(self, draft), fields(resource = R::NAME))]
    pub async fn create<R: Resource>(&self, draft: &R::Draft) -> Result<Option<R>> {
        let url = self.url([R::PATH])?;
        let request = self.request(Method::POST, url).json(draft);
        let body = self
            .send_json(request, format!("create {}", R::NAME))
            .await?;
        envelope::decode_optional_record(body)
            .with_context(|| format!("decode created {}", R::NAME))
    }

    /// Replace the editable fields of a record.
    ///
    /// Returns the stored record when the backend echoes it back.
    #[instrument(skip(self, draft), fields(resource = R::NAME, %id))]
    pub async fn update<R: Resource>(&self, id: R::Id, draft: &R::Draft) -> Result<Option<R>> {
        let url = self.url([R::PATH, id.to_string().as_str()])?;
        let request = self.request(Method::PUT, url).json(draft);
        let body = self
            .send_json(request, format!("update {} {id}", R::NAME))
            .await?;
        envelope::decode_optional_record(body)
            .with_context(|| format!("decode updated {} {id}", R::NAME))
    }

    /// Delete a record.
    #[instrument(skip(self), fields(resource = R::NAME, %id))]
    pub async fn delete<R: Resource>(&self, id: R::Id) -> Result<()> {
        let url = self.url([R::PATH, id.to_string().as_str()])?;
        self.send(self.request(Method::DELETE, url), format!("delete {} {id}", R::NAME))
            .await
            .map(drop)
    }

    /// Turn a quote into an invoice.
    #[instrument(skip(self))]
    pub async fn convert_quote(&self, id: InvoiceId) -> Result<Invoice> {
        let url = self.url([Invoice::PATH, id.to_string().as_str(), "convertir"])?;
        let body = self
            .send_json(self.request(Method::POST, url), format!("convert quote {id}"))
            .await?;
        let converted = envelope::decode_optional_record(body)
            .with_context(|| format!("decode converted quote {id}"))?;
        match converted {
            Some(invoice) => Ok(invoice),
            None => self.get::<Invoice>(id).await,
        }
    }

    /// Record a payment against an invoice, returning the updated invoice.
    #[instrument(skip(self))]
    pub async fn record_payment(&self, id: InvoiceId, payment: &PaymentRequest) -> Result<Invoice> {
        let url = self.url([Invoice::PATH, id.to_string().as_str(), "paiements"])?;
        let request = self.request(Method::POST, url).json(payment);
        let body = self
            .send_json(request, format!("record payment on invoice {id}"))
            .await?;
        // The endpoint answers with either the invoice or the payment itself.
        match envelope::decode_optional_record::<Invoice>(body) {
            Ok(Some(invoice)) if invoice.id == id => Ok(invoice),
            Ok(_) => self.get::<Invoice>(id).await,
            Err(err) => {
                debug!(%err, "payment response is not an invoice, refetching");
                self.get::<Invoice>(id).await
            }
        }
    }

    fn url(&self, components: impl IntoIterator<Item = impl AsRef<str>>) -> Result<Url> {
        self.base
            .join_all(components)
            .with_context(|| format!("build endpoint url under {}", self.base))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json")
            .timeout(REQUEST_TIMEOUT);
        match &self.token {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        }
    }

    /// Send the request, turning non-success statuses into [`ApiError`].
    async fn send(&self, request: RequestBuilder, operation: impl AsRef<str>) -> Result<Response> {
        let operation = operation.as_ref();
        let response = request
            .send()
            .await
            .with_context(|| format!("send request to {operation}"))?;
        let status = response.status();
        trace!(?status, operation, "got response");
        if status.is_success() {
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                debug!(?err, operation, "read rejected response body");
                String::new()
            }
        };
        let error = ApiError::from_response(status, &body);
        debug!(?status, message = %error.message, operation, "request rejected");
        Err(error).with_context(|| format!("{operation} failed"))
    }

    /// Send the request and parse the body as JSON; an empty body is `null`.
    async fn send_json(&self, request: RequestBuilder, operation: impl AsRef<str>) -> Result<Value> {
        let operation = operation.as_ref();
        let response = self.send(request, operation).await?;
        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("read response body of {operation}"))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parse JSON response of {operation}"))
    }
}
