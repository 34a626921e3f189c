/// Auth Gateway: the single point of entry for every call to the recruitment backend.
///
/// ARCHITECTURAL RULE: API modules build requests with `request()` and send them with
/// `execute()` (or `execute_public()` for the credential exchange). Nothing else holds
/// a `reqwest::Client`.
///
/// Before send: the stored token, if any, is attached as a bearer credential.
/// After response: a session-ending status clears the store and publishes
/// `SessionEvent::Invalidated` before the caller sees the error.
use std::sync::Arc;
use std::time::Duration;

use reqwest::{multipart, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, error, warn};

use crate::errors::ClientError;
use crate::session::{SessionEvent, SessionStore};

/// Which rejected statuses end the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidationPolicy {
    /// 401 and 403 both drop the session.
    #[default]
    UnauthorizedAndForbidden,
    /// Only 401 drops the session; a 403 is reported but the session is kept.
    UnauthorizedOnly,
}

impl InvalidationPolicy {
    pub fn invalidates(&self, status: StatusCode) -> bool {
        match self {
            InvalidationPolicy::UnauthorizedAndForbidden => {
                status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
            }
            InvalidationPolicy::UnauthorizedOnly => status == StatusCode::UNAUTHORIZED,
        }
    }
}

#[derive(Clone)]
pub struct AuthGateway {
    client: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    events: broadcast::Sender<SessionEvent>,
    policy: InvalidationPolicy,
}

impl AuthGateway {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        store: Arc<dyn SessionStore>,
        events: broadcast::Sender<SessionEvent>,
        policy: InvalidationPolicy,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("portal/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            events,
            policy,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Starts a request against `base_url + path`. Send it with `execute`.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("accept", "application/json")
    }

    /// Sends an authenticated request and decodes the JSON body.
    pub async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let builder = match self.store.get_token()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        // Transport failures leave the session alone.
        let response = builder.send().await?;
        let status = response.status();

        if self.policy.invalidates(status) {
            self.invalidate(status);
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_status(status, &body));
        }

        decode(response).await
    }

    /// Sends a request without credentials. Used for the credential exchange itself,
    /// where a 401 means wrong credentials rather than a dead session.
    pub async fn execute_public<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = builder.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ClientError::InvalidCredentials);
        }
        decode(response).await
    }

    /// Drops the stored session and tells subscribers to send the user back to login.
    /// Safe to run any number of times; clearing an empty store is a no-op.
    fn invalidate(&self, status: StatusCode) {
        match self.store.clear() {
            Ok(true) => warn!("Backend rejected session with {status}; stored session cleared"),
            Ok(false) => debug!("Backend rejected request with {status}; session already cleared"),
            Err(e) => error!("Failed to clear session after {status}: {e}"),
        }
        let _ = self.events.send(SessionEvent::Invalidated {
            status: status.as_u16(),
        });
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(self.request(Method::GET, path)).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.execute(self.request(Method::GET, path).query(query)).await
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn put_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.execute(self.request(Method::PUT, path).query(query)).await
    }

    pub async fn put<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(self.request(Method::PUT, path)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(self.request(Method::DELETE, path)).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> Result<T, ClientError> {
        self.execute(self.request(Method::POST, path).multipart(form)).await
    }
}

/// Turns a non-invalidating response into `T` or a `ClientError`.
/// An empty success body decodes as JSON `null`, so `()` and `Option<_>` targets work.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let url = response.url().path().to_string();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!("{url} returned {status}");
        return Err(ClientError::from_status(status, &body));
    }

    let bytes = response.bytes().await?;
    debug!("{url} returned {status} ({} bytes)", bytes.len());

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_slice(&bytes)?)
}
