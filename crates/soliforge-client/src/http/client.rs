/*
[INPUT]:  HTTP configuration (base URL, timeouts) and a shared auth context
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation and response handling
[UPDATE]: When adding connection options or changing client behavior
[UPDATE]: 2026-08-21 centralize 401 handling in send()
[UPDATE]: 2026-10-19 task ids are pushed as escaped path segments
*/

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::AuthContext;
use crate::http::{Result, SoliforgeError};
use crate::types::ActionResponse;

/// Default API root of a locally running backend
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Whether a request carries the session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    Public,
    Bearer,
}

/// Main HTTP client for the SoliForge API.
///
/// Cloning is cheap; clones share the connection pool and the auth context.
#[derive(Debug, Clone)]
pub struct SoliforgeClient {
    http_client: Client,
    base_url: Url,
    auth: AuthContext,
}

impl SoliforgeClient {
    /// Create a signed-out client with default configuration
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::default(), base_url, AuthContext::new())
    }

    /// Create a client with custom configuration and an existing auth context
    pub fn with_config(config: ClientConfig, base_url: &str, auth: AuthContext) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: normalize_base_url(base_url)?,
            auth,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// Build full URL for an endpoint relative to the API root
    fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
    }

    /// URL of `tasks/{id}` or `tasks/{id}/{action}`.
    ///
    /// The id is always a single percent-encoded segment, so `/`, `?` and `#`
    /// inside it cannot change the request target.
    pub(crate) fn task_url(&self, task_id: &str, action: Option<&str>) -> Result<Url> {
        // url drops tabs and newlines, then resolves bare dot segments
        if task_id.trim().is_empty()
            || matches!(task_id, "." | "..")
            || task_id.chars().any(char::is_control)
        {
            return Err(SoliforgeError::InvalidTaskId(task_id.to_string()));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                SoliforgeError::Config(format!("API base URL cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .push("tasks")
            .push(task_id)
            .extend(action);
        Ok(url)
    }

    /// Build request builder, attaching the bearer token for authenticated access
    pub(crate) fn request(
        &self,
        method: Method,
        endpoint: &str,
        access: Access,
    ) -> Result<RequestBuilder> {
        let url = self.endpoint_url(endpoint)?;
        Ok(self.request_url(method, url, access))
    }

    /// Same as [`request`](Self::request) for an already built URL
    pub(crate) fn request_url(&self, method: Method, url: Url, access: Access) -> RequestBuilder {
        let builder = self.http_client.request(method, url);
        match (access, self.auth.access_token()) {
            (Access::Bearer, Some(token)) => builder.bearer_auth(token),
            _ => builder,
        }
    }

    /// Send a request and return the raw body of a successful response.
    ///
    /// A 401 on an authenticated request clears the auth context and maps to
    /// `SoliforgeError::Unauthenticated`; this is the only place that happens.
    pub(crate) async fn send(&self, builder: RequestBuilder, access: Access) -> Result<String> {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await?;

        if status.is_success() {
            debug!(%url, status = status.as_u16(), "request succeeded");
            return Ok(body);
        }

        if status == StatusCode::UNAUTHORIZED && access == Access::Bearer {
            warn!(%url, "session rejected by server, clearing token");
            self.auth.clear();
            return Err(SoliforgeError::Unauthenticated);
        }

        let err = SoliforgeError::api_error(status, &body);
        debug!(%url, status = status.as_u16(), error = %err, "request failed");
        Err(err)
    }

    /// Send a request and decode the JSON body
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        access: Access,
    ) -> Result<T> {
        let body = self.send(builder, access).await?;
        serde_json::from_str(&body).map_err(|e| {
            debug!(error = %e, "unexpected response body");
            SoliforgeError::from(e)
        })
    }

    /// Send a state-transition request whose acknowledgement body is advisory
    pub(crate) async fn send_action(
        &self,
        builder: RequestBuilder,
        access: Access,
    ) -> Result<ActionResponse> {
        let body = self.send(builder, access).await?;
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }
}

/// Parse the API root and make sure relative joins keep its path
pub fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(SoliforgeError::Config(format!(
            "API base URL must be http(s): {raw}"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
