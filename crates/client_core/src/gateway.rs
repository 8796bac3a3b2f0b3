//! Single choke point for mutation traffic to the pack server.

use std::sync::Arc;

use reqwest::{cookie::Jar, multipart::Form, Client, Method};
use serde::Serialize;
use serde_json::Value;
use shared::error::{envelope_error, envelope_redirect};
use tracing::{debug, info};
use url::Url;

use crate::{error::GatewayError, host::PageHost};

/// Name of the cookie the server issues after `/authenticate`.
pub const SESSION_COOKIE: &str = "jwt";

pub enum RequestBody {
    Json(Value),
    Form(Form),
}

impl RequestBody {
    pub fn json<T: Serialize>(value: &T) -> Result<Self, GatewayError> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }
}

impl From<Form> for RequestBody {
    fn from(form: Form) -> Self {
        Self::Form(form)
    }
}

pub struct Gateway {
    http: Client,
    base_url: Url,
    cookies: Arc<Jar>,
    host: Arc<dyn PageHost>,
}

impl Gateway {
    pub fn new(base_url: &str, host: Arc<dyn PageHost>) -> Result<Self, GatewayError> {
        let base_url = Url::parse(base_url)?;
        let cookies = Arc::new(Jar::default());
        let http = Client::builder()
            .cookie_provider(cookies.clone())
            .build()?;
        Ok(Self {
            http,
            base_url,
            cookies,
            host,
        })
    }

    /// Preloads a session token as if `/authenticate` had accepted it.
    pub fn with_session_token(self, token: &str) -> Self {
        self.cookies
            .add_cookie_str(&format!("{SESSION_COOKIE}={token}; Path=/"), &self.base_url);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn resolve(&self, path: &str) -> Result<Url, GatewayError> {
        Ok(self.base_url.join(path)?)
    }

    /// Issues one request and interprets the response envelope.
    ///
    /// Order of checks: unparseable body, non-success status, embedded `error`.
    /// A `redirect_url` in a successful envelope navigates the page host before the
    /// parsed body is returned.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<Value, GatewayError> {
        let url = self.resolve(path)?;
        debug!(%method, %url, "calling pack server");

        let request = self.http.request(method, url);
        let request = match body {
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Form(form) => request.multipart(form),
        };

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let data: Value =
            serde_json::from_slice(&bytes).map_err(|source| GatewayError::Protocol {
                status: status.as_u16(),
                source,
            })?;

        if !status.is_success() {
            let message = envelope_error(&data)
                .unwrap_or_else(|| format!("Update failed with status {}", status.as_u16()));
            return Err(GatewayError::Request {
                status: status.as_u16(),
                message,
            });
        }

        if let Some(message) = envelope_error(&data) {
            return Err(GatewayError::Request {
                status: status.as_u16(),
                message,
            });
        }

        if let Some(redirect) = envelope_redirect(&data) {
            let target = self.resolve(redirect)?;
            info!(%target, "navigating to server redirect");
            self.host.navigate(target.as_str());
        }

        Ok(data)
    }

    pub async fn fetch_page(&self, path: &str) -> Result<String, GatewayError> {
        let url = self.resolve(path)?;
        let html = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(html)
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
