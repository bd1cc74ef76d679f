//! Poetry source: token acquisition and poem lookup.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};

use crate::app::domain::poem::Poem;
use crate::app::infrastructure::cancel::CancelToken;
use crate::app::infrastructure::error::{AppError, Result};

const USER_AGENT: &str = concat!("WavePoem/", env!("CARGO_PKG_VERSION"));

pub trait PoetrySource: Send + Sync {
    /// Obtain a new access token. The token may come back blank; callers
    /// decide what to do with it.
    fn request_token(&self, cancel: &CancelToken) -> Result<String>;

    fn fetch_poem(&self, token: &str, cancel: &CancelToken) -> Result<Poem>;
}

impl<T: PoetrySource + ?Sized> PoetrySource for Arc<T> {
    fn request_token(&self, cancel: &CancelToken) -> Result<String> {
        (**self).request_token(cancel)
    }

    fn fetch_poem(&self, token: &str, cancel: &CancelToken) -> Result<Poem> {
        (**self).fetch_poem(token, cancel)
    }
}

/// Response wrapper used by every endpoint of the poetry API.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: String,
    data: Option<T>,
    #[serde(rename = "errMessage", default)]
    err_message: Option<String>,
}

/// Decode an API response body, turning non-2xx statuses and
/// `status != "success"` envelopes into [`AppError::Poetry`].
fn decode<T: DeserializeOwned>(endpoint: &str, status_code: i32, body: &str) -> Result<T> {
    if !(200..300).contains(&status_code) {
        return Err(AppError::Poetry(format!(
            "{} returned HTTP {}",
            endpoint, status_code
        )));
    }

    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| AppError::Poetry(format!("{} returned malformed JSON: {}", endpoint, e)))?;

    if envelope.status != "success" {
        let reason = envelope.err_message.unwrap_or(envelope.status);
        return Err(AppError::Poetry(format!("{} failed: {}", endpoint, reason)));
    }

    envelope
        .data
        .ok_or_else(|| AppError::Poetry(format!("{} returned no data", endpoint)))
}

/// HTTP client for the jinrishici v2 API.
#[derive(Debug, Clone)]
pub struct HttpPoetrySource {
    base_url: String,
    timeout_secs: u64,
}

impl HttpPoetrySource {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs,
        }
    }

    fn get(&self, path: &str, token: Option<&str>, cancel: &CancelToken) -> Result<(i32, String)> {
        cancel.check()?;

        let url = format!("{}/{}", self.base_url, path);
        let mut request = minreq::get(&url)
            .with_header("User-Agent", USER_AGENT)
            .with_timeout(self.timeout_secs);
        if let Some(token) = token {
            request = request.with_header("X-User-Token", token);
        }

        debug!(%url, "poetry request");
        let response = request.send()?;

        // The session may have been torn down while we were waiting
        cancel.check()?;

        let body = response.as_str()?.to_string();
        Ok((response.status_code, body))
    }
}

impl PoetrySource for HttpPoetrySource {
    fn request_token(&self, cancel: &CancelToken) -> Result<String> {
        let (status, body) = self.get("token", None, cancel)?;
        let token: String = decode("token", status, &body)?;
        info!("acquired new poetry token");
        Ok(token)
    }

    fn fetch_poem(&self, token: &str, cancel: &CancelToken) -> Result<Poem> {
        let (status, body) = self.get("sentence", Some(token), cancel)?;
        let poem: Poem = decode("sentence", status, &body)?;
        debug!(title = %poem.origin.title, "poem received");
        Ok(poem)
    }
}
