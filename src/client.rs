use std::fmt;
use std::time::Duration;

use reqwest::{header, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value as JsonValue;

// tokio::time::sleep is only available on non-WASM targets.
#[cfg(not(target_arch = "wasm32"))]
use tokio::time::sleep;

use crate::{ApiEnvelope, ClientOptions, FetchError, LoadState, RequestOptions, Result};

/// Header names whose values never appear in `Debug` output.
const SENSITIVE_HEADERS: [&str; 4] = [
    "authorization",
    "proxy-authorization",
    "cookie",
    "x-api-key",
];

#[derive(Clone)]
/// JSON-over-HTTP client with bounded fixed-delay retry.
pub struct FetchClient {
    http: reqwest::Client,
    default_headers: Vec<(String, String)>,
    options: ClientOptions,
}

impl fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .default_headers
            .iter()
            .map(|(name, value)| {
                if is_sensitive_header(name) {
                    (name.as_str(), "<redacted>")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();
        f.debug_struct("FetchClient")
            .field("default_headers", &headers)
            .field("options", &self.options)
            .finish()
    }
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Creates a client that only accepts absolute URLs.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            default_headers: Vec::new(),
            options: ClientOptions::default(),
        }
    }

    /// Creates a client that resolves relative URLs against `base_url`.
    ///
    /// ```no_run
    /// use resilient_fetch::FetchClient;
    ///
    /// let client = FetchClient::with_base_url("https://api.example.com/v1");
    /// ```
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new().with_options(ClientOptions {
            base_url: Some(base_url.into()),
            timeout_ms: None,
        })
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `FETCH_BASE_URL` — base URL for relative request paths (required)
    /// - `FETCH_TIMEOUT_MS` — default per-attempt timeout (optional)
    ///
    /// **Not available on `wasm32` targets** — environment variables do not
    /// exist in browser runtimes. Use [`FetchClient::with_base_url`] instead.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> std::result::Result<Self, String> {
        let base_url = std::env::var("FETCH_BASE_URL")
            .map_err(|_| "missing FETCH_BASE_URL environment variable".to_owned())?;
        if base_url.trim().is_empty() {
            return Err("FETCH_BASE_URL is set but empty".to_owned());
        }
        let timeout_ms = match std::env::var("FETCH_TIMEOUT_MS") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|err| format!("FETCH_TIMEOUT_MS is not a valid integer: {err}"))?,
            ),
            Err(_) => None,
        };
        Ok(Self::new().with_options(ClientOptions {
            base_url: Some(base_url.trim().to_owned()),
            timeout_ms,
        }))
    }

    /// Applies client-wide options such as base URL and default timeout.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Adds a header sent with every request, before per-request headers.
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Returns the client-wide options.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Sends a `GET` request and decodes the JSON response into `T`.
    pub async fn get<T: DeserializeOwned>(&self, url: &str, options: RequestOptions) -> Result<T> {
        self.request(url, options.with_method(Method::GET)).await
    }

    /// Sends a `POST` request with `body` serialized as JSON.
    pub async fn post<T, B>(&self, url: &str, body: &B, options: RequestOptions) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let options = options.with_method(Method::POST).with_json(body)?;
        self.request(url, options).await
    }

    /// Sends a request, retrying transport and non-success HTTP failures up to
    /// `options.retries` times, and decodes the success body into `T`.
    ///
    /// A body that fails to decode is returned immediately as
    /// [`FetchError::Decode`]; it is never retried.
    pub async fn request<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let url = self.resolve_url(url)?;
        let body = self.send_with_retry(&url, &options).await?;
        serde_json::from_str::<T>(&body).map_err(|err| {
            FetchError::Decode(format!("invalid response JSON: {err}; body: {body}"))
        })
    }

    /// Loads an [`ApiEnvelope`] and folds the outcome into a [`LoadState`].
    ///
    /// A failing envelope `code` inside a success response is surfaced as
    /// [`LoadState::Failure`] without retrying.
    pub async fn load<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> LoadState<T> {
        let result = self.request::<ApiEnvelope<T>>(url, options).await;

        #[cfg(feature = "tracing")]
        if let Err(err) = &result {
            tracing::error!(url, kind = err.kind().as_str(), "failed to load data: {err}");
        }

        LoadState::from_envelope(result)
    }

    fn resolve_url(&self, url: &str) -> Result<String> {
        let url = url.trim();
        if url.is_empty() {
            return Err(FetchError::InvalidRequest("url must not be empty".to_owned()));
        }
        if is_absolute_url(url) {
            return Ok(url.to_owned());
        }
        let base = self.options.base_url.as_deref().ok_or_else(|| {
            FetchError::InvalidRequest(format!("relative url '{url}' requires a base url"))
        })?;
        Ok(join_url(base, url))
    }

    async fn send_with_retry(&self, url: &str, options: &RequestOptions) -> Result<String> {
        let mut attempt = 0usize;
        loop {
            #[cfg(feature = "tracing")]
            tracing::debug!(url, method = %options.method, attempt, "sending request");

            let failure = match self.build_request(url, options).send().await {
                Ok(response) => {
                    let status = response.status();
                    match response.text().await {
                        Ok(body) if status.is_success() => return Ok(body),
                        Ok(body) => FetchError::Http {
                            status: status.as_u16(),
                            message: server_message(status, &body),
                            body,
                        },
                        Err(err) if status.is_success() => FetchError::Transport(err),
                        // A status arrived; keep it even though the body was cut short.
                        Err(_) => FetchError::Http {
                            status: status.as_u16(),
                            message: server_message(status, ""),
                            body: String::new(),
                        },
                    }
                }
                Err(err) if err.is_builder() => {
                    return Err(FetchError::InvalidRequest(err.to_string()));
                }
                Err(err) => FetchError::Transport(err),
            };

            if attempt >= options.retries {
                return Err(failure);
            }

            #[cfg(feature = "tracing")]
            tracing::warn!(
                url,
                attempt,
                retries = options.retries,
                delay_ms = options.retry_delay_ms,
                "retrying after failure: {failure}"
            );

            wait_before_retry(options.retry_delay_ms).await;
            attempt += 1;
        }
    }

    fn build_request(&self, url: &str, options: &RequestOptions) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(options.method.clone(), url)
            .header(header::ACCEPT, "application/json");

        for (name, value) in self.default_headers.iter().chain(options.headers.iter()) {
            builder = builder.header(name.as_str(), value.as_str());
        }

        // On WASM, reqwest uses AbortController for timeout; the `.timeout()`
        // method is available on both targets.
        if let Some(timeout_ms) = options.timeout_ms.or(self.options.timeout_ms) {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        builder
    }
}

/// Waits `delay_ms` before the next attempt without blocking other tasks.
async fn wait_before_retry(delay_ms: u64) {
    if delay_ms == 0 {
        return;
    }

    #[cfg(not(target_arch = "wasm32"))]
    sleep(Duration::from_millis(delay_ms)).await;

    #[cfg(target_arch = "wasm32")]
    wasm_sleep(delay_ms).await;
}

/// Resolves after `delay_ms` via the host's `setTimeout`.
///
/// Resolves immediately when the global scope has no `setTimeout`, so the
/// retry loop cannot stall.
#[cfg(target_arch = "wasm32")]
async fn wasm_sleep(delay_ms: u64) {
    use wasm_bindgen::{JsCast, JsValue};

    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let set_timeout =
            js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("setTimeout"))
                .ok()
                .and_then(|value| value.dyn_into::<js_sys::Function>().ok());
        let scheduled = set_timeout.is_some_and(|set_timeout| {
            set_timeout
                .call2(&JsValue::NULL, &resolve, &JsValue::from_f64(delay_ms as f64))
                .is_ok()
        });
        if !scheduled {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

/// Extracts the server's `message` field from an error body, falling back
/// to a message derived from the status code.
fn server_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<JsonValue>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(JsonValue::as_str)
                .map(str::trim)
                .filter(|message| !message.is_empty())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()))
}

fn is_absolute_url(url: &str) -> bool {
    let scheme = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    scheme.starts_with("http://") || scheme.starts_with("https://")
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn is_sensitive_header(name: &str) -> bool {
    SENSITIVE_HEADERS
        .iter()
        .any(|sensitive| sensitive.eq_ignore_ascii_case(name))
}
