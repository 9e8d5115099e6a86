use reqwest::Method;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::{FetchError, Result};

/// Client-wide defaults applied to every request.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClientOptions {
    /// Prefix for relative request URLs.
    pub base_url: Option<String>,
    /// Default per-attempt timeout in milliseconds. `None` defers to the transport.
    pub timeout_ms: Option<u64>,
}

/// Describes a single call: method, headers, body, timeout and retry policy.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestOptions {
    /// HTTP verb, `GET` by default.
    pub method: Method,
    /// Extra headers, sent after the client's default headers.
    pub headers: Vec<(String, String)>,
    /// JSON request body.
    pub body: Option<JsonValue>,
    /// Per-attempt timeout in milliseconds, overriding [`ClientOptions::timeout_ms`].
    pub timeout_ms: Option<u64>,
    /// Number of retries after the initial attempt. `0` means a single attempt.
    pub retries: usize,
    /// Fixed delay between attempts in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
            timeout_ms: None,
            retries: 0,
            retry_delay_ms: 0,
        }
    }
}

impl RequestOptions {
    /// Single-attempt `GET` with no body.
    pub fn get() -> Self {
        Self::default()
    }

    /// Single-attempt `POST` carrying `body` as JSON.
    pub fn post(body: JsonValue) -> Self {
        Self::default().with_method(Method::POST).with_body(body)
    }

    /// Replaces the HTTP verb.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Appends a request header. Invalid names or values fail the request as
    /// [`FetchError::InvalidRequest`] when it is sent.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the JSON request body.
    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `body` into the JSON request body.
    pub fn with_json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self> {
        let body = serde_json::to_value(body).map_err(|err| {
            FetchError::InvalidRequest(format!("request body is not serializable: {err}"))
        })?;
        Ok(self.with_body(body))
    }

    /// Sets the per-attempt timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Sets how many times a failed attempt is retried and the fixed delay
    /// between attempts.
    pub fn with_retries(mut self, retries: usize, retry_delay_ms: u64) -> Self {
        self.retries = retries;
        self.retry_delay_ms = retry_delay_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::json;

    use super::RequestOptions;

    #[test]
    fn defaults_to_single_get_attempt() {
        let options = RequestOptions::default();
        assert_eq!(options.method, Method::GET);
        assert_eq!(options.retries, 0);
        assert_eq!(options.retry_delay_ms, 0);
        assert!(options.body.is_none());
        assert!(options.timeout_ms.is_none());
    }

    #[test]
    fn post_sets_method_and_body() {
        let options = RequestOptions::post(json!({"name": "a.cfg"}))
            .with_header("x-request", "1")
            .with_timeout_ms(250)
            .with_retries(2, 100);

        assert_eq!(options.method, Method::POST);
        assert_eq!(options.body, Some(json!({"name": "a.cfg"})));
        assert_eq!(
            options.headers,
            vec![("x-request".to_owned(), "1".to_owned())]
        );
        assert_eq!(options.timeout_ms, Some(250));
        assert_eq!((options.retries, options.retry_delay_ms), (2, 100));
    }

    #[test]
    fn with_json_serializes_body() {
        #[derive(serde::Serialize)]
        struct Upload<'a> {
            name: &'a str,
            size: u32,
        }

        let options = RequestOptions::get()
            .with_method(Method::PUT)
            .with_json(&Upload { name: "a.cfg", size: 12 })
            .expect("body must serialize");

        assert_eq!(options.method, Method::PUT);
        assert_eq!(options.body, Some(json!({"name": "a.cfg", "size": 12})));
    }
}
