use serde::{Deserialize, Serialize};

/// Application-level `code` that signals success.
pub const SUCCESS_CODE: i64 = 200;

/// Message used when an unsuccessful envelope carries no message of its own.
pub const DEFAULT_ENVELOPE_FAILURE_MESSAGE: &str = "request was not successful";

/// JSON wrapper `{code, status, message, data}` returned by the backend.
///
/// `code` is independent of the HTTP status: a 200 response may still carry
/// a failing `code`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Returns the payload of a successful envelope, or the message to show instead.
    pub fn into_data(self) -> std::result::Result<T, String> {
        let success = self.is_success();
        match self.data {
            Some(data) if success => Ok(data),
            _ if self.message.trim().is_empty() => {
                Err(DEFAULT_ENVELOPE_FAILURE_MESSAGE.to_owned())
            }
            _ => Err(self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ApiEnvelope, DEFAULT_ENVELOPE_FAILURE_MESSAGE};

    #[test]
    fn decodes_envelope_with_list_payload() {
        let envelope: ApiEnvelope<Vec<String>> = serde_json::from_value(json!({
            "code": 200,
            "status": "ok",
            "message": "",
            "data": ["alpha", "beta"]
        }))
        .expect("envelope must decode");

        assert!(envelope.is_success());
        assert_eq!(
            envelope.into_data(),
            Ok(vec!["alpha".to_owned(), "beta".to_owned()])
        );
    }

    #[test]
    fn missing_or_null_data_is_none() {
        let missing: ApiEnvelope<Vec<u32>> =
            serde_json::from_value(json!({"code": 200})).expect("envelope must decode");
        let null: ApiEnvelope<Vec<u32>> =
            serde_json::from_value(json!({"code": 200, "data": null}))
                .expect("envelope must decode");

        assert_eq!(missing.data, None);
        assert_eq!(missing.status, "");
        assert_eq!(null.data, None);
        assert_eq!(
            null.into_data(),
            Err(DEFAULT_ENVELOPE_FAILURE_MESSAGE.to_owned())
        );
    }

    #[test]
    fn failing_code_returns_server_message() {
        let envelope = ApiEnvelope {
            code: 404,
            status: "not_found".to_owned(),
            message: "no items".to_owned(),
            data: Some(vec![1, 2, 3]),
        };

        assert!(!envelope.is_success());
        assert_eq!(envelope.into_data(), Err("no items".to_owned()));
    }
}
