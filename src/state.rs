use crate::{ApiEnvelope, FetchError};

/// Three-state view model updated when a data-loading task completes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Success(T),
    Failure(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> LoadState<T> {
    /// Folds a client result into a terminal state.
    pub fn from_result(result: std::result::Result<T, FetchError>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(err) => Self::Failure(err.message().to_owned()),
        }
    }

    /// Folds an envelope result, checking the application-level `code`.
    ///
    /// A failing `code` is terminal; it is not treated as retryable.
    pub fn from_envelope(result: std::result::Result<ApiEnvelope<T>, FetchError>) -> Self {
        match result {
            Ok(envelope) => match envelope.into_data() {
                Ok(data) => Self::Success(data),
                Err(message) => Self::Failure(message),
            },
            Err(err) => Self::Failure(err.message().to_owned()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            Self::Loading => LoadState::Loading,
            Self::Success(data) => LoadState::Success(f(data)),
            Self::Failure(message) => LoadState::Failure(message),
        }
    }
}
