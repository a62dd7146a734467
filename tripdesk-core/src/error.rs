use thiserror::Error;

use crate::credentials::CredentialKind;

/// Failure of a single service call or flow step.
///
/// Service clients classify every failure into one of these variants so
/// callers never have to guess why data is missing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("missing {0} API key")]
    MissingCredential(CredentialKind),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP error {0}")]
    Http(u16),

    #[error("empty response body")]
    EmptyResponse,

    #[error("non-JSON response: {0}")]
    MalformedJson(String),

    #[error("{0}")]
    Api(String),

    #[error("{0} not found")]
    NotFound(String),
}

impl Error {
    /// Strips the URL from transport errors since some services carry the key in it.
    pub(crate) fn network(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            Error::Network(format!("request timed out: {err}"))
        } else {
            Error::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
