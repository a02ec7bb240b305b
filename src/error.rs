// Error types of the library surface. The binary wraps them with `anyhow`.

use thiserror::Error;

/// Failure of a single request to the results box.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The box answered with a non-2xx status.
    #[error("HTTP {status} from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The request never got a response (DNS, connect, timeout...).
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not the JSON shape we expected.
    #[error("unexpected response body from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status code, when the box answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Problems with `TOKEN`, `BOX_IP` and friends, found before any request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("BOX_IP '{value}' is not usable ({reason}); expected something like http://10.0.0.5")]
    InvalidBoxIp { value: String, reason: String },

    #[error("TOKEN contains characters that cannot be sent in an HTTP header")]
    InvalidToken,

    #[error("BOX_TIMEOUT_SECS must be a positive number of seconds, got '{0}'")]
    InvalidTimeout(String),

    #[error("failed to load {path}")]
    Dotenv {
        path: String,
        #[source]
        source: dotenv::Error,
    },

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
}

/// Bad command line; reported with the usage text before anything else runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("the following arguments are required: {0}")]
    MissingRequired(&'static str),

    #[error("argument {0}: expected one argument")]
    MissingValue(&'static str),

    #[error("argument --algotype: {0}")]
    InvalidAlgoType(#[from] crate::category::InvalidCategory),

    #[error("ambiguous option: {flag} could match {candidates}")]
    Ambiguous { flag: String, candidates: String },

    #[error("unrecognized arguments: {0}")]
    Unrecognized(String),
}
