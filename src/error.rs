//! Error types for quill.
//!
//! Every fallible stage of an invocation has its own variant so the entry point
//! can print a one-line message and pick a distinct exit code.

use thiserror::Error;

/// Exit code for misuse of the command line.
pub const EXIT_USAGE: u8 = 2;
/// Exit code for a missing or invalid credential or config file.
pub const EXIT_CONFIG: u8 = 3;
/// Exit code for failures while building the request.
pub const EXIT_REQUEST: u8 = 4;
/// Exit code for connectivity failures (connect, DNS, TLS, timeout).
pub const EXIT_TRANSPORT: u8 = 5;
/// Exit code for responses that carry no usable text.
pub const EXIT_RESPONSE: u8 = 6;
/// Exit code when the result cannot be written to stdout.
pub const EXIT_OUTPUT: u8 = 7;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The command line did not select a mode.
    #[error("{0}")]
    Usage(String),

    #[error(
        "API key not found. Set the API_KEY (or ANTHROPIC_API_KEY) environment variable \
         or add api_key to the [api] section of the config file."
    )]
    MissingApiKey,

    #[error("API key contains characters that are not allowed in an HTTP header")]
    InvalidApiKey,

    /// The config file could not be read or parsed.
    #[error("{0:#}")]
    Config(anyhow::Error),

    #[error("failed to initialize HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to build request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("failed to reach {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("no content returned by the model")]
    EmptyResponse,

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),

    #[error("clipboard command `{command}` failed: {reason}")]
    Clipboard { command: String, reason: String },
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Usage(_) => EXIT_USAGE,
            Error::MissingApiKey | Error::InvalidApiKey | Error::Config(_) => EXIT_CONFIG,
            Error::Encode(_) | Error::Request(_) => EXIT_REQUEST,
            Error::Transport { .. } => EXIT_TRANSPORT,
            Error::Api { .. } | Error::Decode(_) | Error::EmptyResponse => EXIT_RESPONSE,
            Error::Output(_) => EXIT_OUTPUT,
            Error::Client(_) | Error::Clipboard { .. } => 1,
        }
    }
}
