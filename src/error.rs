use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type SignResult<T> = std::result::Result<T, SignError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("request failed : {0}")]
    Transport(#[from] TransportError),
    #[error("response could not be parsed : {0}")]
    Parse(#[from] ParseError),
    #[error("OpenAPI: {message}")]
    Api { code: String, message: String },
    #[error("invalid call : {0}")]
    Caller(#[from] CallerError),
    #[error("OAuth sign failed : {0}")]
    Signer(#[from] SignError),
    #[error("configuration error : {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Returns the vendor error message when this is an `Error::Api`.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Error::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Failures surfaced by the transport collaborator, passed through untouched.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed json body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed form-urlencoded body: {0}")]
    Form(#[from] serde_urlencoded::de::Error),
    #[error("response has malformed format: not found {0} in {1}")]
    TokenKeyNotFound(&'static str, String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallerError {
    #[error("parameter {0} is specified more than once")]
    DuplicateParameter(String),
    #[error("parameter {0} must not be empty")]
    MissingParameter(&'static str),
    #[error("url {0} must not carry a query string or fragment")]
    QueryInUrl(String),
    #[error("invalid url {0}: {1}")]
    InvalidUrl(String, url::ParseError),
}

#[derive(Error, Debug, Clone)]
pub enum SignError {
    #[error("invalid signing key: {0}")]
    InvalidKey(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingVariable(&'static str),
    #[error("{0} environment variable is not valid unicode")]
    NotUnicode(&'static str),
}
