use thiserror::Error;

/// Failure of a single network load. Each variant aborts only the load that
/// produced it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("{url} returned a malformed body: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("sprite at {url} could not be decoded: {source}")]
    Image {
        url: String,
        #[source]
        source: image::ImageError,
    },
}

/// Why a catalog reference URL did not yield a numeric id.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdParseError {
    #[error("{0:?} is not a valid URL")]
    InvalidUrl(String),

    #[error("{0:?} has no id path segment")]
    MissingSegment(String),

    #[error("{url:?} has a non-numeric id segment {segment:?}")]
    NotNumeric { url: String, segment: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("no colour is defined for type {0:?}")]
    UnknownType(String),

    #[error("{0:?} is not a #rrggbb colour")]
    BadHex(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be at least 1")]
    ZeroBound { name: &'static str },

    #[error("{name} template {template:?} has no {{id}} placeholder")]
    MissingPlaceholder {
        name: &'static str,
        template: String,
    },

    #[error("api base {0:?} is not a valid URL")]
    InvalidApiBase(String),
}
