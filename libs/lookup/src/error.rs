//! Error types for the lookup client

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Identifies one of the three demographic lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Age,
    Gender,
    Nationality,
}

impl Lookup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Gender => "gender",
            Self::Nationality => "nationality",
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The shared deadline elapsed before the named lookup answered.
    #[error("{lookup} lookup timed out")]
    Timeout { lookup: Lookup },

    /// Transport failure (connect, DNS, interrupted body) on the named lookup.
    #[error("{lookup} lookup request failed: {source}")]
    Request {
        lookup: Lookup,
        #[source]
        source: reqwest::Error,
    },

    /// The named lookup answered with a non-success HTTP status.
    #[error("{lookup} lookup returned status {status}")]
    Status {
        lookup: Lookup,
        status: reqwest::StatusCode,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Which lookup failed, when the error is tied to one.
    pub fn lookup(&self) -> Option<Lookup> {
        match self {
            Self::Timeout { lookup } | Self::Status { lookup, .. } => Some(*lookup),
            Self::Request { lookup, .. } => Some(*lookup),
            Self::Client(_) => None,
        }
    }
}
