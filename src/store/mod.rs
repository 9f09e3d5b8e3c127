pub mod http;
pub mod repo;

use crate::domain::Resource;
use thiserror::Error;

pub use http::HttpStore;
pub use repo::RemoteStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend unreachable or answered a list call with a failure status.
    #[error("could not load {resource}s from {url}: {reason}")]
    Connectivity {
        resource: &'static str,
        url: String,
        reason: String,
    },
    /// Create/delete answered with a failure status.
    #[error("backend rejected {action} on {resource}s: HTTP {status}")]
    Rejected {
        action: &'static str,
        resource: &'static str,
        status: u16,
    },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl StoreError {
    pub(crate) fn connectivity(resource: Resource, url: &str, reason: impl ToString) -> Self {
        StoreError::Connectivity {
            resource: resource.singular(),
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
