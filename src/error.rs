use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("URL template `{template}` is missing the {slot} slot")]
    MissingTemplateSlot { template: String, slot: &'static str },

    #[error("The result limit must be at least 1.")]
    InvalidResultLimit,

    #[error("The proxy file doesn't exist: {0}")]
    ProxyFileMissing(PathBuf),
    #[error("The proxy file doesn't contain any proxies: {0}")]
    EmptyProxyList(PathBuf),

    #[error("The selector you are trying to scrape for is invalid. Selector: {0}")]
    ParseMissingSelector(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Configuration errors are the only ones allowed to end a session.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::MissingTemplateSlot { .. }
                | Error::InvalidResultLimit
                | Error::ProxyFileMissing(_)
                | Error::EmptyProxyList(_)
        )
    }
}

/// Failure of a single request inside a batch. Never aborts its siblings.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid proxy `{proxy}`: {reason}")]
    Proxy { proxy: String, reason: String },
}
