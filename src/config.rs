use std::path::PathBuf;
use std::time::Duration;

use crate::engine::EngineKind;
use crate::{Error, Result, DEFAULT_RESULT_LIMIT, REQUEST_TIMEOUT_SECS};

/// What a session looks for. Fixed once the session is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingRequest {
    keywords: Vec<String>,
    site: String,
    limit: usize,
}

impl TrackingRequest {
    /// Duplicate keywords are dropped, keeping the first occurrence.
    pub fn new<I, S>(keywords: I, site: impl Into<String>, limit: usize) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if limit == 0 {
            return Err(Error::InvalidResultLimit);
        }

        let mut unique: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.into();
            if !unique.contains(&keyword) {
                unique.push(keyword);
            }
        }

        Ok(Self {
            keywords: unique,
            site: site.into(),
            limit,
        })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Everything needed to start a session.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub request: TrackingRequest,
    pub engine: EngineKind,
    /// Newline-delimited proxy list. `None` disables proxying.
    pub proxy_file: Option<PathBuf>,
    pub timeout: Duration,
}

impl TrackerConfig {
    pub fn new(request: TrackingRequest) -> Self {
        Self {
            request,
            engine: EngineKind::default(),
            proxy_file: None,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_engine(mut self, engine: EngineKind) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_proxy_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.proxy_file = Some(path.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new(TrackingRequest {
            keywords: Vec::new(),
            site: String::new(),
            limit: DEFAULT_RESULT_LIMIT,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_limit_is_rejected() {
        let err = TrackingRequest::new(["a"], "example.com", 0).unwrap_err();
        assert!(matches!(err, Error::InvalidResultLimit));
    }

    #[test]
    fn duplicates_are_dropped_in_order() {
        let req = TrackingRequest::new(["b", "a", "b", "c", "a"], "example.com", 10).unwrap();
        assert_eq!(req.keywords(), ["b", "a", "c"]);
        assert_eq!(req.site(), "example.com");
        assert_eq!(req.limit(), 10);
    }

    #[test]
    fn config_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.engine, EngineKind::Google);
        assert_eq!(config.request.limit(), DEFAULT_RESULT_LIMIT);
        assert!(config.proxy_file.is_none());
    }
}
