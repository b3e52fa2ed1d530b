use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Proxy};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::{FetchError, REQUEST_TIMEOUT_SECS};

pub type FetchResult = core::result::Result<String, FetchError>;

/// One request of a batch. `id` is how its result comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub id: usize,
    pub url: String,
    pub post: Option<String>,
    pub proxy: Option<String>,
}

impl BatchRequest {
    pub fn get(id: usize, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            post: None,
            proxy: None,
        }
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_post(mut self, body: impl Into<String>) -> Self {
        self.post = Some(body.into());
        self
    }
}

/// Runs a whole batch concurrently and returns once every request has finished.
///
/// A failing request is reported under its own id and doesn't affect the others.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, requests: Vec<BatchRequest>) -> HashMap<usize, FetchResult>;
}

/// `reqwest` backed [`Fetch`]. Clients are cached per proxy.
#[derive(Debug)]
pub struct HttpFetcher {
    timeout: Duration,
    clients: Mutex<HashMap<Option<String>, Client>>,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            clients: Mutex::new(HashMap::new()),
        }
    }

    fn client_for(&self, proxy: Option<&str>) -> core::result::Result<Client, FetchError> {
        let key = proxy.map(str::to_string);
        if let Ok(clients) = self.clients.lock() {
            if let Some(client) = clients.get(&key) {
                // Client uses Arc so we can clone cheaply
                return Ok(client.clone());
            }
        }

        let client = build_client(self.timeout, proxy)?;
        if let Ok(mut clients) = self.clients.lock() {
            clients.insert(key, client.clone());
        }
        Ok(client)
    }
}

fn build_client(timeout: Duration, proxy: Option<&str>) -> core::result::Result<Client, FetchError> {
    let mut builder = Client::builder().timeout(timeout);
    if let Some(proxy) = proxy {
        let route = Proxy::all(proxy).map_err(|e| FetchError::Proxy {
            proxy: proxy.to_string(),
            reason: e.to_string(),
        })?;
        builder = builder.proxy(route);
    }
    Ok(builder.build()?)
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, requests: Vec<BatchRequest>) -> HashMap<usize, FetchResult> {
        let mut results = HashMap::with_capacity(requests.len());
        let mut task_set = JoinSet::new();

        for request in requests {
            let client = match self.client_for(request.proxy.as_deref()) {
                Ok(client) => client,
                Err(e) => {
                    results.insert(request.id, Err(e));
                    continue;
                }
            };
            task_set.spawn(async move { (request.id, request_page_html(client, request).await) });
        }

        while let Some(task) = task_set.join_next().await {
            match task {
                Ok((id, result)) => {
                    results.insert(id, result);
                }
                // The id is lost with the task; its keyword just stays pending.
                Err(e) => warn!("request task failed: {e}"),
            }
        }
        results
    }
}

/// Requests a page and returns its HTML. Non-2xx responses are failures.
async fn request_page_html(client: Client, request: BatchRequest) -> FetchResult {
    debug!(id = request.id, url = %request.url, "requesting page");
    let builder = match request.post {
        Some(body) => client
            .post(&request.url)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body),
        None => client.get(&request.url),
    };

    let res = builder
        .send()
        .await?
        .error_for_status()
        .map_err(|e| match e.status() {
            Some(status) => FetchError::Status(status),
            None => FetchError::Transport(e),
        })?;
    let html = res.text().await?;
    Ok(html)
}
