use crate::config::LiveConfig;
use crate::model::ScraperError;
use rand::seq::IndexedRandom;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, UPGRADE_INSECURE_REQUESTS, USER_AGENT};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// Fetches marketplace pages with browser-like headers and a bounded wait.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    timeout: Duration,
    rotate_user_agents: bool,
}

impl PageFetcher {
    pub fn new(config: &LiveConfig) -> Result<Self, ScraperError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            timeout: config.timeout(),
            rotate_user_agents: config.rotate_user_agents,
        })
    }

    fn user_agent(&self) -> &'static str {
        if self.rotate_user_agents {
            USER_AGENTS.choose(&mut rand::rng()).copied().unwrap_or(USER_AGENTS[0])
        } else {
            USER_AGENTS[0]
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(self.user_agent()));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers
    }

    pub async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        debug!("GET {}", url);
        let request = self.client.get(url).headers(self.headers()).send();

        let response = match timeout(self.timeout, request).await {
            Ok(result) => result?,
            Err(_) => return Err(ScraperError::Timeout(self.timeout)),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::InvalidResponse(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
