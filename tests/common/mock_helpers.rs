//! Mock construction helpers

use async_trait::async_trait;
use reqwest::Url;
use seriesdash_rs::error::ImportError;
use seriesdash_rs::ingest::RemoteSource;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Canned response for one URL
#[derive(Clone)]
struct Route {
    delay: Duration,
    response: Result<Vec<u8>, ImportError>,
}

/// Remote source that answers each URL after a fixed delay
///
/// Unknown URLs fail with a network error.
#[derive(Default)]
pub struct ScriptedSource {
    routes: HashMap<String, Route>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `body` after `delay`
    pub fn respond(mut self, url: &str, delay: Duration, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(
            normalize(url),
            Route {
                delay,
                response: Ok(body.into()),
            },
        );
        self
    }

    /// Fail `url` with `error` after `delay`
    pub fn fail(mut self, url: &str, delay: Duration, error: ImportError) -> Self {
        self.routes.insert(
            normalize(url),
            Route {
                delay,
                response: Err(error),
            },
        );
        self
    }

    /// Number of fetches performed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn normalize(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

#[async_trait]
impl RemoteSource for ScriptedSource {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, ImportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.routes.get(url.as_str()) {
            Some(route) => {
                tokio::time::sleep(route.delay).await;
                route.response.clone()
            }
            None => Err(ImportError::Network(format!("no route for {}", url))),
        }
    }
}
