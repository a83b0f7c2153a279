use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

/// Reachability checker backed by a run-scoped probe cache.
///
/// Each distinct URL is probed over the network at most once per run: the
/// cache maps the URL to a `OnceCell` slot, so racing callers coalesce on a
/// single in-flight HEAD request and everyone observes the same outcome.
/// Negative outcomes are cached too - a transient probe failure excludes the
/// URL for the remainder of the run.
#[derive(Clone)]
pub struct LinkValidator {
    client: Client,
    cache: Arc<Mutex<HashMap<String, Arc<OnceCell<bool>>>>>,
}

impl LinkValidator {
    /// The client should carry the short probe timeout, not the fetch one.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns true iff the URL answered a HEAD probe with a status in
    /// [200, 400). Transport errors, timeouts and malformed URLs all count
    /// as unreachable.
    pub async fn validate(&self, url: &str) -> bool {
        let slot = {
            let mut cache = self.cache.lock().await;
            cache.entry(url.to_string()).or_default().clone()
        };

        *slot.get_or_init(|| self.probe(url)).await
    }

    async fn probe(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let valid = (200..400).contains(&status);
                debug!("Probe {} -> {} (valid: {})", url, status, valid);
                valid
            }
            Err(e) => {
                debug!("Probe {} failed: {}", url, e);
                false
            }
        }
    }

    pub async fn cached_entries(&self) -> usize {
        self.cache.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn repeated_validation_probes_the_network_once() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let validator = LinkValidator::new(Client::new());
        let url = format!("{}/page", server.uri());

        assert!(validator.validate(&url).await);
        assert!(validator.validate(&url).await);
        assert_eq!(validator.cached_entries().await, 1);
    }

    #[tokio::test]
    async fn failed_probes_are_cached_as_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let validator = LinkValidator::new(Client::new());
        let url = format!("{}/gone", server.uri());

        assert!(!validator.validate(&url).await);
        assert!(!validator.validate(&url).await);
        assert_eq!(validator.cached_entries().await, 1);
    }
}
