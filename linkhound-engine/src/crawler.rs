use crate::error::Result;
use crate::extractor;
use crate::store::{ResultLog, VisitedSet};
use crate::validator::LinkValidator;
use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};
use url::Url;

/// Invoked once per accepted link with its normalized URL and whether it is
/// external to the page it was found on.
pub type LinkCallback = Arc<dyn Fn(&str, bool) + Send + Sync>;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(8);
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Sizing for the admission gate: enough permits to keep the connection pool
/// busy without letting fan-out scale with the link graph.
pub fn default_concurrency() -> usize {
    let parallelism = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    (parallelism * 4).max(16)
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub target_url: String,
    pub max_depth: usize,
    pub only_internal: bool,
    pub only_external: bool,
}

impl CrawlConfig {
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            max_depth: 3,
            only_internal: false,
            only_external: false,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn internal_only(mut self) -> Self {
        self.only_internal = true;
        self
    }

    pub fn external_only(mut self) -> Self {
        self.only_external = true;
        self
    }
}

/// Recursive bounded-concurrency crawler.
///
/// One run performs the fetch -> extract -> classify -> validate -> dedupe ->
/// (record | expand) cycle per URL, starting at the configured target.
/// Physical concurrency is bounded by a semaphore acquired around every
/// network operation, independent of how wide or deep the link graph fans
/// out. Each crawl step awaits the join handles of the steps it spawned, so
/// `run` resolves only once every transitively spawned task has finished.
pub struct Crawler {
    config: CrawlConfig,
    concurrency: usize,
    fetch_timeout: Duration,
    probe_timeout: Duration,
    on_link: Option<LinkCallback>,
}

struct Shared {
    config: CrawlConfig,
    client: Client,
    validator: LinkValidator,
    visited: VisitedSet,
    results: ResultLog,
    gate: Semaphore,
    on_link: Option<LinkCallback>,
}

struct ClassifiedLink {
    url: String,
    is_external: bool,
}

impl Crawler {
    pub fn new(config: CrawlConfig) -> Self {
        Self {
            config,
            concurrency: default_concurrency(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            on_link: None,
        }
    }

    /// Overrides the admission gate capacity. Clamped to at least one
    /// permit; a zero-capacity gate would park the first fetch forever.
    pub fn with_concurrency(mut self, permits: usize) -> Self {
        self.concurrency = permits.max(1);
        self
    }

    /// The probe timeout is meant to stay strictly shorter than the fetch
    /// timeout; probes are cheap pre-checks, not content downloads.
    pub fn with_timeouts(mut self, fetch: Duration, probe: Duration) -> Self {
        self.fetch_timeout = fetch;
        self.probe_timeout = probe;
        self
    }

    pub fn with_link_callback(mut self, callback: LinkCallback) -> Self {
        self.on_link = Some(callback);
        self
    }

    /// Crawls from the configured target and returns the accepted links in
    /// discovery order. Completes when depth exhaustion has closed every
    /// branch; an unparseable target is the only fatal error.
    pub async fn run(&self) -> Result<Vec<String>> {
        let seed = Url::parse(&self.config.target_url)?;
        let seed_url = seed.to_string();
        info!(
            "Starting crawl of {} (max depth {}, {} permits)",
            seed_url, self.config.max_depth, self.concurrency
        );

        let shared = Arc::new(Shared {
            config: self.config.clone(),
            client: build_client(self.fetch_timeout)?,
            validator: LinkValidator::new(build_client(self.probe_timeout)?),
            visited: VisitedSet::new(),
            results: ResultLog::new(),
            gate: Semaphore::new(self.concurrency),
            on_link: self.on_link.clone(),
        });

        shared.visited.insert_if_absent(&seed_url).await;
        crawl_step(shared.clone(), seed_url, 0).await;

        let results = shared.results.snapshot().await;
        info!(
            "Crawl complete: {} links accepted, {} URLs seen",
            results.len(),
            shared.visited.len().await
        );
        Ok(results)
    }
}

fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .user_agent("linkhound/0.2 (https://github.com/trapdoorsec/linkhound)")
        .timeout(timeout)
        .danger_accept_invalid_certs(true)
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(30))
        .tcp_keepalive(Duration::from_secs(60))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;
    Ok(client)
}

/// One crawl step. Boxed because the expansion recurses through spawned
/// tasks; depth strictly increases per expansion, so recursion is bounded.
fn crawl_step(shared: Arc<Shared>, url: String, depth: usize) -> BoxFuture<'static, ()> {
    async move {
        if depth > shared.config.max_depth {
            return;
        }
        let Ok(base) = Url::parse(&url) else {
            return;
        };

        // The permit covers the request and the body read, nothing else.
        let body = {
            let _permit = shared.gate.acquire().await.expect("admission gate closed");
            match fetch_page(&shared.client, &url).await {
                Some(body) => body,
                None => return,
            }
        };

        let candidates = extractor::extract(&body);
        debug!("{}: {} candidate links", url, candidates.len());

        let probes = candidates.iter().map(|raw| {
            let shared = shared.clone();
            let base = base.clone();
            async move { classify_and_validate(&shared, &base, raw).await }
        });
        let accepted: Vec<ClassifiedLink> =
            join_all(probes).await.into_iter().flatten().collect();

        let mut children = Vec::new();
        for link in accepted {
            // Single global dedup checkpoint. Losing the race means another
            // task already recorded or scheduled this URL.
            if !shared.visited.insert_if_absent(&link.url).await {
                continue;
            }

            if link.is_external {
                if !shared.config.only_internal {
                    accept(&shared, &link).await;
                }
            } else {
                if !shared.config.only_external {
                    accept(&shared, &link).await;
                }
                children.push(tokio::spawn(crawl_step(
                    shared.clone(),
                    link.url,
                    depth + 1,
                )));
            }
        }

        for child in children {
            if let Err(e) = child.await {
                warn!("Crawl task for child of {} failed: {}", url, e);
            }
        }
    }
    .boxed()
}

async fn accept(shared: &Shared, link: &ClassifiedLink) {
    shared.results.record(&link.url).await;
    if let Some(callback) = &shared.on_link {
        callback(&link.url, link.is_external);
    }
}

/// Resolves a raw candidate against the page it came from, classifies it by
/// host, and probes it for reachability under the admission gate. Returns
/// None for malformed, filtered or unreachable candidates.
async fn classify_and_validate(
    shared: &Shared,
    base: &Url,
    raw: &str,
) -> Option<ClassifiedLink> {
    let resolved = base.join(raw).ok()?;
    let is_external = !same_host(&resolved, base);

    // Internal-only runs skip probing external candidates entirely. There is
    // deliberately no symmetric skip for external-only runs: internal pages
    // must still be probed and traversed, since external links may only be
    // reachable through them.
    if shared.config.only_internal && is_external {
        return None;
    }

    let url = resolved.to_string();
    let valid = {
        let _permit = shared.gate.acquire().await.expect("admission gate closed");
        shared.validator.validate(&url).await
    };
    valid.then_some(ClassifiedLink { url, is_external })
}

fn same_host(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

async fn fetch_page(client: &Client, url: &str) -> Option<String> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Fetch {} failed: {}", url, e);
            return None;
        }
    };

    if response.status() != StatusCode::OK {
        debug!("Fetch {} returned {}, skipping", url, response.status());
        return None;
    }

    match response.text().await {
        Ok(body) => Some(body),
        Err(e) => {
            warn!("Reading body of {} failed: {}", url, e);
            None
        }
    }
}
