//! Content generators - where replenishment batches come from
//!
//! The session never calls a generator itself. It hands out
//! [`ReplenishTicket`]s; the [`GeneratorWorker`] runs one generator call per
//! ticket on the tokio runtime and sends the result back for the game loop to
//! apply with `Session::complete_replenish`.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::core::{ReplenishTicket, SupplyError};
use crate::types::{ContentItem, RankTier};

pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Produces a batch of new content items calibrated to the player's rank.
pub trait ContentGenerator: Send + Sync + 'static {
    fn generate(
        &self,
        rank: RankTier,
    ) -> impl Future<Output = Result<Vec<ContentItem>, SupplyError>> + Send;
}

/// Generator used when no endpoint is configured. Every call fails, so every
/// replenishment falls back to the seed catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

impl ContentGenerator for OfflineGenerator {
    async fn generate(&self, _rank: RankTier) -> Result<Vec<ContentItem>, SupplyError> {
        Err(SupplyError::Unavailable)
    }
}

/// HTTP generator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub url: String,
    pub token: Option<String>,
    pub timeout_ms: u64,
    pub batch_size: usize,
}

impl GeneratorConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Create from environment variables. `None` when no endpoint is set.
    pub fn from_env() -> Option<Self> {
        use std::env;

        let url = env::var("CYBER_SHIELD_GENERATOR_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())?;

        let token = env::var("CYBER_SHIELD_GENERATOR_TOKEN")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let timeout_ms = env::var("CYBER_SHIELD_GENERATOR_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Some(Self {
            url,
            token,
            timeout_ms,
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    rank: &'a str,
    count: usize,
}

/// Calls a remote content service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    config: GeneratorConfig,
    http: reqwest::Client,
}

impl HttpGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, SupplyError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(concat!("cyber-shield/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SupplyError::Transport(e.to_string()))?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

impl ContentGenerator for HttpGenerator {
    async fn generate(&self, rank: RankTier) -> Result<Vec<ContentItem>, SupplyError> {
        let body = GenerateRequest {
            rank: rank.label(),
            count: self.config.batch_size,
        };

        let mut request = self.http.post(&self.config.url).json(&body);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        debug!(url = %self.config.url, rank = rank.as_str(), "requesting content batch");
        let response = request
            .send()
            .await
            .map_err(|e| SupplyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SupplyError::Status(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| SupplyError::Transport(e.to_string()))?;

        parse_batch(&text)
    }
}

/// Parse a generator response body.
///
/// Accepts a bare JSON array or an object with an `items` array. `null` is an
/// empty batch.
pub fn parse_batch(body: &str) -> Result<Vec<ContentItem>, SupplyError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Batch {
        Items(Vec<ContentItem>),
        Wrapped { items: Vec<ContentItem> },
    }

    let batch: Option<Batch> =
        serde_json::from_str(body).map_err(|e| SupplyError::Malformed(e.to_string()))?;

    match batch {
        None => Err(SupplyError::Empty),
        Some(Batch::Items(items)) | Some(Batch::Wrapped { items }) if items.is_empty() => {
            Err(SupplyError::Empty)
        }
        Some(Batch::Items(items)) | Some(Batch::Wrapped { items }) => Ok(items),
    }
}

/// The generator picked by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredGenerator {
    Http(HttpGenerator),
    Offline(OfflineGenerator),
}

impl ConfiguredGenerator {
    /// HTTP when `CYBER_SHIELD_GENERATOR_URL` is set and the client builds,
    /// offline otherwise.
    pub fn from_env() -> Self {
        match GeneratorConfig::from_env() {
            Some(config) => match HttpGenerator::new(config) {
                Ok(http) => ConfiguredGenerator::Http(http),
                Err(e) => {
                    warn!(error = %e, "failed to build HTTP generator, running offline");
                    ConfiguredGenerator::Offline(OfflineGenerator)
                }
            },
            None => ConfiguredGenerator::Offline(OfflineGenerator),
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, ConfiguredGenerator::Offline(_))
    }
}

impl ContentGenerator for ConfiguredGenerator {
    async fn generate(&self, rank: RankTier) -> Result<Vec<ContentItem>, SupplyError> {
        match self {
            ConfiguredGenerator::Http(g) => g.generate(rank).await,
            ConfiguredGenerator::Offline(g) => g.generate(rank).await,
        }
    }
}

/// A finished generator call.
#[derive(Debug, Clone)]
pub struct Completion {
    pub ticket: ReplenishTicket,
    pub result: Result<Vec<ContentItem>, SupplyError>,
}

/// Runs generator calls off the game loop.
pub struct GeneratorWorker<G> {
    generator: Arc<G>,
    handle: Handle,
    done_tx: mpsc::UnboundedSender<Completion>,
    done_rx: mpsc::UnboundedReceiver<Completion>,
}

impl<G: ContentGenerator> GeneratorWorker<G> {
    pub fn new(generator: G, handle: Handle) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            generator: Arc::new(generator),
            handle,
            done_tx,
            done_rx,
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Spawn the generator call for `ticket`.
    pub fn request(&self, ticket: ReplenishTicket) {
        let generator = Arc::clone(&self.generator);
        let done_tx = self.done_tx.clone();
        self.handle.spawn(async move {
            let result = generator.generate(ticket.rank).await;
            if let Err(e) = &result {
                debug!(generation = ticket.generation, error = %e, "generator call failed");
            }
            let _ = done_tx.send(Completion { ticket, result });
        });
    }

    /// Next finished call, if any.
    pub fn try_recv(&mut self) -> Option<Completion> {
        self.done_rx.try_recv().ok()
    }

    /// Wait for the next finished call.
    pub async fn recv(&mut self) -> Option<Completion> {
        self.done_rx.recv().await
    }
}
