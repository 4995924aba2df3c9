pub mod answer;
pub mod game;
pub mod outcome;
mod sse;
pub mod state_machine;

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    services::{
        catalog::{CatalogError, ProductCatalog, StaticCatalog},
        messenger::{Messenger, SseMessenger},
    },
    state::game::{Game, GameReport},
};

pub use self::sse::SseHub;

/// Shared handle on the [`Workspace`].
pub type SharedState = Arc<Workspace>;

const SSE_CAPACITY: usize = 64;

/// Chat workspace: collaborators shared by every round plus the per-channel registry.
pub struct Workspace {
    config: AppConfig,
    messenger: Arc<dyn Messenger>,
    catalog: Arc<dyn ProductCatalog>,
    sse: Arc<SseHub>,
    games: DashMap<String, Arc<Game>>,
    results: DashMap<String, GameReport>,
}

impl Workspace {
    /// Construct a new [`Workspace`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(
        config: AppConfig,
        messenger: Arc<dyn Messenger>,
        catalog: Arc<dyn ProductCatalog>,
        sse: Arc<SseHub>,
    ) -> SharedState {
        Arc::new(Self {
            config,
            messenger,
            catalog,
            sse,
            games: DashMap::new(),
            results: DashMap::new(),
        })
    }

    /// Build the production workspace: configured catalog, messages published over SSE.
    pub fn from_config(config: AppConfig) -> Result<SharedState, CatalogError> {
        let catalog = StaticCatalog::new(config.products().to_vec())?;
        if catalog.is_empty() {
            warn!("product catalog is empty; rounds cannot start");
        } else {
            info!(products = catalog.len(), "product catalog ready");
        }
        let sse = Arc::new(SseHub::new(SSE_CAPACITY));
        let messenger = SseMessenger::new(sse.clone());

        Ok(Self::new(config, Arc::new(messenger), Arc::new(catalog), sse))
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Outbound chat messenger.
    pub fn messenger(&self) -> Arc<dyn Messenger> {
        self.messenger.clone()
    }

    /// Source of products for new rounds.
    pub fn catalog(&self) -> Arc<dyn ProductCatalog> {
        self.catalog.clone()
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        &self.sse
    }

    /// Rounds currently running, keyed by channel.
    pub fn games(&self) -> &DashMap<String, Arc<Game>> {
        &self.games
    }

    /// Report of the latest finished round of each channel.
    pub fn results(&self) -> &DashMap<String, GameReport> {
        &self.results
    }

    /// Clone the running round of `channel_id` out of the registry.
    ///
    /// The registry guard is released before returning so callers may finish
    /// the round, whose callback removes it from the registry.
    pub fn game(&self, channel_id: &str) -> Option<Arc<Game>> {
        self.games.get(channel_id).map(|entry| entry.value().clone())
    }
}
