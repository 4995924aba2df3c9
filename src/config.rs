//! Application-level configuration loading, including the runtime product catalog.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use serde_with::{DurationMilliSeconds, serde_as};
use tracing::{info, warn};

use crate::state::game::{GAME_TIMEOUT, Product};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "PRICE_GUESS_BOT_CONFIG_PATH";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    game_timeout: Duration,
    products: Vec<Product>,
}

impl AppConfig {
    /// Build a configuration from explicit values.
    pub fn new(game_timeout: Duration, products: Vec<Product>) -> Self {
        Self {
            game_timeout,
            products,
        }
    }

    /// Load the application configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        products = app_config.products.len(),
                        game_timeout = ?app_config.game_timeout,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a JSON document; omitted fields keep their default value.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Length of the guessing window of every round.
    pub fn game_timeout(&self) -> Duration {
        self.game_timeout
    }

    /// Products new rounds are drawn from.
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game_timeout: GAME_TIMEOUT,
            products: default_products(),
        }
    }
}

#[serde_as]
#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    game_timeout_ms: Option<Duration>,
    products: Option<Vec<Product>>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            game_timeout: value.game_timeout_ms.unwrap_or(GAME_TIMEOUT),
            products: value.products.unwrap_or_else(default_products),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in catalog shipped with the binary.
fn default_products() -> Vec<Product> {
    [
        ("Mechanical keyboard", 89.99),
        ("Stainless steel kettle", 34.5),
        ("Noise-cancelling headphones", 249.0),
        ("Cast iron skillet", 42.95),
        ("Office chair", 179.0),
        ("Espresso machine", 399.99),
        ("Yoga mat", 24.9),
        ("Board game: Catan", 49.0),
        ("Electric toothbrush", 59.99),
        ("Houseplant (monstera)", 29.5),
    ]
    .into_iter()
    .map(|(name, price)| Product {
        name: name.to_string(),
        price,
    })
    .collect()
}
