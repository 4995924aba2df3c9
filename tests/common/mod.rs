#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use futures::future::{self, BoxFuture};
use price_guess_bot::{
    config::AppConfig,
    services::{
        catalog::StaticCatalog,
        messenger::{Messenger, MessengerError, MessengerResult, ProductAnnouncement},
    },
    state::{SharedState, SseHub, Workspace, game::GameReport, game::Product},
};

pub const PRICE: f64 = 25.0;
pub const PRODUCT_NAME: &str = "Stainless steel kettle";
pub const TIMEOUT: Duration = Duration::from_millis(500);
/// Slack allowed on top of the round timeout before declaring the timer late.
pub const TIMEOUT_THRESHOLD: f64 = 1.2;

/// Messenger double that keeps every message it was asked to send.
#[derive(Default)]
pub struct RecordingMessenger {
    announcements: Mutex<Vec<(String, ProductAnnouncement)>>,
    results: Mutex<Vec<(String, GameReport)>>,
    sent: Arc<Mutex<Vec<&'static str>>>,
    delay: Duration,
}

impl RecordingMessenger {
    /// Messenger whose deliveries take `delay` to complete.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Product announcements requested so far, with their channel.
    pub fn announcements(&self) -> Vec<(String, ProductAnnouncement)> {
        self.announcements.lock().unwrap().clone()
    }

    /// Result reports requested so far, with their channel.
    pub fn results(&self) -> Vec<(String, GameReport)> {
        self.results.lock().unwrap().clone()
    }

    /// Kinds of the delivered messages (`"product"`, `"result"`), in delivery order.
    pub fn sent(&self) -> Vec<&'static str> {
        self.sent.lock().unwrap().clone()
    }

    fn deliver(&self, kind: &'static str) -> BoxFuture<'static, MessengerResult<()>> {
        let sent = self.sent.clone();
        let delay = self.delay;
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            sent.lock().unwrap().push(kind);
            Ok(())
        })
    }
}

impl Messenger for RecordingMessenger {
    fn announce_product(
        &self,
        channel_id: &str,
        announcement: ProductAnnouncement,
    ) -> BoxFuture<'static, MessengerResult<()>> {
        self.announcements
            .lock()
            .unwrap()
            .push((channel_id.to_string(), announcement));
        self.deliver("product")
    }

    fn announce_result(
        &self,
        channel_id: &str,
        report: GameReport,
    ) -> BoxFuture<'static, MessengerResult<()>> {
        self.results
            .lock()
            .unwrap()
            .push((channel_id.to_string(), report));
        self.deliver("result")
    }
}

/// Messenger double standing in for an unreachable chat platform.
pub struct OfflineMessenger;

impl Messenger for OfflineMessenger {
    fn announce_product(
        &self,
        _channel_id: &str,
        _announcement: ProductAnnouncement,
    ) -> BoxFuture<'static, MessengerResult<()>> {
        Box::pin(future::ready(Err(MessengerError::Unavailable(
            "chat platform offline".into(),
        ))))
    }

    fn announce_result(
        &self,
        _channel_id: &str,
        _report: GameReport,
    ) -> BoxFuture<'static, MessengerResult<()>> {
        Box::pin(future::ready(Err(MessengerError::Unavailable(
            "chat platform offline".into(),
        ))))
    }
}

pub fn product() -> Product {
    Product {
        name: PRODUCT_NAME.into(),
        price: PRICE,
    }
}

pub fn workspace_with(
    timeout: Duration,
    products: Vec<Product>,
    messenger: Arc<dyn Messenger>,
) -> SharedState {
    let config = AppConfig::new(timeout, products.clone());
    let catalog = StaticCatalog::new(products).expect("valid test catalog");
    Workspace::new(
        config,
        messenger,
        Arc::new(catalog),
        Arc::new(SseHub::new(16)),
    )
}

/// Workspace whose catalog always yields [`product`] and whose rounds last [`TIMEOUT`].
pub fn workspace() -> (SharedState, Arc<RecordingMessenger>) {
    workspace_with_timeout(TIMEOUT)
}

pub fn workspace_with_timeout(timeout: Duration) -> (SharedState, Arc<RecordingMessenger>) {
    let messenger = Arc::new(RecordingMessenger::default());
    let workspace = workspace_with(timeout, vec![product()], messenger.clone());
    (workspace, messenger)
}
