use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, SystemTime},
};

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use tokio::{sync::Mutex as AsyncMutex, task::JoinHandle, time::sleep};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    services::{
        catalog::{CatalogError, ProductCatalog},
        messenger::{Messenger, MessengerError, ProductAnnouncement},
    },
    state::{
        Workspace,
        answer::{GuessRejection, parse_guess},
        outcome::{FinishStatus, Resolution, resolve},
        state_machine::{GameEvent, GameState, GameStateMachine, InvalidTransition},
    },
};

/// Time between the product announcement and the automatic finish of a round.
pub const GAME_TIMEOUT: Duration = Duration::from_secs(30);

/// Callback invoked once when a round reaches [`GameState::Finished`].
pub type FinishCallback = Box<dyn FnOnce(&Game) + Send + 'static>;

/// Item whose price participants try to guess.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    /// Display name announced in the channel.
    pub name: String,
    /// Price to guess; always strictly positive.
    pub price: f64,
}

/// What happened to a single chat message fed into a round.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// Stored as the participant's current guess.
    Accepted(f64),
    /// Discarded because it is not a valid bid.
    Rejected(GuessRejection),
    /// Discarded because the round is not collecting guesses.
    Closed,
}

/// Errors raised while opening a round.
#[derive(Debug, Error)]
pub enum GameError {
    /// The round is not in a state that allows the operation.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
    /// No product could be selected.
    #[error("product catalog failure: {0}")]
    Catalog(#[from] CatalogError),
    /// The product announcement could not be delivered.
    #[error("messenger failure: {0}")]
    Messenger(#[from] MessengerError),
}

/// Point-in-time view of a round, also handed to the messenger on finish.
#[derive(Debug, Clone)]
pub struct GameReport {
    /// Identifier of the round.
    pub game_id: Uuid,
    /// Channel the round runs in.
    pub channel_id: String,
    /// Current lifecycle state.
    pub state: GameState,
    /// Product selected at start, if the round was started.
    pub product: Option<Product>,
    /// Current guesses in submission order.
    pub answers: IndexMap<String, f64>,
    /// Resolution computed at finish (default before).
    pub resolution: Resolution,
    /// Length of the guessing window.
    pub timeout: Duration,
    /// When the product was announced.
    pub started_at: Option<SystemTime>,
    /// When the round was resolved.
    pub finished_at: Option<SystemTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FinishTrigger {
    Timeout,
    Explicit,
}

#[derive(Default)]
struct Round {
    machine: GameStateMachine,
    product: Option<Product>,
    answers: IndexMap<String, f64>,
    resolution: Resolution,
    started_at: Option<SystemTime>,
    finished_at: Option<SystemTime>,
    timer: Option<JoinHandle<()>>,
    on_finished: Option<FinishCallback>,
}

/// A single timed "closest price without going over" round bound to a channel.
pub struct Game {
    id: Uuid,
    channel_id: String,
    timeout: Duration,
    messenger: Arc<dyn Messenger>,
    catalog: Arc<dyn ProductCatalog>,
    /// Held across `start` (announcement included) and the finish transition.
    lifecycle: AsyncMutex<()>,
    round: Mutex<Round>,
}

impl Game {
    /// Build a round for `channel_id` using the collaborators of `workspace`.
    ///
    /// The round stays in [`GameState::Created`] until [`Game::start`] is called.
    pub fn new(
        workspace: &Workspace,
        channel_id: impl Into<String>,
        on_finished: Option<FinishCallback>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: Uuid::new_v4(),
            channel_id: channel_id.into(),
            timeout: workspace.config().game_timeout(),
            messenger: workspace.messenger(),
            catalog: workspace.catalog(),
            lifecycle: AsyncMutex::new(()),
            round: Mutex::new(Round {
                on_finished,
                ..Round::default()
            }),
        })
    }

    /// Pick a product, announce it and arm the timeout.
    ///
    /// Catalog and messenger failures leave the round in [`GameState::Created`].
    /// Concurrent starts and finishes wait for the announcement to settle, so
    /// the product is announced at most once and never for a closed round.
    pub async fn start(self: &Arc<Self>) -> Result<(), GameError> {
        let _lifecycle = self.lifecycle.lock().await;

        let current = self.state();
        if current != GameState::Created {
            return Err(InvalidTransition {
                from: current,
                event: GameEvent::Start,
            }
            .into());
        }

        let product = self.catalog.pick()?;
        self.messenger
            .announce_product(
                &self.channel_id,
                ProductAnnouncement {
                    game_id: self.id,
                    product_name: product.name.clone(),
                    timeout: self.timeout,
                },
            )
            .await?;

        let mut round = self.round();
        round.machine.apply(GameEvent::Start)?;
        info!(
            game_id = %self.id,
            channel_id = %self.channel_id,
            product = %product.name,
            timeout = ?self.timeout,
            "round started"
        );
        round.product = Some(product);
        round.started_at = Some(SystemTime::now());
        round.timer = Some(self.arm_timeout());

        Ok(())
    }

    /// Feed one chat message into the round.
    ///
    /// Invalid guesses and messages outside the guessing window are discarded;
    /// a participant's latest valid guess replaces the previous one.
    pub fn handle_event(&self, participant_id: &str, raw_text: &str) -> AnswerOutcome {
        let mut round = self.round();
        if !round.machine.is_open() {
            debug!(
                game_id = %self.id,
                participant_id,
                state = ?round.machine.state(),
                "ignoring answer outside guessing window"
            );
            return AnswerOutcome::Closed;
        }

        match parse_guess(raw_text) {
            Ok(guess) => {
                // Re-inserting moves the participant to the back so map order
                // always reflects when each current guess was submitted.
                round.answers.shift_remove(participant_id);
                round.answers.insert(participant_id.to_string(), guess);
                debug!(game_id = %self.id, participant_id, guess, "answer accepted");
                AnswerOutcome::Accepted(guess)
            }
            Err(rejection) => {
                debug!(
                    game_id = %self.id,
                    participant_id,
                    reason = %rejection,
                    "answer rejected"
                );
                AnswerOutcome::Rejected(rejection)
            }
        }
    }

    /// Resolve the round now.
    ///
    /// Only the first call (or timer fire) has any effect.
    pub async fn finish(&self) {
        self.conclude(FinishTrigger::Explicit).await;
    }

    async fn conclude(&self, trigger: FinishTrigger) {
        let lifecycle = self.lifecycle.lock().await;
        let (report, on_finished, timer) = {
            let mut round = self.round();
            if let Err(err) = round.machine.apply(GameEvent::Finish) {
                debug!(
                    game_id = %self.id,
                    trigger = ?trigger,
                    error = %err,
                    "round already finished"
                );
                return;
            }

            let resolution = round
                .product
                .as_ref()
                .map(|product| resolve(&round.answers, product.price))
                .unwrap_or_default();
            round.resolution = resolution;
            round.finished_at = Some(SystemTime::now());

            (
                self.report_from(&round),
                round.on_finished.take(),
                round.timer.take(),
            )
        };
        drop(lifecycle);

        // The timer task reaches this point itself and must not cancel the
        // announcement below.
        if let (Some(timer), FinishTrigger::Explicit) = (timer, trigger) {
            timer.abort();
        }

        info!(
            game_id = %self.id,
            channel_id = %self.channel_id,
            trigger = ?trigger,
            status = ?report.resolution.status,
            winner = ?report.resolution.winner,
            participants = report.answers.len(),
            "round finished"
        );

        if let Some(callback) = on_finished {
            callback(self);
        }

        if let Err(err) = self
            .messenger
            .announce_result(&self.channel_id, report)
            .await
        {
            warn!(
                game_id = %self.id,
                channel_id = %self.channel_id,
                error = %err,
                "failed to announce round result"
            );
        }
    }

    fn arm_timeout(self: &Arc<Self>) -> JoinHandle<()> {
        let game = Arc::downgrade(self);
        let timeout = self.timeout;
        tokio::spawn(async move {
            sleep(timeout).await;
            if let Some(game) = game.upgrade() {
                game.conclude(FinishTrigger::Timeout).await;
            }
        })
    }

    /// Identifier of this round.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Channel the round is bound to.
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Length of the guessing window.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Current lifecycle state.
    pub fn state(&self) -> GameState {
        self.round().machine.state()
    }

    /// Snapshot of the accepted guesses keyed by participant.
    pub fn answers(&self) -> IndexMap<String, f64> {
        self.round().answers.clone()
    }

    /// How the round ended; [`FinishStatus::NotEnoughPlayers`] until finished.
    pub fn finish_status(&self) -> FinishStatus {
        self.round().resolution.status
    }

    /// Winning participant, if any.
    pub fn winner(&self) -> Option<String> {
        self.round().resolution.winner.clone()
    }

    /// Product selected at start.
    pub fn product(&self) -> Option<Product> {
        self.round().product.clone()
    }

    /// When the product was announced, if the round was started.
    pub fn started_at(&self) -> Option<SystemTime> {
        self.round().started_at
    }

    /// Full point-in-time view of the round.
    pub fn report(&self) -> GameReport {
        self.report_from(&self.round())
    }

    fn report_from(&self, round: &Round) -> GameReport {
        GameReport {
            game_id: self.id,
            channel_id: self.channel_id.clone(),
            state: round.machine.state(),
            product: round.product.clone(),
            answers: round.answers.clone(),
            resolution: round.resolution.clone(),
            timeout: self.timeout,
            started_at: round.started_at,
            finished_at: round.finished_at,
        }
    }

    fn round(&self) -> MutexGuard<'_, Round> {
        self.round.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("id", &self.id)
            .field("channel_id", &self.channel_id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        let round = self.round.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = round.timer.take() {
            timer.abort();
        }
    }
}
