use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{duration_millis, format_system_time},
    state::{
        game::{GameReport, Product},
        outcome::FinishStatus,
        state_machine::GameState,
    },
};

/// Product as shown once its price may be revealed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductView {
    pub name: String,
    pub price: f64,
}

impl From<Product> for ProductView {
    fn from(value: Product) -> Self {
        Self {
            name: value.name,
            price: value.price,
        }
    }
}

/// Public view of a round.
///
/// While the round is open only the product name and the number of
/// participants are exposed; price, answers and results appear once finished.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameSnapshot {
    pub id: Uuid,
    pub channel_id: String,
    pub state: GameState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// Length of the guessing window in milliseconds.
    pub timeout_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// Number of participants with a valid guess.
    pub participants: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GameResult>,
}

/// Outcome of a finished round.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameResult {
    pub status: FinishStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_guess: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductView>,
    #[schema(value_type = std::collections::HashMap<String, f64>)]
    pub answers: IndexMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
}

impl From<GameReport> for GameSnapshot {
    fn from(report: GameReport) -> Self {
        let GameReport {
            game_id,
            channel_id,
            state,
            product,
            answers,
            resolution,
            timeout,
            started_at,
            finished_at,
        } = report;

        let product_name = product.as_ref().map(|product| product.name.clone());
        let participants = answers.len();
        let result = (state == GameState::Finished).then(|| GameResult {
            status: resolution.status,
            winner: resolution.winner,
            winning_guess: resolution.winning_guess,
            product: product.map(Into::into),
            answers,
            finished_at: finished_at.map(format_system_time),
        });

        Self {
            id: game_id,
            channel_id,
            state,
            product_name,
            timeout_ms: duration_millis(timeout),
            started_at: started_at.map(format_system_time),
            participants,
            result,
        }
    }
}
