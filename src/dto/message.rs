use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::validation::validate_chat_id,
    state::{answer::GuessRejection, game::AnswerOutcome},
};

/// Chat message posted in a channel, as delivered by the chat platform.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct IncomingMessage {
    /// Identifier of the participant who wrote the message.
    #[validate(custom(function = "validate_chat_id"))]
    pub user_id: String,
    /// Raw message text.
    #[validate(length(max = 256))]
    pub text: String,
}

/// How a chat message was handled by the running round.
#[derive(Debug, Serialize, ToSchema, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnswerResponse {
    /// Stored as the participant's current guess.
    Accepted { value: f64 },
    /// Not a valid bid; nothing changed.
    Rejected { reason: String },
    /// The round is not collecting guesses.
    Closed,
}

impl From<AnswerOutcome> for AnswerResponse {
    fn from(value: AnswerOutcome) -> Self {
        match value {
            AnswerOutcome::Accepted(value) => Self::Accepted { value },
            AnswerOutcome::Rejected(rejection) => Self::Rejected {
                reason: rejection_reason(&rejection).to_string(),
            },
            AnswerOutcome::Closed => Self::Closed,
        }
    }
}

fn rejection_reason(rejection: &GuessRejection) -> &'static str {
    match rejection {
        GuessRejection::Empty => "empty",
        GuessRejection::NotANumber(_) => "not_a_number",
        GuessRejection::NonPositive(_) => "non_positive",
    }
}
