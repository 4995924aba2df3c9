use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the price guessing bot.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::channels::start_game,
        crate::routes::channels::current_game,
        crate::routes::channels::finish_game,
        crate::routes::channels::last_result,
        crate::routes::channels::post_message,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::GameSnapshot,
            crate::dto::game::GameResult,
            crate::dto::game::ProductView,
            crate::dto::message::IncomingMessage,
            crate::dto::message::AnswerResponse,
            crate::dto::sse::ProductAnnouncedEvent,
            crate::dto::sse::GameFinishedEvent,
            crate::state::state_machine::GameState,
            crate::state::outcome::FinishStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "channels", description = "Rounds and chat messages of a channel"),
    )
)]
pub struct ApiDoc;
