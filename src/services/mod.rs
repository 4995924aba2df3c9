/// Product sources for new rounds.
pub mod catalog;
/// OpenAPI documentation generation.
pub mod documentation;
/// Per-channel round orchestration.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Outbound chat messages.
pub mod messenger;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
