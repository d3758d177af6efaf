// region:    --- Imports
use crate::handlers;
use crate::repository::AuctionRepository;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
// endregion: --- Imports

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn AuctionRepository>,
    pub publish_events: bool,
}

impl AppState {
    pub fn new(repository: Arc<dyn AuctionRepository>, publish_events: bool) -> Self {
        Self {
            repository,
            publish_events,
        }
    }
}

/// 라우터 설정
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::handle_health))
        .route(
            "/auctions",
            get(handlers::handle_list_auctions).post(handlers::handle_create_auction),
        )
        .route(
            "/auctions/:id",
            get(handlers::handle_get_auction)
                .put(handlers::handle_update_auction)
                .delete(handlers::handle_delete_auction),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}
