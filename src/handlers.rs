// region:    --- Imports
use crate::app::AppState;
use crate::auction::commands;
use crate::auction::dto::{AuctionDto, CreateAuctionDto, UpdateAuctionDto};
use crate::auction::queries;
use crate::error::AppError;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

// endregion: --- Imports

#[derive(Debug, Deserialize)]
pub struct ListAuctionsParams {
    pub date: Option<String>,
}

// region:    --- Command Handlers

/// 경매 생성 요청 처리
pub async fn handle_create_auction(
    State(state): State<AppState>,
    Json(cmd): Json<CreateAuctionDto>,
) -> Result<impl IntoResponse, AppError> {
    info!("{:<12} --> 경매 생성 요청", "Handler");
    let created =
        commands::create_auction(state.repository.as_ref(), cmd, state.publish_events).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, created.location)],
        Json(created.auction),
    ))
}

/// 경매 수정 요청 처리
pub async fn handle_update_auction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(cmd): Json<UpdateAuctionDto>,
) -> Result<StatusCode, AppError> {
    info!("{:<12} --> 경매 수정 요청 id: {}", "Handler", id);
    commands::update_auction(state.repository.as_ref(), id, cmd, state.publish_events).await?;
    Ok(StatusCode::OK)
}

/// 경매 삭제 요청 처리
pub async fn handle_delete_auction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    info!("{:<12} --> 경매 삭제 요청 id: {}", "Handler", id);
    commands::delete_auction(state.repository.as_ref(), id, state.publish_events).await?;
    Ok(StatusCode::OK)
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 경매 목록 조회
pub async fn handle_list_auctions(
    State(state): State<AppState>,
    Query(params): Query<ListAuctionsParams>,
) -> Result<Json<Vec<AuctionDto>>, AppError> {
    info!("{:<12} --> 경매 목록 조회", "HandlerQuery");
    let auctions =
        queries::list_auctions(state.repository.as_ref(), params.date.as_deref()).await?;
    Ok(Json(auctions))
}

/// 경매 조회
pub async fn handle_get_auction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AuctionDto>, AppError> {
    info!("{:<12} --> 경매 조회 id: {}", "HandlerQuery", id);
    let auction = queries::get_auction(state.repository.as_ref(), id).await?;
    Ok(Json(auction))
}

/// 헬스 체크
pub async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// endregion: --- Query Handlers
