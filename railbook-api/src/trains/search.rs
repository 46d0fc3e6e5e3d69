use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use railbook_core::{Train, TrainQuery};

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/trains", get(search_trains))
}

async fn search_trains(
    State(state): State<AppState>,
    Query(query): Query<TrainQuery>,
) -> Result<Json<Vec<Train>>, AppError> {
    if query.from.trim().is_empty() || query.to.trim().is_empty() {
        return Err(AppError::ValidationError("Origin and destination are required".to_string()));
    }

    let trains = state.trains.search_trains(&query).await?;
    tracing::info!(from = %query.from, to = %query.to, date = %query.date, results = trains.len(), "train search");
    Ok(Json(trains))
}
