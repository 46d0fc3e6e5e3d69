use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use railbook_catalog::{reservation_notice, SeatSelection, SelectionChange};
use railbook_core::{BookingId, Seat, SeatId};
use railbook_order::WizardView;
use railbook_shared::Notification;
use serde::Serialize;
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub selection_id: Uuid,
    pub train_id: u32,
    pub seats: Vec<Seat>,
    pub selected: Vec<Seat>,
    pub total_amount: u32,
    pub max_seats: usize,
}

impl SelectionResponse {
    fn new(selection_id: Uuid, selection: &SeatSelection) -> Self {
        Self {
            selection_id,
            train_id: selection.train_id(),
            seats: selection.seats().to_vec(),
            selected: selection.selected(),
            total_amount: selection.total(),
            max_seats: selection.max_seats(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub change: SelectionChange,
    pub selected: Vec<Seat>,
    pub total_amount: u32,
}

#[derive(Debug, Serialize)]
pub struct ReserveResponse {
    pub booking_id: BookingId,
    pub wizard: WizardView,
    pub notifications: Vec<Notification>,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trains/{train_id}/selections", post(open_selection))
        .route("/selections/{selection_id}", get(get_selection))
        .route("/selections/{selection_id}/seats/{seat_id}", post(toggle_seat))
        .route("/selections/{selection_id}/reserve", post(reserve))
}

async fn open_selection(
    State(state): State<AppState>,
    Path(train_id): Path<u32>,
) -> Result<(StatusCode, Json<SelectionResponse>), AppError> {
    let seats = state.trains.get_seats(train_id).await?;
    let selection = SeatSelection::new(train_id, seats).with_max_seats(state.max_seats);

    let snapshot = selection.clone();
    let selection_id = state.selections.insert(selection).await;
    let response = SelectionResponse::new(selection_id, &snapshot);

    tracing::debug!(%selection_id, train_id, "seat selection opened");
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_selection(
    State(state): State<AppState>,
    Path(selection_id): Path<Uuid>,
) -> Result<Json<SelectionResponse>, AppError> {
    let selection = state.selections.get(&selection_id).await.ok_or_else(|| missing(selection_id))?;
    Ok(Json(SelectionResponse::new(selection_id, &selection)))
}

async fn toggle_seat(
    State(state): State<AppState>,
    Path((selection_id, seat_id)): Path<(Uuid, SeatId)>,
) -> Result<Json<ToggleResponse>, AppError> {
    let response = state
        .selections
        .update(&selection_id, |selection| {
            selection.toggle(seat_id).map(|change| ToggleResponse {
                change,
                selected: selection.selected(),
                total_amount: selection.total(),
            })
        })
        .await
        .ok_or_else(|| missing(selection_id))?
        .inspect_err(|err| {
            tracing::warn!(%selection_id, seat_id, error = %err, "seat toggle rejected");
        })?;

    Ok(Json(response))
}

/// Reserve the picked seats and open the booking wizard with them. The
/// selection is taken out of the store for the call, so a concurrent reserve
/// of the same selection finds nothing; it is put back if the call fails.
async fn reserve(
    State(state): State<AppState>,
    Path(selection_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ReserveResponse>), AppError> {
    let selection = state.selections.take(&selection_id).await.ok_or_else(|| missing(selection_id))?;

    let booking = match selection.reserve(state.bookings.as_ref()).await {
        Ok(booking) => booking,
        Err(err) => {
            state.selections.restore(selection_id, selection).await;
            return Err(err.into());
        }
    };

    let notice = reservation_notice(booking.seats.len());
    state.notifier.notify(notice.clone());

    let booking_id = booking.booking_id.clone();
    let wizard = state.wizards.open_booking(booking).await;

    Ok((
        StatusCode::CREATED,
        Json(ReserveResponse {
            booking_id,
            wizard: wizard.view(),
            notifications: vec![notice],
        }),
    ))
}

fn missing(selection_id: Uuid) -> AppError {
    AppError::NotFoundError(format!("Selection {} not found", selection_id))
}
