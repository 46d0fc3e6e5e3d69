use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use railbook_core::BookingId;
use railbook_order::{ActionOutcome, TicketExport, WizardSession, WizardView};
use railbook_shared::Masked;
use serde::Deserialize;
use std::sync::Arc;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct SubmitOtpRequest {
    pub otp: Masked<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/booking/{booking_id}", get(open_wizard).delete(close_wizard))
        .route("/booking/{booking_id}/otp", post(submit_otp))
        .route("/booking/{booking_id}/otp/resend", post(resend_otp))
        .route("/booking/{booking_id}/payment", post(confirm_payment))
        .route("/booking/{booking_id}/ticket", get(export_ticket))
        .route("/booking/{booking_id}/ticket/print", get(print_ticket))
}

/// Wizard view for the booking. Opening an unknown id mounts a wizard with the
/// fallback seat.
async fn open_wizard(State(state): State<AppState>, Path(booking_id): Path<String>) -> Json<WizardView> {
    let wizard = state.wizards.open(BookingId::new(booking_id), None).await;
    Json(wizard.view())
}

async fn submit_otp(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
    Json(req): Json<SubmitOtpRequest>,
) -> Result<Json<ActionOutcome>, AppError> {
    let wizard = mounted(&state, booking_id).await?;
    Ok(Json(wizard.submit_otp(req.otp.expose()).await?))
}

async fn resend_otp(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<ActionOutcome>, AppError> {
    let wizard = mounted(&state, booking_id).await?;
    Ok(Json(wizard.resend_otp()?))
}

async fn confirm_payment(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<ActionOutcome>, AppError> {
    let wizard = mounted(&state, booking_id).await?;
    Ok(Json(wizard.confirm_payment().await?))
}

async fn export_ticket(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<TicketExport>, AppError> {
    let wizard = mounted(&state, booking_id).await?;
    Ok(Json(wizard.export_ticket()?))
}

async fn print_ticket(State(state): State<AppState>, Path(booking_id): Path<String>) -> Result<String, AppError> {
    let wizard = mounted(&state, booking_id).await?;
    Ok(wizard.print_ticket()?)
}

async fn close_wizard(State(state): State<AppState>, Path(booking_id): Path<String>) -> Result<StatusCode, AppError> {
    let booking_id = BookingId::new(booking_id);
    state
        .wizards
        .close(&booking_id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_open(&booking_id))
}

async fn mounted(state: &AppState, booking_id: String) -> Result<Arc<WizardSession>, AppError> {
    let booking_id = BookingId::new(booking_id);
    state.wizards.get(&booking_id).await.ok_or_else(|| not_open(&booking_id))
}

fn not_open(booking_id: &BookingId) -> AppError {
    AppError::NotFoundError(format!("No booking wizard open for {}", booking_id))
}
