use async_trait::async_trait;

use crate::booking::{BookingId, Reservation, Ticket};
use crate::identity::OtpVerification;
use crate::search::{Train, TrainQuery};
use crate::seat::Seat;
use crate::CoreResult;

/// Train and seat-map data access
#[async_trait]
pub trait TrainApi: Send + Sync {
    async fn search_trains(&self, query: &TrainQuery) -> CoreResult<Vec<Train>>;

    async fn get_seats(&self, train_id: u32) -> CoreResult<Vec<Seat>>;
}

/// Booking lifecycle calls made by the seat map and the booking wizard
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Reserve the given seats and allocate a booking id
    async fn select_seats(&self, seats: &[Seat]) -> CoreResult<Reservation>;

    async fn verify_otp(&self, booking_id: &BookingId, otp: &str) -> CoreResult<OtpVerification>;

    /// Settle payment and issue the ticket
    async fn confirm_booking(&self, booking_id: &BookingId) -> CoreResult<Ticket>;
}
