use railbook_core::{Booking, BookingApi, CoreError, Seat, SeatId, SeatStatus};
use railbook_shared::Notification;
use serde::Serialize;

/// Seats a single booking may hold
pub const MAX_SEATS_PER_BOOKING: usize = 4;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "action", content = "seat_id", rename_all = "snake_case")]
pub enum SelectionChange {
    Selected(SeatId),
    Deselected(SeatId),
}

/// Seat map of one train plus the seats picked from it, in pick order
#[derive(Debug, Clone)]
pub struct SeatSelection {
    train_id: u32,
    seats: Vec<Seat>,
    selected: Vec<SeatId>,
    max_seats: usize,
}

impl SeatSelection {
    pub fn new(train_id: u32, seats: Vec<Seat>) -> Self {
        Self {
            train_id,
            seats,
            selected: Vec::new(),
            max_seats: MAX_SEATS_PER_BOOKING,
        }
    }

    pub fn with_max_seats(mut self, max_seats: usize) -> Self {
        self.max_seats = max_seats;
        self
    }

    pub fn train_id(&self) -> u32 {
        self.train_id
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn max_seats(&self) -> usize {
        self.max_seats
    }

    /// Selected seats in the order they were picked
    pub fn selected(&self) -> Vec<Seat> {
        self.selected
            .iter()
            .filter_map(|id| self.seats.iter().find(|s| s.id == *id))
            .cloned()
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn total(&self) -> u32 {
        self.selected().iter().map(|seat| seat.price).sum()
    }

    /// Select or deselect a seat. Booked seats and a selection beyond the
    /// per-booking cap are refused and leave the selection unchanged.
    pub fn toggle(&mut self, seat_id: SeatId) -> Result<SelectionChange, SelectionError> {
        let max_seats = self.max_seats;
        let already_selected = self.selected.contains(&seat_id);
        let selected_count = self.selected.len();

        let seat = self
            .seats
            .iter_mut()
            .find(|s| s.id == seat_id)
            .ok_or(SelectionError::UnknownSeat(seat_id))?;

        if seat.status == SeatStatus::Booked {
            return Err(SelectionError::AlreadyBooked(seat.number.clone()));
        }

        if already_selected {
            seat.status = SeatStatus::Available;
            self.selected.retain(|id| *id != seat_id);
            return Ok(SelectionChange::Deselected(seat_id));
        }

        if selected_count >= max_seats {
            return Err(SelectionError::LimitReached { max: max_seats });
        }

        seat.status = SeatStatus::Selected;
        self.selected.push(seat_id);
        Ok(SelectionChange::Selected(seat_id))
    }

    /// Hand the selected seats to the booking service and open a pending booking
    pub async fn reserve(&self, api: &dyn BookingApi) -> Result<Booking, SelectionError> {
        if self.selected.is_empty() {
            return Err(SelectionError::Empty);
        }

        let seats = self.selected();
        let reservation = api.select_seats(&seats).await?;
        tracing::info!(
            booking_id = %reservation.booking_id,
            train_id = self.train_id,
            seats = seats.len(),
            "seats reserved"
        );

        Ok(Booking::new(reservation.booking_id, seats, reservation.reserved_at))
    }
}

/// Toast shown after a successful reservation
pub fn reservation_notice(seat_count: usize) -> Notification {
    Notification::success(format!(
        "{} seat(s) reserved! Complete booking within 5 minutes",
        seat_count
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("Seat {0} does not exist")]
    UnknownSeat(SeatId),

    #[error("This seat is already booked")]
    AlreadyBooked(String),

    #[error("Maximum {max} seats can be selected at once")]
    LimitReached { max: usize },

    #[error("Select seat(s) to continue")]
    Empty,

    #[error(transparent)]
    Api(#[from] CoreError),
}

impl SelectionError {
    pub fn to_notification(&self) -> Notification {
        Notification::error(self.to_string())
    }
}
