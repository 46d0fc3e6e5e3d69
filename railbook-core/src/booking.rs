use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::seat::{Seat, SeatId};
use crate::{CoreError, CoreResult};

/// Seat used when a booking is opened without any seats handed over
pub const FALLBACK_SEAT_NUMBER: &str = "A12";
pub const FALLBACK_SEAT_PRICE: u32 = 550;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<u32> for BookingId {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

/// Booking status; only ever moves forward
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    OtpVerified,
    Paid,
    Confirmed,
}

impl BookingStatus {
    pub fn next(self) -> Option<BookingStatus> {
        match self {
            BookingStatus::Pending => Some(BookingStatus::OtpVerified),
            BookingStatus::OtpVerified => Some(BookingStatus::Paid),
            BookingStatus::Paid => Some(BookingStatus::Confirmed),
            BookingStatus::Confirmed => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: BookingId,
    pub seats: Vec<Seat>,
    pub total_amount: u32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// `now` comes from the caller's clock
    pub fn new(booking_id: BookingId, seats: Vec<Seat>, now: DateTime<Utc>) -> Self {
        let total_amount = seats.iter().map(|seat| seat.price).sum();
        Self {
            booking_id,
            seats,
            total_amount,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Booking for a wizard opened directly by id, with no seats handed over
    pub fn fallback(booking_id: BookingId, now: DateTime<Utc>) -> Self {
        Self::new(
            booking_id,
            vec![Seat::new(12, FALLBACK_SEAT_NUMBER, FALLBACK_SEAT_PRICE)],
            now,
        )
    }

    /// Comma separated seat labels, in selection order
    pub fn seat_numbers(&self) -> String {
        self.seats
            .iter()
            .map(|seat| seat.number.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Move to the next status. Skipping or going back is refused.
    pub fn advance(&mut self, to: BookingStatus, now: DateTime<Utc>) -> CoreResult<()> {
        if self.status.next() != Some(to) {
            return Err(CoreError::InvalidTransition {
                from: format!("{:?}", self.status),
                to: format!("{:?}", to),
            });
        }

        self.status = to;
        self.updated_at = now;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TicketStatus {
    Confirmed,
}

/// Issued once payment completes; never mutated afterwards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ticket {
    pub ticket_number: String,
    pub booking_id: BookingId,
    pub status: TicketStatus,
    pub issued_at: DateTime<Utc>,
}

/// Result of the mock "select seat" call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub booking_id: BookingId,
    pub seat_ids: Vec<SeatId>,
    pub status: BookingStatus,
    pub reserved_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, minute, 0).unwrap()
    }

    fn seats(prices: &[u32]) -> Vec<Seat> {
        prices
            .iter()
            .enumerate()
            .map(|(i, price)| Seat::new(i as u32 + 1, format!("A{}", i + 1), *price))
            .collect()
    }

    #[test]
    fn test_total_is_sum_of_seat_prices() {
        let booking = Booking::new("7".into(), seats(&[550, 600, 580]), at(0));
        assert_eq!(booking.total_amount, 1730);
        assert_eq!(booking.seat_numbers(), "A1, A2, A3");
        assert_eq!(booking.status, BookingStatus::Pending);
    }

    #[test]
    fn test_fallback_booking() {
        let booking = Booking::fallback("99".into(), at(0));
        assert_eq!(booking.seats.len(), 1);
        assert_eq!(booking.seats[0].number, "A12");
        assert_eq!(booking.total_amount, 550);
    }

    #[test]
    fn test_status_only_moves_forward() {
        let mut booking = Booking::new("1".into(), seats(&[550]), at(0));

        assert!(booking.advance(BookingStatus::Paid, at(1)).is_err());
        assert_eq!(booking.updated_at, at(0));
        booking.advance(BookingStatus::OtpVerified, at(2)).unwrap();
        booking.advance(BookingStatus::Paid, at(3)).unwrap();
        assert!(booking.advance(BookingStatus::OtpVerified, at(4)).is_err());
        booking.advance(BookingStatus::Confirmed, at(5)).unwrap();
        assert_eq!(booking.status.next(), None);
        assert_eq!(booking.created_at, at(0));
        assert_eq!(booking.updated_at, at(5));
    }

    #[test]
    fn test_ticket_status_wire_format() {
        let ticket = Ticket {
            ticket_number: "TKT1700000000000".to_string(),
            booking_id: "42".into(),
            status: TicketStatus::Confirmed,
            issued_at: Utc::now(),
        };
        let json = serde_json::to_value(&ticket).unwrap();
        assert_eq!(json["status"], "Confirmed");
        assert_eq!(json["booking_id"], "42");
    }
}
