use async_trait::async_trait;
use chrono::Duration;
use railbook_core::{
    BookingApi, BookingId, BookingStatus, Clock, CoreResult, Latency, OtpVerification, RandomSource,
    Reservation, Seat, Ticket,
};
use railbook_shared::Masked;
use std::sync::Arc;

use crate::fulfillment::TicketIssuer;

/// Highest booking id handed out by the mock
pub const MAX_MOCK_BOOKING_ID: u32 = 10_000;

#[derive(Debug, Clone)]
pub struct BookingApiSettings {
    pub reserve_latency: Latency,
    pub otp_latency: Latency,
    pub payment_latency: Latency,
    /// How long a reservation is held
    pub hold_seconds: i64,
}

impl Default for BookingApiSettings {
    fn default() -> Self {
        Self {
            reserve_latency: Latency::from_millis(500),
            otp_latency: Latency::from_millis(500),
            payment_latency: Latency::from_millis(1000),
            hold_seconds: 300,
        }
    }
}

impl BookingApiSettings {
    /// Every call completes immediately
    pub fn instant() -> Self {
        Self {
            reserve_latency: Latency::NONE,
            otp_latency: Latency::NONE,
            payment_latency: Latency::NONE,
            ..Self::default()
        }
    }
}

/// Booking service stand-in: every call succeeds after its delay
pub struct MockBookingApi {
    settings: BookingApiSettings,
    random: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    issuer: TicketIssuer,
}

impl MockBookingApi {
    pub fn new(settings: BookingApiSettings, random: Arc<dyn RandomSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            settings,
            random,
            issuer: TicketIssuer::new(clock.clone()),
            clock,
        }
    }
}

#[async_trait]
impl BookingApi for MockBookingApi {
    async fn select_seats(&self, seats: &[Seat]) -> CoreResult<Reservation> {
        self.settings.reserve_latency.simulate().await;

        let booking_id = BookingId::from(self.random.next_in_range(1, MAX_MOCK_BOOKING_ID));
        let now = self.clock.now();
        Ok(Reservation {
            booking_id,
            seat_ids: seats.iter().map(|s| s.id).collect(),
            status: BookingStatus::Pending,
            reserved_at: now,
            expires_at: now + Duration::seconds(self.settings.hold_seconds),
        })
    }

    async fn verify_otp(&self, booking_id: &BookingId, otp: &str) -> CoreResult<OtpVerification> {
        self.settings.otp_latency.simulate().await;
        tracing::debug!(%booking_id, otp = ?Masked::new(otp), "mock OTP verification");

        Ok(OtpVerification {
            message: Some("OTP verified successfully".to_string()),
            verified: true,
        })
    }

    async fn confirm_booking(&self, booking_id: &BookingId) -> CoreResult<Ticket> {
        self.settings.payment_latency.simulate().await;
        Ok(self.issuer.issue(booking_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use railbook_core::{FixedClock, FixedRandom, SeededRandom, SystemClock, TicketStatus};
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_select_seats_allocates_booking() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        let api = MockBookingApi::new(
            BookingApiSettings::instant(),
            Arc::new(FixedRandom::new(0.0, 42)),
            Arc::new(FixedClock(at)),
        );
        let seats = vec![Seat::new(3, "A3", 550), Seat::new(4, "A4", 550)];

        let reservation = api.select_seats(&seats).await.unwrap();
        assert_eq!(reservation.booking_id.as_str(), "42");
        assert_eq!(reservation.seat_ids, vec![3, 4]);
        assert_eq!(reservation.status, BookingStatus::Pending);
        assert_eq!(reservation.reserved_at, at);
        assert_eq!(reservation.expires_at, at + Duration::minutes(5));
    }

    #[tokio::test]
    async fn test_booking_ids_within_range() {
        let api = MockBookingApi::new(
            BookingApiSettings::instant(),
            Arc::new(SeededRandom::new(5)),
            Arc::new(SystemClock),
        );
        for _ in 0..50 {
            let id: u32 = api.select_seats(&[]).await.unwrap().booking_id.as_str().parse().unwrap();
            assert!((1..=MAX_MOCK_BOOKING_ID).contains(&id));
        }
    }

    #[tokio::test]
    async fn test_any_otp_is_verified() {
        let api = MockBookingApi::new(
            BookingApiSettings::instant(),
            Arc::new(SeededRandom::new(1)),
            Arc::new(SystemClock),
        );
        for code in ["123456", "000000", "x"] {
            assert!(api.verify_otp(&"9".into(), code).await.unwrap().verified);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_booking_after_payment_delay() {
        let api = MockBookingApi::new(
            BookingApiSettings::default(),
            Arc::new(SeededRandom::new(1)),
            Arc::new(SystemClock),
        );
        let start = Instant::now();

        let ticket = api.confirm_booking(&"42".into()).await.unwrap();
        assert!(start.elapsed() >= std::time::Duration::from_millis(1000));
        assert_eq!(ticket.booking_id.as_str(), "42");
        assert_eq!(ticket.status, TicketStatus::Confirmed);
        assert!(ticket.ticket_number.starts_with("TKT"));
    }
}
