use chrono::{DateTime, Utc};
use railbook_core::{Booking, BookingStatus, CoreError, Ticket};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest code the OTP form accepts
pub const OTP_MAX_LEN: usize = 6;

/// Wizard steps, strictly in this order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    AwaitingOtp,
    AwaitingPayment,
    Confirmed,
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStep::AwaitingOtp => "AWAITING_OTP",
            WizardStep::AwaitingPayment => "AWAITING_PAYMENT",
            WizardStep::Confirmed => "CONFIRMED",
        };
        f.write_str(name)
    }
}

/// Booking wizard state: OTP → payment → confirmed.
///
/// Each action is split into `begin_*` (checks the step and raises the
/// loading flag) and `finish_*` (applies the transition), so the caller can
/// run the simulated network call in between without holding a lock.
#[derive(Debug, Clone)]
pub struct BookingWizard {
    booking: Booking,
    step: WizardStep,
    loading: bool,
    ticket: Option<Ticket>,
}

impl BookingWizard {
    pub fn new(booking: Booking) -> Self {
        Self {
            booking,
            step: WizardStep::AwaitingOtp,
            loading: false,
            ticket: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn booking(&self) -> &Booking {
        &self.booking
    }

    pub fn ticket(&self) -> Option<&Ticket> {
        self.ticket.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn total(&self) -> u32 {
        self.booking.total_amount
    }

    pub fn begin_otp(&mut self, code: &str) -> Result<(), WizardError> {
        self.guard(WizardStep::AwaitingOtp, "submit OTP")?;

        let len = code.trim().chars().count();
        if len == 0 || len > OTP_MAX_LEN {
            return Err(WizardError::InvalidOtp(format!(
                "OTP must be 1 to {} characters",
                OTP_MAX_LEN
            )));
        }

        self.loading = true;
        Ok(())
    }

    pub fn finish_otp(&mut self, verified_at: DateTime<Utc>) -> Result<(), WizardError> {
        self.loading = false;
        self.expect_step(WizardStep::AwaitingOtp, "submit OTP")?;
        self.booking.advance(BookingStatus::OtpVerified, verified_at)?;
        self.step = WizardStep::AwaitingPayment;
        Ok(())
    }

    pub fn begin_payment(&mut self) -> Result<(), WizardError> {
        self.guard(WizardStep::AwaitingPayment, "confirm payment")?;
        self.loading = true;
        Ok(())
    }

    pub fn finish_payment(&mut self, ticket: Ticket) -> Result<(), WizardError> {
        self.loading = false;
        self.expect_step(WizardStep::AwaitingPayment, "confirm payment")?;

        if ticket.booking_id != self.booking.booking_id {
            return Err(WizardError::Core(CoreError::ValidationError(format!(
                "ticket issued for booking {} instead of {}",
                ticket.booking_id, self.booking.booking_id
            ))));
        }

        self.booking.advance(BookingStatus::Paid, ticket.issued_at)?;
        self.booking.advance(BookingStatus::Confirmed, ticket.issued_at)?;
        self.ticket = Some(ticket);
        self.step = WizardStep::Confirmed;
        Ok(())
    }

    /// Drop the loading flag after a failed call; the step is unchanged
    pub fn abort(&mut self) {
        self.loading = false;
    }

    /// Ticket of a confirmed booking
    pub fn confirmed_ticket(&self) -> Result<&Ticket, WizardError> {
        match (&self.step, &self.ticket) {
            (WizardStep::Confirmed, Some(ticket)) => Ok(ticket),
            _ => Err(WizardError::InvalidTransition {
                step: self.step,
                action: "print ticket",
            }),
        }
    }

    pub fn ensure_step(&self, expected: WizardStep, action: &'static str) -> Result<(), WizardError> {
        self.expect_step(expected, action)
    }

    fn guard(&self, expected: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.loading {
            return Err(WizardError::Busy);
        }
        self.expect_step(expected, action)
    }

    fn expect_step(&self, expected: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.step != expected {
            return Err(WizardError::InvalidTransition {
                step: self.step,
                action,
            });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Cannot {action} while {step}")]
    InvalidTransition { step: WizardStep, action: &'static str },

    #[error("Another request is still in progress")]
    Busy,

    #[error("Invalid OTP: {0}")]
    InvalidOtp(String),

    #[error("OTP was not accepted")]
    OtpRejected,

    #[error(transparent)]
    Core(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use railbook_core::{Seat, TicketStatus};

    fn booking(id: &str, prices: &[u32]) -> Booking {
        let seats = prices
            .iter()
            .enumerate()
            .map(|(i, p)| Seat::new(i as u32 + 1, format!("B{}", i + 1), *p))
            .collect();
        Booking::new(id.into(), seats, Utc::now())
    }

    fn ticket(id: &str) -> Ticket {
        Ticket {
            ticket_number: "TKT1".to_string(),
            booking_id: id.into(),
            status: TicketStatus::Confirmed,
            issued_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_wizard_flow() {
        let mut wizard = BookingWizard::new(booking("42", &[550]));
        assert_eq!(wizard.step(), WizardStep::AwaitingOtp);

        wizard.begin_otp("123456").unwrap();
        assert!(wizard.is_loading());
        wizard.finish_otp(Utc::now()).unwrap();
        assert_eq!(wizard.step(), WizardStep::AwaitingPayment);
        assert_eq!(wizard.total(), 550);
        assert_eq!(wizard.booking().status, BookingStatus::OtpVerified);

        wizard.begin_payment().unwrap();
        wizard.finish_payment(ticket("42")).unwrap();
        assert_eq!(wizard.step(), WizardStep::Confirmed);
        assert_eq!(wizard.booking().status, BookingStatus::Confirmed);
        assert_eq!(wizard.confirmed_ticket().unwrap().booking_id.as_str(), "42");
    }

    #[test]
    fn test_payment_not_reachable_from_otp_step() {
        let mut wizard = BookingWizard::new(booking("1", &[550]));

        let err = wizard.begin_payment().unwrap_err();
        assert!(matches!(err, WizardError::InvalidTransition { step: WizardStep::AwaitingOtp, .. }));
        assert!(wizard.finish_payment(ticket("1")).is_err());
        assert_eq!(wizard.step(), WizardStep::AwaitingOtp);
        assert!(wizard.confirmed_ticket().is_err());
    }

    #[test]
    fn test_steps_are_not_revisited() {
        let mut wizard = BookingWizard::new(booking("1", &[550]));
        wizard.begin_otp("000000").unwrap();
        wizard.finish_otp(Utc::now()).unwrap();

        assert!(wizard.begin_otp("123456").is_err());
        assert_eq!(wizard.step(), WizardStep::AwaitingPayment);
    }

    #[test]
    fn test_busy_while_loading() {
        let mut wizard = BookingWizard::new(booking("1", &[550]));
        wizard.begin_otp("1").unwrap();

        assert!(matches!(wizard.begin_otp("2"), Err(WizardError::Busy)));
        wizard.abort();
        assert!(!wizard.is_loading());
        assert_eq!(wizard.step(), WizardStep::AwaitingOtp);
    }

    #[test]
    fn test_otp_input_length() {
        let mut wizard = BookingWizard::new(booking("1", &[550]));

        assert!(matches!(wizard.begin_otp(""), Err(WizardError::InvalidOtp(_))));
        assert!(matches!(wizard.begin_otp("1234567"), Err(WizardError::InvalidOtp(_))));
        assert!(!wizard.is_loading());
        // Any value within the length limit is accepted
        wizard.begin_otp("abc").unwrap();
    }

    #[test]
    fn test_ticket_for_other_booking_is_refused() {
        let mut wizard = BookingWizard::new(booking("1", &[550]));
        wizard.begin_otp("123456").unwrap();
        wizard.finish_otp(Utc::now()).unwrap();
        wizard.begin_payment().unwrap();

        assert!(wizard.finish_payment(ticket("2")).is_err());
        assert_eq!(wizard.step(), WizardStep::AwaitingPayment);
        assert!(!wizard.is_loading());
    }

    #[test]
    fn test_total_matches_seat_prices() {
        let wizard = BookingWizard::new(booking("1", &[550, 600, 580, 550]));
        assert_eq!(wizard.total(), 2280);
    }
}
