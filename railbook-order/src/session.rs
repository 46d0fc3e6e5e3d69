use railbook_core::{Booking, BookingApi, BookingId, Clock, Notifier, SessionContext, Ticket};
use railbook_shared::Notification;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use crate::countdown::{Countdown, CountdownTimer, CountdownView, DEFAULT_COUNTDOWN_SECONDS};
use crate::fulfillment::{export_ticket, render_ticket, TicketExport};
use crate::wizard::{BookingWizard, WizardError, WizardStep};

/// Duration of the toast that reveals the test code
const TEST_OTP_NOTICE_MS: u64 = 5000;

/// How long a mounted wizard is kept before the registry evicts it
pub const DEFAULT_RETENTION_SECONDS: u64 = 900;

#[derive(Debug, Clone)]
pub struct WizardSettings {
    pub countdown_seconds: u32,
    /// Code announced by the resend action
    pub test_otp: String,
    pub retention: Duration,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
            test_otp: "123456".to_string(),
            retention: Duration::from_secs(DEFAULT_RETENTION_SECONDS),
        }
    }
}

/// Collaborators a wizard talks to
#[derive(Clone)]
pub struct WizardDeps {
    pub api: Arc<dyn BookingApi>,
    pub notifier: Arc<dyn Notifier>,
    pub session: Arc<SessionContext>,
    pub clock: Arc<dyn Clock>,
}

/// Snapshot of a wizard as rendered to the client
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub booking_id: BookingId,
    pub step: WizardStep,
    pub loading: bool,
    pub booking: Booking,
    pub total_amount: u32,
    pub ticket: Option<Ticket>,
    /// Hidden once the booking is confirmed
    pub countdown: Option<CountdownView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub view: WizardView,
    pub notifications: Vec<Notification>,
}

/// A mounted booking wizard: state, countdown and collaborators.
///
/// The state lock is never held across the simulated network call; the
/// wizard's loading flag keeps a second action out in the meantime.
pub struct WizardSession {
    booking_id: BookingId,
    state: Mutex<BookingWizard>,
    countdown: CountdownTimer,
    mounted_at: Instant,
    deps: WizardDeps,
    settings: WizardSettings,
}

/// Raised loading flag of an action awaiting its network call. Dropping it
/// before `complete` (a cancelled request) lowers the flag again.
struct InFlight<'a> {
    state: &'a Mutex<BookingWizard>,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a Mutex<BookingWizard>) -> Self {
        Self { state, armed: true }
    }

    fn complete(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.lock().unwrap_or_else(PoisonError::into_inner).abort();
        }
    }
}

impl WizardSession {
    /// Mount the wizard and start its countdown. Needs a tokio runtime.
    pub fn mount(booking: Booking, deps: WizardDeps, settings: WizardSettings) -> Self {
        tracing::info!(booking_id = %booking.booking_id, seats = booking.seats.len(), "booking wizard mounted");
        Self {
            booking_id: booking.booking_id.clone(),
            state: Mutex::new(BookingWizard::new(booking)),
            countdown: CountdownTimer::start(settings.countdown_seconds),
            mounted_at: Instant::now(),
            deps,
            settings,
        }
    }

    pub fn booking_id(&self) -> &BookingId {
        &self.booking_id
    }

    pub fn step(&self) -> WizardStep {
        self.state().step()
    }

    pub fn countdown(&self) -> Countdown {
        self.countdown.snapshot()
    }

    /// Whether the wizard has outlived its retention window
    pub fn is_stale(&self) -> bool {
        self.mounted_at.elapsed() >= self.settings.retention
    }

    pub fn view(&self) -> WizardView {
        let wizard = self.state();
        let countdown = (wizard.step() != WizardStep::Confirmed).then(|| self.countdown.snapshot().view());

        WizardView {
            booking_id: self.booking_id.clone(),
            step: wizard.step(),
            loading: wizard.is_loading(),
            booking: wizard.booking().clone(),
            total_amount: wizard.total(),
            ticket: wizard.ticket().cloned(),
            countdown,
        }
    }

    /// Verify the OTP. Any code of valid length is accepted after the
    /// verification delay.
    pub async fn submit_otp(&self, code: &str) -> Result<ActionOutcome, WizardError> {
        self.state().begin_otp(code).inspect_err(|err| self.rejected("submit OTP", err))?;
        let in_flight = InFlight::new(&self.state);

        let verification = self.deps.api.verify_otp(&self.booking_id, code).await?;

        if !verification.verified {
            drop(in_flight);
            let notifications = vec![self.emit(Notification::error("Invalid OTP"))];
            tracing::warn!(booking_id = %self.booking_id, ?notifications, "OTP rejected");
            return Err(WizardError::OtpRejected);
        }

        let finished = self.state().finish_otp(self.deps.clock.now());
        in_flight.complete();
        finished?;
        tracing::info!(booking_id = %self.booking_id, "OTP verified");

        let notifications = vec![self.emit(Notification::success("OTP verified!"))];
        Ok(self.outcome(notifications))
    }

    /// Re-announce the code. Neither the step nor the countdown changes.
    pub fn resend_otp(&self) -> Result<ActionOutcome, WizardError> {
        self.state().ensure_step(WizardStep::AwaitingOtp, "resend OTP")?;

        let phone = self
            .deps
            .session
            .user()
            .and_then(|user| user.phone)
            .unwrap_or_else(|| "your registered phone".to_string());

        let notifications = vec![
            self.emit(Notification::success(format!("OTP sent to {}", phone))),
            self.emit(
                Notification::success(format!("Test OTP: {}", self.settings.test_otp))
                    .with_duration(TEST_OTP_NOTICE_MS),
            ),
        ];
        Ok(self.outcome(notifications))
    }

    /// Run the mock payment and issue the ticket
    pub async fn confirm_payment(&self) -> Result<ActionOutcome, WizardError> {
        self.state().begin_payment().inspect_err(|err| self.rejected("confirm payment", err))?;
        let in_flight = InFlight::new(&self.state);

        let ticket = self.deps.api.confirm_booking(&self.booking_id).await?;

        let ticket_number = ticket.ticket_number.clone();
        let finished = self.state().finish_payment(ticket);
        in_flight.complete();
        finished?;
        tracing::info!(booking_id = %self.booking_id, %ticket_number, "booking confirmed");

        let notifications = vec![self.emit(Notification::success("Booking confirmed!"))];
        Ok(self.outcome(notifications))
    }

    pub fn print_ticket(&self) -> Result<String, WizardError> {
        let wizard = self.state();
        let ticket = wizard.confirmed_ticket()?;
        Ok(render_ticket(ticket, wizard.booking()))
    }

    pub fn export_ticket(&self) -> Result<TicketExport, WizardError> {
        let wizard = self.state();
        let ticket = wizard.confirmed_ticket()?;
        Ok(export_ticket(ticket, wizard.booking()))
    }

    /// Stop the countdown
    pub fn teardown(&self) {
        self.countdown.stop();
        tracing::debug!(booking_id = %self.booking_id, "booking wizard torn down");
    }

    fn state(&self) -> MutexGuard<'_, BookingWizard> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, notification: Notification) -> Notification {
        self.deps.notifier.notify(notification.clone());
        notification
    }

    fn rejected(&self, action: &str, err: &WizardError) {
        tracing::warn!(booking_id = %self.booking_id, action, error = %err, "wizard action rejected");
    }

    fn outcome(&self, notifications: Vec<Notification>) -> ActionOutcome {
        ActionOutcome {
            view: self.view(),
            notifications,
        }
    }
}
