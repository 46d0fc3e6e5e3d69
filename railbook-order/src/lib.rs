pub mod countdown;
pub mod fulfillment;
pub mod manager;
pub mod mock_api;
pub mod session;
pub mod wizard;

pub use countdown::{Countdown, CountdownTimer, DEFAULT_COUNTDOWN_SECONDS};
pub use fulfillment::{export_ticket, render_ticket, TicketExport, TicketIssuer};
pub use manager::WizardRegistry;
pub use mock_api::{BookingApiSettings, MockBookingApi};
pub use session::{ActionOutcome, WizardDeps, WizardSession, WizardSettings, WizardView, DEFAULT_RETENTION_SECONDS};
pub use wizard::{BookingWizard, WizardError, WizardStep};
