pub mod booking;
pub mod clock;
pub mod identity;
pub mod latency;
pub mod notify;
pub mod random;
pub mod repository;
pub mod search;
pub mod seat;
pub mod session;

pub use booking::{Booking, BookingId, BookingStatus, Reservation, Ticket, TicketStatus};
pub use clock::{Clock, FixedClock, SystemClock};
pub use identity::{AuthApi, AuthResponse, Credentials, OtpDispatch, OtpVerification, RegisterRequest, User};
pub use latency::Latency;
pub use notify::{Notifier, RecordingNotifier, TracingNotifier};
pub use random::{FixedRandom, RandomSource, SeededRandom};
pub use repository::{BookingApi, TrainApi};
pub use search::{Train, TrainQuery};
pub use seat::{Seat, SeatId, SeatStatus};
pub use session::SessionContext;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    #[error("Identity verification failed: {0}")]
    IdentityError(String),
    #[error("Upstream service error: {0}")]
    UpstreamError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
