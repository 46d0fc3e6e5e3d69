pub mod models;
pub mod pii;

pub use models::events::{Notification, NotificationLevel};
pub use pii::Masked;
