pub mod app_config;
pub mod auth_api;
pub mod http_client;

pub use app_config::Config;
pub use auth_api::HttpAuthApi;
pub use http_client::{ApiClient, ClientError};
