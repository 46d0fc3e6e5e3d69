pub mod search;

pub use search::routes;
