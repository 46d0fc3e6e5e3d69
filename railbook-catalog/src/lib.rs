pub mod seat_map;
pub mod selection;
pub mod trains;

pub use seat_map::{generate_seat_map, SEATS_PER_ROW, SEAT_ROWS};
pub use selection::{reservation_notice, SeatSelection, SelectionChange, SelectionError, MAX_SEATS_PER_BOOKING};
pub use trains::{default_trains, CatalogSettings, MockTrainApi};
