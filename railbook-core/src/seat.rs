use serde::{Deserialize, Serialize};

pub type SeatId = u32;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Selected,
    Booked,
}

/// A single seat on a train's seat map
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    pub id: SeatId,
    pub number: String,
    pub status: SeatStatus,
    pub price: u32,
}

impl Seat {
    pub fn new(id: SeatId, number: impl Into<String>, price: u32) -> Self {
        Self {
            id,
            number: number.into(),
            status: SeatStatus::Available,
            price,
        }
    }

    pub fn is_booked(&self) -> bool {
        self.status == SeatStatus::Booked
    }
}
