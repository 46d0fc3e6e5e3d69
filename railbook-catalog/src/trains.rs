use async_trait::async_trait;
use railbook_core::{CoreError, CoreResult, Latency, RandomSource, Seat, Train, TrainApi, TrainQuery};
use std::sync::Arc;

use crate::seat_map::generate_seat_map;

/// Knobs for the mock train and seat endpoints
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub search_latency: Latency,
    pub seat_latency: Latency,
    pub booked_probability: f64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            search_latency: Latency::from_millis(500),
            seat_latency: Latency::from_millis(500),
            booked_probability: 0.3,
        }
    }
}

fn train(id: u32, name: &str, departure: &str, arrival: &str, duration: &str, price: u32, available_seats: u32) -> Train {
    Train {
        id,
        name: name.to_string(),
        from: "Dhaka".to_string(),
        to: "Chittagong".to_string(),
        departure: departure.to_string(),
        arrival: arrival.to_string(),
        duration: duration.to_string(),
        price,
        available_seats,
    }
}

/// The fixed timetable served by the mock search
pub fn default_trains() -> Vec<Train> {
    vec![
        train(1, "Suborno Express", "08:00 AM", "02:30 PM", "6h 30m", 550, 45),
        train(2, "Turna Nishitha", "11:00 PM", "06:00 AM", "7h 00m", 600, 32),
        train(3, "Mohanagar Godhuli", "03:30 PM", "10:00 PM", "6h 30m", 580, 28),
    ]
}

/// In-process stand-in for the train service
pub struct MockTrainApi {
    trains: Vec<Train>,
    settings: CatalogSettings,
    random: Arc<dyn RandomSource>,
}

impl MockTrainApi {
    pub fn new(settings: CatalogSettings, random: Arc<dyn RandomSource>) -> Self {
        Self {
            trains: default_trains(),
            settings,
            random,
        }
    }

    pub fn with_trains(mut self, trains: Vec<Train>) -> Self {
        self.trains = trains;
        self
    }
}

#[async_trait]
impl TrainApi for MockTrainApi {
    async fn search_trains(&self, query: &TrainQuery) -> CoreResult<Vec<Train>> {
        self.settings.search_latency.simulate().await;
        tracing::debug!(from = %query.from, to = %query.to, date = %query.date, "mock train search");
        // The timetable does not depend on the route
        Ok(self.trains.clone())
    }

    async fn get_seats(&self, train_id: u32) -> CoreResult<Vec<Seat>> {
        self.settings.seat_latency.simulate().await;

        let train = self
            .trains
            .iter()
            .find(|t| t.id == train_id)
            .ok_or_else(|| CoreError::NotFound(format!("train {}", train_id)))?;

        let seats = generate_seat_map(train.price, self.settings.booked_probability, self.random.as_ref());
        tracing::debug!(train_id, booked = seats.iter().filter(|s| s.is_booked()).count(), "generated seat map");
        Ok(seats)
    }
}
