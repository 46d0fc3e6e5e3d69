use railbook_core::{RandomSource, Seat, SeatStatus};

pub const SEAT_ROWS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];
pub const SEATS_PER_ROW: u32 = 11;

/// Build a coach of `SEAT_ROWS x SEATS_PER_ROW` seats, numbered `A1..E11` with
/// ids from 1. Each seat is booked with probability `booked_probability`.
pub fn generate_seat_map(price: u32, booked_probability: f64, random: &dyn RandomSource) -> Vec<Seat> {
    let mut seats = Vec::with_capacity(SEAT_ROWS.len() * SEATS_PER_ROW as usize);

    for row in SEAT_ROWS {
        for col in 1..=SEATS_PER_ROW {
            let id = seats.len() as u32 + 1;
            let mut seat = Seat::new(id, format!("{}{}", row, col), price);
            if random.next_unit() < booked_probability {
                seat.status = SeatStatus::Booked;
            }
            seats.push(seat);
        }
    }

    seats
}

#[cfg(test)]
mod tests {
    use super::*;
    use railbook_core::{FixedRandom, SeededRandom};

    #[test]
    fn test_seat_map_layout() {
        let seats = generate_seat_map(550, 0.3, &FixedRandom::new(0.9, 0));

        assert_eq!(seats.len(), 55);
        assert_eq!(seats[0].number, "A1");
        assert_eq!(seats[0].id, 1);
        assert_eq!(seats[11].number, "B1");
        assert_eq!(seats[54].number, "E11");
        assert_eq!(seats[54].id, 55);
        assert!(seats.iter().all(|s| s.price == 550 && s.status == SeatStatus::Available));
    }

    #[test]
    fn test_booked_probability_extremes() {
        let all_booked = generate_seat_map(550, 0.3, &FixedRandom::new(0.0, 0));
        assert!(all_booked.iter().all(|s| s.is_booked()));

        let none_booked = generate_seat_map(550, 0.0, &SeededRandom::new(3));
        assert!(none_booked.iter().all(|s| !s.is_booked()));
    }

    #[test]
    fn test_seeded_maps_are_reproducible() {
        let a = generate_seat_map(600, 0.3, &SeededRandom::new(11));
        let b = generate_seat_map(600, 0.3, &SeededRandom::new(11));
        assert_eq!(a, b);
    }
}
