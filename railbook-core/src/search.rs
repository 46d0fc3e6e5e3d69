use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainQuery {
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Train {
    pub id: u32,
    pub name: String,
    pub from: String,
    pub to: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
    pub price: u32,
    pub available_seats: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_query_deserialization() {
        let json = r#"
            {
                "from": "Dhaka",
                "to": "Chittagong",
                "date": "2026-10-20"
            }
        "#;
        let query: TrainQuery = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(query.from, "Dhaka");
        assert_eq!(query.date, NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
    }
}
