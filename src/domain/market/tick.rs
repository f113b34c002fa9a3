use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single timestamped price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl Tick {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// Prices must be finite to take part in any window computation.
    pub fn is_valid(&self) -> bool {
        self.price.is_finite()
    }
}

/// Stable sort by timestamp; ticks sharing a timestamp keep their arrival order.
pub fn sort_by_time(ticks: &mut [Tick]) {
    ticks.sort_by_key(|t| t.timestamp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_sort_keeps_arrival_order_for_equal_timestamps() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut ticks = vec![
            Tick::new(t0 + Duration::minutes(1), 3.0),
            Tick::new(t0, 1.0),
            Tick::new(t0, 2.0),
        ];

        sort_by_time(&mut ticks);

        let prices: Vec<f64> = ticks.iter().map(|t| t.price).collect();
        assert_eq!(prices, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_non_finite_price_is_invalid() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(Tick::new(t0, 1.5).is_valid());
        assert!(!Tick::new(t0, f64::NAN).is_valid());
        assert!(!Tick::new(t0, f64::INFINITY).is_valid());
    }
}
