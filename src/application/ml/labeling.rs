use crate::domain::ml::feature_registry::{FeatureRow, LabeledRow};

pub const DEFAULT_LOOK_AHEAD: usize = 10;

/// Attach the price `look_ahead` rows ahead to every row that has one.
///
/// Rows too close to the end of the sequence are dropped, so the output
/// holds `max(0, rows.len() - look_ahead)` rows.
pub fn label(rows: &[FeatureRow], look_ahead: usize) -> Vec<LabeledRow> {
    rows.iter()
        .zip(rows.iter().skip(look_ahead))
        .map(|(row, ahead)| LabeledRow::new(row.clone(), ahead.price))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn rows_from(prices: &[f64]) -> Vec<FeatureRow> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| FeatureRow {
                timestamp: start + Duration::minutes(i as i64),
                price: *p,
                lag_1: *p,
                lag_2: *p,
                lag_3: *p,
                lag_4: *p,
                lag_5: *p,
                sma_5: *p,
                sma_10: *p,
            })
            .collect()
    }

    #[test]
    fn test_output_length() {
        let rows = rows_from(&[1.0; 25]);
        assert_eq!(label(&rows, 10).len(), 15);
        assert_eq!(label(&rows, 25).len(), 0);
        assert_eq!(label(&rows, 40).len(), 0);
        assert!(label(&[], DEFAULT_LOOK_AHEAD).is_empty());
    }

    #[test]
    fn test_future_price_and_target() {
        let prices = [1.0, 2.0, 1.5, 1.5, 0.5];
        let labeled = label(&rows_from(&prices), 2);

        assert_eq!(labeled.len(), 3);
        // 1.0 -> 1.5 rises
        assert_eq!(labeled[0].future_price, 1.5);
        assert_eq!(labeled[0].target, 1);
        // 2.0 -> 1.5 falls
        assert_eq!(labeled[1].target, 0);
        // 1.5 -> 0.5 falls
        assert_eq!(labeled[2].future_price, 0.5);
        assert_eq!(labeled[2].target, 0);
    }

    #[test]
    fn test_equal_prices_label_zero() {
        let labeled = label(&rows_from(&[3.0, 3.0, 3.0]), 1);
        assert!(labeled.iter().all(|row| row.target == 0));
    }

    #[test]
    fn test_preserves_row_order() {
        let rows = rows_from(&[1.0, 2.0, 3.0, 4.0]);
        let labeled = label(&rows, 1);
        let timestamps: Vec<_> = labeled.iter().map(|r| r.features.timestamp).collect();
        let expected: Vec<_> = rows[..3].iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, expected);
    }
}
