use crate::domain::market::Tick;
use crate::domain::ml::feature_registry::{
    FeatureRow, LAG_COUNT, LONG_SMA_WINDOW, MIN_TICKS, SHORT_SMA_WINDOW,
};
use std::collections::VecDeque;
use ta::Next;
use ta::errors::TaError;
use ta::indicators::SimpleMovingAverage;

/// Streaming lag / moving-average state over a tick sequence.
///
/// Emits a row only once the widest window is full; earlier ticks only
/// warm the indicators up.
pub struct FeatureDeriver {
    sma_short: SimpleMovingAverage,
    sma_long: SimpleMovingAverage,
    // Most recent prices, newest last. Holds the current tick plus LAG_COUNT prior ones.
    recent: VecDeque<f64>,
    seen: usize,
}

impl FeatureDeriver {
    pub fn new() -> Result<Self, TaError> {
        Ok(Self {
            sma_short: SimpleMovingAverage::new(SHORT_SMA_WINDOW)?,
            sma_long: SimpleMovingAverage::new(LONG_SMA_WINDOW)?,
            recent: VecDeque::with_capacity(LAG_COUNT + 1),
            seen: 0,
        })
    }

    pub fn update(&mut self, tick: &Tick) -> Option<FeatureRow> {
        let sma_5 = self.sma_short.next(tick.price);
        let sma_10 = self.sma_long.next(tick.price);

        self.recent.push_back(tick.price);
        if self.recent.len() > LAG_COUNT + 1 {
            self.recent.pop_front();
        }
        self.seen += 1;

        if self.seen < LONG_SMA_WINDOW {
            return None;
        }

        let lag = |k: usize| self.recent[self.recent.len() - 1 - k];
        Some(FeatureRow {
            timestamp: tick.timestamp,
            price: tick.price,
            lag_1: lag(1),
            lag_2: lag(2),
            lag_3: lag(3),
            lag_4: lag(4),
            lag_5: lag(5),
            sma_5,
            sma_10,
        })
    }
}

/// Feature rows for an ordered tick sequence, one per tick at position 9 or later.
///
/// Sequences shorter than [`MIN_TICKS`] yield no rows; callers treat that as
/// "insufficient data", not as a failure.
pub fn derive_features(ticks: &[Tick]) -> Vec<FeatureRow> {
    if ticks.len() < MIN_TICKS {
        return Vec::new();
    }
    let Ok(mut deriver) = FeatureDeriver::new() else {
        return Vec::new();
    };

    ticks.iter().filter_map(|tick| deriver.update(tick)).collect()
}
