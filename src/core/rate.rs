//! Per-second rates of monotonically increasing counters.
//!
//! Every call sees a single sample; the previous one comes from a
//! [`ValueStore`]. The first sample of a key cannot produce a rate, which is
//! reported as [`Rate::Unavailable`] rather than a number so callers skip
//! output for that cycle.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::value_store::{ItemState, ValueStore};

/// Last sample seen for a counter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateState {
    pub last_timestamp: f64,
    pub last_value: f64,
}

/// Why a rate could not be computed this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Unavailable {
    #[error("first sample for this counter, no rate yet")]
    FirstSample,
    #[error("timestamp did not advance since the last sample")]
    StaleSample,
    #[error("counter wrapped or was reset")]
    CounterWrap,
}

/// Outcome of a rate computation
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rate {
    Value(f64),
    Unavailable(Unavailable),
}

impl Rate {
    pub fn value(self) -> Option<f64> {
        match self {
            Rate::Value(v) => Some(v),
            Rate::Unavailable(_) => None,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Rate::Value(_))
    }

    /// Treat a missing rate as zero
    pub fn or_zero(self) -> f64 {
        self.value().unwrap_or(0.0)
    }

    pub fn into_result(self) -> Result<f64, Unavailable> {
        match self {
            Rate::Value(v) => Ok(v),
            Rate::Unavailable(reason) => Err(reason),
        }
    }
}

/// Computes rates and moving averages on top of a value store
#[derive(Debug, Default)]
pub struct RateTracker<S> {
    store: S,
}

impl<S: ValueStore> RateTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Per-second rate of the counter `key` between the stored sample and
    /// `(timestamp, value)`.
    ///
    /// The stored sample is replaced on every path. A decreasing counter is
    /// taken as restarted from zero when `allow_wrap` is set.
    pub fn rate(&mut self, key: &str, timestamp: f64, value: f64, allow_wrap: bool) -> Rate {
        let previous = self.last_counter(key);
        self.store.set(
            key,
            ItemState::Counter(RateState {
                last_timestamp: timestamp,
                last_value: value,
            }),
        );

        let Some(previous) = previous else {
            log::trace!("{}: first sample", key);
            return Rate::Unavailable(Unavailable::FirstSample);
        };

        let delta_t = timestamp - previous.last_timestamp;
        if delta_t <= 0.0 {
            log::debug!("{}: timestamp did not advance ({} s)", key, delta_t);
            return Rate::Unavailable(Unavailable::StaleSample);
        }

        let mut delta_v = value - previous.last_value;
        if delta_v < 0.0 {
            if !allow_wrap {
                log::debug!("{}: counter wrap ({} -> {})", key, previous.last_value, value);
                return Rate::Unavailable(Unavailable::CounterWrap);
            }
            delta_v = value;
        }

        Rate::Value(delta_v / delta_t)
    }

    /// Rates for several counters sampled together.
    ///
    /// All counters are updated before deciding; if any of them has no rate
    /// the whole batch is `None`.
    pub fn rate_all(
        &mut self,
        timestamp: f64,
        counters: &[(&str, f64)],
        allow_wrap: bool,
    ) -> Option<Vec<f64>> {
        let rates: Vec<Rate> = counters
            .iter()
            .map(|(key, value)| self.rate(key, timestamp, *value, allow_wrap))
            .collect();

        rates.into_iter().map(Rate::value).collect()
    }

    /// Exponential moving average of `value`.
    ///
    /// After `backlog_minutes` the weight of older samples has halved. The
    /// first sample is its own average; a non-advancing timestamp returns the
    /// previous average unchanged.
    pub fn average(&mut self, key: &str, timestamp: f64, value: f64, backlog_minutes: f64) -> f64 {
        let previous = match self.store.get(key) {
            Some(ItemState::Average { timestamp, average }) => Some((timestamp, average)),
            _ => None,
        };

        let average = match previous {
            None => value,
            Some((last_timestamp, last_average)) if timestamp <= last_timestamp => {
                return last_average;
            }
            Some((last_timestamp, last_average)) => {
                let minutes = (timestamp - last_timestamp) / 60.0;
                let weight = 0.5_f64.powf(minutes / backlog_minutes);
                (1.0 - weight) * value + weight * last_average
            }
        };

        self.store.set(key, ItemState::Average { timestamp, average });
        average
    }

    fn last_counter(&self, key: &str) -> Option<RateState> {
        match self.store.get(key) {
            Some(ItemState::Counter(state)) => Some(state),
            Some(other) => {
                log::warn!("{}: replacing non-counter state {:?}", key, other);
                None
            }
            None => None,
        }
    }
}
