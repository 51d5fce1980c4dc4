use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

use super::Clock;
use crate::error::DomainError;

/// Pricing period of a moment in the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffPeriod {
    Peak,
    OffPeak,
}

/// Per-unit prices and the daily peak window
///
/// Both window bounds are inclusive: with the default 18:00-22:00 window,
/// 22:00:00.000 is still peak and 22:00:00.001 is not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TariffSchedule {
    off_peak_price: f64,
    peak_price: f64,
    peak_start: NaiveTime,
    peak_end: NaiveTime,
}

impl TariffSchedule {
    pub const DEFAULT_PEAK_START_HOUR: u32 = 18;
    pub const DEFAULT_PEAK_END_HOUR: u32 = 22;

    /// Create a schedule with the default peak window
    pub fn new(off_peak_price: f64, peak_price: f64) -> Result<Self, DomainError> {
        Self::with_peak_hours(
            off_peak_price,
            peak_price,
            Self::DEFAULT_PEAK_START_HOUR,
            Self::DEFAULT_PEAK_END_HOUR,
        )
    }

    /// Create a schedule whose peak window runs from `start_hour:00` to `end_hour:00`
    pub fn with_peak_hours(
        off_peak_price: f64,
        peak_price: f64,
        start_hour: u32,
        end_hour: u32,
    ) -> Result<Self, DomainError> {
        let hour = |h: u32| {
            NaiveTime::from_hms_opt(h, 0, 0)
                .ok_or_else(|| DomainError::InvalidTariff(format!("invalid peak hour {h}")))
        };
        Self::with_peak_window(off_peak_price, peak_price, hour(start_hour)?, hour(end_hour)?)
    }

    pub fn with_peak_window(
        off_peak_price: f64,
        peak_price: f64,
        peak_start: NaiveTime,
        peak_end: NaiveTime,
    ) -> Result<Self, DomainError> {
        check_price("off-peak", off_peak_price)?;
        check_price("peak", peak_price)?;
        if peak_start > peak_end {
            return Err(DomainError::InvalidTariff(format!(
                "peak window start {peak_start} is after its end {peak_end}"
            )));
        }

        Ok(Self {
            off_peak_price,
            peak_price,
            peak_start,
            peak_end,
        })
    }

    #[inline]
    pub fn off_peak_price(&self) -> f64 {
        self.off_peak_price
    }

    #[inline]
    pub fn peak_price(&self) -> f64 {
        self.peak_price
    }

    pub fn peak_window(&self) -> (NaiveTime, NaiveTime) {
        (self.peak_start, self.peak_end)
    }

    /// Which period a time of day falls into
    pub fn period_at(&self, time: NaiveTime) -> TariffPeriod {
        if time >= self.peak_start && time <= self.peak_end {
            TariffPeriod::Peak
        } else {
            TariffPeriod::OffPeak
        }
    }

    pub fn price_for(&self, period: TariffPeriod) -> f64 {
        match period {
            TariffPeriod::Peak => self.peak_price,
            TariffPeriod::OffPeak => self.off_peak_price,
        }
    }

    /// Per-unit price at a local wall-clock instant
    pub fn price_at(&self, local: NaiveDateTime) -> f64 {
        self.price_for(self.period_at(local.time()))
    }

    /// Per-unit price right now, as reported by `clock`
    pub fn current_price(&self, clock: &dyn Clock) -> f64 {
        self.price_at(clock.now())
    }
}

fn check_price(label: &str, price: f64) -> Result<(), DomainError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(DomainError::InvalidTariff(format!(
            "{label} price must be a positive number, got {price}"
        )))
    }
}
