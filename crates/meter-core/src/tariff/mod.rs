//! Tariff selection - time-of-day pricing of consumption units

mod clock;
mod schedule;

pub use clock::{Clock, FixedClock, SystemClock};
pub use schedule::{TariffPeriod, TariffSchedule};
