//! Meter reading value object

use serde::{Deserialize, Serialize};

use crate::entities::WATTS_PER_UNIT;
use crate::error::DomainError;

/// A single report from a customer's meter
///
/// Consumption is reported in watts and billed in units (kilowatts).
/// Voltage and current are a telemetry snapshot and never affect billing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeterReading {
    watts_consumed: f64,
    voltage: f64,
    current: f64,
}

impl MeterReading {
    /// Create a validated reading
    ///
    /// Voltage and current must be strictly positive; consumption must be
    /// finite and not negative.
    pub fn new(watts_consumed: f64, voltage: f64, current: f64) -> Result<Self, DomainError> {
        if !watts_consumed.is_finite() || watts_consumed < 0.0 {
            return Err(DomainError::invalid_field(
                "watts_consumed",
                "must be a non-negative number",
            ));
        }
        if !voltage.is_finite() || voltage <= 0.0 {
            return Err(DomainError::invalid_field("voltage", "must be greater than zero"));
        }
        if !current.is_finite() || current <= 0.0 {
            return Err(DomainError::invalid_field("current", "must be greater than zero"));
        }

        Ok(Self {
            watts_consumed,
            voltage,
            current,
        })
    }

    #[inline]
    pub fn watts_consumed(&self) -> f64 {
        self.watts_consumed
    }

    #[inline]
    pub fn voltage(&self) -> f64 {
        self.voltage
    }

    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Billable units in this reading
    #[inline]
    pub fn units(&self) -> f64 {
        self.watts_consumed / WATTS_PER_UNIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_reading() {
        let reading = MeterReading::new(2500.0, 230.0, 4.5).unwrap();
        assert_eq!(reading.units(), 2.5);
        assert_eq!(reading.voltage(), 230.0);
        assert_eq!(reading.current(), 4.5);
    }

    #[test]
    fn test_zero_consumption_is_allowed() {
        let reading = MeterReading::new(0.0, 230.0, 1.0).unwrap();
        assert_eq!(reading.units(), 0.0);
    }

    #[test]
    fn test_rejects_non_positive_voltage() {
        let err = MeterReading::new(100.0, 0.0, 1.0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidField { field: "voltage", .. }));

        let err = MeterReading::new(100.0, -230.0, 1.0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidField { field: "voltage", .. }));
    }

    #[test]
    fn test_rejects_non_positive_current() {
        let err = MeterReading::new(100.0, 230.0, 0.0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidField { field: "current", .. }));
    }

    #[test]
    fn test_rejects_negative_or_nan_consumption() {
        assert!(MeterReading::new(-1.0, 230.0, 1.0).is_err());
        assert!(MeterReading::new(f64::NAN, 230.0, 1.0).is_err());
        assert!(MeterReading::new(f64::INFINITY, 230.0, 1.0).is_err());
    }
}
