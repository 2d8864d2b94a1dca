//! Measurement units.
//!
//! The calculators are unit-agnostic. Weights are stored in the unit the user
//! logged them in; this module only converts for display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Pounds per kilogram.
pub const LB_PER_KG: f64 = 2.204_622_621_8;
/// Centimetres per inch.
pub const CM_PER_IN: f64 = 2.54;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn weight_suffix(self) -> &'static str {
        match self {
            UnitSystem::Metric => "kg",
            UnitSystem::Imperial => "lb",
        }
    }

    pub fn length_suffix(self) -> &'static str {
        match self {
            UnitSystem::Metric => "cm",
            UnitSystem::Imperial => "in",
        }
    }

    /// Convert a weight logged in `from` into this system.
    pub fn convert_weight(self, value: f64, from: UnitSystem) -> f64 {
        match (from, self) {
            (UnitSystem::Metric, UnitSystem::Imperial) => value * LB_PER_KG,
            (UnitSystem::Imperial, UnitSystem::Metric) => value / LB_PER_KG,
            _ => value,
        }
    }

    /// Convert a length logged in `from` into this system.
    pub fn convert_length(self, value: f64, from: UnitSystem) -> f64 {
        match (from, self) {
            (UnitSystem::Metric, UnitSystem::Imperial) => value / CM_PER_IN,
            (UnitSystem::Imperial, UnitSystem::Metric) => value * CM_PER_IN,
            _ => value,
        }
    }

    /// Format a weight for display with one decimal, e.g. `"81.4 kg"`.
    pub fn format_weight(self, value: f64) -> String {
        format!("{:.1} {}", value, self.weight_suffix())
    }

    /// Format a length for display with one decimal, e.g. `"33.5 in"`.
    pub fn format_length(self, value: f64) -> String {
        format!("{:.1} {}", value, self.length_suffix())
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        })
    }
}

impl FromStr for UnitSystem {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "metric" | "kg" => Ok(UnitSystem::Metric),
            "imperial" | "lb" | "lbs" => Ok(UnitSystem::Imperial),
            other => Err(ValidationError::InvalidValue {
                field: "units".into(),
                message: format!("expected metric or imperial, got '{other}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_conversion() {
        let lb = UnitSystem::Imperial.convert_weight(100.0, UnitSystem::Metric);
        assert!((lb - 220.462_262_18).abs() < 1e-9);

        let kg = UnitSystem::Metric.convert_weight(lb, UnitSystem::Imperial);
        assert!((kg - 100.0).abs() < 1e-9);

        assert_eq!(UnitSystem::Metric.convert_weight(80.0, UnitSystem::Metric), 80.0);
    }

    #[test]
    fn test_length_conversion() {
        assert_eq!(UnitSystem::Metric.convert_length(10.0, UnitSystem::Imperial), 25.4);
        assert_eq!(UnitSystem::Imperial.convert_length(25.4, UnitSystem::Metric), 10.0);
    }

    #[test]
    fn test_format_and_parse() {
        assert_eq!(UnitSystem::Imperial.format_weight(180.04), "180.0 lb");
        assert_eq!(UnitSystem::Metric.format_length(85.06), "85.1 cm");
        assert_eq!("LBS".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert!("stone".parse::<UnitSystem>().is_err());
    }
}
