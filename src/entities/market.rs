//! Market inputs - competitors and customer value factors

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::error::{finite, non_negative, ValidationError};

/// Overall value assumed for a competitor rated on no attributes
pub const DEFAULT_OVERALL_VALUE: f64 = 5.0;

/// A competing offer and how customers rate it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, f64>,
    /// Mean attribute rating, fixed when the competitor was added
    pub overall_value: f64,
}

impl Competitor {
    pub fn new(
        name: impl Into<String>,
        price: f64,
        attributes: BTreeMap<String, f64>,
    ) -> Result<Self, ValidationError> {
        let price = non_negative("competitor price", price)?;
        for value in attributes.values() {
            finite("competitor attribute", *value)?;
        }

        let overall_value = if attributes.is_empty() {
            DEFAULT_OVERALL_VALUE
        } else {
            attributes.values().sum::<f64>() / attributes.len() as f64
        };

        Ok(Self {
            name: name.into(),
            price,
            attributes,
            overall_value,
        })
    }

    /// Check a competitor restored from stored data
    pub fn validate(&self) -> Result<(), ValidationError> {
        non_negative("competitor price", self.price)?;
        for value in self.attributes.values() {
            finite("competitor attribute", *value)?;
        }
        finite("competitor overall value", self.overall_value)?;
        Ok(())
    }
}

/// Something customers care about, with our score on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueFactor {
    pub name: String,
    pub importance: f64,
    pub score: f64,
}

impl ValueFactor {
    pub fn new(name: impl Into<String>, importance: f64, score: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            name: name.into(),
            importance: non_negative("value factor importance", importance)?,
            score: non_negative("value factor score", score)?,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        non_negative("value factor importance", self.importance)?;
        non_negative("value factor score", self.score)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_value_is_attribute_mean() {
        let attributes = BTreeMap::from([
            ("quality".to_string(), 8.0),
            ("service".to_string(), 6.0),
            ("speed".to_string(), 7.0),
        ]);
        let competitor = Competitor::new("Acme", 120.0, attributes).unwrap();
        assert_eq!(competitor.overall_value, 7.0);
    }

    #[test]
    fn test_overall_value_defaults_to_midpoint() {
        let competitor = Competitor::new("Acme", 120.0, BTreeMap::new()).unwrap();
        assert_eq!(competitor.overall_value, DEFAULT_OVERALL_VALUE);
    }

    #[test]
    fn test_overall_value_is_a_snapshot() {
        let mut competitor = Competitor::new(
            "Acme",
            120.0,
            BTreeMap::from([("quality".to_string(), 4.0)]),
        )
        .unwrap();
        competitor.attributes.insert("quality".to_string(), 10.0);
        assert_eq!(competitor.overall_value, 4.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Competitor::new("Acme", -1.0, BTreeMap::new()).is_err());
        assert!(Competitor::new(
            "Acme",
            10.0,
            BTreeMap::from([("quality".to_string(), f64::NAN)])
        )
        .is_err());
        assert!(ValueFactor::new("Speed", -2.0, 5.0).is_err());
        assert!(ValueFactor::new("Speed", 2.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_stored_values() {
        let mut competitor = Competitor::new("Acme", 120.0, BTreeMap::new()).unwrap();
        assert!(competitor.validate().is_ok());
        competitor.price = -7.0;
        assert!(matches!(
            competitor.validate(),
            Err(ValidationError::Negative { field: "competitor price", .. })
        ));

        let factor = ValueFactor {
            name: "Speed".into(),
            importance: 1.0,
            score: -3.0,
        };
        assert!(factor.validate().is_err());
    }
}
