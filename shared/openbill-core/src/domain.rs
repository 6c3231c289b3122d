//! Core domain types used across all platform services

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::OpenbillError;

/// Account identifier for a commerce customer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Year-month bucket used to group usage for invoicing.
///
/// Renders as `"YYYY-MM"` on the wire and in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BillingPeriod {
    pub year: i32,
    pub month: u32,
}

impl BillingPeriod {
    pub fn new(year: i32, month: u32) -> crate::Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(OpenbillError::Validation(format!(
                "month must be 1-12, got {}",
                month
            )));
        }
        if year < 1900 {
            return Err(OpenbillError::Validation(format!("year out of range: {}", year)));
        }
        Ok(Self { year, month })
    }

    /// Truncate a timestamp to its year-month bucket.
    pub fn from_timestamp(ts: &DateTime<Utc>) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for BillingPeriod {
    type Err = OpenbillError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bad = || OpenbillError::DataIntegrity(format!("invalid period key: {:?}", s));
        let (year, month) = s.split_once('-').ok_or_else(bad)?;
        let year: i32 = year.parse().map_err(|_| bad())?;
        let month: u32 = month.parse().map_err(|_| bad())?;
        // same bounds as the constructor
        Self::new(year, month).map_err(|_| bad())
    }
}

impl Serialize for BillingPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BillingPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Outcome of one metered API call.
///
/// The upstream feed speaks `"Successful"` / `"Unsuccessful"`; any other
/// value is rejected at intake instead of being silently counted as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallOutcome {
    #[serde(rename = "Successful")]
    Success,
    #[serde(rename = "Unsuccessful")]
    Failure,
}

impl FromStr for CallOutcome {
    type Err = OpenbillError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Successful" => Ok(Self::Success),
            "Unsuccessful" => Ok(Self::Failure),
            other => Err(OpenbillError::DataIntegrity(format!(
                "unknown call outcome: {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "Successful"),
            Self::Failure => write!(f, "Unsuccessful"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn period_renders_zero_padded() {
        let period = BillingPeriod::new(2024, 3).unwrap();
        assert_eq!(period.to_string(), "2024-03");
    }

    #[test]
    fn period_roundtrips_through_str() {
        let parsed: BillingPeriod = "2024-11".parse().unwrap();
        assert_eq!(parsed, BillingPeriod::new(2024, 11).unwrap());
    }

    #[test]
    fn period_rejects_garbage() {
        assert!("2024".parse::<BillingPeriod>().is_err());
        assert!("2024-13".parse::<BillingPeriod>().is_err());
        assert!("yyyy-mm".parse::<BillingPeriod>().is_err());
    }

    #[test]
    fn period_parse_shares_the_constructor_bounds() {
        assert!("1800-05".parse::<BillingPeriod>().is_err());
        assert!(BillingPeriod::new(1800, 5).is_err());
        assert!("1900-01".parse::<BillingPeriod>().is_ok());
    }

    #[test]
    fn period_orders_by_year_then_month() {
        let a = BillingPeriod::new(2023, 12).unwrap();
        let b = BillingPeriod::new(2024, 1).unwrap();
        assert!(a < b);
    }

    #[test]
    fn period_from_timestamp_truncates() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap();
        assert_eq!(BillingPeriod::from_timestamp(&ts).to_string(), "2024-03");
    }

    #[test]
    fn outcome_parses_only_known_values() {
        assert_eq!("Successful".parse::<CallOutcome>().unwrap(), CallOutcome::Success);
        assert_eq!("Unsuccessful".parse::<CallOutcome>().unwrap(), CallOutcome::Failure);
        assert!("Approved".parse::<CallOutcome>().is_err());
        assert!("successful".parse::<CallOutcome>().is_err());
    }
}
