use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Charting time range. Each variant selects an independent bucketing
/// strategy in the metrics crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TimeRange {
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "YTD")]
    YearToDate,
    #[serde(rename = "custom")]
    Custom,
    #[serde(rename = "All")]
    All,
}

impl TimeRange {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SevenDays => "7d",
            Self::OneMonth => "1m",
            Self::ThreeMonths => "3m",
            Self::SixMonths => "6m",
            Self::OneYear => "1y",
            Self::YearToDate => "YTD",
            Self::Custom => "custom",
            Self::All => "All",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range_wire_names() {
        // These strings are the public query-parameter values; the frontend
        // depends on them verbatim.
        for (range, wire) in [
            (TimeRange::SevenDays, "\"7d\""),
            (TimeRange::OneMonth, "\"1m\""),
            (TimeRange::ThreeMonths, "\"3m\""),
            (TimeRange::SixMonths, "\"6m\""),
            (TimeRange::OneYear, "\"1y\""),
            (TimeRange::YearToDate, "\"YTD\""),
            (TimeRange::Custom, "\"custom\""),
            (TimeRange::All, "\"All\""),
        ] {
            assert_eq!(serde_json::to_string(&range).unwrap(), wire);
            assert_eq!(
                serde_json::from_str::<TimeRange>(wire).unwrap(),
                range
            );
        }
    }

    #[test]
    fn test_unknown_time_range_is_rejected() {
        assert!(serde_json::from_str::<TimeRange>("\"2w\"").is_err());
    }
}
