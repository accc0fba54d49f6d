use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::ApiError;

/// Parse an optional query-string instant. Accepts RFC 3339 or a plain
/// `YYYY-MM-DD` date (interpreted as midnight UTC).
pub fn parse_time_bound(input: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    let Some(raw) = input else {
        return Ok(None);
    };

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(instant.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()));
    }

    Err(ApiError::BadRequest(format!(
        "invalid date '{raw}', expected RFC 3339 or YYYY-MM-DD"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_bound_accepts_both_formats() {
        assert_eq!(parse_time_bound(None).unwrap(), None);

        let date = parse_time_bound(Some("2025-03-01")).unwrap().unwrap();
        assert_eq!(date.to_rfc3339(), "2025-03-01T00:00:00+00:00");

        let instant = parse_time_bound(Some("2025-03-01T15:30:00Z"))
            .unwrap()
            .unwrap();
        assert_eq!(instant.to_rfc3339(), "2025-03-01T15:30:00+00:00");
    }

    #[test]
    fn test_parse_time_bound_rejects_garbage() {
        assert!(parse_time_bound(Some("yesterday")).is_err());
        assert!(parse_time_bound(Some("03/01/2025")).is_err());
    }
}
