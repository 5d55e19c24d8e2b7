use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;

use crate::constants::{messages, MAX_HISTORY_DAYS, MIN_HISTORY_DAYS};
use crate::error::AppError;

lazy_static! {
    // Plain base-10 integer, optional leading minus. No sign-less garbage, no decimals.
    static ref INTEGER_REGEX: Regex = Regex::new(r"^-?[0-9]+$").unwrap();
}

/// Parse a day count from a path segment and check it against `[min, max]`.
///
/// Non-integer input fails with `{field, received}` details. Integers outside
/// the range fail with `{field, min, max, received}`, where `received` is the
/// parsed number, or the raw text when it does not fit in an `i64`.
pub fn validate_and_parse_days(
    raw: &str,
    field_name: &str,
    min: i64,
    max: i64,
) -> Result<i64, AppError> {
    if !INTEGER_REGEX.is_match(raw) {
        return Err(AppError::bad_request(
            messages::VALIDATION_INVALID_NUMBER,
            json!({ "field": field_name, "received": raw }),
        ));
    }

    let parsed = match raw.parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            return Err(AppError::bad_request(
                messages::VALIDATION_OUT_OF_RANGE,
                json!({ "field": field_name, "min": min, "max": max, "received": raw }),
            ));
        }
    };

    if parsed < min || parsed > max {
        return Err(AppError::bad_request(
            messages::VALIDATION_OUT_OF_RANGE,
            json!({ "field": field_name, "min": min, "max": max, "received": parsed }),
        ));
    }

    Ok(parsed)
}

/// [`validate_and_parse_days`] with the default 1..=365 window.
pub fn validate_days(raw: &str, field_name: &str) -> Result<i64, AppError> {
    validate_and_parse_days(raw, field_name, MIN_HISTORY_DAYS, MAX_HISTORY_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    const FIELD: &str = "days";

    #[test]
    fn parses_values_inside_range() {
        assert_eq!(validate_and_parse_days("30", FIELD, 1, 365).unwrap(), 30);
        assert_eq!(validate_and_parse_days("1", FIELD, 1, 365).unwrap(), 1);
        assert_eq!(validate_and_parse_days("365", FIELD, 1, 365).unwrap(), 365);
        assert_eq!(validate_and_parse_days("0", FIELD, 0, 365).unwrap(), 0);
        assert_eq!(validate_days("7", FIELD).unwrap(), 7);
    }

    #[test]
    fn rejects_non_numeric_input() {
        let err = validate_and_parse_days("abc", FIELD, 1, 365).unwrap_err();
        assert_eq!(err.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, messages::VALIDATION_INVALID_NUMBER);
        assert_eq!(err.details, Some(json!({ "field": "days", "received": "abc" })));

        for raw in ["", "3.14", "7d", " 7", "7 ", "+7", "1e3"] {
            let err = validate_and_parse_days(raw, FIELD, 1, 365).unwrap_err();
            assert_eq!(err.status_code, StatusCode::BAD_REQUEST, "input {raw:?}");
            assert_eq!(err.details, Some(json!({ "field": "days", "received": raw })));
        }
    }

    #[test]
    fn rejects_values_outside_range() {
        let err = validate_and_parse_days("0", FIELD, 1, 365).unwrap_err();
        assert_eq!(err.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, messages::VALIDATION_OUT_OF_RANGE);
        assert_eq!(
            err.details,
            Some(json!({ "field": "days", "min": 1, "max": 365, "received": 0 }))
        );

        assert!(validate_and_parse_days("366", FIELD, 1, 365).is_err());
        assert!(validate_and_parse_days("999999", FIELD, 1, 365).is_err());

        let err = validate_and_parse_days("-5", FIELD, 1, 365).unwrap_err();
        assert_eq!(err.details.unwrap()["received"], json!(-5));
    }

    #[test]
    fn honors_custom_bounds() {
        assert!(validate_and_parse_days("4", FIELD, 5, 10).is_err());
        assert!(validate_and_parse_days("11", FIELD, 5, 10).is_err());
        assert_eq!(validate_and_parse_days("7", FIELD, 5, 10).unwrap(), 7);
    }

    #[test]
    fn overflowing_integers_report_raw_text() {
        let raw = "99999999999999999999999";
        let err = validate_and_parse_days(raw, FIELD, 1, 365).unwrap_err();
        assert_eq!(
            err.details,
            Some(json!({ "field": "days", "min": 1, "max": 365, "received": raw }))
        );
    }
}
