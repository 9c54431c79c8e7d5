use time::Date;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core::time::parse_date;

pub(crate) fn validate_payload(payload: &impl Validate) -> Result<(), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Unwraps a required field or answers `"<field> required"`.
pub(crate) fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::required(field))
}

/// Like [`required`], additionally rejecting blank strings.
pub(crate) fn required_text(value: Option<&str>, field: &str) -> Result<String, ApiError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::required(field))
}

pub(crate) fn parse_date_field(value: &str, field: &str) -> Result<Date, ApiError> {
    parse_date(value)
        .map_err(|_| ApiError::BadRequest(format!("{field} must be a date in YYYY-MM-DD format")))
}

pub(crate) fn validate_date_order(start: Date, end: Date) -> Result<(), ApiError> {
    if start > end {
        return Err(ApiError::BadRequest("start_date must not be after end_date".to_string()));
    }
    Ok(())
}

pub(crate) fn validate_score_bounds(min_score: f64, max_score: f64) -> Result<(), ApiError> {
    if !min_score.is_finite() || !max_score.is_finite() {
        return Err(ApiError::BadRequest("Score bounds must be finite numbers".to_string()));
    }
    if min_score > max_score {
        return Err(ApiError::BadRequest("min_score must not exceed max_score".to_string()));
    }
    Ok(())
}
