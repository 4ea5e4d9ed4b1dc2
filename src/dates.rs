use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::errors::AppError;

/// Which end of a range a user-supplied date bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Parse a `YYYY-MM-DD` date or an RFC 3339 timestamp.
///
/// A plain date expands to the first (start) or last (end) millisecond of
/// that day in UTC, so `endDate=2024-01-31` includes the whole 31st.
pub fn parse_date(value: &str, bound: Bound) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let time = match bound {
            Bound::Start => NaiveTime::MIN,
            Bound::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?,
        };
        return Some(Utc.from_utc_datetime(&date.and_time(time)));
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a query parameter, naming it in the validation error.
pub fn parse_param(name: &str, value: &str, bound: Bound) -> Result<DateTime<Utc>, AppError> {
    parse_date(value, bound).ok_or_else(|| {
        AppError::Validation(format!(
            "{name} must be a valid date (YYYY-MM-DD or RFC 3339)"
        ))
    })
}

/// Inclusive instant range used by every date-filtered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, AppError> {
        if end < start {
            return Err(AppError::Validation(
                "endDate must not be before startDate".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Parse both bounds; both are required.
    pub fn required(start: Option<&str>, end: Option<&str>) -> Result<Self, AppError> {
        let start = start
            .ok_or_else(|| AppError::Validation("startDate is required".to_string()))?;
        let end = end.ok_or_else(|| AppError::Validation("endDate is required".to_string()))?;
        Self::new(
            parse_param("startDate", start, Bound::Start)?,
            parse_param("endDate", end, Bound::End)?,
        )
    }

    /// Range applies only when both bounds are supplied; malformed bounds still fail.
    pub fn optional(start: Option<&str>, end: Option<&str>) -> Result<Option<Self>, AppError> {
        let start = start
            .map(|s| parse_param("startDate", s, Bound::Start))
            .transpose()?;
        let end = end
            .map(|e| parse_param("endDate", e, Bound::End))
            .transpose()?;
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end).map(Some),
            _ => Ok(None),
        }
    }

    /// The calendar month `month` (1-12) of `year`, as [first instant, last millisecond].
    pub fn month(year: i32, month: u32) -> Result<Self, AppError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::Validation(format!("Invalid month {month}/{year}")))?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| AppError::Validation(format!("Invalid month {month}/{year}")))?;

        let start = Utc.from_utc_datetime(&first.and_time(NaiveTime::MIN));
        let end = Utc.from_utc_datetime(&next.and_time(NaiveTime::MIN)) - Duration::milliseconds(1);
        Ok(Self { start, end })
    }

    /// The month containing `now`.
    pub fn current_month(now: DateTime<Utc>) -> Self {
        // A month derived from a valid instant is always constructible.
        Self::month(now.year(), now.month()).unwrap_or(Self { start: now, end: now })
    }

    /// The last `days` days up to `now`.
    pub fn lookback(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            start: now - Duration::days(days),
            end: now,
        }
    }
}

/// Echo of the requested period in report responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodEcho {
    #[schema(example = "2024-01-01")]
    pub start_date: String,
    #[schema(example = "2024-01-31")]
    pub end_date: String,
}

/// Serde helper for optional body dates that accept plain dates too.
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_date(&s, Bound::Start)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {s}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_plain_date_bounds() {
        let start = parse_date("2024-03-05", Bound::Start).unwrap();
        let end = parse_date("2024-03-05", Bound::End).unwrap();
        assert_eq!(start.hour(), 0);
        assert_eq!(end.hour(), 23);
        assert_eq!(end.timestamp_subsec_millis(), 999);
    }

    #[test]
    fn test_rfc3339_kept_exact() {
        let dt = parse_date("2024-03-05T10:30:00+02:00", Bound::End).unwrap();
        assert_eq!(dt.hour(), 8);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(parse_date("yesterday", Bound::Start).is_none());
        assert!(matches!(
            parse_param("startDate", "2024-13-01", Bound::Start),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_required_range_needs_both_and_order() {
        assert!(DateRange::required(Some("2024-01-01"), None).is_err());
        assert!(DateRange::required(Some("2024-02-01"), Some("2024-01-01")).is_err());
        let range = DateRange::required(Some("2024-01-01"), Some("2024-01-01")).unwrap();
        assert!(range.start < range.end);
    }

    #[test]
    fn test_optional_range() {
        assert_eq!(DateRange::optional(None, None).unwrap(), None);
        assert_eq!(DateRange::optional(Some("2024-01-01"), None).unwrap(), None);
        assert!(DateRange::optional(Some("nope"), None).is_err());
        assert!(DateRange::optional(Some("2024-01-01"), Some("2024-01-31"))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_month_range_covers_whole_month() {
        let feb = DateRange::month(2024, 2).unwrap();
        assert_eq!(feb.start.day(), 1);
        assert_eq!(feb.end.day(), 29);
        assert_eq!(feb.end.timestamp_subsec_millis(), 999);

        let dec = DateRange::month(2023, 12).unwrap();
        assert_eq!(dec.end.year(), 2023);
        assert_eq!(dec.end.day(), 31);

        assert!(DateRange::month(2024, 13).is_err());
    }
}
