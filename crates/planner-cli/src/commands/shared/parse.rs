use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse an optional `--flag` enum value.
pub fn parse_optional_enum<T>(raw: Option<&str>, field: &str) -> anyhow::Result<Option<T>>
where
    T: DeserializeOwned,
{
    raw.map(|value| parse_enum(value, field)).transpose()
}

/// Map a clearable text flag: an empty string clears the field.
#[must_use]
pub fn clearable(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str, field: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid {field} '{raw}': expected YYYY-MM-DD"))
}

pub fn parse_optional_date(raw: Option<&str>, field: &str) -> anyhow::Result<Option<NaiveDate>> {
    raw.map(|value| parse_date(value, field)).transpose()
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(raw: &str, field: &str) -> anyhow::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .with_context(|| format!("invalid {field} '{raw}': expected RFC 3339"))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use planner_core::enums::{EmployeeStatus, ExpenseStatus};
    use pretty_assertions::assert_eq;

    use super::{clearable, parse_date, parse_enum, parse_optional_enum, parse_timestamp};

    #[test]
    fn parses_snake_case_enum() {
        let status: ExpenseStatus = parse_enum("in_review", "status").expect("status should parse");
        assert_eq!(status, ExpenseStatus::InReview);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let status: EmployeeStatus = parse_enum("on-leave", "status").expect("status should parse");
        assert_eq!(status, EmployeeStatus::OnLeave);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<ExpenseStatus>("paid", "status").expect_err("should fail");
        assert!(err.to_string().contains("invalid status 'paid'"));
    }

    #[test]
    fn optional_enum_passes_none_through() {
        let parsed: Option<ExpenseStatus> =
            parse_optional_enum(None, "status").expect("none should parse");
        assert_eq!(parsed, None);
    }

    #[test]
    fn blank_clears_and_text_is_trimmed() {
        assert_eq!(clearable("   "), None);
        assert_eq!(clearable(" Platform "), Some("Platform".to_string()));
    }

    #[test]
    fn parses_dates_and_rejects_other_layouts() {
        assert_eq!(
            parse_date("2026-03-31", "from").expect("date should parse"),
            NaiveDate::from_ymd_opt(2026, 3, 31).expect("valid date")
        );
        let err = parse_date("31/03/2026", "from").expect_err("should fail");
        assert!(err.to_string().contains("invalid from"));
    }

    #[test]
    fn timestamps_are_normalized_to_utc() {
        let ts = parse_timestamp("2026-05-01T12:00:00+02:00", "at").expect("should parse");
        assert_eq!(ts.to_rfc3339(), "2026-05-01T10:00:00+00:00");
    }
}
