//! SQLite deserialization helpers for row conversion functions.
//!
//! Rows written by older frontends store a missing parent as the string
//! `"NULL"` instead of SQL `NULL`. Both (and the empty string) are read back
//! as `None`; writes always use SQL `NULL`.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use cyoa_domain::DomainError;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite};

use crate::infrastructure::ports::RepoError;

/// Extension trait for SQLite rows with errors mapped to `RepoError`.
pub(super) trait RowExt {
    fn read<'r, T>(&'r self, name: &str) -> Result<T, RepoError>
    where
        T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>;

    fn get_id<I>(&self, name: &str) -> Result<I, RepoError>
    where
        I: FromStr<Err = DomainError>,
    {
        let raw: String = self.read(name)?;
        raw.parse().map_err(RepoError::serialization)
    }

    fn get_parent_id<I>(&self, name: &str) -> Result<Option<I>, RepoError>
    where
        I: FromStr<Err = DomainError>,
    {
        parse_parent(self.read(name)?)
    }

    /// Integer flags; any non-zero value is true.
    fn get_flag(&self, name: &str) -> Result<bool, RepoError> {
        let raw: i64 = self.read(name)?;
        Ok(raw != 0)
    }

    fn get_datetime(&self, name: &str) -> Result<DateTime<Utc>, RepoError> {
        let raw: String = self.read(name)?;
        parse_datetime(&raw)
    }

    fn get_opt_datetime(&self, name: &str) -> Result<Option<DateTime<Utc>>, RepoError> {
        let raw: Option<String> = self.read(name)?;
        raw.as_deref().map(parse_datetime).transpose()
    }
}

impl RowExt for SqliteRow {
    fn read<'r, T>(&'r self, name: &str) -> Result<T, RepoError>
    where
        T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
    {
        self.try_get(name)
            .map_err(|e| RepoError::serialization(format!("column {}: {}", name, e)))
    }
}

/// Normalize a stored parent reference.
pub(super) fn parse_parent<I>(raw: Option<String>) -> Result<Option<I>, RepoError>
where
    I: FromStr<Err = DomainError>,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("NULL") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(RepoError::serialization),
    }
}

pub(super) fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::serialization(format!("timestamp '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyoa_domain::ChoiceId;

    #[test]
    fn null_sentinels_normalize_to_none() {
        for raw in [None, Some(""), Some("NULL"), Some("null"), Some("  NULL ")] {
            let parsed: Option<ChoiceId> = parse_parent(raw.map(str::to_string)).unwrap();
            assert!(parsed.is_none(), "{:?} should be a root", raw);
        }
    }

    #[test]
    fn real_parent_is_parsed() {
        let id = ChoiceId::new();
        let parsed: Option<ChoiceId> = parse_parent(Some(id.to_string())).unwrap();
        assert_eq!(parsed, Some(id));
    }

    #[test]
    fn garbage_parent_is_a_serialization_error() {
        let err = parse_parent::<ChoiceId>(Some("choice-7".to_string())).unwrap_err();
        assert!(matches!(err, RepoError::Serialization(_)));
    }

    #[test]
    fn timestamps_are_normalized_to_utc() {
        let parsed = parse_datetime("2024-05-01T12:00:00+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-05-01T10:00:00+00:00");
        assert!(parse_datetime("yesterday").is_err());
    }
}
