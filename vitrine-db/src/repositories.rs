// Vitrine - storefront content and account glue built with Rust
// Copyright (C) 2025 Vitrine Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

pub mod content_page_repository;
pub mod group_repository;
pub mod password_reset_repository;
pub mod session_repository;
pub mod site_repository;
pub mod user_repository;

pub use content_page_repository::{Cmp, ContentPageRepository, FilterValue, PageFilter};
pub use group_repository::GroupRepository;
pub use password_reset_repository::PasswordResetRepository;
pub use session_repository::SessionRepository;
pub use site_repository::SiteRepository;
pub use user_repository::UserRepository;

/// SQLite stores datetimes either as "YYYY-MM-DD HH:MM:SS" (its own
/// datetime()) or as ISO8601 (values bound through chrono); accept both.
pub(crate) fn parse_datetime(value: &str, column: &str) -> Result<DateTime<Utc>> {
    if value.contains('T') {
        Ok(DateTime::parse_from_rfc3339(value)
            .with_context(|| format!("Failed to parse {} as RFC3339", column))?
            .with_timezone(&Utc))
    } else {
        Ok(
            chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .with_context(|| format!("Failed to parse {} as SQLite format", column))?
                .and_utc(),
        )
    }
}

pub(crate) fn parse_datetime_opt(
    value: Option<&str>,
    column: &str,
) -> Result<Option<DateTime<Utc>>> {
    value.map(|v| parse_datetime(v, column)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_sqlite_format() {
        let dt = parse_datetime("2025-06-01 12:30:00", "created_at").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-06-01T12:30:00+00:00");
    }

    #[test]
    fn test_parse_datetime_rfc3339() {
        let dt = parse_datetime("2025-06-01T12:30:00+02:00", "created_at").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-06-01T10:30:00+00:00");
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(parse_datetime("yesterday", "created_at").is_err());
    }

    #[test]
    fn test_parse_datetime_opt() {
        assert!(parse_datetime_opt(None, "x").unwrap().is_none());
        assert!(parse_datetime_opt(Some("2025-06-01 12:30:00"), "x")
            .unwrap()
            .is_some());
    }
}
