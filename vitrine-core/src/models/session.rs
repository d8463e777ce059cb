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

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session with default expiration (24 hours)
    pub fn new(user_id: i64) -> Self {
        Self::new_with_expiry(user_id, Duration::hours(24))
    }

    /// Create a new session with custom expiration
    pub fn new_with_expiry(user_id: i64, expiry_duration: Duration) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            expires_at: now + expiry_duration,
            created_at: now,
        }
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = Session::new(123);

        assert_eq!(session.id.len(), 36);
        assert!(Uuid::parse_str(&session.id).is_ok());
        assert_eq!(session.user_id, 123);
        assert!(session.expires_at > session.created_at);
        assert!(!session.is_expired());
    }

    #[test]
    fn test_sessions_have_unique_ids() {
        let a = Session::new(1);
        let b = Session::new(1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_new_with_expiry() {
        let session = Session::new_with_expiry(1, Duration::minutes(5));
        let expected = session.created_at + Duration::minutes(5);
        assert_eq!(session.expires_at, expected);
    }

    #[test]
    fn test_is_expired() {
        let session = Session::new_with_expiry(1, Duration::seconds(-1));
        assert!(session.is_expired());
    }
}
