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

/// A pending password reset. Only the token hash is stored; the plain token
/// lives exclusively in the emailed link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PasswordReset {
    pub email: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
}

impl PasswordReset {
    pub fn new(email: String, token_hash: String) -> Self {
        Self {
            email,
            token_hash,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, ttl_minutes: i64, now: DateTime<Utc>) -> bool {
        now > self.created_at + Duration::minutes(ttl_minutes)
    }
}
