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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named permission group. The authorization gate asks whether a user
/// belongs to any of a set of group codes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    pub id: Option<i64>,
    pub code: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn new(code: String, label: String) -> Self {
        Self {
            id: None,
            code,
            label,
            created_at: Utc::now(),
        }
    }

    pub fn validate_code(code: &str) -> Result<(), String> {
        if code.is_empty() {
            return Err("Group code cannot be empty".to_string());
        }

        if code.len() > 64 {
            return Err("Group code cannot exceed 64 characters".to_string());
        }

        if !code
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(
                "Group code may only contain lowercase letters, digits, hyphens and underscores"
                    .to_string(),
            );
        }

        Ok(())
    }
}

/// A user's membership in a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupMember {
    pub user_id: i64,
    pub group_id: i64,
    pub created_at: DateTime<Utc>,
}

impl GroupMember {
    pub fn new(user_id: i64, group_id: i64) -> Self {
        Self {
            user_id,
            group_id,
            created_at: Utc::now(),
        }
    }
}
