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

use anyhow::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;
use vitrine_core::User;

use vitrine_db::repositories::GroupRepository;

/// Decides whether a user may act on a protected resource.
#[async_trait]
pub trait AuthorizationPredicate: Send + Sync {
    /// `resource` names what is being accessed, `roles` the group codes
    /// that grant access to it. Membership lookups can fail; that failure
    /// is the caller's problem, not an implicit deny.
    async fn allows(&self, user: &User, resource: &str, roles: &[&str]) -> Result<bool>;
}

/// Superusers pass unconditionally; everyone else needs membership in one
/// of the named groups.
pub struct AdminGate {
    pool: SqlitePool,
}

impl AdminGate {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorizationPredicate for AdminGate {
    async fn allows(&self, user: &User, resource: &str, roles: &[&str]) -> Result<bool> {
        if user.superuser {
            tracing::debug!(resource = %resource, "Superuser access granted");
            return Ok(true);
        }

        let user_id = match user.id {
            Some(id) => id,
            None => return Ok(false),
        };

        GroupRepository::new(self.pool.clone())
            .is_member_of_any(user_id, roles)
            .await
    }
}
