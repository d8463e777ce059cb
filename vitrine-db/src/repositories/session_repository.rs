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
use sqlx::SqlitePool;
use vitrine_core::Session;

use crate::repositories::parse_datetime;

pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, session: &Session) -> Result<()> {
        sqlx::query(
            "INSERT INTO sessions (id, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.id)
        .bind(session.user_id)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create session")?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Session>> {
        let row: Option<(String, i64, String, String)> = sqlx::query_as(
            "SELECT id, user_id, expires_at, created_at FROM sessions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find session by id")?;

        match row {
            Some((id, user_id, expires_at, created_at)) => Ok(Some(Session {
                id,
                user_id,
                expires_at: parse_datetime(&expires_at, "expires_at")?,
                created_at: parse_datetime(&created_at, "created_at")?,
            })),
            None => Ok(None),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete session")?;

        Ok(())
    }

    pub async fn delete_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < datetime('now')")
            .execute(&self.pool)
            .await
            .context("Failed to delete expired sessions")?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::ensure_schema;
    use crate::repositories::UserRepository;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use vitrine_core::User;

    async fn seed_user(pool: &SqlitePool) -> Result<i64> {
        let repo = UserRepository::new(pool.clone());
        repo.create(&User::new("test@example.com".to_string(), "password123")?)
            .await
    }

    #[sqlx::test]
    async fn test_create_and_find(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let user_id = seed_user(&pool).await?;
        let repo = SessionRepository::new(pool);

        let session = Session::new(user_id);
        repo.create(&session).await?;

        let found = repo.find_by_id(&session.id).await?.expect("session exists");
        assert_eq!(found.user_id, user_id);
        assert!(!found.is_expired());

        Ok(())
    }

    #[sqlx::test]
    async fn test_find_miss(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let repo = SessionRepository::new(pool);

        assert!(repo.find_by_id("no-such-session").await?.is_none());

        Ok(())
    }

    #[sqlx::test]
    async fn test_delete(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let user_id = seed_user(&pool).await?;
        let repo = SessionRepository::new(pool);

        let session = Session::new(user_id);
        repo.create(&session).await?;
        repo.delete(&session.id).await?;

        assert!(repo.find_by_id(&session.id).await?.is_none());

        Ok(())
    }

    #[sqlx::test]
    async fn test_delete_expired(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let user_id = seed_user(&pool).await?;
        let repo = SessionRepository::new(pool);

        let stale = Session::new_with_expiry(user_id, Duration::hours(-1));
        let fresh = Session::new(user_id);
        repo.create(&stale).await?;
        repo.create(&fresh).await?;

        let removed = repo.delete_expired().await?;
        assert_eq!(removed, 1);
        assert!(repo.find_by_id(&stale.id).await?.is_none());
        assert!(repo.find_by_id(&fresh.id).await?.is_some());

        Ok(())
    }
}
