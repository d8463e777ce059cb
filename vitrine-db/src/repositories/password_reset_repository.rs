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
use vitrine_core::PasswordReset;

use crate::repositories::parse_datetime;

/// One pending reset per email: upserting replaces any previous token.
pub struct PasswordResetRepository {
    pool: SqlitePool,
}

impl PasswordResetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, reset: &PasswordReset) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO password_resets (email, token_hash, created_at) VALUES (?, ?, ?)",
        )
        .bind(&reset.email)
        .bind(&reset.token_hash)
        .bind(reset.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to upsert password reset")?;

        Ok(())
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<PasswordReset>> {
        let row: Option<(String, String, String)> = sqlx::query_as(
            "SELECT email, token_hash, created_at FROM password_resets WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find password reset")?;

        match row {
            Some((email, token_hash, created_at)) => Ok(Some(PasswordReset {
                email,
                token_hash,
                created_at: parse_datetime(&created_at, "created_at")?,
            })),
            None => Ok(None),
        }
    }

    pub async fn delete(&self, email: &str) -> Result<()> {
        sqlx::query("DELETE FROM password_resets WHERE email = ?")
            .bind(email)
            .execute(&self.pool)
            .await
            .context("Failed to delete password reset")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::ensure_schema;
    use pretty_assertions::assert_eq;

    #[sqlx::test]
    async fn test_upsert_and_find(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let repo = PasswordResetRepository::new(pool);

        let reset = PasswordReset::new("test@example.com".to_string(), "hash-a".to_string());
        repo.upsert(&reset).await?;

        let found = repo
            .find_by_email("test@example.com")
            .await?
            .expect("reset exists");
        assert_eq!(found.token_hash, "hash-a");

        Ok(())
    }

    #[sqlx::test]
    async fn test_upsert_replaces_previous_token(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let repo = PasswordResetRepository::new(pool);

        repo.upsert(&PasswordReset::new(
            "test@example.com".to_string(),
            "hash-a".to_string(),
        ))
        .await?;
        repo.upsert(&PasswordReset::new(
            "test@example.com".to_string(),
            "hash-b".to_string(),
        ))
        .await?;

        let found = repo
            .find_by_email("test@example.com")
            .await?
            .expect("reset exists");
        assert_eq!(found.token_hash, "hash-b");

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM password_resets")
            .fetch_one(&repo.pool)
            .await?;
        assert_eq!(count, 1);

        Ok(())
    }

    #[sqlx::test]
    async fn test_delete(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let repo = PasswordResetRepository::new(pool);

        repo.upsert(&PasswordReset::new(
            "test@example.com".to_string(),
            "hash-a".to_string(),
        ))
        .await?;
        repo.delete("test@example.com").await?;

        assert!(repo.find_by_email("test@example.com").await?.is_none());

        Ok(())
    }

    #[sqlx::test]
    async fn test_find_miss(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let repo = PasswordResetRepository::new(pool);

        assert!(repo.find_by_email("nobody@example.com").await?.is_none());

        Ok(())
    }
}
