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
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use vitrine_core::{Group, GroupMember};

use crate::repositories::parse_datetime;

pub struct GroupRepository {
    pool: SqlitePool,
}

impl GroupRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, group: &Group) -> Result<i64> {
        let result = sqlx::query("INSERT INTO groups (code, label, created_at) VALUES (?, ?, ?)")
            .bind(&group.code)
            .bind(&group.label)
            .bind(group.created_at)
            .execute(&self.pool)
            .await
            .context("Failed to create group")?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<Group>> {
        let row: Option<(i64, String, String, String)> =
            sqlx::query_as("SELECT id, code, label, created_at FROM groups WHERE code = ?")
                .bind(code)
                .fetch_optional(&self.pool)
                .await
                .context("Failed to find group by code")?;

        match row {
            Some((id, code, label, created_at)) => Ok(Some(Group {
                id: Some(id),
                code,
                label,
                created_at: parse_datetime(&created_at, "created_at")?,
            })),
            None => Ok(None),
        }
    }

    pub async fn add_member(&self, member: &GroupMember) -> Result<()> {
        sqlx::query("INSERT INTO user_groups (user_id, group_id, created_at) VALUES (?, ?, ?)")
            .bind(member.user_id)
            .bind(member.group_id)
            .bind(member.created_at)
            .execute(&self.pool)
            .await
            .context("Failed to add group member")?;

        Ok(())
    }

    /// The membership question the authorization gate asks: does this user
    /// belong to any group with one of these codes?
    pub async fn is_member_of_any(&self, user_id: i64, codes: &[&str]) -> Result<bool> {
        if codes.is_empty() {
            return Ok(false);
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT COUNT(*)
            FROM user_groups ug
            JOIN groups g ON g.id = ug.group_id
            WHERE ug.user_id =
            "#,
        );
        qb.push_bind(user_id);
        qb.push(" AND g.code IN (");
        let mut separated = qb.separated(", ");
        for code in codes {
            separated.push_bind(*code);
        }
        separated.push_unseparated(")");

        let (count,): (i64,) = qb
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .context("Failed to check group membership")?;

        Ok(count > 0)
    }

    pub async fn list_codes_for_user(&self, user_id: i64) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT g.code
            FROM user_groups ug
            JOIN groups g ON g.id = ug.group_id
            WHERE ug.user_id = ?
            ORDER BY g.code
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list group codes for user")?;

        Ok(rows.into_iter().map(|(code,)| code).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::ensure_schema;
    use crate::repositories::UserRepository;
    use pretty_assertions::assert_eq;
    use vitrine_core::User;

    async fn seed_user(pool: &SqlitePool, email: &str) -> Result<i64> {
        let repo = UserRepository::new(pool.clone());
        repo.create(&User::new(email.to_string(), "password123")?)
            .await
    }

    #[sqlx::test]
    async fn test_create_and_find_by_code(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let repo = GroupRepository::new(pool);

        let id = repo
            .create(&Group::new("admin".to_string(), "Administrators".to_string()))
            .await?;

        let found = repo.find_by_code("admin").await?.expect("group exists");
        assert_eq!(found.id, Some(id));
        assert_eq!(found.label, "Administrators");

        assert!(repo.find_by_code("editor").await?.is_none());

        Ok(())
    }

    #[sqlx::test]
    async fn test_is_member_of_any(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let groups = GroupRepository::new(pool.clone());

        let user_id = seed_user(&pool, "test@example.com").await?;
        let admin_id = groups
            .create(&Group::new("admin".to_string(), "Administrators".to_string()))
            .await?;
        groups
            .create(&Group::new("editor".to_string(), "Editors".to_string()))
            .await?;

        groups.add_member(&GroupMember::new(user_id, admin_id)).await?;

        assert!(groups.is_member_of_any(user_id, &["admin"]).await?);
        assert!(groups.is_member_of_any(user_id, &["editor", "admin"]).await?);
        assert!(!groups.is_member_of_any(user_id, &["editor"]).await?);

        Ok(())
    }

    #[sqlx::test]
    async fn test_is_member_of_any_empty_roles(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let groups = GroupRepository::new(pool.clone());

        let user_id = seed_user(&pool, "test@example.com").await?;
        assert!(!groups.is_member_of_any(user_id, &[]).await?);

        Ok(())
    }

    #[sqlx::test]
    async fn test_duplicate_membership_fails(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let groups = GroupRepository::new(pool.clone());

        let user_id = seed_user(&pool, "test@example.com").await?;
        let group_id = groups
            .create(&Group::new("admin".to_string(), "Administrators".to_string()))
            .await?;

        let member = GroupMember::new(user_id, group_id);
        groups.add_member(&member).await?;
        assert!(groups.add_member(&member).await.is_err());

        Ok(())
    }

    #[sqlx::test]
    async fn test_list_codes_for_user(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let groups = GroupRepository::new(pool.clone());

        let user_id = seed_user(&pool, "test@example.com").await?;
        let admin_id = groups
            .create(&Group::new("admin".to_string(), "Administrators".to_string()))
            .await?;
        let editor_id = groups
            .create(&Group::new("editor".to_string(), "Editors".to_string()))
            .await?;
        groups.add_member(&GroupMember::new(user_id, editor_id)).await?;
        groups.add_member(&GroupMember::new(user_id, admin_id)).await?;

        let codes = groups.list_codes_for_user(user_id).await?;
        assert_eq!(codes, vec!["admin".to_string(), "editor".to_string()]);

        Ok(())
    }
}
