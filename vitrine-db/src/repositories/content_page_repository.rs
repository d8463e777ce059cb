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

//! Content store for CMS pages.
//!
//! Lookups go through a small criteria surface — `filter()`, `add()`,
//! `search()` — so callers state conditions instead of writing SQL. Result
//! order is always ascending id, which is what "first record in store order"
//! means everywhere else in the crate.

use anyhow::{ensure, Context, Result};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use vitrine_core::ContentPage;

use crate::repositories::parse_datetime;

/// Comparison operators accepted by [`PageFilter::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Eq,
    Ne,
}

impl Cmp {
    fn sql(&self) -> &'static str {
        match self {
            Cmp::Eq => " = ",
            Cmp::Ne => " <> ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Int(i64),
    Text(String),
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

/// A conjunction of field conditions. Fields are checked against a whitelist
/// at search time; an unknown key is a query construction error.
#[derive(Debug, Clone, Default)]
pub struct PageFilter {
    conditions: Vec<(String, Cmp, FilterValue)>,
}

impl PageFilter {
    pub fn add(mut self, field: &str, cmp: Cmp, value: impl Into<FilterValue>) -> Self {
        self.conditions.push((field.to_string(), cmp, value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

const FILTERABLE_FIELDS: &[&str] = &["id", "site_id", "path", "title", "status"];

const SELECT_COLUMNS: &str =
    "id, site_id, path, title, body, status, created_at, updated_at";

type PageRow = (i64, i64, String, String, String, i64, String, String);

pub struct ContentPageRepository {
    pool: SqlitePool,
}

impl ContentPageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Start an empty criteria object for [`search`](Self::search).
    pub fn filter(&self) -> PageFilter {
        PageFilter::default()
    }

    /// Execute a criteria query. Matching is exact and case-sensitive; the
    /// result is ordered by ascending id.
    pub async fn search(&self, filter: &PageFilter) -> Result<Vec<ContentPage>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM cms_pages",
            SELECT_COLUMNS
        ));

        for (i, (field, cmp, value)) in filter.conditions.iter().enumerate() {
            ensure!(
                FILTERABLE_FIELDS.contains(&field.as_str()),
                "Unknown filter key: {}",
                field
            );

            qb.push(if i == 0 { " WHERE " } else { " AND " });
            qb.push(field.as_str());
            qb.push(cmp.sql());
            match value {
                FilterValue::Int(v) => qb.push_bind(*v),
                FilterValue::Text(s) => qb.push_bind(s.clone()),
            };
        }

        qb.push(" ORDER BY id ASC");

        let rows: Vec<PageRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .context("Failed to search cms_pages")?;

        rows.into_iter().map(row_to_page).collect()
    }

    pub async fn create(&self, page: &ContentPage) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO cms_pages (site_id, path, title, body, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(page.site_id)
        .bind(&page.path)
        .bind(&page.title)
        .bind(&page.body)
        .bind(page.status)
        .bind(page.created_at)
        .bind(page.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to create cms page")?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ContentPage>> {
        let row: Option<PageRow> = sqlx::query_as(&format!(
            "SELECT {} FROM cms_pages WHERE id = ?",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find cms page by id")?;

        row.map(row_to_page).transpose()
    }

    pub async fn update(&self, page: &ContentPage) -> Result<()> {
        let id = page.id.context("Cannot update a page without an id")?;

        sqlx::query(
            r#"
            UPDATE cms_pages
            SET path = ?, title = ?, body = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&page.path)
        .bind(&page.title)
        .bind(&page.body)
        .bind(page.status)
        .bind(chrono::Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update cms page")?;

        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM cms_pages WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete cms page")?;

        Ok(())
    }
}

fn row_to_page(row: PageRow) -> Result<ContentPage> {
    let (id, site_id, path, title, body, status, created_at, updated_at) = row;

    Ok(ContentPage {
        id: Some(id),
        site_id,
        path,
        title,
        body,
        status,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::ensure_schema;
    use pretty_assertions::assert_eq;

    async fn seed_page(
        repo: &ContentPageRepository,
        site_id: i64,
        path: &str,
        title: &str,
    ) -> Result<i64> {
        repo.create(&ContentPage::new(site_id, path.to_string(), title.to_string()))
            .await
    }

    #[sqlx::test]
    async fn test_search_exact_path_hit(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let repo = ContentPageRepository::new(pool);
        let id = seed_page(&repo, 1, "about-us", "About us").await?;

        let filter = repo.filter().add("path", Cmp::Eq, "about-us");
        let found = repo.search(&filter).await?;

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, Some(id));
        assert_eq!(found[0].path, "about-us");

        Ok(())
    }

    #[sqlx::test]
    async fn test_search_miss_returns_empty(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let repo = ContentPageRepository::new(pool);

        let filter = repo.filter().add("path", Cmp::Eq, "about-us");
        assert!(repo.search(&filter).await?.is_empty());

        Ok(())
    }

    #[sqlx::test]
    async fn test_search_is_case_sensitive(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let repo = ContentPageRepository::new(pool);
        seed_page(&repo, 1, "About-Us", "About us").await?;

        let filter = repo.filter().add("path", Cmp::Eq, "about-us");
        assert!(repo.search(&filter).await?.is_empty());

        let filter = repo.filter().add("path", Cmp::Eq, "About-Us");
        assert_eq!(repo.search(&filter).await?.len(), 1);

        Ok(())
    }

    #[sqlx::test]
    async fn test_search_duplicates_ordered_by_id(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let repo = ContentPageRepository::new(pool);
        let first = seed_page(&repo, 1, "dup", "First").await?;
        let second = seed_page(&repo, 1, "dup", "Second").await?;

        let filter = repo.filter().add("path", Cmp::Eq, "dup");
        let found = repo.search(&filter).await?;

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, Some(first));
        assert_eq!(found[1].id, Some(second));

        Ok(())
    }

    #[sqlx::test]
    async fn test_search_scopes_by_site(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let repo = ContentPageRepository::new(pool);
        seed_page(&repo, 1, "about-us", "Site one").await?;
        seed_page(&repo, 2, "about-us", "Site two").await?;

        let filter = repo
            .filter()
            .add("site_id", Cmp::Eq, 2)
            .add("path", Cmp::Eq, "about-us");
        let found = repo.search(&filter).await?;

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Site two");

        Ok(())
    }

    #[sqlx::test]
    async fn test_search_empty_path_is_a_literal(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let repo = ContentPageRepository::new(pool);
        seed_page(&repo, 1, "", "Home").await?;

        let filter = repo.filter().add("path", Cmp::Eq, "");
        let found = repo.search(&filter).await?;

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Home");

        Ok(())
    }

    #[sqlx::test]
    async fn test_search_ne_operator(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let repo = ContentPageRepository::new(pool);
        seed_page(&repo, 1, "a", "A").await?;
        seed_page(&repo, 1, "b", "B").await?;

        let filter = repo.filter().add("path", Cmp::Ne, "a");
        let found = repo.search(&filter).await?;

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, "b");

        Ok(())
    }

    #[sqlx::test]
    async fn test_search_unknown_key_is_an_error(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let repo = ContentPageRepository::new(pool);

        let filter = repo.filter().add("body; DROP TABLE cms_pages", Cmp::Eq, "x");
        assert!(repo.search(&filter).await.is_err());

        Ok(())
    }

    #[sqlx::test]
    async fn test_search_empty_filter_lists_all(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let repo = ContentPageRepository::new(pool);
        seed_page(&repo, 1, "a", "A").await?;
        seed_page(&repo, 1, "b", "B").await?;

        let filter = repo.filter();
        assert!(filter.is_empty());
        assert_eq!(repo.search(&filter).await?.len(), 2);

        Ok(())
    }

    #[sqlx::test]
    async fn test_find_by_id_round_trip(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let repo = ContentPageRepository::new(pool);
        let id = seed_page(&repo, 1, "faq", "FAQ").await?;

        let found = repo.find_by_id(id).await?.expect("page should exist");
        assert_eq!(found.path, "faq");
        assert_eq!(found.title, "FAQ");

        assert!(repo.find_by_id(id + 1000).await?.is_none());

        Ok(())
    }

    #[sqlx::test]
    async fn test_update_and_delete(pool: SqlitePool) -> Result<()> {
        ensure_schema(&pool).await?;
        let repo = ContentPageRepository::new(pool);
        let id = seed_page(&repo, 1, "faq", "FAQ").await?;

        let mut page = repo.find_by_id(id).await?.expect("page should exist");
        page.title = "Questions".to_string();
        page.body = "<p>Answers</p>".to_string();
        repo.update(&page).await?;

        let updated = repo.find_by_id(id).await?.expect("page should exist");
        assert_eq!(updated.title, "Questions");
        assert_eq!(updated.body, "<p>Answers</p>");

        repo.delete(id).await?;
        assert!(repo.find_by_id(id).await?.is_none());

        Ok(())
    }
}
