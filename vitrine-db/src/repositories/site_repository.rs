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
use vitrine_core::Site;

use crate::repositories::parse_datetime;

const SELECT_COLUMNS: &str = "id, code, label, logo_url, icon_url, theme, created_at, updated_at";

type SiteRow = (
    i64,
    String,
    String,
    Option<String>,
    Option<String>,
    String,
    String,
    String,
);

pub struct SiteRepository {
    pool: SqlitePool,
}

impl SiteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, site: &Site) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO sites (code, label, logo_url, icon_url, theme, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&site.code)
        .bind(&site.label)
        .bind(&site.logo_url)
        .bind(&site.icon_url)
        .bind(&site.theme)
        .bind(site.created_at)
        .bind(site.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to create site")?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<Site>> {
        let row: Option<SiteRow> = sqlx::query_as(&format!(
            "SELECT {} FROM sites WHERE code = ?",
            SELECT_COLUMNS
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find site by code")?;

        row.map(row_to_site).transpose()
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Site>> {
        let row: Option<SiteRow> = sqlx::query_as(&format!(
            "SELECT {} FROM sites WHERE id = ?",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find site by id")?;

        row.map(row_to_site).transpose()
    }
}

fn row_to_site(row: SiteRow) -> Result<Site> {
    let (id, code, label, logo_url, icon_url, theme, created_at, updated_at) = row;

    Ok(Site {
        id: Some(id),
        code,
        label,
        logo_url,
        icon_url,
        theme,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}
