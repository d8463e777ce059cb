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

//! Content path resolution.
//!
//! A [`PathResolver`] answers "is there content at this path?" for one
//! content source. Resolvers are registered under a name in a
//! [`ResolverRegistry`] and consulted in registration order; the first hit
//! wins. A resolver never raises: any store fault during lookup is logged
//! and reported as "no content here", so a broken content source degrades
//! into 404s instead of 500s.

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use vitrine_core::{ContentPage, Site};

use vitrine_db::repositories::{Cmp, ContentPageRepository};

/// Everything a resolver needs, passed explicitly per request.
#[derive(Clone)]
pub struct RequestContext {
    pub db: SqlitePool,
    pub site: Site,
    pub locale: String,
}

#[async_trait]
pub trait PathResolver: Send + Sync {
    /// Look up `path`. `None` means both "no such content" and "the lookup
    /// failed"; the distinction is deliberately invisible to callers.
    async fn resolve(&self, ctx: &RequestContext, path: &str) -> Option<ContentPage>;
}

/// Named resolvers, consulted in registration order.
pub struct ResolverRegistry {
    resolvers: Vec<(String, Arc<dyn PathResolver>)>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// The registry every deployment starts from: the CMS page source.
    pub fn build_default() -> Self {
        let mut registry = Self::new();
        registry.register("cms", Arc::new(CmsPathResolver));
        registry
    }

    pub fn register(&mut self, name: &str, resolver: Arc<dyn PathResolver>) {
        self.resolvers.push((name.to_string(), resolver));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn PathResolver>> {
        self.resolvers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }

    /// Ask every resolver in order; the first hit wins.
    pub async fn resolve_first(&self, ctx: &RequestContext, path: &str) -> Option<ContentPage> {
        for (name, resolver) in &self.resolvers {
            if let Some(page) = resolver.resolve(ctx, path).await {
                tracing::debug!(resolver = %name, path = %path, "Path resolved");
                return Some(page);
            }
        }
        None
    }
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves paths against the CMS page store. Matching is exact and
/// case-sensitive; when several pages share a path the first record in
/// store order (lowest id) wins.
pub struct CmsPathResolver;

impl CmsPathResolver {
    async fn lookup(&self, ctx: &RequestContext, path: &str) -> anyhow::Result<Option<ContentPage>> {
        let site_id = match ctx.site.id {
            Some(id) => id,
            // A constructed fallback site has no rows to match
            None => return Ok(None),
        };

        let repo = ContentPageRepository::new(ctx.db.clone());
        let filter = repo
            .filter()
            .add("site_id", Cmp::Eq, site_id)
            .add("path", Cmp::Eq, path);

        let pages = repo.search(&filter).await?;
        Ok(pages.into_iter().next())
    }
}

#[async_trait]
impl PathResolver for CmsPathResolver {
    async fn resolve(&self, ctx: &RequestContext, path: &str) -> Option<ContentPage> {
        match self.lookup(ctx, path).await {
            Ok(page) => page,
            Err(e) => {
                tracing::debug!(path = %path, error = ?e, "Content lookup failed, treating as no content");
                None
            }
        }
    }
}
