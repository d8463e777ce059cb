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

/// A CMS content record addressed by its stored `path`.
///
/// Paths share a URL namespace with catalog routes, so nothing here assumes
/// uniqueness: lookups match by exact string equality and take the first
/// record in store order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentPage {
    pub id: Option<i64>,
    pub site_id: i64,
    pub path: String,
    pub title: String,
    pub body: String,
    pub status: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentPage {
    pub fn new(site_id: i64, path: String, title: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            site_id,
            path,
            title,
            body: String::new(),
            status: 1,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.status > 0
    }

    /// Validate a path for authoring. Lookup itself never normalizes or
    /// rejects anything; this only guards what editors are allowed to store.
    pub fn validate_path(path: &str) -> Result<(), String> {
        if path.len() > 255 {
            return Err("Path cannot exceed 255 characters".to_string());
        }

        if path.contains(' ') {
            return Err("Path cannot contain spaces".to_string());
        }

        if path.starts_with('/') || path.ends_with('/') {
            return Err("Path cannot start or end with a slash".to_string());
        }

        if path.contains("//") {
            return Err("Path cannot contain empty segments".to_string());
        }

        Ok(())
    }

    pub fn is_valid(&self) -> Result<(), String> {
        Self::validate_path(&self.path)?;

        if self.title.is_empty() {
            return Err("Title cannot be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_content_page() {
        let page = ContentPage::new(1, "about-us".to_string(), "About us".to_string());

        assert!(page.id.is_none());
        assert_eq!(page.site_id, 1);
        assert_eq!(page.path, "about-us");
        assert_eq!(page.title, "About us");
        assert_eq!(page.body, "");
        assert_eq!(page.status, 1);
        assert_eq!(page.created_at, page.updated_at);
    }

    #[test]
    fn test_is_enabled() {
        let mut page = ContentPage::new(1, "p".to_string(), "P".to_string());
        assert!(page.is_enabled());

        page.status = 0;
        assert!(!page.is_enabled());
    }

    #[test]
    fn test_validate_path_accepts_nested_and_empty() {
        assert!(ContentPage::validate_path("about-us").is_ok());
        assert!(ContentPage::validate_path("legal/terms").is_ok());
        // The empty path is a legal literal; the root page may be stored as "".
        assert!(ContentPage::validate_path("").is_ok());
    }

    #[test]
    fn test_validate_path_rejects_malformed() {
        assert!(ContentPage::validate_path("/about-us").is_err());
        assert!(ContentPage::validate_path("about-us/").is_err());
        assert!(ContentPage::validate_path("about us").is_err());
        assert!(ContentPage::validate_path("a//b").is_err());
        assert!(ContentPage::validate_path(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_is_valid_requires_title() {
        let mut page = ContentPage::new(1, "about-us".to_string(), "About".to_string());
        assert!(page.is_valid().is_ok());

        page.title = String::new();
        assert!(page.is_valid().is_err());
    }

    #[test]
    fn test_serialization_round_trip() {
        let page = ContentPage::new(2, "faq".to_string(), "FAQ".to_string());
        let json = serde_json::to_string(&page).unwrap();
        let back: ContentPage = serde_json::from_str(&json).unwrap();
        assert_eq!(page, back);
    }
}
