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

/// The locale "site item" carried into every rendered view: shop code,
/// display label and branding assets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Site {
    pub id: Option<i64>,
    pub code: String,
    pub label: String,
    pub logo_url: Option<String>,
    pub icon_url: Option<String>,
    pub theme: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Site {
    pub fn new(code: String, label: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            code,
            label,
            logo_url: None,
            icon_url: None,
            theme: "default".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Default site item used when the current locale context cannot supply
    /// one. Views always receive a site item, even before any site exists.
    pub fn fallback() -> Self {
        Self::new("default".to_string(), String::new())
    }

    pub fn validate_code(code: &str) -> Result<(), String> {
        if code.is_empty() {
            return Err("Site code cannot be empty".to_string());
        }

        if code.len() > 32 {
            return Err("Site code cannot exceed 32 characters".to_string());
        }

        if !code
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(
                "Site code may only contain lowercase letters, digits and hyphens".to_string(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_site() {
        let site = Site::new("b2c".to_string(), "Main store".to_string());

        assert!(site.id.is_none());
        assert_eq!(site.code, "b2c");
        assert_eq!(site.label, "Main store");
        assert!(site.logo_url.is_none());
        assert_eq!(site.theme, "default");
    }

    #[test]
    fn test_fallback_site_has_no_id() {
        let site = Site::fallback();
        assert!(site.id.is_none());
        assert_eq!(site.code, "default");
        assert_eq!(site.label, "");
    }

    #[test]
    fn test_validate_code() {
        assert!(Site::validate_code("default").is_ok());
        assert!(Site::validate_code("shop-2").is_ok());

        assert!(Site::validate_code("").is_err());
        assert!(Site::validate_code("Shop").is_err());
        assert!(Site::validate_code("sh op").is_err());
        assert!(Site::validate_code(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut site = Site::new("default".to_string(), "Store".to_string());
        site.logo_url = Some("/media/logo.svg".to_string());

        let json = serde_json::to_string(&site).unwrap();
        let back: Site = serde_json::from_str(&json).unwrap();
        assert_eq!(site, back);
    }
}
