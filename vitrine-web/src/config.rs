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
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub templates_dir: String,
    /// Absolute base for generated links (reset and verification URLs).
    pub base_url: String,
    /// Secret keying the signed-URL HMAC.
    pub app_key: String,
    pub production: bool,
    /// Carry an explicit locale parameter in verification links.
    pub multi_locale: bool,
    /// Carry an explicit site parameter in verification links.
    pub multi_site: bool,
    pub self_registration: bool,
    pub default_site: String,
    pub default_locale: String,
    pub verification_expire_minutes: i64,
    pub reset_token_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:vitrine.db".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("Invalid PORT")?,
            templates_dir: env::var("TEMPLATES_DIR").unwrap_or_else(|_| "templates".to_string()),
            base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            app_key: env::var("APP_KEY").unwrap_or_else(|_| {
                // Generate a random secret for development; production must
                // set APP_KEY or verification links break across restarts
                uuid::Uuid::new_v4().to_string()
            }),
            production: env::var("APP_ENV")
                .map(|v| v == "production")
                .unwrap_or(false),
            multi_locale: env_flag("SHOP_MULTILOCALE"),
            multi_site: env_flag("SHOP_MULTISHOP"),
            self_registration: env_flag("SHOP_REGISTRATION"),
            default_site: env::var("DEFAULT_SITE").unwrap_or_else(|_| "default".to_string()),
            default_locale: env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "en".to_string()),
            verification_expire_minutes: env::var("VERIFICATION_EXPIRE_MINUTES")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("Invalid VERIFICATION_EXPIRE_MINUTES")?,
            reset_token_ttl_minutes: env::var("RESET_TOKEN_TTL_MINUTES")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("Invalid RESET_TOKEN_TTL_MINUTES")?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

impl Config {
    /// A config suitable for tests: in-memory database, throwaway secret.
    pub fn for_tests(templates_dir: &str) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            host: "localhost".to_string(),
            port: 3000,
            templates_dir: templates_dir.to_string(),
            base_url: "http://localhost:3000".to_string(),
            app_key: "test-secret".to_string(),
            production: false,
            multi_locale: false,
            multi_site: false,
            self_registration: false,
            default_site: "default".to_string(),
            default_locale: "en".to_string(),
            verification_expire_minutes: 60,
            reset_token_ttl_minutes: 60,
        }
    }
}
