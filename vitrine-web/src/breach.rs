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

//! Compromised-password lookup.
//!
//! The live implementation queries the Pwned Passwords range API with
//! k-anonymity: only the first five characters of the SHA-1 digest leave
//! the process, and the response is scanned locally for the remainder.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sha1::{Digest, Sha1};
use std::collections::HashSet;

const RANGE_API: &str = "https://api.pwnedpasswords.com/range";

#[async_trait]
pub trait BreachChecker: Send + Sync {
    /// Errors mean "could not check", not "not compromised"; callers decide
    /// whether that fails open or closed.
    async fn is_compromised(&self, password: &str) -> Result<bool>;
}

/// Splits a password's SHA-1 digest into the 5-character range prefix and
/// the 35-character suffix the API reports matches by.
fn range_parts(password: &str) -> (String, String) {
    let digest = hex::encode_upper(Sha1::digest(password.as_bytes()));
    let (prefix, suffix) = digest.split_at(5);
    (prefix.to_string(), suffix.to_string())
}

pub struct HibpChecker {
    client: reqwest::Client,
}

impl HibpChecker {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HibpChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BreachChecker for HibpChecker {
    async fn is_compromised(&self, password: &str) -> Result<bool> {
        let (prefix, suffix) = range_parts(password);

        let body = self
            .client
            .get(format!("{}/{}", RANGE_API, prefix))
            .send()
            .await
            .context("Breach range request failed")?
            .error_for_status()
            .context("Breach range request was rejected")?
            .text()
            .await
            .context("Failed to read breach range response")?;

        // Each line is "SUFFIX:COUNT"
        let hit = body
            .lines()
            .filter_map(|line| line.split(':').next())
            .any(|candidate| candidate.trim() == suffix);

        Ok(hit)
    }
}

/// An in-memory breach list for tests and development.
pub struct StaticBreachList {
    passwords: HashSet<String>,
}

impl StaticBreachList {
    pub fn new(passwords: impl IntoIterator<Item = String>) -> Self {
        Self {
            passwords: passwords.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            passwords: HashSet::new(),
        }
    }
}

#[async_trait]
impl BreachChecker for StaticBreachList {
    async fn is_compromised(&self, password: &str) -> Result<bool> {
        Ok(self.passwords.contains(password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_range_parts() {
        let (prefix, suffix) = range_parts("password123");

        assert_eq!(prefix, "CBFDA");
        assert_eq!(suffix, "C6008F9CAB4083784CBD1874F76618D2A97");
        assert_eq!(prefix.len(), 5);
        assert_eq!(suffix.len(), 35);
    }

    #[tokio::test]
    async fn test_static_breach_list() -> Result<()> {
        let list = StaticBreachList::new(["password123".to_string()]);

        assert!(list.is_compromised("password123").await?);
        assert!(!list.is_compromised("S0methingRare!").await?);

        assert!(!StaticBreachList::empty().is_compromised("password123").await?);

        Ok(())
    }
}
