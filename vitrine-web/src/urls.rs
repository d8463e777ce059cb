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

//! Outbound link construction for account emails.
//!
//! Reset links are plain routes carrying a one-time token. Verification
//! links are signed: an HMAC over "path?query" plus an expiry timestamp,
//! so the link proves both who generated it and that it is still fresh.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha1::{Digest, Sha1};
use sha2::Sha256;
use url::Url;
use vitrine_core::User;

use crate::config::Config;

type HmacSha256 = Hmac<Sha256>;

const VERIFY_PATH: &str = "/verify-email";

/// Builds the link placed in a password-reset email.
pub trait ResetUrlBuilder: Send + Sync {
    fn reset_url(&self, token: &str, email: &str) -> Result<Url>;
}

/// Reset links point at the reset form route; the token travels in the
/// path, the email as a query parameter.
pub struct RouteResetUrlBuilder {
    base: Url,
}

impl RouteResetUrlBuilder {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).context("Invalid base URL")?;
        Ok(Self { base })
    }
}

impl ResetUrlBuilder for RouteResetUrlBuilder {
    fn reset_url(&self, token: &str, email: &str) -> Result<Url> {
        let mut url = self
            .base
            .join(&format!("/password/reset/{}", token))
            .context("Failed to build reset URL")?;
        url.query_pairs_mut().append_pair("email", email);
        Ok(url)
    }
}

/// Builds and checks time-limited signed email-verification links.
pub trait VerificationUrlBuilder: Send + Sync {
    fn verification_url(&self, user: &User, now: DateTime<Utc>) -> Result<Url>;

    /// Check a received link: signature over path and query, then expiry.
    fn verify(&self, path: &str, query: Option<&str>, now: DateTime<Utc>) -> bool;
}

pub struct SignedVerificationUrlBuilder {
    base: Url,
    secret: String,
    expire_minutes: i64,
    multi_locale: bool,
    include_site: bool,
    default_locale: String,
    default_site: String,
}

impl SignedVerificationUrlBuilder {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            base: Url::parse(&config.base_url).context("Invalid base URL")?,
            secret: config.app_key.clone(),
            expire_minutes: config.verification_expire_minutes,
            multi_locale: config.multi_locale,
            // Site disambiguation is needed as soon as more than one site
            // can register accounts
            include_site: config.multi_site || config.self_registration,
            default_locale: config.default_locale.clone(),
            default_site: config.default_site.clone(),
        })
    }

    fn signature(&self, path: &str, query: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| anyhow::anyhow!("Invalid signing key: {}", e))?;
        mac.update(format!("{}?{}", path, query).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl VerificationUrlBuilder for SignedVerificationUrlBuilder {
    fn verification_url(&self, user: &User, now: DateTime<Utc>) -> Result<Url> {
        let user_id = user
            .id
            .context("Cannot build a verification URL for an unsaved user")?;

        let email_hash = hex::encode(Sha1::digest(user.email_for_verification().as_bytes()));
        let expires = (now + Duration::minutes(self.expire_minutes)).timestamp();

        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("id", &user_id.to_string());
        serializer.append_pair("hash", &email_hash);
        if self.multi_locale {
            serializer.append_pair("locale", &self.default_locale);
        }
        if self.include_site {
            serializer.append_pair("site", &self.default_site);
        }
        serializer.append_pair("expires", &expires.to_string());
        let query = serializer.finish();

        let signature = self.signature(VERIFY_PATH, &query)?;

        let mut url = self
            .base
            .join(VERIFY_PATH)
            .context("Failed to build verification URL")?;
        url.set_query(Some(&format!("{}&signature={}", query, signature)));
        Ok(url)
    }

    fn verify(&self, path: &str, query: Option<&str>, now: DateTime<Utc>) -> bool {
        let query = match query {
            Some(q) => q,
            None => return false,
        };

        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut signature = None;
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key == "signature" {
                signature = Some(value.into_owned());
            } else {
                pairs.push((key.into_owned(), value.into_owned()));
            }
        }

        let signature = match signature.map(hex::decode) {
            Some(Ok(bytes)) => bytes,
            _ => return false,
        };

        // Re-serialize the remaining pairs in received order; the producer
        // used the same encoder, so a genuine link round-trips byte for byte
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &pairs {
            serializer.append_pair(key, value);
        }
        let canonical = serializer.finish();

        let mut mac = match HmacSha256::new_from_slice(self.secret.as_bytes()) {
            Ok(mac) => mac,
            Err(_) => return false,
        };
        mac.update(format!("{}?{}", path, canonical).as_bytes());
        if mac.verify_slice(&signature).is_err() {
            return false;
        }

        // Signature is genuine; now check it has not expired
        pairs
            .iter()
            .find(|(key, _)| key == "expires")
            .and_then(|(_, value)| value.parse::<i64>().ok())
            .map(|expires| expires >= now.timestamp())
            .unwrap_or(false)
    }
}

/// The address hash carried in verification links.
pub fn email_verification_hash(email: &str) -> String {
    hex::encode(Sha1::digest(email.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn builder(config: &Config) -> SignedVerificationUrlBuilder {
        SignedVerificationUrlBuilder::from_config(config).unwrap()
    }

    fn saved_user(email: &str) -> User {
        let mut user = User::new(email.to_string(), "password123").unwrap();
        user.id = Some(42);
        user
    }

    #[test]
    fn test_reset_url() {
        let urls = RouteResetUrlBuilder::new("http://localhost:3000").unwrap();
        let url = urls.reset_url("tok-123", "a@b.co").unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:3000/password/reset/tok-123?email=a%40b.co"
        );
    }

    #[test]
    fn test_email_verification_hash_known_vector() {
        assert_eq!(
            email_verification_hash("test@example.com"),
            "567159d622ffbb50b11b0efd307be358624a26ee"
        );
    }

    #[test]
    fn test_verification_url_round_trips() {
        let config = Config::for_tests("templates");
        let urls = builder(&config);
        let user = saved_user("test@example.com");
        let now = Utc::now();

        let url = urls.verification_url(&user, now).unwrap();
        assert_eq!(url.path(), "/verify-email");
        assert!(urls.verify(url.path(), url.query(), now));
    }

    #[test]
    fn test_verification_url_carries_id_and_hash() {
        let config = Config::for_tests("templates");
        let urls = builder(&config);
        let user = saved_user("test@example.com");

        let url = urls.verification_url(&user, Utc::now()).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(pairs[0].0, "id");
        assert_eq!(pairs[0].1, "42");
        assert_eq!(pairs[1].0, "hash");
        assert_eq!(pairs[1].1, "567159d622ffbb50b11b0efd307be358624a26ee");
    }

    #[test]
    fn test_locale_and_site_parameters_are_flag_gated() {
        let mut config = Config::for_tests("templates");
        let user = saved_user("test@example.com");
        let now = Utc::now();

        let plain = builder(&config).verification_url(&user, now).unwrap();
        assert!(!plain.query().unwrap().contains("locale="));
        assert!(!plain.query().unwrap().contains("site="));

        config.multi_locale = true;
        config.self_registration = true;
        let full = builder(&config).verification_url(&user, now).unwrap();
        assert!(full.query().unwrap().contains("locale=en"));
        assert!(full.query().unwrap().contains("site=default"));

        // Still a valid signed link with the extra parameters
        assert!(builder(&config).verify(full.path(), full.query(), now));
    }

    #[test]
    fn test_tampered_query_fails_verification() {
        let config = Config::for_tests("templates");
        let urls = builder(&config);
        let user = saved_user("test@example.com");
        let now = Utc::now();

        let url = urls.verification_url(&user, now).unwrap();
        let tampered = url.query().unwrap().replace("id=42", "id=43");
        assert!(!urls.verify(url.path(), Some(&tampered), now));
    }

    #[test]
    fn test_tampered_path_fails_verification() {
        let config = Config::for_tests("templates");
        let urls = builder(&config);
        let user = saved_user("test@example.com");
        let now = Utc::now();

        let url = urls.verification_url(&user, now).unwrap();
        assert!(!urls.verify("/other-route", url.query(), now));
    }

    #[test]
    fn test_expired_link_fails_verification() {
        let config = Config::for_tests("templates");
        let urls = builder(&config);
        let user = saved_user("test@example.com");
        let now = Utc::now();

        let url = urls.verification_url(&user, now).unwrap();
        let later = now + Duration::minutes(config.verification_expire_minutes + 1);
        assert!(!urls.verify(url.path(), url.query(), later));
    }

    #[test]
    fn test_wrong_secret_fails_verification() {
        let config = Config::for_tests("templates");
        let user = saved_user("test@example.com");
        let now = Utc::now();
        let url = builder(&config).verification_url(&user, now).unwrap();

        let mut other = Config::for_tests("templates");
        other.app_key = "another-secret".to_string();
        assert!(!builder(&other).verify(url.path(), url.query(), now));
    }

    #[test]
    fn test_missing_or_garbage_signature_fails_verification() {
        let config = Config::for_tests("templates");
        let urls = builder(&config);
        let now = Utc::now();

        assert!(!urls.verify(VERIFY_PATH, None, now));
        assert!(!urls.verify(VERIFY_PATH, Some("id=42&hash=abc"), now));
        assert!(!urls.verify(VERIFY_PATH, Some("id=42&signature=zz-not-hex"), now));
    }

    #[test]
    fn test_unsaved_user_cannot_get_a_link() {
        let config = Config::for_tests("templates");
        let urls = builder(&config);
        let user = User::new("test@example.com".to_string(), "password123").unwrap();

        assert!(urls.verification_url(&user, Utc::now()).is_err());
    }
}
