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

//! Password strength rules.
//!
//! The default rule requires eight characters; production deployments
//! additionally require mixed case and a breach-database check. The breach
//! check itself needs network access and lives behind the `BreachChecker`
//! trait in the web crate; this policy only says whether it must run.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_mixed_case: bool,
    pub check_compromised: bool,
}

impl PasswordPolicy {
    pub fn min(min_length: usize) -> Self {
        Self {
            min_length,
            require_mixed_case: false,
            check_compromised: false,
        }
    }

    pub fn mixed_case(mut self) -> Self {
        self.require_mixed_case = true;
        self
    }

    pub fn uncompromised(mut self) -> Self {
        self.check_compromised = true;
        self
    }

    /// The application-wide default rule.
    pub fn defaults(production: bool) -> Self {
        let rule = Self::min(8);

        if production {
            rule.mixed_case().uncompromised()
        } else {
            rule
        }
    }

    /// Check the local criteria. The compromised-password criterion is
    /// evaluated separately by whoever owns a `BreachChecker`.
    pub fn validate(&self, password: &str) -> Result<(), String> {
        if password.chars().count() < self.min_length {
            return Err(format!(
                "Password must be at least {} characters",
                self.min_length
            ));
        }

        if self.require_mixed_case {
            let has_lower = password.chars().any(|c| c.is_lowercase());
            let has_upper = password.chars().any(|c| c.is_uppercase());
            if !has_lower || !has_upper {
                return Err(
                    "Password must contain both uppercase and lowercase characters".to_string(),
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_outside_production() {
        let policy = PasswordPolicy::defaults(false);

        assert_eq!(policy.min_length, 8);
        assert!(!policy.require_mixed_case);
        assert!(!policy.check_compromised);
    }

    #[test]
    fn test_defaults_in_production() {
        let policy = PasswordPolicy::defaults(true);

        assert_eq!(policy.min_length, 8);
        assert!(policy.require_mixed_case);
        assert!(policy.check_compromised);
    }

    #[test]
    fn test_min_length_boundary() {
        let policy = PasswordPolicy::min(8);

        assert!(policy.validate("1234567").is_err());
        assert!(policy.validate("12345678").is_ok());
    }

    #[test]
    fn test_min_length_counts_characters_not_bytes() {
        let policy = PasswordPolicy::min(8);

        // 8 two-byte characters
        assert!(policy.validate("éééééééé").is_ok());
    }

    #[test]
    fn test_mixed_case() {
        let policy = PasswordPolicy::min(8).mixed_case();

        assert!(policy.validate("alllowercase").is_err());
        assert!(policy.validate("ALLUPPERCASE").is_err());
        assert!(policy.validate("MixedCase1").is_ok());
    }

    #[test]
    fn test_mixed_case_not_required_by_plain_rule() {
        let policy = PasswordPolicy::min(8);
        assert!(policy.validate("alllowercase").is_ok());
    }

    #[test]
    fn test_uncompromised_sets_flag_only() {
        let policy = PasswordPolicy::min(8).uncompromised();

        assert!(policy.check_compromised);
        // validate() never consults the breach database itself
        assert!(policy.validate("password1").is_ok());
    }
}
