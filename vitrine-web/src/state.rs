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

use anyhow::Result;
use sqlx::SqlitePool;
use std::sync::Arc;
use tera::Tera;
use vitrine_core::PasswordPolicy;

use crate::breach::{BreachChecker, HibpChecker, StaticBreachList};
use crate::config::Config;
use crate::gate::{AdminGate, AuthorizationPredicate};
use crate::resolve::ResolverRegistry;
use crate::urls::{ResetUrlBuilder, RouteResetUrlBuilder, SignedVerificationUrlBuilder, VerificationUrlBuilder};

/// Everything handlers need, wired once at startup. Collaborators are held
/// behind their traits so tests can swap in stand-ins.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub templates: Arc<Tera>,
    pub config: Config,
    pub resolvers: Arc<ResolverRegistry>,
    pub gate: Arc<dyn AuthorizationPredicate>,
    pub password_policy: PasswordPolicy,
    pub reset_urls: Arc<dyn ResetUrlBuilder>,
    pub verification_urls: Arc<dyn VerificationUrlBuilder>,
    pub breach: Arc<dyn BreachChecker>,
}

impl AppState {
    pub fn new(db: SqlitePool, templates: Tera, config: Config) -> Result<Self> {
        let breach: Arc<dyn BreachChecker> = if config.production {
            Arc::new(HibpChecker::new())
        } else {
            Arc::new(StaticBreachList::empty())
        };

        Ok(Self {
            resolvers: Arc::new(ResolverRegistry::build_default()),
            gate: Arc::new(AdminGate::new(db.clone())),
            password_policy: PasswordPolicy::defaults(config.production),
            reset_urls: Arc::new(RouteResetUrlBuilder::new(&config.base_url)?),
            verification_urls: Arc::new(SignedVerificationUrlBuilder::from_config(&config)?),
            breach,
            db,
            templates: Arc::new(templates),
            config,
        })
    }
}
