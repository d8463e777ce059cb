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

//! Base template context shared by every rendered page.

use tera::Context;
use vitrine_core::Site;

use vitrine_db::repositories::SiteRepository;

use crate::AppState;

/// Fetch the configured site item. A missing row or a store fault both
/// degrade to a constructed fallback so rendering never depends on the
/// sites table being healthy.
pub async fn resolve_site_item(state: &AppState) -> Site {
    let repo = SiteRepository::new(state.db.clone());

    match repo.find_by_code(&state.config.default_site).await {
        Ok(Some(site)) => site,
        Ok(None) => {
            tracing::warn!(code = %state.config.default_site, "Configured site not found, using fallback");
            Site::fallback()
        }
        Err(e) => {
            tracing::warn!(error = ?e, "Site lookup failed, using fallback");
            Site::fallback()
        }
    }
}

/// Insert the shared view data and hand back the site item for further use.
pub async fn add_base_context(context: &mut Context, state: &AppState) -> Site {
    let site = resolve_site_item(state).await;

    context.insert("site", &site);
    context.insert("site_label", &site.label);
    context.insert("locale", &state.config.default_locale);

    site
}
