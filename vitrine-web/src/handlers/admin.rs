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

use axum::{extract::State, response::Html};
use tera::Context;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::view_context::add_base_context;
use crate::AppState;

const ADMIN_ROLES: &[&str] = &["admin"];

pub async fn admin_dashboard(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Html<String>, AppError> {
    let allowed = state
        .gate
        .allows(&current_user.user, "admin", ADMIN_ROLES)
        .await?;

    if !allowed {
        return Err(AppError::forbidden("Admin access required"));
    }

    let mut context = Context::new();
    add_base_context(&mut context, &state).await;
    context.insert("user", &current_user.user);

    let html = state
        .templates
        .render("admin.html", &context)
        .map_err(|e| AppError::internal_server_error("Failed to render admin page")
            .with_details(format!("{:?}", e)))?;

    Ok(Html(html))
}
