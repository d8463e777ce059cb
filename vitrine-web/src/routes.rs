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

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    admin_dashboard, content_handler, forgot_password, forgot_password_form, login, login_form,
    logout, reset_password, reset_password_form, verify_email,
};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/.health", get(health))
        .route("/.login", get(login_form).post(login))
        .route("/.logout", get(logout))
        .route("/password/forgot", get(forgot_password_form).post(forgot_password))
        .route("/password/reset/{token}", get(reset_password_form))
        .route("/password/reset", post(reset_password))
        .route("/verify-email", get(verify_email))
        .route("/admin", get(admin_dashboard))
        // Everything else is a content path
        .fallback(get(content_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
