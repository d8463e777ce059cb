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
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use tera::Context;

use crate::error::AppError;
use crate::resolve::RequestContext;
use crate::view_context::add_base_context;
use crate::AppState;

/// Catch-all content route: resolve the request path against the registered
/// content sources and render the page, or a 404 when nothing answers.
pub async fn content_handler(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Response, AppError> {
    let path = normalize_path(uri.path());

    let mut context = Context::new();
    let site = add_base_context(&mut context, &state).await;

    let ctx = RequestContext {
        db: state.db.clone(),
        site,
        locale: state.config.default_locale.clone(),
    };

    match state.resolvers.resolve_first(&ctx, &path).await {
        Some(page) => {
            context.insert("page", &page);
            let html = state
                .templates
                .render("page.html", &context)
                .map_err(|e| AppError::internal_server_error("Failed to render page")
                    .with_details(format!("{:?}", e)))?;
            Ok(Html(html).into_response())
        }
        None => render_not_found(&state, &context),
    }
}

pub fn render_not_found(state: &AppState, context: &Context) -> Result<Response, AppError> {
    let html = state
        .templates
        .render("404.html", context)
        .map_err(|e| AppError::internal_server_error("Failed to render 404 page")
            .with_details(format!("{:?}", e)))?;

    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}

/// Stored paths carry no surrounding slashes; the site root is the empty
/// string.
fn normalize_path(path: &str) -> String {
    path.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/"), "");
        assert_eq!(normalize_path("/about"), "about");
        assert_eq!(normalize_path("/about/imprint/"), "about/imprint");
        assert_eq!(normalize_path("about"), "about");
    }

    #[test]
    fn test_normalize_path_preserves_case_and_interior() {
        assert_eq!(normalize_path("/About/Us"), "About/Us");
        // Interior double slashes are part of the stored key, not trimmed
        assert_eq!(normalize_path("/a//b"), "a//b");
    }
}
