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
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use serde::Deserialize;
use tera::Context;
use vitrine_core::Session;
use vitrine_db::repositories::{SessionRepository, UserRepository};

use crate::view_context::add_base_context;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

async fn render_login(
    state: &AppState,
    error: Option<&str>,
) -> Result<Html<String>, StatusCode> {
    let mut context = Context::new();
    add_base_context(&mut context, state).await;

    if let Some(err) = error {
        context.insert("error", err);
    }

    let html = state
        .templates
        .render("login.html", &context)
        .map_err(|e| {
            tracing::error!("Failed to render login.html: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Html(html))
}

/// Display login form
pub async fn login_form(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    render_login(&state, None).await
}

/// Handle login POST request
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, StatusCode> {
    let user_repo = UserRepository::new(state.db.clone());

    let user = user_repo
        .find_by_email(&form.email)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let user = match user {
        Some(u) if u.is_active => u,
        Some(_) => {
            let html = render_login(&state, Some("Account is disabled")).await?;
            return Ok((jar, html).into_response());
        }
        None => {
            let html = render_login(&state, Some("Invalid email or password")).await?;
            return Ok((jar, html).into_response());
        }
    };

    match user.verify_password(&form.password) {
        Ok(true) => {}
        Ok(false) => {
            let html = render_login(&state, Some("Invalid email or password")).await?;
            return Ok((jar, html).into_response());
        }
        Err(e) => {
            tracing::error!("Password verification error: {:?}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    let user_id = user.id.ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    let session = Session::new(user_id);
    let session_id = session.id.clone();

    SessionRepository::new(state.db.clone())
        .create(&session)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let cookie = Cookie::build(("session_id", session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((jar.add(cookie), Redirect::to("/")).into_response())
}

/// Handle logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, StatusCode> {
    if let Some(session_cookie) = jar.get("session_id") {
        let session_id = session_cookie.value();

        // A failed delete only leaves an expired row behind
        let _ = SessionRepository::new(state.db.clone())
            .delete(session_id)
            .await;
    }

    let jar = jar.remove("session_id");

    Ok((jar, Redirect::to("/.login")))
}
