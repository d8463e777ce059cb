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

//! Password reset flow.
//!
//! Requesting a reset always renders the same confirmation, whether or not
//! the address has an account. The emailed link carries a one-time token;
//! only its SHA-256 hash is stored. Mail transport is out of scope here:
//! the generated link is logged for the delivery layer to pick up.

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tera::Context;
use uuid::Uuid;
use vitrine_core::{PasswordReset, User};
use vitrine_db::repositories::{PasswordResetRepository, UserRepository};

use crate::error::AppError;
use crate::view_context::add_base_context;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ForgotForm {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetFormQuery {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetForm {
    pub token: String,
    pub email: String,
    pub password: String,
}

fn token_hash(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

pub async fn forgot_password_form(
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let mut context = Context::new();
    add_base_context(&mut context, &state).await;

    let html = state
        .templates
        .render("forgot_password.html", &context)
        .map_err(|e| AppError::internal_server_error("Failed to render forgot password form")
            .with_details(format!("{:?}", e)))?;

    Ok(Html(html))
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Form(form): Form<ForgotForm>,
) -> Result<Html<String>, AppError> {
    let user_repo = UserRepository::new(state.db.clone());

    if let Some(user) = user_repo.find_by_email(&form.email).await? {
        let token = Uuid::new_v4().to_string();

        PasswordResetRepository::new(state.db.clone())
            .upsert(&PasswordReset::new(user.email.clone(), token_hash(&token)))
            .await?;

        let url = state.reset_urls.reset_url(&token, &user.email)?;
        tracing::info!(email = %user.email, url = %url, "Password reset link generated");
    } else {
        tracing::debug!(email = %form.email, "Reset requested for unknown address");
    }

    // The response is identical either way; the form reveals nothing about
    // which addresses have accounts
    let mut context = Context::new();
    add_base_context(&mut context, &state).await;
    context.insert("sent", &true);

    let html = state
        .templates
        .render("forgot_password.html", &context)
        .map_err(|e| AppError::internal_server_error("Failed to render forgot password form")
            .with_details(format!("{:?}", e)))?;

    Ok(Html(html))
}

pub async fn reset_password_form(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<ResetFormQuery>,
) -> Result<Html<String>, AppError> {
    let mut context = Context::new();
    add_base_context(&mut context, &state).await;
    context.insert("token", &token);
    if let Some(email) = &query.email {
        context.insert("email", email);
    }

    let html = state
        .templates
        .render("reset_password.html", &context)
        .map_err(|e| AppError::internal_server_error("Failed to render reset password form")
            .with_details(format!("{:?}", e)))?;

    Ok(Html(html))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Form(form): Form<ResetForm>,
) -> Result<Response, AppError> {
    if let Err(reason) = state.password_policy.validate(&form.password) {
        return Err(AppError::bad_request(reason));
    }

    // A breach-API failure propagates: better to refuse the reset than to
    // accept a password we could not check
    if state.password_policy.check_compromised
        && state.breach.is_compromised(&form.password).await?
    {
        return Err(AppError::bad_request(
            "This password has appeared in a data breach; choose another",
        ));
    }

    let resets = PasswordResetRepository::new(state.db.clone());
    let reset = resets
        .find_by_email(&form.email)
        .await?
        .ok_or_else(|| AppError::bad_request("Invalid or expired reset link"))?;

    if reset.token_hash != token_hash(&form.token) {
        return Err(AppError::bad_request("Invalid or expired reset link"));
    }

    if reset.is_expired(state.config.reset_token_ttl_minutes, Utc::now()) {
        resets.delete(&form.email).await?;
        return Err(AppError::bad_request("Invalid or expired reset link"));
    }

    let user_repo = UserRepository::new(state.db.clone());
    let user = user_repo
        .find_by_email(&form.email)
        .await?
        .ok_or_else(|| AppError::bad_request("Invalid or expired reset link"))?;

    let user_id = user
        .id
        .ok_or_else(|| AppError::internal_server_error("Stored user has no id"))?;
    let new_hash = User::hash_password(&form.password)?;
    user_repo.update_password(user_id, &new_hash).await?;

    resets.delete(&form.email).await?;
    tracing::info!(email = %form.email, "Password reset completed");

    Ok(Redirect::to("/.login").into_response())
}
