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
    extract::{Query, State},
    http::Uri,
    response::Redirect,
};
use chrono::Utc;
use serde::Deserialize;
use vitrine_db::repositories::UserRepository;

use crate::error::AppError;
use crate::urls::email_verification_hash;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    pub id: i64,
    pub hash: String,
}

/// Confirm an email address from a signed verification link. The signature
/// covers the whole query, so the id and hash are trustworthy once it
/// checks out; the hash is still compared against the user's current
/// address in case it changed after the link was sent.
pub async fn verify_email(
    State(state): State<AppState>,
    uri: Uri,
    Query(params): Query<VerifyParams>,
) -> Result<Redirect, AppError> {
    let now = Utc::now();

    if !state
        .verification_urls
        .verify(uri.path(), uri.query(), now)
    {
        return Err(AppError::forbidden("Invalid or expired verification link"));
    }

    let user_repo = UserRepository::new(state.db.clone());
    let user = user_repo
        .find_by_id(params.id)
        .await?
        .ok_or_else(|| AppError::not_found("No such account"))?;

    if email_verification_hash(user.email_for_verification()) != params.hash {
        return Err(AppError::forbidden("Invalid or expired verification link"));
    }

    if !user.is_verified() {
        user_repo.mark_email_verified(params.id, now).await?;
        tracing::info!(user_id = params.id, "Email address verified");
    }

    Ok(Redirect::to("/"))
}
