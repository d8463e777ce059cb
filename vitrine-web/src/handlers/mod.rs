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

pub mod admin;
pub mod auth;
pub mod content;
pub mod password;
pub mod verify;

pub use admin::admin_dashboard;
pub use auth::{login, login_form, logout};
pub use content::content_handler;
pub use password::{forgot_password, forgot_password_form, reset_password, reset_password_form};
pub use verify::verify_email;
