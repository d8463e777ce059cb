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

use anyhow::{Context, Result};
use std::path::Path;
use tera::Tera;

pub fn init_templates(templates_dir: &str) -> Result<Tera> {
    // Create templates directory if it doesn't exist
    std::fs::create_dir_all(templates_dir).context("Failed to create templates directory")?;

    // Create default templates if they don't exist
    create_default_templates(templates_dir)?;

    let glob = format!("{}/**/*.html", templates_dir);
    let tera = Tera::new(&glob).context("Failed to load templates")?;

    Ok(tera)
}

fn create_default_templates(templates_dir: &str) -> Result<()> {
    let base_dir = Path::new(templates_dir);

    let defaults: &[(&str, &str)] = &[
        (
            "base.html",
            r#"<!DOCTYPE html>
<html lang="{{ locale | default(value="en") }}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}{{ site_label | default(value="Vitrine") }}{% endblock %}</title>
    {% if site.icon_url %}<link rel="icon" href="{{ site.icon_url }}">{% endif %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            color: #333;
        }
        nav {
            border-bottom: 1px solid #eee;
            padding-bottom: 10px;
            margin-bottom: 20px;
        }
        nav a {
            margin-right: 15px;
            text-decoration: none;
            color: #0066cc;
        }
        .error { color: #b00020; }
        .notice { color: #1a7f37; }
        footer {
            margin-top: 40px;
            padding-top: 20px;
            border-top: 1px solid #eee;
            font-size: 0.9em;
            color: #666;
        }
    </style>
</head>
<body>
    <nav>
        {% if site.logo_url %}<img src="{{ site.logo_url }}" alt="{{ site_label }}" style="height: 32px;">{% endif %}
        <a href="/">Home</a>
        <a href="/.login">Login</a>
    </nav>

    <main>
        {% block content %}{% endblock %}
    </main>

    <footer>
        <p>{{ site_label | default(value="Vitrine") }}</p>
    </footer>
</body>
</html>"#,
        ),
        (
            "page.html",
            r#"{% extends "base.html" %}

{% block title %}{{ page.title }} - {{ super() }}{% endblock %}

{% block content %}
<article>
    <h1>{{ page.title }}</h1>
    <div class="content">
        {{ page.body | safe }}
    </div>
</article>
{% endblock %}"#,
        ),
        (
            "404.html",
            r#"{% extends "base.html" %}

{% block title %}Not Found - {{ super() }}{% endblock %}

{% block content %}
<h1>Page not found</h1>
<p>There is no content at this address.</p>
<p><a href="/">Return to homepage</a></p>
{% endblock %}"#,
        ),
        (
            "login.html",
            r#"{% extends "base.html" %}

{% block title %}Login - {{ super() }}{% endblock %}

{% block content %}
<h1>Login</h1>

{% if error %}
<p class="error">{{ error }}</p>
{% endif %}

<form method="post" action="/.login">
    <div style="margin-bottom: 15px;">
        <label for="email">Email:</label><br>
        <input type="email" id="email" name="email" required style="width: 300px; padding: 5px;">
    </div>

    <div style="margin-bottom: 15px;">
        <label for="password">Password:</label><br>
        <input type="password" id="password" name="password" required style="width: 300px; padding: 5px;">
    </div>

    <div>
        <button type="submit" style="padding: 5px 20px;">Login</button>
    </div>
</form>

<p><a href="/password/forgot">Forgot your password?</a></p>
{% endblock %}"#,
        ),
        (
            "forgot_password.html",
            r#"{% extends "base.html" %}

{% block title %}Reset password - {{ super() }}{% endblock %}

{% block content %}
<h1>Reset password</h1>

{% if sent %}
<p class="notice">If that address has an account, a reset link is on its way.</p>
{% else %}
<form method="post" action="/password/forgot">
    <div style="margin-bottom: 15px;">
        <label for="email">Email:</label><br>
        <input type="email" id="email" name="email" required style="width: 300px; padding: 5px;">
    </div>

    <div>
        <button type="submit" style="padding: 5px 20px;">Send reset link</button>
    </div>
</form>
{% endif %}
{% endblock %}"#,
        ),
        (
            "reset_password.html",
            r#"{% extends "base.html" %}

{% block title %}Choose a new password - {{ super() }}{% endblock %}

{% block content %}
<h1>Choose a new password</h1>

{% if error %}
<p class="error">{{ error }}</p>
{% endif %}

<form method="post" action="/password/reset">
    <input type="hidden" name="token" value="{{ token }}">
    <div style="margin-bottom: 15px;">
        <label for="email">Email:</label><br>
        <input type="email" id="email" name="email" value="{{ email | default(value="") }}" required style="width: 300px; padding: 5px;">
    </div>

    <div style="margin-bottom: 15px;">
        <label for="password">New password:</label><br>
        <input type="password" id="password" name="password" required style="width: 300px; padding: 5px;">
    </div>

    <div>
        <button type="submit" style="padding: 5px 20px;">Set password</button>
    </div>
</form>
{% endblock %}"#,
        ),
        (
            "admin.html",
            r#"{% extends "base.html" %}

{% block title %}Administration - {{ super() }}{% endblock %}

{% block content %}
<h1>Administration</h1>
<p>Signed in as {{ user.email }}.</p>
{% endblock %}"#,
        ),
    ];

    for (name, content) in defaults {
        let path = base_dir.join(name);
        if !path.exists() {
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to create template {}", name))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_templates_creates_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let dir_str = dir.path().to_str().unwrap();

        let tera = init_templates(dir_str)?;

        for name in [
            "base.html",
            "page.html",
            "404.html",
            "login.html",
            "forgot_password.html",
            "reset_password.html",
            "admin.html",
        ] {
            assert!(dir.path().join(name).exists(), "missing template {}", name);
            assert!(
                tera.get_template_names().any(|n| n == name),
                "template {} not loaded",
                name
            );
        }

        Ok(())
    }

    #[test]
    fn test_init_templates_keeps_existing_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let dir_str = dir.path().to_str().unwrap();

        let custom = "{% block content %}custom{% endblock %}";
        std::fs::write(dir.path().join("404.html"), custom)?;

        init_templates(dir_str)?;

        let kept = std::fs::read_to_string(dir.path().join("404.html"))?;
        assert_eq!(kept, custom);

        Ok(())
    }
}
