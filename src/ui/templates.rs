//! Page templates

use minijinja::Environment;
use serde::Serialize;

use crate::error::Result;

const LAYOUT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{% block title %}Gatehouse{% endblock %}</title>
    <link rel="stylesheet" href="/assets/app.css">
</head>
<body>
    <main class="min-h-screen">
{% if user %}
        <header class="header">
            <a href="/" class="brand">Gatehouse</a>
            <nav>
                <a href="/">Home</a>
                <a href="/dashboard">Dashboard</a>
            </nav>
            <div class="user" data-user-id="{{ user.id }}">
                <span class="user-name">{{ user.name }}</span>
                <span class="user-email">{{ user.email }}</span>
{% if not demo %}
                <form method="post" action="/sign-out">
                    <button type="submit">Sign out</button>
                </form>
{% endif %}
            </div>
        </header>
{% endif %}
        <div class="container">
{% block content %}{% endblock %}
        </div>
    </main>
</body>
</html>
"#;

const HOME_TEMPLATE: &str = r#"{% extends "layout.html" %}
{% block content %}
            <h1>Welcome, {{ user.name }}</h1>
{% if demo %}
            <p class="notice">Running without a database. You are browsing as the demo user.</p>
{% endif %}
{% endblock %}
"#;

const DASHBOARD_TEMPLATE: &str = r#"{% extends "layout.html" %}
{% block title %}Dashboard - Gatehouse{% endblock %}
{% block content %}
            <h1>Dashboard</h1>
            <dl class="status">
                <dt>Signed in as</dt><dd>{{ user.email }}</dd>
                <dt>Database</dt><dd>{{ database }}</dd>
                <dt>Auth mode</dt><dd>{{ auth_mode }}</dd>
            </dl>
{% endblock %}
"#;

const AUTH_FORM_TEMPLATE: &str = r#"{% extends "layout.html" %}
{% block title %}{{ heading }} - Gatehouse{% endblock %}
{% block content %}
            <section class="auth-form">
                <h1>{{ heading }}</h1>
{% if not enabled %}
                <p class="notice">Sign in is unavailable while running without a database.</p>
{% endif %}
{% if error %}
                <p class="error">{{ error }}</p>
{% endif %}
                <form method="post" action="{{ action }}">
{% if with_name %}
                    <label>Name <input type="text" name="name" value="{{ name }}" required></label>
{% endif %}
                    <label>Email <input type="email" name="email" value="{{ email }}" required></label>
                    <label>Password <input type="password" name="password" minlength="{{ min_password }}" maxlength="{{ max_password }}" required></label>
                    <button type="submit"{% if not enabled %} disabled{% endif %}>{{ heading }}</button>
                </form>
                <p>{{ alternate | safe }}</p>
            </section>
{% endblock %}
"#;

const NOT_FOUND_TEMPLATE: &str = r#"{% extends "layout.html" %}
{% block title %}Not found - Gatehouse{% endblock %}
{% block content %}
            <h1>Page not found</h1>
            <p><a href="/">Back home</a></p>
{% endblock %}
"#;

/// Render a named page template
pub fn render_page<S: Serialize>(name: &str, ctx: S) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("layout.html", LAYOUT_TEMPLATE)?;
    env.add_template("home.html", HOME_TEMPLATE)?;
    env.add_template("dashboard.html", DASHBOARD_TEMPLATE)?;
    env.add_template("auth_form.html", AUTH_FORM_TEMPLATE)?;
    env.add_template("not_found.html", NOT_FOUND_TEMPLATE)?;

    let template = env.get_template(name)?;
    Ok(template.render(ctx)?)
}
