//! HTML rendering for the users web views

use std::borrow::Cow;
use std::fmt::Write;

use axum::http::HeaderMap;

use crate::db::User;

/// Header set by an authenticating proxy in front of the server.
pub const SESSION_USER_HEADER: &str = "x-remote-user";

/// Per-request values handed to every page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewContext {
    pub title: String,
    /// Display name of the signed-in user, when a session is present.
    pub session_user: Option<String>,
}

impl ViewContext {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            session_user: None,
        }
    }

    /// Context with the session user taken from request headers.
    pub fn from_headers(title: impl Into<String>, headers: &HeaderMap) -> Self {
        let session_user = headers
            .get(SESSION_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);

        Self {
            title: title.into(),
            session_user,
        }
    }
}

/// Escape text for HTML element and attribute content.
pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn page(ctx: &ViewContext, body: &str) -> String {
    let mut html = String::new();
    let title = escape_html(&ctx.title);

    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html lang=\"es\">");
    let _ = writeln!(html, "<head>");
    let _ = writeln!(html, "<meta charset=\"utf-8\">");
    let _ = writeln!(html, "<title>{title}</title>");
    let _ = writeln!(html, "</head>");
    let _ = writeln!(html, "<body>");
    let _ = writeln!(html, "<header>");
    let _ = writeln!(html, "<a href=\"/usuarios\">Usuarios</a>");
    if let Some(user) = ctx.session_user.as_deref() {
        let _ = writeln!(html, "<span class=\"session\">Conectado como {}</span>", escape_html(user));
    }
    let _ = writeln!(html, "</header>");
    let _ = writeln!(html, "<main>");
    let _ = writeln!(html, "<h1>{title}</h1>");
    html.push_str(body);
    let _ = writeln!(html, "</main>");
    let _ = writeln!(html, "</body>");
    let _ = writeln!(html, "</html>");
    html
}

/// Listing page: one table row per user, linking to the detail page.
pub fn users_table(ctx: &ViewContext, users: &[User]) -> String {
    let mut body = String::new();

    if users.is_empty() {
        let _ = writeln!(body, "<p>Aún no hay usuarios</p>");
        return page(ctx, &body);
    }

    let _ = writeln!(body, "<table>");
    let _ = writeln!(body, "<thead><tr><th>Id</th><th>Nombre</th><th>Correo electrónico</th></tr></thead>");
    let _ = writeln!(body, "<tbody>");
    for user in users {
        let _ = writeln!(
            body,
            "<tr><td>{id}</td><td><a href=\"/usuarios/{id}\">{name}</a></td><td>{email}</td></tr>",
            id = user.id,
            name = escape_html(&user.name),
            email = escape_html(&user.email),
        );
    }
    let _ = writeln!(body, "</tbody>");
    let _ = writeln!(body, "</table>");

    page(ctx, &body)
}

/// Detail page for one user.
pub fn user_detail(ctx: &ViewContext, user: &User) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<dl>");
    let _ = writeln!(body, "<dt>Id</dt><dd>{}</dd>", user.id);
    let _ = writeln!(body, "<dt>Nombre</dt><dd>{}</dd>", escape_html(&user.name));
    let _ = writeln!(body, "<dt>Correo electrónico</dt><dd>{}</dd>", escape_html(&user.email));
    let _ = writeln!(body, "</dl>");
    let _ = writeln!(body, "<p><a href=\"/usuarios\">Volver a la lista</a></p>");
    page(ctx, &body)
}

/// Page for a missing user or an unknown route.
pub fn not_found(ctx: &ViewContext, message: &str) -> String {
    page(ctx, &format!("<p>{}</p>\n", escape_html(message)))
}

/// Page for a failure while loading data.
pub fn server_error(ctx: &ViewContext) -> String {
    page(ctx, "<p>Ocurrió un error al cargar esta página.</p>\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn ana() -> User {
        User {
            id: 1,
            name: "Ana <script>".into(),
            email: "ana@example.com".into(),
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert!(matches!(escape_html("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn table_links_each_user() {
        let html = users_table(&ViewContext::new("Usuarios"), &[ana()]);
        assert!(html.contains("<a href=\"/usuarios/1\">Ana &lt;script&gt;</a>"));
        assert!(html.contains("<td>ana@example.com</td>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn empty_table_says_so() {
        let html = users_table(&ViewContext::new("Usuarios"), &[]);
        assert!(html.contains("Aún no hay usuarios"));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn detail_shows_fields() {
        let html = user_detail(&ViewContext::new("Usuario 1"), &ana());
        assert!(html.contains("<title>Usuario 1</title>"));
        assert!(html.contains("<dd>ana@example.com</dd>"));
    }

    #[test]
    fn session_user_comes_from_context() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_USER_HEADER, HeaderValue::from_static("bea"));
        let ctx = ViewContext::from_headers("Usuarios", &headers);
        assert_eq!(ctx.session_user.as_deref(), Some("bea"));

        let html = users_table(&ctx, &[]);
        assert!(html.contains("Conectado como bea"));

        let anonymous = users_table(&ViewContext::new("Usuarios"), &[]);
        assert!(!anonymous.contains("Conectado como"));
    }
}
